//! `echo`: the variable-resolution test module of §8 S4/S5. Its single
//! argument is the *name* of an object to resolve — never a live
//! reference — matching §9's "Argument Templates never carry a live
//! variable-reference AST node; a module like `echo` interprets a
//! literal string argument as an object name and performs the lookup
//! itself via `backend-get-obj`."

use std::rc::Rc;

use ncd_registry::{Backend, InitOutcome, Module, ModuleState, ObjectHandle};
use ncd_value::Value;

pub struct EchoModule;

impl Module for EchoModule {
    fn base_type(&self) -> &str {
        "echo"
    }

    fn init(&self, ctx: &mut dyn Backend, args: Value, _method_object: Option<&dyn ObjectHandle>) -> InitOutcome {
        let Some(name) = args.list_get(0).and_then(|v| v.as_bytes()) else {
            return InitOutcome::Dead { error: true };
        };
        let Ok(name) = std::str::from_utf8(name) else {
            return InitOutcome::Dead { error: true };
        };
        match ctx.backend_get_obj(name) {
            Some(target) => InitOutcome::Up(Box::new(target)),
            None => {
                tracing::warn!(name, "echo: target object did not resolve");
                InitOutcome::Dead { error: true }
            }
        }
    }

    fn get_var(&self, state: &ModuleState, name: &str) -> Option<Value> {
        if !name.is_empty() {
            return None;
        }
        state.downcast_ref::<Rc<dyn ObjectHandle>>()?.get_var("")
    }

    fn get_obj(&self, state: &ModuleState, name: &str) -> Option<Rc<dyn ObjectHandle>> {
        state.downcast_ref::<Rc<dyn ObjectHandle>>()?.get_obj(name)
    }
}
