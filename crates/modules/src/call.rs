//! `call`: the module that composes the Sub-Process Primitive (§4.5).
//! `call("greet", list())` spawns the `greet` template as a child
//! process, stays DOWN_CLEAN until the child is fully up, and relays
//! the DOWN → `Continue` handshake through [`Module::clean`].

use ncd_registry::{Backend, InitOutcome, Module, ModuleState, ObjectHandle};
use ncd_subprocess::{SubProcess, TemplateMap};
use ncd_value::{Arena, Value};
use std::rc::Rc;

pub struct CallModule {
    templates: Rc<TemplateMap>,
}

impl CallModule {
    pub fn new(templates: Rc<TemplateMap>) -> Self {
        Self { templates }
    }
}

impl Module for CallModule {
    fn base_type(&self) -> &str {
        "call"
    }

    fn init(&self, ctx: &mut dyn Backend, args: Value, _method_object: Option<&dyn ObjectHandle>) -> InitOutcome {
        let Some(name) = args.list_get(0).and_then(|v| v.as_bytes()) else {
            return InitOutcome::Dead { error: true };
        };
        let Ok(name) = std::str::from_utf8(name) else {
            return InitOutcome::Dead { error: true };
        };
        let call_args = args.list_get(1).cloned().unwrap_or_else(|| {
            Value::build_list(args.arena()).expect("list build against an already-charged arena")
        });

        // §4.5 "a template invocation gets a fresh arena scoped to the
        // child's lifetime": the parent's own arena budget is unrelated
        // to what the spawned process may allocate.
        match SubProcess::spawn(ctx, &self.templates, name, Arena::unbounded(), call_args) {
            Ok(sub_process) => InitOutcome::DownClean(Box::new(sub_process)),
            Err(e) => {
                tracing::warn!(name, error = %e, "call: template lookup failed");
                InitOutcome::Dead { error: true }
            }
        }
    }

    fn die(&self, state: &mut ModuleState, ctx: &mut dyn Backend) {
        // §4.5 "teardown of b tears down the child fully before a": don't
        // report DEAD until the child has actually finished terminating.
        // For the synchronous demo modules this completes within the
        // `terminate()` call below; a module with an asynchronous `die`
        // leaves the child (and this statement) alive until the process
        // tree relays the child's own `TERMINATED` transition as a
        // deferred `Dead` action (see `ProcessTree::pump`).
        if let Some(sub_process) = state.downcast_mut::<SubProcess>() {
            sub_process.terminate();
            if sub_process.is_terminated() {
                ctx.backend_dead();
            }
        } else {
            ctx.backend_dead();
        }
    }

    fn clean(&self, state: &mut ModuleState, _ctx: &mut dyn Backend) {
        // §4.5 "Continue": our own regress has settled (everything
        // above us is torn down); let the paused child re-advance.
        if let Some(sub_process) = state.downcast_mut::<SubProcess>() {
            sub_process.resume();
        }
    }
}
