//! `list.length()`: a method-style statement (§3 "an optional dotted
//! object path on which the statement is invoked as a method", §4.2
//! `method_base`). Demonstrates the Module Registry's method-resolution
//! index end to end: the statement descriptor names `object_path =
//! "some_list"` and `module_type = "list::length"`; the scheduler
//! resolves `some_list` to its exported object, checks its `base_type`
//! against this module's declared `method_base`, and only then invokes
//! `init` with that object passed as `method_object`.

use ncd_registry::{Backend, InitOutcome, Module, ModuleState, ObjectHandle};
use ncd_value::Value;

pub struct ListLengthModule;

impl Module for ListLengthModule {
    fn base_type(&self) -> &str {
        "list::length"
    }

    fn method_base(&self) -> Option<&str> {
        Some("list")
    }

    fn init(&self, _ctx: &mut dyn Backend, args: Value, method_object: Option<&dyn ObjectHandle>) -> InitOutcome {
        let Some(method_object) = method_object else {
            return InitOutcome::Dead { error: true };
        };
        let Some(list_value) = method_object.get_var("") else {
            return InitOutcome::Dead { error: true };
        };
        let Some(count) = list_value.list_count() else {
            return InitOutcome::Dead { error: true };
        };
        let arena = args.arena().clone();
        let Ok(rendered) = Value::build_string(&arena, count.to_string()) else {
            return InitOutcome::Dead { error: true };
        };
        InitOutcome::Up(Box::new(rendered))
    }

    fn get_var(&self, state: &ModuleState, name: &str) -> Option<Value> {
        if !name.is_empty() {
            return None;
        }
        state.downcast_ref::<Value>().cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::literals::ListModule;
    use ncd_value::Arena;
    use std::rc::Rc;
    use std::time::Duration;

    struct NullBackend;
    impl Backend for NullBackend {
        fn index(&self) -> usize {
            0
        }
        fn backend_up(&mut self) {}
        fn backend_down(&mut self) {}
        fn backend_dead(&mut self) {}
        fn backend_set_error(&mut self) {}
        fn backend_get_obj(&self, _name: &str) -> Option<Rc<dyn ObjectHandle>> {
            None
        }
        fn backend_interp_exit(&mut self, _code: i32) {}
        fn backend_interp_get_args(&self) -> Value {
            Value::build_list(&Arena::unbounded()).unwrap()
        }
        fn backend_interp_get_retry_time(&self) -> Duration {
            Duration::from_millis(100)
        }
        fn defer(&mut self, _delay: Duration, _action: ncd_registry::DeferredAction) {}
        fn owning_process(&self) -> Rc<dyn ncd_registry::OwningProcess> {
            struct NoOwner;
            impl ncd_registry::OwningProcess for NoOwner {
                fn resolve(&self, _requester_index: usize, _path: &str) -> Option<Rc<dyn ObjectHandle>> {
                    None
                }
            }
            Rc::new(NoOwner)
        }
        fn host(&self) -> Rc<dyn ncd_registry::Host> {
            Rc::new(ncd_registry::StaticHost::new(
                Value::build_list(&Arena::unbounded()).unwrap(),
                Duration::from_millis(100),
            ))
        }
        fn registry(&self) -> Rc<ncd_registry::Registry> {
            Rc::new(ncd_registry::Registry::new())
        }
        fn attach_child(&mut self, _child: Rc<dyn ncd_registry::ChildProcess>) {}
    }

    /// A minimal `ObjectHandle` standing in for a `list` statement's
    /// exported object, the way the scheduler's `StatementObject` would
    /// proxy one (§4.4).
    struct FakeListObject(Value);
    impl ObjectHandle for FakeListObject {
        fn get_var(&self, name: &str) -> Option<Value> {
            if name.is_empty() {
                Some(self.0.clone())
            } else {
                None
            }
        }
        fn get_obj(&self, _name: &str) -> Option<Rc<dyn ObjectHandle>> {
            None
        }
        fn base_type(&self) -> Option<String> {
            Some("list".to_string())
        }
    }

    #[test]
    fn reports_count_of_underlying_list() {
        let arena = Arena::unbounded();
        let mut backend = NullBackend;
        let mut list_args = Value::build_list(&arena).unwrap();
        for s in ["a", "b", "c"] {
            list_args = list_args.list_append(Value::build_string(&arena, s).unwrap()).unwrap();
        }
        let InitOutcome::Up(list_state) = ListModule.init(&mut backend, list_args, None) else {
            panic!("expected list init to land Up");
        };
        let list_value = ListModule.get_var(&list_state, "").unwrap();
        let method_object = FakeListObject(list_value);

        let empty_args = Value::build_list(&arena).unwrap();
        let outcome = ListLengthModule.init(&mut backend, empty_args, Some(&method_object));
        let InitOutcome::Up(state) = outcome else {
            panic!("expected Up");
        };
        let rendered = ListLengthModule.get_var(&state, "").unwrap();
        assert_eq!(rendered.as_bytes(), Some(&b"3"[..]));
    }

    #[test]
    fn fails_without_a_method_object() {
        let arena = Arena::unbounded();
        let mut backend = NullBackend;
        let outcome = ListLengthModule.init(&mut backend, Value::build_list(&arena).unwrap(), None);
        assert!(matches!(outcome, InitOutcome::Dead { error: true }));
    }
}
