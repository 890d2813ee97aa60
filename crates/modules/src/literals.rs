//! Directly-constructible Value-kind statements: `value(s)` wraps a
//! single string argument as its default variable; `list(...)`/
//! `map(...)` expose the already-materialized argument list/pairs
//! as-is, since the compiled argument template has already done the
//! arena work §4.1's `build-list`/`build-map` describe.

use ncd_registry::{Backend, InitOutcome, Module, ModuleState, ObjectHandle};
use ncd_value::Value;

/// `value("hello")`: a statement whose empty-named variable is its
/// sole argument (§8 S4).
pub struct ValueModule;

impl Module for ValueModule {
    fn base_type(&self) -> &str {
        "value"
    }

    fn init(&self, _ctx: &mut dyn Backend, args: Value, _method_object: Option<&dyn ObjectHandle>) -> InitOutcome {
        let value = match args.list_get(0) {
            Some(v) => v.clone(),
            None => return InitOutcome::Dead { error: true },
        };
        InitOutcome::Up(Box::new(value))
    }

    fn get_var(&self, state: &ModuleState, name: &str) -> Option<Value> {
        if !name.is_empty() {
            return None;
        }
        state.downcast_ref::<Value>().cloned()
    }
}

/// `list(a, b, c)`: exposes the materialized argument list itself as
/// its default variable.
pub struct ListModule;

impl Module for ListModule {
    fn base_type(&self) -> &str {
        "list"
    }

    fn init(&self, _ctx: &mut dyn Backend, args: Value, _method_object: Option<&dyn ObjectHandle>) -> InitOutcome {
        InitOutcome::Up(Box::new(args))
    }

    fn get_var(&self, state: &ModuleState, name: &str) -> Option<Value> {
        if !name.is_empty() {
            return None;
        }
        state.downcast_ref::<Value>().cloned()
    }
}

/// `map([k1, v1], [k2, v2], ...)`: builds a map Value from the argument
/// list's two-element entries and exposes it as the default variable.
pub struct MapModule;

impl Module for MapModule {
    fn base_type(&self) -> &str {
        "map"
    }

    fn init(&self, _ctx: &mut dyn Backend, args: Value, _method_object: Option<&dyn ObjectHandle>) -> InitOutcome {
        let arena = args.arena().clone();
        let mut map = match Value::build_map(&arena) {
            Ok(m) => m,
            Err(_) => return InitOutcome::Dead { error: true },
        };
        let count = args.list_count().unwrap_or(0);
        for i in 0..count {
            let Some(pair) = args.list_get(i) else {
                return InitOutcome::Dead { error: true };
            };
            let (Some(key), Some(value)) = (pair.list_get(0), pair.list_get(1)) else {
                return InitOutcome::Dead { error: true };
            };
            map = match map.map_insert(key.clone(), value.clone()) {
                Ok(m) => m,
                Err(_) => return InitOutcome::Dead { error: true },
            };
        }
        InitOutcome::Up(Box::new(map))
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
    use ncd_value::Arena;

    struct NullBackend;
    impl Backend for NullBackend {
        fn index(&self) -> usize {
            0
        }
        fn backend_up(&mut self) {}
        fn backend_down(&mut self) {}
        fn backend_dead(&mut self) {}
        fn backend_set_error(&mut self) {}
        fn backend_get_obj(&self, _name: &str) -> Option<std::rc::Rc<dyn ObjectHandle>> {
            None
        }
        fn backend_interp_exit(&mut self, _code: i32) {}
        fn backend_interp_get_args(&self) -> Value {
            Value::build_list(&Arena::unbounded()).unwrap()
        }
        fn backend_interp_get_retry_time(&self) -> std::time::Duration {
            std::time::Duration::from_millis(100)
        }
        fn defer(&mut self, _delay: std::time::Duration, _action: ncd_registry::DeferredAction) {}
        fn owning_process(&self) -> std::rc::Rc<dyn ncd_registry::OwningProcess> {
            struct NoOwner;
            impl ncd_registry::OwningProcess for NoOwner {
                fn resolve(&self, _requester_index: usize, _path: &str) -> Option<std::rc::Rc<dyn ObjectHandle>> {
                    None
                }
            }
            std::rc::Rc::new(NoOwner)
        }
        fn host(&self) -> std::rc::Rc<dyn ncd_registry::Host> {
            std::rc::Rc::new(ncd_registry::StaticHost::new(
                Value::build_list(&Arena::unbounded()).unwrap(),
                std::time::Duration::from_millis(100),
            ))
        }
        fn registry(&self) -> std::rc::Rc<ncd_registry::Registry> {
            std::rc::Rc::new(ncd_registry::Registry::new())
        }
        fn attach_child(&mut self, _child: std::rc::Rc<dyn ncd_registry::ChildProcess>) {}
    }

    #[test]
    fn value_module_exposes_its_argument() {
        let arena = Arena::unbounded();
        let mut backend = NullBackend;
        let s = Value::build_string(&arena, "hello").unwrap();
        let mut args = Value::build_list(&arena).unwrap();
        args = args.list_append(s.clone()).unwrap();

        let outcome = ValueModule.init(&mut backend, args, None);
        let InitOutcome::Up(state) = outcome else {
            panic!("expected Up");
        };
        assert_eq!(ValueModule.get_var(&state, ""), Some(s));
    }

    #[test]
    fn map_module_builds_map_from_pairs() {
        let arena = Arena::unbounded();
        let mut backend = NullBackend;
        let key = Value::build_string(&arena, "k").unwrap();
        let value = Value::build_string(&arena, "v").unwrap();
        let mut pair = Value::build_list(&arena).unwrap();
        pair = pair.list_append(key.clone()).unwrap();
        pair = pair.list_append(value.clone()).unwrap();
        let mut args = Value::build_list(&arena).unwrap();
        args = args.list_append(pair).unwrap();

        let outcome = MapModule.init(&mut backend, args, None);
        let InitOutcome::Up(state) = outcome else {
            panic!("expected Up");
        };
        let map = MapModule.get_var(&state, "").unwrap();
        assert_eq!(map.map_lookup(&key), Some(&value));
    }
}
