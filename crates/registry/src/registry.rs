//! The module registry itself: a mapping from module-type name to
//! module, with method resolution (§4.2).

use std::collections::HashMap;
use std::rc::Rc;

use crate::error::{RegistryError, RegistryResult};
use crate::module::Module;

/// Catalog of statement kinds, constructed once at program load and
/// immutable thereafter (§9 "Global state").
#[derive(Default, Clone)]
pub struct Registry {
    by_type: HashMap<String, Rc<dyn Module>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a module under its full type name (e.g. `"value"` or
    /// `"list::append"`). Replaces any prior registration for that name.
    pub fn register(&mut self, type_name: impl Into<String>, module: Rc<dyn Module>) {
        self.by_type.insert(type_name.into(), module);
    }

    pub fn lookup(&self, type_name: &str) -> RegistryResult<Rc<dyn Module>> {
        self.by_type
            .get(type_name)
            .cloned()
            .ok_or_else(|| RegistryError::UnknownType {
                type_name: type_name.to_string(),
            })
    }

    /// Resolves a method-style statement (`object_path.method_type`):
    /// looks up `method_type` and checks its `method_base` matches the
    /// base type of the object it's being invoked on (§4.2 "secondary
    /// index for method resolution").
    pub fn resolve_method(
        &self,
        method_type: &str,
        object_base_type: &str,
    ) -> RegistryResult<Rc<dyn Module>> {
        let module = self.lookup(method_type)?;
        match module.method_base() {
            Some(expected) if expected == object_base_type => Ok(module),
            Some(expected) => Err(RegistryError::MethodBaseMismatch {
                method_type: method_type.to_string(),
                expected: expected.to_string(),
                actual: object_base_type.to_string(),
            }),
            None => Err(RegistryError::NotAMethod {
                method_type: method_type.to_string(),
                object_base: object_base_type.to_string(),
            }),
        }
    }
}
