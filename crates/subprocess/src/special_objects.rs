//! The special objects a child process's namespace is augmented with
//! (§4.5): `_caller` (a proxy onto the owner's scope) and `_args`/
//! `_arg0..` (views of the call's argument list).

use std::collections::HashMap;
use std::rc::{Rc, Weak};

use ncd_registry::{ObjectHandle, OwningProcess};
use ncd_value::Value;

/// `_caller`: resolves a name against the owner statement's own
/// namespace, i.e. everything visible to the owner at the point it
/// invoked the template (§4.5 "an object proxying the owner's scope").
/// Holds a weak reference so a child's `_caller` never keeps its owner
/// alive (§9 "child holds back-reference as an index + weak handle").
pub struct CallerProxy {
    owner: Weak<dyn OwningProcess>,
    owner_index: usize,
}

impl CallerProxy {
    pub fn new(owner: Weak<dyn OwningProcess>, owner_index: usize) -> Self {
        Self { owner, owner_index }
    }
}

impl ObjectHandle for CallerProxy {
    fn get_var(&self, _name: &str) -> Option<Value> {
        // `_caller` itself is a namespace root, not a variable-bearing
        // object; only `_caller.<name>` resolves to anything.
        None
    }

    fn get_obj(&self, name: &str) -> Option<Rc<dyn ObjectHandle>> {
        let owner = self.owner.upgrade()?;
        owner.resolve(self.owner_index, name)
    }
}

/// A single positional argument, exposed as `_arg<i>`'s default
/// variable (§4.5 "`_arg0..`").
pub struct ArgElement(Value);

impl ObjectHandle for ArgElement {
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
}

/// The whole call argument list, exposed as `_args`'s default variable
/// (§4.5 "`_args` (views of the argument list)").
pub struct ArgsView(Value);

impl ObjectHandle for ArgsView {
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
}

/// Builds the standard special-object set for a template invocation:
/// `_caller`, `_args`, and one `_arg<i>` per positional argument.
pub fn standard_specials(
    owner: Weak<dyn OwningProcess>,
    owner_index: usize,
    args: &Value,
) -> HashMap<String, Rc<dyn ObjectHandle>> {
    let mut specials: HashMap<String, Rc<dyn ObjectHandle>> = HashMap::new();
    specials.insert(
        "_caller".to_string(),
        Rc::new(CallerProxy::new(owner, owner_index)),
    );
    specials.insert("_args".to_string(), Rc::new(ArgsView(args.clone())));
    if let Some(count) = args.list_count() {
        for i in 0..count {
            if let Some(element) = args.list_get(i) {
                specials.insert(format!("_arg{i}"), Rc::new(ArgElement(element.clone())));
            }
        }
    }
    specials
}
