//! Objects exported by statements and resolved through the scheduler's
//! namespace (§4.4 "Namespace and variable resolution").

use std::rc::Rc;

use ncd_value::Value;

/// A named object a statement (or sub-process special object such as
/// `_caller`) exposes to later statements. Dotted paths resolve by
/// walking `get_obj` for every segment but the last, then `get_var` for
/// the tail (§4.4).
pub trait ObjectHandle {
    /// Reads a variable by name. The empty string is the object's own
    /// "default" variable, used by statements like `value(...)` and the
    /// `echo` test module (§8 S4).
    fn get_var(&self, name: &str) -> Option<Value>;

    /// Resolves a named sub-object, recursively.
    fn get_obj(&self, name: &str) -> Option<Rc<dyn ObjectHandle>>;

    /// The statement kind's `base_type` (§4.2), when this object is
    /// backed by a live statement — used by the scheduler to validate a
    /// method-style statement's `object_path` against the invoked
    /// method's declared `method_base`. `None` for special objects
    /// (`_caller`, `_args`, ...) that aren't invocable as methods.
    /// Owned rather than borrowed: the statement backing this object
    /// typically lives behind a `RefCell` the caller has already
    /// released by the time it reads the result.
    fn base_type(&self) -> Option<String> {
        None
    }
}

/// Resolves the tail of a dotted path against the object named by its
/// head (the head itself is resolved by the caller via
/// `backend_get_obj`). Every remaining segment but the last is a
/// sub-object lookup; the last segment (or the empty string, for a bare
/// `foo`) is a variable read (§4.4: "the head names a statement-provided
/// object; each tail segment is a sub-object or, for the last segment, a
/// variable").
pub fn resolve_tail(root: &Rc<dyn ObjectHandle>, tail: &str) -> Option<Value> {
    if tail.is_empty() {
        return root.get_var("");
    }
    let mut current = Rc::clone(root);
    let mut segments = tail.split('.').peekable();
    while let Some(segment) = segments.next() {
        if segments.peek().is_none() {
            return current.get_var(segment);
        }
        current = current.get_obj(segment)?;
    }
    None
}
