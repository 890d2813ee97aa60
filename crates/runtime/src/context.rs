//! The seam a Statement Instance uses to talk back to its owning
//! Process (§3 "Back-pointer to its owning Process Instance"). Rather
//! than a literal back-pointer — which Rust's ownership model makes
//! awkward when the owner holds the child in a `Vec` — every runtime
//! method that can trigger a transition takes the owning context as an
//! explicit parameter. This is the "index + weak handle" pattern of §9
//! translated into passed-in borrows instead of `Weak`: the context
//! object *is* the lookup, scoped to the call.

use std::rc::Rc;
use std::time::Duration;

use ncd_registry::{ChildProcess, DeferredAction, Host, ObjectHandle, OwningProcess, Registry};
use ncd_value::Value;

/// Implemented by the Process Scheduler's Process Instance (§4.4).
pub trait ProcessContext {
    /// A statement transitioned to UP.
    fn notify_up(&mut self, index: usize);
    /// A statement transitioned to DOWN_UNCLEAN (regress trigger).
    fn notify_down(&mut self, index: usize);
    /// A statement transitioned to DEAD. `requested` is true when this
    /// followed a scheduler-issued `die()`, false for an unsolicited
    /// failure (§4.3 "Failure semantics").
    fn notify_dead(&mut self, index: usize, error: bool, requested: bool);
    /// Resolves `name` against the namespace visible to the statement at
    /// `requester_index` (§3 invariant 4, §4.4).
    fn resolve_object(&self, requester_index: usize, name: &str) -> Option<Rc<dyn ObjectHandle>>;
    fn interp_exit(&mut self, code: i32);
    fn interp_get_args(&self) -> Value;
    fn interp_get_retry_time(&self) -> Duration;
    /// Arranges for `action` to be delivered back to the statement at
    /// `index` after `delay` (§5 "other timers belong to modules").
    fn defer(&mut self, index: usize, delay: Duration, action: DeferredAction);
    /// A handle onto this process itself (§4.5), handed to modules that
    /// compose a nested Sub-Process Primitive.
    fn owning_process(&self) -> Rc<dyn OwningProcess>;
    /// The host services this process was spawned with (§6).
    fn host(&self) -> Rc<dyn Host>;
    /// The module registry this process was spawned with (§4.5).
    fn registry(&self) -> Rc<Registry>;
    /// Registers `child` as driven by the statement at `index` (§4.5).
    fn attach_child(&mut self, index: usize, child: Rc<dyn ChildProcess>);
}
