//! The `Backend` trait is the seam between a module and its owning
//! Statement Instance (§4.3 "Backend commands"). The registry crate only
//! needs the shape of this contract, not the Statement Runtime that
//! implements it — keeping the dependency order of §2 (Value < Registry
//! < Runtime) acyclic: `ncd-runtime` implements `Backend`, `ncd-registry`
//! only names it.

use std::rc::Rc;
use std::time::Duration;

use ncd_value::Value;

use crate::host::Host;
use crate::object::ObjectHandle;
use crate::owning::{ChildProcess, OwningProcess};
use crate::registry::Registry;

/// A deferred backend transition, standing in for "a module callback
/// that completes asynchronously" (§9 "Coroutine-style `init` callbacks").
/// The host reactor is expected to fire these after `delay` elapses;
/// in the engine crates that reactor is the Process Scheduler's own
/// single timer wheel (§4.4, §5 "the retry timer is the only
/// scheduler-owned timer; other timers belong to modules").
#[derive(Debug, Clone, Copy)]
pub enum DeferredAction {
    Up,
    Down,
    Dead { error: bool },
}

/// Everything a module may do to its owning statement (§4.3).
///
/// All calls are only valid from within a module callback or a fired
/// [`DeferredAction`] continuation (§5 "Suspension points").
pub trait Backend {
    /// This statement's own index in the owning process (§4.5, needed by
    /// modules that attach a child process keyed on their own position).
    fn index(&self) -> usize;
    /// DOWN_CLEAN/DOWN_UNCLEAN → UP.
    fn backend_up(&mut self);
    /// UP → DOWN_UNCLEAN.
    fn backend_down(&mut self);
    /// Any live state → DEAD.
    fn backend_dead(&mut self);
    /// Sets the sticky error flag; must precede `backend_dead` for a
    /// failure transition (§4.3 "Failure semantics").
    fn backend_set_error(&mut self);
    /// Resolves an object visible to this statement through the owning
    /// scheduler's namespace (§3 invariant 4, §4.4 "Namespace").
    fn backend_get_obj(&self, name: &str) -> Option<Rc<dyn ObjectHandle>>;
    /// Requests host shutdown with the given exit code.
    fn backend_interp_exit(&mut self, code: i32);
    /// The host process's invocation arguments.
    fn backend_interp_get_args(&self) -> Value;
    /// The configured retry backoff.
    fn backend_interp_get_retry_time(&self) -> Duration;
    /// Arranges for `action` to be delivered to this same statement
    /// after `delay` elapses.
    fn defer(&mut self, delay: Duration, action: DeferredAction);
    /// A handle onto the process this statement lives in (§4.5), for
    /// modules that compose a nested Sub-Process Primitive.
    fn owning_process(&self) -> Rc<dyn OwningProcess>;
    /// The host services this statement's process was spawned with
    /// (§6), so a module composing a Sub-Process Primitive can hand the
    /// same host down to its child.
    fn host(&self) -> Rc<dyn Host>;
    /// The module registry this statement's process was spawned with
    /// (§4.5), for modules that build a child process from it.
    fn registry(&self) -> Rc<Registry>;
    /// Registers `child` as a nested process driven by this statement
    /// (§4.5). The process tree picks it up on its next pass and starts
    /// relaying its UP/DOWN/TERMINATED transitions back here as
    /// deferred backend actions — a direct mutation of this statement's
    /// own process, never a fresh borrow of it, so it is always safe to
    /// call from within `init`.
    fn attach_child(&mut self, child: Rc<dyn ChildProcess>);
}
