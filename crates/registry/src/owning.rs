//! A minimal, type-erased view of "the process instance that owns me"
//! (§4.5 "Sub-Process Primitive"). The registry crate sits below the
//! Process Scheduler in the dependency order of §2, so it cannot name
//! `ProcessInstance` directly; these two traits let the host's process
//! tree drive any process generically, and let a module's `_caller`
//! proxy resolve names against its owner's namespace, without the
//! scheduler crate's concrete types leaking downward.

use std::rc::Rc;
use std::time::Instant;

use crate::backend::DeferredAction;
use crate::object::ObjectHandle;

/// A process instance, as seen by whatever is driving it as a node in
/// the process tree (§4.5, §9 "owner holds child; child holds
/// back-reference as an index + weak handle"). Every live process,
/// root or nested, is driven this way — never by one process reaching
/// directly into another's internals while its own borrow is active
/// (that would re-enter the same `RefCell`); the tree drives each
/// entry independently and relays transitions only after each entry's
/// own turn completes.
pub trait ChildProcess {
    fn pump(&self, now: Instant);
    fn next_deadline(&self) -> Option<Instant>;
    fn is_fully_up(&self) -> bool;
    fn is_terminated(&self) -> bool;
    /// §4.5 "Continue": releases a pause installed after a `DOWN` event.
    fn set_paused(&self, paused: bool);
    fn terminate(&self);
    /// Drains child-process attachments a statement registered on this
    /// process during its last turn, so the tree can add them as new
    /// nodes on its next pass.
    fn take_pending_children(&self) -> Vec<(usize, Rc<dyn ChildProcess>)>;
    /// Non-destructive peek at whether [`Self::take_pending_children`]
    /// would return anything right now — lets the tree tell "nothing to
    /// do" apart from "a child was just attached and still needs to be
    /// folded in", without draining the queue early.
    fn has_pending_children(&self) -> bool;
    /// Delivers a relayed `UP`/`DOWN`/`TERMINATED` transition from a
    /// child to the statement at `owner_index` on this process.
    fn deliver_child_event(&self, owner_index: usize, action: DeferredAction, now: Instant);
}

/// A process instance, as seen by one of its own statements reaching
/// back into it (§4.5 "`_caller`: an object proxying the owner's
/// scope"). Deliberately narrower than [`ChildProcess`]: a statement
/// may only look things up in its own process, never drive it.
pub trait OwningProcess {
    /// Resolves `path` against the namespace visible to the statement
    /// at `requester_index`.
    fn resolve(&self, requester_index: usize, path: &str) -> Option<Rc<dyn ObjectHandle>>;
}
