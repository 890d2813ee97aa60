//! The flat process tree (§4.5, §9): the host drives every live
//! process — the root and every nested Sub-Process Primitive child,
//! transitively — as independent, sequentially-visited nodes, never by
//! recursing into a child from inside the parent's own borrow. That
//! discipline is what lets `_caller` resolution re-borrow the owner
//! safely: by the time a child ever runs, the statement that spawned
//! it has long since returned and released its own borrow.

use std::rc::Rc;
use std::time::Instant;

use ncd_registry::{ChildProcess, DeferredAction};

use crate::process::{ProcessHandle, ProcessRef};

struct TreeNode {
    process: Rc<dyn ChildProcess>,
    /// `None` for the root; `Some((owner, owner_index))` for a
    /// Sub-Process Primitive's child, naming who to relay transitions
    /// to and at which of the owner's statement indices.
    parent: Option<(Rc<dyn ChildProcess>, usize)>,
    was_up: bool,
}

/// Owns every process spawned transitively from a single root and
/// drives them one full tick at a time.
pub struct ProcessTree {
    root: ProcessHandle,
    entries: Vec<TreeNode>,
}

impl ProcessTree {
    pub fn new(root: ProcessHandle) -> Self {
        let node = Rc::new(ProcessRef(Rc::clone(&root))) as Rc<dyn ChildProcess>;
        Self {
            root,
            entries: vec![TreeNode {
                process: node,
                parent: None,
                was_up: false,
            }],
        }
    }

    pub fn root(&self) -> &ProcessHandle {
        &self.root
    }

    pub fn is_root_terminated(&self) -> bool {
        self.root.borrow().is_terminated()
    }

    pub fn terminate_root(&mut self) {
        self.root.borrow_mut().terminate();
    }

    /// Earliest instant at which [`Self::pump`] could make progress.
    /// A node's own timer covers retries and deferred child-event
    /// relays, but not the case where a statement just attached a child
    /// this turn: that child sits in `pending_children` with no timer
    /// of its own until a `pump` folds it into `self.entries` (§4.5).
    /// Any such outstanding attachment, or any node that hasn't yet
    /// reached a quiescent state (fully up or terminated) forces an
    /// immediate pump rather than parking on a node's own deadline.
    pub fn next_deadline(&self) -> Option<Instant> {
        let has_outstanding_work = self.entries.iter().any(|n| {
            n.process.has_pending_children()
                || (!n.process.is_fully_up() && !n.process.is_terminated() && n.process.next_deadline().is_none())
        });
        if has_outstanding_work {
            return Some(Instant::now());
        }
        self.entries.iter().filter_map(|n| n.process.next_deadline()).min()
    }

    /// One full tick (§5 "Suspension points"): pump every live node
    /// once, fold in any children attached during this pass, relay
    /// transitions to owners, then drop nodes whose process has
    /// terminated.
    pub fn pump(&mut self, now: Instant) {
        for node in &self.entries {
            node.process.pump(now);
        }

        let mut discovered = Vec::new();
        for node in &self.entries {
            for (owner_index, child) in node.process.take_pending_children() {
                discovered.push((Rc::clone(&node.process), owner_index, child));
            }
        }
        for (owner, owner_index, child) in discovered {
            self.entries.push(TreeNode {
                process: child,
                parent: Some((owner, owner_index)),
                was_up: false,
            });
        }

        let mut transitions: Vec<(Rc<dyn ChildProcess>, usize, DeferredAction)> = Vec::new();
        for node in self.entries.iter_mut() {
            let Some((owner, owner_index)) = &node.parent else {
                continue;
            };
            let now_up = node.process.is_fully_up();
            let now_dead = node.process.is_terminated();
            if now_up && !node.was_up {
                node.was_up = true;
                transitions.push((Rc::clone(owner), *owner_index, DeferredAction::Up));
            } else if !now_up && node.was_up {
                node.was_up = false;
                // §4.5 "Continue": pause the child the instant it drops
                // out of fully-up, so it cannot race ahead and retry
                // while the owner is still unwinding everything that
                // depended on it. `call`'s `clean()` lifts this once its
                // own regress has settled.
                node.process.set_paused(true);
                transitions.push((Rc::clone(owner), *owner_index, DeferredAction::Down));
            }
            if now_dead {
                transitions.push((Rc::clone(owner), *owner_index, DeferredAction::Dead { error: false }));
            }
        }
        for (owner, owner_index, action) in transitions {
            owner.deliver_child_event(owner_index, action, now);
        }

        self.entries.retain(|n| n.parent.is_none() || !n.process.is_terminated());
    }
}
