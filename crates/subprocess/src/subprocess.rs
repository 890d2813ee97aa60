//! `SubProcess`: the reusable wiring behind any module that composes a
//! nested [`ProcessInstance`] from a named template (§4.5). A module
//! like `call` holds one of these in its module state; it owns the
//! child for as long as the statement that spawned it is alive.

use std::collections::HashMap;
use std::rc::Rc;

use ncd_registry::{Backend, ChildProcess, ObjectHandle};
use ncd_scheduler::{ProcessInstance, ProcessRef};
use ncd_value::{Arena, Value};

use crate::error::SubprocessResult;
use crate::special_objects::standard_specials;
use crate::template::TemplateMap;

/// A running child process spawned from a template, plus the bookkeeping
/// needed to relay its lifecycle back to the statement that owns it and
/// to implement the DOWN → `Continue` handshake (§4.5).
pub struct SubProcess {
    child: ProcessRef,
}

impl SubProcess {
    /// Looks up `template_name` in `templates`, spawns it as a child of
    /// the calling statement, and registers it with the owner so the
    /// scheduler relays its UP/DOWN/TERMINATED transitions as deferred
    /// backend actions on the calling statement (§4.5).
    ///
    /// `arena` backs the child's own value graph; per §4.5 a template
    /// invocation gets a fresh arena scoped to the child's lifetime.
    pub fn spawn(
        ctx: &mut dyn Backend,
        templates: &TemplateMap,
        template_name: &str,
        arena: Arena,
        args: Value,
    ) -> SubprocessResult<Self> {
        let descriptor = templates.lookup(template_name).map_err(|e| {
            tracing::warn!(template_name, error = %e, "sub-process: template lookup failed");
            e
        })?;
        let owner = ctx.owning_process();
        let owner_index = ctx.index();
        let specials: HashMap<String, Rc<dyn ObjectHandle>> =
            standard_specials(Rc::downgrade(&owner), owner_index, &args);

        // `spawn_inert`, not `spawn`: this call runs from inside the
        // owning statement's own `init`, which already holds the
        // owner's `RefCell` borrowed. Driving the child synchronously
        // here would re-enter that borrow the moment one of its
        // statements resolves `_caller`. The process tree performs the
        // child's first real `pump` once `init` has returned.
        let child = ProcessInstance::spawn_inert(descriptor, ctx.registry(), ctx.host(), arena, specials);
        let child = ProcessRef(child);
        tracing::debug!(template_name, owner_index, "sub-process: spawned inert, attaching to owner");
        ctx.attach_child(Rc::new(child.clone()) as Rc<dyn ChildProcess>);
        Ok(Self { child })
    }

    /// True once every statement in the child template is UP (§4.5
    /// "the owner's `init` is expected to stay DOWN_CLEAN until the
    /// child process is fully up").
    pub fn is_up(&self) -> bool {
        self.child.is_fully_up()
    }

    pub fn is_terminated(&self) -> bool {
        self.child.is_terminated()
    }

    /// §4.5 "Continue": releases the child to re-advance after the
    /// owner observed its `DOWN` and settled its own regress.
    pub fn resume(&self) {
        tracing::debug!("sub-process: owner settled, resuming paused child");
        self.child.set_paused(false);
    }

    /// §4.5 "Terminate": tears the child down, e.g. when the owning
    /// `call` statement itself dies.
    pub fn terminate(&self) {
        tracing::debug!("sub-process: relaying terminate to child");
        self.child.terminate();
    }
}
