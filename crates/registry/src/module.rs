//! A Module declares, for a statement kind, its capabilities and
//! operation table (§4.2).

use std::any::Any;
use std::rc::Rc;

use ncd_value::Value;

use crate::backend::Backend;
use crate::object::ObjectHandle;

/// Type-erased per-instance module state, the idiomatic Rust stand-in
/// for the "fixed-size scratch region" of §3 — ownership of the state
/// lives with the Statement Instance, which is the only caller allowed
/// to hand it back to the module's operations.
pub type ModuleState = Box<dyn Any>;

/// The outcome of `init`: it must resolve to an UP, a not-yet-up but
/// live DOWN_CLEAN, or an immediate construction failure (§4.2, §4.3).
pub enum InitOutcome {
    /// Synchronous `backend-up`; lands the instance in UP immediately.
    Up(ModuleState),
    /// The instance is constructed and live but not yet UP; the module
    /// is expected to call `backend_up` later (directly, or via a
    /// [`crate::backend::DeferredAction::Up`] it registered during this
    /// call).
    DownClean(ModuleState),
    /// Synchronous `backend-error-dead`: a construction failure.
    Dead { error: bool },
}

/// The operation table and capability flags for one statement kind
/// (§4.2). All operations but `init` are optional; a module that omits
/// `die` is torn down synchronously by the runtime the instant it's
/// asked to die.
pub trait Module {
    /// The kind's name as seen by method dispatch (e.g. both `value` and
    /// `value::get` have base `value`).
    fn base_type(&self) -> &str;

    /// If set, instances of this kind are created by invoking the
    /// module on an instance of `method_base` — the "method object".
    fn method_base(&self) -> Option<&str> {
        None
    }

    /// If true, `get_var`/`get_obj` may be called while the statement is
    /// DOWN_CLEAN or DOWN_UNCLEAN; otherwise only while UP. Never true
    /// during DYING regardless of this flag (§9 Open Question).
    fn can_resolve_when_down(&self) -> bool {
        false
    }

    /// Required. Must drive the instance to UP or to a construction
    /// failure, synchronously or via a deferred action (§4.2).
    fn init(
        &self,
        ctx: &mut dyn Backend,
        args: Value,
        method_object: Option<&dyn ObjectHandle>,
    ) -> InitOutcome;

    /// Initiates destruction. The default is synchronous: the runtime
    /// treats an omitted `die` as "goes DEAD immediately" (§4.2 "If
    /// absent, destruction is synchronous").
    fn die(&self, _state: &mut ModuleState, ctx: &mut dyn Backend) {
        ctx.backend_dead();
    }

    /// Invoked when the scheduler observes the statement is fully clean
    /// (§4.2, used by `clean()` in §4.3).
    fn clean(&self, _state: &mut ModuleState, _ctx: &mut dyn Backend) {}

    fn get_var(&self, _state: &ModuleState, _name: &str) -> Option<Value> {
        None
    }

    fn get_obj(&self, _state: &ModuleState, _name: &str) -> Option<Rc<dyn ObjectHandle>> {
        None
    }
}
