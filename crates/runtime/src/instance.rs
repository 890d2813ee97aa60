//! The Statement Instance (§3, §4.3): mutable runtime state of one
//! statement in a running process.

use std::rc::Rc;
use std::time::Duration;

use ncd_registry::{
    Backend, ChildProcess, DeferredAction, Host, InitOutcome, Module, ModuleState, ObjectHandle, OwningProcess,
    Registry,
};
use ncd_value::Value;

use crate::context::ProcessContext;
use crate::error::{RuntimeError, RuntimeResult};
use crate::state::StatementState;

/// One statement in a running process (§3 "Statement Instance").
pub struct StatementInstance {
    index: usize,
    module: Rc<dyn Module>,
    state: StatementState,
    /// Sticky; only meaningful when `died_due_to_request` is false
    /// (§4.3 "the error flag is only read when die() was not requested").
    error: bool,
    died_due_to_request: bool,
    module_state: Option<ModuleState>,
}

/// Adapts a live `StatementInstance` + its owning `ProcessContext` into
/// the `Backend` a module callback sees (§4.3 "instance-handle").
struct StatementBackend<'a> {
    instance: &'a mut StatementInstance,
    ctx: &'a mut dyn ProcessContext,
}

impl<'a> Backend for StatementBackend<'a> {
    fn index(&self) -> usize {
        self.instance.index
    }

    fn backend_up(&mut self) {
        if !matches!(
            self.instance.state,
            StatementState::DownClean | StatementState::DownUnclean
        ) {
            tracing::warn!(
                index = self.instance.index,
                state = ?self.instance.state,
                "backend_up ignored: illegal source state"
            );
            return;
        }
        self.instance.state = StatementState::Up;
        self.ctx.notify_up(self.instance.index);
    }

    fn backend_down(&mut self) {
        if self.instance.state != StatementState::Up {
            tracing::warn!(
                index = self.instance.index,
                state = ?self.instance.state,
                "backend_down ignored: illegal source state"
            );
            return;
        }
        self.instance.state = StatementState::DownUnclean;
        self.ctx.notify_down(self.instance.index);
    }

    fn backend_dead(&mut self) {
        if self.instance.state == StatementState::Dead {
            return;
        }
        self.instance.state = StatementState::Dead;
        self.instance.module_state = None;
        let requested = self.instance.died_due_to_request;
        self.ctx
            .notify_dead(self.instance.index, self.instance.error, requested);
    }

    fn backend_set_error(&mut self) {
        self.instance.error = true;
    }

    fn backend_get_obj(&self, name: &str) -> Option<Rc<dyn ObjectHandle>> {
        self.ctx.resolve_object(self.instance.index, name)
    }

    fn backend_interp_exit(&mut self, code: i32) {
        self.ctx.interp_exit(code);
    }

    fn backend_interp_get_args(&self) -> Value {
        self.ctx.interp_get_args()
    }

    fn backend_interp_get_retry_time(&self) -> Duration {
        self.ctx.interp_get_retry_time()
    }

    fn defer(&mut self, delay: Duration, action: DeferredAction) {
        self.ctx.defer(self.instance.index, delay, action);
    }

    fn owning_process(&self) -> Rc<dyn OwningProcess> {
        self.ctx.owning_process()
    }

    fn host(&self) -> Rc<dyn Host> {
        self.ctx.host()
    }

    fn registry(&self) -> Rc<Registry> {
        self.ctx.registry()
    }

    fn attach_child(&mut self, child: Rc<dyn ChildProcess>) {
        self.ctx.attach_child(self.instance.index, child);
    }
}

impl StatementInstance {
    /// Constructs and initializes a new instance at `index` (§4.3
    /// `init`). `method_object` is the method object's exported
    /// interface when this statement has a `method_base` (§4.2).
    ///
    /// By convention `init` communicates its outcome through its return
    /// value, not through `ctx.backend_up`/`backend_dead` — those two
    /// calls are reserved for transitions that happen strictly after
    /// construction (via `die`, `clean`, or a fired deferred action).
    /// The adapter still exposes them so a non-conforming module fails
    /// safe (a warning, not a panic) rather than corrupting state.
    pub fn init(
        index: usize,
        module: Rc<dyn Module>,
        args: Value,
        method_object: Option<&dyn ObjectHandle>,
        ctx: &mut dyn ProcessContext,
    ) -> StatementInstance {
        let mut instance = StatementInstance {
            index,
            module: Rc::clone(&module),
            state: StatementState::DownClean,
            error: false,
            died_due_to_request: false,
            module_state: None,
        };

        let outcome = {
            let mut backend = StatementBackend {
                instance: &mut instance,
                ctx: &mut *ctx,
            };
            module.init(&mut backend, args, method_object)
        };

        match outcome {
            InitOutcome::Up(state) => {
                instance.module_state = Some(state);
                instance.state = StatementState::Up;
                ctx.notify_up(index);
            }
            InitOutcome::DownClean(state) => {
                instance.module_state = Some(state);
                instance.state = StatementState::DownClean;
            }
            InitOutcome::Dead { error } => {
                instance.state = StatementState::Dead;
                instance.error = error;
                ctx.notify_dead(index, error, false);
            }
        }

        instance
    }

    /// §4.3 `die()`: legal only in UP/DOWN_CLEAN/DOWN_UNCLEAN.
    pub fn die(&mut self, ctx: &mut dyn ProcessContext) -> RuntimeResult<()> {
        if !matches!(
            self.state,
            StatementState::Up | StatementState::DownClean | StatementState::DownUnclean
        ) {
            return Err(RuntimeError::DieFromIllegalState { state: self.state });
        }
        self.state = StatementState::Dying;
        self.died_due_to_request = true;

        let module = Rc::clone(&self.module);
        let mut module_state = self.module_state.take();
        {
            let mut backend = StatementBackend { instance: self, ctx };
            if let Some(state) = module_state.as_mut() {
                module.die(state, &mut backend);
            } else {
                backend.backend_dead();
            }
        }
        if self.state != StatementState::Dead {
            self.module_state = module_state;
        }
        Ok(())
    }

    /// §4.3 `clean()`.
    pub fn clean(&mut self, ctx: &mut dyn ProcessContext) -> RuntimeResult<()> {
        match self.state {
            StatementState::DownClean => Ok(()),
            StatementState::DownUnclean => {
                self.state = StatementState::DownClean;
                self.invoke_clean(ctx);
                Ok(())
            }
            other => Err(RuntimeError::CleanFromIllegalState { state: other }),
        }
    }

    fn invoke_clean(&mut self, ctx: &mut dyn ProcessContext) {
        let module = Rc::clone(&self.module);
        let mut module_state = self.module_state.take();
        if let Some(state) = module_state.as_mut() {
            let mut backend = StatementBackend { instance: self, ctx };
            module.clean(state, &mut backend);
        }
        self.module_state = module_state;
    }

    /// Delivers a fired [`DeferredAction`] (§5, §9 "module timers").
    pub fn apply_deferred(&mut self, action: DeferredAction, ctx: &mut dyn ProcessContext) {
        let mut backend = StatementBackend { instance: self, ctx };
        match action {
            DeferredAction::Up => backend.backend_up(),
            DeferredAction::Down => backend.backend_down(),
            DeferredAction::Dead { error } => {
                if error {
                    backend.backend_set_error();
                }
                backend.backend_dead();
            }
        }
    }

    fn resolution_allowed(&self) -> bool {
        match self.state {
            StatementState::Up => true,
            StatementState::DownClean | StatementState::DownUnclean => {
                self.module.can_resolve_when_down()
            }
            StatementState::Dying | StatementState::Dead => false,
        }
    }

    pub fn get_var(&self, name: &str) -> Option<Value> {
        if !self.resolution_allowed() {
            return None;
        }
        self.module.get_var(self.module_state.as_ref()?, name)
    }

    pub fn get_obj(&self, name: &str) -> Option<Rc<dyn ObjectHandle>> {
        if !self.resolution_allowed() {
            return None;
        }
        self.module.get_obj(self.module_state.as_ref()?, name)
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn state(&self) -> StatementState {
        self.state
    }

    pub fn has_error(&self) -> bool {
        self.error
    }

    pub fn died_due_to_request(&self) -> bool {
        self.died_due_to_request
    }

    pub fn base_type(&self) -> &str {
        self.module.base_type()
    }
}

impl std::fmt::Debug for StatementInstance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StatementInstance")
            .field("index", &self.index)
            .field("state", &self.state)
            .field("error", &self.error)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ncd_value::Arena;
    use std::cell::RefCell;

    #[derive(Default)]
    struct RecordingContext {
        ups: Vec<usize>,
        downs: Vec<usize>,
        deads: Vec<(usize, bool, bool)>,
        deferred: RefCell<Vec<(usize, Duration, DeferredAction)>>,
    }

    impl ProcessContext for RecordingContext {
        fn notify_up(&mut self, index: usize) {
            self.ups.push(index);
        }
        fn notify_down(&mut self, index: usize) {
            self.downs.push(index);
        }
        fn notify_dead(&mut self, index: usize, error: bool, requested: bool) {
            self.deads.push((index, error, requested));
        }
        fn resolve_object(&self, _requester_index: usize, _name: &str) -> Option<Rc<dyn ObjectHandle>> {
            None
        }
        fn interp_exit(&mut self, _code: i32) {}
        fn interp_get_args(&self) -> Value {
            Value::build_list(&Arena::unbounded()).unwrap()
        }
        fn interp_get_retry_time(&self) -> Duration {
            Duration::from_millis(100)
        }
        fn defer(&mut self, index: usize, delay: Duration, action: DeferredAction) {
            self.deferred.borrow_mut().push((index, delay, action));
        }
        fn owning_process(&self) -> Rc<dyn OwningProcess> {
            struct NoOwner;
            impl OwningProcess for NoOwner {
                fn resolve(&self, _requester_index: usize, _path: &str) -> Option<Rc<dyn ObjectHandle>> {
                    None
                }
            }
            Rc::new(NoOwner)
        }
        fn host(&self) -> Rc<dyn Host> {
            Rc::new(ncd_registry::StaticHost::new(
                Value::build_list(&Arena::unbounded()).unwrap(),
                Duration::from_millis(100),
            ))
        }
        fn registry(&self) -> Rc<Registry> {
            Rc::new(Registry::new())
        }
        fn attach_child(&mut self, _index: usize, _child: Rc<dyn ChildProcess>) {}
    }

    struct StubUp;
    impl Module for StubUp {
        fn base_type(&self) -> &str {
            "stub_up"
        }
        fn init(
            &self,
            _ctx: &mut dyn Backend,
            _args: Value,
            _method_object: Option<&dyn ObjectHandle>,
        ) -> InitOutcome {
            InitOutcome::Up(Box::new(()))
        }
    }

    struct FailOnce;
    impl Module for FailOnce {
        fn base_type(&self) -> &str {
            "fail_once"
        }
        fn init(
            &self,
            _ctx: &mut dyn Backend,
            _args: Value,
            _method_object: Option<&dyn ObjectHandle>,
        ) -> InitOutcome {
            InitOutcome::Dead { error: true }
        }
    }

    fn args(arena: &Arena) -> Value {
        Value::build_list(arena).unwrap()
    }

    #[test]
    fn init_up_module_lands_up_and_notifies() {
        let arena = Arena::unbounded();
        let mut ctx = RecordingContext::default();
        let instance = StatementInstance::init(0, Rc::new(StubUp), args(&arena), None, &mut ctx);
        assert_eq!(instance.state(), StatementState::Up);
        assert_eq!(ctx.ups, vec![0]);
    }

    #[test]
    fn init_failure_lands_dead_with_error() {
        let arena = Arena::unbounded();
        let mut ctx = RecordingContext::default();
        let instance = StatementInstance::init(0, Rc::new(FailOnce), args(&arena), None, &mut ctx);
        assert_eq!(instance.state(), StatementState::Dead);
        assert!(instance.has_error());
        assert_eq!(ctx.deads, vec![(0, true, false)]);
    }

    #[test]
    fn die_from_up_transitions_to_dead_and_is_flagged_requested() {
        let arena = Arena::unbounded();
        let mut ctx = RecordingContext::default();
        let mut instance = StatementInstance::init(0, Rc::new(StubUp), args(&arena), None, &mut ctx);
        instance.die(&mut ctx).unwrap();
        assert_eq!(instance.state(), StatementState::Dead);
        assert!(instance.died_due_to_request());
        assert_eq!(ctx.deads, vec![(0, false, true)]);
    }

    #[test]
    fn die_from_dead_is_rejected() {
        let arena = Arena::unbounded();
        let mut ctx = RecordingContext::default();
        let mut instance = StatementInstance::init(0, Rc::new(FailOnce), args(&arena), None, &mut ctx);
        assert!(instance.die(&mut ctx).is_err());
    }

    #[test]
    fn clean_from_down_unclean_returns_to_down_clean() {
        let arena = Arena::unbounded();
        let mut ctx = RecordingContext::default();
        let mut instance = StatementInstance::init(0, Rc::new(StubUp), args(&arena), None, &mut ctx);
        instance.apply_deferred(DeferredAction::Down, &mut ctx);
        assert_eq!(instance.state(), StatementState::DownUnclean);
        instance.clean(&mut ctx).unwrap();
        assert_eq!(instance.state(), StatementState::DownClean);
    }

    #[test]
    fn resolution_denied_while_down_unless_module_opts_in() {
        let arena = Arena::unbounded();
        let mut ctx = RecordingContext::default();
        let mut instance = StatementInstance::init(0, Rc::new(StubUp), args(&arena), None, &mut ctx);
        instance.apply_deferred(DeferredAction::Down, &mut ctx);
        assert!(instance.get_var("").is_none());
    }
}
