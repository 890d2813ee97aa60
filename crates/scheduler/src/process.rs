//! The Process Scheduler (§4.4): drives a block of Statement Instances
//! through the AP/FP discipline, handling advance, regress, retry and
//! termination.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::{Rc, Weak};
use std::time::Instant;

use ncd_registry::{ChildProcess, DeferredAction, ObjectHandle, OwningProcess, Registry};
use ncd_runtime::{ProcessContext, StatementInstance, StatementState};
use ncd_value::{Arena, Value};

use crate::descriptor::ProcessDescriptor;
use crate::host::Host;

/// Shared handle to a running process. Every [`ProcessInstance`] lives
/// behind one of these: statements hand out weak references to it when
/// exporting objects (§9 "child holds back-reference as an index + weak
/// handle"), and the sub-process primitive keeps a strong reference to
/// a child alongside the owning statement's index.
pub type ProcessHandle = Rc<RefCell<ProcessInstance>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SchedulerState {
    Running,
    Terminating,
    Terminated,
}

enum TeardownCompletion {
    /// A regress (§4.4): the statement at this index stays, now
    /// DOWN_UNCLEAN, and gets `clean()`-ed once everything above it is
    /// gone.
    ResumeAt(usize),
    /// A failure (§4.4 "Failure semantics"): the statement at this
    /// index is already gone; retry its construction once everything
    /// above it is gone.
    RetryAt(usize),
    /// External termination (§4.4 "Termination").
    Terminate,
}

struct Teardown {
    /// `step_teardown` destroys statements while `AP > floor`.
    floor: usize,
    completion: TeardownCompletion,
}

/// Wraps a [`ProcessHandle`] to present it as the two generic, acyclic
/// traits `ncd-registry` exposes for sub-process composition (§4.5):
/// [`ChildProcess`] (how the process tree drives any node, root or
/// nested) and [`OwningProcess`] (how one of its own statements reaches
/// back into it to resolve `_caller`). The same process plays both
/// roles depending on which side of a `call` relationship it sits on.
#[derive(Clone)]
pub struct ProcessRef(pub ProcessHandle);

impl ChildProcess for ProcessRef {
    fn pump(&self, now: Instant) {
        self.0.borrow_mut().pump(now);
    }
    fn next_deadline(&self) -> Option<Instant> {
        self.0.borrow().next_deadline()
    }
    fn is_fully_up(&self) -> bool {
        self.0.borrow().is_fully_up()
    }
    fn is_terminated(&self) -> bool {
        self.0.borrow().is_terminated()
    }
    fn set_paused(&self, paused: bool) {
        self.0.borrow_mut().set_paused(paused);
    }
    fn terminate(&self) {
        self.0.borrow_mut().terminate();
    }
    fn take_pending_children(&self) -> Vec<(usize, Rc<dyn ChildProcess>)> {
        self.0.borrow_mut().take_pending_children()
    }
    fn has_pending_children(&self) -> bool {
        !self.0.borrow().pending_children.is_empty()
    }
    fn deliver_child_event(&self, owner_index: usize, action: DeferredAction, now: Instant) {
        self.0.borrow_mut().deliver_child_event(owner_index, action, now);
    }
}

impl OwningProcess for ProcessRef {
    fn resolve(&self, requester_index: usize, path: &str) -> Option<Rc<dyn ObjectHandle>> {
        self.0.borrow().resolve_path(requester_index, path)
    }
}

/// Weak back-reference an exported object uses to reach the statement
/// that owns it (§9).
struct StatementObject {
    process: Weak<RefCell<ProcessInstance>>,
    index: usize,
}

impl ObjectHandle for StatementObject {
    fn get_var(&self, name: &str) -> Option<Value> {
        let process = self.process.upgrade()?;
        let process = process.borrow();
        process.statements.get(self.index)?.as_ref()?.get_var(name)
    }

    fn get_obj(&self, name: &str) -> Option<Rc<dyn ObjectHandle>> {
        let process = self.process.upgrade()?;
        let process = process.borrow();
        process.statements.get(self.index)?.as_ref()?.get_obj(name)
    }

    fn base_type(&self) -> Option<String> {
        let process = self.process.upgrade()?;
        let process = process.borrow();
        Some(process.statements.get(self.index)?.as_ref()?.base_type().to_string())
    }
}

/// Mutable state of one live block of statements (§3 "Process Instance").
pub struct ProcessInstance {
    descriptor: Rc<ProcessDescriptor>,
    registry: Rc<Registry>,
    host: Rc<dyn Host>,
    arena: Arena,
    statements: Vec<Option<StatementInstance>>,
    ap: usize,
    fp: usize,
    state: SchedulerState,
    /// Set by the owning statement's sub-process wiring to implement
    /// the DOWN → `Continue` handshake (§4.5): while paused, `drive()`
    /// still tears down but never advances.
    paused: bool,
    teardown: Option<Teardown>,
    deferred: Vec<(Instant, usize, DeferredAction)>,
    retry: Option<(Instant, usize)>,
    name_index: HashMap<String, usize>,
    specials: HashMap<String, Rc<dyn ObjectHandle>>,
    /// Child processes a statement attached during its last turn but
    /// the process tree (§4.5, §9) hasn't yet picked up as a node of
    /// its own. Draining this, rather than driving children recursively
    /// from inside this process's own borrow, is what keeps `_caller`
    /// resolution from re-entering this same `RefCell`.
    pending_children: Vec<(usize, Rc<dyn ChildProcess>)>,
    self_handle: Weak<RefCell<ProcessInstance>>,
}

impl ProcessInstance {
    /// Constructs and starts a process (§4.4). `specials` supplies any
    /// sub-process special objects (`_caller`, `_args`, ...) that must
    /// be visible from the first advance onward (§4.5).
    pub fn spawn(
        descriptor: Rc<ProcessDescriptor>,
        registry: Rc<Registry>,
        host: Rc<dyn Host>,
        arena: Arena,
        specials: HashMap<String, Rc<dyn ObjectHandle>>,
    ) -> ProcessHandle {
        let handle = Self::new_inert(descriptor, registry, host, arena, specials);
        handle.borrow_mut().drive();
        handle
    }

    /// Like [`Self::spawn`], but does not drive the process yet. Used
    /// for a Sub-Process Primitive's child (§4.5): that child is always
    /// constructed from inside the owning statement's `init`, which
    /// already holds the owner's `RefCell` borrowed; driving the child
    /// synchronously there could re-enter that same borrow the moment
    /// one of the child's statements resolves `_caller`. The process
    /// tree performs the child's first real `pump` on its next pass,
    /// once the owner's `init` call has returned and released its
    /// borrow.
    pub fn spawn_inert(
        descriptor: Rc<ProcessDescriptor>,
        registry: Rc<Registry>,
        host: Rc<dyn Host>,
        arena: Arena,
        specials: HashMap<String, Rc<dyn ObjectHandle>>,
    ) -> ProcessHandle {
        Self::new_inert(descriptor, registry, host, arena, specials)
    }

    fn new_inert(
        descriptor: Rc<ProcessDescriptor>,
        registry: Rc<Registry>,
        host: Rc<dyn Host>,
        arena: Arena,
        specials: HashMap<String, Rc<dyn ObjectHandle>>,
    ) -> ProcessHandle {
        let n = descriptor.len();
        let mut name_index = HashMap::new();
        for (i, sd) in descriptor.statements.iter().enumerate() {
            if let Some(name) = &sd.local_name {
                name_index.insert(name.clone(), i);
            }
        }
        Rc::new_cyclic(|weak| {
            RefCell::new(ProcessInstance {
                descriptor,
                registry,
                host,
                arena,
                statements: (0..n).map(|_| None).collect(),
                ap: 0,
                fp: 0,
                state: SchedulerState::Running,
                paused: false,
                teardown: None,
                deferred: Vec::new(),
                retry: None,
                name_index,
                specials,
                pending_children: Vec::new(),
                self_handle: weak.clone(),
            })
        })
    }

    pub fn len(&self) -> usize {
        self.descriptor.len()
    }

    /// All statements UP (§3 invariant 1 with `FP == N`).
    pub fn is_fully_up(&self) -> bool {
        self.fp == self.descriptor.len()
    }

    pub fn is_terminated(&self) -> bool {
        self.state == SchedulerState::Terminated
    }

    pub fn advance_cursor(&self) -> usize {
        self.ap
    }

    pub fn fixed_pointer(&self) -> usize {
        self.fp
    }

    pub fn statement_state(&self, index: usize) -> Option<StatementState> {
        self.statements.get(index)?.as_ref().map(|s| s.state())
    }

    /// External termination request (§4.4 "Termination").
    pub fn terminate(&mut self) {
        self.retry = None;
        self.paused = false;
        self.state = SchedulerState::Terminating;
        self.drive();
    }

    /// Releases a pause installed after a sub-process `DOWN` event,
    /// letting the process re-advance (§4.5 "Continue").
    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
        if !paused {
            self.drive();
        }
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Registers `child` as driven by this process's statement at
    /// `owner_index` (§4.5). A plain mutation of this process's own
    /// field — never a fresh borrow of it — so it is always safe to
    /// call from within a statement's own `init`.
    pub fn attach_child(&mut self, owner_index: usize, child: Rc<dyn ChildProcess>) {
        self.pending_children.push((owner_index, child));
    }

    /// Drains the child processes attached since the last call, for the
    /// process tree to add as nodes of its own (§4.5).
    pub fn take_pending_children(&mut self) -> Vec<(usize, Rc<dyn ChildProcess>)> {
        std::mem::take(&mut self.pending_children)
    }

    /// Delivers a relayed UP/DOWN/TERMINATED transition from a child
    /// process to the statement at `owner_index`, as an ordinary
    /// deferred backend action (§4.5, §9 "module timers").
    pub fn deliver_child_event(&mut self, owner_index: usize, action: DeferredAction, now: Instant) {
        self.deferred.push((now, owner_index, action));
    }

    /// Fires any due per-statement deferred actions and the retry
    /// timer, then drives the state machine forward. The host's process
    /// tree calls this whenever [`Self::next_deadline`] elapses (§5
    /// "Suspension points"); nested children are driven by the tree as
    /// independent nodes, never recursively from here (§9).
    pub fn pump(&mut self, now: Instant) {
        self.fire_deferred(now);
        self.fire_retry(now);
        self.drive();
    }

    /// Earliest instant at which calling [`Self::pump`] could make
    /// progress.
    pub fn next_deadline(&self) -> Option<Instant> {
        let mut best = self.deferred.iter().map(|(t, _, _)| *t).min();
        if let Some((at, _)) = self.retry {
            best = Some(best.map_or(at, |b| b.min(at)));
        }
        best
    }

    fn fire_deferred(&mut self, now: Instant) {
        let mut i = 0;
        while i < self.deferred.len() {
            if self.deferred[i].0 <= now {
                let (_, index, action) = self.deferred.remove(i);
                if let Some(mut inst) = self.statements[index].take() {
                    inst.apply_deferred(action, self);
                    if !inst.state().is_dead() {
                        self.statements[index] = Some(inst);
                    }
                }
            } else {
                i += 1;
            }
        }
    }

    fn fire_retry(&mut self, now: Instant) {
        if let Some((at, _)) = self.retry {
            if at <= now {
                self.retry = None;
            }
        }
    }

    /// Resolves a (possibly dotted) name against the namespace visible
    /// to `requester_index` (§4.4 "Namespace and variable resolution").
    /// The head names a local statement or a special object; every
    /// remaining segment is a sub-object hop (§3 invariant 4: a
    /// statement-named head is only visible if its index is strictly
    /// less than `requester_index`; special objects bypass that check).
    pub fn resolve_path(&self, requester_index: usize, path: &str) -> Option<Rc<dyn ObjectHandle>> {
        let mut segments = path.split('.');
        let head = segments.next()?;
        let mut current: Rc<dyn ObjectHandle> = if let Some(special) = self.specials.get(head) {
            Rc::clone(special)
        } else {
            let idx = *self.name_index.get(head)?;
            if idx >= requester_index {
                return None;
            }
            Rc::new(StatementObject {
                process: self.self_handle.clone(),
                index: idx,
            })
        };
        for segment in segments {
            current = current.get_obj(segment)?;
        }
        Some(current)
    }

    /// Drives the state machine forward until no further progress is
    /// possible without an external event (a timer firing, a module
    /// calling a backend command from outside this call stack).
    fn drive(&mut self) {
        loop {
            if self.teardown.is_some() {
                if self.step_teardown() {
                    continue;
                }
                break;
            }
            match self.state {
                SchedulerState::Terminating => {
                    if self.ap == 0 {
                        self.state = SchedulerState::Terminated;
                        break;
                    }
                    self.teardown = Some(Teardown {
                        floor: 0,
                        completion: TeardownCompletion::Terminate,
                    });
                    continue;
                }
                SchedulerState::Terminated => break,
                SchedulerState::Running => {
                    if self.paused {
                        break;
                    }
                    if self.retry.is_none() && self.fp == self.ap && self.ap < self.descriptor.len() {
                        if self.try_advance() {
                            continue;
                        }
                    }
                    break;
                }
            }
        }
    }

    /// §4.4 "Advance": allocate the statement at `AP`, drive its
    /// module's `init`, and update `AP`/`FP` accordingly. Returns
    /// `true` if `drive()` should keep looping; a retry arms
    /// `self.retry` instead and returns `false`, since the retry timer
    /// (not this call returning) is what re-enables advance (§4.4,
    /// §7 retry semantics).
    fn try_advance(&mut self) -> bool {
        let index = self.ap;
        let module_type = self.descriptor.statements[index].module_type.clone();
        let object_path = self.descriptor.statements[index].object_path.clone();

        let args = match self.descriptor.statements[index].args.materialize(&self.arena, &[]) {
            Ok(v) => v,
            Err(e) => {
                tracing::warn!(index, error = %e, "argument materialization failed");
                self.start_retry(index);
                return false;
            }
        };

        let method_object = match &object_path {
            Some(path) => match self.resolve_path(index, path) {
                Some(obj) => Some(obj),
                None => {
                    tracing::warn!(index, path, "method object path did not resolve");
                    self.start_retry(index);
                    return false;
                }
            },
            None => None,
        };

        // §4.2 "secondary index for method resolution": a statement
        // invoked on an object path must have its module's declared
        // `method_base` match that object's own `base_type`.
        let module = match (&object_path, &method_object) {
            (Some(path), Some(obj)) => {
                let object_base = obj.base_type().unwrap_or_default();
                match self.registry.resolve_method(&module_type, &object_base) {
                    Ok(m) => m,
                    Err(e) => {
                        tracing::warn!(index, path, error = %e, "method resolution failed");
                        self.start_retry(index);
                        return false;
                    }
                }
            }
            _ => match self.registry.lookup(&module_type) {
                Ok(m) => m,
                Err(e) => {
                    tracing::warn!(index, error = %e, "module lookup failed");
                    self.start_retry(index);
                    return false;
                }
            },
        };

        let method_object_ref: Option<&dyn ObjectHandle> = method_object.as_deref();
        let instance = StatementInstance::init(index, module, args, method_object_ref, self);

        if instance.state().is_dead() {
            self.start_retry(index);
            return false;
        }

        self.statements[index] = Some(instance);
        self.ap += 1;
        true
    }

    fn start_retry(&mut self, index: usize) {
        let delay = self.host.retry_interval();
        self.retry = Some((Instant::now() + delay, index));
        tracing::warn!(index, ?delay, "statement construction failed, retrying");
    }

    /// §4.4 "Failure semantics": an unsolicited DEAD transition tears
    /// down everything above `index` and retries it.
    fn fail_statement(&mut self, index: usize) {
        self.fp = self.fp.min(index);
        if self.teardown.is_none() {
            self.teardown = Some(Teardown {
                floor: index,
                completion: TeardownCompletion::RetryAt(index),
            });
        }
    }

    /// §4.4 "Regress": a live statement below `FP` went DOWN.
    fn begin_regress(&mut self, index: usize) {
        self.fp = index;
        if self.teardown.is_none() {
            self.teardown = Some(Teardown {
                floor: index + 1,
                completion: TeardownCompletion::ResumeAt(index),
            });
        }
    }

    /// Tears down one statement (the one at `AP - 1`) at a time, top
    /// down, until `AP` reaches the active teardown's floor. Returns
    /// `true` if it made synchronous progress and `drive()` should loop
    /// again, `false` if it's waiting on an asynchronous `die()`.
    fn step_teardown(&mut self) -> bool {
        let floor = self.teardown.as_ref().unwrap().floor;
        if self.ap <= floor {
            self.finish_teardown();
            return true;
        }
        let idx = self.ap - 1;
        match self.statements[idx].take() {
            None => {
                self.ap -= 1;
                true
            }
            Some(mut inst) => {
                if inst.state().is_dead() {
                    self.ap -= 1;
                    true
                } else {
                    let _ = inst.die(self);
                    if inst.state().is_dead() {
                        self.ap -= 1;
                        true
                    } else {
                        self.statements[idx] = Some(inst);
                        false
                    }
                }
            }
        }
    }

    fn finish_teardown(&mut self) {
        let teardown = self.teardown.take().unwrap();
        match teardown.completion {
            TeardownCompletion::Terminate => {}
            TeardownCompletion::ResumeAt(idx) => {
                if let Some(mut inst) = self.statements[idx].take() {
                    let _ = inst.clean(self);
                    self.statements[idx] = Some(inst);
                }
            }
            TeardownCompletion::RetryAt(idx) => {
                self.start_retry(idx);
            }
        }
    }
}

impl ProcessContext for ProcessInstance {
    fn notify_up(&mut self, index: usize) {
        if index == self.fp {
            self.fp += 1;
        }
    }

    fn notify_down(&mut self, index: usize) {
        if index < self.fp {
            self.begin_regress(index);
        }
    }

    fn notify_dead(&mut self, index: usize, error: bool, requested: bool) {
        if requested {
            self.statements[index] = None;
            return;
        }
        if self.ap <= index {
            // Synchronous construction failure, signalled from inside
            // the `init()` call `try_advance` is still unwinding from;
            // `try_advance` schedules the retry once `init` returns.
            return;
        }
        self.statements[index] = None;
        let _ = error;
        self.fail_statement(index);
    }

    fn resolve_object(&self, requester_index: usize, name: &str) -> Option<Rc<dyn ObjectHandle>> {
        self.resolve_path(requester_index, name)
    }

    fn interp_exit(&mut self, code: i32) {
        self.host.exit(code);
    }

    fn interp_get_args(&self) -> Value {
        self.host.args()
    }

    fn interp_get_retry_time(&self) -> std::time::Duration {
        self.host.retry_interval()
    }

    fn defer(&mut self, index: usize, delay: std::time::Duration, action: DeferredAction) {
        self.deferred.push((Instant::now() + delay, index, action));
    }

    fn owning_process(&self) -> Rc<dyn OwningProcess> {
        Rc::new(ProcessRef(
            self.self_handle
                .upgrade()
                .expect("a live ProcessInstance always has a live self_handle"),
        ))
    }

    fn host(&self) -> Rc<dyn ncd_registry::Host> {
        Rc::clone(&self.host)
    }

    fn registry(&self) -> Rc<Registry> {
        Rc::clone(&self.registry)
    }

    fn attach_child(&mut self, owner_index: usize, child: Rc<dyn ChildProcess>) {
        ProcessInstance::attach_child(self, owner_index, child);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ncd_registry::{Backend, InitOutcome, Module, ModuleState};
    use ncd_value::ArgumentTemplate;
    use std::time::Duration;

    fn lit_args(arena: &Arena) -> ArgumentTemplate {
        ArgumentTemplate::literal(Value::build_list(arena).unwrap())
    }

    struct StubUp;
    impl Module for StubUp {
        fn base_type(&self) -> &str {
            "stub_up"
        }
        fn init(&self, _ctx: &mut dyn Backend, _args: Value, _mo: Option<&dyn ObjectHandle>) -> InitOutcome {
            InitOutcome::Up(Box::new(()))
        }
    }

    /// Fails synchronously the first time it is constructed, succeeds
    /// every time after (S2 "retry on failure").
    struct FailOnce {
        attempts: RefCell<u32>,
    }
    impl Module for FailOnce {
        fn base_type(&self) -> &str {
            "fail_once"
        }
        fn init(&self, _ctx: &mut dyn Backend, _args: Value, _mo: Option<&dyn ObjectHandle>) -> InitOutcome {
            let mut attempts = self.attempts.borrow_mut();
            *attempts += 1;
            if *attempts == 1 {
                InitOutcome::Dead { error: true }
            } else {
                InitOutcome::Up(Box::new(()))
            }
        }
    }

    /// Goes UP synchronously, then asynchronously toggles DOWN and
    /// back UP once each after the given delays (S3 "regress
    /// propagation").
    struct Toggle {
        down_after: Duration,
        up_after: Duration,
    }
    impl Module for Toggle {
        fn base_type(&self) -> &str {
            "toggle"
        }
        fn init(&self, ctx: &mut dyn Backend, _args: Value, _mo: Option<&dyn ObjectHandle>) -> InitOutcome {
            ctx.defer(self.down_after, DeferredAction::Down);
            InitOutcome::Up(Box::new(()))
        }
        fn clean(&self, _state: &mut ModuleState, ctx: &mut dyn Backend) {
            ctx.defer(self.up_after, DeferredAction::Up);
        }
    }

    fn registry_with(modules: Vec<(&str, Rc<dyn Module>)>) -> Rc<Registry> {
        let mut reg = Registry::new();
        for (name, module) in modules {
            reg.register(name, module);
        }
        Rc::new(reg)
    }

    fn host() -> Rc<dyn Host> {
        Rc::new(crate::host::StaticHost::new(
            Value::build_list(&Arena::unbounded()).unwrap(),
            Duration::from_millis(100),
        ))
    }

    #[test]
    fn s1_linear_advance_and_teardown() {
        let arena = Arena::unbounded();
        let registry = registry_with(vec![("stub_up", Rc::new(StubUp) as Rc<dyn Module>)]);
        let descriptor = Rc::new(ProcessDescriptor::process(vec![
            crate::descriptor::StatementDescriptor::new("stub_up", lit_args(&arena)).named("a"),
            crate::descriptor::StatementDescriptor::new("stub_up", lit_args(&arena)).named("b"),
        ]));
        let process = ProcessInstance::spawn(descriptor, registry, host(), arena, HashMap::new());
        assert!(process.borrow().is_fully_up());
        assert_eq!(process.borrow().fixed_pointer(), 2);

        process.borrow_mut().terminate();
        assert!(process.borrow().is_terminated());
    }

    #[test]
    fn s2_retry_on_failure_then_succeeds() {
        let arena = Arena::unbounded();
        let registry = registry_with(vec![(
            "fail_once",
            Rc::new(FailOnce {
                attempts: RefCell::new(0),
            }) as Rc<dyn Module>,
        )]);
        let descriptor = Rc::new(ProcessDescriptor::process(vec![crate::descriptor::StatementDescriptor::new(
            "fail_once",
            lit_args(&arena),
        )
        .named("x")]));
        let process = ProcessInstance::spawn(descriptor, registry, host(), arena, HashMap::new());
        assert!(!process.borrow().is_fully_up());
        assert_eq!(process.borrow().advance_cursor(), 0);

        let deadline = process.borrow().next_deadline().expect("retry timer armed");
        process.borrow_mut().pump(deadline);
        assert!(process.borrow().is_fully_up());
    }

    #[test]
    fn s6_termination_while_retrying_cancels_timer() {
        let arena = Arena::unbounded();
        let registry = registry_with(vec![(
            "fail_once",
            Rc::new(FailOnce {
                attempts: RefCell::new(0),
            }) as Rc<dyn Module>,
        )]);
        let descriptor = Rc::new(ProcessDescriptor::process(vec![crate::descriptor::StatementDescriptor::new(
            "fail_once",
            lit_args(&arena),
        )
        .named("x")]));
        let process = ProcessInstance::spawn(descriptor, registry, host(), arena, HashMap::new());
        assert!(process.borrow().next_deadline().is_some());

        process.borrow_mut().terminate();
        assert!(process.borrow().is_terminated());
        assert!(process.borrow().next_deadline().is_none());
    }

    #[test]
    fn s3_regress_propagation() {
        let arena = Arena::unbounded();
        let registry = registry_with(vec![
            (
                "toggle",
                Rc::new(Toggle {
                    down_after: Duration::from_millis(50),
                    up_after: Duration::from_millis(50),
                }) as Rc<dyn Module>,
            ),
            ("stub_up", Rc::new(StubUp) as Rc<dyn Module>),
        ]);
        let descriptor = Rc::new(ProcessDescriptor::process(vec![
            crate::descriptor::StatementDescriptor::new("toggle", lit_args(&arena)).named("a"),
            crate::descriptor::StatementDescriptor::new("stub_up", lit_args(&arena)).named("b"),
            crate::descriptor::StatementDescriptor::new("stub_up", lit_args(&arena)).named("c"),
        ]));
        let process = ProcessInstance::spawn(descriptor, registry, host(), arena, HashMap::new());
        assert!(process.borrow().is_fully_up());

        let t1 = process.borrow().next_deadline().unwrap();
        process.borrow_mut().pump(t1);
        // `a` went down; `b` and `c` are torn down and `a` is DOWN_UNCLEAN
        // pending `clean()`'s deferred re-up.
        assert_eq!(process.borrow().fixed_pointer(), 0);
        assert_eq!(process.borrow().advance_cursor(), 1);

        let t2 = process.borrow().next_deadline().unwrap();
        process.borrow_mut().pump(t2);
        assert!(process.borrow().is_fully_up());
    }

    #[test]
    fn resolves_namespace_only_below_requester_index() {
        let arena = Arena::unbounded();
        let registry = registry_with(vec![("stub_up", Rc::new(StubUp) as Rc<dyn Module>)]);
        let descriptor = Rc::new(ProcessDescriptor::process(vec![
            crate::descriptor::StatementDescriptor::new("stub_up", lit_args(&arena)).named("a"),
            crate::descriptor::StatementDescriptor::new("stub_up", lit_args(&arena)).named("b"),
        ]));
        let process = ProcessInstance::spawn(descriptor, registry, host(), arena, HashMap::new());
        let p = process.borrow();
        assert!(p.resolve_path(1, "a").is_some());
        assert!(p.resolve_path(0, "b").is_none());
        assert!(p.resolve_path(1, "missing").is_none());
    }
}
