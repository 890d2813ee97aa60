//! End-to-end coverage of spec.md §8's scenarios, wired through the
//! real module library (`ncd-modules`) rather than the hand-rolled test
//! doubles the component crates use for their own unit tests. This is
//! what actually exercises the redesigned [`ProcessTree`] (flat,
//! non-recursive child driving) and the Sub-Process Primitive's
//! `spawn_inert`/pause-on-down handshake end to end.

use std::collections::HashMap;
use std::rc::Rc;
use std::time::{Duration, Instant};

use ncd_modules::register_standard_modules;
use ncd_registry::{Host, Registry, StaticHost};
use ncd_scheduler::{ProcessDescriptor, ProcessInstance, ProcessTree, StatementDescriptor};
use ncd_subprocess::TemplateMap;
use ncd_value::{Arena, ArgumentTemplate, Value};

fn no_args(arena: &Arena) -> ArgumentTemplate {
    ArgumentTemplate::literal(Value::build_list(arena).unwrap())
}

fn string_args(arena: &Arena, items: &[&str]) -> ArgumentTemplate {
    let mut list = Value::build_list(arena).unwrap();
    for item in items {
        list = list.list_append(Value::build_string(arena, *item).unwrap()).unwrap();
    }
    ArgumentTemplate::literal(list)
}

fn registry_with(templates: Rc<TemplateMap>) -> Rc<Registry> {
    let mut registry = Registry::new();
    register_standard_modules(&mut registry, templates);
    Rc::new(registry)
}

fn host() -> Rc<dyn Host> {
    Rc::new(StaticHost::new(
        Value::build_list(&Arena::unbounded()).unwrap(),
        Duration::from_millis(100),
    ))
}

#[test]
fn s1_linear_advance_and_full_teardown() {
    let arena = Arena::unbounded();
    let registry = registry_with(Rc::new(TemplateMap::new()));
    let descriptor = Rc::new(ProcessDescriptor::process(vec![
        StatementDescriptor::new("stub_up", no_args(&arena)).named("a"),
        StatementDescriptor::new("stub_up", no_args(&arena)).named("b"),
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
    let registry = registry_with(Rc::new(TemplateMap::new()));
    let descriptor = Rc::new(ProcessDescriptor::process(vec![
        StatementDescriptor::new("fail_once", no_args(&arena)).named("x"),
    ]));
    let process = ProcessInstance::spawn(descriptor, registry, host(), arena, HashMap::new());
    assert!(!process.borrow().is_fully_up());

    let deadline = process.borrow().next_deadline().expect("retry timer armed");
    process.borrow_mut().pump(deadline);
    assert!(process.borrow().is_fully_up());
}

#[test]
fn s3_regress_propagation() {
    let arena = Arena::unbounded();
    let registry = registry_with(Rc::new(TemplateMap::new()));
    let descriptor = Rc::new(ProcessDescriptor::process(vec![
        StatementDescriptor::new("toggle", no_args(&arena)).named("a"),
        StatementDescriptor::new("stub_up", no_args(&arena)).named("b"),
        StatementDescriptor::new("stub_up", no_args(&arena)).named("c"),
    ]));
    let process = ProcessInstance::spawn(descriptor, registry, host(), arena, HashMap::new());
    assert!(process.borrow().is_fully_up());

    let t1 = process.borrow().next_deadline().expect("toggle's down timer armed");
    process.borrow_mut().pump(t1);
    // `a` went down; `b` and `c` tore down and `a` is DOWN_UNCLEAN
    // pending `clean()`'s deferred re-up.
    assert_eq!(process.borrow().fixed_pointer(), 0);
    assert_eq!(process.borrow().advance_cursor(), 1);

    let t2 = process.borrow().next_deadline().expect("toggle's up timer armed");
    process.borrow_mut().pump(t2);
    assert!(process.borrow().is_fully_up());
}

#[test]
fn s4_variable_resolution_scoping() {
    let arena = Arena::unbounded();
    let registry = registry_with(Rc::new(TemplateMap::new()));
    let descriptor = Rc::new(ProcessDescriptor::process(vec![
        StatementDescriptor::new("value", string_args(&arena, &["hello"])).named("a"),
        StatementDescriptor::new("echo", string_args(&arena, &["a"])).named("b"),
    ]));
    let process = ProcessInstance::spawn(descriptor, registry, host(), arena, HashMap::new());
    assert!(process.borrow().is_fully_up());

    let p = process.borrow();
    let b = p.resolve_path(2, "b").expect("b resolves once fully up");
    let value = b.get_var("").expect("echo exposes its resolved target's default variable");
    let hello = Value::build_string(&Arena::unbounded(), "hello").unwrap();
    assert_eq!(value.compare(&hello), std::cmp::Ordering::Equal);
}

#[test]
fn s5_template_invocation_with_caller() {
    let arena = Arena::unbounded();

    let template_arena = Arena::unbounded();
    let greet = ProcessDescriptor::template(vec![
        StatementDescriptor::new("echo", string_args(&template_arena, &["_caller.a"])).named("c"),
    ]);
    let mut templates = TemplateMap::new();
    templates.register("greet", Rc::new(greet));

    let registry = registry_with(Rc::new(templates));
    let name = Value::build_string(&arena, "greet").unwrap();
    let call_args = Value::build_list(&arena).unwrap();
    let mut call_statement_args = Value::build_list(&arena).unwrap();
    call_statement_args = call_statement_args.list_append(name).unwrap();
    call_statement_args = call_statement_args.list_append(call_args).unwrap();

    let descriptor = Rc::new(ProcessDescriptor::process(vec![
        StatementDescriptor::new("value", string_args(&arena, &["world"])).named("a"),
        StatementDescriptor::new("call", ArgumentTemplate::literal(call_statement_args)).named("b"),
    ]));

    let process = ProcessInstance::spawn(descriptor, registry, host(), arena, HashMap::new());
    let tree_root = Rc::clone(&process);
    let mut tree = ProcessTree::new(tree_root);

    // `call`'s child is constructed inert (`spawn_inert`) and only gets
    // its first real drive on the tree's own pump pass, so reaching
    // fully-up takes more than one tick: one for the child's `init` to
    // resolve `_caller`, one more to relay its UP back to `call`.
    let now = Instant::now();
    for _ in 0..8 {
        if tree.root().borrow().is_fully_up() {
            break;
        }
        tree.pump(now);
    }
    assert!(tree.root().borrow().is_fully_up(), "root process never reached fully up");

    tree.terminate_root();
    for _ in 0..8 {
        if tree.is_root_terminated() {
            break;
        }
        tree.pump(now);
    }
    assert!(tree.is_root_terminated(), "root process never finished tearing down");
}

#[test]
fn method_statement_resolves_against_matching_base_type() {
    // `a: list("x", "y", "z"); n: list::length@a();` (§4.2 method
    // resolution: `n`'s `object_path` is `"a"`, whose statement exports
    // `base_type() == "list"`, matching `list::length`'s declared
    // `method_base`).
    let arena = Arena::unbounded();
    let registry = registry_with(Rc::new(TemplateMap::new()));
    let descriptor = Rc::new(ProcessDescriptor::process(vec![
        StatementDescriptor::new("list", string_args(&arena, &["x", "y", "z"])).named("a"),
        StatementDescriptor::new("list::length", no_args(&arena))
            .named("n")
            .on_object("a"),
    ]));
    let process = ProcessInstance::spawn(descriptor, registry, host(), arena, HashMap::new());
    assert!(process.borrow().is_fully_up());

    let p = process.borrow();
    let n = p.resolve_path(2, "n").expect("n resolves once fully up");
    let count = n.get_var("").expect("list::length exposes its rendered count");
    assert_eq!(count.as_bytes(), Some(&b"3"[..]));
}

#[test]
fn method_statement_retries_when_object_path_base_mismatches() {
    // `a: value("x"); n: list::length@a();` — `a`'s base_type is
    // `"value"`, not `"list"`, so method resolution fails and the
    // scheduler retries `n` rather than invoking the module.
    let arena = Arena::unbounded();
    let registry = registry_with(Rc::new(TemplateMap::new()));
    let descriptor = Rc::new(ProcessDescriptor::process(vec![
        StatementDescriptor::new("value", string_args(&arena, &["x"])).named("a"),
        StatementDescriptor::new("list::length", no_args(&arena))
            .named("n")
            .on_object("a"),
    ]));
    let process = ProcessInstance::spawn(descriptor, registry, host(), arena, HashMap::new());
    assert!(!process.borrow().is_fully_up());
    assert!(process.borrow().next_deadline().is_some());
}

#[test]
fn s6_termination_while_retrying_cancels_timer() {
    let arena = Arena::unbounded();
    let registry = registry_with(Rc::new(TemplateMap::new()));
    let descriptor = Rc::new(ProcessDescriptor::process(vec![
        StatementDescriptor::new("fail_once", no_args(&arena)).named("x"),
    ]));
    let process = ProcessInstance::spawn(descriptor, registry, host(), arena, HashMap::new());
    assert!(process.borrow().next_deadline().is_some());

    process.borrow_mut().terminate();
    assert!(process.borrow().is_terminated());
    assert!(process.borrow().next_deadline().is_none());
}
