//! Hand-built programs exercising spec.md §8's scenarios. The textual
//! surface syntax is explicitly out of scope (spec.md §1 Non-goals), so
//! each demo constructs its [`ProcessDescriptor`] directly, the way a
//! program loader would after parsing and compiling a source file.

use std::rc::Rc;

use ncd_scheduler::{ProcessDescriptor, StatementDescriptor};
use ncd_subprocess::TemplateMap;
use ncd_value::{Arena, ArgumentTemplate, Value};

use crate::cli::Demo;

/// Builds a literal argument list of string values, materialized
/// against `arena` (§3 "Argument Template": a statement with no
/// placeholders reduces to a plain literal).
fn string_args(arena: &Arena, items: &[&str]) -> ArgumentTemplate {
    let mut list = Value::build_list(arena).expect("fresh arena has room for an empty list");
    for item in items {
        let s = Value::build_string(arena, *item).expect("fresh arena has room for a short string");
        list = list.list_append(s).expect("fresh arena has room to grow the list");
    }
    ArgumentTemplate::literal(list)
}

fn no_args(arena: &Arena) -> ArgumentTemplate {
    ArgumentTemplate::literal(Value::build_list(arena).expect("fresh arena has room for an empty list"))
}

/// `a: stub_up(); b: stub_up();` (§8 S1).
fn linear(arena: &Arena) -> ProcessDescriptor {
    ProcessDescriptor::process(vec![
        StatementDescriptor::new("stub_up", no_args(arena)).named("a"),
        StatementDescriptor::new("stub_up", no_args(arena)).named("b"),
    ])
}

/// `x: fail_once();` (§8 S2).
fn retry(arena: &Arena) -> ProcessDescriptor {
    ProcessDescriptor::process(vec![StatementDescriptor::new("fail_once", no_args(arena)).named("x")])
}

/// `a: toggle(); b: stub_up(); c: stub_up();` (§8 S3).
fn regress(arena: &Arena) -> ProcessDescriptor {
    ProcessDescriptor::process(vec![
        StatementDescriptor::new("toggle", no_args(arena)).named("a"),
        StatementDescriptor::new("stub_up", no_args(arena)).named("b"),
        StatementDescriptor::new("stub_up", no_args(arena)).named("c"),
    ])
}

/// `a: value("hello"); b: echo(a);` (§8 S4).
fn variables(arena: &Arena) -> ProcessDescriptor {
    ProcessDescriptor::process(vec![
        StatementDescriptor::new("value", string_args(arena, &["hello"])).named("a"),
        StatementDescriptor::new("echo", string_args(arena, &["a"])).named("b"),
    ])
}

/// `a: value("world"); b: call("greet", list());` with
/// `template greet { c: echo(_caller.a); }` (§8 S5). Returns the root
/// descriptor plus the populated [`TemplateMap`] `call` resolves
/// `"greet"` against.
fn template(arena: &Arena) -> (ProcessDescriptor, TemplateMap) {
    // `call`'s arguments are `(template_name, call_args)`; the call
    // site passes an empty call-args list.
    let name = Value::build_string(arena, "greet").expect("fresh arena has room for a short string");
    let call_args = Value::build_list(arena).expect("fresh arena has room for an empty list");
    let mut root_args_list = Value::build_list(arena).expect("fresh arena has room for an empty list");
    root_args_list = root_args_list.list_append(name).expect("fresh arena has room to grow the list");
    root_args_list = root_args_list
        .list_append(call_args)
        .expect("fresh arena has room to grow the list");
    let root_args = ArgumentTemplate::literal(root_args_list);

    let root = ProcessDescriptor::process(vec![
        StatementDescriptor::new("value", string_args(arena, &["world"])).named("a"),
        StatementDescriptor::new("call", root_args).named("b"),
    ]);

    let template_arena = Arena::unbounded();
    let greet = ProcessDescriptor::template(vec![
        StatementDescriptor::new("echo", string_args(&template_arena, &["_caller.a"])).named("c"),
    ]);
    let mut templates = TemplateMap::new();
    templates.register("greet", Rc::new(greet));

    (root, templates)
}

/// Builds the root [`ProcessDescriptor`] and [`TemplateMap`] for the
/// named demo. Only [`Demo::Template`] needs a non-empty template map;
/// every other demo gets an empty one.
pub fn build(demo: Demo, arena: &Arena) -> (ProcessDescriptor, TemplateMap) {
    match demo {
        Demo::Linear => (linear(arena), TemplateMap::new()),
        Demo::Retry => (retry(arena), TemplateMap::new()),
        Demo::Regress => (regress(arena), TemplateMap::new()),
        Demo::Variables => (variables(arena), TemplateMap::new()),
        Demo::Template => template(arena),
    }
}
