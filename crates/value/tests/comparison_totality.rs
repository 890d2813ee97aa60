//! Property tests for §8 invariant 5 ("for any Values a, b,
//! compare(a,b) = -compare(b,a), and transitivity holds") and invariant
//! 6 ("materializing an argument template with an empty substitution
//! set yields a Value that compares equal to the template's literal").

use std::cmp::Ordering;

use proptest::prelude::*;

use ncd_value::{Arena, ArgumentTemplate, Value};

fn reverse(ord: Ordering) -> Ordering {
    match ord {
        Ordering::Less => Ordering::Greater,
        Ordering::Equal => Ordering::Equal,
        Ordering::Greater => Ordering::Less,
    }
}

/// A small recursive strategy for building arbitrary Value trees,
/// bounded in depth and width so shrinking stays fast.
fn arb_value() -> impl Strategy<Value = ArbValue> {
    let leaf = prop_oneof![
        "[a-z]{0,8}".prop_map(ArbValue::Str),
        any::<u32>().prop_map(ArbValue::Placeholder),
    ];
    leaf.prop_recursive(3, 16, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(ArbValue::List),
            prop::collection::vec(("[a-z]{1,4}", inner), 0..4).prop_map(ArbValue::Map),
        ]
    })
}

#[derive(Debug, Clone)]
enum ArbValue {
    Str(String),
    Placeholder(u32),
    List(Vec<ArbValue>),
    Map(Vec<(String, ArbValue)>),
}

impl ArbValue {
    fn build(&self, arena: &Arena) -> Value {
        match self {
            ArbValue::Str(s) => Value::build_string(arena, s.as_bytes().to_vec()).unwrap(),
            ArbValue::Placeholder(id) => Value::build_placeholder(arena, *id).unwrap(),
            ArbValue::List(items) => {
                let mut list = Value::build_list(arena).unwrap();
                for item in items {
                    list = list.list_append(item.build(arena)).unwrap();
                }
                list
            }
            ArbValue::Map(entries) => {
                let mut map = Value::build_map(arena).unwrap();
                for (k, v) in entries {
                    let key = Value::build_string(arena, k.as_bytes().to_vec()).unwrap();
                    map = map.map_insert(key, v.build(arena)).unwrap();
                }
                map
            }
        }
    }
}

proptest! {
    #[test]
    fn compare_is_anti_symmetric(a in arb_value(), b in arb_value()) {
        let arena = Arena::unbounded();
        let va = a.build(&arena);
        let vb = b.build(&arena);
        prop_assert_eq!(va.compare(&vb), reverse(vb.compare(&va)));
    }

    #[test]
    fn compare_is_reflexive(a in arb_value()) {
        let arena = Arena::unbounded();
        let va = a.build(&arena);
        prop_assert_eq!(va.compare(&va), Ordering::Equal);
    }

    #[test]
    fn compare_is_transitive(a in arb_value(), b in arb_value(), c in arb_value()) {
        let arena = Arena::unbounded();
        let va = a.build(&arena);
        let vb = b.build(&arena);
        let vc = c.build(&arena);
        let ab = va.compare(&vb);
        let bc = vb.compare(&vc);
        if ab == Ordering::Less && bc == Ordering::Less {
            prop_assert_eq!(va.compare(&vc), Ordering::Less);
        }
        if ab == Ordering::Greater && bc == Ordering::Greater {
            prop_assert_eq!(va.compare(&vc), Ordering::Greater);
        }
        if ab == Ordering::Equal && bc == Ordering::Equal {
            prop_assert_eq!(va.compare(&vc), Ordering::Equal);
        }
    }

    #[test]
    fn empty_substitution_round_trips_any_literal(a in arb_value()) {
        let arena = Arena::unbounded();
        let literal = a.build(&arena);
        let template = ArgumentTemplate::literal(literal.clone());
        let out = template.materialize(&Arena::unbounded(), &[]).unwrap();
        prop_assert_eq!(out.compare(&literal), Ordering::Equal);
    }
}
