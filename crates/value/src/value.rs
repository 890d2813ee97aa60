//! The tagged tree value exchanged between statements (§3, §4.1).

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::rc::Rc;

use crate::arena::Arena;
use crate::error::ValueResult;

/// Total order over value kinds, used as the first key of `compare`.
fn kind_rank(v: &ValueKind) -> u8 {
    match v {
        ValueKind::String(_) => 0,
        ValueKind::List(_) => 1,
        ValueKind::Map(_) => 2,
        ValueKind::Placeholder(_) => 3,
    }
}

#[derive(Debug)]
enum ValueKind {
    String(Vec<u8>),
    List(Vec<Value>),
    // Stored sorted by key so `map_iterate_sorted` is a plain traversal;
    // `OrderedKey` wraps `Value` with the `compare` total order as its `Ord`.
    Map(BTreeMap<OrderedKey, Value>),
    Placeholder(u32),
}

/// A handle into a [`Arena`]-owned value tree.
///
/// Cloning is O(1) (an `Rc` bump); the tree itself is immutable once
/// built, matching "Values are produced by a memory arena; a Value
/// reference is valid only within its arena's lifetime."
#[derive(Debug, Clone)]
pub struct Value {
    kind: Rc<ValueKind>,
    arena: Arena,
}

/// Wraps a [`Value`] so it can be used as a `BTreeMap` key under the
/// engine's total order (lexicographic byte compare on strings, then
/// type-tag, then structural recursion) rather than any derived order.
#[derive(Debug, Clone)]
struct OrderedKey(Value);

impl PartialEq for OrderedKey {
    fn eq(&self, other: &Self) -> bool {
        self.0.compare(&other.0) == Ordering::Equal
    }
}
impl Eq for OrderedKey {}
impl PartialOrd for OrderedKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for OrderedKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.compare(&other.0)
    }
}

impl Value {
    /// Builds a string Value (§4.1 `build-string`). May contain NULs.
    pub fn build_string(arena: &Arena, bytes: impl Into<Vec<u8>>) -> ValueResult<Value> {
        let bytes = bytes.into();
        arena.charge(bytes.len())?;
        Ok(Value {
            kind: Rc::new(ValueKind::String(bytes)),
            arena: arena.clone(),
        })
    }

    /// Builds an empty list Value (§4.1 `build-list`).
    pub fn build_list(arena: &Arena) -> ValueResult<Value> {
        arena.charge(0)?;
        Ok(Value {
            kind: Rc::new(ValueKind::List(Vec::new())),
            arena: arena.clone(),
        })
    }

    /// Builds an empty map Value (§4.1 `build-map`).
    pub fn build_map(arena: &Arena) -> ValueResult<Value> {
        arena.charge(0)?;
        Ok(Value {
            kind: Rc::new(ValueKind::Map(BTreeMap::new())),
            arena: arena.clone(),
        })
    }

    /// Builds a placeholder Value, used only inside pre-compiled argument
    /// templates (§3 "Placeholder").
    pub fn build_placeholder(arena: &Arena, id: u32) -> ValueResult<Value> {
        arena.charge(std::mem::size_of::<u32>())?;
        Ok(Value {
            kind: Rc::new(ValueKind::Placeholder(id)),
            arena: arena.clone(),
        })
    }

    /// Appends `child` to `self`, which must be a list Value built from
    /// the same arena. Returns the new list (lists are immutable once
    /// shared, so append produces a fresh handle; callers that build a
    /// list incrementally should rebind the returned value).
    pub fn list_append(&self, child: Value) -> ValueResult<Value> {
        let mut items = self.as_list().expect("list_append on non-list Value").clone();
        self.arena.charge(0)?;
        items.push(child);
        Ok(Value {
            kind: Rc::new(ValueKind::List(items)),
            arena: self.arena.clone(),
        })
    }

    pub fn list_get(&self, index: usize) -> Option<&Value> {
        self.as_list()?.get(index)
    }

    pub fn list_count(&self) -> Option<usize> {
        self.as_list().map(|v| v.len())
    }

    /// Inserts `key -> value`, replacing any existing entry for `key`
    /// (§4.1 `map-insert`). Returns the new map handle.
    pub fn map_insert(&self, key: Value, value: Value) -> ValueResult<Value> {
        let mut map = self.as_map().expect("map_insert on non-map Value").clone();
        self.arena.charge(0)?;
        map.insert(OrderedKey(key), value);
        Ok(Value {
            kind: Rc::new(ValueKind::Map(map)),
            arena: self.arena.clone(),
        })
    }

    pub fn map_lookup(&self, key: &Value) -> Option<&Value> {
        let map = self.as_map()?;
        map.iter()
            .find(|(k, _)| k.0.compare(key) == Ordering::Equal)
            .map(|(_, v)| v)
    }

    /// Iterates map entries in key order (§4.1 `map-iterate-sorted`).
    pub fn map_iterate_sorted(&self) -> impl Iterator<Item = (&Value, &Value)> {
        self.as_map()
            .into_iter()
            .flat_map(|m| m.iter())
            .map(|(k, v)| (&k.0, v))
    }

    /// Deep-copies `self` into `dst_arena`, charging the copy against its
    /// budget (§4.1 `copy`). The result outlives any reference to the
    /// source arena.
    pub fn copy(&self, dst_arena: &Arena) -> ValueResult<Value> {
        match &*self.kind {
            ValueKind::String(bytes) => Value::build_string(dst_arena, bytes.clone()),
            ValueKind::List(items) => {
                let mut out = Value::build_list(dst_arena)?;
                for item in items {
                    out = out.list_append(item.copy(dst_arena)?)?;
                }
                Ok(out)
            }
            ValueKind::Map(map) => {
                let mut out = Value::build_map(dst_arena)?;
                for (k, v) in map {
                    out = out.map_insert(k.0.copy(dst_arena)?, v.copy(dst_arena)?)?;
                }
                Ok(out)
            }
            ValueKind::Placeholder(id) => Value::build_placeholder(dst_arena, *id),
        }
    }

    /// Total, stable order: by type tag, then structurally (§4.1 `compare`,
    /// §8 invariant 5).
    pub fn compare(&self, other: &Value) -> Ordering {
        let rank = kind_rank(&self.kind).cmp(&kind_rank(&other.kind));
        if rank != Ordering::Equal {
            return rank;
        }
        match (&*self.kind, &*other.kind) {
            (ValueKind::String(a), ValueKind::String(b)) => a.cmp(b),
            (ValueKind::List(a), ValueKind::List(b)) => {
                for (x, y) in a.iter().zip(b.iter()) {
                    let c = x.compare(y);
                    if c != Ordering::Equal {
                        return c;
                    }
                }
                a.len().cmp(&b.len())
            }
            (ValueKind::Map(a), ValueKind::Map(b)) => {
                for ((ka, va), (kb, vb)) in a.iter().zip(b.iter()) {
                    let c = ka.0.compare(&kb.0);
                    if c != Ordering::Equal {
                        return c;
                    }
                    let c = va.compare(vb);
                    if c != Ordering::Equal {
                        return c;
                    }
                }
                a.len().cmp(&b.len())
            }
            (ValueKind::Placeholder(a), ValueKind::Placeholder(b)) => a.cmp(b),
            _ => unreachable!("kind_rank partitions variants"),
        }
    }

    pub fn arena(&self) -> &Arena {
        &self.arena
    }

    pub fn is_string(&self) -> bool {
        matches!(&*self.kind, ValueKind::String(_))
    }
    pub fn is_list(&self) -> bool {
        matches!(&*self.kind, ValueKind::List(_))
    }
    pub fn is_map(&self) -> bool {
        matches!(&*self.kind, ValueKind::Map(_))
    }
    pub fn is_placeholder(&self) -> bool {
        matches!(&*self.kind, ValueKind::Placeholder(_))
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match &*self.kind {
            ValueKind::String(b) => Some(b),
            _ => None,
        }
    }

    pub fn placeholder_id(&self) -> Option<u32> {
        match &*self.kind {
            ValueKind::Placeholder(id) => Some(*id),
            _ => None,
        }
    }

    fn as_list(&self) -> Option<&Vec<Value>> {
        match &*self.kind {
            ValueKind::List(items) => Some(items),
            _ => None,
        }
    }

    fn as_map(&self) -> Option<&BTreeMap<OrderedKey, Value>> {
        match &*self.kind {
            ValueKind::Map(m) => Some(m),
            _ => None,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.compare(other) == Ordering::Equal
    }
}
impl Eq for Value {}
