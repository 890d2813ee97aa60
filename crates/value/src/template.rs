//! Argument templates: a Value tree plus a replacement program, enabling
//! O(substitutions) materialization of concrete arguments for a fresh
//! statement instance without reparsing (§3 "Argument Template").

use std::collections::HashMap;

use crate::arena::Arena;
use crate::error::{ValueError, ValueResult};
use crate::value::Value;

/// One step of a path from the template root down to a placeholder site.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathStep {
    ListIndex(usize),
    MapKey(Vec<u8>),
}

/// One `(placeholder-id, path-in-tree)` entry of the replacement program.
#[derive(Debug, Clone)]
pub struct ReplacementSite {
    pub placeholder_id: u32,
    pub path: Vec<PathStep>,
}

/// A compiled, reusable argument template (§3).
#[derive(Debug, Clone)]
pub struct ArgumentTemplate {
    literal: Value,
    program: Vec<ReplacementSite>,
}

impl ArgumentTemplate {
    pub fn new(literal: Value, program: Vec<ReplacementSite>) -> Self {
        Self { literal, program }
    }

    /// A template with no placeholders, for statements whose arguments
    /// are already fully literal.
    pub fn literal(value: Value) -> Self {
        Self {
            literal: value,
            program: Vec::new(),
        }
    }

    pub fn literal_value(&self) -> &Value {
        &self.literal
    }

    /// Materializes concrete arguments in `arena`, substituting each
    /// replacement site with `substitutions[placeholder_id]` (§3, §8
    /// invariant 6: with an empty substitution set this reduces to a
    /// plain deep copy of the literal).
    pub fn materialize(&self, arena: &Arena, substitutions: &[Value]) -> ValueResult<Value> {
        let mut by_path: HashMap<Vec<PathStep>, u32> = HashMap::new();
        for site in &self.program {
            by_path.insert(site.path.clone(), site.placeholder_id);
        }
        self.materialize_at(arena, &self.literal, &mut Vec::new(), &by_path, substitutions)
    }

    fn materialize_at(
        &self,
        arena: &Arena,
        node: &Value,
        path: &mut Vec<PathStep>,
        by_path: &HashMap<Vec<PathStep>, u32>,
        substitutions: &[Value],
    ) -> ValueResult<Value> {
        if let Some(&placeholder_id) = by_path.get(path) {
            let sub = substitutions
                .get(placeholder_id as usize)
                .ok_or(ValueError::MissingSubstitution { placeholder_id })?;
            return sub.copy(arena);
        }

        if node.is_list() {
            let mut out = Value::build_list(arena)?;
            let count = node.list_count().unwrap_or(0);
            for i in 0..count {
                let child = node.list_get(i).expect("index within list_count");
                path.push(PathStep::ListIndex(i));
                let materialized = self.materialize_at(arena, child, path, by_path, substitutions)?;
                path.pop();
                out = out.list_append(materialized)?;
            }
            return Ok(out);
        }

        if node.is_map() {
            let mut out = Value::build_map(arena)?;
            for (k, v) in node.map_iterate_sorted() {
                let key_bytes = k.as_bytes().ok_or(ValueError::InvalidPath)?.to_vec();
                path.push(PathStep::MapKey(key_bytes));
                let materialized_v = self.materialize_at(arena, v, path, by_path, substitutions)?;
                path.pop();
                let materialized_k = k.copy(arena)?;
                out = out.map_insert(materialized_k, materialized_v)?;
            }
            return Ok(out);
        }

        node.copy(arena)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_substitution_set_round_trips_literal() {
        let arena = Arena::unbounded();
        let literal = Value::build_string(&arena, "literal").unwrap();
        let template = ArgumentTemplate::literal(literal.clone());
        let out = template.materialize(&Arena::unbounded(), &[]).unwrap();
        assert_eq!(out.compare(&literal), std::cmp::Ordering::Equal);
    }

    #[test]
    fn substitutes_placeholder_inside_list() {
        let arena = Arena::unbounded();
        let placeholder = Value::build_placeholder(&arena, 0).unwrap();
        let head = Value::build_string(&arena, "head").unwrap();
        let mut list = Value::build_list(&arena).unwrap();
        list = list.list_append(head).unwrap();
        list = list.list_append(placeholder).unwrap();

        let template = ArgumentTemplate::new(
            list,
            vec![ReplacementSite {
                placeholder_id: 0,
                path: vec![PathStep::ListIndex(1)],
            }],
        );

        let sub = Value::build_string(&arena, "substituted").unwrap();
        let out = template.materialize(&arena, &[sub]).unwrap();
        assert_eq!(out.list_get(0).unwrap().as_bytes(), Some(&b"head"[..]));
        assert_eq!(
            out.list_get(1).unwrap().as_bytes(),
            Some(&b"substituted"[..])
        );
    }

    #[test]
    fn missing_substitution_is_an_error() {
        let arena = Arena::unbounded();
        let placeholder = Value::build_placeholder(&arena, 0).unwrap();
        let template = ArgumentTemplate::new(
            placeholder,
            vec![ReplacementSite {
                placeholder_id: 0,
                path: vec![],
            }],
        );
        assert!(template.materialize(&arena, &[]).is_err());
    }
}
