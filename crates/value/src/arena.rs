//! Arena ownership for [`crate::Value`] trees.
//!
//! The original engine allocates Values out of a fixed memory arena and
//! treats a Value reference as valid only within that arena's lifetime.
//! Rust's ownership model gives us that for free through `Rc`: a `Value`
//! is a cheaply-cloned handle into a tree that lives as long as any
//! reference to it does. What the arena still needs to model explicitly
//! is the *budget* (§4.1 "build operations may fail only on allocator
//! exhaustion") and the notion of distinct arenas so that `copy` across
//! them is a real, chargeable operation rather than a no-op clone.

use std::cell::Cell;
use std::rc::Rc;

use crate::error::{ValueError, ValueResult};

#[derive(Debug)]
struct ArenaInner {
    id: u64,
    budget: usize,
    used: Cell<usize>,
}

/// Owns a budget against which `Value` construction is charged.
///
/// Cloning an `Arena` shares the same budget and identity; a fresh arena
/// (via [`Arena::new`]) gets its own budget and its own identity, so that
/// [`crate::Value::copy`] between two `Arena`s is observably a distinct
/// operation from cloning a handle within one.
#[derive(Debug, Clone)]
pub struct Arena {
    inner: Rc<ArenaInner>,
}

static NEXT_ARENA_ID: std::sync::atomic::AtomicU64 = std::sync::atomic::AtomicU64::new(1);

impl Arena {
    /// Creates a fresh arena with the given byte budget.
    pub fn new(budget: usize) -> Self {
        let id = NEXT_ARENA_ID.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
        Self {
            inner: Rc::new(ArenaInner {
                id,
                budget,
                used: Cell::new(0),
            }),
        }
    }

    /// Creates an arena with no practical budget, for tests and
    /// short-lived scratch construction (e.g. compiling a statement
    /// descriptor's argument template once at program-load time).
    pub fn unbounded() -> Self {
        Self::new(usize::MAX)
    }

    pub fn id(&self) -> u64 {
        self.inner.id
    }

    pub fn used(&self) -> usize {
        self.inner.used.get()
    }

    pub fn remaining(&self) -> usize {
        self.inner.budget.saturating_sub(self.inner.used.get())
    }

    /// Charges `bytes` against the budget, failing with
    /// [`ValueError::AllocationFailure`] on exhaustion.
    pub(crate) fn charge(&self, bytes: usize) -> ValueResult<()> {
        let used = self.inner.used.get();
        let remaining = self.inner.budget.saturating_sub(used);
        if bytes > remaining {
            return Err(ValueError::AllocationFailure {
                requested: bytes,
                remaining,
                budget: self.inner.budget,
            });
        }
        self.inner.used.set(used + bytes);
        Ok(())
    }
}

impl Default for Arena {
    fn default() -> Self {
        Self::unbounded()
    }
}

impl PartialEq for Arena {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}
impl Eq for Arena {}
