//! Parse-session arena
//!
//! All memory the parser hands out (nodes, copied names, statement and
//! argument lists) comes from one [`bumpalo::Bump`]. Every allocation path
//! is fallible so the parser can report exhaustion instead of aborting. Growing a list moves it
//! to a larger block inside the bump; the old block stays where it is until
//! the arena itself is dropped, so nothing is ever freed twice or early.
//!
//! The arena is owned by the caller for the duration of a parse session and
//! borrowed by the [`Parser`](super::parse::Parser). Every AST reference
//! carries the arena's lifetime.

use bumpalo::collections::Vec as BumpVec;
use bumpalo::{AllocErr, Bump};

/// Allocation registry for one parse session
#[derive(Default)]
pub struct Arena {
    bump: Bump,
}

impl Arena {
    pub fn new() -> Self {
        Self { bump: Bump::new() }
    }

    /// Total bytes reserved by the arena so far
    pub fn allocated_bytes(&self) -> usize {
        self.bump.allocated_bytes()
    }

    /// Move `value` into the arena.
    pub(crate) fn try_alloc<T>(&self, value: T) -> Result<&T, AllocErr> {
        self.bump.try_alloc(value).map(|v| &*v)
    }

    /// Copy a name into the arena.
    pub(crate) fn try_alloc_str(&self, s: &str) -> Result<&str, AllocErr> {
        self.bump.try_alloc_str(s).map(|s| &*s)
    }

    /// An empty growable sequence backed by the arena; grow it with
    /// `try_reserve` before pushing.
    pub(crate) fn vec<T>(&self) -> BumpVec<'_, T> {
        BumpVec::new_in(&self.bump)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_growth_stays_in_arena() {
        let arena = Arena::new();
        let mut items = arena.vec();
        for i in 0..100 {
            items.try_reserve(1).expect("arena growth");
            items.push(i);
        }
        let frozen = items.into_bump_slice();

        assert_eq!(frozen.len(), 100);
        assert_eq!(frozen[99], 99);
        assert!(arena.allocated_bytes() >= 100 * std::mem::size_of::<i32>());
    }

    #[test]
    fn test_alloc_str_copies() {
        let arena = Arena::new();
        let owned = String::from("counter");
        let copy = arena.try_alloc_str(&owned).expect("arena allocation");
        drop(owned);
        assert_eq!(copy, "counter");
    }
}
