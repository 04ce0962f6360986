//! Shared move cursor for node-parallel search.
//!
//! Workers cooperating at a split point pull from one generator. The lock is
//! held for exactly one cursor advance, so each move index is claimed by one
//! worker and the expensive legality and make-move work that follows runs
//! unlocked. Relative order across workers is unspecified; exhaustion is the
//! usual null move, after which a worker idles or leaves on its own.

use std::sync::{Mutex, MutexGuard, PoisonError};

use lucena_core::Move;

use crate::generator::MoveGenerator;

/// A move generator shared by several search workers.
pub struct SplitPoint<'a> {
    shared: Mutex<MoveGenerator<'a>>,
}

impl<'a> SplitPoint<'a> {
    /// Wrap `generator` for shared claiming.
    pub fn new(generator: MoveGenerator<'a>) -> SplitPoint<'a> {
        SplitPoint {
            shared: Mutex::new(generator),
        }
    }

    /// Claim the next move on the normal path, or [`Move::NULL`] when the
    /// node is exhausted.
    pub fn next_move(&self) -> Move {
        self.lock().next_move()
    }

    /// Claim the next evasion, or [`Move::NULL`] when the node is exhausted.
    pub fn next_evasion(&self) -> Move {
        self.lock().next_evasion()
    }

    /// Take the generator back out, ending sharing.
    pub fn into_inner(self) -> MoveGenerator<'a> {
        self.shared
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// A poisoned cursor is still a valid cursor: a worker that panicked
    /// between claims cannot have left the generator mid-update.
    fn lock(&self) -> MutexGuard<'_, MoveGenerator<'a>> {
        self.shared.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
