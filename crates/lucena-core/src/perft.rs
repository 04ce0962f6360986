//! Perft: exhaustive move-count verification against published references.

use tracing::trace;

use crate::board::Board;
use crate::movegen::{generate_moves, MoveList};

/// Count leaf positions reachable in exactly `depth` plies.
///
/// Generation is pseudo-legal away from check, so every move is applied and
/// positions that leave the mover's king attacked are discarded — the same
/// lazy filtering a search driver performs.
pub fn perft(board: &Board, depth: usize) -> u64 {
    if depth == 0 {
        return 1;
    }

    let mut list = MoveList::new();
    generate_moves(board, &mut list);

    let mut nodes = 0u64;
    for &mv in &list {
        if board.leaves_king_in_check(mv) {
            continue;
        }
        nodes += if depth == 1 {
            1
        } else {
            perft(&board.make_move(mv), depth - 1)
        };
    }
    nodes
}

/// Per-move perft breakdown, sorted by move text. The classic tool for
/// pinning down which subtree disagrees with a reference count.
pub fn divide(board: &Board, depth: usize) -> Vec<(String, u64)> {
    let mut list = MoveList::new();
    generate_moves(board, &mut list);

    let mut results: Vec<(String, u64)> = list
        .iter()
        .filter(|mv| !board.leaves_king_in_check(**mv))
        .map(|mv| {
            let count = if depth <= 1 {
                1
            } else {
                perft(&board.make_move(*mv), depth - 1)
            };
            trace!(mv = %mv, count, "divide");
            (mv.to_uci(), count)
        })
        .collect();
    results.sort();
    results
}
