//! The root move list.
//!
//! The root is the one place moves are filtered for full legality eagerly:
//! the list is iterated again on every deepening pass, so it must be stable,
//! and the driver feeds per-move subtree node counts back into it to decide
//! what to search first on the next pass.

use lucena_core::{generate_all, Board, Move, MoveList};
use tracing::trace;

use crate::phase::Phase;
use crate::see::see;

/// One root move with its ordering state.
#[derive(Debug, Clone, Copy)]
pub struct MoveEntry {
    /// The move, carrying the used/phase/forced bookkeeping bits.
    pub mv: Move,
    /// Cumulative node count of this move's subtrees across passes.
    pub nodes: u64,
    /// Exchange score assigned at construction (captures only).
    pub score: i32,
}

/// Eagerly built, fully legal move list for the search root.
pub struct RootMoveGenerator<'a> {
    board: &'a Board,
    entries: Vec<MoveEntry>,
    index: usize,
}

impl<'a> RootMoveGenerator<'a> {
    /// Generate and legality-filter the root moves.
    ///
    /// Out of check, every pseudo-legal move is tentatively applied and kept
    /// only if the mover's king survives; surviving captures are scored by
    /// exchange evaluation and the list is sorted best-first. In check the
    /// evasion set is already legal and keeps its order; a lone evasion is
    /// tagged forced.
    pub fn new(board: &'a Board) -> RootMoveGenerator<'a> {
        let mut list = MoveList::new();
        generate_all(board, &mut list, false);

        let mut entries = Vec::with_capacity(list.len());
        if board.in_check() {
            for &mv in &list {
                entries.push(MoveEntry { mv, nodes: 0, score: 0 });
            }
            if entries.len() == 1 {
                entries[0].mv.set_forced();
            }
        } else {
            for &mv in &list {
                if board.leaves_king_in_check(mv) {
                    continue;
                }
                let score = if mv.is_capture() { see(board, mv) } else { 0 };
                entries.push(MoveEntry { mv, nodes: 0, score });
            }
        }

        for entry in &entries {
            trace!(mv = %entry.mv, score = entry.score, "root move");
        }

        let mut generator = RootMoveGenerator { board, entries, index: 0 };
        if !board.in_check() {
            generator.reorder_by_score();
        }
        generator
    }

    /// The next root move not excluded from iteration, or [`Move::NULL`]
    /// when the pass is exhausted.
    pub fn next(&mut self) -> Move {
        while self.index < self.entries.len() {
            let entry = self.entries[self.index];
            self.index += 1;
            if entry.mv.is_used() {
                continue;
            }
            return entry.mv;
        }
        Move::NULL
    }

    /// Restart iteration without touching order or exclusion flags.
    pub fn reset(&mut self) {
        self.index = 0;
    }

    /// Prepare the list for the next deepening pass.
    ///
    /// The principal-variation move, if present, moves to the front with the
    /// relative order of all other moves preserved. Every move is re-tagged:
    /// the PV move as the hash phase, captures and promotions that do not
    /// lose material as winning captures, the rest as history. From depth 4
    /// on, the non-PV tail is additionally sorted by descending cumulative
    /// node count, so the lines that consumed the most effort are revisited
    /// first.
    pub fn reorder(&mut self, pv_move: Move, depth: u8) {
        self.index = 0;
        let mut pv_len = 0;
        if let Some(pos) = self.entries.iter().position(|e| e.mv == pv_move) {
            let mut entry = self.entries.remove(pos);
            entry.mv.clear_used();
            entry.mv.set_phase_tag(Phase::HashMove.tag());
            self.entries.insert(0, entry);
            pv_len = 1;
        }
        for entry in self.entries.iter_mut().skip(pv_len) {
            entry.mv.clear_used();
            let phase = if entry.mv.is_capture_or_promotion() && see(self.board, entry.mv) >= 0 {
                Phase::WinningCapture
            } else {
                Phase::History
            };
            entry.mv.set_phase_tag(phase.tag());
        }
        if depth >= 4 && self.entries.len() > pv_len + 1 {
            self.entries[pv_len..].sort_by(|a, b| b.nodes.cmp(&a.nodes));
        }
    }

    /// Restart iteration with the whole list sorted by descending score,
    /// clearing all exclusion flags.
    pub fn reorder_by_score(&mut self) {
        self.index = 0;
        for entry in &mut self.entries {
            entry.mv.clear_used();
        }
        if self.entries.len() > 1 {
            self.entries.sort_by(|a, b| b.score.cmp(&a.score));
        }
    }

    /// Exclude the first entry matching `mv` from iteration. The list keeps
    /// its shape; the entry is only skipped.
    pub fn exclude(&mut self, mv: Move) {
        for entry in &mut self.entries {
            if entry.mv == mv {
                entry.mv.set_used();
                break;
            }
        }
    }

    /// Replace the exclusion set: clear every flag, then exclude all entries
    /// matching any move in `excluded`.
    pub fn exclude_all(&mut self, excluded: &[Move]) {
        for entry in &mut self.entries {
            entry.mv.clear_used();
            if excluded.contains(&entry.mv) {
                entry.mv.set_used();
            }
        }
    }

    /// Add `nodes` to the cumulative count of the entry matching `mv`.
    /// The driver calls this after each root move's subtree completes.
    pub fn record_nodes(&mut self, mv: Move, nodes: u64) {
        if let Some(entry) = self.entries.iter_mut().find(|e| e.mv == mv) {
            entry.nodes += nodes;
        }
    }

    /// The ordered entries.
    #[inline]
    pub fn entries(&self) -> &[MoveEntry] {
        &self.entries
    }

    /// Number of legal root moves.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// `true` for a terminal position: checkmate or stalemate.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::RootMoveGenerator;
    use crate::phase::Phase;
    use lucena_core::{Board, Move, PieceKind, Square};

    fn moves_of(generator: &RootMoveGenerator) -> Vec<Move> {
        generator.entries().iter().map(|e| e.mv).collect()
    }

    fn drain(generator: &mut RootMoveGenerator) -> Vec<Move> {
        let mut out = Vec::new();
        loop {
            let mv = generator.next();
            if mv.is_null() {
                break;
            }
            out.push(mv);
        }
        out
    }

    #[test]
    fn starting_position_has_twenty_legal_moves() {
        let board = Board::starting_position();
        let mut generator = RootMoveGenerator::new(&board);
        assert_eq!(generator.len(), 20);
        assert_eq!(drain(&mut generator).len(), 20);
    }

    #[test]
    fn pinned_piece_moves_are_filtered() {
        // The knight on e2 shields its king from the rook on e8.
        let board: Board = "4r2k/8/8/8/8/8/4N3/4K3 w - - 0 1".parse().unwrap();
        let generator = RootMoveGenerator::new(&board);
        assert_eq!(generator.len(), 4);
        assert!(moves_of(&generator).iter().all(|m| m.source() != Square::E2));
    }

    #[test]
    fn every_root_move_is_legal() {
        let board: Board = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1"
            .parse()
            .unwrap();
        let generator = RootMoveGenerator::new(&board);
        for mv in moves_of(&generator) {
            assert!(!board.leaves_king_in_check(mv), "illegal root move {mv}");
        }
    }

    #[test]
    fn winning_capture_sorts_to_the_front() {
        // Pawn takes an undefended queen.
        let board: Board = "4k3/8/8/3q4/4P3/8/8/4K3 w - - 0 1".parse().unwrap();
        let generator = RootMoveGenerator::new(&board);
        let first = generator.entries()[0];
        assert_eq!(first.mv.captured(), Some(PieceKind::Queen));
        assert!(first.score > 0);
    }

    #[test]
    fn single_check_evasion_is_forced() {
        // Only Rxe8 answers the back-rank check.
        let board: Board = "r3R1k1/5ppp/8/8/8/8/5PPP/6K1 b - - 0 1".parse().unwrap();
        assert!(board.in_check());
        let generator = RootMoveGenerator::new(&board);
        assert_eq!(generator.len(), 1);
        assert!(generator.entries()[0].mv.is_forced());
    }

    #[test]
    fn reorder_moves_pv_to_front_and_preserves_the_rest() {
        let board = Board::starting_position();
        let mut generator = RootMoveGenerator::new(&board);
        let before = moves_of(&generator);
        let pv = before[7];

        generator.reorder(pv, 1);
        let after = moves_of(&generator);
        assert_eq!(after[0], pv);
        assert_eq!(after[0].phase_tag(), Phase::HashMove.tag());

        let mut expected = before.clone();
        expected.remove(7);
        assert_eq!(&after[1..], &expected[..], "non-PV order must be preserved");
    }

    #[test]
    fn reorder_with_absent_move_keeps_order() {
        let board = Board::starting_position();
        let mut generator = RootMoveGenerator::new(&board);
        let before = moves_of(&generator);

        // A move from a different position entirely.
        let absent = Move::new(Square::A5, Square::A6, PieceKind::Rook, None);
        generator.reorder(absent, 1);
        assert_eq!(moves_of(&generator), before);
    }

    #[test]
    fn reorder_tags_tactical_and_quiet_moves() {
        let board: Board = "4k3/8/8/3q4/4P3/8/8/4K3 w - - 0 1".parse().unwrap();
        let mut generator = RootMoveGenerator::new(&board);
        let capture = generator.entries()[0].mv;
        let quiet = moves_of(&generator)
            .into_iter()
            .find(|m| !m.is_capture())
            .unwrap();

        generator.reorder(quiet, 1);
        for entry in generator.entries() {
            let expected = if entry.mv == quiet {
                Phase::HashMove
            } else if entry.mv == capture {
                Phase::WinningCapture
            } else {
                Phase::History
            };
            assert_eq!(entry.mv.phase_tag(), expected.tag(), "wrong tag on {}", entry.mv);
        }
    }

    #[test]
    fn deep_reorder_sorts_tail_by_node_count() {
        let board = Board::starting_position();
        let mut generator = RootMoveGenerator::new(&board);
        let moves = moves_of(&generator);
        let pv = moves[0];
        let busy = moves[10];
        let busier = moves[15];
        generator.record_nodes(busy, 5_000);
        generator.record_nodes(busier, 9_000);
        generator.record_nodes(busier, 1_000);

        generator.reorder(pv, 4);
        let after = moves_of(&generator);
        assert_eq!(after[0], pv);
        assert_eq!(after[1], busier, "10k nodes should lead the tail");
        assert_eq!(after[2], busy);

        // Unsearched moves keep their relative order behind the busy ones.
        let rest: Vec<Move> =
            moves.iter().copied().filter(|m| *m != pv && *m != busy && *m != busier).collect();
        assert_eq!(&after[3..], &rest[..]);
    }

    #[test]
    fn shallow_reorder_ignores_node_counts() {
        let board = Board::starting_position();
        let mut generator = RootMoveGenerator::new(&board);
        let moves = moves_of(&generator);
        generator.record_nodes(moves[12], 50_000);

        generator.reorder(moves[0], 3);
        assert_eq!(moves_of(&generator), moves, "depth < 4 must not resort the tail");
    }

    #[test]
    fn excluded_moves_are_skipped_not_removed() {
        let board = Board::starting_position();
        let mut generator = RootMoveGenerator::new(&board);
        let skipped = moves_of(&generator)[3];

        generator.exclude(skipped);
        assert_eq!(generator.len(), 20);
        let iterated = drain(&mut generator);
        assert_eq!(iterated.len(), 19);
        assert!(iterated.iter().all(|m| *m != skipped));
    }

    #[test]
    fn exclude_all_replaces_the_exclusion_set() {
        let board = Board::starting_position();
        let mut generator = RootMoveGenerator::new(&board);
        let moves = moves_of(&generator);

        generator.exclude(moves[0]);
        generator.exclude_all(&[moves[1], moves[2]]);
        let iterated = drain(&mut generator);
        // moves[0] is no longer excluded; the new set is.
        assert!(iterated.contains(&moves[0]));
        assert!(!iterated.contains(&moves[1]));
        assert!(!iterated.contains(&moves[2]));
        assert_eq!(iterated.len(), 18);
    }

    #[test]
    fn reset_restarts_iteration() {
        let board = Board::starting_position();
        let mut generator = RootMoveGenerator::new(&board);
        let first = generator.next();
        generator.next();
        generator.reset();
        assert_eq!(generator.next(), first);
    }

    #[test]
    fn record_nodes_accumulates_per_move() {
        let board = Board::starting_position();
        let mut generator = RootMoveGenerator::new(&board);
        let mv = moves_of(&generator)[4];
        generator.record_nodes(mv, 100);
        generator.record_nodes(mv, 250);
        let entry = generator.entries().iter().find(|e| e.mv == mv).unwrap();
        assert_eq!(entry.nodes, 350);
    }
}
