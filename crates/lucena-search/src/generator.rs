//! The incremental move generator.
//!
//! One instance serves one search node. Away from check it walks the phase
//! machine — hash move, winning captures, killers, history-ordered quiets,
//! deferred losing captures — generating one batch per phase and yielding
//! moves from it, so a node that cuts off early never pays for batches it
//! never reaches. In check it runs a single eagerly built evasion batch
//! instead. The two paths never mix within one instance.

use lucena_core::{
    generate_captures, generate_evasions, generate_quiets, is_pseudo_legal, Board, Move, MoveList,
};

use crate::heuristics::SearchContext;
use crate::ordering::mvv_lva;
use crate::phase::Phase;
use crate::see::{piece_value, see};
use crate::sort::sort_moves;

/// Captures that cannot lose material skip exchange evaluation: when the
/// victim is worth at least the attacker, stopping after the first capture
/// already breaks even. Promotions always get the full treatment — the new
/// piece may simply be taken.
#[inline]
fn may_lose_material(mv: Move) -> bool {
    if mv.is_promotion() {
        return true;
    }
    match mv.captured() {
        Some(victim) => piece_value(victim) < piece_value(mv.moving()),
        None => false,
    }
}

/// Phased move generator for a single node.
pub struct MoveGenerator<'a> {
    board: &'a Board,
    context: Option<&'a SearchContext>,
    ply: usize,
    hash_move: Move,
    phase: Phase,
    batch: MoveList,
    index: usize,
    /// Negative-exchange captures diverted during the winning-capture phase,
    /// re-emitted by the losers phase in their original order.
    losers: MoveList,
    /// Killer candidates: slots 1 and 2 for the current ply, then for two
    /// plies back. Fetched once, when the first killer phase runs.
    killers: [Move; 4],
    evasions_ready: bool,
}

impl<'a> MoveGenerator<'a> {
    /// A generator for one node. `hash_move` is the transposition candidate
    /// to try first (pass [`Move::NULL`] for none); `context` supplies the
    /// killer and history tables, or `None` to order without them.
    pub fn new(
        board: &'a Board,
        context: Option<&'a SearchContext>,
        ply: usize,
        hash_move: Move,
    ) -> MoveGenerator<'a> {
        MoveGenerator {
            board,
            context,
            ply,
            hash_move,
            phase: Phase::Start,
            batch: MoveList::new(),
            index: 0,
            losers: MoveList::new(),
            killers: [Move::NULL; 4],
            evasions_ready: false,
        }
    }

    /// The phase the last emitted move came from.
    #[inline]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// The next move in heuristic-best-first order, or [`Move::NULL`] when
    /// the position is exhausted. Normal path only; an in-check node must
    /// use [`next_evasion`](Self::next_evasion) instead.
    pub fn next_move(&mut self) -> Move {
        debug_assert!(!self.evasions_ready, "generator is on the evasion path");
        loop {
            if self.index >= self.batch.len() {
                if self.phase >= Phase::Losers {
                    self.phase = Phase::Last;
                    return Move::NULL;
                }
                self.refill();
                if self.batch.is_empty() {
                    self.phase = Phase::Last;
                    return Move::NULL;
                }
            }
            let mv = self.batch[self.index];
            self.index += 1;
            match self.phase {
                Phase::WinningCapture => {
                    if mv == self.hash_move {
                        continue;
                    }
                    if may_lose_material(mv) && see(self.board, mv) < 0 {
                        let mut loser = mv;
                        loser.set_phase_tag(Phase::Losers.tag());
                        self.losers.push(loser);
                        continue;
                    }
                    return mv;
                }
                Phase::History => {
                    if mv.is_used() {
                        continue;
                    }
                    return mv;
                }
                _ => return mv,
            }
        }
    }

    /// Advance the phase machine until some phase produces a batch, or the
    /// losers phase has been reached. Empty phases are stepped over.
    fn refill(&mut self) {
        self.batch.clear();
        self.index = 0;
        while self.batch.is_empty() && self.phase < Phase::Losers {
            self.phase = self.phase.successor();
            match self.phase {
                Phase::HashMove => {
                    if !self.hash_move.is_null() && is_pseudo_legal(self.board, self.hash_move) {
                        let mut mv = self.hash_move;
                        mv.set_phase_tag(Phase::HashMove.tag());
                        self.batch.push(mv);
                    }
                }
                Phase::WinningCapture => {
                    generate_captures(self.board, &mut self.batch);
                    let n = self.batch.len();
                    if n > 1 {
                        let mut scores = [0i32; MoveList::CAPACITY];
                        for i in 0..n {
                            scores[i] = mvv_lva(self.batch[i]);
                        }
                        sort_moves(self.batch.as_mut_slice(), &mut scores[..n]);
                    }
                    for mv in self.batch.as_mut_slice() {
                        mv.set_phase_tag(Phase::WinningCapture.tag());
                    }
                }
                Phase::Killer1 => {
                    let Some(context) = self.context else { continue };
                    let (k1, k2) = context.killers.get(self.ply);
                    let (k3, k4) = if self.ply >= 2 {
                        context.killers.get(self.ply - 2)
                    } else {
                        (Move::NULL, Move::NULL)
                    };
                    self.killers = [k1, k2, k3, k4];
                    self.push_killer(k1, &[self.hash_move]);
                    self.push_killer(k3, &[self.hash_move, k1]);
                }
                Phase::Killer2 => {
                    if self.context.is_none() {
                        continue;
                    }
                    let [k1, k2, k3, k4] = self.killers;
                    self.push_killer(k2, &[self.hash_move, k3]);
                    self.push_killer(k4, &[self.hash_move, k1, k2]);
                }
                Phase::History => {
                    generate_quiets(self.board, &mut self.batch);
                    let n = self.batch.len();
                    if n > 0 {
                        let mut scores = [0i32; MoveList::CAPACITY];
                        let side = self.board.side_to_move();
                        for i in 0..n {
                            let mv = self.batch[i];
                            if mv == self.hash_move || self.killers.contains(&mv) {
                                self.batch[i].set_used();
                                continue;
                            }
                            self.batch[i].set_phase_tag(Phase::History.tag());
                            if let Some(context) = self.context {
                                scores[i] =
                                    context.history.score(side, mv.moving(), mv.dest().index());
                            }
                        }
                        if n > 1 {
                            sort_moves(self.batch.as_mut_slice(), &mut scores[..n]);
                        }
                    }
                }
                Phase::Losers => {
                    std::mem::swap(&mut self.batch, &mut self.losers);
                }
                Phase::Start | Phase::Last => break,
            }
        }
    }

    /// Offer one killer candidate: it must be non-null, distinct from every
    /// move in `already`, and pseudo-legal on this board.
    fn push_killer(&mut self, killer: Move, already: &[Move]) {
        if killer.is_null() || already.contains(&killer) {
            return;
        }
        if is_pseudo_legal(self.board, killer) {
            let mut mv = killer;
            mv.set_phase_tag(self.phase.tag());
            self.batch.push(mv);
        }
    }

    /// The next check evasion, or [`Move::NULL`] when none remain. The full
    /// evasion set is built on the first call: capture-or-promotion evasions
    /// are scored by exchange evaluation and the batch is sorted whenever
    /// more than one capture wins material or any capture loses it. A lone
    /// evasion is tagged forced; exactly two are tagged as a forced pair.
    pub fn next_evasion(&mut self) -> Move {
        debug_assert!(self.phase == Phase::Start, "generator is on the normal path");
        if !self.evasions_ready {
            self.evasions_ready = true;
            generate_evasions(self.board, &mut self.batch);
            let n = self.batch.len();
            if n == 1 {
                self.batch[0].set_forced();
            } else if n > 1 {
                let mut scores = [0i32; MoveList::CAPACITY];
                let mut winning = 0usize;
                let mut losing = 0usize;
                for i in 0..n {
                    let mv = self.batch[i];
                    if mv.is_capture_or_promotion() {
                        let score = see(self.board, mv);
                        scores[i] = score;
                        if score > 0 {
                            winning += 1;
                        } else if score < 0 {
                            losing += 1;
                        }
                    }
                    if n == 2 {
                        self.batch[i].set_forced_pair();
                    }
                }
                if winning > 1 || losing > 0 {
                    sort_moves(self.batch.as_mut_slice(), &mut scores[..n]);
                }
            }
        }
        if self.index < self.batch.len() {
            let mv = self.batch[self.index];
            self.index += 1;
            mv
        } else {
            Move::NULL
        }
    }
}
