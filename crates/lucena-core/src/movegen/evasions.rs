//! Check evasion generation.
//!
//! The in-check move set is built with its own legality reasoning instead of
//! the pseudo-legal capture/quiet split: interpositions only exist against
//! sliders, double check permits king moves only, and king destinations must
//! be judged with the king lifted off its square so slider rays extend
//! through it.

use crate::attacks::{
    between, bishop_attacks, king_attacks, knight_attacks, line, pawn_attacks, rook_attacks,
};
use crate::bitboard::Bitboard;
use crate::board::Board;
use crate::chess_move::Move;
use crate::color::Color;
use crate::piece_kind::PieceKind;
use crate::square::Square;

use super::pins::checkers_and_pinned;
use super::{MoveList, PROMOTION_KINDS};

/// Generate every legal move for a side whose king is in check.
///
/// Debug-asserts that the side to move really is in check.
pub fn generate_evasions(board: &Board, list: &mut MoveList) {
    let us = board.side_to_move();
    let them = us.flip();
    let king_sq = board.king_square(us);
    let occupied = board.occupied();
    let (checkers, pinned) = checkers_and_pinned(board);

    debug_assert!(checkers.is_nonempty(), "evasion generation without a checker");

    if checkers.count() == 1 {
        let checker_sq = match checkers.lsb() {
            Some(sq) => sq,
            None => return,
        };
        let checker_kind = board.piece_on(checker_sq);
        let between_bb = between(king_sq, checker_sq);

        capture_checker(board, list, checker_sq, king_sq, pinned);
        en_passant_evasions(board, list, checker_sq, king_sq, pinned, between_bb);
        if between_bb.is_nonempty() {
            debug_assert!(matches!(
                checker_kind,
                Some(PieceKind::Bishop | PieceKind::Rook | PieceKind::Queen)
            ));
            interpose(board, list, king_sq, pinned, between_bb);
        }
    }

    // King flight squares, double or single check alike. The king's own
    // square is removed from the occupancy so a slider's ray keeps going
    // through where the king stood: stepping down-ray from a rook is no
    // escape.
    let occ_no_king = occupied.without(king_sq);
    for dst in king_attacks(king_sq) & !board.side(us) {
        if !board.is_square_attacked_with_occ(dst, them, occ_no_king) {
            list.push(Move::new(king_sq, dst, PieceKind::King, board.piece_on(dst)));
        }
    }
}

/// Captures of the single checking piece by non-king pieces. The king's own
/// capture of the checker is a flight square and is generated with the other
/// king moves.
fn capture_checker(
    board: &Board,
    list: &mut MoveList,
    checker_sq: Square,
    king_sq: Square,
    pinned: Bitboard,
) {
    let us = board.side_to_move();
    let occupied = board.occupied();
    let checker_kind = board.piece_on(checker_sq);
    let promo_rank = match us {
        Color::White => Bitboard::RANK_8,
        Color::Black => Bitboard::RANK_1,
    };

    let capturers =
        (board.attackers_to(checker_sq, occupied) & board.side(us)).without(king_sq);
    for src in capturers {
        if pinned.contains(src) && !line(king_sq, src).contains(checker_sq) {
            continue;
        }
        let kind = match board.piece_on(src) {
            Some(kind) => kind,
            None => continue,
        };
        if kind == PieceKind::Pawn && promo_rank.contains(checker_sq) {
            for promo in PROMOTION_KINDS {
                list.push(Move::promotion(src, checker_sq, checker_kind, promo));
            }
        } else {
            list.push(Move::new(src, checker_sq, kind, checker_kind));
        }
    }
}

/// En passant as an evasion: legal when the captured pawn is itself the
/// checker, or when the landing square blocks the check ray.
fn en_passant_evasions(
    board: &Board,
    list: &mut MoveList,
    checker_sq: Square,
    king_sq: Square,
    pinned: Bitboard,
    between_bb: Bitboard,
) {
    let us = board.side_to_move();
    let them = us.flip();
    let occupied = board.occupied();

    let Some(ep_sq) = board.en_passant() else { return };
    let behind = if us == Color::White { ep_sq.try_offset(-8) } else { ep_sq.try_offset(8) };
    let Some(captured_sq) = behind else { return };

    if captured_sq != checker_sq && !between_bb.contains(ep_sq) {
        return;
    }

    let our_pawns = board.pieces(PieceKind::Pawn) & board.side(us);
    for src in pawn_attacks(them, ep_sq) & our_pawns {
        if pinned.contains(src) && !line(king_sq, src).contains(ep_sq) {
            continue;
        }
        // Both pawns leave their rank at once; make sure no rook or queen
        // x-rays the king through the two vacated squares.
        let after_occ =
            (occupied ^ src.bitboard() ^ captured_sq.bitboard()) | ep_sq.bitboard();
        let their_rook_queen =
            (board.pieces(PieceKind::Rook) | board.pieces(PieceKind::Queen)) & board.side(them);
        if (rook_attacks(king_sq, after_occ) & their_rook_queen).is_nonempty() {
            continue;
        }
        list.push(Move::en_passant(src, ep_sq));
    }
}

/// Interpositions on the ray between a sliding checker and the king.
fn interpose(
    board: &Board,
    list: &mut MoveList,
    king_sq: Square,
    pinned: Bitboard,
    between_bb: Bitboard,
) {
    let us = board.side_to_move();
    let friendly = board.side(us);
    let occupied = board.occupied();
    let empty = !occupied;
    let our_pawns = board.pieces(PieceKind::Pawn) & friendly;

    // Pawn blocks: single pushes, double pushes, and the rare push-promotion
    // that lands on the ray.
    let (promo_rank, singles, doubles, delta) = match us {
        Color::White => {
            let singles = (our_pawns << 8) & empty;
            let doubles = ((singles & Bitboard::RANK_3) << 8) & empty;
            (Bitboard::RANK_8, singles, doubles, -8i8)
        }
        Color::Black => {
            let singles = (our_pawns >> 8) & empty;
            let doubles = ((singles & Bitboard::RANK_6) >> 8) & empty;
            (Bitboard::RANK_1, singles, doubles, 8i8)
        }
    };

    for dst in singles & between_bb {
        let Some(src) = dst.try_offset(delta) else { continue };
        if pinned.contains(src) && !line(king_sq, src).contains(dst) {
            continue;
        }
        if promo_rank.contains(dst) {
            for promo in PROMOTION_KINDS {
                list.push(Move::promotion(src, dst, None, promo));
            }
        } else {
            list.push(Move::new(src, dst, PieceKind::Pawn, None));
        }
    }
    for dst in doubles & between_bb {
        let Some(src) = dst.try_offset(delta * 2) else { continue };
        if pinned.contains(src) && !line(king_sq, src).contains(dst) {
            continue;
        }
        list.push(Move::new(src, dst, PieceKind::Pawn, None));
    }

    // Piece blocks. Pinned knights can never move; pinned sliders only along
    // their pin ray, which the line test enforces.
    for src in board.pieces(PieceKind::Knight) & friendly {
        if pinned.contains(src) {
            continue;
        }
        for dst in knight_attacks(src) & between_bb {
            list.push(Move::new(src, dst, PieceKind::Knight, None));
        }
    }
    for (kind, attacks) in [
        (PieceKind::Bishop, bishop_attacks as fn(Square, Bitboard) -> Bitboard),
        (PieceKind::Rook, rook_attacks as fn(Square, Bitboard) -> Bitboard),
    ] {
        for src in board.pieces(kind) & friendly {
            for dst in attacks(src, occupied) & between_bb {
                if pinned.contains(src) && !line(king_sq, src).contains(dst) {
                    continue;
                }
                list.push(Move::new(src, dst, kind, None));
            }
        }
    }
    for src in board.pieces(PieceKind::Queen) & friendly {
        for dst in (rook_attacks(src, occupied) | bishop_attacks(src, occupied)) & between_bb {
            if pinned.contains(src) && !line(king_sq, src).contains(dst) {
                continue;
            }
            list.push(Move::new(src, dst, PieceKind::Queen, None));
        }
    }
}
