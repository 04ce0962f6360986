//! Pseudo-legal quiet move generation: castling, piece moves, pawn pushes.

use crate::attacks::{bishop_attacks, king_attacks, knight_attacks, rook_attacks};
use crate::bitboard::Bitboard;
use crate::board::Board;
use crate::castle_rights::CastleSide;
use crate::chess_move::Move;
use crate::color::Color;
use crate::piece_kind::PieceKind;
use crate::square::Square;

use super::MoveList;

/// Generate all pseudo-legal non-captures except promotions, which belong to
/// the capture batch. Castling is emitted fully legal: rights, empty path,
/// not in check, and no attacked transit square.
pub fn generate_quiets(board: &Board, list: &mut MoveList) {
    let us = board.side_to_move();
    let them = us.flip();
    let friendly = board.side(us);
    let occupied = board.occupied();
    let empty = !occupied;

    if castle_legal(board, CastleSide::KingSide) {
        list.push(Move::castle(us, CastleSide::KingSide));
    }
    if castle_legal(board, CastleSide::QueenSide) {
        list.push(Move::castle(us, CastleSide::QueenSide));
    }

    // Knights.
    for src in board.pieces(PieceKind::Knight) & friendly {
        for dst in knight_attacks(src) & empty {
            list.push(Move::new(src, dst, PieceKind::Knight, None));
        }
    }

    // King steps. Squares adjacent to the enemy king can never be legal, so
    // they are dropped here rather than left for the search to refute.
    let king_sq = board.king_square(us);
    let their_king = board.king_square(them);
    for dst in king_attacks(king_sq) & empty & !king_attacks(their_king) {
        list.push(Move::new(king_sq, dst, PieceKind::King, None));
    }

    // Sliders.
    for src in board.pieces(PieceKind::Bishop) & friendly {
        for dst in bishop_attacks(src, occupied) & empty {
            list.push(Move::new(src, dst, PieceKind::Bishop, None));
        }
    }
    for src in board.pieces(PieceKind::Rook) & friendly {
        for dst in rook_attacks(src, occupied) & empty {
            list.push(Move::new(src, dst, PieceKind::Rook, None));
        }
    }
    for src in board.pieces(PieceKind::Queen) & friendly {
        for dst in (rook_attacks(src, occupied) | bishop_attacks(src, occupied)) & empty {
            list.push(Move::new(src, dst, PieceKind::Queen, None));
        }
    }

    // Pawn pushes, excluding the promotion rank.
    let our_pawns = board.pieces(PieceKind::Pawn) & friendly;
    match us {
        Color::White => {
            let singles = ((our_pawns << 8) & empty) & !Bitboard::RANK_8;
            for dst in singles {
                if let Some(src) = dst.try_offset(-8) {
                    list.push(Move::new(src, dst, PieceKind::Pawn, None));
                }
            }
            let doubles = ((singles & Bitboard::RANK_3) << 8) & empty;
            for dst in doubles {
                if let Some(src) = dst.try_offset(-16) {
                    list.push(Move::new(src, dst, PieceKind::Pawn, None));
                }
            }
        }
        Color::Black => {
            let singles = ((our_pawns >> 8) & empty) & !Bitboard::RANK_1;
            for dst in singles {
                if let Some(src) = dst.try_offset(8) {
                    list.push(Move::new(src, dst, PieceKind::Pawn, None));
                }
            }
            let doubles = ((singles & Bitboard::RANK_6) >> 8) & empty;
            for dst in doubles {
                if let Some(src) = dst.try_offset(16) {
                    list.push(Move::new(src, dst, PieceKind::Pawn, None));
                }
            }
        }
    }
}

/// Full castling legality for the side to move: the right survives, the rook
/// is home, the path is clear, the king is not in check, and no square the
/// king crosses (destination included) is attacked.
pub(crate) fn castle_legal(board: &Board, side: CastleSide) -> bool {
    let us = board.side_to_move();
    let them = us.flip();
    if !board.castling().has(us, side) {
        return false;
    }

    let occupied = board.occupied();
    let our_rooks = board.pieces(PieceKind::Rook) & board.side(us);

    let (rook_home, path, king_transit) = match (us, side) {
        (Color::White, CastleSide::KingSide) => (
            Square::H1,
            [Some(Square::F1), Some(Square::G1), None],
            [Square::F1, Square::G1],
        ),
        (Color::White, CastleSide::QueenSide) => (
            Square::A1,
            [Some(Square::B1), Some(Square::C1), Some(Square::D1)],
            [Square::D1, Square::C1],
        ),
        (Color::Black, CastleSide::KingSide) => (
            Square::H8,
            [Some(Square::F8), Some(Square::G8), None],
            [Square::F8, Square::G8],
        ),
        (Color::Black, CastleSide::QueenSide) => (
            Square::A8,
            [Some(Square::B8), Some(Square::C8), Some(Square::D8)],
            [Square::D8, Square::C8],
        ),
    };

    if !our_rooks.contains(rook_home) {
        return false;
    }
    for sq in path.into_iter().flatten() {
        if occupied.contains(sq) {
            return false;
        }
    }
    if board.is_square_attacked(board.king_square(us), them) {
        return false;
    }
    for sq in king_transit {
        if board.is_square_attacked(sq, them) {
            return false;
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chess_move::MoveTag;

    fn quiets(fen: &str) -> MoveList {
        let board: Board = fen.parse().unwrap();
        let mut list = MoveList::new();
        generate_quiets(&board, &mut list);
        list
    }

    #[test]
    fn starting_position_twenty_moves() {
        let list = quiets("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1");
        assert_eq!(list.len(), 20);
        let doubles = list
            .iter()
            .filter(|m| m.dest().index().abs_diff(m.source().index()) == 16)
            .count();
        assert_eq!(doubles, 8);
    }

    #[test]
    fn both_castles_when_clear() {
        let list = quiets("r3k2r/pppppppp/8/8/8/8/PPPPPPPP/R3K2R w KQkq - 0 1");
        let castles: Vec<_> = list.iter().filter(|m| m.is_castle()).collect();
        assert_eq!(castles.len(), 2);
        assert!(castles.iter().any(|m| m.tag() == MoveTag::CastleKing));
        assert!(castles.iter().any(|m| m.tag() == MoveTag::CastleQueen));
    }

    #[test]
    fn no_castle_through_attacked_square() {
        // Bishop on a6 covers f1.
        let list = quiets("4k3/8/b7/8/8/8/8/R3K2R w KQ - 0 1");
        assert!(list.iter().all(|m| m.tag() != MoveTag::CastleKing));
        // Queenside transit (c1, d1) is not covered, so it survives.
        assert!(list.iter().any(|m| m.tag() == MoveTag::CastleQueen));
    }

    #[test]
    fn no_castle_while_in_check() {
        let list = quiets("4k3/8/8/8/8/8/4r3/R3K2R w KQ - 0 1");
        assert!(list.iter().all(|m| !m.is_castle()));
    }

    #[test]
    fn no_castle_without_rook_home() {
        // Rights claim KQ but the kingside rook is gone.
        let list = quiets("4k3/8/8/8/8/8/8/R3K3 w KQ - 0 1");
        assert!(list.iter().all(|m| m.tag() != MoveTag::CastleKing));
        assert!(list.iter().any(|m| m.tag() == MoveTag::CastleQueen));
    }

    #[test]
    fn king_avoids_enemy_king_zone() {
        let list = quiets("8/8/8/3k4/8/3K4/8/8 w - - 0 1");
        // d4, c4, e4 touch the black king on d5 and are excluded outright.
        assert!(list.iter().all(|m| {
            let d = m.dest();
            d != crate::square::Square::D4
                && d != crate::square::Square::C4
                && d != crate::square::Square::E4
        }));
        assert_eq!(list.len(), 5);
    }

    #[test]
    fn no_promotion_pushes_here() {
        let list = quiets("4k3/P7/8/8/8/8/8/4K3 w - - 0 1");
        assert!(list.iter().all(|m| m.source() != crate::square::Square::A7));
    }

    #[test]
    fn blocked_pawns_do_not_push() {
        let list = quiets("4k3/8/8/8/4p3/4P3/8/4K3 w - - 0 1");
        assert!(list.iter().all(|m| m.moving() != PieceKind::Pawn));
    }
}
