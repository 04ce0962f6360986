//! Pseudo-legal capture generation: captures, promotions, en passant.

use crate::attacks::{bishop_attacks, king_attacks, knight_attacks, pawn_attacks, rook_attacks};
use crate::bitboard::Bitboard;
use crate::board::Board;
use crate::chess_move::Move;
use crate::color::Color;
use crate::piece_kind::PieceKind;

use super::{MoveList, PROMOTION_KINDS};

/// Generate all pseudo-legal captures, every promotion (capturing or not),
/// and en passant. Together with the quiet generator this covers the full
/// pseudo-legal move set exactly once.
pub fn generate_captures(board: &Board, list: &mut MoveList) {
    let us = board.side_to_move();
    let them = us.flip();
    let friendly = board.side(us);
    let enemy = board.side(them);
    let occupied = board.occupied();
    let our_pawns = board.pieces(PieceKind::Pawn) & friendly;

    let promo_from = match us {
        Color::White => Bitboard::RANK_7,
        Color::Black => Bitboard::RANK_2,
    };

    // Pawn captures, promoting when they start on the seventh rank.
    for src in our_pawns {
        let promoting = promo_from.contains(src);
        for dst in pawn_attacks(us, src) & enemy {
            let captured = board.piece_on(dst);
            if promoting {
                for promo in PROMOTION_KINDS {
                    list.push(Move::promotion(src, dst, captured, promo));
                }
            } else {
                list.push(Move::new(src, dst, PieceKind::Pawn, captured));
            }
        }
    }

    // Non-capturing promotions: the push to the back rank belongs with the
    // tactical batch, not with the quiets.
    let push_targets = match us {
        Color::White => ((our_pawns & promo_from) << 8) & !occupied,
        Color::Black => ((our_pawns & promo_from) >> 8) & !occupied,
    };
    for dst in push_targets {
        let delta = if us == Color::White { -8 } else { 8 };
        let Some(src) = dst.try_offset(delta) else { continue };
        for promo in PROMOTION_KINDS {
            list.push(Move::promotion(src, dst, None, promo));
        }
    }

    // En passant; legality against discovered checks is the caller's problem,
    // like every other pseudo-legal move here.
    if let Some(ep_sq) = board.en_passant() {
        for src in pawn_attacks(them, ep_sq) & our_pawns {
            list.push(Move::en_passant(src, ep_sq));
        }
    }

    // Knights.
    for src in board.pieces(PieceKind::Knight) & friendly {
        for dst in knight_attacks(src) & enemy {
            list.push(Move::new(src, dst, PieceKind::Knight, board.piece_on(dst)));
        }
    }

    // Sliders.
    for src in board.pieces(PieceKind::Bishop) & friendly {
        for dst in bishop_attacks(src, occupied) & enemy {
            list.push(Move::new(src, dst, PieceKind::Bishop, board.piece_on(dst)));
        }
    }
    for src in board.pieces(PieceKind::Rook) & friendly {
        for dst in rook_attacks(src, occupied) & enemy {
            list.push(Move::new(src, dst, PieceKind::Rook, board.piece_on(dst)));
        }
    }
    for src in board.pieces(PieceKind::Queen) & friendly {
        for dst in (rook_attacks(src, occupied) | bishop_attacks(src, occupied)) & enemy {
            list.push(Move::new(src, dst, PieceKind::Queen, board.piece_on(dst)));
        }
    }

    // King.
    let king_sq = board.king_square(us);
    for dst in king_attacks(king_sq) & enemy {
        list.push(Move::new(king_sq, dst, PieceKind::King, board.piece_on(dst)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chess_move::MoveTag;
    use crate::square::Square;

    fn captures(fen: &str) -> MoveList {
        let board: Board = fen.parse().unwrap();
        let mut list = MoveList::new();
        generate_captures(&board, &mut list);
        list
    }

    #[test]
    fn starting_position_has_none() {
        assert!(captures("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1").is_empty());
    }

    #[test]
    fn pawn_capture_records_victim() {
        let list = captures("4k3/8/8/3p4/4P3/8/8/4K3 w - - 0 1");
        assert_eq!(list.len(), 1);
        let mv = list[0];
        assert_eq!(mv.source(), Square::E4);
        assert_eq!(mv.dest(), Square::D5);
        assert_eq!(mv.captured(), Some(PieceKind::Pawn));
    }

    #[test]
    fn promotion_push_generates_four() {
        let list = captures("4k3/P7/8/8/8/8/8/4K3 w - - 0 1");
        assert_eq!(list.len(), 4);
        assert!(list.iter().all(|m| m.is_promotion() && !m.is_capture()));
    }

    #[test]
    fn capture_promotion_generates_four_per_target() {
        // Pawn on e7 can capture d8 or f8, or push e8: 12 promotions.
        let list = captures("3r1r2/4P3/8/8/8/8/8/k3K3 w - - 0 1");
        assert_eq!(list.len(), 12);
        assert!(list.iter().all(|m| m.is_promotion()));
        assert_eq!(list.iter().filter(|m| m.is_capture()).count(), 8);
    }

    #[test]
    fn en_passant_from_both_sides() {
        let list = captures("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 1");
        let ep: Vec<_> = list.iter().filter(|m| m.tag() == MoveTag::EnPassant).collect();
        assert_eq!(ep.len(), 1);
        assert_eq!(ep[0].dest(), Square::D6);

        let list = captures("4k3/8/8/2PpP3/8/8/8/4K3 w - d6 0 1");
        assert_eq!(list.iter().filter(|m| m.tag() == MoveTag::EnPassant).count(), 2);
    }

    #[test]
    fn slider_captures_stop_at_blockers() {
        // Rook a1 sees the pawn on a4 but not the rook behind it on a7.
        let list = captures("4k3/r7/8/8/p7/8/8/R3K3 w - - 0 1");
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].dest(), Square::A4);
    }

    #[test]
    fn pinned_pieces_still_capture_here() {
        // Pseudo-legal: the pinned knight's capture is generated; filtering
        // is the caller's job.
        let board: Board = "4r2k/8/8/8/3p4/8/4N3/4K3 w - - 0 1".parse().unwrap();
        let mut list = MoveList::new();
        generate_captures(&board, &mut list);
        assert!(list.iter().any(|m| m.source() == Square::E2));
    }
}
