//! Validation of externally supplied candidate moves.
//!
//! Hash moves and killer moves arrive from tables keyed by position hash or
//! ply, so they may belong to a different position entirely. Before a
//! generator may emit one, every encoded field has to be checked against the
//! actual board.

use crate::attacks::{bishop_attacks, king_attacks, knight_attacks, pawn_attacks, rook_attacks};
use crate::board::Board;
use crate::castle_rights::CastleSide;
use crate::chess_move::{Move, MoveTag};
use crate::color::Color;
use crate::piece_kind::PieceKind;

use super::quiets::castle_legal;

/// `true` if `mv` is pseudo-legal in this position: the encoded piece is
/// really standing on the source square, the captured-piece field matches
/// the destination, and the geometry works. Leaving one's own king in check
/// is not tested, matching the rest of the pseudo-legal surface; castling is
/// the exception and is verified fully, as the generators do.
pub fn is_pseudo_legal(board: &Board, mv: Move) -> bool {
    if mv.is_null() {
        return false;
    }

    let us = board.side_to_move();
    let src = mv.source();
    let dst = mv.dest();

    let Some(moving) = board.piece_on(src) else {
        return false;
    };
    if board.color_on(src) != Some(us) || moving != mv.moving() {
        return false;
    }

    match mv.tag() {
        MoveTag::CastleKing => {
            mv == Move::castle(us, CastleSide::KingSide) && castle_legal(board, CastleSide::KingSide)
        }
        MoveTag::CastleQueen => {
            mv == Move::castle(us, CastleSide::QueenSide)
                && castle_legal(board, CastleSide::QueenSide)
        }
        MoveTag::EnPassant => {
            moving == PieceKind::Pawn
                && board.en_passant() == Some(dst)
                && pawn_attacks(us, src).contains(dst)
        }
        MoveTag::Promotion | MoveTag::None => {
            // The captured-piece field must agree with what stands on the
            // destination: a stale "quiet" candidate whose target square has
            // since been occupied is not this position's move.
            match (board.piece_on(dst), board.color_on(dst)) {
                (Some(_), Some(color)) if color == us => return false,
                (victim, _) => {
                    if mv.captured() != victim {
                        return false;
                    }
                }
            }

            let promo_rank = match us {
                Color::White => crate::rank::Rank::R8,
                Color::Black => crate::rank::Rank::R1,
            };
            if mv.tag() == MoveTag::Promotion {
                if moving != PieceKind::Pawn || dst.rank() != promo_rank || mv.promotion().is_none()
                {
                    return false;
                }
            } else if moving == PieceKind::Pawn && dst.rank() == promo_rank {
                // A pawn reaching the back rank must promote.
                return false;
            }

            match moving {
                PieceKind::Pawn => pawn_reaches(board, us, mv),
                PieceKind::Knight => knight_attacks(src).contains(dst),
                PieceKind::King => king_attacks(src).contains(dst),
                PieceKind::Bishop => bishop_attacks(src, board.occupied()).contains(dst),
                PieceKind::Rook => rook_attacks(src, board.occupied()).contains(dst),
                PieceKind::Queen => {
                    (rook_attacks(src, board.occupied())
                        | bishop_attacks(src, board.occupied()))
                    .contains(dst)
                }
            }
        }
    }
}

/// Pawn geometry for a non-en-passant move: a diagonal step must capture, a
/// file step must be a clear single or double push.
fn pawn_reaches(board: &Board, us: Color, mv: Move) -> bool {
    let src = mv.source();
    let dst = mv.dest();
    let occupied = board.occupied();

    if mv.is_capture() {
        return pawn_attacks(us, src).contains(dst);
    }

    if src.file() != dst.file() || occupied.contains(dst) {
        return false;
    }
    let (single, double, start_rank) = match us {
        Color::White => (8i8, 16i8, crate::rank::Rank::R2),
        Color::Black => (-8i8, -16i8, crate::rank::Rank::R7),
    };
    if src.try_offset(single) == Some(dst) {
        return true;
    }
    if src.try_offset(double) == Some(dst) && src.rank() == start_rank {
        // The square passed over must be empty too.
        return src.try_offset(single).is_some_and(|mid| !occupied.contains(mid));
    }
    false
}

#[cfg(test)]
mod tests {
    use super::is_pseudo_legal;
    use crate::board::Board;
    use crate::castle_rights::CastleSide;
    use crate::chess_move::Move;
    use crate::color::Color;
    use crate::piece_kind::PieceKind;
    use crate::square::Square;

    #[test]
    fn accepts_ordinary_opening_moves() {
        let board = Board::starting_position();
        assert!(is_pseudo_legal(&board, Move::new(Square::E2, Square::E4, PieceKind::Pawn, None)));
        assert!(is_pseudo_legal(&board, Move::new(Square::E2, Square::E3, PieceKind::Pawn, None)));
        assert!(is_pseudo_legal(&board, Move::new(Square::G1, Square::F3, PieceKind::Knight, None)));
    }

    #[test]
    fn rejects_wrong_side_and_empty_source() {
        let board = Board::starting_position();
        assert!(!is_pseudo_legal(&board, Move::new(Square::E7, Square::E5, PieceKind::Pawn, None)));
        assert!(!is_pseudo_legal(&board, Move::new(Square::E4, Square::E5, PieceKind::Pawn, None)));
    }

    #[test]
    fn rejects_mismatched_moving_piece() {
        let board = Board::starting_position();
        // There is a knight on g1, not a bishop.
        assert!(!is_pseudo_legal(&board, Move::new(Square::G1, Square::F3, PieceKind::Bishop, None)));
    }

    #[test]
    fn rejects_stale_quiet_when_destination_occupied() {
        let board: Board = "4k3/8/8/3p4/8/3R4/8/4K3 w - - 0 1".parse().unwrap();
        // Rd3-d5 encoded as quiet, but a pawn now stands on d5.
        assert!(!is_pseudo_legal(&board, Move::new(Square::D3, Square::D5, PieceKind::Rook, None)));
        // The same move encoded as a capture of the pawn is fine.
        assert!(is_pseudo_legal(
            &board,
            Move::new(Square::D3, Square::D5, PieceKind::Rook, Some(PieceKind::Pawn))
        ));
    }

    #[test]
    fn rejects_blocked_slider_path() {
        let board = Board::starting_position();
        assert!(!is_pseudo_legal(&board, Move::new(Square::A1, Square::A5, PieceKind::Rook, None)));
        assert!(!is_pseudo_legal(&board, Move::new(Square::C1, Square::G5, PieceKind::Bishop, None)));
    }

    #[test]
    fn rejects_blocked_double_push() {
        let board: Board = "4k3/8/8/8/8/4n3/4P3/4K3 w - - 0 1".parse().unwrap();
        assert!(!is_pseudo_legal(&board, Move::new(Square::E2, Square::E4, PieceKind::Pawn, None)));
        assert!(!is_pseudo_legal(&board, Move::new(Square::E2, Square::E3, PieceKind::Pawn, None)));
    }

    #[test]
    fn en_passant_requires_matching_target() {
        let with_ep: Board = "4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 1".parse().unwrap();
        assert!(is_pseudo_legal(&with_ep, Move::en_passant(Square::E5, Square::D6)));

        let without_ep: Board = "4k3/8/8/3pP3/8/8/8/4K3 w - - 0 1".parse().unwrap();
        assert!(!is_pseudo_legal(&without_ep, Move::en_passant(Square::E5, Square::D6)));
    }

    #[test]
    fn castle_checked_fully() {
        let open: Board = "r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1".parse().unwrap();
        assert!(is_pseudo_legal(&open, Move::castle(Color::White, CastleSide::KingSide)));

        // Same squares, but the right is gone.
        let no_right: Board = "r3k2r/8/8/8/8/8/8/R3K2R w Qkq - 0 1".parse().unwrap();
        assert!(!is_pseudo_legal(&no_right, Move::castle(Color::White, CastleSide::KingSide)));
    }

    #[test]
    fn promotion_requires_back_rank() {
        let board: Board = "4k3/P7/8/8/8/8/8/4K3 w - - 0 1".parse().unwrap();
        assert!(is_pseudo_legal(
            &board,
            Move::promotion(Square::A7, Square::A8, None, PieceKind::Queen)
        ));
        // A quiet encoding of the same push is rejected.
        assert!(!is_pseudo_legal(&board, Move::new(Square::A7, Square::A8, PieceKind::Pawn, None)));
    }
}
