//! Static Exchange Evaluation: the material outcome of fighting over one
//! square, assuming each side recaptures with its least valuable attacker
//! and may stop whenever continuing loses material.

use lucena_core::{
    bishop_attacks, rook_attacks, Bitboard, Board, Color, Move, MoveTag, PieceKind, Square,
};

/// Material values indexed by [`PieceKind::index()`]. The king's value keeps
/// any "exchange" that ends with a king capture decisively winning.
pub const SEE_VALUE: [i32; PieceKind::COUNT] = [100, 320, 330, 500, 900, 20_000];

/// Material value of a piece kind.
#[inline]
pub const fn piece_value(kind: PieceKind) -> i32 {
    SEE_VALUE[kind.index()]
}

/// Least valuable attacker of `side` within `attackers`.
fn least_valuable(board: &Board, attackers: Bitboard, side: Color) -> Option<(Square, PieceKind)> {
    let side_attackers = attackers & board.side(side);
    for kind in PieceKind::ALL {
        if let Some(sq) = (side_attackers & board.pieces(kind)).lsb() {
            return Some((sq, kind));
        }
    }
    None
}

/// Net material gain of `mv` for the side to move after best-play captures
/// and recaptures on the destination square.
pub fn see(board: &Board, mv: Move) -> i32 {
    let src = mv.source();
    let dst = mv.dest();
    let mut occupied = board.occupied();

    let first_gain = match mv.tag() {
        MoveTag::EnPassant => piece_value(PieceKind::Pawn),
        _ => mv.captured().map_or(0, piece_value),
    };

    // After a promotion the piece standing on dst, and at stake for the
    // recapture, is the promoted one, and the pawn's value has been spent.
    let (stake, promo_bonus) = match mv.promotion() {
        Some(promo) => (piece_value(promo), piece_value(promo) - piece_value(PieceKind::Pawn)),
        None => (piece_value(mv.moving()), 0),
    };

    occupied = occupied.without(src);
    if mv.tag() == MoveTag::EnPassant {
        // The captured pawn is not on dst; remove it from the exchange board.
        let behind = if board.side_to_move() == Color::White {
            dst.try_offset(-8)
        } else {
            dst.try_offset(8)
        };
        if let Some(sq) = behind {
            occupied = occupied.without(sq);
        }
    }

    let mut gain = [0i32; 32];
    gain[0] = first_gain + promo_bonus;
    let mut depth = 0usize;
    let mut stake = stake;
    let mut side = board.side_to_move().flip();
    let mut attackers = board.attackers_to(dst, occupied);

    loop {
        let Some((sq, kind)) = least_valuable(board, attackers, side) else {
            break;
        };
        depth += 1;
        if depth >= gain.len() {
            break;
        }

        // This capture wins the piece currently on dst, minus whatever the
        // chain so far was worth to the opponent.
        gain[depth] = stake - gain[depth - 1];
        stake = piece_value(kind);
        occupied = occupied.without(sq);

        // Removing a piece can uncover a slider behind it on the same line.
        match kind {
            PieceKind::Pawn | PieceKind::Bishop => {
                attackers |= bishop_attacks(dst, occupied)
                    & (board.pieces(PieceKind::Bishop) | board.pieces(PieceKind::Queen));
            }
            PieceKind::Rook => {
                attackers |= rook_attacks(dst, occupied)
                    & (board.pieces(PieceKind::Rook) | board.pieces(PieceKind::Queen));
            }
            PieceKind::Queen => {
                attackers |= (bishop_attacks(dst, occupied) | rook_attacks(dst, occupied))
                    & (board.pieces(PieceKind::Bishop)
                        | board.pieces(PieceKind::Rook)
                        | board.pieces(PieceKind::Queen));
            }
            PieceKind::Knight | PieceKind::King => {}
        }
        attackers &= occupied;

        side = side.flip();
    }

    // Minimax the gain chain backwards: a side declines to recapture when
    // the continuation is worse than stopping.
    while depth > 0 {
        depth -= 1;
        gain[depth] = -((-gain[depth]).max(gain[depth + 1]));
    }
    gain[0]
}
