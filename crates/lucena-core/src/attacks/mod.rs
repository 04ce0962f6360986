//! Attack geometry: leaper lookups and classical ray attacks for sliders.

mod tables;

use crate::bitboard::Bitboard;
use crate::color::Color;
use crate::square::Square;

use self::tables::{
    ray_attacks, tables, EAST, NORTH, NORTH_EAST, NORTH_WEST, SOUTH, SOUTH_EAST, SOUTH_WEST, WEST,
};

/// Squares a knight on `sq` attacks.
#[inline]
pub fn knight_attacks(sq: Square) -> Bitboard {
    tables().knight[sq.index()]
}

/// Squares a king on `sq` attacks.
#[inline]
pub fn king_attacks(sq: Square) -> Bitboard {
    tables().king[sq.index()]
}

/// Squares a pawn of `color` on `sq` attacks.
#[inline]
pub fn pawn_attacks(color: Color, sq: Square) -> Bitboard {
    tables().pawn[color.index()][sq.index()]
}

/// Rook attacks from `sq` over `occupied`; blockers are included.
#[inline]
pub fn rook_attacks(sq: Square, occupied: Bitboard) -> Bitboard {
    ray_attacks(NORTH, sq, occupied)
        | ray_attacks(SOUTH, sq, occupied)
        | ray_attacks(EAST, sq, occupied)
        | ray_attacks(WEST, sq, occupied)
}

/// Bishop attacks from `sq` over `occupied`; blockers are included.
#[inline]
pub fn bishop_attacks(sq: Square, occupied: Bitboard) -> Bitboard {
    ray_attacks(NORTH_EAST, sq, occupied)
        | ray_attacks(SOUTH_WEST, sq, occupied)
        | ray_attacks(NORTH_WEST, sq, occupied)
        | ray_attacks(SOUTH_EAST, sq, occupied)
}

/// Queen attacks from `sq` over `occupied`.
#[inline]
pub fn queen_attacks(sq: Square, occupied: Bitboard) -> Bitboard {
    rook_attacks(sq, occupied) | bishop_attacks(sq, occupied)
}

/// Squares strictly between `a` and `b`, empty when they are not aligned.
#[inline]
pub fn between(a: Square, b: Square) -> Bitboard {
    tables().between[a.index()][b.index()]
}

/// The full edge-to-edge line through `a` and `b` (both included), empty
/// when they are not aligned.
#[inline]
pub fn line(a: Square, b: Square) -> Bitboard {
    tables().line[a.index()][b.index()]
}
