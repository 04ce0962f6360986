//! Precomputed attack geometry, built once at first use.

use std::sync::OnceLock;

use crate::bitboard::Bitboard;
use crate::square::Square;

/// Ray directions. Opposite directions pair up as `d ^ 1`, and
/// even-indexed directions have a positive index delta (their nearest
/// blocker is the lowest set bit).
pub(super) const NORTH: usize = 0;
pub(super) const SOUTH: usize = 1;
pub(super) const EAST: usize = 2;
pub(super) const WEST: usize = 3;
pub(super) const NORTH_EAST: usize = 4;
pub(super) const SOUTH_WEST: usize = 5;
pub(super) const NORTH_WEST: usize = 6;
pub(super) const SOUTH_EAST: usize = 7;

/// (file delta, rank delta) per direction, matching the constants above.
const DIR_STEPS: [(i8, i8); 8] = [
    (0, 1), (0, -1), (1, 0), (-1, 0), (1, 1), (-1, -1), (-1, 1), (1, -1),
];

pub(super) struct Tables {
    pub knight: [Bitboard; 64],
    pub king: [Bitboard; 64],
    /// Indexed by color then square.
    pub pawn: [[Bitboard; 64]; 2],
    /// Indexed by direction then square; open-board ray excluding the origin.
    pub rays: [[Bitboard; 64]; 8],
    /// Squares strictly between two aligned squares, else empty.
    pub between: [[Bitboard; 64]; 64],
    /// The full edge-to-edge line through two aligned squares, else empty.
    pub line: [[Bitboard; 64]; 64],
}

static TABLES: OnceLock<Tables> = OnceLock::new();

pub(super) fn tables() -> &'static Tables {
    TABLES.get_or_init(build)
}

/// One step from a square index, or `None` at a board edge.
fn step(sq: usize, d_file: i8, d_rank: i8) -> Option<usize> {
    let file = (sq % 8) as i8 + d_file;
    let rank = (sq / 8) as i8 + d_rank;
    if (0..8).contains(&file) && (0..8).contains(&rank) {
        Some((rank * 8 + file) as usize)
    } else {
        None
    }
}

fn leaper_mask(sq: usize, steps: &[(i8, i8)]) -> Bitboard {
    let mut mask = Bitboard::EMPTY;
    for &(df, dr) in steps {
        if let Some(dst) = step(sq, df, dr) {
            mask = mask.with(Square::from_index(dst as u8).unwrap_or(Square::A1));
        }
    }
    mask
}

fn build() -> Tables {
    let mut t = Tables {
        knight: [Bitboard::EMPTY; 64],
        king: [Bitboard::EMPTY; 64],
        pawn: [[Bitboard::EMPTY; 64]; 2],
        rays: [[Bitboard::EMPTY; 64]; 8],
        between: [[Bitboard::EMPTY; 64]; 64],
        line: [[Bitboard::EMPTY; 64]; 64],
    };

    const KNIGHT_STEPS: [(i8, i8); 8] = [
        (1, 2), (2, 1), (2, -1), (1, -2), (-1, -2), (-2, -1), (-2, 1), (-1, 2),
    ];
    const KING_STEPS: [(i8, i8); 8] = [
        (0, 1), (1, 1), (1, 0), (1, -1), (0, -1), (-1, -1), (-1, 0), (-1, 1),
    ];

    for sq in 0..64 {
        t.knight[sq] = leaper_mask(sq, &KNIGHT_STEPS);
        t.king[sq] = leaper_mask(sq, &KING_STEPS);
        t.pawn[0][sq] = leaper_mask(sq, &[(-1, 1), (1, 1)]);
        t.pawn[1][sq] = leaper_mask(sq, &[(-1, -1), (1, -1)]);

        for (dir, &(df, dr)) in DIR_STEPS.iter().enumerate() {
            let mut ray = Bitboard::EMPTY;
            let mut cursor = sq;
            while let Some(next) = step(cursor, df, dr) {
                ray = ray.with(Square::from_index(next as u8).unwrap_or(Square::A1));
                cursor = next;
            }
            t.rays[dir][sq] = ray;
        }
    }

    // between/line fall out of the rays: for aligned a and b, the squares
    // between them are the intersection of a's ray toward b with b's ray back.
    for a in 0..64 {
        let a_sq = Square::from_index(a as u8).unwrap_or(Square::A1);
        for dir in 0..8 {
            let full = a_sq.bitboard() | t.rays[dir][a] | t.rays[dir ^ 1][a];
            for b_sq in t.rays[dir][a] {
                let b = b_sq.index();
                t.between[a][b] = t.rays[dir][a] & t.rays[dir ^ 1][b];
                t.line[a][b] = full;
            }
        }
    }

    t
}

/// Slider attacks along one direction, truncated at the first blocker
/// (which is included in the attack set).
#[inline]
pub(super) fn ray_attacks(dir: usize, sq: Square, occupied: Bitboard) -> Bitboard {
    let t = tables();
    let ray = t.rays[dir][sq.index()];
    let blockers = ray & occupied;
    // Even directions grow toward higher indices, so the nearest blocker is
    // the lowest bit; odd directions the highest.
    let blocker = if dir & 1 == 0 { blockers.lsb() } else { blockers.msb() };
    match blocker {
        Some(b) => ray ^ t.rays[dir][b.index()],
        None => ray,
    }
}
