//! The board: piece placement, side to move, castling, en passant, counters.

use std::fmt;

use crate::bitboard::Bitboard;
use crate::castle_rights::CastleRights;
use crate::color::Color;
use crate::error::BoardError;
use crate::piece_kind::PieceKind;
use crate::square::Square;

/// A complete position.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Board {
    /// One bitboard per piece kind, both colors merged.
    pieces: [Bitboard; PieceKind::COUNT],
    /// One bitboard per side.
    sides: [Bitboard; Color::COUNT],
    /// Union of both sides, cached.
    occupied: Bitboard,
    /// Side to move.
    side_to_move: Color,
    /// Remaining castling rights.
    castling: CastleRights,
    /// En passant target square, if the last move was a double pawn push.
    en_passant: Option<Square>,
    /// Halfmove clock for the fifty-move rule.
    halfmove_clock: u16,
    /// Fullmove number, incremented after Black moves.
    fullmove_number: u16,
}

impl Board {
    /// The standard starting position.
    pub fn starting_position() -> Board {
        let white_back = Bitboard::RANK_1;
        let black_back = Bitboard::RANK_8;
        let rooks = Square::A1.bitboard() | Square::H1.bitboard()
            | Square::A8.bitboard() | Square::H8.bitboard();
        let knights = Square::B1.bitboard() | Square::G1.bitboard()
            | Square::B8.bitboard() | Square::G8.bitboard();
        let bishops = Square::C1.bitboard() | Square::F1.bitboard()
            | Square::C8.bitboard() | Square::F8.bitboard();
        let queens = Square::D1.bitboard() | Square::D8.bitboard();
        let kings = Square::E1.bitboard() | Square::E8.bitboard();
        let pawns = Bitboard::RANK_2 | Bitboard::RANK_7;

        let white = white_back | Bitboard::RANK_2;
        let black = black_back | Bitboard::RANK_7;

        Board {
            pieces: [pawns, knights, bishops, rooks, queens, kings],
            sides: [white, black],
            occupied: white | black,
            side_to_move: Color::White,
            castling: CastleRights::ALL,
            en_passant: None,
            halfmove_clock: 0,
            fullmove_number: 1,
        }
    }

    /// Assemble a board from raw components. FEN parsing uses this.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn from_raw(
        pieces: [Bitboard; PieceKind::COUNT],
        sides: [Bitboard; Color::COUNT],
        side_to_move: Color,
        castling: CastleRights,
        en_passant: Option<Square>,
        halfmove_clock: u16,
        fullmove_number: u16,
    ) -> Board {
        Board {
            pieces,
            sides,
            occupied: sides[Color::White.index()] | sides[Color::Black.index()],
            side_to_move,
            castling,
            en_passant,
            halfmove_clock,
            fullmove_number,
        }
    }

    /// The piece kind on `sq`, if any.
    #[inline]
    pub fn piece_on(&self, sq: Square) -> Option<PieceKind> {
        if !self.occupied.contains(sq) {
            return None;
        }
        PieceKind::ALL.into_iter().find(|&kind| self.pieces[kind.index()].contains(sq))
    }

    /// The color of the piece on `sq`, if any.
    #[inline]
    pub fn color_on(&self, sq: Square) -> Option<Color> {
        Color::ALL.into_iter().find(|&color| self.sides[color.index()].contains(sq))
    }

    /// All pieces of `kind`, both colors.
    #[inline]
    pub fn pieces(&self, kind: PieceKind) -> Bitboard {
        self.pieces[kind.index()]
    }

    /// All pieces of `color`.
    #[inline]
    pub fn side(&self, color: Color) -> Bitboard {
        self.sides[color.index()]
    }

    /// All occupied squares.
    #[inline]
    pub fn occupied(&self) -> Bitboard {
        self.occupied
    }

    /// The king square of `color`.
    ///
    /// Debug-asserts the king exists; a validated board always has one.
    #[inline]
    pub fn king_square(&self, color: Color) -> Square {
        let kings = self.pieces(PieceKind::King) & self.side(color);
        debug_assert!(kings.is_nonempty(), "no {color} king on the board");
        kings.lsb().unwrap_or(Square::A1)
    }

    /// Side to move.
    #[inline]
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    /// Remaining castling rights.
    #[inline]
    pub fn castling(&self) -> CastleRights {
        self.castling
    }

    /// En passant target square, if any.
    #[inline]
    pub fn en_passant(&self) -> Option<Square> {
        self.en_passant
    }

    /// Halfmove clock.
    #[inline]
    pub fn halfmove_clock(&self) -> u16 {
        self.halfmove_clock
    }

    /// Fullmove number.
    #[inline]
    pub fn fullmove_number(&self) -> u16 {
        self.fullmove_number
    }

    // Mutators for copy-make; kept crate-private so callers can only obtain
    // new positions through `make_move` or FEN.

    #[inline]
    pub(crate) fn toggle_piece(&mut self, sq: Square, kind: PieceKind, color: Color) {
        let bb = sq.bitboard();
        self.pieces[kind.index()] ^= bb;
        self.sides[color.index()] ^= bb;
        self.occupied ^= bb;
    }

    #[inline]
    pub(crate) fn set_side_to_move(&mut self, color: Color) {
        self.side_to_move = color;
    }

    #[inline]
    pub(crate) fn set_castling(&mut self, rights: CastleRights) {
        self.castling = rights;
    }

    #[inline]
    pub(crate) fn set_en_passant(&mut self, sq: Option<Square>) {
        self.en_passant = sq;
    }

    #[inline]
    pub(crate) fn set_halfmove_clock(&mut self, clock: u16) {
        self.halfmove_clock = clock;
    }

    #[inline]
    pub(crate) fn set_fullmove_number(&mut self, number: u16) {
        self.fullmove_number = number;
    }

    /// Structural validation: one king per side, no back-rank pawns, no
    /// overlapping bitboards, consistent occupancy.
    pub fn validate(&self) -> Result<(), BoardError> {
        for (color, name) in [(Color::White, "white"), (Color::Black, "black")] {
            let kings = (self.pieces(PieceKind::King) & self.side(color)).count();
            if kings != 1 {
                return Err(BoardError::InvalidKingCount { color: name, count: kings });
            }
        }

        if (self.pieces(PieceKind::Pawn) & (Bitboard::RANK_1 | Bitboard::RANK_8)).is_nonempty() {
            return Err(BoardError::PawnsOnBackRank);
        }

        let mut union = Bitboard::EMPTY;
        let mut total = 0;
        for kind in PieceKind::ALL {
            union |= self.pieces(kind);
            total += self.pieces(kind).count();
        }
        if union.count() != total {
            return Err(BoardError::OverlappingPieces);
        }

        if (self.side(Color::White) & self.side(Color::Black)).is_nonempty() {
            return Err(BoardError::InconsistentSides);
        }
        if self.occupied != (self.side(Color::White) | self.side(Color::Black))
            || self.occupied != union
        {
            return Err(BoardError::InconsistentOccupied);
        }

        Ok(())
    }
}

impl fmt::Display for Board {
    /// An 8×8 diagram with FEN piece letters, rank 8 at the top.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in (0u8..8).rev() {
            write!(f, "{} ", rank + 1)?;
            for file in 0u8..8 {
                let sq = Square::from_index(rank * 8 + file).unwrap_or(Square::A1);
                let c = match (self.piece_on(sq), self.color_on(sq)) {
                    (Some(kind), Some(Color::White)) => kind.fen_char().to_ascii_uppercase(),
                    (Some(kind), _) => kind.fen_char(),
                    _ => '.',
                };
                write!(f, "{c} ")?;
            }
            writeln!(f)?;
        }
        write!(f, "  a b c d e f g h   {} to move", self.side_to_move)
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Board({})", crate::fen::to_fen(self))
    }
}
