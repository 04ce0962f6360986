//! FEN parsing and serialization.

use std::fmt::Write as _;
use std::str::FromStr;

use crate::bitboard::Bitboard;
use crate::board::Board;
use crate::castle_rights::CastleRights;
use crate::color::Color;
use crate::error::FenError;
use crate::file::File;
use crate::piece_kind::PieceKind;
use crate::rank::Rank;
use crate::square::Square;

/// FEN of the standard starting position.
pub const STARTING_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

impl FromStr for Board {
    type Err = FenError;

    fn from_str(fen: &str) -> Result<Board, FenError> {
        let fields: Vec<&str> = fen.split_whitespace().collect();
        if fields.len() != 6 {
            return Err(FenError::WrongFieldCount { found: fields.len() });
        }

        let ranks: Vec<&str> = fields[0].split('/').collect();
        if ranks.len() != 8 {
            return Err(FenError::WrongRankCount { found: ranks.len() });
        }

        let mut pieces = [Bitboard::EMPTY; PieceKind::COUNT];
        let mut sides = [Bitboard::EMPTY; Color::COUNT];

        for (rank_index, rank_str) in ranks.iter().enumerate() {
            // FEN lists rank 8 first.
            let rank = Rank::from_index(7 - rank_index as u8)
                .unwrap_or(Rank::R1);
            let mut file_index: u8 = 0;

            for c in rank_str.chars() {
                if let Some(digit) = c.to_digit(10) {
                    if !(1..=8).contains(&digit) {
                        return Err(FenError::InvalidPieceChar { character: c });
                    }
                    file_index += digit as u8;
                } else {
                    let kind = PieceKind::from_fen_char(c)
                        .ok_or(FenError::InvalidPieceChar { character: c })?;
                    let color = if c.is_ascii_uppercase() { Color::White } else { Color::Black };
                    let Some(file) = File::from_index(file_index) else {
                        return Err(FenError::BadRankLength {
                            rank_index,
                            length: file_index as usize + 1,
                        });
                    };
                    let bb = Square::new(rank, file).bitboard();
                    pieces[kind.index()] |= bb;
                    sides[color.index()] |= bb;
                    file_index += 1;
                }
            }

            if file_index != 8 {
                return Err(FenError::BadRankLength { rank_index, length: file_index as usize });
            }
        }

        let side_to_move = match fields[1] {
            "w" => Color::White,
            "b" => Color::Black,
            other => return Err(FenError::InvalidColor { found: other.to_string() }),
        };

        let castling = CastleRights::from_fen(fields[2])?;

        let en_passant = if fields[3] == "-" {
            None
        } else {
            Some(Square::from_algebraic(fields[3]).ok_or_else(|| FenError::InvalidEnPassant {
                found: fields[3].to_string(),
            })?)
        };

        let halfmove_clock: u16 = fields[4].parse().map_err(|_| FenError::InvalidMoveCounter {
            field: "halfmove clock",
            found: fields[4].to_string(),
        })?;
        let fullmove_number: u16 = fields[5].parse().map_err(|_| FenError::InvalidMoveCounter {
            field: "fullmove number",
            found: fields[5].to_string(),
        })?;

        let board = Board::from_raw(
            pieces,
            sides,
            side_to_move,
            castling,
            en_passant,
            halfmove_clock,
            fullmove_number,
        );
        board.validate()?;
        Ok(board)
    }
}

/// Serialize a board back to FEN.
pub fn to_fen(board: &Board) -> String {
    let mut out = String::new();

    for rank_index in (0..8).rev() {
        let mut empty_run = 0;
        for file_index in 0..8 {
            let sq = Square::new(
                Rank::from_index(rank_index).unwrap_or(Rank::R1),
                File::from_index(file_index).unwrap_or(File::A),
            );
            match (board.piece_on(sq), board.color_on(sq)) {
                (Some(kind), Some(color)) => {
                    if empty_run > 0 {
                        let _ = write!(out, "{empty_run}");
                        empty_run = 0;
                    }
                    let c = if color == Color::White {
                        kind.fen_char().to_ascii_uppercase()
                    } else {
                        kind.fen_char()
                    };
                    out.push(c);
                }
                _ => empty_run += 1,
            }
        }
        if empty_run > 0 {
            let _ = write!(out, "{empty_run}");
        }
        if rank_index > 0 {
            out.push('/');
        }
    }

    let ep = match board.en_passant() {
        Some(sq) => sq.to_string(),
        None => "-".to_string(),
    };
    let _ = write!(
        out,
        " {} {} {} {} {}",
        board.side_to_move(),
        board.castling(),
        ep,
        board.halfmove_clock(),
        board.fullmove_number(),
    );
    out
}

#[cfg(test)]
mod tests {
    use super::{to_fen, STARTING_FEN};
    use crate::board::Board;
    use crate::color::Color;
    use crate::piece_kind::PieceKind;
    use crate::square::Square;

    fn roundtrip(fen: &str) {
        let board: Board = fen.parse().unwrap();
        assert_eq!(to_fen(&board), fen, "FEN did not round-trip");
    }

    #[test]
    fn starting_position_roundtrip() {
        roundtrip(STARTING_FEN);
        let parsed: Board = STARTING_FEN.parse().unwrap();
        assert_eq!(parsed, Board::starting_position());
    }

    #[test]
    fn kiwipete_roundtrip() {
        roundtrip("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1");
    }

    #[test]
    fn en_passant_field() {
        let board: Board = "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1"
            .parse()
            .unwrap();
        assert_eq!(board.en_passant(), Some(Square::E3));
        assert_eq!(board.side_to_move(), Color::Black);
    }

    #[test]
    fn sparse_position() {
        let board: Board = "8/8/8/3k4/8/3K4/4P3/8 w - - 0 1".parse().unwrap();
        assert_eq!(board.occupied().count(), 3);
        assert_eq!(board.piece_on(Square::E2), Some(PieceKind::Pawn));
    }

    #[test]
    fn rejects_malformed() {
        assert!("rnbqkbnr/pppppppp/8/8 w KQkq - 0 1".parse::<Board>().is_err());
        assert!("rnbqkbnr/pppppppp/9/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1".parse::<Board>().is_err());
        assert!("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR x KQkq - 0 1".parse::<Board>().is_err());
        assert!("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KXkq - 0 1".parse::<Board>().is_err());
        assert!("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq z9 0 1".parse::<Board>().is_err());
        // Two white kings.
        assert!("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNK w KQkq - 0 1".parse::<Board>().is_err());
    }
}
