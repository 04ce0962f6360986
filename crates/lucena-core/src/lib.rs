//! Board representation, attack geometry, and move generation for an 8×8
//! chess engine core.

mod attacks;
mod bitboard;
mod board;
mod castle_rights;
mod chess_move;
mod color;
mod error;
mod fen;
mod file;
mod make_move;
mod movegen;
mod perft;
mod piece_kind;
mod rank;
mod square;

pub use attacks::{
    between, bishop_attacks, king_attacks, knight_attacks, line, pawn_attacks, queen_attacks,
    rook_attacks,
};
pub use bitboard::Bitboard;
pub use board::Board;
pub use castle_rights::{CastleRights, CastleSide};
pub use chess_move::{Move, MoveTag};
pub use color::Color;
pub use error::{BoardError, FenError};
pub use fen::{to_fen, STARTING_FEN};
pub use file::File;
pub use movegen::{
    checkers_and_pinned, generate_all, generate_captures, generate_evasions, generate_moves,
    generate_quiets, is_pseudo_legal, MoveList,
};
pub use perft::{divide, perft};
pub use piece_kind::PieceKind;
pub use rank::Rank;
pub use square::Square;
