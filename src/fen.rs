//! Position records in Forsyth–Edwards Notation.
//!
//! The export carries everything [`GameState`] holds, so
//! `import(&export(state))` reproduces `state` exactly. The en passant
//! field is written whenever a target is set, whether or not a capture
//! is actually possible.

use std::fmt::Write as _;

use thiserror::Error;

use crate::attacks::is_attacked;
use crate::board::Board;
use crate::square::{BOARD_SIZE, Square};
use crate::state::{CastlingRights, GameState};
use crate::types::{CastlingSide, Color, Piece, PieceKind};

/// The standard starting position.
pub const STARTING_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// Error when importing a position record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FenError {
    #[error("expected 4 or 6 space-separated fields, found {0}")]
    FieldCount(usize),
    #[error("expected 8 ranks, found {0}")]
    RankCount(usize),
    #[error("rank {rank} does not describe exactly 8 files")]
    RankWidth { rank: u8 },
    #[error("invalid piece character '{0}'")]
    PieceChar(char),
    #[error("{color} must have exactly one king, found {count}")]
    KingCount { color: Color, count: usize },
    #[error("pawn on back rank square {0}")]
    PawnOnBackRank(Square),
    #[error("{0} is in check but not to move")]
    OppositeCheck(Color),
    #[error("invalid side to move '{0}'")]
    SideToMove(String),
    #[error("invalid castling field '{0}'")]
    Castling(String),
    #[error("invalid en passant square '{0}'")]
    EnPassant(String),
    #[error("invalid move counter '{0}'")]
    Counter(String),
}

/// Writes the position record for `state`.
pub fn export(state: &GameState) -> String {
    let mut out = String::with_capacity(90);
    write_placement(&mut out, state.board());

    out.push(' ');
    out.push(state.side_to_move().char());

    out.push(' ');
    let castling = state.castling();
    if castling.is_empty() {
        out.push('-');
    } else {
        for (color, side, ch) in CASTLING_CHARS {
            if castling.has(color, side) {
                out.push(ch);
            }
        }
    }

    out.push(' ');
    match state.en_passant() {
        Some(square) => {
            let _ = write!(out, "{square}");
        }
        None => out.push('-'),
    }

    let _ = write!(
        out,
        " {} {}",
        state.halfmove_clock(),
        state.fullmove_number()
    );
    out
}

/// Castling letters in record order.
const CASTLING_CHARS: [(Color, CastlingSide, char); 4] = [
    (Color::White, CastlingSide::KingSide, 'K'),
    (Color::White, CastlingSide::QueenSide, 'Q'),
    (Color::Black, CastlingSide::KingSide, 'k'),
    (Color::Black, CastlingSide::QueenSide, 'q'),
];

fn write_placement(out: &mut String, board: &Board) {
    for rank in (0..BOARD_SIZE).rev() {
        let mut empty = 0;
        for file in 0..BOARD_SIZE {
            match board.piece_at(Square::at(rank, file)) {
                Some(piece) => {
                    if empty > 0 {
                        out.push(char::from(b'0' + empty));
                        empty = 0;
                    }
                    out.push(piece.char());
                }
                None => empty += 1,
            }
        }
        if empty > 0 {
            out.push(char::from(b'0' + empty));
        }
        if rank > 0 {
            out.push('/');
        }
    }
}

/// Reads a position record.
///
/// Four-field records (no move counters) default to `0 1`.
pub fn import(fen: &str) -> Result<GameState, FenError> {
    let fields: Vec<&str> = fen.split_whitespace().collect();
    let (placement, side, castling, en_passant, halfmove, fullmove) = match fields.as_slice() {
        [p, s, c, e] => (*p, *s, *c, *e, "0", "1"),
        [p, s, c, e, h, f] => (*p, *s, *c, *e, *h, *f),
        other => return Err(FenError::FieldCount(other.len())),
    };

    let board = parse_placement(placement)?;
    validate_board(&board)?;

    let mut side_chars = side.chars();
    let side_to_move = match (side_chars.next().and_then(Color::from_char), side_chars.next()) {
        (Some(color), None) => color,
        _ => return Err(FenError::SideToMove(side.to_string())),
    };

    // The side that just moved cannot have left its king attacked.
    let them = !side_to_move;
    if let Some(king) = board.king_square(them)
        && is_attacked(&board, side_to_move, king)
    {
        return Err(FenError::OppositeCheck(them));
    }

    let castling = parse_castling(castling)?;
    let en_passant = parse_en_passant(en_passant, &board, side_to_move)?;

    let halfmove_clock = halfmove
        .parse::<u32>()
        .map_err(|_| FenError::Counter(halfmove.to_string()))?;
    let fullmove_number = match fullmove.parse::<u32>() {
        Ok(n) if n > 0 => n,
        _ => return Err(FenError::Counter(fullmove.to_string())),
    };

    Ok(GameState {
        board,
        side_to_move,
        castling,
        en_passant,
        halfmove_clock,
        fullmove_number,
    })
}

fn parse_placement(placement: &str) -> Result<Board, FenError> {
    let ranks: Vec<&str> = placement.split('/').collect();
    if ranks.len() != BOARD_SIZE as usize {
        return Err(FenError::RankCount(ranks.len()));
    }

    let mut board = Board::empty();
    for (row, text) in ranks.iter().enumerate() {
        let rank = BOARD_SIZE - 1 - row as u8;
        let mut file: u8 = 0;
        for ch in text.chars() {
            if let Some(skip) = ch.to_digit(10).filter(|d| (1..=8).contains(d)) {
                file += skip as u8;
            } else {
                let piece = Piece::from_char(ch).ok_or(FenError::PieceChar(ch))?;
                if file >= BOARD_SIZE {
                    return Err(FenError::RankWidth { rank: rank + 1 });
                }
                board.set(Square::at(rank, file), Some(piece));
                file += 1;
            }
            if file > BOARD_SIZE {
                return Err(FenError::RankWidth { rank: rank + 1 });
            }
        }
        if file != BOARD_SIZE {
            return Err(FenError::RankWidth { rank: rank + 1 });
        }
    }
    Ok(board)
}

fn validate_board(board: &Board) -> Result<(), FenError> {
    for color in Color::ALL {
        let count = board
            .pieces_of(color)
            .filter(|(_, piece)| piece.kind == PieceKind::King)
            .count();
        if count != 1 {
            return Err(FenError::KingCount { color, count });
        }
    }

    if let Some((square, _)) = board.pieces().find(|(square, piece)| {
        piece.kind == PieceKind::Pawn && (square.rank() == 0 || square.rank() == BOARD_SIZE - 1)
    }) {
        return Err(FenError::PawnOnBackRank(square));
    }
    Ok(())
}

fn parse_castling(field: &str) -> Result<CastlingRights, FenError> {
    if field == "-" {
        return Ok(CastlingRights::NONE);
    }

    let mut rights = CastlingRights::NONE;
    for ch in field.chars() {
        let (color, side, _) = CASTLING_CHARS
            .into_iter()
            .find(|&(_, _, c)| c == ch)
            .ok_or_else(|| FenError::Castling(field.to_string()))?;
        if rights.has(color, side) {
            return Err(FenError::Castling(field.to_string()));
        }
        rights.set(color, side, true);
    }
    Ok(rights)
}

fn parse_en_passant(
    field: &str,
    board: &Board,
    side_to_move: Color,
) -> Result<Option<Square>, FenError> {
    if field == "-" {
        return Ok(None);
    }

    let invalid = || FenError::EnPassant(field.to_string());
    let square: Square = field.parse().map_err(|_| invalid())?;

    // The skipped square lies on the opponent's third rank, with the pushed
    // pawn in front of it and its start square empty.
    let them = !side_to_move;
    let third_rank = them.pawn_rank() as i8 + them.pawn_direction();
    let pushed = square.offset(them.pawn_direction(), 0);
    let start = square.offset(-them.pawn_direction(), 0);
    let valid = square.rank() as i8 == third_rank
        && board.is_empty(square)
        && start.is_some_and(|start| board.is_empty(start))
        && pushed.is_some_and(|pushed| board.piece_at(pushed) == Some(PieceKind::Pawn.of(them)));
    if !valid {
        return Err(invalid());
    }
    Ok(Some(square))
}

impl std::str::FromStr for GameState {
    type Err = FenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        import(s)
    }
}
