//! Attack detection: which squares a side attacks.
//!
//! Pawns attack only their two forward diagonals here. Everything else
//! attacks exactly the squares it could move to, ignoring whose piece
//! stands there.

use crate::board::Board;
use crate::square::Square;
use crate::types::{Color, PieceKind};

/// Rank/file deltas of the four orthogonal directions.
pub const ROOK_DIRECTIONS: [(i8, i8); 4] = [(0, -1), (0, 1), (-1, 0), (1, 0)];

/// Rank/file deltas of the four diagonal directions.
pub const BISHOP_DIRECTIONS: [(i8, i8); 4] = [(1, -1), (1, 1), (-1, -1), (-1, 1)];

/// Orthogonal directions followed by diagonals.
pub const QUEEN_DIRECTIONS: [(i8, i8); 8] = [
    ROOK_DIRECTIONS[0],
    ROOK_DIRECTIONS[1],
    ROOK_DIRECTIONS[2],
    ROOK_DIRECTIONS[3],
    BISHOP_DIRECTIONS[0],
    BISHOP_DIRECTIONS[1],
    BISHOP_DIRECTIONS[2],
    BISHOP_DIRECTIONS[3],
];

pub const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (2, -1),
    (2, 1),
    (1, 2),
    (-1, 2),
    (-2, 1),
    (-2, -1),
    (-1, -2),
    (1, -2),
];

pub const KING_OFFSETS: [(i8, i8); 8] = [
    (1, -1),
    (1, 0),
    (1, 1),
    (0, 1),
    (-1, 1),
    (-1, 0),
    (-1, -1),
    (0, -1),
];

/// Walks from `from` in one direction, yielding each square up to and
/// including the first occupied one.
pub fn ray(
    board: &Board,
    from: Square,
    (d_rank, d_file): (i8, i8),
) -> impl Iterator<Item = Square> + '_ {
    let mut next = from.offset(d_rank, d_file);
    let mut blocked = false;
    std::iter::from_fn(move || {
        if blocked {
            return None;
        }
        let square = next?;
        blocked = !board.is_empty(square);
        next = square.offset(d_rank, d_file);
        Some(square)
    })
}

/// Directions a sliding piece moves in, or `None` for non-sliders.
pub const fn slider_directions(kind: PieceKind) -> Option<&'static [(i8, i8)]> {
    match kind {
        PieceKind::Bishop => Some(&BISHOP_DIRECTIONS),
        PieceKind::Rook => Some(&ROOK_DIRECTIONS),
        PieceKind::Queen => Some(&QUEEN_DIRECTIONS),
        _ => None,
    }
}

/// Whether the piece of `kind` and `color` on `from` attacks `target`.
fn attacks_square(
    board: &Board,
    kind: PieceKind,
    color: Color,
    from: Square,
    target: Square,
) -> bool {
    let d_rank = target.rank() as i8 - from.rank() as i8;
    let d_file = target.file() as i8 - from.file() as i8;

    match kind {
        PieceKind::Pawn => d_rank == color.pawn_direction() && d_file.abs() == 1,
        PieceKind::Knight => KNIGHT_OFFSETS.contains(&(d_rank, d_file)),
        PieceKind::King => KING_OFFSETS.contains(&(d_rank, d_file)),
        PieceKind::Bishop | PieceKind::Rook | PieceKind::Queen => {
            let direction = (d_rank.signum(), d_file.signum());
            let aligned = d_rank == 0 || d_file == 0 || d_rank.abs() == d_file.abs();
            aligned
                && slider_directions(kind).is_some_and(|dirs| dirs.contains(&direction))
                && ray(board, from, direction).any(|square| square == target)
        }
    }
}

/// Squares holding pieces of `by` that attack `target`, a1 first.
pub fn attackers(board: &Board, by: Color, target: Square) -> Vec<Square> {
    board
        .pieces_of(by)
        .filter(|&(from, piece)| {
            from != target && attacks_square(board, piece.kind, by, from, target)
        })
        .map(|(from, _)| from)
        .collect()
}

/// True iff any piece of `by` attacks `target`.
pub fn is_attacked(board: &Board, by: Color, target: Square) -> bool {
    board
        .pieces_of(by)
        .any(|(from, piece)| from != target && attacks_square(board, piece.kind, by, from, target))
}
