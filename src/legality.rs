//! Legal move filtering by simulation.
//!
//! A pseudo-legal move is legal iff playing it on a scratch copy of the
//! state leaves the mover's king unattacked. Castling transit squares are
//! already checked during generation.

use crate::attacks::is_attacked;
use crate::movegen::{Move, pseudo_legal_moves};
use crate::square::Square;
use crate::state::GameState;

/// Whether playing `mv` keeps the mover's own king safe.
pub fn leaves_king_safe(state: &GameState, mv: Move) -> bool {
    let us = state.side_to_move();
    let mut scratch = state.clone();
    scratch.play_unchecked(mv);
    let king = scratch.board().king_square(us).expect("king must exist");
    !is_attacked(scratch.board(), !us, king)
}

/// Legal moves of the piece on `from`.
///
/// Empty if the square is empty or holds a piece of the side not to move.
pub fn legal_moves(state: &GameState, from: Square) -> Vec<Move> {
    pseudo_legal_moves(state, from)
        .into_iter()
        .filter(|&mv| leaves_king_safe(state, mv))
        .collect()
}

/// Legal moves of every piece of the side to move, a1 first.
pub fn all_legal_moves(state: &GameState) -> Vec<Move> {
    state
        .board()
        .pieces_of(state.side_to_move())
        .flat_map(|(from, _)| legal_moves(state, from))
        .collect()
}

/// Whether the side to move has at least one legal move.
pub fn has_legal_move(state: &GameState) -> bool {
    state
        .board()
        .pieces_of(state.side_to_move())
        .any(|(from, _)| {
            pseudo_legal_moves(state, from)
                .into_iter()
                .any(|mv| leaves_king_safe(state, mv))
        })
}

/// Whether `mv` is one of the legal moves of its origin square.
pub fn is_legal(state: &GameState, mv: &Move) -> bool {
    legal_moves(state, mv.from).contains(mv)
}
