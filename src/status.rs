use std::fmt;

use crate::attacks::is_attacked;
use crate::legality::has_legal_move;
use crate::state::GameState;
use crate::types::Color;

/// Classification of a position for the side to move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameStatus {
    Ongoing,
    /// The side to move is in check but has a legal reply.
    Check,
    /// The side to move is checkmated; carries the winner.
    Checkmate(Color),
    /// The side to move is not in check and has no legal move.
    Stalemate,
}

impl GameStatus {
    /// Whether no further moves can be played.
    #[inline]
    pub const fn is_terminal(self) -> bool {
        matches!(self, GameStatus::Checkmate(_) | GameStatus::Stalemate)
    }
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameStatus::Ongoing => f.write_str("ongoing"),
            GameStatus::Check => f.write_str("check"),
            GameStatus::Checkmate(winner) => write!(f, "checkmate, {winner} wins"),
            GameStatus::Stalemate => f.write_str("stalemate"),
        }
    }
}

/// Whether the side to move's king is attacked.
pub fn in_check(state: &GameState) -> bool {
    let us = state.side_to_move();
    is_attacked(state.board(), !us, state.our_king())
}

/// Classifies the position for the side to move.
pub fn status(state: &GameState) -> GameStatus {
    let check = in_check(state);
    match (check, has_legal_move(state)) {
        (true, false) => GameStatus::Checkmate(!state.side_to_move()),
        (false, false) => GameStatus::Stalemate,
        (true, true) => GameStatus::Check,
        (false, true) => GameStatus::Ongoing,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fen;
    use test_case::test_case;

    #[test_case("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1", GameStatus::Ongoing; "start")]
    #[test_case("rnbqkbnr/pppp2pp/8/4pp1Q/4P3/8/PPPP1PPP/RNB1KBNR b KQkq - 1 3", GameStatus::Check; "check")]
    #[test_case("rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 1 3", GameStatus::Checkmate(Color::Black); "fools mate")]
    #[test_case("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1", GameStatus::Stalemate; "stalemate")]
    #[test_case("6rk/6pp/8/8/8/8/8/K6R w - - 0 1", GameStatus::Ongoing; "no check")]
    #[test_case("R5k1/5ppp/8/8/8/8/8/K7 b - - 0 1", GameStatus::Checkmate(Color::White); "back rank mate")]
    fn classify(fen: &str, expected: GameStatus) {
        let state = fen::import(fen).expect("invalid FEN");
        assert_eq!(status(&state), expected);
    }

    #[test]
    fn terminal_statuses() {
        assert!(GameStatus::Checkmate(Color::White).is_terminal());
        assert!(GameStatus::Stalemate.is_terminal());
        assert!(!GameStatus::Check.is_terminal());
        assert!(!GameStatus::Ongoing.is_terminal());
    }

    #[test]
    fn display_names_winner() {
        assert_eq!(GameStatus::Checkmate(Color::White).to_string(), "checkmate, white wins");
    }
}
