pub mod attacks;
pub mod board;
pub mod feedback;
pub mod fen;
pub mod game_logic;
pub mod legality;
pub mod movegen;
pub mod square;
pub mod state;
pub mod status;
pub mod terminal;
pub mod types;

pub use game_logic::{GameController, MoveError, apply_move};
pub use legality::legal_moves;
pub use movegen::{Move, MoveKind};
pub use square::Square;
pub use state::{GameState, new_game};
pub use status::{GameStatus, status};
pub use types::{Color, Piece, PieceKind};

/// Trait for reading square selections from the player.
///
/// Abstracts over scripted and interactive inputs, providing a uniform
/// interface for [`GameController::run`].
pub trait SquareInput {
    /// Error type for input read failures.
    type Error: std::fmt::Debug + std::fmt::Display;

    /// Next square the player clicked, or `None` once input is exhausted.
    fn next_click(&mut self) -> Result<Option<Square>, Self::Error>;
}

/// Trait for displaying the board and its feedback to the player.
///
/// Mirrors [`SquareInput`] on the output side of the game loop.
pub trait BoardDisplay {
    /// Error type for display update failures.
    type Error: std::fmt::Debug + std::fmt::Display;

    /// Show the given position and feedback state on the display.
    ///
    /// Implementations map [`feedback::SquareFeedback`] variants
    /// to their own output (terminal colors, recorded frames, etc.).
    fn show(
        &mut self,
        board: &board::Board,
        feedback: &feedback::BoardFeedback,
    ) -> Result<(), Self::Error>;
}
