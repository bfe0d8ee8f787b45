use crate::movegen::Move;
use crate::square::Square;

/// Type of visual feedback for an individual square
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SquareFeedback {
    /// Legal destination of the selected piece
    Destination,
    /// Moving here captures an opponent piece
    Capture,
    /// The selected piece
    Origin,
    /// King of the side to move, currently attacked
    Check,
    /// Opponent piece giving check
    Checker,
}

/// Contains the set of squares and their associated feedback types for the current board state.
///
/// `BoardFeedback` is computed by `compute_feedback()` and consumed by the display layer to
/// highlight the selected piece, its destinations and any check. Each square carries at
/// most one feedback kind.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BoardFeedback {
    squares: Vec<(Square, SquareFeedback)>,
}

impl BoardFeedback {
    /// Create empty feedback (no highlights)
    #[inline]
    pub const fn new() -> Self {
        Self {
            squares: Vec::new(),
        }
    }

    /// Get all square feedback entries
    #[inline]
    pub fn squares(&self) -> &[(Square, SquareFeedback)] {
        &self.squares
    }

    /// Get feedback for a specific square, if any
    #[inline]
    pub fn get(&self, square: Square) -> Option<SquareFeedback> {
        self.squares
            .iter()
            .find(|(sq, _)| *sq == square)
            .map(|(_, feedback)| *feedback)
    }

    /// Set feedback for a square, replacing any previous entry.
    pub fn set(&mut self, square: Square, feedback: SquareFeedback) {
        match self.squares.iter_mut().find(|(sq, _)| *sq == square) {
            Some(entry) => entry.1 = feedback,
            None => self.squares.push((square, feedback)),
        }
    }

    /// Returns true if there are no feedback squares to display.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.squares.is_empty()
    }
}

impl FromIterator<(Square, SquareFeedback)> for BoardFeedback {
    fn from_iter<T: IntoIterator<Item = (Square, SquareFeedback)>>(iter: T) -> Self {
        let mut feedback = Self::new();
        for (square, kind) in iter {
            feedback.set(square, kind);
        }
        feedback
    }
}

/// The checked king and the pieces attacking it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckInfo {
    pub king_square: Square,
    pub checkers: Vec<Square>,
}

/// Game state information needed to compute feedback
///
/// This trait defines what the feedback system needs from the game controller.
pub trait FeedbackSource {
    /// Currently selected square, if a piece is picked up
    fn selected(&self) -> Option<Square>;

    /// Legal moves of the selected piece
    fn legal_moves(&self) -> &[Move];

    /// Whether the move captures, en passant included
    fn is_capture(&self, mv: &Move) -> bool;

    /// Check on the side to move, if any
    fn check_info(&self) -> Option<CheckInfo>;
}

/// Compute visual feedback based on current game state.
///
/// - Piece selected: the origin and its legal destinations
/// - Nothing selected, side to move in check: the king and its checkers
/// - Otherwise: nothing
pub fn compute_feedback(source: &impl FeedbackSource) -> BoardFeedback {
    match source.selected() {
        Some(from) => show_destinations_for(source, from),
        None => source.check_info().map(show_check).unwrap_or_default(),
    }
}

/// Show legal destinations of the selected piece
fn show_destinations_for(source: &impl FeedbackSource, from: Square) -> BoardFeedback {
    // Promotions to different kinds share a destination and collapse into one entry.
    std::iter::once((from, SquareFeedback::Origin))
        .chain(
            source
                .legal_moves()
                .iter()
                .filter(|mv| mv.from == from)
                .map(|mv| classify_move(source, mv)),
        )
        .collect()
}

fn show_check(info: CheckInfo) -> BoardFeedback {
    std::iter::once((info.king_square, SquareFeedback::Check))
        .chain(
            info.checkers
                .into_iter()
                .map(|square| (square, SquareFeedback::Checker)),
        )
        .collect()
}

/// Classify a move as either a capture or regular destination
fn classify_move(source: &impl FeedbackSource, mv: &Move) -> (Square, SquareFeedback) {
    if source.is_capture(mv) {
        (mv.to, SquareFeedback::Capture)
    } else {
        (mv.to, SquareFeedback::Destination)
    }
}
