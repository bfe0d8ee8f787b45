use std::io::{self, Write};

use crate::BoardDisplay;
use crate::board::Board;
use crate::feedback::{BoardFeedback, SquareFeedback};
use crate::square::{BOARD_SIZE, Square};

/// Terminal-based board display.
///
/// Renders the position as an 8×8 grid of piece letters, White uppercase,
/// with ANSI color-coded backgrounds matching the feedback type.
#[derive(Debug, Default)]
pub struct TerminalDisplay;

impl TerminalDisplay {
    /// Create a new terminal display.
    pub fn new() -> Self {
        Self
    }
}

/// Error type for terminal display operations.
#[derive(Debug, thiserror::Error)]
pub enum DisplayError {
    #[error("failed to write to terminal: {0}")]
    Io(#[from] io::Error),
}

impl BoardDisplay for TerminalDisplay {
    type Error = DisplayError;

    fn show(&mut self, board: &Board, feedback: &BoardFeedback) -> Result<(), Self::Error> {
        render(&mut io::stdout(), board, feedback)
    }
}

/// Render a position with its feedback to any writer, rank 8 on top.
pub fn render(
    w: &mut impl Write,
    board: &Board,
    feedback: &BoardFeedback,
) -> Result<(), DisplayError> {
    for rank in (0..BOARD_SIZE).rev() {
        write!(w, " {} ", rank + 1)?;
        for file in 0..BOARD_SIZE {
            let square = Square::at(rank, file);
            let symbol = board.piece_at(square).map_or('·', |piece| piece.char());
            match background(feedback.get(square)) {
                Some(code) => write!(w, "\x1b[{code}m {symbol} \x1b[0m")?,
                None => write!(w, " {symbol} ")?,
            }
        }
        writeln!(w)?;
    }
    writeln!(w, "    a  b  c  d  e  f  g  h")?;
    w.flush()?;
    Ok(())
}

/// ANSI background code for a feedback variant.
fn background(feedback: Option<SquareFeedback>) -> Option<u8> {
    match feedback? {
        SquareFeedback::Destination => Some(44),
        SquareFeedback::Capture => Some(41),
        SquareFeedback::Origin => Some(42),
        SquareFeedback::Check => Some(45),
        SquareFeedback::Checker => Some(43),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render_to_string(board: &Board, feedback: &BoardFeedback) -> String {
        let mut buf = Vec::new();
        render(&mut buf, board, feedback).expect("rendering to buffer should succeed");
        String::from_utf8(buf).expect("output should be valid UTF-8")
    }

    fn sq(name: &str) -> Square {
        name.parse().expect("test square is invalid")
    }

    fn with(square: &str, kind: SquareFeedback) -> BoardFeedback {
        let mut feedback = BoardFeedback::new();
        feedback.set(sq(square), kind);
        feedback
    }

    #[test]
    fn show_empty_feedback_contains_all_ranks() {
        let output = render_to_string(&Board::standard(), &BoardFeedback::new());

        for rank in '1'..='8' {
            assert!(
                output.contains(rank),
                "output should contain rank label '{rank}'"
            );
        }
    }

    #[test]
    fn show_empty_feedback_contains_file_labels() {
        let output = render_to_string(&Board::standard(), &BoardFeedback::new());

        assert!(
            output.contains("a  b  c  d  e  f  g  h"),
            "output should contain file labels"
        );
    }

    #[test]
    fn rank_eight_is_printed_first() {
        let output = render_to_string(&Board::standard(), &BoardFeedback::new());
        let lines: Vec<&str> = output.lines().collect();

        assert_eq!(lines[0], " 8  r  n  b  q  k  b  n  r ");
        assert_eq!(lines[7], " 1  R  N  B  Q  K  B  N  R ");
        assert_eq!(lines[4], " 4  ·  ·  ·  ·  ·  ·  ·  · ");
    }

    #[test]
    fn show_destination_uses_blue_background() {
        let output = render_to_string(&Board::standard(), &with("e4", SquareFeedback::Destination));

        assert!(
            output.contains("\x1b[44m · \x1b[0m"),
            "destination should use blue ANSI background"
        );
    }

    #[test]
    fn show_capture_uses_red_background() {
        let output = render_to_string(&Board::standard(), &with("d7", SquareFeedback::Capture));

        assert!(
            output.contains("\x1b[41m p \x1b[0m"),
            "capture should use red ANSI background"
        );
    }

    #[test]
    fn show_origin_uses_green_background() {
        let output = render_to_string(&Board::standard(), &with("e2", SquareFeedback::Origin));

        assert!(
            output.contains("\x1b[42m P \x1b[0m"),
            "origin should use green ANSI background"
        );
    }

    #[test]
    fn show_check_uses_magenta_background() {
        let output = render_to_string(&Board::standard(), &with("e8", SquareFeedback::Check));

        assert!(
            output.contains("\x1b[45m k \x1b[0m"),
            "check should use magenta ANSI background"
        );
    }

    #[test]
    fn show_checker_uses_yellow_background() {
        let output = render_to_string(&Board::standard(), &with("h5", SquareFeedback::Checker));

        assert!(
            output.contains("\x1b[43m"),
            "checker should use yellow ANSI background"
        );
    }

    #[test]
    fn empty_feedback_has_no_ansi_codes() {
        let output = render_to_string(&Board::standard(), &BoardFeedback::new());

        assert!(
            !output.contains("\x1b[4"),
            "empty feedback should have no ANSI background codes"
        );
    }
}
