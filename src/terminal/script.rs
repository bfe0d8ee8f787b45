use std::collections::VecDeque;
use std::convert::Infallible;

use thiserror::Error;

use crate::SquareInput;
use crate::square::Square;

/// Error when parsing a click script.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("invalid square notation: '{0}'")]
pub struct ParseError(String);

/// A scriptable input that replays square clicks.
///
/// New script can be appended at any time for interactive use.
#[derive(Debug, Clone, Default)]
pub struct ScriptedInput {
    pending: VecDeque<Square>,
}

impl ScriptedInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with an initial script.
    pub fn from_script(script: &str) -> Result<Self, ParseError> {
        let mut input = Self::new();
        input.push_script(script)?;
        Ok(input)
    }

    /// Parse and queue additional clicks.
    ///
    /// Format:
    /// - Squares are 2 characters (e.g., "e2", "a1")
    /// - Whitespace and periods separate squares and may be omitted
    ///
    /// Examples:
    /// - `"e2e4"` - Click e2, then e4
    /// - `"e2 e4. e7 e5."` - Two moves
    ///
    /// On error nothing is queued.
    pub fn push_script(&mut self, script: &str) -> Result<(), ParseError> {
        let squares = parse_script(script)?;
        self.pending.extend(squares);
        Ok(())
    }

    /// Number of clicks still queued.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.pending.len()
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }
}

impl SquareInput for ScriptedInput {
    type Error = Infallible;

    fn next_click(&mut self) -> Result<Option<Square>, Self::Error> {
        Ok(self.pending.pop_front())
    }
}

/// Parse a click script into the squares it names, in order.
fn parse_script(script: &str) -> Result<Vec<Square>, ParseError> {
    let mut squares = Vec::new();
    let mut current_token = String::new();

    for ch in script.chars() {
        match ch {
            '.' => flush_token(&mut current_token, &mut squares)?,
            c if c.is_whitespace() => flush_token(&mut current_token, &mut squares)?,
            _ => {
                current_token.push(ch);

                // Squares are exactly 2 characters (e.g., "e2", "a1")
                if current_token.chars().count() == 2 {
                    flush_token(&mut current_token, &mut squares)?;
                }
            }
        }
    }

    flush_token(&mut current_token, &mut squares)?;
    Ok(squares)
}

/// Add the current token to the output and clear it.
fn flush_token(token: &mut String, squares: &mut Vec<Square>) -> Result<(), ParseError> {
    if !token.is_empty() {
        let square: Square = token.parse().map_err(|_| ParseError(token.clone()))?;
        squares.push(square);
        token.clear();
    }
    Ok(())
}
