use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Number of ranks and files on the board.
pub const BOARD_SIZE: u8 = 8;

/// A single square on the chess board.
///
/// `rank` 0 is White's back rank (rank "1"), `file` 0 is the a-file.
/// Both coordinates are always in `0..8`; off-board coordinates are
/// rejected at construction and never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Square {
    rank: u8,
    file: u8,
}

/// A coordinate pair outside `0..8`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("square (rank {rank}, file {file}) is off the board")]
pub struct OutOfBounds {
    pub rank: u8,
    pub file: u8,
}

impl Square {
    /// Creates a square, validating both coordinates.
    pub const fn new(rank: u8, file: u8) -> Result<Self, OutOfBounds> {
        if rank < BOARD_SIZE && file < BOARD_SIZE {
            Ok(Self { rank, file })
        } else {
            Err(OutOfBounds { rank, file })
        }
    }

    /// Creates a square from coordinates known to be on the board.
    pub(crate) const fn at(rank: u8, file: u8) -> Self {
        debug_assert!(rank < BOARD_SIZE && file < BOARD_SIZE);
        Self { rank, file }
    }

    /// Returns the rank index (0-7).
    #[inline]
    pub const fn rank(self) -> u8 {
        self.rank
    }

    /// Returns the file index (0-7).
    #[inline]
    pub const fn file(self) -> u8 {
        self.file
    }

    /// Returns the file letter ('a'-'h').
    #[inline]
    pub const fn file_char(self) -> char {
        (b'a' + self.file) as char
    }

    /// Returns the rank digit ('1'-'8').
    #[inline]
    pub const fn rank_char(self) -> char {
        (b'1' + self.rank) as char
    }

    /// Steps by a signed rank/file delta, or `None` if that leaves the board.
    pub fn offset(self, d_rank: i8, d_file: i8) -> Option<Self> {
        let rank = self.rank as i8 + d_rank;
        let file = self.file as i8 + d_file;
        if is_valid_square(rank, file) {
            Some(Self::at(rank as u8, file as u8))
        } else {
            None
        }
    }

    /// All 64 squares, a1, b1, .., h1, a2, .., h8.
    pub fn all() -> impl Iterator<Item = Square> {
        (0..BOARD_SIZE).flat_map(|rank| (0..BOARD_SIZE).map(move |file| Square::at(rank, file)))
    }
}

/// Whether signed coordinates lie on the board.
#[inline]
pub const fn is_valid_square(rank: i8, file: i8) -> bool {
    0 <= rank && rank < BOARD_SIZE as i8 && 0 <= file && file < BOARD_SIZE as i8
}

/// Parse algebraic notation like "e4" into a Square.
///
/// # Examples
/// ```
/// # use click_chess::square::Square;
/// let square: Square = "e4".parse().unwrap();
/// assert_eq!((square.rank(), square.file()), (3, 4));
/// ```
impl FromStr for Square {
    type Err = SquareParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        let (Some(file), Some(rank), None) = (chars.next(), chars.next(), chars.next()) else {
            return Err(SquareParseError::WrongLength);
        };

        let file = file.to_ascii_lowercase();
        if !('a'..='h').contains(&file) {
            return Err(SquareParseError::BadFile);
        }
        let rank = rank.to_digit(10).ok_or(SquareParseError::BadRank)?;
        if !(1..=8).contains(&rank) {
            return Err(SquareParseError::BadRank);
        }

        Ok(Square::at(rank as u8 - 1, file as u8 - b'a'))
    }
}

/// Display square in algebraic notation (e.g., "e4").
impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.file_char(), self.rank_char())
    }
}

/// Error type for parsing square notation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SquareParseError {
    /// Square notation must be exactly 2 characters
    #[error("square must be 2 characters (e.g., 'e4')")]
    WrongLength,
    /// File must be a letter from a-h
    #[error("file must be a-h")]
    BadFile,
    /// Rank must be a digit from 1-8
    #[error("rank must be 1-8")]
    BadRank,
}
