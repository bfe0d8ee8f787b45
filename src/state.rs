use crate::board::Board;
use crate::movegen::{Move, MoveKind};
use crate::square::Square;
use crate::types::{CastlingSide, Color, KING_FILE, PieceKind};

/// Which castling moves are still permitted.
///
/// Rights only ever go from `true` to `false` during a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CastlingRights {
    pub white_kingside: bool,
    pub white_queenside: bool,
    pub black_kingside: bool,
    pub black_queenside: bool,
}

impl CastlingRights {
    pub const ALL: Self = Self {
        white_kingside: true,
        white_queenside: true,
        black_kingside: true,
        black_queenside: true,
    };

    pub const NONE: Self = Self {
        white_kingside: false,
        white_queenside: false,
        black_kingside: false,
        black_queenside: false,
    };

    pub const fn has(&self, color: Color, side: CastlingSide) -> bool {
        match (color, side) {
            (Color::White, CastlingSide::KingSide) => self.white_kingside,
            (Color::White, CastlingSide::QueenSide) => self.white_queenside,
            (Color::Black, CastlingSide::KingSide) => self.black_kingside,
            (Color::Black, CastlingSide::QueenSide) => self.black_queenside,
        }
    }

    pub fn set(&mut self, color: Color, side: CastlingSide, allowed: bool) {
        let flag = match (color, side) {
            (Color::White, CastlingSide::KingSide) => &mut self.white_kingside,
            (Color::White, CastlingSide::QueenSide) => &mut self.white_queenside,
            (Color::Black, CastlingSide::KingSide) => &mut self.black_kingside,
            (Color::Black, CastlingSide::QueenSide) => &mut self.black_queenside,
        };
        *flag = allowed;
    }

    pub fn revoke(&mut self, color: Color, side: CastlingSide) {
        self.set(color, side, false);
    }

    pub fn revoke_all(&mut self, color: Color) {
        for side in CastlingSide::ALL {
            self.revoke(color, side);
        }
    }

    pub const fn is_empty(&self) -> bool {
        !(self.white_kingside
            || self.white_queenside
            || self.black_kingside
            || self.black_queenside)
    }

    /// Revoke whatever right is tied to a rook starting on `square`.
    fn revoke_for_rook_square(&mut self, square: Square) {
        for color in Color::ALL {
            for side in CastlingSide::ALL {
                if square == rook_home(color, side) {
                    self.revoke(color, side);
                }
            }
        }
    }
}

impl Default for CastlingRights {
    fn default() -> Self {
        Self::ALL
    }
}

/// Starting square of a side's king.
pub const fn king_home(color: Color) -> Square {
    Square::at(color.back_rank(), KING_FILE)
}

/// Starting square of the rook a side castles with.
pub const fn rook_home(color: Color, side: CastlingSide) -> Square {
    Square::at(color.back_rank(), side.rook_from_file())
}

/// The complete game position: placement plus the flags move generation needs.
///
/// This is the single mutable entity of a game. It is created with
/// [`GameState::new`] and mutated in place as moves are played.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    pub(crate) board: Board,
    pub(crate) side_to_move: Color,
    pub(crate) castling: CastlingRights,
    pub(crate) en_passant: Option<Square>,
    pub(crate) halfmove_clock: u32,
    pub(crate) fullmove_number: u32,
}

impl GameState {
    /// Standard initial position, White to move.
    pub fn new() -> Self {
        Self {
            board: Board::standard(),
            side_to_move: Color::White,
            castling: CastlingRights::ALL,
            en_passant: None,
            halfmove_clock: 0,
            fullmove_number: 1,
        }
    }

    #[inline]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[inline]
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    #[inline]
    pub fn castling(&self) -> CastlingRights {
        self.castling
    }

    /// Square skipped over by the last move, if it was a pawn double push.
    #[inline]
    pub fn en_passant(&self) -> Option<Square> {
        self.en_passant
    }

    /// Half-moves since the last capture or pawn move.
    #[inline]
    pub fn halfmove_clock(&self) -> u32 {
        self.halfmove_clock
    }

    #[inline]
    pub fn fullmove_number(&self) -> u32 {
        self.fullmove_number
    }

    /// Square of the side to move's king.
    pub fn our_king(&self) -> Square {
        self.board
            .king_square(self.side_to_move)
            .expect("king must exist")
    }

    /// Whether a move captures something, including en passant.
    pub fn is_capture(&self, mv: &Move) -> bool {
        match mv.kind {
            MoveKind::EnPassantCapture => true,
            MoveKind::Castle(_) => false,
            _ => self.board.piece_at(mv.to).is_some(),
        }
    }

    /// Plays a move without checking that it is legal.
    ///
    /// Updates placement, castling rights, the en passant target, both
    /// clocks and the side to move. Callers must only pass moves produced
    /// by move generation for this exact state.
    pub(crate) fn play_unchecked(&mut self, mv: Move) {
        let us = self.side_to_move;
        let capture = self.is_capture(&mv);
        let piece = self
            .board
            .take(mv.from)
            .expect("move origin must hold a piece");
        debug_assert_eq!(piece.color, us);

        match mv.kind {
            MoveKind::Normal | MoveKind::DoublePush => {
                self.board.set(mv.to, Some(piece));
            }
            MoveKind::EnPassantCapture => {
                // The captured pawn sits beside the mover, not on the destination.
                self.board.take(Square::at(mv.from.rank(), mv.to.file()));
                self.board.set(mv.to, Some(piece));
            }
            MoveKind::Castle(side) => {
                let rook = self.board.take(rook_home(us, side));
                self.board
                    .set(Square::at(us.back_rank(), side.rook_to_file()), rook);
                self.board.set(mv.to, Some(piece));
            }
            MoveKind::Promotion(kind) => {
                self.board.set(mv.to, Some(kind.of(us)));
            }
        }

        if piece.kind == PieceKind::King {
            self.castling.revoke_all(us);
        }
        self.castling.revoke_for_rook_square(mv.from);
        self.castling.revoke_for_rook_square(mv.to);

        self.en_passant = match mv.kind {
            MoveKind::DoublePush => mv.from.offset(us.pawn_direction(), 0),
            _ => None,
        };

        if capture || piece.kind == PieceKind::Pawn {
            self.halfmove_clock = 0;
        } else {
            self.halfmove_clock = self.halfmove_clock.saturating_add(1);
        }

        if us == Color::Black {
            self.fullmove_number = self.fullmove_number.saturating_add(1);
        }
        self.side_to_move = !us;
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

/// Standard initial position, White to move.
pub fn new_game() -> GameState {
    GameState::new()
}
