use std::collections::HashMap;
use std::fmt;

use log::{debug, info, warn};
use thiserror::Error;

use crate::attacks::attackers;
use crate::board::Board;
use crate::feedback::{CheckInfo, FeedbackSource, compute_feedback};
use crate::legality::{is_legal, legal_moves};
use crate::movegen::{Move, MoveKind};
use crate::square::{OutOfBounds, Square};
use crate::state::{CastlingRights, GameState};
use crate::status::{GameStatus, in_check, status};
use crate::types::{Color, PieceKind};
use crate::{BoardDisplay, SquareInput};

/// Why a selection or move was rejected.
///
/// All of these are recoverable and leave the game state untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MoveError {
    #[error(transparent)]
    OutOfBounds(#[from] OutOfBounds),
    #[error("no piece on {0}")]
    EmptySquareSelected(Square),
    #[error("the piece on {0} belongs to the side not to move")]
    NotYourTurn(Square),
    #[error("{from} to {to} is not a legal move")]
    IllegalMove { from: Square, to: Square },
    #[error("the game is already over")]
    GameAlreadyOver,
}

/// Why the game ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameOverReason {
    Checkmate { winner: Color },
    Stalemate,
    /// A hundred half-moves without a capture or pawn move.
    FiftyMoveRule,
    /// The same position arose a third time.
    ThreefoldRepetition,
}

impl fmt::Display for GameOverReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameOverReason::Checkmate { winner } => write!(f, "checkmate, {winner} wins"),
            GameOverReason::Stalemate => f.write_str("stalemate"),
            GameOverReason::FiftyMoveRule => f.write_str("draw by the fifty-move rule"),
            GameOverReason::ThreefoldRepetition => f.write_str("draw by threefold repetition"),
        }
    }
}

/// Where the controller is in the select → move cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    AwaitingSelection,
    AwaitingDestination {
        selected: Square,
        legal_moves: Vec<Move>,
    },
    GameOver {
        reason: GameOverReason,
    },
}

/// Result of feeding one square selection to the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// A piece of the side to move was picked up.
    Selected { from: Square },
    /// The selection was dropped without moving.
    Deselected { reason: MoveError },
    /// Nothing changed.
    Ignored { reason: MoveError },
    /// A move was played.
    Played { mv: Move, status: GameStatus },
}

/// Error when building a [`ControllerConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("pawns cannot promote to {0:?}")]
    InvalidPromotion(PieceKind),
}

/// Controller options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControllerConfig {
    promotion: PieceKind,
    fifty_move_rule: bool,
    threefold_repetition: bool,
}

impl ControllerConfig {
    /// Kind a pawn becomes when promoted through a destination click.
    pub fn with_promotion(mut self, kind: PieceKind) -> Result<Self, ConfigError> {
        if !kind.is_promotable() {
            return Err(ConfigError::InvalidPromotion(kind));
        }
        self.promotion = kind;
        Ok(self)
    }

    pub fn with_fifty_move_rule(mut self, enabled: bool) -> Self {
        self.fifty_move_rule = enabled;
        self
    }

    pub fn with_threefold_repetition(mut self, enabled: bool) -> Self {
        self.threefold_repetition = enabled;
        self
    }

    #[inline]
    pub fn promotion(&self) -> PieceKind {
        self.promotion
    }

    #[inline]
    pub fn fifty_move_rule(&self) -> bool {
        self.fifty_move_rule
    }

    #[inline]
    pub fn threefold_repetition(&self) -> bool {
        self.threefold_repetition
    }
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            promotion: PieceKind::Queen,
            fifty_move_rule: true,
            threefold_repetition: true,
        }
    }
}

/// Error from a session driven by [`GameController::run`].
#[derive(Debug, Error)]
pub enum SessionError<I: fmt::Debug + fmt::Display, D: fmt::Debug + fmt::Display> {
    #[error("input failed: {0}")]
    Input(I),
    #[error("display failed: {0}")]
    Display(D),
}

/// Everything that identifies a position for repetition purposes.
type PositionKey = (Board, Color, CastlingRights, Option<Square>);

fn position_key(state: &GameState) -> PositionKey {
    (
        *state.board(),
        state.side_to_move(),
        state.castling(),
        capturable_en_passant(state),
    )
}

/// The en passant target, only if a legal move actually captures there.
fn capturable_en_passant(state: &GameState) -> Option<Square> {
    let target = state.en_passant()?;
    let behind = -state.side_to_move().pawn_direction();
    [-1, 1]
        .into_iter()
        .filter_map(|d_file| target.offset(behind, d_file))
        .flat_map(|from| legal_moves(state, from))
        .any(|mv| mv.kind == MoveKind::EnPassantCapture)
        .then_some(target)
}

/// Plays a legal move on `state` and returns the resulting status.
///
/// Fails without touching `state` if the game is already decided or the
/// move is not among the legal moves of its origin square.
pub fn apply_move(state: &mut GameState, mv: Move) -> Result<GameStatus, MoveError> {
    if status(state).is_terminal() {
        return Err(MoveError::GameAlreadyOver);
    }
    if !is_legal(state, &mv) {
        return Err(MoveError::IllegalMove {
            from: mv.from,
            to: mv.to,
        });
    }
    state.play_unchecked(mv);
    Ok(status(state))
}

/// Drives a game from square selections: pick a piece, then pick where it goes.
///
/// Owns the only mutable [`GameState`] of the game.
#[derive(Debug)]
pub struct GameController {
    state: GameState,
    phase: Phase,
    config: ControllerConfig,
    history: HashMap<PositionKey, u32>,
}

impl GameController {
    #[inline]
    pub fn new() -> Self {
        Self::from_state(GameState::new())
    }

    pub fn with_config(config: ControllerConfig) -> Self {
        Self::from_state_with_config(GameState::new(), config)
    }

    /// Creates a controller from an existing position.
    pub fn from_state(state: GameState) -> Self {
        Self::from_state_with_config(state, ControllerConfig::default())
    }

    pub fn from_state_with_config(state: GameState, config: ControllerConfig) -> Self {
        let mut controller = Self {
            phase: Phase::AwaitingSelection,
            history: HashMap::from([(position_key(&state), 1)]),
            state,
            config,
        };
        // An imported position may already be decided.
        if let Some(reason) = controller.game_over_reason(status(&controller.state)) {
            controller.phase = Phase::GameOver { reason };
        }
        controller
    }

    /// Back to the standard initial position, keeping the configuration.
    pub fn reset(&mut self) {
        *self = Self::with_config(self.config);
        info!("game reset");
    }

    #[inline]
    pub fn state(&self) -> &GameState {
        &self.state
    }

    #[inline]
    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    #[inline]
    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    /// Get the piece at a given square, if any
    #[inline]
    pub fn piece_at(&self, square: Square) -> Option<crate::types::Piece> {
        self.state.board().piece_at(square)
    }

    /// Status of the current position for the side to move.
    pub fn status(&self) -> GameStatus {
        status(&self.state)
    }

    pub fn game_over(&self) -> Option<GameOverReason> {
        match self.phase {
            Phase::GameOver { reason } => Some(reason),
            _ => None,
        }
    }

    #[inline]
    pub fn is_game_over(&self) -> bool {
        self.game_over().is_some()
    }

    /// Legal moves from `square`; empty once the game is over.
    pub fn legal_moves(&self, square: Square) -> Vec<Move> {
        if self.is_game_over() {
            return Vec::new();
        }
        legal_moves(&self.state, square)
    }

    /// Selects a square given raw coordinates, rejecting off-board ones.
    pub fn select_coords(&mut self, rank: u8, file: u8) -> Result<Transition, MoveError> {
        let square = Square::new(rank, file)?;
        self.select(square)
    }

    /// Feeds one square selection through the state machine.
    ///
    /// Only [`MoveError::GameAlreadyOver`] is returned as an error; other
    /// rejections are reported through [`Transition::Ignored`] and
    /// [`Transition::Deselected`].
    pub fn select(&mut self, square: Square) -> Result<Transition, MoveError> {
        match std::mem::replace(&mut self.phase, Phase::AwaitingSelection) {
            Phase::GameOver { reason } => {
                self.phase = Phase::GameOver { reason };
                Err(MoveError::GameAlreadyOver)
            }
            Phase::AwaitingSelection => Ok(self.pick_up(square)),
            Phase::AwaitingDestination {
                selected,
                legal_moves,
            } => Ok(self.put_down(selected, &legal_moves, square)),
        }
    }

    fn pick_up(&mut self, square: Square) -> Transition {
        let Some(piece) = self.state.board().piece_at(square) else {
            debug!("ignored selection of empty square {square}");
            return Transition::Ignored {
                reason: MoveError::EmptySquareSelected(square),
            };
        };
        if piece.color != self.state.side_to_move() {
            debug!("ignored selection of {} piece on {square}", piece.color);
            return Transition::Ignored {
                reason: MoveError::NotYourTurn(square),
            };
        }

        let legal_moves = legal_moves(&self.state, square);
        debug!(
            "selected {:?} on {square} with {} legal moves",
            piece.kind,
            legal_moves.len()
        );
        self.phase = Phase::AwaitingDestination {
            selected: square,
            legal_moves,
        };
        Transition::Selected { from: square }
    }

    fn put_down(&mut self, selected: Square, legal_moves: &[Move], square: Square) -> Transition {
        // Several moves share a destination only for promotions; pick the configured kind.
        let chosen = legal_moves.iter().copied().find(|mv| {
            mv.to == square
                && mv
                    .promotion()
                    .is_none_or(|kind| kind == self.config.promotion)
        });

        match chosen {
            Some(mv) => {
                let status = self.play(mv);
                Transition::Played { mv, status }
            }
            None => {
                debug!("deselected {selected}: {square} is not a legal destination");
                Transition::Deselected {
                    reason: MoveError::IllegalMove {
                        from: selected,
                        to: square,
                    },
                }
            }
        }
    }

    /// Plays an explicit move, e.g. a promotion to a specific kind.
    ///
    /// Clears any pending selection. Fails without changing anything if the
    /// game is over or the move is not legal.
    pub fn apply_move(&mut self, mv: Move) -> Result<GameStatus, MoveError> {
        if self.is_game_over() {
            warn!("rejected {mv}: game is over");
            return Err(MoveError::GameAlreadyOver);
        }
        if !is_legal(&self.state, &mv) {
            warn!("rejected illegal move {mv}");
            return Err(MoveError::IllegalMove {
                from: mv.from,
                to: mv.to,
            });
        }
        Ok(self.play(mv))
    }

    fn play(&mut self, mv: Move) -> GameStatus {
        let mover = self.state.side_to_move();
        self.state.play_unchecked(mv);
        *self.history.entry(position_key(&self.state)).or_insert(0) += 1;

        let status = status(&self.state);
        info!("{mover} played {mv} ({:?}): {status}", mv.kind);

        self.phase = match self.game_over_reason(status) {
            Some(reason) => {
                info!("game over: {reason}");
                Phase::GameOver { reason }
            }
            None => Phase::AwaitingSelection,
        };
        status
    }

    fn game_over_reason(&self, status: GameStatus) -> Option<GameOverReason> {
        match status {
            GameStatus::Checkmate(winner) => Some(GameOverReason::Checkmate { winner }),
            GameStatus::Stalemate => Some(GameOverReason::Stalemate),
            _ if self.config.fifty_move_rule && self.state.halfmove_clock() >= 100 => {
                Some(GameOverReason::FiftyMoveRule)
            }
            _ if self.config.threefold_repetition
                && self
                    .history
                    .get(&position_key(&self.state))
                    .is_some_and(|&count| count >= 3) =>
            {
                Some(GameOverReason::ThreefoldRepetition)
            }
            _ => None,
        }
    }

    /// Drives a session: render, then apply each click until input runs out
    /// or the game ends.
    pub fn run<I, D>(
        &mut self,
        input: &mut I,
        display: &mut D,
    ) -> Result<(), SessionError<I::Error, D::Error>>
    where
        I: SquareInput,
        D: BoardDisplay,
    {
        self.render(display).map_err(SessionError::Display)?;

        while !self.is_game_over() {
            let Some(square) = input.next_click().map_err(SessionError::Input)? else {
                break;
            };
            let transition = self.select(square);
            debug!("{square}: {transition:?}");
            self.render(display).map_err(SessionError::Display)?;
        }
        Ok(())
    }

    fn render<D: BoardDisplay>(&self, display: &mut D) -> Result<(), D::Error> {
        display.show(self.state.board(), &compute_feedback(self))
    }
}

impl Default for GameController {
    fn default() -> Self {
        Self::new()
    }
}

impl FeedbackSource for GameController {
    fn selected(&self) -> Option<Square> {
        match self.phase {
            Phase::AwaitingDestination { selected, .. } => Some(selected),
            _ => None,
        }
    }

    fn legal_moves(&self) -> &[Move] {
        match &self.phase {
            Phase::AwaitingDestination { legal_moves, .. } => legal_moves,
            _ => &[],
        }
    }

    fn is_capture(&self, mv: &Move) -> bool {
        self.state.is_capture(mv)
    }

    fn check_info(&self) -> Option<CheckInfo> {
        if !in_check(&self.state) {
            return None;
        }
        let king_square = self.state.our_king();
        Some(CheckInfo {
            king_square,
            checkers: attackers(self.state.board(), !self.state.side_to_move(), king_square),
        })
    }
}
