//! Pseudo-legal move generation.
//!
//! Moves obey piece geometry and occupancy but may leave the mover's own
//! king attacked; [`crate::legality`] filters those out.
//!
//! Generation order is fixed per piece kind:
//! - pawn: single push, double push, capture toward the a-file, capture
//!   toward the h-file; promotions expand to queen, rook, bishop, knight
//! - knight and king steps: in the order of [`KNIGHT_OFFSETS`] /
//!   [`KING_OFFSETS`], then king-side and queen-side castling
//! - sliders: direction by direction, nearest square first
//!
//! The order is reproducible, but callers should compare move lists as sets.

use std::fmt;

use crate::attacks::{KING_OFFSETS, KNIGHT_OFFSETS, is_attacked, ray, slider_directions};
use crate::square::Square;
use crate::state::{GameState, king_home, rook_home};
use crate::types::{CastlingSide, Color, Piece, PieceKind};

/// What a move does beyond relocating one piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveKind {
    Normal,
    /// Pawn advancing two squares from its starting rank.
    DoublePush,
    /// Pawn capturing onto the en passant target square.
    EnPassantCapture,
    /// King move of a castle; the rook moves as part of the same move.
    Castle(CastlingSide),
    /// Pawn reaching the last rank, replaced by the given kind.
    Promotion(PieceKind),
}

/// A move from one square to another.
///
/// For castling `from`/`to` are the king's squares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    pub from: Square,
    pub to: Square,
    pub kind: MoveKind,
}

impl Move {
    pub const fn new(from: Square, to: Square, kind: MoveKind) -> Self {
        Self { from, to, kind }
    }

    #[inline]
    pub const fn promotion(&self) -> Option<PieceKind> {
        match self.kind {
            MoveKind::Promotion(kind) => Some(kind),
            _ => None,
        }
    }
}

/// Coordinate notation: `e2e4`, `e7e8q`, `e1g1`.
impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)?;
        if let Some(kind) = self.promotion() {
            write!(f, "{}", kind.char())?;
        }
        Ok(())
    }
}

/// Pseudo-legal moves of the piece on `from`.
///
/// Empty if `from` is empty or holds a piece of the side not to move.
pub fn pseudo_legal_moves(state: &GameState, from: Square) -> Vec<Move> {
    let mut moves = Vec::new();
    let Some(piece) = state.board().piece_at(from) else {
        return moves;
    };
    if piece.color != state.side_to_move() {
        return moves;
    }

    match piece.kind {
        PieceKind::Pawn => pawn_moves(state, from, piece.color, &mut moves),
        PieceKind::Knight => step_moves(state, from, piece, &KNIGHT_OFFSETS, &mut moves),
        PieceKind::King => {
            step_moves(state, from, piece, &KING_OFFSETS, &mut moves);
            castling_moves(state, from, piece.color, &mut moves);
        }
        PieceKind::Bishop | PieceKind::Rook | PieceKind::Queen => {
            slider_moves(state, from, piece, &mut moves)
        }
    }
    moves
}

fn pawn_moves(state: &GameState, from: Square, color: Color, moves: &mut Vec<Move>) {
    let board = state.board();
    let forward = color.pawn_direction();

    if let Some(one) = from.offset(forward, 0)
        && board.is_empty(one)
    {
        push_pawn_move(moves, from, one, color);

        if from.rank() == color.pawn_rank()
            && let Some(two) = one.offset(forward, 0)
            && board.is_empty(two)
        {
            moves.push(Move::new(from, two, MoveKind::DoublePush));
        }
    }

    for d_file in [-1, 1] {
        let Some(to) = from.offset(forward, d_file) else {
            continue;
        };
        if board.color_at(to) == Some(!color) {
            push_pawn_move(moves, from, to, color);
        } else if state.en_passant() == Some(to) {
            moves.push(Move::new(from, to, MoveKind::EnPassantCapture));
        }
    }
}

/// Adds a pawn move, expanded into one move per promotion kind on the last rank.
fn push_pawn_move(moves: &mut Vec<Move>, from: Square, to: Square, color: Color) {
    if to.rank() == color.opposite().back_rank() {
        moves.extend(
            PieceKind::PROMOTIONS
                .into_iter()
                .map(|kind| Move::new(from, to, MoveKind::Promotion(kind))),
        );
    } else {
        moves.push(Move::new(from, to, MoveKind::Normal));
    }
}

fn step_moves(
    state: &GameState,
    from: Square,
    piece: Piece,
    offsets: &[(i8, i8)],
    moves: &mut Vec<Move>,
) {
    moves.extend(
        offsets
            .iter()
            .filter_map(|&(d_rank, d_file)| from.offset(d_rank, d_file))
            .filter(|&to| state.board().color_at(to) != Some(piece.color))
            .map(|to| Move::new(from, to, MoveKind::Normal)),
    );
}

fn slider_moves(state: &GameState, from: Square, piece: Piece, moves: &mut Vec<Move>) {
    let board = state.board();
    let Some(directions) = slider_directions(piece.kind) else {
        return;
    };

    for &direction in directions {
        // The ray ends on the first occupied square; keep it only if it is an enemy.
        moves.extend(
            ray(board, from, direction)
                .filter(|&to| board.color_at(to) != Some(piece.color))
                .map(|to| Move::new(from, to, MoveKind::Normal)),
        );
    }
}

fn castling_moves(state: &GameState, from: Square, color: Color, moves: &mut Vec<Move>) {
    let board = state.board();
    if from != king_home(color) {
        return;
    }
    let them = !color;
    let rank = color.back_rank();

    for side in CastlingSide::ALL {
        if !state.castling().has(color, side) {
            continue;
        }
        if board.piece_at(rook_home(color, side)) != Some(PieceKind::Rook.of(color)) {
            continue;
        }

        let rook_file = side.rook_from_file();
        let (low, high) = if rook_file < from.file() {
            (rook_file + 1, from.file())
        } else {
            (from.file() + 1, rook_file)
        };
        if (low..high).any(|file| !board.is_empty(Square::at(rank, file))) {
            continue;
        }

        // The king may not start on, pass through or land on an attacked square.
        let king_to = side.king_to_file();
        let (low, high) = (from.file().min(king_to), from.file().max(king_to));
        if (low..=high).any(|file| is_attacked(board, them, Square::at(rank, file))) {
            continue;
        }

        moves.push(Move::new(
            from,
            Square::at(rank, king_to),
            MoveKind::Castle(side),
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fen;
    use std::collections::HashSet;

    fn sq(name: &str) -> Square {
        name.parse().expect("test square is invalid")
    }

    fn state(fen: &str) -> GameState {
        fen::import(fen).expect("invalid FEN")
    }

    fn destinations(state: &GameState, from: &str) -> HashSet<String> {
        pseudo_legal_moves(state, sq(from))
            .into_iter()
            .map(|mv| mv.to.to_string())
            .collect()
    }

    fn set(squares: &[&str]) -> HashSet<String> {
        squares.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn starting_pawn_has_single_and_double_push() {
        let state = GameState::new();
        let moves = pseudo_legal_moves(&state, sq("e2"));

        assert_eq!(moves.len(), 2);
        assert!(moves.contains(&Move::new(sq("e2"), sq("e3"), MoveKind::Normal)));
        assert!(moves.contains(&Move::new(sq("e2"), sq("e4"), MoveKind::DoublePush)));
    }

    #[test]
    fn blocked_pawn_has_no_double_push() {
        let state = state("4k3/8/8/8/8/4n3/4P3/4K3 w - - 0 1");
        assert!(pseudo_legal_moves(&state, sq("e2")).is_empty());

        let state = self::state("4k3/8/8/8/4n3/8/4P3/4K3 w - - 0 1");
        assert_eq!(destinations(&state, "e2"), set(&["e3"]));
    }

    #[test]
    fn black_pawn_moves_down() {
        let state = state("4k3/3p4/2N5/8/8/8/8/4K3 b - - 0 1");
        assert_eq!(destinations(&state, "d7"), set(&["d6", "d5", "c6"]));
    }

    #[test]
    fn pawn_does_not_capture_own_piece_or_empty_diagonal() {
        let state = state("4k3/8/8/8/8/3N4/4P3/4K3 w - - 0 1");
        assert_eq!(destinations(&state, "e2"), set(&["e3", "e4"]));
    }

    #[test]
    fn en_passant_capture_generated_from_target() {
        let state = state("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 1");
        let moves = pseudo_legal_moves(&state, sq("e5"));

        assert!(moves.contains(&Move::new(sq("e5"), sq("d6"), MoveKind::EnPassantCapture)));
        assert!(moves.contains(&Move::new(sq("e5"), sq("e6"), MoveKind::Normal)));
        assert_eq!(moves.len(), 2);
    }

    #[test]
    fn promotion_emits_every_kind() {
        let state = state("1n2k3/P7/8/8/8/8/8/4K3 w - - 0 1");
        let moves: HashSet<Move> = pseudo_legal_moves(&state, sq("a7")).into_iter().collect();

        let expected: HashSet<Move> = PieceKind::PROMOTIONS
            .into_iter()
            .flat_map(|kind| {
                [
                    Move::new(sq("a7"), sq("a8"), MoveKind::Promotion(kind)),
                    Move::new(sq("a7"), sq("b8"), MoveKind::Promotion(kind)),
                ]
            })
            .collect();
        assert_eq!(moves, expected);
    }

    #[test]
    fn knight_in_corner_and_center() {
        let state = GameState::new();
        assert_eq!(destinations(&state, "b1"), set(&["a3", "c3"]));

        let state = self::state("4k3/8/8/8/3N4/8/8/4K3 w - - 0 1");
        assert_eq!(pseudo_legal_moves(&state, sq("d4")).len(), 8);
    }

    #[test]
    fn rook_scan_stops_at_pieces() {
        let state = state("4k3/8/8/3p4/8/8/3R1P2/4K3 w - - 0 1");
        assert_eq!(
            destinations(&state, "d2"),
            set(&["a2", "b2", "c2", "e2", "d1", "d3", "d4", "d5"])
        );
    }

    #[test]
    fn bishop_and_queen_directions() {
        let state = state("4k3/8/8/8/3B4/8/8/4K3 w - - 0 1");
        assert_eq!(pseudo_legal_moves(&state, sq("d4")).len(), 13);

        let state = self::state("4k3/8/8/8/3Q4/8/8/4K3 w - - 0 1");
        assert_eq!(pseudo_legal_moves(&state, sq("d4")).len(), 27);
    }

    #[test]
    fn king_excludes_own_pieces() {
        let state = GameState::new();
        assert!(pseudo_legal_moves(&state, sq("e1")).is_empty());
    }

    #[test]
    fn castling_both_sides_when_clear() {
        let state = state("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1");
        let moves = pseudo_legal_moves(&state, sq("e1"));

        assert!(moves.contains(&Move::new(
            sq("e1"),
            sq("g1"),
            MoveKind::Castle(CastlingSide::KingSide)
        )));
        assert!(moves.contains(&Move::new(
            sq("e1"),
            sq("c1"),
            MoveKind::Castle(CastlingSide::QueenSide)
        )));
    }

    #[test]
    fn castling_requires_right_rook_and_empty_path() {
        // No rights.
        let state = state("r3k2r/8/8/8/8/8/8/R3K2R w - - 0 1");
        assert!(
            !pseudo_legal_moves(&state, sq("e1"))
                .iter()
                .any(|m| matches!(m.kind, MoveKind::Castle(_)))
        );

        // Knight on b1 blocks queen-side even though b1 is not a king square.
        let state = self::state("r3k2r/8/8/8/8/8/8/RN2K2R w KQkq - 0 1");
        let moves = pseudo_legal_moves(&state, sq("e1"));
        assert!(!moves.iter().any(|m| m.kind == MoveKind::Castle(CastlingSide::QueenSide)));
        assert!(moves.iter().any(|m| m.kind == MoveKind::Castle(CastlingSide::KingSide)));
    }

    #[test]
    fn castling_blocked_by_attacked_transit_square() {
        // Black rook on f8 attacks f1.
        let state = state("4kr2/8/8/8/8/8/8/R3K2R w KQ - 0 1");
        let moves = pseudo_legal_moves(&state, sq("e1"));

        assert!(!moves.iter().any(|m| m.kind == MoveKind::Castle(CastlingSide::KingSide)));
        assert!(moves.iter().any(|m| m.kind == MoveKind::Castle(CastlingSide::QueenSide)));
    }

    #[test]
    fn castling_allowed_when_only_b_file_attacked() {
        // Black rook on b8 attacks b1, which the king never crosses.
        let state = state("1r2k3/8/8/8/8/8/8/R3K3 w Q - 0 1");
        let moves = pseudo_legal_moves(&state, sq("e1"));
        assert!(moves.iter().any(|m| m.kind == MoveKind::Castle(CastlingSide::QueenSide)));
    }

    #[test]
    fn no_castling_out_of_check() {
        let state = state("4r1k1/8/8/8/8/8/8/R3K2R w KQ - 0 1");
        let moves = pseudo_legal_moves(&state, sq("e1"));
        assert!(!moves.iter().any(|m| matches!(m.kind, MoveKind::Castle(_))));
    }

    #[test]
    fn opponent_piece_yields_nothing() {
        let state = GameState::new();
        assert!(pseudo_legal_moves(&state, sq("e7")).is_empty());
        assert!(pseudo_legal_moves(&state, sq("e4")).is_empty());
    }

    #[test]
    fn move_display_uses_coordinates() {
        assert_eq!(Move::new(sq("e2"), sq("e4"), MoveKind::DoublePush).to_string(), "e2e4");
        assert_eq!(
            Move::new(sq("e7"), sq("e8"), MoveKind::Promotion(PieceKind::Queen)).to_string(),
            "e7e8q"
        );
    }
}
