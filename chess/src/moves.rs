//! Move application

use crate::board::Board;
use crate::legal;
use crate::types::{CastlingSide, Coord, Outcome, PieceKind, WinReason};
use stakechess_base::geometry;

use thiserror::Error;

/// Error indicating that a move cannot be applied
///
/// Every error leaves the board exactly as it was.
#[derive(Debug, Clone, Error, Eq, PartialEq)]
pub enum MoveError {
    /// The game already has an outcome
    #[error("game is already over")]
    GameOver,
    /// There is no piece on the source square
    #[error("no piece on {0}")]
    EmptySource(Coord),
    /// The piece on the source square does not belong to the side to move
    #[error("piece on {0} does not belong to the side to move")]
    NotYourTurn(Coord),
    /// The destination is not a legal target for the piece on the source square
    #[error("{1} is not a legal destination for the piece on {0}")]
    IllegalDestination(Coord, Coord),
}

/// Applies the move `from -> to`, mutating the board in place
///
/// The destination must be one of `valid_moves(board, from)`; anything else is
/// rejected with a [`MoveError`] and the board stays untouched.
///
/// Effects, in order: a captured piece is appended to the capture log; the
/// moving piece's `has_moved` flag is set; a castling king drags its rook next
/// to itself; a pawn reaching the far rank becomes a queen; the piece is
/// relocated; the turn toggles; the selection is cleared; a notation string is
/// appended to the history; and if the new side to move is checkmated, the
/// outcome is recorded for the side that just moved.
pub fn apply_move(b: &mut Board, from: Coord, to: Coord) -> Result<(), MoveError> {
    if b.outcome.is_some() {
        return Err(MoveError::GameOver);
    }
    let mut piece = b.cells[from.index()].ok_or(MoveError::EmptySource(from))?;
    if piece.color != b.turn {
        return Err(MoveError::NotYourTurn(from));
    }
    if !legal::valid_moves_in(&b.cells, from).contains(&to) {
        return Err(MoveError::IllegalDestination(from, to));
    }

    let captured = b.cells[to.index()];
    if let Some(taken) = captured {
        b.captured.push(taken);
    }

    let moved_kind = piece.kind;
    piece.has_moved = true;

    // A king moving two columns is a castle; the rook hops to the other side.
    if piece.kind == PieceKind::King && from.col().abs_diff(to.col()) == 2 {
        let side = if to.col() > from.col() {
            CastlingSide::King
        } else {
            CastlingSide::Queen
        };
        let rook_from = Coord::new(from.row(), geometry::rook_start_col(side));
        let rook_to = Coord::new(from.row(), geometry::king_pass_col(side));
        if let Some(mut rook) = b.cells[rook_from.index()].take() {
            rook.has_moved = true;
            b.cells[rook_to.index()] = Some(rook);
        }
    }

    // Auto-queen: no underpromotion choice is offered.
    if piece.kind == PieceKind::Pawn && to.row() == geometry::promotion_row(piece.color) {
        piece.kind = PieceKind::Queen;
    }

    b.cells[to.index()] = Some(piece);
    b.cells[from.index()] = None;

    let mover = b.turn;
    b.turn = b.turn.inv();
    b.deselect();

    b.history.push(notation(moved_kind, from, to, captured.is_some()));

    if legal::is_checkmate(b, b.turn) {
        b.finish(Outcome::win(mover, WinReason::Checkmate));
    }

    Ok(())
}

/// Formats a move as `[piece letter]<from>[x]<to>`, e.g. `Ng1f3`, `e2e4`, `e4xd5`
fn notation(kind: PieceKind, from: Coord, to: Coord, capture: bool) -> String {
    let mut s = String::with_capacity(6);
    if let Some(letter) = kind.san_letter() {
        s.push(letter);
    }
    s.push(from.file_char());
    s.push(from.rank_char());
    if capture {
        s.push('x');
    }
    s.push(to.file_char());
    s.push(to.rank_char());
    s
}
