//! Legal move filtering and checkmate/stalemate detection

use crate::board::{Board, Cells};
use crate::movegen::{self, TargetList};
use crate::types::{Color, Coord};

pub(crate) fn valid_moves_in(cells: &Cells, src: Coord) -> TargetList {
    let Some(piece) = cells[src.index()] else {
        return TargetList::new();
    };
    let mut out = movegen::pseudo_moves_in(cells, src);
    let mut scratch = *cells;
    out.retain(|&mut dst| movegen::relocation_keeps_king_safe(&mut scratch, src, dst, piece.color));
    out
}

pub(crate) fn has_legal_moves_in(cells: &Cells, color: Color) -> bool {
    for src in Coord::iter() {
        match cells[src.index()] {
            Some(p) if p.color == color => {}
            _ => continue,
        }
        if !valid_moves_in(cells, src).is_empty() {
            return true;
        }
    }
    false
}

/// Returns the legal destinations for the piece on `src`
///
/// These are the pseudo-legal moves minus any whose relocation would leave the
/// mover's own king attacked. The king-safety test relocates the piece on a
/// scratch copy of the cells, so the live board is never touched. Returns an
/// empty list for an empty square.
pub fn valid_moves(b: &Board, src: Coord) -> TargetList {
    valid_moves_in(&b.cells, src)
}

/// Returns `true` if the side `color` has at least one legal move
pub fn has_legal_moves(b: &Board, color: Color) -> bool {
    has_legal_moves_in(&b.cells, color)
}

/// Returns `true` if `color` is in check with no legal move to escape it
///
/// A side with no legal moves that is *not* in check is stalemated, not
/// checkmated; this function reports `false` for it. Use [`is_stalemate`] for
/// that case.
pub fn is_checkmate(b: &Board, color: Color) -> bool {
    if !movegen::is_in_check(b, color) {
        return false;
    }
    !has_legal_moves_in(&b.cells, color)
}

/// Returns `true` if `color` is not in check but has no legal move
///
/// Move application never consults this; a caller that wants to end the game
/// on stalemate has to check it explicitly.
pub fn is_stalemate(b: &Board, color: Color) -> bool {
    if movegen::is_in_check(b, color) {
        return false;
    }
    !has_legal_moves_in(&b.cells, color)
}
