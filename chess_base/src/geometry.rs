use crate::types::{CastlingSide, Color};

/// The column the king starts on (the e-file).
pub const KING_START_COL: u8 = 4;

pub const fn back_row(c: Color) -> u8 {
    match c {
        Color::White => 7,
        Color::Black => 0,
    }
}

pub const fn pawn_start_row(c: Color) -> u8 {
    match c {
        Color::White => 6,
        Color::Black => 1,
    }
}

pub const fn promotion_row(c: Color) -> u8 {
    match c {
        Color::White => 0,
        Color::Black => 7,
    }
}

/// Row delta of a single pawn step.
pub const fn pawn_forward(c: Color) -> i8 {
    match c {
        Color::White => -1,
        Color::Black => 1,
    }
}

pub const fn rook_start_col(s: CastlingSide) -> u8 {
    match s {
        CastlingSide::King => 7,
        CastlingSide::Queen => 0,
    }
}

pub const fn king_castle_col(s: CastlingSide) -> u8 {
    match s {
        CastlingSide::King => 6,
        CastlingSide::Queen => 2,
    }
}

/// The column the king passes through; also the column the rook lands on.
pub const fn king_pass_col(s: CastlingSide) -> u8 {
    match s {
        CastlingSide::King => 5,
        CastlingSide::Queen => 3,
    }
}
