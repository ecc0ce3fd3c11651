//! Board aggregate and setup

use crate::legal;
use crate::movegen::{self, TargetList};
use crate::moves::{self, MoveError};
use crate::types::{self, Color, Coord, DrawReason, Outcome, Piece, PieceId, PieceKind, WinReason};
use stakechess_base::geometry;

use std::fmt::{self, Display};
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

/// Error parsing a [`Board`] from a placement string
#[derive(Debug, Clone, Error, Eq, PartialEq)]
pub enum PlacementParseError {
    /// Row is too large
    #[error("too many items in row {0}")]
    RowOverflow(u8),
    /// Row is too small
    #[error("not enough items in row {0}")]
    RowUnderflow(u8),
    /// Too many rows
    #[error("too many rows")]
    Overflow,
    /// Not enough rows
    #[error("not enough rows")]
    Underflow,
    /// Unexpected character
    #[error("unexpected char {0:?}")]
    UnexpectedChar(char),
    /// String doesn't have a placement part
    #[error("placement not specified")]
    NoPlacement,
    /// String doesn't have a side-to-move part
    #[error("no side to move")]
    NoSide,
    /// Error parsing side to move
    #[error("bad side to move: {0}")]
    Side(#[from] types::ColorParseError),
    /// String contains extra data
    #[error("extra data after side to move")]
    ExtraData,
    /// One of the sides doesn't have a king
    #[error("no king of color {0:?}")]
    NoKing(Color),
    /// One of the sides has more than one king
    #[error("more than one king of color {0:?}")]
    TooManyKings(Color),
}

pub(crate) type Cells = [Option<Piece>; 64];

const BACK_ROW: [PieceKind; 8] = [
    PieceKind::Rook,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Queen,
    PieceKind::King,
    PieceKind::Bishop,
    PieceKind::Knight,
    PieceKind::Rook,
];

/// The full game state: piece placement, side to move, selection, capture and
/// move logs, clocks, and the outcome once the game is finished.
///
/// The board is created once per game via [`Board::initial()`] and mutated in
/// place by [`Board::apply_move()`] and the termination signals. Exploratory
/// legality checks never touch it; they run on scratch copies of the cells.
#[derive(Debug, Clone, PartialEq)]
pub struct Board {
    pub(crate) cells: Cells,
    pub(crate) turn: Color,
    pub(crate) selected: Option<Coord>,
    pub(crate) legal_targets: TargetList,
    pub(crate) captured: Vec<Piece>,
    pub(crate) history: Vec<String>,
    pub(crate) clocks: [Duration; 2],
    pub(crate) outcome: Option<Outcome>,
}

impl Board {
    /// Returns a board without any pieces, white to move
    pub fn empty() -> Board {
        Board {
            cells: [None; 64],
            turn: Color::White,
            selected: None,
            legal_targets: TargetList::new(),
            captured: Vec::new(),
            history: Vec::new(),
            clocks: [Duration::ZERO; 2],
            outcome: None,
        }
    }

    /// Returns a board with the standard 32-piece starting position
    ///
    /// Piece ids are assigned sequentially during placement and stay stable for
    /// the life of the board.
    pub fn initial() -> Board {
        let mut board = Board::empty();
        let mut next_id = 0_u16;
        for color in [Color::Black, Color::White] {
            let back = geometry::back_row(color);
            let pawns = geometry::pawn_start_row(color);
            for (col, &kind) in BACK_ROW.iter().enumerate() {
                board.cells[Coord::new(back, col as u8).index()] =
                    Some(Piece::new(color, kind, PieceId::from(next_id)));
                next_id += 1;
            }
            for col in 0..8 {
                board.cells[Coord::new(pawns, col).index()] =
                    Some(Piece::new(color, PieceKind::Pawn, PieceId::from(next_id)));
                next_id += 1;
            }
        }
        board
    }

    /// Parses a board from a placement string
    ///
    /// The format is the piece-placement field of FEN followed by the side to
    /// move, e.g. `"rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w"`. All parsed
    /// pieces start with `has_moved = false`; the position must contain exactly
    /// one king per color.
    pub fn from_placement(s: &str) -> Result<Board, PlacementParseError> {
        type Error = PlacementParseError;

        let mut iter = s.split_ascii_whitespace().fuse();
        let placement = iter.next().ok_or(Error::NoPlacement)?;
        let side = Color::from_str(iter.next().ok_or(Error::NoSide)?)?;
        if iter.next().is_some() {
            return Err(Error::ExtraData);
        }

        let mut board = Board::empty();
        board.turn = side;
        let mut row = 0_u8;
        let mut col = 0_u8;
        let mut next_id = 0_u16;
        for c in placement.chars() {
            match c {
                '1'..='8' => {
                    let add = c as u8 - b'0';
                    if col + add > 8 {
                        return Err(Error::RowOverflow(row));
                    }
                    col += add;
                }
                '/' => {
                    if col < 8 {
                        return Err(Error::RowUnderflow(row));
                    }
                    row += 1;
                    col = 0;
                    if row >= 8 {
                        return Err(Error::Overflow);
                    }
                }
                _ => {
                    if col >= 8 {
                        return Err(Error::RowOverflow(row));
                    }
                    let color = if c.is_ascii_uppercase() {
                        Color::White
                    } else {
                        Color::Black
                    };
                    let kind = PieceKind::from_char(c.to_ascii_lowercase())
                        .ok_or(Error::UnexpectedChar(c))?;
                    board.cells[Coord::new(row, col).index()] =
                        Some(Piece::new(color, kind, PieceId::from(next_id)));
                    next_id += 1;
                    col += 1;
                }
            }
        }
        if col < 8 {
            return Err(Error::RowUnderflow(row));
        }
        if row < 7 {
            return Err(Error::Underflow);
        }

        for color in [Color::White, Color::Black] {
            let kings = Coord::iter()
                .filter(|c| {
                    matches!(
                        board.cells[c.index()],
                        Some(p) if p.color == color && p.kind == PieceKind::King
                    )
                })
                .count();
            match kings {
                0 => return Err(Error::NoKing(color)),
                1 => {}
                _ => return Err(Error::TooManyKings(color)),
            }
        }

        Ok(board)
    }

    /// Returns the contents of the square with coordinate `c`
    #[inline]
    pub fn get(&self, c: Coord) -> Option<Piece> {
        self.cells[c.index()]
    }

    /// Puts `piece` to the square with coordinate `c`
    ///
    /// This is a raw editing operation for building positions programmatically;
    /// it performs no validation.
    #[inline]
    pub fn put(&mut self, c: Coord, piece: Option<Piece>) {
        self.cells[c.index()] = piece;
    }

    /// Returns side to move
    #[inline]
    pub fn turn(&self) -> Color {
        self.turn
    }

    /// Returns the position of the king of color `c`, if present
    pub fn king_pos(&self, c: Color) -> Option<Coord> {
        movegen::king_pos_in(&self.cells, c)
    }

    /// Returns `true` if the side `c` is currently in check
    ///
    /// Degrades gracefully: a board without a king of color `c` is reported as
    /// not in check.
    #[inline]
    pub fn is_in_check(&self, c: Color) -> bool {
        movegen::is_in_check(self, c)
    }

    /// Returns `true` if the side `c` is checkmated
    #[inline]
    pub fn is_checkmate(&self, c: Color) -> bool {
        legal::is_checkmate(self, c)
    }

    /// Returns `true` if the side `c` is stalemated
    #[inline]
    pub fn is_stalemate(&self, c: Color) -> bool {
        legal::is_stalemate(self, c)
    }

    /// Returns the legal destinations for the piece on `src`
    #[inline]
    pub fn valid_moves(&self, src: Coord) -> TargetList {
        legal::valid_moves(self, src)
    }

    /// Applies the move `from -> to`, with all the special-move side effects
    ///
    /// See [`moves::apply_move`] for the contract and effect order.
    #[inline]
    pub fn apply_move(&mut self, from: Coord, to: Coord) -> Result<(), MoveError> {
        moves::apply_move(self, from, to)
    }

    /// Selects the piece on `c` as a move source and recomputes its legal targets
    ///
    /// Returns `true` if the selection took. Selecting an empty square, an
    /// opponent piece, or anything on a finished board clears the selection
    /// instead.
    pub fn select(&mut self, c: Coord) -> bool {
        match self.get(c) {
            Some(p) if p.color == self.turn && self.outcome.is_none() => {
                let targets = legal::valid_moves(self, c);
                self.selected = Some(c);
                self.legal_targets = targets;
                true
            }
            _ => {
                self.deselect();
                false
            }
        }
    }

    /// Clears the selection and its legal targets
    pub fn deselect(&mut self) {
        self.selected = None;
        self.legal_targets.clear();
    }

    /// Returns the currently selected square, if any
    #[inline]
    pub fn selected(&self) -> Option<Coord> {
        self.selected
    }

    /// Returns the legal targets of the current selection
    #[inline]
    pub fn legal_targets(&self) -> &[Coord] {
        &self.legal_targets
    }

    /// Returns the captured pieces, in capture order
    #[inline]
    pub fn captured(&self) -> &[Piece] {
        &self.captured
    }

    /// Returns the move history as notation strings
    #[inline]
    pub fn history(&self) -> &[String] {
        &self.history
    }

    /// Returns the remaining time carried for color `c`
    ///
    /// The clocks are owned by the surrounding game; the rules never read them.
    #[inline]
    pub fn clock(&self, c: Color) -> Duration {
        self.clocks[c.index()]
    }

    /// Stores the remaining time for color `c`
    #[inline]
    pub fn set_clock(&mut self, c: Color, remaining: Duration) {
        self.clocks[c.index()] = remaining;
    }

    /// Returns the game outcome, `None` while the game is still being played
    #[inline]
    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    /// Returns `true` once a terminating condition has been reached
    #[inline]
    pub fn over(&self) -> bool {
        self.outcome.is_some()
    }

    /// Returns the winning color, if the game is over and was not drawn
    #[inline]
    pub fn winner(&self) -> Option<Color> {
        self.outcome.and_then(|o| o.winner())
    }

    pub(crate) fn finish(&mut self, outcome: Outcome) {
        if self.outcome.is_none() {
            self.outcome = Some(outcome);
            self.deselect();
        }
    }

    /// Records a resignation by `c`; the opponent wins
    pub fn resign(&mut self, c: Color) {
        self.finish(Outcome::win(c.inv(), WinReason::Resignation));
    }

    /// Records that `c` ran out of time; the opponent wins
    ///
    /// Time expiry is signaled by the timing collaborator, never detected here.
    pub fn forfeit_on_time(&mut self, c: Color) {
        self.finish(Outcome::win(c.inv(), WinReason::TimeForfeit));
    }

    /// Records an aborted game; nobody wins
    pub fn abort(&mut self) {
        self.finish(Outcome::Draw(DrawReason::Aborted));
    }

    /// Records a draw by agreement
    pub fn agree_draw(&mut self) {
        self.finish(Outcome::Draw(DrawReason::Agreement));
    }

    /// Wraps the board to allow pretty-printing with the given style
    ///
    /// The resulting wrapper implements [`fmt::Display`], so can be used with
    /// `write!()`, `println!()`, or `ToString::to_string`.
    #[inline]
    pub fn pretty(&self, style: PrettyStyle) -> Pretty<'_> {
        Pretty { board: self, style }
    }

    /// Converts the board into a placement string
    ///
    /// Does the same as `Board::to_string()`. It is recommended to use this
    /// function instead of `to_string()` for better readability.
    #[inline]
    pub fn as_placement(&self) -> String {
        self.to_string()
    }
}

impl Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        for row in 0..8 {
            if row != 0 {
                write!(f, "/")?;
            }
            let mut empty = 0;
            for col in 0..8 {
                match self.cells[Coord::new(row, col).index()] {
                    None => empty += 1,
                    Some(piece) => {
                        if empty != 0 {
                            write!(f, "{}", empty)?;
                            empty = 0;
                        }
                        write!(f, "{}", piece.as_char())?;
                    }
                }
            }
            if empty != 0 {
                write!(f, "{}", empty)?;
            }
        }
        write!(f, " {}", self.turn)
    }
}

impl FromStr for Board {
    type Err = PlacementParseError;

    fn from_str(s: &str) -> Result<Board, Self::Err> {
        Board::from_placement(s)
    }
}

/// Style for [`Board::pretty()`]
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum PrettyStyle {
    /// Print pieces and frames as ASCII characters
    Ascii,
    /// Print pieces and frames as fancy Unicode characters
    Utf8,
}

/// Wrapper to pretty-print the board
pub struct Pretty<'a> {
    board: &'a Board,
    style: PrettyStyle,
}

impl Display for Pretty<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        let (horz, vert, angle) = match self.style {
            PrettyStyle::Ascii => ('-', '|', '+'),
            PrettyStyle::Utf8 => ('─', '│', '┼'),
        };
        for row in 0..8_u8 {
            write!(f, "{}{}", (b'8' - row) as char, vert)?;
            for col in 0..8_u8 {
                let ch = match (self.board.cells[Coord::new(row, col).index()], self.style) {
                    (Some(p), PrettyStyle::Ascii) => p.as_char(),
                    (Some(p), PrettyStyle::Utf8) => p.as_utf8_char(),
                    (None, _) => '.',
                };
                write!(f, "{}", ch)?;
            }
            writeln!(f)?;
        }
        write!(f, "{}{}", horz, angle)?;
        for _ in 0..8 {
            write!(f, "{}", horz)?;
        }
        writeln!(f)?;
        let indicator = match (self.board.turn, self.style) {
            (Color::White, PrettyStyle::Ascii) => 'W',
            (Color::Black, PrettyStyle::Ascii) => 'B',
            (Color::White, PrettyStyle::Utf8) => '○',
            (Color::Black, PrettyStyle::Utf8) => '●',
        };
        writeln!(f, "{}{}abcdefgh", indicator, vert)
    }
}
