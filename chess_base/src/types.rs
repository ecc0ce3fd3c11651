use std::fmt;
use std::str::FromStr;

use derive_more::{Display, From};
use thiserror::Error;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum CoordParseError {
    #[error("unexpected file char {0:?}")]
    UnexpectedFileChar(char),
    #[error("unexpected rank char {0:?}")]
    UnexpectedRankChar(char),
    #[error("invalid string length")]
    BadLength,
}

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum ColorParseError {
    #[error("unexpected color char {0:?}")]
    UnexpectedChar(char),
    #[error("invalid string length")]
    BadLength,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Color {
    White = 0,
    Black = 1,
}

impl Color {
    pub const fn inv(&self) -> Color {
        match *self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    pub const fn index(&self) -> usize {
        *self as usize
    }

    pub fn as_char(&self) -> char {
        match *self {
            Color::White => 'w',
            Color::Black => 'b',
        }
    }

    pub fn from_char(c: char) -> Option<Color> {
        match c {
            'w' => Some(Color::White),
            'b' => Some(Color::Black),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match *self {
            Color::White => "white",
            Color::Black => "black",
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        write!(f, "{}", self.as_char())
    }
}

impl FromStr for Color {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != 1 {
            return Err(ColorParseError::BadLength);
        }
        let ch = s.as_bytes()[0] as char;
        Color::from_char(ch).ok_or(ColorParseError::UnexpectedChar(ch))
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum PieceKind {
    Pawn = 0,
    Knight = 1,
    Bishop = 2,
    Rook = 3,
    Queen = 4,
    King = 5,
}

impl PieceKind {
    pub const ALL: [PieceKind; 6] = [
        PieceKind::Pawn,
        PieceKind::Knight,
        PieceKind::Bishop,
        PieceKind::Rook,
        PieceKind::Queen,
        PieceKind::King,
    ];

    /// Uppercase algebraic letter, `None` for pawns.
    pub const fn san_letter(&self) -> Option<char> {
        match *self {
            PieceKind::Pawn => None,
            PieceKind::Knight => Some('N'),
            PieceKind::Bishop => Some('B'),
            PieceKind::Rook => Some('R'),
            PieceKind::Queen => Some('Q'),
            PieceKind::King => Some('K'),
        }
    }

    pub fn as_char(&self, color: Color) -> char {
        let ch = match *self {
            PieceKind::Pawn => 'p',
            PieceKind::Knight => 'n',
            PieceKind::Bishop => 'b',
            PieceKind::Rook => 'r',
            PieceKind::Queen => 'q',
            PieceKind::King => 'k',
        };
        match color {
            Color::White => ch.to_ascii_uppercase(),
            Color::Black => ch,
        }
    }

    pub fn as_utf8_char(&self, color: Color) -> char {
        match (color, *self) {
            (Color::White, PieceKind::Pawn) => '♙',
            (Color::White, PieceKind::Knight) => '♘',
            (Color::White, PieceKind::Bishop) => '♗',
            (Color::White, PieceKind::Rook) => '♖',
            (Color::White, PieceKind::Queen) => '♕',
            (Color::White, PieceKind::King) => '♔',
            (Color::Black, PieceKind::Pawn) => '♟',
            (Color::Black, PieceKind::Knight) => '♞',
            (Color::Black, PieceKind::Bishop) => '♝',
            (Color::Black, PieceKind::Rook) => '♜',
            (Color::Black, PieceKind::Queen) => '♛',
            (Color::Black, PieceKind::King) => '♚',
        }
    }

    /// Parses a lowercase piece letter. The caller decides the color from case.
    pub fn from_char(c: char) -> Option<PieceKind> {
        match c {
            'p' => Some(PieceKind::Pawn),
            'n' => Some(PieceKind::Knight),
            'b' => Some(PieceKind::Bishop),
            'r' => Some(PieceKind::Rook),
            'q' => Some(PieceKind::Queen),
            'k' => Some(PieceKind::King),
            _ => None,
        }
    }
}

/// Stable piece identity, assigned at board setup and never reused.
///
/// Identity is distinct from board position: it survives relocation, capture and
/// promotion, which is what lets a UI track captured pieces and animate moves.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Display, From)]
pub struct PieceId(u16);

impl PieceId {
    pub const fn index(&self) -> usize {
        self.0 as usize
    }
}

/// A piece instance on (or captured off) the board.
///
/// `kind` only ever changes through pawn promotion; `color` and `id` never change;
/// `has_moved` is set the first time the piece is relocated and never reset.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Piece {
    pub kind: PieceKind,
    pub color: Color,
    pub has_moved: bool,
    pub id: PieceId,
}

impl Piece {
    pub const fn new(color: Color, kind: PieceKind, id: PieceId) -> Piece {
        Piece {
            kind,
            color,
            has_moved: false,
            id,
        }
    }

    pub fn as_char(&self) -> char {
        self.kind.as_char(self.color)
    }

    pub fn as_utf8_char(&self) -> char {
        self.kind.as_utf8_char(self.color)
    }
}

/// A square coordinate, packed into one byte.
///
/// `row` 0 is black's back rank (rank 8), `row` 7 is white's back rank (rank 1);
/// `col` 0 is the a-file.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Coord(u8);

impl Coord {
    pub const fn new(row: u8, col: u8) -> Coord {
        assert!(row < 8 && col < 8, "coord parts must be between 0 and 7");
        Coord((row << 3) | col)
    }

    pub const fn from_index(val: usize) -> Coord {
        assert!(val < 64, "coord index must be between 0 and 63");
        Coord(val as u8)
    }

    pub const fn row(&self) -> u8 {
        self.0 >> 3
    }

    pub const fn col(&self) -> u8 {
        self.0 & 7
    }

    pub const fn index(&self) -> usize {
        self.0 as usize
    }

    /// Offsets the coordinate by `(dr, dc)`, returning `None` when the result
    /// leaves the board.
    pub fn try_shift(self, dr: i8, dc: i8) -> Option<Coord> {
        let row = self.row() as i8 + dr;
        let col = self.col() as i8 + dc;
        if !(0..8).contains(&row) || !(0..8).contains(&col) {
            return None;
        }
        Some(Coord::new(row as u8, col as u8))
    }

    pub fn file_char(&self) -> char {
        (b'a' + self.col()) as char
    }

    pub fn rank_char(&self) -> char {
        (b'8' - self.row()) as char
    }

    pub fn iter() -> impl Iterator<Item = Self> {
        (0_u8..64_u8).map(Coord)
    }
}

impl fmt::Debug for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        write!(f, "Coord({})", self)
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        write!(f, "{}{}", self.file_char(), self.rank_char())
    }
}

impl FromStr for Coord {
    type Err = CoordParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != 2 {
            return Err(CoordParseError::BadLength);
        }
        let bytes = s.as_bytes();
        let col = match bytes[0] {
            b @ b'a'..=b'h' => b - b'a',
            b => return Err(CoordParseError::UnexpectedFileChar(b as char)),
        };
        let row = match bytes[1] {
            b @ b'1'..=b'8' => b'8' - b,
            b => return Err(CoordParseError::UnexpectedRankChar(b as char)),
        };
        Ok(Coord::new(row, col))
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum CastlingSide {
    Queen = 0,
    King = 1,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum WinReason {
    Checkmate,
    TimeForfeit,
    Resignation,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum DrawReason {
    Agreement,
    Aborted,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Outcome {
    Win { side: Color, reason: WinReason },
    Draw(DrawReason),
}

impl Outcome {
    pub fn win(side: Color, reason: WinReason) -> Outcome {
        Outcome::Win { side, reason }
    }

    pub fn winner(&self) -> Option<Color> {
        match *self {
            Outcome::Win { side, .. } => Some(side),
            Outcome::Draw(_) => None,
        }
    }

    pub fn is_draw(&self) -> bool {
        matches!(*self, Outcome::Draw(_))
    }
}

impl fmt::Display for WinReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        let s = match *self {
            WinReason::Checkmate => "checkmate",
            WinReason::TimeForfeit => "time forfeit",
            WinReason::Resignation => "resignation",
        };
        write!(f, "{}", s)
    }
}

impl fmt::Display for DrawReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        let s = match *self {
            DrawReason::Agreement => "agreement",
            DrawReason::Aborted => "aborted game",
        };
        write!(f, "{}", s)
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        match *self {
            Outcome::Win { side, reason } => write!(f, "{} wins by {}", side.name(), reason),
            Outcome::Draw(reason) => write!(f, "draw by {}", reason),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coord() {
        let mut coords = Vec::new();
        for row in 0..8 {
            for col in 0..8 {
                let coord = Coord::new(row, col);
                assert_eq!(coord.row(), row);
                assert_eq!(coord.col(), col);
                coords.push(coord);
            }
        }
        assert_eq!(coords, Coord::iter().collect::<Vec<_>>());
    }

    #[test]
    fn test_coord_shift() {
        let e4 = Coord::from_str("e4").unwrap();
        assert_eq!(e4.try_shift(-1, 0), Some(Coord::from_str("e5").unwrap()));
        assert_eq!(e4.try_shift(2, 1), Some(Coord::from_str("f2").unwrap()));
        assert_eq!(Coord::from_str("a1").unwrap().try_shift(1, 0), None);
        assert_eq!(Coord::from_str("h8").unwrap().try_shift(0, 1), None);
    }

    #[test]
    fn test_coord_str() {
        assert_eq!(Coord::new(4, 1).to_string(), "b4".to_string());
        assert_eq!(Coord::new(7, 0).to_string(), "a1".to_string());
        assert_eq!(Coord::from_str("a1"), Ok(Coord::new(7, 0)));
        assert_eq!(Coord::from_str("b4"), Ok(Coord::new(4, 1)));
        assert_eq!(
            Coord::from_str("h9"),
            Err(CoordParseError::UnexpectedRankChar('9'))
        );
        assert_eq!(
            Coord::from_str("i4"),
            Err(CoordParseError::UnexpectedFileChar('i'))
        );
        assert_eq!(Coord::from_str("e44"), Err(CoordParseError::BadLength));
    }

    #[test]
    fn test_color() {
        assert_eq!(Color::White.inv(), Color::Black);
        assert_eq!(Color::Black.inv(), Color::White);
        assert_eq!(Color::from_str("w"), Ok(Color::White));
        assert_eq!(Color::from_str("b"), Ok(Color::Black));
        assert_eq!(
            Color::from_str("x"),
            Err(ColorParseError::UnexpectedChar('x'))
        );
    }

    #[test]
    fn test_piece_chars() {
        for color in [Color::White, Color::Black] {
            for kind in PieceKind::ALL {
                let ch = kind.as_char(color);
                assert_eq!(PieceKind::from_char(ch.to_ascii_lowercase()), Some(kind));
                let expect_white = ch.is_ascii_uppercase();
                assert_eq!(expect_white, color == Color::White);
            }
        }
    }

    #[test]
    fn test_san_letter() {
        assert_eq!(PieceKind::Pawn.san_letter(), None);
        assert_eq!(PieceKind::Knight.san_letter(), Some('N'));
        assert_eq!(PieceKind::King.san_letter(), Some('K'));
    }

    #[test]
    fn test_outcome() {
        let win = Outcome::win(Color::White, WinReason::Checkmate);
        assert_eq!(win.winner(), Some(Color::White));
        assert!(!win.is_draw());
        assert_eq!(win.to_string(), "white wins by checkmate");

        let draw = Outcome::Draw(DrawReason::Agreement);
        assert_eq!(draw.winner(), None);
        assert!(draw.is_draw());
        assert_eq!(draw.to_string(), "draw by agreement");
    }
}
