//! Pseudo-legal move generation and attack detection

use crate::board::{Board, Cells};
use crate::types::{CastlingSide, Color, Coord, Piece, PieceKind};
use stakechess_base::geometry;

use arrayvec::ArrayVec;

/// Destination squares for one piece.
///
/// A queen in the open never exceeds 27 targets, so the list lives on the stack.
pub type TargetList = ArrayVec<Coord, 32>;

const KNIGHT_STEPS: [(i8, i8); 8] = [
    (-2, -1),
    (-2, 1),
    (-1, -2),
    (-1, 2),
    (1, -2),
    (1, 2),
    (2, -1),
    (2, 1),
];

const KING_STEPS: [(i8, i8); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

const BISHOP_DIRS: [(i8, i8); 4] = [(-1, -1), (-1, 1), (1, -1), (1, 1)];
const ROOK_DIRS: [(i8, i8); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

#[inline]
fn color_at(cells: &Cells, c: Coord) -> Option<Color> {
    cells[c.index()].map(|p| p.color)
}

fn leaper_targets(cells: &Cells, src: Coord, color: Color, steps: &[(i8, i8)], out: &mut TargetList) {
    for &(dr, dc) in steps {
        if let Some(dst) = src.try_shift(dr, dc) {
            if color_at(cells, dst) != Some(color) {
                out.push(dst);
            }
        }
    }
}

fn slider_targets(cells: &Cells, src: Coord, color: Color, dirs: &[(i8, i8)], out: &mut TargetList) {
    for &(dr, dc) in dirs {
        let mut cur = src;
        while let Some(dst) = cur.try_shift(dr, dc) {
            match color_at(cells, dst) {
                None => out.push(dst),
                Some(c) => {
                    if c != color {
                        out.push(dst);
                    }
                    break;
                }
            }
            cur = dst;
        }
    }
}

fn pawn_targets(cells: &Cells, src: Coord, pawn: Piece, out: &mut TargetList) {
    let forward = geometry::pawn_forward(pawn.color);
    if let Some(one) = src.try_shift(forward, 0) {
        if cells[one.index()].is_none() {
            out.push(one);
            if src.row() == geometry::pawn_start_row(pawn.color) {
                if let Some(two) = one.try_shift(forward, 0) {
                    if cells[two.index()].is_none() {
                        out.push(two);
                    }
                }
            }
        }
    }
    for dc in [-1, 1] {
        if let Some(dst) = src.try_shift(forward, dc) {
            if matches!(color_at(cells, dst), Some(c) if c != pawn.color) {
                out.push(dst);
            }
        }
    }
}

/// Attack variant of a leaper: every in-bounds offset counts, friendly
/// occupancy included, since a defended square is still defended.
fn leaper_attacks(src: Coord, steps: &[(i8, i8)], out: &mut TargetList) {
    for &(dr, dc) in steps {
        if let Some(dst) = src.try_shift(dr, dc) {
            out.push(dst);
        }
    }
}

/// Attack variant of a slider: the ray includes the first occupied square
/// regardless of its color, then stops.
fn slider_attacks(cells: &Cells, src: Coord, dirs: &[(i8, i8)], out: &mut TargetList) {
    for &(dr, dc) in dirs {
        let mut cur = src;
        while let Some(dst) = cur.try_shift(dr, dc) {
            out.push(dst);
            if cells[dst.index()].is_some() {
                break;
            }
            cur = dst;
        }
    }
}

/// Attack variant of a pawn: both forward diagonals, occupied or not. A pawn
/// attacks an empty square too, which is what keeps the enemy king away from it.
fn pawn_attacks(src: Coord, color: Color, out: &mut TargetList) {
    let forward = geometry::pawn_forward(color);
    for dc in [-1, 1] {
        if let Some(dst) = src.try_shift(forward, dc) {
            out.push(dst);
        }
    }
}

fn castling_targets(cells: &Cells, src: Coord, king: Piece, out: &mut TargetList) {
    let back = geometry::back_row(king.color);
    if king.has_moved || src != Coord::new(back, geometry::KING_START_COL) {
        return;
    }
    if is_in_check_in(cells, king.color) {
        return;
    }
    let mut scratch = *cells;
    for side in [CastlingSide::King, CastlingSide::Queen] {
        let rook_sq = Coord::new(back, geometry::rook_start_col(side));
        match cells[rook_sq.index()] {
            Some(r) if r.kind == PieceKind::Rook && r.color == king.color && !r.has_moved => {}
            _ => continue,
        }
        let (lo, hi) = match side {
            CastlingSide::King => (geometry::KING_START_COL + 1, rook_sq.col() - 1),
            CastlingSide::Queen => (rook_sq.col() + 1, geometry::KING_START_COL - 1),
        };
        if !(lo..=hi).all(|col| cells[Coord::new(back, col).index()].is_none()) {
            continue;
        }
        let pass = Coord::new(back, geometry::king_pass_col(side));
        let dst = Coord::new(back, geometry::king_castle_col(side));
        if relocation_keeps_king_safe(&mut scratch, src, pass, king.color)
            && relocation_keeps_king_safe(&mut scratch, src, dst, king.color)
        {
            out.push(dst);
        }
    }
}

/// Relocates `from -> to` on the scratch cells, tests whether `color`'s king is
/// left attacked, and restores the cells before returning.
pub(crate) fn relocation_keeps_king_safe(
    cells: &mut Cells,
    from: Coord,
    to: Coord,
    color: Color,
) -> bool {
    let saved_from = cells[from.index()];
    let saved_to = cells[to.index()];
    cells[to.index()] = saved_from;
    cells[from.index()] = None;
    let safe = !is_in_check_in(cells, color);
    cells[from.index()] = saved_from;
    cells[to.index()] = saved_to;
    safe
}

pub(crate) fn pseudo_moves_in(cells: &Cells, src: Coord) -> TargetList {
    let mut out = TargetList::new();
    let Some(piece) = cells[src.index()] else {
        return out;
    };
    match piece.kind {
        PieceKind::Pawn => pawn_targets(cells, src, piece, &mut out),
        PieceKind::Knight => leaper_targets(cells, src, piece.color, &KNIGHT_STEPS, &mut out),
        PieceKind::Bishop => slider_targets(cells, src, piece.color, &BISHOP_DIRS, &mut out),
        PieceKind::Rook => slider_targets(cells, src, piece.color, &ROOK_DIRS, &mut out),
        PieceKind::Queen => {
            slider_targets(cells, src, piece.color, &BISHOP_DIRS, &mut out);
            slider_targets(cells, src, piece.color, &ROOK_DIRS, &mut out);
        }
        PieceKind::King => {
            leaper_targets(cells, src, piece.color, &KING_STEPS, &mut out);
            castling_targets(cells, src, piece, &mut out);
        }
    }
    out
}

pub(crate) fn attack_squares_in(cells: &Cells, src: Coord) -> TargetList {
    let mut out = TargetList::new();
    let Some(piece) = cells[src.index()] else {
        return out;
    };
    match piece.kind {
        PieceKind::Pawn => pawn_attacks(src, piece.color, &mut out),
        PieceKind::Knight => leaper_attacks(src, &KNIGHT_STEPS, &mut out),
        PieceKind::Bishop => slider_attacks(cells, src, &BISHOP_DIRS, &mut out),
        PieceKind::Rook => slider_attacks(cells, src, &ROOK_DIRS, &mut out),
        PieceKind::Queen => {
            slider_attacks(cells, src, &BISHOP_DIRS, &mut out);
            slider_attacks(cells, src, &ROOK_DIRS, &mut out);
        }
        // Castling never attacks anything.
        PieceKind::King => leaper_attacks(src, &KING_STEPS, &mut out),
    }
    out
}

pub(crate) fn is_attacked_in(cells: &Cells, target: Coord, by: Color) -> bool {
    for src in Coord::iter() {
        match cells[src.index()] {
            Some(p) if p.color == by => {}
            _ => continue,
        }
        if attack_squares_in(cells, src).contains(&target) {
            return true;
        }
    }
    false
}

pub(crate) fn king_pos_in(cells: &Cells, color: Color) -> Option<Coord> {
    Coord::iter().find(|c| {
        matches!(
            cells[c.index()],
            Some(p) if p.color == color && p.kind == PieceKind::King
        )
    })
}

pub(crate) fn is_in_check_in(cells: &Cells, color: Color) -> bool {
    match king_pos_in(cells, color) {
        Some(king) => is_attacked_in(cells, king, color.inv()),
        None => false,
    }
}

/// Returns the squares reachable by the piece on `src`, ignoring whether the
/// mover's own king would be left in check
///
/// Castling targets are included when the full eligibility conditions hold.
/// Returns an empty list for an empty square.
pub fn pseudo_moves(b: &Board, src: Coord) -> TargetList {
    pseudo_moves_in(&b.cells, src)
}

/// Returns the squares attacked by the piece on `src`
///
/// This differs from [`pseudo_moves`]: pawn diagonals count whether or not they
/// are occupied, sliders include the first blocking square regardless of its
/// color, and friendly-occupied squares count as attacked. Using the move
/// generator here instead would under-count king-move legality near defended
/// pieces.
pub fn attack_squares(b: &Board, src: Coord) -> TargetList {
    attack_squares_in(&b.cells, src)
}

/// Returns `true` if `target` is attacked by any piece of color `by`
pub fn is_attacked(b: &Board, target: Coord, by: Color) -> bool {
    is_attacked_in(&b.cells, target, by)
}

/// Returns `true` if the king of `color` is attacked
///
/// A board without that king is reported as not in check; the engine never
/// produces such a board, so this is a defensive fallback rather than a
/// reachable state.
pub fn is_in_check(b: &Board, color: Color) -> bool {
    is_in_check_in(&b.cells, color)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PieceId;
    use std::collections::BTreeSet;

    fn coords(list: &[&str]) -> BTreeSet<Coord> {
        list.iter().map(|s| s.parse().unwrap()).collect()
    }

    fn targets(list: TargetList) -> BTreeSet<Coord> {
        list.into_iter().collect()
    }

    fn bare(color: Color, kind: PieceKind) -> Option<Piece> {
        Some(Piece::new(color, kind, PieceId::from(99_u16)))
    }

    #[test]
    fn test_knight_center_and_corner() {
        let mut board = Board::empty();
        let d4: Coord = "d4".parse().unwrap();
        board.put(d4, bare(Color::White, PieceKind::Knight));
        assert_eq!(
            targets(pseudo_moves(&board, d4)),
            coords(&["b3", "b5", "c2", "c6", "e2", "e6", "f3", "f5"])
        );

        let mut board = Board::empty();
        let a1: Coord = "a1".parse().unwrap();
        board.put(a1, bare(Color::White, PieceKind::Knight));
        assert_eq!(targets(pseudo_moves(&board, a1)), coords(&["b3", "c2"]));
    }

    #[test]
    fn test_knight_friendly_blocked() {
        let mut board = Board::empty();
        let d4: Coord = "d4".parse().unwrap();
        board.put(d4, bare(Color::White, PieceKind::Knight));
        board.put("f5".parse().unwrap(), bare(Color::White, PieceKind::Pawn));
        board.put("b3".parse().unwrap(), bare(Color::Black, PieceKind::Pawn));
        let moves = targets(pseudo_moves(&board, d4));
        assert!(!moves.contains(&"f5".parse().unwrap()));
        assert!(moves.contains(&"b3".parse().unwrap()));
        // The attack map still covers the friendly square.
        let attacks = targets(attack_squares(&board, d4));
        assert!(attacks.contains(&"f5".parse().unwrap()));
    }

    #[test]
    fn test_pawn_moves() {
        let mut board = Board::empty();
        let e2: Coord = "e2".parse().unwrap();
        board.put(e2, bare(Color::White, PieceKind::Pawn));
        assert_eq!(targets(pseudo_moves(&board, e2)), coords(&["e3", "e4"]));

        // Blocked one ahead: no forward move at all.
        board.put("e3".parse().unwrap(), bare(Color::Black, PieceKind::Pawn));
        assert!(pseudo_moves(&board, e2).is_empty());

        // Blocked two ahead: single step only.
        board.put("e3".parse().unwrap(), None);
        board.put("e4".parse().unwrap(), bare(Color::Black, PieceKind::Pawn));
        assert_eq!(targets(pseudo_moves(&board, e2)), coords(&["e3"]));

        // Off the start row: single step only.
        let mut board = Board::empty();
        let e3: Coord = "e3".parse().unwrap();
        board.put(e3, bare(Color::White, PieceKind::Pawn));
        assert_eq!(targets(pseudo_moves(&board, e3)), coords(&["e4"]));

        // Black moves the other way.
        let mut board = Board::empty();
        let d7: Coord = "d7".parse().unwrap();
        board.put(d7, bare(Color::Black, PieceKind::Pawn));
        assert_eq!(targets(pseudo_moves(&board, d7)), coords(&["d6", "d5"]));
    }

    #[test]
    fn test_pawn_captures() {
        let mut board = Board::empty();
        let e4: Coord = "e4".parse().unwrap();
        board.put(e4, bare(Color::White, PieceKind::Pawn));
        board.put("d5".parse().unwrap(), bare(Color::Black, PieceKind::Pawn));
        board.put("f5".parse().unwrap(), bare(Color::White, PieceKind::Pawn));
        let moves = targets(pseudo_moves(&board, e4));
        // Enemy diagonal is a capture, friendly diagonal is not a move.
        assert!(moves.contains(&"d5".parse().unwrap()));
        assert!(!moves.contains(&"f5".parse().unwrap()));
        // Both diagonals are attacked, the empty one included.
        let board2 = {
            let mut b = Board::empty();
            b.put(e4, bare(Color::White, PieceKind::Pawn));
            b
        };
        assert_eq!(targets(attack_squares(&board2, e4)), coords(&["d5", "f5"]));
    }

    #[test]
    fn test_slider_blocking() {
        let mut board = Board::empty();
        let d4: Coord = "d4".parse().unwrap();
        board.put(d4, bare(Color::White, PieceKind::Rook));
        board.put("d6".parse().unwrap(), bare(Color::White, PieceKind::Pawn));
        board.put("f4".parse().unwrap(), bare(Color::Black, PieceKind::Pawn));
        let moves = targets(pseudo_moves(&board, d4));
        // Friendly blocker is excluded, the square before it is reachable.
        assert!(moves.contains(&"d5".parse().unwrap()));
        assert!(!moves.contains(&"d6".parse().unwrap()));
        // Enemy blocker is included (capture), nothing beyond it.
        assert!(moves.contains(&"f4".parse().unwrap()));
        assert!(!moves.contains(&"g4".parse().unwrap()));

        // The attack map includes the first blocker regardless of color.
        let attacks = targets(attack_squares(&board, d4));
        assert!(attacks.contains(&"d6".parse().unwrap()));
        assert!(!attacks.contains(&"d7".parse().unwrap()));
        assert!(attacks.contains(&"f4".parse().unwrap()));
        assert!(!attacks.contains(&"g4".parse().unwrap()));
    }

    #[test]
    fn test_queen_is_bishop_plus_rook() {
        let mut board = Board::empty();
        let d4: Coord = "d4".parse().unwrap();
        board.put(d4, bare(Color::White, PieceKind::Queen));
        assert_eq!(pseudo_moves(&board, d4).len(), 27);
    }

    #[test]
    fn test_king_adjacency() {
        let mut board = Board::empty();
        let e1: Coord = "e1".parse().unwrap();
        board.put(e1, bare(Color::White, PieceKind::King));
        board.put("e2".parse().unwrap(), bare(Color::White, PieceKind::Pawn));
        board.put("d2".parse().unwrap(), bare(Color::Black, PieceKind::Pawn));
        assert_eq!(
            targets(pseudo_moves(&board, e1)),
            coords(&["d1", "d2", "f1", "f2"])
        );
    }

    #[test]
    fn test_is_attacked() {
        let board = Board::from_placement("4k3/8/8/8/3p4/8/8/R3K3 w").unwrap();
        // Rook on a1 attacks along rank and file.
        assert!(is_attacked(&board, "a8".parse().unwrap(), Color::White));
        assert!(is_attacked(&board, "d1".parse().unwrap(), Color::White));
        // Its own square is not an attack target.
        assert!(!is_attacked(&board, "a1".parse().unwrap(), Color::White));
        // The black pawn attacks both diagonals below it.
        assert!(is_attacked(&board, "c3".parse().unwrap(), Color::Black));
        assert!(is_attacked(&board, "e3".parse().unwrap(), Color::Black));
        assert!(!is_attacked(&board, "d3".parse().unwrap(), Color::Black));
    }

    #[test]
    fn test_is_in_check() {
        let board = Board::from_placement("4k3/8/8/8/8/8/4r3/4K3 w").unwrap();
        assert!(is_in_check(&board, Color::White));
        assert!(!is_in_check(&board, Color::Black));

        // Interposed piece cancels the check.
        let board = Board::from_placement("4k3/8/8/8/8/4N3/4r3/4K3 w").unwrap();
        assert!(is_in_check(&board, Color::White));
        let board = Board::from_placement("4k3/8/8/8/8/4r3/4N3/4K3 w").unwrap();
        assert!(!is_in_check(&board, Color::White));
    }

    #[test]
    fn test_kingless_board_is_not_in_check() {
        let mut board = Board::empty();
        board.put("e4".parse().unwrap(), bare(Color::Black, PieceKind::Queen));
        assert!(!is_in_check(&board, Color::White));
    }

    #[test]
    fn test_castling() {
        // Open back rank: both castling targets.
        let board = Board::from_placement("r3k2r/8/8/8/8/8/8/R3K2R w").unwrap();
        let e1: Coord = "e1".parse().unwrap();
        let moves = targets(pseudo_moves(&board, e1));
        assert!(moves.contains(&"g1".parse().unwrap()));
        assert!(moves.contains(&"c1".parse().unwrap()));
        let e8: Coord = "e8".parse().unwrap();
        let moves = targets(pseudo_moves(&board, e8));
        assert!(moves.contains(&"g8".parse().unwrap()));
        assert!(moves.contains(&"c8".parse().unwrap()));

        // Initial position: both sides blocked.
        let board = Board::initial();
        let moves = targets(pseudo_moves(&board, e1));
        assert!(moves.is_empty());
    }

    #[test]
    fn test_castling_requires_unmoved_rook() {
        let mut board = Board::from_placement("4k3/8/8/8/8/8/8/R3K2R w").unwrap();
        let h1: Coord = "h1".parse().unwrap();
        let mut rook = board.get(h1).unwrap();
        rook.has_moved = true;
        board.put(h1, Some(rook));
        let moves = targets(pseudo_moves(&board, "e1".parse().unwrap()));
        assert!(!moves.contains(&"g1".parse().unwrap()));
        assert!(moves.contains(&"c1".parse().unwrap()));
    }

    #[test]
    fn test_castling_denied_in_check() {
        let board = Board::from_placement("4k3/8/8/8/8/8/4r3/R3K2R w").unwrap();
        let moves = targets(pseudo_moves(&board, "e1".parse().unwrap()));
        assert!(!moves.contains(&"g1".parse().unwrap()));
        assert!(!moves.contains(&"c1".parse().unwrap()));
    }

    #[test]
    fn test_castling_denied_through_attack() {
        // Black rook on f8 covers f1, the square the king passes through.
        let board = Board::from_placement("4kr2/8/8/8/8/8/8/R3K2R w").unwrap();
        let moves = targets(pseudo_moves(&board, "e1".parse().unwrap()));
        assert!(!moves.contains(&"g1".parse().unwrap()));
        assert!(moves.contains(&"c1".parse().unwrap()));

        // Queenside: d1 covered denies long castling only.
        let board = Board::from_placement("3rk3/8/8/8/8/8/8/R3K2R w").unwrap();
        let moves = targets(pseudo_moves(&board, "e1".parse().unwrap()));
        assert!(moves.contains(&"g1".parse().unwrap()));
        assert!(!moves.contains(&"c1".parse().unwrap()));
    }

    #[test]
    fn test_castling_denied_off_home_square() {
        let mut board = Board::from_placement("4k3/8/8/8/8/8/8/R2K3R w").unwrap();
        let d1: Coord = "d1".parse().unwrap();
        let moves = targets(pseudo_moves(&board, d1));
        assert!(!moves.contains(&"f1".parse().unwrap()));
        // Even back on e1, a moved king may not castle.
        let mut king = board.get(d1).unwrap();
        king.has_moved = true;
        board.put(d1, None);
        board.put("e1".parse().unwrap(), Some(king));
        let moves = targets(pseudo_moves(&board, "e1".parse().unwrap()));
        assert!(!moves.contains(&"g1".parse().unwrap()));
        assert!(!moves.contains(&"c1".parse().unwrap()));
    }
}
