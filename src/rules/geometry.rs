//! Line geometry: how a line continues when it reaches the board edge
//!
//! Three addressing modes are supported:
//! - **Clipped**: the edge ends the line
//! - **Wrap**: toroidal addressing, the line re-enters from the opposite edge
//! - **Bounce**: a diagonal reflects off the edge (the out-of-range component
//!   of its step is negated) and keeps going
//!
//! Bounce is only defined for diagonals. Asking for it on a row or column
//! quietly degrades to Clipped.

use crate::board::{Bitboard, Pos};

use super::Rules;

/// The four line directions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Horizontal,
    Vertical,
    /// Top-left to bottom-right (row == col on the great diagonal)
    MainDiagonal,
    /// Top-right to bottom-left (row + col == N - 1 on the great diagonal)
    AntiDiagonal,
}

impl Direction {
    /// Fixed checking order
    pub const ALL: [Direction; 4] = [
        Direction::Horizontal,
        Direction::Vertical,
        Direction::MainDiagonal,
        Direction::AntiDiagonal,
    ];

    /// Unit step as (row_delta, col_delta)
    #[inline]
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Horizontal => (0, 1),
            Direction::Vertical => (1, 0),
            Direction::MainDiagonal => (1, 1),
            Direction::AntiDiagonal => (1, -1),
        }
    }

    #[inline]
    pub fn is_diagonal(self) -> bool {
        matches!(self, Direction::MainDiagonal | Direction::AntiDiagonal)
    }
}

/// Addressing mode used when a line crosses the board edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GeometryMode {
    Clipped,
    Wrap,
    Bounce,
}

impl GeometryMode {
    /// Modes to try for a direction, in precedence order.
    ///
    /// Clipped always comes first. Bounce (diagonals only) is tried before
    /// Wrap, so when both rules are on, a diagonal that completes either
    /// way is reported as a bounce.
    pub fn precedence(direction: Direction, rules: Rules) -> Vec<GeometryMode> {
        let mut modes = Vec::with_capacity(3);
        modes.push(GeometryMode::Clipped);
        if rules.bounce && direction.is_diagonal() {
            modes.push(GeometryMode::Bounce);
        }
        if rules.wrap {
            modes.push(GeometryMode::Wrap);
        }
        modes
    }

    /// Mode used for straight-line pattern scanning (threats, evaluation)
    #[inline]
    pub fn line_mode(rules: Rules) -> GeometryMode {
        if rules.wrap {
            GeometryMode::Wrap
        } else {
            GeometryMode::Clipped
        }
    }
}

/// Walks a line away from an origin cell one unit at a time.
///
/// The origin itself is not yielded. The walk ends at the edge (Clipped),
/// or as soon as it would land on a cell it already visited (Wrap after a
/// full lap, Bounce off a corner).
#[derive(Debug, Clone)]
pub struct Ray {
    size: i32,
    row: i32,
    col: i32,
    dr: i32,
    dc: i32,
    mode: GeometryMode,
    visited: Bitboard,
    done: bool,
}

impl Ray {
    pub fn new(size: usize, origin: Pos, dr: i32, dc: i32, mode: GeometryMode) -> Self {
        let mode = if mode == GeometryMode::Bounce && (dr == 0 || dc == 0) {
            GeometryMode::Clipped
        } else {
            mode
        };
        let mut visited = Bitboard::new();
        visited.set(origin);
        Self {
            size: size as i32,
            row: i32::from(origin.row),
            col: i32::from(origin.col),
            dr,
            dc,
            mode,
            visited,
            done: false,
        }
    }

    #[inline]
    fn in_range(&self, v: i32) -> bool {
        v >= 0 && v < self.size
    }
}

impl Iterator for Ray {
    type Item = Pos;

    fn next(&mut self) -> Option<Pos> {
        if self.done {
            return None;
        }

        let mut nr = self.row + self.dr;
        let mut nc = self.col + self.dc;

        match self.mode {
            GeometryMode::Clipped => {}
            GeometryMode::Wrap => {
                nr = nr.rem_euclid(self.size);
                nc = nc.rem_euclid(self.size);
            }
            GeometryMode::Bounce => {
                if !self.in_range(nr) {
                    self.dr = -self.dr;
                    nr = self.row + self.dr;
                }
                if !self.in_range(nc) {
                    self.dc = -self.dc;
                    nc = self.col + self.dc;
                }
            }
        }

        if !self.in_range(nr) || !self.in_range(nc) {
            self.done = true;
            return None;
        }

        #[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
        let pos = Pos::new(nr as u8, nc as u8);
        if self.visited.get(pos) {
            self.done = true;
            return None;
        }

        self.visited.set(pos);
        self.row = nr;
        self.col = nc;
        Some(pos)
    }
}

/// Resolve the cell `distance` unit steps from `origin`.
///
/// - Clipped: `None` once the step leaves the board.
/// - Wrap: always defined, coordinates taken modulo the board size.
/// - Bounce: walks with reflection; `None` if the walk would revisit a cell.
///
/// Pure: the same inputs always give the same output.
pub fn step(
    size: usize,
    origin: Pos,
    dr: i32,
    dc: i32,
    distance: usize,
    mode: GeometryMode,
) -> Option<Pos> {
    let n = size as i32;
    let d = distance as i32;
    let (r, c) = (i32::from(origin.row), i32::from(origin.col));

    let bounce_applies = mode == GeometryMode::Bounce && dr != 0 && dc != 0;
    match mode {
        GeometryMode::Wrap => {
            #[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
            let pos = Pos::new((r + d * dr).rem_euclid(n) as u8, (c + d * dc).rem_euclid(n) as u8);
            Some(pos)
        }
        _ if bounce_applies => {
            if distance == 0 {
                return Some(origin);
            }
            Ray::new(size, origin, dr, dc, mode).nth(distance - 1)
        }
        _ => {
            let (nr, nc) = (r + d * dr, c + d * dc);
            if Pos::is_valid(nr, nc, size) {
                #[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
                Some(Pos::new(nr as u8, nc as u8))
            } else {
                None
            }
        }
    }
}

/// Indices where a path changes its unit step, i.e. bounce reflection cells.
///
/// Wrap jumps are not unit steps and never count.
pub fn reflection_points(path: &[Pos]) -> Vec<usize> {
    let delta = |a: Pos, b: Pos| {
        (
            i32::from(b.row) - i32::from(a.row),
            i32::from(b.col) - i32::from(a.col),
        )
    };
    let is_unit = |(dr, dc): (i32, i32)| dr.abs() <= 1 && dc.abs() <= 1;

    (1..path.len().saturating_sub(1))
        .filter(|&i| {
            let d_in = delta(path[i - 1], path[i]);
            let d_out = delta(path[i], path[i + 1]);
            is_unit(d_in) && is_unit(d_out) && d_in != d_out
        })
        .collect()
}
