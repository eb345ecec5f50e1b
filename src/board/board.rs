//! Board structure

use super::bitboard::Bitboard;
use super::{Pos, Stone, DEFAULT_BOARD_SIZE, MAX_BOARD_SIZE, MIN_BOARD_SIZE};
use crate::error::{Error, Result};

/// Game board: an N x N grid of marks, one bitboard per player.
///
/// The board is only mutated through `place` (which refuses occupied or
/// out-of-range cells) and `remove`, the undo half of the place/undo
/// discipline used by search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    size: u8,
    /// X marks
    x: Bitboard,
    /// O marks
    o: Bitboard,
}

impl Board {
    /// Empty board of the default size
    pub fn new() -> Self {
        Self {
            size: DEFAULT_BOARD_SIZE as u8,
            x: Bitboard::new(),
            o: Bitboard::new(),
        }
    }

    /// Empty board of a custom size
    pub fn with_size(size: usize) -> Result<Self> {
        if !(MIN_BOARD_SIZE..=MAX_BOARD_SIZE).contains(&size) {
            return Err(Error::InvalidBoardSize {
                size,
                min: MIN_BOARD_SIZE,
                max: MAX_BOARD_SIZE,
            });
        }
        Ok(Self {
            size: size as u8,
            x: Bitboard::new(),
            o: Bitboard::new(),
        })
    }

    /// Parse a board from rows of `X`, `O` and `.` (spaces ignored).
    ///
    /// The number of rows sets the board size; every row must have that many cells.
    pub fn from_rows(rows: &[&str]) -> Result<Self> {
        let mut board = Self::with_size(rows.len())?;
        for (r, line) in rows.iter().enumerate() {
            let cells: Vec<char> = line.chars().filter(|c| !c.is_whitespace()).collect();
            if cells.len() != rows.len() {
                return Err(Error::InvalidBoardLength {
                    expected: rows.len(),
                    got: cells.len(),
                    context: (*line).to_string(),
                });
            }
            for (c, ch) in cells.into_iter().enumerate() {
                let stone = match ch {
                    'X' | 'x' => Stone::X,
                    'O' | 'o' => Stone::O,
                    '.' | '_' | '-' => continue,
                    other => {
                        return Err(Error::InvalidCellCharacter {
                            character: other,
                            position: c,
                            context: (*line).to_string(),
                        })
                    }
                };
                board.place(Pos::new(r as u8, c as u8), stone);
            }
        }
        Ok(board)
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.size as usize
    }

    #[inline]
    pub fn contains(&self, pos: Pos) -> bool {
        pos.row < self.size && pos.col < self.size
    }

    /// Get the mark at a position (`Empty` outside the board)
    #[inline]
    pub fn get(&self, pos: Pos) -> Stone {
        if !self.contains(pos) {
            Stone::Empty
        } else if self.x.get(pos) {
            Stone::X
        } else if self.o.get(pos) {
            Stone::O
        } else {
            Stone::Empty
        }
    }

    /// Check if an on-board position is free
    #[inline]
    pub fn is_empty(&self, pos: Pos) -> bool {
        self.contains(pos) && !self.x.get(pos) && !self.o.get(pos)
    }

    /// Coordinate form of `is_empty`; false when out of range
    pub fn is_empty_at(&self, row: usize, col: usize) -> bool {
        row < self.size() && col < self.size() && self.is_empty(Pos::new(row as u8, col as u8))
    }

    /// Place a mark. Returns false (and leaves the board untouched) when the
    /// cell is occupied, out of range, or the mark is `Empty`.
    #[inline]
    pub fn place(&mut self, pos: Pos, stone: Stone) -> bool {
        if !self.is_empty(pos) {
            return false;
        }
        match stone {
            Stone::X => self.x.set(pos),
            Stone::O => self.o.set(pos),
            Stone::Empty => return false,
        }
        true
    }

    /// Remove a mark (undo of `place`)
    #[inline]
    pub fn remove(&mut self, pos: Pos) {
        if self.contains(pos) {
            self.x.clear(pos);
            self.o.clear(pos);
        }
    }

    /// All occupied cells
    #[inline]
    pub fn occupied(&self) -> Bitboard {
        self.x.union(&self.o)
    }

    /// Total marks on board
    #[inline]
    pub fn stone_count(&self) -> u32 {
        self.x.count() + self.o.count()
    }

    #[inline]
    pub fn empty_count(&self) -> usize {
        self.size() * self.size() - self.stone_count() as usize
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.empty_count() == 0
    }

    /// Check if board has no marks at all
    #[inline]
    pub fn is_board_empty(&self) -> bool {
        self.x.is_empty() && self.o.is_empty()
    }

    /// Every cell in row-major order
    pub fn cells(&self) -> impl Iterator<Item = Pos> {
        let size = self.size;
        (0..size).flat_map(move |r| (0..size).map(move |c| Pos::new(r, c)))
    }

    /// Empty cells in row-major order
    pub fn empty_cells(&self) -> Vec<Pos> {
        self.cells().filter(|&p| self.is_empty(p)).collect()
    }

    /// Deep copy for hypothetical exploration
    #[inline]
    pub fn snapshot(&self) -> Board {
        self.clone()
    }

    /// Clear every cell, keeping the size
    pub fn reset(&mut self) {
        self.x = Bitboard::new();
        self.o = Bitboard::new();
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for r in 0..self.size {
            let row: String = (0..self.size)
                .map(|c| self.get(Pos::new(r, c)).symbol())
                .collect();
            writeln!(f, "{}", row)?;
        }
        Ok(())
    }
}
