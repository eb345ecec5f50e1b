//! Board representation for the 6x6 variant

pub mod bitboard;
pub mod board;


// Re-exports
pub use bitboard::Bitboard;
pub use board::Board;

/// Default board size (6x6)
pub const DEFAULT_BOARD_SIZE: usize = 6;
/// Smallest supported board: a five must fit in a row
pub const MIN_BOARD_SIZE: usize = 5;
/// Largest supported board: every cell fits in one u64 word
pub const MAX_BOARD_SIZE: usize = 8;
/// Row stride used for cell indices, independent of the actual size
pub const ROW_STRIDE: usize = MAX_BOARD_SIZE;

/// Cell values / player marks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Stone {
    Empty,
    X,
    O,
}

impl Stone {
    /// Get opponent mark
    #[inline]
    pub fn opponent(self) -> Stone {
        match self {
            Stone::X => Stone::O,
            Stone::O => Stone::X,
            Stone::Empty => Stone::Empty,
        }
    }

    #[inline]
    pub fn is_player(self) -> bool {
        self != Stone::Empty
    }

    /// Single character used by `Display` and `Board::from_rows`
    pub fn symbol(self) -> char {
        match self {
            Stone::X => 'X',
            Stone::O => 'O',
            Stone::Empty => '.',
        }
    }
}

impl std::fmt::Display for Stone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Position on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Pos {
    pub row: u8,
    pub col: u8,
}

impl Pos {
    #[inline]
    pub fn new(row: u8, col: u8) -> Self {
        debug_assert!(row < MAX_BOARD_SIZE as u8 && col < MAX_BOARD_SIZE as u8);
        Self { row, col }
    }

    #[inline]
    pub fn to_index(self) -> usize {
        self.row as usize * ROW_STRIDE + self.col as usize
    }

    #[inline]
    pub fn from_index(idx: usize) -> Self {
        Self {
            row: (idx / ROW_STRIDE) as u8,
            col: (idx % ROW_STRIDE) as u8,
        }
    }

    /// Check signed coordinates against a board of the given size
    #[inline]
    pub fn is_valid(row: i32, col: i32, size: usize) -> bool {
        row >= 0 && row < size as i32 && col >= 0 && col < size as i32
    }

    /// Chebyshev neighbours (including diagonals)
    #[inline]
    pub fn is_adjacent(self, other: Pos) -> bool {
        let dr = (i32::from(self.row) - i32::from(other.row)).abs();
        let dc = (i32::from(self.col) - i32::from(other.col)).abs();
        dr <= 1 && dc <= 1 && (dr, dc) != (0, 0)
    }
}

impl std::fmt::Display for Pos {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

impl PartialOrd for Pos {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Pos {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.to_index().cmp(&other.to_index())
    }
}
