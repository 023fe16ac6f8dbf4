use std::hash::{Hash, Hasher};
use std::ops::Index;

use arrayvec::ArrayVec;
use thiserror::Error;

mod fmt;
pub mod heuristic;
mod parse;
pub mod solve;

pub use heuristic::Heuristic;
pub use parse::{parse_board, ParseError};
pub use solve::{solve, Outcome, SearchLimits};

/// The largest supported dimension. Labels are stored as `u8`.
pub const MAX_SIZE: u8 = 16;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoardError {
    #[error("Invalid board size {0}, expecting 1..=16")]
    InvalidSize(usize),
    #[error("Expecting {expected} cells, got {got}")]
    CellCount { expected: usize, got: usize },
    #[error("Label {label} out of range 0..{bound}")]
    LabelOutOfRange { label: usize, bound: usize },
    #[error("Row {row} has {got} cells, expecting {expected}")]
    RowLength {
        row: usize,
        expected: usize,
        got: usize,
    },
    #[error("Duplicate label {0}")]
    DuplicateLabel(u8),
    #[error("Missing blank tile")]
    MissingBlank,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MoveError {
    #[error("Cannot move the blank {dir} from {pos:?}")]
    Invalid { dir: Direction, pos: Vec2 },
}

/// Row and column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Vec2(pub u8, pub u8);

/// The direction the blank tile moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up = 0,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Self; 4] = [Self::Up, Self::Down, Self::Left, Self::Right];

    pub fn reversed(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Up => "UP",
            Direction::Down => "DOWN",
            Direction::Left => "LEFT",
            Direction::Right => "RIGHT",
        }
    }
}

/// Canonical key of a board: its labels in row-major order.
pub type StateKey = Box<[u8]>;

/// An immutable board snapshot. Equality and hashing only look at the tiles.
#[derive(Debug, Clone)]
pub struct PuzzleState {
    size: u8,
    blank: Vec2,
    tiles: Box<[u8]>,
}

impl PartialEq for PuzzleState {
    fn eq(&self, other: &Self) -> bool {
        self.tiles == other.tiles
    }
}
impl Eq for PuzzleState {}

impl Hash for PuzzleState {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.tiles.hash(state);
    }
}

impl Index<Vec2> for PuzzleState {
    type Output = u8;
    fn index(&self, pos: Vec2) -> &Self::Output {
        &self.tiles[self.offset(pos)]
    }
}

impl PuzzleState {
    /// Build a state from row-major labels, checking that they form a permutation of
    /// `0..size*size`.
    pub fn new(size: usize, tiles: impl Into<Box<[u8]>>) -> Result<Self, BoardError> {
        if size == 0 || size > MAX_SIZE as usize {
            return Err(BoardError::InvalidSize(size));
        }
        let tiles = tiles.into();
        let bound = size * size;
        if tiles.len() != bound {
            return Err(BoardError::CellCount {
                expected: bound,
                got: tiles.len(),
            });
        }

        let mut seen = [false; MAX_SIZE as usize * MAX_SIZE as usize];
        let mut blank = None;
        for (idx, &label) in tiles.iter().enumerate() {
            let slot = seen
                .get_mut(label as usize)
                .filter(|_| (label as usize) < bound)
                .ok_or(BoardError::LabelOutOfRange {
                    label: label as usize,
                    bound,
                })?;
            if *slot {
                return Err(BoardError::DuplicateLabel(label));
            }
            *slot = true;
            if label == 0 {
                blank = Some(Vec2((idx / size) as u8, (idx % size) as u8));
            }
        }

        Ok(Self {
            size: size as u8,
            blank: blank.ok_or(BoardError::MissingBlank)?,
            tiles,
        })
    }

    /// Build a state from a grid of rows.
    pub fn from_rows<R: AsRef<[u8]>>(rows: &[R]) -> Result<Self, BoardError> {
        let size = rows.len();
        let mut tiles = Vec::with_capacity(size * size);
        for (row, i) in rows.iter().zip(0..) {
            let row = row.as_ref();
            if row.len() != size {
                return Err(BoardError::RowLength {
                    row: i,
                    expected: size,
                    got: row.len(),
                });
            }
            tiles.extend_from_slice(row);
        }
        Self::new(size, tiles)
    }

    pub fn size(&self) -> usize {
        self.size as usize
    }

    pub fn blank(&self) -> Vec2 {
        self.blank
    }

    pub fn tiles(&self) -> &[u8] {
        &self.tiles
    }

    pub fn key(&self) -> StateKey {
        self.tiles.clone()
    }

    fn offset(&self, pos: Vec2) -> usize {
        pos.0 as usize * self.size as usize + pos.1 as usize
    }

    pub(crate) fn cells(&self) -> impl Iterator<Item = (Vec2, u8)> + '_ {
        let size = self.size;
        let idx_iter = std::iter::successors(Some(Vec2(0, 0)), move |&Vec2(x, y)| {
            Some(if y + 1 < size {
                Vec2(x, y + 1)
            } else {
                Vec2(x + 1, 0)
            })
        });
        idx_iter.zip(self.tiles.iter().copied())
    }

    fn sibling_pos(&self, pos: Vec2, dir: Direction) -> Option<Vec2> {
        const DIRECTIONS: [(i8, i8); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];
        let x = pos.0.checked_add_signed(DIRECTIONS[dir as usize].0)?;
        let y = pos.1.checked_add_signed(DIRECTIONS[dir as usize].1)?;
        if self.size <= x || self.size <= y {
            return None;
        }
        Some(Vec2(x, y))
    }

    /// Moves available to the blank, in `UP, DOWN, LEFT, RIGHT` order.
    pub fn possible_moves(&self) -> ArrayVec<Direction, 4> {
        Direction::ALL
            .into_iter()
            .filter(|&dir| self.sibling_pos(self.blank, dir).is_some())
            .collect()
    }

    /// Swap the blank with its neighbor in `dir`, producing a new state.
    pub fn apply_move(&self, dir: Direction) -> Result<Self, MoveError> {
        let target = self
            .sibling_pos(self.blank, dir)
            .ok_or(MoveError::Invalid {
                dir,
                pos: self.blank,
            })?;
        Ok(self.with_blank_at(target))
    }

    /// Every state one move away, paired with the move, in `possible_moves` order.
    pub fn successors(&self) -> impl Iterator<Item = (Direction, Self)> + '_ {
        Direction::ALL.into_iter().filter_map(move |dir| {
            let target = self.sibling_pos(self.blank, dir)?;
            Some((dir, self.with_blank_at(target)))
        })
    }

    fn with_blank_at(&self, target: Vec2) -> Self {
        let mut tiles = self.tiles.clone();
        tiles.swap(self.offset(self.blank), self.offset(target));
        Self {
            size: self.size,
            blank: target,
            tiles,
        }
    }

    pub fn is_goal(&self, goal: &PuzzleState) -> bool {
        self == goal
    }
}

/// The goal layout: blank at the top-left, then `1..size*size` in reading order.
pub fn canonical_goal(size: usize) -> Result<PuzzleState, BoardError> {
    if size == 0 || size > MAX_SIZE as usize {
        return Err(BoardError::InvalidSize(size));
    }
    let tiles = (0..size * size).map(|label| label as u8).collect::<Vec<_>>();
    PuzzleState::new(size, tiles)
}
