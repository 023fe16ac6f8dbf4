use std::str::FromStr;

use thiserror::Error;

use crate::{BoardError, PuzzleState, MAX_SIZE};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("Missing size line")]
    MissingSize,
    #[error("Invalid size line: {0:?}")]
    InvalidSize(String),
    #[error("Expecting {expected} rows, got {got}")]
    RowCount { expected: usize, got: usize },
    #[error("Row {row} has {got} labels, expecting {expected}")]
    TokenCount {
        row: usize,
        expected: usize,
        got: usize,
    },
    #[error("Invalid label {token:?} on row {row}")]
    InvalidToken { row: usize, token: String },
    #[error("Unexpected trailing line: {0:?}")]
    TrailingLine(String),
    #[error(transparent)]
    Board(#[from] BoardError),
}

/// Parse a board: a line holding the dimension `N`, then `N` lines of `N` labels each.
/// Blank lines are ignored.
pub fn parse_board<I, S>(lines: I) -> Result<PuzzleState, ParseError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut lines = lines.into_iter().filter(|line| !str::trim(line.as_ref()).is_empty());

    let size_line = lines.next().ok_or(ParseError::MissingSize)?;
    let size_line: &str = size_line.as_ref();
    let size_line = size_line.trim();
    let size = size_line
        .parse::<usize>()
        .map_err(|_| ParseError::InvalidSize(size_line.to_owned()))?;
    if size == 0 || size > MAX_SIZE as usize {
        return Err(BoardError::InvalidSize(size).into());
    }
    let bound = size * size;

    let mut tiles = Vec::with_capacity(bound);
    for row in 0..size {
        let line = lines.next().ok_or(ParseError::RowCount {
            expected: size,
            got: row,
        })?;
        let line: &str = line.as_ref();
        let mut got = 0;
        for token in line.split_whitespace() {
            let label = token
                .parse::<usize>()
                .map_err(|_| ParseError::InvalidToken {
                    row,
                    token: token.to_owned(),
                })?;
            let label = u8::try_from(label)
                .ok()
                .filter(|&label| (label as usize) < bound)
                .ok_or(BoardError::LabelOutOfRange { label, bound })?;
            tiles.push(label);
            got += 1;
        }
        if got != size {
            return Err(ParseError::TokenCount {
                row,
                expected: size,
                got,
            });
        }
    }

    if let Some(line) = lines.next() {
        let line: &str = line.as_ref();
        return Err(ParseError::TrailingLine(line.to_owned()));
    }

    Ok(PuzzleState::new(size, tiles)?)
}

impl FromStr for PuzzleState {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_board(s.lines())
    }
}
