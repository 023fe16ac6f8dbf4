use std::fmt;

use crate::{Direction, PuzzleState};

impl fmt::Display for PuzzleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = (self.tiles.len() - 1).to_string().len();
        for (pos, label) in self.cells() {
            if pos.1 != 0 {
                f.write_str(" ")?;
            } else if pos.0 != 0 {
                f.write_str("\n")?;
            }
            write!(f, "{label:>width$}")?;
        }
        Ok(())
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
