//! Manhattan-distance lower bound on the number of remaining moves.

use crate::{PuzzleState, Vec2};

/// Goal position of every label, built once per search.
#[derive(Debug, Clone)]
pub struct Heuristic {
    size: usize,
    goal_pos: Box<[Vec2]>,
}

impl Heuristic {
    pub fn new(goal: &PuzzleState) -> Self {
        let mut goal_pos = vec![Vec2(0, 0); goal.tiles().len()].into_boxed_slice();
        for (pos, label) in goal.cells() {
            goal_pos[label as usize] = pos;
        }
        Self {
            size: goal.size(),
            goal_pos,
        }
    }

    /// Dimension of the goal this table was built from.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Sum over non-blank tiles of the row and column distance to their goal cell.
    ///
    /// # Panics
    ///
    /// Panics if `state` is not of the same dimension as the goal.
    pub fn estimate(&self, state: &PuzzleState) -> u32 {
        assert_eq!(
            state.size(),
            self.size,
            "Board size does not match the goal size",
        );
        state
            .cells()
            .filter(|&(_, label)| label != 0)
            .map(|(pos, label)| {
                let goal = self.goal_pos[label as usize];
                (pos.0.abs_diff(goal.0) + pos.1.abs_diff(goal.1)) as u32
            })
            .sum()
    }
}
