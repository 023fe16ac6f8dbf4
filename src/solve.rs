use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::time::Instant;

use indexmap::map::Entry;

use crate::{Direction, Heuristic, PuzzleState};

type IndexMap<K, V> = indexmap::IndexMap<K, V, fxhash::FxBuildHasher>;

/// How often the deadline is polled, in expansions.
const DEADLINE_POLL_INTERVAL: usize = 1024;

/// Optional bounds on a search. The default is unbounded.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SearchLimits {
    pub max_expansions: Option<usize>,
    pub deadline: Option<Instant>,
}

impl SearchLimits {
    fn is_exceeded(&self, expanded: usize) -> bool {
        if self.max_expansions.map_or(false, |max| expanded >= max) {
            return true;
        }
        match self.deadline {
            Some(deadline) if expanded % DEADLINE_POLL_INTERVAL == 0 => {
                Instant::now() >= deadline
            }
            _ => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// A shortest move sequence. Empty if the start is already the goal.
    Solved {
        moves: Vec<Direction>,
        expanded: usize,
    },
    /// Every state reachable from the start was expanded without meeting the goal.
    NoSolution { expanded: usize },
    /// A limit in `SearchLimits` tripped first.
    Aborted { expanded: usize },
}

impl Outcome {
    pub fn expanded(&self) -> usize {
        match *self {
            Outcome::Solved { expanded, .. }
            | Outcome::NoSolution { expanded }
            | Outcome::Aborted { expanded } => expanded,
        }
    }

    pub fn into_moves(self) -> Option<Vec<Direction>> {
        match self {
            Outcome::Solved { moves, .. } => Some(moves),
            Outcome::NoSolution { .. } | Outcome::Aborted { .. } => None,
        }
    }
}

#[derive(Debug, Clone)]
struct FrontierEntry<T> {
    f: u32,
    tie: u64,
    item: T,
}

// Min-heap on `(f, tie)`. The payload never takes part in the ordering.
impl<T> Ord for FrontierEntry<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .f
            .cmp(&self.f)
            .then_with(|| other.tie.cmp(&self.tie))
    }
}

impl<T> PartialOrd for FrontierEntry<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> PartialEq for FrontierEntry<T> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<T> Eq for FrontierEntry<T> {}

/// Priority queue yielding the lowest estimated total cost first, and among equal costs the
/// earliest insertion.
#[derive(Debug, Clone)]
pub struct Frontier<T> {
    heap: BinaryHeap<FrontierEntry<T>>,
    next_tie: u64,
}

impl<T> Default for Frontier<T> {
    fn default() -> Self {
        Self {
            heap: BinaryHeap::new(),
            next_tie: 0,
        }
    }
}

impl<T> Frontier<T> {
    pub fn push(&mut self, f: u32, item: T) {
        let tie = self.next_tie;
        self.next_tie += 1;
        self.heap.push(FrontierEntry { f, tie, item });
    }

    pub fn pop(&mut self) -> Option<(u32, T)> {
        self.heap.pop().map(|entry| (entry.f, entry.item))
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}

#[derive(Debug, Clone, Copy)]
struct Node {
    /// Cheapest known cost from the start. Only ever lowered.
    g: u32,
    /// Index of the predecessor in the table, and the move taken from it.
    came_from: Option<(usize, Direction)>,
}

/// Find a shortest sequence of blank moves turning `start` into `goal`.
pub fn solve(start: &PuzzleState, goal: &PuzzleState) -> Option<Vec<Direction>> {
    astar(start, goal, &SearchLimits::default(), || {}).into_moves()
}

/// A* with the Manhattan-distance heuristic. `on_step` is called once per expanded state.
pub fn astar(
    start: &PuzzleState,
    goal: &PuzzleState,
    limits: &SearchLimits,
    mut on_step: impl FnMut(),
) -> Outcome {
    let heuristic = Heuristic::new(goal);
    if start.size() != heuristic.size() {
        return Outcome::NoSolution { expanded: 0 };
    }

    // States are interned here; frontier entries and predecessor links refer to them by index.
    let mut nodes = IndexMap::<PuzzleState, Node>::default();
    nodes.insert(
        start.clone(),
        Node {
            g: 0,
            came_from: None,
        },
    );

    // Payload is `(g at push time, node index)`.
    let mut frontier = Frontier::default();
    frontier.push(heuristic.estimate(start), (0u32, 0usize));

    let mut expanded = 0;
    while let Some((_, (g, cursor))) = frontier.pop() {
        #[cfg(feature = "coz")]
        coz::scope!("Expand");

        let (state, node) = nodes.get_index(cursor).unwrap();

        // Superseded by a cheaper path found after this entry was pushed.
        if g != node.g {
            continue;
        }

        if state.is_goal(goal) {
            return Outcome::Solved {
                moves: reconstruct_path(&nodes, cursor),
                expanded,
            };
        }

        if limits.is_exceeded(expanded) {
            return Outcome::Aborted { expanded };
        }

        on_step();
        expanded += 1;

        #[cfg(feature = "coz")]
        coz::progress!("Expand");

        let state = state.clone();
        let tentative_g = g + 1;
        for (dir, neighbor) in state.successors() {
            let relaxed = Node {
                g: tentative_g,
                came_from: Some((cursor, dir)),
            };
            let (h, idx) = match nodes.entry(neighbor) {
                Entry::Occupied(mut entry) => {
                    if entry.get().g <= tentative_g {
                        continue;
                    }
                    *entry.get_mut() = relaxed;
                    (heuristic.estimate(entry.key()), entry.index())
                }
                Entry::Vacant(entry) => {
                    let h = heuristic.estimate(entry.key());
                    let idx = entry.index();
                    entry.insert(relaxed);
                    (h, idx)
                }
            };
            frontier.push(tentative_g + h, (tentative_g, idx));
        }
    }

    Outcome::NoSolution { expanded }
}

/// Walk predecessor links back from `end` and return the moves in chronological order.
fn reconstruct_path(nodes: &IndexMap<PuzzleState, Node>, end: usize) -> Vec<Direction> {
    let mut steps = std::iter::successors(nodes[end].came_from, |&(parent, _)| {
        nodes[parent].came_from
    })
    .map(|(_, dir)| dir)
    .collect::<Vec<_>>();
    steps.reverse();
    steps
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frontier_orders_by_cost_then_insertion() {
        let mut frontier = Frontier::default();
        frontier.push(5, 'a');
        frontier.push(3, 'b');
        frontier.push(5, 'c');
        frontier.push(3, 'd');
        frontier.push(4, 'e');
        assert_eq!(frontier.len(), 5);

        let order = std::iter::from_fn(|| frontier.pop())
            .map(|(_, item)| item)
            .collect::<String>();
        assert_eq!(order, "bdeac");
        assert!(frontier.is_empty());
    }

    #[test]
    fn deadline_in_the_past_aborts() {
        let start = "3\n8 6 7\n2 5 4\n3 0 1".parse::<PuzzleState>().unwrap();
        let goal = crate::canonical_goal(3).unwrap();
        let limits = SearchLimits {
            max_expansions: None,
            deadline: Some(Instant::now()),
        };
        assert_eq!(
            astar(&start, &goal, &limits, || {}),
            Outcome::Aborted { expanded: 0 }
        );
    }
}
