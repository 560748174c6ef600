//! Traversal loop shared by every frontier strategy.
//!
//! Memory grows with the number of distinct configurations reached. For
//! breadth-first and best-first search on 4x4 boards that is the practical
//! ceiling; [`SearchOptions::max_expansions`] bounds it when needed.

use std::rc::Rc;

use tracing::{debug, info};

use crate::frontier::{Frontier, OpenSet, Strategy, Visited};
use crate::state::{build_path, State};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchOptions {
    /// Stop after this many expansions and report the search as exhausted.
    pub max_expansions: Option<u64>,
}

/// Where a search engine is in its life cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Ready,
    Running,
    Found,
    Exhausted,
}

/// Counters from the most recent `solve` call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// States taken from the frontier and expanded.
    pub expanded: u64,
    /// Successors handed to the frontier.
    pub generated: u64,
    /// Frontier entries dropped because their configuration was visited.
    pub discarded: u64,
    pub peak_frontier: usize,
}

/// Drives a search from a root state using one frontier policy.
///
/// The frontier and visited set belong to a single `solve` call at a time;
/// each call starts from empty ones.
pub struct SearchEngine<S: State, F: Frontier<S>> {
    frontier: F,
    visited: Visited<S>,
    options: SearchOptions,
    phase: Phase,
    stats: SearchStats,
}

impl<S: State> SearchEngine<S, OpenSet<S>> {
    pub fn with_strategy(strategy: Strategy) -> Self {
        Self::new(strategy.open_set())
    }

    pub fn strategy(&self) -> Strategy {
        self.frontier.strategy()
    }
}

impl<S: State, F: Frontier<S>> SearchEngine<S, F> {
    pub fn new(frontier: F) -> Self {
        Self {
            frontier,
            visited: Visited::new(),
            options: SearchOptions::default(),
            phase: Phase::Ready,
            stats: SearchStats::default(),
        }
    }

    pub fn options(mut self, options: SearchOptions) -> Self {
        self.options = options;
        self
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn stats(&self) -> SearchStats {
        self.stats
    }

    /// Searches for a path from `root` to a solution.
    ///
    /// Returns the states from root to goal inclusive, or an empty vector if
    /// the root is unsolvable or the reachable space (or the expansion
    /// ceiling) runs out first.
    pub fn solve(&mut self, root: S) -> Vec<Rc<S>> {
        self.frontier.clear();
        self.visited.clear();
        self.stats = SearchStats::default();

        let root = Rc::new(root);
        if !root.is_solvable() {
            debug!("root configuration is unsolvable, skipping search");
            self.phase = Phase::Exhausted;
            return Vec::new();
        }

        self.phase = Phase::Running;
        info!(
            max_expansions = ?self.options.max_expansions,
            "search started"
        );
        self.push(root);

        while !self.frontier.is_exhausted() {
            let Some(candidate) = self.frontier.get() else {
                break;
            };
            if self.visited.contains(&candidate) {
                self.stats.discarded += 1;
                continue;
            }

            if candidate.is_solution() {
                self.phase = Phase::Found;
                let path = build_path(&candidate);
                info!(
                    moves = path.len() - 1,
                    expanded = self.stats.expanded,
                    generated = self.stats.generated,
                    discarded = self.stats.discarded,
                    peak_frontier = self.stats.peak_frontier,
                    "solution found"
                );
                self.release();
                return path;
            }

            if self
                .options
                .max_expansions
                .is_some_and(|limit| self.stats.expanded >= limit)
            {
                info!(expanded = self.stats.expanded, "expansion limit reached");
                break;
            }

            self.visited.insert(Rc::clone(&candidate));
            self.stats.expanded += 1;

            for next in candidate.possible_moves() {
                self.stats.generated += 1;
                self.push(Rc::new(next));
            }
        }

        self.phase = Phase::Exhausted;
        info!(
            expanded = self.stats.expanded,
            generated = self.stats.generated,
            discarded = self.stats.discarded,
            peak_frontier = self.stats.peak_frontier,
            "search exhausted"
        );
        self.release();
        Vec::new()
    }

    fn push(&mut self, state: Rc<S>) {
        self.frontier.add(state, &self.visited);
        self.stats.peak_frontier = self.stats.peak_frontier.max(self.frontier.len());
    }

    fn release(&mut self) {
        self.frontier.clear();
        self.visited.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontier::BreadthFirst;
    use crate::puzzle::PuzzleState;

    fn puzzle(cells: &[u32]) -> PuzzleState {
        PuzzleState::new(cells).unwrap()
    }

    /// FIFO frontier that reports itself exhausted after handing out
    /// `budget` states, whatever it still holds.
    struct Budgeted<S> {
        inner: BreadthFirst<S>,
        budget: usize,
    }

    impl<S: State> Frontier<S> for Budgeted<S> {
        fn add(&mut self, state: Rc<S>, visited: &Visited<S>) {
            self.inner.add(state, visited);
        }

        fn get(&mut self) -> Option<Rc<S>> {
            self.budget = self.budget.saturating_sub(1);
            self.inner.get()
        }

        fn is_exhausted(&self) -> bool {
            self.budget == 0 || self.inner.is_exhausted()
        }

        fn len(&self) -> usize {
            self.inner.len()
        }

        fn clear(&mut self) {
            self.inner.clear();
        }
    }

    #[test]
    fn new_engine_is_ready() {
        let engine: SearchEngine<PuzzleState, _> =
            SearchEngine::with_strategy(Strategy::BestFirst);
        assert_eq!(engine.phase(), Phase::Ready);
        assert_eq!(engine.strategy(), Strategy::BestFirst);
        assert_eq!(engine.stats(), SearchStats::default());
    }

    #[test]
    fn goal_root_is_found_without_expanding() {
        let mut engine = SearchEngine::new(BreadthFirst::new());
        let path = engine.solve(PuzzleState::goal(3).unwrap());

        assert_eq!(path.len(), 1);
        assert!(path[0].is_solution());
        assert_eq!(engine.phase(), Phase::Found);
        assert_eq!(engine.stats().expanded, 0);
    }

    #[test]
    fn unsolvable_root_never_enters_the_loop() {
        let mut engine = SearchEngine::with_strategy(Strategy::BreadthFirst);
        let path = engine.solve(puzzle(&[
            1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 15, 14, 0,
        ]));

        assert!(path.is_empty());
        assert_eq!(engine.phase(), Phase::Exhausted);
        assert_eq!(engine.stats(), SearchStats::default());
    }

    #[test]
    fn breadth_first_counts_discarded_duplicates() {
        let mut engine = SearchEngine::with_strategy(Strategy::BreadthFirst);
        // Two moves from the goal; the root comes back as a grandchild.
        let path = engine.solve(puzzle(&[1, 2, 3, 4, 0, 6, 7, 5, 8]));

        assert_eq!(path.len(), 3);
        let stats = engine.stats();
        assert!(stats.expanded > 0);
        assert!(stats.discarded > 0);
        assert!(stats.generated >= stats.expanded);
        assert!(stats.peak_frontier > 0);
    }

    #[test]
    fn expansion_limit_stops_the_search() {
        let mut engine =
            SearchEngine::with_strategy(Strategy::BreadthFirst).options(SearchOptions {
                max_expansions: Some(3),
            });
        let path = engine.solve(puzzle(&[8, 7, 6, 5, 4, 3, 2, 1, 0]));

        assert!(path.is_empty());
        assert_eq!(engine.phase(), Phase::Exhausted);
        assert_eq!(engine.stats().expanded, 3);
    }

    #[test]
    fn loop_stops_when_the_frontier_reports_exhaustion() {
        let mut engine = SearchEngine::new(Budgeted {
            inner: BreadthFirst::new(),
            budget: 2,
        });
        let path = engine.solve(puzzle(&[8, 7, 6, 5, 4, 3, 2, 1, 0]));

        assert!(path.is_empty());
        assert_eq!(engine.phase(), Phase::Exhausted);
        assert_eq!(engine.stats().expanded, 2);
        assert!(engine.stats().peak_frontier > 0);
    }

    #[test]
    fn exhausts_a_space_without_a_solution() {
        // The 2x2 parity class that cannot reach the goal; only 4x4 boards
        // are rejected up front, so the search explores all 12 states.
        let mut engine = SearchEngine::with_strategy(Strategy::DepthFirst);
        let path = engine.solve(puzzle(&[2, 1, 3, 0]));

        assert!(path.is_empty());
        assert_eq!(engine.phase(), Phase::Exhausted);
        assert_eq!(engine.stats().expanded, 12);
    }
}
