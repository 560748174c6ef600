//! Open-set policies that decide traversal order.

use std::cmp::{Ordering, Reverse};
use std::collections::{BinaryHeap, HashSet, VecDeque};
use std::fmt;
use std::rc::Rc;

use clap::ValueEnum;

use crate::state::State;

/// Configurations already expanded during one search.
pub type Visited<S> = HashSet<Rc<S>>;

/// Discovered states waiting to be expanded.
pub trait Frontier<S: State> {
    /// Offers a state. A policy may decline states it knows are visited.
    fn add(&mut self, state: Rc<S>, visited: &Visited<S>);

    /// Removes the next state to expand, `None` once exhausted.
    fn get(&mut self) -> Option<Rc<S>>;

    fn is_exhausted(&self) -> bool;

    fn len(&self) -> usize;

    fn clear(&mut self);
}

/// FIFO queue. Admits every state, duplicates included; the engine filters
/// them against the visited set when they come out.
pub struct BreadthFirst<S> {
    queue: VecDeque<Rc<S>>,
}

impl<S> BreadthFirst<S> {
    pub fn new() -> Self {
        Self {
            queue: VecDeque::new(),
        }
    }
}

impl<S> Default for BreadthFirst<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: State> Frontier<S> for BreadthFirst<S> {
    fn add(&mut self, state: Rc<S>, _visited: &Visited<S>) {
        self.queue.push_back(state);
    }

    fn get(&mut self) -> Option<Rc<S>> {
        self.queue.pop_front()
    }

    fn is_exhausted(&self) -> bool {
        self.queue.is_empty()
    }

    fn len(&self) -> usize {
        self.queue.len()
    }

    fn clear(&mut self) {
        self.queue.clear();
    }
}

/// LIFO stack. States already in the visited set are not pushed.
pub struct DepthFirst<S> {
    stack: Vec<Rc<S>>,
}

impl<S> DepthFirst<S> {
    pub fn new() -> Self {
        Self { stack: Vec::new() }
    }
}

impl<S> Default for DepthFirst<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: State> Frontier<S> for DepthFirst<S> {
    fn add(&mut self, state: Rc<S>, visited: &Visited<S>) {
        if !visited.contains(&state) {
            self.stack.push(state);
        }
    }

    fn get(&mut self) -> Option<Rc<S>> {
        self.stack.pop()
    }

    fn is_exhausted(&self) -> bool {
        self.stack.is_empty()
    }

    fn len(&self) -> usize {
        self.stack.len()
    }

    fn clear(&mut self) {
        self.stack.clear();
    }
}

/// A heap entry keyed by `(score, insertion order)`.
///
/// `BinaryHeap` is a max-heap, so the key is wrapped in `Reverse` to pop the
/// lowest score first; equal scores come out in insertion order.
struct ScoredEntry<S> {
    key: Reverse<(usize, u64)>,
    state: Rc<S>,
}

impl<S> PartialEq for ScoredEntry<S> {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl<S> Eq for ScoredEntry<S> {}

impl<S> PartialOrd for ScoredEntry<S> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<S> Ord for ScoredEntry<S> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key.cmp(&other.key)
    }
}

/// Priority queue ordered by `distance + heuristic`, lowest first.
pub struct BestFirst<S> {
    heap: BinaryHeap<ScoredEntry<S>>,
    next_seq: u64,
}

impl<S> BestFirst<S> {
    pub fn new() -> Self {
        Self {
            heap: BinaryHeap::new(),
            next_seq: 0,
        }
    }
}

impl<S> Default for BestFirst<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: State> Frontier<S> for BestFirst<S> {
    fn add(&mut self, state: Rc<S>, _visited: &Visited<S>) {
        let key = Reverse((state.score(), self.next_seq));
        self.next_seq += 1;
        self.heap.push(ScoredEntry { key, state });
    }

    fn get(&mut self) -> Option<Rc<S>> {
        self.heap.pop().map(|entry| entry.state)
    }

    fn is_exhausted(&self) -> bool {
        self.heap.is_empty()
    }

    fn len(&self) -> usize {
        self.heap.len()
    }

    fn clear(&mut self) {
        self.heap.clear();
        self.next_seq = 0;
    }
}

/// Which traversal order to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Strategy {
    #[value(name = "breadth")]
    BreadthFirst,
    #[value(name = "depth")]
    DepthFirst,
    #[value(name = "best")]
    BestFirst,
}

impl Strategy {
    pub fn open_set<S: State>(self) -> OpenSet<S> {
        match self {
            Strategy::BreadthFirst => OpenSet::BreadthFirst(BreadthFirst::new()),
            Strategy::DepthFirst => OpenSet::DepthFirst(DepthFirst::new()),
            Strategy::BestFirst => OpenSet::BestFirst(BestFirst::new()),
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match *self {
            Strategy::BreadthFirst => "breadth-first",
            Strategy::DepthFirst => "depth-first",
            Strategy::BestFirst => "best-first",
        };
        write!(f, "{}", s)
    }
}

/// One of the three frontiers, chosen at run time.
pub enum OpenSet<S> {
    BreadthFirst(BreadthFirst<S>),
    DepthFirst(DepthFirst<S>),
    BestFirst(BestFirst<S>),
}

impl<S> OpenSet<S> {
    pub fn strategy(&self) -> Strategy {
        match self {
            OpenSet::BreadthFirst(_) => Strategy::BreadthFirst,
            OpenSet::DepthFirst(_) => Strategy::DepthFirst,
            OpenSet::BestFirst(_) => Strategy::BestFirst,
        }
    }
}

impl<S: State> Frontier<S> for OpenSet<S> {
    fn add(&mut self, state: Rc<S>, visited: &Visited<S>) {
        match self {
            OpenSet::BreadthFirst(f) => f.add(state, visited),
            OpenSet::DepthFirst(f) => f.add(state, visited),
            OpenSet::BestFirst(f) => f.add(state, visited),
        }
    }

    fn get(&mut self) -> Option<Rc<S>> {
        match self {
            OpenSet::BreadthFirst(f) => f.get(),
            OpenSet::DepthFirst(f) => f.get(),
            OpenSet::BestFirst(f) => f.get(),
        }
    }

    fn is_exhausted(&self) -> bool {
        match self {
            OpenSet::BreadthFirst(f) => f.is_exhausted(),
            OpenSet::DepthFirst(f) => f.is_exhausted(),
            OpenSet::BestFirst(f) => f.is_exhausted(),
        }
    }

    fn len(&self) -> usize {
        match self {
            OpenSet::BreadthFirst(f) => f.len(),
            OpenSet::DepthFirst(f) => f.len(),
            OpenSet::BestFirst(f) => f.len(),
        }
    }

    fn clear(&mut self) {
        match self {
            OpenSet::BreadthFirst(f) => f.clear(),
            OpenSet::DepthFirst(f) => f.clear(),
            OpenSet::BestFirst(f) => f.clear(),
        }
    }
}
