pub mod error;
pub mod frontier;
pub mod puzzle;
pub mod search;
pub mod state;

pub use crate::error::InvalidConfiguration;
pub use crate::frontier::{
    BestFirst, BreadthFirst, DepthFirst, Frontier, OpenSet, Strategy, Visited,
};
pub use crate::puzzle::{goal_cells, Move, PuzzleState, RANDOM_SWAPS};
pub use crate::search::{Phase, SearchEngine, SearchOptions, SearchStats};
pub use crate::state::{build_path, Lineage, State};
