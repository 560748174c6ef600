use thiserror::Error;

/// A configuration array that cannot describe a sliding-tile board.
///
/// Returned by every constructor and by [`crate::PuzzleState::set_cells`];
/// a failed call never leaves a partially applied configuration behind.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidConfiguration {
    #[error("configuration of {len} cells is not a square board of at least 2x2")]
    NotSquare { len: usize },
    #[error("expected {expected} cells, got {actual}")]
    WrongLength { expected: usize, actual: usize },
    #[error("value {value} at index {index} is outside 0..{limit}")]
    OutOfRange { index: usize, value: u32, limit: usize },
    #[error("value {value} at index {index} appears more than once")]
    Duplicate { index: usize, value: u32 },
    #[error("configuration has no blank cell (0)")]
    MissingBlank,
    #[error("board dimension {dimension} is below the 2x2 minimum")]
    TooSmall { dimension: usize },
    #[error("board dimension {dimension} has more cells than tile values can number")]
    TooLarge { dimension: usize },
}
