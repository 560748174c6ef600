use rand::{thread_rng, Rng};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

use crate::error::InvalidConfiguration;
use crate::state::{Lineage, State};

/// Pairwise swaps applied to the goal configuration by the random constructors.
pub const RANDOM_SWAPS: usize = 20;

/// Direction a tile slides into the blank.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Move {
    Up,
    Left,
    Down,
    Right,
}

impl Move {
    pub const ALL: [Move; 4] = [Move::Up, Move::Down, Move::Left, Move::Right];

    /// Row and column shift of the blank for this move.
    pub fn as_offset(&self) -> (isize, isize) {
        match self {
            Move::Up => (1, 0),
            Move::Left => (0, 1),
            Move::Down => (-1, 0),
            Move::Right => (0, -1),
        }
    }

    pub fn opposite(&self) -> Self {
        match self {
            Move::Up => Move::Down,
            Move::Down => Move::Up,
            Move::Left => Move::Right,
            Move::Right => Move::Left,
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match *self {
            Move::Up => "Up",
            Move::Left => "Left",
            Move::Down => "Down",
            Move::Right => "Right",
        };
        write!(f, "{}", s)
    }
}

/// The solved configuration `1, 2, ..., d*d - 1, 0`.
pub fn goal_cells(dimension: usize) -> Result<Vec<u32>, InvalidConfiguration> {
    let len = board_len(dimension)?;
    Ok((1..len as u32).chain(std::iter::once(0)).collect())
}

/// Cell count of a `dimension` x `dimension` board. Every tile value must fit
/// in a `u32`.
fn board_len(dimension: usize) -> Result<usize, InvalidConfiguration> {
    if dimension < 2 {
        return Err(InvalidConfiguration::TooSmall { dimension });
    }
    dimension
        .checked_mul(dimension)
        .filter(|&len| u32::try_from(len).is_ok())
        .ok_or(InvalidConfiguration::TooLarge { dimension })
}

/// A square sliding-tile board; `0` is the blank.
///
/// Equality and hashing look at the cells only.
#[derive(Debug, Clone)]
pub struct PuzzleState {
    dimension: usize,
    cells: Vec<u32>,
    blank: usize,
    lineage: Lineage<PuzzleState>,
}

impl PuzzleState {
    /// Root state from an explicit configuration. The board size is taken
    /// from the number of cells.
    pub fn new(cells: &[u32]) -> Result<Self, InvalidConfiguration> {
        Self::with_parent(None, cells)
    }

    /// State from an explicit configuration with the given parent.
    pub fn with_parent(
        parent: Option<Rc<PuzzleState>>,
        cells: &[u32],
    ) -> Result<Self, InvalidConfiguration> {
        let dimension = dimension_for(cells.len())?;
        let blank = validate(cells, dimension * dimension)?;

        Ok(Self {
            dimension,
            cells: cells.to_vec(),
            blank,
            lineage: Lineage::from_parent(parent),
        })
    }

    pub fn goal(dimension: usize) -> Result<Self, InvalidConfiguration> {
        Self::new(&goal_cells(dimension)?)
    }

    /// Root state made by applying [`RANDOM_SWAPS`] random pairwise swaps to
    /// the goal. For 4x4 boards the result may be unsolvable.
    pub fn shuffled<R: Rng + ?Sized>(
        dimension: usize,
        rng: &mut R,
    ) -> Result<Self, InvalidConfiguration> {
        let mut state = Self::goal(dimension)?;
        let len = state.cell_count();

        for _ in 0..RANDOM_SWAPS {
            let a = rng.gen_range(0..len);
            let b = rng.gen_range(0..len);
            state.swap(a, b);
        }

        // Swaps keep the permutation intact; check it before handing it out.
        let blank = validate(&state.cells, len)?;
        debug_assert_eq!(blank, state.blank);
        Ok(state)
    }

    pub fn random(dimension: usize) -> Result<Self, InvalidConfiguration> {
        Self::shuffled(dimension, &mut thread_rng())
    }

    /// Replaces the whole configuration. On error the state is unchanged.
    pub fn set_cells(&mut self, cells: &[u32]) -> Result<(), InvalidConfiguration> {
        if cells.len() != self.cells.len() {
            return Err(InvalidConfiguration::WrongLength {
                expected: self.cells.len(),
                actual: cells.len(),
            });
        }
        let blank = validate(cells, self.cells.len())?;

        self.cells = cells.to_vec();
        self.blank = blank;
        Ok(())
    }

    pub fn cells(&self) -> &[u32] {
        &self.cells
    }

    pub fn blank_index(&self) -> usize {
        self.blank
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Number of cells, blank included. Never below 4.
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// The move that turned the parent into this state, if there is a parent.
    pub fn last_move(&self) -> Option<Move> {
        let parent = self.parent()?;
        Move::ALL
            .into_iter()
            .find(|&dir| parent.shift(parent.blank, dir) == Some(self.blank))
    }

    /// Successor reached by sliding a tile in `dir`, or `None` when the blank
    /// would leave the board.
    pub fn try_move(self: &Rc<Self>, dir: Move) -> Option<Self> {
        let target = self.shift(self.blank, dir)?;

        let mut next = Self {
            dimension: self.dimension,
            cells: self.cells.clone(),
            blank: self.blank,
            lineage: Lineage::child_of(self),
        };
        next.swap(next.blank, target);
        Some(next)
    }

    fn coordinates(&self, index: usize) -> (usize, usize) {
        (index / self.dimension, index % self.dimension)
    }

    fn shift(&self, index: usize, dir: Move) -> Option<usize> {
        let (row, col) = self.coordinates(index);
        let (d_row, d_col) = dir.as_offset();

        let row = row.checked_add_signed(d_row)?;
        let col = col.checked_add_signed(d_col)?;
        if row >= self.dimension || col >= self.dimension {
            return None;
        }
        Some(row * self.dimension + col)
    }

    fn swap(&mut self, a: usize, b: usize) {
        if a == b {
            return;
        }
        self.cells.swap(a, b);

        if self.blank == a {
            self.blank = b;
        } else if self.blank == b {
            self.blank = a;
        }
    }

    // Pairs (i, j), i < j, with cells[i] > cells[j], skipping pairs that end
    // on the blank.
    fn count_inversions(&self) -> usize {
        self.cells
            .iter()
            .enumerate()
            .map(|(i, &val)| {
                self.cells[i + 1..]
                    .iter()
                    .enumerate()
                    .filter(|&(offset, &next)| i + 1 + offset != self.blank && next < val)
                    .count()
            })
            .sum()
    }

    fn is_goal(&self) -> bool {
        let last = self.cells.len() - 1;
        self.cells
            .iter()
            .enumerate()
            .all(|(i, &val)| if i == last { val == 0 } else { val == i as u32 + 1 })
    }
}

/// Board side length for `len` cells.
fn dimension_for(len: usize) -> Result<usize, InvalidConfiguration> {
    let dimension = (len as f64).sqrt().round() as usize;
    if dimension < 2 || dimension * dimension != len {
        return Err(InvalidConfiguration::NotSquare { len });
    }
    Ok(dimension)
}

/// Checks that `cells` is a permutation of `0..len` and returns the blank index.
fn validate(cells: &[u32], len: usize) -> Result<usize, InvalidConfiguration> {
    if cells.len() != len {
        return Err(InvalidConfiguration::WrongLength {
            expected: len,
            actual: cells.len(),
        });
    }

    let blank = cells
        .iter()
        .position(|&value| value == 0)
        .ok_or(InvalidConfiguration::MissingBlank)?;

    let mut seen = vec![false; len];
    for (index, &value) in cells.iter().enumerate() {
        let slot = seen
            .get_mut(value as usize)
            .ok_or(InvalidConfiguration::OutOfRange {
                index,
                value,
                limit: len,
            })?;
        if *slot {
            return Err(InvalidConfiguration::Duplicate { index, value });
        }
        *slot = true;
    }

    Ok(blank)
}

impl State for PuzzleState {
    fn lineage(&self) -> &Lineage<Self> {
        &self.lineage
    }

    fn into_lineage(self) -> Lineage<Self> {
        self.lineage
    }

    fn possible_moves(self: &Rc<Self>) -> Vec<Self> {
        Move::ALL
            .into_iter()
            .filter_map(|dir| self.try_move(dir))
            .collect()
    }

    fn is_solution(&self) -> bool {
        self.is_goal()
    }

    /// Inversion parity test for the 15-puzzle. Other board sizes are
    /// reported solvable without checking.
    fn is_solvable(&self) -> bool {
        if self.is_goal() || self.cell_count() != 16 {
            return true;
        }

        let blank_row = self.coordinates(self.blank).0 + 1;
        (self.count_inversions() + blank_row) % 2 == 0
    }

    /// Number of cells, blank included, that differ from the goal.
    fn heuristic(&self) -> usize {
        let last = self.cells.len() - 1;
        self.cells
            .iter()
            .enumerate()
            .filter(|&(i, &val)| {
                let expected = if i == last { 0 } else { i as u32 + 1 };
                val != expected
            })
            .count()
    }
}

impl PartialEq for PuzzleState {
    fn eq(&self, other: &Self) -> bool {
        self.cells == other.cells
    }
}

impl Eq for PuzzleState {}

impl Hash for PuzzleState {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.cells.hash(state);
    }
}

impl fmt::Display for PuzzleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = (self.cell_count() - 1).to_string().len();
        let rule = "-".repeat((width + 3) * self.dimension + 1);

        writeln!(f, "{}", rule)?;
        for row in self.cells.chunks(self.dimension) {
            for &val in row {
                write!(f, "| {:>width$} ", val, width = width)?;
            }
            writeln!(f, "|")?;
            writeln!(f, "{}", rule)?;
        }
        Ok(())
    }
}
