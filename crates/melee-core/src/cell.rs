//! Grid coordinates and reading order.
//!
//! Every positional rule in the simulation reduces to *reading order*:
//! top-to-bottom, then left-to-right, the way English text is read. [`Cell`]
//! encodes that rule directly in its `Ord` implementation, so any sorted
//! collection of cells (or `BTreeMap` keyed by cells) iterates in reading
//! order for free.
//!
//! # Example
//!
//! ```
//! use melee_core::cell::Cell;
//!
//! let a = Cell::new(4, 1);
//! let b = Cell::new(0, 2);
//! assert!(a < b); // row 1 precedes row 2, whatever the columns are
//!
//! // The four neighbours come back in reading order: N, W, E, S.
//! let around = Cell::new(3, 3).neighbors();
//! assert_eq!(around[0], Cell::new(3, 2));
//! assert_eq!(around[3], Cell::new(3, 4));
//! ```

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

// ============================================================================
// Cell
// ============================================================================

/// A square on the battle grid.
///
/// `x` is the column (grows rightward), `y` is the row (grows downward).
/// Coordinates are signed so that neighbour arithmetic at the map edge never
/// wraps; out-of-bounds cells are simply rejected by [`crate::grid::Grid`].
#[derive(Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cell {
    /// Column index.
    pub x: i32,
    /// Row index.
    pub y: i32,
}

impl Cell {
    /// Creates a cell at the given column and row.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The cell directly above.
    #[must_use]
    pub const fn north(self) -> Self {
        Self::new(self.x, self.y - 1)
    }

    /// The cell directly to the left.
    #[must_use]
    pub const fn west(self) -> Self {
        Self::new(self.x - 1, self.y)
    }

    /// The cell directly to the right.
    #[must_use]
    pub const fn east(self) -> Self {
        Self::new(self.x + 1, self.y)
    }

    /// The cell directly below.
    #[must_use]
    pub const fn south(self) -> Self {
        Self::new(self.x, self.y + 1)
    }

    /// The four orthogonal neighbours in reading order: north, west, east,
    /// south.
    ///
    /// Callers that scan candidates in this order and keep the first best
    /// match get reading-order tie-breaking without an explicit sort. The
    /// breadth-first search relies on the same ordering for its frontier
    /// expansion.
    #[must_use]
    pub const fn neighbors(self) -> [Self; 4] {
        [self.north(), self.west(), self.east(), self.south()]
    }

    /// Whether `other` is orthogonally adjacent (Manhattan distance exactly 1).
    #[must_use]
    pub fn is_adjacent(self, other: Self) -> bool {
        (self.x - other.x).abs() + (self.y - other.y).abs() == 1
    }
}

impl Ord for Cell {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.y, self.x).cmp(&(other.y, other.x))
    }
}

impl PartialOrd for Cell {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Debug for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Cell({}, {})", self.x, self.y)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}
