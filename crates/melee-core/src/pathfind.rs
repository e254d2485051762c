//! Breadth-first movement planning.
//!
//! Movement is decided in two flood fills over the current occupancy:
//!
//! 1. **Outbound**: flood from the agent. Among all open cells adjacent to
//!    an opponent ("in range" cells), the goal is the one at minimal
//!    distance, ties broken by reading order.
//! 2. **Inbound**: flood from the chosen goal. Among the agent's four
//!    neighbours, the step taken is the one with minimal remaining distance
//!    to the goal, ties again broken by reading order.
//!
//! The second flood is what makes the first step independent of any
//! particular shortest path the outbound search happened to discover:
//! predecessor chains depend on expansion order, remaining distances do not.
//!
//! # Determinism
//!
//! Every collection here iterates in a fixed order: the frontier is FIFO,
//! neighbours expand north, west, east, south (reading order of the four),
//! and candidate sets are `BTreeSet`s keyed by [`Cell`]'s reading-order
//! `Ord`. Two calls on equal battlefields return byte-identical results.

use crate::battlefield::Battlefield;
use crate::cell::Cell;
use std::collections::{BTreeSet, VecDeque};

/// Sentinel for cells the flood never reached.
const UNREACHABLE: u32 = u32::MAX;

// ============================================================================
// DistanceField
// ============================================================================

/// Distances and predecessors from one breadth-first flood.
///
/// Dense per-cell storage sized to the grid. Cells that are walls, occupied,
/// or cut off report `None`; the source always reports distance 0, even when
/// an agent is standing on it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DistanceField {
    width: i32,
    height: i32,
    source: Cell,
    distances: Vec<u32>,
    predecessors: Vec<Option<Cell>>,
}

impl DistanceField {
    /// The cell this flood started from.
    #[must_use]
    pub const fn source(&self) -> Cell {
        self.source
    }

    /// Steps from the source to `cell`, or `None` if unreachable.
    #[must_use]
    pub fn distance(&self, cell: Cell) -> Option<u32> {
        let slot = self.idx(cell)?;
        let distance = self.distances[slot];
        (distance != UNREACHABLE).then_some(distance)
    }

    /// The cell `cell` was discovered from, one step closer to the source.
    #[must_use]
    pub fn predecessor(&self, cell: Cell) -> Option<Cell> {
        self.predecessors[self.idx(cell)?]
    }

    /// Reconstructs the shortest path from the source to `cell` by walking
    /// predecessors. The source is excluded, so the result has exactly
    /// `distance(cell)` entries and ends at `cell`. Returns `None` for
    /// unreachable cells and an empty path for the source itself.
    #[must_use]
    pub fn path_to(&self, cell: Cell) -> Option<Vec<Cell>> {
        self.distance(cell)?;
        let mut path = Vec::new();
        let mut cursor = cell;
        while cursor != self.source {
            path.push(cursor);
            cursor = self.predecessor(cursor)?;
        }
        path.reverse();
        Some(path)
    }

    fn idx(&self, cell: Cell) -> Option<usize> {
        if cell.x >= 0 && cell.x < self.width && cell.y >= 0 && cell.y < self.height {
            #[allow(clippy::cast_sign_loss)] // bounds checked just above
            Some(cell.y as usize * self.width as usize + cell.x as usize)
        } else {
            None
        }
    }
}

/// Floods outward from `source` over open cells.
///
/// Walls and cells occupied by living agents block expansion; the source is
/// exempt so an agent can flood from its own position. Frontier order is
/// FIFO and neighbours are expanded in reading order, so the resulting
/// predecessor chains are deterministic.
#[must_use]
pub fn flood(field: &Battlefield, source: Cell) -> DistanceField {
    let grid = field.grid();
    #[allow(clippy::cast_sign_loss)] // grid dimensions are positive
    let cell_count = grid.width() as usize * grid.height() as usize;
    let mut search = DistanceField {
        width: grid.width(),
        height: grid.height(),
        source,
        distances: vec![UNREACHABLE; cell_count],
        predecessors: vec![None; cell_count],
    };

    let Some(start) = search.idx(source) else {
        return search; // a source outside the grid reaches nothing
    };
    search.distances[start] = 0;

    let mut frontier = VecDeque::new();
    frontier.push_back(source);
    while let Some(cell) = frontier.pop_front() {
        let Some(here) = search.idx(cell) else {
            continue;
        };
        let next_distance = search.distances[here] + 1;
        for neighbor in cell.neighbors() {
            let Some(slot) = search.idx(neighbor) else {
                continue;
            };
            if search.distances[slot] != UNREACHABLE {
                continue; // already discovered on an equal-or-shorter path
            }
            if !field.is_open(neighbor) {
                continue;
            }
            search.distances[slot] = next_distance;
            search.predecessors[slot] = Some(cell);
            frontier.push_back(neighbor);
        }
    }
    search
}

// ============================================================================
// Step planning
// ============================================================================

/// Outcome of planning one step of movement toward the nearest target.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StepSearch {
    /// No open cell adjacent to any target exists; there is nowhere to go.
    NoTarget,
    /// In-range cells exist, but none is reachable through the current
    /// occupancy.
    NoPath,
    /// Take a single step.
    Step {
        /// The neighbour of the agent to move onto.
        to: Cell,
        /// The in-range cell the agent is heading for.
        goal: Cell,
        /// Remaining shortest path, from `to` through `goal` inclusive.
        route: Vec<Cell>,
    },
}

/// Plans one step from `source` toward the nearest open cell adjacent to any
/// of `targets`.
///
/// Selection is fully ordered: nearest in-range cell first, reading order
/// among equals; then the reading-order-first of the agent's neighbours with
/// minimal remaining distance. Callers are expected to skip planning when
/// already adjacent to a target; `source` itself is never an in-range
/// candidate because the agent occupies it.
#[must_use]
pub fn plan_step(field: &Battlefield, source: Cell, targets: &[Cell]) -> StepSearch {
    let mut in_range: BTreeSet<Cell> = BTreeSet::new();
    for &target in targets {
        for cell in target.neighbors() {
            if field.is_open(cell) {
                in_range.insert(cell);
            }
        }
    }
    if in_range.is_empty() {
        return StepSearch::NoTarget;
    }

    // Nearest in-range cell; BTreeSet iteration plus strict `<` keeps the
    // reading-order-first among equidistant candidates.
    let outbound = flood(field, source);
    let mut best_goal: Option<(u32, Cell)> = None;
    for &candidate in &in_range {
        let Some(distance) = outbound.distance(candidate) else {
            continue;
        };
        if best_goal.map_or(true, |(best, _)| distance < best) {
            best_goal = Some((distance, candidate));
        }
    }
    let Some((_, goal)) = best_goal else {
        return StepSearch::NoPath;
    };

    // Re-flood from the goal: remaining distances rank the agent's own
    // neighbours without depending on which shortest path the outbound
    // search happened to record.
    let inbound = flood(field, goal);
    let mut best_step: Option<(u32, Cell)> = None;
    for neighbor in source.neighbors() {
        let Some(remaining) = inbound.distance(neighbor) else {
            continue;
        };
        if best_step.map_or(true, |(best, _)| remaining < best) {
            best_step = Some((remaining, neighbor));
        }
    }
    let Some((_, to)) = best_step else {
        // The goal was reachable from the source, so some neighbour must be
        // reachable from the goal; kept as a graceful fallback.
        return StepSearch::NoPath;
    };

    let Some(mut route) = inbound.path_to(to) else {
        return StepSearch::NoPath;
    };
    route.reverse();
    route.push(goal);
    StepSearch::Step { to, goal, route }
}
