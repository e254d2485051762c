//! # Melee Core
//!
//! Deterministic, tick-based melee combat between Elves and Goblins on a 2D
//! grid, in the style of a classic roguelike skirmish.
//!
//! A battle loads from a small text map, then resolves in rounds. Every
//! round, each living agent takes one turn in reading order of its position:
//! it identifies opponents, steps toward the nearest reachable one if none
//! is adjacent, and attacks the weakest adjacent opponent. Combat ends the
//! moment an agent finds no opponents left; the score is the number of
//! completed rounds times the winners' remaining hit points.
//!
//! - **Deterministic**: no randomness, no clocks, no hash-order iteration.
//!   Identical inputs produce byte-identical battles, every time.
//! - **Headless by design**: the engine owns all mutable state and narrates
//!   through read-only views; renderers are optional observers.
//! - **Value semantics**: a [`Simulation`] is a plain value you can clone,
//!   hash, serialize, and compare.
//!
//! ## Quick Start
//!
//! ```rust
//! use melee_core::{SimConfig, Simulation};
//!
//! let map = "\
//! #######
//! #.G...#
//! #...EG#
//! #.#.#G#
//! #..G#E#
//! #.....#
//! #######
//! ";
//!
//! let mut sim = Simulation::from_map(map, &SimConfig::default())?;
//! let outcome = sim.run();
//! println!("{outcome}"); // Goblins win! Round=47, HP=590, Outcome=27730
//! assert_eq!(outcome.score(), 27730);
//! # Ok::<(), melee_core::MapError>(())
//! ```
//!
//! ## Caveat
//!
//! Rounds keep resolving for as long as both factions live. If the map
//! seals the factions apart so that no path between them can ever open,
//! [`Simulation::run`] will not terminate; drive such battles with
//! [`Simulation::advance_round`] and your own round cap.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod agent;
pub mod battlefield;
pub mod cell;
pub mod config;
pub mod event;
pub mod grid;
pub mod loader;
pub mod outcome;
pub mod pathfind;
pub mod simulation;
pub mod view;

// Re-exports for convenience
pub use agent::{Agent, AgentId, Condition, Faction};
pub use battlefield::{Battlefield, PositionIndex};
pub use cell::Cell;
pub use config::SimConfig;
pub use event::{CombatEvent, NullObserver, Observer};
pub use grid::{Grid, Tile};
pub use loader::{parse_map, MapError};
pub use outcome::Outcome;
pub use pathfind::{flood, plan_step, DistanceField, StepSearch};
pub use simulation::{CombatStatus, Simulation};
pub use view::BattleView;

#[cfg(test)]
mod tests;
