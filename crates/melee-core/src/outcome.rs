//! Battle results.
//!
//! When combat ends the engine distills the battlefield into an [`Outcome`]:
//! the number of completed rounds, the surviving faction, its remaining hit
//! points, and the product of the two. The `Display` impl is the one-line
//! battle report printed by the CLI:
//!
//! ```text
//! Goblins win! Round=47, HP=590, Outcome=27730
//! ```

use crate::agent::Faction;
use crate::battlefield::Battlefield;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Summary of a finished battle.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Outcome {
    rounds: u32,
    winner: Faction,
    hp_sum: i32,
    score: i64,
}

impl Outcome {
    /// Creates an outcome, computing the score as `rounds * hp_sum`.
    #[must_use]
    pub fn new(rounds: u32, winner: Faction, hp_sum: i32) -> Self {
        Self {
            rounds,
            winner,
            hp_sum,
            score: i64::from(rounds) * i64::from(hp_sum),
        }
    }

    /// Reads the result off a battlefield where combat has ended.
    ///
    /// The winner is whichever faction still has living members; with both
    /// factions empty (an agentless map) the Goblins are credited by
    /// convention, with zero hit points and a zero score.
    pub(crate) fn from_battlefield(field: &Battlefield, completed_rounds: u32) -> Self {
        let winner = if field.has_living(Faction::Elf) {
            Faction::Elf
        } else {
            Faction::Goblin
        };
        Self::new(completed_rounds, winner, field.living_hp_sum(winner))
    }

    /// Fully completed rounds before combat ended.
    #[must_use]
    pub const fn rounds(&self) -> u32 {
        self.rounds
    }

    /// The faction left standing.
    #[must_use]
    pub const fn winner(&self) -> Faction {
        self.winner
    }

    /// Hit points remaining across the winning faction.
    #[must_use]
    pub const fn hp_sum(&self) -> i32 {
        self.hp_sum
    }

    /// `rounds * hp_sum`, the single number a battle boils down to.
    #[must_use]
    pub const fn score(&self) -> i64 {
        self.score
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} win! Round={}, HP={}, Outcome={}",
            self.winner.plural(),
            self.rounds,
            self.hp_sum,
            self.score
        )
    }
}
