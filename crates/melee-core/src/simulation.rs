//! The turn engine.
//!
//! [`Simulation`] owns a [`Battlefield`] and resolves combat round by round.
//! Each round snapshots the living agents in reading order of their cells,
//! then gives each a turn of up to four phases:
//!
//! 1. **Identify**: collect living opponents. If there are none, combat is
//!    over on the spot and the round in progress does not count.
//! 2. **Move**: if no opponent is adjacent, take one step toward the
//!    nearest open cell beside one (see [`crate::pathfind`]), or hold when
//!    nothing is reachable.
//! 3. **Attack**: strike the adjacent opponent with the fewest hit points,
//!    reading order breaking ties. Agents reduced to zero leave the
//!    position index immediately.
//! 4. **End turn**: clear the acting agent's transient status and the
//!    attack target marker.
//!
//! Entries in the round snapshot whose agent has died earlier in the round
//! are skipped. A pass that runs to the end increments the completed-round
//! counter; the final score multiplies that counter by the winners'
//! remaining hit points.
//!
//! # Determinism
//!
//! Resolution touches no clock, no randomness, and no hash-order iteration.
//! Two simulations built from the same map and configuration stay
//! byte-identical through every round, observer or not.
//!
//! # Example
//!
//! ```
//! use melee_core::config::SimConfig;
//! use melee_core::simulation::Simulation;
//!
//! let mut sim = Simulation::from_map("####\n#EG#\n####\n", &SimConfig::default())?;
//! let outcome = sim.run();
//! assert_eq!(outcome.score(), 134); // 67 completed rounds, 2 hp left
//! # Ok::<(), melee_core::loader::MapError>(())
//! ```

use crate::agent::{Agent, AgentId, Condition, Faction};
use crate::battlefield::Battlefield;
use crate::cell::Cell;
use crate::config::SimConfig;
use crate::event::{CombatEvent, NullObserver, Observer};
use crate::loader::{self, MapError};
use crate::outcome::Outcome;
use crate::pathfind::{self, StepSearch};
use crate::view::BattleView;
use serde::{Deserialize, Serialize};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

// ============================================================================
// CombatStatus
// ============================================================================

/// Whether a battle is still being fought.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CombatStatus {
    /// Both factions still field living agents; rounds keep resolving.
    InProgress,
    /// One faction is gone and the outcome is final.
    Ended,
}

/// Flow control from a single turn back to the round loop.
#[derive(Copy, Clone, PartialEq, Eq)]
enum TurnFlow {
    Continue,
    CombatOver,
}

// ============================================================================
// Simulation
// ============================================================================

/// A complete battle: battlefield state plus the round bookkeeping.
///
/// Construct one per simulation; there is no global state. The engine is
/// single-threaded and synchronous, and every mutation of combat state goes
/// through it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Simulation {
    field: Battlefield,
    completed_rounds: u32,
    outcome: Option<Outcome>,
    active: Option<AgentId>,
    target: Option<AgentId>,
}

impl Simulation {
    /// Wraps an already-populated battlefield.
    #[must_use]
    pub const fn new(field: Battlefield) -> Self {
        Self {
            field,
            completed_rounds: 0,
            outcome: None,
            active: None,
            target: None,
        }
    }

    /// Parses a map and wraps it. See [`crate::loader::parse_map`].
    ///
    /// # Errors
    ///
    /// Returns [`MapError`] when the map text is rejected.
    pub fn from_map(input: &str, config: &SimConfig) -> Result<Self, MapError> {
        Ok(Self::new(loader::parse_map(input, config)?))
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    /// The battlefield being fought over.
    #[must_use]
    pub const fn battlefield(&self) -> &Battlefield {
        &self.field
    }

    /// Mutable battlefield access, for arranging fixtures before the first
    /// round (adjusting hit points, spawning extra agents). Combat itself
    /// should be driven through [`Self::advance_round`].
    pub fn battlefield_mut(&mut self) -> &mut Battlefield {
        &mut self.field
    }

    /// Rounds that ran to completion so far.
    #[must_use]
    pub const fn completed_rounds(&self) -> u32 {
        self.completed_rounds
    }

    /// The 1-based number of the round currently being fought (or, once
    /// combat has ended, the round it ended during).
    #[must_use]
    pub const fn current_round(&self) -> u32 {
        self.completed_rounds + 1
    }

    /// Whether the battle is still running.
    #[must_use]
    pub const fn status(&self) -> CombatStatus {
        if self.outcome.is_some() {
            CombatStatus::Ended
        } else {
            CombatStatus::InProgress
        }
    }

    /// Whether one faction has been eliminated.
    #[must_use]
    pub const fn is_over(&self) -> bool {
        self.outcome.is_some()
    }

    /// The final report, once combat has ended.
    #[must_use]
    pub const fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    /// A read-only view of the current instant, as handed to observers.
    #[must_use]
    pub const fn view(&self) -> BattleView<'_> {
        BattleView::new(
            &self.field,
            self.completed_rounds + 1,
            self.completed_rounds,
            self.active,
            self.target,
        )
    }

    /// Deterministic hash of engine state: battlefield plus round counter.
    #[must_use]
    pub fn state_hash(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.field.state_hash().hash(&mut hasher);
        self.completed_rounds.hash(&mut hasher);
        hasher.finish()
    }

    // ------------------------------------------------------------------
    // Round resolution
    // ------------------------------------------------------------------

    /// Advances one round without an observer.
    pub fn advance_round(&mut self) -> CombatStatus {
        self.advance_round_with(&mut NullObserver)
    }

    /// Advances one round, narrating each phase to `observer`.
    ///
    /// Returns [`CombatStatus::Ended`] as soon as any agent starts a turn
    /// with no living opponents (that round is not counted), or when called
    /// on a battle that was already over.
    pub fn advance_round_with(&mut self, observer: &mut dyn Observer) -> CombatStatus {
        if self.outcome.is_some() {
            return CombatStatus::Ended;
        }
        // A battle that is already decided (a faction absent from the map or
        // wiped out at the tail of the previous round) ends before anyone
        // acts, and the unstarted round is not counted.
        if !self.field.has_living(Faction::Elf) || !self.field.has_living(Faction::Goblin) {
            return self.finish(observer);
        }

        let order = self.field.turn_order();
        tracing::trace!(
            round = self.completed_rounds + 1,
            agents = order.len(),
            "round starting"
        );
        for (cell, id) in order {
            match self.field.agent(id) {
                Some(agent) if agent.is_alive() => {
                    let faction = agent.faction();
                    let position = agent.position();
                    let power = agent.attack_power();
                    debug_assert_eq!(position, cell, "agents only move on their own turn");
                    if self.take_turn(id, faction, position, power, observer) == TurnFlow::CombatOver
                    {
                        return self.finish(observer);
                    }
                }
                // Killed earlier this round; its snapshot entry is skipped.
                _ => {}
            }
        }

        self.completed_rounds += 1;
        self.active = None;
        tracing::debug!(round = self.completed_rounds, "round completed");
        let event = CombatEvent::RoundCompleted {
            round: self.completed_rounds,
        };
        observer.on_event(&event, self.view());
        CombatStatus::InProgress
    }

    /// Runs rounds until combat ends and returns the final report.
    ///
    /// Termination relies on the factions being able to reach each other;
    /// opponents sealed apart forever would trade no blows and never finish
    /// (see the crate documentation).
    pub fn run(&mut self) -> Outcome {
        self.run_with(&mut NullObserver)
    }

    /// Like [`Self::run`], narrating to `observer`.
    pub fn run_with(&mut self, observer: &mut dyn Observer) -> Outcome {
        loop {
            if let Some(outcome) = self.outcome {
                return outcome;
            }
            self.advance_round_with(observer);
        }
    }

    fn take_turn(
        &mut self,
        id: AgentId,
        faction: Faction,
        position: Cell,
        power: i32,
        observer: &mut dyn Observer,
    ) -> TurnFlow {
        self.active = Some(id);

        // PHASE 1: Identify targets. Finding none ends combat mid-round.
        let targets: Vec<Cell> = self
            .field
            .living(faction.opponent())
            .map(Agent::position)
            .collect();
        if targets.is_empty() {
            return TurnFlow::CombatOver;
        }

        let event = CombatEvent::TurnStarted {
            agent: id,
            at: position,
        };
        observer.on_event(&event, self.view());

        // PHASE 2: Move, unless an opponent is already adjacent.
        let mut at = position;
        if !targets.iter().any(|&target| target.is_adjacent(at)) {
            match pathfind::plan_step(&self.field, at, &targets) {
                StepSearch::Step { to, goal, route } => {
                    self.field.relocate(id, to);
                    self.field.set_condition(id, Condition::Advancing);
                    at = to;
                    tracing::trace!(agent = %id, %to, %goal, "stepped");
                    let event = CombatEvent::Moved {
                        agent: id,
                        from: position,
                        to,
                        goal,
                        route,
                    };
                    observer.on_event(&event, self.view());
                }
                StepSearch::NoTarget | StepSearch::NoPath => {
                    self.field.set_condition(id, Condition::Holding);
                }
            }
        }

        // PHASE 3: Attack the weakest adjacent opponent, reading order
        // breaking ties.
        if let Some((victim, victim_cell)) = self.weakest_adjacent_opponent(at, faction.opponent())
        {
            self.field.set_condition(id, Condition::Attacking);
            self.field.set_condition(victim, Condition::UnderAttack);
            self.target = Some(victim);
            let remaining = self.field.deal_damage(victim, power);
            tracing::trace!(agent = %id, %victim, remaining, "struck");
            let event = CombatEvent::Attacked {
                attacker: id,
                target: victim,
                damage: power,
                remaining_hp: remaining,
            };
            observer.on_event(&event, self.view());
            if remaining == 0 {
                tracing::debug!(agent = %victim, at = %victim_cell, "agent slain");
                let event = CombatEvent::Died {
                    agent: victim,
                    at: victim_cell,
                };
                observer.on_event(&event, self.view());
            }
        }

        // PHASE 4: End of turn. The last display of this turn happens with
        // the labels still in place, then the transient ones drop.
        let event = CombatEvent::TurnEnded { agent: id };
        observer.on_event(&event, self.view());
        self.field.set_condition(id, Condition::Idle);
        self.target = None;
        TurnFlow::Continue
    }

    /// Scans the four neighbours in reading order and keeps the strictly
    /// weakest living opponent, so the first of any tie wins.
    fn weakest_adjacent_opponent(&self, from: Cell, opponent: Faction) -> Option<(AgentId, Cell)> {
        let mut weakest: Option<(i32, AgentId, Cell)> = None;
        for neighbor in from.neighbors() {
            let Some(id) = self.field.occupant(neighbor) else {
                continue;
            };
            let Some(agent) = self.field.agent(id) else {
                continue;
            };
            if agent.faction() != opponent {
                continue;
            }
            if weakest.map_or(true, |(hp, _, _)| agent.hp() < hp) {
                weakest = Some((agent.hp(), id, neighbor));
            }
        }
        weakest.map(|(_, id, cell)| (id, cell))
    }

    fn finish(&mut self, observer: &mut dyn Observer) -> CombatStatus {
        let outcome = Outcome::from_battlefield(&self.field, self.completed_rounds);
        self.outcome = Some(outcome);
        self.active = None;
        self.target = None;
        tracing::info!(
            winner = %outcome.winner(),
            rounds = outcome.rounds(),
            hp = outcome.hp_sum(),
            score = outcome.score(),
            "combat ended"
        );
        let event = CombatEvent::CombatEnded { outcome };
        observer.on_event(&event, self.view());
        CombatStatus::Ended
    }
}
