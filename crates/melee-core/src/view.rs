//! Read-only views of a battle in progress.
//!
//! [`BattleView`] is what the engine hands to observers: cheap to copy,
//! borrowing the battlefield immutably, and carrying the bits of engine
//! state a renderer wants but the battlefield does not know (the round
//! counters and which agents are currently acting and being attacked).
//! Because observers only ever hold a shared borrow, they cannot mutate
//! combat state by construction.

use crate::agent::{Agent, AgentId};
use crate::battlefield::Battlefield;
use crate::cell::Cell;
use crate::grid::Grid;

/// A snapshot view of the battle at one observable instant.
#[derive(Copy, Clone, Debug)]
pub struct BattleView<'a> {
    field: &'a Battlefield,
    current_round: u32,
    completed_rounds: u32,
    active: Option<AgentId>,
    target: Option<AgentId>,
}

impl<'a> BattleView<'a> {
    pub(crate) const fn new(
        field: &'a Battlefield,
        current_round: u32,
        completed_rounds: u32,
        active: Option<AgentId>,
        target: Option<AgentId>,
    ) -> Self {
        Self {
            field,
            current_round,
            completed_rounds,
            active,
            target,
        }
    }

    /// The terrain being fought over.
    #[must_use]
    pub const fn grid(&self) -> &'a Grid {
        self.field.grid()
    }

    /// Looks up an agent (living or dead) by id.
    #[must_use]
    pub fn agent(&self, id: AgentId) -> Option<&'a Agent> {
        self.field.agent(id)
    }

    /// Iterates the full roster, dead included, in id order.
    pub fn agents(&self) -> impl Iterator<Item = &'a Agent> + 'a {
        self.field.agents()
    }

    /// The living agent standing on `cell`, if any.
    #[must_use]
    pub fn occupant(&self, cell: Cell) -> Option<AgentId> {
        self.field.occupant(cell)
    }

    /// The 1-based round currently being fought.
    #[must_use]
    pub const fn current_round(&self) -> u32 {
        self.current_round
    }

    /// Rounds fully completed so far.
    #[must_use]
    pub const fn completed_rounds(&self) -> u32 {
        self.completed_rounds
    }

    /// The agent whose turn is being resolved, if any.
    #[must_use]
    pub const fn active_agent(&self) -> Option<AgentId> {
        self.active
    }

    /// The agent most recently struck this turn, if any.
    #[must_use]
    pub const fn target_agent(&self) -> Option<AgentId> {
        self.target
    }

    /// The map as text, agents drawn over terrain.
    #[must_use]
    pub fn map_string(&self) -> String {
        self.field.to_string()
    }
}
