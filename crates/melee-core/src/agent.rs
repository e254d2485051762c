//! Combatants: identities, factions, and per-agent state.
//!
//! Agents are plain value types. Identity is a small integer [`AgentId`]
//! assigned in map scan order at load time; everything else (faction,
//! position, hit points) lives in the [`Agent`] record owned by the
//! battlefield. Dead agents keep their record (for post-battle inspection and
//! the stats panel) but leave the position index, so they stop blocking
//! movement the instant they fall.
//!
//! # Example
//!
//! ```
//! use melee_core::agent::{Agent, AgentId, Faction};
//! use melee_core::cell::Cell;
//!
//! let elf = Agent::new(AgentId::new(1), Faction::Elf, Cell::new(2, 1), 3);
//! assert_eq!(elf.hp(), Agent::STARTING_HP);
//! assert!(elf.is_alive());
//! assert_eq!(elf.faction().opponent(), Faction::Goblin);
//! ```

use crate::cell::Cell;
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// AgentId
// ============================================================================

/// Unique identifier for an agent, stable for the lifetime of a battle.
///
/// Ids are assigned sequentially from 1 in map scan order (reading order of
/// the starting positions), so sorting by id reproduces the original roster
/// order in logs and stats panels.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AgentId(u32);

impl AgentId {
    /// Creates an agent ID from a raw value.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Returns the raw ID value.
    #[must_use]
    pub const fn as_u32(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AgentId({})", self.0)
    }
}

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for AgentId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl From<AgentId> for u32 {
    fn from(id: AgentId) -> Self {
        id.0
    }
}

// ============================================================================
// Faction
// ============================================================================

/// The two sides of the battle. Every agent belongs to exactly one, and
/// anyone from the other faction is a target.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Faction {
    /// The Elves, drawn as `E`.
    Elf,
    /// The Goblins, drawn as `G`.
    Goblin,
}

impl Faction {
    /// The opposing faction.
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Self::Elf => Self::Goblin,
            Self::Goblin => Self::Elf,
        }
    }

    /// The map character for agents of this faction.
    #[must_use]
    pub const fn glyph(self) -> char {
        match self {
            Self::Elf => 'E',
            Self::Goblin => 'G',
        }
    }

    /// Plural faction name, as used in the battle report.
    #[must_use]
    pub const fn plural(self) -> &'static str {
        match self {
            Self::Elf => "Elves",
            Self::Goblin => "Goblins",
        }
    }
}

impl fmt::Display for Faction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Elf => write!(f, "Elf"),
            Self::Goblin => write!(f, "Goblin"),
        }
    }
}

// ============================================================================
// Condition
// ============================================================================

/// What an agent was last seen doing, for status displays.
///
/// Purely cosmetic: the engine updates conditions as it resolves turns so
/// renderers can label agents, but no combat rule reads them. The acting
/// agent's transient condition is cleared when its turn ends; `UnderAttack`
/// lingers on the victim until something overwrites it, and `Dead` is
/// permanent.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Condition {
    /// Nothing noteworthy this turn.
    #[default]
    Idle,
    /// Wanted to move but had no path (or no reachable target).
    Holding,
    /// Moved one step along a path this turn.
    Advancing,
    /// Dealt damage this turn.
    Attacking,
    /// Took damage recently.
    UnderAttack,
    /// Out of the fight. Never cleared.
    Dead,
}

impl Condition {
    /// Status panel label. `Idle` is deliberately blank.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Idle => "",
            Self::Holding => "Not Moving",
            Self::Advancing => "Moving",
            Self::Attacking => "Attacking",
            Self::UnderAttack => "Under Attack",
            Self::Dead => "Dead",
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

// ============================================================================
// Agent
// ============================================================================

/// A single combatant.
///
/// Fields are private; reads go through accessors and all mutation goes
/// through [`crate::battlefield::Battlefield`], which keeps the position
/// index consistent with agent positions.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Agent {
    id: AgentId,
    faction: Faction,
    position: Cell,
    hp: i32,
    attack_power: i32,
    condition: Condition,
}

impl Agent {
    /// Hit points every agent starts with.
    pub const STARTING_HP: i32 = 200;

    /// Creates an agent at full health.
    #[must_use]
    pub const fn new(id: AgentId, faction: Faction, position: Cell, attack_power: i32) -> Self {
        Self {
            id,
            faction,
            position,
            hp: Self::STARTING_HP,
            attack_power,
            condition: Condition::Idle,
        }
    }

    /// This agent's identifier.
    #[must_use]
    pub const fn id(&self) -> AgentId {
        self.id
    }

    /// Which side the agent fights for.
    #[must_use]
    pub const fn faction(&self) -> Faction {
        self.faction
    }

    /// Current grid position. Stale for dead agents (where they fell).
    #[must_use]
    pub const fn position(&self) -> Cell {
        self.position
    }

    /// Remaining hit points, never negative.
    #[must_use]
    pub const fn hp(&self) -> i32 {
        self.hp
    }

    /// Damage dealt per attack.
    #[must_use]
    pub const fn attack_power(&self) -> i32 {
        self.attack_power
    }

    /// Last observed activity, for status displays.
    #[must_use]
    pub const fn condition(&self) -> Condition {
        self.condition
    }

    /// Whether the agent still takes turns and blocks movement.
    #[must_use]
    pub const fn is_alive(&self) -> bool {
        self.hp > 0
    }

    /// The map character for this agent.
    #[must_use]
    pub const fn glyph(&self) -> char {
        self.faction.glyph()
    }

    pub(crate) fn set_position(&mut self, position: Cell) {
        self.position = position;
    }

    pub(crate) fn set_condition(&mut self, condition: Condition) {
        self.condition = condition;
    }

    pub(crate) fn set_hp(&mut self, hp: i32) {
        self.hp = hp;
    }

    /// Applies damage, clamping hit points at zero. Returns `true` if this
    /// blow killed the agent.
    pub(crate) fn apply_damage(&mut self, amount: i32) -> bool {
        let was_alive = self.is_alive();
        self.hp = (self.hp - amount).max(0);
        was_alive && !self.is_alive()
    }
}
