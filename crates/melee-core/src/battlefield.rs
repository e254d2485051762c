//! Battlefield state: terrain, the agent roster, and the position index.
//!
//! [`Battlefield`] is the single owner of mutable combat state. The turn
//! engine drives it through a small set of operations (`spawn`, `relocate`,
//! `deal_damage`) that keep two structures consistent:
//!
//! - the roster, a `BTreeMap` from [`AgentId`] to [`Agent`], which retains
//!   dead agents for inspection, and
//! - the [`PositionIndex`], which maps occupied cells to the *living* agents
//!   standing on them and is the authority for all occupancy queries.
//!
//! Both maps are ordered, so iterating the roster walks agents in id order
//! and iterating the index walks them in reading order. That ordering is
//! what makes round resolution deterministic.
//!
//! Violating an operation's contract (moving into a wall, damaging a corpse,
//! stacking two agents on one cell) is a bug in the caller and panics with a
//! diagnostic rather than corrupting state.
//!
//! # Example
//!
//! ```
//! use melee_core::battlefield::Battlefield;
//! use melee_core::cell::Cell;
//! use melee_core::agent::Faction;
//! use melee_core::grid::{Grid, Tile};
//!
//! let mut field = Battlefield::new(Grid::filled(3, 3, Tile::Floor));
//! field.spawn(Faction::Elf, Cell::new(1, 1), 3);
//! assert_eq!(field.to_string(), "...\n.E.\n...\n");
//! ```

use crate::agent::{Agent, AgentId, Condition, Faction};
use crate::cell::Cell;
use crate::grid::{Grid, Tile};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::hash_map::DefaultHasher;
use std::collections::BTreeMap;
use std::fmt;
use std::hash::{Hash, Hasher};

// ============================================================================
// PositionIndex
// ============================================================================

/// Bidirectional map between occupied cells and living agents.
///
/// Dead agents are removed immediately, so membership here *is* the
/// "occupied" predicate used by pathfinding. The cell-keyed side is a
/// `BTreeMap`, so iteration yields agents in reading order of their
/// positions.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PositionIndex {
    cells: BTreeMap<Cell, AgentId>,
    ids: BTreeMap<AgentId, Cell>,
}

impl PositionIndex {
    /// Creates an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of occupied cells.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Whether no agent occupies any cell.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// The agent standing on `cell`, if any.
    #[must_use]
    pub fn occupant(&self, cell: Cell) -> Option<AgentId> {
        self.cells.get(&cell).copied()
    }

    /// Whether any agent stands on `cell`.
    #[must_use]
    pub fn occupied(&self, cell: Cell) -> bool {
        self.cells.contains_key(&cell)
    }

    /// Where `id` currently stands, or `None` if it is not placed (dead or
    /// never spawned).
    #[must_use]
    pub fn position_of(&self, id: AgentId) -> Option<Cell> {
        self.ids.get(&id).copied()
    }

    /// Iterates `(cell, agent)` pairs in reading order of the cells.
    pub fn iter(&self) -> impl Iterator<Item = (Cell, AgentId)> + '_ {
        self.cells.iter().map(|(&cell, &id)| (cell, id))
    }

    /// Places `id` on `cell`.
    ///
    /// # Panics
    ///
    /// Panics if the cell is occupied or the agent is already placed.
    pub fn place(&mut self, id: AgentId, cell: Cell) {
        if let Some(existing) = self.cells.get(&cell) {
            panic!("cell {cell:?} is already occupied by agent {existing}");
        }
        if let Some(existing) = self.ids.get(&id) {
            panic!("agent {id} is already placed at {existing:?}");
        }
        self.cells.insert(cell, id);
        self.ids.insert(id, cell);
    }

    /// Removes `id` from the index, returning the cell it stood on. Removing
    /// an agent that is not placed is a no-op returning `None`.
    pub fn remove(&mut self, id: AgentId) -> Option<Cell> {
        let cell = self.ids.remove(&id)?;
        let occupant = self.cells.remove(&cell);
        debug_assert_eq!(occupant, Some(id));
        Some(cell)
    }

    /// Moves a placed agent to an unoccupied cell.
    ///
    /// # Panics
    ///
    /// Panics if the agent is not placed or the destination is occupied.
    pub fn relocate(&mut self, id: AgentId, to: Cell) {
        let Some(_) = self.remove(id) else {
            panic!("agent {id} is not placed and cannot be moved");
        };
        self.place(id, to);
    }
}

// The cell-keyed side is redundant with the id-keyed side, so only the
// id-keyed map crosses the serialization boundary (its integer keys are also
// valid in JSON, where struct keys are not). The mirror map is rebuilt on
// deserialization, rejecting inputs that stack agents on one cell.
impl Serialize for PositionIndex {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.ids.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for PositionIndex {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let ids: BTreeMap<AgentId, Cell> = BTreeMap::deserialize(deserializer)?;
        let cells: BTreeMap<Cell, AgentId> = ids.iter().map(|(&id, &cell)| (cell, id)).collect();
        if cells.len() != ids.len() {
            return Err(serde::de::Error::custom(
                "position index places two agents on the same cell",
            ));
        }
        Ok(Self { cells, ids })
    }
}

// ============================================================================
// Battlefield
// ============================================================================

/// Full mutable state of one battle: terrain, roster, and occupancy.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Battlefield {
    grid: Grid,
    next_id: u32,
    agents: BTreeMap<AgentId, Agent>,
    index: PositionIndex,
}

impl Battlefield {
    /// Creates an empty battlefield over the given terrain.
    #[must_use]
    pub fn new(grid: Grid) -> Self {
        Self {
            grid,
            next_id: 1,
            agents: BTreeMap::new(),
            index: PositionIndex::new(),
        }
    }

    /// Spawns an agent at full health and returns its id.
    ///
    /// Ids are handed out sequentially from 1, so spawning in map scan order
    /// numbers agents in reading order of their starting cells.
    ///
    /// # Panics
    ///
    /// Panics if `cell` is a wall, outside the grid, or already occupied, or
    /// if `attack_power` is zero or negative.
    pub fn spawn(&mut self, faction: Faction, cell: Cell, attack_power: i32) -> AgentId {
        assert!(
            self.grid.passable(cell),
            "cannot spawn {faction} on impassable cell {cell:?}"
        );
        assert!(
            attack_power > 0,
            "cannot spawn {faction} with non-positive attack power {attack_power}"
        );
        let id = AgentId::new(self.next_id);
        self.next_id += 1;
        self.index.place(id, cell);
        self.agents
            .insert(id, Agent::new(id, faction, cell, attack_power));
        id
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    /// The terrain this battle is fought on.
    #[must_use]
    pub const fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Looks up an agent (living or dead) by id.
    #[must_use]
    pub fn agent(&self, id: AgentId) -> Option<&Agent> {
        self.agents.get(&id)
    }

    /// Iterates the full roster, dead included, in id order.
    pub fn agents(&self) -> impl Iterator<Item = &Agent> {
        self.agents.values()
    }

    /// Total number of agents ever spawned, dead included.
    #[must_use]
    pub fn agent_count(&self) -> usize {
        self.agents.len()
    }

    /// The living agent standing on `cell`, if any.
    #[must_use]
    pub fn occupant(&self, cell: Cell) -> Option<AgentId> {
        self.index.occupant(cell)
    }

    /// Whether a living agent stands on `cell`.
    #[must_use]
    pub fn occupied(&self, cell: Cell) -> bool {
        self.index.occupied(cell)
    }

    /// Whether `cell` is floor with nobody standing on it. This is the
    /// vertex predicate for pathfinding and for "in range" candidate cells.
    #[must_use]
    pub fn is_open(&self, cell: Cell) -> bool {
        self.grid.passable(cell) && !self.index.occupied(cell)
    }

    /// Snapshot of living agents in reading order of their current cells.
    ///
    /// Round resolution iterates this snapshot, so agents act in the order
    /// of the positions they held when the round began, whatever happens
    /// during the round.
    #[must_use]
    pub fn turn_order(&self) -> Vec<(Cell, AgentId)> {
        self.index.iter().collect()
    }

    /// Iterates living members of `faction` in id order.
    pub fn living(&self, faction: Faction) -> impl Iterator<Item = &Agent> {
        self.agents
            .values()
            .filter(move |agent| agent.faction() == faction && agent.is_alive())
    }

    /// Whether `faction` still has at least one living member.
    #[must_use]
    pub fn has_living(&self, faction: Faction) -> bool {
        self.living(faction).next().is_some()
    }

    /// Sum of remaining hit points across living members of `faction`.
    #[must_use]
    pub fn living_hp_sum(&self, faction: Faction) -> i32 {
        self.living(faction).map(Agent::hp).sum()
    }

    // ------------------------------------------------------------------
    // Mutations
    // ------------------------------------------------------------------

    /// Moves a living agent to an open cell, keeping the index in sync.
    ///
    /// # Panics
    ///
    /// Panics if the agent is unknown or dead, or if the destination is a
    /// wall or occupied.
    pub fn relocate(&mut self, id: AgentId, to: Cell) {
        assert!(
            self.grid.passable(to),
            "cannot move agent {id} into impassable cell {to:?}"
        );
        assert!(
            !self.index.occupied(to),
            "cannot move agent {id} onto occupied cell {to:?}"
        );
        let Some(agent) = self.agents.get_mut(&id) else {
            panic!("cannot move unknown agent {id}");
        };
        assert!(agent.is_alive(), "cannot move dead agent {id}");
        agent.set_position(to);
        self.index.relocate(id, to);
    }

    /// Applies damage to a living agent and returns its remaining hit
    /// points. A return of zero means the blow killed it: the agent leaves
    /// the position index (and stops blocking movement) but stays in the
    /// roster with condition [`Condition::Dead`].
    ///
    /// # Panics
    ///
    /// Panics if the agent is unknown or already dead.
    pub fn deal_damage(&mut self, id: AgentId, amount: i32) -> i32 {
        let Some(agent) = self.agents.get_mut(&id) else {
            panic!("cannot damage unknown agent {id}");
        };
        assert!(agent.is_alive(), "cannot damage dead agent {id}");
        let died = agent.apply_damage(amount);
        let remaining = agent.hp();
        if died {
            agent.set_condition(Condition::Dead);
            self.index.remove(id);
        }
        remaining
    }

    /// Overrides a living agent's hit points. Battle setup hook; combat
    /// itself only ever lowers hp through [`Self::deal_damage`].
    ///
    /// # Panics
    ///
    /// Panics if the agent is unknown or dead, or if `hp` is not positive.
    pub fn set_hp(&mut self, id: AgentId, hp: i32) {
        assert!(hp > 0, "set_hp is for live agents, got {hp}");
        let Some(agent) = self.agents.get_mut(&id) else {
            panic!("cannot set hp of unknown agent {id}");
        };
        assert!(agent.is_alive(), "cannot set hp of dead agent {id}");
        agent.set_hp(hp);
    }

    pub(crate) fn set_condition(&mut self, id: AgentId, condition: Condition) {
        let Some(agent) = self.agents.get_mut(&id) else {
            panic!("cannot set condition of unknown agent {id}");
        };
        agent.set_condition(condition);
    }

    // ------------------------------------------------------------------
    // Determinism
    // ------------------------------------------------------------------

    /// Deterministic hash of combat-relevant state.
    ///
    /// Covers terrain and every agent's id, faction, position, hit points,
    /// and attack power. Conditions are display state and excluded. Two
    /// battlefields that evolved through identical operations hash equal.
    #[must_use]
    pub fn state_hash(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.grid.hash(&mut hasher);
        for agent in self.agents.values() {
            agent.id().hash(&mut hasher);
            agent.faction().hash(&mut hasher);
            agent.position().hash(&mut hasher);
            agent.hp().hash(&mut hasher);
            agent.attack_power().hash(&mut hasher);
        }
        hasher.finish()
    }
}

impl fmt::Display for Battlefield {
    /// Renders the map as load-time text: tiles with living agents drawn on
    /// top, one line per row, each line newline-terminated.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..self.grid.height() {
            for x in 0..self.grid.width() {
                let cell = Cell::new(x, y);
                let glyph = match self.occupant(cell).and_then(|id| self.agent(id)) {
                    Some(agent) => agent.glyph(),
                    None => self.grid.tile(cell).map_or('#', Tile::glyph),
                };
                write!(f, "{glyph}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
