//! Observer hooks for watching combat unfold.
//!
//! The engine narrates resolution through [`CombatEvent`]s delivered to an
//! [`Observer`] together with a read-only [`BattleView`] of the state at
//! that instant. Renderers draw from the view; the engine never reads
//! anything back, so an observer can do nothing at all (see
//! [`NullObserver`]) without changing a single simulated outcome.
//!
//! Within one turn events arrive in resolution order: [`CombatEvent::TurnStarted`],
//! then optionally [`CombatEvent::Moved`], then optionally
//! [`CombatEvent::Attacked`] (followed by [`CombatEvent::Died`] if the blow
//! was fatal), then [`CombatEvent::TurnEnded`]. A full pass over the turn
//! order ends with [`CombatEvent::RoundCompleted`]; the moment any agent
//! finds no opponents left, [`CombatEvent::CombatEnded`] fires instead and
//! nothing follows it.

use crate::agent::AgentId;
use crate::cell::Cell;
use crate::outcome::Outcome;
use crate::view::BattleView;
use serde::{Deserialize, Serialize};

/// One observable moment of combat resolution.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CombatEvent {
    /// A living agent is about to act.
    TurnStarted {
        /// The acting agent.
        agent: AgentId,
        /// Where it stands as its turn begins.
        at: Cell,
    },
    /// The acting agent took one step toward the nearest reachable opponent.
    Moved {
        /// The acting agent.
        agent: AgentId,
        /// The cell it left.
        from: Cell,
        /// The cell it now occupies.
        to: Cell,
        /// The in-range cell it is heading for.
        goal: Cell,
        /// Remaining shortest path from `to` through `goal`, for renderers
        /// that trace routes.
        route: Vec<Cell>,
    },
    /// The acting agent struck an adjacent opponent.
    Attacked {
        /// The acting agent.
        attacker: AgentId,
        /// The opponent struck.
        target: AgentId,
        /// Damage dealt (the attacker's attack power).
        damage: i32,
        /// The target's hit points after the blow.
        remaining_hp: i32,
    },
    /// An agent's hit points reached zero. Always directly follows the
    /// fatal [`CombatEvent::Attacked`].
    Died {
        /// The fallen agent.
        agent: AgentId,
        /// Where it fell.
        at: Cell,
    },
    /// The acting agent finished its turn.
    TurnEnded {
        /// The agent whose turn just ended.
        agent: AgentId,
    },
    /// Every agent in the round-start order has acted.
    RoundCompleted {
        /// Count of fully completed rounds so far.
        round: u32,
    },
    /// An agent found no living opponents; the battle is over.
    CombatEnded {
        /// The final battle report.
        outcome: Outcome,
    },
}

/// Receives combat events as the engine resolves them.
///
/// Implementations must treat the view as read-only and must not assume
/// they can influence resolution; the engine's behaviour is identical
/// whichever observer is attached.
pub trait Observer {
    /// Called once per event, in resolution order.
    fn on_event(&mut self, event: &CombatEvent, view: BattleView<'_>);
}

/// Observer that ignores everything. Used when running headless.
#[derive(Copy, Clone, Debug, Default)]
pub struct NullObserver;

impl Observer for NullObserver {
    fn on_event(&mut self, _event: &CombatEvent, _view: BattleView<'_>) {}
}
