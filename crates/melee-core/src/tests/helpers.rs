//! Test helper functions and fixtures.
//!
//! Provides the reference battle maps and common setup/query utilities
//! used by the integration and determinism tests.

use crate::agent::{AgentId, Faction};
use crate::battlefield::Battlefield;
use crate::cell::Cell;
use crate::config::SimConfig;
use crate::loader::parse_map;
use crate::outcome::Outcome;
use crate::simulation::Simulation;

// ============================================================================
// Reference Battle Maps
// ============================================================================
//
// Six small cavern battles with well-known final reports. Each is used by
// the integration tests to pin down the complete rule set at once: turn
// order, movement, target selection, and the end-of-combat report.

/// Mixed melee, Goblins win after 47 rounds with 590 hit points left.
pub const BATTLE_ONE: &str = "\
#######
#.G...#
#...EG#
#.#.#G#
#..G#E#
#.....#
#######
";

/// Elves win after 37 rounds with 982 hit points left.
pub const BATTLE_TWO: &str = "\
#######
#G..#E#
#E#E.E#
#G.##.#
#...#E#
#...E.#
#######
";

/// Elves win after 46 rounds with 859 hit points left.
pub const BATTLE_THREE: &str = "\
#######
#E..EG#
#.#G.E#
#E.##E#
#G..#.#
#..E#.#
#######
";

/// Goblins win after 35 rounds with 793 hit points left.
pub const BATTLE_FOUR: &str = "\
#######
#E.G#.#
#.#G..#
#G.#.G#
#G..#.#
#...E.#
#######
";

/// Goblins win after 54 rounds with 536 hit points left.
pub const BATTLE_FIVE: &str = "\
#######
#.E...#
#.#..G#
#.###.#
#E#G#G#
#...#G#
#######
";

/// Goblins win after 20 rounds with 937 hit points left.
pub const BATTLE_SIX: &str = "\
#########
#G......#
#.E.#...#
#..##..G#
#...##..#
#...#...#
#.G...G.#
#.....G.#
#########
";

// ============================================================================
// Setup Functions
// ============================================================================

/// Creates a battlefield from a map string with default configuration.
///
/// # Arguments
///
/// * `map` - ASCII map text (`#`, `.`, `E`, `G`)
///
/// # Panics
///
/// Panics if the map fails to parse.
pub fn field_from(map: &str) -> Battlefield {
    parse_map(map, &SimConfig::new()).unwrap()
}

/// Creates a simulation from a map string with default configuration.
///
/// # Arguments
///
/// * `map` - ASCII map text (`#`, `.`, `E`, `G`)
pub fn sim_from(map: &str) -> Simulation {
    Simulation::new(field_from(map))
}

/// Creates a simulation with custom per-faction attack powers.
///
/// # Arguments
///
/// * `map` - ASCII map text
/// * `elf_power` - damage dealt by each elf attack
/// * `goblin_power` - damage dealt by each goblin attack
pub fn sim_with_powers(map: &str, elf_power: i32, goblin_power: i32) -> Simulation {
    let config = SimConfig::with_attack_powers(elf_power, goblin_power);
    Simulation::new(parse_map(map, &config).unwrap())
}

/// Runs a map to completion and returns the final report.
pub fn final_report(map: &str) -> Outcome {
    sim_from(map).run()
}

// ============================================================================
// Query Functions
// ============================================================================

/// Returns the hit points of the agent with the given raw id.
///
/// # Panics
///
/// Panics if no such agent exists.
pub fn hp_of(field: &Battlefield, id: u32) -> i32 {
    field.agent(AgentId::new(id)).unwrap().hp()
}

/// Returns the positions of all living agents of one faction, in reading
/// order.
pub fn living_positions(field: &Battlefield, faction: Faction) -> Vec<Cell> {
    field
        .turn_order()
        .into_iter()
        .filter_map(|(cell, id)| {
            let agent = field.agent(id)?;
            (agent.faction() == faction).then_some(cell)
        })
        .collect()
}

/// Asserts that an outcome matches the expected report exactly.
///
/// # Arguments
///
/// * `outcome` - the report produced by the simulation
/// * `rounds` - expected number of completed rounds
/// * `winner` - expected winning faction
/// * `hp_sum` - expected total hit points among the survivors
pub fn assert_report(outcome: &Outcome, rounds: u32, winner: Faction, hp_sum: i32) {
    assert_eq!(outcome.rounds(), rounds, "completed rounds mismatch");
    assert_eq!(outcome.winner(), winner, "winning faction mismatch");
    assert_eq!(outcome.hp_sum(), hp_sum, "survivor hit point mismatch");
    assert_eq!(
        outcome.score(),
        i64::from(rounds) * i64::from(hp_sum),
        "score must be rounds times hit points"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_from_builds_reference_maps() {
        let field = field_from(BATTLE_ONE);
        assert_eq!(field.agent_count(), 6);
        assert_eq!(field.grid().width(), 7);
        assert_eq!(field.grid().height(), 7);
    }

    #[test]
    fn hp_of_reads_starting_hit_points() {
        let field = field_from(BATTLE_ONE);
        assert_eq!(hp_of(&field, 1), 200);
    }

    #[test]
    fn living_positions_follow_reading_order() {
        let field = field_from(BATTLE_ONE);
        let goblins = living_positions(&field, Faction::Goblin);
        assert_eq!(
            goblins,
            vec![Cell::new(2, 1), Cell::new(5, 2), Cell::new(5, 3), Cell::new(3, 4)]
        );
    }

    #[test]
    fn sim_with_powers_applies_per_faction_damage() {
        let sim = sim_with_powers(BATTLE_ONE, 17, 5);
        let elves = living_positions(sim.battlefield(), Faction::Elf);
        let id = sim.battlefield().occupant(elves[0]).unwrap();
        let elf = sim.battlefield().agent(id).unwrap();
        assert_eq!(elf.attack_power(), 17);
    }
}
