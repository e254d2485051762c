//! Simulation configuration.
//!
//! Everything tunable about a battle is decided up front: per-faction attack
//! power (applied to every agent of that faction at spawn) and the loader's
//! map size limit. Nothing here changes once a simulation is constructed.

use crate::agent::Faction;
use serde::{Deserialize, Serialize};

/// Damage per attack unless configured otherwise.
pub const DEFAULT_ATTACK_POWER: i32 = 3;

/// Widest and tallest map the loader accepts unless configured otherwise.
pub const DEFAULT_MAX_MAP_DIMENSION: usize = 32;

/// Tunables fixed at construction time.
///
/// Attack powers must be positive; [`crate::battlefield::Battlefield::spawn`]
/// rejects anything else.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimConfig {
    /// Attack power given to every Elf. Must be positive.
    pub elf_attack_power: i32,
    /// Attack power given to every Goblin. Must be positive.
    pub goblin_attack_power: i32,
    /// Hard upper bound on input map width and height.
    pub max_map_dimension: usize,
}

impl SimConfig {
    /// Creates the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a configuration with custom attack powers and the default
    /// map size limit.
    #[must_use]
    pub const fn with_attack_powers(elf: i32, goblin: i32) -> Self {
        Self {
            elf_attack_power: elf,
            goblin_attack_power: goblin,
            max_map_dimension: DEFAULT_MAX_MAP_DIMENSION,
        }
    }

    /// The attack power agents of `faction` spawn with.
    #[must_use]
    pub const fn attack_power(&self, faction: Faction) -> i32 {
        match faction {
            Faction::Elf => self.elf_attack_power,
            Faction::Goblin => self.goblin_attack_power,
        }
    }
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            elf_attack_power: DEFAULT_ATTACK_POWER,
            goblin_attack_power: DEFAULT_ATTACK_POWER,
            max_map_dimension: DEFAULT_MAX_MAP_DIMENSION,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_values() {
        let config = SimConfig::default();
        assert_eq!(config.elf_attack_power, 3);
        assert_eq!(config.goblin_attack_power, 3);
        assert_eq!(config.max_map_dimension, 32);
    }

    #[test]
    fn attack_power_by_faction() {
        let config = SimConfig::with_attack_powers(17, 4);
        assert_eq!(config.attack_power(Faction::Elf), 17);
        assert_eq!(config.attack_power(Faction::Goblin), 4);
        assert_eq!(config.max_map_dimension, 32);
    }

    #[test]
    fn serialization_roundtrip() {
        let config = SimConfig::with_attack_powers(12, 3);
        let json = serde_json::to_string(&config).unwrap();
        let back: SimConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, back);
    }
}
