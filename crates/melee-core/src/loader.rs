//! Battle map parsing.
//!
//! Maps are plain text, one row per line: `#` wall, `.` floor, `E` an Elf,
//! `G` a Goblin. Trailing whitespace (including carriage returns) is
//! ignored, and rows shorter than the widest line are padded with implicit
//! walls, so ragged hand-written maps load as their author drew them.
//! Agents spawn at full health with ids assigned in scan order starting
//! at 1.
//!
//! Loading is the only fallible stage of a simulation; everything after a
//! successful parse is ordinary control flow.
//!
//! # Example
//!
//! ```
//! use melee_core::config::SimConfig;
//! use melee_core::loader::parse_map;
//!
//! let field = parse_map("####\n#EG#\n####\n", &SimConfig::default())?;
//! assert_eq!(field.to_string(), "####\n#EG#\n####\n");
//! # Ok::<(), melee_core::loader::MapError>(())
//! ```

use crate::agent::Faction;
use crate::battlefield::Battlefield;
use crate::cell::Cell;
use crate::config::SimConfig;
use crate::grid::{Grid, Tile};
use thiserror::Error;

/// Reasons an input map is rejected.
///
/// Coordinates in [`MapError::MalformedMap`] are zero-based grid
/// coordinates, the same space the rest of the crate uses.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum MapError {
    /// Input exceeds the configured maximum dimension.
    #[error("map {axis} of {actual} exceeds the maximum dimension of {max}")]
    InputTooLarge {
        /// Which dimension overflowed, `"width"` or `"height"`.
        axis: &'static str,
        /// The offending dimension of the input.
        actual: usize,
        /// The configured limit.
        max: usize,
    },

    /// A character outside the map alphabet (`#`, `.`, `E`, `G`).
    #[error("unexpected character {found:?} at column {x}, line {y}")]
    MalformedMap {
        /// The character that was not understood.
        found: char,
        /// Zero-based column of the character.
        x: usize,
        /// Zero-based row of the character.
        y: usize,
    },

    /// The input contains no rows or no columns.
    #[error("map contains no cells")]
    EmptyMap,
}

/// Parses a battle map into a ready-to-run [`Battlefield`].
///
/// Attack powers come from `config`, applied per faction at spawn time.
///
/// # Errors
///
/// Returns [`MapError`] if the input is empty, larger than
/// `config.max_map_dimension` in either dimension, or contains a character
/// outside the map alphabet.
///
/// # Panics
///
/// Panics if `config` carries a non-positive attack power; see
/// [`Battlefield::spawn`].
pub fn parse_map(input: &str, config: &SimConfig) -> Result<Battlefield, MapError> {
    let rows: Vec<&str> = input.lines().map(str::trim_end).collect();
    let height = rows.len();
    if height == 0 {
        return Err(MapError::EmptyMap);
    }
    if height > config.max_map_dimension {
        return Err(MapError::InputTooLarge {
            axis: "height",
            actual: height,
            max: config.max_map_dimension,
        });
    }

    let width = rows.iter().map(|row| row.chars().count()).max().unwrap_or(0);
    if width == 0 {
        return Err(MapError::EmptyMap);
    }
    if width > config.max_map_dimension {
        return Err(MapError::InputTooLarge {
            axis: "width",
            actual: width,
            max: config.max_map_dimension,
        });
    }

    let mut tiles = Vec::with_capacity(width * height);
    let mut spawns = Vec::new();
    for (y, row) in rows.iter().enumerate() {
        let mut filled = 0;
        for (x, ch) in row.chars().enumerate() {
            match ch {
                '#' => tiles.push(Tile::Wall),
                '.' => tiles.push(Tile::Floor),
                'E' => {
                    tiles.push(Tile::Floor);
                    spawns.push((Faction::Elf, cell_at(x, y)));
                }
                'G' => {
                    tiles.push(Tile::Floor);
                    spawns.push((Faction::Goblin, cell_at(x, y)));
                }
                found => return Err(MapError::MalformedMap { found, x, y }),
            }
            filled += 1;
        }
        // Short rows become wall out to the widest line.
        tiles.extend(std::iter::repeat(Tile::Wall).take(width - filled));
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    // both dimensions are bounded by max_map_dimension
    let grid = Grid::new(width as i32, height as i32, tiles);
    let mut field = Battlefield::new(grid);
    for (faction, cell) in spawns {
        field.spawn(faction, cell, config.attack_power(faction));
    }
    tracing::debug!(
        width,
        height,
        agents = field.agent_count(),
        "parsed battle map"
    );
    Ok(field)
}

#[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
// scan coordinates are bounded by max_map_dimension
const fn cell_at(x: usize, y: usize) -> Cell {
    Cell::new(x as i32, y as i32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::{AgentId, Faction};

    #[test]
    fn parses_terrain_and_spawns_agents_in_scan_order() {
        let field = parse_map("#####\n#G.E#\n#.E.#\n#####\n", &SimConfig::default()).unwrap();
        assert_eq!(field.agent_count(), 3);

        let first = field.agent(AgentId::new(1)).unwrap();
        assert_eq!(first.faction(), Faction::Goblin);
        assert_eq!(first.position(), Cell::new(1, 1));

        let second = field.agent(AgentId::new(2)).unwrap();
        assert_eq!(second.faction(), Faction::Elf);
        assert_eq!(second.position(), Cell::new(3, 1));

        let third = field.agent(AgentId::new(3)).unwrap();
        assert_eq!(third.faction(), Faction::Elf);
        assert_eq!(third.position(), Cell::new(2, 2));
    }

    #[test]
    fn agents_spawn_at_full_health_with_configured_attack_power() {
        let config = SimConfig::with_attack_powers(17, 4);
        let field = parse_map("#####\n#G.E#\n#####\n", &config).unwrap();
        let goblin = field.agent(AgentId::new(1)).unwrap();
        let elf = field.agent(AgentId::new(2)).unwrap();
        assert_eq!(goblin.hp(), 200);
        assert_eq!(goblin.attack_power(), 4);
        assert_eq!(elf.attack_power(), 17);
    }

    #[test]
    #[should_panic(expected = "non-positive attack power")]
    fn negative_attack_power_never_reaches_combat() {
        // The panic comes from spawn, before any agent can be struck.
        let config = SimConfig::with_attack_powers(-3, 3);
        let _ = parse_map("####\n#EG#\n####\n", &config);
    }

    #[test]
    fn pads_ragged_rows_with_walls() {
        let field = parse_map("####\n#.\n####\n", &SimConfig::default()).unwrap();
        assert_eq!(field.grid().width(), 4);
        assert!(!field.grid().passable(Cell::new(2, 1)));
        assert!(!field.grid().passable(Cell::new(3, 1)));
        assert_eq!(field.to_string(), "####\n#.##\n####\n");
    }

    #[test]
    fn tolerates_trailing_whitespace_and_crlf() {
        let field = parse_map("####\r\n#EG#   \r\n####\r\n", &SimConfig::default()).unwrap();
        assert_eq!(field.grid().width(), 4);
        assert_eq!(field.agent_count(), 2);
        assert_eq!(field.to_string(), "####\n#EG#\n####\n");
    }

    #[test]
    fn rejects_unknown_characters() {
        let err = parse_map("###\n#x#\n###\n", &SimConfig::default()).unwrap_err();
        assert_eq!(
            err,
            MapError::MalformedMap {
                found: 'x',
                x: 1,
                y: 1
            }
        );
        assert!(err.to_string().contains("'x'"));
    }

    #[test]
    fn rejects_maps_wider_than_the_limit() {
        let config = SimConfig {
            max_map_dimension: 4,
            ..SimConfig::default()
        };
        let err = parse_map("######\n", &config).unwrap_err();
        assert_eq!(
            err,
            MapError::InputTooLarge {
                axis: "width",
                actual: 6,
                max: 4
            }
        );
    }

    #[test]
    fn rejects_maps_taller_than_the_limit() {
        let config = SimConfig {
            max_map_dimension: 2,
            ..SimConfig::default()
        };
        let err = parse_map("#\n#\n#\n", &config).unwrap_err();
        assert_eq!(
            err,
            MapError::InputTooLarge {
                axis: "height",
                actual: 3,
                max: 2
            }
        );
    }

    #[test]
    fn rejects_empty_input() {
        assert_eq!(
            parse_map("", &SimConfig::default()).unwrap_err(),
            MapError::EmptyMap
        );
        assert_eq!(
            parse_map("\n\n", &SimConfig::default()).unwrap_err(),
            MapError::EmptyMap
        );
    }

    #[test]
    fn agentless_maps_load_fine() {
        let field = parse_map("###\n#.#\n###\n", &SimConfig::default()).unwrap();
        assert_eq!(field.agent_count(), 0);
    }
}
