//! Static battlefield terrain.
//!
//! The grid is parsed once at load time and never changes afterwards. It is a
//! dense row-major array of [`Tile`]s; agents live in
//! [`crate::battlefield::Battlefield`] on top of it. All queries are
//! bounds-checked, and cells outside the grid count as impassable, so callers
//! can probe neighbours at the map edge without guarding coordinates
//! themselves.

use crate::cell::Cell;
use serde::{Deserialize, Serialize};

// ============================================================================
// Tile
// ============================================================================

/// Terrain of a single grid square.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tile {
    /// Impassable rock. Nothing enters, nothing paths through.
    Wall,
    /// Open cavern floor. Passable unless an agent stands on it.
    Floor,
}

impl Tile {
    /// Whether agents can occupy this tile.
    #[must_use]
    pub const fn is_floor(self) -> bool {
        matches!(self, Self::Floor)
    }

    /// The map character for this tile.
    #[must_use]
    pub const fn glyph(self) -> char {
        match self {
            Self::Wall => '#',
            Self::Floor => '.',
        }
    }
}

// ============================================================================
// Grid
// ============================================================================

/// Immutable rectangular terrain, stored row-major.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Grid {
    width: i32,
    height: i32,
    tiles: Vec<Tile>,
}

impl Grid {
    /// Creates a grid from row-major tiles.
    ///
    /// # Panics
    ///
    /// Panics if `tiles.len()` does not equal `width * height`, or if either
    /// dimension is not positive.
    #[must_use]
    pub fn new(width: i32, height: i32, tiles: Vec<Tile>) -> Self {
        assert!(
            width > 0 && height > 0,
            "grid dimensions must be positive, got {width}x{height}"
        );
        #[allow(clippy::cast_sign_loss)] // both dimensions checked positive above
        let expected = width as usize * height as usize;
        assert!(
            tiles.len() == expected,
            "grid of {width}x{height} needs {expected} tiles, got {}",
            tiles.len()
        );
        Self {
            width,
            height,
            tiles,
        }
    }

    /// Creates a grid with every tile set to `tile`.
    #[must_use]
    pub fn filled(width: i32, height: i32, tile: Tile) -> Self {
        #[allow(clippy::cast_sign_loss)] // new() rejects non-positive dimensions
        let count = (width.max(0) as usize) * (height.max(0) as usize);
        Self::new(width, height, vec![tile; count])
    }

    /// Grid width in cells.
    #[must_use]
    pub const fn width(&self) -> i32 {
        self.width
    }

    /// Grid height in cells.
    #[must_use]
    pub const fn height(&self) -> i32 {
        self.height
    }

    /// Whether `cell` lies inside the grid rectangle.
    #[must_use]
    pub const fn in_bounds(&self, cell: Cell) -> bool {
        cell.x >= 0 && cell.x < self.width && cell.y >= 0 && cell.y < self.height
    }

    /// The tile at `cell`, or `None` outside the grid.
    #[must_use]
    pub fn tile(&self, cell: Cell) -> Option<Tile> {
        if self.in_bounds(cell) {
            Some(self.tiles[self.index(cell)])
        } else {
            None
        }
    }

    /// Whether `cell` is floor inside the grid. Out-of-bounds cells are
    /// impassable, never an error.
    #[must_use]
    pub fn passable(&self, cell: Cell) -> bool {
        self.tile(cell).is_some_and(Tile::is_floor)
    }

    /// Iterates every cell in reading order (row by row, left to right).
    pub fn cells(&self) -> impl Iterator<Item = Cell> {
        let width = self.width;
        let height = self.height;
        (0..height).flat_map(move |y| (0..width).map(move |x| Cell::new(x, y)))
    }

    #[allow(clippy::cast_sign_loss)] // callers pass in-bounds (non-negative) cells
    fn index(&self, cell: Cell) -> usize {
        debug_assert!(self.in_bounds(cell));
        cell.y as usize * self.width as usize + cell.x as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cross_grid() -> Grid {
        // 3x3 with walls in the corners:
        //   #.#
        //   ...
        //   #.#
        let w = Tile::Wall;
        let f = Tile::Floor;
        Grid::new(3, 3, vec![w, f, w, f, f, f, w, f, w])
    }

    mod tile_tests {
        use super::*;

        #[test]
        fn floor_is_passable_wall_is_not() {
            assert!(Tile::Floor.is_floor());
            assert!(!Tile::Wall.is_floor());
        }

        #[test]
        fn glyphs() {
            assert_eq!(Tile::Wall.glyph(), '#');
            assert_eq!(Tile::Floor.glyph(), '.');
        }
    }

    mod grid_tests {
        use super::*;

        #[test]
        fn new_creates_grid() {
            let grid = cross_grid();
            assert_eq!(grid.width(), 3);
            assert_eq!(grid.height(), 3);
        }

        #[test]
        #[should_panic(expected = "needs 9 tiles")]
        fn new_rejects_wrong_tile_count() {
            let _ = Grid::new(3, 3, vec![Tile::Floor; 4]);
        }

        #[test]
        #[should_panic(expected = "dimensions must be positive")]
        fn new_rejects_zero_dimension() {
            let _ = Grid::new(0, 3, Vec::new());
        }

        #[test]
        fn filled_sets_every_tile() {
            let grid = Grid::filled(4, 2, Tile::Floor);
            assert!(grid.cells().all(|c| grid.passable(c)));
        }

        #[test]
        fn tile_lookup() {
            let grid = cross_grid();
            assert_eq!(grid.tile(Cell::new(0, 0)), Some(Tile::Wall));
            assert_eq!(grid.tile(Cell::new(1, 0)), Some(Tile::Floor));
            assert_eq!(grid.tile(Cell::new(1, 1)), Some(Tile::Floor));
            assert_eq!(grid.tile(Cell::new(3, 0)), None);
        }

        #[test]
        fn out_of_bounds_is_impassable_not_an_error() {
            let grid = cross_grid();
            assert!(!grid.passable(Cell::new(-1, 0)));
            assert!(!grid.passable(Cell::new(0, -1)));
            assert!(!grid.passable(Cell::new(3, 1)));
            assert!(!grid.passable(Cell::new(1, 3)));
        }

        #[test]
        fn cells_iterate_in_reading_order() {
            let grid = Grid::filled(2, 2, Tile::Floor);
            let order: Vec<Cell> = grid.cells().collect();
            assert_eq!(
                order,
                vec![
                    Cell::new(0, 0),
                    Cell::new(1, 0),
                    Cell::new(0, 1),
                    Cell::new(1, 1),
                ]
            );
        }

        #[test]
        fn serialization_roundtrip() {
            let grid = cross_grid();
            let json = serde_json::to_string(&grid).unwrap();
            let back: Grid = serde_json::from_str(&json).unwrap();
            assert_eq!(grid, back);
        }
    }
}
