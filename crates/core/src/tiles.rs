//! Fixed 56×32 tile grid with clamp-not-crash access.

use crate::types::{ANCHOR_ROOM, FLOOR_HEIGHT, FLOOR_WIDTH, MAX_ROOM_ID, NO_ROOM, Occupant, Pos, Terrain};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Tile {
    pub terrain: Terrain,
    pub room: u8,
    pub is_junction: bool,
    pub is_monster_house: bool,
    pub is_kecleon_shop: bool,
    pub is_key_door: bool,
    pub is_unreachable_from_stairs: bool,
    pub has_item: bool,
    pub has_stairs: bool,
    pub has_trap: bool,
    pub occupant: Occupant,
}

impl Default for Tile {
    fn default() -> Self {
        Self {
            terrain: Terrain::Wall,
            room: NO_ROOM,
            is_junction: false,
            is_monster_house: false,
            is_kecleon_shop: false,
            is_key_door: false,
            is_unreachable_from_stairs: false,
            has_item: false,
            has_stairs: false,
            has_trap: false,
            occupant: Occupant::None,
        }
    }
}

impl Tile {
    pub fn is_open(&self) -> bool {
        self.terrain == Terrain::Open
    }

    pub fn in_real_room(&self) -> bool {
        self.room <= MAX_ROOM_ID
    }

    pub fn is_anchor(&self) -> bool {
        self.room == ANCHOR_ROOM
    }

    /// Single-character rendering; earlier checks win.
    pub fn glyph(&self) -> char {
        if self.has_stairs {
            'S'
        } else if self.is_kecleon_shop {
            'K'
        } else if self.is_monster_house {
            'M'
        } else if self.is_key_door {
            'D'
        } else if self.has_item {
            'o'
        } else if self.has_trap {
            'X'
        } else if self.is_junction {
            '+'
        } else {
            match self.terrain {
                Terrain::Secondary => 'W',
                Terrain::Chasm => 'C',
                Terrain::Wall => '*',
                Terrain::Open => ' ',
            }
        }
    }
}

const DEFAULT_TILE: Tile = Tile {
    terrain: Terrain::Wall,
    room: NO_ROOM,
    is_junction: false,
    is_monster_house: false,
    is_kecleon_shop: false,
    is_key_door: false,
    is_unreachable_from_stairs: false,
    has_item: false,
    has_stairs: false,
    has_trap: false,
    occupant: Occupant::None,
};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TileGrid {
    tiles: Vec<Tile>,
    scratch: Tile,
}

impl Default for TileGrid {
    fn default() -> Self {
        Self::new()
    }
}

impl TileGrid {
    pub fn new() -> Self {
        Self {
            tiles: vec![Tile::default(); (FLOOR_WIDTH * FLOOR_HEIGHT) as usize],
            scratch: Tile::default(),
        }
    }

    pub fn in_bounds(x: i32, y: i32) -> bool {
        (0..FLOOR_WIDTH).contains(&x) && (0..FLOOR_HEIGHT).contains(&y)
    }

    fn index(x: i32, y: i32) -> usize {
        (y * FLOOR_WIDTH + x) as usize
    }

    /// Reads outside the floor see a default wall tile.
    pub fn tile(&self, x: i32, y: i32) -> &Tile {
        if Self::in_bounds(x, y) { &self.tiles[Self::index(x, y)] } else { &DEFAULT_TILE }
    }

    /// Writes outside the floor land on a scratch tile that is reset on every access.
    pub fn tile_mut(&mut self, x: i32, y: i32) -> &mut Tile {
        if Self::in_bounds(x, y) {
            &mut self.tiles[Self::index(x, y)]
        } else {
            self.scratch = Tile::default();
            &mut self.scratch
        }
    }

    pub fn at(&self, pos: Pos) -> &Tile {
        self.tile(pos.x, pos.y)
    }

    pub fn terrain(&self, x: i32, y: i32) -> Terrain {
        self.tile(x, y).terrain
    }

    pub fn set_terrain(&mut self, x: i32, y: i32, terrain: Terrain) {
        self.tile_mut(x, y).terrain = terrain;
    }

    /// Applies `mark` to every tile in `[min_x, max_x) × [min_y, max_y)`.
    pub fn mark_rect(
        &mut self,
        min_x: i32,
        min_y: i32,
        max_x: i32,
        max_y: i32,
        mut mark: impl FnMut(&mut Tile),
    ) {
        for x in min_x..max_x {
            for y in min_y..max_y {
                mark(self.tile_mut(x, y));
            }
        }
    }

    /// Row-major iteration over every in-bounds tile.
    pub fn iter(&self) -> impl Iterator<Item = (Pos, &Tile)> {
        self.tiles.iter().enumerate().map(|(index, tile)| {
            let index = index as i32;
            (Pos::new(index % FLOOR_WIDTH, index / FLOOR_WIDTH), tile)
        })
    }

    pub fn count(&self, predicate: impl Fn(&Tile) -> bool) -> usize {
        self.tiles.iter().filter(|tile| predicate(tile)).count()
    }

    /// Rows of glyphs, each glyph followed by a space.
    pub fn render_ascii(&self) -> String {
        let mut out = String::with_capacity(((FLOOR_WIDTH * 2 + 1) * FLOOR_HEIGHT) as usize);
        for y in 0..FLOOR_HEIGHT {
            for x in 0..FLOOR_WIDTH {
                out.push(self.tile(x, y).glyph());
                out.push(' ');
            }
            out.push('\n');
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_range_writes_never_touch_the_floor() {
        let mut grid = TileGrid::new();
        grid.tile_mut(-1, 4).terrain = Terrain::Open;
        grid.tile_mut(FLOOR_WIDTH, 0).has_stairs = true;
        grid.tile_mut(3, FLOOR_HEIGHT + 7).room = 3;

        assert_eq!(grid, TileGrid::new());
        assert_eq!(grid.terrain(-1, 4), Terrain::Wall);
        assert_eq!(grid.tile(3, FLOOR_HEIGHT + 7).room, NO_ROOM);
    }

    #[test]
    fn mark_rect_uses_half_open_bounds() {
        let mut grid = TileGrid::new();
        grid.mark_rect(2, 3, 5, 4, |tile| tile.terrain = Terrain::Open);

        assert_eq!(grid.count(Tile::is_open), 3);
        assert!(grid.tile(2, 3).is_open());
        assert!(grid.tile(4, 3).is_open());
        assert!(!grid.tile(5, 3).is_open());
        assert!(!grid.tile(2, 4).is_open());
    }

    #[test]
    fn glyph_precedence_prefers_stairs_then_shop() {
        let mut tile = Tile { terrain: Terrain::Secondary, ..Tile::default() };
        assert_eq!(tile.glyph(), 'W');
        tile.is_junction = true;
        assert_eq!(tile.glyph(), '+');
        tile.is_monster_house = true;
        assert_eq!(tile.glyph(), 'M');
        tile.is_kecleon_shop = true;
        assert_eq!(tile.glyph(), 'K');
        tile.has_stairs = true;
        assert_eq!(tile.glyph(), 'S');
    }

    #[test]
    fn ascii_rendering_has_one_line_per_row() {
        let rendered = TileGrid::new().render_ascii();
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines.len(), FLOOR_HEIGHT as usize);
        assert!(lines.iter().all(|line| line.len() == (FLOOR_WIDTH * 2) as usize));
    }
}
