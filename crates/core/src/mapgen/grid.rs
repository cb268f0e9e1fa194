//! Coarse grid of up to 15×15 cells layered over the tile grid.

use crate::types::{FLOOR_HEIGHT, FLOOR_WIDTH};

pub const MAX_GRID_DIM: i32 = 15;

/// Cardinal direction between neighbouring cells, numbered the way the
/// connection walk draws them.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Right,
    Up,
    Left,
    Down,
}

impl Direction {
    /// Maps any draw onto a direction through `value % 4`.
    pub fn from_draw(value: i32) -> Self {
        match value.rem_euclid(4) {
            0 => Self::Right,
            1 => Self::Up,
            2 => Self::Left,
            _ => Self::Down,
        }
    }

    pub fn offset(self) -> (i32, i32) {
        match self {
            Self::Right => (1, 0),
            Self::Up => (0, -1),
            Self::Left => (-1, 0),
            Self::Down => (0, 1),
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Self::Right => Self::Left,
            Self::Up => Self::Down,
            Self::Left => Self::Right,
            Self::Down => Self::Up,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GridCell {
    pub start_x: i32,
    pub start_y: i32,
    pub end_x: i32,
    pub end_y: i32,
    pub is_invalid: bool,
    pub is_room: bool,
    pub is_connected: bool,
    pub is_kecleon_shop: bool,
    pub is_monster_house: bool,
    pub has_secondary_structure: bool,
    pub is_maze_room: bool,
    /// Set on both cells of a merge.
    pub was_merged_into: bool,
    /// Set on the cell whose area was absorbed by its neighbour.
    pub is_merged_room: bool,
    pub connected_top: bool,
    pub connected_bottom: bool,
    pub connected_left: bool,
    pub connected_right: bool,
    pub should_connect_top: bool,
    pub should_connect_bottom: bool,
    pub should_connect_left: bool,
    pub should_connect_right: bool,
    pub flag_imperfect: bool,
    pub flag_secondary_structure: bool,
}

impl Default for GridCell {
    fn default() -> Self {
        Self {
            start_x: 0,
            start_y: 0,
            end_x: 0,
            end_y: 0,
            is_invalid: false,
            is_room: true,
            is_connected: false,
            is_kecleon_shop: false,
            is_monster_house: false,
            has_secondary_structure: false,
            is_maze_room: false,
            was_merged_into: false,
            is_merged_room: false,
            connected_top: false,
            connected_bottom: false,
            connected_left: false,
            connected_right: false,
            should_connect_top: false,
            should_connect_bottom: false,
            should_connect_left: false,
            should_connect_right: false,
            flag_imperfect: false,
            flag_secondary_structure: false,
        }
    }
}

impl GridCell {
    pub fn width(&self) -> i32 {
        self.end_x - self.start_x
    }

    pub fn height(&self) -> i32 {
        self.end_y - self.start_y
    }

    pub fn is_connected_room(&self) -> bool {
        !self.is_invalid && self.is_connected && self.is_room
    }

    pub fn can_host_shop(&self) -> bool {
        !self.is_invalid
            && !self.was_merged_into
            && !self.is_merged_room
            && self.is_connected
            && self.is_room
            && !self.has_secondary_structure
            && !self.is_maze_room
            && !self.flag_secondary_structure
    }

    pub fn can_host_monster_house(&self) -> bool {
        !self.is_invalid
            && !self.was_merged_into
            && self.is_connected
            && self.is_room
            && !self.is_kecleon_shop
            && !self.is_maze_room
            && !self.has_secondary_structure
    }

    pub fn connection_count(&self) -> usize {
        [self.connected_top, self.connected_bottom, self.connected_left, self.connected_right]
            .into_iter()
            .filter(|&connected| connected)
            .count()
    }

    pub fn is_connected_exactly_once(&self) -> bool {
        self.connection_count() == 1
    }

    pub fn is_connected_to(&self, direction: Direction) -> bool {
        match direction {
            Direction::Right => self.connected_right,
            Direction::Up => self.connected_top,
            Direction::Left => self.connected_left,
            Direction::Down => self.connected_bottom,
        }
    }

    pub fn set_connected(&mut self, direction: Direction, connected: bool) {
        match direction {
            Direction::Right => self.connected_right = connected,
            Direction::Up => self.connected_top = connected,
            Direction::Left => self.connected_left = connected,
            Direction::Down => self.connected_bottom = connected,
        }
    }

    pub fn clear_connections(&mut self) {
        self.connected_top = false;
        self.connected_bottom = false;
        self.connected_left = false;
        self.connected_right = false;
    }
}

/// Tile offsets at which each coarse column and row begins.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GridCoords {
    pub x: [i32; 16],
    pub y: [i32; 16],
}

impl GridCoords {
    /// Bands advance by `56 / size_x` and `32 / size_y`, accumulated per step.
    pub fn compute(size_x: i32, size_y: i32) -> Self {
        let mut coords = Self::default();
        let step_x = FLOOR_WIDTH / size_x.max(1);
        let step_y = FLOOR_HEIGHT / size_y.max(1);
        let mut c = 0;
        for slot in coords.x.iter_mut().take(size_x.clamp(0, MAX_GRID_DIM) as usize + 1) {
            *slot = c;
            c += step_x;
        }
        c = 0;
        for slot in coords.y.iter_mut().take(size_y.clamp(0, MAX_GRID_DIM) as usize + 1) {
            *slot = c;
            c += step_y;
        }
        coords
    }

    pub fn col(&self, index: i32) -> i32 {
        self.x[index.clamp(0, MAX_GRID_DIM) as usize]
    }

    pub fn row(&self, index: i32) -> i32 {
        self.y[index.clamp(0, MAX_GRID_DIM) as usize]
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CoarseGrid {
    cells: [[GridCell; MAX_GRID_DIM as usize]; MAX_GRID_DIM as usize],
    /// Active column count.
    pub width: i32,
    /// Active row count.
    pub height: i32,
    pub coords: GridCoords,
    scratch: GridCell,
}

impl CoarseGrid {
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            cells: [[GridCell::default(); MAX_GRID_DIM as usize]; MAX_GRID_DIM as usize],
            width: width.clamp(1, MAX_GRID_DIM),
            height: height.clamp(1, MAX_GRID_DIM),
            coords: GridCoords::default(),
            scratch: GridCell { is_invalid: true, ..GridCell::default() },
        }
    }

    fn in_storage(x: i32, y: i32) -> bool {
        (0..MAX_GRID_DIM).contains(&x) && (0..MAX_GRID_DIM).contains(&y)
    }

    pub fn in_active(&self, x: i32, y: i32) -> bool {
        (0..self.width).contains(&x) && (0..self.height).contains(&y)
    }

    /// Cells outside the backing array read as invalid.
    pub fn cell(&self, x: i32, y: i32) -> &GridCell {
        if Self::in_storage(x, y) { &self.cells[x as usize][y as usize] } else { &self.scratch }
    }

    /// Writes outside the backing array land on a scratch cell that is reset
    /// on every access.
    pub fn cell_mut(&mut self, x: i32, y: i32) -> &mut GridCell {
        if Self::in_storage(x, y) {
            &mut self.cells[x as usize][y as usize]
        } else {
            self.scratch = GridCell { is_invalid: true, ..GridCell::default() };
            &mut self.scratch
        }
    }

    /// Records a two-way connection between `(x, y)` and its neighbour.
    pub fn link(&mut self, x: i32, y: i32, direction: Direction) {
        let (dx, dy) = direction.offset();
        self.cell_mut(x, y).set_connected(direction, true);
        self.cell_mut(x + dx, y + dy).set_connected(direction.opposite(), true);
    }

    /// Active cells in the column-outer order most stages use.
    pub fn positions(&self) -> impl Iterator<Item = (i32, i32)> + use<> {
        let (width, height) = (self.width, self.height);
        (0..width).flat_map(move |x| (0..height).map(move |y| (x, y)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_coordinates_accumulate_integer_steps() {
        let coords = GridCoords::compute(5, 3);
        assert_eq!(&coords.x[..6], &[0, 11, 22, 33, 44, 55]);
        assert_eq!(&coords.y[..4], &[0, 10, 20, 30]);

        let full = GridCoords::compute(15, 15);
        assert_eq!(full.x[15], 45);
        assert_eq!(full.y[15], 30);
    }

    #[test]
    fn link_sets_both_sides() {
        let mut grid = CoarseGrid::new(3, 3);
        grid.link(1, 1, Direction::Up);
        grid.link(1, 1, Direction::Right);

        assert!(grid.cell(1, 1).connected_top);
        assert!(grid.cell(1, 0).connected_bottom);
        assert!(grid.cell(2, 1).connected_left);
        assert_eq!(grid.cell(1, 1).connection_count(), 2);
        assert!(grid.cell(1, 0).is_connected_exactly_once());
    }

    #[test]
    fn out_of_storage_cells_are_invalid_scratch() {
        let mut grid = CoarseGrid::new(2, 2);
        grid.cell_mut(-1, 0).is_room = false;
        assert!(grid.cell(-1, 0).is_invalid);
        assert!(grid.cell(-1, 0).is_room);
        assert!(grid.cell(MAX_GRID_DIM, 3).is_invalid);
    }

    #[test]
    fn direction_draws_wrap_modulo_four() {
        assert_eq!(Direction::from_draw(0), Direction::Right);
        assert_eq!(Direction::from_draw(5), Direction::Up);
        assert_eq!(Direction::from_draw(7), Direction::Down);
        assert_eq!(Direction::Left.opposite(), Direction::Right);
    }

    #[test]
    fn shop_and_monster_house_predicates_differ_on_structure_flag() {
        let cell = GridCell { is_connected: true, flag_secondary_structure: true, ..GridCell::default() };
        assert!(!cell.can_host_shop());
        assert!(cell.can_host_monster_house());
    }
}
