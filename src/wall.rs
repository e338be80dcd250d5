//! Wall generation, motion and drawing.
//!
//! A wall spans a whole row or column and sweeps across the grid one cell per
//! wall tick. Its cells are stored as a bitmap with a single gap the player
//! has to slip through.

use crate::{
    config::{
        GRID_HEIGHT,
        GRID_WIDTH,
    },
    grid::{
        Axis,
        Direction,
        PixelGrid,
        Position,
    },
    rng::Rng,
};

/// Solid and passable cells of a wall; bit `i` set means cell `i` is solid.
///
/// Bits beyond the wall's span are always solid and never drawn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Occupancy(u8);

impl Occupancy {
    /// Largest gap a generated wall can have.
    pub const MAX_GAP: u8 = 3;

    pub const fn from_bits(bits: u8) -> Self {
        Self(bits)
    }

    pub const fn bits(self) -> u8 {
        self.0
    }

    /// All cells solid except `size` cells starting at `shift`.
    ///
    /// `size` must be in `1..=8` and `shift + size` must not exceed 8.
    pub const fn with_gap(size: u8, shift: u8) -> Self {
        let mask = (((1u16 << size) - 1) as u8) << shift;
        Self(!mask)
    }

    pub const fn is_solid(self, index: u8) -> bool {
        index >= 8 || self.0 & (1 << index) != 0
    }

    /// First passable run within the first `span` cells, as `(start, len)`.
    pub fn gap(self, span: u8) -> Option<(u8, u8)> {
        let start = (0..span).find(|&i| !self.is_solid(i))?;
        let len = (start..span).take_while(|&i| !self.is_solid(i)).count();
        Some((start, len as u8))
    }
}

/// A wall on the grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Wall {
    occupancy: Occupancy,
    position: u8,
    direction: Direction,
}

impl Wall {
    /// Build a wall from three random bytes.
    ///
    /// The gap is 1 to 3 cells wide and always ends before the far end of the
    /// wall, so every seed triple yields a passable wall.
    pub const fn generate(direction_seed: u8, gap_size_seed: u8, gap_shift_seed: u8) -> Self {
        let direction = Direction::from_seed(direction_seed);
        let gap_size = gap_size_seed % Occupancy::MAX_GAP + 1;
        let span = direction.wall_axis().span();
        let gap_shift = gap_shift_seed % (span - gap_size);
        Self::new(direction, Occupancy::with_gap(gap_size, gap_shift))
    }

    pub fn random(rng: &mut Rng) -> Self {
        let direction_seed = rng.next_byte();
        let gap_size_seed = rng.next_byte();
        let gap_shift_seed = rng.next_byte();
        Self::generate(direction_seed, gap_size_seed, gap_shift_seed)
    }

    /// A wall at the edge it enters from when travelling in `direction`.
    pub const fn new(direction: Direction, occupancy: Occupancy) -> Self {
        Self {
            occupancy,
            position: Self::entry_position(direction),
            direction,
        }
    }

    pub const fn entry_position(direction: Direction) -> u8 {
        match direction {
            Direction::North => GRID_HEIGHT - 1,
            Direction::South | Direction::East => 0,
            Direction::West => GRID_WIDTH - 1,
        }
    }

    /// The same wall placed at `position` along its direction of travel.
    pub const fn at(self, position: u8) -> Self {
        Self { position, ..self }
    }

    pub const fn occupancy(&self) -> Occupancy {
        self.occupancy
    }

    pub const fn position(&self) -> u8 {
        self.position
    }

    pub const fn direction(&self) -> Direction {
        self.direction
    }

    pub const fn axis(&self) -> Axis {
        self.direction.wall_axis()
    }

    /// Position after one more step, or `None` once the wall has left the grid.
    pub fn next_position(&self) -> Option<u8> {
        let (dx, dy) = self.direction.step();
        self.position
            .checked_add_signed(dx + dy)
            .filter(|&p| p <= self.axis().last_position())
    }

    /// Is `at` in the row or column the wall currently occupies?
    pub const fn covers(&self, at: Position) -> bool {
        at.along(self.axis()) == self.position
    }

    pub const fn is_solid_at(&self, at: Position) -> bool {
        self.covers(at) && self.occupancy.is_solid(at.across(self.axis()))
    }

    /// Cells of the wall with their solid state.
    pub fn cells(&self) -> impl Iterator<Item = (Position, bool)> + '_ {
        let axis = self.axis();
        (0..axis.span()).map(move |i| {
            (
                Position::on_axis(axis, self.position, i),
                self.occupancy.is_solid(i),
            )
        })
    }

    /// Draw (or erase, with `lit == false`) the wall, leaving `skip` untouched.
    pub fn draw<G: PixelGrid>(&self, grid: &mut G, lit: bool, skip: Position) {
        for (at, solid) in self.cells() {
            if at != skip {
                grid.set_pixel(at, lit && solid);
            }
        }
    }

    /// Repaint a single wall cell, e.g. after the character left it.
    pub fn redraw_cell<G: PixelGrid>(&self, grid: &mut G, at: Position) {
        if self.covers(at) {
            grid.set_pixel(at, self.is_solid_at(at));
        }
    }
}

/// Result of one wall tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Motion {
    /// The wall is one cell further along.
    Moved,
    /// The wall just left the grid.
    Retired,
    /// There was no wall to move.
    Idle,
}

/// The single wall slot of a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WallState {
    Active(Wall),
    /// The wall has left the grid and waits to be replaced.
    #[default]
    OutOfBounds,
}

impl WallState {
    pub const fn active(&self) -> Option<&Wall> {
        match self {
            Self::Active(wall) => Some(wall),
            Self::OutOfBounds => None,
        }
    }

    pub const fn is_out_of_bounds(&self) -> bool {
        matches!(self, Self::OutOfBounds)
    }

    /// Move the wall one cell, redrawing it around `character`.
    ///
    /// Once the wall passes its far edge it is erased and retired; moving a
    /// retired wall does nothing.
    pub fn advance<G: PixelGrid>(&mut self, grid: &mut G, character: Position) -> Motion {
        let Self::Active(wall) = self else {
            return Motion::Idle;
        };

        wall.draw(grid, false, character);
        match wall.next_position() {
            Some(position) => {
                wall.position = position;
                wall.draw(grid, true, character);
                Motion::Moved
            }
            None => {
                *self = Self::OutOfBounds;
                Motion::Retired
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::FrameBuffer;

    #[test]
    fn gap_generation_matches_bitmap_layout() {
        assert_eq!(Occupancy::with_gap(3, 0).bits(), 0b1111_1000);
        assert_eq!(Occupancy::with_gap(1, 2).bits(), 0b1111_1011);
        assert_eq!(Occupancy::with_gap(2, 5).bits(), 0b1001_1111);
        assert_eq!(Occupancy::with_gap(2, 1).gap(5), Some((1, 2)));
    }

    #[test]
    fn seeds_pick_direction_gap_and_shift() {
        // direction 2 -> South (row), gap 5 % 3 + 1 = 3, shift 9 % (5 - 3) = 1
        let wall = Wall::generate(2, 5, 9);
        assert_eq!(wall.direction(), Direction::South);
        assert_eq!(wall.axis(), Axis::Row);
        assert_eq!(wall.position(), 0);
        assert_eq!(wall.occupancy().gap(GRID_WIDTH), Some((1, 3)));

        // direction 7 -> West (column), gap 0 % 3 + 1 = 1, shift 200 % 6 = 2
        let wall = Wall::generate(7, 0, 200);
        assert_eq!(wall.direction(), Direction::West);
        assert_eq!(wall.position(), GRID_WIDTH - 1);
        assert_eq!(wall.occupancy().gap(GRID_HEIGHT), Some((2, 1)));
    }

    #[test]
    fn walls_enter_from_the_opposite_edge() {
        let solid = Occupancy::from_bits(0xFF);
        assert_eq!(Wall::new(Direction::North, solid).position(), GRID_HEIGHT - 1);
        assert_eq!(Wall::new(Direction::South, solid).position(), 0);
        assert_eq!(Wall::new(Direction::East, solid).position(), 0);
        assert_eq!(Wall::new(Direction::West, solid).position(), GRID_WIDTH - 1);
    }

    #[test]
    fn south_wall_sweeps_then_retires() {
        let mut grid = FrameBuffer::new();
        let character = Position::new(2, 3);
        let mut state = WallState::Active(Wall::new(Direction::South, Occupancy::with_gap(1, 0)));

        for expected in 1..GRID_HEIGHT {
            assert_eq!(state.advance(&mut grid, character), Motion::Moved);
            assert_eq!(state.active().map(Wall::position), Some(expected));
        }
        assert_eq!(state.advance(&mut grid, character), Motion::Retired);
        assert!(state.is_out_of_bounds());
        assert_eq!(state.advance(&mut grid, character), Motion::Idle);
        assert_eq!(grid.lit_count(), 0);
    }

    #[test]
    fn west_wall_retires_after_column_zero() {
        let mut grid = FrameBuffer::new();
        let mut state =
            WallState::Active(Wall::new(Direction::West, Occupancy::with_gap(2, 3)).at(0));
        assert_eq!(state.advance(&mut grid, Position::new(2, 3)), Motion::Retired);
    }

    #[test]
    fn drawing_skips_the_character_cell() {
        let mut grid = FrameBuffer::new();
        let character = Position::new(2, 1);
        grid.set_pixel(character, true);
        let mut state = WallState::Active(Wall::new(Direction::South, Occupancy::from_bits(0xFF)));

        state.advance(&mut grid, character);
        // Row 1 is fully solid but the character pixel is left as it was.
        assert_eq!(grid.rows()[1], 0b1_1111);
        assert_eq!(grid.rows()[0], 0);

        grid.set_pixel(character, false);
        state.advance(&mut grid, character);
        assert!(!grid.get_pixel(character));
        assert_eq!(grid.rows()[1], 0);
        assert_eq!(grid.rows()[2], 0b1_1111);
    }

    #[test]
    fn gap_cells_stay_dark() {
        let mut grid = FrameBuffer::new();
        let wall = Wall::new(Direction::East, Occupancy::with_gap(3, 2));
        wall.draw(&mut grid, true, Position::new(4, 4));
        for y in 0..GRID_HEIGHT {
            assert_eq!(grid.get_pixel(Position::new(0, y)), !(2..5).contains(&y));
        }
    }
}
