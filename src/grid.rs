//! Grid geometry and the pixel-level display contract.

use core::convert::Infallible;

use embedded_graphics::{
    Pixel,
    pixelcolor::BinaryColor,
    prelude::*,
};

use crate::config::{
    GRID_HEIGHT,
    GRID_WIDTH,
};

/// One of the four cardinal directions, shared by walls and the character.
///
/// Coordinates grow to the right (+x) and downwards (+y).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    North,
    East,
    South,
    West,
}

impl Direction {
    pub const ALL: [Self; 4] = [Self::North, Self::East, Self::South, Self::West];

    /// `(dx, dy)` for one step, indexed by discriminant.
    const STEPS: [(i8, i8); 4] = [(0, -1), (1, 0), (0, 1), (-1, 0)];

    pub const fn step(self) -> (i8, i8) {
        Self::STEPS[self as usize]
    }

    /// Map any byte onto a direction.
    pub const fn from_seed(seed: u8) -> Self {
        Self::ALL[(seed % 4) as usize]
    }

    /// Orientation of a wall travelling in this direction.
    ///
    /// A wall moving north or south spans a row; east or west, a column.
    pub const fn wall_axis(self) -> Axis {
        match self {
            Self::North | Self::South => Axis::Row,
            Self::East | Self::West => Axis::Column,
        }
    }
}

/// Orientation of a wall.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Axis {
    Row,
    Column,
}

impl Axis {
    /// Cells covered by one wall on this axis.
    pub const fn span(self) -> u8 {
        match self {
            Self::Row => GRID_WIDTH,
            Self::Column => GRID_HEIGHT,
        }
    }

    /// Last valid position of a wall travelling across the grid.
    pub const fn last_position(self) -> u8 {
        match self {
            Self::Row => GRID_HEIGHT - 1,
            Self::Column => GRID_WIDTH - 1,
        }
    }
}

/// A cell on the LED matrix.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Position {
    pub x: u8,
    pub y: u8,
}

impl Position {
    pub const fn new(x: u8, y: u8) -> Self {
        Self { x, y }
    }

    pub const fn in_bounds(self) -> bool {
        self.x < GRID_WIDTH && self.y < GRID_HEIGHT
    }

    /// The neighbouring cell in `direction`, if it is still on the grid.
    pub fn neighbour(self, direction: Direction) -> Option<Self> {
        let (dx, dy) = direction.step();
        let next = Self {
            x: self.x.checked_add_signed(dx)?,
            y: self.y.checked_add_signed(dy)?,
        };
        next.in_bounds().then_some(next)
    }

    /// Coordinate along a wall's direction of travel.
    pub const fn along(self, axis: Axis) -> u8 {
        match axis {
            Axis::Row => self.y,
            Axis::Column => self.x,
        }
    }

    /// Coordinate along the wall itself, i.e. the bitmap index.
    pub const fn across(self, axis: Axis) -> u8 {
        match axis {
            Axis::Row => self.x,
            Axis::Column => self.y,
        }
    }

    /// Inverse of [`along`](Self::along) / [`across`](Self::across).
    pub const fn on_axis(axis: Axis, along: u8, across: u8) -> Self {
        match axis {
            Axis::Row => Self::new(across, along),
            Axis::Column => Self::new(along, across),
        }
    }
}

impl From<Position> for Point {
    fn from(p: Position) -> Self {
        Point::new(i32::from(p.x), i32::from(p.y))
    }
}

/// Pixel access to the LED matrix.
///
/// Implementations must ignore positions outside the grid.
pub trait PixelGrid {
    fn set_pixel(&mut self, at: Position, on: bool);

    fn get_pixel(&self, at: Position) -> bool;

    fn clear(&mut self) {
        for y in 0..GRID_HEIGHT {
            for x in 0..GRID_WIDTH {
                self.set_pixel(Position::new(x, y), false);
            }
        }
    }
}

/// In-memory LED matrix, one bitmask per row.
///
/// Also an `embedded-graphics` draw target, so anything that can be drawn in
/// [`BinaryColor`] can be drawn onto the matrix.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct FrameBuffer {
    rows: [u8; GRID_HEIGHT as usize],
}

impl FrameBuffer {
    pub const fn new() -> Self {
        Self {
            rows: [0; GRID_HEIGHT as usize],
        }
    }

    /// Row bitmasks, bit `x` set when column `x` is lit.
    pub const fn rows(&self) -> &[u8; GRID_HEIGHT as usize] {
        &self.rows
    }

    pub fn lit_count(&self) -> u32 {
        self.rows.iter().map(|row| row.count_ones()).sum()
    }

    /// Cells whose state differs from `other`.
    pub fn diff<'a>(&'a self, other: &'a Self) -> impl Iterator<Item = (Position, bool)> + 'a {
        (0..GRID_HEIGHT).flat_map(move |y| {
            let changed = self.rows[y as usize] ^ other.rows[y as usize];
            (0..GRID_WIDTH)
                .filter(move |&x| changed & (1 << x) != 0)
                .map(move |x| {
                    let at = Position::new(x, y);
                    (at, self.get_pixel(at))
                })
        })
    }
}

impl PixelGrid for FrameBuffer {
    fn set_pixel(&mut self, at: Position, on: bool) {
        if !at.in_bounds() {
            return;
        }
        let row = &mut self.rows[at.y as usize];
        if on {
            *row |= 1 << at.x;
        } else {
            *row &= !(1 << at.x);
        }
    }

    fn get_pixel(&self, at: Position) -> bool {
        at.in_bounds() && self.rows[at.y as usize] & (1 << at.x) != 0
    }

    fn clear(&mut self) {
        self.rows = [0; GRID_HEIGHT as usize];
    }
}

impl OriginDimensions for FrameBuffer {
    fn size(&self) -> Size {
        Size::new(u32::from(GRID_WIDTH), u32::from(GRID_HEIGHT))
    }
}

impl DrawTarget for FrameBuffer {
    type Color = BinaryColor;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            let (Ok(x), Ok(y)) = (u8::try_from(point.x), u8::try_from(point.y)) else {
                continue;
            };
            self.set_pixel(Position::new(x, y), color.is_on());
        }
        Ok(())
    }
}
