//! Character/wall overlap test.

use crate::{
    grid::Position,
    wall::WallState,
};

/// Does the character stand on a solid cell of the wall?
///
/// The character has to be in the wall's row or column and outside the gap.
/// A retired wall never collides.
pub fn collides(character: Position, wall: &WallState) -> bool {
    wall.active()
        .is_some_and(|wall| wall.is_solid_at(character))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        grid::Direction,
        wall::{
            Occupancy,
            Wall,
        },
    };

    fn row_wall_at(row: u8) -> WallState {
        WallState::Active(Wall::new(Direction::South, Occupancy::from_bits(0b1111_1000)).at(row))
    }

    #[test]
    fn gap_cells_are_safe() {
        let wall = row_wall_at(4);
        for x in 0..3 {
            assert!(!collides(Position::new(x, 4), &wall));
        }
    }

    #[test]
    fn solid_cell_in_line_collides() {
        let wall = row_wall_at(4);
        assert!(collides(Position::new(3, 4), &wall));
        assert!(collides(Position::new(4, 4), &wall));
    }

    #[test]
    fn solid_cell_out_of_line_is_safe() {
        let wall = row_wall_at(4);
        assert!(!collides(Position::new(3, 3), &wall));
        assert!(!collides(Position::new(3, 5), &wall));
    }

    #[test]
    fn column_walls_index_the_bitmap_by_row() {
        let wall = WallState::Active(
            Wall::new(Direction::West, Occupancy::with_gap(1, 5)).at(1),
        );
        assert!(!collides(Position::new(1, 5), &wall));
        assert!(collides(Position::new(1, 4), &wall));
        assert!(!collides(Position::new(2, 4), &wall));
    }

    #[test]
    fn retired_wall_never_collides() {
        for y in 0..7 {
            for x in 0..5 {
                assert!(!collides(Position::new(x, y), &WallState::OutOfBounds));
            }
        }
    }
}
