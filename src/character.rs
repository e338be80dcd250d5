//! The player's dot.

use crate::{
    config::CHARACTER_START,
    grid::{
        Direction,
        PixelGrid,
        Position,
    },
};

/// Why a move was refused. The character stays where it was.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MoveError {
    #[error("move would leave the grid")]
    OutOfBounds,
    #[error("target cell is lit")]
    Occupied,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Character {
    position: Position,
    lives: u8,
    stunned: bool,
}

impl Character {
    /// A fresh character at the start position. Nothing is drawn.
    pub const fn new(lives: u8) -> Self {
        Self {
            position: CHARACTER_START,
            lives,
            stunned: false,
        }
    }

    /// Create the character for a new round and light its pixel.
    pub fn spawn<G: PixelGrid>(lives: u8, grid: &mut G) -> Self {
        let character = Self::new(lives);
        character.show(grid);
        character
    }

    pub const fn position(&self) -> Position {
        self.position
    }

    pub const fn lives(&self) -> u8 {
        self.lives
    }

    pub const fn is_stunned(&self) -> bool {
        self.stunned
    }

    pub fn set_stunned(&mut self, stunned: bool) {
        self.stunned = stunned;
    }

    /// Take one life and stun the character. Returns `true` when none are left.
    pub fn lose_life(&mut self) -> bool {
        self.lives = self.lives.saturating_sub(1);
        self.stunned = true;
        self.lives == 0
    }

    /// Move one cell in `direction`.
    ///
    /// Refused at the grid edge and into lit cells, which is how the character
    /// is kept from stepping into the solid part of a wall.
    pub fn step<G: PixelGrid>(
        &mut self,
        direction: Direction,
        grid: &mut G,
    ) -> Result<(), MoveError> {
        let target = self
            .position
            .neighbour(direction)
            .ok_or(MoveError::OutOfBounds)?;
        if grid.get_pixel(target) {
            return Err(MoveError::Occupied);
        }

        self.hide(grid);
        self.position = target;
        self.show(grid);
        Ok(())
    }

    pub fn show<G: PixelGrid>(&self, grid: &mut G) {
        grid.set_pixel(self.position, true);
    }

    pub fn hide<G: PixelGrid>(&self, grid: &mut G) {
        grid.set_pixel(self.position, false);
    }

    /// Relight the character if something erased its pixel.
    pub fn restore<G: PixelGrid>(&self, grid: &mut G) {
        if !grid.get_pixel(self.position) {
            self.show(grid);
        }
    }
}
