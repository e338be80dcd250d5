//! Game modes and what a collision costs in each.

use crate::{
    character::Character,
    config::{
        HARD_LIVES,
        THREE_LIVES,
        WALL_PUSH_LIVES,
    },
    grid::PixelGrid,
    wall::Wall,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GameMode {
    /// One life, one mistake.
    #[default]
    Hard,
    ThreeLives,
    /// Walls shove the character along; falling off the grid costs a life.
    WallPush,
}

/// What a collision did to the character.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Outcome {
    /// A life was lost and the character is stunned.
    Hit { lives: u8 },
    /// The character was pushed one cell along with the wall.
    Pushed,
    /// The last life is gone.
    Eliminated,
}

impl GameMode {
    pub const ALL: [Self; 3] = [Self::Hard, Self::ThreeLives, Self::WallPush];

    pub const fn starting_lives(self) -> u8 {
        match self {
            Self::Hard => HARD_LIVES,
            Self::ThreeLives => THREE_LIVES,
            Self::WallPush => WALL_PUSH_LIVES,
        }
    }

    /// The next mode in the selection menu, wrapping around.
    pub const fn next(self) -> Self {
        match self {
            Self::Hard => Self::ThreeLives,
            Self::ThreeLives => Self::WallPush,
            Self::WallPush => Self::Hard,
        }
    }

    /// Prompt text for the selection screen.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Hard => "HARD",
            Self::ThreeLives => "3 LIVES",
            Self::WallPush => "WALL PUSH",
        }
    }

    /// Apply this mode's penalty for `character` colliding with `wall`.
    ///
    /// Only call this for an actual collision with an unstunned character.
    pub fn resolve<G: PixelGrid>(
        self,
        character: &mut Character,
        wall: &Wall,
        grid: &mut G,
    ) -> Outcome {
        match self {
            Self::Hard | Self::ThreeLives => Self::take_life(character),
            Self::WallPush => {
                let vacated = character.position();
                match character.step(wall.direction(), grid) {
                    Ok(()) => {
                        wall.redraw_cell(grid, vacated);
                        Outcome::Pushed
                    }
                    Err(err) => {
                        debug!("push blocked: {:?}", err);
                        Self::take_life(character)
                    }
                }
            }
        }
    }

    fn take_life(character: &mut Character) -> Outcome {
        if character.lose_life() {
            Outcome::Eliminated
        } else {
            Outcome::Hit {
                lives: character.lives(),
            }
        }
    }
}
