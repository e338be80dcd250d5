//! # wall-dodge
//!
//! A reflex game for a 5×7 LED matrix. The player steers a single dot with
//! a navigation switch while walls with one gap sweep across the matrix,
//! faster and faster. Touching a wall outside its gap costs a life, or in
//! wall-push mode shoves the dot along until it falls off the edge.
//!
//! The crate is split in two:
//! - **Game core** (always built, `no_std`, no allocation): grid geometry,
//!   wall generation and motion, collision, game modes, difficulty ramp,
//!   task schedule and the game state machine. It talks to hardware only
//!   through [`PixelGrid`], [`InputSource`] and [`Sound`].
//! - **Board support** (`badge` feature): the Disobey 2026 badge's LCD,
//!   buttons, LED bars, haptic motor and backlight, adapted to those traits.
//!   The firmware itself is the `wall_dodge` example.
//!
//! ## Quick start
//!
//! ```rust
//! use wall_dodge::{FrameBuffer, Game, GameConfig, GameState, sound::Silent};
//! # use wall_dodge::input::{Button, InputSource};
//! # struct NoInput;
//! # impl InputSource for NoInput {
//! #     fn poll(&mut self) {}
//! #     fn pressed(&mut self, _: Button) -> bool { false }
//! # }
//!
//! let mut game = Game::new(GameConfig::default(), FrameBuffer::new(), NoInput, Silent);
//! for _ in 0..1000 {
//!     game.tick();
//! }
//! assert_eq!(game.session().state(), GameState::Menu);
//! ```

#![cfg_attr(not(test), no_std)]

#[macro_use]
mod fmt;

pub mod character;
pub mod collision;
pub mod config;
pub mod difficulty;
pub mod game;
pub mod grid;
pub mod input;
pub mod mode;
pub mod rng;
pub mod schedule;
pub mod sound;
pub mod wall;

// ── Badge pin assignments ──────────────────────────────────────────────────

#[cfg(feature = "badge")]
esp_hal::assign_resources! {
    pub Resources<'d> {
        display: DisplayResources<'d> {
            dc: GPIO15,
            rst: GPIO7,
            sck: GPIO4,
            cs: GPIO6,
            miso: GPIO16,
            mosi: GPIO5,
            spi: SPI2,
            dma: DMA_CH0,
        },
        backlight: BacklightResources<'d> {
            led: GPIO19,
        },
        buttons: ButtonResources<'d> {
            up: GPIO11,
            down: GPIO1,
            left: GPIO21,
            right: GPIO2,
            stick: GPIO14,
            a: GPIO13,
            start: GPIO12,
        },
        leds: LedResources<'d> {
            power: GPIO17,
            io: GPIO18,
            rmt: RMT,
        },
        vibra: VibrationResources<'d> {
            motor: GPIO20,
        },
    }
}

#[cfg(feature = "badge")]
pub mod board;

pub use character::Character;
pub use config::GameConfig;
pub use game::{
    Game,
    GameSession,
    GameState,
    Screen,
};
pub use grid::{
    Direction,
    FrameBuffer,
    PixelGrid,
    Position,
};
pub use input::InputSource;
pub use mode::GameMode;
pub use sound::Sound;
pub use wall::{
    Wall,
    WallState,
};
