//! Compile-time board geometry, task rates and gameplay tunables.

use fugit::HertzU32;

use crate::grid::Position;

// ── Grid ────────────────────────────────────────────────────────────────────

/// Columns on the LED matrix.
pub const GRID_WIDTH: u8 = 5;
/// Rows on the LED matrix.
pub const GRID_HEIGHT: u8 = 7;

/// Where the character appears at the start of every round.
pub const CHARACTER_START: Position = Position::new(2, 3);

// ── Task rates ──────────────────────────────────────────────────────────────

/// Master pacer rate; every task period is a whole number of these ticks.
pub const TICK_RATE: HertzU32 = HertzU32::from_raw(500);
pub const DISPLAY_RATE: HertzU32 = HertzU32::from_raw(50);
pub const INPUT_RATE: HertzU32 = HertzU32::from_raw(20);
/// Wall steps per second at speed 1.
pub const WALL_BASE_RATE: HertzU32 = HertzU32::from_raw(2);
pub const DIFFICULTY_RATE: HertzU32 = HertzU32::from_raw(1);
pub const SOUND_RATE: HertzU32 = HertzU32::from_raw(100);

// ── Difficulty ──────────────────────────────────────────────────────────────

pub const DEFAULT_SPEED: u8 = 1;
pub const SPEED_STEP: u8 = 1;
pub const MAX_SPEED: u8 = 8;
/// Difficulty ticks between speed increases (seconds at the default rate).
pub const RAMP_INTERVAL: u16 = 10;

// ── Lives ───────────────────────────────────────────────────────────────────

pub const HARD_LIVES: u8 = 1;
pub const THREE_LIVES: u8 = 3;
pub const WALL_PUSH_LIVES: u8 = 1;

// ── Sound ───────────────────────────────────────────────────────────────────

pub const BASE_TEMPO: u16 = 180;
/// Beats per minute added for every speed step above the default.
pub const TEMPO_STEP: u16 = 20;

pub const BACKGROUND_TUNE: &str = "C,_,G-,_,A-,_,E-,_,F-,_,C-,_,F-,_,G-,_:";
pub const HIT_TUNE: &str = "G,D#,C";
pub const GAME_OVER_TUNE: &str = "G,F#,F,E,_,C-";
pub const MODE_TUNE: &str = "A+";

/// Runtime tunables for a [`GameSession`](crate::game::GameSession).
///
/// [`Default`] matches the compile-time constants above.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GameConfig {
    pub tick_rate: HertzU32,
    pub display_rate: HertzU32,
    pub input_rate: HertzU32,
    pub wall_base_rate: HertzU32,
    pub difficulty_rate: HertzU32,
    pub sound_rate: HertzU32,
    pub default_speed: u8,
    pub speed_step: u8,
    pub max_speed: u8,
    pub ramp_interval: u16,
    pub base_tempo: u16,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            tick_rate: TICK_RATE,
            display_rate: DISPLAY_RATE,
            input_rate: INPUT_RATE,
            wall_base_rate: WALL_BASE_RATE,
            difficulty_rate: DIFFICULTY_RATE,
            sound_rate: SOUND_RATE,
            default_speed: DEFAULT_SPEED,
            speed_step: SPEED_STEP,
            max_speed: MAX_SPEED,
            ramp_interval: RAMP_INTERVAL,
            base_tempo: BASE_TEMPO,
        }
    }
}

impl GameConfig {
    /// Tempo matching a wall speed.
    pub const fn tempo_for(&self, speed: u8) -> u16 {
        self.base_tempo + speed.saturating_sub(self.default_speed) as u16 * TEMPO_STEP
    }
}
