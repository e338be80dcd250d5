//! Wall speed ramp.

use fugit::HertzU32;

use crate::config::GameConfig;

/// Wall speed and the countdown to the next speed-up.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Difficulty {
    speed: u8,
    counter: u16,
    default_speed: u8,
    step: u8,
    max_speed: u8,
    interval: u16,
}

impl Difficulty {
    pub const fn new(config: &GameConfig) -> Self {
        Self {
            speed: config.default_speed,
            counter: 0,
            default_speed: config.default_speed,
            step: config.speed_step,
            max_speed: config.max_speed,
            interval: config.ramp_interval,
        }
    }

    /// Back to the default speed with a fresh countdown.
    pub fn reset(&mut self) {
        self.speed = self.default_speed;
        self.counter = 0;
    }

    pub const fn speed(&self) -> u8 {
        self.speed
    }

    /// Difficulty ticks counted since the last speed change.
    pub const fn counter(&self) -> u16 {
        self.counter
    }

    /// Count one difficulty tick; returns the new speed when it changes.
    pub fn tick(&mut self) -> Option<u8> {
        self.counter += 1;
        if self.counter < self.interval {
            return None;
        }
        self.counter = 0;

        let next = self.speed.saturating_add(self.step).min(self.max_speed);
        if next == self.speed {
            return None;
        }
        self.speed = next;
        Some(next)
    }

    /// Wall step rate at the current speed.
    pub fn wall_rate(&self, base: HertzU32) -> HertzU32 {
        HertzU32::from_raw(base.raw() * u32::from(self.speed.max(1)))
    }
}
