//! The vibration motor as the game's sound output.
//!
//! The badge has no speaker, so each note of a tune becomes a motor pulse
//! lasting half a beat. Rests keep the motor off.

use esp_hal::gpio::{
    Level,
    Output,
    OutputConfig,
};

use crate::{
    VibrationResources,
    config::{
        BASE_TEMPO,
        SOUND_RATE,
    },
    sound::{
        Melody,
        Note,
        Sound,
    },
};

pub struct Haptics {
    pin: Output<'static>,
    melody: Melody,
    /// Sound ticks until the current pulse ends.
    pulse_left: u32,
}

impl From<VibrationResources<'static>> for Haptics {
    fn from(res: VibrationResources<'static>) -> Self {
        Self {
            pin: Output::new(res.motor, Level::Low, OutputConfig::default()),
            melody: Melody::new(SOUND_RATE, BASE_TEMPO),
            pulse_left: 0,
        }
    }
}

impl Haptics {
    fn off(&mut self) {
        self.pin.set_low();
        self.pulse_left = 0;
    }
}

impl Sound for Haptics {
    fn play(&mut self, pattern: &'static str) {
        debug!("haptics: {}", pattern);
        self.off();
        self.melody.play(pattern);
    }

    fn stop(&mut self) {
        self.melody.stop();
        self.off();
    }

    fn set_tempo(&mut self, bpm: u16) {
        self.melody.set_tempo(bpm);
    }

    fn update(&mut self) {
        match self.melody.update() {
            Some(Note::Tone(_)) => {
                self.pin.set_high();
                self.pulse_left = (self.melody.ticks_per_beat() / 2).max(1);
            }
            Some(Note::Rest) => self.off(),
            None if self.pulse_left > 0 => {
                self.pulse_left -= 1;
                if self.pulse_left == 0 {
                    self.pin.set_low();
                }
            }
            None => {}
        }
    }
}
