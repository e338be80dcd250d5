//! WS2812 LED bars (RMT peripheral), used as the game's status lights.
//!
//! The badge has two bars of five LEDs. Hardware index 0 is the bottom of
//! the right bar, 4 its top, 5 the top of the left bar and 9 its bottom.

extern crate alloc;

use embassy_time::{
    Duration,
    Timer,
};
use esp_hal::{
    Blocking,
    gpio::Level,
    rmt::{
        PulseCode,
        Tx,
    },
};
use palette::Srgb;

use crate::config::MAX_SPEED;

pub const LED_COUNT: usize = 10;

/// LEDs per bar.
pub const BAR_COUNT: usize = 5;

const OFF: Srgb<u8> = Srgb::new(0, 0, 0);
const LIFE: Srgb<u8> = Srgb::new(0, 24, 4);
const SPEED: Srgb<u8> = Srgb::new(24, 10, 0);

pub struct Leds<'a> {
    channel: Option<esp_hal::rmt::Channel<'a, Blocking, Tx>>,
    framebuffer: [Srgb<u8>; LED_COUNT],
}

impl<'a> Leds<'a> {
    pub const fn new(channel: esp_hal::rmt::Channel<'a, Blocking, Tx>) -> Self {
        Self {
            channel: Some(channel),
            framebuffer: [OFF; LED_COUNT],
        }
    }

    /// Flush the framebuffer to the LEDs.
    pub async fn update(&mut self) {
        let Some(channel) = self.channel.take() else {
            error!("RMT channel lost during previous transmission");
            return;
        };

        let pulses = self
            .framebuffer
            .iter()
            .flat_map(|c| {
                // GRB on the wire
                [
                    Self::byte_to_pulses(c.green),
                    Self::byte_to_pulses(c.red),
                    Self::byte_to_pulses(c.blue),
                ]
                .into_iter()
                .flatten()
            })
            .chain(core::iter::once(PulseCode::end_marker()))
            .collect::<alloc::vec::Vec<_>>();

        let transaction = match channel.transmit(&pulses) {
            Ok(t) => t,
            Err(e) => {
                error!("RMT transmit failed: {}", e);
                return;
            }
        };

        self.channel = Some(match transaction.wait() {
            Ok(ch) => ch,
            Err((err, ch)) => {
                error!("RMT transaction failed: {}", err);
                ch
            }
        });

        // latch
        Timer::after(Duration::from_micros(50)).await;
    }

    pub fn fill(&mut self, color: Srgb<u8>) {
        self.framebuffer.fill(color);
    }

    pub fn clear(&mut self) {
        self.fill(OFF);
    }

    /// Colors run bottom to top.
    pub fn set_right_bar(&mut self, colors: &[Srgb<u8>; BAR_COUNT]) {
        self.framebuffer[..BAR_COUNT].copy_from_slice(colors);
    }

    /// Colors run bottom to top.
    pub fn set_left_bar(&mut self, colors: &[Srgb<u8>; BAR_COUNT]) {
        for (i, color) in colors.iter().enumerate() {
            self.framebuffer[LED_COUNT - 1 - i] = *color;
        }
    }

    /// Remaining lives on the left bar, wall speed on the right.
    pub fn show_status(&mut self, lives: u8, speed: u8) {
        self.set_left_bar(&level_bar(usize::from(lives), LIFE));
        let speed_leds = (usize::from(speed) * BAR_COUNT).div_ceil(usize::from(MAX_SPEED));
        self.set_right_bar(&level_bar(speed_leds, SPEED));
    }

    /// Blink every LED `times` times.
    pub async fn flash(&mut self, color: Srgb<u8>, times: u8, period: Duration) {
        for _ in 0..times {
            self.fill(color);
            self.update().await;
            Timer::after(period).await;
            self.clear();
            self.update().await;
            Timer::after(period).await;
        }
    }

    /// A single dot running up both bars.
    pub async fn sweep(&mut self, color: Srgb<u8>, step: Duration) {
        for i in 0..BAR_COUNT {
            let mut bar = [OFF; BAR_COUNT];
            bar[i] = color;
            self.set_right_bar(&bar);
            self.set_left_bar(&bar);
            self.update().await;
            Timer::after(step).await;
        }
    }

    // WS2812 bit timing at a 40 MHz RMT clock.
    const fn bit_to_pulse(bit: bool) -> PulseCode {
        if bit {
            PulseCode::new(Level::High, 32, Level::Low, 18)
        } else {
            PulseCode::new(Level::High, 16, Level::Low, 34)
        }
    }

    fn byte_to_pulses(byte: u8) -> [PulseCode; 8] {
        let mut pulses = [PulseCode::default(); 8];
        for (i, pulse) in pulses.iter_mut().enumerate() {
            *pulse = Self::bit_to_pulse((byte >> (7 - i)) & 1 != 0);
        }
        pulses
    }
}

/// The bottom `lit` LEDs of a bar in `color`.
fn level_bar(lit: usize, color: Srgb<u8>) -> [Srgb<u8>; BAR_COUNT] {
    let mut bar = [OFF; BAR_COUNT];
    for led in bar.iter_mut().take(lit) {
        *led = color;
    }
    bar
}
