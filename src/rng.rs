//! Pseudo-random bytes for wall generation.

/// Used when a zero seed would lock xorshift at zero.
const FALLBACK_SEED: u32 = 0xDEAD_BEEF;

/// Xorshift32 generator.
#[derive(Clone, Debug)]
pub struct Rng(u32);

impl Rng {
    pub const fn new(seed: u32) -> Self {
        Self(if seed == 0 { FALLBACK_SEED } else { seed })
    }

    pub fn next_u32(&mut self) -> u32 {
        self.0 ^= self.0 << 13;
        self.0 ^= self.0 >> 17;
        self.0 ^= self.0 << 5;
        self.0
    }

    /// The top byte of the next word; the low bits of xorshift are weaker.
    pub fn next_byte(&mut self) -> u8 {
        (self.next_u32() >> 24) as u8
    }
}

/// Derives a round seed from how long the player lingered outside play.
///
/// The count only ever goes up (wrapping), so consecutive rounds start from
/// different seeds even when the player presses through the menus quickly.
#[derive(Clone, Debug, Default)]
pub struct Seeder {
    ticks: u32,
}

impl Seeder {
    pub const fn new() -> Self {
        Self { ticks: 0 }
    }

    pub fn tick(&mut self) {
        self.ticks = self.ticks.wrapping_add(1);
    }

    pub const fn seed(&self) -> u32 {
        self.ticks
    }

    pub const fn rng(&self) -> Rng {
        Rng::new(self.ticks)
    }
}
