//! Input events as seen by the game.
//!
//! The game only cares about presses, never about held buttons. An input
//! source samples its buttons once per input tick in [`InputSource::poll`];
//! a button counts as pressed on that tick if it went down since the previous
//! poll, and reading the press consumes it.

use embedded_hal::digital::InputPin;

use crate::grid::Direction;

/// Something the player can press.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Button {
    /// Navigation switch pushed towards a direction.
    Nav(Direction),
    /// Navigation switch pressed straight down.
    NavPush,
    /// The main push button.
    Push,
    /// Pause toggle.
    Start,
}

impl Button {
    pub const ALL: [Self; 7] = [
        Self::Nav(Direction::North),
        Self::Nav(Direction::East),
        Self::Nav(Direction::South),
        Self::Nav(Direction::West),
        Self::NavPush,
        Self::Push,
        Self::Start,
    ];

    const fn bit(self) -> u8 {
        let index = match self {
            Self::Nav(direction) => direction as u8,
            Self::NavPush => 4,
            Self::Push => 5,
            Self::Start => 6,
        };
        1 << index
    }

    /// Any direction or a press of the navigation switch.
    pub const fn is_nav(self) -> bool {
        matches!(self, Self::Nav(_) | Self::NavPush)
    }
}

/// Edge-triggered button input.
pub trait InputSource {
    /// Sample the buttons. Must be called once per input tick.
    fn poll(&mut self);

    /// Was `button` pressed at the last poll? Returns `true` at most once per press.
    fn pressed(&mut self, button: Button) -> bool;
}

/// Turns button levels into one-shot press events.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EdgeLatch {
    held: u8,
    pressed: u8,
}

impl EdgeLatch {
    pub const fn new() -> Self {
        Self { held: 0, pressed: 0 }
    }

    /// Start a new poll; presses that were never read are dropped.
    pub fn begin(&mut self) {
        self.pressed = 0;
    }

    /// Record the level of one button for this poll.
    pub fn sample(&mut self, button: Button, down: bool) {
        let bit = button.bit();
        if down && self.held & bit == 0 {
            self.pressed |= bit;
        }
        if down {
            self.held |= bit;
        } else {
            self.held &= !bit;
        }
    }

    /// Consume a press recorded during the current poll.
    pub fn take(&mut self, button: Button) -> bool {
        let bit = button.bit();
        let pressed = self.pressed & bit != 0;
        self.pressed &= !bit;
        pressed
    }
}

/// Buttons wired to active-low GPIO pins (pressed pulls the pin low).
pub struct PinInput<P, const N: usize> {
    pins: [(Button, P); N],
    latch: EdgeLatch,
}

impl<P: InputPin, const N: usize> PinInput<P, N> {
    pub const fn new(pins: [(Button, P); N]) -> Self {
        Self {
            pins,
            latch: EdgeLatch::new(),
        }
    }
}

impl<P: InputPin, const N: usize> InputSource for PinInput<P, N> {
    fn poll(&mut self) {
        self.latch.begin();
        for (button, pin) in &mut self.pins {
            // A pin that cannot be read counts as released.
            let down = pin.is_low().unwrap_or(false);
            self.latch.sample(*button, down);
        }
    }

    fn pressed(&mut self, button: Button) -> bool {
        self.latch.take(button)
    }
}
