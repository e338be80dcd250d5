//! Disobey 2026 badge support.
//!
//! The badge has no LED matrix, speaker or navigation switch, so the game's
//! collaborators are mapped onto what it does have:
//! - **LED matrix**: drawn as a 5×7 grid of lamps on the 320×170 ST7789 LCD,
//!   with the score and prompts next to it ([`MatrixView`])
//! - **Navigation switch**: D-pad for directions, joystick click for the push
//! - **Push button**: A; **pause**: Start
//! - **Speaker**: the vibration motor pulses the notes of each tune
//!   ([`Haptics`])
//! - **Status**: lives and wall speed on the two WS2812 LED bars ([`Leds`])
//!
//! ```rust,ignore
//! let peripherals = wall_dodge::board::init();
//! let resources = wall_dodge::split_resources!(peripherals);
//! let display: wall_dodge::board::Display = resources.display.into();
//! let buttons: wall_dodge::board::Buttons = resources.buttons.into();
//! ```

mod buttons;
mod display;
mod leds;
mod vibration;

pub use buttons::Buttons;
pub use display::{
    Backlight,
    Display,
    MatrixView,
};
use esp_hal::{
    Blocking,
    clock::{
        Clock,
        CpuClock,
    },
    gpio::{
        Level,
        Output,
        OutputConfig,
    },
    rmt::{
        Rmt,
        Tx,
        TxChannelConfig,
        TxChannelCreator as _,
    },
    rom,
    time::Rate,
};
pub use leds::{
    BAR_COUNT,
    Leds,
};
pub use vibration::Haptics;

use crate::LedResources;

/// Place a value in a `StaticCell` and return its `&'static mut`.
#[macro_export]
macro_rules! mk_static {
    ($t:ty, $val:expr) => {{
        static STATIC_CELL: static_cell::StaticCell<$t> = static_cell::StaticCell::new();
        #[deny(unused_attributes)]
        let x = STATIC_CELL.uninit().write($val);
        x
    }};
}

/// ESP32-S3 clock switch; the hardware needs the PLL selected before the
/// CPU period can change.
fn set_cpu_clock(cpu_clock_speed: CpuClock) {
    let _ = esp_hal::peripherals::SYSTEM::regs()
        .sysclk_conf()
        .modify(|_, w| unsafe { w.soc_clk_sel().bits(1) });
    let _ = esp_hal::peripherals::SYSTEM::regs()
        .cpu_per_conf()
        .modify(|_, w| unsafe {
            let _ = w.pll_freq_sel().set_bit();
            w.cpuperiod_sel().bits(match cpu_clock_speed {
                CpuClock::_80MHz => 0,
                CpuClock::_160MHz => 1,
                CpuClock::_240MHz => 2,
                _ => panic!("Unsupported CPU clock speed"),
            })
        });

    rom::ets_update_cpu_frequency_rom(cpu_clock_speed.frequency().as_mhz());
}

/// Bring up the badge and return its peripherals.
///
/// Call once at the top of `main`, then split the peripherals with
/// [`split_resources!`](crate::split_resources).
#[must_use]
pub fn init() -> esp_hal::peripherals::Peripherals {
    set_cpu_clock(CpuClock::_160MHz);
    let config = esp_hal::Config::default().with_cpu_clock(CpuClock::max());
    esp_hal::init(config)
}

impl<'a> From<LedResources<'a>> for esp_hal::rmt::Channel<'a, Blocking, Tx> {
    fn from(res: LedResources<'a>) -> Self {
        let _ws_power = Output::new(res.power, Level::High, OutputConfig::default());
        let rmt = Rmt::new(res.rmt, Rate::from_mhz(40)).unwrap();
        let tx_config = TxChannelConfig::default().with_clk_divider(1);
        rmt.channel0.configure_tx(res.io, tx_config).unwrap()
    }
}

impl<'a> From<LedResources<'a>> for Leds<'a> {
    fn from(res: LedResources<'a>) -> Self {
        Leds::new(res.into())
    }
}
