//! Wall Dodge firmware for the Disobey 2026 badge.
//!
//! Controls:
//! - D-pad: move the dot, or change the mode on the mode screen
//! - Joystick click: change the mode
//! - A: start a round, or return to the title after game over
//! - Start: pause
//!
//! The left LED bar shows the remaining lives, the right one the wall speed.

#![no_std]
#![no_main]

use defmt::{
    info,
    warn,
};
use embassy_executor::Spawner;
use embassy_futures::select::{
    Either,
    select,
};
use embassy_sync::{
    blocking_mutex::raw::CriticalSectionRawMutex,
    channel::Channel,
};
use embassy_time::{
    Duration,
    Ticker,
    Timer,
};
use esp_backtrace as _;
use esp_hal::timer::timg::TimerGroup;
use esp_println as _;
use palette::Srgb;
#[allow(clippy::wildcard_imports)]
use wall_dodge::board::*;
use wall_dodge::{
    FrameBuffer,
    Game,
    GameConfig,
    GameState,
    mk_static,
    schedule::Task,
    split_resources,
};

extern crate alloc;

esp_bootloader_esp_idf::esp_app_desc!();

// ── LED events ──────────────────────────────────────────────────────────────
#[derive(Clone, Copy)]
enum LedEvent {
    Status { lives: u8, speed: u8 },
    Hit,
    GameOver,
    Idle,
}

static LED_CHANNEL: Channel<CriticalSectionRawMutex, LedEvent, 4> = Channel::new();

const ATTRACT_PERIOD: Duration = Duration::from_secs(3);

#[embassy_executor::task]
async fn led_task(leds: &'static mut Leds<'static>) {
    info!("LED task started");
    let mut attract = true;
    let mut status = (0, 0);
    loop {
        let event = match select(LED_CHANNEL.receive(), Timer::after(ATTRACT_PERIOD)).await {
            Either::First(event) => event,
            Either::Second(()) => {
                if attract {
                    leds.sweep(Srgb::new(0, 10, 20), Duration::from_millis(60)).await;
                    leds.clear();
                    leds.update().await;
                }
                continue;
            }
        };

        match event {
            LedEvent::Status { lives, speed } => {
                attract = false;
                status = (lives, speed);
                leds.show_status(lives, speed);
                leds.update().await;
            }
            LedEvent::Hit => {
                leds.flash(Srgb::new(30, 0, 0), 2, Duration::from_millis(80)).await;
                leds.show_status(status.0, status.1);
                leds.update().await;
            }
            LedEvent::GameOver => {
                leds.flash(Srgb::new(20, 0, 0), 4, Duration::from_millis(250)).await;
            }
            LedEvent::Idle => {
                attract = true;
                leds.clear();
                leds.update().await;
            }
        }
    }
}

#[embassy_executor::task]
async fn game_task(
    display: &'static mut Display<'static>,
    backlight: &'static mut Backlight,
    buttons: Buttons,
    haptics: Haptics,
) {
    backlight.on();
    info!("Wall Dodge started");

    let config = GameConfig::default();
    let mut game = Game::new(config, FrameBuffer::new(), buttons, haptics);
    let mut view = MatrixView::new();

    let mut prev_state = game.session().state();
    let mut prev_lives = game.session().character().lives();
    let mut prev_speed = game.session().difficulty().speed();

    let mut ticker = Ticker::every(Duration::from_hz(u64::from(config.tick_rate.raw())));
    loop {
        let due = game.tick();

        let session = game.session();
        let state = session.state();
        let lives = session.character().lives();
        let speed = session.difficulty().speed();

        if state != prev_state {
            let event = match state {
                GameState::Playing => LedEvent::Status { lives, speed },
                GameState::Ended => LedEvent::GameOver,
                GameState::Menu | GameState::Selection => LedEvent::Idle,
            };
            LED_CHANNEL.try_send(event).ok();
        } else if state == GameState::Playing && (lives != prev_lives || speed != prev_speed) {
            if lives < prev_lives {
                LED_CHANNEL.try_send(LedEvent::Hit).ok();
            }
            LED_CHANNEL.try_send(LedEvent::Status { lives, speed }).ok();
        }
        prev_state = state;
        prev_lives = lives;
        prev_speed = speed;

        if due.contains(Task::Display) && view.render(display, session, game.grid()).is_err() {
            warn!("display write failed");
        }

        ticker.next().await;
    }
}

#[esp_rtos::main]
async fn main(spawner: Spawner) -> ! {
    let peripherals = wall_dodge::board::init();
    let resources = split_resources!(peripherals);

    esp_alloc::heap_allocator!(size: 64 * 1024);

    let timg0 = TimerGroup::new(peripherals.TIMG0);
    esp_rtos::start(timg0.timer0);

    let display = mk_static!(Display<'static>, resources.display.into());
    let backlight = mk_static!(Backlight, resources.backlight.into());
    let leds = mk_static!(Leds<'static>, resources.leds.into());
    let buttons: Buttons = resources.buttons.into();
    let haptics: Haptics = resources.vibra.into();

    spawner.must_spawn(led_task(leds));
    spawner.must_spawn(game_task(display, backlight, buttons, haptics));

    loop {
        Timer::after(Duration::from_secs(600)).await;
    }
}
