//! ST7789 LCD (320×170 over SPI with DMA), its backlight, and the LED-matrix
//! view drawn on it.

use core::fmt::Write as _;

use embedded_graphics::{
    mono_font::{
        MonoTextStyle,
        ascii::{
            FONT_6X10,
            FONT_10X20,
        },
    },
    pixelcolor::Rgb565,
    prelude::*,
    primitives::{
        Circle,
        PrimitiveStyle,
        Rectangle,
    },
    text::Text,
};
use embedded_hal_bus::spi::ExclusiveDevice;
use esp_hal::{
    Async,
    dma::{
        DmaRxBuf,
        DmaTxBuf,
    },
    dma_buffers,
    gpio::{
        Level,
        Output,
        OutputConfig,
    },
    spi::master::Spi,
    time::Rate,
};

use crate::{
    BacklightResources,
    DisplayResources,
    config::{
        GRID_HEIGHT,
        GRID_WIDTH,
    },
    game::{
        GameSession,
        Screen,
    },
    grid::{
        FrameBuffer,
        PixelGrid,
        Position,
    },
};

type SpiInterface<'a> = mipidsi::interface::SpiInterface<
    'a,
    ExclusiveDevice<esp_hal::spi::master::SpiDmaBus<'a, Async>, Output<'a>, esp_hal::delay::Delay>,
    Output<'a>,
>;

/// The badge's ST7789 display.
pub type Display<'a> = mipidsi::Display<SpiInterface<'a>, mipidsi::models::ST7789, Output<'a>>;

impl<'a> From<DisplayResources<'a>> for Display<'a> {
    fn from(res: DisplayResources<'a>) -> Self {
        let (rx_buffer, rx_descriptors, tx_buffer, tx_descriptors) = dma_buffers!(32000);
        let dma_rx_buf = DmaRxBuf::new(rx_descriptors, rx_buffer).unwrap();
        let dma_tx_buf = DmaTxBuf::new(tx_descriptors, tx_buffer).unwrap();

        let mut delay = esp_hal::delay::Delay::new();

        let dc = Output::new(res.dc, Level::Low, OutputConfig::default());
        let mut rst = Output::new(res.rst, Level::Low, OutputConfig::default());
        rst.set_high();

        let spi = Spi::new(
            res.spi,
            esp_hal::spi::master::Config::default().with_frequency(Rate::from_mhz(80)),
        )
        .unwrap()
        .with_sck(res.sck)
        .with_mosi(res.mosi)
        .with_miso(res.miso)
        .with_dma(res.dma)
        .with_buffers(dma_rx_buf, dma_tx_buf)
        .into_async();

        let cs = Output::new(res.cs, Level::High, OutputConfig::default());
        let spi_device = ExclusiveDevice::new(spi, cs, delay).unwrap();

        let buffer = crate::mk_static!([u8; 32000], [0_u8; 32000]);
        let di = mipidsi::interface::SpiInterface::new(spi_device, dc, buffer);

        mipidsi::Builder::new(mipidsi::models::ST7789, di)
            .reset_pin(rst)
            .display_size(170, 320)
            .invert_colors(mipidsi::options::ColorInversion::Inverted)
            .orientation(
                mipidsi::options::Orientation::new().rotate(mipidsi::options::Rotation::Deg90),
            )
            .display_offset(35, 0)
            .init(&mut delay)
            .unwrap()
    }
}

/// Display backlight; on from power-up.
pub struct Backlight {
    pin: Output<'static>,
}

impl From<BacklightResources<'static>> for Backlight {
    fn from(res: BacklightResources<'static>) -> Self {
        Self {
            pin: Output::new(res.led, Level::High, OutputConfig::default()),
        }
    }
}

impl Backlight {
    pub fn on(&mut self) {
        self.pin.set_high();
    }

    pub fn off(&mut self) {
        self.pin.set_low();
    }
}

// ── Matrix layout ───────────────────────────────────────────────────────────

const SCREEN_W: u32 = 320;
const SCREEN_H: u32 = 170;

const LAMP: u32 = 20;
const PITCH: i32 = 23;
const MATRIX_X: i32 = 16;
const MATRIX_Y: i32 = (SCREEN_H as i32 - PITCH * GRID_HEIGHT as i32) / 2;

const PANEL_X: i32 = MATRIX_X + PITCH * GRID_WIDTH as i32 + 24;
const PANEL_W: u32 = SCREEN_W - PANEL_X as u32;

const LAMP_ON: Rgb565 = Rgb565::RED;
const LAMP_OFF: Rgb565 = Rgb565::new(4, 2, 1);

type Line = heapless::String<24>;

/// HUD values, redrawn only when one of them changes.
#[derive(Clone, Copy, PartialEq, Eq)]
struct Hud {
    score: u16,
    lives: u8,
    speed: u8,
}

/// Draws the game's LED matrix and side panel on the LCD.
///
/// Only lamps that changed since the previous frame are repainted; the whole
/// screen is redrawn when the [`Screen`] changes.
pub struct MatrixView {
    shown: FrameBuffer,
    screen: Option<Screen>,
    hud: Option<Hud>,
}

impl Default for MatrixView {
    fn default() -> Self {
        Self::new()
    }
}

impl MatrixView {
    pub const fn new() -> Self {
        Self {
            shown: FrameBuffer::new(),
            screen: None,
            hud: None,
        }
    }

    pub fn render<D>(
        &mut self,
        display: &mut D,
        session: &GameSession,
        frame: &FrameBuffer,
    ) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        let screen = session.screen();
        if self.screen != Some(screen) {
            Rectangle::new(Point::zero(), Size::new(SCREEN_W, SCREEN_H))
                .into_styled(PrimitiveStyle::with_fill(Rgb565::BLACK))
                .draw(display)?;
            for y in 0..GRID_HEIGHT {
                for x in 0..GRID_WIDTH {
                    let at = Position::new(x, y);
                    draw_lamp(display, at, frame.get_pixel(at))?;
                }
            }
            draw_panel(display, screen, session)?;
            self.screen = Some(screen);
            self.hud = None;
        } else {
            for (at, on) in frame.diff(&self.shown) {
                draw_lamp(display, at, on)?;
            }
        }
        self.shown = *frame;

        if matches!(screen, Screen::Playing | Screen::Paused) {
            let hud = Hud {
                score: session.score(),
                lives: session.character().lives(),
                speed: session.difficulty().speed(),
            };
            if self.hud != Some(hud) {
                draw_hud(display, hud)?;
                self.hud = Some(hud);
            }
        }
        Ok(())
    }
}

fn draw_lamp<D>(display: &mut D, at: Position, on: bool) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb565>,
{
    let top_left = Point::new(
        MATRIX_X + PITCH * i32::from(at.x),
        MATRIX_Y + PITCH * i32::from(at.y),
    );
    Circle::new(top_left, LAMP)
        .into_styled(PrimitiveStyle::with_fill(if on { LAMP_ON } else { LAMP_OFF }))
        .draw(display)
}

fn text<D>(
    display: &mut D,
    s: &str,
    y: i32,
    style: MonoTextStyle<'_, Rgb565>,
) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb565>,
{
    Text::new(s, Point::new(PANEL_X, y), style).draw(display).map(|_| ())
}

fn draw_panel<D>(display: &mut D, screen: Screen, session: &GameSession) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb565>,
{
    let big = MonoTextStyle::new(&FONT_10X20, Rgb565::CSS_YELLOW);
    let small = MonoTextStyle::new(&FONT_6X10, Rgb565::WHITE);

    match screen {
        Screen::Title => {
            text(display, "WALL DODGE", 40, big)?;
            text(display, "Press any button", 80, small)?;
        }
        Screen::ModePrompt(mode) => {
            text(display, "MODE", 40, small)?;
            text(display, mode.label(), 65, big)?;
            text(display, "D-pad: change", 100, small)?;
            text(display, "A: start", 115, small)?;
        }
        Screen::Playing => {}
        Screen::Paused => {
            text(display, "PAUSED", 140, big)?;
        }
        Screen::GameOver { score } => {
            let mut line = Line::new();
            let _ = write!(line, "Score: {score}");
            let red = MonoTextStyle::new(&FONT_10X20, Rgb565::RED);
            text(display, "GAME OVER", 40, red)?;
            text(display, line.as_str(), 70, small)?;
            text(display, session.mode().label(), 85, small)?;
            text(display, "A: menu", 115, small)?;
        }
    }
    Ok(())
}

fn draw_hud<D>(display: &mut D, hud: Hud) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb565>,
{
    Rectangle::new(Point::new(PANEL_X, 20), Size::new(PANEL_W, 90))
        .into_styled(PrimitiveStyle::with_fill(Rgb565::BLACK))
        .draw(display)?;

    let style = MonoTextStyle::new(&FONT_10X20, Rgb565::WHITE);
    let rows = [
        ("SCORE", u32::from(hud.score)),
        ("LIVES", u32::from(hud.lives)),
        ("SPEED", u32::from(hud.speed)),
    ];
    for (i, (label, value)) in rows.into_iter().enumerate() {
        let mut line = Line::new();
        let _ = write!(line, "{label} {value}");
        text(display, line.as_str(), 40 + 28 * i as i32, style)?;
    }
    Ok(())
}
