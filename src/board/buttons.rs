//! Badge buttons as the game's navigation switch and push buttons.

use esp_hal::gpio::{
    Input,
    InputConfig,
    Pull,
};

use crate::{
    ButtonResources,
    grid::Direction,
    input::{
        Button,
        PinInput,
    },
};

/// The seven buttons the game uses, all active low.
pub type Buttons = PinInput<Input<'static>, 7>;

impl From<ButtonResources<'static>> for Buttons {
    fn from(res: ButtonResources<'static>) -> Self {
        let pull_up = InputConfig::default().with_pull(Pull::Up);
        PinInput::new([
            (Button::Nav(Direction::North), Input::new(res.up, pull_up)),
            (Button::Nav(Direction::East), Input::new(res.right, pull_up)),
            (Button::Nav(Direction::South), Input::new(res.down, pull_up)),
            (Button::Nav(Direction::West), Input::new(res.left, pull_up)),
            (Button::NavPush, Input::new(res.stick, pull_up)),
            (Button::Push, Input::new(res.a, pull_up)),
            (Button::Start, Input::new(res.start, pull_up)),
        ])
    }
}
