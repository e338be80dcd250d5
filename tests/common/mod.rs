//! Host-side stand-ins for the badge hardware.

#![allow(dead_code)]

use wall_dodge::{
    FrameBuffer,
    Game,
    GameConfig,
    input::{
        Button,
        EdgeLatch,
        InputSource,
    },
    schedule::Task,
    sound::Sound,
};

/// Buttons pressed by the test and released again on the following poll.
#[derive(Default)]
pub struct ScriptedInput {
    down: Vec<Button>,
    latch: EdgeLatch,
}

impl ScriptedInput {
    pub fn press(&mut self, button: Button) {
        self.down.push(button);
    }
}

impl InputSource for ScriptedInput {
    fn poll(&mut self) {
        self.latch.begin();
        for button in Button::ALL {
            self.latch.sample(button, self.down.contains(&button));
        }
        self.down.clear();
    }

    fn pressed(&mut self, button: Button) -> bool {
        self.latch.take(button)
    }
}

/// Remembers every cue the game sent.
#[derive(Default)]
pub struct RecordingSound {
    pub played: Vec<&'static str>,
    pub stops: usize,
    pub tempo: Option<u16>,
    pub updates: usize,
}

impl RecordingSound {
    pub fn last(&self) -> Option<&'static str> {
        self.played.last().copied()
    }
}

impl Sound for RecordingSound {
    fn play(&mut self, pattern: &'static str) {
        self.played.push(pattern);
    }

    fn stop(&mut self) {
        self.stops += 1;
    }

    fn set_tempo(&mut self, bpm: u16) {
        self.tempo = Some(bpm);
    }

    fn update(&mut self) {
        self.updates += 1;
    }
}

pub type TestGame = Game<FrameBuffer, ScriptedInput, RecordingSound>;

pub fn new_game(config: GameConfig) -> TestGame {
    Game::new(
        config,
        FrameBuffer::new(),
        ScriptedInput::default(),
        RecordingSound::default(),
    )
}

pub fn run(game: &mut TestGame, ticks: u32) {
    for _ in 0..ticks {
        game.tick();
    }
}

/// Press `button`, let one input tick see it, then let the next input tick
/// see it released so the same button can be pressed again.
pub fn press(game: &mut TestGame, button: Button) {
    let period = game.schedule().period(Task::Input);
    game.input_mut().press(button);
    run(game, period);
    run(game, period);
}

/// Press several buttons so the same input tick sees all of them.
pub fn press_together(game: &mut TestGame, buttons: &[Button]) {
    let period = game.schedule().period(Task::Input);
    for &button in buttons {
        game.input_mut().press(button);
    }
    run(game, period);
    run(game, period);
}
