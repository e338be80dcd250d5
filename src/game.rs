//! Game state machine.
//!
//! [`GameSession`] owns everything that changes during play: the state, the
//! selected mode, the character, the wall, score, pause and difficulty. The
//! display, input and sound are passed in by the caller on every call.
//!
//! [`Game`] bundles a session with its collaborators and a [`Schedule`] and
//! runs the whole thing from a single master tick.

use fugit::HertzU32;

use crate::{
    character::Character,
    collision::collides,
    config::{
        BACKGROUND_TUNE,
        GAME_OVER_TUNE,
        GameConfig,
        HIT_TUNE,
        MODE_TUNE,
    },
    difficulty::Difficulty,
    grid::{
        Direction,
        PixelGrid,
    },
    input::{
        Button,
        InputSource,
    },
    mode::{
        GameMode,
        Outcome,
    },
    rng::{
        Rng,
        Seeder,
    },
    schedule::{
        DueTasks,
        Schedule,
        Task,
    },
    sound::Sound,
    wall::{
        Motion,
        Wall,
        WallState,
    },
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GameState {
    #[default]
    Menu,
    Selection,
    Playing,
    Ended,
}

/// What the display should show besides the LED matrix.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Screen {
    Title,
    ModePrompt(GameMode),
    Playing,
    Paused,
    GameOver { score: u16 },
}

#[derive(Clone, Debug)]
pub struct GameSession {
    config: GameConfig,
    state: GameState,
    mode: GameMode,
    character: Character,
    wall: WallState,
    score: u16,
    paused: bool,
    difficulty: Difficulty,
    seeder: Seeder,
    rng: Rng,
    /// A cue interrupted the background loop; resume it after the next wall.
    music_interrupted: bool,
    /// At least one round was started since power-up.
    played: bool,
}

impl GameSession {
    pub fn new(config: GameConfig) -> Self {
        Self {
            config,
            state: GameState::Menu,
            mode: GameMode::default(),
            character: Character::new(GameMode::default().starting_lives()),
            wall: WallState::OutOfBounds,
            score: 0,
            paused: false,
            difficulty: Difficulty::new(&config),
            seeder: Seeder::new(),
            rng: Rng::new(0),
            music_interrupted: false,
            played: false,
        }
    }

    pub const fn state(&self) -> GameState {
        self.state
    }

    pub const fn mode(&self) -> GameMode {
        self.mode
    }

    pub const fn character(&self) -> &Character {
        &self.character
    }

    pub const fn wall(&self) -> &WallState {
        &self.wall
    }

    pub const fn score(&self) -> u16 {
        self.score
    }

    pub const fn is_paused(&self) -> bool {
        self.paused
    }

    pub const fn difficulty(&self) -> &Difficulty {
        &self.difficulty
    }

    pub const fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn screen(&self) -> Screen {
        match self.state {
            GameState::Menu if self.played => Screen::ModePrompt(self.mode),
            GameState::Menu => Screen::Title,
            GameState::Selection => Screen::ModePrompt(self.mode),
            GameState::Playing if self.paused => Screen::Paused,
            GameState::Playing => Screen::Playing,
            GameState::Ended => Screen::GameOver { score: self.score },
        }
    }

    /// Wall step rate at the current speed.
    pub fn wall_rate(&self) -> HertzU32 {
        self.difficulty.wall_rate(self.config.wall_base_rate)
    }

    /// Count a master tick towards the next round's seed while not playing.
    pub fn idle_tick(&mut self) {
        if self.state != GameState::Playing {
            self.seeder.tick();
        }
    }

    /// React to button presses that drive the menus and pause.
    ///
    /// Returns the new state when it changed.
    pub fn handle_buttons<I, G, S>(
        &mut self,
        input: &mut I,
        grid: &mut G,
        sound: &mut S,
    ) -> Option<GameState>
    where
        I: InputSource,
        G: PixelGrid,
        S: Sound,
    {
        match self.state {
            GameState::Menu => {
                if Button::ALL.into_iter().any(|button| input.pressed(button)) {
                    self.set_state(GameState::Selection);
                    sound.play(MODE_TUNE);
                    return Some(self.state);
                }
            }
            GameState::Selection => {
                if input.pressed(Button::Push) {
                    self.start_round(grid, sound);
                    return Some(self.state);
                }
                let nav = Button::ALL
                    .into_iter()
                    .filter(|button| button.is_nav())
                    .any(|button| input.pressed(button));
                if nav {
                    self.mode = self.mode.next();
                    info!("mode {:?}", self.mode);
                    sound.play(MODE_TUNE);
                }
            }
            GameState::Playing => {
                if input.pressed(Button::Start) {
                    self.toggle_pause();
                }
            }
            GameState::Ended => {
                if input.pressed(Button::Push) {
                    sound.stop();
                    grid.clear();
                    self.set_state(GameState::Menu);
                    return Some(self.state);
                }
            }
        }
        None
    }

    /// Reset everything for a new round in the selected mode.
    pub fn start_round<G: PixelGrid, S: Sound>(&mut self, grid: &mut G, sound: &mut S) {
        self.rng = self.seeder.rng();
        grid.clear();

        self.character = Character::spawn(self.mode.starting_lives(), grid);
        self.score = 0;
        self.paused = false;
        self.difficulty.reset();
        self.music_interrupted = false;
        self.played = true;
        self.spawn_wall(grid);

        info!(
            "round start: {:?}, {} lives, seed {}",
            self.mode,
            self.character.lives(),
            self.seeder.seed()
        );
        self.set_state(GameState::Playing);

        sound.set_tempo(self.config.tempo_for(self.difficulty.speed()));
        sound.play(BACKGROUND_TUNE);
        self.check_collision(grid, sound);
    }

    /// Pause or resume play. Only meaningful while playing.
    pub fn toggle_pause(&mut self) -> bool {
        if self.state == GameState::Playing {
            self.paused = !self.paused;
            info!("paused: {}", self.paused);
        }
        self.paused
    }

    const fn is_running(&self) -> bool {
        matches!(self.state, GameState::Playing) && !self.paused
    }

    /// Input tick: move the character on navigation presses.
    pub fn update_character<I, G, S>(&mut self, input: &mut I, grid: &mut G, sound: &mut S)
    where
        I: InputSource,
        G: PixelGrid,
        S: Sound,
    {
        if !self.is_running() {
            return;
        }

        self.character.restore(grid);
        if !self.character.is_stunned() {
            if let Some(direction) = Direction::ALL
                .into_iter()
                .find(|&direction| input.pressed(Button::Nav(direction)))
            {
                if let Err(err) = self.character.step(direction, grid) {
                    trace!("move {:?} refused: {:?}", direction, err);
                }
            }
        }

        self.check_collision(grid, sound);
    }

    /// Wall tick: move the wall, or bring in a new one once it has left.
    pub fn update_wall<G: PixelGrid, S: Sound>(&mut self, grid: &mut G, sound: &mut S) {
        if !self.is_running() {
            return;
        }

        match self.wall.advance(grid, self.character.position()) {
            Motion::Moved => self.character.set_stunned(false),
            Motion::Retired => {
                self.character.set_stunned(false);
                self.score = self.score.saturating_add(1);
                debug!("wall dodged, score {}", self.score);
                if self.music_interrupted {
                    self.music_interrupted = false;
                    sound.play(BACKGROUND_TUNE);
                }
            }
            Motion::Idle => self.spawn_wall(grid),
        }

        self.check_collision(grid, sound);
    }

    /// Difficulty tick. Returns the new wall rate when the speed went up.
    pub fn update_difficulty<S: Sound>(&mut self, sound: &mut S) -> Option<HertzU32> {
        if !self.is_running() {
            return None;
        }

        let speed = self.difficulty.tick()?;
        info!("speed {}", speed);
        sound.set_tempo(self.config.tempo_for(speed));
        Some(self.wall_rate())
    }

    fn spawn_wall<G: PixelGrid>(&mut self, grid: &mut G) {
        let wall = Wall::random(&mut self.rng);
        debug!(
            "wall {:?} gap {:?}",
            wall.direction(),
            wall.occupancy().bits()
        );
        wall.draw(grid, true, self.character.position());
        self.wall = WallState::Active(wall);
    }

    fn check_collision<G: PixelGrid, S: Sound>(&mut self, grid: &mut G, sound: &mut S) {
        if self.character.is_stunned() || !collides(self.character.position(), &self.wall) {
            return;
        }
        let Some(&wall) = self.wall.active() else {
            return;
        };

        let outcome = self.mode.resolve(&mut self.character, &wall, grid);
        debug!("collision: {:?}", outcome);
        match outcome {
            Outcome::Hit { .. } => {
                self.music_interrupted = true;
                sound.play(HIT_TUNE);
            }
            Outcome::Pushed => {}
            Outcome::Eliminated => self.end_round(sound),
        }
    }

    fn end_round<S: Sound>(&mut self, sound: &mut S) {
        info!("game over, score {}", self.score);
        self.paused = false;
        self.set_state(GameState::Ended);
        sound.play(GAME_OVER_TUNE);
    }

    fn set_state(&mut self, state: GameState) {
        debug!("state {:?} -> {:?}", self.state, state);
        self.state = state;
    }
}

/// A session wired to its display, input and sound, driven by one tick.
pub struct Game<G, I, S> {
    session: GameSession,
    schedule: Schedule,
    grid: G,
    input: I,
    sound: S,
}

impl<G, I, S> Game<G, I, S>
where
    G: PixelGrid,
    I: InputSource,
    S: Sound,
{
    pub fn new(config: GameConfig, grid: G, input: I, mut sound: S) -> Self {
        sound.set_tempo(config.base_tempo);
        Self {
            session: GameSession::new(config),
            schedule: Schedule::new(&config),
            grid,
            input,
            sound,
        }
    }

    /// Run one master tick. Returns the tasks that ran; the caller refreshes
    /// the physical display when [`Task::Display`] is among them.
    pub fn tick(&mut self) -> DueTasks {
        self.session.idle_tick();
        let due = self.schedule.advance();
        for task in due.iter() {
            self.run(task);
        }
        due
    }

    fn run(&mut self, task: Task) {
        match task {
            Task::Display => {}
            Task::Input => {
                self.input.poll();
                let changed = self.session.handle_buttons(
                    &mut self.input,
                    &mut self.grid,
                    &mut self.sound,
                );
                match changed {
                    // Presses from the poll that changed the state are spent.
                    Some(GameState::Playing) => {
                        self.schedule.set_rate(Task::Wall, self.session.wall_rate());
                        self.schedule.restart(Task::Difficulty);
                    }
                    Some(_) => {}
                    None => self.session.update_character(
                        &mut self.input,
                        &mut self.grid,
                        &mut self.sound,
                    ),
                }
            }
            Task::Wall => self.session.update_wall(&mut self.grid, &mut self.sound),
            Task::Difficulty => {
                if let Some(rate) = self.session.update_difficulty(&mut self.sound) {
                    self.schedule.set_rate(Task::Wall, rate);
                }
            }
            Task::Sound => self.sound.update(),
        }
    }

    pub const fn session(&self) -> &GameSession {
        &self.session
    }

    pub const fn schedule(&self) -> &Schedule {
        &self.schedule
    }

    pub const fn grid(&self) -> &G {
        &self.grid
    }

    pub fn grid_mut(&mut self) -> &mut G {
        &mut self.grid
    }

    pub fn input_mut(&mut self) -> &mut I {
        &mut self.input
    }

    pub const fn sound(&self) -> &S {
        &self.sound
    }

    pub fn sound_mut(&mut self) -> &mut S {
        &mut self.sound
    }

    pub fn toggle_pause(&mut self) -> bool {
        self.session.toggle_pause()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::CHARACTER_START,
        grid::{
            FrameBuffer,
            Position,
        },
        input::EdgeLatch,
        sound::Silent,
        wall::Occupancy,
    };

    /// Presses queued by the test, delivered on the next poll.
    #[derive(Default)]
    struct Presses {
        queued: [bool; 7],
        latch: EdgeLatch,
    }

    impl Presses {
        fn press(&mut self, button: Button) {
            let index = Button::ALL.iter().position(|&b| b == button).unwrap();
            self.queued[index] = true;
        }
    }

    impl InputSource for Presses {
        fn poll(&mut self) {
            self.latch.begin();
            for (i, button) in Button::ALL.into_iter().enumerate() {
                self.latch.sample(button, core::mem::take(&mut self.queued[i]));
            }
        }

        fn pressed(&mut self, button: Button) -> bool {
            self.latch.take(button)
        }
    }

    fn press(
        session: &mut GameSession,
        grid: &mut FrameBuffer,
        button: Button,
    ) -> Option<GameState> {
        let mut input = Presses::default();
        input.press(button);
        input.poll();
        session.handle_buttons(&mut input, grid, &mut Silent)
    }

    /// Sound sink that keeps every cue.
    #[derive(Default)]
    struct Cues(Vec<&'static str>);

    impl Sound for Cues {
        fn play(&mut self, pattern: &'static str) {
            self.0.push(pattern);
        }

        fn stop(&mut self) {}
    }

    fn playing(mode: GameMode) -> (GameSession, FrameBuffer) {
        let mut session = GameSession::new(GameConfig::default());
        let mut grid = FrameBuffer::new();
        session.mode = mode;
        session.set_state(GameState::Selection);
        press(&mut session, &mut grid, Button::Push);
        assert_eq!(session.state(), GameState::Playing);
        (session, grid)
    }

    /// Put a fully solid wall one step before the character's row.
    fn incoming_row_wall(session: &mut GameSession, grid: &mut FrameBuffer) {
        grid.clear();
        session.character.show(grid);
        let wall = Wall::new(Direction::South, Occupancy::from_bits(0xFF))
            .at(session.character.position().y - 1);
        wall.draw(grid, true, session.character.position());
        session.wall = WallState::Active(wall);
    }

    #[test]
    fn menu_flow_cycles_modes_and_starts() {
        let mut session = GameSession::new(GameConfig::default());
        let mut grid = FrameBuffer::new();
        assert_eq!(session.screen(), Screen::Title);

        assert_eq!(
            press(&mut session, &mut grid, Button::Nav(Direction::East)),
            Some(GameState::Selection)
        );
        assert_eq!(session.screen(), Screen::ModePrompt(GameMode::Hard));

        press(&mut session, &mut grid, Button::NavPush);
        assert_eq!(session.mode(), GameMode::ThreeLives);
        press(&mut session, &mut grid, Button::Nav(Direction::South));
        assert_eq!(session.mode(), GameMode::WallPush);
        press(&mut session, &mut grid, Button::NavPush);
        assert_eq!(session.mode(), GameMode::Hard);

        assert_eq!(
            press(&mut session, &mut grid, Button::Push),
            Some(GameState::Playing)
        );
        assert_eq!(session.character().lives(), 1);
        assert_eq!(session.character().position(), CHARACTER_START);
        assert!(session.wall().active().is_some());
    }

    #[test]
    fn start_button_is_ignored_outside_play() {
        let mut session = GameSession::new(GameConfig::default());
        let mut grid = FrameBuffer::new();
        session.set_state(GameState::Selection);
        assert_eq!(press(&mut session, &mut grid, Button::Start), None);
        assert!(!session.is_paused());
    }

    #[test]
    fn three_lives_last_life_ends_the_round() {
        let (mut session, mut grid) = playing(GameMode::ThreeLives);
        session.character = Character::new(1);
        incoming_row_wall(&mut session, &mut grid);

        session.update_wall(&mut grid, &mut Silent);

        assert_eq!(session.character().lives(), 0);
        assert_eq!(session.state(), GameState::Ended);
        assert_eq!(session.screen(), Screen::GameOver { score: 0 });
    }

    #[test]
    fn stun_prevents_a_second_hit_from_the_same_wall() {
        let (mut session, mut grid) = playing(GameMode::ThreeLives);
        incoming_row_wall(&mut session, &mut grid);

        session.update_wall(&mut grid, &mut Silent);
        assert_eq!(session.character().lives(), 2);
        assert!(session.character().is_stunned());

        // Same overlap seen again from the input tick: no extra cost.
        session.update_character(&mut Presses::default(), &mut grid, &mut Silent);
        assert_eq!(session.character().lives(), 2);

        // The wall moves on and clears the stun.
        session.update_wall(&mut grid, &mut Silent);
        assert!(!session.character().is_stunned());
        assert_eq!(session.character().lives(), 2);
    }

    #[test]
    fn stunned_character_ignores_navigation() {
        let (mut session, mut grid) = playing(GameMode::ThreeLives);
        incoming_row_wall(&mut session, &mut grid);
        session.update_wall(&mut grid, &mut Silent);
        assert!(session.character().is_stunned());

        // The cell above is free, only the stun holds the character back.
        let mut input = Presses::default();
        input.press(Button::Nav(Direction::North));
        input.poll();
        session.update_character(&mut input, &mut grid, &mut Silent);
        assert_eq!(session.character().position(), CHARACTER_START);

        session.update_wall(&mut grid, &mut Silent);
        let mut input = Presses::default();
        input.press(Button::Nav(Direction::North));
        input.poll();
        session.update_character(&mut input, &mut grid, &mut Silent);
        assert_eq!(session.character().position(), Position::new(2, 2));
    }

    #[test]
    fn hit_cue_interrupts_music_until_the_next_dodge() {
        let (mut session, mut grid) = playing(GameMode::ThreeLives);
        let mut cues = Cues::default();
        incoming_row_wall(&mut session, &mut grid);

        session.update_wall(&mut grid, &mut cues);
        assert_eq!(cues.0, [HIT_TUNE]);

        // Moving past the character is not a dodge yet.
        session.update_wall(&mut grid, &mut cues);
        assert_eq!(cues.0, [HIT_TUNE]);

        let leaving = Wall::new(Direction::South, Occupancy::from_bits(0xFF)).at(6);
        session.wall = WallState::Active(leaving);
        session.update_wall(&mut grid, &mut cues);
        assert_eq!(cues.0, [HIT_TUNE, BACKGROUND_TUNE]);

        // Uninterrupted music is left alone on later dodges.
        session.wall = WallState::Active(leaving);
        session.update_wall(&mut grid, &mut cues);
        assert_eq!(cues.0, [HIT_TUNE, BACKGROUND_TUNE]);
    }

    #[test]
    fn wall_push_shoves_the_character() {
        let (mut session, mut grid) = playing(GameMode::WallPush);
        incoming_row_wall(&mut session, &mut grid);

        session.update_wall(&mut grid, &mut Silent);
        assert_eq!(session.character().position(), Position::new(2, 4));
        assert_eq!(session.character().lives(), 1);
        assert_eq!(session.state(), GameState::Playing);
    }

    #[test]
    fn retiring_a_wall_scores_and_the_next_tick_spawns_one() {
        let (mut session, mut grid) = playing(GameMode::Hard);
        let last = Wall::new(Direction::North, Occupancy::from_bits(0xFF)).at(0);
        session.wall = WallState::Active(last);

        session.update_wall(&mut grid, &mut Silent);
        assert_eq!(session.score(), 1);
        assert!(session.wall().is_out_of_bounds());

        session.update_wall(&mut grid, &mut Silent);
        assert_eq!(session.score(), 1);
        assert!(session.wall().active().is_some());
    }

    #[test]
    fn paused_session_freezes_wall_and_difficulty() {
        let (mut session, mut grid) = playing(GameMode::Hard);
        let wall = *session.wall();
        assert!(session.toggle_pause());

        session.update_wall(&mut grid, &mut Silent);
        assert_eq!(session.update_difficulty(&mut Silent), None);
        assert_eq!(*session.wall(), wall);
        assert_eq!(session.difficulty().counter(), 0);
        assert_eq!(session.screen(), Screen::Paused);

        assert!(!session.toggle_pause());
        assert_eq!(session.screen(), Screen::Playing);
    }

    #[test]
    fn pausing_twice_keeps_the_ramp_where_it_was() {
        let (mut session, mut grid) = playing(GameMode::Hard);
        for _ in 0..3 {
            assert_eq!(session.update_difficulty(&mut Silent), None);
        }
        let before = (
            session.difficulty().speed(),
            session.difficulty().counter(),
            session.is_paused(),
        );
        assert_eq!(before, (1, 3, false));

        session.toggle_pause();
        for _ in 0..20 {
            session.update_difficulty(&mut Silent);
            session.update_wall(&mut grid, &mut Silent);
        }
        session.toggle_pause();

        let after = (
            session.difficulty().speed(),
            session.difficulty().counter(),
            session.is_paused(),
        );
        assert_eq!(after, before);
    }

    #[test]
    fn ended_returns_to_menu_on_push() {
        let (mut session, mut grid) = playing(GameMode::Hard);
        incoming_row_wall(&mut session, &mut grid);
        session.update_wall(&mut grid, &mut Silent);
        assert_eq!(session.state(), GameState::Ended);

        assert_eq!(press(&mut session, &mut grid, Button::Nav(Direction::North)), None);
        assert_eq!(
            press(&mut session, &mut grid, Button::Push),
            Some(GameState::Menu)
        );
        assert_eq!(grid.lit_count(), 0);
        assert_eq!(session.screen(), Screen::ModePrompt(GameMode::Hard));
    }
}
