//! Fixed-rate task dispatch.
//!
//! One master tick drives every periodic job of the game. Each job has a
//! period in whole ticks (`tick_rate / rate`) and becomes due once that many
//! ticks have passed since it last ran. Periods can be changed at runtime;
//! the difficulty ramp uses this to speed up the wall.

use fugit::HertzU32;

use crate::config::GameConfig;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Task {
    Display,
    Input,
    Wall,
    Difficulty,
    Sound,
}

const TASK_COUNT: usize = 5;

impl Task {
    /// Dispatch order within a single tick.
    pub const ALL: [Self; TASK_COUNT] = [
        Self::Display,
        Self::Input,
        Self::Wall,
        Self::Difficulty,
        Self::Sound,
    ];

    const fn bit(self) -> u8 {
        1 << self as u8
    }
}

/// Ticks between runs of a task at `rate`, never less than one.
pub fn period_ticks(tick_rate: HertzU32, rate: HertzU32) -> u32 {
    (tick_rate.raw() / rate.raw().max(1)).max(1)
}

/// Set of tasks that are due on one tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct DueTasks(u8);

impl DueTasks {
    pub const fn contains(self, task: Task) -> bool {
        self.0 & task.bit() != 0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn iter(self) -> impl Iterator<Item = Task> {
        Task::ALL.into_iter().filter(move |&task| self.contains(task))
    }

    fn insert(&mut self, task: Task) {
        self.0 |= task.bit();
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct TaskTimer {
    period: u32,
    due: u32,
}

#[derive(Clone, Debug)]
pub struct Schedule {
    tick_rate: HertzU32,
    now: u32,
    timers: [TaskTimer; TASK_COUNT],
}

impl Schedule {
    /// All tasks at their configured rates, the wall at its base rate.
    pub fn new(config: &GameConfig) -> Self {
        let mut schedule = Self {
            tick_rate: config.tick_rate,
            now: 0,
            timers: [TaskTimer { period: 1, due: 1 }; TASK_COUNT],
        };
        schedule.set_rate(Task::Display, config.display_rate);
        schedule.set_rate(Task::Input, config.input_rate);
        schedule.set_rate(Task::Wall, config.wall_base_rate);
        schedule.set_rate(Task::Difficulty, config.difficulty_rate);
        schedule.set_rate(Task::Sound, config.sound_rate);
        schedule
    }

    pub const fn now(&self) -> u32 {
        self.now
    }

    pub const fn period(&self, task: Task) -> u32 {
        self.timers[task as usize].period
    }

    /// Change a task's rate. The task next runs one new period from now.
    pub fn set_rate(&mut self, task: Task, rate: HertzU32) {
        let period = period_ticks(self.tick_rate, rate);
        trace!("{:?} period -> {} ticks", task, period);
        self.timers[task as usize] = TaskTimer {
            period,
            due: self.now.wrapping_add(period),
        };
    }

    /// Restart a task's period without changing it.
    pub fn restart(&mut self, task: Task) {
        let timer = &mut self.timers[task as usize];
        timer.due = self.now.wrapping_add(timer.period);
    }

    /// Advance one master tick and collect the tasks that are due.
    pub fn advance(&mut self) -> DueTasks {
        self.now = self.now.wrapping_add(1);
        let mut due = DueTasks::default();
        for task in Task::ALL {
            let timer = &mut self.timers[task as usize];
            if timer.due == self.now {
                timer.due = self.now.wrapping_add(timer.period);
                due.insert(task);
            }
        }
        due
    }
}
