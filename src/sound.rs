//! Sound cues and the melody sequencer.
//!
//! Tunes are short comma separated note lists such as `"C,E,G,C+"`:
//!
//! - `A`..`G` name a note in the middle octave, `#` sharpens it
//! - each `+` or `-` moves it up or down an octave
//! - `_` (or an empty slot) is a rest
//! - a trailing `:` repeats the tune until it is stopped
//!
//! Every note lasts one beat at the current tempo.

use fugit::HertzU32;

/// Middle-octave frequencies in Hz, starting at C.
const OCTAVE_HZ: [u32; 12] = [262, 277, 294, 311, 330, 349, 370, 392, 415, 440, 466, 494];

/// Where the game sends its sound cues. Fire and forget.
pub trait Sound {
    /// Start `pattern`, replacing whatever was playing.
    fn play(&mut self, pattern: &'static str);

    fn stop(&mut self);

    fn set_tempo(&mut self, _bpm: u16) {}

    /// Called at the sound task rate.
    fn update(&mut self) {}
}

/// A sound sink that ignores everything.
#[derive(Clone, Copy, Debug, Default)]
pub struct Silent;

impl Sound for Silent {
    fn play(&mut self, _pattern: &'static str) {}

    fn stop(&mut self) {}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Note {
    Rest,
    /// Semitones relative to middle C.
    Tone(i8),
}

impl Note {
    pub fn parse(token: &str) -> Self {
        let mut chars = token.trim().chars();
        let mut semitone: i8 = match chars.next() {
            Some('C') => 0,
            Some('D') => 2,
            Some('E') => 4,
            Some('F') => 5,
            Some('G') => 7,
            Some('A') => 9,
            Some('B') => 11,
            _ => return Self::Rest,
        };
        for modifier in chars {
            match modifier {
                '#' => semitone = semitone.saturating_add(1),
                '+' => semitone = semitone.saturating_add(12),
                '-' => semitone = semitone.saturating_sub(12),
                _ => {}
            }
        }
        Self::Tone(semitone)
    }

    pub fn frequency(self) -> Option<HertzU32> {
        let Self::Tone(semitone) = self else {
            return None;
        };
        let octave = semitone.div_euclid(12);
        let base = OCTAVE_HZ[semitone.rem_euclid(12) as usize];
        let hz = if octave >= 0 {
            base << octave.min(8)
        } else {
            base >> (-octave).min(8)
        };
        Some(HertzU32::from_raw(hz))
    }
}

/// Steps through a tune one note per beat.
#[derive(Clone, Debug)]
pub struct Melody {
    pattern: &'static str,
    cursor: usize,
    looping: bool,
    update_rate: HertzU32,
    ticks_per_beat: u32,
    countdown: u32,
}

impl Melody {
    pub fn new(update_rate: HertzU32, bpm: u16) -> Self {
        let mut melody = Self {
            pattern: "",
            cursor: 0,
            looping: false,
            update_rate,
            ticks_per_beat: 1,
            countdown: 0,
        };
        melody.set_tempo(bpm);
        melody
    }

    pub fn play(&mut self, pattern: &'static str) {
        let (pattern, looping) = match pattern.strip_suffix(':') {
            Some(body) => (body, true),
            None => (pattern, false),
        };
        self.pattern = pattern;
        self.looping = looping;
        self.cursor = 0;
        self.countdown = 0;
    }

    pub fn stop(&mut self) {
        self.pattern = "";
        self.looping = false;
    }

    pub fn is_playing(&self) -> bool {
        !self.pattern.is_empty()
    }

    pub fn set_tempo(&mut self, bpm: u16) {
        self.ticks_per_beat = (self.update_rate.raw() * 60 / u32::from(bpm.max(1))).max(1);
    }

    pub const fn ticks_per_beat(&self) -> u32 {
        self.ticks_per_beat
    }

    /// Advance one update tick; returns the note that starts on this tick.
    pub fn update(&mut self) -> Option<Note> {
        if self.pattern.is_empty() {
            return None;
        }
        if self.countdown > 0 {
            self.countdown -= 1;
            return None;
        }
        if self.cursor >= self.pattern.len() {
            if !self.looping {
                self.stop();
                return None;
            }
            self.cursor = 0;
        }

        let rest = &self.pattern[self.cursor..];
        let (token, consumed) = match rest.find(',') {
            Some(end) => (&rest[..end], end + 1),
            None => (rest, rest.len()),
        };
        self.cursor += consumed;
        self.countdown = self.ticks_per_beat - 1;
        Some(Note::parse(token))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn notes_over(melody: &mut Melody, ticks: usize) -> [Option<Note>; 16] {
        let mut out = [None; 16];
        for slot in out.iter_mut().take(ticks) {
            *slot = melody.update();
        }
        out
    }

    #[test]
    fn parses_note_modifiers() {
        assert_eq!(Note::parse("C"), Note::Tone(0));
        assert_eq!(Note::parse("F#"), Note::Tone(6));
        assert_eq!(Note::parse("A+"), Note::Tone(21));
        assert_eq!(Note::parse(" G- "), Note::Tone(-5));
        assert_eq!(Note::parse("_"), Note::Rest);
        assert_eq!(Note::parse(""), Note::Rest);
    }

    #[test]
    fn frequency_follows_octaves() {
        assert_eq!(Note::parse("A").frequency(), Some(HertzU32::from_raw(440)));
        assert_eq!(Note::parse("A+").frequency(), Some(HertzU32::from_raw(880)));
        assert_eq!(Note::parse("A-").frequency(), Some(HertzU32::from_raw(220)));
        assert_eq!(Note::Rest.frequency(), None);
    }

    #[test]
    fn one_note_per_beat() {
        // 4 updates per second at 60 bpm: four ticks per note.
        let mut melody = Melody::new(HertzU32::from_raw(4), 60);
        melody.play("C,_,E");
        let notes = notes_over(&mut melody, 13);
        assert_eq!(notes[0], Some(Note::Tone(0)));
        assert_eq!(notes[1..4], [None; 3]);
        assert_eq!(notes[4], Some(Note::Rest));
        assert_eq!(notes[8], Some(Note::Tone(4)));
        assert_eq!(notes[12], None);
        assert!(!melody.is_playing());
    }

    #[test]
    fn looping_tune_restarts() {
        let mut melody = Melody::new(HertzU32::from_raw(1), 60);
        melody.play("C,D:");
        let notes = notes_over(&mut melody, 5);
        assert_eq!(
            notes[..5],
            [
                Some(Note::Tone(0)),
                Some(Note::Tone(2)),
                Some(Note::Tone(0)),
                Some(Note::Tone(2)),
                Some(Note::Tone(0)),
            ]
        );
        melody.stop();
        assert_eq!(melody.update(), None);
    }

    #[test]
    fn tempo_changes_beat_length() {
        let mut melody = Melody::new(HertzU32::from_raw(100), 120);
        assert_eq!(melody.ticks_per_beat(), 50);
        melody.set_tempo(240);
        assert_eq!(melody.ticks_per_beat(), 25);
    }
}
