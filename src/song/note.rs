//! Notes, their pins, and the patterns holding them.

use alloc::vec;
use alloc::vec::Vec;

/// Highest pin volume.
pub const PIN_VOLUME_MAX: u8 = 3;
/// Highest number of simultaneous pitches in a note.
pub const MAX_CHORD_SIZE: usize = 4;

/// Breakpoint of the pitch bend and volume envelope of a note.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pin {
    /// Parts since the start of the note.
    pub time: usize,
    /// Semitones above the pitches of the note.
    pub interval: i32,
    /// Volume in `0..=PIN_VOLUME_MAX`.
    pub volume: u8,
}

impl Pin {
    pub fn new(time: usize, interval: i32, volume: u8) -> Self {
        Self {
            time,
            interval,
            volume,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Note {
    /// Simultaneous pitches, voiced according to the harmony of the instrument.
    pub pitches: Vec<i32>,
    /// First part of the note within the bar.
    pub start: usize,
    /// Part after the last one of the note.
    pub end: usize,
    /// Time-sorted pins, the first one at time `0`.
    pub pins: Vec<Pin>,
}

impl Note {
    /// A note at constant pitch and volume.
    pub fn new(pitch: i32, start: usize, end: usize, volume: u8) -> Self {
        Self::with_pitches(&[pitch], start, end, volume)
    }

    pub fn with_pitches(pitches: &[i32], start: usize, end: usize, volume: u8) -> Self {
        let length = end.saturating_sub(start);
        Self {
            pitches: pitches.to_vec(),
            start,
            end,
            pins: vec![Pin::new(0, 0, volume), Pin::new(length, 0, volume)],
        }
    }

    /// Appends a pin, for bends and volume changes.
    pub fn with_pin(mut self, pin: Pin) -> Self {
        match self.pins.iter().position(|p| p.time >= pin.time) {
            Some(i) if self.pins[i].time == pin.time => self.pins[i] = pin,
            Some(i) => self.pins.insert(i, pin),
            None => self.pins.push(pin),
        }
        self
    }

    #[inline]
    pub fn length(&self) -> usize {
        self.end - self.start
    }

    /// First pitch plus the interval of the first pin.
    pub fn start_pitch(&self) -> i32 {
        self.pitches.first().copied().unwrap_or(0) + self.pins.first().map_or(0, |p| p.interval)
    }

    /// First pitch plus the interval of the last pin.
    pub fn end_pitch(&self) -> i32 {
        self.pitches.first().copied().unwrap_or(0) + self.pins.last().map_or(0, |p| p.interval)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Pattern {
    /// Index of the instrument of the channel playing this pattern.
    pub instrument: usize,
    /// Time-ordered, non-overlapping notes.
    pub notes: Vec<Note>,
}

impl Pattern {
    pub fn new(instrument: usize) -> Self {
        Self {
            instrument,
            notes: Vec::new(),
        }
    }

    pub fn with_note(mut self, note: Note) -> Self {
        self.notes.push(note);
        self
    }

    /// Index of the note sounding at `time`, in parts.
    pub fn note_at(&self, time: usize) -> Option<usize> {
        self.notes
            .iter()
            .position(|note| note.start <= time && time < note.end)
    }
}
