//! Errors reported when a song is not structurally valid, or when the audio
//! thread cannot be reached.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SongError {
    #[error("song declares {expected} channels but holds {found}")]
    ChannelCountMismatch { expected: usize, found: usize },

    #[error("{name} is {value}, expected {min}..={max}")]
    SettingOutOfRange {
        name: &'static str,
        value: i64,
        min: i64,
        max: i64,
    },

    #[error("{value} parts per beat is not supported")]
    UnsupportedPartsPerBeat { value: usize },

    #[error("loop {start}+{length} does not fit in {bar_count} bars")]
    LoopOutOfRange {
        start: usize,
        length: usize,
        bar_count: usize,
    },

    #[error("channel {channel} has {found} bars, expected {expected}")]
    BarCountMismatch {
        channel: usize,
        expected: usize,
        found: usize,
    },

    #[error("channel {channel} has {count} instruments")]
    InstrumentCount { channel: usize, count: usize },

    #[error("channel {channel} has {count} patterns")]
    PatternCount { channel: usize, count: usize },

    #[error("bar {bar} of channel {channel} refers to missing pattern {pattern}")]
    PatternOutOfRange {
        channel: usize,
        bar: usize,
        pattern: usize,
    },

    #[error("pattern {pattern} of channel {channel} refers to missing instrument {instrument}")]
    InstrumentOutOfRange {
        channel: usize,
        pattern: usize,
        instrument: usize,
    },

    #[error("instrument {instrument} of channel {channel} does not fit the channel type")]
    InstrumentKindMismatch { channel: usize, instrument: usize },

    #[error("note {note} of pattern {pattern} in channel {channel} is out of the bar or overlaps")]
    NoteOutOfOrder {
        channel: usize,
        pattern: usize,
        note: usize,
    },

    #[error("note {note} of pattern {pattern} in channel {channel} has {count} pitches")]
    PitchCount {
        channel: usize,
        pattern: usize,
        note: usize,
        count: usize,
    },

    #[error("note {note} of pattern {pattern} in channel {channel} has pitch {pitch}")]
    PitchOutOfRange {
        channel: usize,
        pattern: usize,
        note: usize,
        pitch: i32,
    },

    #[error("pins of note {note} of pattern {pattern} in channel {channel} are malformed")]
    MalformedPins {
        channel: usize,
        pattern: usize,
        note: usize,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PlayerError {
    #[error("command queue is full")]
    QueueFull,

    #[error("audio thread is gone")]
    Disconnected,
}
