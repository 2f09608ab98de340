//! In-memory song model consumed by the synthesizer.
//!
//! Channels are ordered with the pitched channels first and the drum channels
//! after. The synthesizer only reads a song; [`Song::validate`] and
//! [`Song::clamp`] establish the invariants it relies on.

pub mod instrument;
pub mod note;
pub mod settings;

use alloc::vec;
use alloc::vec::Vec;

#[allow(unused_imports)]
use num_traits::float::Float;

use crate::error::SongError;
use crate::fm::operator::OPERATOR_AMPLITUDE_MAX;
use crate::fx::master::MUFF_MAX;
use crate::fx::reverb::REVERB_MAX;
use crate::resources::drums::{DrumKind, DRUM_COUNT};

use instrument::{Instrument, InstrumentKind, PAN_MAX};
use note::{Note, Pattern, MAX_CHORD_SIZE, PIN_VOLUME_MAX};
use settings::{Key, MixMode, SampleRateMode, Scale};

pub const TEMPO_MAX: u8 = 14;
pub const BLEND_MAX: u8 = 8;
pub const BLEND_CENTER: u8 = 4;
pub const RIFF_MAX: u8 = 8;
pub const DETUNE_MAX: u8 = 24;
pub const DETUNE_CENTER: u8 = 12;
pub const BEATS_PER_BAR_MAX: usize = 48;
pub const PARTS_PER_BEAT_OPTIONS: [usize; 10] = [3, 4, 5, 6, 8, 9, 12, 16, 24, 50];
pub const BAR_COUNT_MAX: usize = 512;
pub const OCTAVE_MAX: u8 = 5;
pub const INSTRUMENTS_MAX: usize = 64;
pub const PATTERNS_MAX: usize = 128;
/// Highest pitch of a note in a pitched channel.
pub const PITCH_MAX: i32 = 36;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Channel {
    /// Transposition in octaves, ignored by drum channels.
    pub octave: u8,
    pub instruments: Vec<Instrument>,
    pub patterns: Vec<Pattern>,
    /// Pattern of each bar, `0` for none, otherwise a 1-based index into `patterns`.
    pub bars: Vec<usize>,
}

impl Channel {
    pub fn new(octave: u8, instrument: Instrument, bar_count: usize) -> Self {
        Self {
            octave,
            instruments: vec![instrument],
            patterns: vec![Pattern::new(0)],
            bars: vec![0; bar_count],
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Song {
    pub scale: Scale,
    pub key: Key,
    pub mix: MixMode,
    pub sample_rate_mode: SampleRateMode,
    /// Tempo step in `0..=TEMPO_MAX`, see [`Song::get_beats_per_minute`].
    pub tempo: u8,
    pub reverb: u8,
    /// Balance of the second oscillator of chip voices, centered at `BLEND_CENTER`.
    pub blend: u8,
    /// Extra spread between the two oscillators of chip voices.
    pub riff: u8,
    /// Global detune in steps of 4 cents, centered at `DETUNE_CENTER`.
    pub detune: u8,
    /// Master lowpass amount.
    pub muff: u8,
    pub beats_per_bar: usize,
    pub parts_per_beat: usize,
    pub bar_count: usize,
    pub loop_start: usize,
    pub loop_length: usize,
    pub pitch_channel_count: usize,
    pub drum_channel_count: usize,
    pub channels: Vec<Channel>,
}

impl Default for Song {
    fn default() -> Self {
        Self::new(3, 1)
    }
}

impl Song {
    /// An empty song with the given channel layout.
    pub fn new(pitch_channel_count: usize, drum_channel_count: usize) -> Self {
        let bar_count = 16;
        let mut channels = Vec::with_capacity(pitch_channel_count + drum_channel_count);
        for i in 0..pitch_channel_count {
            let octave = 3u8.saturating_sub(i as u8);
            channels.push(Channel::new(octave, Instrument::default(), bar_count));
        }
        for _ in 0..drum_channel_count {
            channels.push(Channel::new(0, Instrument::noise(DrumKind::Retro), bar_count));
        }

        Self {
            scale: Scale::NormalMajor,
            key: Key::C,
            mix: MixMode::TypeA,
            sample_rate_mode: SampleRateMode::Full,
            tempo: 7,
            reverb: 0,
            blend: BLEND_CENTER,
            riff: 0,
            detune: DETUNE_CENTER,
            muff: 0,
            beats_per_bar: 8,
            parts_per_beat: 4,
            bar_count,
            loop_start: 0,
            loop_length: 4,
            pitch_channel_count,
            drum_channel_count,
            channels,
        }
    }

    #[inline]
    pub fn get_channel_count(&self) -> usize {
        self.pitch_channel_count + self.drum_channel_count
    }

    #[inline]
    pub fn get_channel_is_drum(&self, channel: usize) -> bool {
        channel >= self.pitch_channel_count
    }

    /// Pattern played by a channel in a bar, if any.
    pub fn get_pattern(&self, channel: usize, bar: usize) -> Option<&Pattern> {
        let channel = self.channels.get(channel)?;
        let index = *channel.bars.get(bar)?;
        if index == 0 {
            return None;
        }
        channel.patterns.get(index - 1)
    }

    /// Instrument index of the pattern of a bar, `0` when the bar is empty.
    pub fn get_pattern_instrument(&self, channel: usize, bar: usize) -> usize {
        self.get_pattern(channel, bar)
            .map_or(0, |pattern| pattern.instrument)
    }

    /// Instrument playing a channel in a bar, falling back to the first one.
    pub fn get_instrument(&self, channel: usize, bar: usize) -> Option<&Instrument> {
        let instruments = &self.channels.get(channel)?.instruments;
        instruments
            .get(self.get_pattern_instrument(channel, bar))
            .or_else(|| instruments.first())
    }

    pub fn get_beats_per_minute(&self) -> f32 {
        120.0 * ((self.tempo as f32 - 4.0) / 9.0).exp2()
    }

    #[inline]
    pub fn parts_per_bar(&self) -> usize {
        self.beats_per_bar * self.parts_per_beat
    }

    /// First bar after the loop.
    #[inline]
    pub fn loop_end(&self) -> usize {
        self.loop_start + self.loop_length
    }

    /// Checks every structural invariant the synthesizer relies on.
    pub fn validate(&self) -> Result<(), SongError> {
        check_setting("tempo", self.tempo as i64, 0, TEMPO_MAX as i64)?;
        check_setting("reverb", self.reverb as i64, 0, REVERB_MAX as i64)?;
        check_setting("blend", self.blend as i64, 0, BLEND_MAX as i64)?;
        check_setting("riff", self.riff as i64, 0, RIFF_MAX as i64)?;
        check_setting("detune", self.detune as i64, 0, DETUNE_MAX as i64)?;
        check_setting("muff", self.muff as i64, 0, MUFF_MAX as i64)?;
        check_setting(
            "beats per bar",
            self.beats_per_bar as i64,
            1,
            BEATS_PER_BAR_MAX as i64,
        )?;
        check_setting("bar count", self.bar_count as i64, 1, BAR_COUNT_MAX as i64)?;
        if !PARTS_PER_BEAT_OPTIONS.contains(&self.parts_per_beat) {
            return Err(SongError::UnsupportedPartsPerBeat {
                value: self.parts_per_beat,
            });
        }
        if self.loop_length == 0 || self.loop_end() > self.bar_count {
            return Err(SongError::LoopOutOfRange {
                start: self.loop_start,
                length: self.loop_length,
                bar_count: self.bar_count,
            });
        }
        if self.channels.len() != self.get_channel_count() {
            return Err(SongError::ChannelCountMismatch {
                expected: self.get_channel_count(),
                found: self.channels.len(),
            });
        }

        for (c, channel) in self.channels.iter().enumerate() {
            self.validate_channel(c, channel)?;
        }

        Ok(())
    }

    fn validate_channel(&self, c: usize, channel: &Channel) -> Result<(), SongError> {
        let is_drum = self.get_channel_is_drum(c);

        check_setting("octave", channel.octave as i64, 0, OCTAVE_MAX as i64)?;
        if channel.instruments.is_empty() || channel.instruments.len() > INSTRUMENTS_MAX {
            return Err(SongError::InstrumentCount {
                channel: c,
                count: channel.instruments.len(),
            });
        }
        if channel.patterns.is_empty() || channel.patterns.len() > PATTERNS_MAX {
            return Err(SongError::PatternCount {
                channel: c,
                count: channel.patterns.len(),
            });
        }
        if channel.bars.len() != self.bar_count {
            return Err(SongError::BarCountMismatch {
                channel: c,
                expected: self.bar_count,
                found: channel.bars.len(),
            });
        }
        for (bar, pattern) in channel.bars.iter().enumerate() {
            if *pattern > channel.patterns.len() {
                return Err(SongError::PatternOutOfRange {
                    channel: c,
                    bar,
                    pattern: *pattern,
                });
            }
        }

        for (i, instrument) in channel.instruments.iter().enumerate() {
            if instrument.kind.is_noise() != is_drum {
                return Err(SongError::InstrumentKindMismatch {
                    channel: c,
                    instrument: i,
                });
            }
            check_setting("pan", instrument.pan as i64, 0, PAN_MAX as i64)?;
            if let InstrumentKind::Fm(fm) = &instrument.kind {
                let max = OPERATOR_AMPLITUDE_MAX as i64;
                check_setting("feedback amplitude", fm.feedback_amplitude as i64, 0, max)?;
                for op in fm.operators.iter() {
                    check_setting("operator amplitude", op.amplitude as i64, 0, max)?;
                }
            }
        }

        let pitch_max = if is_drum { DRUM_COUNT as i32 - 1 } else { PITCH_MAX };
        for (p, pattern) in channel.patterns.iter().enumerate() {
            if pattern.instrument >= channel.instruments.len() {
                return Err(SongError::InstrumentOutOfRange {
                    channel: c,
                    pattern: p,
                    instrument: pattern.instrument,
                });
            }
            let mut previous_end = 0;
            for (n, note) in pattern.notes.iter().enumerate() {
                if note.start < previous_end
                    || note.start >= note.end
                    || note.end > self.parts_per_bar()
                {
                    return Err(SongError::NoteOutOfOrder {
                        channel: c,
                        pattern: p,
                        note: n,
                    });
                }
                previous_end = note.end;
                validate_note(note, pitch_max).map_err(|error| match error {
                    NoteError::PitchCount(count) => SongError::PitchCount {
                        channel: c,
                        pattern: p,
                        note: n,
                        count,
                    },
                    NoteError::Pitch(pitch) => SongError::PitchOutOfRange {
                        channel: c,
                        pattern: p,
                        note: n,
                        pitch,
                    },
                    NoteError::Pins => SongError::MalformedPins {
                        channel: c,
                        pattern: p,
                        note: n,
                    },
                })?;
            }
        }

        Ok(())
    }

    /// Brings every scalar setting and index back into range.
    ///
    /// Notes are left as they are; use [`Song::validate`] to check them.
    pub fn clamp(&mut self) {
        self.tempo = self.tempo.min(TEMPO_MAX);
        self.reverb = self.reverb.min(REVERB_MAX);
        self.blend = self.blend.min(BLEND_MAX);
        self.riff = self.riff.min(RIFF_MAX);
        self.detune = self.detune.min(DETUNE_MAX);
        self.muff = self.muff.min(MUFF_MAX);
        self.beats_per_bar = self.beats_per_bar.clamp(1, BEATS_PER_BAR_MAX);
        if !PARTS_PER_BEAT_OPTIONS.contains(&self.parts_per_beat) {
            self.parts_per_beat = PARTS_PER_BEAT_OPTIONS
                .iter()
                .copied()
                .min_by_key(|option| option.abs_diff(self.parts_per_beat))
                .unwrap_or(4);
        }
        self.bar_count = self.bar_count.clamp(1, BAR_COUNT_MAX);
        self.loop_start = self.loop_start.min(self.bar_count - 1);
        self.loop_length = self.loop_length.clamp(1, self.bar_count - self.loop_start);

        let channel_count = self.get_channel_count();
        self.channels.truncate(channel_count);
        while self.channels.len() < channel_count {
            let instrument = if self.get_channel_is_drum(self.channels.len()) {
                Instrument::noise(DrumKind::Retro)
            } else {
                Instrument::default()
            };
            self.channels
                .push(Channel::new(0, instrument, self.bar_count));
        }

        let bar_count = self.bar_count;
        for channel in self.channels.iter_mut() {
            channel.octave = channel.octave.min(OCTAVE_MAX);
            channel.instruments.truncate(INSTRUMENTS_MAX);
            if channel.instruments.is_empty() {
                channel.instruments.push(Instrument::default());
            }
            channel.patterns.truncate(PATTERNS_MAX);
            if channel.patterns.is_empty() {
                channel.patterns.push(Pattern::new(0));
            }
            channel.bars.resize(bar_count, 0);
            let pattern_count = channel.patterns.len();
            for bar in channel.bars.iter_mut() {
                if *bar > pattern_count {
                    *bar = 0;
                }
            }
            let instrument_count = channel.instruments.len();
            for pattern in channel.patterns.iter_mut() {
                pattern.instrument = pattern.instrument.min(instrument_count - 1);
            }
            for instrument in channel.instruments.iter_mut() {
                instrument.pan = instrument.pan.min(PAN_MAX);
                if let InstrumentKind::Fm(fm) = &mut instrument.kind {
                    fm.feedback_amplitude = fm.feedback_amplitude.min(OPERATOR_AMPLITUDE_MAX);
                    for op in fm.operators.iter_mut() {
                        op.amplitude = op.amplitude.min(OPERATOR_AMPLITUDE_MAX);
                    }
                }
            }
        }
    }
}

fn check_setting(name: &'static str, value: i64, min: i64, max: i64) -> Result<(), SongError> {
    if value < min || value > max {
        return Err(SongError::SettingOutOfRange {
            name,
            value,
            min,
            max,
        });
    }
    Ok(())
}

enum NoteError {
    PitchCount(usize),
    Pitch(i32),
    Pins,
}

fn validate_note(note: &Note, pitch_max: i32) -> Result<(), NoteError> {
    if note.pitches.is_empty() || note.pitches.len() > MAX_CHORD_SIZE {
        return Err(NoteError::PitchCount(note.pitches.len()));
    }
    if let Some(pitch) = note.pitches.iter().find(|p| **p < 0 || **p > pitch_max) {
        return Err(NoteError::Pitch(*pitch));
    }

    match note.pins.first() {
        Some(first) if first.time == 0 => {}
        _ => return Err(NoteError::Pins),
    }
    let sorted = note.pins.windows(2).all(|pair| pair[0].time < pair[1].time);
    let in_note = note.pins.iter().all(|pin| pin.time <= note.length());
    let volumes = note.pins.iter().all(|pin| pin.volume <= PIN_VOLUME_MAX);
    if !(sorted && in_note && volumes) {
        return Err(NoteError::Pins);
    }

    Ok(())
}
