//! Resolves the note sounding in a channel and interpolates its pins over one
//! chunk of samples.
//!
//! Pins are evaluated at tick resolution: values are computed at the start and
//! the end of the current tick, then linearly interpolated to the chunk, which
//! never straddles two ticks.

use crate::song::note::{Note, Pattern, MAX_CHORD_SIZE, PIN_VOLUME_MAX};
use crate::song::settings::{Harmony, Transition};
use crate::utils::crossfade;
use crate::utils::units::volume_conversion;
use crate::TICKS_PER_PART;

/// Interval a trill or bow starts from, a maximal glide into the note.
pub const TRILL_INTERVAL: f32 = 100.0;

/// Transition volume of the first tick of a clicked note.
pub const CLICK_VOLUME: f32 = 2.0;

/// Transport position of a chunk within the current bar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickPosition {
    /// Parts since the start of the bar.
    pub time: usize,
    /// Tick within the part.
    pub arpeggio: usize,
    /// Elapsed fraction of the tick at the first sample of the chunk.
    pub start_ratio: f32,
    /// Elapsed fraction of the tick after the last sample of the chunk.
    pub end_ratio: f32,
    /// Whether the chunk starts exactly at the start of the tick.
    pub tick_start: bool,
}

impl TickPosition {
    /// Ticks since the start of the bar, used to cycle through arpeggios.
    #[inline]
    pub fn ticks(&self) -> usize {
        self.time * TICKS_PER_PART + self.arpeggio
    }
}

/// State of the sounding note over one chunk.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InterpolatedNote {
    pub pitches: [i32; MAX_CHORD_SIZE],
    pub pitch_count: usize,
    /// Semitones added to the pitches.
    pub interval_start: f32,
    pub interval_end: f32,
    /// Fade multiplier applied at note edges.
    pub transition_volume_start: f32,
    pub transition_volume_end: f32,
    /// Converted pin volume in `0.0..=1.0`.
    pub envelope_volume_start: f32,
    pub envelope_volume_end: f32,
    /// Parts since the start of this note.
    pub part_time_start: f32,
    pub part_time_end: f32,
    /// Ticks since the start of the note, carried over from a tied previous note.
    pub decay_ticks_start: f32,
    pub decay_ticks_end: f32,
    pub reset_phases: bool,
}

impl InterpolatedNote {
    /// A note held by the live keyboard for `ticks` ticks.
    pub fn held(pitch: i32, ticks: usize, position: &TickPosition) -> Self {
        let mut pitches = [0; MAX_CHORD_SIZE];
        pitches[0] = pitch;
        let start = ticks as f32 + position.start_ratio;
        let end = ticks as f32 + position.end_ratio;
        let ticks_per_part = TICKS_PER_PART as f32;

        Self {
            pitches,
            pitch_count: 1,
            interval_start: 0.0,
            interval_end: 0.0,
            transition_volume_start: 1.0,
            transition_volume_end: 1.0,
            envelope_volume_start: 1.0,
            envelope_volume_end: 1.0,
            part_time_start: start / ticks_per_part,
            part_time_end: end / ticks_per_part,
            decay_ticks_start: start,
            decay_ticks_end: end,
            reset_phases: false,
        }
    }

    #[inline]
    pub fn pitches(&self) -> &[i32] {
        &self.pitches[..self.pitch_count]
    }
}

/// Interval and volume of the pins of `note`, `tick` ticks after it starts.
fn pin_values(note: &Note, tick: usize) -> (f32, f32) {
    for pair in note.pins.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        let tick_a = a.time * TICKS_PER_PART;
        let tick_b = b.time * TICKS_PER_PART;
        if tick <= tick_b {
            let ratio = if tick_b > tick_a {
                (tick.saturating_sub(tick_a)) as f32 / (tick_b - tick_a) as f32
            } else {
                0.0
            };
            return (
                crossfade(a.interval as f32, b.interval as f32, ratio),
                crossfade(a.volume as f32, b.volume as f32, ratio),
            );
        }
    }

    note.pins
        .last()
        .map_or((0.0, PIN_VOLUME_MAX as f32), |pin| {
            (pin.interval as f32, pin.volume as f32)
        })
}

/// Offset gliding from `offset` at the note start to nothing at the end of the first pin.
fn glide_in(note: &Note, tick: usize, offset: f32) -> f32 {
    let length = note
        .pins
        .get(1)
        .map_or(note.length(), |pin| pin.time)
        .max(1)
        * TICKS_PER_PART;
    offset * (1.0 - tick as f32 / length as f32).max(0.0)
}

/// Offset gliding from nothing at the last pin to `offset` at the note end.
fn glide_out(note: &Note, tick: usize, offset: f32) -> f32 {
    let pins = &note.pins;
    let from = if pins.len() >= 2 {
        pins[pins.len() - 2].time
    } else {
        0
    } * TICKS_PER_PART;
    let to = note.length() * TICKS_PER_PART;
    if to <= from {
        return 0.0;
    }
    offset * (tick.saturating_sub(from) as f32 / (to - from) as f32).clamp(0.0, 1.0)
}

/// Interpolates note `index` of `pattern` over the chunk at `position`.
pub fn interpolate_note(
    pattern: &Pattern,
    index: usize,
    transition: Transition,
    position: &TickPosition,
) -> InterpolatedNote {
    let note = &pattern.notes[index];
    let prev = index
        .checked_sub(1)
        .and_then(|i| pattern.notes.get(i))
        .filter(|prev| prev.end == note.start);
    let next = pattern
        .notes
        .get(index + 1)
        .filter(|next| next.start == note.end);

    let note_ticks = note.length() * TICKS_PER_PART;
    let tick = (position.time - note.start) * TICKS_PER_PART + position.arpeggio;
    let tick_end = tick + 1;
    let first_tick = tick == 0;
    let last_tick = tick_end >= note_ticks;
    let tied = prev.is_some() && transition.continues_previous();

    let (mut interval_start, volume_start) = pin_values(note, tick);
    let (mut interval_end, volume_end) = pin_values(note, tick_end);
    let mut envelope_start = volume_conversion(volume_start);
    let envelope_end = volume_conversion(volume_end);
    let mut transition_start = 1.0;
    let mut transition_end = 1.0;

    match transition {
        Transition::Seamless => {}
        Transition::Sudden => {
            if first_tick {
                transition_start = 0.0;
            }
        }
        Transition::Smooth => {
            if let Some(prev) = prev {
                let offset = (prev.end_pitch() - note.start_pitch()) as f32 * 0.5;
                interval_start += glide_in(note, tick, offset);
                interval_end += glide_in(note, tick_end, offset);
            } else if first_tick {
                transition_start = 0.0;
            }
            if let Some(next) = next {
                let offset = (next.start_pitch() - note.end_pitch()) as f32 * 0.5;
                interval_start += glide_out(note, tick, offset);
                interval_end += glide_out(note, tick_end, offset);
            } else if last_tick {
                transition_end = 0.0;
            }
        }
        Transition::Slide => {
            if let Some(prev) = prev {
                let offset = (prev.end_pitch() - note.start_pitch()) as f32;
                interval_start += glide_in(note, tick, offset);
                interval_end += glide_in(note, tick_end, offset);
            }
        }
        Transition::Trill => {
            if first_tick {
                interval_start = TRILL_INTERVAL;
            }
        }
        Transition::Click => {
            if first_tick {
                interval_start = TRILL_INTERVAL;
                transition_start = CLICK_VOLUME;
            }
        }
        Transition::Bow => {
            if first_tick {
                interval_start = -TRILL_INTERVAL;
                transition_start = 0.0;
            }
            if last_tick && next.is_none() {
                transition_end = 0.0;
            }
        }
        Transition::Blip => {
            if first_tick {
                envelope_start = volume_conversion(PIN_VOLUME_MAX as f32);
            }
            if last_tick {
                transition_end = 0.0;
            }
        }
    }

    let carried_ticks = match prev {
        Some(prev) if tied => (prev.length() * TICKS_PER_PART) as f32,
        _ => 0.0,
    };
    let tick_start_time = tick as f32 + position.start_ratio;
    let tick_end_time = tick as f32 + position.end_ratio;
    let ticks_per_part = TICKS_PER_PART as f32;

    let mut pitches = [0; MAX_CHORD_SIZE];
    let pitch_count = note.pitches.len().min(MAX_CHORD_SIZE);
    pitches[..pitch_count].copy_from_slice(&note.pitches[..pitch_count]);

    InterpolatedNote {
        pitches,
        pitch_count,
        interval_start: crossfade(interval_start, interval_end, position.start_ratio),
        interval_end: crossfade(interval_start, interval_end, position.end_ratio),
        transition_volume_start: crossfade(transition_start, transition_end, position.start_ratio),
        transition_volume_end: crossfade(transition_start, transition_end, position.end_ratio),
        envelope_volume_start: crossfade(envelope_start, envelope_end, position.start_ratio),
        envelope_volume_end: crossfade(envelope_start, envelope_end, position.end_ratio),
        part_time_start: tick_start_time / ticks_per_part,
        part_time_end: tick_end_time / ticks_per_part,
        decay_ticks_start: carried_ticks + tick_start_time,
        decay_ticks_end: carried_ticks + tick_end_time,
        reset_phases: first_tick && position.tick_start && !tied,
    }
}

/// Picks the pitch of an arpeggio from the tick counter.
fn cycle(pitches: &[i32], counter: usize) -> i32 {
    const THREE_NOTE_PATTERN: [usize; 4] = [0, 1, 2, 1];
    match pitches.len() {
        0 => 0,
        3 => pitches[THREE_NOTE_PATTERN[counter % 4]],
        n => pitches[counter % n],
    }
}

/// Pitches of the two voices of a channel according to its harmony.
///
/// `counter` counts ticks since the start of the bar.
pub fn select_harmony(harmony: Harmony, pitches: &[i32], counter: usize) -> (i32, Option<i32>) {
    let root = pitches.first().copied().unwrap_or(0);
    let chord = pitches.len() > 1;
    match harmony {
        Harmony::Arpeggio => (cycle(pitches, counter), None),
        Harmony::HalfArpeggio => (cycle(pitches, counter / 2), None),
        Harmony::Duet => (root, pitches.get(1).copied()),
        Harmony::Chord => (root, pitches.last().copied().filter(|_| chord)),
        Harmony::Seventh => (root, chord.then(|| cycle(&pitches[1..], counter))),
        Harmony::ArpChord => (cycle(pitches, counter), chord.then_some(root)),
    }
}
