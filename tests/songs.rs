//! Songs used by the tests

#![allow(dead_code)]

use chiptrack_dsp::fm::algorithms::Algorithm;
use chiptrack_dsp::fm::feedback::Feedback;
use chiptrack_dsp::fm::operator::{Operator, OperatorFrequency};
use chiptrack_dsp::envelope::Envelope;
use chiptrack_dsp::resources::drums::DrumKind;
use chiptrack_dsp::song::instrument::{FmSettings, Instrument};
use chiptrack_dsp::song::note::{Note, Pattern};
use chiptrack_dsp::song::settings::Transition;
use chiptrack_dsp::song::Song;
use chiptrack_dsp::SampleRate;

pub const SAMPLE_RATE_HZ: f32 = 44100.0;

pub fn sample_rate() -> SampleRate {
    SampleRate::new(SAMPLE_RATE_HZ)
}

/// Pitch of A4 in the first channel of a song in C: key 12 + octave 3 * 12 + 21.
pub const A4: i32 = 21;

/// One pitched channel at 120 bpm, playing `pattern` in every bar.
pub fn single_channel(instrument: Instrument, pattern: Pattern) -> Song {
    let mut song = Song::new(1, 0);
    song.tempo = 4;
    let channel = &mut song.channels[0];
    channel.instruments[0] = instrument;
    channel.patterns[0] = pattern;
    channel.bars.fill(1);
    song
}

/// One note holding `pitch` over the whole bar at full volume.
pub fn single_note(instrument: Instrument, pitch: i32) -> Song {
    let parts = Song::new(1, 0).parts_per_bar();
    single_channel(instrument, Pattern::new(0).with_note(Note::new(pitch, 0, parts, 3)))
}

/// Two adjacent notes of the same pitch splitting the bar in halves.
pub fn two_notes(transition: Transition, pitch: i32) -> Song {
    let parts = Song::new(1, 0).parts_per_bar();
    let mut instrument = Instrument::default();
    instrument.transition = transition;
    let pattern = Pattern::new(0)
        .with_note(Note::new(pitch, 0, parts / 2, 3))
        .with_note(Note::new(pitch, parts / 2, parts, 3));
    single_channel(instrument, pattern)
}

/// One drum channel at 120 bpm, hitting `pitch` over the whole bar.
pub fn single_drum(drum: DrumKind, transition: Transition, pitch: i32) -> Song {
    let mut song = Song::new(0, 1);
    song.tempo = 4;
    let parts = song.parts_per_bar();
    let mut instrument = Instrument::noise(drum);
    instrument.transition = transition;
    let channel = &mut song.channels[0];
    channel.instruments[0] = instrument;
    channel.patterns[0] = Pattern::new(0).with_note(Note::new(pitch, 0, parts, 3));
    channel.bars.fill(1);
    song
}

/// A note over the first quarter of the bar, then silence.
pub fn short_note(instrument: Instrument, pitch: i32) -> Song {
    let parts = Song::new(1, 0).parts_per_bar();
    single_channel(instrument, Pattern::new(0).with_note(Note::new(pitch, 0, parts / 4, 3)))
}

pub fn bell() -> FmSettings {
    FmSettings {
        algorithm: Algorithm::TwoPairs,
        feedback: Feedback::Self1,
        feedback_amplitude: 5,
        feedback_envelope: Envelope::Pluck2,
        operators: [
            Operator::new(OperatorFrequency::X1, 15, Envelope::Custom),
            Operator::new(OperatorFrequency::X2, 10, Envelope::Custom),
            Operator::new(OperatorFrequency::X3, 9, Envelope::Pluck1),
            Operator::new(OperatorFrequency::X1, 6, Envelope::Steady),
        ],
    }
}

/// A chip lead, an FM chord and a drum beat, with reverb.
pub fn full_band() -> Song {
    let mut song = Song::new(2, 1);
    song.tempo = 6;
    song.reverb = 2;
    let parts = song.parts_per_bar();

    let lead = &mut song.channels[0];
    lead.patterns[0] = Pattern::new(0)
        .with_note(Note::new(12, 0, 8, 3))
        .with_note(Note::new(16, 8, 16, 2))
        .with_note(Note::new(19, 16, parts, 3));
    lead.bars.fill(1);

    let pad = &mut song.channels[1];
    pad.instruments[0] = Instrument::fm(bell());
    pad.patterns[0] = Pattern::new(0).with_note(Note::with_pitches(&[0, 4, 7], 0, parts, 3));
    pad.bars.fill(1);

    let drums = &mut song.channels[2];
    drums.instruments[0] = Instrument::noise(DrumKind::Snare);
    let mut beat = Pattern::new(0);
    for start in (0..parts).step_by(8) {
        beat = beat.with_note(Note::new(4, start, start + 2, 3));
    }
    drums.patterns[0] = beat;
    drums.bars.fill(1);

    song
}
