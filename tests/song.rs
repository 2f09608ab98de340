//! Tests for the song model

mod songs;

use chiptrack_dsp::error::SongError;
use chiptrack_dsp::resources::drums::DrumKind;
use chiptrack_dsp::song::instrument::Instrument;
use chiptrack_dsp::song::note::{Note, Pattern, Pin};
use chiptrack_dsp::song::settings::{Key, Scale, Transition};
use chiptrack_dsp::song::{Song, PITCH_MAX, TEMPO_MAX};

use songs::*;

#[test]
fn default_song_is_valid() {
    let song = Song::default();

    assert_eq!(song.get_channel_count(), 4);
    assert!(!song.get_channel_is_drum(2));
    assert!(song.get_channel_is_drum(3));
    assert_eq!(song.validate(), Ok(()));
    assert_eq!(full_band().validate(), Ok(()));
}

#[test]
fn tempo_curve() {
    let mut song = Song::new(1, 0);
    song.tempo = 4;
    assert_eq!(song.get_beats_per_minute(), 120.0);
    song.tempo = 13;
    assert!((song.get_beats_per_minute() - 240.0).abs() < 1e-3);
}

#[test]
fn patterns_and_instruments_of_bars() {
    let mut song = full_band();
    song.channels[0].instruments.push(Instrument::default());
    song.channels[0].patterns.push(Pattern::new(1));
    song.channels[0].bars[2] = 2;
    song.channels[0].bars[3] = 0;

    assert_eq!(song.get_pattern_instrument(0, 2), 1);
    assert_eq!(song.get_pattern_instrument(0, 3), 0);
    assert!(song.get_pattern(0, 3).is_none());
    assert!(song.get_pattern(0, 999).is_none());
    assert!(song.get_pattern(42, 0).is_none());
    assert!(song.get_instrument(0, 3).is_some());
}

#[test]
fn note_lookup() {
    let pattern = Pattern::new(0)
        .with_note(Note::new(0, 2, 4, 3))
        .with_note(Note::new(5, 4, 8, 3));

    assert_eq!(pattern.note_at(0), None);
    assert_eq!(pattern.note_at(2), Some(0));
    assert_eq!(pattern.note_at(3), Some(0));
    assert_eq!(pattern.note_at(4), Some(1));
    assert_eq!(pattern.note_at(8), None);
}

#[test]
fn pins_stay_sorted() {
    let note = Note::new(3, 0, 8, 3)
        .with_pin(Pin::new(4, 2, 1))
        .with_pin(Pin::new(8, 5, 0));

    let times: Vec<usize> = note.pins.iter().map(|pin| pin.time).collect();
    assert_eq!(times, vec![0, 4, 8]);
    assert_eq!(note.start_pitch(), 3);
    assert_eq!(note.end_pitch(), 8);
    assert_eq!(note.length(), 8);
}

#[test]
fn validation_errors() {
    let mut song = full_band();
    song.tempo = TEMPO_MAX + 1;
    assert!(matches!(
        song.validate(),
        Err(SongError::SettingOutOfRange { name: "tempo", .. })
    ));

    let mut song = full_band();
    song.parts_per_beat = 7;
    assert_eq!(
        song.validate(),
        Err(SongError::UnsupportedPartsPerBeat { value: 7 })
    );

    let mut song = full_band();
    song.loop_start = 15;
    assert!(matches!(song.validate(), Err(SongError::LoopOutOfRange { .. })));

    let mut song = full_band();
    song.channels.pop();
    assert_eq!(
        song.validate(),
        Err(SongError::ChannelCountMismatch {
            expected: 3,
            found: 2
        })
    );

    let mut song = full_band();
    song.channels[0].bars[0] = 9;
    assert!(matches!(
        song.validate(),
        Err(SongError::PatternOutOfRange {
            channel: 0,
            bar: 0,
            pattern: 9
        })
    ));

    let mut song = full_band();
    song.channels[0].instruments[0] = Instrument::noise(DrumKind::Deep);
    assert!(matches!(
        song.validate(),
        Err(SongError::InstrumentKindMismatch { channel: 0, .. })
    ));

    let mut song = full_band();
    song.channels[0].patterns[0] = Pattern::new(0)
        .with_note(Note::new(0, 0, 8, 3))
        .with_note(Note::new(0, 4, 12, 3));
    assert!(matches!(
        song.validate(),
        Err(SongError::NoteOutOfOrder { note: 1, .. })
    ));

    let mut song = full_band();
    song.channels[0].patterns[0] = Pattern::new(0).with_note(Note::new(PITCH_MAX + 1, 0, 8, 3));
    assert!(matches!(
        song.validate(),
        Err(SongError::PitchOutOfRange { .. })
    ));

    let mut song = full_band();
    song.channels[2].patterns[0] = Pattern::new(0).with_note(Note::new(12, 0, 8, 3));
    assert!(matches!(
        song.validate(),
        Err(SongError::PitchOutOfRange { channel: 2, .. })
    ));

    let mut song = full_band();
    let mut note = Note::new(0, 0, 8, 3);
    note.pins.remove(0);
    song.channels[0].patterns[0] = Pattern::new(0).with_note(note);
    assert!(matches!(
        song.validate(),
        Err(SongError::MalformedPins { .. })
    ));
}

#[test]
fn clamp_repairs_settings() {
    let mut song = full_band();
    song.tempo = 200;
    song.reverb = 9;
    song.parts_per_beat = 7;
    song.loop_start = 40;
    song.loop_length = 0;
    song.channels[0].bars[1] = 77;
    song.channels[0].patterns[0].instrument = 5;
    song.channels[1].instruments[0].pan = 20;
    song.channels.pop();

    song.clamp();

    assert_eq!(song.tempo, TEMPO_MAX);
    assert_eq!(song.reverb, 4);
    assert_eq!(song.parts_per_beat, 6);
    assert_eq!(song.loop_start, song.bar_count - 1);
    assert_eq!(song.loop_length, 1);
    assert_eq!(song.channels.len(), song.get_channel_count());
    assert_eq!(song.channels[0].bars[1], 0);
    assert_eq!(song.channels[0].patterns[0].instrument, 0);
    assert_eq!(song.channels[1].instruments[0].pan, 8);
    assert_eq!(song.validate(), Ok(()));
}

#[test]
fn transitions_that_tie_notes() {
    let tied: Vec<Transition> = Transition::ALL
        .iter()
        .copied()
        .filter(|transition| transition.continues_previous())
        .collect();

    assert_eq!(
        tied,
        vec![Transition::Seamless, Transition::Smooth, Transition::Slide]
    );
}

#[test]
fn keys_and_scales() {
    assert_eq!(Key::C.transpose(), 12);
    assert_eq!(Key::A.transpose(), 21);
    assert_eq!(Key::from_index(12), None);

    assert!(Scale::NormalMajor.contains(4));
    assert!(!Scale::NormalMajor.contains(3));
    assert!(Scale::NormalMinor.contains(3));
    assert!(Scale::Expert.contains(-1));
}
