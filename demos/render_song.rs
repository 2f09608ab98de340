//! Renders a short song through the player queue into `out/render_song.wav`.

use hound::{SampleFormat, WavSpec, WavWriter};
use simple_logger::SimpleLogger;

use chiptrack_dsp::envelope::Envelope;
use chiptrack_dsp::fm::algorithms::Algorithm;
use chiptrack_dsp::fm::feedback::Feedback;
use chiptrack_dsp::fm::operator::{Operator, OperatorFrequency};
use chiptrack_dsp::player::synth_pair;
use chiptrack_dsp::resources::drums::DrumKind;
use chiptrack_dsp::resources::waves::PulseWidth;
use chiptrack_dsp::song::instrument::{FmSettings, Instrument};
use chiptrack_dsp::song::note::{Note, Pattern, Pin};
use chiptrack_dsp::song::settings::{Chorus, Effect, Filter, Harmony, Transition};
use chiptrack_dsp::song::Song;
use chiptrack_dsp::synth::Synth;
use chiptrack_dsp::SampleRate;

const SAMPLE_RATE: u32 = 44100;
const BLOCK_SIZE: usize = 256;

fn build_song() -> Song {
    let mut song = Song::new(3, 1);
    song.tempo = 6;
    song.reverb = 2;
    song.bar_count = 4;
    song.loop_start = 0;
    song.loop_length = 4;
    let parts = song.parts_per_bar();

    let mut lead = Instrument::pwm(PulseWidth::Quarter);
    lead.transition = Transition::Slide;
    lead.effect = Effect::VibratoDelayed;
    lead.filter = Filter::DecayBright;
    lead.chorus = Chorus::Shimmer;
    let melody = Pattern::new(0)
        .with_note(Note::new(12, 0, 6, 3))
        .with_note(Note::new(16, 6, 8, 2))
        .with_note(Note::new(19, 8, 16, 3).with_pin(Pin::new(8, 2, 1)))
        .with_note(Note::new(17, 20, parts, 3));

    let mut pad = Instrument::fm(FmSettings {
        algorithm: Algorithm::TwoPairs,
        feedback: Feedback::Self1,
        feedback_amplitude: 4,
        feedback_envelope: Envelope::Pluck2,
        operators: [
            Operator::new(OperatorFrequency::X1, 15, Envelope::Custom),
            Operator::new(OperatorFrequency::X2, 9, Envelope::Swell2),
            Operator::new(OperatorFrequency::X3, 8, Envelope::Pluck1),
            Operator::new(OperatorFrequency::X1, 5, Envelope::Tremolo2),
        ],
    });
    pad.harmony = Harmony::Chord;
    pad.transition = Transition::Smooth;
    let chords = Pattern::new(0).with_note(Note::with_pitches(&[0, 4, 7], 0, parts, 2));

    let mut bass = Instrument::default();
    bass.transition = Transition::Sudden;
    let mut line = Pattern::new(0);
    for start in (0..parts).step_by(4) {
        line = line.with_note(Note::new(if start % 8 == 0 { 0 } else { 12 }, start, start + 3, 3));
    }

    let mut beat = Pattern::new(0);
    for start in (0..parts).step_by(4) {
        beat = beat.with_note(Note::new(if start % 8 == 0 { 2 } else { 7 }, start, start + 1, 3));
    }

    let channels = [
        (lead, melody),
        (pad, chords),
        (bass, line),
        (Instrument::noise(DrumKind::Snare), beat),
    ];
    for (channel, (instrument, pattern)) in song.channels.iter_mut().zip(channels) {
        channel.instruments[0] = instrument;
        channel.patterns[0] = pattern;
        channel.bars.truncate(4);
        channel.bars.fill(1);
    }

    song
}

fn main() {
    SimpleLogger::new()
        .with_level(log::LevelFilter::Debug)
        .init()
        .unwrap();

    let song = build_song();
    if let Err(err) = song.validate() {
        log::error!("invalid song: {err}");
        return;
    }

    let mut synth = Synth::new(SampleRate::new(SAMPLE_RATE as f32));
    synth.loop_repeat_count = 1;
    synth.enable_outro = true;
    let (mut handle, mut processor) = synth_pair(synth);

    handle.set_song(song).unwrap();
    handle.snap_to_start().unwrap();
    handle.play().unwrap();

    std::fs::create_dir_all("out").ok();
    let spec = WavSpec {
        channels: 2,
        sample_rate: SAMPLE_RATE,
        bits_per_sample: 32,
        sample_format: SampleFormat::Float,
    };
    let mut writer = WavWriter::create("out/render_song.wav", spec).unwrap();

    let mut left = [0.0; BLOCK_SIZE];
    let mut right = [0.0; BLOCK_SIZE];
    loop {
        processor.process(&mut left, &mut right);
        for (l, r) in left.iter().zip(right.iter()) {
            writer.write_sample(*l).unwrap();
            writer.write_sample(*r).unwrap();
        }

        let status = handle.poll_status();
        if status.ended || !status.playing {
            log::info!("rendered {:.2} s", processor.synth().total_seconds());
            break;
        }
    }

    writer.finalize().unwrap();
}
