//! Per-chunk voice parameters.
//!
//! Everything that only changes at tick rate is computed here once per chunk,
//! so that the voice loops only ramp and accumulate.

#[allow(unused_imports)]
use num_traits::float::Float;

use super::interpolator::{select_harmony, InterpolatedNote};
use crate::envelope::{envelope_value, Envelope};
use crate::fm::operator::OPERATOR_AMPLITUDE_MAX;
use crate::fm::OPERATOR_COUNT;
use crate::resources::drums::{drum_wave, DrumKind, DRUM_INTERVAL};
use crate::resources::sine::SINE_WAVE_LENGTH;
use crate::resources::waves::{chip_wave, pwm_wave, Wavetable};
use crate::song::instrument::{FmSettings, Instrument, InstrumentKind};
use crate::song::settings::Effect;
use crate::song::{Song, BLEND_CENTER, DETUNE_CENTER};
use crate::utils::units::{frequency_from_pitch, operator_amplitude_curve};
use crate::{SampleRate, TICKS_PER_PART};

const CHIP_BASE_VOLUME: f32 = 0.135;
const FM_BASE_VOLUME: f32 = 0.03;
const DRUM_BASE_VOLUME: f32 = 0.19;

/// Semitones per detune step.
const DETUNE_STEP: f32 = 0.04;
/// Semitones of extra chorus spread per riff step.
const RIFF_STEP: f32 = 0.03125;

/// Semitones over which a voice loses half its volume as its pitch rises.
const PITCH_DAMPING: f32 = 48.0;
const SOFT_DRUM_PITCH_DAMPING: f32 = 24.0;
const HARD_DRUM_PITCH_DAMPING: f32 = 60.0;
/// Pitch at which FM carriers play at full volume.
const FM_VOLUME_REFERENCE_PITCH: f32 = 60.0;

/// Scale of modulator outputs, in sine table samples.
const MODULATOR_SCALE: f32 = SINE_WAVE_LENGTH as f32 * 1.5;
/// Scale of the maximal feedback, in sine table samples.
const FEEDBACK_SCALE: f32 = SINE_WAVE_LENGTH as f32 * 0.3;

/// Parameters of one voice over one chunk.
///
/// Phase deltas are per sample, in cycles of the table for chip voices, in
/// wave samples for noise voices and in sine table samples for FM operators.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct VoiceParams {
    pub active: bool,
    pub wave: &'static [f32],
    pub phase_deltas: [f32; OPERATOR_COUNT],
    /// Per-sample multiplier of all phase deltas.
    pub phase_delta_scale: f32,
    pub volume_starts: [f32; OPERATOR_COUNT],
    pub volume_deltas: [f32; OPERATOR_COUNT],
    pub feedback_start: f32,
    pub feedback_delta: f32,
    /// One-pole lowpass coefficient.
    pub filter: f32,
    /// Per-sample multiplier of `filter`.
    pub filter_scale: f32,
    pub vibrato_scale: f32,
    pub tremolo_scale: f32,
    /// Gain of the second oscillator of chip voices, including the chorus sign.
    pub voice_b_gain: f32,
    pub pan_left: f32,
    pub pan_right: f32,
    pub reset_phases: bool,
}

/// Timing of the chunk being rendered.
#[derive(Debug, Clone, Copy)]
pub struct ChunkContext {
    pub sample_rate: SampleRate,
    pub samples: usize,
    pub seconds_per_tick: f32,
    pub parts_per_beat: usize,
    /// Ticks since the start of the bar.
    pub bar_ticks: usize,
}

impl ChunkContext {
    #[inline]
    fn seconds(&self, ticks: f32) -> f32 {
        ticks * self.seconds_per_tick
    }

    #[inline]
    fn beats(&self, ticks: f32) -> f32 {
        ticks / (TICKS_PER_PART * self.parts_per_beat) as f32
    }

    /// Per-sample ramp reaching `end` from `start` over the chunk.
    #[inline]
    fn delta(&self, start: f32, end: f32) -> f32 {
        (end - start) / self.samples as f32
    }

    /// Per-sample multiplier reaching `end` from `start` over the chunk.
    #[inline]
    fn scale(&self, start: f32, end: f32) -> f32 {
        if start > 0.0 && end > 0.0 {
            (end / start).powf(1.0 / self.samples as f32)
        } else {
            1.0
        }
    }

    /// Per-sample multiplier of a pitch bend of `semitones` over the chunk.
    #[inline]
    fn bend_scale(&self, semitones: f32) -> f32 {
        (semitones / (12.0 * self.samples as f32)).exp2()
    }
}

#[inline]
fn vibrato_scale(effect: Effect, part_time: f32) -> f32 {
    if effect.vibrato() > 0.0 && part_time >= effect.vibrato_delay() {
        (effect.vibrato() / 12.0).exp2() - 1.0
    } else {
        0.0
    }
}

/// Pitch of note pitch `0` in a pitched channel.
fn base_pitch(song: &Song, channel: usize, instrument: &Instrument) -> f32 {
    let octave = song.channels.get(channel).map_or(0, |c| c.octave as i32);
    let octave = octave + instrument.octave_offset as i32;
    (song.key.transpose() + octave * 12) as f32
}

/// Computes the parameters of `instrument` for the chunk described by `ctx`.
///
/// Without a sounding note, the voice is inactive.
pub fn compute_voice_params(
    song: &Song,
    channel: usize,
    instrument: &Instrument,
    note: Option<&InterpolatedNote>,
    ctx: &ChunkContext,
) -> VoiceParams {
    let Some(note) = note else {
        return VoiceParams::default();
    };

    let (pan_left, pan_right) = instrument.pan_gains();
    let mut params = VoiceParams {
        active: true,
        phase_delta_scale: ctx.bend_scale(note.interval_end - note.interval_start),
        filter: 1.0,
        filter_scale: 1.0,
        vibrato_scale: vibrato_scale(instrument.effect, note.part_time_start),
        tremolo_scale: instrument.effect.tremolo(),
        pan_left,
        pan_right,
        reset_phases: note.reset_phases,
        ..VoiceParams::default()
    };

    match &instrument.kind {
        InstrumentKind::Chip { wave } => {
            let table = chip_wave(song.mix.preset().wave_bank, *wave);
            chip_params(song, channel, instrument, table, note, ctx, &mut params);
        }
        InstrumentKind::Pwm { width } => {
            chip_params(song, channel, instrument, pwm_wave(*width), note, ctx, &mut params);
        }
        InstrumentKind::Noise { drum } => {
            noise_params(song, instrument, *drum, note, ctx, &mut params);
        }
        InstrumentKind::Fm(settings) => {
            fm_params(song, channel, instrument, settings, note, ctx, &mut params);
        }
    }

    params
}

fn chip_params(
    song: &Song,
    channel: usize,
    instrument: &Instrument,
    table: &'static Wavetable,
    note: &InterpolatedNote,
    ctx: &ChunkContext,
    params: &mut VoiceParams,
) {
    let chorus = instrument.chorus;
    let (pitch_a, pitch_b) = select_harmony(instrument.harmony, note.pitches(), ctx.bar_ticks);
    let detune = (song.detune as f32 - DETUNE_CENTER as f32) * DETUNE_STEP;
    let spread = chorus.interval() + song.riff as f32 * RIFF_STEP;
    let base = base_pitch(song, channel, instrument) + note.interval_start + chorus.offset() + detune;

    let pitch_start_a = base + pitch_a as f32 + spread;
    let pitch_start_b = base + pitch_b.unwrap_or(pitch_a) as f32 - spread;
    params.wave = &table.samples[..];
    params.phase_deltas[0] = frequency_from_pitch(pitch_start_a) * ctx.sample_rate.inv_sr;
    params.phase_deltas[1] = frequency_from_pitch(pitch_start_b) * ctx.sample_rate.inv_sr;

    let harmony_volume = pitch_b.map_or(1.0, |b| {
        (-((b - pitch_a).max(0) as f32) / PITCH_DAMPING).exp2()
    });
    let blend = song.blend as f32 / BLEND_CENTER as f32;
    params.voice_b_gain = chorus.sign() * harmony_volume * blend;

    let settings_volume = CHIP_BASE_VOLUME
        * table.volume
        * instrument.filter.volume()
        * chorus.volume()
        * song.mix.preset().chip_volume
        * instrument.volume_multiplier();
    let volume_start = settings_volume * note.transition_volume_start * note.envelope_volume_start;
    let volume_end = settings_volume * note.transition_volume_end * note.envelope_volume_end;
    params.volume_starts[0] = volume_start;
    params.volume_deltas[0] = ctx.delta(volume_start, volume_end);

    let filter = instrument.filter;
    let filter_at = |ticks: f32| (-(filter.base() + filter.decay() * ctx.seconds(ticks))).exp2().min(1.0);
    let filter_start = filter_at(note.decay_ticks_start);
    let filter_end = filter_at(note.decay_ticks_end);
    params.filter = filter_start;
    params.filter_scale = ctx.scale(filter_start, filter_end);
}

fn noise_params(
    song: &Song,
    instrument: &Instrument,
    drum: DrumKind,
    note: &InterpolatedNote,
    ctx: &ChunkContext,
    params: &mut VoiceParams,
) {
    let (pitch, _) = select_harmony(instrument.harmony, note.pitches(), ctx.bar_ticks);
    let base = drum.base_pitch();
    let pitch_start = base + (pitch as f32 + note.interval_start) * DRUM_INTERVAL;
    let frequency = frequency_from_pitch(pitch_start);

    params.wave = drum_wave(drum);
    params.phase_deltas[0] = frequency * ctx.sample_rate.inv_sr;
    params.phase_delta_scale =
        ctx.bend_scale((note.interval_end - note.interval_start) * DRUM_INTERVAL);
    params.filter = (frequency * ctx.sample_rate.inv_sr * drum.pitch_filter_mult()).min(1.0);
    params.vibrato_scale = 0.0;

    let damping = if drum.is_soft() {
        SOFT_DRUM_PITCH_DAMPING
    } else {
        HARD_DRUM_PITCH_DAMPING
    };
    let pitch_volume = (-(pitch_start - base) / damping).exp2();
    let settings_volume = DRUM_BASE_VOLUME
        * drum.volume()
        * song.mix.preset().drum_volume
        * instrument.volume_multiplier()
        * pitch_volume;
    let volume_start = settings_volume * note.transition_volume_start * note.envelope_volume_start;
    let volume_end = settings_volume * note.transition_volume_end * note.envelope_volume_end;
    params.volume_starts[0] = volume_start;
    params.volume_deltas[0] = ctx.delta(volume_start, volume_end);
}

fn fm_params(
    song: &Song,
    channel: usize,
    instrument: &Instrument,
    settings: &FmSettings,
    note: &InterpolatedNote,
    ctx: &ChunkContext,
    params: &mut VoiceParams,
) {
    let algorithm = settings.algorithm;
    let pitches = note.pitches();
    let (pitch_a, _) = select_harmony(instrument.harmony, pitches, ctx.bar_ticks);
    let spread = instrument.harmony.spreads_operators() && pitches.len() > 1;
    let detune = (song.detune as f32 - DETUNE_CENTER as f32) * DETUNE_STEP;
    let base = base_pitch(song, channel, instrument) + note.interval_start + detune;

    let seconds_start = ctx.seconds(note.decay_ticks_start);
    let seconds_end = ctx.seconds(note.decay_ticks_end);
    let beats_start = ctx.beats(note.decay_ticks_start);
    let beats_end = ctx.beats(note.decay_ticks_end);
    let envelope_at = |envelope: Envelope, start: bool| {
        if start {
            envelope_value(envelope, seconds_start, beats_start, note.envelope_volume_start)
        } else {
            envelope_value(envelope, seconds_end, beats_end, note.envelope_volume_end)
        }
    };

    let amplitude_max = OPERATOR_AMPLITUDE_MAX as f32;
    let mut volume_ends = [0.0; OPERATOR_COUNT];
    let mut total_carrier_volume = 0.0;
    let mut sine_volume_boost = 1.0;

    for (op, operator) in settings.operators.iter().enumerate() {
        let pitch = if spread {
            let carrier = algorithm.associated_carrier(op);
            let index = if op < pitches.len() {
                op
            } else if carrier < pitches.len() {
                carrier
            } else {
                0
            };
            pitches[index]
        } else {
            pitch_a
        };
        let pitch_start = base + pitch as f32;
        let frequency = frequency_from_pitch(pitch_start) * operator.frequency.multiplier()
            + operator.frequency.hz_offset();
        params.phase_deltas[op] =
            frequency.max(0.0) * ctx.sample_rate.inv_sr * SINE_WAVE_LENGTH as f32;

        let amplitude = operator_amplitude_curve(operator.amplitude as f32)
            * operator.frequency.amplitude_sign();
        let envelope_start = envelope_at(operator.envelope, true);
        let envelope_end = envelope_at(operator.envelope, false);

        if algorithm.is_carrier(op) {
            let pitch_volume = (-(pitch_start - FM_VOLUME_REFERENCE_PITCH) / PITCH_DAMPING).exp2();
            total_carrier_volume += amplitude.abs() * envelope_start;
            params.volume_starts[op] =
                amplitude * envelope_start * note.transition_volume_start * pitch_volume;
            volume_ends[op] = amplitude * envelope_end * note.transition_volume_end * pitch_volume;
        } else {
            sine_volume_boost *= 1.0 - (operator.amplitude as f32 / amplitude_max).min(1.0);
            params.volume_starts[op] = amplitude * envelope_start * MODULATOR_SCALE;
            volume_ends[op] = amplitude * envelope_end * MODULATOR_SCALE;
        }
    }

    let feedback_amplitude = settings.feedback_amplitude as f32 / amplitude_max;
    sine_volume_boost *= 1.0 - feedback_amplitude.min(1.0);
    sine_volume_boost *= 1.0 - ((total_carrier_volume - 1.0).max(0.0) / 2.0).min(1.0);

    let carrier_gain = (1.0 + sine_volume_boost * song.mix.preset().fm_carrier_boost)
        * FM_BASE_VOLUME
        * instrument.volume_multiplier();
    for op in 0..algorithm.carrier_count() {
        params.volume_starts[op] *= carrier_gain;
        volume_ends[op] *= carrier_gain;
    }
    for op in 0..OPERATOR_COUNT {
        params.volume_deltas[op] = ctx.delta(params.volume_starts[op], volume_ends[op]);
    }

    let feedback = FEEDBACK_SCALE * feedback_amplitude;
    let feedback_start = feedback * envelope_at(settings.feedback_envelope, true);
    let feedback_end = feedback * envelope_at(settings.feedback_envelope, false);
    params.feedback_start = feedback_start;
    params.feedback_delta = ctx.delta(feedback_start, feedback_end);
}
