//! Sample-accurate transport and the buffer-fill loop.
//!
//! Audio is rendered in chunks that never cross a tick, so that every voice
//! parameter can be computed once per chunk. The bar routine is looked up again
//! at every beat, since the live note may change the channel layout.

#[allow(unused_imports)]
use num_traits::float::Float;

use super::interpolator::{interpolate_note, InterpolatedNote, TickPosition};
use super::params::{compute_voice_params, ChunkContext};
use super::routine::{BarRoutine, VoiceTag};
use super::{samples_per_arpeggio, Synth, MAX_CHUNK_SIZE};
use crate::fx::reverb::reverb_amount;
use crate::song::Song;
use crate::TICKS_PER_PART;

use alloc::sync::Arc;

/// Why a bar routine returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RoutineExit {
    BufferFull,
    BeatBoundary,
}

impl Synth {
    /// Fills both buffers with the next frames of the song.
    ///
    /// Buffers are zero-filled first, so without a song, while paused or after
    /// the end of the song they are left silent.
    pub fn synthesize(&mut self, out_left: &mut [f32], out_right: &mut [f32]) {
        let frames = out_left.len().min(out_right.len());
        out_left.fill(0.0);
        out_right.fill(0.0);

        let Some(song) = self.song.clone() else {
            return;
        };
        if !self.playing {
            return;
        }

        let spa = samples_per_arpeggio(&song, self.sample_rate);
        if self.arpeggio_sample_countdown == 0 || self.arpeggio_sample_countdown > spa {
            self.arpeggio_sample_countdown = spa;
        }
        self.normalize_position(&song);

        let mut offset = 0;
        while offset < frames && self.playing {
            let routine = self.bar_routine(&song);
            let (rendered, exit) = self.run_routine(
                &song,
                &routine,
                spa,
                &mut out_left[offset..frames],
                &mut out_right[offset..frames],
            );
            offset += rendered;
            if exit == RoutineExit::BufferFull {
                break;
            }
        }

        self.update_playhead(&song);
    }

    /// Renders until the buffer is full or a beat ends.
    fn run_routine(
        &mut self,
        song: &Song,
        routine: &BarRoutine,
        spa: usize,
        left: &mut [f32],
        right: &mut [f32],
    ) -> (usize, RoutineExit) {
        let frames = left.len();
        let mut offset = 0;

        while offset < frames {
            let samples = (frames - offset)
                .min(self.arpeggio_sample_countdown)
                .min(MAX_CHUNK_SIZE);
            self.render_chunk(
                song,
                routine,
                spa,
                &mut left[offset..offset + samples],
                &mut right[offset..offset + samples],
            );
            offset += samples;
            self.arpeggio_sample_countdown -= samples;

            if self.arpeggio_sample_countdown == 0 {
                self.arpeggio_sample_countdown = spa;
                if self.advance_tick(song) {
                    return (offset, RoutineExit::BeatBoundary);
                }
            }
        }

        (offset, RoutineExit::BufferFull)
    }

    fn render_chunk(
        &mut self,
        song: &Song,
        routine: &BarRoutine,
        spa: usize,
        left: &mut [f32],
        right: &mut [f32],
    ) {
        let samples = left.len();
        let countdown = self.arpeggio_sample_countdown;
        let position = TickPosition {
            time: self.beat * song.parts_per_beat + self.part,
            arpeggio: self.arpeggio,
            start_ratio: 1.0 - countdown as f32 / spa as f32,
            end_ratio: 1.0 - (countdown - samples) as f32 / spa as f32,
            tick_start: countdown == spa,
        };
        let ctx = ChunkContext {
            sample_rate: self.sample_rate,
            samples,
            seconds_per_tick: spa as f32 * self.sample_rate.inv_sr,
            parts_per_beat: song.parts_per_beat,
            bar_ticks: position.ticks(),
        };

        self.fill_lfo(samples, spa);
        self.bus_left[..samples].fill(0.0);
        self.bus_right[..samples].fill(0.0);
        self.send_left[..samples].fill(0.0);
        self.send_right[..samples].fill(0.0);

        let channel_count = routine
            .channel_count()
            .min(self.channels.len())
            .min(song.channels.len());

        for c in 0..channel_count {
            let (Some(voice), Some(instrument)) =
                (routine.voice(c), song.get_instrument(c, self.bar))
            else {
                continue;
            };
            let note = self.channel_note(song, c, &position);
            let params = compute_voice_params(song, c, instrument, note.as_ref(), &ctx);
            if !params.active {
                continue;
            }

            voice.render(
                &mut self.channels[c],
                &params,
                &self.lfo[..samples],
                &mut self.voice[..samples],
            );

            let send_to_reverb = !song.get_channel_is_drum(c);
            for i in 0..samples {
                let sample = self.voice[i];
                let l = sample * params.pan_left;
                let r = sample * params.pan_right;
                self.bus_left[i] += l;
                self.bus_right[i] += r;
                if send_to_reverb {
                    self.send_left[i] += l;
                    self.send_right[i] += r;
                }
            }
        }

        self.reverb.process(
            reverb_amount(song.reverb),
            &self.send_left[..samples],
            &self.send_right[..samples],
            &mut self.bus_left[..samples],
            &mut self.bus_right[..samples],
        );
        self.master.process(
            song.muff,
            song.sample_rate_mode,
            &mut self.bus_left[..samples],
            &mut self.bus_right[..samples],
        );
        self.limiter.process(
            self.volume,
            &mut self.bus_left[..samples],
            &mut self.bus_right[..samples],
        );

        left.copy_from_slice(&self.bus_left[..samples]);
        right.copy_from_slice(&self.bus_right[..samples]);
    }

    /// Note sounding in a channel: the live note, or the note of the pattern.
    fn channel_note(
        &self,
        song: &Song,
        channel: usize,
        position: &TickPosition,
    ) -> Option<InterpolatedNote> {
        if let Some(piano) = self.piano.filter(|piano| piano.channel == channel) {
            return Some(InterpolatedNote::held(piano.pitch, piano.ticks, position));
        }

        let pattern = song.get_pattern(channel, self.bar)?;
        let index = pattern.note_at(position.time)?;
        let transition = song.get_instrument(channel, self.bar)?.transition;

        Some(interpolate_note(pattern, index, transition, position))
    }

    /// Routine of the current bar, compiled on the first use of its fingerprint.
    fn bar_routine(&mut self, song: &Song) -> Arc<BarRoutine> {
        self.tags.clear();
        for c in 0..song.get_channel_count().min(song.channels.len()) {
            let live = self.piano.is_some_and(|piano| piano.channel == c);
            let tag = if song.get_pattern(c, self.bar).is_none() && !live {
                VoiceTag::Empty
            } else {
                song.get_instrument(c, self.bar)
                    .map_or(VoiceTag::Empty, |instrument| VoiceTag::of(&instrument.kind))
            };
            self.tags.push(tag);
        }

        self.routines.get_or_compile(&self.tags)
    }

    /// Fills the shared vibrato and tremolo oscillator, one cycle per part.
    fn fill_lfo(&mut self, samples: usize, spa: usize) {
        const TAU: f32 = core::f32::consts::TAU;
        let angle = TAU / (spa * TICKS_PER_PART) as f32;
        let multiplier = 2.0 * angle.cos();
        let mut y = self.effect_phase.sin();
        let mut y_previous = (self.effect_phase - angle).sin();

        for sample in self.lfo[..samples].iter_mut() {
            *sample = y;
            let y_next = multiplier * y - y_previous;
            y_previous = y;
            y = y_next;
        }

        self.effect_phase = (self.effect_phase + angle * samples as f32) % TAU;
    }

    /// Moves to the next tick. Returns `true` at the start of a new beat.
    fn advance_tick(&mut self, song: &Song) -> bool {
        if let Some(piano) = self.piano.as_mut() {
            piano.ticks += 1;
        }

        self.arpeggio += 1;
        if self.arpeggio < TICKS_PER_PART {
            return false;
        }
        self.arpeggio = 0;
        self.part += 1;
        if self.part < song.parts_per_beat {
            return false;
        }
        self.part = 0;
        self.beat += 1;
        if self.beat >= song.beats_per_bar {
            self.beat = 0;
            self.bar += 1;
            self.wrap_bar(song);
        }

        true
    }

    /// Applies the loop, intro and outro policy after the bar changed.
    fn wrap_bar(&mut self, song: &Song) {
        if self.loop_repeat_count != 0 && self.bar == song.loop_end() {
            self.bar = song.loop_start;
            if self.loop_repeat_count > 0 {
                self.loop_repeat_count -= 1;
            }
        } else if !self.enable_outro && self.bar >= song.loop_end() {
            self.bar = song.loop_start;
        }
        if !self.enable_intro && self.bar < song.loop_start {
            self.bar = song.loop_start;
        }
        if self.bar >= song.bar_count {
            if self.enable_outro {
                self.bar = 0;
                self.ended = true;
                self.pause();
            } else {
                self.bar = song.loop_start;
            }
        }
    }

    /// Cascades counters that overflow after the song changed, and moves a bar
    /// outside the playable range back to the loop start.
    fn normalize_position(&mut self, song: &Song) {
        if self.arpeggio >= TICKS_PER_PART {
            self.arpeggio = 0;
            self.part += 1;
        }
        if self.part >= song.parts_per_beat {
            self.part = 0;
            self.beat += 1;
        }
        if self.beat >= song.beats_per_bar {
            self.beat = 0;
            self.bar += 1;
        }
        if !self.enable_intro && self.bar < song.loop_start {
            self.bar = song.loop_start;
        } else if !self.enable_outro && self.bar >= song.loop_end() {
            self.bar = song.loop_start;
        }
        if self.bar >= song.bar_count {
            self.bar = song.loop_start;
        }
    }

    pub(super) fn update_playhead(&mut self, song: &Song) {
        let spa = samples_per_arpeggio(song, self.sample_rate) as f32;
        let countdown = (self.arpeggio_sample_countdown as f32).min(spa);
        let ticks = self.arpeggio as f32 + 1.0 - countdown / spa;
        let parts = ticks / TICKS_PER_PART as f32 + self.part as f32;
        let beats = parts / song.parts_per_beat as f32 + self.beat as f32;

        self.playhead = beats / song.beats_per_bar as f32 + self.bar as f32;
    }
}
