//! The synthesizer: transport, per-channel voice state and the public API the
//! host drives.
//!
//! [`Synth::synthesize`] is the buffer-fill entry point, meant to be called
//! repeatedly from the audio callback. It never allocates once the routine of
//! every channel layout in the song has been compiled.

pub mod channel;
pub mod interpolator;
pub mod params;
pub mod routine;
mod scheduler;

use alloc::sync::Arc;
use alloc::vec;
use alloc::vec::Vec;
use core::mem;

#[allow(unused_imports)]
use num_traits::float::Float;

use crate::fx::limiter::Limiter;
use crate::fx::master::MasterFilter;
use crate::fx::reverb::Reverb;
use crate::song::Song;
use crate::{resources, SampleRate, TICKS_PER_PART};

use channel::SynthChannel;
use routine::{RoutineCache, VoiceTag};

/// Longest run of samples rendered with one set of voice parameters.
pub const MAX_CHUNK_SIZE: usize = 256;

/// Highest master volume.
pub const VOLUME_MAX: f32 = 2.0;

/// Note played live on the keyboard, overriding the patterns of its channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PianoNote {
    channel: usize,
    pitch: i32,
    /// Ticks since the key was pressed.
    ticks: usize,
}

/// Per-channel DSP state sized for a song.
///
/// Built ahead of [`Synth::swap_song`] so that a song can be replaced on the
/// audio thread without allocating.
#[derive(Debug, Clone, Default)]
pub struct ChannelStates {
    channels: Vec<SynthChannel>,
    tags: Vec<VoiceTag>,
}

impl ChannelStates {
    pub fn for_song(song: &Song) -> Self {
        let channel_count = song.get_channel_count();
        Self {
            channels: vec![SynthChannel::new(); channel_count],
            tags: Vec::with_capacity(channel_count),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.channels.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }
}

/// Samples per tick of a song, never zero.
pub fn samples_per_arpeggio(song: &Song, sample_rate: SampleRate) -> usize {
    let ticks_per_second =
        song.get_beats_per_minute() / 60.0 * (song.parts_per_beat * TICKS_PER_PART) as f32;
    ((sample_rate.sample_rate_hz / ticks_per_second).floor() as usize).max(1)
}

#[derive(Debug)]
pub struct Synth {
    sample_rate: SampleRate,
    song: Option<Arc<Song>>,
    volume: f32,

    /// Play the bars before the loop.
    pub enable_intro: bool,
    /// Play the bars after the loop, then stop.
    pub enable_outro: bool,
    /// Remaining repeats of the loop, `-1` for endless.
    pub loop_repeat_count: i32,

    playing: bool,
    ended: bool,
    bar: usize,
    beat: usize,
    part: usize,
    arpeggio: usize,
    arpeggio_sample_countdown: usize,
    playhead: f32,
    piano: Option<PianoNote>,
    effect_phase: f32,

    channels: Vec<SynthChannel>,
    routines: RoutineCache,
    tags: Vec<VoiceTag>,
    reverb: Reverb,
    limiter: Limiter,
    master: MasterFilter,

    lfo: [f32; MAX_CHUNK_SIZE],
    voice: [f32; MAX_CHUNK_SIZE],
    bus_left: [f32; MAX_CHUNK_SIZE],
    bus_right: [f32; MAX_CHUNK_SIZE],
    send_left: [f32; MAX_CHUNK_SIZE],
    send_right: [f32; MAX_CHUNK_SIZE],
}

impl Synth {
    /// Creates a paused synthesizer without a song. Builds every wavetable.
    pub fn new(sample_rate: SampleRate) -> Self {
        resources::warm_up();

        Self {
            sample_rate,
            song: None,
            volume: 1.0,
            enable_intro: true,
            enable_outro: false,
            loop_repeat_count: -1,
            playing: false,
            ended: false,
            bar: 0,
            beat: 0,
            part: 0,
            arpeggio: 0,
            arpeggio_sample_countdown: 0,
            playhead: 0.0,
            piano: None,
            effect_phase: 0.0,
            channels: Vec::new(),
            routines: RoutineCache::new(),
            tags: Vec::new(),
            reverb: Reverb::new(),
            limiter: Limiter::new(sample_rate.sample_rate_hz),
            master: MasterFilter::new(),
            lfo: [0.0; MAX_CHUNK_SIZE],
            voice: [0.0; MAX_CHUNK_SIZE],
            bus_left: [0.0; MAX_CHUNK_SIZE],
            bus_right: [0.0; MAX_CHUNK_SIZE],
            send_left: [0.0; MAX_CHUNK_SIZE],
            send_right: [0.0; MAX_CHUNK_SIZE],
        }
    }

    #[inline]
    pub fn sample_rate(&self) -> SampleRate {
        self.sample_rate
    }

    /// Replaces the song. Channel states are reset when the channel count changes.
    pub fn set_song(&mut self, song: impl Into<Arc<Song>>) {
        let song = song.into();
        log::info!(
            "song set: {} channels, {} bars at {:.1} bpm",
            song.get_channel_count(),
            song.bar_count,
            song.get_beats_per_minute()
        );
        let states = if song.get_channel_count() != self.channels.len() {
            ChannelStates::for_song(&song)
        } else {
            ChannelStates::default()
        };
        self.swap_song(song, states);
    }

    /// Replaces the song without allocating when `states` fits it.
    ///
    /// The channel states are swapped in only when the channel count changes.
    /// Returns the previous song and whichever states are no longer used, so
    /// that the caller decides where they are freed.
    pub fn swap_song(
        &mut self,
        song: Arc<Song>,
        mut states: ChannelStates,
    ) -> (Option<Arc<Song>>, ChannelStates) {
        let channel_count = song.get_channel_count();
        if channel_count != self.channels.len() {
            if states.len() != channel_count {
                states = ChannelStates::for_song(&song);
            }
            mem::swap(&mut self.channels, &mut states.channels);
            mem::swap(&mut self.tags, &mut states.tags);
        }

        let spa = samples_per_arpeggio(&song, self.sample_rate);
        if self.arpeggio_sample_countdown == 0 || self.arpeggio_sample_countdown > spa {
            self.arpeggio_sample_countdown = spa;
        }
        self.update_playhead(&song);

        (self.song.replace(song), states)
    }

    /// Removes the song and pauses. Returns the removed song.
    pub fn clear_song(&mut self) -> Option<Arc<Song>> {
        self.playing = false;
        self.song.take()
    }

    pub fn song(&self) -> Option<&Song> {
        self.song.as_deref()
    }

    pub fn play(&mut self) {
        if self.playing {
            return;
        }
        self.playing = true;
        self.ended = false;
    }

    pub fn pause(&mut self) {
        if !self.playing {
            return;
        }
        self.playing = false;
    }

    #[inline]
    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Whether playback stopped at the end of the outro.
    #[inline]
    pub fn ended(&self) -> bool {
        self.ended
    }

    #[inline]
    pub fn volume(&self) -> f32 {
        self.volume
    }

    pub fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, VOLUME_MAX);
    }

    #[inline]
    pub fn bar(&self) -> usize {
        self.bar
    }

    #[inline]
    pub fn beat(&self) -> usize {
        self.beat
    }

    #[inline]
    pub fn part(&self) -> usize {
        self.part
    }

    #[inline]
    pub fn arpeggio(&self) -> usize {
        self.arpeggio
    }

    /// Plays `pitch` on `channel` instead of its patterns, until released.
    pub fn press_piano(&mut self, channel: usize, pitch: i32) {
        self.piano = Some(PianoNote {
            channel,
            pitch,
            ticks: 0,
        });
    }

    pub fn release_piano(&mut self) {
        self.piano = None;
    }

    /// Channel and pitch of the live note, if a key is held.
    pub fn piano(&self) -> Option<(usize, i32)> {
        self.piano.map(|piano| (piano.channel, piano.pitch))
    }

    /// Samples per tick of the current song, `0` without a song.
    pub fn samples_per_arpeggio(&self) -> usize {
        self.song
            .as_deref()
            .map_or(0, |song| samples_per_arpeggio(song, self.sample_rate))
    }

    pub fn samples_per_bar(&self) -> usize {
        self.song.as_deref().map_or(0, |song| {
            samples_per_arpeggio(song, self.sample_rate) * TICKS_PER_PART * song.parts_per_bar()
        })
    }

    /// Bars played from the start to the end, counting an endless loop once.
    pub fn total_bars(&self) -> usize {
        let Some(song) = self.song.as_deref() else {
            return 0;
        };
        let intro = if self.enable_intro { song.loop_start } else { 0 };
        let outro = if self.enable_outro {
            song.bar_count.saturating_sub(song.loop_end())
        } else {
            0
        };
        let repeats = self.loop_repeat_count.max(0) as usize + 1;

        intro + song.loop_length * repeats + outro
    }

    pub fn total_samples(&self) -> usize {
        self.total_bars() * self.samples_per_bar()
    }

    pub fn total_seconds(&self) -> f32 {
        self.total_samples() as f32 * self.sample_rate.inv_sr
    }

    /// Position in bars, with the fraction of the current bar.
    #[inline]
    pub fn playhead(&self) -> f32 {
        self.playhead
    }

    /// Moves the transport to a position in bars, keeping the DSP state.
    pub fn set_playhead(&mut self, playhead: f32) {
        let Some(song) = self.song.clone() else {
            return;
        };
        let spa = samples_per_arpeggio(&song, self.sample_rate);
        let playhead = playhead.clamp(0.0, song.bar_count as f32);

        self.bar = (playhead.floor() as usize).min(song.bar_count - 1);
        let mut remainder = (playhead - self.bar as f32).max(0.0) * song.beats_per_bar as f32;
        self.beat = (remainder.floor() as usize).min(song.beats_per_bar - 1);
        remainder = (remainder - self.beat as f32) * song.parts_per_beat as f32;
        self.part = (remainder.floor() as usize).min(song.parts_per_beat - 1);
        remainder = (remainder - self.part as f32) * TICKS_PER_PART as f32;
        self.arpeggio = (remainder.floor() as usize).min(TICKS_PER_PART - 1);
        remainder = (remainder - self.arpeggio as f32).clamp(0.0, 1.0);
        self.arpeggio_sample_countdown =
            (((1.0 - remainder) * spa as f32).round() as usize).clamp(1, spa);

        self.update_playhead(&song);
    }

    /// Moves to the start of the song and resets every DSP state.
    pub fn snap_to_start(&mut self) {
        self.snap_to_bar(Some(0));
    }

    /// Moves to the start of `bar`, or of the current bar, and resets every
    /// DSP state: phases, feedback, delay lines, limiter and effect oscillator.
    pub fn snap_to_bar(&mut self, bar: Option<usize>) {
        if let Some(bar) = bar {
            self.bar = bar;
        }
        self.rewind_bar();

        for channel in self.channels.iter_mut() {
            channel.reset();
        }
        self.effect_phase = 0.0;
        self.reverb.reset();
        self.limiter.reset();
        self.master.reset();
        if let Some(piano) = self.piano.as_mut() {
            piano.ticks = 0;
        }
    }

    /// Moves to the start of `bar`, keeping the DSP state.
    pub fn go_to_bar(&mut self, bar: usize) {
        self.bar = bar;
        self.rewind_bar();
    }

    /// Steps one bar forward within the playable range.
    pub fn next_bar(&mut self) {
        let Some(song) = self.song.clone() else {
            return;
        };
        let old_bar = self.bar;
        self.bar += 1;
        if self.enable_outro {
            if self.bar >= song.bar_count {
                self.bar = if self.enable_intro { 0 } else { song.loop_start };
            }
        } else if self.bar >= song.loop_end() || self.bar >= song.bar_count {
            self.bar = song.loop_start;
        }
        self.playhead += self.bar as f32 - old_bar as f32;
    }

    /// Steps one bar back within the playable range.
    pub fn prev_bar(&mut self) {
        let Some(song) = self.song.clone() else {
            return;
        };
        let old_bar = self.bar;
        let last = if self.enable_outro {
            song.bar_count - 1
        } else {
            song.loop_end() - 1
        };
        self.bar = match self.bar.checked_sub(1) {
            Some(bar) if bar <= last => bar,
            _ => last,
        };
        if !self.enable_intro && self.bar < song.loop_start {
            self.bar = last;
        }
        self.playhead += self.bar as f32 - old_bar as f32;
    }

    /// Renders `frames` stereo frames into new buffers.
    pub fn render_offline(&mut self, frames: usize) -> (Vec<f32>, Vec<f32>) {
        let mut left = vec![0.0; frames];
        let mut right = vec![0.0; frames];
        self.synthesize(&mut left, &mut right);
        (left, right)
    }

    fn rewind_bar(&mut self) {
        self.beat = 0;
        self.part = 0;
        self.arpeggio = 0;
        self.arpeggio_sample_countdown = self.samples_per_arpeggio();
        self.playhead = self.bar as f32;
    }
}
