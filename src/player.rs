//! Bounded queues between a UI thread and a [`Synth`] owned by the audio thread.
//!
//! [`SynthHandle`] stays on the UI side and only ever calls `try_send`, so a
//! stalled audio thread never blocks the UI. [`SynthProcessor`] is moved into
//! the audio callback, where it applies pending commands before every buffer
//! and reports the transport state back.
//!
//! The audio thread neither allocates nor frees songs: the handle builds the
//! channel states of a new song, and displaced songs travel back to the handle
//! to be dropped there.

use std::fmt::Display;
use std::sync::Arc;

use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};

use crate::error::PlayerError;
use crate::song::Song;
use crate::synth::{ChannelStates, Synth};

pub const COMMAND_QUEUE_SIZE: usize = 256;
pub const STATUS_QUEUE_SIZE: usize = 16;
pub const RETIRED_QUEUE_SIZE: usize = COMMAND_QUEUE_SIZE;

#[derive(Debug, Clone)]
pub enum SynthCommand {
    SetSong {
        song: Arc<Song>,
        states: ChannelStates,
    },
    ClearSong,
    Play,
    Pause,
    SnapToStart,
    SnapToBar(Option<usize>),
    GoToBar(usize),
    NextBar,
    PrevBar,
    SetPlayhead(f32),
    SetVolume(f32),
    PianoPress { channel: usize, pitch: i32 },
    PianoRelease,
    SetLoopRepeatCount(i32),
    SetIntro(bool),
    SetOutro(bool),
}

/// Transport state after the last rendered buffer.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SynthStatus {
    pub playhead: f32,
    pub playing: bool,
    pub ended: bool,
    pub bar: usize,
}

impl SynthStatus {
    fn of(synth: &Synth) -> Self {
        Self {
            playhead: synth.playhead(),
            playing: synth.is_playing(),
            ended: synth.ended(),
            bar: synth.bar(),
        }
    }
}

/// Song and channel states displaced on the audio thread.
#[derive(Debug)]
pub struct Retired {
    pub song: Option<Arc<Song>>,
    pub states: ChannelStates,
}

/// Builds both ends of the queues around `synth`.
pub fn synth_pair(synth: Synth) -> (SynthHandle, SynthProcessor) {
    let (command_tx, command_rx) = bounded(COMMAND_QUEUE_SIZE);
    let (status_tx, status_rx) = bounded(STATUS_QUEUE_SIZE);
    let (retired_tx, retired_rx) = bounded(RETIRED_QUEUE_SIZE);
    let status = SynthStatus::of(&synth);

    let handle = SynthHandle {
        commands: command_tx,
        status: status_rx,
        retired: retired_rx,
        last_status: status,
    };
    let processor = SynthProcessor {
        synth,
        commands: command_rx,
        status: status_tx,
        retired: retired_tx,
    };

    (handle, processor)
}

#[derive(Debug)]
pub struct SynthHandle {
    commands: Sender<SynthCommand>,
    status: Receiver<SynthStatus>,
    retired: Receiver<Retired>,
    last_status: SynthStatus,
}

impl SynthHandle {
    pub fn send(&self, command: SynthCommand) -> Result<(), PlayerError> {
        self.commands.try_send(command).map_err(|err| match err {
            TrySendError::Full(_) => PlayerError::QueueFull,
            TrySendError::Disconnected(_) => PlayerError::Disconnected,
        })
    }

    pub fn set_song(&self, song: impl Into<Arc<Song>>) -> Result<(), PlayerError> {
        let song = song.into();
        let states = ChannelStates::for_song(&song);
        log::info!(
            "song set: {} channels, {} bars at {:.1} bpm",
            song.get_channel_count(),
            song.bar_count,
            song.get_beats_per_minute()
        );
        self.send(SynthCommand::SetSong { song, states })
    }

    pub fn clear_song(&self) -> Result<(), PlayerError> {
        self.send(SynthCommand::ClearSong)
    }

    pub fn play(&self) -> Result<(), PlayerError> {
        log::info!("play from bar {}", self.last_status.bar);
        self.send(SynthCommand::Play)
    }

    pub fn pause(&self) -> Result<(), PlayerError> {
        log::info!("pause at bar {}", self.last_status.bar);
        self.send(SynthCommand::Pause)
    }

    pub fn snap_to_start(&self) -> Result<(), PlayerError> {
        self.send(SynthCommand::SnapToStart)
    }

    pub fn snap_to_bar(&self, bar: Option<usize>) -> Result<(), PlayerError> {
        self.send(SynthCommand::SnapToBar(bar))
    }

    pub fn go_to_bar(&self, bar: usize) -> Result<(), PlayerError> {
        self.send(SynthCommand::GoToBar(bar))
    }

    pub fn next_bar(&self) -> Result<(), PlayerError> {
        self.send(SynthCommand::NextBar)
    }

    pub fn prev_bar(&self) -> Result<(), PlayerError> {
        self.send(SynthCommand::PrevBar)
    }

    pub fn set_playhead(&self, playhead: f32) -> Result<(), PlayerError> {
        self.send(SynthCommand::SetPlayhead(playhead))
    }

    pub fn set_volume(&self, volume: f32) -> Result<(), PlayerError> {
        self.send(SynthCommand::SetVolume(volume))
    }

    pub fn press_piano(&self, channel: usize, pitch: i32) -> Result<(), PlayerError> {
        self.send(SynthCommand::PianoPress { channel, pitch })
    }

    pub fn release_piano(&self) -> Result<(), PlayerError> {
        self.send(SynthCommand::PianoRelease)
    }

    pub fn set_loop_repeat_count(&self, count: i32) -> Result<(), PlayerError> {
        self.send(SynthCommand::SetLoopRepeatCount(count))
    }

    pub fn set_intro(&self, enabled: bool) -> Result<(), PlayerError> {
        self.send(SynthCommand::SetIntro(enabled))
    }

    pub fn set_outro(&self, enabled: bool) -> Result<(), PlayerError> {
        self.send(SynthCommand::SetOutro(enabled))
    }

    /// Drains the status reports and returns the latest one. Songs displaced
    /// on the audio thread are freed here.
    pub fn poll_status(&mut self) -> SynthStatus {
        while let Ok(status) = self.status.try_recv() {
            self.last_status = status;
        }
        self.free_retired();
        self.last_status
    }

    /// Drops the songs and channel states sent back by the audio thread.
    pub fn free_retired(&self) -> usize {
        self.retired.try_iter().count()
    }

    /// Called by the host when its audio stream fails. Pauses playback so the
    /// processor renders silence until the stream is restored.
    pub fn host_failed(&self, error: impl Display) -> Result<(), PlayerError> {
        log::warn!("audio host failed: {error}, pausing playback");
        self.pause()
    }
}

#[derive(Debug)]
pub struct SynthProcessor {
    synth: Synth,
    commands: Receiver<SynthCommand>,
    status: Sender<SynthStatus>,
    retired: Sender<Retired>,
}

impl SynthProcessor {
    /// Applies pending commands, then fills both buffers.
    pub fn process(&mut self, left: &mut [f32], right: &mut [f32]) {
        while let Ok(command) = self.commands.try_recv() {
            if let Some(retired) = self.apply(command) {
                // Only freed here when the UI stopped polling.
                self.retired.try_send(retired).ok();
            }
        }

        self.synth.synthesize(left, right);

        // A full queue means the UI is not polling; the report is dropped.
        self.status.try_send(SynthStatus::of(&self.synth)).ok();
    }

    pub fn synth(&self) -> &Synth {
        &self.synth
    }

    pub fn synth_mut(&mut self) -> &mut Synth {
        &mut self.synth
    }

    fn apply(&mut self, command: SynthCommand) -> Option<Retired> {
        let synth = &mut self.synth;
        match command {
            SynthCommand::SetSong { song, states } => {
                let (song, states) = synth.swap_song(song, states);
                return Some(Retired { song, states });
            }
            SynthCommand::ClearSong => {
                let song = synth.clear_song();
                return Some(Retired {
                    song,
                    states: ChannelStates::default(),
                });
            }
            SynthCommand::Play => synth.play(),
            SynthCommand::Pause => synth.pause(),
            SynthCommand::SnapToStart => synth.snap_to_start(),
            SynthCommand::SnapToBar(bar) => synth.snap_to_bar(bar),
            SynthCommand::GoToBar(bar) => synth.go_to_bar(bar),
            SynthCommand::NextBar => synth.next_bar(),
            SynthCommand::PrevBar => synth.prev_bar(),
            SynthCommand::SetPlayhead(playhead) => synth.set_playhead(playhead),
            SynthCommand::SetVolume(volume) => synth.set_volume(volume),
            SynthCommand::PianoPress { channel, pitch } => synth.press_piano(channel, pitch),
            SynthCommand::PianoRelease => synth.release_piano(),
            SynthCommand::SetLoopRepeatCount(count) => synth.loop_repeat_count = count,
            SynthCommand::SetIntro(enabled) => synth.enable_intro = enabled,
            SynthCommand::SetOutro(enabled) => synth.enable_outro = enabled,
        }
        None
    }
}
