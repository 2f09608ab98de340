//! Tests for the command queue between UI and audio thread

mod songs;

use std::sync::Arc;
use std::thread;

use chiptrack_dsp::error::PlayerError;
use chiptrack_dsp::player::{synth_pair, SynthCommand, COMMAND_QUEUE_SIZE};
use chiptrack_dsp::song::instrument::Instrument;
use chiptrack_dsp::synth::Synth;

use songs::*;

const BLOCK_SIZE: usize = 512;

#[test]
fn commands_apply_before_render() {
    let (mut handle, mut processor) = synth_pair(Synth::new(sample_rate()));
    let mut left = [0.0; BLOCK_SIZE];
    let mut right = [0.0; BLOCK_SIZE];

    handle.set_song(single_note(Instrument::default(), A4)).ok();
    handle.snap_to_start().ok();
    handle.play().ok();
    processor.process(&mut left, &mut right);

    assert!(left.iter().any(|s| *s != 0.0));
    let status = handle.poll_status();
    assert!(status.playing);
    assert!(!status.ended);
    assert_eq!(status.bar, 0);
    assert!(status.playhead > 0.0);

    handle.pause().ok();
    processor.process(&mut left, &mut right);
    assert!(left.iter().all(|s| *s == 0.0));
    assert!(!handle.poll_status().playing);
}

#[test]
fn transport_commands() {
    let (mut handle, mut processor) = synth_pair(Synth::new(sample_rate()));
    let mut left = [0.0; BLOCK_SIZE];
    let mut right = [0.0; BLOCK_SIZE];

    handle.set_song(Arc::new(full_band())).ok();
    handle.go_to_bar(2).ok();
    handle.set_volume(0.5).ok();
    handle.set_loop_repeat_count(3).ok();
    handle.set_intro(false).ok();
    handle.set_outro(true).ok();
    processor.process(&mut left, &mut right);

    let synth = processor.synth();
    assert_eq!(synth.bar(), 2);
    assert_eq!(synth.volume(), 0.5);
    assert_eq!(synth.loop_repeat_count, 3);
    assert!(!synth.enable_intro);
    assert!(synth.enable_outro);
    assert_eq!(handle.poll_status().bar, 2);

    handle.next_bar().ok();
    handle.press_piano(0, 12).ok();
    processor.process(&mut left, &mut right);
    assert_eq!(processor.synth().bar(), 3);
    assert_eq!(processor.synth().piano(), Some((0, 12)));

    handle.release_piano().ok();
    handle.clear_song().ok();
    processor.process(&mut left, &mut right);
    assert!(processor.synth().song().is_none());
    assert_eq!(processor.synth().piano(), None);
}

#[test]
fn full_queue_is_reported() {
    let (handle, processor) = synth_pair(Synth::new(sample_rate()));

    for _ in 0..COMMAND_QUEUE_SIZE {
        assert_eq!(handle.send(SynthCommand::NextBar), Ok(()));
    }
    assert_eq!(handle.play(), Err(PlayerError::QueueFull));

    drop(processor);
    assert_eq!(handle.play(), Err(PlayerError::Disconnected));
}

#[test]
fn host_failure_pauses() {
    let (mut handle, mut processor) = synth_pair(Synth::new(sample_rate()));
    let mut left = [0.0; BLOCK_SIZE];
    let mut right = [0.0; BLOCK_SIZE];

    handle.set_song(single_note(Instrument::default(), A4)).ok();
    handle.play().ok();
    processor.process(&mut left, &mut right);
    assert!(handle.poll_status().playing);

    handle.host_failed("device unplugged").ok();
    processor.process(&mut left, &mut right);
    assert!(!handle.poll_status().playing);
    assert!(left.iter().all(|s| *s == 0.0));
}

#[test]
fn processor_runs_on_another_thread() {
    let (mut handle, mut processor) = synth_pair(Synth::new(sample_rate()));
    handle.set_song(full_band()).ok();
    handle.play().ok();

    let audio = thread::spawn(move || {
        let mut left = [0.0; BLOCK_SIZE];
        let mut right = [0.0; BLOCK_SIZE];
        for _ in 0..8 {
            processor.process(&mut left, &mut right);
        }
        processor
    });
    let processor = audio.join().expect("audio thread panicked");

    let status = handle.poll_status();
    assert!(status.playing);
    assert_eq!(status.playhead, processor.synth().playhead());
}

#[test]
fn displaced_songs_are_freed_by_the_handle() {
    let (mut handle, mut processor) = synth_pair(Synth::new(sample_rate()));
    let mut left = [0.0; BLOCK_SIZE];
    let mut right = [0.0; BLOCK_SIZE];

    let first = Arc::new(single_note(Instrument::default(), A4));
    handle.set_song(first.clone()).ok();
    processor.process(&mut left, &mut right);
    assert_eq!(Arc::strong_count(&first), 2);

    handle.set_song(full_band()).ok();
    processor.process(&mut left, &mut right);
    assert_eq!(Arc::strong_count(&first), 2);

    handle.poll_status();
    assert_eq!(Arc::strong_count(&first), 1);

    handle.clear_song().ok();
    processor.process(&mut left, &mut right);
    assert!(processor.synth().song().is_none());
    assert_eq!(handle.free_retired(), 1);
}
