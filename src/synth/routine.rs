//! Bar routines: the render function of every channel, compiled once per
//! channel fingerprint and cached.
//!
//! A fingerprint only captures what selects a code path: the instrument family
//! and, for FM, the algorithm and feedback routing.

use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt::Write;

use super::channel::SynthChannel;
use super::params::VoiceParams;
use crate::fm::algorithms::Algorithm;
use crate::fm::feedback::Feedback;
use crate::fm::voice::{fm_routing, FmRouting};
use crate::song::instrument::InstrumentKind;

/// Code path needed by one channel in the current bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoiceTag {
    /// No pattern and no live note.
    Empty,
    Chip,
    Pwm,
    Noise,
    Fm(Algorithm, Feedback),
}

impl VoiceTag {
    pub fn of(kind: &InstrumentKind) -> Self {
        match kind {
            InstrumentKind::Chip { .. } => VoiceTag::Chip,
            InstrumentKind::Pwm { .. } => VoiceTag::Pwm,
            InstrumentKind::Noise { .. } => VoiceTag::Noise,
            InstrumentKind::Fm(settings) => VoiceTag::Fm(settings.algorithm, settings.feedback),
        }
    }
}

/// Writes the fingerprint of a bar, one tag per channel joined with `|`.
pub fn write_fingerprint(tags: &[VoiceTag], out: &mut String) {
    out.clear();
    for (i, tag) in tags.iter().enumerate() {
        if i > 0 {
            out.push('|');
        }
        match tag {
            VoiceTag::Empty => out.push('_'),
            VoiceTag::Chip => out.push('c'),
            VoiceTag::Pwm => out.push('p'),
            VoiceTag::Noise => out.push('n'),
            VoiceTag::Fm(algorithm, feedback) => {
                write!(out, "f{}.{}", algorithm.index(), feedback.index()).ok();
            }
        }
    }
}

pub type VoiceRenderFn =
    fn(channel: &mut SynthChannel, voice: &VoiceRoutine, params: &VoiceParams, lfo: &[f32], out: &mut [f32]);

/// Render function of one channel.
#[derive(Debug, Clone, Copy)]
pub struct VoiceRoutine {
    render: VoiceRenderFn,
    routing: Option<&'static FmRouting>,
}

fn render_silence(
    _channel: &mut SynthChannel,
    _voice: &VoiceRoutine,
    _params: &VoiceParams,
    _lfo: &[f32],
    out: &mut [f32],
) {
    out.fill(0.0);
}

fn render_chip(
    channel: &mut SynthChannel,
    _voice: &VoiceRoutine,
    params: &VoiceParams,
    lfo: &[f32],
    out: &mut [f32],
) {
    channel.chip.render(params, lfo, out);
}

fn render_noise(
    channel: &mut SynthChannel,
    _voice: &VoiceRoutine,
    params: &VoiceParams,
    lfo: &[f32],
    out: &mut [f32],
) {
    channel.noise.render(params, lfo, out);
}

fn render_fm<const CARRIER_COUNT: usize>(
    channel: &mut SynthChannel,
    voice: &VoiceRoutine,
    params: &VoiceParams,
    lfo: &[f32],
    out: &mut [f32],
) {
    match voice.routing {
        Some(routing) => channel.fm.render::<CARRIER_COUNT>(routing, params, lfo, out),
        None => out.fill(0.0),
    }
}

impl VoiceRoutine {
    pub fn compile(tag: VoiceTag) -> Self {
        let (render, routing) = match tag {
            VoiceTag::Empty => (render_silence as VoiceRenderFn, None),
            VoiceTag::Chip | VoiceTag::Pwm => (render_chip as VoiceRenderFn, None),
            VoiceTag::Noise => (render_noise as VoiceRenderFn, None),
            VoiceTag::Fm(algorithm, feedback) => {
                let routing = fm_routing(algorithm, feedback);
                let render: VoiceRenderFn = match routing.carrier_count() {
                    1 => render_fm::<1>,
                    2 => render_fm::<2>,
                    3 => render_fm::<3>,
                    _ => render_fm::<4>,
                };
                (render, Some(routing))
            }
        };

        Self { render, routing }
    }

    #[inline]
    pub fn render(
        &self,
        channel: &mut SynthChannel,
        params: &VoiceParams,
        lfo: &[f32],
        out: &mut [f32],
    ) {
        (self.render)(channel, self, params, lfo, out);
    }
}

/// Compiled render functions of every channel of a bar.
#[derive(Debug)]
pub struct BarRoutine {
    voices: Vec<VoiceRoutine>,
}

impl BarRoutine {
    pub fn compile(tags: &[VoiceTag]) -> Self {
        Self {
            voices: tags.iter().map(|tag| VoiceRoutine::compile(*tag)).collect(),
        }
    }

    #[inline]
    pub fn voice(&self, channel: usize) -> Option<&VoiceRoutine> {
        self.voices.get(channel)
    }

    #[inline]
    pub fn channel_count(&self) -> usize {
        self.voices.len()
    }
}

/// Bar routines keyed by fingerprint. Entries are never evicted.
#[derive(Debug, Default)]
pub struct RoutineCache {
    routines: BTreeMap<String, Arc<BarRoutine>>,
    fingerprint: String,
}

impl RoutineCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Routine of a bar whose channels need `tags`, compiled on first use.
    pub fn get_or_compile(&mut self, tags: &[VoiceTag]) -> Arc<BarRoutine> {
        write_fingerprint(tags, &mut self.fingerprint);
        if let Some(routine) = self.routines.get(self.fingerprint.as_str()) {
            return routine.clone();
        }

        log::debug!("compiling bar routine for {}", self.fingerprint);
        let routine = Arc::new(BarRoutine::compile(tags));
        self.routines
            .insert(self.fingerprint.clone(), routine.clone());
        routine
    }

    /// Fingerprint of the last requested routine.
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    pub fn len(&self) -> usize {
        self.routines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routines.is_empty()
    }
}
