//! Envelopes of FM operators and feedback.
//!
//! An envelope is a pure function of the time elapsed since the note started,
//! in seconds and in beats, and of the note's current pin volume.

#[allow(unused_imports)]
use num_traits::float::Float;

use crate::song::settings::indexed_enum;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Envelope {
    /// Follows the pin volume of the note.
    #[default]
    Custom = 0,
    Steady = 1,
    Punch = 2,
    Flare1 = 3,
    Flare2 = 4,
    Flare3 = 5,
    Pluck1 = 6,
    Pluck2 = 7,
    Pluck3 = 8,
    Swell1 = 9,
    Swell2 = 10,
    Swell3 = 11,
    Tremolo1 = 12,
    Tremolo2 = 13,
    Tremolo3 = 14,
    /// Flare whose attack length follows the pin volume.
    CustomFlare = 15,
    /// Tremolo whose rate follows the pin volume.
    CustomTremolo = 16,
    Flute = 17,
}

indexed_enum!(Envelope {
    Custom,
    Steady,
    Punch,
    Flare1,
    Flare2,
    Flare3,
    Pluck1,
    Pluck2,
    Pluck3,
    Swell1,
    Swell2,
    Swell3,
    Tremolo1,
    Tremolo2,
    Tremolo3,
    CustomFlare,
    CustomTremolo,
    Flute,
});

enum Curve {
    Custom,
    Steady,
    Punch,
    Flare(f32),
    Pluck(f32),
    Swell(f32),
    Tremolo(f32),
    CustomFlare,
    CustomTremolo,
    Flute,
}

impl Envelope {
    fn curve(self) -> Curve {
        match self {
            Envelope::Custom => Curve::Custom,
            Envelope::Steady => Curve::Steady,
            Envelope::Punch => Curve::Punch,
            Envelope::Flare1 => Curve::Flare(32.0),
            Envelope::Flare2 => Curve::Flare(8.0),
            Envelope::Flare3 => Curve::Flare(2.0),
            Envelope::Pluck1 => Curve::Pluck(32.0),
            Envelope::Pluck2 => Curve::Pluck(8.0),
            Envelope::Pluck3 => Curve::Pluck(2.0),
            Envelope::Swell1 => Curve::Swell(32.0),
            Envelope::Swell2 => Curve::Swell(8.0),
            Envelope::Swell3 => Curve::Swell(2.0),
            Envelope::Tremolo1 => Curve::Tremolo(4.0),
            Envelope::Tremolo2 => Curve::Tremolo(2.0),
            Envelope::Tremolo3 => Curve::Tremolo(1.0),
            Envelope::CustomFlare => Curve::CustomFlare,
            Envelope::CustomTremolo => Curve::CustomTremolo,
            Envelope::Flute => Curve::Flute,
        }
    }

    /// Whether the envelope depends on the pin volume.
    pub fn follows_volume(self) -> bool {
        matches!(
            self,
            Envelope::Custom | Envelope::CustomFlare | Envelope::CustomTremolo
        )
    }
}

#[inline]
fn decay(seconds: f32, speed: f32) -> f32 {
    1.0 / (1.0 + seconds * speed)
}

#[inline]
fn attack_release(seconds: f32, attack: f32, speed: f32) -> f32 {
    if seconds < attack {
        seconds / attack
    } else {
        decay(seconds - attack, speed)
    }
}

#[inline]
fn tremolo(beats: f32, speed: f32) -> f32 {
    0.5 - 0.5 * (core::f32::consts::TAU * beats * speed).cos()
}

/// Multiplier of an envelope after `seconds` (or `beats`) into a note.
///
/// `custom_volume` is the converted pin volume of the note, in `0.0..=1.0`.
pub fn envelope_value(envelope: Envelope, seconds: f32, beats: f32, custom_volume: f32) -> f32 {
    match envelope.curve() {
        Curve::Custom => custom_volume,
        Curve::Steady => 1.0,
        Curve::Punch => (2.0 - 10.0 * seconds).max(1.0),
        Curve::Flare(speed) => attack_release(seconds, 0.25 / speed.sqrt(), speed),
        Curve::Pluck(speed) => decay(seconds, speed),
        Curve::Swell(speed) => 1.0 - decay(seconds, speed),
        Curve::Tremolo(speed) => tremolo(beats, speed),
        Curve::CustomFlare => attack_release(seconds, 0.05 + custom_volume * 0.25, 8.0),
        Curve::CustomTremolo => tremolo(beats, custom_volume * 4.0),
        Curve::Flute => (-1.0 - seconds).max(-2.0 + seconds),
    }
}
