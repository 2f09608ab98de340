//! Instrument and song settings with the constant tables that parameterise them.
//!
//! Each setting is a closed enum; its numeric behavior lives in a `const` table
//! indexed by the discriminant.

#[allow(unused_imports)]
use num_traits::float::Float;

use crate::resources::waves::WaveBank;

macro_rules! indexed_enum {
    ($name:ident { $($variant:ident),+ $(,)? }) => {
        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            #[inline]
            pub fn index(self) -> usize {
                self as usize
            }

            /// Setting at `index`, or `None` when out of range.
            pub fn from_index(index: usize) -> Option<Self> {
                Self::ALL.get(index).copied()
            }
        }
    };
}

pub(crate) use indexed_enum;

/// Policy at the boundaries of a note.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Transition {
    /// Ties pitch, volume and phase to an adjacent previous note.
    #[default]
    Seamless = 0,
    /// Restarts from silence on every note.
    Sudden = 1,
    /// Fades in and out, meeting adjacent notes halfway in pitch.
    Smooth = 2,
    /// Glides from the pitch of an adjacent previous note.
    Slide = 3,
    /// Starts with a maximal upward glide.
    Trill = 4,
    /// Boosted attack on top of the trill glide.
    Click = 5,
    /// Rises from far below while fading in.
    Bow = 6,
    /// Full volume on the first tick, silent on the last.
    Blip = 7,
}

indexed_enum!(Transition {
    Seamless, Sudden, Smooth, Slide, Trill, Click, Bow, Blip
});

impl Transition {
    /// Whether a note continues the oscillator phases of an adjacent previous note.
    pub fn continues_previous(self) -> bool {
        matches!(self, Transition::Seamless | Transition::Slide | Transition::Smooth)
    }
}

/// Lowpass preset of chip and PWM voices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Filter {
    #[default]
    None = 0,
    Bright = 1,
    Medium = 2,
    Soft = 3,
    DecayBright = 4,
    DecayMedium = 5,
    DecaySoft = 6,
    FadeBright = 7,
    FadeSoft = 8,
}

indexed_enum!(Filter {
    None, Bright, Medium, Soft, DecayBright, DecayMedium, DecaySoft, FadeBright, FadeSoft
});

/// Filter coefficient is `2^-(base + decay * seconds)`, clamped to 1.
const FILTER_BASES: [f32; 9] = [0.0, 2.0, 3.5, 5.0, 1.0, 2.5, 4.0, 6.0, 7.0];
const FILTER_DECAYS: [f32; 9] = [0.0, 0.0, 0.0, 0.0, 10.0, 7.0, 4.0, -6.0, -3.0];
const FILTER_VOLUMES: [f32; 9] = [0.2, 0.4, 0.7, 1.0, 0.5, 0.75, 1.0, 0.5, 0.8];

impl Filter {
    #[inline]
    pub fn base(self) -> f32 {
        FILTER_BASES[self.index()]
    }

    /// Octaves per second the cutoff falls; negative values open the filter.
    #[inline]
    pub fn decay(self) -> f32 {
        FILTER_DECAYS[self.index()]
    }

    #[inline]
    pub fn volume(self) -> f32 {
        FILTER_VOLUMES[self.index()]
    }
}

/// Detune pattern between the two oscillators of a chip or PWM voice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Chorus {
    #[default]
    Union = 0,
    Shimmer = 1,
    Hum = 2,
    HonkyTonk = 3,
    Dissonant = 4,
    Fifths = 5,
    Octaves = 6,
    Bowed = 7,
}

indexed_enum!(Chorus {
    Union, Shimmer, Hum, HonkyTonk, Dissonant, Fifths, Octaves, Bowed
});

const CHORUS_INTERVALS: [f32; 8] = [0.0, 0.02, 0.05, 0.1, 0.25, 3.5, 6.0, 0.02];
const CHORUS_OFFSETS: [f32; 8] = [0.0, 0.0, 0.0, 0.0, 0.0, 3.5, 6.0, 0.0];
const CHORUS_VOLUMES: [f32; 8] = [0.7, 0.8, 1.0, 1.0, 0.9, 0.9, 0.8, 1.0];
const CHORUS_SIGNS: [f32; 8] = [1.0, 1.0, 1.0, 1.0, -1.0, 1.0, 1.0, -1.0];

impl Chorus {
    /// Half the spread in semitones between the two oscillators.
    #[inline]
    pub fn interval(self) -> f32 {
        CHORUS_INTERVALS[self.index()]
    }

    /// Shift in semitones applied to both oscillators.
    #[inline]
    pub fn offset(self) -> f32 {
        CHORUS_OFFSETS[self.index()]
    }

    #[inline]
    pub fn volume(self) -> f32 {
        CHORUS_VOLUMES[self.index()]
    }

    /// Sign applied to the second oscillator when summing.
    #[inline]
    pub fn sign(self) -> f32 {
        CHORUS_SIGNS[self.index()]
    }
}

/// Vibrato or tremolo style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Effect {
    #[default]
    None = 0,
    VibratoLight = 1,
    VibratoDelayed = 2,
    VibratoHeavy = 3,
    TremoloLight = 4,
    TremoloHeavy = 5,
}

indexed_enum!(Effect {
    None, VibratoLight, VibratoDelayed, VibratoHeavy, TremoloLight, TremoloHeavy
});

const EFFECT_VIBRATOS: [f32; 6] = [0.0, 0.15, 0.3, 0.45, 0.0, 0.0];
const EFFECT_TREMOLOS: [f32; 6] = [0.0, 0.0, 0.0, 0.0, 0.25, 0.5];
const EFFECT_VIBRATO_DELAYS: [f32; 6] = [0.0, 0.0, 3.0, 0.0, 0.0, 0.0];

impl Effect {
    /// Vibrato depth in semitones.
    #[inline]
    pub fn vibrato(self) -> f32 {
        EFFECT_VIBRATOS[self.index()]
    }

    /// Fraction of the volume removed at the tremolo trough.
    #[inline]
    pub fn tremolo(self) -> f32 {
        EFFECT_TREMOLOS[self.index()]
    }

    /// Parts elapsed in a note before the vibrato starts.
    #[inline]
    pub fn vibrato_delay(self) -> f32 {
        EFFECT_VIBRATO_DELAYS[self.index()]
    }
}

/// How the simultaneous pitches of a note are voiced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Harmony {
    /// Cycle through all pitches, one per tick.
    #[default]
    Arpeggio = 0,
    /// First pitch on voice A, second on voice B.
    Duet = 1,
    /// Lowest pitch on voice A, highest on voice B.
    Chord = 2,
    /// Root held on voice A while voice B cycles through the upper pitches.
    Seventh = 3,
    /// Arpeggio at half the rate.
    HalfArpeggio = 4,
    /// Voice A cycles through all pitches while voice B holds the root.
    ArpChord = 5,
}

indexed_enum!(Harmony {
    Arpeggio, Duet, Chord, Seventh, HalfArpeggio, ArpChord
});

impl Harmony {
    /// Whether each FM operator may play its own pitch of the note.
    pub fn spreads_operators(self) -> bool {
        matches!(self, Harmony::Chord | Harmony::Seventh | Harmony::Duet)
    }
}

/// Instrument level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Volume {
    #[default]
    Loudest = 0,
    Loud = 1,
    Medium = 2,
    Quiet = 3,
    Quietest = 4,
    Mute = 5,
}

indexed_enum!(Volume {
    Loudest, Loud, Medium, Quiet, Quietest, Mute
});

const VOLUME_VALUES: [f32; 5] = [0.0, 0.5, 1.0, 1.5, 2.0];

impl Volume {
    /// Gain multiplier; exactly zero when muted.
    pub fn multiplier(self) -> f32 {
        match self {
            Volume::Mute => 0.0,
            other => (-VOLUME_VALUES[other.index()]).exp2(),
        }
    }
}

/// Song-wide mixing style.
///
/// Each style is a preset of loosely related gain constants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MixMode {
    #[default]
    TypeA = 0,
    TypeB = 1,
    TypeC = 2,
    TypeD = 3,
}

indexed_enum!(MixMode { TypeA, TypeB, TypeC, TypeD });

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MixPreset {
    /// Multiplier of all chip and PWM voices.
    pub chip_volume: f32,
    /// Multiplier of all noise voices.
    pub drum_volume: f32,
    /// Scale of the FM carrier boost, `1 + boost * sine_volume_boost`.
    pub fm_carrier_boost: f32,
    /// Wavetable bank used by chip voices.
    pub wave_bank: WaveBank,
}

const MIX_PRESETS: [MixPreset; 4] = [
    MixPreset {
        chip_volume: 1.0,
        drum_volume: 1.0,
        fm_carrier_boost: 3.0,
        wave_bank: WaveBank::Standard,
    },
    MixPreset {
        chip_volume: 0.9,
        drum_volume: 1.25,
        fm_carrier_boost: 2.0,
        wave_bank: WaveBank::Standard,
    },
    MixPreset {
        chip_volume: 1.0,
        drum_volume: 0.8,
        fm_carrier_boost: 3.0,
        wave_bank: WaveBank::Smooth,
    },
    MixPreset {
        chip_volume: 1.1,
        drum_volume: 1.0,
        fm_carrier_boost: 4.0,
        wave_bank: WaveBank::Smooth,
    },
];

impl MixMode {
    #[inline]
    pub fn preset(self) -> &'static MixPreset {
        &MIX_PRESETS[self.index()]
    }
}

/// Musical key of the song, transposing every pitched channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Key {
    #[default]
    C = 0,
    CSharp = 1,
    D = 2,
    DSharp = 3,
    E = 4,
    F = 5,
    FSharp = 6,
    G = 7,
    GSharp = 8,
    A = 9,
    ASharp = 10,
    B = 11,
}

indexed_enum!(Key { C, CSharp, D, DSharp, E, F, FSharp, G, GSharp, A, ASharp, B });

impl Key {
    /// Pitch of note `0` at octave `0`.
    #[inline]
    pub fn transpose(self) -> i32 {
        12 + self as i32
    }
}

/// Scale used by the pattern editor to highlight allowed pitches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Scale {
    EasyMajor = 0,
    EasyMinor = 1,
    IslandMajor = 2,
    IslandMinor = 3,
    BluesMajor = 4,
    BluesMinor = 5,
    #[default]
    NormalMajor = 6,
    NormalMinor = 7,
    DoubleHarmonicMajor = 8,
    DoubleHarmonicMinor = 9,
    Enigma = 10,
    Expert = 11,
}

indexed_enum!(Scale {
    EasyMajor,
    EasyMinor,
    IslandMajor,
    IslandMinor,
    BluesMajor,
    BluesMinor,
    NormalMajor,
    NormalMinor,
    DoubleHarmonicMajor,
    DoubleHarmonicMinor,
    Enigma,
    Expert,
});

// Bit `n` set means semitone `n` above the key belongs to the scale.
const SCALE_FLAGS: [u16; 12] = [
    0b0010_1001_0101,
    0b0100_1010_1001,
    0b1000_1011_0001,
    0b0001_1000_1011,
    0b0010_1001_1101,
    0b0100_1110_1001,
    0b1010_1011_0101,
    0b0101_1010_1101,
    0b1001_1011_0011,
    0b1001_1100_1101,
    0b0101_0101_0101,
    0b1111_1111_1111,
];

impl Scale {
    /// Whether a pitch, relative to the key, belongs to the scale.
    pub fn contains(self, pitch: i32) -> bool {
        let semitone = pitch.rem_euclid(12);
        SCALE_FLAGS[self.index()] & (1 << semitone) != 0
    }
}

/// Decimation of the master output, for lo-fi rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SampleRateMode {
    #[default]
    Full = 0,
    Half = 1,
    Quarter = 2,
    Eighth = 3,
}

indexed_enum!(SampleRateMode { Full, Half, Quarter, Eighth });

impl SampleRateMode {
    /// Number of output frames each rendered frame is held for.
    #[inline]
    pub fn hold_frames(self) -> usize {
        1 << self.index()
    }
}
