//! Tests for bar fingerprints and the routine cache

use std::sync::Arc;

use chiptrack_dsp::fm::algorithms::Algorithm;
use chiptrack_dsp::fm::feedback::Feedback;
use chiptrack_dsp::synth::routine::{write_fingerprint, RoutineCache, VoiceTag};

#[test]
fn fingerprint_lists_channels() {
    let tags = [
        VoiceTag::Chip,
        VoiceTag::Fm(Algorithm::TwoPairs, Feedback::Self1),
        VoiceTag::Empty,
        VoiceTag::Pwm,
        VoiceTag::Noise,
    ];
    let mut fingerprint = String::new();
    write_fingerprint(&tags, &mut fingerprint);

    assert_eq!(fingerprint, "c|f5.0|_|p|n");
}

#[test]
fn routines_are_cached_by_fingerprint() {
    let mut cache = RoutineCache::new();
    assert!(cache.is_empty());

    let band = [VoiceTag::Chip, VoiceTag::Noise];
    let first = cache.get_or_compile(&band);
    let second = cache.get_or_compile(&band);
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(cache.len(), 1);
    assert_eq!(first.channel_count(), 2);

    let quiet = [VoiceTag::Empty, VoiceTag::Noise];
    cache.get_or_compile(&quiet);
    assert_eq!(cache.len(), 2);
    assert_eq!(cache.fingerprint(), "_|n");
}

#[test]
fn fm_settings_share_a_routine_only_when_routing_matches() {
    let mut cache = RoutineCache::new();

    cache.get_or_compile(&[VoiceTag::Fm(Algorithm::TwoPairs, Feedback::Self1)]);
    cache.get_or_compile(&[VoiceTag::Fm(Algorithm::TwoPairs, Feedback::Self1)]);
    assert_eq!(cache.len(), 1);

    cache.get_or_compile(&[VoiceTag::Fm(Algorithm::TwoPairs, Feedback::Self2)]);
    cache.get_or_compile(&[VoiceTag::Fm(Algorithm::Stack, Feedback::Self1)]);
    assert_eq!(cache.len(), 3);
}
