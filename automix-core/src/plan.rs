//! Transition planning
//!
//! Converts an ordered sequence of tracks into a `TransitionPlan`: resolved
//! play windows from cue points, crossfade lengths from the configured
//! transition style, and a fixed high-pass filter sweep across each
//! crossfade window. The transform is deterministic; nothing here is
//! search-driven.

use crate::config::MixConfig;
use crate::model::{AutomationEvent, FilterMode, PlaylistItem, TrackFeature, TransitionPlan};

/// High-pass ramp applied across every crossfade window
const HIPASS_FROM_HZ: f64 = 80.0;
const HIPASS_TO_HZ: f64 = 260.0;

/// Build the transition plan for a sequenced set
///
/// Crossfade length comes from `config.transition` (techno or default beats
/// per the configured style); the final item gets crossfade 0 since nothing
/// follows it. `avg_score` is carried from the sequencing stage and forced
/// to 0 for plans with fewer than two items.
pub fn plan_transitions(
    sequence: &[TrackFeature],
    avg_score: f64,
    config: &MixConfig,
) -> TransitionPlan {
    let crossfade = config.transition.crossfade_beats();

    let mut items = Vec::with_capacity(sequence.len());
    for (i, track) in sequence.iter().enumerate() {
        let has_next = i + 1 < sequence.len();
        let (start_at, end_at) = track.play_window();

        let (crossfade_beats, automation) = if has_next {
            let sweep = AutomationEvent::Filter {
                mode: FilterMode::HipassRamp,
                from_hz: HIPASS_FROM_HZ,
                to_hz: HIPASS_TO_HZ,
                duration_beats: crossfade,
            };
            (crossfade, vec![sweep])
        } else {
            (0, Vec::new())
        };

        items.push(PlaylistItem {
            track: track.clone(),
            start_at,
            end_at,
            stretch_pct: None,
            transpose_semitones: None,
            crossfade_beats,
            automation,
        });
    }

    let total_sec = items.iter().map(PlaylistItem::window_sec).sum();
    TransitionPlan {
        items,
        total_sec,
        avg_score: if sequence.len() <= 1 { 0.0 } else { avg_score },
    }
}
