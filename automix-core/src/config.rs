//! Mix configuration and style presets
//!
//! `MixConfig` is an immutable per-request value: it is constructed from the
//! classic defaults plus a named preset overlay and threaded explicitly
//! through scorer, sequencer, and planner calls. Concurrent requests using
//! different presets never observe each other's configuration.

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Relative weights over the scoring criteria
///
/// Treated as relative magnitudes; the scorer normalizes by the weight sum,
/// so presets may reweight individual criteria without rebalancing the rest.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreWeights {
    pub key: f64,
    pub tempo: f64,
    pub energy: f64,
    pub phrase: f64,
    pub vocal: f64,
}

impl ScoreWeights {
    /// Sum of all weights, used for normalization
    pub fn total(&self) -> f64 {
        self.key + self.tempo + self.energy + self.phrase + self.vocal
    }
}

/// Tempo constraints for seeding and scoring
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TempoLimits {
    /// Ideal set tempo (BPM)
    pub ideal_bpm: f64,

    /// Distance from ideal still considered "on tempo" (BPM)
    pub tolerance_bpm: f64,

    /// Soft acceptable band, lower bound (BPM)
    pub soft_lo: f64,

    /// Soft acceptable band, upper bound (BPM)
    pub soft_hi: f64,

    /// Maximum timestretch, percent
    pub max_stretch_pct: f64,
}

/// Transition style resolved from the preset
///
/// Replaces the caller-supplied "techno" boolean so that style policy stays
/// centralized with the presets; requests may still override it explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionStyle {
    Default,
    Techno,
}

/// Crossfade defaults per transition style
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransitionConfig {
    pub default_crossfade_beats: u32,
    pub techno_crossfade_beats: u32,
    pub style: TransitionStyle,
}

impl TransitionConfig {
    /// Crossfade length in beats for the configured style
    pub fn crossfade_beats(&self) -> u32 {
        match self.style {
            TransitionStyle::Default => self.default_crossfade_beats,
            TransitionStyle::Techno => self.techno_crossfade_beats,
        }
    }
}

/// Complete engine configuration for one request
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MixConfig {
    pub weights: ScoreWeights,
    pub limits: TempoLimits,
    pub transition: TransitionConfig,
}

impl Default for MixConfig {
    /// Classic defaults: 128 BPM techno set, soft band 124-136
    fn default() -> Self {
        Self {
            weights: ScoreWeights {
                key: 0.35,
                tempo: 0.30,
                energy: 0.20,
                phrase: 0.10,
                vocal: 0.05,
            },
            limits: TempoLimits {
                ideal_bpm: 128.0,
                tolerance_bpm: 4.0,
                soft_lo: 124.0,
                soft_hi: 136.0,
                max_stretch_pct: 6.0,
            },
            transition: TransitionConfig {
                default_crossfade_beats: 16,
                techno_crossfade_beats: 24,
                style: TransitionStyle::Techno,
            },
        }
    }
}

impl MixConfig {
    /// Build the configuration for a named preset
    ///
    /// Presets overlay the classic defaults; fields a preset does not
    /// specify keep the classic values. An unknown name falls back to the
    /// classic defaults (documented behavior, not an error).
    pub fn for_preset(name: &str) -> Self {
        let mut cfg = Self::default();
        match name {
            "classic" => {}
            "deep_minimal" => {
                cfg.limits.soft_lo = 122.0;
                cfg.limits.soft_hi = 126.0;
                cfg.limits.ideal_bpm = 124.0;
                cfg.limits.tolerance_bpm = 3.0;
                cfg.limits.max_stretch_pct = 4.0;
                cfg.transition.techno_crossfade_beats = 32;
                cfg.weights.vocal = 0.07;
                cfg.weights.energy = 0.18;
            }
            "peak_warehouse" => {
                cfg.limits.soft_lo = 128.0;
                cfg.limits.soft_hi = 134.0;
                cfg.limits.ideal_bpm = 130.0;
                cfg.limits.tolerance_bpm = 3.0;
                cfg.limits.max_stretch_pct = 5.0;
                cfg.weights.energy = 0.25;
                cfg.weights.vocal = 0.04;
            }
            "hard_techno" => {
                cfg.limits.soft_lo = 140.0;
                cfg.limits.soft_hi = 150.0;
                cfg.limits.ideal_bpm = 145.0;
                cfg.limits.tolerance_bpm = 4.0;
                cfg.limits.max_stretch_pct = 3.0;
                cfg.transition.techno_crossfade_beats = 12;
                cfg.weights.tempo = 0.35;
                cfg.weights.energy = 0.25;
                cfg.weights.vocal = 0.03;
            }
            "hypnotic" => {
                cfg.limits.soft_lo = 130.0;
                cfg.limits.soft_hi = 134.0;
                cfg.limits.ideal_bpm = 132.0;
                cfg.limits.tolerance_bpm = 2.0;
                cfg.limits.max_stretch_pct = 5.0;
                cfg.transition.techno_crossfade_beats = 32;
                cfg.weights.energy = 0.18;
                cfg.weights.phrase = 0.12;
            }
            other => {
                debug!("Unknown preset {:?}, using classic defaults", other);
            }
        }
        cfg
    }

    /// Names of all registered presets
    pub fn preset_names() -> &'static [&'static str] {
        &[
            "classic",
            "deep_minimal",
            "peak_warehouse",
            "hard_techno",
            "hypnotic",
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classic_defaults() {
        let cfg = MixConfig::for_preset("classic");
        assert_eq!(cfg.limits.ideal_bpm, 128.0);
        assert_eq!(cfg.limits.soft_lo, 124.0);
        assert_eq!(cfg.limits.soft_hi, 136.0);
        assert_eq!(cfg.transition.techno_crossfade_beats, 24);
        assert_eq!(cfg.transition.crossfade_beats(), 24);
    }

    #[test]
    fn test_preset_overlays_keep_unspecified_fields() {
        let cfg = MixConfig::for_preset("hard_techno");
        assert_eq!(cfg.limits.ideal_bpm, 145.0);
        assert_eq!(cfg.transition.techno_crossfade_beats, 12);
        // hard_techno does not touch key/phrase weights or the default crossfade
        assert_eq!(cfg.weights.key, 0.35);
        assert_eq!(cfg.weights.phrase, 0.10);
        assert_eq!(cfg.transition.default_crossfade_beats, 16);
    }

    #[test]
    fn test_unknown_preset_falls_back_to_classic() {
        let cfg = MixConfig::for_preset("acid_breaks");
        assert_eq!(cfg, MixConfig::default());
    }

    #[test]
    fn test_style_override_selects_default_crossfade() {
        let mut cfg = MixConfig::for_preset("classic");
        cfg.transition.style = TransitionStyle::Default;
        assert_eq!(cfg.transition.crossfade_beats(), 16);
    }

    #[test]
    fn test_all_registered_presets_resolve() {
        for name in MixConfig::preset_names() {
            let cfg = MixConfig::for_preset(name);
            assert!(cfg.weights.total() > 0.0, "{} has empty weights", name);
            assert!(cfg.limits.soft_lo < cfg.limits.soft_hi, "{} band inverted", name);
        }
    }
}
