//! Pairwise transition compatibility scoring
//!
//! `compat_score(a, b, config)` rates how well track `b` follows track `a`:
//! non-negative, finite, higher is better. Five sub-scores, each normalized
//! to [0,1], are combined under the configured weights and normalized by the
//! weight sum. The function is deterministic and side-effect-free.
//!
//! Direction matters: tempo judges `b` against the set's band and energy
//! compares the end of `a` to the start of `b`, so `compat_score(a, b)` is
//! generally not equal to `compat_score(b, a)`.

use crate::config::{MixConfig, TempoLimits};
use crate::model::{CamelotKey, KeyMode, TrackFeature};

/// Fraction of the energy curve considered "late in a" / "early in b"
const ENERGY_EDGE_FRACTION: f64 = 0.25;

/// Neutral sub-score used when a track lacks the relevant feature data
const NEUTRAL_ENERGY: f64 = 0.6;
const NEUTRAL_PHRASE: f64 = 0.5;

/// Downbeat offset tolerance as a fraction of the bar length
const PHRASE_BAR_TOLERANCE: f64 = 0.05;

/// Compatibility score for transitioning from `a` into `b`
pub fn compat_score(a: &TrackFeature, b: &TrackFeature, config: &MixConfig) -> f64 {
    let w = &config.weights;
    let total = w.total();
    if total <= 0.0 {
        return 0.0;
    }

    let weighted = w.key * key_score(a.key, b.key)
        + w.tempo * tempo_score(a.bpm, b.bpm, &config.limits)
        + w.energy * energy_score(a, b)
        + w.phrase * phrase_score(a, b)
        + w.vocal * vocal_score(a, b);

    (weighted / total).clamp(0.0, 1.0)
}

/// Harmonic compatibility on the Camelot wheel
///
/// Same key 1.0; same position with a mode swap 0.85; adjacent position in
/// the same mode 0.8; adjacent with a mode swap 0.6; anything further is a
/// low base with a small nudge toward the minor (A) side.
fn key_score(a: CamelotKey, b: CamelotKey) -> f64 {
    let same_position = a.position() == b.position();
    let mode_swap = a.mode() != b.mode();
    if same_position && !mode_swap {
        return 1.0;
    }
    if same_position {
        return 0.85;
    }
    let neighbor = a.neighbors().contains(&b.position());
    match (neighbor, mode_swap) {
        (true, false) => 0.8,
        (true, true) => 0.6,
        _ => {
            if b.mode() == KeyMode::A {
                0.45
            } else {
                0.4
            }
        }
    }
}

/// Tempo compatibility under the stretch tolerance and soft band
///
/// The tempo ratio is folded into [0.5, 2.0] so half/double-time readings
/// still compare. Within the stretch tolerance the score maps to
/// [0.5, 1.0]; outside it decays sharply and stays strictly below 0.5, so
/// no out-of-tolerance pair can outrank an in-tolerance pair of the same
/// band status. The soft band then scales the result for off-band
/// candidates and near-ideal candidates earn a small bonus.
fn tempo_score(a_bpm: f64, b_bpm: f64, limits: &TempoLimits) -> f64 {
    let max = limits.max_stretch_pct / 100.0;
    if max <= 0.0 {
        return if a_bpm == b_bpm { 1.0 } else { 0.05 };
    }

    let mut ratio = b_bpm / a_bpm;
    if ratio < 0.5 {
        ratio *= 2.0;
    } else if ratio > 2.0 {
        ratio /= 2.0;
    }
    let diff = (1.0 - ratio).abs();

    let mut base = if diff <= max {
        1.0 - 0.5 * (diff / max)
    } else {
        // Sharp decay: 0.45 just outside tolerance down to 0.05 at 4x
        (0.45 * (1.0 - (diff - max) / (3.0 * max))).clamp(0.05, 0.45)
    };

    if b_bpm < limits.soft_lo || b_bpm > limits.soft_hi {
        base *= 0.6;
    } else if (b_bpm - limits.ideal_bpm).abs() <= limits.tolerance_bpm {
        base = (base + 0.1).min(1.0);
    }
    base
}

/// Energy-flow compatibility: end of `a` against the start of `b`
///
/// Compares the mean of the last quarter of a's energy curve with the mean
/// of the first quarter of b's. Neutral when either curve is absent.
fn energy_score(a: &TrackFeature, b: &TrackFeature) -> f64 {
    let tail = edge_mean(a.energy_curve.as_deref(), true);
    let head = edge_mean(b.energy_curve.as_deref(), false);
    match (tail, head) {
        (Some(t), Some(h)) => (1.0 - ((t - h).abs() * 1.2).min(1.0)).max(0.0),
        _ => NEUTRAL_ENERGY,
    }
}

fn edge_mean(curve: Option<&[f64]>, tail: bool) -> Option<f64> {
    let curve = curve.filter(|c| !c.is_empty())?;
    let n = ((curve.len() as f64 * ENERGY_EDGE_FRACTION) as usize).max(1);
    let slice = if tail {
        &curve[curve.len() - n..]
    } else {
        &curve[..n]
    };
    Some(slice.iter().sum::<f64>() / n as f64)
}

/// Phrase alignment bonus
///
/// Uses a's downbeat spacing as the bar length and checks whether b's first
/// downbeat lands near a bar boundary. Aligned candidates earn the full
/// bonus, unaligned-but-phrased candidates a reduced one; neutral when
/// either track lacks downbeat data.
fn phrase_score(a: &TrackFeature, b: &TrackFeature) -> f64 {
    let (a_beats, b_beats) = match (a.downbeats.as_deref(), b.downbeats.as_deref()) {
        (Some(x), Some(y)) if x.len() > 1 && !y.is_empty() => (x, y),
        _ => return NEUTRAL_PHRASE,
    };
    let bar = a_beats[1] - a_beats[0];
    if !(bar.is_finite() && bar > 0.0) {
        return NEUTRAL_PHRASE;
    }
    let offset = b_beats[0].rem_euclid(bar);
    let distance = offset.min(bar - offset);
    if distance <= PHRASE_BAR_TOLERANCE * bar {
        0.9
    } else {
        0.7
    }
}

/// Vocal-clash avoidance
///
/// Penalty proportional to the product of both tracks' vocal-presence
/// scores, so two vocal-heavy tracks score poorly while an instrumental on
/// either side neutralizes the penalty. Missing vocality counts as 0.
fn vocal_score(a: &TrackFeature, b: &TrackFeature) -> f64 {
    let va = a.vocality.unwrap_or(0.0);
    let vb = b.vocality.unwrap_or(0.0);
    1.0 - (va * vb).min(1.0)
}
