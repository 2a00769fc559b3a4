//! Track feature model and transition plan types
//!
//! Inputs are analyzed tracks (tempo, harmonic key, cue points, energy
//! profile); outputs are immutable transition plans. The engine never
//! computes audio features itself, it only consumes already-populated
//! `TrackFeature` records.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

// ========================================
// Harmonic Key
// ========================================

/// Mode half of a Camelot wheel position
///
/// A = minor side, B = major side of the wheel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyMode {
    A,
    B,
}

/// Harmonic key in Camelot notation: a wheel position 1-12 plus mode A/B
///
/// Parses from / renders to the conventional string form ("8A", "12B").
/// Malformed keys are rejected at construction rather than tolerated with
/// a neutral score downstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CamelotKey {
    position: u8,
    mode: KeyMode,
}

impl CamelotKey {
    /// Create a key, validating the wheel position
    pub fn new(position: u8, mode: KeyMode) -> Result<Self> {
        if !(1..=12).contains(&position) {
            return Err(Error::InvalidInput(format!(
                "Camelot position must be 1-12, got {}",
                position
            )));
        }
        Ok(Self { position, mode })
    }

    /// Wheel position (1-12)
    pub fn position(&self) -> u8 {
        self.position
    }

    /// Mode (A or B)
    pub fn mode(&self) -> KeyMode {
        self.mode
    }

    /// The two adjacent wheel positions (circular neighbors)
    pub fn neighbors(&self) -> [u8; 2] {
        let n = self.position;
        [((n + 10) % 12) + 1, (n % 12) + 1]
    }
}

impl FromStr for CamelotKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let malformed = || Error::InvalidInput(format!("Malformed Camelot key: {:?}", s));
        if !s.is_ascii() || s.len() < 2 {
            return Err(malformed());
        }
        let (num, mode) = s.split_at(s.len() - 1);
        let position: u8 = num.parse().map_err(|_| malformed())?;
        let mode = match mode {
            "A" | "a" => KeyMode::A,
            "B" | "b" => KeyMode::B,
            _ => return Err(malformed()),
        };
        Self::new(position, mode)
    }
}

impl fmt::Display for CamelotKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mode = match self.mode {
            KeyMode::A => 'A',
            KeyMode::B => 'B',
        };
        write!(f, "{}{}", self.position, mode)
    }
}

impl TryFrom<String> for CamelotKey {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<CamelotKey> for String {
    fn from(key: CamelotKey) -> String {
        key.to_string()
    }
}

// ========================================
// Track Features
// ========================================

/// Analyzed audio track supplied to the sequencer
///
/// Immutable input record. BPM/key/energy are assumed already computed by
/// an upstream analyzer. Optional fields map to neutral contributions in
/// scoring when absent; present values are validated by [`validate`].
///
/// [`validate`]: TrackFeature::validate
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackFeature {
    /// Unique track identifier
    pub id: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub artist: Option<String>,

    /// Track duration in seconds (> 0)
    pub duration_sec: f64,

    /// Tempo in beats per minute (> 0)
    pub bpm: f64,

    /// Harmonic key in Camelot notation
    pub key: CamelotKey,

    /// Ordered energy samples in [0,1] spanning the track
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub energy_curve: Option<Vec<f64>>,

    /// Downbeat timestamps in seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub downbeats: Option<Vec<f64>>,

    /// Intended playable-segment start (seconds)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cue_in_sec: Option<f64>,

    /// Intended playable-segment end (seconds)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cue_out_sec: Option<f64>,

    /// Vocal-presence score in [0,1]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vocality: Option<f64>,

    /// Free-form tags
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,

    /// Playable-path reference, opaque to the engine
    pub path: String,
}

impl TrackFeature {
    /// Validate the record's numeric invariants
    ///
    /// Checked before any search work begins:
    /// - duration and bpm strictly positive and finite
    /// - cue-in < cue-out <= duration when cue points are present
    /// - vocality and energy samples within [0,1]
    pub fn validate(&self) -> Result<()> {
        let bad = |msg: String| Err(Error::InvalidInput(msg));

        if self.id.is_empty() {
            return bad(format!("Track at path {:?} has an empty id", self.path));
        }
        if !(self.duration_sec.is_finite() && self.duration_sec > 0.0) {
            return bad(format!(
                "Track {}: duration_sec must be > 0, got {}",
                self.id, self.duration_sec
            ));
        }
        if !(self.bpm.is_finite() && self.bpm > 0.0) {
            return bad(format!("Track {}: bpm must be > 0, got {}", self.id, self.bpm));
        }
        if let (Some(cin), Some(cout)) = (self.cue_in_sec, self.cue_out_sec) {
            if !(cin < cout && cout <= self.duration_sec) {
                return bad(format!(
                    "Track {}: cue points must satisfy cue_in < cue_out <= duration \
                     (got {} / {} / {})",
                    self.id, cin, cout, self.duration_sec
                ));
            }
        }
        if let Some(v) = self.vocality {
            if !(0.0..=1.0).contains(&v) {
                return bad(format!("Track {}: vocality must be in [0,1], got {}", self.id, v));
            }
        }
        if let Some(curve) = &self.energy_curve {
            if curve.iter().any(|e| !(0.0..=1.0).contains(e)) {
                return bad(format!("Track {}: energy samples must be in [0,1]", self.id));
            }
        }
        Ok(())
    }

    /// Resolved play window: [cue-in or 0, cue-out or duration]
    pub fn play_window(&self) -> (f64, f64) {
        (
            self.cue_in_sec.unwrap_or(0.0),
            self.cue_out_sec.unwrap_or(self.duration_sec),
        )
    }

    /// Display title: "Artist - Title", falling back to the identifier
    pub fn display_title(&self) -> String {
        match (&self.artist, &self.title) {
            (Some(artist), Some(title)) => format!("{} - {}", artist, title),
            (None, Some(title)) => title.clone(),
            (Some(artist), None) => format!("{} - {}", artist, self.id),
            (None, None) => self.id.clone(),
        }
    }
}

// ========================================
// Transition Plan
// ========================================

/// Filter automation shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterMode {
    /// High-pass cutoff ramp across the crossfade window
    HipassRamp,
}

/// Typed automation event attached to a playlist item
///
/// Tagged variant so downstream consumers can exhaustively handle known
/// effect kinds and safely ignore unknown ones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AutomationEvent {
    /// Filter sweep spanning the crossfade into the next track
    Filter {
        mode: FilterMode,
        from_hz: f64,
        to_hz: f64,
        duration_beats: u32,
    },
}

/// One track placed in the final plan, with resolved transition parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistItem {
    pub track: TrackFeature,

    /// Resolved play-window start (seconds into the track)
    pub start_at: f64,

    /// Resolved play-window end (seconds into the track)
    pub end_at: f64,

    /// Timestretch to apply, as a percentage
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stretch_pct: Option<f64>,

    /// Key transpose in semitones
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transpose_semitones: Option<i8>,

    /// Crossfade length into the next item, in beats (0 for the final item)
    pub crossfade_beats: u32,

    /// Automation events spanning the crossfade window
    #[serde(default)]
    pub automation: Vec<AutomationEvent>,
}

impl PlaylistItem {
    /// Length of the resolved play window in seconds
    pub fn window_sec(&self) -> f64 {
        self.end_at - self.start_at
    }
}

/// Ordered transition plan for a full set
///
/// Pure derived value: items appear in playback order, `total_sec` is the
/// sum of resolved play windows, and the plan is never mutated after
/// construction, only replaced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransitionPlan {
    pub items: Vec<PlaylistItem>,

    /// Total plan duration in seconds
    pub total_sec: f64,

    /// Average pairwise compatibility score carried from sequencing
    /// (0 when not computed, e.g. single-item plans)
    pub avg_score: f64,
}

impl TransitionPlan {
    /// Empty plan with zero duration and zero average score
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            total_sec: 0.0,
            avg_score: 0.0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
