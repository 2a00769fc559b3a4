//! # AutoMix Core Library
//!
//! Automatic DJ-set sequencing engine:
//! - Track feature model and transition plan types
//! - Immutable mix configuration with named style presets
//! - Pairwise compatibility scorer (key / tempo / energy / phrase / vocal)
//! - Width-bounded beam search over sequencing choices
//! - Transition planner (play windows, crossfades, filter automation)
//! - Plan exporters (M3U interchange, text summary)
//! - Event types (MixEvent enum) and EventBus

pub mod config;
pub mod error;
pub mod events;
pub mod export;
pub mod model;
pub mod plan;
pub mod score;
pub mod search;

pub use config::{MixConfig, TransitionStyle};
pub use error::{Error, Result};
pub use model::{TrackFeature, TransitionPlan};
