//! HTTP API handlers for automix-api

pub mod health;
pub mod playlist;
pub mod sse;

pub use health::health;
pub use playlist::generate_autoplaylist;
pub use sse::event_stream;
