//! Autoplaylist request handler
//!
//! Orchestrates the engine for one request: validate the pool and options,
//! resolve the preset into an immutable per-request configuration, run the
//! beam search, plan transitions, render both exports, and broadcast the
//! result on the event bus. Malformed input is rejected before any search
//! work begins; an empty pool is not an error and yields an empty plan.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use automix_core::config::{MixConfig, TransitionStyle};
use automix_core::error::Error;
use automix_core::events::MixEvent;
use automix_core::export::{to_m3u, to_txt};
use automix_core::model::{TrackFeature, TransitionPlan};
use automix_core::plan::plan_transitions;
use automix_core::search::beam_search;

use crate::AppState;

fn default_minutes() -> f64 {
    60.0
}

fn default_beam_width() -> usize {
    24
}

fn default_preset() -> String {
    "classic".to_string()
}

/// Autoplaylist request body
#[derive(Debug, Clone, Deserialize)]
pub struct AutoplaylistRequest {
    /// Analyzed track pool
    pub tracks: Vec<TrackFeature>,

    /// Target set duration in minutes
    #[serde(default = "default_minutes")]
    pub minutes: f64,

    /// Beam width bounding search cost
    #[serde(default = "default_beam_width")]
    pub beam_width: usize,

    /// Preset name; unknown names fall back to classic defaults
    #[serde(default = "default_preset")]
    pub preset: String,

    /// Optional transition-style override; absent means the preset's style
    #[serde(default)]
    pub style: Option<TransitionStyle>,
}

/// Autoplaylist response
#[derive(Debug, Serialize)]
pub struct AutoplaylistResponse {
    pub ok: bool,
    pub plan: TransitionPlan,
    pub m3u: String,
    pub txt: String,
}

/// Error body with a stable error category
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub ok: bool,
    pub error: String,
    pub message: String,
}

fn bad_request(err: Error) -> (StatusCode, Json<ErrorBody>) {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorBody {
            ok: false,
            error: "invalid_input".to_string(),
            message: err.to_string(),
        }),
    )
}

fn validate(req: &AutoplaylistRequest) -> Result<(), Error> {
    if !(req.minutes.is_finite() && req.minutes > 0.0) {
        return Err(Error::InvalidInput(format!(
            "minutes must be > 0, got {}",
            req.minutes
        )));
    }
    if req.beam_width == 0 {
        return Err(Error::InvalidInput("beam_width must be >= 1".to_string()));
    }
    for track in &req.tracks {
        track.validate()?;
    }
    Ok(())
}

/// POST /api/autoplaylist - sequence a track pool into a transition plan
pub async fn generate_autoplaylist(
    State(state): State<AppState>,
    Json(req): Json<AutoplaylistRequest>,
) -> Result<Json<AutoplaylistResponse>, (StatusCode, Json<ErrorBody>)> {
    validate(&req).map_err(bad_request)?;

    let mut config = MixConfig::for_preset(&req.preset);
    if let Some(style) = req.style {
        config.transition.style = style;
    }
    debug!(
        preset = %req.preset,
        pool = req.tracks.len(),
        minutes = req.minutes,
        beam_width = req.beam_width,
        "Autoplaylist request"
    );

    let outcome = beam_search(&req.tracks, req.minutes, req.beam_width, &config);
    let plan = plan_transitions(&outcome.tracks, outcome.avg_score, &config);
    let m3u = to_m3u(&plan);
    let txt = to_txt(&plan);

    info!(
        tracks = plan.items.len(),
        total_sec = plan.total_sec.round(),
        avg_score = plan.avg_score,
        "Plan generated"
    );

    // Listeners are optional; an empty bus is not an error
    state
        .event_bus
        .emit(MixEvent::PlanGenerated {
            preset: req.preset.clone(),
            plan: plan.clone(),
            m3u: m3u.clone(),
            txt: txt.clone(),
            timestamp: chrono::Utc::now(),
        })
        .ok();

    Ok(Json(AutoplaylistResponse {
        ok: true,
        plan,
        m3u,
        txt,
    }))
}
