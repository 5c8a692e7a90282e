//! API models for the panel surface
//!
//! The panel endpoints exchange small command payloads and return the
//! orchestrator's [`PanelSnapshot`](crate::embed::PanelSnapshot) so the
//! host UI always renders from one authoritative view. Settings payloads
//! reuse the persisted wire shape
//! (`{ "iframeConfigs": [...], "activeIframeId"? }`) verbatim.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::handlers::HandlerParams;
use crate::location::Place;
use crate::observability::MetricsSnapshot;

/// Switch the active configuration
#[derive(Debug, Serialize, Deserialize)]
pub struct SelectRequest {
    pub config_id: String,
}

/// Signal reported by the host's render target
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FrameSignal {
    Load,
    Error,
}

/// The render target reported a load/error signal for a render attempt
#[derive(Debug, Serialize, Deserialize)]
pub struct FrameEventRequest {
    pub event: FrameSignal,
    pub attempt: u64,
}

/// Overlay-submitted handler parameters
#[derive(Debug, Serialize, Deserialize)]
pub struct ParamsRequest {
    pub params: HandlerParams,
}

/// Direct frame source rewrite
#[derive(Debug, Serialize, Deserialize)]
pub struct SrcRequest {
    pub src: String,
}

/// Create a configuration (the id is generated server-side)
#[derive(Debug, Serialize, Deserialize)]
pub struct CreateConfigRequest {
    pub name: String,
    #[serde(rename = "embedCode")]
    pub embed_code: String,
}

/// Replace a configuration's name and embed code
#[derive(Debug, Serialize, Deserialize)]
pub struct UpdateConfigRequest {
    pub name: String,
    #[serde(rename = "embedCode")]
    pub embed_code: String,
}

/// Identity of a registered embed handler
#[derive(Debug, Serialize, Deserialize)]
pub struct HandlerSummary {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SearchQuery {
    pub q: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SearchResponse {
    pub query: String,
    /// True when a newer query superseded this one; the result list is
    /// then empty and must not replace newer results in the host UI
    pub superseded: bool,
    pub results: Vec<Place>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ImportSummary {
    pub config_count: usize,
    #[serde(rename = "activeIframeId", skip_serializing_if = "Option::is_none")]
    pub active_iframe_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub code: &'static str,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub components: HashMap<String, String>,
    pub version: String,
    pub metrics: MetricsSnapshot,
}
