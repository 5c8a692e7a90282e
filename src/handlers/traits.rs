use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Parameters submitted from a handler overlay (e.g. a picked location)
pub type HandlerParams = BTreeMap<String, String>;

/// Structured fields a handler pulled out of a frame URL (e.g. an API key)
pub type HandlerConfigMap = BTreeMap<String, String>;

/// Declarative overlay the host UI renders on top of the frame for the
/// matching handler. Interactions come back through the params update
/// path; overlays never mutate the frame source directly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OverlaySpec {
    LocationSearch { placeholder: String },
}

/// Capability interface for embed handlers.
///
/// A handler recognizes one family of embed URLs and optionally supplies
/// structured config extraction, a custom overlay, and URL rewriting for
/// it. Only `can_handle` is required; the other capabilities default to
/// no-ops, so new embed families are added by implementing exactly the
/// capabilities they need.
///
/// All methods must be cheap, side-effect-free and panic-free:
/// `can_handle` runs on every resolution, and `update_url` degrades to
/// returning its input unchanged on any malformed input rather than
/// failing (an empty return would blank the frame).
pub trait EmbedHandler: Send + Sync {
    /// Unique identifier for this handler
    fn id(&self) -> &str;

    /// Human-readable name for this handler
    fn name(&self) -> &str;

    /// Whether this handler recognizes the given frame source URL
    fn can_handle(&self, src: &str) -> bool;

    /// Extract structured configuration from the frame URL. Fields that
    /// are not found are present with an empty value.
    fn extract_config(&self, _src: &str) -> HandlerConfigMap {
        HandlerConfigMap::new()
    }

    /// Overlay to render for this frame, if any
    fn overlay(&self, _src: &str, _config: &HandlerConfigMap) -> Option<OverlaySpec> {
        None
    }

    /// Rewrite the frame URL from overlay parameters. Returns `base_url`
    /// unchanged when the URL is not of this handler's family or a
    /// required parameter is missing.
    fn update_url(&self, base_url: &str, _params: &HandlerParams) -> String {
        base_url.to_string()
    }
}
