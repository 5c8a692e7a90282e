use regex::Regex;
use std::sync::LazyLock;

use super::traits::{EmbedHandler, HandlerConfigMap, HandlerParams, OverlaySpec};

const EMBED_MARKER: &str = "google.com/maps/embed";
const PLACE_ENDPOINT: &str = "https://www.google.com/maps/embed/v1/place";

static API_KEY_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"key=([^&]+)").unwrap());

/// Handler for the Google Maps embed family.
///
/// Recognizes embed URLs by their path marker, extracts the API key from
/// the query string, and rewrites the frame URL to a place search when the
/// overlay submits a location.
#[derive(Debug, Clone, Copy)]
pub struct MapsHandler;

impl MapsHandler {
    fn api_key(src: &str) -> String {
        API_KEY_RE
            .captures(src)
            .map(|captures| captures[1].to_string())
            .unwrap_or_default()
    }
}

impl EmbedHandler for MapsHandler {
    fn id(&self) -> &str {
        "maps-embed"
    }

    fn name(&self) -> &str {
        "Google Maps"
    }

    fn can_handle(&self, src: &str) -> bool {
        src.contains(EMBED_MARKER)
    }

    fn extract_config(&self, src: &str) -> HandlerConfigMap {
        // Absent key is present-but-empty, never a missing entry
        HandlerConfigMap::from([("api_key".to_string(), Self::api_key(src))])
    }

    fn overlay(&self, _src: &str, _config: &HandlerConfigMap) -> Option<OverlaySpec> {
        Some(OverlaySpec::LocationSearch {
            placeholder: "Search for a location on the map...".to_string(),
        })
    }

    fn update_url(&self, base_url: &str, params: &HandlerParams) -> String {
        if !self.can_handle(base_url) {
            return base_url.to_string();
        }

        let Some(location) = params.get("location").map(|l| l.trim()) else {
            return base_url.to_string();
        };
        if location.is_empty() {
            return base_url.to_string();
        }

        let api_key = Self::api_key(base_url);
        if api_key.is_empty() {
            return base_url.to_string();
        }

        let query = urlencoding::encode(location);
        format!("{PLACE_ENDPOINT}?key={api_key}&q={query}&maptype=roadmap")
    }
}
