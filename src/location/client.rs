//! Geocoding client backing the location-search overlay
//!
//! Talks to a Nominatim-compatible endpoint (OpenStreetMap's public
//! instance by default; no API key required).

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;
use url::Url;

#[derive(Debug, Error)]
pub enum GeocodeError {
    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

pub type Result<T> = std::result::Result<T, GeocodeError>;

/// Raw Nominatim search hit
#[derive(Debug, Deserialize)]
struct NominatimPlace {
    place_id: u64,
    display_name: String,
    lat: String,
    lon: String,
}

/// A location suggestion as shown in the overlay result list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    pub description: String,
    pub place_id: String,
    pub lat: String,
    pub lon: String,
    pub main_text: String,
    pub secondary_text: String,
}

impl Place {
    /// Split the display name into a headline and a shortened context line
    fn from_raw(raw: NominatimPlace) -> Self {
        let parts: Vec<&str> = raw.display_name.split(", ").collect();
        let main_text = parts
            .first()
            .map(|part| part.to_string())
            .unwrap_or_else(|| raw.display_name.clone());
        let secondary_text = parts
            .get(1..)
            .map(|rest| {
                rest.iter()
                    .take(2)
                    .copied()
                    .collect::<Vec<_>>()
                    .join(", ")
            })
            .unwrap_or_default();

        Self {
            description: raw.display_name,
            place_id: raw.place_id.to_string(),
            lat: raw.lat,
            lon: raw.lon,
            main_text,
            secondary_text,
        }
    }
}

/// Provider seam so the debounced search session can be tested without a
/// network
#[async_trait]
pub trait GeocodeProvider: Send + Sync {
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<Place>>;
}

/// Nominatim-backed provider
pub struct NominatimClient {
    client: Client,
    endpoint: Url,
}

impl NominatimClient {
    pub fn new(endpoint: &str, user_agent: &str) -> Result<Self> {
        let endpoint = Url::parse(endpoint)
            .map_err(|e| GeocodeError::InvalidEndpoint(format!("{endpoint}: {e}")))?;

        let client = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(30))
            .user_agent(user_agent)
            .build()
            .map_err(|e| GeocodeError::RequestFailed(e.to_string()))?;

        Ok(Self { client, endpoint })
    }
}

#[async_trait]
impl GeocodeProvider for NominatimClient {
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<Place>> {
        let mut url = self
            .endpoint
            .join("search")
            .map_err(|e| GeocodeError::InvalidEndpoint(e.to_string()))?;
        url.query_pairs_mut()
            .append_pair("format", "json")
            .append_pair("q", query.trim())
            .append_pair("limit", &limit.to_string())
            .append_pair("addressdetails", "1")
            .append_pair("extratags", "1")
            .append_pair("namedetails", "1");

        debug!(%url, "Fetching location suggestions");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| GeocodeError::RequestFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(GeocodeError::RequestFailed(format!(
                "HTTP {}: {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("Unknown")
            )));
        }

        let raw: Vec<NominatimPlace> = response
            .json()
            .await
            .map_err(|e| GeocodeError::InvalidResponse(e.to_string()))?;

        Ok(raw.into_iter().map(Place::from_raw).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(display_name: &str) -> NominatimPlace {
        NominatimPlace {
            place_id: 42,
            display_name: display_name.to_string(),
            lat: "48.85".to_string(),
            lon: "2.35".to_string(),
        }
    }

    #[test]
    fn splits_display_name_into_main_and_secondary() {
        let place = Place::from_raw(raw("Paris, Île-de-France, Metropolitan France, France"));

        assert_eq!(place.main_text, "Paris");
        assert_eq!(place.secondary_text, "Île-de-France, Metropolitan France");
        assert_eq!(
            place.description,
            "Paris, Île-de-France, Metropolitan France, France"
        );
        assert_eq!(place.place_id, "42");
    }

    #[test]
    fn single_segment_display_name() {
        let place = Place::from_raw(raw("Atlantis"));
        assert_eq!(place.main_text, "Atlantis");
        assert_eq!(place.secondary_text, "");
    }

    #[test]
    fn two_segment_display_name() {
        let place = Place::from_raw(raw("Berlin, Germany"));
        assert_eq!(place.main_text, "Berlin");
        assert_eq!(place.secondary_text, "Germany");
    }

    #[test]
    fn parses_nominatim_payload() {
        let json = r#"[
            {"place_id": 1, "display_name": "Paris, France", "lat": "48.85", "lon": "2.35", "type": "city", "importance": 0.96}
        ]"#;
        let raw: Vec<NominatimPlace> = serde_json::from_str(json).unwrap();
        assert_eq!(raw.len(), 1);
        assert_eq!(raw[0].display_name, "Paris, France");
    }

    #[test]
    fn rejects_unparseable_endpoint() {
        assert!(matches!(
            NominatimClient::new("not an endpoint", "test/1.0"),
            Err(GeocodeError::InvalidEndpoint(_))
        ));
    }
}
