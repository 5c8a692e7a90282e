//! Settings import/export
//!
//! Export produces pretty JSON in the persisted wire shape; import
//! validates structure before anything reaches the store. The shape,
//! uniqueness and active-reference rules mirror what `load` guarantees,
//! so an accepted import is indistinguishable from locally created
//! settings.

use std::collections::HashSet;
use thiserror::Error;

use super::models::PanelSettings;

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("invalid JSON: {0}")]
    MalformedJson(String),

    #[error("invalid settings shape: {0}")]
    InvalidShape(String),

    #[error("duplicate configuration id: {0}")]
    DuplicateId(String),

    #[error("activeIframeId '{0}' does not match any configuration id")]
    DanglingActiveReference(String),
}

impl ImportError {
    pub fn code(&self) -> &'static str {
        match self {
            ImportError::MalformedJson(_) => "MALFORMED_JSON",
            ImportError::InvalidShape(_) => "INVALID_SHAPE",
            ImportError::DuplicateId(_) => "DUPLICATE_ID",
            ImportError::DanglingActiveReference(_) => "DANGLING_ACTIVE_REFERENCE",
        }
    }
}

/// Serialize settings as pretty JSON in the exchange shape
pub fn export_settings(settings: &PanelSettings) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(settings)
}

/// Parse and validate imported settings text.
///
/// Enforces: well-formed JSON, the `{ iframeConfigs, activeIframeId? }`
/// shape with non-empty id/name/embedCode per configuration, unique ids,
/// and an active reference that matches an existing configuration.
pub fn validate_import(text: &str) -> Result<PanelSettings, ImportError> {
    let value: serde_json::Value =
        serde_json::from_str(text).map_err(|e| ImportError::MalformedJson(e.to_string()))?;

    let settings: PanelSettings =
        serde_json::from_value(value).map_err(|e| ImportError::InvalidShape(e.to_string()))?;

    let mut seen: HashSet<&str> = HashSet::new();
    for config in &settings.iframe_configs {
        if config.id.trim().is_empty() {
            return Err(ImportError::InvalidShape(
                "configuration id must be a non-empty string".to_string(),
            ));
        }
        if config.name.trim().is_empty() {
            return Err(ImportError::InvalidShape(format!(
                "configuration '{}' has an empty name",
                config.id
            )));
        }
        if config.embed_code.trim().is_empty() {
            return Err(ImportError::InvalidShape(format!(
                "configuration '{}' has an empty embedCode",
                config.id
            )));
        }

        if !seen.insert(config.id.as_str()) {
            return Err(ImportError::DuplicateId(config.id.clone()));
        }
    }

    if let Some(active) = &settings.active_iframe_id {
        if settings.find(active).is_none() {
            return Err(ImportError::DanglingActiveReference(active.clone()));
        }
    }

    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::models::EmbedConfig;

    fn sample_settings() -> PanelSettings {
        let configs = vec![
            EmbedConfig::new("Map", "<iframe src=\"https://maps.example/embed\"></iframe>"),
            EmbedConfig::new("Docs", "https://docs.example/widget"),
        ];
        let active = configs[0].id.clone();
        PanelSettings {
            iframe_configs: configs,
            active_iframe_id: Some(active),
        }
    }

    #[test]
    fn export_import_roundtrip_is_deep_equal() {
        let settings = sample_settings();

        let exported = export_settings(&settings).unwrap();
        let imported = validate_import(&exported).unwrap();

        assert_eq!(imported, settings);
    }

    #[test]
    fn roundtrip_without_active_reference() {
        let mut settings = sample_settings();
        settings.active_iframe_id = None;

        let exported = export_settings(&settings).unwrap();
        let imported = validate_import(&exported).unwrap();

        assert_eq!(imported, settings);
    }

    #[test]
    fn rejects_malformed_json() {
        let result = validate_import("{ not json");
        assert!(matches!(result, Err(ImportError::MalformedJson(_))));
    }

    #[test]
    fn rejects_wrong_shape() {
        let result = validate_import(r#"{"iframeConfigs": "not-an-array"}"#);
        assert!(matches!(result, Err(ImportError::InvalidShape(_))));

        let result = validate_import(r#"{"iframeConfigs": [{"id": "a", "name": "b"}]}"#);
        assert!(matches!(result, Err(ImportError::InvalidShape(_))));
    }

    #[test]
    fn rejects_empty_fields() {
        let text = r#"{"iframeConfigs": [{"id": "a", "name": "  ", "embedCode": "https://x"}]}"#;
        assert!(matches!(
            validate_import(text),
            Err(ImportError::InvalidShape(_))
        ));

        let text = r#"{"iframeConfigs": [{"id": "a", "name": "ok", "embedCode": ""}]}"#;
        assert!(matches!(
            validate_import(text),
            Err(ImportError::InvalidShape(_))
        ));
    }

    #[test]
    fn rejects_duplicate_ids() {
        let text = r#"{
            "iframeConfigs": [
                {"id": "dup", "name": "one", "embedCode": "https://one.example"},
                {"id": "dup", "name": "two", "embedCode": "https://two.example"}
            ]
        }"#;

        match validate_import(text) {
            Err(ImportError::DuplicateId(id)) => assert_eq!(id, "dup"),
            other => panic!("expected DuplicateId, got {other:?}"),
        }
    }

    #[test]
    fn rejects_dangling_active_reference() {
        let text = r#"{
            "iframeConfigs": [
                {"id": "a", "name": "one", "embedCode": "https://one.example"}
            ],
            "activeIframeId": "ghost"
        }"#;

        match validate_import(text) {
            Err(ImportError::DanglingActiveReference(id)) => assert_eq!(id, "ghost"),
            other => panic!("expected DanglingActiveReference, got {other:?}"),
        }
    }

    #[test]
    fn tolerates_unknown_top_level_fields() {
        let text = r#"{
            "iframeConfigs": [
                {"id": "a", "name": "one", "embedCode": "https://one.example"}
            ],
            "somethingElse": 42
        }"#;
        assert!(validate_import(text).is_ok());
    }
}
