use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A stored iframe configuration: a display name plus the raw embed code
/// the user pasted. Immutable once created except via explicit edit.
///
/// Serialized field names (`embedCode`) are part of the persisted and
/// import/export JSON contract and must not change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbedConfig {
    pub id: String,
    pub name: String,
    #[serde(rename = "embedCode")]
    pub embed_code: String,
}

impl EmbedConfig {
    /// Create a configuration with a fresh time-sortable id
    pub fn new(name: impl Into<String>, embed_code: impl Into<String>) -> Self {
        Self {
            id: Uuid::now_v7().to_string(),
            name: name.into(),
            embed_code: embed_code.into(),
        }
    }
}

/// The whole persisted panel state: the configuration collection plus an
/// optional active reference.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PanelSettings {
    #[serde(rename = "iframeConfigs", default)]
    pub iframe_configs: Vec<EmbedConfig>,
    #[serde(rename = "activeIframeId", skip_serializing_if = "Option::is_none")]
    pub active_iframe_id: Option<String>,
}

impl PanelSettings {
    pub fn find(&self, id: &str) -> Option<&EmbedConfig> {
        self.iframe_configs.iter().find(|config| config.id == id)
    }

    /// Resolve the active configuration. A dangling `active_iframe_id`
    /// falls back to the first configuration; it is never treated as fatal.
    pub fn resolve_active(&self) -> Option<&EmbedConfig> {
        self.active_iframe_id
            .as_deref()
            .and_then(|id| self.find(id))
            .or_else(|| self.iframe_configs.first())
    }
}
