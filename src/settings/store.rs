use std::collections::HashSet;
use std::path::Path;

use fjall::{Config, Keyspace, PartitionCreateOptions, PartitionHandle};
use thiserror::Error;
use tracing::{debug, info, warn};

use super::keys::{ACTIVE_KEY, ORDER_KEY, decode_config_key, encode_config_key};
use super::models::{EmbedConfig, PanelSettings};

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Fjall error: {0}")]
    Fjall(#[from] fjall::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SettingsError>;

/// Fjall-backed persistent storage for panel settings
///
/// Configurations live one-per-key in the `configs` partition; the `meta`
/// partition keeps the collection order and the active reference. The
/// public `load`/`save` pair never fails: storage errors are logged and
/// degrade to defaults / dropped writes, per the settings-store contract.
#[derive(Clone)]
pub struct SettingsStore {
    keyspace: Keyspace,
    configs: PartitionHandle,
    meta: PartitionHandle,
}

impl SettingsStore {
    /// Open or create a settings store at the given path
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Opening settings store at: {}", path.display());

        // Create parent directory if it doesn't exist
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let keyspace = Config::new(path).open()?;

        let configs = keyspace.open_partition("configs", PartitionCreateOptions::default())?;
        let meta = keyspace.open_partition("meta", PartitionCreateOptions::default())?;

        info!("Settings store opened successfully");
        Ok(Self {
            keyspace,
            configs,
            meta,
        })
    }

    /// Load settings; storage failures degrade to empty settings (log-only)
    pub fn load(&self) -> PanelSettings {
        match self.try_load() {
            Ok(settings) => settings,
            Err(error) => {
                warn!(%error, "Failed to load settings; starting empty");
                PanelSettings::default()
            }
        }
    }

    /// Save settings; storage failures are logged and swallowed
    pub fn save(&self, settings: &PanelSettings) {
        if let Err(error) = self.try_save(settings) {
            warn!(%error, "Failed to save settings");
        }
    }

    fn try_load(&self) -> Result<PanelSettings> {
        let order: Vec<String> = match self.meta.get(ORDER_KEY)? {
            Some(value) => serde_json::from_slice(&value)?,
            None => Vec::new(),
        };

        let mut iframe_configs = Vec::with_capacity(order.len());
        let mut seen: HashSet<String> = HashSet::new();

        for id in &order {
            if let Some(value) = self.configs.get(encode_config_key(id))? {
                let config: EmbedConfig = serde_json::from_slice(&value)?;
                seen.insert(config.id.clone());
                iframe_configs.push(config);
            }
        }

        // Self-heal: pick up configs missing from the order index
        for item in self.configs.iter() {
            let (key, value) = item?;
            let Some(id) = decode_config_key(&key) else {
                continue;
            };
            if seen.contains(&id) {
                continue;
            }
            let config: EmbedConfig = serde_json::from_slice(&value)?;
            debug!(config_id = %config.id, "Recovered config missing from order index");
            iframe_configs.push(config);
        }

        let active_iframe_id = self
            .meta
            .get(ACTIVE_KEY)?
            .map(|value| String::from_utf8_lossy(&value).to_string());

        Ok(PanelSettings {
            iframe_configs,
            active_iframe_id,
        })
    }

    fn try_save(&self, settings: &PanelSettings) -> Result<()> {
        let keep: HashSet<&str> = settings
            .iframe_configs
            .iter()
            .map(|config| config.id.as_str())
            .collect();

        // Drop configs that no longer exist in the collection
        let mut stale: Vec<Vec<u8>> = Vec::new();
        for item in self.configs.iter() {
            let (key, _) = item?;
            if let Some(id) = decode_config_key(&key) {
                if !keep.contains(id.as_str()) {
                    stale.push(key.to_vec());
                }
            }
        }
        for key in stale {
            self.configs.remove(key)?;
        }

        for config in &settings.iframe_configs {
            let value = serde_json::to_vec(config)?;
            self.configs.insert(encode_config_key(&config.id), value)?;
        }

        let order: Vec<&str> = settings
            .iframe_configs
            .iter()
            .map(|config| config.id.as_str())
            .collect();
        self.meta.insert(ORDER_KEY, serde_json::to_vec(&order)?)?;

        match &settings.active_iframe_id {
            Some(id) => self.meta.insert(ACTIVE_KEY, id.as_bytes())?,
            None => self.meta.remove(ACTIVE_KEY)?,
        }

        debug!(
            configs = settings.iframe_configs.len(),
            "Persisted panel settings"
        );
        Ok(())
    }

    /// Persist all pending writes to disk
    pub fn persist(&self) -> Result<()> {
        self.keyspace.persist(fjall::PersistMode::SyncAll)?;
        Ok(())
    }
}
