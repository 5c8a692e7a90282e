//! Persisted panel settings: models, Fjall-backed store, import/export.

mod keys;
pub mod models;
mod store;
pub mod transfer;

pub use models::{EmbedConfig, PanelSettings};
pub use store::{SettingsError, SettingsStore};
pub use transfer::{ImportError, export_settings, validate_import};
