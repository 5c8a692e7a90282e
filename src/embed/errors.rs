use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Frame error taxonomy. Import validation failures are a separate
/// taxonomy over in [`crate::settings::transfer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FrameErrorKind {
    InvalidUrl,
    NestingPrevention,
    LoadFailed,
}

/// A user-visible frame error. Multiple errors may coexist in the panel
/// error list; they are cleared wholesale on configuration switch and by
/// kind when the narrower condition resolves.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrameError {
    pub id: String,
    pub kind: FrameErrorKind,
    pub message: String,
    #[serde(with = "chrono::serde::ts_seconds")]
    pub timestamp: DateTime<Utc>,
}

impl FrameError {
    pub fn new(kind: FrameErrorKind, message: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            kind,
            message: message.into(),
            timestamp: Utc::now(),
        }
    }
}
