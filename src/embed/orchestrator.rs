//! Embed orchestrator: the per-active-configuration state machine
//!
//! Ties configuration selection, source extraction, URL validation,
//! handler-initiated rewrites, loading state and error state together.
//! All panel state lives behind one mutex and is mutated by one event at a
//! time; the load/error/timeout race is settled by a monotonically
//! increasing render-attempt id rather than by cancelling timers. A timer
//! or frame signal whose attempt no longer matches fires harmlessly.

use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, Weak};
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::handlers::{HandlerConfigMap, HandlerParams, HandlerRegistry, OverlaySpec};
use crate::observability::Metrics;
use crate::settings::models::{EmbedConfig, PanelSettings};

use super::errors::{FrameError, FrameErrorKind};
use super::extract::resolve_source;
use super::validate::{is_valid_url, would_cause_nesting};

/// Sandbox permission set published with the panel state for the host's
/// render target
pub const SANDBOX_PERMISSIONS: &str =
    "allow-scripts allow-same-origin allow-forms allow-popups allow-popups-to-escape-sandbox";

const INVALID_URL_MESSAGE: &str =
    "Invalid iframe URL detected. Please provide a valid URL (http/https) or fix the embed code.";
const NESTING_MESSAGE: &str =
    "This URL would cause the app to nest itself. Please use a different URL.";
const LOAD_FAILED_MESSAGE: &str =
    "Failed to load iframe. Please check the URL or try refreshing.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FrameState {
    /// No configurations exist
    Idle,
    /// Resolved source failed the URL validity check
    Invalid,
    /// Resolved source would load the hosting application itself
    NestingBlocked,
    /// Source assigned, waiting for a load/error signal or the timeout
    Loading,
    /// Load signal arrived, or the bounded wait elapsed without one
    Loaded,
    /// The render target reported a load failure
    LoadFailed,
}

/// Identity and extracted config of the handler matching the current source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HandlerInfo {
    pub id: String,
    pub name: String,
    pub config: HandlerConfigMap,
}

/// Read-only view of the panel exposed to collaborators
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PanelSnapshot {
    pub state: FrameState,
    pub active: Option<EmbedConfig>,
    pub src: String,
    pub loading: bool,
    pub attempt: u64,
    pub errors: Vec<FrameError>,
    pub handler: Option<HandlerInfo>,
    pub overlay: Option<OverlaySpec>,
    pub sandbox: String,
}

struct PanelInner {
    active: Option<EmbedConfig>,
    state: FrameState,
    src: String,
    attempt: u64,
    errors: Vec<FrameError>,
}

impl PanelInner {
    fn clear_errors(&mut self) {
        self.errors.clear();
    }

    fn clear_errors_by_kind(&mut self, kind: FrameErrorKind) {
        self.errors.retain(|error| error.kind != kind);
    }

    fn has_error_kind(&self, kind: FrameErrorKind) -> bool {
        self.errors.iter().any(|error| error.kind == kind)
    }
}

pub struct Orchestrator {
    registry: Arc<HandlerRegistry>,
    metrics: Arc<Metrics>,
    host_origin: String,
    load_timeout: Duration,
    retry_delay: Duration,
    inner: Mutex<PanelInner>,
    /// Self-handle for the timer tasks the orchestrator spawns against
    /// itself; weak so a dropped orchestrator lets its timers die quietly
    this: Weak<Orchestrator>,
}

impl Orchestrator {
    pub fn new(
        registry: Arc<HandlerRegistry>,
        metrics: Arc<Metrics>,
        host_origin: impl Into<String>,
        load_timeout: Duration,
        retry_delay: Duration,
    ) -> Arc<Self> {
        Arc::new_cyclic(|this| Self {
            registry,
            metrics,
            host_origin: host_origin.into(),
            load_timeout,
            retry_delay,
            inner: Mutex::new(PanelInner {
                active: None,
                state: FrameState::Idle,
                src: String::new(),
                attempt: 0,
                errors: Vec::new(),
            }),
            this: this.clone(),
        })
    }

    /// Reconcile the panel with the persisted settings. Called at boot and
    /// after every settings mutation (create/edit/delete/import).
    ///
    /// A dangling active reference falls back to the first configuration;
    /// an empty collection resets the panel to idle. Re-syncing onto the
    /// already-active configuration with an unchanged embed code is a
    /// no-op (no re-validation, no flicker).
    pub fn sync_settings(&self, settings: &PanelSettings) {
        let mut inner = self.lock();

        let Some(resolved) = settings.resolve_active().cloned() else {
            if inner.active.is_some() || inner.state != FrameState::Idle {
                info!("No configurations remain; resetting panel to idle");
                Self::reset_locked(&mut inner);
            }
            return;
        };

        match &inner.active {
            Some(active) if active.id == resolved.id && active.embed_code == resolved.embed_code => {
                // Only the display name changed; no re-validation needed
                if active.name != resolved.name {
                    inner.active = Some(resolved);
                }
            }
            _ => self.activate_locked(&mut inner, resolved),
        }
    }

    /// Switch the active configuration. Selecting the configuration that
    /// is already active is a no-op.
    pub fn select_config(&self, config: EmbedConfig) {
        let mut inner = self.lock();

        if inner.active.as_ref().is_some_and(|a| a.id == config.id) {
            debug!(config_id = %config.id, "Configuration already active; ignoring reselect");
            return;
        }

        self.metrics.config_selected();
        self.activate_locked(&mut inner, config);
    }

    /// Handler-initiated source rewrite (the `onSrcUpdate` path). The new
    /// URL re-enters the validation chain as a fresh resolved source.
    pub fn update_src(&self, new_src: String) {
        let mut inner = self.lock();

        if inner.active.is_none() {
            warn!("Ignoring source update with no active configuration");
            return;
        }

        inner.clear_errors();
        self.apply_source_locked(&mut inner, new_src);
    }

    /// Overlay-submitted parameters (the `onParamsUpdate` path). Resolves
    /// the matching handler and applies its rewrite; a no-op when no
    /// handler matches or the handler declines to rewrite.
    ///
    /// Returns whether the frame source changed.
    pub fn apply_params(&self, params: &HandlerParams) -> bool {
        let src = {
            let inner = self.lock();
            if inner.active.is_none() || inner.src.is_empty() {
                return false;
            }
            inner.src.clone()
        };

        let Some(handler) = self.registry.resolve(&src) else {
            debug!(url = %src, "No handler matches current source; params ignored");
            return false;
        };

        let rewritten = handler.update_url(&src, params);
        if rewritten == src {
            return false;
        }

        info!(handler = handler.id(), url = %rewritten, "Handler rewrote frame source");
        self.metrics.rewrite_applied();
        self.update_src(rewritten);
        true
    }

    /// The render target reported a successful load for the given attempt.
    pub fn frame_loaded(&self, attempt: u64) {
        let mut inner = self.lock();

        if inner.attempt != attempt {
            debug!(attempt, current = inner.attempt, "Stale load signal ignored");
            return;
        }

        match inner.state {
            FrameState::Loading | FrameState::Loaded | FrameState::LoadFailed => {
                inner.state = FrameState::Loaded;
                // Load completion only resolves load failures; validity and
                // nesting verdicts are orthogonal to it
                inner.clear_errors_by_kind(FrameErrorKind::LoadFailed);
                self.metrics.frame_loaded();
            }
            _ => {}
        }
    }

    /// The render target reported a load failure for the given attempt.
    pub fn frame_failed(&self, attempt: u64) {
        let mut inner = self.lock();

        if inner.attempt != attempt {
            debug!(attempt, current = inner.attempt, "Stale error signal ignored");
            return;
        }

        match inner.state {
            FrameState::Loading | FrameState::Loaded | FrameState::LoadFailed => {
                warn!(url = %inner.src, "Frame failed to load");
                inner.state = FrameState::LoadFailed;
                inner
                    .errors
                    .push(FrameError::new(FrameErrorKind::LoadFailed, LOAD_FAILED_MESSAGE));
                self.metrics.frame_failed();
            }
            _ => {}
        }
    }

    /// Retry after a load failure: clears the failure, then clears and
    /// reassigns the source after a short delay so the render target is
    /// forced to reload. Returns false when there is nothing to retry.
    pub fn retry(&self) -> bool {
        let (attempt, src) = {
            let mut inner = self.lock();

            if !inner.has_error_kind(FrameErrorKind::LoadFailed) || inner.src.is_empty() {
                return false;
            }

            inner.clear_errors_by_kind(FrameErrorKind::LoadFailed);
            inner.attempt += 1;
            inner.state = FrameState::Loading;
            let src = std::mem::take(&mut inner.src);
            (inner.attempt, src)
        };

        info!(attempt, "Retrying frame load");
        if let Some(orchestrator) = self.this.upgrade() {
            tokio::spawn(async move {
                tokio::time::sleep(orchestrator.retry_delay).await;
                orchestrator.finish_retry(attempt, src);
            });
        }
        true
    }

    /// Current panel view, with the matching handler resolved on the fly
    pub fn snapshot(&self) -> PanelSnapshot {
        let inner = self.lock();

        let handler = if inner.src.is_empty() {
            None
        } else {
            self.registry.resolve(&inner.src)
        };

        let (handler_info, overlay) = match handler {
            Some(handler) => {
                let config = handler.extract_config(&inner.src);
                let overlay = handler.overlay(&inner.src, &config);
                (
                    Some(HandlerInfo {
                        id: handler.id().to_string(),
                        name: handler.name().to_string(),
                        config,
                    }),
                    overlay,
                )
            }
            None => (None, None),
        };

        PanelSnapshot {
            state: inner.state,
            active: inner.active.clone(),
            src: inner.src.clone(),
            loading: inner.state == FrameState::Loading,
            attempt: inner.attempt,
            errors: inner.errors.clone(),
            handler: handler_info,
            overlay,
            sandbox: SANDBOX_PERMISSIONS.to_string(),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, PanelInner> {
        // The panel mutex is never held across an await point, so it can
        // only be poisoned by a panic mid-transition; recover the data
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn reset_locked(inner: &mut PanelInner) {
        inner.active = None;
        inner.state = FrameState::Idle;
        inner.src.clear();
        inner.attempt += 1;
        inner.clear_errors();
    }

    fn activate_locked(&self, inner: &mut PanelInner, config: EmbedConfig) {
        info!(config_id = %config.id, name = %config.name, "Activating configuration");

        let src = resolve_source(&config.embed_code);
        inner.active = Some(config);
        inner.clear_errors();
        self.apply_source_locked(inner, src);
    }

    /// Run the validation gate and, if it passes, start a render attempt.
    /// Every call is a new attempt identity, so signals and timers from
    /// earlier sources can no longer touch loading state.
    fn apply_source_locked(&self, inner: &mut PanelInner, src: String) {
        inner.attempt += 1;

        if !is_valid_url(&src) {
            warn!(url = %src, "Rejecting invalid frame URL");
            inner.state = FrameState::Invalid;
            inner.src.clear();
            inner
                .errors
                .push(FrameError::new(FrameErrorKind::InvalidUrl, INVALID_URL_MESSAGE));
            self.metrics.url_rejected();
            return;
        }

        if would_cause_nesting(&src, &self.host_origin) {
            warn!(url = %src, "Rejecting self-nesting frame URL");
            inner.state = FrameState::NestingBlocked;
            inner.src.clear();
            inner.errors.push(FrameError::new(
                FrameErrorKind::NestingPrevention,
                NESTING_MESSAGE,
            ));
            self.metrics.url_rejected();
            return;
        }

        debug!(url = %src, attempt = inner.attempt, "Frame source assigned; loading");
        inner.state = FrameState::Loading;
        inner.src = src;
        self.arm_load_timeout(inner.attempt);
    }

    /// Bounded wait racing the frame's own load/error signal. Some
    /// cross-origin embeds never fire a load event; the timeout clears
    /// loading state without recording an error.
    fn arm_load_timeout(&self, attempt: u64) {
        let Some(orchestrator) = self.this.upgrade() else {
            return;
        };
        tokio::spawn(async move {
            tokio::time::sleep(orchestrator.load_timeout).await;
            orchestrator.load_timeout_elapsed(attempt);
        });
    }

    fn load_timeout_elapsed(&self, attempt: u64) {
        let mut inner = self.lock();

        if inner.attempt != attempt || inner.state != FrameState::Loading {
            return;
        }

        debug!(attempt, "No load signal within timeout; clearing loading state");
        inner.state = FrameState::Loaded;
    }

    fn finish_retry(&self, attempt: u64, src: String) {
        let mut inner = self.lock();

        if inner.attempt != attempt {
            debug!(attempt, "Retry superseded before source reassignment");
            return;
        }

        inner.src = src;
        self.arm_load_timeout(attempt);
    }
}
