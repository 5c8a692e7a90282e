use axum::{
    Json,
    extract::{Path, Query, State},
    http::HeaderMap,
    response::IntoResponse,
};
use http_body_util::BodyExt;

use super::{
    error::ApiError,
    models::{
        CreateConfigRequest, FrameEventRequest, FrameSignal, HandlerSummary, HealthResponse,
        ImportSummary, ParamsRequest, SearchQuery, SearchResponse, SelectRequest, SrcRequest,
        UpdateConfigRequest,
    },
    state::AppState,
};
use crate::embed::PanelSnapshot;
use crate::location::SearchOutcome;
use crate::settings::{EmbedConfig, PanelSettings, export_settings, validate_import};

/// Current panel view (GET /panel)
///
/// The single authoritative state the host UI renders from: active
/// configuration, frame state, resolved source URL, loading flag, render
/// attempt id, error list, matching handler and its overlay descriptor.
pub async fn get_panel(State(state): State<AppState>) -> Json<PanelSnapshot> {
    Json(state.orchestrator.snapshot())
}

/// Switch the active configuration (POST /panel/select)
///
/// Selecting the already-active configuration is a no-op (no flicker).
/// The new active reference is persisted immediately.
pub async fn select_config(
    State(state): State<AppState>,
    Json(request): Json<SelectRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let mut settings = state.store.load();

    let config = settings
        .find(&request.config_id)
        .cloned()
        .ok_or_else(|| ApiError::NotFound(format!("config {}", request.config_id)))?;

    state.orchestrator.select_config(config);

    settings.active_iframe_id = Some(request.config_id);
    state.store.save(&settings);

    Ok(Json(state.orchestrator.snapshot()))
}

/// Retry after a load failure (POST /panel/retry)
pub async fn retry(State(state): State<AppState>) -> Json<PanelSnapshot> {
    state.orchestrator.retry();
    Json(state.orchestrator.snapshot())
}

/// Render-target load/error signal (POST /panel/frame-event)
///
/// The attempt id ties the signal to one render attempt; signals for a
/// superseded attempt are ignored.
pub async fn frame_event(
    State(state): State<AppState>,
    Json(request): Json<FrameEventRequest>,
) -> Json<PanelSnapshot> {
    match request.event {
        FrameSignal::Load => state.orchestrator.frame_loaded(request.attempt),
        FrameSignal::Error => state.orchestrator.frame_failed(request.attempt),
    }

    Json(state.orchestrator.snapshot())
}

/// Overlay-submitted handler parameters (POST /panel/params)
pub async fn update_params(
    State(state): State<AppState>,
    Json(request): Json<ParamsRequest>,
) -> Json<PanelSnapshot> {
    state.orchestrator.apply_params(&request.params);
    Json(state.orchestrator.snapshot())
}

/// Direct frame source rewrite (POST /panel/src)
///
/// The submitted URL re-enters the validation gate exactly like a freshly
/// resolved source.
pub async fn update_src(
    State(state): State<AppState>,
    Json(request): Json<SrcRequest>,
) -> Json<PanelSnapshot> {
    state.orchestrator.update_src(request.src);
    Json(state.orchestrator.snapshot())
}

/// Debounced location search backing the overlay (GET /panel/search)
pub async fn search(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Json<SearchResponse> {
    let (superseded, results) = match state.search.query(&query.q).await {
        SearchOutcome::Fresh(results) => (false, results),
        SearchOutcome::Superseded => (true, Vec::new()),
    };

    Json(SearchResponse {
        query: query.q,
        superseded,
        results,
    })
}

/// List registered embed handlers (GET /handlers)
pub async fn list_handlers(State(state): State<AppState>) -> Json<Vec<HandlerSummary>> {
    let handlers = state
        .registry
        .all()
        .iter()
        .map(|handler| HandlerSummary {
            id: handler.id().to_string(),
            name: handler.name().to_string(),
        })
        .collect();

    Json(handlers)
}

/// List stored configurations and the active reference (GET /configs)
pub async fn list_configs(State(state): State<AppState>) -> Json<PanelSettings> {
    Json(state.store.load())
}

/// Create a configuration (POST /configs)
pub async fn create_config(
    State(state): State<AppState>,
    Json(request): Json<CreateConfigRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let (name, embed_code) = validated_fields(&request.name, &request.embed_code)?;

    let config = EmbedConfig::new(name, embed_code);
    let mut settings = state.store.load();
    settings.iframe_configs.push(config.clone());

    persist_and_sync(&state, &settings);

    Ok((axum::http::StatusCode::CREATED, Json(config)))
}

/// Replace a configuration's name and embed code (PUT /configs/{id})
pub async fn update_config(
    State(state): State<AppState>,
    Path(config_id): Path<String>,
    Json(request): Json<UpdateConfigRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let (name, embed_code) = validated_fields(&request.name, &request.embed_code)?;

    let mut settings = state.store.load();
    let config = settings
        .iframe_configs
        .iter_mut()
        .find(|config| config.id == config_id)
        .ok_or_else(|| ApiError::NotFound(format!("config {config_id}")))?;

    config.name = name;
    config.embed_code = embed_code;
    let updated = config.clone();

    persist_and_sync(&state, &settings);

    Ok(Json(updated))
}

/// Delete a configuration (DELETE /configs/{id})
///
/// Deleting the active configuration reassigns the active reference to
/// the first remaining configuration, or clears it when the collection
/// becomes empty (the panel reverts to idle).
pub async fn delete_config(
    State(state): State<AppState>,
    Path(config_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let mut settings = state.store.load();

    let index = settings
        .iframe_configs
        .iter()
        .position(|config| config.id == config_id)
        .ok_or_else(|| ApiError::NotFound(format!("config {config_id}")))?;

    settings.iframe_configs.remove(index);

    if settings.active_iframe_id.as_deref() == Some(config_id.as_str()) {
        settings.active_iframe_id = settings
            .iframe_configs
            .first()
            .map(|config| config.id.clone());
    }

    persist_and_sync(&state, &settings);

    Ok(Json(settings))
}

/// Export settings as pretty JSON (GET /settings/export)
pub async fn export(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let settings = state.store.load();
    let exported =
        export_settings(&settings).map_err(|e| ApiError::Internal(e.to_string()))?;

    Ok((
        [(axum::http::header::CONTENT_TYPE, "application/json")],
        exported,
    ))
}

/// Import settings (POST /settings/import)
///
/// The body is the exchange JSON verbatim. It is validated in full before
/// anything is persisted; a rejected import leaves the stored settings
/// and the panel untouched.
pub async fn import(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: axum::body::Body,
) -> Result<impl IntoResponse, ApiError> {
    let content_type = headers
        .get(axum::http::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| ApiError::InvalidPayload("missing Content-Type header".into()))?;
    require_json(content_type)?;

    let body_bytes = read_body(body, state.config.server.max_import_bytes).await?;
    let text = std::str::from_utf8(&body_bytes)
        .map_err(|_| ApiError::InvalidPayload("body is not valid UTF-8".into()))?;

    let imported = validate_import(text)?;

    persist_and_sync(&state, &imported);

    let summary = ImportSummary {
        config_count: imported.iframe_configs.len(),
        active_iframe_id: imported.active_iframe_id,
    };
    Ok(Json(summary))
}

/// Health check endpoint (GET /health)
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    use std::collections::HashMap;

    let mut components = HashMap::new();
    components.insert("api".to_string(), "healthy".to_string());
    components.insert("store".to_string(), "healthy".to_string());
    components.insert("search".to_string(), "healthy".to_string());

    let response = HealthResponse {
        status: "healthy".to_string(),
        components,
        version: env!("CARGO_PKG_VERSION").to_string(),
        metrics: state.metrics.snapshot(),
    };

    (axum::http::StatusCode::OK, Json(response))
}

/// Persist a settings mutation and reconcile the panel state machine with
/// it in one step, so every mutation path behaves like transition 1/8 of
/// the orchestrator
fn persist_and_sync(state: &AppState, settings: &PanelSettings) {
    state.store.save(settings);
    state.orchestrator.sync_settings(settings);
}

fn validated_fields(name: &str, embed_code: &str) -> Result<(String, String), ApiError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ApiError::InvalidPayload("name must not be empty".into()));
    }

    let embed_code = embed_code.trim();
    if embed_code.is_empty() {
        return Err(ApiError::InvalidPayload(
            "embedCode must not be empty".into(),
        ));
    }

    Ok((name.to_string(), embed_code.to_string()))
}

/// Accepts `application/json` (optionally with a charset parameter) and
/// rejects lookalikes such as `application/jsonp` or `text/json`
fn require_json(content_type: &str) -> Result<mime::Mime, ApiError> {
    let media_type: mime::Mime = content_type.parse().map_err(|_| {
        ApiError::InvalidPayload(format!("invalid Content-Type: {}", content_type))
    })?;

    if media_type.type_() != mime::APPLICATION || media_type.subtype() != mime::JSON {
        return Err(ApiError::InvalidPayload(format!(
            "Content-Type must be application/json, got: {}/{}",
            media_type.type_(),
            media_type.subtype()
        )));
    }

    Ok(media_type)
}

/// Reads request body and validates size
///
/// Note: decompression is handled transparently by the request
/// decompression middleware, so this receives already-decompressed data.
async fn read_body(body: axum::body::Body, max_size: usize) -> Result<bytes::Bytes, ApiError> {
    let data = body
        .collect()
        .await
        .map_err(|err| ApiError::Internal(err.to_string()))?
        .to_bytes();

    if data.len() > max_size {
        return Err(ApiError::PayloadTooLarge(data.len()));
    }

    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_json_valid() {
        assert!(require_json("application/json").is_ok());
        assert!(require_json("application/json; charset=utf-8").is_ok());
    }

    #[test]
    fn test_require_json_invalid() {
        assert!(require_json("application/jsonp").is_err());
        assert!(require_json("text/json").is_err());
        assert!(require_json("text/plain").is_err());
        assert!(require_json("").is_err());
    }

    #[test]
    fn test_validated_fields_trims() {
        let (name, embed) = validated_fields("  Map  ", " https://x ").unwrap();
        assert_eq!(name, "Map");
        assert_eq!(embed, "https://x");
    }

    #[test]
    fn test_validated_fields_rejects_empty() {
        assert!(validated_fields("", "https://x").is_err());
        assert!(validated_fields("Map", "   ").is_err());
    }
}
