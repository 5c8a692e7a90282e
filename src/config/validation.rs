use super::models::Config;
use thiserror::Error;
use url::Url;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Host origin '{origin}' is not a valid http(s) URL")]
    InvalidHostOrigin { origin: String },

    #[error("Search endpoint '{endpoint}' is not a valid http(s) URL")]
    InvalidSearchEndpoint { endpoint: String },

    #[error("Panel timing must be positive: {field} = 0")]
    InvalidPanelTiming { field: String },

    #[error("max_results must be between 1 and {limit}, got {actual}")]
    InvalidMaxResults { actual: usize, limit: usize },

    #[error("min_query_len must be positive")]
    InvalidMinQueryLen,

    #[error("max_import_bytes ({actual}) exceeds limit of 5MB ({limit})")]
    ImportSizeExceedsLimit { actual: usize, limit: usize },

    #[error("max_import_bytes must be positive")]
    InvalidImportSize,
}

/// Validate the entire configuration
pub fn validate(config: &Config) -> Result<(), ValidationError> {
    validate_panel(config)?;
    validate_search(config)?;
    validate_import_size(config)?;
    Ok(())
}

/// Host origin must be an absolute http(s) URL so origin comparison is
/// well-defined; the load timeout drives a timer and must be nonzero
fn validate_panel(config: &Config) -> Result<(), ValidationError> {
    let origin = &config.panel.host_origin;
    let parsed = Url::parse(origin).map_err(|_| ValidationError::InvalidHostOrigin {
        origin: origin.clone(),
    })?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ValidationError::InvalidHostOrigin {
            origin: origin.clone(),
        });
    }

    if config.panel.load_timeout_ms == 0 {
        return Err(ValidationError::InvalidPanelTiming {
            field: "load_timeout_ms".to_string(),
        });
    }

    Ok(())
}

fn validate_search(config: &Config) -> Result<(), ValidationError> {
    const MAX_RESULTS_LIMIT: usize = 50;

    let endpoint = &config.search.endpoint;
    let parsed = Url::parse(endpoint).map_err(|_| ValidationError::InvalidSearchEndpoint {
        endpoint: endpoint.clone(),
    })?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ValidationError::InvalidSearchEndpoint {
            endpoint: endpoint.clone(),
        });
    }

    if config.search.min_query_len == 0 {
        return Err(ValidationError::InvalidMinQueryLen);
    }

    if config.search.max_results == 0 || config.search.max_results > MAX_RESULTS_LIMIT {
        return Err(ValidationError::InvalidMaxResults {
            actual: config.search.max_results,
            limit: MAX_RESULTS_LIMIT,
        });
    }

    Ok(())
}

/// Ensure max_import_bytes is positive and doesn't exceed 5MB
fn validate_import_size(config: &Config) -> Result<(), ValidationError> {
    const MAX_IMPORT_BYTES: usize = 5 * 1024 * 1024; // 5 MB

    if config.server.max_import_bytes == 0 {
        return Err(ValidationError::InvalidImportSize);
    }

    if config.server.max_import_bytes > MAX_IMPORT_BYTES {
        return Err(ValidationError::ImportSizeExceedsLimit {
            actual: config.server.max_import_bytes,
            limit: MAX_IMPORT_BYTES,
        });
    }

    Ok(())
}
