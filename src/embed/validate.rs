//! URL validation gate for the render target
//!
//! Two orthogonal, pure checks run before any URL is assigned to the frame:
//! a scheme whitelist and a self-nesting guard. Both convert every parse
//! failure to a boolean instead of propagating it; the orchestrator turns
//! the verdicts into user-visible error state.

use url::Url;

const ALLOWED_SCHEMES: [&str; 3] = ["http", "https", "data"];

/// Whether a candidate may be assigned to the render target at all.
///
/// Fails for empty/whitespace input, for anything that does not parse as an
/// absolute URL, and for schemes outside {http, https, data}. A data URL
/// with a nonstandard payload is still valid here; no content sniffing.
pub fn is_valid_url(candidate: &str) -> bool {
    let trimmed = candidate.trim();
    if trimmed.is_empty() {
        return false;
    }

    match Url::parse(trimmed) {
        Ok(parsed) => ALLOWED_SCHEMES.contains(&parsed.scheme()),
        Err(_) => false,
    }
}

/// Whether loading the candidate would make the frame load the hosting
/// application itself (infinite recursion).
///
/// The candidate is resolved against the host origin, so relative inputs
/// count as nesting. Parse failures return false: a malformed URL is the
/// validity check's problem, not a nesting verdict.
pub fn would_cause_nesting(candidate: &str, host_origin: &str) -> bool {
    let Ok(base) = Url::parse(host_origin) else {
        return false;
    };

    match base.join(candidate.trim()) {
        Ok(resolved) => resolved.origin() == base.origin(),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOST: &str = "https://host.app";

    #[test]
    fn accepts_http_https_and_data() {
        assert!(is_valid_url("https://a.b/c"));
        assert!(is_valid_url("http://example.com"));
        assert!(is_valid_url("data:text/html,<p>hi</p>"));
    }

    #[test]
    fn rejects_disallowed_schemes() {
        assert!(!is_valid_url("ftp://x.com"));
        assert!(!is_valid_url("javascript:alert(1)"));
        assert!(!is_valid_url("file:///etc/passwd"));
    }

    #[test]
    fn rejects_empty_and_whitespace() {
        assert!(!is_valid_url(""));
        assert!(!is_valid_url("   "));
        assert!(!is_valid_url("\t\n"));
    }

    #[test]
    fn rejects_relative_and_garbage() {
        assert!(!is_valid_url("/relative/path"));
        assert!(!is_valid_url("not a url"));
        assert!(!is_valid_url("example.com/no-scheme"));
    }

    #[test]
    fn tolerates_surrounding_whitespace() {
        assert!(is_valid_url("  https://a.b/c  "));
    }

    #[test]
    fn same_origin_is_nesting() {
        assert!(would_cause_nesting("https://host.app/anything", HOST));
        assert!(would_cause_nesting("https://host.app", HOST));
    }

    #[test]
    fn different_origin_is_not_nesting() {
        assert!(!would_cause_nesting("https://example.com", HOST));
        // Port and scheme are part of the origin
        assert!(!would_cause_nesting("https://host.app:8443/x", HOST));
        assert!(!would_cause_nesting("http://host.app/x", HOST));
    }

    #[test]
    fn relative_urls_resolve_to_host_origin() {
        assert!(would_cause_nesting("/panel", HOST));
        assert!(would_cause_nesting("panel.html", HOST));
    }

    #[test]
    fn data_urls_have_opaque_origins() {
        assert!(!would_cause_nesting("data:text/html,<p>hi</p>", HOST));
    }

    #[test]
    fn parse_failure_fails_open() {
        assert!(!would_cause_nesting("https://host.app/x", "not-an-origin"));
    }
}
