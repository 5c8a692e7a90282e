//! Resolved-source extraction from raw embed code
//!
//! Stored configurations hold whatever the user pasted: full iframe markup,
//! a bare URL, or something in between. The panel only ever navigates to a
//! single URL, extracted here.

use regex::Regex;
use std::sync::LazyLock;

static SRC_ATTR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"src=["']([^"']+)["']"#).unwrap());

static BARE_URL_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#"https?://[^\s"']+"#).unwrap());

/// Extract the source URL from iframe embed code.
///
/// Resolution order: first quoted `src=` attribute, else the first bare
/// `http(s)` URL substring, else the embed code itself (it may already be a
/// direct URL; the validators downstream decide).
pub fn resolve_source(embed_code: &str) -> String {
    if let Some(captures) = SRC_ATTR_RE.captures(embed_code) {
        return captures[1].to_string();
    }

    if let Some(found) = BARE_URL_RE.find(embed_code) {
        return found.as_str().to_string();
    }

    embed_code.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_src_attribute_from_markup() {
        let embed = r#"<iframe src="https://example.com/embed?x=1" width="600"></iframe>"#;
        assert_eq!(resolve_source(embed), "https://example.com/embed?x=1");
    }

    #[test]
    fn extracts_single_quoted_src() {
        let embed = "<iframe src='https://example.com/a'></iframe>";
        assert_eq!(resolve_source(embed), "https://example.com/a");
    }

    #[test]
    fn falls_back_to_bare_url() {
        let embed = "check out https://example.com/page and enjoy";
        assert_eq!(resolve_source(embed), "https://example.com/page");
    }

    #[test]
    fn src_attribute_wins_over_other_urls() {
        let embed = r#"https://first.example.com <iframe src="https://second.example.com">"#;
        assert_eq!(resolve_source(embed), "https://second.example.com");
    }

    #[test]
    fn returns_raw_code_when_nothing_matches() {
        assert_eq!(resolve_source("not a url at all"), "not a url at all");
        assert_eq!(resolve_source(""), "");
    }

    #[test]
    fn bare_url_stops_at_whitespace_and_quotes() {
        assert_eq!(
            resolve_source("http://a.example/x\"rest"),
            "http://a.example/x"
        );
    }
}
