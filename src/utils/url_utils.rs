use url::Url;

use crate::errors::{PageTextError, PageTextResult};

/// Validate a caller-supplied target URL
///
/// Returns the trimmed URL string as given (it is the history key, so it is
/// not re-serialized). Empty input, unparseable URLs and non-http(s) schemes
/// are validation errors.
pub fn parse_target_url(raw: Option<&str>) -> PageTextResult<String> {
    let url = raw.map(str::trim).unwrap_or_default();
    if url.is_empty() {
        return Err(PageTextError::Validation("url is required".to_string()));
    }

    let parsed = Url::parse(url)
        .map_err(|e| PageTextError::Validation(format!("malformed url '{url}': {e}")))?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(PageTextError::Validation(format!(
            "unsupported url scheme '{}' (expected http or https)",
            parsed.scheme()
        )));
    }

    Ok(url.to_string())
}

/// Resolve an anchor `href` against the page it was found on
///
/// Browsers already report absolute hrefs; this covers relative ones coming
/// from other session implementations.
#[must_use]
pub fn resolve_href(base: &str, href: &str) -> Option<String> {
    let href = href.trim();
    if href.is_empty() || href.starts_with("javascript:") || href.starts_with('#') {
        return None;
    }

    match Url::parse(href) {
        Ok(absolute) => Some(absolute.to_string()),
        Err(url::ParseError::RelativeUrlWithoutBase) => Url::parse(base)
            .ok()
            .and_then(|b| b.join(href).ok())
            .map(|u| u.to_string()),
        Err(_) => None,
    }
}
