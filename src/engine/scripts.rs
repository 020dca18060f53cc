//! JavaScript evaluated inside sessions
//!
//! Selectors are spliced in as JSON string literals so quotes and
//! backslashes in them cannot break out of the script.

/// Ready state of the navigated document.
///
/// The session starts on `about:blank`, which is already `complete`, so that
/// document reports `loading` until the target document replaces it.
pub const READY_STATE_SCRIPT: &str =
    "document.URL === 'about:blank' ? 'loading' : document.readyState";

/// Rendered visible text of the body
pub const BODY_TEXT_SCRIPT: &str = "document.body ? document.body.innerText : ''";

/// Script returning the href of the anchor enclosing the first match of `selector`
#[must_use]
pub fn closest_link_script(selector: &str) -> String {
    format!(
        r"(() => {{
            const el = document.querySelector({selector});
            if (!el) return null;
            const link = el.closest('a');
            return link ? link.href : null;
        }})()",
        selector = js_string(selector)
    )
}

/// Script returning trimmed, non-empty texts of every match of `selector`
#[must_use]
pub fn texts_script(selector: &str) -> String {
    format!(
        r"Array.from(document.querySelectorAll({selector}))
            .map(el => (el.innerText || '').trim())
            .filter(Boolean)",
        selector = js_string(selector)
    )
}

fn js_string(value: &str) -> String {
    serde_json::Value::String(value.to_string()).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selector_is_quoted() {
        let script = closest_link_script(r#"div[data-x="a"] > img"#);
        assert!(script.contains(r#"document.querySelector("div[data-x=\"a\"] > img")"#));

        let script = texts_script(".article__body p");
        assert!(script.contains(r#"document.querySelectorAll(".article__body p")"#));
    }
}
