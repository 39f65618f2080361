//! The client-side reload script and its injection into rendered pages.

const TEMPLATE: &str = include_str!("../assets/live_reload.html");
const ENDPOINT_PLACEHOLDER: &str = "{{endpoint}}";
const BODY_CLOSE: &[u8] = b"</body>";

/// Render the client script for `endpoint`.
pub(crate) fn render_script(endpoint: &str) -> String {
    TEMPLATE.replace(ENDPOINT_PLACEHOLDER, &escape_js(endpoint))
}

/// Escape a value for use inside a double-quoted JavaScript string in HTML.
fn escape_js(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '<' => escaped.push_str("\\u003c"),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            c => escaped.push(c),
        }
    }
    escaped
}

/// Insert `script` right before the last `</body>` tag of `html`.
///
/// The tag is matched ASCII case-insensitively. HTML without a closing body
/// tag is returned unchanged.
///
/// # Examples
///
/// ```rust
/// use live_reload::inject_script;
///
/// let html = inject_script("<html><body><p>hi</p></BODY></html>", "<script></script>");
/// assert_eq!(html, "<html><body><p>hi</p><script></script></BODY></html>");
/// ```
pub fn inject_script(html: &str, script: &str) -> String {
    match rfind_body_close(html) {
        Some(idx) => {
            let mut out = String::with_capacity(html.len() + script.len());
            out.push_str(&html[..idx]);
            out.push_str(script);
            out.push_str(&html[idx..]);
            out
        }
        None => html.to_string(),
    }
}

fn rfind_body_close(html: &str) -> Option<usize> {
    html.as_bytes()
        .windows(BODY_CLOSE.len())
        .rposition(|window| window.eq_ignore_ascii_case(BODY_CLOSE))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_render_script_fills_endpoint() {
        let script = render_script("/live-reload");
        assert!(script.contains(r#"new EventSource(endpoint)"#));
        assert!(script.contains(r#"var endpoint = "/live-reload";"#));
        assert!(!script.contains(ENDPOINT_PLACEHOLDER));
    }

    #[test]
    fn test_render_script_escapes_endpoint() {
        let script = render_script(r#"/x"</script>"#);
        assert!(script.contains(r#"var endpoint = "/x\"\u003c/script>";"#));
    }

    #[test]
    fn test_inject_before_last_body() {
        let html = "<body><template></body></template></body>";
        assert_eq!(
            inject_script(html, "JS"),
            "<body><template></body></template>JS</body>"
        );
    }

    #[test]
    fn test_inject_without_body_is_unchanged() {
        assert_eq!(inject_script("<p>fragment</p>", "JS"), "<p>fragment</p>");
        assert_eq!(inject_script("", "JS"), "");
    }

    #[test]
    fn test_inject_handles_multibyte_text() {
        let html = "<body>héllo wörld 🌍</Body>";
        assert_eq!(inject_script(html, "JS"), "<body>héllo wörld 🌍JS</Body>");
    }

    proptest! {
        #[test]
        fn prop_injection_preserves_page(prefix in "[^<]*", suffix in "[^<]*", script in "[a-z<>/]*") {
            let html = format!("{prefix}</body>{suffix}");
            let injected = inject_script(&html, &script);
            prop_assert_eq!(injected, format!("{prefix}{script}</body>{suffix}"));
        }

        #[test]
        fn prop_no_body_no_change(html in "[^<]*") {
            prop_assert_eq!(inject_script(&html, "JS"), html);
        }
    }
}
