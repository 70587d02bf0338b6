//! Markup sanitization
//!
//! No tag is allowed through. Tags are removed together with their
//! attributes; elements whose content is script or other non-text payload
//! are removed with their content. Plain text outside tags is kept as is.

use lazy_static::lazy_static;
use regex::Regex;
use serde_json::Value;
use tracing::trace;

/// Elements removed together with everything they enclose
const CONTENT_ELEMENTS: &[&str] = &[
    "script", "style", "iframe", "noscript", "noembed", "noframes", "template", "textarea",
    "title", "xmp", "svg", "math", "object",
];

lazy_static! {
    /// One pattern per content element; an unclosed element runs to end of input
    static ref CONTENT_ELEMENT_PATTERNS: Vec<Regex> = CONTENT_ELEMENTS
        .iter()
        .map(|name| {
            Regex::new(&format!(
                r"(?is)<{name}\b[^>]*>(?:.*?</{name}\s*>|.*\z)",
                name = name
            ))
            .unwrap()
        })
        .collect();

    /// HTML comments, including one left open at end of input
    static ref COMMENT_PATTERN: Regex = Regex::new(r"(?s)<!--.*?(?:-->|\z)").unwrap();

    /// Start/end tags, doctypes and processing instructions, including an
    /// unterminated opener at end of input. Quoted attribute values are taken
    /// whole, so a `>` inside quotes does not end the tag.
    static ref TAG_PATTERN: Regex =
        Regex::new(r#"<[A-Za-z/!?](?:"[^"]*"|'[^']*'|[^>])*(?:>|\z)"#).unwrap();
}

fn strip_markup_once(value: &str) -> String {
    let mut out = value.to_string();
    for pattern in CONTENT_ELEMENT_PATTERNS.iter() {
        if pattern.is_match(&out) {
            out = pattern.replace_all(&out, "").into_owned();
        }
    }
    out = COMMENT_PATTERN.replace_all(&out, "").into_owned();
    TAG_PATTERN.replace_all(&out, "").into_owned()
}

/// Strip every tag construct from a string, keeping only the text outside tags.
///
/// Removal repeats until nothing changes, so fragments that reassemble into
/// a tag once their inner tag is gone (`<<b>script>`) are caught as well.
/// The result is therefore a fixed point: sanitizing it again is a no-op.
pub fn sanitize_html(value: &str) -> String {
    let mut current = value.to_string();
    let mut passes = 0usize;
    loop {
        let next = strip_markup_once(&current);
        passes += 1;
        if next == current {
            if passes > 1 {
                trace!(passes, "markup stripped");
            }
            return next;
        }
        current = next;
    }
}

/// Strip markup from an optional string, yielding an empty string for `None`
pub fn sanitize_html_optional(value: Option<&str>) -> String {
    value.map(sanitize_html).unwrap_or_default()
}

/// Returns true if the string contains anything [`sanitize_html`] would remove
pub fn contains_markup(value: &str) -> bool {
    sanitize_html(value) != value
}

/// Sanitize a JSON value in place: every string leaf is stripped of markup.
///
/// Object keys, array lengths, numbers, booleans and nulls are untouched.
/// The walk uses an explicit stack, so deeply nested input cannot exhaust
/// the call stack.
pub fn sanitize_value(value: &mut Value) {
    let mut stack: Vec<&mut Value> = vec![value];
    while let Some(current) = stack.pop() {
        match current {
            Value::String(s) => {
                let cleaned = sanitize_html(s);
                if cleaned != *s {
                    *s = cleaned;
                }
            }
            Value::Array(items) => stack.extend(items.iter_mut()),
            Value::Object(map) => stack.extend(map.values_mut()),
            Value::Null | Value::Bool(_) | Value::Number(_) => {}
        }
    }
}

/// Owned variant of [`sanitize_value`]
pub fn sanitize_object(mut value: Value) -> Value {
    sanitize_value(&mut value);
    value
}

/// Escape special characters for re-rendering untrusted text inside markup
pub fn escape_html(value: &str) -> String {
    let mut output = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => output.push_str("&amp;"),
            '<' => output.push_str("&lt;"),
            '>' => output.push_str("&gt;"),
            '"' => output.push_str("&quot;"),
            '\'' => output.push_str("&#x27;"),
            _ => output.push(c),
        }
    }
    output
}

/// Validate that a JSON value is not nested deeper than `max_depth`
pub fn check_depth(value: &Value, max_depth: usize) -> Result<(), String> {
    let mut stack: Vec<(&Value, usize)> = vec![(value, 0)];
    while let Some((current, depth)) = stack.pop() {
        if depth > max_depth {
            return Err(format!(
                "JSON exceeds maximum nesting depth of {}",
                max_depth
            ));
        }
        match current {
            Value::Array(items) => stack.extend(items.iter().map(|v| (v, depth + 1))),
            Value::Object(map) => stack.extend(map.values().map(|v| (v, depth + 1))),
            _ => {}
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_strip_plain_tags() {
        assert_eq!(sanitize_html("<b>bold</b>"), "bold");
        assert_eq!(sanitize_html("no tags here"), "no tags here");
        assert_eq!(sanitize_html("<p>paragraph</p><br/>more"), "paragraphmore");
    }

    #[test]
    fn test_script_content_is_removed() {
        assert_eq!(sanitize_html("<script>alert('xss')</script>ok"), "ok");
        assert_eq!(sanitize_html("a<SCRIPT type=\"text/javascript\">x()</SCRIPT >b"), "ab");
        assert_eq!(sanitize_html("before<script>never closed"), "before");
        assert_eq!(sanitize_html("<style>body{}</style>text"), "text");
    }

    #[test]
    fn test_event_handler_attributes_are_removed() {
        assert_eq!(sanitize_html("<img src=x onerror=alert(1)>hello"), "hello");
        assert_eq!(sanitize_html("<a href=\"javascript:alert(1)\">link</a>"), "link");
        assert_eq!(sanitize_html("tail <img src=x onerror=alert(1)"), "tail ");
    }

    #[test]
    fn test_quoted_attribute_values_stay_inside_the_tag() {
        assert_eq!(sanitize_html(r#"<img alt="a>b" onerror="alert(1)">x"#), "x");
        assert_eq!(sanitize_html("<a title='1 > 0' href=x>link</a>"), "link");
        assert_eq!(sanitize_html(r#"<b class="open>text"#), "text");
        assert_eq!(sanitize_html(r#"<b title="x>y">"#), "");
    }

    #[test]
    fn test_comments_and_doctype() {
        assert_eq!(sanitize_html("a<!-- hidden -->b"), "ab");
        assert_eq!(sanitize_html("<!DOCTYPE html>text"), "text");
        assert_eq!(sanitize_html("a<!-- open"), "a");
    }

    #[test]
    fn test_nested_fragments_are_removed() {
        assert_eq!(sanitize_html("<<b>script>alert(1)<</b>/script>"), "");
        assert!(!TAG_PATTERN.is_match(&sanitize_html("<scr<b></b>ipt>alert(1)</script>")));
    }

    #[test]
    fn test_non_markup_text_is_unchanged() {
        for text in [
            "São Paulo – estação nº 3 ✓",
            "1 < 2 and 3 > 2",
            "preço <= R$ 10",
            "",
            "emoji 🔌⚡",
        ] {
            assert_eq!(sanitize_html(text), text);
        }
    }

    #[test]
    fn test_idempotent() {
        let once = sanitize_html("<<b>i>x</b><img src=x onerror=y>");
        assert_eq!(sanitize_html(&once), once);
    }

    #[test]
    fn test_optional_empty() {
        assert_eq!(sanitize_html_optional(None), "");
        assert_eq!(sanitize_html_optional(Some("<i>x</i>")), "x");
    }

    #[test]
    fn test_contains_markup() {
        assert!(contains_markup("<b>x</b>"));
        assert!(!contains_markup("x > y"));
    }

    #[test]
    fn test_sanitize_value_preserves_shape() {
        let data = json!({
            "name": "<b>Station</b> 1",
            "power": 22.5,
            "enabled": true,
            "notes": null,
            "tags": ["<script>x</script>", "fast", {"deep": "<i>ok</i>"}],
            "<b>key</b>": "value"
        });

        let cleaned = sanitize_object(data);

        assert_eq!(
            cleaned,
            json!({
                "name": "Station 1",
                "power": 22.5,
                "enabled": true,
                "notes": null,
                "tags": ["", "fast", {"deep": "ok"}],
                "<b>key</b>": "value"
            })
        );
    }

    #[test]
    fn test_sanitize_deeply_nested_value() {
        let mut value = Value::String("<b>leaf</b>".to_string());
        for _ in 0..2_000 {
            value = Value::Array(vec![value]);
        }
        sanitize_value(&mut value);

        let mut cursor = &value;
        while let Value::Array(items) = cursor {
            cursor = &items[0];
        }
        assert_eq!(cursor, &json!("leaf"));
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html("<script>alert('XSS')</script>"),
            "&lt;script&gt;alert(&#x27;XSS&#x27;)&lt;/script&gt;"
        );
    }

    #[test]
    fn test_check_depth() {
        let shallow = json!({"a": {"b": [1, 2]}});
        assert!(check_depth(&shallow, 3).is_ok());
        assert!(check_depth(&shallow, 1).is_err());
        assert!(check_depth(&json!("leaf"), 0).is_ok());
    }
}
