use csms_guard::{sanitize_html, sanitize_object};
use proptest::prelude::*;
use regex::Regex;
use serde_json::{Map, Value};

fn tag_pattern() -> Regex {
    Regex::new(r#"<[A-Za-z/!?](?:"[^"]*"|'[^']*'|[^>])*(?:>|\z)"#).unwrap()
}

/// Text built from markup fragments so that tags, partial tags and script
/// blocks show up often
fn markup_text() -> impl Strategy<Value = String> {
    let fragment = prop_oneof![
        Just("<".to_string()),
        Just(">".to_string()),
        Just("</".to_string()),
        Just("<script>".to_string()),
        Just("</script>".to_string()),
        Just("<img src=x onerror=alert(1)>".to_string()),
        Just(r#"<img alt="a>b" onerror="alert(1)">"#.to_string()),
        Just("<a title='>'>".to_string()),
        Just("\"".to_string()),
        Just("<!--".to_string()),
        Just("-->".to_string()),
        Just("<b>".to_string()),
        "[a-z ]{0,4}",
        "\\PC{0,3}",
    ];
    prop::collection::vec(fragment, 0..12).prop_map(|parts| parts.concat())
}

fn json_value() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::from),
        markup_text().prop_map(Value::String),
    ];
    leaf.prop_recursive(4, 48, 6, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..6).prop_map(Value::Array),
            prop::collection::vec(("[a-z<>]{1,6}", inner), 0..6)
                .prop_map(|entries| Value::Object(entries.into_iter().collect::<Map<_, _>>())),
        ]
    })
}

fn same_shape(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::String(_), Value::String(_)) => true,
        (Value::Array(x), Value::Array(y)) => {
            x.len() == y.len() && x.iter().zip(y).all(|(p, q)| same_shape(p, q))
        }
        (Value::Object(x), Value::Object(y)) => {
            x.len() == y.len()
                && x.iter()
                    .all(|(k, v)| y.get(k).map_or(false, |w| same_shape(v, w)))
        }
        (x, y) => x == y,
    }
}

proptest! {
    #[test]
    fn sanitize_is_idempotent(text in markup_text()) {
        let once = sanitize_html(&text);
        prop_assert_eq!(sanitize_html(&once), once);
    }

    #[test]
    fn sanitized_text_has_no_tags(text in markup_text()) {
        let clean = sanitize_html(&text);
        prop_assert!(!tag_pattern().is_match(&clean), "tag left in {:?}", clean);
    }

    #[test]
    fn plain_text_is_untouched(text in "[^<]{0,64}") {
        prop_assert_eq!(sanitize_html(&text), text);
    }

    #[test]
    fn sanitize_object_preserves_shape(value in json_value()) {
        let cleaned = sanitize_object(value.clone());
        prop_assert!(same_shape(&value, &cleaned));
    }
}
