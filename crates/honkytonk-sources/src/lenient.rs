//! Deserializers for scraped JSON where numbers arrive as strings and lists as scalars.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Accepts `12`, `"12"`, `"#12"`, `"+3"`, `"-2"`, `"1,234"`; `"-"`, `"NEW"`, `""` and null become `None`.
pub(crate) fn int<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(value_to_int))
}

/// Accepts a string, a number or an array of strings (joined with ", ").
pub(crate) fn text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(value_to_text))
}

pub(crate) fn value_to_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.round() as i64)),
        Value::String(s) => parse_int(s),
        _ => None,
    }
}

pub(crate) fn parse_int(raw: &str) -> Option<i64> {
    let cleaned: String = raw
        .trim()
        .trim_start_matches('#')
        .chars()
        .filter(|c| *c != ',' && !c.is_whitespace())
        .collect();
    let cleaned = cleaned.strip_prefix('+').unwrap_or(&cleaned);
    cleaned.parse::<i64>().ok()
}

fn value_to_text(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(items) => items
            .iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s.trim().to_string()),
                Value::Object(map) => map
                    .get("name")
                    .and_then(|n| n.as_str())
                    .map(|s| s.trim().to_string()),
                _ => None,
            })
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(", "),
        _ => String::new(),
    };
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_value_to_int() {
        assert_eq!(value_to_int(&json!(7)), Some(7));
        assert_eq!(value_to_int(&json!("12")), Some(12));
        assert_eq!(value_to_int(&json!("+3")), Some(3));
        assert_eq!(value_to_int(&json!("-2")), Some(-2));
        assert_eq!(value_to_int(&json!("#4")), Some(4));
        assert_eq!(value_to_int(&json!("1,234")), Some(1234));
        assert_eq!(value_to_int(&json!("-")), None);
        assert_eq!(value_to_int(&json!("NEW")), None);
        assert_eq!(value_to_int(&json!(null)), None);
    }

    #[test]
    fn test_value_to_text() {
        assert_eq!(value_to_text(&json!("  Zach Bryan ")), Some("Zach Bryan".to_string()));
        assert_eq!(
            value_to_text(&json!(["Morgan Wallen", "Post Malone"])),
            Some("Morgan Wallen, Post Malone".to_string())
        );
        assert_eq!(value_to_text(&json!([{"name": "Lainey Wilson"}])), Some("Lainey Wilson".to_string()));
        assert_eq!(value_to_text(&json!("")), None);
    }
}
