//! Feed response parsing.

use serde_json::Value;
use sunosync_core::Clip;

use crate::error::{ApiError, ApiResult};

/// Field names under which an object response may carry its clip list.
const LIST_FIELDS: [&str; 2] = ["clips", "items"];

/// Parse a feed body: a bare array, or an object exposing a clip list.
pub fn parse_feed_body(body: &[u8]) -> ApiResult<Vec<Clip>> {
    let value: Value = serde_json::from_slice(body)?;
    parse_feed_value(value)
}

/// Extract clips from an already-decoded JSON value.
pub fn parse_feed_value(value: Value) -> ApiResult<Vec<Clip>> {
    let list = match value {
        Value::Array(items) => items,
        Value::Object(mut map) => LIST_FIELDS
            .iter()
            .find_map(|field| match map.remove(*field) {
                Some(Value::Array(items)) => Some(items),
                _ => None,
            })
            .ok_or_else(|| ApiError::Malformed {
                message: "object without a clip list".to_string(),
            })?,
        other => {
            return Err(ApiError::Malformed {
                message: format!("unexpected JSON {}", kind(&other)),
            });
        }
    };

    list.into_iter()
        .map(|item| serde_json::from_value(item).map_err(ApiError::from))
        .collect()
}

const fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_bare_array() {
        let clips = parse_feed_value(json!([{"id": "a"}, {"id": "b"}])).unwrap();
        assert_eq!(clips.len(), 2);
        assert_eq!(clips[1].id(), Some("b"));
    }

    #[test]
    fn test_object_with_clips_or_items() {
        let clips = parse_feed_value(json!({"clips": [{"id": "a"}], "num_total": 1})).unwrap();
        assert_eq!(clips.len(), 1);

        let items = parse_feed_value(json!({"items": [{"id": "z"}]})).unwrap();
        assert_eq!(items[0].id(), Some("z"));
    }

    #[test]
    fn test_empty_list_is_end_of_feed() {
        assert!(parse_feed_value(json!({"clips": []})).unwrap().is_empty());
        assert!(parse_feed_body(b"[]").unwrap().is_empty());
    }

    #[test]
    fn test_malformed_bodies() {
        assert!(matches!(
            parse_feed_value(json!({"detail": "nope"})),
            Err(ApiError::Malformed { .. })
        ));
        assert!(matches!(
            parse_feed_value(json!("text")),
            Err(ApiError::Malformed { .. })
        ));
        assert!(matches!(
            parse_feed_body(b"<html>"),
            Err(ApiError::JsonParse(_))
        ));
    }
}
