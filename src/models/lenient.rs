//! Field deserializers that tolerate unexpected upstream shapes.
//!
//! A wrong type (null, negative number, string) turns into a missing value
//! instead of failing the whole document.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// `Some(value)` when the field has the expected shape, `None` otherwise
pub(crate) fn optional<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

/// Elements of an array that have the expected shape; anything else is empty
pub(crate) fn list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect(),
        _ => Vec::new(),
    })
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Sample {
        #[serde(default, deserialize_with = "super::optional")]
        count: Option<u32>,
        #[serde(default, deserialize_with = "super::list")]
        items: Vec<u8>,
    }

    #[test]
    fn test_wrong_shapes_become_missing() {
        let sample: Sample = serde_json::from_str(r#"{"count":-1,"items":[1,"x",null,300,2]}"#).unwrap();
        assert_eq!(sample.count, None);
        assert_eq!(sample.items, vec![1, 2]);

        let sample: Sample = serde_json::from_str(r#"{"count":null,"items":{"a":1}}"#).unwrap();
        assert_eq!(sample.count, None);
        assert!(sample.items.is_empty());
    }

    #[test]
    fn test_absent_fields_default() {
        let sample: Sample = serde_json::from_str(r#"{}"#).unwrap();
        assert_eq!(sample.count, None);
        assert!(sample.items.is_empty());

        let sample: Sample = serde_json::from_str(r#"{"count":7}"#).unwrap();
        assert_eq!(sample.count, Some(7));
    }
}
