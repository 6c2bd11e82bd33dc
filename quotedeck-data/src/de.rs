//! Custom deserialisation helpers for exchange payloads.

use serde::{Deserialize, Deserializer, de};
use std::{fmt::Display, str::FromStr};

/// Deserialise a `String` field into the target type via `FromStr`.
///
/// Exchange ticker payloads carry numeric fields as JSON strings
/// (eg. `"c": "16578.50"`).
pub fn de_str<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: Display,
{
    let value = String::deserialize(deserializer)?;
    value.parse::<T>().map_err(de::Error::custom)
}

/// Read a JSON value that is either a number or a numeric string as `f64`.
///
/// Klines responses are not consistent about the encoding of OHLC fields.
pub fn f64_from_value(value: &serde_json::Value) -> Option<f64> {
    match value {
        serde_json::Value::Number(number) => number.as_f64(),
        serde_json::Value::String(text) => text.parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Payload {
        #[serde(deserialize_with = "de_str")]
        price: f64,
    }

    #[test]
    fn test_de_str() {
        let parsed = serde_json::from_str::<Payload>(r#"{"price": "16578.50"}"#).unwrap();
        assert_eq!(parsed.price, 16578.50);

        assert!(serde_json::from_str::<Payload>(r#"{"price": "not-a-number"}"#).is_err());
        assert!(serde_json::from_str::<Payload>(r#"{"price": null}"#).is_err());
    }

    #[test]
    fn test_f64_from_value() {
        assert_eq!(f64_from_value(&serde_json::json!(42.5)), Some(42.5));
        assert_eq!(f64_from_value(&serde_json::json!("42.5")), Some(42.5));
        assert_eq!(f64_from_value(&serde_json::json!("abc")), None);
        assert_eq!(f64_from_value(&serde_json::json!(null)), None);
        assert_eq!(f64_from_value(&serde_json::json!([1.0])), None);
    }
}
