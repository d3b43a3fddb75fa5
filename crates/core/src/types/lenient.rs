//! Lenient JSON field parsing.
//!
//! The admin UI posts form values as they were typed, so a price may arrive
//! as `49.99` or `"49.99"` and an inventory count as `12` or `"12"`. These
//! helpers accept either shape and reject anything that does not parse.

use serde::Deserialize;
use serde::de::{self, Deserializer, Unexpected, Visitor};

/// Deserialize a string from a JSON string or number.
///
/// # Errors
///
/// Returns a deserialization error for any other JSON type.
pub fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    struct StringOrNumber;

    impl Visitor<'_> for StringOrNumber {
        type Value = String;

        fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_str("a string or a number")
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<String, E> {
            Ok(v.to_owned())
        }

        fn visit_string<E: de::Error>(self, v: String) -> Result<String, E> {
            Ok(v)
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<String, E> {
            Ok(v.to_string())
        }
    }

    deserializer.deserialize_any(StringOrNumber)
}

/// Deserialize an `f64` from a JSON number or a numeric string.
///
/// Surrounding whitespace in strings is ignored. Non-finite values are rejected.
///
/// # Errors
///
/// Returns a deserialization error if the value is not numeric.
pub fn f64_or_string<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    struct FloatOrString;

    impl Visitor<'_> for FloatOrString {
        type Value = f64;

        fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_str("a number or a numeric string")
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<f64, E> {
            if v.is_finite() {
                Ok(v)
            } else {
                Err(E::invalid_value(Unexpected::Float(v), &self))
            }
        }

        #[allow(clippy::cast_precision_loss)]
        fn visit_u64<E: de::Error>(self, v: u64) -> Result<f64, E> {
            Ok(v as f64)
        }

        #[allow(clippy::cast_precision_loss)]
        fn visit_i64<E: de::Error>(self, v: i64) -> Result<f64, E> {
            Ok(v as f64)
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<f64, E> {
            v.trim()
                .parse::<f64>()
                .ok()
                .filter(|n| n.is_finite())
                .ok_or_else(|| E::invalid_value(Unexpected::Str(v), &self))
        }
    }

    deserializer.deserialize_any(FloatOrString)
}

/// Deserialize an optional `f64`, treating `null` and blank strings as absent.
///
/// Form-driven clients send `""` for fields left empty.
///
/// # Errors
///
/// Returns a deserialization error if a present value is not numeric.
pub fn opt_f64_or_string<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(serde::Deserialize)]
    #[serde(untagged)]
    enum Field {
        Value(#[serde(deserialize_with = "f64_or_string")] f64),
        Other(String),
    }

    match Option::<Field>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Field::Value(v)) => Ok(Some(v)),
        Some(Field::Other(s)) if s.trim().is_empty() => Ok(None),
        Some(Field::Other(s)) => Err(de::Error::invalid_value(
            Unexpected::Str(&s),
            &"a finite number or numeric string",
        )),
    }
}

/// Deserialize a `u32` from a JSON number or an integer string.
///
/// Like `parseInt`, a fractional number is truncated. Negative values are rejected.
///
/// # Errors
///
/// Returns a deserialization error if the value is not a non-negative integer.
pub fn u32_or_string<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    struct CountOrString;

    impl Visitor<'_> for CountOrString {
        type Value = u32;

        fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_str("a non-negative integer or integer string")
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<u32, E> {
            u32::try_from(v).map_err(|_| E::invalid_value(Unexpected::Unsigned(v), &self))
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<u32, E> {
            u32::try_from(v).map_err(|_| E::invalid_value(Unexpected::Signed(v), &self))
        }

        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        fn visit_f64<E: de::Error>(self, v: f64) -> Result<u32, E> {
            if v.is_finite() && v >= 0.0 && v < f64::from(u32::MAX) {
                Ok(v.trunc() as u32)
            } else {
                Err(E::invalid_value(Unexpected::Float(v), &self))
            }
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<u32, E> {
            v.trim()
                .parse::<u32>()
                .map_err(|_| E::invalid_value(Unexpected::Str(v), &self))
        }
    }

    deserializer.deserialize_any(CountOrString)
}

/// Deserialize an optional `u32`, treating `null` and blank strings as absent.
///
/// # Errors
///
/// Returns a deserialization error if a present value is not a non-negative integer.
pub fn opt_u32_or_string<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(serde::Deserialize)]
    #[serde(untagged)]
    enum Field {
        Value(#[serde(deserialize_with = "u32_or_string")] u32),
        Other(String),
    }

    match Option::<Field>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Field::Value(v)) => Ok(Some(v)),
        Some(Field::Other(s)) if s.trim().is_empty() => Ok(None),
        Some(Field::Other(s)) => Err(de::Error::invalid_value(
            Unexpected::Str(&s),
            &"a non-negative integer or integer string",
        )),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Form {
        #[serde(deserialize_with = "super::f64_or_string")]
        price: f64,
        #[serde(default, deserialize_with = "super::opt_u32_or_string")]
        inventory: Option<u32>,
    }

    #[test]
    fn test_price_from_number_and_string() {
        let a: Form = serde_json::from_str(r#"{"price": 49.99}"#).unwrap();
        let b: Form = serde_json::from_str(r#"{"price": " 49.99 "}"#).unwrap();
        assert!((a.price - 49.99).abs() < f64::EPSILON);
        assert!((b.price - 49.99).abs() < f64::EPSILON);
    }

    #[test]
    fn test_price_rejects_garbage() {
        assert!(serde_json::from_str::<Form>(r#"{"price": "cheap"}"#).is_err());
        assert!(serde_json::from_str::<Form>(r#"{"price": true}"#).is_err());
    }

    #[test]
    fn test_inventory_optional() {
        let missing: Form = serde_json::from_str(r#"{"price": 1}"#).unwrap();
        let null: Form = serde_json::from_str(r#"{"price": 1, "inventory": null}"#).unwrap();
        let zero: Form = serde_json::from_str(r#"{"price": 1, "inventory": "0"}"#).unwrap();
        assert_eq!(missing.inventory, None);
        assert_eq!(null.inventory, None);
        assert_eq!(zero.inventory, Some(0));
    }

    #[test]
    fn test_inventory_blank_string_is_absent() {
        let blank: Form = serde_json::from_str(r#"{"price": 1, "inventory": "  "}"#).unwrap();
        assert_eq!(blank.inventory, None);
        assert!(serde_json::from_str::<Form>(r#"{"price": 1, "inventory": "lots"}"#).is_err());
    }

    #[test]
    fn test_inventory_rejects_negative() {
        assert!(serde_json::from_str::<Form>(r#"{"price": 1, "inventory": -3}"#).is_err());
    }
}
