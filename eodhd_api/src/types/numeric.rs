//! Lenient numeric fields.
//!
//! The provider reports missing values as `"NA"` (or occasionally as numeric
//! strings), so numeric fields are decoded through these helpers instead of
//! failing the whole payload. Anything that is not a finite number becomes `None`.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Deserializes a JSON number, numeric string, or anything else into `Option<f64>`.
pub fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(value_to_f64))
}

/// Same as [`lenient_f64`] but for integral fields such as timestamps.
pub fn lenient_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => n.as_i64(),
        Some(Value::String(s)) => s.trim().parse::<i64>().ok(),
        _ => None,
    })
}

fn value_to_f64(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Sample {
        #[serde(default, deserialize_with = "lenient_f64")]
        value: Option<f64>,
        #[serde(default, deserialize_with = "lenient_i64")]
        count: Option<i64>,
    }

    fn parse_sample(json: &str) -> Sample {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn numbers_pass_through() {
        let p = parse_sample(r#"{"value": 12.5, "count": 7}"#);
        assert_eq!(p.value, Some(12.5));
        assert_eq!(p.count, Some(7));
    }

    #[test]
    fn numeric_strings_are_parsed() {
        let p = parse_sample(r#"{"value": " 101.25 ", "count": "42"}"#);
        assert_eq!(p.value, Some(101.25));
        assert_eq!(p.count, Some(42));
    }

    #[test]
    fn na_marker_becomes_none() {
        let p = parse_sample(r#"{"value": "NA", "count": "NA"}"#);
        assert_eq!(p.value, None);
        assert_eq!(p.count, None);
    }

    #[test]
    fn null_and_missing_become_none() {
        let p = parse_sample(r#"{"value": null}"#);
        assert_eq!(p.value, None);
        assert_eq!(p.count, None);
    }

    #[test]
    fn non_finite_strings_become_none() {
        assert_eq!(parse_sample(r#"{"value": "NaN"}"#).value, None);
        assert_eq!(parse_sample(r#"{"value": "inf"}"#).value, None);
    }

    #[test]
    fn nested_values_become_none() {
        assert_eq!(parse_sample(r#"{"value": [1.0]}"#).value, None);
        assert_eq!(parse_sample(r#"{"value": true}"#).value, None);
    }
}
