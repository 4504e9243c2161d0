//! Aspect initial properties
//!
//! Parsed from the JSON passed to `deploy --properties`, e.g.
//! `[{"key": "owner", "value": "0x7a9f..."}]`.

use serde::Deserialize;
use serde_json::Value;

use super::AspectError;

#[derive(Debug, Deserialize)]
struct RawProperty {
    key: String,
    value: Value,
}

/// Parse the optional properties JSON into key/value byte pairs.
///
/// String values starting with `0x` that are valid hex are decoded to bytes;
/// other strings are taken as UTF-8. Numbers and booleans use their JSON text.
pub fn parse_properties(json: Option<&str>) -> Result<Vec<(String, Vec<u8>)>, AspectError> {
    let Some(json) = json.map(str::trim).filter(|j| !j.is_empty()) else {
        return Ok(Vec::new());
    };

    let raw: Vec<RawProperty> =
        serde_json::from_str(json).map_err(|e| AspectError::InvalidProperties(e.to_string()))?;

    raw.into_iter()
        .map(|p| {
            let value = property_bytes(&p.key, &p.value)?;
            Ok((p.key, value))
        })
        .collect()
}

fn property_bytes(key: &str, value: &Value) -> Result<Vec<u8>, AspectError> {
    match value {
        Value::String(s) => {
            if let Some(digits) = s.strip_prefix("0x") {
                if let Ok(bytes) = hex::decode(digits) {
                    return Ok(bytes);
                }
            }
            Ok(s.as_bytes().to_vec())
        }
        Value::Number(n) => Ok(n.to_string().into_bytes()),
        Value::Bool(b) => Ok(b.to_string().into_bytes()),
        _ => Err(AspectError::InvalidProperties(format!(
            "value of '{}' must be a string, number or boolean",
            key
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_properties() {
        assert!(parse_properties(None).unwrap().is_empty());
        assert!(parse_properties(Some("  ")).unwrap().is_empty());
        assert!(parse_properties(Some("[]")).unwrap().is_empty());
    }

    #[test]
    fn test_value_kinds() {
        let props = parse_properties(Some(
            r#"[
                {"key": "owner", "value": "0x0a0b"},
                {"key": "name", "value": "guard"},
                {"key": "limit", "value": 42},
                {"key": "enabled", "value": true},
                {"key": "odd", "value": "0xzz"}
            ]"#,
        ))
        .unwrap();

        assert_eq!(props[0], ("owner".to_string(), vec![0x0a, 0x0b]));
        assert_eq!(props[1], ("name".to_string(), b"guard".to_vec()));
        assert_eq!(props[2], ("limit".to_string(), b"42".to_vec()));
        assert_eq!(props[3], ("enabled".to_string(), b"true".to_vec()));
        assert_eq!(props[4], ("odd".to_string(), b"0xzz".to_vec()));
    }

    #[test]
    fn test_invalid_properties() {
        assert!(matches!(
            parse_properties(Some("{not json")),
            Err(AspectError::InvalidProperties(_))
        ));
        assert!(matches!(
            parse_properties(Some(r#"[{"key": "k"}]"#)),
            Err(AspectError::InvalidProperties(_))
        ));
        assert!(matches!(
            parse_properties(Some(r#"[{"key": "k", "value": {"nested": 1}}]"#)),
            Err(AspectError::InvalidProperties(_))
        ));
    }
}
