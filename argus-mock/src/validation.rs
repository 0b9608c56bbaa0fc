//! Body validation pipeline.
//!
//! Runs after authentication and the project-active check. Parses the JSON
//! body, rejects unknown top-level fields wholesale, then applies the
//! per-field rules in a fixed order: width, active flag, metadata, name,
//! image. The first failure wins; callers rely on this exact precedence.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde_json::{Map, Value};

use crate::config::SimulatorConfig;
use crate::error::SimulatorError;
use crate::store::{NewTarget, TargetPatch};

const ALLOWED_FIELDS: &[&str] = &["name", "width", "image", "active_flag", "application_metadata"];

/// Validate a create body into ready-to-store fields.
///
/// `name`, `width` and `image` are required; `active_flag` defaults to true.
pub fn parse_add_request(
    body: &[u8],
    config: &SimulatorConfig,
) -> Result<NewTarget, SimulatorError> {
    let fields = parse_object(body)?;
    reject_unknown_fields(&fields)?;

    let width = match fields.get("width") {
        Some(value) => parse_width(value)?,
        None => return Err(SimulatorError::BadRequest("width is required".into())),
    };
    let active_flag = match fields.get("active_flag") {
        Some(value) => parse_active_flag(value)?,
        None => true,
    };
    let application_metadata = match fields.get("application_metadata") {
        Some(value) => parse_metadata(value, config)?,
        None => None,
    };
    let name = match fields.get("name") {
        Some(value) => parse_name(value, config)?,
        None => return Err(SimulatorError::BadRequest("name is required".into())),
    };
    let image = match fields.get("image") {
        Some(value) => parse_image(value, config)?,
        None => return Err(SimulatorError::BadRequest("image is required".into())),
    };

    Ok(NewTarget {
        name,
        width,
        image,
        active_flag,
        application_metadata,
    })
}

/// Validate an update body into a patch. Every field is optional; a `null`
/// metadata value clears the stored blob.
pub fn parse_update_request(
    body: &[u8],
    config: &SimulatorConfig,
) -> Result<TargetPatch, SimulatorError> {
    let fields = parse_object(body)?;
    reject_unknown_fields(&fields)?;

    let mut patch = TargetPatch::default();

    if let Some(value) = fields.get("width") {
        patch.width = Some(parse_width(value)?);
    }
    if let Some(value) = fields.get("active_flag") {
        patch.active_flag = Some(parse_active_flag(value)?);
    }
    if let Some(value) = fields.get("application_metadata") {
        patch.application_metadata = Some(parse_metadata(value, config)?);
    }
    if let Some(value) = fields.get("name") {
        patch.name = Some(parse_name(value, config)?);
    }
    if let Some(value) = fields.get("image") {
        patch.image = Some(parse_image(value, config)?);
    }

    Ok(patch)
}

fn parse_object(body: &[u8]) -> Result<Map<String, Value>, SimulatorError> {
    let value: Value = serde_json::from_slice(body)
        .map_err(|e| SimulatorError::BadRequest(format!("body is not valid JSON: {e}")))?;
    match value {
        Value::Object(map) => Ok(map),
        _ => Err(SimulatorError::BadRequest("body must be a JSON object".into())),
    }
}

/// Unknown top-level keys fail the whole request; the service does not ignore
/// unexpected fields.
fn reject_unknown_fields(fields: &Map<String, Value>) -> Result<(), SimulatorError> {
    for key in fields.keys() {
        if !ALLOWED_FIELDS.contains(&key.as_str()) {
            return Err(SimulatorError::BadRequest(format!("unexpected field: {key}")));
        }
    }
    Ok(())
}

fn parse_width(value: &Value) -> Result<f64, SimulatorError> {
    let width = value
        .as_f64()
        .ok_or_else(|| SimulatorError::BadRequest("width must be a number".into()))?;
    if width < 0.0 || !width.is_finite() {
        return Err(SimulatorError::BadRequest("width must be non-negative".into()));
    }
    Ok(width)
}

fn parse_active_flag(value: &Value) -> Result<bool, SimulatorError> {
    value
        .as_bool()
        .ok_or_else(|| SimulatorError::BadRequest("active_flag must be a boolean".into()))
}

/// `null` clears the metadata; a string must be valid base64. Invalid base64
/// is its own failure class, more severe than a plain type failure.
fn parse_metadata(
    value: &Value,
    config: &SimulatorConfig,
) -> Result<Option<Vec<u8>>, SimulatorError> {
    match value {
        Value::Null => Ok(None),
        Value::String(encoded) => {
            let decoded = BASE64
                .decode(encoded)
                .map_err(|_| SimulatorError::MetadataNotBase64)?;
            if decoded.len() > config.max_metadata_bytes {
                return Err(SimulatorError::MetadataTooLarge);
            }
            Ok(Some(decoded))
        }
        _ => Err(SimulatorError::BadRequest(
            "application_metadata must be a string or null".into(),
        )),
    }
}

fn parse_name(value: &Value, config: &SimulatorConfig) -> Result<String, SimulatorError> {
    let name = value
        .as_str()
        .ok_or_else(|| SimulatorError::BadRequest("name must be a string".into()))?;
    if name.is_empty() {
        return Err(SimulatorError::BadRequest("name must not be empty".into()));
    }
    if name.chars().count() > config.max_name_len {
        return Err(SimulatorError::BadRequest("name is too long".into()));
    }
    Ok(name.to_string())
}

/// The image arrives base64-embedded in the JSON body, never as a separate
/// part. It must decode as a supported raster format and fit the ceiling.
fn parse_image(value: &Value, config: &SimulatorConfig) -> Result<Vec<u8>, SimulatorError> {
    let encoded = value
        .as_str()
        .ok_or_else(|| SimulatorError::BadRequest("image must be a base64 string".into()))?;
    let bytes = BASE64
        .decode(encoded)
        .map_err(|_| SimulatorError::BadRequest("image is not valid base64".into()))?;

    image::load_from_memory(&bytes).map_err(|_| SimulatorError::BadImage)?;

    if bytes.len() > config.max_image_bytes {
        return Err(SimulatorError::ImageTooLarge);
    }
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const PNG: &[u8] = include_bytes!("../tests/fixtures/rgb.png");

    fn config() -> SimulatorConfig {
        SimulatorConfig::default()
    }

    fn png_base64() -> String {
        BASE64.encode(PNG)
    }

    fn add_body(extra: impl FnOnce(&mut Map<String, Value>)) -> Vec<u8> {
        let mut map = Map::new();
        map.insert("name".into(), json!("x"));
        map.insert("width".into(), json!(1));
        map.insert("image".into(), json!(png_base64()));
        extra(&mut map);
        serde_json::to_vec(&Value::Object(map)).unwrap()
    }

    #[test]
    fn test_minimal_add_request() {
        let new = parse_add_request(&add_body(|_| {}), &config()).unwrap();
        assert_eq!(new.name, "x");
        assert_eq!(new.width, 1.0);
        assert!(new.active_flag);
        assert_eq!(new.application_metadata, None);
        assert_eq!(new.image, PNG);
    }

    #[test]
    fn test_unknown_field_rejected_wholesale() {
        let body = add_body(|map| {
            map.insert("extra_thing".into(), json!(1));
        });
        let err = parse_add_request(&body, &config()).unwrap_err();
        assert!(matches!(err, SimulatorError::BadRequest(_)));
    }

    #[test]
    fn test_not_json_rejected() {
        let err = parse_add_request(b"not json", &config()).unwrap_err();
        assert!(matches!(err, SimulatorError::BadRequest(_)));

        let err = parse_add_request(b"[1,2]", &config()).unwrap_err();
        assert!(matches!(err, SimulatorError::BadRequest(_)));
    }

    #[test]
    fn test_width_invalid_values() {
        for width in [json!(-1), json!("10"), json!(null)] {
            let body = add_body(|map| {
                map.insert("width".into(), width.clone());
            });
            let err = parse_add_request(&body, &config()).unwrap_err();
            assert!(matches!(err, SimulatorError::BadRequest(_)), "width: {width}");
        }
    }

    #[test]
    fn test_width_valid_values() {
        for (width, expected) in [(json!(0), 0.0), (json!(0.1), 0.1)] {
            let body = add_body(|map| {
                map.insert("width".into(), width);
            });
            let new = parse_add_request(&body, &config()).unwrap();
            assert_eq!(new.width, expected);
        }
    }

    #[test]
    fn test_active_flag_must_be_boolean() {
        for flag in [json!("string"), json!(null), json!(1)] {
            let body = add_body(|map| {
                map.insert("active_flag".into(), flag);
            });
            let err = parse_add_request(&body, &config()).unwrap_err();
            assert!(matches!(err, SimulatorError::BadRequest(_)));
        }
    }

    #[test]
    fn test_metadata_null_and_valid_base64() {
        let body = add_body(|map| {
            map.insert("application_metadata".into(), json!(null));
        });
        assert_eq!(parse_add_request(&body, &config()).unwrap().application_metadata, None);

        let body = add_body(|map| {
            map.insert("application_metadata".into(), json!(BASE64.encode(b"Some data")));
        });
        let new = parse_add_request(&body, &config()).unwrap();
        assert_eq!(new.application_metadata.as_deref(), Some(b"Some data".as_ref()));
    }

    #[test]
    fn test_metadata_invalid_base64_is_distinct() {
        let body = add_body(|map| {
            map.insert("application_metadata".into(), json!("a"));
        });
        let err = parse_add_request(&body, &config()).unwrap_err();
        assert_eq!(err, SimulatorError::MetadataNotBase64);
    }

    #[test]
    fn test_metadata_wrong_type_is_generic_failure() {
        let body = add_body(|map| {
            map.insert("application_metadata".into(), json!(1));
        });
        let err = parse_add_request(&body, &config()).unwrap_err();
        assert!(matches!(err, SimulatorError::BadRequest(_)));
    }

    #[test]
    fn test_metadata_too_large() {
        let config = SimulatorConfig {
            max_metadata_bytes: 4,
            ..SimulatorConfig::default()
        };
        let body = add_body(|map| {
            map.insert("application_metadata".into(), json!(BASE64.encode(b"12345")));
        });
        let err = parse_add_request(&body, &config).unwrap_err();
        assert_eq!(err, SimulatorError::MetadataTooLarge);
    }

    #[test]
    fn test_name_rules() {
        for name in [json!(""), json!(1), json!(null), json!("x".repeat(65))] {
            let body = add_body(|map| {
                map.insert("name".into(), name);
            });
            let err = parse_add_request(&body, &config()).unwrap_err();
            assert!(matches!(err, SimulatorError::BadRequest(_)));
        }
    }

    #[test]
    fn test_image_not_decodable() {
        let body = add_body(|map| {
            map.insert("image".into(), json!(BASE64.encode(b"Not an image")));
        });
        let err = parse_add_request(&body, &config()).unwrap_err();
        assert_eq!(err, SimulatorError::BadImage);
    }

    #[test]
    fn test_image_not_base64() {
        let body = add_body(|map| {
            map.insert("image".into(), json!("@@@not-base64@@@"));
        });
        let err = parse_add_request(&body, &config()).unwrap_err();
        assert!(matches!(err, SimulatorError::BadRequest(_)));
    }

    #[test]
    fn test_image_over_ceiling() {
        let config = SimulatorConfig {
            max_image_bytes: 10,
            ..SimulatorConfig::default()
        };
        let err = parse_add_request(&add_body(|_| {}), &config).unwrap_err();
        assert_eq!(err, SimulatorError::ImageTooLarge);
    }

    #[test]
    fn test_missing_required_fields() {
        for field in ["name", "width", "image"] {
            let body = add_body(|map| {
                map.remove(field);
            });
            let err = parse_add_request(&body, &config()).unwrap_err();
            assert!(matches!(err, SimulatorError::BadRequest(_)), "missing {field}");
        }
    }

    #[test]
    fn test_update_patch_is_all_optional() {
        let patch = parse_update_request(b"{}", &config()).unwrap();
        assert!(patch.name.is_none());
        assert!(patch.width.is_none());
        assert!(patch.image.is_none());
        assert!(patch.active_flag.is_none());
        assert!(patch.application_metadata.is_none());
    }

    #[test]
    fn test_update_metadata_null_clears() {
        let body = serde_json::to_vec(&json!({ "application_metadata": null })).unwrap();
        let patch = parse_update_request(&body, &config()).unwrap();
        assert_eq!(patch.application_metadata, Some(None));
    }

    #[test]
    fn test_update_field_precedence_width_before_name() {
        // Both width and name invalid: width is checked first.
        let body = serde_json::to_vec(&json!({ "width": -1, "name": "" })).unwrap();
        let err = parse_update_request(&body, &config()).unwrap_err();
        assert_eq!(
            err,
            SimulatorError::BadRequest("width must be non-negative".into())
        );
    }
}
