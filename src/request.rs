//! Inbound request dispatch.
//!
//! A payload with a top-level `meta` key is a blueprint; anything else is a
//! legacy request already in the flat view shape. The decision is made once,
//! here, and carried as a type from then on.

use serde_json::Value;

use crate::blueprint::AppBlueprint;
use crate::error::Result;
use crate::view::LegacyView;

#[derive(Debug, Clone, PartialEq)]
pub enum GenerateRequest {
    Blueprint(AppBlueprint),
    Legacy(LegacyView),
}

impl GenerateRequest {
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let value: Value = serde_json::from_slice(bytes)?;
        Self::from_value(value)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Self::from_slice(json.as_bytes())
    }

    pub fn from_value(value: Value) -> Result<Self> {
        let is_blueprint = value.as_object().is_some_and(|obj| obj.contains_key("meta"));
        if is_blueprint {
            Ok(GenerateRequest::Blueprint(serde_json::from_value(value)?))
        } else {
            Ok(GenerateRequest::Legacy(serde_json::from_value(value)?))
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            GenerateRequest::Blueprint(_) => "blueprint",
            GenerateRequest::Legacy(_) => "legacy",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GeneratorError;
    use serde_json::json;

    #[test]
    fn test_meta_key_selects_blueprint() {
        let request = GenerateRequest::from_value(json!({
            "meta": { "appName": "A", "slug": "a", "owner": "o", "category": "Social", "useLatestExpo": false },
            "navigation": { "root": "stack", "structure": { "type": "stack", "id": "r", "children": [] } },
            "screens": []
        }))
        .unwrap();
        assert_eq!(request.kind(), "blueprint");
    }

    #[test]
    fn test_flat_payload_is_legacy() {
        let request = GenerateRequest::from_json(
            r#"{ "appName": "A", "slug": "a", "owner": "o", "useLatestExpo": true }"#,
        )
        .unwrap();
        let GenerateRequest::Legacy(view) = request else {
            panic!("expected legacy request");
        };
        assert!(view.use_latest_expo);
        assert!(view.navigation.stack.is_empty());
    }

    #[test]
    fn test_broken_blueprint_is_not_retried_as_legacy() {
        // `meta` present but incomplete: the blueprint decoder reports it.
        let err = GenerateRequest::from_value(json!({ "meta": {}, "appName": "A", "slug": "a", "owner": "o" }))
            .unwrap_err();
        assert!(matches!(err, GeneratorError::InvalidPayload(_)));
        assert_eq!(err.status_code(), 400);
    }

    #[test]
    fn test_invalid_json() {
        let err = GenerateRequest::from_slice(b"{ not json").unwrap_err();
        assert!(err.is_client_error());
    }
}
