//! The parsed result document returned to the presentation layer.

use serde::{Deserialize, Serialize};

/// A successfully generated indicator: Pine Script source, an explanation of
/// the approach, and the list of implemented features.
///
/// Field names mirror the wire schema declared to the model (`keyFeatures`
/// on the wire, snake case in Rust). At most one instance is live at a time;
/// each completed generate action replaces the previous one wholesale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedOutput {
    pub code: String,
    pub explanation: String,
    pub key_features: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_wire_schema_exactly() {
        let raw = r#"{"code":"x","explanation":"y","keyFeatures":["a","b"]}"#;
        let out: GeneratedOutput = serde_json::from_str(raw).unwrap();
        assert_eq!(out.code, "x");
        assert_eq!(out.explanation, "y");
        assert_eq!(out.key_features, vec!["a", "b"]);
    }

    #[test]
    fn missing_field_is_rejected() {
        let raw = r#"{"code":"x","explanation":"y"}"#;
        assert!(serde_json::from_str::<GeneratedOutput>(raw).is_err());
    }

    #[test]
    fn serializes_key_features_in_camel_case() {
        let out = GeneratedOutput {
            code: "c".into(),
            explanation: "e".into(),
            key_features: vec!["f".into()],
        };
        let json = serde_json::to_string(&out).unwrap();
        assert!(json.contains("\"keyFeatures\""));
        assert!(!json.contains("key_features"));
    }
}
