//! Wire format of the verification backend
//!
//! The backend answers with loosely-typed JSON: every field may be missing,
//! and the scan endpoint adds camelCase keys (`rawText`, `licenseNumber`)
//! next to the snake_case record. These types accept whatever arrives;
//! interpretation happens one layer up.
//!
//! A field holding the wrong JSON type (`"status": 5`) is read as absent
//! rather than failing the whole verdict.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};

/// JSON body of `POST /verify`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyRequest {
    /// CM/L identifier, already trimmed
    pub license_number: String,
}

/// A verdict as sent by the backend
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerdictPayload {
    /// `valid`, `suspicious`, `not_found`, `not_detected`, or anything else
    #[serde(default, deserialize_with = "lenient")]
    pub status: Option<String>,
    /// Human-readable explanation
    #[serde(default, deserialize_with = "lenient")]
    pub message: Option<String>,
    /// Error description
    #[serde(default, deserialize_with = "lenient")]
    pub error: Option<String>,
    /// Fields parsed from the label (scan only)
    #[serde(default, deserialize_with = "lenient")]
    pub extracted: Option<ExtractedPayload>,
    /// Matched license record
    #[serde(default, deserialize_with = "lenient")]
    pub data: Option<RecordPayload>,
    /// Full recognized text (scan only)
    #[serde(default, rename = "rawText", deserialize_with = "lenient")]
    pub raw_text: Option<String>,
}

impl VerdictPayload {
    /// Error text of a non-success body: `error` first, then `message`
    #[must_use]
    pub fn error_text(&self) -> Option<&str> {
        self.error.as_deref().or(self.message.as_deref())
    }
}

/// Fields the OCR stage pulled out of the label
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedPayload {
    /// Detected CM/L number
    #[serde(default, deserialize_with = "lenient")]
    pub license_number: Option<String>,
    /// Detected IS standard code
    #[serde(default, deserialize_with = "lenient")]
    pub standard_code: Option<String>,
}

/// License record from the authoritative database
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordPayload {
    /// License holder
    #[serde(default, deserialize_with = "lenient")]
    pub company_name: Option<String>,
    /// Licensed product
    #[serde(default, deserialize_with = "lenient")]
    pub product_name: Option<String>,
    /// IS standard the license covers
    #[serde(default, deserialize_with = "lenient")]
    pub standard_code: Option<String>,
}

/// Any JSON value is accepted; one that does not fit `T` becomes `None`
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.and_then(|value| serde_json::from_value(value).ok()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_payload_keys() {
        let body = r#"{
            "status": "valid",
            "message": "License is active",
            "extracted": { "licenseNumber": "CM/L-7654321", "standardCode": "IS 1293" },
            "data": { "company_name": "Acme", "product_name": "Plug", "standard_code": "IS 1293" },
            "rawText": "ISI CM/L-7654321\nIS 1293"
        }"#;

        let payload: VerdictPayload = serde_json::from_str(body).unwrap();
        assert_eq!(payload.status.as_deref(), Some("valid"));
        assert_eq!(
            payload.extracted.unwrap().license_number.as_deref(),
            Some("CM/L-7654321")
        );
        assert_eq!(payload.data.unwrap().company_name.as_deref(), Some("Acme"));
        assert_eq!(payload.raw_text.as_deref(), Some("ISI CM/L-7654321\nIS 1293"));
    }

    #[test]
    fn test_empty_object_is_a_payload() {
        let payload: VerdictPayload = serde_json::from_str("{}").unwrap();
        assert_eq!(payload, VerdictPayload::default());
    }

    #[test]
    fn test_mistyped_fields_read_as_absent() {
        let body = r#"{
            "status": 5,
            "message": "License is active",
            "data": "Acme",
            "extracted": { "licenseNumber": ["CM/L-1"], "standardCode": "IS 1293" },
            "rawText": null
        }"#;

        let payload: VerdictPayload = serde_json::from_str(body).unwrap();
        assert_eq!(payload.status, None);
        assert_eq!(payload.message.as_deref(), Some("License is active"));
        assert_eq!(payload.data, None);
        let extracted = payload.extracted.unwrap();
        assert_eq!(extracted.license_number, None);
        assert_eq!(extracted.standard_code.as_deref(), Some("IS 1293"));
        assert_eq!(payload.raw_text, None);
    }

    #[test]
    fn test_verify_request_uses_camel_case() {
        let body = serde_json::to_string(&VerifyRequest {
            license_number: "CM/L-1234567".to_string(),
        })
        .unwrap();
        assert_eq!(body, r#"{"licenseNumber":"CM/L-1234567"}"#);
    }

    #[test]
    fn test_error_text_prefers_error_key() {
        let both: VerdictPayload = serde_json::from_str(r#"{"message":"m","error":"e"}"#).unwrap();
        assert_eq!(both.error_text(), Some("e"));

        let message_only: VerdictPayload = serde_json::from_str(r#"{"message":"m"}"#).unwrap();
        assert_eq!(message_only.error_text(), Some("m"));

        let numeric: VerdictPayload = serde_json::from_str(r#"{"error": 42}"#).unwrap();
        assert_eq!(numeric.error_text(), None);
    }
}
