//! Lookup service backed by the verification backend.

use crate::lifecycle::environment::LookupService;
use crate::types::{ExtractedFields, LicenseRecord, ScanQuery, VerdictStatus, VerificationVerdict};
use isi_verify_client::{BackendClient, ExtractedPayload, LookupError, RecordPayload, VerdictPayload};
use std::future::Future;

/// [`LookupService`] over HTTP
#[derive(Debug, Clone)]
pub struct HttpLookupService {
    client: BackendClient,
}

impl HttpLookupService {
    /// Wrap a backend client
    #[must_use]
    pub const fn new(client: BackendClient) -> Self {
        Self { client }
    }
}

impl LookupService for HttpLookupService {
    fn lookup_by_identifier(
        &self,
        license_number: String,
    ) -> impl Future<Output = Result<VerificationVerdict, LookupError>> + Send {
        async move {
            self.client
                .verify(&license_number)
                .await
                .map(VerificationVerdict::from)
        }
    }

    fn lookup_by_image(
        &self,
        image: ScanQuery,
    ) -> impl Future<Output = Result<VerificationVerdict, LookupError>> + Send {
        async move {
            self.client
                .scan(image.image, &image.mime_type, &image.file_name)
                .await
                .map(VerificationVerdict::from)
        }
    }
}

impl From<VerdictPayload> for VerificationVerdict {
    fn from(payload: VerdictPayload) -> Self {
        let status = payload.status.as_deref().and_then(|raw| {
            let status = VerdictStatus::from_wire(raw);
            if status.is_none() {
                tracing::debug!(status = raw, "Unrecognized verdict status");
            }
            status
        });

        Self {
            status,
            message: payload.message,
            error: payload.error,
            extracted: payload.extracted.map(ExtractedFields::from),
            record: payload.data.map(LicenseRecord::from),
            raw_text: payload.raw_text,
        }
    }
}

impl From<ExtractedPayload> for ExtractedFields {
    fn from(payload: ExtractedPayload) -> Self {
        Self {
            license_number: payload.license_number,
            standard_code: payload.standard_code,
        }
    }
}

impl From<RecordPayload> for LicenseRecord {
    fn from(payload: RecordPayload) -> Self {
        Self {
            company_name: payload.company_name,
            product_name: payload.product_name,
            standard_code: payload.standard_code,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_conversion() {
        let payload = VerdictPayload {
            status: Some("suspicious".to_string()),
            message: Some("Standard mismatch".to_string()),
            extracted: Some(ExtractedPayload {
                license_number: Some("CM/L-7654321".to_string()),
                standard_code: Some("IS 1293".to_string()),
            }),
            raw_text: Some("ISI CM/L-7654321".to_string()),
            ..VerdictPayload::default()
        };

        let verdict = VerificationVerdict::from(payload);

        assert_eq!(verdict.status, Some(VerdictStatus::Suspicious));
        assert_eq!(
            verdict.extracted.and_then(|e| e.standard_code).as_deref(),
            Some("IS 1293")
        );
        assert_eq!(verdict.raw_text.as_deref(), Some("ISI CM/L-7654321"));
        assert!(verdict.record.is_none());
    }

    #[test]
    fn test_unknown_status_becomes_none() {
        let verdict = VerificationVerdict::from(VerdictPayload {
            status: Some("pending_review".to_string()),
            ..VerdictPayload::default()
        });
        assert_eq!(verdict.status, None);
        assert!(!verdict.is_error());
    }

    #[test]
    fn test_error_body_sets_marker() {
        let verdict = VerificationVerdict::from(VerdictPayload {
            error: Some("License database offline".to_string()),
            ..VerdictPayload::default()
        });
        assert!(verdict.is_error());
    }
}
