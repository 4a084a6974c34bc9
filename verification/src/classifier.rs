//! Result classification.
//!
//! [`classify`] maps a raw verdict onto what the user sees. Rules are checked
//! in order and the first match wins:
//!
//! | condition | severity | headline |
//! |---|---|---|
//! | error marker or `transport_error` | negative | Error |
//! | `not_found` | negative | Not Found |
//! | `not_detected` | warning | Not Detected |
//! | `valid` | positive | Valid License |
//! | `suspicious` | warning | Suspicious |
//! | anything else | neutral | none |

use crate::types::{ClassifiedResult, Evidence, Headline, Severity, VerdictStatus, VerificationVerdict};

/// Classify a verdict
///
/// Pure: the same verdict always yields the same result. Evidence is copied
/// verbatim whatever the severity.
#[must_use]
pub fn classify(verdict: &VerificationVerdict) -> ClassifiedResult {
    let (severity, headline) = if verdict.is_error() {
        (Severity::Negative, Some(Headline::Error))
    } else {
        match verdict.status {
            Some(VerdictStatus::NotFound) => (Severity::Negative, Some(Headline::NotFound)),
            Some(VerdictStatus::NotDetected) => (Severity::Warning, Some(Headline::NotDetected)),
            Some(VerdictStatus::Valid) => (Severity::Positive, Some(Headline::ValidLicense)),
            Some(VerdictStatus::Suspicious) => (Severity::Warning, Some(Headline::Suspicious)),
            // TransportError is covered by is_error()
            Some(VerdictStatus::TransportError) | None => (Severity::Neutral, None),
        }
    };

    ClassifiedResult {
        severity,
        headline,
        body: verdict.message.clone().or_else(|| verdict.error.clone()),
        evidence: Evidence {
            extracted: verdict.extracted.clone(),
            record: verdict.record.clone(),
            raw_text: verdict.raw_text.clone(),
        },
    }
}
