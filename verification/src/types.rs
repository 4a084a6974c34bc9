//! Domain types shared by both lookup pipelines.

use crate::error::ValidationError;
use std::fmt;

// ============================================================================
// Pipelines and queries
// ============================================================================

/// Which way a lookup entered the system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pipeline {
    /// User typed a CM/L identifier
    Manual,
    /// User uploaded a label photograph
    Scan,
}

impl Pipeline {
    /// Label used in logs and metrics
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Manual => "manual",
            Self::Scan => "scan",
        }
    }

    /// Progress text shown while a lookup is in flight
    #[must_use]
    pub const fn progress_label(self) -> &'static str {
        match self {
            Self::Manual => "Checking...",
            Self::Scan => "Scanning...",
        }
    }

    /// Error description used when the backend could not be reached
    #[must_use]
    pub const fn unreachable_message(self) -> &'static str {
        match self {
            Self::Manual => "Backend not reachable",
            Self::Scan => "Failed to reach backend",
        }
    }
}

impl fmt::Display for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A typed CM/L identifier, as entered
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManualQuery {
    license_text: String,
}

impl ManualQuery {
    /// Wrap user input; surrounding whitespace is kept until submission
    #[must_use]
    pub fn new(license_text: impl Into<String>) -> Self {
        Self {
            license_text: license_text.into(),
        }
    }

    /// The identifier as sent to the backend
    #[must_use]
    pub fn license_number(&self) -> &str {
        self.license_text.trim()
    }
}

/// An uploaded label image
#[derive(Clone, PartialEq, Eq)]
pub struct ScanQuery {
    /// Raw file contents
    pub image: Vec<u8>,
    /// MIME type, e.g. `image/jpeg`
    pub mime_type: String,
    /// Original file name, kept on the multipart attachment
    pub file_name: String,
}

impl ScanQuery {
    /// Create a scan query
    #[must_use]
    pub fn new(image: Vec<u8>, mime_type: impl Into<String>, file_name: impl Into<String>) -> Self {
        Self {
            image,
            mime_type: mime_type.into(),
            file_name: file_name.into(),
        }
    }
}

impl fmt::Debug for ScanQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScanQuery")
            .field("bytes", &self.image.len())
            .field("mime_type", &self.mime_type)
            .field("file_name", &self.file_name)
            .finish()
    }
}

/// User input for one lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerificationQuery {
    /// Identifier lookup
    Manual(ManualQuery),
    /// Image lookup
    Scan(ScanQuery),
}

impl VerificationQuery {
    /// Identifier lookup from raw user input
    #[must_use]
    pub fn manual(license_text: impl Into<String>) -> Self {
        Self::Manual(ManualQuery::new(license_text))
    }

    /// Image lookup
    #[must_use]
    pub fn scan(image: Vec<u8>, mime_type: impl Into<String>, file_name: impl Into<String>) -> Self {
        Self::Scan(ScanQuery::new(image, mime_type, file_name))
    }

    /// Pipeline this query belongs to
    #[must_use]
    pub const fn pipeline(&self) -> Pipeline {
        match self {
            Self::Manual(_) => Pipeline::Manual,
            Self::Scan(_) => Pipeline::Scan,
        }
    }

    /// Check the query before anything is dispatched
    ///
    /// # Errors
    ///
    /// - [`ValidationError::EmptyLicenseNumber`] if the identifier is blank
    /// - [`ValidationError::MissingImage`] if no image bytes were supplied
    /// - [`ValidationError::UnsupportedMediaType`] if the file is not an image
    pub fn validate(&self) -> Result<(), ValidationError> {
        match self {
            Self::Manual(query) if query.license_number().is_empty() => {
                Err(ValidationError::EmptyLicenseNumber)
            },
            Self::Manual(_) => Ok(()),
            Self::Scan(query) if query.image.is_empty() => Err(ValidationError::MissingImage),
            Self::Scan(query) if !query.mime_type.starts_with("image/") => {
                Err(ValidationError::UnsupportedMediaType(query.mime_type.clone()))
            },
            Self::Scan(_) => Ok(()),
        }
    }
}

// ============================================================================
// Verdicts
// ============================================================================

/// Outcome reported by a lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VerdictStatus {
    /// License exists and matches
    Valid,
    /// License exists but something looks off
    Suspicious,
    /// No such license
    NotFound,
    /// The label contained no recognizable license
    NotDetected,
    /// The lookup itself failed; produced locally, never by the backend
    TransportError,
}

impl VerdictStatus {
    /// Parse a status string sent by the backend
    ///
    /// Unknown strings, and `transport_error` itself, yield `None`.
    #[must_use]
    pub fn from_wire(status: &str) -> Option<Self> {
        match status {
            "valid" => Some(Self::Valid),
            "suspicious" => Some(Self::Suspicious),
            "not_found" => Some(Self::NotFound),
            "not_detected" => Some(Self::NotDetected),
            _ => None,
        }
    }

    /// Snake-case name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Valid => "valid",
            Self::Suspicious => "suspicious",
            Self::NotFound => "not_found",
            Self::NotDetected => "not_detected",
            Self::TransportError => "transport_error",
        }
    }
}

/// Fields the OCR stage extracted from a label
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedFields {
    /// Detected CM/L number
    pub license_number: Option<String>,
    /// Detected IS standard code
    pub standard_code: Option<String>,
}

/// Matched record from the license database
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LicenseRecord {
    /// License holder
    pub company_name: Option<String>,
    /// Licensed product
    pub product_name: Option<String>,
    /// IS standard the license covers
    pub standard_code: Option<String>,
}

/// Raw answer of a lookup service
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VerificationVerdict {
    /// `None` when the backend sent no status or one we do not know
    pub status: Option<VerdictStatus>,
    /// Human-readable explanation
    pub message: Option<String>,
    /// Error description; its presence marks the verdict as an error
    pub error: Option<String>,
    /// Scan only
    pub extracted: Option<ExtractedFields>,
    /// Matched license record
    pub record: Option<LicenseRecord>,
    /// Scan only
    pub raw_text: Option<String>,
}

impl VerificationVerdict {
    /// Verdict with only a status and message
    #[must_use]
    pub fn with_status(status: VerdictStatus, message: impl Into<String>) -> Self {
        Self {
            status: Some(status),
            message: Some(message.into()),
            ..Self::default()
        }
    }

    /// Synthetic verdict for a lookup that failed in transport
    #[must_use]
    pub fn transport_error(description: impl Into<String>) -> Self {
        Self {
            status: Some(VerdictStatus::TransportError),
            error: Some(description.into()),
            ..Self::default()
        }
    }

    /// Attach a matched record
    #[must_use]
    pub fn with_record(mut self, record: LicenseRecord) -> Self {
        self.record = Some(record);
        self
    }

    /// Attach OCR output
    #[must_use]
    pub fn with_extracted(mut self, extracted: ExtractedFields, raw_text: impl Into<String>) -> Self {
        self.extracted = Some(extracted);
        self.raw_text = Some(raw_text.into());
        self
    }

    /// Whether the verdict carries the error marker
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.error.is_some() || self.status == Some(VerdictStatus::TransportError)
    }
}

// ============================================================================
// Classified results
// ============================================================================

/// Coarse display category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    /// Confirmed valid
    Positive,
    /// Needs a closer look
    Warning,
    /// Failed or not found
    Negative,
    /// Nothing to judge
    Neutral,
}

impl Severity {
    /// Lowercase name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Positive => "positive",
            Self::Warning => "warning",
            Self::Negative => "negative",
            Self::Neutral => "neutral",
        }
    }
}

/// Fixed headline of a classified result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Headline {
    /// Lookup failed
    Error,
    /// No such license
    NotFound,
    /// No license on the label
    NotDetected,
    /// License confirmed
    ValidLicense,
    /// License looks off
    Suspicious,
}

impl Headline {
    /// Headline text
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Error => "Error",
            Self::NotFound => "Not Found",
            Self::NotDetected => "Not Detected",
            Self::ValidLicense => "Valid License",
            Self::Suspicious => "Suspicious",
        }
    }

    /// Symbol shown before the headline, if any
    #[must_use]
    pub const fn glyph(self) -> Option<char> {
        match self {
            Self::Error => None,
            Self::NotFound => Some('✖'),
            Self::NotDetected | Self::Suspicious => Some('⚠'),
            Self::ValidLicense => Some('✔'),
        }
    }
}

impl fmt::Display for Headline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.glyph() {
            Some(glyph) => write!(f, "{glyph} {}", self.as_str()),
            None => f.write_str(self.as_str()),
        }
    }
}

/// Evidence carried through classification unchanged
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Evidence {
    /// Fields parsed from the label
    pub extracted: Option<ExtractedFields>,
    /// Matched license record
    pub record: Option<LicenseRecord>,
    /// Full OCR text, disclosed on demand
    pub raw_text: Option<String>,
}

impl Evidence {
    /// True when there is nothing to show
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.extracted.is_none() && self.record.is_none() && self.raw_text.is_none()
    }
}

/// A verdict reduced to what the user sees
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedResult {
    /// Display category
    pub severity: Severity,
    /// `None` for neutral results, which show only the body
    pub headline: Option<Headline>,
    /// Message, or the error description when there is no message
    pub body: Option<String>,
    /// Verbatim evidence
    pub evidence: Evidence,
}
