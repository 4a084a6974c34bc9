//! Plain-text rendering of a classified result.

use crate::types::{ClassifiedResult, Evidence};
use std::fmt;

const MISSING: &str = "N/A";

/// Text card for a [`ClassifiedResult`]
///
/// ```text
/// ✔ Valid License
/// License is active
///
/// Company: Acme
/// Product: Widget
/// Standard: IS 123
/// ```
///
/// OCR text stays collapsed behind "Show OCR Text" unless
/// [`show_raw_text`](Self::show_raw_text) is set.
#[derive(Debug, Clone, Copy)]
pub struct ResultCard<'a> {
    result: &'a ClassifiedResult,
    show_raw_text: bool,
}

impl<'a> ResultCard<'a> {
    /// Card with OCR text collapsed
    #[must_use]
    pub const fn new(result: &'a ClassifiedResult) -> Self {
        Self {
            result,
            show_raw_text: false,
        }
    }

    /// Expand or collapse the OCR text
    #[must_use]
    pub const fn show_raw_text(mut self, show: bool) -> Self {
        self.show_raw_text = show;
        self
    }

    fn write_evidence(&self, f: &mut fmt::Formatter<'_>, evidence: &Evidence) -> fmt::Result {
        if let Some(extracted) = &evidence.extracted {
            writeln!(f)?;
            writeln!(f, "Detected CM/L: {}", or_missing(extracted.license_number.as_deref()))?;
            writeln!(f, "Standard: {}", or_missing(extracted.standard_code.as_deref()))?;
        }

        if let Some(record) = &evidence.record {
            writeln!(f)?;
            writeln!(f, "Company: {}", or_missing(record.company_name.as_deref()))?;
            writeln!(f, "Product: {}", or_missing(record.product_name.as_deref()))?;
            writeln!(f, "Standard: {}", or_missing(record.standard_code.as_deref()))?;
        }

        match evidence.raw_text.as_deref() {
            Some(text) if !text.is_empty() => {
                writeln!(f)?;
                if self.show_raw_text {
                    writeln!(f, "▾ Show OCR Text")?;
                    for line in text.lines() {
                        writeln!(f, "  {line}")?;
                    }
                } else {
                    writeln!(f, "▸ Show OCR Text")?;
                }
            },
            _ => {},
        }

        Ok(())
    }
}

fn or_missing(value: Option<&str>) -> &str {
    value.filter(|v| !v.is_empty()).unwrap_or(MISSING)
}

impl fmt::Display for ResultCard<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(headline) = self.result.headline {
            writeln!(f, "{headline}")?;
        }
        if let Some(body) = &self.result.body {
            writeln!(f, "{body}")?;
        }
        self.write_evidence(f, &self.result.evidence)
    }
}
