//! # Scan records.
//!
//! [`ScanRecord`] is the immutable value produced per physical scan: the two
//! raw code lines, the fields the codec extracted from them, and the
//! check-digit [`Verdict`]. The record serializes as camelCase JSON — the
//! same shape the cloud endpoint receives as `codeLineData`.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Tri-state validity verdict computed by the document codec.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    /// All check digits validated.
    Valid,
    /// At least one check digit failed.
    Invalid,
    /// The codec did not run validation for this document type.
    Unchecked,
}

/// Immutable value produced per physical scan.
///
/// Built once with [`ScanRecord::new`] plus the `with_*` builders, then
/// passed by value through the store and the fan-out; never mutated.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanRecord {
    /// Raw first code line.
    pub line1: String,
    /// Raw second code line.
    pub line2: String,
    /// Holder surname, as extracted by the codec.
    #[serde(default)]
    pub surname: String,
    /// Document number, as extracted by the codec.
    #[serde(default)]
    pub document_number: String,
    /// Date of birth (codec formatting, opaque here).
    #[serde(default)]
    pub date_of_birth: String,
    /// Expiry date (codec formatting, opaque here).
    #[serde(default)]
    pub expiry_date: String,
    /// Check-digit verdict for the whole code line.
    pub verdict: Verdict,
}

impl ScanRecord {
    /// Creates a record from the raw code lines and the codec verdict.
    pub fn new(line1: impl Into<String>, line2: impl Into<String>, verdict: Verdict) -> Self {
        Self {
            line1: line1.into(),
            line2: line2.into(),
            surname: String::new(),
            document_number: String::new(),
            date_of_birth: String::new(),
            expiry_date: String::new(),
            verdict,
        }
    }

    /// Attaches the extracted surname.
    #[inline]
    pub fn with_surname(mut self, surname: impl Into<String>) -> Self {
        self.surname = surname.into();
        self
    }

    /// Attaches the extracted document number.
    #[inline]
    pub fn with_document_number(mut self, number: impl Into<String>) -> Self {
        self.document_number = number.into();
        self
    }

    /// Attaches the extracted dates.
    #[inline]
    pub fn with_dates(
        mut self,
        date_of_birth: impl Into<String>,
        expiry_date: impl Into<String>,
    ) -> Self {
        self.date_of_birth = date_of_birth.into();
        self.expiry_date = expiry_date.into();
        self
    }

    /// Returns true when the verdict is [`Verdict::Invalid`].
    #[inline]
    pub fn is_invalid(&self) -> bool {
        self.verdict == Verdict::Invalid
    }

    /// Text relayed to remote observers alongside the verdict.
    #[inline]
    pub fn contents(&self) -> &str {
        &self.surname
    }
}

impl fmt::Display for ScanRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ScanRecord [document={}] [verdict={:?}]",
            self.document_number, self.verdict
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builders_fill_parsed_fields() {
        let record = ScanRecord::new("P<UTOERIKSSON<<ANNA<", "L898902C36UTO", Verdict::Valid)
            .with_surname("ERIKSSON")
            .with_document_number("L898902C3")
            .with_dates("740812", "120415");

        assert_eq!(record.surname, "ERIKSSON");
        assert_eq!(record.document_number, "L898902C3");
        assert_eq!(record.date_of_birth, "740812");
        assert_eq!(record.expiry_date, "120415");
        assert!(!record.is_invalid());
        assert_eq!(record.contents(), "ERIKSSON");
    }

    #[test]
    fn test_serializes_camel_case() {
        let record = ScanRecord::new("L1", "L2", Verdict::Unchecked).with_document_number("D123");
        let value = serde_json::to_value(&record).expect("serialize");

        assert_eq!(value["line1"], "L1");
        assert_eq!(value["documentNumber"], "D123");
        assert_eq!(value["verdict"], "unchecked");
    }
}
