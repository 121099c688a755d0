//! # Scanner driver boundary events.
//!
//! The driver raises three classes of events: a document was read (data),
//! the device changed state (connected, disconnected), or a read failed
//! (error). [`SourceEvent`] carries the classification plus the payload for
//! its class; the `is_*` predicates test class membership by equality.

use std::fmt;

use crate::scan::ScanRecord;

/// Classification of events raised by the scanner driver.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SourceEventKind {
    /// A document was read; the event carries a [`ScanRecord`].
    Data,
    /// The device changed state; the event carries a driver event code.
    Device,
    /// A read failed; the event carries an error code and message.
    Error,
}

/// One event from the scanner driver.
#[derive(Clone, Debug)]
pub struct SourceEvent {
    kind: SourceEventKind,
    record: Option<ScanRecord>,
    code: Option<i32>,
    message: Option<String>,
}

impl SourceEvent {
    /// Creates a data event carrying a scanned record.
    pub fn data(record: ScanRecord) -> Self {
        Self {
            kind: SourceEventKind::Data,
            record: Some(record),
            code: None,
            message: None,
        }
    }

    /// Creates a device state event with the driver's event code.
    pub fn device(code: i32) -> Self {
        Self {
            kind: SourceEventKind::Device,
            record: None,
            code: Some(code),
            message: None,
        }
    }

    /// Creates a read-error event; a missing message gets a placeholder.
    pub fn error(code: i32, message: Option<String>) -> Self {
        Self {
            kind: SourceEventKind::Error,
            record: None,
            code: Some(code),
            message: Some(message.unwrap_or_else(|| "no error message given".to_string())),
        }
    }

    /// Event classification.
    #[inline]
    pub fn kind(&self) -> SourceEventKind {
        self.kind
    }

    /// Returns true for data events.
    #[inline]
    pub fn is_data(&self) -> bool {
        self.kind == SourceEventKind::Data
    }

    /// Returns true for device state events.
    #[inline]
    pub fn is_device(&self) -> bool {
        self.kind == SourceEventKind::Device
    }

    /// Returns true for read-error events.
    #[inline]
    pub fn is_error(&self) -> bool {
        self.kind == SourceEventKind::Error
    }

    /// The scanned record of a data event.
    #[inline]
    pub fn record(&self) -> Option<&ScanRecord> {
        self.record.as_ref()
    }

    /// Consumes the event and returns the record of a data event.
    #[inline]
    pub fn into_record(self) -> Option<ScanRecord> {
        self.record
    }

    /// Driver event or error code, when present.
    #[inline]
    pub fn code(&self) -> Option<i32> {
        self.code
    }

    /// Error message of an error event.
    #[inline]
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }
}

impl fmt::Display for SourceEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            SourceEventKind::Data => write!(
                f,
                "SourceEvent DATA [{}]",
                self.record.as_ref().map(|r| r.to_string()).unwrap_or_default()
            ),
            SourceEventKind::Device => {
                write!(f, "SourceEvent DEVICE [code={}]", self.code.unwrap_or(0))
            }
            SourceEventKind::Error => write!(
                f,
                "SourceEvent ERROR [code={}] [{}]",
                self.code.unwrap_or(0),
                self.message.as_deref().unwrap_or("")
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scan::Verdict;

    #[test]
    fn test_predicates_match_their_own_kind() {
        let data = SourceEvent::data(ScanRecord::new("L1", "L2", Verdict::Valid));
        assert!(data.is_data());
        assert!(!data.is_device());
        assert!(!data.is_error());

        let device = SourceEvent::device(3);
        assert!(device.is_device());
        assert!(!device.is_data());
        assert!(!device.is_error());

        let error = SourceEvent::error(-7, Some("lamp failure".into()));
        assert!(error.is_error());
        assert!(!error.is_data());
        assert!(!error.is_device());
    }

    #[test]
    fn test_error_event_defaults_message() {
        let error = SourceEvent::error(-1, None);
        assert_eq!(error.message(), Some("no error message given"));
        assert_eq!(error.code(), Some(-1));
    }

    #[test]
    fn test_data_event_yields_record() {
        let record = ScanRecord::new("L1", "L2", Verdict::Unchecked).with_document_number("D1");
        let event = SourceEvent::data(record.clone());
        assert_eq!(event.record(), Some(&record));
        assert_eq!(event.into_record(), Some(record));
    }
}
