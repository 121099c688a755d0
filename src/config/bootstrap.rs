//! # Bootstrap document decoding.
//!
//! A bootstrap document carries connection parameters instead of customer
//! data. Line 1 starts with a fixed sentinel followed by a short-redirect
//! URL encoded as paired letter digits; line 2 carries credentials at fixed
//! offsets, padded with the `<` filler:
//!
//! ```text
//! line 1:  PZXXX GBGCGD...          sentinel + encoded URL suffix
//! line 2:  AAAAAAAAA....VV.............CCCCCCCCCCCCCC..
//!          └ 0..9 ┘    └13..15┘      └── 28..42 ──┘
//!          access key  version        client id
//! ```
//!
//! Each letter pair maps to one byte via `(a - 'A') * 16 + (b - 'A')`; a
//! malformed pair is skipped, never aborting the whole decode. Decoding is
//! pure and idempotent.

use crate::error::DecodeError;
use crate::scan::{ScanRecord, Verdict};

/// Sentinel prefix marking line 1 of a bootstrap document.
const SENTINEL: &str = "PZXXX";

/// Padding filler stripped from every extracted field.
const FILLER: char = '<';

/// Fixed field offsets within line 2.
const ACCESS_KEY_RANGE: std::ops::Range<usize> = 0..9;
const VERSION_RANGE: std::ops::Range<usize> = 13..15;
const CLIENT_ID_RANGE: std::ops::Range<usize> = 28..42;

/// Minimum line-2 length implied by the field layout.
const LINE2_MIN_LEN: usize = CLIENT_ID_RANGE.end;

/// Candidate connection parameters decoded from a bootstrap document.
///
/// The short URL still needs resolving to its long form before it can be
/// persisted as a [`ConnectionConfig`](crate::ConnectionConfig).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BootstrapData {
    /// Short-redirect URL reconstructed from line 1.
    pub short_url: String,
    /// 14-character client identifier (filler stripped).
    pub client_id: String,
    /// 9-character access key (filler stripped).
    pub access_key: String,
    /// 2-character protocol version tag; empty selects the V1 wire format.
    pub protocol_version: String,
}

/// Returns true when the record is a recognized bootstrap document:
/// verdict valid and line 1 carrying the sentinel prefix.
pub fn is_bootstrap(record: &ScanRecord) -> bool {
    record.verdict == Verdict::Valid && record.line1.starts_with(SENTINEL)
}

/// Decodes the fixed-offset fields of a bootstrap record.
///
/// Fails with [`DecodeError::NotBootstrap`] when the sentinel or verdict is
/// wrong, and [`DecodeError::Truncated`] when line 2 cannot carry the field
/// layout. Malformed letter pairs inside the URL segment are dropped.
pub fn decode_bootstrap(record: &ScanRecord) -> Result<BootstrapData, DecodeError> {
    if !is_bootstrap(record) {
        return Err(DecodeError::NotBootstrap);
    }

    let short_url = decode_short_url(&record.line1[SENTINEL.len()..]);
    Ok(BootstrapData {
        short_url,
        client_id: extract(&record.line2, CLIENT_ID_RANGE)?,
        access_key: extract(&record.line2, ACCESS_KEY_RANGE)?,
        protocol_version: extract(&record.line2, VERSION_RANGE)?,
    })
}

/// Cuts one fixed-offset field out of line 2 and strips the filler.
fn extract(line2: &str, range: std::ops::Range<usize>) -> Result<String, DecodeError> {
    let field = line2.get(range).ok_or(DecodeError::Truncated {
        len: line2.len(),
        need: LINE2_MIN_LEN,
    })?;
    Ok(field.chars().filter(|&c| c != FILLER).collect())
}

/// Rebuilds the short URL from the paired-letter encoding.
///
/// The filler is stripped before pairing. A pair decodes to the byte
/// `(a - 'A') * 16 + (b - 'A')`; pairs producing a value outside the
/// basic character range, and an unpaired trailing letter, are skipped.
fn decode_short_url(encoded: &str) -> String {
    let letters: Vec<char> = encoded.chars().filter(|&c| c != FILLER).collect();

    let mut suffix = String::new();
    for pair in letters.chunks(2) {
        let [a, b] = pair else { continue };
        let code = (*a as i32 - 'A' as i32) * 16 + (*b as i32 - 'A' as i32);
        if !(0..=0xFFFF).contains(&code) {
            continue;
        }
        if let Some(c) = char::from_u32(code as u32) {
            suffix.push(c);
        }
    }
    format!("https://goo.gl/{suffix}")
}
