//! Candidate Encodings Module
//! Ordered decode attempts for CSV sources of unknown character encoding.

use encoding_rs::{Encoding, EUC_KR, UTF_8};
use serde::Serialize;
use std::borrow::Cow;
use std::fmt;
use thiserror::Error;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Character encodings tried in order when reading a source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum CandidateEncoding {
    /// UTF-8 with an optional byte-order mark.
    Utf8Sig,
    /// Windows code page 949 (unified Hangul code).
    Cp949,
    /// Plain UTF-8; a byte-order mark is kept as text.
    Utf8,
    /// EUC-KR restricted to the KS X 1001 byte range.
    EucKr,
}

/// Fixed attempt order.
pub const CANDIDATE_ENCODINGS: [CandidateEncoding; 4] = [
    CandidateEncoding::Utf8Sig,
    CandidateEncoding::Cp949,
    CandidateEncoding::Utf8,
    CandidateEncoding::EucKr,
];

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeFailure {
    #[error("malformed byte sequence")]
    Malformed,
    #[error("byte 0x{byte:02X} at offset {offset} is outside KS X 1001")]
    OutsideKsX1001 { byte: u8, offset: usize },
}

impl CandidateEncoding {
    /// Conventional label, as used by most CSV tooling.
    pub fn label(self) -> &'static str {
        match self {
            CandidateEncoding::Utf8Sig => "utf-8-sig",
            CandidateEncoding::Cp949 => "cp949",
            CandidateEncoding::Utf8 => "utf-8",
            CandidateEncoding::EucKr => "euc-kr",
        }
    }

    fn encoding(self) -> &'static Encoding {
        match self {
            CandidateEncoding::Utf8Sig | CandidateEncoding::Utf8 => UTF_8,
            // WHATWG euc-kr is the windows-949 superset
            CandidateEncoding::Cp949 | CandidateEncoding::EucKr => EUC_KR,
        }
    }

    /// Strictly decode `bytes`. Malformed input fails the attempt instead of
    /// being replaced with U+FFFD.
    pub fn decode(self, bytes: &[u8]) -> Result<Cow<'_, str>, DecodeFailure> {
        let bytes = match self {
            CandidateEncoding::Utf8Sig => bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes),
            CandidateEncoding::EucKr => {
                check_ks_x_1001(bytes)?;
                bytes
            }
            CandidateEncoding::Cp949 | CandidateEncoding::Utf8 => bytes,
        };

        self.encoding()
            .decode_without_bom_handling_and_without_replacement(bytes)
            .ok_or(DecodeFailure::Malformed)
    }
}

impl fmt::Display for CandidateEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Non-ASCII bytes must come in pairs from the 0xA1..=0xFE range.
fn check_ks_x_1001(bytes: &[u8]) -> Result<(), DecodeFailure> {
    let in_range = |b: u8| (0xA1..=0xFE).contains(&b);
    let mut i = 0;
    while i < bytes.len() {
        let lead = bytes[i];
        if lead < 0x80 {
            i += 1;
            continue;
        }
        if !in_range(lead) {
            return Err(DecodeFailure::OutsideKsX1001 {
                byte: lead,
                offset: i,
            });
        }
        match bytes.get(i + 1) {
            Some(&trail) if in_range(trail) => i += 2,
            Some(&trail) => {
                return Err(DecodeFailure::OutsideKsX1001 {
                    byte: trail,
                    offset: i + 1,
                })
            }
            None => return Err(DecodeFailure::Malformed),
        }
    }
    Ok(())
}
