//! Byte-stream text decoding.
//!
//! The manual decoder only runs when the platform has no native decoder
//! (see [`Capabilities::native_text_decoder`]). Its UTF-8 path is lenient:
//! malformed input degrades into best-effort output and never fails.
//! [`TextDecoder::decode_strict`] is the opt-in variant that reports the first
//! malformed sequence instead, and also accepts 4-byte sequences.

use serde::{Deserialize, Serialize};

use super::capabilities::Capabilities;
use super::error::DecodeError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EncodingName {
    Utf8,
    Ascii,
}

impl EncodingName {
    /// Parses an encoding label. Anything outside the closed set is `None`.
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "utf-8" | "utf8" => Some(EncodingName::Utf8),
            "ascii" | "us-ascii" => Some(EncodingName::Ascii),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            EncodingName::Utf8 => "utf-8",
            EncodingName::Ascii => "ascii",
        }
    }
}

#[derive(Debug, Clone)]
pub struct TextDecoder {
    label: String,
    encoding: Option<EncodingName>,
    native: bool,
}

impl TextDecoder {
    pub fn new(label: &str, capabilities: &Capabilities) -> Self {
        Self {
            label: label.to_string(),
            encoding: EncodingName::from_label(label),
            native: capabilities.native_text_decoder,
        }
    }

    pub fn encoding(&self) -> Option<EncodingName> {
        self.encoding
    }

    /// Lenient decode. Unknown encodings yield an empty string.
    ///
    /// Only UTF-8 delegates to the native decoder; ASCII always takes the
    /// byte-to-Latin-1 path, with or without the native capability.
    pub fn decode(&self, bytes: &[u8]) -> String {
        match (self.encoding, self.native) {
            (Some(EncodingName::Utf8), true) => String::from_utf8_lossy(bytes).into_owned(),
            (Some(encoding), _) => decode(bytes, encoding),
            (None, _) => String::new(),
        }
    }

    pub fn decode_strict(&self, bytes: &[u8]) -> Result<String, DecodeError> {
        match self.encoding {
            Some(EncodingName::Utf8) => decode_utf8_strict(bytes),
            Some(EncodingName::Ascii) => Ok(decode_ascii(bytes)),
            None => Err(DecodeError::UnknownEncoding(self.label.clone())),
        }
    }
}

/// Manual decode, bypassing any native decoder.
pub fn decode(bytes: &[u8], encoding: EncodingName) -> String {
    match encoding {
        EncodingName::Utf8 => decode_utf8_lenient(bytes),
        EncodingName::Ascii => decode_ascii(bytes),
    }
}

/// Label-driven manual decode. Unknown labels decode to an empty string.
pub fn decode_label(bytes: &[u8], label: &str) -> String {
    EncodingName::from_label(label)
        .map(|encoding| decode(bytes, encoding))
        .unwrap_or_default()
}

// 128..=255 land in the Latin-1 supplement, one char per byte.
fn decode_ascii(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| char::from(b)).collect()
}

fn decode_utf8_lenient(bytes: &[u8]) -> String {
    // Bytes past the end read as zero, like an out-of-range array read.
    let at = |i: usize| u32::from(bytes.get(i).copied().unwrap_or(0));

    let mut out = String::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        let c = u32::from(bytes[i]);
        i += 1;
        let code_point = match c >> 4 {
            0..=7 => c,
            12 | 13 => {
                let c2 = at(i);
                i += 1;
                ((c & 0x1F) << 6) | (c2 & 0x3F)
            }
            14 => {
                let c2 = at(i);
                let c3 = at(i + 1);
                i += 2;
                ((c & 0x0F) << 12) | ((c2 & 0x3F) << 6) | (c3 & 0x3F)
            }
            // Stray continuation bytes and 4-byte leads are dropped.
            _ => continue,
        };
        // Three-byte forms can land on a surrogate, which has no char.
        out.push(char::from_u32(code_point).unwrap_or(char::REPLACEMENT_CHARACTER));
    }
    out
}

fn decode_utf8_strict(bytes: &[u8]) -> Result<String, DecodeError> {
    let mut out = String::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        let lead = bytes[i];
        let (width, initial, minimum) = match lead >> 4 {
            0..=7 => {
                out.push(char::from(lead));
                i += 1;
                continue;
            }
            12 | 13 => (2, lead & 0x1F, 0x80),
            14 => (3, lead & 0x0F, 0x800),
            15 if lead < 0xF8 => (4, lead & 0x07, 0x1_0000),
            _ => return Err(DecodeError::InvalidLead { byte: lead, offset: i }),
        };

        if i + width > bytes.len() {
            return Err(DecodeError::Truncated { offset: i });
        }

        let mut code_point = u32::from(initial);
        for offset in i + 1..i + width {
            let b = bytes[offset];
            if b & 0xC0 != 0x80 {
                return Err(DecodeError::InvalidContinuation { byte: b, offset });
            }
            code_point = (code_point << 6) | u32::from(b & 0x3F);
        }

        if code_point < minimum {
            return Err(DecodeError::InvalidCodePoint { offset: i });
        }
        let ch = char::from_u32(code_point).ok_or(DecodeError::InvalidCodePoint { offset: i })?;
        out.push(ch);
        i += width;
    }
    Ok(out)
}
