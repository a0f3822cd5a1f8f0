//! Text encodings used by Yuka script data sectors and archive name tables.
//!
//! Retail data is Shift-JIS almost everywhere; fan translations ship GBK or UTF-8.

use encoding_rs::{Encoding as RsEncoding, GB18030, SHIFT_JIS, UTF_8};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::str::FromStr;

pub trait TextDecoder {
    fn decode<'a>(&self, bytes: &'a [u8]) -> Cow<'a, str>;

    /// Decode C-style string: stop at the first NUL (0x00).
    fn decode_cstr<'a>(&self, bytes: &'a [u8]) -> Cow<'a, str> {
        let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
        self.decode(&bytes[..end])
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Encoding {
    Utf8,
    #[default]
    #[serde(alias = "sjis")]
    ShiftJis,
    /// Treat GBK as GB18030 (superset).
    Gbk,
    Gb18030,
}

impl Encoding {
    #[inline]
    pub fn as_encoding_rs(self) -> &'static RsEncoding {
        match self {
            Encoding::Utf8 => UTF_8,
            Encoding::ShiftJis => SHIFT_JIS,
            Encoding::Gbk => GB18030,
            Encoding::Gb18030 => GB18030,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum NlsError {
    #[error("unknown encoding: {0}")]
    UnknownEncoding(String),

    #[error("text is not representable in {encoding:?}: {text:?}")]
    Unrepresentable { encoding: Encoding, text: String },
}

impl FromStr for Encoding {
    type Err = NlsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "utf8" | "utf-8" => Ok(Encoding::Utf8),
            "sjis" | "shiftjis" | "shift_jis" | "shift-jis" => Ok(Encoding::ShiftJis),
            "gbk" => Ok(Encoding::Gbk),
            "gb18030" => Ok(Encoding::Gb18030),
            other => Err(NlsError::UnknownEncoding(other.to_string())),
        }
    }
}

/// A simple decoder bound to one encoding.
#[derive(Debug, Clone, Copy)]
pub struct Decoder {
    enc: Encoding,
}

impl Decoder {
    #[inline]
    pub fn new(enc: Encoding) -> Self {
        Self { enc }
    }

    #[inline]
    pub fn encoding(&self) -> Encoding {
        self.enc
    }

    /// Encodes `s`, failing instead of substituting unrepresentable characters.
    pub fn encode_strict<'a>(&self, s: &'a str) -> Result<Cow<'a, [u8]>, NlsError> {
        let enc = self.enc.as_encoding_rs();
        let (cow, _, had_errors) = enc.encode(s);
        if had_errors {
            return Err(NlsError::Unrepresentable {
                encoding: self.enc,
                text: s.to_string(),
            });
        }
        Ok(cow)
    }

    /// Encodes `s` followed by a NUL terminator.
    pub fn encode_cstr(&self, s: &str) -> Result<Vec<u8>, NlsError> {
        let mut out = self.encode_strict(s)?.into_owned();
        out.push(0);
        Ok(out)
    }
}

impl TextDecoder for Decoder {
    fn decode<'a>(&self, bytes: &'a [u8]) -> Cow<'a, str> {
        match self.enc {
            Encoding::Utf8 => match std::str::from_utf8(bytes) {
                Ok(s) => Cow::Borrowed(s),
                Err(_) => Cow::Owned(String::from_utf8_lossy(bytes).into_owned()),
            },
            Encoding::ShiftJis | Encoding::Gbk | Encoding::Gb18030 => {
                let enc = self.enc.as_encoding_rs();
                let (cow, _, _had_errors) = enc.decode(bytes);
                cow
            }
        }
    }
}

impl Default for Decoder {
    fn default() -> Self {
        Self::new(Encoding::ShiftJis)
    }
}
