//! Register value codec
//!
//! Pure conversions between 16-bit register words and typed values. Word
//! order and byte order are big-endian on the wire; numeric registers carry a
//! fixed-point gain divisor; text registers pack two ASCII bytes per word,
//! high byte first, with zero bytes skipped on decode.

use crate::error::{Result, SigenError};
use serde::{Deserialize, Serialize};

/// Wire encodings used by the register catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataType {
    U16,
    U32,
    U64,
    S16,
    S32,
    Ascii,
}

impl DataType {
    /// Number of 16-bit words this encoding occupies, or `None` for text
    /// registers whose width comes from the catalog entry
    pub fn fixed_word_count(self) -> Option<u16> {
        match self {
            DataType::U16 | DataType::S16 => Some(1),
            DataType::U32 | DataType::S32 => Some(2),
            DataType::U64 => Some(4),
            DataType::Ascii => None,
        }
    }
}

/// A decoded register value
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RegisterValue {
    Number(f64),
    Text(String),
}

impl RegisterValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            RegisterValue::Number(v) => Some(*v),
            RegisterValue::Text(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            RegisterValue::Number(_) => None,
            RegisterValue::Text(s) => Some(s.as_str()),
        }
    }
}

impl std::fmt::Display for RegisterValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RegisterValue::Number(v) => write!(f, "{}", v),
            RegisterValue::Text(s) => write!(f, "{}", s),
        }
    }
}

/// Decode register words into a typed value.
///
/// An empty word slice decodes to a zero-equivalent (0 or the empty string)
/// so that "no data" never surfaces as an error here; callers distinguish it
/// from a real zero reading. A nonempty slice of the wrong width for the
/// encoding is a decode error.
pub fn decode_registers(words: &[u16], data_type: DataType, gain: f64) -> Result<RegisterValue> {
    if words.is_empty() {
        return Ok(match data_type {
            DataType::Ascii => RegisterValue::Text(String::new()),
            _ => RegisterValue::Number(0.0),
        });
    }

    let raw: i128 = match data_type {
        DataType::U16 => {
            expect_width(words, 1, "U16")?;
            i128::from(words[0])
        }
        DataType::S16 => {
            expect_width(words, 1, "S16")?;
            let val = i128::from(words[0]);
            if val >= 32_768 { val - 65_536 } else { val }
        }
        DataType::U32 => {
            expect_width(words, 2, "U32")?;
            (i128::from(words[0]) << 16) | i128::from(words[1])
        }
        DataType::S32 => {
            expect_width(words, 2, "S32")?;
            let val = (i128::from(words[0]) << 16) | i128::from(words[1]);
            if val >= 2_147_483_648 {
                val - 4_294_967_296
            } else {
                val
            }
        }
        DataType::U64 => {
            expect_width(words, 4, "U64")?;
            (i128::from(words[0]) << 48)
                | (i128::from(words[1]) << 32)
                | (i128::from(words[2]) << 16)
                | i128::from(words[3])
        }
        DataType::Ascii => return decode_ascii(words),
    };

    Ok(RegisterValue::Number(raw as f64 / gain))
}

/// Encode a typed value into register words.
///
/// Numeric values are multiplied by the gain and rounded before packing;
/// out-of-range and negative-for-unsigned values are caller errors. Text
/// values are packed two bytes per word, padded with zero words up to
/// `count`.
pub fn encode_value(
    value: &RegisterValue,
    data_type: DataType,
    gain: f64,
    count: u16,
) -> Result<Vec<u16>> {
    match (value, data_type) {
        (RegisterValue::Text(s), DataType::Ascii) => encode_ascii(s, count),
        (RegisterValue::Text(_), _) => Err(SigenError::encode(
            "text value given for a numeric register",
        )),
        (RegisterValue::Number(_), DataType::Ascii) => Err(SigenError::encode(
            "numeric value given for a text register",
        )),
        (RegisterValue::Number(v), _) => encode_number(*v, data_type, gain),
    }
}

fn decode_ascii(words: &[u16]) -> Result<RegisterValue> {
    let mut bytes = Vec::with_capacity(words.len() * 2);
    for word in words {
        let hi = (word >> 8) as u8;
        let lo = (word & 0xFF) as u8;
        if hi != 0 {
            bytes.push(hi);
        }
        if lo != 0 {
            bytes.push(lo);
        }
    }
    let text = String::from_utf8(bytes)
        .map_err(|e| SigenError::decode(format!("register text is not valid UTF-8: {}", e)))?;
    Ok(RegisterValue::Text(text))
}

fn encode_ascii(text: &str, count: u16) -> Result<Vec<u16>> {
    let bytes = text.as_bytes();
    let capacity = usize::from(count) * 2;
    if bytes.len() > capacity {
        return Err(SigenError::encode(format!(
            "text of {} bytes exceeds register capacity of {} bytes",
            bytes.len(),
            capacity
        )));
    }

    let mut words = vec![0u16; usize::from(count)];
    for (i, chunk) in bytes.chunks(2).enumerate() {
        let hi = u16::from(chunk[0]) << 8;
        let lo = chunk.get(1).copied().map(u16::from).unwrap_or(0);
        words[i] = hi | lo;
    }
    Ok(words)
}

fn encode_number(value: f64, data_type: DataType, gain: f64) -> Result<Vec<u16>> {
    let scaled = (value * gain).round();
    if !scaled.is_finite() {
        return Err(SigenError::encode("value is not finite"));
    }
    let raw = scaled as i128;

    match data_type {
        DataType::U16 => {
            check_range(raw, 0, 0xFFFF, "U16")?;
            Ok(vec![raw as u16])
        }
        DataType::S16 => {
            check_range(raw, -32_768, 32_767, "S16")?;
            let bits = if raw < 0 { raw + 65_536 } else { raw };
            Ok(vec![bits as u16])
        }
        DataType::U32 => {
            check_range(raw, 0, 0xFFFF_FFFF, "U32")?;
            let bits = raw as u64;
            Ok(vec![(bits >> 16) as u16, (bits & 0xFFFF) as u16])
        }
        DataType::S32 => {
            check_range(raw, -2_147_483_648, 2_147_483_647, "S32")?;
            let bits = (if raw < 0 { raw + 4_294_967_296 } else { raw }) as u64;
            Ok(vec![(bits >> 16) as u16, (bits & 0xFFFF) as u16])
        }
        DataType::U64 => {
            check_range(raw, 0, i128::from(u64::MAX), "U64")?;
            let bits = raw as u64;
            Ok(vec![
                (bits >> 48) as u16,
                ((bits >> 32) & 0xFFFF) as u16,
                ((bits >> 16) & 0xFFFF) as u16,
                (bits & 0xFFFF) as u16,
            ])
        }
        DataType::Ascii => Err(SigenError::encode(
            "numeric value given for a text register",
        )),
    }
}

fn expect_width(words: &[u16], expected: usize, label: &str) -> Result<()> {
    if words.len() != expected {
        return Err(SigenError::decode(format!(
            "{} register expects {} words, got {}",
            label,
            expected,
            words.len()
        )));
    }
    Ok(())
}

fn check_range(raw: i128, min: i128, max: i128, label: &str) -> Result<()> {
    if raw < min || raw > max {
        return Err(SigenError::encode(format!(
            "scaled value {} out of range for {} ({}..={})",
            raw, label, min, max
        )));
    }
    Ok(())
}
