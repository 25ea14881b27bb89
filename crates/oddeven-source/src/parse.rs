//! Input formats.
//!
//! `Decimal` is the default: signed integers separated by whitespace and/or
//! commas. `Bytes` treats every raw byte as one value in `0..=255`, which is
//! how the original `numbers` files were produced.

use bytes::{BufMut, Bytes, BytesMut};
use std::fmt;
use std::str::FromStr;

use oddeven_core::Value;

use crate::error::{Result, SourceError};

/// Encoding of a values file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum InputFormat {
    #[default]
    Decimal,
    Bytes,
}

impl InputFormat {
    /// Decode raw input into values in rank order.
    pub fn parse(self, raw: &[u8]) -> Result<Vec<Value>> {
        match self {
            InputFormat::Decimal => parse_decimal(std::str::from_utf8(raw)?),
            InputFormat::Bytes => Ok(parse_bytes(raw)),
        }
    }

    /// Encode values so that `parse` reads them back.
    pub fn render(self, values: &[Value]) -> Result<Bytes> {
        let mut buf = BytesMut::new();
        match self {
            InputFormat::Decimal => {
                for value in values {
                    buf.put_slice(value.to_string().as_bytes());
                    buf.put_u8(b'\n');
                }
            }
            InputFormat::Bytes => {
                for &value in values {
                    let byte = u8::try_from(value).map_err(|_| SourceError::OutOfRange {
                        value,
                        format: "bytes",
                    })?;
                    buf.put_u8(byte);
                }
            }
        }
        Ok(buf.freeze())
    }

    pub fn name(self) -> &'static str {
        match self {
            InputFormat::Decimal => "decimal",
            InputFormat::Bytes => "bytes",
        }
    }
}

impl fmt::Display for InputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for InputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "decimal" => Ok(InputFormat::Decimal),
            "bytes" => Ok(InputFormat::Bytes),
            other => Err(format!("unknown input format: {}", other)),
        }
    }
}

/// Parse whitespace- or comma-delimited signed integers.
pub fn parse_decimal(text: &str) -> Result<Vec<Value>> {
    let mut values = Vec::new();
    for (index, line) in text.lines().enumerate() {
        let tokens = line
            .split(|c: char| c == ',' || c.is_ascii_whitespace())
            .filter(|t| !t.is_empty());
        for token in tokens {
            let value = token.parse::<Value>().map_err(|_| SourceError::Malformed {
                line: index + 1,
                token: token.to_string(),
            })?;
            values.push(value);
        }
    }
    Ok(values)
}

/// One value per byte.
pub fn parse_bytes(raw: &[u8]) -> Vec<Value> {
    raw.iter().map(|&b| Value::from(b)).collect()
}
