//! Stored value model and the serialization contract for call logs
//!
//! `Value` covers the payload types the facade accepts. Two fixed text
//! renderings are part of the public contract and must stay stable across
//! releases, because recorded call logs are read back and displayed by
//! replay:
//!
//! - `render()` — plain form, used for outputs: text is itself, numbers
//!   are ASCII decimal, bytes are decoded lossily.
//! - `render_quoted()` — argument form, used inside input lists: text is
//!   debug-quoted, bytes are `0x`-prefixed hex, numbers are plain.
//!
//! An argument list renders as `(` + comma-separated quoted forms + `)`.

use std::fmt::Write as _;

/// A payload accepted by the cache facade.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Raw bytes, stored verbatim
    Bytes(Vec<u8>),
    /// UTF-8 text, stored as its bytes
    Text(String),
    /// Signed integer, stored as ASCII decimal
    Int(i64),
    /// Floating point, stored as ASCII decimal
    Float(f64),
}

impl Value {
    /// Byte encoding sent to the store. Every variant round-trips through
    /// `get` with its matching coercion.
    pub fn encode(&self) -> Vec<u8> {
        match self {
            Value::Bytes(b) => b.clone(),
            Value::Text(s) => s.clone().into_bytes(),
            Value::Int(n) => n.to_string().into_bytes(),
            Value::Float(x) => x.to_string().into_bytes(),
        }
    }

    /// Plain text form. The plain form of text is the text itself, so
    /// serializing a string result leaves it observably unchanged.
    pub fn render(&self) -> String {
        match self {
            Value::Bytes(b) => String::from_utf8_lossy(b).into_owned(),
            Value::Text(s) => s.clone(),
            Value::Int(n) => n.to_string(),
            Value::Float(x) => x.to_string(),
        }
    }

    /// Argument form used inside rendered argument lists.
    pub fn render_quoted(&self) -> String {
        match self {
            Value::Bytes(b) => {
                let mut out = String::with_capacity(2 + b.len() * 2);
                out.push_str("0x");
                for byte in b {
                    let _ = write!(out, "{:02x}", byte);
                }
                out
            }
            Value::Text(s) => format!("{:?}", s),
            Value::Int(n) => n.to_string(),
            Value::Float(x) => x.to_string(),
        }
    }

    /// Variant name, for diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Bytes(_) => "bytes",
            Value::Text(_) => "text",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
        }
    }
}

/// Render a positional argument list in its fixed log form.
pub fn render_args(args: &[Value]) -> String {
    let mut out = String::from("(");
    for (i, arg) in args.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        out.push_str(&arg.render_quoted());
    }
    out.push(')');
    out
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<&[u8]> for Value {
    fn from(b: &[u8]) -> Self {
        Value::Bytes(b.to_vec())
    }
}

impl From<Vec<u8>> for Value {
    fn from(b: Vec<u8>) -> Self {
        Value::Bytes(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}
