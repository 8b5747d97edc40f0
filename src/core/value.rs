//! Value rendering for positional log bodies
//!
//! Every positional argument is a [`LogValue`]. Primitive kinds have fixed
//! textual forms; composite values go through a [`ValueEncoder`] (compact
//! JSON by default) and fall back to their `Debug` rendering if encoding
//! fails, so a line is never dropped because of a value.

use super::error::Result;
use super::finite::ensure_finite;
use super::log_level::LogLevel;
use serde::Serialize;
use std::borrow::Cow;
use std::fmt;
use std::io::Write;

/// Significant digits used for floating point values.
pub const FLOAT_PRECISION: usize = 3;

/// A composite value that can be handed to a [`ValueEncoder`].
///
/// Implemented for every `Serialize + Debug` type. Conversion fails on
/// `NaN` or infinite floats, which JSON cannot represent.
pub trait Structured {
    fn to_json_value(&self) -> serde_json::Result<serde_json::Value>;
    fn fmt_fallback(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result;
}

impl<T: Serialize + fmt::Debug + ?Sized> Structured for T {
    fn to_json_value(&self) -> serde_json::Result<serde_json::Value> {
        ensure_finite(self)?;
        serde_json::to_value(self)
    }

    fn fmt_fallback(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Turns a structured value into text.
pub trait ValueEncoder: Send + Sync {
    fn encode(&self, value: &serde_json::Value) -> Result<String>;
}

/// Compact JSON encoder used unless another one is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonEncoder;

impl ValueEncoder for JsonEncoder {
    fn encode(&self, value: &serde_json::Value) -> Result<String> {
        Ok(serde_json::to_string(value)?)
    }
}

/// One positional argument of a log call.
#[derive(Clone)]
pub enum LogValue<'a> {
    Null,
    Str(Cow<'a, str>),
    Bytes(Cow<'a, [u8]>),
    Int(i64),
    Uint(u64),
    Float(f64),
    Bool(bool),
    Error(&'a (dyn std::error::Error + 'a)),
    Display(&'a (dyn fmt::Display + 'a)),
    Structured(&'a (dyn Structured + 'a)),
}

impl<'a> LogValue<'a> {
    /// Render an error by its message text.
    pub fn error<E: std::error::Error + 'a>(err: &'a E) -> Self {
        LogValue::Error(err)
    }

    /// Render any value by its `Display` implementation.
    pub fn display<D: fmt::Display + 'a>(value: &'a D) -> Self {
        LogValue::Display(value)
    }

    /// Render a composite value through the logger's encoder.
    pub fn structured<S: Serialize + fmt::Debug + 'a>(value: &'a S) -> Self {
        LogValue::Structured(value)
    }

    pub fn bytes(bytes: &'a [u8]) -> Self {
        LogValue::Bytes(Cow::Borrowed(bytes))
    }

    /// Append the textual form of this value to `buf`.
    pub fn render(&self, buf: &mut Vec<u8>, encoder: &dyn ValueEncoder) {
        match self {
            LogValue::Null => buf.extend_from_slice(b"null"),
            LogValue::Str(s) => buf.extend_from_slice(s.as_bytes()),
            LogValue::Bytes(b) => buf.extend_from_slice(b),
            LogValue::Int(i) => {
                let _ = write!(buf, "{}", i);
            }
            LogValue::Uint(u) => {
                let _ = write!(buf, "{}", u);
            }
            LogValue::Float(v) => buf.extend_from_slice(format_float(*v, FLOAT_PRECISION).as_bytes()),
            LogValue::Bool(b) => buf.extend_from_slice(if *b { b"true" } else { b"false" }),
            LogValue::Error(e) => {
                let _ = write!(buf, "{}", e);
            }
            LogValue::Display(d) => {
                let _ = write!(buf, "{}", d);
            }
            LogValue::Structured(s) => render_structured(*s, buf, encoder),
        }
    }
}

fn render_structured(value: &dyn Structured, buf: &mut Vec<u8>, encoder: &dyn ValueEncoder) {
    let encoded = value
        .to_json_value()
        .map_err(Into::into)
        .and_then(|json| encoder.encode(&json));

    match encoded {
        Ok(text) => buf.extend_from_slice(text.as_bytes()),
        Err(_) => {
            let _ = write!(buf, "{}", Fallback(value));
        }
    }
}

struct Fallback<'a>(&'a dyn Structured);

impl fmt::Display for Fallback<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt_fallback(f)
    }
}

impl fmt::Debug for LogValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut buf = Vec::new();
        self.render(&mut buf, &JsonEncoder);
        f.debug_tuple("LogValue")
            .field(&String::from_utf8_lossy(&buf))
            .finish()
    }
}

/// Render positional values, each preceded by a single space.
pub fn render_positional(values: &[LogValue<'_>], buf: &mut Vec<u8>, encoder: &dyn ValueEncoder) {
    for value in values {
        buf.push(b' ');
        value.render(buf, encoder);
    }
}

/// `%g`-style rendering bounded to `precision` significant digits.
///
/// `3.14159` renders as `3.14`, `1234567.0` as `1.23e+06`, `0.5` as `0.5`.
pub fn format_float(value: f64, precision: usize) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "+Inf" } else { "-Inf" }.to_string();
    }
    if value == 0.0 {
        return if value.is_sign_negative() { "-0" } else { "0" }.to_string();
    }

    let precision = precision.max(1);
    let scientific = format!("{:.*e}", precision - 1, value);
    let Some((mantissa, exponent)) = scientific.split_once('e') else {
        return scientific;
    };
    let exponent: i32 = exponent.parse().unwrap_or(0);

    if exponent < -4 || exponent >= precision as i32 {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!("{}e{}{:02}", trim_fraction(mantissa), sign, exponent.abs())
    } else {
        let decimals = (precision as i32 - 1 - exponent).max(0) as usize;
        trim_fraction(&format!("{:.*}", decimals, value)).to_string()
    }
}

fn trim_fraction(text: &str) -> &str {
    if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.')
    } else {
        text
    }
}

impl<'a> From<&'a str> for LogValue<'a> {
    fn from(s: &'a str) -> Self {
        LogValue::Str(Cow::Borrowed(s))
    }
}

impl<'a> From<&'a String> for LogValue<'a> {
    fn from(s: &'a String) -> Self {
        LogValue::Str(Cow::Borrowed(s.as_str()))
    }
}

impl From<String> for LogValue<'_> {
    fn from(s: String) -> Self {
        LogValue::Str(Cow::Owned(s))
    }
}

impl<'a> From<Cow<'a, str>> for LogValue<'a> {
    fn from(s: Cow<'a, str>) -> Self {
        LogValue::Str(s)
    }
}

impl From<char> for LogValue<'_> {
    fn from(c: char) -> Self {
        LogValue::Str(Cow::Owned(c.to_string()))
    }
}

impl<'a> From<&'a [u8]> for LogValue<'a> {
    fn from(b: &'a [u8]) -> Self {
        LogValue::Bytes(Cow::Borrowed(b))
    }
}

impl From<Vec<u8>> for LogValue<'_> {
    fn from(b: Vec<u8>) -> Self {
        LogValue::Bytes(Cow::Owned(b))
    }
}

macro_rules! impl_from_signed {
    ($($t:ty),*) => {
        $(impl From<$t> for LogValue<'_> {
            fn from(v: $t) -> Self {
                LogValue::Int(v as i64)
            }
        })*
    };
}

macro_rules! impl_from_unsigned {
    ($($t:ty),*) => {
        $(impl From<$t> for LogValue<'_> {
            fn from(v: $t) -> Self {
                LogValue::Uint(v as u64)
            }
        })*
    };
}

impl_from_signed!(i8, i16, i32, i64, isize);
impl_from_unsigned!(u8, u16, u32, u64, usize);

// Wider than the numeric variants; rendered as decimal text.
impl From<i128> for LogValue<'_> {
    fn from(v: i128) -> Self {
        LogValue::Str(Cow::Owned(v.to_string()))
    }
}

impl From<u128> for LogValue<'_> {
    fn from(v: u128) -> Self {
        LogValue::Str(Cow::Owned(v.to_string()))
    }
}

impl From<f32> for LogValue<'_> {
    fn from(v: f32) -> Self {
        LogValue::Float(v as f64)
    }
}

impl From<f64> for LogValue<'_> {
    fn from(v: f64) -> Self {
        LogValue::Float(v)
    }
}

impl From<bool> for LogValue<'_> {
    fn from(v: bool) -> Self {
        LogValue::Bool(v)
    }
}

impl From<LogLevel> for LogValue<'_> {
    fn from(level: LogLevel) -> Self {
        LogValue::Str(Cow::Borrowed(level.to_str()))
    }
}

impl<'a> From<&'a (dyn std::error::Error + 'a)> for LogValue<'a> {
    fn from(e: &'a (dyn std::error::Error + 'a)) -> Self {
        LogValue::Error(e)
    }
}

impl<'a> From<&'a (dyn std::error::Error + Send + Sync + 'a)> for LogValue<'a> {
    fn from(e: &'a (dyn std::error::Error + Send + Sync + 'a)) -> Self {
        LogValue::Error(e)
    }
}

impl<'a, T> From<Option<T>> for LogValue<'a>
where
    T: Into<LogValue<'a>>,
{
    fn from(v: Option<T>) -> Self {
        v.map_or(LogValue::Null, Into::into)
    }
}
