//! Boundary validation of the single-key request body.
//!
//! The raw JSON is inspected exactly once, in [`Operation::try_from`]. After
//! that every value is typed and the operation library never sees JSON.

use serde_json::{Map, Value};

use crate::{Error, Result, ops::MAX_FIBONACCI_TERMS};

/// Recognised request keys.
pub const FIBONACCI: &str = "fibonacci";
pub const PRIME: &str = "prime";
pub const LCM: &str = "lcm";
pub const HCF: &str = "hcf";
pub const AI: &str = "AI";

/// A validated request, one variant per operation key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    Fibonacci(u64),
    /// Integer candidates only; non-integers were dropped during validation.
    Prime(Vec<i64>),
    /// Non-empty.
    Lcm(Vec<i64>),
    /// Non-empty.
    Hcf(Vec<i64>),
    Ai(String),
}

impl Operation {
    /// The request key this operation was selected by.
    pub const fn key(&self) -> &'static str {
        match self {
            Self::Fibonacci(_) => FIBONACCI,
            Self::Prime(_) => PRIME,
            Self::Lcm(_) => LCM,
            Self::Hcf(_) => HCF,
            Self::Ai(_) => AI,
        }
    }

    fn from_entry(key: &str, value: &Value) -> Result<Self> {
        match key {
            FIBONACCI => as_integer(value)
                .and_then(|n| u64::try_from(n).ok())
                .filter(|&n| n <= MAX_FIBONACCI_TERMS)
                .map(Self::Fibonacci)
                .ok_or(Error::InvalidFibonacci),
            PRIME => value
                .as_array()
                .map(|items| Self::Prime(items.iter().filter_map(as_integer).collect()))
                .ok_or(Error::PrimeExpectsArray),
            LCM => integer_list(value)
                .map(Self::Lcm)
                .ok_or(Error::LcmExpectsIntegers),
            HCF => integer_list(value)
                .map(Self::Hcf)
                .ok_or(Error::HcfExpectsIntegers),
            AI => value
                .as_str()
                .map(|prompt| Self::Ai(prompt.to_owned()))
                .ok_or(Error::AiExpectsString),
            _ => Err(Error::UnknownKey),
        }
    }
}

impl TryFrom<&Map<String, Value>> for Operation {
    type Error = Error;

    fn try_from(body: &Map<String, Value>) -> Result<Self> {
        let mut entries = body.iter();
        match (entries.next(), entries.next()) {
            (Some((key, value)), None) => Self::from_entry(key, value),
            _ => Err(Error::KeyCount),
        }
    }
}

impl TryFrom<&Value> for Operation {
    type Error = Error;

    /// Anything other than a JSON object has no keys to dispatch on.
    fn try_from(body: &Value) -> Result<Self> {
        body.as_object().ok_or(Error::KeyCount)?.try_into()
    }
}

/// Parses a raw request body. An empty body is treated as `{}`.
pub fn parse_body(bytes: &[u8]) -> Result<Value> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Object(Map::new()));
    }
    serde_json::from_slice(bytes).map_err(|_| Error::MalformedBody)
}

/// A JSON number with no fractional part that fits in `i64`.
///
/// `5` and `5.0` are both integers, matching the usual "is integer" check on
/// JSON numbers.
pub fn as_integer(value: &Value) -> Option<i64> {
    // i64::MAX as f64 rounds up to 2^63, which is already out of range.
    const UPPER: f64 = i64::MAX as f64;
    const LOWER: f64 = i64::MIN as f64;

    let Value::Number(number) = value else {
        return None;
    };
    if let Some(n) = number.as_i64() {
        return Some(n);
    }
    number
        .as_f64()
        .filter(|f| f.fract() == 0.0 && *f >= LOWER && *f < UPPER)
        .map(|f| f as i64)
}

/// A non-empty array made only of integers.
fn integer_list(value: &Value) -> Option<Vec<i64>> {
    let items = value.as_array().filter(|items| !items.is_empty())?;
    items.iter().map(as_integer).collect()
}
