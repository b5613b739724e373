//! `DecoderValueSensor`: a payload that is a single number or a string.
//!
//! The payload is read as UTF-8 text and matched against a locale
//! independent number grammar:
//!
//! ```text
//! [ws] [+|-] digits [. digits] [(e|E) [+|-] digits] [ws]
//! ```
//!
//! where either side of the decimal point may be empty, but not both.
//! Numbers with an integral value that fits `i64` (`12`, `1.0`, `1e3`)
//! decode as integers, other finite numbers as floats, and anything else
//! is passed through as the original text.

use crate::result::{DecodeResult, DecodedValue};

/// Registry name of the decoder.
pub const DECODER_VALUE_SENSOR: &str = "DecoderValueSensor";

const WHITESPACE: &[char] = &[' ', '\t', '\n', '\u{0B}', '\u{0C}', '\r'];

/// Decode a payload holding one value. Never fails.
pub fn decoder_value_sensor(_dev_eui: &str, payload: &[u8], _fport: u8) -> DecodeResult {
    let text = String::from_utf8_lossy(payload);

    let number = NumberParts::parse(&text).and_then(|parts| {
        parts
            .to_i64()
            .map(DecodedValue::Integer)
            .or_else(|| parts.to_f64().map(DecodedValue::Float))
    });

    match number {
        Some(value) => DecodeResult::success(value),
        None => DecodeResult::success(text.into_owned()),
    }
}

/// A syntactically valid number, split into its parts.
#[derive(Debug, PartialEq, Eq)]
struct NumberParts<'a> {
    negative: bool,
    integer: &'a str,
    fraction: &'a str,
    exponent: i32,
}

impl<'a> NumberParts<'a> {
    fn parse(text: &'a str) -> Option<Self> {
        let text = text.trim_matches(WHITESPACE);
        let (negative, rest) = match text.as_bytes().first()? {
            b'-' => (true, &text[1..]),
            b'+' => (false, &text[1..]),
            _ => (false, text),
        };

        let (mantissa, exponent) = match rest.find(['e', 'E']) {
            Some(i) => (&rest[..i], parse_exponent(&rest[i + 1..])?),
            None => (rest, 0),
        };

        let (integer, fraction) = match mantissa.find('.') {
            Some(i) => (&mantissa[..i], &mantissa[i + 1..]),
            None => (mantissa, ""),
        };

        if integer.is_empty() && fraction.is_empty() {
            return None;
        }
        if !all_digits(integer) || !all_digits(fraction) {
            return None;
        }

        Some(Self {
            negative,
            integer,
            fraction,
            exponent,
        })
    }

    /// Exact integer value, if the number is integral and fits `i64`.
    fn to_i64(&self) -> Option<i64> {
        let digits = format!("{}{}", self.integer, self.fraction);
        // Position of the decimal point within `digits` after applying the
        // exponent.
        let point = self.integer.len() as i64 + self.exponent as i64;

        let (whole, rest, padding) = if point <= 0 {
            ("", digits.as_str(), 0)
        } else if point as usize >= digits.len() {
            (digits.as_str(), "", point as usize - digits.len())
        } else {
            let (whole, rest) = digits.split_at(point as usize);
            (whole, rest, 0)
        };

        if !rest.bytes().all(|b| b == b'0') {
            return None;
        }

        let whole = whole.trim_start_matches('0');
        if whole.is_empty() {
            return Some(0);
        }
        // i64::MAX has 19 digits
        if whole.len() + padding > 19 {
            return None;
        }

        let sign = if self.negative { "-" } else { "" };
        format!("{}{}{}", sign, whole, "0".repeat(padding))
            .parse::<i64>()
            .ok()
    }

    /// Finite floating point value.
    fn to_f64(&self) -> Option<f64> {
        let integer = if self.integer.is_empty() { "0" } else { self.integer };
        let fraction = if self.fraction.is_empty() { "0" } else { self.fraction };
        let sign = if self.negative { "-" } else { "" };

        format!("{}{}.{}e{}", sign, integer, fraction, self.exponent)
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
    }
}

fn all_digits(s: &str) -> bool {
    s.bytes().all(|b| b.is_ascii_digit())
}

fn parse_exponent(s: &str) -> Option<i32> {
    let digits = s.strip_prefix(['+', '-']).unwrap_or(s);
    if digits.is_empty() || !all_digits(digits) {
        return None;
    }
    s.parse::<i32>().ok()
}
