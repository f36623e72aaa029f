//! Geometry value types with exact text conversion
//!
//! Lengths are stored as integer nanometers and angles as integer
//! microdegrees. Their text form is a fixed-point decimal in millimeters
//! (resp. degrees) with at most six fractional digits, so converting to text
//! and back never loses precision.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

const SCALE: i64 = 1_000_000;

/// Error returned when a unit value cannot be parsed from text
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseUnitError {
    #[error("Invalid number: \"{0}\"")]
    Invalid(String),

    #[error("Too many fractional digits (max 6): \"{0}\"")]
    TooPrecise(String),

    #[error("Value out of range: \"{0}\"")]
    Overflow(String),
}

fn format_fixed(value: i64) -> String {
    let sign = if value < 0 { "-" } else { "" };
    let abs = value.unsigned_abs();
    let int = abs / SCALE as u64;
    let frac = abs % SCALE as u64;
    if frac == 0 {
        format!("{sign}{int}.0")
    } else {
        let digits = format!("{:06}", frac);
        format!("{sign}{int}.{}", digits.trim_end_matches('0'))
    }
}

fn parse_fixed(text: &str) -> Result<i64, ParseUnitError> {
    let s = text.trim();
    let (negative, body) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s.strip_prefix('+').unwrap_or(s)),
    };
    let (int_part, frac_part) = body.split_once('.').unwrap_or((body, ""));

    let all_digits = |p: &str| p.chars().all(|c| c.is_ascii_digit());
    if (int_part.is_empty() && frac_part.is_empty()) || !all_digits(int_part) || !all_digits(frac_part)
    {
        return Err(ParseUnitError::Invalid(text.to_string()));
    }
    if frac_part.len() > 6 {
        return Err(ParseUnitError::TooPrecise(text.to_string()));
    }

    let int: i128 = if int_part.is_empty() {
        0
    } else {
        int_part
            .parse::<u64>()
            .map_err(|_| ParseUnitError::Overflow(text.to_string()))?
            .into()
    };
    let frac: i128 = if frac_part.is_empty() {
        0
    } else {
        format!("{:0<6}", frac_part)
            .parse()
            .map_err(|_| ParseUnitError::Invalid(text.to_string()))?
    };

    // i128 holds u64::MAX * SCALE; the sign is applied before narrowing so
    // that i64::MIN stays reachable
    let magnitude = int * i128::from(SCALE) + frac;
    let value = if negative { -magnitude } else { magnitude };
    i64::try_from(value).map_err(|_| ParseUnitError::Overflow(text.to_string()))
}

/// A length in nanometers
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Length(i64);

impl Length {
    pub const fn from_nm(nm: i64) -> Self {
        Self(nm)
    }

    pub const fn nm(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for Length {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_fixed(self.0))
    }
}

impl FromStr for Length {
    type Err = ParseUnitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_fixed(s).map(Self)
    }
}

/// A position on a schematic page
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    pub x: Length,
    pub y: Length,
}

impl Point {
    pub const fn new(x: Length, y: Length) -> Self {
        Self { x, y }
    }

    pub const fn from_nm(x: i64, y: i64) -> Self {
        Self {
            x: Length::from_nm(x),
            y: Length::from_nm(y),
        }
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// An angle in microdegrees
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Angle(i64);

impl Angle {
    pub const fn from_micro_deg(micro_deg: i64) -> Self {
        Self(micro_deg)
    }

    pub const fn from_deg(deg: i64) -> Self {
        Self(deg * SCALE)
    }

    pub const fn micro_deg(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for Angle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_fixed(self.0))
    }
}

impl FromStr for Angle {
    type Err = ParseUnitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_fixed(s).map(Self)
    }
}
