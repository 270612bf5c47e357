use std::str::FromStr;

use derive_more::Display;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

pub const PREFIX: char = 'B';

/// Human-readable booking identifier, `B` plus the zero-padded numeric key
/// (`B007`). Numbers past 999 simply widen (`B1000`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display)]
#[display(fmt = "B{:03}", _0)]
pub struct BookingCode(u64);

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid booking code: {0}")]
pub struct InvalidBookingCode(pub String);

impl BookingCode {
    pub const FIRST: BookingCode = BookingCode(1);

    pub fn from_id(id: u64) -> Option<Self> {
        (id > 0).then_some(BookingCode(id))
    }

    pub fn id(self) -> u64 {
        self.0
    }

    pub fn next(self) -> Self {
        BookingCode(self.0.saturating_add(1))
    }
}

impl FromStr for BookingCode {
    type Err = InvalidBookingCode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s
            .trim()
            .strip_prefix(PREFIX)
            .ok_or_else(|| InvalidBookingCode(s.to_string()))?;

        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(InvalidBookingCode(s.to_string()));
        }

        digits
            .parse::<u64>()
            .ok()
            .and_then(BookingCode::from_id)
            .ok_or_else(|| InvalidBookingCode(s.to_string()))
    }
}

impl Serialize for BookingCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for BookingCode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Code that follows the highest existing one. Falls back to `B001` when
/// there is nothing to follow or the existing code does not parse.
pub fn next_code(highest_existing: Option<&str>) -> BookingCode {
    highest_existing
        .and_then(|code| code.parse::<BookingCode>().ok())
        .map(BookingCode::next)
        .unwrap_or(BookingCode::FIRST)
}
