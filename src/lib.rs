use std::fmt;
use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};
use std::str::FromStr;

use lazy_static::lazy_static;
use regex::Regex;
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use thiserror::Error;

pub mod timestamp;

// Fixed unit magnitudes in nanoseconds. A month is always exactly 30 days
// and a year exactly 360; the parser and formatter only have to agree with
// each other, not with a calendar.
const NANOSECOND: i64 = 1;
const MICROSECOND: i64 = 1_000;
const MILLISECOND: i64 = 1_000_000;
const SECOND: i64 = 1_000_000_000;
const MINUTE: i64 = 60 * SECOND;
const HOUR: i64 = 60 * MINUTE;
const DAY: i64 = 24 * HOUR;
const MONTH: i64 = 30 * DAY;
const YEAR: i64 = 12 * MONTH;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DurationError {
    /// A unit suffix matched but the digit run next to it did not convert
    /// to an integer, or the accumulated total left the i64 range.
    #[error("malformed numeral in duration: {0}")]
    MalformedNumeral(String),
    /// The generic coercion entry point received a value kind it cannot
    /// interpret as a duration.
    #[error("cannot convert {0} to a duration")]
    UnsupportedInputType(&'static str),
}

lazy_static! {
    static ref NEGATIVE_PATTERN: Regex = Regex::new(r"^(~ )?-").unwrap();

    // One independent matcher per unit kind, each contributing additively.
    // The bare minute suffix rejects a following `o` (month) or `s`
    // (millisecond) so "3mo" and "500ms" never count as minutes.
    static ref UNIT_PATTERNS: [(Regex, i64); 9] = [
        (Regex::new(r"(\d+) ?(?:ns|nanos|nanosecond|nanoseconds)").unwrap(), NANOSECOND),
        (Regex::new(r"(\d+) ?(?:µs|µ|us)").unwrap(), MICROSECOND),
        (Regex::new(r"(\d+) ?(?:ms)").unwrap(), MILLISECOND),
        (Regex::new(r"(\d+) ?(?:s|sec|secs)").unwrap(), SECOND),
        (Regex::new(r"(\d+) ?(?:m[^os]|m$|min|mins)").unwrap(), MINUTE),
        (Regex::new(r"(\d+) ?(?:h|hr|hrs)").unwrap(), HOUR),
        (Regex::new(r"(\d+) ?(?:d|day|days)").unwrap(), DAY),
        (Regex::new(r"(\d+) ?(?:mo|mos)").unwrap(), MONTH),
        (Regex::new(r"(\d+) ?(?:y|yr|yrs)").unwrap(), YEAR),
    ];
}

/// A signed nanosecond count with human-friendly parsing and formatting.
///
/// Parsing is additive: every unit token found in the text contributes to
/// the total, so compact notations like `6d2h5s` work without a grammar.
/// Formatting picks a precision tier from the magnitude (exact below four
/// days, then day/hour, month/day and year/month heads).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ApproxDuration(i64);

impl ApproxDuration {
    pub const ZERO: Self = Self(0);
    pub const NANOSECOND: Self = Self(NANOSECOND);
    pub const MICROSECOND: Self = Self(MICROSECOND);
    pub const MILLISECOND: Self = Self(MILLISECOND);
    pub const SECOND: Self = Self(SECOND);
    pub const MINUTE: Self = Self(MINUTE);
    pub const HOUR: Self = Self(HOUR);
    /// Exactly 24 hours.
    pub const DAY: Self = Self(DAY);
    /// Exactly 30 days.
    pub const MONTH: Self = Self(MONTH);
    /// Exactly 12 thirty-day months.
    pub const YEAR: Self = Self(YEAR);

    pub const fn from_nanos(nanos: i64) -> Self {
        Self(nanos)
    }

    pub const fn as_nanos(&self) -> i64 {
        self.0
    }

    /// Parses a duration string by summing every unit token found in it.
    ///
    /// Each of the nine unit patterns is tried independently and its first
    /// match (digit run plus suffix) is added to the total, so tokens may
    /// appear in any order and any subset. A leading `-` or `~ -` negates
    /// the whole sum. Text that matches no pattern contributes nothing; an
    /// empty or unrecognized string parses to zero, not an error.
    pub fn parse(text: &str) -> Result<Self, DurationError> {
        let mut total: i64 = 0;
        for (pattern, magnitude) in UNIT_PATTERNS.iter() {
            let Some(caps) = pattern.captures(text) else {
                continue;
            };
            let digits = &caps[1];
            let count: i64 = digits
                .parse()
                .map_err(|_| DurationError::MalformedNumeral(digits.to_string()))?;
            total = count
                .checked_mul(*magnitude)
                .and_then(|contribution| total.checked_add(contribution))
                .ok_or_else(|| DurationError::MalformedNumeral(digits.to_string()))?;
        }
        if NEGATIVE_PATTERN.is_match(text) {
            total = -total;
        }
        Ok(Self(total))
    }

    /// Compact approximate rendering: same tiers as `Display` with the
    /// remainder dropped and a leading `~` once truncation kicks in.
    /// Negative values place the sign after the marker: `~ -6d2h`.
    pub fn approx(&self) -> String {
        if self.0 < 0 {
            let positive = Self(-self.0).approx();
            return match positive.strip_prefix('~') {
                Some(rest) => format!("~ -{}", rest),
                None => format!("-{}", positive),
            };
        }
        let ns = self.0;
        if ns < 4 * DAY {
            fmt_exact(ns)
        } else if ns < MONTH {
            let (days, hours, _) = split(ns, DAY, HOUR);
            format!("~{}d{}h", days, hours)
        } else if ns < 12 * MONTH {
            let (months, days, _) = split(ns, MONTH, DAY);
            format!("~{}mo{}d", months, days)
        } else {
            let (years, months, _) = split(ns, YEAR, MONTH);
            format!("~{}y{}mo", years, months)
        }
    }

    /// Verbose exact rendering: `"6 days, 2 hours 5s"`.
    pub fn pretty(&self) -> String {
        if self.0 < 0 {
            return format!("-{}", Self(-self.0).pretty());
        }
        let ns = self.0;
        if ns < 4 * DAY {
            fmt_exact(ns)
        } else if ns < MONTH {
            let (days, hours, rest) = split(ns, DAY, HOUR);
            format!("{} days, {} hours {}", days, hours, fmt_exact(rest))
        } else if ns < 12 * MONTH {
            let (months, days, rest) = split(ns, MONTH, DAY);
            format!("{} months, {} days {}", months, days, fmt_exact(rest))
        } else {
            let (years, months, rest) = split(ns, YEAR, MONTH);
            format!("{} years, {} months {}", years, months, fmt_exact(rest))
        }
    }

    /// Verbose approximate rendering: `"~ 6 days, 2 hours"`. Negative
    /// values place the sign after the tilde-space: `"~ -6 days, 2 hours"`.
    pub fn approx_pretty(&self) -> String {
        if self.0 < 0 {
            let positive = Self(-self.0).approx_pretty();
            return match positive.strip_prefix("~ ") {
                Some(rest) => format!("~ -{}", rest),
                None => format!("-{}", positive),
            };
        }
        let ns = self.0;
        if ns < 4 * DAY {
            fmt_exact(ns)
        } else if ns < MONTH {
            let (days, hours, _) = split(ns, DAY, HOUR);
            format!("~ {} days, {} hours", days, hours)
        } else if ns < 12 * MONTH {
            let (months, days, _) = split(ns, MONTH, DAY);
            format!("~ {} months, {} days", months, days)
        } else {
            let (years, months, _) = split(ns, YEAR, MONTH);
            format!("~ {} years, {} months", years, months)
        }
    }
}

/// Coarse-first tier split: divide for the coarse unit, subtract its exact
/// contribution, then divide the remainder for the fine unit. Truncates
/// toward zero at every step so a value exactly on a boundary lands in the
/// upper tier with a zero fine component.
fn split(ns: i64, coarse: i64, fine: i64) -> (i64, i64, i64) {
    let hi = ns / coarse;
    let rest = ns - hi * coarse;
    let lo = rest / fine;
    (hi, lo, rest - lo * fine)
}

/// Renders a non-negative count as an exact integer unit chain, largest
/// unit first, omitting zero components: 5_415_000_000_000 -> "1h30m15s".
fn fmt_exact(ns: i64) -> String {
    const UNITS: [(i64, &str); 6] = [
        (HOUR, "h"),
        (MINUTE, "m"),
        (SECOND, "s"),
        (MILLISECOND, "ms"),
        (MICROSECOND, "µs"),
        (NANOSECOND, "ns"),
    ];
    if ns == 0 {
        return "0s".to_string();
    }
    let mut out = String::new();
    let mut rest = ns;
    for (magnitude, suffix) in UNITS {
        let count = rest / magnitude;
        if count > 0 {
            out.push_str(&format!("{}{}", count, suffix));
            rest -= count * magnitude;
        }
    }
    out
}

impl fmt::Display for ApproxDuration {
    /// Compact exact rendering: full precision below four days, then a
    /// tiered two-unit head with the exact remainder appended.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 < 0 {
            return write!(f, "-{}", Self(-self.0));
        }
        let ns = self.0;
        if ns < 4 * DAY {
            f.write_str(&fmt_exact(ns))
        } else if ns < MONTH {
            let (days, hours, rest) = split(ns, DAY, HOUR);
            write!(f, "{}d{}h{}", days, hours, fmt_exact(rest))
        } else if ns < 12 * MONTH {
            let (months, days, rest) = split(ns, MONTH, DAY);
            write!(f, "{}mo{}d{}", months, days, fmt_exact(rest))
        } else {
            let (years, months, rest) = split(ns, YEAR, MONTH);
            write!(f, "{}y{}mo{}", years, months, fmt_exact(rest))
        }
    }
}

impl FromStr for ApproxDuration {
    type Err = DurationError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        Self::parse(text)
    }
}

impl From<i64> for ApproxDuration {
    /// Raw nanosecond count, no unit inference.
    fn from(nanos: i64) -> Self {
        Self(nanos)
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

impl TryFrom<&Value> for ApproxDuration {
    type Error = DurationError;

    /// Coerces an already-typed value: numbers are raw nanosecond counts,
    /// strings go through the additive parser, anything else fails with
    /// the offending kind named.
    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        match value {
            Value::String(text) => Self::parse(text),
            Value::Number(number) => number
                .as_i64()
                .or_else(|| number.as_f64().map(|float| float as i64))
                .map(Self)
                .ok_or_else(|| DurationError::MalformedNumeral(number.to_string())),
            other => Err(DurationError::UnsupportedInputType(value_kind(other))),
        }
    }
}

impl TryFrom<Value> for ApproxDuration {
    type Error = DurationError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Self::try_from(&value)
    }
}

impl Serialize for ApproxDuration {
    /// Encodes as the raw nanosecond count.
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(self.0)
    }
}

struct DurationVisitor;

impl<'de> Visitor<'de> for DurationVisitor {
    type Value = ApproxDuration;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("a duration string, a raw nanosecond count, or null")
    }

    fn visit_str<E: de::Error>(self, text: &str) -> Result<Self::Value, E> {
        ApproxDuration::parse(text).map_err(E::custom)
    }

    fn visit_i64<E: de::Error>(self, nanos: i64) -> Result<Self::Value, E> {
        Ok(ApproxDuration(nanos))
    }

    fn visit_u64<E: de::Error>(self, nanos: u64) -> Result<Self::Value, E> {
        i64::try_from(nanos)
            .map(ApproxDuration)
            .map_err(|_| E::custom("nanosecond count out of range"))
    }

    fn visit_f64<E: de::Error>(self, nanos: f64) -> Result<Self::Value, E> {
        Ok(ApproxDuration(nanos as i64))
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(ApproxDuration::ZERO)
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(ApproxDuration::ZERO)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Self::Value, D::Error> {
        deserializer.deserialize_any(DurationVisitor)
    }
}

impl<'de> Deserialize<'de> for ApproxDuration {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(DurationVisitor)
    }

    /// Accumulator hook: the decoded value is added to `place` instead of
    /// replacing it, and null leaves `place` untouched. Lets a field
    /// accumulate across repeated decode calls.
    fn deserialize_in_place<D: Deserializer<'de>>(
        deserializer: D,
        place: &mut Self,
    ) -> Result<(), D::Error> {
        let parsed = deserializer.deserialize_any(DurationVisitor)?;
        *place += parsed;
        Ok(())
    }
}

impl Neg for ApproxDuration {
    type Output = Self;

    fn neg(self) -> Self {
        Self(-self.0)
    }
}

impl Add for ApproxDuration {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl AddAssign for ApproxDuration {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl Sub for ApproxDuration {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self(self.0 - rhs.0)
    }
}

impl SubAssign for ApproxDuration {
    fn sub_assign(&mut self, rhs: Self) {
        self.0 -= rhs.0;
    }
}

impl Mul<i64> for ApproxDuration {
    type Output = Self;

    fn mul(self, rhs: i64) -> Self {
        Self(self.0 * rhs)
    }
}
