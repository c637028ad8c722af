//! Human-readable durations: `2w 5h 45m` in, `2 weeks 5 hours 45 minutes` out.

use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;
use thiserror::Error;

use crate::locale::{Locale, Translator, render};

/// Calendar-ish units, largest first. Years and months use the mean
/// Gregorian lengths.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DurationUnit {
    Years,
    Months,
    Weeks,
    Days,
    Hours,
    Minutes,
    Seconds,
}

impl DurationUnit {
    pub const ALL: [DurationUnit; 7] = [
        DurationUnit::Years,
        DurationUnit::Months,
        DurationUnit::Weeks,
        DurationUnit::Days,
        DurationUnit::Hours,
        DurationUnit::Minutes,
        DurationUnit::Seconds,
    ];

    pub const fn seconds(self) -> u64 {
        match self {
            DurationUnit::Years => 31_556_952,
            DurationUnit::Months => 31_556_952 / 12,
            DurationUnit::Weeks => 7 * 86_400,
            DurationUnit::Days => 86_400,
            DurationUnit::Hours => 3_600,
            DurationUnit::Minutes => 60,
            DurationUnit::Seconds => 1,
        }
    }

    /// Segment used in translation keys.
    pub const fn key(self) -> &'static str {
        match self {
            DurationUnit::Years => "years",
            DurationUnit::Months => "months",
            DurationUnit::Weeks => "weeks",
            DurationUnit::Days => "days",
            DurationUnit::Hours => "hours",
            DurationUnit::Minutes => "minutes",
            DurationUnit::Seconds => "seconds",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DurationParseError {
    #[error("invalid duration: '{0}'")]
    Invalid(String),
    #[error("duration overflows: '{0}'")]
    Overflow(String),
}

static DURATION_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"(?i)^(?:([0-9]+)\s*y[a-z]*[,\s]*)?",
        r"(?:([0-9]+)\s*mo[a-z]*[,\s]*)?",
        r"(?:([0-9]+)\s*w[a-z]*[,\s]*)?",
        r"(?:([0-9]+)\s*d[a-z]*[,\s]*)?",
        r"(?:([0-9]+)\s*h[a-z]*[,\s]*)?",
        r"(?:([0-9]+)\s*m[a-z]*[,\s]*)?",
        r"(?:([0-9]+)\s*(?:s[a-z]*)?)?$",
    ))
    .expect("duration pattern")
});

/// Parse `1y 2mo 3w 4d 5h 6m 7s` (any subset, in that order).
///
/// Units may be spelled out (`5 hours`), separated by spaces or commas, and a
/// bare trailing number counts as seconds.
pub fn parse_duration(text: &str) -> Result<Duration, DurationParseError> {
    let text = text.trim();
    let invalid = || DurationParseError::Invalid(text.to_string());
    let captures = DURATION_PATTERN.captures(text).ok_or_else(invalid)?;

    let mut seconds: u64 = 0;
    let mut matched = false;
    for (index, unit) in DurationUnit::ALL.iter().enumerate() {
        let Some(group) = captures.get(index + 1) else {
            continue;
        };
        matched = true;
        let amount: u64 = group
            .as_str()
            .parse()
            .map_err(|_| DurationParseError::Overflow(text.to_string()))?;
        seconds = amount
            .checked_mul(unit.seconds())
            .and_then(|part| seconds.checked_add(part))
            .ok_or_else(|| DurationParseError::Overflow(text.to_string()))?;
    }

    if !matched {
        return Err(invalid());
    }
    Ok(Duration::from_secs(seconds))
}

/// Formats durations through translated unit names.
///
/// Translation keys have the form
/// `laboratory.duration.unit.<unit>.<short|singular|plural>` with the amount
/// as argument `{0}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DurationFormatter {
    concise: bool,
    accuracy: usize,
}

impl DurationFormatter {
    pub const LONG: DurationFormatter = DurationFormatter::new(false, usize::MAX);
    pub const CONCISE: DurationFormatter = DurationFormatter::new(true, usize::MAX);
    pub const CONCISE_LOW_ACCURACY: DurationFormatter = DurationFormatter::new(true, 3);

    /// `accuracy` caps the number of units rendered.
    pub const fn new(concise: bool, accuracy: usize) -> Self {
        Self { concise, accuracy }
    }

    pub fn format(
        &self,
        duration: Duration,
        translator: &dyn Translator,
        locale: Option<&Locale>,
    ) -> String {
        let mut seconds = duration.as_secs();
        let mut parts = Vec::new();

        for unit in DurationUnit::ALL {
            let amount = seconds / unit.seconds();
            if amount > 0 {
                seconds -= unit.seconds() * amount;
                parts.push(self.format_part(amount, unit, translator, locale));
            }
            if seconds == 0 || parts.len() >= self.accuracy {
                break;
            }
        }

        if parts.is_empty() {
            return self.format_part(0, DurationUnit::Seconds, translator, locale);
        }
        parts.join(" ")
    }

    fn format_part(
        &self,
        amount: u64,
        unit: DurationUnit,
        translator: &dyn Translator,
        locale: Option<&Locale>,
    ) -> String {
        let form = match (self.concise, amount) {
            (true, _) => "short",
            (false, 1) => "singular",
            (false, _) => "plural",
        };
        let key = format!("laboratory.duration.unit.{}.{form}", unit.key());
        render(translator, &key, locale, &[&amount])
    }
}
