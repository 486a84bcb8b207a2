//! Date-part granularities, ordered from coarse to fine.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One date/time granularity step.
///
/// Variants are declared coarse to fine, and the derived ordering reflects
/// that: `Year < Month < ... < Minute`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DatePart {
    /// Calendar year.
    Year,
    /// Month of year, `01..=12`.
    Month,
    /// Day of month, `01..=31`.
    Day,
    /// Hour of day, `00..=23`.
    Hour,
    /// Minute of hour, `00..=59`.
    Minute,
}

impl DatePart {
    /// All granularities, coarse to fine.
    pub const ALL: [Self; 5] = [Self::Year, Self::Month, Self::Day, Self::Hour, Self::Minute];

    /// The strict prefix of [`Self::ALL`] ending at (and including) `self`.
    ///
    /// ```
    /// use drilldown_core::level::DatePart;
    ///
    /// assert_eq!(DatePart::Day.down_to(), [DatePart::Year, DatePart::Month, DatePart::Day]);
    /// ```
    #[must_use]
    pub fn down_to(self) -> Vec<Self> {
        Self::ALL.into_iter().take_while(|part| *part <= self).collect()
    }

    /// The next finer granularity, if any.
    #[must_use]
    pub const fn next_finer(self) -> Option<Self> {
        match self {
            Self::Year => Some(Self::Month),
            Self::Month => Some(Self::Day),
            Self::Day => Some(Self::Hour),
            Self::Hour => Some(Self::Minute),
            Self::Minute => None,
        }
    }

    /// The separator rendered before this component in a textual repr.
    ///
    /// The year, always first, has no separator; date components are joined
    /// with `-`, the hour with `T` and the minute with `:` (`2020-02-03T12:30`).
    #[must_use]
    pub const fn separator(self) -> &'static str {
        match self {
            Self::Year => "",
            Self::Month | Self::Day => "-",
            Self::Hour => "T",
            Self::Minute => ":",
        }
    }

    /// The configuration tag for this granularity.
    #[must_use]
    pub const fn as_tag(self) -> &'static str {
        match self {
            Self::Year => "YEAR",
            Self::Month => "MONTH",
            Self::Day => "DAY",
            Self::Hour => "HOUR",
            Self::Minute => "MINUTE",
        }
    }

    /// Parse a configuration tag (`YEAR`, `MONTH`, ...), case-sensitive.
    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|part| part.as_tag() == tag)
    }
}

impl fmt::Display for DatePart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Year => "year",
            Self::Month => "month",
            Self::Day => "day",
            Self::Hour => "hour",
            Self::Minute => "minute",
        };
        f.write_str(name)
    }
}

/// The number of days in the given month, accounting for leap years.
///
/// Returns `None` when the month is outside `1..=12`.
#[must_use]
pub fn days_in_month(year: i32, month: u32) -> Option<u32> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    u32::try_from((next - first).num_days()).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn down_to_is_a_prefix() {
        assert_eq!(DatePart::Year.down_to(), [DatePart::Year]);
        assert_eq!(
            DatePart::Minute.down_to(),
            [DatePart::Year, DatePart::Month, DatePart::Day, DatePart::Hour, DatePart::Minute]
        );
    }

    #[test]
    fn separators() {
        assert_eq!(DatePart::Year.separator(), "");
        assert_eq!(DatePart::Month.separator(), "-");
        assert_eq!(DatePart::Day.separator(), "-");
        assert_eq!(DatePart::Hour.separator(), "T");
        assert_eq!(DatePart::Minute.separator(), ":");
    }

    #[test]
    fn tags_roundtrip() {
        for part in DatePart::ALL {
            assert_eq!(DatePart::from_tag(part.as_tag()), Some(part));
        }
        assert_eq!(DatePart::from_tag("day"), None);
        assert_eq!(DatePart::from_tag("WEEK"), None);
    }

    #[test]
    fn month_lengths() {
        assert_eq!(days_in_month(2020, 2), Some(29));
        assert_eq!(days_in_month(2021, 2), Some(28));
        assert_eq!(days_in_month(2021, 12), Some(31));
        assert_eq!(days_in_month(2021, 4), Some(30));
        assert_eq!(days_in_month(2021, 13), None);
    }
}
