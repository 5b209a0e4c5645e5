//! Date range resolution and calendar bucket math.
//!
//! RULE: nothing in the engine reads the wall clock. Default ranges are
//! anchored on an `as_of` timestamp injected by the caller, so the same
//! request against the same data always yields the same report.

use crate::error::{AnalyticsError, AnalyticsResult};
use chrono::{DateTime, Datelike, Duration, Months, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Days covered by the default trailing window when no range is given.
pub const DEFAULT_WINDOW_DAYS: i64 = 30;

/// A calendar date range. Both bounds are inclusive.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct AnalyticsPeriod {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl AnalyticsPeriod {
    pub fn new(start: NaiveDate, end: NaiveDate) -> AnalyticsResult<Self> {
        if start > end {
            return Err(AnalyticsError::invalid_range(format!(
                "start {start} is after end {end}"
            )));
        }
        Ok(Self { start, end })
    }

    /// Resolve optional ISO date strings against the injected anchor.
    /// A missing end defaults to the anchor's date; a missing start to a
    /// trailing window of `DEFAULT_WINDOW_DAYS` ending at the end date.
    pub fn resolve(
        start: Option<&str>,
        end: Option<&str>,
        as_of: DateTime<Utc>,
    ) -> AnalyticsResult<Self> {
        let end_date = match end {
            Some(raw) => parse_date(raw)?,
            None => as_of.date_naive(),
        };
        let start_date = match start {
            Some(raw) => parse_date(raw)?,
            None => end_date - Duration::days(DEFAULT_WINDOW_DAYS - 1),
        };
        Self::new(start_date, end_date)
    }

    /// The immediately preceding period of identical length.
    pub fn previous(&self) -> Self {
        let len = self.day_count();
        let end = self.start - Duration::days(1);
        Self {
            start: end - Duration::days(len - 1),
            end,
        }
    }

    /// Inclusive day count. Always >= 1.
    pub fn day_count(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}

fn parse_date(raw: &str) -> AnalyticsResult<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|e| AnalyticsError::invalid_range(format!("cannot parse date '{raw}': {e}")))
}

/// Cohort bucket granularity.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum Granularity {
    Week,
    Month,
}

impl Granularity {
    pub fn parse(value: &str) -> AnalyticsResult<Self> {
        match value.to_ascii_uppercase().as_str() {
            "WEEK" => Ok(Self::Week),
            "MONTH" => Ok(Self::Month),
            _ => Err(AnalyticsError::UnsupportedGranularity {
                value: value.to_string(),
            }),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Week => "WEEK",
            Self::Month => "MONTH",
        }
    }

    /// The start of the bucket containing `date`: the ISO-week Monday,
    /// or the first of the month.
    pub fn bucket_of(&self, date: NaiveDate) -> NaiveDate {
        match self {
            Self::Week => date - Duration::days(date.weekday().num_days_from_monday() as i64),
            Self::Month => date.with_day(1).unwrap_or(date),
        }
    }

    /// The bucket start `offset` buckets after `bucket`.
    pub fn advance(&self, bucket: NaiveDate, offset: u32) -> NaiveDate {
        match self {
            Self::Week => bucket + Duration::days(7 * offset as i64),
            Self::Month => bucket
                .checked_add_months(Months::new(offset))
                .unwrap_or(bucket),
        }
    }

    /// Whole buckets between two bucket starts. Negative when `to` precedes
    /// `from`. Both arguments must already be bucket starts.
    pub fn offset_between(&self, from: NaiveDate, to: NaiveDate) -> i64 {
        match self {
            Self::Week => (to - from).num_days() / 7,
            Self::Month => {
                (to.year() as i64 * 12 + to.month() as i64)
                    - (from.year() as i64 * 12 + from.month() as i64)
            }
        }
    }

    /// Display key for a cohort bucket: `YYYY-MM-DD` of the week's Monday,
    /// or `YYYY-MM` for a month.
    pub fn key_of(&self, bucket: NaiveDate) -> String {
        match self {
            Self::Week => bucket.format("%Y-%m-%d").to_string(),
            Self::Month => bucket.format("%Y-%m").to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn week_buckets_start_on_monday() {
        // 2024-03-07 is a Thursday; its ISO week starts 2024-03-04.
        assert_eq!(Granularity::Week.bucket_of(d(2024, 3, 7)), d(2024, 3, 4));
        assert_eq!(Granularity::Week.bucket_of(d(2024, 3, 4)), d(2024, 3, 4));
        assert_eq!(Granularity::Week.bucket_of(d(2024, 3, 10)), d(2024, 3, 4));
    }

    #[test]
    fn month_buckets_start_on_the_first() {
        assert_eq!(Granularity::Month.bucket_of(d(2024, 2, 29)), d(2024, 2, 1));
    }

    #[test]
    fn month_advance_handles_year_rollover() {
        assert_eq!(
            Granularity::Month.advance(d(2024, 11, 1), 3),
            d(2025, 2, 1),
            "Nov + 3 months should land in February"
        );
        assert_eq!(
            Granularity::Month.offset_between(d(2024, 11, 1), d(2025, 2, 1)),
            3
        );
    }

    #[test]
    fn week_offsets_count_whole_weeks() {
        assert_eq!(
            Granularity::Week.offset_between(d(2024, 3, 4), d(2024, 3, 25)),
            3
        );
    }

    #[test]
    fn granularity_parse_is_case_insensitive() {
        assert_eq!(Granularity::parse("week").unwrap(), Granularity::Week);
        assert_eq!(Granularity::parse("MONTH").unwrap(), Granularity::Month);
        assert!(Granularity::parse("DAY").is_err());
    }
}
