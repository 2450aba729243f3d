//! # Reporting Periods
//!
//! Calendar-month ranges used to scope dashboard figures.
//!
//! ## Month Boundaries
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  "Now" (instant) ──► ReportingZone ──► today (date) ──► MonthRange     │
//! │                                                                         │
//! │  2024-03-01 02:00 UTC                                                  │
//! │     zone = utc     → 2024-03-01 → [2024-03-01, 2024-03-31]             │
//! │     zone = -06:00  → 2024-02-29 → [2024-02-01, 2024-02-29]             │
//! │                                                                         │
//! │  The zone decides which month an instant belongs to; the range itself  │
//! │  is made of plain dates and compared inclusively on both ends.         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Datelike, Days, FixedOffset, Local, Months, NaiveDate, Offset, Utc};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};

// =============================================================================
// Month Range
// =============================================================================

/// The inclusive first and last day of one calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, TS)]
#[ts(export)]
pub struct MonthRange {
    #[ts(as = "String")]
    start: NaiveDate,
    #[ts(as = "String")]
    end: NaiveDate,
}

impl MonthRange {
    /// Returns the month containing `date`.
    ///
    /// ## Example
    /// ```rust
    /// use chrono::NaiveDate;
    /// use xonter_core::period::MonthRange;
    ///
    /// let feb = MonthRange::for_date(NaiveDate::from_ymd_opt(2024, 2, 17).unwrap());
    /// assert_eq!(feb.end(), NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
    /// ```
    pub fn for_date(date: NaiveDate) -> Self {
        let start = date - Days::new(u64::from(date.day0()));
        // Only December of the last representable year has no following month.
        let end = start
            .checked_add_months(Months::new(1))
            .and_then(|next| next.pred_opt())
            .unwrap_or(NaiveDate::MAX);
        MonthRange { start, end }
    }

    /// Returns the range for an explicit year and month (1-12).
    pub fn from_year_month(year: i32, month: u32) -> CoreResult<Self> {
        NaiveDate::from_ymd_opt(year, month, 1)
            .map(Self::for_date)
            .ok_or_else(|| CoreError::InvalidPeriod(format!("{}-{:02}", year, month)))
    }

    /// First day of the month.
    #[inline]
    pub fn start(&self) -> NaiveDate {
        self.start
    }

    /// Last day of the month (inclusive).
    #[inline]
    pub fn end(&self) -> NaiveDate {
        self.end
    }

    #[inline]
    pub fn year(&self) -> i32 {
        self.start.year()
    }

    #[inline]
    pub fn month(&self) -> u32 {
        self.start.month()
    }

    /// Checks whether `date` falls within the month, both ends inclusive.
    #[inline]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// The month before this one.
    pub fn previous(&self) -> Self {
        Self::for_date(self.start - Days::new(1))
    }

    /// The month after this one.
    pub fn next(&self) -> Self {
        Self::for_date(self.end + Days::new(1))
    }
}

impl fmt::Display for MonthRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year(), self.month())
    }
}

// =============================================================================
// Reporting Zone
// =============================================================================

/// The time zone used to decide which calendar day (and month) "now" is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportingZone {
    /// The zone of the machine running the process.
    #[default]
    Local,
    /// A fixed UTC offset, identical for every viewer.
    Fixed(FixedOffset),
}

impl ReportingZone {
    /// UTC as a fixed zone.
    pub fn utc() -> Self {
        ReportingZone::Fixed(Utc.fix())
    }

    /// The calendar date of `instant` in this zone.
    pub fn date_of(&self, instant: DateTime<Utc>) -> NaiveDate {
        match self {
            ReportingZone::Local => instant.with_timezone(&Local).date_naive(),
            ReportingZone::Fixed(offset) => instant.with_timezone(offset).date_naive(),
        }
    }

    /// Today's date in this zone.
    pub fn today(&self) -> NaiveDate {
        self.date_of(Utc::now())
    }

    /// The calendar month containing today in this zone.
    pub fn current_month(&self) -> MonthRange {
        MonthRange::for_date(self.today())
    }
}

impl fmt::Display for ReportingZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportingZone::Local => write!(f, "local"),
            ReportingZone::Fixed(offset) => write!(f, "{}", offset),
        }
    }
}

impl FromStr for ReportingZone {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.trim();
        match raw.to_lowercase().as_str() {
            "local" => return Ok(ReportingZone::Local),
            "utc" | "z" => return Ok(ReportingZone::utc()),
            _ => {}
        }

        let invalid = || CoreError::InvalidZone(raw.to_string());

        let (sign, rest) = match raw.as_bytes().first() {
            Some(b'+') => (1, &raw[1..]),
            Some(b'-') => (-1, &raw[1..]),
            _ => return Err(invalid()),
        };
        let (hours, minutes) = rest.split_once(':').ok_or_else(invalid)?;
        let two_digits = |part: &str| part.len() == 2 && part.bytes().all(|b| b.is_ascii_digit());
        if !two_digits(hours) || !two_digits(minutes) {
            return Err(invalid());
        }
        let hours: i32 = hours.parse().map_err(|_| invalid())?;
        let minutes: i32 = minutes.parse().map_err(|_| invalid())?;
        if hours > 23 || minutes > 59 {
            return Err(invalid());
        }

        FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
            .map(ReportingZone::Fixed)
            .ok_or_else(invalid)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_month_range_bounds() {
        let range = MonthRange::for_date(date(2024, 3, 15));
        assert_eq!(range.start(), date(2024, 3, 1));
        assert_eq!(range.end(), date(2024, 3, 31));

        assert_eq!(MonthRange::for_date(date(2023, 2, 1)).end(), date(2023, 2, 28));
        assert_eq!(MonthRange::for_date(date(2024, 2, 1)).end(), date(2024, 2, 29));
        assert_eq!(MonthRange::for_date(date(1900, 2, 1)).end(), date(1900, 2, 28));
        assert_eq!(MonthRange::for_date(date(2000, 2, 1)).end(), date(2000, 2, 29));
        assert_eq!(MonthRange::for_date(date(2024, 4, 30)).end(), date(2024, 4, 30));
    }

    #[test]
    fn test_contains_is_inclusive() {
        let range = MonthRange::from_year_month(2024, 6).unwrap();
        assert!(range.contains(date(2024, 6, 1)));
        assert!(range.contains(date(2024, 6, 30)));
        assert!(!range.contains(date(2024, 5, 31)));
        assert!(!range.contains(date(2024, 7, 1)));
    }

    #[test]
    fn test_previous_and_next_cross_years() {
        let jan = MonthRange::from_year_month(2024, 1).unwrap();
        assert_eq!(jan.previous(), MonthRange::from_year_month(2023, 12).unwrap());
        assert_eq!(jan.previous().next(), jan);
        assert_eq!(jan.to_string(), "2024-01");
    }

    #[test]
    fn test_invalid_month() {
        assert!(matches!(
            MonthRange::from_year_month(2024, 13),
            Err(CoreError::InvalidPeriod(_))
        ));
    }

    #[test]
    fn test_zone_parsing() {
        assert_eq!("local".parse::<ReportingZone>().unwrap(), ReportingZone::Local);
        assert_eq!("UTC".parse::<ReportingZone>().unwrap(), ReportingZone::utc());

        let cdmx = "-06:00".parse::<ReportingZone>().unwrap();
        assert_eq!(
            cdmx,
            ReportingZone::Fixed(FixedOffset::west_opt(6 * 3600).unwrap())
        );
        assert_eq!(cdmx.to_string(), "-06:00");

        assert!("06:00".parse::<ReportingZone>().is_err());
        assert!("+6".parse::<ReportingZone>().is_err());
        assert!("+25:00".parse::<ReportingZone>().is_err());
        assert!("mars".parse::<ReportingZone>().is_err());
    }

    #[test]
    fn test_zone_rejects_signed_or_non_digit_parts() {
        for raw in ["+-1:00", "--1:00", "+01:-1", "+0a:00", "+ 1:00", "+01:+5"] {
            assert!(
                matches!(raw.parse::<ReportingZone>(), Err(CoreError::InvalidZone(_))),
                "{raw} should be rejected"
            );
        }
    }

    #[test]
    fn test_month_range_at_calendar_limits() {
        let last = MonthRange::for_date(NaiveDate::MAX);
        assert_eq!(last.end(), NaiveDate::MAX);
        assert_eq!(last.start().month(), 12);

        let first = MonthRange::for_date(NaiveDate::MIN);
        assert_eq!(first.start(), NaiveDate::MIN);
        assert_eq!(first.end().month(), first.start().month());
    }

    #[test]
    fn test_zone_decides_the_month() {
        let instant = Utc.with_ymd_and_hms(2024, 3, 1, 2, 0, 0).unwrap();

        let utc = ReportingZone::utc();
        assert_eq!(utc.date_of(instant), date(2024, 3, 1));

        let west: ReportingZone = "-06:00".parse().unwrap();
        let day = west.date_of(instant);
        assert_eq!(day, date(2024, 2, 29));
        assert_eq!(MonthRange::for_date(day).to_string(), "2024-02");
    }
}
