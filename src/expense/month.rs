//! Calendar months, used to decide which expenses count towards "this month".

use std::{fmt::Display, ops::Range};

use time::{Date, Duration, Month, OffsetDateTime};
use time_tz::{Offset, OffsetDateTimeExt, OffsetResult, PrimitiveDateTimeExt, TimeZone, Tz};

/// A calendar month in a timezone, e.g. October 2026 in "Asia/Kolkata".
///
/// Every instant belongs to exactly one calendar month for a given timezone.
/// The month starts at local midnight using the UTC offset in force on that
/// date, so months on either side of a daylight saving change line up.
#[derive(Clone, Copy)]
pub struct CalendarMonth {
    first_day: Date,
    timezone: &'static Tz,
}

impl CalendarMonth {
    /// The calendar month that contains `instant` when viewed in `timezone`.
    pub fn containing(instant: OffsetDateTime, timezone: &'static Tz) -> Self {
        let local_date = instant.to_timezone(timezone).date();

        Self {
            first_day: first_day_of_month(local_date),
            timezone,
        }
    }

    /// The calendar month that contains the current wall-clock time in `timezone`.
    pub fn current(timezone: &'static Tz) -> Self {
        Self::containing(OffsetDateTime::now_utc(), timezone)
    }

    /// The calendar year, e.g. 2026.
    pub fn year(&self) -> i32 {
        self.first_day.year()
    }

    /// The month of the year, e.g. [Month::October].
    ///
    /// Displays as the English month name.
    pub fn month(&self) -> Month {
        self.first_day.month()
    }

    /// The calendar month immediately before this one.
    pub fn previous(&self) -> Self {
        Self {
            first_day: first_day_of_month(self.first_day - Duration::days(1)),
            timezone: self.timezone,
        }
    }

    /// The calendar month immediately after this one.
    pub fn next(&self) -> Self {
        // Every month has at most 31 days, so this always lands in the next month.
        Self {
            first_day: first_day_of_month(self.first_day + Duration::days(31)),
            timezone: self.timezone,
        }
    }

    /// The half-open range of instants covered by this month, from midnight on
    /// the first day up to (not including) midnight on the first day of the next month.
    pub fn instants(&self) -> Range<OffsetDateTime> {
        self.start()..self.next().start()
    }

    /// Whether `instant` falls in this calendar month.
    pub fn contains(&self, instant: OffsetDateTime) -> bool {
        self.instants().contains(&instant)
    }

    /// The first instant of the month: midnight on the first day in local time.
    fn start(&self) -> OffsetDateTime {
        let midnight = self.first_day.midnight();

        match midnight.assume_timezone(self.timezone) {
            OffsetResult::Some(start) => start,
            // Clocks went back over midnight, so the day starts at the earlier one.
            OffsetResult::Ambiguous(first, second) => first.min(second),
            // Clocks skipped midnight, so the day starts at the transition. The
            // offset from a day earlier is the one in force just before it.
            OffsetResult::None => {
                let day_before = (midnight - Duration::days(1)).assume_utc();
                midnight.assume_offset(self.timezone.get_offset_utc(&day_before).to_utc())
            }
        }
    }
}

impl PartialEq for CalendarMonth {
    fn eq(&self, other: &Self) -> bool {
        self.first_day == other.first_day && self.timezone.name() == other.timezone.name()
    }
}

impl Eq for CalendarMonth {}

impl std::fmt::Debug for CalendarMonth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CalendarMonth")
            .field("first_day", &self.first_day)
            .field("timezone", &self.timezone.name())
            .finish()
    }
}

impl Display for CalendarMonth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.month(), self.year())
    }
}

fn first_day_of_month(date: Date) -> Date {
    date - Duration::days(i64::from(date.day()) - 1)
}
