use chrono::{
    DateTime, Datelike, Days, LocalResult, Months, NaiveDate, NaiveDateTime, TimeDelta, TimeZone,
    Weekday,
};
use std::fmt;
use tracing::warn;

/// Hard ceiling on calendar-day steps taken by a single business-day advance.
pub const MAX_CALENDAR_ADVANCES: u32 = 1000;

/// A calendar point the scheduler can step through: a date, a naive
/// date-time, or a zoned date-time. Weekdays and day/month arithmetic are
/// evaluated in whatever calendar the value already carries.
pub trait CalendarDate: Datelike + Copy + PartialOrd + fmt::Debug {
    fn checked_add_calendar_days(self, days: u64) -> Option<Self>;
    fn checked_add_calendar_months(self, months: u32) -> Option<Self>;
}

impl CalendarDate for NaiveDate {
    fn checked_add_calendar_days(self, days: u64) -> Option<Self> {
        self.checked_add_days(Days::new(days))
    }

    fn checked_add_calendar_months(self, months: u32) -> Option<Self> {
        self.checked_add_months(Months::new(months))
    }
}

impl CalendarDate for NaiveDateTime {
    fn checked_add_calendar_days(self, days: u64) -> Option<Self> {
        self.checked_add_days(Days::new(days))
    }

    fn checked_add_calendar_months(self, months: u32) -> Option<Self> {
        self.checked_add_months(Months::new(months))
    }
}

/// Arithmetic happens on the local wall clock, then the result is placed
/// back in the zone. A wall-clock time that falls in a daylight-saving gap
/// moves forward past the gap; an ambiguous one takes the earlier instant.
impl<Tz> CalendarDate for DateTime<Tz>
where
    Tz: TimeZone,
    Tz::Offset: Copy,
{
    fn checked_add_calendar_days(self, days: u64) -> Option<Self> {
        let local = self.naive_local().checked_add_days(Days::new(days))?;
        resolve_local(&self.timezone(), local)
    }

    fn checked_add_calendar_months(self, months: u32) -> Option<Self> {
        let local = self.naive_local().checked_add_months(Months::new(months))?;
        resolve_local(&self.timezone(), local)
    }
}

fn resolve_local<Tz: TimeZone>(tz: &Tz, local: NaiveDateTime) -> Option<DateTime<Tz>> {
    match tz.from_local_datetime(&local) {
        LocalResult::Single(dt) => Some(dt),
        LocalResult::Ambiguous(earliest, _) => Some(earliest),
        // Gaps are shorter than a day; probe forward in 15 minute steps.
        LocalResult::None => (1..=96).find_map(|step| {
            let shifted = local.checked_add_signed(TimeDelta::minutes(15 * step))?;
            tz.from_local_datetime(&shifted).earliest()
        }),
    }
}

/// Monday through Friday. No holiday awareness.
pub fn is_business_day<T: Datelike>(date: T) -> bool {
    !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Step forward one calendar day at a time until `business_days` business
/// days have been passed, or the advance ceiling is reached. Returns the
/// date reached and how many business days were still outstanding.
///
/// Every step is measured from `start`, so a zoned start keeps its wall-clock
/// time even after passing a daylight-saving transition.
fn advance_business_days<T: CalendarDate>(start: T, business_days: u32) -> (T, u32) {
    let mut current = start;
    let mut remaining = business_days;
    let mut advances = 0;

    while remaining > 0 && advances < MAX_CALENDAR_ADVANCES {
        let Some(next) = start.checked_add_calendar_days(u64::from(advances) + 1) else {
            break;
        };
        current = next;
        advances += 1;
        if is_business_day(current) {
            remaining -= 1;
        }
    }
    (current, remaining)
}

/// Find the date `business_days` business days after `start`.
///
/// The start date itself is never counted, so `0` returns `start` unchanged
/// even when it falls on a weekend. The walk gives up after
/// [`MAX_CALENDAR_ADVANCES`] calendar days and returns the date reached,
/// which means counts above roughly 714 are not honoured.
pub fn add_business_days<T: CalendarDate>(start: T, business_days: u32) -> T {
    let (reached, remaining) = advance_business_days(start, business_days);
    if remaining > 0 {
        warn!(
            ?start,
            ?reached,
            requested = business_days,
            remaining,
            max_advances = MAX_CALENDAR_ADVANCES,
            "business-day advance stopped early; returning the last date reached"
        );
    }
    reached
}

/// Like [`add_business_days`], but `None` when the advance could not be
/// completed within the ceiling.
pub fn try_add_business_days<T: CalendarDate>(start: T, business_days: u32) -> Option<T> {
    let (reached, remaining) = advance_business_days(start, business_days);
    (remaining == 0).then_some(reached)
}

/// Count business days in `(start, end]`.
pub fn count_business_days_between<T: CalendarDate>(start: T, end: T) -> u32 {
    let mut count = 0;
    let mut offset = 1;
    while let Some(current) = start.checked_add_calendar_days(offset) {
        if current > end {
            break;
        }
        if is_business_day(current) {
            count += 1;
        }
        offset += 1;
    }
    count
}
