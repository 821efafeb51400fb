use crate::calendar::{CalendarDate, add_business_days, try_add_business_days};
use crate::frequency::FrequencyUnit;
use crate::validation::{ValidationError, validate_frequency_value};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Flat lookahead used for hour- and distance-based programs, which have no
/// usage-rate data to convert into calendar time.
pub const USAGE_BASED_LOOKAHEAD_DAYS: u32 = 30;

/// Business days that stand in for one week when counting business days.
pub const BUSINESS_DAYS_PER_WEEK: u32 = 5;

/// Recurrence of a maintenance or control obligation, anchored at `base_date`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleSpec<T> {
    pub base_date: T,
    pub frequency_value: u32,
    pub frequency_unit: FrequencyUnit,
    #[serde(default)]
    pub use_business_days: bool,
}

impl<T: CalendarDate> ScheduleSpec<T> {
    pub fn new(
        base_date: T,
        frequency_value: u32,
        frequency_unit: FrequencyUnit,
        use_business_days: bool,
    ) -> Result<Self, ValidationError> {
        validate_frequency_value(i64::from(frequency_value))?;
        Ok(Self {
            base_date,
            frequency_value,
            frequency_unit,
            use_business_days,
        })
    }

    /// Build from values as persisted: a signed frequency and a free-text unit label.
    pub fn from_raw(
        base_date: T,
        frequency_value: i64,
        unit_label: &str,
        use_business_days: bool,
    ) -> Result<Self, ValidationError> {
        let frequency_value = validate_frequency_value(frequency_value)?;
        let frequency_unit = unit_label.parse()?;
        Ok(Self {
            base_date,
            frequency_value,
            frequency_unit,
            use_business_days,
        })
    }

    pub fn next_due_date(&self) -> T {
        calculate_next_due_date(
            self.base_date,
            self.frequency_value,
            self.frequency_unit,
            self.use_business_days,
        )
    }

    /// `None` when the due date cannot be reached exactly.
    pub fn try_next_due_date(&self) -> Option<T> {
        try_calculate_next_due_date(
            self.base_date,
            self.frequency_value,
            self.frequency_unit,
            self.use_business_days,
        )
    }
}

/// Compute the next occurrence after `base_date`.
///
/// Months and years always use the calendar and ignore `use_business_days`.
/// Month arithmetic clamps to the end of the target month, so Jan 31 plus
/// one month is the last day of February. Weeks counted in business days
/// are five business days each. Operating hours and kilometres ignore
/// `frequency_value` and look 30 days ahead.
pub fn calculate_next_due_date<T: CalendarDate>(
    base_date: T,
    frequency_value: u32,
    frequency_unit: FrequencyUnit,
    use_business_days: bool,
) -> T {
    let next = advance(
        base_date,
        frequency_value,
        frequency_unit,
        use_business_days,
        |start, n| Some(add_business_days(start, n)),
    );

    next.unwrap_or_else(|| {
        warn!(
            ?base_date,
            frequency_value,
            unit = frequency_unit.as_str(),
            "next due date falls outside the representable calendar; keeping base date"
        );
        base_date
    })
}

/// Checked form of [`calculate_next_due_date`]: `None` on calendar overflow
/// or when a business-day count exceeds the advance ceiling.
pub fn try_calculate_next_due_date<T: CalendarDate>(
    base_date: T,
    frequency_value: u32,
    frequency_unit: FrequencyUnit,
    use_business_days: bool,
) -> Option<T> {
    advance(
        base_date,
        frequency_value,
        frequency_unit,
        use_business_days,
        try_add_business_days,
    )
}

fn advance<T, F>(
    base_date: T,
    frequency_value: u32,
    frequency_unit: FrequencyUnit,
    use_business_days: bool,
    business: F,
) -> Option<T>
where
    T: CalendarDate,
    F: Fn(T, u32) -> Option<T>,
{
    let days_ahead = |days: u32| {
        if use_business_days {
            business(base_date, days)
        } else {
            base_date.checked_add_calendar_days(u64::from(days))
        }
    };

    match frequency_unit {
        FrequencyUnit::Days => days_ahead(frequency_value),
        FrequencyUnit::Weeks if use_business_days => {
            business(base_date, frequency_value.saturating_mul(BUSINESS_DAYS_PER_WEEK))
        }
        FrequencyUnit::Weeks => base_date.checked_add_calendar_days(u64::from(frequency_value) * 7),
        FrequencyUnit::Months => base_date.checked_add_calendar_months(frequency_value),
        FrequencyUnit::Years => {
            base_date.checked_add_calendar_months(frequency_value.saturating_mul(12))
        }
        FrequencyUnit::OperatingHours | FrequencyUnit::Kilometers => {
            days_ahead(USAGE_BASED_LOOKAHEAD_DAYS)
        }
    }
}
