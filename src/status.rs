use crate::calendar::CalendarDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Default lookahead used by dashboards to flag upcoming obligations.
pub const DEFAULT_DUE_SOON_WINDOW_DAYS: u32 = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DueStatus {
    Overdue,
    DueSoon,
    Pending,
}

impl DueStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DueStatus::Overdue => "overdue",
            DueStatus::DueSoon => "due_soon",
            DueStatus::Pending => "pending",
        }
    }

    /// Overdue and due-soon items belong on the critical alert list.
    pub fn is_alert(&self) -> bool {
        !matches!(self, DueStatus::Pending)
    }
}

impl fmt::Display for DueStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown due status '{0}' (expected overdue, due_soon or pending)")]
pub struct ParseDueStatusError(pub String);

impl FromStr for DueStatus {
    type Err = ParseDueStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "overdue" => Ok(DueStatus::Overdue),
            "due_soon" => Ok(DueStatus::DueSoon),
            "pending" => Ok(DueStatus::Pending),
            other => Err(ParseDueStatusError(other.to_string())),
        }
    }
}

/// Bucket `due_date` relative to `now`.
///
/// Both ends of the due-soon window are inclusive: a due date exactly
/// `due_soon_window_days` days out is still due soon.
pub fn classify<T: CalendarDate>(due_date: T, now: T, due_soon_window_days: u32) -> DueStatus {
    if due_date < now {
        return DueStatus::Overdue;
    }
    match now.checked_add_calendar_days(u64::from(due_soon_window_days)) {
        Some(horizon) if due_date > horizon => DueStatus::Pending,
        _ => DueStatus::DueSoon,
    }
}
