use crate::due_date::ScheduleSpec;
use crate::frequency::FrequencyUnit;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A vehicle paired with one maintenance program, as handed over by the
/// persistence layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaintenanceRecord {
    pub id: i32,
    pub vehicle: String,
    pub program: String,
    /// Date the interval is measured from: last service, or program start.
    pub base_date: NaiveDate,
    pub frequency_value: u32,
    pub frequency_unit: FrequencyUnit,
    #[serde(default)]
    pub use_business_days: bool,
    /// Stored "next due" field. Recomputed by the register on every upsert.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_due: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl MaintenanceRecord {
    pub fn new(
        id: i32,
        vehicle: impl Into<String>,
        program: impl Into<String>,
        base_date: NaiveDate,
        frequency_value: u32,
        frequency_unit: FrequencyUnit,
    ) -> Self {
        Self {
            id,
            vehicle: vehicle.into(),
            program: program.into(),
            base_date,
            frequency_value,
            frequency_unit,
            use_business_days: false,
            next_due: None,
            notes: None,
        }
    }

    pub fn with_business_days(mut self, use_business_days: bool) -> Self {
        self.use_business_days = use_business_days;
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn schedule_spec(&self) -> ScheduleSpec<NaiveDate> {
        ScheduleSpec {
            base_date: self.base_date,
            frequency_value: self.frequency_value,
            frequency_unit: self.frequency_unit,
            use_business_days: self.use_business_days,
        }
    }

    pub fn compute_next_due(&self) -> NaiveDate {
        self.schedule_spec().next_due_date()
    }

    /// "2 Meses", "500 Kilómetros", with a business-day marker where it applies.
    pub fn frequency_label(&self) -> String {
        let mut label = format!("{} {}", self.frequency_value, self.frequency_unit.label());
        if self.use_business_days && self.frequency_unit.honours_business_days() {
            label.push_str(" (hábiles)");
        }
        label
    }
}
