use crate::dashboard::DashboardSummary;
use crate::record::MaintenanceRecord;
use crate::status::{DueStatus, classify};
use crate::validation::{self, ValidationError};
use chrono::NaiveDate;
use polars::prelude::*;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegisterError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("record {0} not found")]
    NotFound(i32),
}

/// A record together with its computed due date and status as of some `now`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifiedRecord {
    pub record: MaintenanceRecord,
    pub next_due: NaiveDate,
    pub status: DueStatus,
    /// Negative once the due date has passed.
    pub days_until_due: i64,
}

impl ClassifiedRecord {
    pub fn classify(record: &MaintenanceRecord, now: NaiveDate, window_days: u32) -> Self {
        let next_due = record
            .next_due
            .unwrap_or_else(|| record.compute_next_due());
        Self {
            record: record.clone(),
            next_due,
            status: classify(next_due, now, window_days),
            days_until_due: (next_due - now).num_days(),
        }
    }
}

/// Vehicle/program pairings kept in id order, each carrying an up-to-date
/// next-due date.
#[derive(Debug, Clone, Default)]
pub struct MaintenanceRegister {
    records: Vec<MaintenanceRecord>,
}

impl MaintenanceRegister {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records<I>(records: I) -> Result<Self, RegisterError>
    where
        I: IntoIterator<Item = MaintenanceRecord>,
    {
        let records: Vec<MaintenanceRecord> = records.into_iter().collect();
        validation::validate_register(&records)?;
        let mut register = Self::new();
        for record in records {
            register.upsert(record)?;
        }
        Ok(register)
    }

    pub fn records(&self) -> &[MaintenanceRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn next_id(&self) -> i32 {
        self.records.last().map(|r| r.id + 1).unwrap_or(1)
    }

    pub fn get(&self, id: i32) -> Option<&MaintenanceRecord> {
        self.position(id).ok().map(|idx| &self.records[idx])
    }

    /// Insert or replace a record, refreshing its stored next-due date.
    pub fn upsert(
        &mut self,
        mut record: MaintenanceRecord,
    ) -> Result<&MaintenanceRecord, RegisterError> {
        validation::validate_record(&record)?;
        record.next_due = Some(record.compute_next_due());
        debug!(
            id = record.id,
            vehicle = %record.vehicle,
            next_due = ?record.next_due,
            "upserting maintenance record"
        );
        let idx = match self.position(record.id) {
            Ok(idx) => {
                self.records[idx] = record;
                idx
            }
            Err(idx) => {
                self.records.insert(idx, record);
                idx
            }
        };
        Ok(&self.records[idx])
    }

    /// Replace an existing record; fails if the id is unknown.
    pub fn update(
        &mut self,
        record: MaintenanceRecord,
    ) -> Result<&MaintenanceRecord, RegisterError> {
        if self.position(record.id).is_err() {
            return Err(RegisterError::NotFound(record.id));
        }
        self.upsert(record)
    }

    pub fn remove(&mut self, id: i32) -> bool {
        match self.position(id) {
            Ok(idx) => {
                self.records.remove(idx);
                true
            }
            Err(_) => false,
        }
    }

    pub fn recompute_all(&mut self) {
        for record in &mut self.records {
            record.next_due = Some(record.compute_next_due());
        }
        debug!(records = self.records.len(), "recomputed next due dates");
    }

    /// Classify every record against one shared `now`.
    pub fn classify_all(&self, now: NaiveDate, window_days: u32) -> Vec<ClassifiedRecord> {
        debug!(records = self.records.len(), %now, window_days, "classifying register");
        self.records
            .par_iter()
            .map(|record| ClassifiedRecord::classify(record, now, window_days))
            .collect()
    }

    pub fn dashboard(&self, now: NaiveDate, window_days: u32) -> DashboardSummary {
        DashboardSummary::from_classified(self.classify_all(now, window_days), now, window_days)
    }

    /// Tabular view of the register as of `now`.
    pub fn dataframe(&self, now: NaiveDate, window_days: u32) -> PolarsResult<DataFrame> {
        let classified = self.classify_all(now, window_days);

        let ids: Vec<i32> = classified.iter().map(|c| c.record.id).collect();
        let vehicles: Vec<&str> = classified.iter().map(|c| c.record.vehicle.as_str()).collect();
        let programs: Vec<&str> = classified.iter().map(|c| c.record.program.as_str()).collect();
        let frequencies: Vec<String> = classified
            .iter()
            .map(|c| c.record.frequency_label())
            .collect();
        let business: Vec<bool> = classified
            .iter()
            .map(|c| c.record.use_business_days)
            .collect();
        let base_dates: Vec<i32> = classified
            .iter()
            .map(|c| date_to_i32(c.record.base_date))
            .collect();
        let next_dues: Vec<i32> = classified.iter().map(|c| date_to_i32(c.next_due)).collect();
        let statuses: Vec<&str> = classified.iter().map(|c| c.status.as_str()).collect();
        let days_until: Vec<i64> = classified.iter().map(|c| c.days_until_due).collect();

        let columns = vec![
            Series::new(PlSmallStr::from_static("id"), ids).into_column(),
            Series::new(PlSmallStr::from_static("vehicle"), vehicles).into_column(),
            Series::new(PlSmallStr::from_static("program"), programs).into_column(),
            Series::new(PlSmallStr::from_static("frequency"), frequencies).into_column(),
            Series::new(PlSmallStr::from_static("business_days"), business).into_column(),
            Series::new(PlSmallStr::from_static("base_date"), base_dates)
                .cast(&DataType::Date)?
                .into_column(),
            Series::new(PlSmallStr::from_static("next_due"), next_dues)
                .cast(&DataType::Date)?
                .into_column(),
            Series::new(PlSmallStr::from_static("status"), statuses).into_column(),
            Series::new(PlSmallStr::from_static("days_until_due"), days_until).into_column(),
        ];
        DataFrame::new(columns)
    }

    fn position(&self, id: i32) -> Result<usize, usize> {
        self.records.binary_search_by_key(&id, |r| r.id)
    }
}

fn epoch() -> NaiveDate {
    NaiveDate::default()
}

fn date_to_i32(date: NaiveDate) -> i32 {
    (date - epoch()).num_days() as i32
}
