use crate::record::MaintenanceRecord;
use std::collections::HashSet;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("frequency value must be at least 1 (got {0})")]
    NonPositiveFrequency(i64),
    #[error("frequency value {0} is out of range")]
    FrequencyOutOfRange(i64),
    #[error("unknown frequency unit '{0}'")]
    UnknownUnit(String),
    #[error("record {record} requires a non-empty {field}")]
    MissingField { record: i32, field: &'static str },
    #[error("duplicate record id {0}")]
    DuplicateRecord(i32),
}

/// Reject non-positive or oversized frequencies before they reach the scheduler.
pub fn validate_frequency_value(value: i64) -> Result<u32, ValidationError> {
    if value < 1 {
        return Err(ValidationError::NonPositiveFrequency(value));
    }
    u32::try_from(value).map_err(|_| ValidationError::FrequencyOutOfRange(value))
}

pub fn validate_record(record: &MaintenanceRecord) -> Result<(), ValidationError> {
    if record.vehicle.trim().is_empty() {
        return Err(ValidationError::MissingField {
            record: record.id,
            field: "vehicle",
        });
    }
    if record.program.trim().is_empty() {
        return Err(ValidationError::MissingField {
            record: record.id,
            field: "program",
        });
    }
    validate_frequency_value(i64::from(record.frequency_value))?;
    Ok(())
}

pub fn validate_register(records: &[MaintenanceRecord]) -> Result<(), ValidationError> {
    let mut seen_ids = HashSet::with_capacity(records.len());
    for record in records {
        if !seen_ids.insert(record.id) {
            return Err(ValidationError::DuplicateRecord(record.id));
        }
        validate_record(record)?;
    }
    Ok(())
}
