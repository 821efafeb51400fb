use super::{PersistenceError, PersistenceResult};
use crate::frequency::FrequencyUnit;
use crate::record::MaintenanceRecord;
use crate::register::MaintenanceRegister;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::Path;

#[derive(Serialize, Deserialize)]
struct RegisterSnapshot {
    records: Vec<MaintenanceRecord>,
}

impl RegisterSnapshot {
    fn from_register(register: &MaintenanceRegister) -> PersistenceResult<Self> {
        let records = register.records().to_vec();
        super::validate_records(&records)?;
        Ok(Self { records })
    }

    fn into_register(self) -> PersistenceResult<MaintenanceRegister> {
        super::validate_records(&self.records)?;
        Ok(MaintenanceRegister::from_records(self.records)?)
    }
}

pub fn save_register_to_json<P: AsRef<Path>>(
    register: &MaintenanceRegister,
    path: P,
) -> PersistenceResult<()> {
    let snapshot = RegisterSnapshot::from_register(register)?;
    let file = File::create(path)?;
    serde_json::to_writer_pretty(file, &snapshot)?;
    Ok(())
}

pub fn load_register_from_json<P: AsRef<Path>>(path: P) -> PersistenceResult<MaintenanceRegister> {
    let file = File::open(path)?;
    let snapshot: RegisterSnapshot = serde_json::from_reader(file)?;
    snapshot.into_register()
}

#[derive(Default, Serialize, Deserialize)]
struct RecordCsvRow {
    id: i32,
    vehicle: String,
    program: String,
    base_date: String,
    frequency_value: String,
    frequency_unit: String,
    use_business_days: String,
    #[serde(default)]
    next_due: String,
    #[serde(default)]
    notes: String,
}

impl From<&MaintenanceRecord> for RecordCsvRow {
    fn from(record: &MaintenanceRecord) -> Self {
        Self {
            id: record.id,
            vehicle: record.vehicle.clone(),
            program: record.program.clone(),
            base_date: format_date(Some(record.base_date)),
            frequency_value: record.frequency_value.to_string(),
            frequency_unit: record.frequency_unit.label().to_string(),
            use_business_days: record.use_business_days.to_string(),
            next_due: format_date(record.next_due),
            notes: record.notes.clone().unwrap_or_default(),
        }
    }
}

impl RecordCsvRow {
    fn into_record(self) -> PersistenceResult<MaintenanceRecord> {
        let base_date = parse_date(&self.base_date)?.ok_or_else(|| {
            PersistenceError::InvalidData(format!("record {} is missing base_date", self.id))
        })?;
        let frequency_value: i64 = self.frequency_value.trim().parse().map_err(|e| {
            PersistenceError::InvalidData(format!(
                "invalid frequency_value '{}': {e}",
                self.frequency_value
            ))
        })?;
        let frequency_value = crate::validation::validate_frequency_value(frequency_value)?;
        let frequency_unit: FrequencyUnit = self.frequency_unit.parse()?;

        // `next_due` is derived; the register recomputes it on insert.
        let mut record = MaintenanceRecord::new(
            self.id,
            self.vehicle,
            self.program,
            base_date,
            frequency_value,
            frequency_unit,
        )
        .with_business_days(parse_bool(&self.use_business_days)?.unwrap_or(false));
        if !self.notes.trim().is_empty() {
            record.notes = Some(self.notes);
        }
        Ok(record)
    }
}

pub fn save_register_to_csv<P: AsRef<Path>>(
    register: &MaintenanceRegister,
    path: P,
) -> PersistenceResult<()> {
    super::validate_records(register.records())?;
    let file = File::create(path)?;
    let mut writer = csv::Writer::from_writer(file);
    for record in register.records() {
        writer.serialize(RecordCsvRow::from(record))?;
    }
    writer.flush()?;
    Ok(())
}

/// Load a register from CSV. Stored `next_due` values are recomputed.
pub fn load_register_from_csv<P: AsRef<Path>>(path: P) -> PersistenceResult<MaintenanceRegister> {
    let file = File::open(path)?;
    let mut reader = csv::Reader::from_reader(file);
    let mut records = Vec::new();
    for row in reader.deserialize::<RecordCsvRow>() {
        records.push(row?.into_record()?);
    }
    super::validate_records(&records)?;
    Ok(MaintenanceRegister::from_records(records)?)
}

fn format_date(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

fn parse_date(input: &str) -> PersistenceResult<Option<NaiveDate>> {
    if input.trim().is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d")
        .map(Some)
        .map_err(|e| PersistenceError::InvalidData(format!("invalid date '{input}': {e}")))
}

fn parse_bool(input: &str) -> PersistenceResult<Option<bool>> {
    if input.trim().is_empty() {
        return Ok(None);
    }
    match input.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "si" | "sí" => Ok(Some(true)),
        "false" | "0" | "no" => Ok(Some(false)),
        other => Err(PersistenceError::InvalidData(format!(
            "invalid boolean '{other}'"
        ))),
    }
}
