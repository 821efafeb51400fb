use crate::record::MaintenanceRecord;
use crate::register::{MaintenanceRegister, RegisterError};
use crate::validation::{self, ValidationError};
use serde_json::Error as SerdeJsonError;
use std::error::Error;
use std::fmt;
use std::io;

#[derive(Debug)]
pub enum PersistenceError {
    Serialization(SerdeJsonError),
    Io(io::Error),
    #[cfg(feature = "sqlite")]
    Sqlite(rusqlite::Error),
    Csv(csv::Error),
    InvalidData(String),
    Validation(ValidationError),
}

// Hand-written so the `sqlite` variant can stay behind its feature.
impl fmt::Display for PersistenceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PersistenceError::Serialization(err) => write!(f, "serialization error: {err}"),
            PersistenceError::Io(err) => write!(f, "io error: {err}"),
            #[cfg(feature = "sqlite")]
            PersistenceError::Sqlite(err) => write!(f, "sqlite error: {err}"),
            PersistenceError::Csv(err) => write!(f, "csv error: {err}"),
            PersistenceError::InvalidData(msg) => write!(f, "invalid data: {msg}"),
            PersistenceError::Validation(err) => write!(f, "invalid record: {err}"),
        }
    }
}

impl Error for PersistenceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            PersistenceError::Serialization(err) => Some(err),
            PersistenceError::Io(err) => Some(err),
            #[cfg(feature = "sqlite")]
            PersistenceError::Sqlite(err) => Some(err),
            PersistenceError::Csv(err) => Some(err),
            PersistenceError::InvalidData(_) => None,
            PersistenceError::Validation(err) => Some(err),
        }
    }
}

impl From<SerdeJsonError> for PersistenceError {
    fn from(value: SerdeJsonError) -> Self {
        Self::Serialization(value)
    }
}

impl From<io::Error> for PersistenceError {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

#[cfg(feature = "sqlite")]
impl From<rusqlite::Error> for PersistenceError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

impl From<csv::Error> for PersistenceError {
    fn from(value: csv::Error) -> Self {
        Self::Csv(value)
    }
}

impl From<ValidationError> for PersistenceError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<RegisterError> for PersistenceError {
    fn from(value: RegisterError) -> Self {
        match value {
            RegisterError::Validation(err) => Self::Validation(err),
            RegisterError::NotFound(id) => Self::InvalidData(format!("record {id} not found")),
        }
    }
}

pub type PersistenceResult<T> = Result<T, PersistenceError>;

pub trait RegisterStore {
    fn save_register(&self, register: &MaintenanceRegister) -> PersistenceResult<()>;
    fn load_register(&self) -> PersistenceResult<Option<MaintenanceRegister>>;
}

pub fn validate_records(records: &[MaintenanceRecord]) -> PersistenceResult<()> {
    validation::validate_register(records)?;
    Ok(())
}

pub mod file;
#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use file::{
    load_register_from_csv, load_register_from_json, save_register_to_csv, save_register_to_json,
};
