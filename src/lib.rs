pub mod calendar;
pub mod config;
pub mod dashboard;
pub mod due_date;
pub mod frequency;
#[cfg(feature = "http_api")]
pub mod http_api;
pub mod persistence;
pub mod record;
pub mod register;
pub mod status;
pub mod validation;

pub use calendar::{
    CalendarDate, MAX_CALENDAR_ADVANCES, add_business_days, is_business_day,
    try_add_business_days,
};
pub use config::{ConfigError, SchedulerConfig};
pub use dashboard::DashboardSummary;
pub use due_date::{ScheduleSpec, calculate_next_due_date, try_calculate_next_due_date};
pub use frequency::FrequencyUnit;
#[cfg(feature = "sqlite")]
pub use persistence::sqlite::SqliteRegisterStore;
pub use persistence::{
    PersistenceError, RegisterStore, load_register_from_csv, load_register_from_json,
    save_register_to_csv, save_register_to_json,
};
pub use record::MaintenanceRecord;
pub use register::{ClassifiedRecord, MaintenanceRegister, RegisterError};
pub use status::{DEFAULT_DUE_SOON_WINDOW_DAYS, DueStatus, ParseDueStatusError, classify};
pub use validation::ValidationError;
