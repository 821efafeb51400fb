use crate::validation::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::warn;

/// Dimension in which a maintenance interval is expressed.
///
/// Serialized as the snake_case key; deserialization also accepts the
/// Spanish labels and their accent-less spellings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", try_from = "String")]
pub enum FrequencyUnit {
    OperatingHours,
    Kilometers,
    Days,
    Weeks,
    Months,
    Years,
}

impl FrequencyUnit {
    pub const ALL: [FrequencyUnit; 6] = [
        FrequencyUnit::OperatingHours,
        FrequencyUnit::Kilometers,
        FrequencyUnit::Days,
        FrequencyUnit::Weeks,
        FrequencyUnit::Months,
        FrequencyUnit::Years,
    ];

    /// Machine-friendly key, matching the serde representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            FrequencyUnit::OperatingHours => "operating_hours",
            FrequencyUnit::Kilometers => "kilometers",
            FrequencyUnit::Days => "days",
            FrequencyUnit::Weeks => "weeks",
            FrequencyUnit::Months => "months",
            FrequencyUnit::Years => "years",
        }
    }

    /// Label stored by the fleet application for maintenance programs.
    pub fn label(&self) -> &'static str {
        match self {
            FrequencyUnit::OperatingHours => "Horas de operación",
            FrequencyUnit::Kilometers => "Kilómetros",
            FrequencyUnit::Days => "Días",
            FrequencyUnit::Weeks => "Semanas",
            FrequencyUnit::Months => "Meses",
            FrequencyUnit::Years => "Años",
        }
    }

    /// Usage-based units have no calendar meaning of their own.
    pub fn is_usage_based(&self) -> bool {
        matches!(
            self,
            FrequencyUnit::OperatingHours | FrequencyUnit::Kilometers
        )
    }

    /// Business-day counting only changes the result for these units
    /// (and for the usage-based approximation).
    pub fn honours_business_days(&self) -> bool {
        !matches!(self, FrequencyUnit::Months | FrequencyUnit::Years)
    }

    /// Parse a stored label, falling back to `Days` for anything unknown.
    /// Meant for ingesting legacy rows whose unit column was free text.
    pub fn parse_or_days(label: &str) -> Self {
        match label.parse() {
            Ok(unit) => unit,
            Err(_) => {
                warn!(label, "unrecognised frequency unit; treating as days");
                FrequencyUnit::Days
            }
        }
    }
}

impl fmt::Display for FrequencyUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for FrequencyUnit {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        let unit = match normalized.as_str() {
            "horas de operación" | "horas de operacion" | "horas" | "operating_hours"
            | "operating hours" | "hours" => FrequencyUnit::OperatingHours,
            "kilómetros" | "kilometros" | "kilometers" | "km" => FrequencyUnit::Kilometers,
            "días" | "dias" | "days" => FrequencyUnit::Days,
            "semanas" | "weeks" => FrequencyUnit::Weeks,
            "meses" | "months" => FrequencyUnit::Months,
            "años" | "anos" | "years" => FrequencyUnit::Years,
            _ => return Err(ValidationError::UnknownUnit(s.trim().to_string())),
        };
        Ok(unit)
    }
}

impl TryFrom<String> for FrequencyUnit {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
