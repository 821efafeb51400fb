use crate::register::ClassifiedRecord;
use crate::status::DueStatus;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardSummary {
    pub as_of: NaiveDate,
    pub window_days: u32,
    pub total: usize,
    pub pending: usize,
    pub due_soon: usize,
    pub overdue: usize,
    /// Overdue first, then due soon; earliest due date first within each.
    pub critical_alerts: Vec<ClassifiedRecord>,
}

impl DashboardSummary {
    pub fn from_classified(
        classified: Vec<ClassifiedRecord>,
        as_of: NaiveDate,
        window_days: u32,
    ) -> Self {
        let total = classified.len();
        let mut pending = 0;
        let mut due_soon = 0;
        let mut overdue = 0;
        for item in &classified {
            match item.status {
                DueStatus::Pending => pending += 1,
                DueStatus::DueSoon => due_soon += 1,
                DueStatus::Overdue => overdue += 1,
            }
        }

        let mut critical_alerts: Vec<ClassifiedRecord> = classified
            .into_iter()
            .filter(|item| item.status.is_alert())
            .collect();
        critical_alerts.sort_by_key(|item| (item.status, item.next_due, item.record.id));

        Self {
            as_of,
            window_days,
            total,
            pending,
            due_soon,
            overdue,
            critical_alerts,
        }
    }

    pub fn to_cli_summary(&self) -> String {
        let mut parts = Vec::new();
        parts.push(format!("records={}", self.total));
        parts.push(format!("overdue={}", self.overdue));
        parts.push(format!("due_soon={}", self.due_soon));
        parts.push(format!("pending={}", self.pending));
        if let Some(first) = self.critical_alerts.first() {
            parts.push(format!("next={}@{}", first.record.id, first.next_due));
        }
        parts.join(", ")
    }
}
