//! Maintenance models (task records, executed-work log, schedule grid)

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::{
    dates::Dated,
    enums::{MaintenanceKind, ScheduleStatus, TaskType},
};

// ---------------------------------------------------------------------------
// MaintenanceTask
// ---------------------------------------------------------------------------

/// A recorded task on the maintenance calendar
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MaintenanceTask {
    pub id: String,
    pub equipment_id: String,
    #[serde(rename = "type")]
    pub task_type: TaskType,
    /// Task date (YYYY-MM-DD)
    pub date: String,
    #[serde(default)]
    pub completed: bool,
}

impl Dated for MaintenanceTask {
    fn date_str(&self) -> &str {
        &self.date
    }
}

/// Create task request
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateMaintenanceTask {
    #[validate(length(min = 1, message = "Equipment id is required"))]
    pub equipment_id: String,
    #[serde(rename = "type")]
    pub task_type: TaskType,
    /// Task date (YYYY-MM-DD)
    pub date: String,
    #[serde(default)]
    pub completed: bool,
}

// ---------------------------------------------------------------------------
// MaintenanceRecord
// ---------------------------------------------------------------------------

/// Executed maintenance work
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MaintenanceRecord {
    pub id: String,
    pub equipment_id: String,
    /// Execution date (YYYY-MM-DD)
    pub date: String,
    #[serde(rename = "type")]
    pub kind: MaintenanceKind,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub technician_name: String,
}

impl Dated for MaintenanceRecord {
    fn date_str(&self) -> &str {
        &self.date
    }
}

/// Create maintenance record request
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateMaintenanceRecord {
    #[validate(length(min = 1, message = "Equipment id is required"))]
    pub equipment_id: String,
    pub date: String,
    #[serde(rename = "type")]
    pub kind: MaintenanceKind,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub technician_name: String,
}

// ---------------------------------------------------------------------------
// Schedule grid
// ---------------------------------------------------------------------------

/// A task as placed on the yearly grid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledTask {
    #[serde(rename = "type")]
    pub task_type: TaskType,
    pub date: String,
    pub completed: bool,
    /// Projected from the equipment cadence rather than recorded
    pub planned: bool,
}

/// Visual state of one month cell: the first two tasks are drawn, the
/// completed overlay covers all of them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum CellState {
    Empty,
    Single {
        #[serde(rename = "type")]
        task_type: TaskType,
        completed: bool,
    },
    Split {
        first: TaskType,
        second: TaskType,
        completed: bool,
    },
}

impl CellState {
    pub fn from_tasks(tasks: &[ScheduledTask]) -> Self {
        let completed = tasks.iter().any(|t| t.completed);
        match tasks {
            [] => CellState::Empty,
            [only] => CellState::Single {
                task_type: only.task_type,
                completed,
            },
            [first, second, ..] => CellState::Split {
                first: first.task_type,
                second: second.task_type,
                completed,
            },
        }
    }
}

/// One equipment row of the maintenance schedule
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleRow {
    pub equipment_id: String,
    pub equipment_name: String,
    pub manufacturer: String,
    pub model: String,
    pub serial: String,
    pub status: ScheduleStatus,
    /// Twelve month buckets (0 = January) with every task of the month
    pub monthly_tasks: Vec<Vec<ScheduledTask>>,
    /// Twelve cell states, parallel to `monthly_tasks`
    pub cells: Vec<CellState>,
}

/// Maintenance schedule query parameters
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct ScheduleQuery {
    /// Calendar year to project (default: current year)
    pub year: Option<i32>,
    /// Free-text search over name, model and serial
    pub search: Option<String>,
    pub status: Option<String>,
    pub manufacturer: Option<String>,
    pub model: Option<String>,
    /// Month index (0 = January) that must hold at least one task
    pub month: Option<String>,
    pub page: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(task_type: TaskType, completed: bool) -> ScheduledTask {
        ScheduledTask {
            task_type,
            date: "2024-06-10".to_string(),
            completed,
            planned: false,
        }
    }

    #[test]
    fn test_cell_state_from_tasks() {
        assert_eq!(CellState::from_tasks(&[]), CellState::Empty);
        assert_eq!(
            CellState::from_tasks(&[task(TaskType::Preventive, false)]),
            CellState::Single { task_type: TaskType::Preventive, completed: false }
        );
        assert_eq!(
            CellState::from_tasks(&[
                task(TaskType::Preventive, true),
                task(TaskType::Calibration, false)
            ]),
            CellState::Split {
                first: TaskType::Preventive,
                second: TaskType::Calibration,
                completed: true
            }
        );
    }

    #[test]
    fn test_cell_state_serialization() {
        let json = serde_json::to_value(CellState::Single {
            task_type: TaskType::Calibration,
            completed: true,
        })
        .unwrap();
        assert_eq!(json["kind"], "single");
        assert_eq!(json["type"], "Calibración");
        assert_eq!(json["completed"], true);
    }
}
