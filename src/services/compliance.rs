//! Derived compliance figures
//!
//! Everything here is a pure function of the equipment collection (plus the
//! maintenance log for the detail summary). Malformed or missing optional
//! data degrades to `0`, `N/A` or an empty list; nothing returns an error.

use chrono::{Months, NaiveDate};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use utoipa::ToSchema;

use crate::models::{
    dates::{most_recent_date, parse_date, NOT_AVAILABLE},
    enums::{DocumentType, MaintenanceKind, TaskType},
    equipment::Price,
    maintenance::{MaintenanceRecord, MaintenanceTask},
    Equipment, EquipmentStatus,
};

/// Dashboard headline figures
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_equipment: usize,
    pub non_compliant_count: usize,
    pub upcoming_maintenance_count: usize,
    /// Share of active equipment, one decimal, in [0, 100]
    pub uptime_percentage: f64,
}

pub fn dashboard_stats(equipment: &[Equipment], today: NaiveDate) -> DashboardStats {
    let total = equipment.len();
    let count_status = |status: EquipmentStatus| equipment.iter().filter(|e| e.data.status == status).count();

    let one_year_ago = today.checked_sub_months(Months::new(12));
    let upcoming = match one_year_ago {
        Some(cutoff) => equipment
            .iter()
            .filter_map(|e| parse_date(&e.data.installation_date))
            .filter(|installed| *installed < cutoff)
            .count(),
        None => 0,
    };

    DashboardStats {
        total_equipment: total,
        non_compliant_count: count_status(EquipmentStatus::FueraDeServicio),
        upcoming_maintenance_count: upcoming,
        uptime_percentage: uptime_percentage(count_status(EquipmentStatus::Activo), total),
    }
}

fn uptime_percentage(active: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let ratio = active as f64 / total as f64 * 100.0;
    (ratio * 10.0).round() / 10.0
}

/// Attachment state of one required documentation kind
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct DocumentationStatus {
    #[serde(rename = "type")]
    pub doc_type: DocumentType,
    pub label: String,
    pub attached: bool,
}

/// One entry per required kind, in display order
pub fn required_documentation_completeness(equipment: &Equipment) -> Vec<DocumentationStatus> {
    equipment
        .data
        .required_documentation
        .required()
        .map(|doc_type| {
            let custom = &equipment.data.other_documentation_detail;
            let label = if doc_type == DocumentType::Other && !custom.trim().is_empty() {
                custom.clone()
            } else {
                doc_type.label().to_string()
            };
            DocumentationStatus {
                doc_type,
                label,
                attached: equipment.document(doc_type).is_some(),
            }
        })
        .collect()
}

/// "COP 1.234.567" style price, `N/A` when the amount is unset
pub fn format_price(price: &Price) -> String {
    match price.amount {
        Some(amount) => format!("{} {}", price.currency.as_str(), format_es_co(amount)),
        None => NOT_AVAILABLE.to_string(),
    }
}

/// es-CO grouping: "." for thousands, "," for decimals, at most 3 decimals
fn format_es_co(amount: Decimal) -> String {
    let rounded = amount
        .round_dp_with_strategy(3, RoundingStrategy::MidpointAwayFromZero)
        .normalize();
    let text = rounded.abs().to_string();
    let (integer, fraction) = match text.split_once('.') {
        Some((integer, fraction)) => (integer, Some(fraction)),
        None => (text.as_str(), None),
    };

    let digits: Vec<char> = integer.chars().collect();
    let mut grouped = String::new();
    for (i, digit) in digits.iter().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(*digit);
    }
    if let Some(fraction) = fraction {
        grouped.push(',');
        grouped.push_str(fraction);
    }
    if rounded.is_sign_negative() && !rounded.is_zero() {
        grouped.insert(0, '-');
    }
    grouped
}

/// Figures shown on the equipment detail page
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EquipmentSummary {
    pub id: String,
    pub name: String,
    /// "Clase IIA" style label, or "NO ESPECIFICADO"
    pub risk_label: String,
    pub formatted_price: String,
    pub last_preventive_maintenance: String,
    pub last_calibration: String,
    pub documentation: Vec<DocumentationStatus>,
}

pub const RISK_NOT_SPECIFIED: &str = "NO ESPECIFICADO";

pub fn risk_label(equipment: &Equipment) -> String {
    equipment
        .data
        .risk
        .map(|r| r.label().to_string())
        .unwrap_or_else(|| RISK_NOT_SPECIFIED.to_string())
}

/// Dates of completed work of one cadence for `equipment_id`
pub fn completed_dates(
    equipment_id: &str,
    task_type: TaskType,
    record_kind: MaintenanceKind,
    records: &[MaintenanceRecord],
    tasks: &[MaintenanceTask],
) -> Vec<String> {
    let from_records = records
        .iter()
        .filter(|r| r.equipment_id == equipment_id && r.kind == record_kind)
        .map(|r| r.date.clone());
    let from_tasks = tasks
        .iter()
        .filter(|t| t.equipment_id == equipment_id && t.task_type == task_type && t.completed)
        .map(|t| t.date.clone());
    from_records.chain(from_tasks).collect()
}

pub fn equipment_summary(
    equipment: &Equipment,
    records: &[MaintenanceRecord],
    tasks: &[MaintenanceTask],
) -> EquipmentSummary {
    let preventive = completed_dates(&equipment.id, TaskType::Preventive, MaintenanceKind::Preventivo, records, tasks);
    let calibration = completed_dates(&equipment.id, TaskType::Calibration, MaintenanceKind::Metrologia, records, tasks);

    EquipmentSummary {
        id: equipment.id.clone(),
        name: equipment.data.name.clone(),
        risk_label: risk_label(equipment),
        formatted_price: format_price(&equipment.data.price),
        last_preventive_maintenance: most_recent_date(&preventive),
        last_calibration: most_recent_date(&calibration),
        documentation: required_documentation_completeness(equipment),
    }
}
