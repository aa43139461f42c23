//! Yearly maintenance grid projection and schedule status

use chrono::{Datelike, Months, NaiveDate};

use crate::{
    models::{
        dates::parse_date,
        enums::{MaintenanceKind, Period, ScheduleStatus, TaskType},
        maintenance::{CellState, MaintenanceRecord, MaintenanceTask, ScheduleRow, ScheduledTask},
        Equipment, EquipmentStatus,
    },
    query::{normalize_text, Queryable},
    services::compliance::completed_dates,
};

/// A cadence falling due within this many days is "Próximo a vencer"
pub const DUE_SOON_WINDOW_DAYS: i64 = 30;

impl Queryable for ScheduleRow {
    fn search_fields() -> Option<&'static [&'static str]> {
        Some(&["equipmentName", "model", "serial"])
    }
}

/// The two cadences tracked per equipment
struct Cadence {
    period: Period,
    task_type: TaskType,
    record_kind: MaintenanceKind,
}

fn cadences(equipment: &Equipment) -> [Cadence; 2] {
    [
        Cadence {
            period: equipment.data.maintenance_period,
            task_type: TaskType::Preventive,
            record_kind: MaintenanceKind::Preventivo,
        },
        Cadence {
            period: equipment.data.calibration_period,
            task_type: TaskType::Calibration,
            record_kind: MaintenanceKind::Metrologia,
        },
    ]
}

/// Standing of one cadence. The anchor is the latest completed work of the
/// cadence, or the installation date when none was recorded.
fn cadence_status(
    equipment: &Equipment,
    cadence: &Cadence,
    records: &[MaintenanceRecord],
    tasks: &[MaintenanceTask],
    today: NaiveDate,
) -> Option<ScheduleStatus> {
    let months = cadence.period.months()?;

    let anchor = completed_dates(&equipment.id, cadence.task_type, cadence.record_kind, records, tasks)
        .iter()
        .filter_map(|d| parse_date(d))
        .max()
        .or_else(|| parse_date(&equipment.data.installation_date));

    let due = match anchor.and_then(|a| a.checked_add_months(Months::new(months))) {
        Some(due) => due,
        None => return Some(ScheduleStatus::Overdue),
    };

    let status = if today > due {
        ScheduleStatus::Overdue
    } else if (due - today).num_days() <= DUE_SOON_WINDOW_DAYS {
        ScheduleStatus::DueSoon
    } else {
        ScheduleStatus::OnTime
    };
    Some(status)
}

/// Worst standing across the applicable cadences, `A tiempo` when none apply
pub fn schedule_status(
    equipment: &Equipment,
    records: &[MaintenanceRecord],
    tasks: &[MaintenanceTask],
    today: NaiveDate,
) -> ScheduleStatus {
    cadences(equipment)
        .iter()
        .filter_map(|c| cadence_status(equipment, c, records, tasks, today))
        .max()
        .unwrap_or(ScheduleStatus::OnTime)
}

/// Planned occurrences of `months` cadence starting after `installed`, inside `year`
fn planned_dates(installed: NaiveDate, months: u32, year: i32) -> Vec<NaiveDate> {
    let cadence = i64::from(months);
    // Months from the installation month to January of `year`
    let months_to_year = (i64::from(year) - i64::from(installed.year())) * 12 - i64::from(installed.month0());
    let mut step = (months_to_year + cadence - 1).div_euclid(cadence).max(1);

    let mut dates = Vec::new();
    while let Some(date) = u32::try_from(cadence * step)
        .ok()
        .and_then(|offset| installed.checked_add_months(Months::new(offset)))
    {
        if date.year() != year {
            break;
        }
        dates.push(date);
        step += 1;
    }
    dates
}

/// Build the twelve month buckets of one equipment for `year`
pub fn project_row(
    equipment: &Equipment,
    records: &[MaintenanceRecord],
    tasks: &[MaintenanceTask],
    year: i32,
    today: NaiveDate,
) -> ScheduleRow {
    let mut recorded: Vec<Vec<ScheduledTask>> = vec![Vec::new(); 12];
    let mut markers: Vec<Vec<ScheduledTask>> = vec![Vec::new(); 12];
    let mut planned: Vec<Vec<ScheduledTask>> = vec![Vec::new(); 12];

    let mut own_tasks: Vec<(NaiveDate, &MaintenanceTask)> = tasks
        .iter()
        .filter(|t| t.equipment_id == equipment.id)
        .filter_map(|t| parse_date(&t.date).map(|d| (d, t)))
        .filter(|(d, _)| d.year() == year)
        .collect();
    own_tasks.sort_by_key(|(d, _)| *d);

    for (date, task) in own_tasks {
        recorded[date.month0() as usize].push(ScheduledTask {
            task_type: task.task_type,
            date: task.date.clone(),
            completed: task.completed,
            planned: false,
        });
    }

    if equipment.data.status == EquipmentStatus::FueraDeServicio && today.year() == year {
        markers[today.month0() as usize].push(ScheduledTask {
            task_type: TaskType::OutOfService,
            date: today.format("%Y-%m-%d").to_string(),
            completed: false,
            planned: false,
        });
    }

    if let Some(installed) = parse_date(&equipment.data.installation_date) {
        for cadence in cadences(equipment) {
            let Some(months) = cadence.period.months() else {
                continue;
            };
            for date in planned_dates(installed, months, year) {
                let month = date.month0() as usize;
                if recorded[month].iter().any(|t| t.task_type == cadence.task_type) {
                    continue;
                }
                planned[month].push(ScheduledTask {
                    task_type: cadence.task_type,
                    date: date.format("%Y-%m-%d").to_string(),
                    completed: false,
                    planned: true,
                });
            }
        }
    }

    let monthly_tasks: Vec<Vec<ScheduledTask>> = recorded
        .into_iter()
        .zip(markers)
        .zip(planned)
        .map(|((mut bucket, marker), planned)| {
            bucket.extend(marker);
            bucket.extend(planned);
            bucket
        })
        .collect();
    let cells = monthly_tasks.iter().map(|b| CellState::from_tasks(b)).collect();

    ScheduleRow {
        equipment_id: equipment.id.clone(),
        equipment_name: equipment.data.name.clone(),
        manufacturer: equipment.data.manufacturer.clone(),
        model: equipment.data.model.clone(),
        serial: equipment.data.serial.clone(),
        status: schedule_status(equipment, records, tasks, today),
        monthly_tasks,
        cells,
    }
}

/// Rows for every non-retired equipment, sorted by name
pub fn project_schedule(
    equipment: &[Equipment],
    records: &[MaintenanceRecord],
    tasks: &[MaintenanceTask],
    year: i32,
    today: NaiveDate,
) -> Vec<ScheduleRow> {
    let mut rows: Vec<ScheduleRow> = equipment
        .iter()
        .filter(|e| !e.data.status.is_retired())
        .map(|e| project_row(e, records, tasks, year, today))
        .collect();
    rows.sort_by_cached_key(|r| (normalize_text(&r.equipment_name), r.equipment_name.clone()));
    rows
}
