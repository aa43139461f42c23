//! Maintenance calendar tasks, executed-work log and the yearly schedule view

use std::sync::Arc;

use chrono::{Datelike, NaiveDate};
use indexmap::IndexMap;
use snowflaked::sync::Generator;
use tokio::sync::RwLock;

use crate::{
    error::{AppError, AppResult},
    models::{
        dates::parse_date,
        maintenance::{
            CreateMaintenanceRecord, CreateMaintenanceTask, MaintenanceRecord, MaintenanceTask,
            ScheduleQuery, ScheduleRow,
        },
    },
    query::{FilterSet, ListView, Page},
    repository::{keys, Repository},
    seed,
    services::{equipment::EquipmentService, schedule},
};

static GENERATOR: Generator = Generator::new(1);

/// Schedule filter fields, in selector order
pub const SCHEDULE_FILTER_FIELDS: [&str; 3] = ["manufacturer", "model", "status"];

#[derive(Clone)]
pub struct MaintenanceService {
    repository: Repository,
    equipment: EquipmentService,
    tasks: Arc<RwLock<Vec<MaintenanceTask>>>,
    records: Arc<RwLock<Vec<MaintenanceRecord>>>,
}

impl MaintenanceService {
    pub async fn load(repository: Repository, equipment: EquipmentService) -> Self {
        let (tasks, seeded) = repository
            .load::<Vec<MaintenanceTask>>(keys::MAINTENANCE_TASKS)
            .await
            .or_seed(keys::MAINTENANCE_TASKS, seed::maintenance_tasks);
        if seeded {
            repository.persist(keys::MAINTENANCE_TASKS, &tasks).await;
        }

        let (records, seeded) = repository
            .load::<Vec<MaintenanceRecord>>(keys::MAINTENANCE_RECORDS)
            .await
            .or_seed(keys::MAINTENANCE_RECORDS, seed::maintenance_records);
        if seeded {
            repository.persist(keys::MAINTENANCE_RECORDS, &records).await;
        }

        tracing::info!(
            tasks = tasks.len(),
            records = records.len(),
            "Maintenance data loaded"
        );

        Self {
            repository,
            equipment,
            tasks: Arc::new(RwLock::new(tasks)),
            records: Arc::new(RwLock::new(records)),
        }
    }

    async fn ensure_equipment(&self, equipment_id: &str) -> AppResult<()> {
        self.equipment.get_by_id(equipment_id).await.map(|_| ())
    }

    // Tasks

    pub async fn tasks(&self) -> Vec<MaintenanceTask> {
        self.tasks.read().await.clone()
    }

    pub async fn create_task(&self, data: CreateMaintenanceTask) -> AppResult<MaintenanceTask> {
        if parse_date(&data.date).is_none() {
            return Err(AppError::Validation(format!("Invalid task date: {}", data.date)));
        }
        self.ensure_equipment(&data.equipment_id).await?;

        let task = MaintenanceTask {
            id: format!("task_{}", GENERATOR.generate::<u64>()),
            equipment_id: data.equipment_id,
            task_type: data.task_type,
            date: data.date,
            completed: data.completed,
        };

        let mut tasks = self.tasks.write().await;
        tasks.push(task.clone());
        self.repository.persist(keys::MAINTENANCE_TASKS, &*tasks).await;

        tracing::info!(id = %task.id, equipment_id = %task.equipment_id, "Maintenance task created");
        Ok(task)
    }

    pub async fn complete_task(&self, id: &str) -> AppResult<MaintenanceTask> {
        let mut tasks = self.tasks.write().await;
        let task = tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| AppError::NotFound(format!("Maintenance task {} not found", id)))?;
        task.completed = true;
        let completed = task.clone();
        self.repository.persist(keys::MAINTENANCE_TASKS, &*tasks).await;
        Ok(completed)
    }

    pub async fn delete_task(&self, id: &str) -> AppResult<()> {
        let mut tasks = self.tasks.write().await;
        let before = tasks.len();
        tasks.retain(|t| t.id != id);
        if tasks.len() == before {
            return Err(AppError::NotFound(format!("Maintenance task {} not found", id)));
        }
        self.repository.persist(keys::MAINTENANCE_TASKS, &*tasks).await;
        Ok(())
    }

    // Records

    /// Maintenance log, optionally for one equipment, newest first
    pub async fn records(&self, equipment_id: Option<&str>) -> Vec<MaintenanceRecord> {
        let mut records: Vec<MaintenanceRecord> = self
            .records
            .read()
            .await
            .iter()
            .filter(|r| equipment_id.map_or(true, |id| r.equipment_id == id))
            .cloned()
            .collect();
        records.sort_by(|a, b| parse_date(&b.date).cmp(&parse_date(&a.date)));
        records
    }

    pub async fn create_record(&self, data: CreateMaintenanceRecord) -> AppResult<MaintenanceRecord> {
        if parse_date(&data.date).is_none() {
            return Err(AppError::Validation(format!("Invalid record date: {}", data.date)));
        }
        self.ensure_equipment(&data.equipment_id).await?;

        let record = MaintenanceRecord {
            id: format!("maint_{}", GENERATOR.generate::<u64>()),
            equipment_id: data.equipment_id,
            date: data.date,
            kind: data.kind,
            description: data.description,
            technician_name: data.technician_name,
        };

        let mut records = self.records.write().await;
        records.push(record.clone());
        self.repository.persist(keys::MAINTENANCE_RECORDS, &*records).await;

        tracing::info!(id = %record.id, equipment_id = %record.equipment_id, "Maintenance record created");
        Ok(record)
    }

    // Schedule

    /// Projected rows for `year` before any search or filter
    pub async fn schedule_rows(&self, year: i32, today: NaiveDate) -> Vec<ScheduleRow> {
        let equipment = self.equipment.all().await;
        let records = self.records.read().await;
        let tasks = self.tasks.read().await;
        schedule::project_schedule(&equipment, &records, &tasks, year, today)
    }

    /// Rows matching the query (month, search and filters), unpaginated,
    /// and the list view that selected them. An unknown month is ignored.
    pub async fn select_schedule(&self, query: &ScheduleQuery, today: NaiveDate) -> (Vec<ScheduleRow>, ListView) {
        let year = query.year.unwrap_or_else(|| today.year());
        let mut rows = self.schedule_rows(year, today).await;

        let month = query
            .month
            .as_deref()
            .and_then(|m| m.parse::<usize>().ok())
            .filter(|m| *m < 12);
        if let Some(index) = month {
            rows.retain(|r| !r.monthly_tasks[index].is_empty());
        }

        let mut view = ListView::new(schedule_filters());
        view.set_search(query.search.as_deref().unwrap_or_default());
        view.set_filter("manufacturer", query.manufacturer.as_deref().unwrap_or_default());
        view.set_filter("model", query.model.as_deref().unwrap_or_default());
        view.set_filter("status", query.status.as_deref().unwrap_or_default());

        let selected = view.select(&rows).into_iter().cloned().collect();
        (selected, view)
    }

    pub async fn schedule_page(&self, query: &ScheduleQuery, today: NaiveDate) -> Page<ScheduleRow> {
        let (rows, mut view) = self.select_schedule(query, today).await;
        if let Some(page) = query.page {
            // Out-of-range pages keep page 1
            view.go_to_page(&rows, usize::try_from(page).unwrap_or(0));
        }
        view.paginate(&rows)
    }

    /// Option sets over the projected year; models narrowed by manufacturer
    pub async fn schedule_options(
        &self,
        year: i32,
        manufacturer: Option<&str>,
        today: NaiveDate,
    ) -> IndexMap<String, Vec<String>> {
        let rows = self.schedule_rows(year, today).await;
        let mut filters = schedule_filters();
        filters.set("manufacturer", manufacturer.unwrap_or_default());
        filters.options(&rows, &SCHEDULE_FILTER_FIELDS)
    }
}

pub fn schedule_filters() -> FilterSet {
    FilterSet::new().with_dependency("manufacturer", "model")
}
