//! Spreadsheet export of the inventory and schedule views

use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    models::{maintenance::ScheduleRow, Equipment},
    services::compliance::risk_label,
};

pub const INVENTORY_FILE_NAME: &str = "inventario_equipos.csv";
pub const SCHEDULE_FILE_NAME: &str = "cronograma_mantenimiento.csv";

const MONTH_ABBREVIATIONS: [&str; 12] = [
    "Ene", "Feb", "Mar", "Abr", "May", "Jun", "Jul", "Ago", "Sep", "Oct", "Nov", "Dic",
];

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct Column {
    pub header: String,
    /// Character width: longest of header and values, plus 2
    pub width: usize,
}

/// A named table with fixed columns, one row per record
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Sheet {
    pub name: String,
    pub columns: Vec<Column>,
    pub rows: Vec<Vec<String>>,
}

impl Sheet {
    /// Build a sheet, sizing every column to its longest value
    pub fn new(name: &str, headers: &[&str], rows: Vec<Vec<String>>) -> Self {
        let columns = headers
            .iter()
            .enumerate()
            .map(|(i, header)| {
                let longest = rows
                    .iter()
                    .filter_map(|row| row.get(i))
                    .map(|value| value.chars().count())
                    .max()
                    .unwrap_or(0);
                Column {
                    header: header.to_string(),
                    width: header.chars().count().max(longest) + 2,
                }
            })
            .collect();

        Self {
            name: name.to_string(),
            columns,
            rows,
        }
    }

    pub fn to_csv(&self) -> String {
        let mut output = String::new();

        // Header row
        let headers: Vec<String> = self.columns.iter().map(|c| escape_csv(&c.header)).collect();
        output.push_str(&headers.join(","));
        output.push('\n');

        // Data rows
        for row in &self.rows {
            let values: Vec<String> = row.iter().map(|v| escape_csv(v)).collect();
            output.push_str(&values.join(","));
            output.push('\n');
        }
        output
    }
}

fn escape_csv(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

pub fn inventory_sheet(equipment: &[Equipment]) -> Sheet {
    let rows = equipment
        .iter()
        .map(|e| {
            vec![
                e.id.clone(),
                e.data.name.clone(),
                e.data.manufacturer.clone(),
                e.data.model.clone(),
                e.data.serial.clone(),
                e.data.invima.clone(),
                risk_label(e),
                e.data.status.to_string(),
                e.data.sede.clone(),
                e.data.location.clone(),
                e.data.installation_date.clone(),
            ]
        })
        .collect();

    Sheet::new(
        "Inventario",
        &[
            "ID Interno",
            "Equipo",
            "Marca",
            "Modelo",
            "Serie",
            "Registro Sanitario",
            "Riesgo",
            "Estado",
            "Sede",
            "Ubicación",
            "Fecha de Instalación",
        ],
        rows,
    )
}

pub fn schedule_sheet(schedule: &[ScheduleRow]) -> Sheet {
    let rows = schedule
        .iter()
        .map(|row| {
            let mut values = vec![
                row.equipment_name.clone(),
                row.manufacturer.clone(),
                row.model.clone(),
                row.serial.clone(),
                row.status.as_str().to_string(),
            ];
            values.extend(row.monthly_tasks.iter().map(|tasks| {
                tasks
                    .iter()
                    .map(|t| {
                        let done = if t.completed { " (Realizado)" } else { "" };
                        format!("{}{}", t.task_type.as_str(), done)
                    })
                    .collect::<Vec<_>>()
                    .join("; ")
            }));
            values
        })
        .collect();

    let mut headers = vec!["Equipo", "Marca", "Modelo", "Serie", "Estado Cronograma"];
    headers.extend(MONTH_ABBREVIATIONS);
    Sheet::new("Cronograma", &headers, rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        enums::{ScheduleStatus, TaskType},
        maintenance::{CellState, ScheduledTask},
        EquipmentData,
    };

    #[test]
    fn test_column_widths() {
        let sheet = Sheet::new(
            "Test",
            &["Equipo", "Serie"],
            vec![
                vec!["Desfibrilador".to_string(), "S1".to_string()],
                vec!["Bomba".to_string(), "".to_string()],
            ],
        );
        assert_eq!(sheet.columns[0].width, "Desfibrilador".len() + 2);
        assert_eq!(sheet.columns[1].width, "Serie".len() + 2);
    }

    #[test]
    fn test_csv_escaping() {
        let sheet = Sheet::new(
            "Test",
            &["Ubicación"],
            vec![
                vec!["Piso 3, Hab 301".to_string()],
                vec!["Sala \"A\"".to_string()],
                vec!["Torre\rNorte".to_string()],
            ],
        );
        assert_eq!(
            sheet.to_csv(),
            "Ubicación\n\"Piso 3, Hab 301\"\n\"Sala \"\"A\"\"\"\n\"Torre\rNorte\"\n"
        );
    }

    #[test]
    fn test_inventory_sheet_unspecified_risk() {
        let equipment = Equipment {
            id: "EQP-1".to_string(),
            data: EquipmentData {
                name: "Monitor".to_string(),
                ..EquipmentData::default()
            },
            documents: Vec::new(),
        };
        let sheet = inventory_sheet(&[equipment]);
        assert_eq!(sheet.columns.len(), 11);
        assert_eq!(sheet.rows[0][6], "NO ESPECIFICADO");
        assert_eq!(sheet.rows[0][7], "Activo");
    }

    #[test]
    fn test_schedule_sheet_cells() {
        let mut monthly_tasks = vec![Vec::new(); 12];
        monthly_tasks[5] = vec![
            ScheduledTask {
                task_type: TaskType::Preventive,
                date: "2024-06-10".to_string(),
                completed: true,
                planned: false,
            },
            ScheduledTask {
                task_type: TaskType::Calibration,
                date: "2024-06-25".to_string(),
                completed: false,
                planned: false,
            },
        ];
        let row = ScheduleRow {
            equipment_id: "EQP-019".to_string(),
            equipment_name: "Analizador".to_string(),
            manufacturer: "Radiometer".to_string(),
            model: "ABL90".to_string(),
            serial: "X1".to_string(),
            status: ScheduleStatus::DueSoon,
            cells: monthly_tasks.iter().map(|t| CellState::from_tasks(t)).collect(),
            monthly_tasks,
        };

        let sheet = schedule_sheet(&[row]);
        assert_eq!(sheet.columns.len(), 17);
        assert_eq!(sheet.columns[10].header, "Jun");
        assert_eq!(sheet.rows[0][4], "Próximo a vencer");
        assert_eq!(sheet.rows[0][10], "Mtto. Preventivo (Realizado); Calibración");
        assert_eq!(sheet.rows[0][5], "");
    }
}
