//! Seed data used when a snapshot is absent or unreadable

use crate::models::{
    enums::{MaintenanceKind, Period, Standard, TaskType},
    library::{CompanyProfile, DocumentCategory, DocumentFile},
    maintenance::{MaintenanceRecord, MaintenanceTask},
    user::{Customization, Organization, UserProfile},
    Equipment, EquipmentData, EquipmentStatus,
};

pub const DEMO_ORGANIZATION_ID: &str = "org_hospital_san_vicente";

struct SeedEquipment {
    id: &'static str,
    name: &'static str,
    model: &'static str,
    manufacturer: &'static str,
    serial: &'static str,
    location: &'static str,
    sede: &'static str,
    installation_date: &'static str,
    maintenance_period: Period,
    calibration_period: Period,
}

const EQUIPMENT: [SeedEquipment; 10] = [
    SeedEquipment {
        id: "EQP-019",
        name: "Analizador de Gases en Sangre",
        model: "ABL90 FLEX PLUS",
        manufacturer: "Radiometer",
        serial: "ABL90X1Y2",
        location: "Laboratorio de Urgencias",
        sede: "Sede Principal",
        installation_date: "2023-06-30",
        maintenance_period: Period::Anual,
        calibration_period: Period::Anual,
    },
    SeedEquipment {
        id: "EQP-020",
        name: "Aspirador de Secreciones",
        model: "Vacu-Aide QSU",
        manufacturer: "DeVilbiss",
        serial: "VAQSUY2Z3",
        location: "Terapia Respiratoria",
        sede: "Sede Principal",
        installation_date: "2023-02-01",
        maintenance_period: Period::Anual,
        calibration_period: Period::NoAplica,
    },
    SeedEquipment {
        id: "EQP-015",
        name: "Autoclave de Vapor",
        model: "44B",
        manufacturer: "Tuttnauer",
        serial: "T44B6T7U8",
        location: "Central de Esterilización",
        sede: "Sede Principal",
        installation_date: "2023-05-15",
        maintenance_period: Period::Anual,
        calibration_period: Period::NoAplica,
    },
    SeedEquipment {
        id: "EQP-009",
        name: "Bisturí Eléctrico",
        model: "Valleylab FT10",
        manufacturer: "Medtronic",
        serial: "VLFT10J9K0",
        location: "Quirófano 2",
        sede: "Sede Principal",
        installation_date: "2022-07-18",
        maintenance_period: Period::Anual,
        calibration_period: Period::NoAplica,
    },
    SeedEquipment {
        id: "EQP-012",
        name: "Cama Hospitalaria Eléctrica",
        model: "Centrella Smart+ Bed",
        manufacturer: "Hill-Rom",
        serial: "CENSMN3P4",
        location: "Piso 3, Hab 301",
        sede: "Sede Norte",
        installation_date: "2023-04-01",
        maintenance_period: Period::Semestral,
        calibration_period: Period::NoAplica,
    },
    SeedEquipment {
        id: "EQP-014",
        name: "Centrífuga de Laboratorio",
        model: "Allegra X-15R",
        manufacturer: "Beckman Coulter",
        serial: "AX15R5S6T7",
        location: "Laboratorio Clínico",
        sede: "Sede Principal",
        installation_date: "2023-02-15",
        maintenance_period: Period::Anual,
        calibration_period: Period::Semestral,
    },
    SeedEquipment {
        id: "eq_001",
        name: "Desfibrilador",
        model: "HeartStart XL+",
        manufacturer: "Philips",
        serial: "DE451A2Z3",
        location: "UCI Adultos",
        sede: "Sede Principal",
        installation_date: "2023-06-01",
        maintenance_period: Period::Semestral,
        calibration_period: Period::Anual,
    },
    SeedEquipment {
        id: "EQP-008",
        name: "Electrocardiógrafo Portátil",
        model: "PageWriter TC20",
        manufacturer: "Philips",
        serial: "PWTC2H8J9",
        location: "Ambulancia 1",
        sede: "Sede Norte",
        installation_date: "2023-11-01",
        maintenance_period: Period::Anual,
        calibration_period: Period::NoAplica,
    },
    SeedEquipment {
        id: "EQP-018",
        name: "Endoscopio Flexible",
        model: "GIF-1TH190",
        manufacturer: "Olympus",
        serial: "GF1THW0X1",
        location: "Gastroenterología",
        sede: "Sede Norte",
        installation_date: "2023-02-01",
        maintenance_period: Period::Semestral,
        calibration_period: Period::NoAplica,
    },
    SeedEquipment {
        id: "EQP-017",
        name: "Equipo de Rayos X Móvil",
        model: "Mobilett Elara Max",
        manufacturer: "Siemens Healthineers",
        serial: "MEMAXV9W0",
        location: "Unidad Móvil",
        sede: "Sede Norte",
        installation_date: "2023-09-01",
        maintenance_period: Period::Trimestral,
        calibration_period: Period::Anual,
    },
];

/// Demo equipment, completed with the hydration defaults
pub fn equipment() -> Vec<Equipment> {
    EQUIPMENT
        .iter()
        .map(|seed| Equipment {
            id: seed.id.to_string(),
            data: EquipmentData {
                internal_id: seed.id.to_string(),
                name: seed.name.to_string(),
                model: seed.model.to_string(),
                brand: seed.manufacturer.to_string(),
                manufacturer: seed.manufacturer.to_string(),
                serial: seed.serial.to_string(),
                location: seed.location.to_string(),
                sede: seed.sede.to_string(),
                description: format!("Descripción detallada para {}.", seed.name),
                status: EquipmentStatus::Activo,
                installation_date: seed.installation_date.to_string(),
                maintenance_period: seed.maintenance_period,
                calibration_period: seed.calibration_period,
                ..EquipmentData::default()
            },
            documents: Vec::new(),
        })
        .collect()
}

pub fn maintenance_records() -> Vec<MaintenanceRecord> {
    let record = |id: &str, equipment_id: &str, date: &str, kind, description: &str, technician: &str| {
        MaintenanceRecord {
            id: id.to_string(),
            equipment_id: equipment_id.to_string(),
            date: date.to_string(),
            kind,
            description: description.to_string(),
            technician_name: technician.to_string(),
        }
    };

    vec![
        record("maint_008", "EQP-019", "2024-05-18", MaintenanceKind::Correctivo, "Cambio de membrana de electrodo de pH.", "Luisa Fernanda"),
        record("maint_009", "EQP-015", "2024-05-21", MaintenanceKind::Preventivo, "Revisión anual y cambio de empaques de puerta.", "Carlos Vargas"),
        record("maint_010", "EQP-012", "2024-03-20", MaintenanceKind::Correctivo, "Ajuste de motor de inclinación.", "Ricardo Poveda"),
        record("maint_011", "EQP-008", "2024-12-05", MaintenanceKind::Preventivo, "Verificación de respuesta de frecuencia y filtros.", "Ana Torres"),
        record("maint_012", "EQP-018", "2024-02-11", MaintenanceKind::Preventivo, "Limpieza de lentes y verificación de canales.", "Carlos Vargas"),
        record("maint_013", "EQP-017", "2024-07-07", MaintenanceKind::Preventivo, "Mantenimiento trimestral.", "Ricardo Poveda"),
        record("maint_014", "EQP-019", "2024-06-30", MaintenanceKind::Preventivo, "Mantenimiento preventivo anual completado.", "Ana Torres"),
    ]
}

pub fn maintenance_tasks() -> Vec<MaintenanceTask> {
    let task = |id: &str, equipment_id: &str, task_type, date: &str, completed| MaintenanceTask {
        id: id.to_string(),
        equipment_id: equipment_id.to_string(),
        task_type,
        date: date.to_string(),
        completed,
    };

    vec![
        task("task_001", "EQP-019", TaskType::Preventive, "2024-06-10", true),
        task("task_002", "EQP-019", TaskType::Calibration, "2024-06-25", false),
        task("task_003", "eq_001", TaskType::Warranty, "2024-03-05", false),
    ]
}

pub fn company_profile() -> CompanyProfile {
    CompanyProfile::default()
}

pub fn user_profile() -> UserProfile {
    UserProfile::default()
}

/// Fixed document categories, in display order
pub fn document_categories() -> Vec<DocumentCategory> {
    let category = |id: &str, title: &str, description: &str, files: Vec<DocumentFile>| DocumentCategory {
        id: id.to_string(),
        title: title.to_string(),
        description: description.to_string(),
        files,
    };
    let file = |id: &str, name: &str, size: &str, date: &str| DocumentFile {
        id: id.to_string(),
        name: name.to_string(),
        size: size.to_string(),
        date: date.to_string(),
    };

    vec![
        category(
            "informes",
            "Informes",
            "Visualiza y exporta informes generados sobre tus equipos.",
            vec![],
        ),
        category(
            "plan",
            "Planes de Mantenimiento",
            "Documentos maestros que describen las estrategias y programación de mantenimiento para los equipos.",
            vec![file("plan-1", "Plan-Mantenimiento-2024-v1.2.pdf", "2.5 MB", "Subido el 15 de enero de 2024")],
        ),
        category(
            "protocolos",
            "Procesos de Mantenimiento",
            "Procedimientos detallados para el mantenimiento preventivo de equipos específicos.",
            vec![
                file("proto-1", "Protocolo-Desfibriladores-Philips.pdf", "850 KB", "Subido el 20 de noviembre de 2023"),
                file("proto-2", "Protocolo-Ventiladores-Medtronic.pdf", "1.2 MB", "Subido el 22 de noviembre de 2023"),
            ],
        ),
        category(
            "tecnovigilancia",
            "Tecnovigilancia",
            "Gestiona incidentes y alertas de seguridad de los dispositivos médicos.",
            vec![],
        ),
        category(
            "contratos",
            "Contratos",
            "Carga los diferentes contratos con proveedores para el estándar de dotación.",
            vec![],
        ),
        category(
            "otros",
            "Otros Documentos",
            "Formatos de inspección, hojas de vida, y otros documentos de cumplimiento.",
            vec![],
        ),
    ]
}

pub fn organizations() -> Vec<Organization> {
    vec![
        Organization {
            id: "super_admin_org".to_string(),
            name: "Administración Global".to_string(),
            customization: Customization::default(),
            enabled_standards: Vec::new(),
        },
        Organization {
            id: DEMO_ORGANIZATION_ID.to_string(),
            name: "Hospital San Vicente".to_string(),
            customization: Customization {
                logo_url: Some("/logos/hospital_san_vicente.png".to_string()),
            },
            enabled_standards: Standard::ALL.to_vec(),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_seed_ids_unique() {
        let equipment = equipment();
        let ids: HashSet<_> = equipment.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids.len(), equipment.len());
    }

    #[test]
    fn test_seed_references_known_equipment() {
        let ids: HashSet<_> = equipment().into_iter().map(|e| e.id).collect();
        assert!(maintenance_records().iter().all(|r| ids.contains(&r.equipment_id)));
        assert!(maintenance_tasks().iter().all(|t| ids.contains(&t.equipment_id)));
    }

    #[test]
    fn test_seed_applies_defaults() {
        let desfibrilador = equipment().into_iter().find(|e| e.id == "eq_001").unwrap();
        assert_eq!(desfibrilador.data.brand, "Philips");
        assert_eq!(desfibrilador.data.internal_id, "eq_001");
        assert_eq!(desfibrilador.data.acquisition_type, "Compra");
        assert!(desfibrilador.data.required_documentation.invima);
    }

    #[test]
    fn test_demo_organization_has_every_standard() {
        let organizations = organizations();
        let demo = organizations.iter().find(|o| o.id == DEMO_ORGANIZATION_ID).unwrap();
        assert_eq!(demo.enabled_standards.len(), Standard::ALL.len());
    }
}
