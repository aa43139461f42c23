//! Shared domain enums (wire labels match the persisted snapshots)

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// ---------------------------------------------------------------------------
// RiskClass
// ---------------------------------------------------------------------------

/// Sanitary risk classification of a medical device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum RiskClass {
    I,
    IIa,
    IIb,
    III,
}

impl RiskClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskClass::I => "I",
            RiskClass::IIa => "IIa",
            RiskClass::IIb => "IIb",
            RiskClass::III => "III",
        }
    }

    /// Human label used in listings and exports
    pub fn label(&self) -> &'static str {
        match self {
            RiskClass::I => "Clase I",
            RiskClass::IIa => "Clase IIA",
            RiskClass::IIb => "Clase IIB",
            RiskClass::III => "Clase III",
        }
    }
}

// ---------------------------------------------------------------------------
// EquipmentStatus
// ---------------------------------------------------------------------------

/// Lifecycle status. `DadoDeBaja` is terminal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum EquipmentStatus {
    #[default]
    Activo,
    #[serde(rename = "Fuera de Servicio")]
    FueraDeServicio,
    #[serde(rename = "Dado de Baja")]
    DadoDeBaja,
}

impl EquipmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EquipmentStatus::Activo => "Activo",
            EquipmentStatus::FueraDeServicio => "Fuera de Servicio",
            EquipmentStatus::DadoDeBaja => "Dado de Baja",
        }
    }

    pub fn is_retired(&self) -> bool {
        *self == EquipmentStatus::DadoDeBaja
    }
}

impl std::fmt::Display for EquipmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Period
// ---------------------------------------------------------------------------

/// Maintenance / calibration cadence
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum Period {
    #[serde(rename = "No Aplica")]
    NoAplica,
    Mensual,
    Trimestral,
    Cuatrimestral,
    Semestral,
    #[default]
    Anual,
}

impl Period {
    /// Interval in months, `None` when the cadence does not apply
    pub fn months(&self) -> Option<u32> {
        match self {
            Period::NoAplica => None,
            Period::Mensual => Some(1),
            Period::Trimestral => Some(3),
            Period::Cuatrimestral => Some(4),
            Period::Semestral => Some(6),
            Period::Anual => Some(12),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Period::NoAplica => "No Aplica",
            Period::Mensual => "Mensual",
            Period::Trimestral => "Trimestral",
            Period::Cuatrimestral => "Cuatrimestral",
            Period::Semestral => "Semestral",
            Period::Anual => "Anual",
        }
    }
}

// ---------------------------------------------------------------------------
// Currency
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum Currency {
    #[default]
    COP,
    USD,
    EUR,
}

impl Currency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Currency::COP => "COP",
            Currency::USD => "USD",
            Currency::EUR => "EUR",
        }
    }
}

// ---------------------------------------------------------------------------
// DocumentType
// ---------------------------------------------------------------------------

/// The closed set of documentation kinds an equipment record can require
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum DocumentType {
    Invima,
    ImportDeclaration,
    UserManual,
    ServiceManual,
    QuickGuide,
    Other,
}

impl DocumentType {
    /// All kinds, in display order
    pub const ALL: [DocumentType; 6] = [
        DocumentType::Invima,
        DocumentType::ImportDeclaration,
        DocumentType::UserManual,
        DocumentType::ServiceManual,
        DocumentType::QuickGuide,
        DocumentType::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentType::Invima => "invima",
            DocumentType::ImportDeclaration => "importDeclaration",
            DocumentType::UserManual => "userManual",
            DocumentType::ServiceManual => "serviceManual",
            DocumentType::QuickGuide => "quickGuide",
            DocumentType::Other => "other",
        }
    }

    /// Default human label
    pub fn label(&self) -> &'static str {
        match self {
            DocumentType::Invima => "Registro Sanitario",
            DocumentType::ImportDeclaration => "Declaración de Importación",
            DocumentType::UserManual => "Manual de Usuario",
            DocumentType::ServiceManual => "Manual de Servicio",
            DocumentType::QuickGuide => "Guía Rápida",
            DocumentType::Other => "Otro",
        }
    }
}

impl std::fmt::Display for DocumentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for DocumentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DocumentType::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("Invalid document type: {}", s))
    }
}

// ---------------------------------------------------------------------------
// TaskType
// ---------------------------------------------------------------------------

/// Kind of entry shown in a maintenance schedule cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum TaskType {
    #[serde(rename = "Mtto. Preventivo")]
    Preventive,
    #[serde(rename = "Calibración")]
    Calibration,
    #[serde(rename = "Mtto. Correctivo")]
    Corrective,
    #[serde(rename = "Equipo en Garantía o Comodato")]
    Warranty,
    #[serde(rename = "Equipo Fuera de Servicio")]
    OutOfService,
}

impl TaskType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskType::Preventive => "Mtto. Preventivo",
            TaskType::Calibration => "Calibración",
            TaskType::Corrective => "Mtto. Correctivo",
            TaskType::Warranty => "Equipo en Garantía o Comodato",
            TaskType::OutOfService => "Equipo Fuera de Servicio",
        }
    }
}

// ---------------------------------------------------------------------------
// ScheduleStatus
// ---------------------------------------------------------------------------

/// Overall maintenance standing of one equipment. Ordered from best to worst.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
pub enum ScheduleStatus {
    #[serde(rename = "A tiempo")]
    OnTime,
    #[serde(rename = "Próximo a vencer")]
    DueSoon,
    #[serde(rename = "Vencido")]
    Overdue,
}

impl ScheduleStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScheduleStatus::OnTime => "A tiempo",
            ScheduleStatus::DueSoon => "Próximo a vencer",
            ScheduleStatus::Overdue => "Vencido",
        }
    }
}

// ---------------------------------------------------------------------------
// MaintenanceKind
// ---------------------------------------------------------------------------

/// Kind of executed maintenance work in the maintenance log
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum MaintenanceKind {
    Preventivo,
    Correctivo,
    Predictivo,
    #[serde(rename = "Metrología")]
    Metrologia,
    #[serde(rename = "Inspección")]
    Inspeccion,
}

impl MaintenanceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MaintenanceKind::Preventivo => "Preventivo",
            MaintenanceKind::Correctivo => "Correctivo",
            MaintenanceKind::Predictivo => "Predictivo",
            MaintenanceKind::Metrologia => "Metrología",
            MaintenanceKind::Inspeccion => "Inspección",
        }
    }
}

// ---------------------------------------------------------------------------
// Priority
// ---------------------------------------------------------------------------

/// Urgency of a suggested compliance action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum Priority {
    Alta,
    Media,
    Baja,
}

// ---------------------------------------------------------------------------
// Role
// ---------------------------------------------------------------------------

/// Platform roles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Administrador,
    OrgAdmin,
    Tech,
    Viewer,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Administrador => "ADMINISTRADOR",
            Role::OrgAdmin => "ORG_ADMIN",
            Role::Tech => "TECH",
            Role::Viewer => "VIEWER",
        }
    }
}

// ---------------------------------------------------------------------------
// Standard
// ---------------------------------------------------------------------------

/// Resolution 3100 habilitation standards
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum Standard {
    #[serde(rename = "standard_1")]
    HumanTalent,
    #[serde(rename = "standard_2")]
    Infrastructure,
    #[serde(rename = "standard_3")]
    Equipment,
    #[serde(rename = "standard_4")]
    MedicinesAndDevices,
    #[serde(rename = "standard_5")]
    PriorityProcesses,
    #[serde(rename = "standard_6")]
    ClinicalHistory,
    #[serde(rename = "standard_7")]
    ServiceInterdependence,
}

impl Standard {
    pub const ALL: [Standard; 7] = [
        Standard::HumanTalent,
        Standard::Infrastructure,
        Standard::Equipment,
        Standard::MedicinesAndDevices,
        Standard::PriorityProcesses,
        Standard::ClinicalHistory,
        Standard::ServiceInterdependence,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            Standard::HumanTalent => "standard_1",
            Standard::Infrastructure => "standard_2",
            Standard::Equipment => "standard_3",
            Standard::MedicinesAndDevices => "standard_4",
            Standard::PriorityProcesses => "standard_5",
            Standard::ClinicalHistory => "standard_6",
            Standard::ServiceInterdependence => "standard_7",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Standard::HumanTalent => "Talento Humano",
            Standard::Infrastructure => "Infraestructura",
            Standard::Equipment => "Dotación y Mantenimiento",
            Standard::MedicinesAndDevices => "Medicamentos y Dispositivos Médicos",
            Standard::PriorityProcesses => "Procesos Prioritarios",
            Standard::ClinicalHistory => "Historia Clínica",
            Standard::ServiceInterdependence => "Interdependencia de Servicios",
        }
    }
}
