//! Data models for Dotación

pub mod advisory;
pub mod dates;
pub mod enums;
pub mod equipment;
pub mod library;
pub mod maintenance;
pub mod user;

// Re-export commonly used types
pub use dates::{Dated, NOT_AVAILABLE};
pub use enums::{
    Currency, DocumentType, EquipmentStatus, MaintenanceKind, Period, Priority, RiskClass, Role,
    ScheduleStatus, Standard, TaskType,
};
pub use equipment::{Equipment, EquipmentData, EquipmentDocument};
pub use library::{CompanyProfile, DocumentCategory, DocumentFile};
pub use maintenance::{MaintenanceRecord, MaintenanceTask, ScheduleRow};
pub use user::{Organization, User, UserClaims, UserProfile};
