//! Equipment model
//!
//! Field names follow the camelCase layout of the persisted `equipment-list`
//! snapshot. Missing fields on hydration take the values of
//! [`EquipmentData::default`].

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DefaultOnError};
use utoipa::ToSchema;
use validator::Validate;

use super::{
    dates::Dated,
    enums::{Currency, DocumentType, EquipmentStatus, Period, RiskClass},
};

/// Equipment record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Equipment {
    /// Unique identifier, assigned on creation and never reassigned
    pub id: String,
    #[serde(flatten)]
    pub data: EquipmentData,
    /// Attached documents, at most one per type
    #[serde(default)]
    pub documents: Vec<EquipmentDocument>,
}

impl Equipment {
    pub fn document(&self, doc_type: DocumentType) -> Option<&EquipmentDocument> {
        self.documents.iter().find(|d| d.doc_type == doc_type)
    }

    /// Replace any document of the same type with `document`
    pub fn upsert_document(&mut self, document: EquipmentDocument) {
        self.documents.retain(|d| d.doc_type != document.doc_type);
        self.documents.push(document);
    }

    /// Returns whether a document was removed
    pub fn remove_document(&mut self, doc_type: DocumentType) -> bool {
        let before = self.documents.len();
        self.documents.retain(|d| d.doc_type != doc_type);
        self.documents.len() != before
    }
}

/// Every equipment field except identity and attachments
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct EquipmentData {
    pub internal_id: String,
    #[validate(length(min = 1, message = "Equipment name is required"))]
    pub name: String,
    pub model: String,
    pub brand: String,
    pub manufacturer: String,
    pub serial: String,
    pub location: String,
    pub sede: String,
    pub description: String,
    pub status: EquipmentStatus,
    pub risk: Option<RiskClass>,
    pub classification_by_use: String,
    pub predominant_technologies: Vec<String>,

    pub image_url: String,
    #[validate(range(min = 0.1, max = 10.0))]
    pub image_zoom: f64,
    #[validate(range(min = 0.0, max = 100.0))]
    pub image_position_x: f64,
    #[validate(range(min = 0.0, max = 100.0))]
    pub image_position_y: f64,

    pub technical_parameters: TechnicalParameters,
    pub supplies: Vec<Supply>,
    pub other_characteristics: Vec<Supply>,
    pub accessories: Vec<Accessory>,

    pub acquisition_type: String,
    pub importer: String,
    pub provider: String,
    /// ISO date (YYYY-MM-DD), may be empty
    pub acquisition_date: String,
    /// ISO date (YYYY-MM-DD), may be empty
    pub installation_date: String,
    pub price: Price,
    pub warranty: String,

    /// Sanitary registration number
    pub invima: String,
    pub required_documentation: RequiredDocumentation,
    pub other_documentation_detail: String,
    pub maintenance_period: Period,
    pub calibration_period: Period,
}

impl Default for EquipmentData {
    fn default() -> Self {
        Self {
            internal_id: String::new(),
            name: String::new(),
            model: String::new(),
            brand: String::new(),
            manufacturer: String::new(),
            serial: String::new(),
            location: String::new(),
            sede: String::new(),
            description: String::new(),
            status: EquipmentStatus::Activo,
            risk: None,
            classification_by_use: "Diagnóstico".to_string(),
            predominant_technologies: Vec::new(),
            image_url: String::new(),
            image_zoom: 1.0,
            image_position_x: 50.0,
            image_position_y: 50.0,
            technical_parameters: TechnicalParameters::default(),
            supplies: Vec::new(),
            other_characteristics: Vec::new(),
            accessories: Vec::new(),
            acquisition_type: "Compra".to_string(),
            importer: "N/A".to_string(),
            provider: "N/A".to_string(),
            acquisition_date: String::new(),
            installation_date: String::new(),
            price: Price::default(),
            warranty: "N/A".to_string(),
            invima: String::new(),
            required_documentation: RequiredDocumentation::default(),
            other_documentation_detail: String::new(),
            maintenance_period: Period::Anual,
            calibration_period: Period::Anual,
        }
    }
}

/// Electrical / pneumatic ratings, all optional
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TechnicalParameters {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voltage: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub power: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frequency: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pressure: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flow: Option<String>,
}

/// Supply or other characteristic (`otherName` names a free-form entry)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Supply {
    pub name: String,
    #[serde(default)]
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub other_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Accessory {
    pub name: String,
    #[serde(default)]
    pub observation: String,
}

/// Acquisition price. A non-numeric persisted amount is read as unset.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Price {
    #[serde_as(as = "DefaultOnError")]
    #[serde(default)]
    #[schema(value_type = Option<String>, example = "15000000")]
    pub amount: Option<Decimal>,
    #[serde(default)]
    pub currency: Currency,
}

impl Default for Price {
    fn default() -> Self {
        Self {
            amount: Some(Decimal::ZERO),
            currency: Currency::COP,
        }
    }
}

/// Which documentation kinds this equipment must have on file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct RequiredDocumentation {
    pub invima: bool,
    pub import_declaration: bool,
    pub user_manual: bool,
    pub service_manual: bool,
    pub quick_guide: bool,
    pub other: bool,
}

impl RequiredDocumentation {
    pub fn is_required(&self, doc_type: DocumentType) -> bool {
        match doc_type {
            DocumentType::Invima => self.invima,
            DocumentType::ImportDeclaration => self.import_declaration,
            DocumentType::UserManual => self.user_manual,
            DocumentType::ServiceManual => self.service_manual,
            DocumentType::QuickGuide => self.quick_guide,
            DocumentType::Other => self.other,
        }
    }

    /// Required kinds, in display order
    pub fn required(&self) -> impl Iterator<Item = DocumentType> + '_ {
        DocumentType::ALL.into_iter().filter(|t| self.is_required(*t))
    }
}

impl Default for RequiredDocumentation {
    fn default() -> Self {
        Self {
            invima: true,
            import_declaration: true,
            user_manual: true,
            service_manual: false,
            quick_guide: false,
            other: false,
        }
    }
}

/// Attached document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct EquipmentDocument {
    #[serde(rename = "type")]
    pub doc_type: DocumentType,
    pub name: String,
    /// Upload date (YYYY-MM-DD)
    #[serde(default)]
    pub date: String,
}

impl Dated for EquipmentDocument {
    fn date_str(&self) -> &str {
        &self.date
    }
}

/// Create equipment request (an equipment record without id)
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateEquipment {
    #[serde(flatten)]
    #[validate(nested)]
    pub data: EquipmentData,
    #[serde(default)]
    pub documents: Vec<EquipmentDocument>,
}

/// Full-record update. Omitting `documents` keeps the stored attachments.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateEquipment {
    #[serde(flatten)]
    #[validate(nested)]
    pub data: EquipmentData,
    #[serde(default)]
    pub documents: Option<Vec<EquipmentDocument>>,
}

/// Attach-document request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct AttachDocument {
    #[serde(rename = "type")]
    pub doc_type: DocumentType,
    #[validate(length(min = 1, message = "Document name is required"))]
    pub name: String,
    /// Upload date (YYYY-MM-DD); defaults to today
    pub date: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_hydration_applies_defaults() {
        let equipment: Equipment = serde_json::from_value(json!({
            "id": "EQP-001",
            "name": "Desfibrilador",
            "manufacturer": "Philips",
            "status": "Activo",
            "risk": "IIb"
        }))
        .unwrap();

        assert_eq!(equipment.data.name, "Desfibrilador");
        assert_eq!(equipment.data.acquisition_type, "Compra");
        assert_eq!(equipment.data.maintenance_period, Period::Anual);
        assert_eq!(equipment.data.image_zoom, 1.0);
        assert!(equipment.data.accessories.is_empty());
        assert!(equipment.documents.is_empty());
        assert!(equipment.data.required_documentation.invima);
        assert!(!equipment.data.required_documentation.other);
    }

    #[test]
    fn test_non_numeric_price_is_unset() {
        let price: Price = serde_json::from_value(json!({ "amount": "abc", "currency": "USD" })).unwrap();
        assert_eq!(price.amount, None);
        assert_eq!(price.currency, Currency::USD);

        let price: Price = serde_json::from_value(json!({ "amount": "", "currency": "COP" })).unwrap();
        assert_eq!(price.amount, None);

        let price: Price = serde_json::from_value(json!({ "amount": "2500000", "currency": "COP" })).unwrap();
        assert_eq!(price.amount, Some(Decimal::from(2_500_000)));
    }

    #[test]
    fn test_upsert_document_replaces_same_type() {
        let mut equipment = Equipment {
            id: "EQP-1".to_string(),
            data: EquipmentData::default(),
            documents: Vec::new(),
        };
        equipment.upsert_document(EquipmentDocument {
            doc_type: DocumentType::Invima,
            name: "registro-v1.pdf".to_string(),
            date: "2024-01-01".to_string(),
        });
        equipment.upsert_document(EquipmentDocument {
            doc_type: DocumentType::Invima,
            name: "registro-v2.pdf".to_string(),
            date: "2024-02-01".to_string(),
        });

        assert_eq!(equipment.documents.len(), 1);
        assert_eq!(equipment.documents[0].name, "registro-v2.pdf");
        assert!(equipment.remove_document(DocumentType::Invima));
        assert!(!equipment.remove_document(DocumentType::Invima));
    }

    #[test]
    fn test_required_documentation_order() {
        let required = RequiredDocumentation {
            other: true,
            ..RequiredDocumentation::default()
        };
        let kinds: Vec<_> = required.required().collect();
        assert_eq!(
            kinds,
            vec![
                DocumentType::Invima,
                DocumentType::ImportDeclaration,
                DocumentType::UserManual,
                DocumentType::Other
            ]
        );
    }
}
