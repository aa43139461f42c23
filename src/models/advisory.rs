//! Request / response contracts of the AI advisory adapters

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use super::{dates::parse_date, enums::Priority};

fn iso_date(value: &str) -> Result<(), ValidationError> {
    if chrono::NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").is_ok() {
        Ok(())
    } else {
        Err(ValidationError::new("iso_date"))
    }
}

fn lenient_date(value: &str) -> Result<(), ValidationError> {
    parse_date(value)
        .map(|_| ())
        .ok_or_else(|| ValidationError::new("date"))
}

// ---------------------------------------------------------------------------
// EOL forecast
// ---------------------------------------------------------------------------

/// End-of-life forecast input
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EolForecastInput {
    #[validate(length(min = 1))]
    pub equipment_name: String,
    pub manufacturer: String,
    pub model: String,
    /// Installation date (YYYY-MM-DD)
    #[validate(custom(function = "lenient_date", message = "Installation date must be a valid date"))]
    pub installation_date: String,
    /// Typical usage frequency (daily, weekly…)
    #[validate(length(min = 1))]
    pub usage_frequency: String,
    /// Free-text summary of repairs and upgrades
    #[serde(default)]
    pub maintenance_history: String,
}

/// End-of-life forecast built from a stored equipment record
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EquipmentEolRequest {
    #[validate(length(min = 1))]
    pub usage_frequency: String,
    #[serde(default)]
    pub maintenance_history: String,
}

/// End-of-life forecast output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct EolForecast {
    /// Predicted end-of-life date (YYYY-MM-DD)
    #[validate(custom(function = "iso_date", message = "predictedEOLDate must be YYYY-MM-DD"))]
    #[serde(rename = "predictedEOLDate")]
    pub predicted_eol_date: String,
    /// Qualitative confidence (alta, media, baja)
    #[validate(length(min = 1))]
    pub confidence_level: String,
    #[validate(length(min = 1))]
    pub justification: String,
}

// ---------------------------------------------------------------------------
// Compliance suggestions
// ---------------------------------------------------------------------------

/// Serialized inputs sent to the compliance advisor
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ComplianceInput {
    pub equipment_data: String,
    pub maintenance_records: String,
    pub resolution3100_requirements: String,
}

/// One suggested corrective action
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ComplianceAction {
    #[validate(length(min = 1))]
    pub action_title: String,
    #[validate(length(min = 1))]
    pub related_equipment: String,
    #[validate(length(min = 1))]
    pub justification: String,
    #[validate(length(min = 1))]
    pub suggested_action: String,
    pub priority: Priority,
}

/// Compliance assessment. An empty action list means fully compliant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ComplianceReport {
    #[validate(length(min = 1))]
    pub compliance_assessment: String,
    #[validate(nested)]
    pub suggested_actions: Vec<ComplianceAction>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_eol_forecast_validation() {
        let forecast: EolForecast = serde_json::from_value(json!({
            "predictedEOLDate": "2031-06-30",
            "confidenceLevel": "media",
            "justification": "Uso diario intensivo"
        }))
        .unwrap();
        assert!(forecast.validate().is_ok());

        let bad = EolForecast {
            predicted_eol_date: "en cinco años".to_string(),
            ..forecast
        };
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_compliance_report_rejects_unknown_priority() {
        let result: Result<ComplianceReport, _> = serde_json::from_value(json!({
            "complianceAssessment": "Parcial",
            "suggestedActions": [{
                "actionTitle": "Calibración vencida",
                "relatedEquipment": "Monitor",
                "justification": "Estándar 3",
                "suggestedAction": "Calibrar",
                "priority": "Urgente"
            }]
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_empty_action_list_is_valid() {
        let report: ComplianceReport = serde_json::from_value(json!({
            "complianceAssessment": "Todo en orden",
            "suggestedActions": []
        }))
        .unwrap();
        assert!(report.validate().is_ok());
    }
}
