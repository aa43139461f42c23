//! AI advisory adapters: end-of-life forecast and compliance suggestions
//!
//! Both are single-shot prompt calls to an external model. The reply is
//! decoded into the typed contract and validated; any failure surfaces as
//! [`AppError::Advisory`] without retrying.

use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use once_cell::sync::Lazy;
use serde::{de::DeserializeOwned, Deserialize};
use serde_json::{json, Value};
use validator::Validate;

use crate::{
    config::AdvisorConfig,
    error::{AppError, AppResult},
    models::{
        advisory::{ComplianceInput, ComplianceReport, EolForecast, EolForecastInput, EquipmentEolRequest},
        maintenance::MaintenanceRecord,
        Equipment,
    },
};

const EOL_FAILURE: &str = "No se pudo obtener el pronóstico de fin de vida útil.";
const COMPLIANCE_FAILURE: &str = "No se pudieron obtener las sugerencias de cumplimiento de la IA.";

/// Habilitation criteria summary attached to every compliance request
pub const RESOLUTION_3100_REQUIREMENTS: &str = "\
Criterios de habilitación de la Resolución 3100 de 2019 (resumen)

Estándar 1. Talento Humano
- Títulos, certificaciones y perfiles del personal acordes con los servicios ofertados.
- Programa de inducción, reinducción y educación continua con registros.

Estándar 2. Infraestructura
- Áreas seguras y suficientes para los usuarios atendidos, accesibles a personas con movilidad reducida.
- Plan de mantenimiento de la planta física con registros de ejecución.
- Servicios públicos esenciales garantizados.
- Licencia y estudio radiofísico vigentes donde se use radiación ionizante.

Estándar 3. Dotación y Mantenimiento
- Equipos biomédicos disponibles para cada servicio ofertado.
- Hoja de vida por equipo: marca, modelo, serie, registro sanitario INVIMA y clasificación de riesgo.
- Plan de mantenimiento documentado con cronograma de preventivos y calibraciones según el fabricante.
- Registros de mantenimiento ejecutado con fecha, responsable y actividad realizada.
- Certificados de calibración vigentes cuando aplique.

Estándar 4. Medicamentos, Dispositivos Médicos e Insumos
- Procedimientos para selección, adquisición, almacenamiento, distribución, dispensación y disposición final.
- Control de vencimientos y condiciones de almacenamiento.
- Programas de farmacovigilancia y tecnovigilancia.

Estándar 5. Procesos Prioritarios
- Guías y protocolos clínicos adoptados y socializados.
- Programa de seguridad del paciente con gestión de eventos adversos.
- Protocolos de limpieza, desinfección y esterilización.

Estándar 6. Historia Clínica y Registros
- Historia clínica única, completa, legible, oportuna y confidencial.
- Reglas de archivo, custodia y conservación.

Estándar 7. Interdependencia de Servicios
- Contratos escritos para los servicios de apoyo tercerizados.
- Verificación de la habilitación de los servicios contratados.
";

static EOL_SCHEMA: Lazy<Value> = Lazy::new(|| {
    json!({
        "type": "object",
        "properties": {
            "predictedEOLDate": { "type": "string", "description": "Fecha de fin de vida útil, YYYY-MM-DD" },
            "confidenceLevel": { "type": "string", "description": "alta, media o baja" },
            "justification": { "type": "string" }
        },
        "required": ["predictedEOLDate", "confidenceLevel", "justification"],
        "additionalProperties": false
    })
});

static COMPLIANCE_SCHEMA: Lazy<Value> = Lazy::new(|| {
    json!({
        "type": "object",
        "properties": {
            "complianceAssessment": { "type": "string" },
            "suggestedActions": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "actionTitle": { "type": "string" },
                        "relatedEquipment": { "type": "string" },
                        "justification": { "type": "string" },
                        "suggestedAction": { "type": "string" },
                        "priority": { "type": "string", "enum": ["Alta", "Media", "Baja"] }
                    },
                    "required": ["actionTitle", "relatedEquipment", "justification", "suggestedAction", "priority"]
                }
            }
        },
        "required": ["complianceAssessment", "suggestedActions"]
    })
});

/// One prompt call
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub prompt_name: &'static str,
    pub prompt: String,
    /// JSON schema the reply must follow
    pub schema: Value,
}

/// External language model producing a JSON reply
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AdvisoryModel: Send + Sync {
    async fn generate(&self, request: GenerationRequest) -> AppResult<Value>;
}

// ---------------------------------------------------------------------------
// HTTP model
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct ChatCompletion {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

/// OpenAI-compatible chat completions endpoint
pub struct HttpAdvisoryModel {
    client: reqwest::Client,
    endpoint: String,
    model: String,
    api_key: Option<String>,
}

impl HttpAdvisoryModel {
    pub fn new(config: &AdvisorConfig) -> AppResult<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(seconds) = config.timeout_seconds {
            builder = builder.timeout(Duration::from_secs(seconds));
        }
        let client = builder
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to create advisor HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            model: config.model.clone(),
            api_key: config.api_key.clone(),
        })
    }
}

#[async_trait]
impl AdvisoryModel for HttpAdvisoryModel {
    async fn generate(&self, request: GenerationRequest) -> AppResult<Value> {
        let body = json!({
            "model": self.model,
            "response_format": { "type": "json_object" },
            "messages": [
                {
                    "role": "system",
                    "content": format!(
                        "Responde únicamente con un objeto JSON que cumpla este esquema: {}",
                        request.schema
                    )
                },
                { "role": "user", "content": request.prompt }
            ]
        });

        let mut call = self.client.post(&self.endpoint).json(&body);
        if let Some(key) = &self.api_key {
            call = call.bearer_auth(key);
        }

        tracing::debug!(prompt = request.prompt_name, model = %self.model, "Calling advisor model");
        let response = call
            .send()
            .await
            .map_err(|e| AppError::Advisory(format!("{}: request failed: {}", request.prompt_name, e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Advisory(format!(
                "{}: model endpoint returned {}",
                request.prompt_name, status
            )));
        }

        let completion: ChatCompletion = response
            .json()
            .await
            .map_err(|e| AppError::Advisory(format!("{}: unreadable completion: {}", request.prompt_name, e)))?;

        let content = completion
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| AppError::Advisory(format!("{}: empty completion", request.prompt_name)))?;

        serde_json::from_str(&content)
            .map_err(|e| AppError::Advisory(format!("{}: reply is not JSON: {}", request.prompt_name, e)))
    }
}

// ---------------------------------------------------------------------------
// Service
// ---------------------------------------------------------------------------

#[derive(Clone)]
pub struct AdvisoryService {
    model: Arc<dyn AdvisoryModel>,
}

impl AdvisoryService {
    pub fn new(model: Arc<dyn AdvisoryModel>) -> Self {
        Self { model }
    }

    pub async fn forecast_eol(&self, input: EolForecastInput) -> AppResult<EolForecast> {
        input.validate()?;

        let prompt = format!(
            "Eres un ingeniero biomédico con experiencia en la gestión del ciclo de vida de equipos médicos. \
Estima cuándo será necesario reemplazar el siguiente equipo.\n\n\
Nombre del Equipo: {}\nFabricante: {}\nModelo: {}\nFecha de Instalación: {}\n\
Frecuencia de Uso: {}\nHistorial de Mantenimiento: {}\n\n\
Ten en cuenta la antigüedad, el patrón de uso, el mantenimiento registrado y la vida útil habitual de equipos similares. \
Entrega la fecha estimada de fin de vida útil (YYYY-MM-DD), un nivel de confianza (alta, media o baja) y una justificación breve.",
            input.equipment_name,
            input.manufacturer,
            input.model,
            input.installation_date,
            input.usage_frequency,
            input.maintenance_history,
        );

        self.run("forecastEquipmentEOL", prompt, &EOL_SCHEMA, EOL_FAILURE).await
    }

    /// Forecast for a stored record
    pub async fn forecast_equipment_eol(
        &self,
        equipment: &Equipment,
        request: EquipmentEolRequest,
    ) -> AppResult<EolForecast> {
        request.validate()?;
        self.forecast_eol(EolForecastInput {
            equipment_name: equipment.data.name.clone(),
            manufacturer: equipment.data.manufacturer.clone(),
            model: equipment.data.model.clone(),
            installation_date: equipment.data.installation_date.clone(),
            usage_frequency: request.usage_frequency,
            maintenance_history: request.maintenance_history,
        })
        .await
    }

    pub async fn suggest_compliance_actions(
        &self,
        equipment: &[Equipment],
        records: &[MaintenanceRecord],
    ) -> AppResult<ComplianceReport> {
        let input = compliance_input(equipment, records);
        let prompt = format!(
            "Eres un oficial de cumplimiento experto en la Resolución 3100 de Colombia. \
Revisa los equipos y los registros de mantenimiento e identifica incumplimientos.\n\n\
Datos del Equipo:\n{}\n\nRegistros de Mantenimiento:\n{}\n\nRequisitos de la Resolución 3100:\n{}\n\n\
Responde con 'complianceAssessment', una evaluación general muy breve, y 'suggestedActions', \
una lista de acciones correctivas con actionTitle, relatedEquipment, justification, suggestedAction \
y priority (Alta, Media o Baja). Si no hay incumplimientos devuelve una lista vacía.",
            input.equipment_data, input.maintenance_records, input.resolution3100_requirements,
        );

        self.run("suggestComplianceActions", prompt, &COMPLIANCE_SCHEMA, COMPLIANCE_FAILURE)
            .await
    }

    async fn run<T>(&self, prompt_name: &'static str, prompt: String, schema: &Value, failure: &str) -> AppResult<T>
    where
        T: DeserializeOwned + Validate,
    {
        let request = GenerationRequest {
            prompt_name,
            prompt,
            schema: schema.clone(),
        };

        let outcome = self.model.generate(request).await.and_then(|value| {
            let parsed: T = serde_json::from_value(value)
                .map_err(|e| AppError::Advisory(format!("reply does not match schema: {}", e)))?;
            parsed
                .validate()
                .map_err(|e| AppError::Advisory(format!("reply failed validation: {}", e)))?;
            Ok(parsed)
        });

        outcome.map_err(|e| {
            tracing::error!(prompt = prompt_name, error = %e, "Advisor call failed");
            AppError::Advisory(failure.to_string())
        })
    }
}

/// Serialize the collection the way the compliance prompt expects it
pub fn compliance_input(equipment: &[Equipment], records: &[MaintenanceRecord]) -> ComplianceInput {
    let equipment_data = equipment
        .iter()
        .map(|e| {
            format!(
                "- {} (ID: {}, Serie: {}, Riesgo: {}, Estado: {}, Ubicación: {})",
                e.data.name,
                e.id,
                e.data.serial,
                e.data.risk.map(|r| r.as_str()).unwrap_or("N/A"),
                e.data.status,
                e.data.location,
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let maintenance_records = records
        .iter()
        .map(|r| {
            format!(
                "- Equipo ID {}: {} el {}. Descripción: {}",
                r.equipment_id,
                r.kind.as_str(),
                r.date,
                r.description
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    ComplianceInput {
        equipment_data,
        maintenance_records,
        resolution3100_requirements: RESOLUTION_3100_REQUIREMENTS.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        enums::{MaintenanceKind, Priority, RiskClass},
        EquipmentData,
    };

    fn eol_input() -> EolForecastInput {
        EolForecastInput {
            equipment_name: "Desfibrilador".to_string(),
            manufacturer: "Philips".to_string(),
            model: "HeartStart XL+".to_string(),
            installation_date: "2023-06-01".to_string(),
            usage_frequency: "diaria".to_string(),
            maintenance_history: "Preventivos semestrales al día".to_string(),
        }
    }

    fn service(mock: MockAdvisoryModel) -> AdvisoryService {
        AdvisoryService::new(Arc::new(mock))
    }

    #[tokio::test]
    async fn test_forecast_eol() {
        let mut mock = MockAdvisoryModel::new();
        mock.expect_generate()
            .withf(|r| r.prompt_name == "forecastEquipmentEOL" && r.prompt.contains("HeartStart XL+"))
            .times(1)
            .returning(|_| {
                Ok(json!({
                    "predictedEOLDate": "2033-06-01",
                    "confidenceLevel": "media",
                    "justification": "Vida útil típica de 10 años"
                }))
            });

        let forecast = service(mock).forecast_eol(eol_input()).await.unwrap();
        assert_eq!(forecast.predicted_eol_date, "2033-06-01");
    }

    #[tokio::test]
    async fn test_schema_violation_is_advisory_error() {
        let mut mock = MockAdvisoryModel::new();
        mock.expect_generate().times(1).returning(|_| {
            Ok(json!({
                "predictedEOLDate": "pronto",
                "confidenceLevel": "baja",
                "justification": "?"
            }))
        });

        let result = service(mock).forecast_eol(eol_input()).await;
        assert!(matches!(result, Err(AppError::Advisory(msg)) if msg == EOL_FAILURE));
    }

    #[tokio::test]
    async fn test_upstream_failure_is_not_retried() {
        let mut mock = MockAdvisoryModel::new();
        mock.expect_generate()
            .times(1)
            .returning(|_| Err(AppError::Advisory("timeout".to_string())));

        let result = service(mock).suggest_compliance_actions(&[], &[]).await;
        assert!(matches!(result, Err(AppError::Advisory(_))));
    }

    #[tokio::test]
    async fn test_invalid_input_never_calls_model() {
        let mut mock = MockAdvisoryModel::new();
        mock.expect_generate().times(0);

        let mut input = eol_input();
        input.usage_frequency = String::new();
        let result = service(mock).forecast_eol(input).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_compliance_actions() {
        let mut mock = MockAdvisoryModel::new();
        mock.expect_generate()
            .withf(|r| r.prompt.contains("Resolución 3100") && r.prompt.contains("Equipo ID EQP-1"))
            .returning(|_| {
                Ok(json!({
                    "complianceAssessment": "Cumplimiento parcial",
                    "suggestedActions": [{
                        "actionTitle": "Falta registro INVIMA",
                        "relatedEquipment": "Monitor (S1)",
                        "justification": "Estándar 3 exige hoja de vida completa",
                        "suggestedAction": "Cargar el registro sanitario",
                        "priority": "Alta"
                    }]
                }))
            });

        let records = vec![MaintenanceRecord {
            id: "m1".to_string(),
            equipment_id: "EQP-1".to_string(),
            date: "2024-05-21".to_string(),
            kind: MaintenanceKind::Preventivo,
            description: "Revisión".to_string(),
            technician_name: "Ana".to_string(),
        }];
        let report = service(mock).suggest_compliance_actions(&[], &records).await.unwrap();
        assert_eq!(report.suggested_actions.len(), 1);
        assert_eq!(report.suggested_actions[0].priority, Priority::Alta);
    }

    #[test]
    fn test_compliance_input_format() {
        let equipment = Equipment {
            id: "EQP-1".to_string(),
            data: EquipmentData {
                name: "Monitor".to_string(),
                serial: "S1".to_string(),
                location: "UCI".to_string(),
                risk: Some(RiskClass::IIa),
                ..EquipmentData::default()
            },
            documents: Vec::new(),
        };
        let records = vec![MaintenanceRecord {
            id: "m1".to_string(),
            equipment_id: "EQP-1".to_string(),
            date: "2024-05-21".to_string(),
            kind: MaintenanceKind::Metrologia,
            description: "Calibración anual".to_string(),
            technician_name: "Ana".to_string(),
        }];

        let input = compliance_input(&[equipment], &records);
        assert_eq!(
            input.equipment_data,
            "- Monitor (ID: EQP-1, Serie: S1, Riesgo: IIa, Estado: Activo, Ubicación: UCI)"
        );
        assert_eq!(
            input.maintenance_records,
            "- Equipo ID EQP-1: Metrología el 2024-05-21. Descripción: Calibración anual"
        );
        assert!(input.resolution3100_requirements.contains("Dotación y Mantenimiento"));
    }
}
