//! API integration tests
//!
//! The in-process tests drive the router over the in-memory snapshot store.
//! The `#[ignore]` tests target a running server.

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use dotacion_server::{
    api,
    config::AppConfig,
    error::{AppError, AppResult},
    models::{Role, Standard, UserClaims},
    repository::Repository,
    services::{
        advisory::{AdvisoryModel, GenerationRequest},
        Services,
    },
    AppState,
};

const BASE_URL: &str = "http://localhost:8080/api/v1";

/// Advisor answering with a fixed reply (or failing when `None`)
struct FixedAdvisor(Option<Value>);

#[async_trait]
impl AdvisoryModel for FixedAdvisor {
    async fn generate(&self, _request: GenerationRequest) -> AppResult<Value> {
        self.0
            .clone()
            .ok_or_else(|| AppError::Advisory("upstream unavailable".to_string()))
    }
}

async fn app_with_advisor(reply: Option<Value>) -> Router {
    let services = Services::new(Repository::in_memory(), Arc::new(FixedAdvisor(reply))).await;
    let state = AppState {
        config: Arc::new(AppConfig::default()),
        services: Arc::new(services),
    };
    Router::new().nest("/api/v1", api::router(state))
}

async fn app() -> Router {
    app_with_advisor(None).await
}

fn token(role: Role, standards: Vec<Standard>) -> String {
    let now = chrono::Utc::now().timestamp();
    UserClaims {
        sub: "tech@sanvicente.com".to_string(),
        user_id: "tech_user".to_string(),
        organization_id: "org_hospital_san_vicente".to_string(),
        role,
        enabled_standards: standards,
        exp: now + 3600,
        iat: now,
    }
    .create_token(&AppConfig::default().auth.jwt_secret)
    .unwrap()
}

fn tech_token() -> String {
    token(Role::Tech, vec![Standard::Equipment])
}

async fn send(app: &Router, method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> (StatusCode, Vec<u8>) {
    let mut builder = Request::builder().method(method).uri(format!("/api/v1{}", uri));
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, bytes.to_vec())
}

async fn send_json(app: &Router, method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> (StatusCode, Value) {
    let (status, bytes) = send(app, method, uri, token, body).await;
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

#[tokio::test]
async fn test_health_and_ready() {
    let app = app().await;
    let (status, body) = send_json(&app, Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");

    let (status, body) = send_json(&app, Method::GET, "/ready", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["storage"], "memory");
}

#[tokio::test]
async fn test_requires_token() {
    let app = app().await;
    let (status, body) = send_json(&app, Method::GET, "/equipment", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], 2);

    let (status, _) = send_json(&app, Method::GET, "/equipment", Some("not-a-jwt"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_standard_and_role_gating() {
    let app = app().await;

    let without_standard = token(Role::Tech, vec![Standard::HumanTalent]);
    let (status, _) = send_json(&app, Method::GET, "/equipment", Some(&without_standard), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let viewer = token(Role::Viewer, vec![Standard::Equipment]);
    let (status, _) = send_json(&app, Method::GET, "/equipment", Some(&viewer), None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send_json(&app, Method::POST, "/equipment/eq_001/retire", Some(&viewer), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send_json(&app, Method::GET, "/standards", Some(&viewer), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 7);
    assert_eq!(body[2]["id"], "standard_3");
    assert_eq!(body[2]["enabled"], true);
    assert_eq!(body[0]["enabled"], false);
}

#[tokio::test]
async fn test_list_equipment_pagination_and_search() {
    let app = app().await;
    let token = tech_token();

    let (status, body) = send_json(&app, Method::GET, "/equipment", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 10);
    assert_eq!(body["per_page"], 10);
    assert_eq!(body["total_pages"], 1);
    assert_eq!(body["items"].as_array().unwrap().len(), 10);

    // Out-of-range page keeps page 1
    let (_, body) = send_json(&app, Method::GET, "/equipment?page=5", Some(&token), None).await;
    assert_eq!(body["page"], 1);
    for page in ["0", "-1"] {
        let uri = format!("/equipment?page={}", page);
        let (status, body) = send_json(&app, Method::GET, &uri, Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["page"], 1);
    }

    // Accent and case insensitive search
    let (_, body) = send_json(&app, Method::GET, "/equipment?search=ELECTROCARDIOGRAFO", Some(&token), None).await;
    assert_eq!(body["total"], 1);
    assert_eq!(body["items"][0]["name"], "Electrocardiógrafo Portátil");

    // No match is an empty page, not an error
    let (status, body) = send_json(&app, Method::GET, "/equipment?search=zzzz", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 0);
    assert_eq!(body["items"], json!([]));

    let (_, body) = send_json(&app, Method::GET, "/equipment/options?manufacturer=Philips", Some(&token), None).await;
    assert_eq!(body["model"], json!(["HeartStart XL+", "PageWriter TC20"]));
}

#[tokio::test]
async fn test_equipment_lifecycle() {
    let app = app().await;
    let token = tech_token();

    let (status, created) = send_json(
        &app,
        Method::POST,
        "/equipment",
        Some(&token),
        Some(json!({
            "name": "Monitor de Signos Vitales",
            "manufacturer": "Mindray",
            "model": "ePM 10",
            "serial": "MR-2024-001",
            "risk": "IIb",
            "installationDate": "2024-02-01"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = created["id"].as_str().unwrap().to_string();
    assert!(id.starts_with("EQP-"));
    assert_eq!(created["status"], "Activo");
    assert_eq!(created["acquisitionType"], "Compra");

    let (status, _) = send_json(
        &app,
        Method::PUT,
        &format!("/equipment/{}/documents", id),
        Some(&token),
        Some(json!({ "type": "invima", "name": "registro.pdf", "date": "2024-02-02" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, documentation) =
        send_json(&app, Method::GET, &format!("/equipment/{}/documentation", id), Some(&token), None).await;
    assert_eq!(documentation[0]["type"], "invima");
    assert_eq!(documentation[0]["attached"], true);
    assert_eq!(documentation[1]["attached"], false);

    let (_, summary) = send_json(&app, Method::GET, &format!("/equipment/{}/summary", id), Some(&token), None).await;
    assert_eq!(summary["riskLabel"], "Clase IIB");
    assert_eq!(summary["lastCalibration"], "N/A");

    let (status, retired) =
        send_json(&app, Method::POST, &format!("/equipment/{}/retire", id), Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(retired["status"], "Dado de Baja");

    let (status, _) = send_json(&app, Method::GET, "/equipment/missing", Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send_json(
        &app,
        Method::PUT,
        "/equipment/missing",
        Some(&token),
        Some(json!({ "name": "Fantasma" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send_json(&app, Method::POST, "/equipment", Some(&token), Some(json!({ "name": "" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_inventory_export() {
    let app = app().await;
    let token = tech_token();

    let (status, bytes) = send(&app, Method::GET, "/equipment/export?manufacturer=Philips", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    let csv = String::from_utf8(bytes).unwrap();
    let lines: Vec<_> = csv.lines().collect();
    assert!(lines[0].starts_with("ID Interno,Equipo,Marca,Modelo"));
    assert_eq!(lines.len(), 3);

    let (_, sheet) = send_json(&app, Method::GET, "/equipment/export?format=json", Some(&token), None).await;
    assert_eq!(sheet["name"], "Inventario");
    assert_eq!(sheet["columns"].as_array().unwrap().len(), 11);
    assert_eq!(sheet["rows"].as_array().unwrap().len(), 10);
}

#[tokio::test]
async fn test_dashboard() {
    let app = app().await;
    let (status, body) = send_json(&app, Method::GET, "/dashboard", Some(&tech_token()), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["totalEquipment"], 10);
    let uptime = body["uptimePercentage"].as_f64().unwrap();
    assert!((0.0..=100.0).contains(&uptime));
}

#[tokio::test]
async fn test_maintenance_schedule() {
    let app = app().await;
    let token = tech_token();

    let (status, page) = send_json(&app, Method::GET, "/maintenance/schedule?year=2024", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    let rows = page["items"].as_array().unwrap();
    assert!(!rows.is_empty());
    assert!(rows.iter().all(|r| r["monthlyTasks"].as_array().unwrap().len() == 12));

    let (status, unfiltered) = send_json(&app, Method::GET, "/maintenance/schedule?year=2024&month=12", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(unfiltered["total"], page["total"]);

    let (status, body) = send_json(&app, Method::GET, "/maintenance/schedule?page=-1", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["page"], 1);

    let (status, task) = send_json(
        &app,
        Method::POST,
        "/maintenance/tasks",
        Some(&token),
        Some(json!({ "equipmentId": "EQP-020", "type": "Calibración", "date": "2024-08-20" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let task_id = task["id"].as_str().unwrap();

    let (status, completed) = send_json(
        &app,
        Method::PUT,
        &format!("/maintenance/tasks/{}/complete", task_id),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(completed["completed"], true);

    let (status, bytes) = send(&app, Method::GET, "/maintenance/schedule/export?year=2024", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    let csv = String::from_utf8(bytes).unwrap();
    assert!(csv.starts_with("Equipo,Marca,Modelo,Serie,Estado Cronograma,Ene"));
}

#[tokio::test]
async fn test_compliance_advisor() {
    let reply = json!({
        "complianceAssessment": "Cumplimiento parcial del estándar de dotación",
        "suggestedActions": [{
            "actionTitle": "Calibración pendiente",
            "relatedEquipment": "Analizador de Gases",
            "justification": "Estándar 3 exige calibraciones vigentes",
            "suggestedAction": "Programar la calibración",
            "priority": "Alta"
        }]
    });
    let app = app_with_advisor(Some(reply)).await;
    let (status, body) = send_json(&app, Method::POST, "/advisory/compliance", Some(&tech_token()), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["suggestedActions"][0]["priority"], "Alta");
}

#[tokio::test]
async fn test_advisor_failure_is_bad_gateway() {
    let app = app().await;
    let (status, body) = send_json(&app, Method::POST, "/advisory/compliance", Some(&tech_token()), None).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["code"], 6);
    assert_eq!(body["message"], "No se pudieron obtener las sugerencias de cumplimiento de la IA.");

    let invalid = json!({ "predictedEOLDate": "pronto", "confidenceLevel": "baja", "justification": "?" });
    let app = app_with_advisor(Some(invalid)).await;
    let (status, _) = send_json(
        &app,
        Method::POST,
        "/equipment/eq_001/eol-forecast",
        Some(&tech_token()),
        Some(json!({ "usageFrequency": "diaria" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn test_documents_and_settings() {
    let app = app().await;
    let token = tech_token();

    let (status, file) = send_json(
        &app,
        Method::POST,
        "/documents/protocolos/files",
        Some(&token),
        Some(json!({ "name": "Protocolo-Autoclaves.pdf", "date": "2024-01-15", "sizeBytes": 870400 })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(file["size"], "850 KB");
    assert_eq!(file["date"], "Subido el 15 de enero de 2024");

    let (_, categories) = send_json(&app, Method::GET, "/documents", Some(&token), None).await;
    assert_eq!(categories[2]["files"].as_array().unwrap().len(), 3);

    // Company profile writes need an organization admin
    let company = json!({ "name": "Hospital San Vicente", "city": "Medellín" });
    let (status, _) = send_json(&app, Method::PUT, "/company", Some(&token), Some(company.clone())).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let admin = token_for_admin();
    let (status, body) = send_json(&app, Method::PUT, "/company", Some(&admin), Some(company)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["city"], "Medellín");
}

fn token_for_admin() -> String {
    token(Role::OrgAdmin, Standard::ALL.to_vec())
}

// Live server tests. Start the server with `DOTACION__STORAGE__BACKEND=memory`
// and set TEST_TOKEN to a token signed with the configured secret.

fn live_token() -> String {
    std::env::var("TEST_TOKEN").expect("TEST_TOKEN must be set for live tests")
}

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored
async fn test_live_health_check() {
    let client = reqwest::Client::new();

    let response = client
        .get(format!("{}/health", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
#[ignore]
async fn test_live_list_equipment() {
    let client = reqwest::Client::new();

    let response = client
        .get(format!("{}/equipment", BASE_URL))
        .bearer_auth(live_token())
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["items"].is_array());
    assert_eq!(body["per_page"], 10);
}

#[tokio::test]
#[ignore]
async fn test_live_unauthorized_access() {
    let client = reqwest::Client::new();

    let response = client
        .get(format!("{}/equipment", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 401);
}
