use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, Request, State,
    },
    http::StatusCode,
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use tower_http::trace::TraceLayer;
use tracing::{debug, warn};
use uuid::Uuid;

pub mod fixtures;

pub const API_VERSION: i64 = 4;
pub const API_KEY_HEADER: &str = "sw-api-key";

pub const DEFAULT_WAIVER_LIMIT: usize = 20;
pub const MAX_WAIVER_LIMIT: usize = 100;

/// Accepted values of `emailValidationRequired`.
pub const EMAIL_VALIDATION_VALUES: [&str; 3] = ["no", "yes", "both"];

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookSettings {
    pub endpoint: String,
    pub email_validation_required: String,
}

impl Default for WebhookSettings {
    fn default() -> Self {
        Self {
            endpoint: "https://www.example.org/smartwaiver/webhook".to_string(),
            email_validation_required: "both".to_string(),
        }
    }
}

impl WebhookSettings {
    fn to_json(&self) -> Value {
        json!({
            "endpoint": self.endpoint,
            "emailValidationRequired": self.email_validation_required,
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WaiverParams {
    pub limit: Option<usize>,
    pub verified: Option<bool>,
    pub template_id: Option<String>,
    pub from_dts: Option<String>,
    pub to_dts: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PdfParams {
    pub pdf: Option<bool>,
}

pub type Webhook = Arc<RwLock<WebhookSettings>>;

/// An error the mock API reports inside an error envelope.
#[derive(Debug)]
pub struct ApiFailure {
    status: StatusCode,
    kind: &'static str,
    message: String,
}

impl ApiFailure {
    fn parameter(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            kind: "parameter_error",
            message: message.into(),
        }
    }

    fn auth(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            kind: "auth_error",
            message: message.into(),
        }
    }

    fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            kind: "data_error",
            message: message.into(),
        }
    }
}

impl IntoResponse for ApiFailure {
    fn into_response(self) -> Response {
        let mut body = envelope_base(self.kind);
        body["message"] = Value::String(self.message);
        (self.status, Json(body)).into_response()
    }
}

fn envelope_base(kind: &str) -> Value {
    json!({
        "version": API_VERSION,
        "id": Uuid::new_v4().simple().to_string(),
        "ts": Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        "type": kind,
    })
}

/// Wraps `payload` in a success envelope of the given type.
pub fn envelope(kind: &str, payload: Value) -> Value {
    let mut body = envelope_base(kind);
    body[kind] = payload;
    body
}

pub fn app() -> Router {
    let webhook: Webhook = Arc::new(RwLock::new(WebhookSettings::default()));
    Router::new()
        .route("/v4/templates", get(list_templates))
        .route("/v4/templates/{id}", get(get_template))
        .route("/v4/waivers", get(list_waivers))
        .route("/v4/waivers/{id}", get(get_waiver))
        .route("/v4/webhooks/configure", get(get_webhook).put(put_webhook))
        .fallback(unknown_route)
        .with_state(webhook)
        .layer(middleware::from_fn(require_api_key))
        .layer(TraceLayer::new_for_http())
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn require_api_key(request: Request, next: Next) -> Response {
    let has_key = request
        .headers()
        .get(API_KEY_HEADER)
        .is_some_and(|value| !value.is_empty());
    if has_key {
        next.run(request).await
    } else {
        warn!(uri = %request.uri(), "rejected request without API key");
        ApiFailure::auth("No API key provided").into_response()
    }
}

async fn unknown_route() -> ApiFailure {
    ApiFailure::not_found("Route not found")
}

async fn list_templates() -> Json<Value> {
    Json(envelope("templates", Value::Array(fixtures::templates())))
}

async fn get_template(Path(id): Path<String>) -> Result<Json<Value>, ApiFailure> {
    fixtures::templates()
        .into_iter()
        .find(|template| template["templateId"] == id.as_str())
        .map(|template| Json(envelope("template", template)))
        .ok_or_else(|| ApiFailure::not_found(format!("Template not found: {id}")))
}

async fn list_waivers(
    params: Result<Query<WaiverParams>, QueryRejection>,
) -> Result<Json<Value>, ApiFailure> {
    let Query(params) = params.map_err(|rejection| ApiFailure::parameter(rejection.body_text()))?;
    let limit = params.limit.unwrap_or(DEFAULT_WAIVER_LIMIT);
    if !(1..=MAX_WAIVER_LIMIT).contains(&limit) {
        return Err(ApiFailure::parameter(format!(
            "Parameter 'limit' must be between 1 and {MAX_WAIVER_LIMIT}"
        )));
    }
    debug!(?params, "listing waivers");

    let summaries: Vec<Value> = fixtures::waivers()
        .iter()
        .filter(|waiver| params.verified.map_or(true, |verified| waiver["verified"] == verified))
        .filter(|waiver| {
            params
                .template_id
                .as_deref()
                .map_or(true, |template_id| waiver["templateId"] == template_id)
        })
        .take(limit)
        .map(fixtures::summary)
        .collect();
    Ok(Json(envelope("waivers", Value::Array(summaries))))
}

async fn get_waiver(
    Path(id): Path<String>,
    params: Result<Query<PdfParams>, QueryRejection>,
) -> Result<Json<Value>, ApiFailure> {
    let Query(params) = params.map_err(|rejection| ApiFailure::parameter(rejection.body_text()))?;
    let mut waiver = fixtures::waivers()
        .into_iter()
        .find(|waiver| waiver["waiverId"] == id.as_str())
        .ok_or_else(|| ApiFailure::not_found(format!("Waiver not found: {id}")))?;
    if params.pdf.unwrap_or(false) {
        waiver["pdf"] = Value::String(fixtures::PDF_BASE64.to_string());
    }
    Ok(Json(envelope("waiver", waiver)))
}

async fn get_webhook(State(webhook): State<Webhook>) -> Json<Value> {
    let settings = webhook.read().await;
    Json(envelope("webhooks", settings.to_json()))
}

async fn put_webhook(
    State(webhook): State<Webhook>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<Value>), ApiFailure> {
    let Json(body) = body.map_err(|rejection| ApiFailure::parameter(rejection.body_text()))?;
    let endpoint = body
        .get("endpoint")
        .and_then(Value::as_str)
        .ok_or_else(|| ApiFailure::parameter("Field 'endpoint' is required"))?;
    let email_validation_required = body
        .get("emailValidationRequired")
        .and_then(Value::as_str)
        .filter(|value| EMAIL_VALIDATION_VALUES.contains(value))
        .ok_or_else(|| {
            ApiFailure::parameter("Field 'emailValidationRequired' must be one of: no, yes, both")
        })?;

    let mut settings = webhook.write().await;
    *settings = WebhookSettings {
        endpoint: endpoint.to_string(),
        email_validation_required: email_validation_required.to_string(),
    };
    debug!(endpoint, email_validation_required, "webhook configuration replaced");
    Ok((StatusCode::CREATED, Json(envelope("webhooks", settings.to_json()))))
}
