//! Request building and the high-level Smartwaiver client.
//!
//! # Design
//! Each remote capability is split the same way: a `build_*` method produces
//! an `HttpRequest` as plain data, the `Transport` executes it, and the
//! envelope processor plus the domain object constructors interpret the
//! `HttpResponse`. Hosts that do their own I/O can call `build_*` and
//! `envelope::process` directly; everyone else uses the one-call operations.
//!
//! Every non-raw operation overwrites `last_response`, so the metadata of
//! the most recent envelope (request id, timestamp) stays inspectable after
//! the call, including when building the domain object failed. The slot is
//! why those operations take `&mut self`; share a client across threads by
//! giving each thread its own.

use serde_json::Value;
use tracing::{debug, error, warn};

use crate::config::ClientConfig;
use crate::envelope::{self, ResponseEnvelope};
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse, RawResponse, Transport};
use crate::routes::{Routes, WaiverQuery};
use crate::types::{EmailValidation, Template, Waiver, WaiverSummary, WebhookConfig};
use crate::validate::ValidationError;

pub const USER_AGENT_HEADER: &str = "user-agent";
pub const API_KEY_HEADER: &str = "sw-api-key";

/// Synchronous client for the Smartwaiver v4 API.
pub struct SmartwaiverClient<T> {
    routes: Routes,
    headers: Vec<(String, String)>,
    transport: T,
    last_response: Option<ResponseEnvelope>,
}

#[cfg(feature = "ureq")]
impl SmartwaiverClient<crate::http::UreqTransport> {
    /// Creates a client that talks to the API over `ureq`.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::InvalidConfig` if `config` does not validate.
    pub fn new(config: &ClientConfig) -> Result<Self, ApiError> {
        Self::with_transport(config, crate::http::UreqTransport::new(config.timeout))
    }
}

impl<T: Transport> SmartwaiverClient<T> {
    /// Creates a client that sends every request through `transport`.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::InvalidConfig` if `config` does not validate.
    pub fn with_transport(config: &ClientConfig, transport: T) -> Result<Self, ApiError> {
        config.validate()?;
        Ok(Self {
            routes: Routes::new(&config.base_url),
            headers: vec![
                (USER_AGENT_HEADER.to_string(), config.user_agent.clone()),
                (API_KEY_HEADER.to_string(), config.api_key.clone()),
            ],
            transport,
            last_response: None,
        })
    }

    pub fn routes(&self) -> &Routes {
        &self.routes
    }

    /// The envelope of the most recent non-raw call, if it got that far.
    ///
    /// `None` before the first call, and after a call whose transport or
    /// envelope processing failed.
    pub fn last_response(&self) -> Option<&ResponseEnvelope> {
        self.last_response.as_ref()
    }

    // -- request builders ---------------------------------------------------

    pub fn build_list_templates(&self) -> HttpRequest {
        self.get(self.routes.templates())
    }

    pub fn build_get_template(&self, template_id: &str) -> HttpRequest {
        self.get(self.routes.template(template_id))
    }

    pub fn build_list_waiver_summaries(&self, query: &WaiverQuery) -> HttpRequest {
        self.get(self.routes.waivers(query))
    }

    pub fn build_get_waiver(&self, waiver_id: &str, pdf: bool) -> HttpRequest {
        self.get(self.routes.waiver(waiver_id, pdf))
    }

    pub fn build_get_webhook_config(&self) -> HttpRequest {
        self.get(self.routes.webhook_config())
    }

    /// # Errors
    ///
    /// Returns `ApiError::Serialization` if the body cannot be encoded.
    pub fn build_set_webhook_config(&self, webhook: &WebhookConfig) -> Result<HttpRequest, ApiError> {
        let body = serde_json::to_string(webhook).map_err(|e| ApiError::Serialization(e.to_string()))?;
        let mut headers = self.headers.clone();
        headers.push(("content-type".to_string(), "application/json".to_string()));
        Ok(HttpRequest {
            method: HttpMethod::Put,
            url: self.routes.webhook_config(),
            headers,
            body: Some(body),
        })
    }

    // -- operations ---------------------------------------------------------

    /// Lists the waiver templates on the account.
    pub fn list_templates(&mut self) -> Result<Vec<Template>, ApiError> {
        let request = self.build_list_templates();
        let envelope = self.fetch(request)?;
        list_payload(envelope, Template::from_raw)
    }

    pub fn get_template(&mut self, template_id: &str) -> Result<Template, ApiError> {
        let request = self.build_get_template(template_id);
        let envelope = self.fetch(request)?;
        Ok(Template::from_raw(envelope.payload()).inspect_err(log_validation)?)
    }

    /// Runs the waiver list query. Only summaries are returned; use
    /// `get_waiver` for the full record.
    pub fn list_waiver_summaries(&mut self, query: &WaiverQuery) -> Result<Vec<WaiverSummary>, ApiError> {
        let request = self.build_list_waiver_summaries(query);
        let envelope = self.fetch(request)?;
        list_payload(envelope, WaiverSummary::from_raw)
    }

    /// Fetches one waiver. With `pdf` set the base64 PDF is included.
    pub fn get_waiver(&mut self, waiver_id: &str, pdf: bool) -> Result<Waiver, ApiError> {
        let request = self.build_get_waiver(waiver_id, pdf);
        let envelope = self.fetch(request)?;
        Ok(Waiver::from_raw(envelope.payload()).inspect_err(log_validation)?)
    }

    pub fn get_webhook_config(&mut self) -> Result<WebhookConfig, ApiError> {
        let request = self.build_get_webhook_config();
        let envelope = self.fetch(request)?;
        Ok(WebhookConfig::from_raw(envelope.payload()).inspect_err(log_validation)?)
    }

    /// Replaces the webhook configuration and returns what the server stored.
    pub fn set_webhook_config(
        &mut self,
        endpoint: &str,
        email_validation_required: EmailValidation,
    ) -> Result<WebhookConfig, ApiError> {
        self.set_webhook(&WebhookConfig::new(endpoint, email_validation_required))
    }

    pub fn set_webhook(&mut self, webhook: &WebhookConfig) -> Result<WebhookConfig, ApiError> {
        let request = self.build_set_webhook_config(webhook)?;
        let envelope = self.fetch(request)?;
        Ok(WebhookConfig::from_raw(envelope.payload()).inspect_err(log_validation)?)
    }

    // -- raw operations -----------------------------------------------------

    pub fn list_templates_raw(&self) -> Result<RawResponse, ApiError> {
        self.send(&self.build_list_templates()).map(RawResponse::from)
    }

    pub fn get_template_raw(&self, template_id: &str) -> Result<RawResponse, ApiError> {
        self.send(&self.build_get_template(template_id)).map(RawResponse::from)
    }

    pub fn list_waiver_summaries_raw(&self, query: &WaiverQuery) -> Result<RawResponse, ApiError> {
        self.send(&self.build_list_waiver_summaries(query)).map(RawResponse::from)
    }

    pub fn get_waiver_raw(&self, waiver_id: &str, pdf: bool) -> Result<RawResponse, ApiError> {
        self.send(&self.build_get_waiver(waiver_id, pdf)).map(RawResponse::from)
    }

    pub fn get_webhook_config_raw(&self) -> Result<RawResponse, ApiError> {
        self.send(&self.build_get_webhook_config()).map(RawResponse::from)
    }

    pub fn set_webhook_config_raw(
        &self,
        endpoint: &str,
        email_validation_required: EmailValidation,
    ) -> Result<RawResponse, ApiError> {
        self.set_webhook_raw(&WebhookConfig::new(endpoint, email_validation_required))
    }

    pub fn set_webhook_raw(&self, webhook: &WebhookConfig) -> Result<RawResponse, ApiError> {
        let request = self.build_set_webhook_config(webhook)?;
        self.send(&request).map(RawResponse::from)
    }

    // -- plumbing -----------------------------------------------------------

    fn get(&self, url: String) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            url,
            headers: self.headers.clone(),
            body: None,
        }
    }

    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
        debug!(method = %request.method, url = %request.url, "sending request");
        let response = self.transport.send(request).inspect_err(|err| {
            error!(url = %request.url, error = %err, "transport failure");
        })?;
        debug!(status = response.status, bytes = response.body.len(), "received response");
        Ok(response)
    }

    /// Sends `request`, processes the envelope and records it.
    fn fetch(&mut self, request: HttpRequest) -> Result<&ResponseEnvelope, ApiError> {
        self.last_response = None;
        let response = self.send(&request)?;
        match envelope::process(response) {
            Ok(envelope) => {
                debug!(
                    id = envelope.id(),
                    response_type = %envelope.response_type(),
                    "processed response envelope"
                );
                Ok(self.last_response.insert(envelope))
            }
            Err(err) => {
                match &err {
                    ApiError::Known { status, message, .. } => {
                        warn!(status, message = %message, request_id = err.request_id(), "API reported an error");
                    }
                    other => error!(error = %other, "invalid API response"),
                }
                Err(err)
            }
        }
    }
}

impl<T> std::fmt::Debug for SmartwaiverClient<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmartwaiverClient")
            .field("base_url", &self.routes.base_url())
            .field("last_response", &self.last_response)
            .finish_non_exhaustive()
    }
}

/// Builds one domain object per element of a list payload.
fn list_payload<D>(
    envelope: &ResponseEnvelope,
    build: fn(&Value) -> Result<D, ValidationError>,
) -> Result<Vec<D>, ApiError> {
    let items = envelope.payload().as_array().ok_or_else(|| {
        ApiError::protocol(
            format!(
                "JSON response field of type \"{}\" is not a list",
                envelope.response_type()
            ),
            envelope.response().clone(),
        )
    })?;
    items
        .iter()
        .map(|raw| build(raw).inspect_err(log_validation).map_err(ApiError::from))
        .collect()
}

fn log_validation(err: &ValidationError) {
    warn!(error = %err, "could not build domain object from payload");
}
