//! Synchronous client core for the Smartwaiver v4 REST API.
//!
//! # Overview
//! Lists and fetches waiver templates, queries signed waivers and reads or
//! replaces the account's webhook configuration. Responses are checked
//! against the API's envelope contract and turned into typed domain objects.
//!
//! # Design
//! - Each operation is split into `build_*` (produces an `HttpRequest`) and
//!   envelope processing plus `from_raw` (consumes an `HttpResponse`), so the
//!   I/O boundary is explicit and hosts can bring their own HTTP stack.
//! - `SmartwaiverClient` is generic over a `Transport`; the default `ureq`
//!   feature ships a blocking one.
//! - Domain objects are defined independently from the mock-server crate;
//!   integration tests catch schema drift.

pub mod client;
pub mod config;
pub mod envelope;
pub mod error;
pub mod http;
pub mod routes;
pub mod types;
pub mod validate;

pub use client::SmartwaiverClient;
pub use config::ClientConfig;
pub use envelope::{ResponseEnvelope, ResponseType};
pub use error::ApiError;
#[cfg(feature = "ureq")]
pub use http::UreqTransport;
pub use http::{HttpMethod, HttpRequest, HttpResponse, RawResponse, Transport, TransportError};
pub use routes::WaiverQuery;
pub use types::{
    CustomField, EmailValidation, Guardian, Participant, Template, Waiver, WaiverSummary, WebhookConfig,
};
pub use validate::ValidationError;
