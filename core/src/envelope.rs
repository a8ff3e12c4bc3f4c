//! Processing of the JSON envelope wrapped around every API response.
//!
//! # Design
//! Every Smartwaiver v4 response, successful or not, is an object carrying
//! `version`, `id`, `ts` and `type`. On success the payload sits in a field
//! named after `type`; on failure the object carries a `message`. `process`
//! enforces that contract in a fixed order and yields either a
//! `ResponseEnvelope` or an `ApiError::{Protocol, Known}`.

use std::fmt;

use serde_json::{Map, Value};

use crate::error::ApiError;
use crate::http::HttpResponse;
use crate::validate::first_missing;

/// Fields every response envelope must carry.
pub const REQUIRED_FIELDS: [&str; 4] = ["version", "id", "ts", "type"];

/// Status codes that carry a payload.
pub const SUCCESS_STATUSES: [u16; 2] = [200, 201];

/// Status codes the API uses for errors it reports with a `message`.
pub const ERROR_STATUSES: [u16; 7] = [400, 401, 402, 404, 405, 406, 500];

/// The payload kinds a successful response can announce in `type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResponseType {
    Templates,
    Template,
    Waivers,
    Waiver,
    Webhooks,
}

/// `type` value -> payload kind. The payload field is named after the type.
const RESPONSE_TYPES: [(&str, ResponseType); 5] = [
    ("templates", ResponseType::Templates),
    ("template", ResponseType::Template),
    ("waivers", ResponseType::Waivers),
    ("waiver", ResponseType::Waiver),
    ("webhooks", ResponseType::Webhooks),
];

impl ResponseType {
    pub fn from_name(name: &str) -> Option<Self> {
        RESPONSE_TYPES
            .iter()
            .find(|(type_name, _)| *type_name == name)
            .map(|(_, kind)| *kind)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ResponseType::Templates => "templates",
            ResponseType::Template => "template",
            ResponseType::Waivers => "waivers",
            ResponseType::Waiver => "waiver",
            ResponseType::Webhooks => "webhooks",
        }
    }

    /// Name of the envelope field holding this type's payload.
    pub fn payload_field(&self) -> &'static str {
        self.as_str()
    }
}

impl fmt::Display for ResponseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A successfully processed response.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseEnvelope {
    version: i64,
    id: String,
    ts: String,
    response_type: ResponseType,
    payload: Value,
    response: HttpResponse,
}

impl ResponseEnvelope {
    /// API version that produced this response.
    pub fn version(&self) -> i64 {
        self.version
    }

    /// Unique identifier of the request, useful when contacting support.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// ISO 8601 timestamp of when the response was created.
    pub fn ts(&self) -> &str {
        &self.ts
    }

    pub fn response_type(&self) -> ResponseType {
        self.response_type
    }

    /// The payload field, untouched.
    pub fn payload(&self) -> &Value {
        &self.payload
    }

    /// The HTTP response this envelope was parsed from.
    pub fn response(&self) -> &HttpResponse {
        &self.response
    }
}

/// Validates `response` and extracts its payload.
pub fn process(response: HttpResponse) -> Result<ResponseEnvelope, ApiError> {
    let contents = match serde_json::from_str::<Value>(&response.body) {
        Ok(Value::Object(contents)) => contents,
        // A scalar or array body is valid JSON but cannot carry the envelope
        // fields, so it is reported the same way as a missing `version`.
        Ok(_) => Map::new(),
        Err(_) => {
            return Err(ApiError::protocol(
                "Malformed JSON response from API server",
                response,
            ))
        }
    };

    if let Some(field) = first_missing(&contents, &REQUIRED_FIELDS) {
        return Err(ApiError::protocol(
            format!("API server response missing expected field: {field}"),
            response,
        ));
    }

    if SUCCESS_STATUSES.contains(&response.status) {
        success(contents, response)
    } else if ERROR_STATUSES.contains(&response.status) {
        match contents.get("message").map(text) {
            Some(message) => Err(ApiError::Known {
                message,
                status: response.status,
                envelope: contents,
            }),
            None => Err(ApiError::protocol(
                "Error response does not include message",
                response,
            )),
        }
    } else {
        let message = format!("Unknown HTTP code returned: {}", response.status);
        Err(ApiError::protocol(message, response))
    }
}

fn success(mut contents: Map<String, Value>, response: HttpResponse) -> Result<ResponseEnvelope, ApiError> {
    let type_name = contents.get("type").map(text).unwrap_or_default();
    let Some(response_type) = ResponseType::from_name(&type_name) else {
        return Err(ApiError::protocol(
            format!("JSON response contains unknown type: \"{type_name}\""),
            response,
        ));
    };
    let Some(payload) = contents.remove(response_type.payload_field()) else {
        return Err(ApiError::protocol(
            format!("JSON response does not contain field of type: \"{type_name}\""),
            response,
        ));
    };

    let version = contents.get("version").and_then(Value::as_i64);
    let id = contents.get("id").and_then(Value::as_str);
    let ts = contents.get("ts").and_then(Value::as_str);
    let (version, id, ts) = match (version, id, ts) {
        (Some(version), Some(id), Some(ts)) => (version, id.to_string(), ts.to_string()),
        (None, _, _) => return Err(wrong_type("version", response)),
        (_, None, _) => return Err(wrong_type("id", response)),
        (_, _, None) => return Err(wrong_type("ts", response)),
    };

    Ok(ResponseEnvelope {
        version,
        id,
        ts,
        response_type,
        payload,
        response,
    })
}

fn wrong_type(field: &str, response: HttpResponse) -> ApiError {
    ApiError::protocol(
        format!("API server response field has wrong type: {field}"),
        response,
    )
}

/// Renders a JSON value the way it appears in messages: strings unquoted.
fn text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
