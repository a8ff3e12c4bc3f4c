//! Verify request building, envelope processing and domain object
//! construction against the JSON test vectors stored in `test-vectors/`.
//!
//! Request bodies are compared as parsed JSON, not raw strings, so field
//! ordering cannot cause false negatives.

use serde_json::Value;
use smartwaiver_core::{
    envelope, ApiError, ClientConfig, CustomField, EmailValidation, Guardian, HttpMethod, HttpRequest,
    HttpResponse, Participant, ResponseType, SmartwaiverClient, Template, Transport, TransportError,
    WaiverQuery, Waiver, WaiverSummary, WebhookConfig,
};

const BASE_URL: &str = "http://localhost:3000";

fn client() -> SmartwaiverClient<impl Transport> {
    let transport = |_: &HttpRequest| -> Result<HttpResponse, TransportError> {
        Err(TransportError::new("test vectors never send"))
    };
    let config = ClientConfig::new("TestApiKey").with_base_url(BASE_URL);
    SmartwaiverClient::with_transport(&config, transport).unwrap()
}

fn parse_method(s: &str) -> HttpMethod {
    match s {
        "GET" => HttpMethod::Get,
        "PUT" => HttpMethod::Put,
        other => panic!("unknown method: {other}"),
    }
}

fn str_arg<'a>(args: &'a Value, key: &str) -> Option<&'a str> {
    args.get(key).and_then(Value::as_str)
}

fn waiver_query(args: &Value) -> WaiverQuery {
    let mut query = WaiverQuery::new();
    if let Some(limit) = args.get("limit").and_then(Value::as_u64) {
        query = query.limit(limit as u32);
    }
    if let Some(verified) = args.get("verified").and_then(Value::as_bool) {
        query = query.verified(verified);
    }
    if let Some(template_id) = str_arg(args, "templateId") {
        query = query.template_id(template_id);
    }
    if let Some(from_dts) = str_arg(args, "fromDts") {
        query = query.from_dts(from_dts);
    }
    if let Some(to_dts) = str_arg(args, "toDts") {
        query = query.to_dts(to_dts);
    }
    query
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

#[test]
fn request_test_vectors() {
    let raw = include_str!("../../test-vectors/requests.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    let c = client();
    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let args = &case["args"];
        let expected = &case["expected_request"];

        let req = match case["operation"].as_str().unwrap() {
            "list_templates" => c.build_list_templates(),
            "get_template" => c.build_get_template(str_arg(args, "templateId").unwrap()),
            "list_waiver_summaries" => c.build_list_waiver_summaries(&waiver_query(args)),
            "get_waiver" => c.build_get_waiver(
                str_arg(args, "waiverId").unwrap(),
                args["pdf"].as_bool().unwrap(),
            ),
            "get_webhook_config" => c.build_get_webhook_config(),
            "set_webhook_config" => {
                let setting: EmailValidation = str_arg(args, "emailValidationRequired").unwrap().parse().unwrap();
                let webhook = WebhookConfig::new(str_arg(args, "endpoint").unwrap(), setting);
                c.build_set_webhook_config(&webhook).unwrap()
            }
            other => panic!("{name}: unknown operation {other}"),
        };

        assert_eq!(req.method, parse_method(expected["method"].as_str().unwrap()), "{name}: method");
        assert_eq!(req.url, format!("{BASE_URL}{}", expected["path"].as_str().unwrap()), "{name}: url");
        assert_eq!(req.header("sw-api-key"), Some("TestApiKey"), "{name}: api key");
        assert!(req.header("user-agent").is_some(), "{name}: user agent");

        match &expected["body"] {
            Value::Null => assert!(req.body.is_none(), "{name}: body"),
            body => {
                let sent: Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
                assert_eq!(&sent, body, "{name}: body");
                assert_eq!(req.header("content-type"), Some("application/json"), "{name}: content type");
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Envelopes
// ---------------------------------------------------------------------------

#[test]
fn envelope_test_vectors() {
    let raw = include_str!("../../test-vectors/envelopes.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let status = case["status"].as_u64().unwrap() as u16;
        let body = match case.get("raw_body") {
            Some(raw_body) => raw_body.as_str().unwrap().to_string(),
            None => case["body"].to_string(),
        };
        let expected = &case["expected"];

        let result = envelope::process(HttpResponse::new(status, body.clone()));
        match (expected["kind"].as_str().unwrap(), result) {
            ("ok", Ok(env)) => {
                let kind = ResponseType::from_name(expected["type"].as_str().unwrap()).unwrap();
                assert_eq!(env.response_type(), kind, "{name}: type");
                assert_eq!(env.payload(), &case["body"][kind.payload_field()], "{name}: payload");
                assert_eq!(env.response().body, body, "{name}: response");
            }
            ("protocol", Err(ApiError::Protocol { message, response })) => {
                assert_eq!(message, expected["message"].as_str().unwrap(), "{name}: message");
                assert_eq!(response.status, status, "{name}: response status");
                assert_eq!(response.body, body, "{name}: response body");
            }
            ("known", Err(err @ ApiError::Known { .. })) => {
                assert_eq!(err.to_string(), expected["message"].as_str().unwrap(), "{name}: message");
                assert_eq!(err.status(), Some(status), "{name}: status");
                assert_eq!(err.request_id(), case["body"]["id"].as_str(), "{name}: request id");
            }
            (kind, other) => panic!("{name}: expected {kind}, got {other:?}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Domain objects
// ---------------------------------------------------------------------------

fn build(entity: &str, raw: &Value) -> Result<(), String> {
    let result = match entity {
        "Template" => Template::from_raw(raw).map(drop),
        "WaiverSummary" => WaiverSummary::from_raw(raw).map(drop),
        "Waiver" => Waiver::from_raw(raw).map(drop),
        "Participant" => Participant::from_raw(raw).map(drop),
        "CustomField" => CustomField::from_raw(raw).map(drop),
        "Guardian" => Guardian::from_raw(raw).map(drop),
        "WebhookConfig" => WebhookConfig::from_raw(raw).map(drop),
        other => panic!("unknown entity: {other}"),
    };
    result.map_err(|err| err.to_string())
}

#[test]
fn object_test_vectors() {
    let raw = include_str!("../../test-vectors/objects.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let entity = case["entity"].as_str().unwrap();

        let mut raw = vectors["fixtures"][entity].clone();
        let fields = raw.as_object_mut().unwrap();
        for key in case.get("remove").and_then(Value::as_array).into_iter().flatten() {
            fields.remove(key.as_str().unwrap());
        }
        for (key, value) in case.get("set").and_then(Value::as_object).into_iter().flatten() {
            fields.insert(key.clone(), value.clone());
        }

        let expected = case["error"].as_str().map(str::to_string);
        assert_eq!(build(entity, &raw).err(), expected, "{name}");
    }
}

#[test]
fn fixture_waiver_fields() {
    let raw = include_str!("../../test-vectors/objects.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    let waiver = Waiver::from_raw(&vectors["fixtures"]["Waiver"]).unwrap();
    assert_eq!(waiver.first_name(), "Kyle");
    assert_eq!(waiver.client_ip(), "192.0.2.0");
    assert_eq!(waiver.participants().len(), 1);
    assert_eq!(waiver.participants()[0].gender(), "Male");

    let custom = &waiver.custom_waiver_fields()["ha5bs1jy5wdop"];
    assert_eq!(custom.value(), "A friend");
    assert_eq!(custom.display_text(), "How did you hear about this company?");

    let guardian = waiver.guardian().unwrap();
    assert_eq!(guardian.first_name(), "Jane");
    assert_eq!(guardian.relationship(), "Mother");

    let webhook = WebhookConfig::from_raw(&vectors["fixtures"]["WebhookConfig"]).unwrap();
    assert_eq!(webhook.email_validation_required, EmailValidation::BeforeAndAfterEmail);
}
