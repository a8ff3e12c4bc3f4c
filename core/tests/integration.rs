//! End-to-end tests against the live mock server.
//!
//! # Design
//! Starts the mock server on a random port, then drives every client
//! operation over real HTTP through `UreqTransport`. Validates that request
//! building, envelope processing and domain object construction agree with
//! an actual server.

use std::net::SocketAddr;

use smartwaiver_core::{
    ApiError, ClientConfig, EmailValidation, ResponseType, SmartwaiverClient, UreqTransport, WaiverQuery,
    WebhookConfig,
};

fn start_server() -> SocketAddr {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run(listener).await
        })
        .unwrap();
    });

    addr
}

fn client(addr: SocketAddr) -> SmartwaiverClient<UreqTransport> {
    let config = ClientConfig::new("TestApiKey").with_base_url(format!("http://{addr}"));
    SmartwaiverClient::new(&config).unwrap()
}

#[test]
fn templates() {
    let mut client = client(start_server());

    let templates = client.list_templates().unwrap();
    assert_eq!(templates.len(), 2);
    assert_eq!(templates[0].template_id(), "sprswrvh2keeh");
    assert_eq!(templates[0].published_version(), 78015);
    assert_eq!(client.last_response().unwrap().response_type(), ResponseType::Templates);

    let template = client.get_template("alkagaldeab").unwrap();
    assert_eq!(template.title(), "Equipment Rental Agreement");
    assert_eq!(client.last_response().unwrap().version(), 4);
}

#[test]
fn waivers() {
    let mut client = client(start_server());

    let summaries = client.list_waiver_summaries(&WaiverQuery::default()).unwrap();
    assert_eq!(summaries.len(), 2);

    let verified = client
        .list_waiver_summaries(&WaiverQuery::new().verified(true))
        .unwrap();
    assert_eq!(verified.len(), 1);
    assert_eq!(verified[0].waiver_id(), "6jebdfxzvrdkd");
    assert!(verified[0].is_minor());

    let by_template = client
        .list_waiver_summaries(&WaiverQuery::new().template_id("alkagaldeab").limit(1))
        .unwrap();
    assert_eq!(by_template.len(), 1);
    assert_eq!(by_template[0].last_name(), "Rivera");

    let waiver = client.get_waiver("6jebdfxzvrdkd", false).unwrap();
    assert_eq!(waiver.first_name(), "Kyle");
    assert_eq!(waiver.participants().len(), 1);
    assert_eq!(waiver.guardian().unwrap().relationship(), "Mother");
    assert_eq!(waiver.custom_waiver_fields().len(), 1);
    assert_eq!(waiver.pdf(), "");

    let with_pdf = client.get_waiver("6jebdfxzvrdkd", true).unwrap();
    assert!(!with_pdf.pdf().is_empty());

    let adult = client.get_waiver("vp7ne3rtmzhhq", false).unwrap();
    assert!(adult.guardian().is_none());
}

#[test]
fn webhook_lifecycle() {
    let mut client = client(start_server());

    let initial = client.get_webhook_config().unwrap();
    assert_eq!(initial.email_validation_required, EmailValidation::BeforeAndAfterEmail);

    let stored = client
        .set_webhook_config("http://endpoint.example.org", EmailValidation::AfterEmailOnly)
        .unwrap();
    assert_eq!(stored.endpoint, "http://endpoint.example.org");
    assert_eq!(stored.email_validation_required, EmailValidation::AfterEmailOnly);
    assert_eq!(client.last_response().unwrap().response().status, 201);

    let mut edited = client.get_webhook_config().unwrap();
    assert_eq!(edited, stored);

    edited.email_validation_required = EmailValidation::BeforeEmailOnly;
    let stored = client.set_webhook(&edited).unwrap();
    assert_eq!(stored, WebhookConfig::new("http://endpoint.example.org", EmailValidation::BeforeEmailOnly));
}

#[test]
fn known_errors() {
    let mut client = client(start_server());

    let err = client.get_waiver("missing", false).unwrap_err();
    assert!(matches!(err, ApiError::Known { status: 404, .. }), "got {err:?}");
    assert_eq!(err.to_string(), "Waiver not found: missing");
    assert_eq!(err.api_version(), Some(4));
    assert!(err.request_id().is_some());
    assert!(client.last_response().is_none());

    let err = client
        .list_waiver_summaries(&WaiverQuery::new().limit(500))
        .unwrap_err();
    assert!(matches!(err, ApiError::Known { status: 400, .. }), "got {err:?}");
}

#[test]
fn missing_api_key_is_an_auth_error() {
    let addr = start_server();
    let transport = UreqTransport::new(std::time::Duration::from_secs(5));
    let strip_key = move |request: &smartwaiver_core::HttpRequest| {
        let mut request = request.clone();
        request.headers.retain(|(name, _)| name != "sw-api-key");
        smartwaiver_core::Transport::send(&transport, &request)
    };
    let config = ClientConfig::new("TestApiKey").with_base_url(format!("http://{addr}"));
    let mut client = SmartwaiverClient::with_transport(&config, strip_key).unwrap();

    let err = client.list_templates().unwrap_err();
    assert_eq!(err.status(), Some(401));
    assert_eq!(err.to_string(), "No API key provided");
}

#[test]
fn raw_operations() {
    let client = client(start_server());

    let raw = client.get_template_raw("sprswrvh2keeh").unwrap();
    assert_eq!(raw.status_code, 200);
    let body: serde_json::Value = serde_json::from_str(&raw.body).unwrap();
    assert_eq!(body["template"]["templateId"], "sprswrvh2keeh");

    let raw = client.get_waiver_raw("missing", false).unwrap();
    assert_eq!(raw.status_code, 404);

    assert_eq!(client.list_templates_raw().unwrap().status_code, 200);
    assert_eq!(client.list_waiver_summaries_raw(&WaiverQuery::default()).unwrap().status_code, 200);
    assert_eq!(client.get_webhook_config_raw().unwrap().status_code, 200);
    let raw = client
        .set_webhook_config_raw("https://hooks.example.org", EmailValidation::BeforeEmailOnly)
        .unwrap();
    assert_eq!(raw.status_code, 201);
    assert!(client.last_response().is_none());
}

#[test]
fn unreachable_server_is_a_transport_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let mut client = client(addr);
    let err = client.list_templates().unwrap_err();
    assert!(matches!(err, ApiError::Transport(_)), "got {err:?}");
}
