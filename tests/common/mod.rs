//! Common test utilities for the SCIM provisioning test suite.
//!
//! Server and dispatcher setup, request helpers and assertion macros shared by the
//! validation and integration tests.


use http::Method;
use scim_provisioning::providers::InMemoryProvider;
use scim_provisioning::{
    ResourceType, ScimDispatcher, ScimRequest, ScimResponse, ScimServer, ScimServerBuilder,
};
use serde_json::Value;

/// Base URL every test server is configured with.
pub const BASE_URL: &str = "https://example.com/scim";

/// Install a logger once; `RUST_LOG=debug` shows dispatcher logs.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// The provider used by [`server`]: `userName` is unique among Users.
pub fn provider() -> InMemoryProvider {
    InMemoryProvider::new().with_unique_attribute("User", "userName")
}

/// A server with the standard `/Users` (with enterprise extension) and `/Groups`.
pub fn server() -> ScimServer<InMemoryProvider> {
    ScimServerBuilder::new(provider())
        .with_base_url(BASE_URL)
        .with_max_results(50)
        .register_resource_type(ResourceType::core_user().expect("embedded user schema"))
        .register_resource_type(ResourceType::core_group().expect("embedded group schema"))
        .build()
        .expect("test server configuration is valid")
}

pub fn dispatcher() -> ScimDispatcher<InMemoryProvider> {
    init_logging();
    ScimDispatcher::new(server())
}

/// Send a request, with a JSON body when given.
pub async fn send(
    dispatcher: &ScimDispatcher<InMemoryProvider>,
    method: Method,
    target: &str,
    body: Option<Value>,
) -> ScimResponse {
    let request = ScimRequest::new(method, target);
    let request = match body {
        Some(body) => request.with_json(&body),
        None => request,
    };
    dispatcher.handle(request).await
}

/// POST a resource and return its server-assigned id. Panics unless the response is 201.
pub async fn create(
    dispatcher: &ScimDispatcher<InMemoryProvider>,
    endpoint: &str,
    body: Value,
) -> String {
    let response = send(dispatcher, Method::POST, endpoint, Some(body)).await;
    assert_eq!(
        response.status,
        http::StatusCode::CREATED,
        "create failed: {:?}",
        response.body
    );
    body_of(&response)["id"]
        .as_str()
        .expect("created resource has an id")
        .to_string()
}

/// Response body, panicking on 204.
pub fn body_of(response: &ScimResponse) -> &Value {
    response.body.as_ref().expect("response has a body")
}

/// Custom assertion macro for validation errors surfaced as [`ScimError::Validation`]
///
/// [`ScimError::Validation`]: scim_provisioning::ScimError::Validation
#[macro_export]
macro_rules! assert_validation_error {
    ($result:expr, $error_variant:pat) => {
        match &$result {
            Err(::scim_provisioning::ScimError::Validation($error_variant)) => {}
            Ok(_) => panic!("Expected validation error, but validation passed"),
            Err(other) => panic!("Expected specific validation error, got {:?}", other),
        }
    };
}

/// Custom assertion macro for error message contents
#[macro_export]
macro_rules! assert_error_message_contains {
    ($result:expr, $substring:expr) => {
        match &$result {
            Err(err) => assert!(
                err.to_string().contains($substring),
                "Error message '{}' does not contain '{}'",
                err,
                $substring
            ),
            Ok(_) => panic!(
                "Expected error containing '{}', but the call succeeded",
                $substring
            ),
        }
    };
}

/// Assert a SCIM error response: status code, `scimType` (or its absence) and the
/// error envelope shape.
#[macro_export]
macro_rules! assert_scim_error {
    ($response:expr, $status:expr, $scim_type:expr) => {{
        let response = &$response;
        assert_eq!(response.status, $status, "unexpected body {:?}", response.body);
        let body = response.body.as_ref().expect("error responses have a body");
        assert_eq!(
            body["schemas"],
            ::serde_json::json!(["urn:ietf:params:scim:api:messages:2.0:Error"])
        );
        assert_eq!(body["status"], ::serde_json::json!($status.as_u16().to_string()));
        let expected: Option<&str> = $scim_type;
        assert_eq!(body.get("scimType").and_then(|t| t.as_str()), expected);
        assert!(body["detail"].is_string());
    }};
}
