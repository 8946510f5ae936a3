#![allow(dead_code)]

use omrs_core::{OmrsConfig, OpenmrsClient};
use serde_json::Value;
use std::sync::Arc;
use wiremock::{MockServer, Request};

pub const USER: &str = "admin";
pub const PW: &str = "Admin123";
pub const IDENTIFIER_TYPE_UUID: &str = "05a29f94-c0ed-11e2-94be-8c13b969e334";
pub const LOCATION_UUID: &str = "8d6c993e-c2cc-11de-8d13-0010c6dffd0f";

pub const PATIENT_UUID: &str = "1c3f1a2e-7d4b-4a5c-9e8f-0a1b2c3d4e5f";
pub const PERSON_UUID: &str = "2d4e2b3f-8e5c-4b6d-af90-1b2c3d4e5f60";
pub const OBS_UUID: &str = "3e5f3c4a-9f6d-4c7e-b0a1-2c3d4e5f6071";
pub const WEIGHT_CONCEPT_UUID: &str = "5089AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA";
pub const PROBLEM_CONCEPT_UUID: &str = "1284AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA";

pub const API: &str = "/ws/rest/v1";

/// A mock OpenMRS server and a client pointed at it.
pub async fn setup() -> (MockServer, OpenmrsClient) {
    let server = MockServer::start().await;
    let cfg = OmrsConfig::new(
        &server.uri(),
        USER,
        PW,
        IDENTIFIER_TYPE_UUID,
        LOCATION_UUID,
    )
    .expect("OmrsConfig::new should succeed");
    let client = OpenmrsClient::new(Arc::new(cfg)).expect("OpenmrsClient::new should succeed");
    (server, client)
}

pub fn api_path(resource: &str) -> String {
    format!("{API}/{resource}")
}

/// All requests the server received for `path`.
pub async fn requests_to(server: &MockServer, path: &str) -> Vec<Request> {
    server
        .received_requests()
        .await
        .expect("request recording should be enabled")
        .into_iter()
        .filter(|req| req.url.path() == path)
        .collect()
}

pub fn json_body(req: &Request) -> Value {
    serde_json::from_slice(&req.body).expect("request body should be JSON")
}
