mod common;

use common::*;
use omrs_core::{Gender, NewPatient, NonEmptyText, OmrsError};
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn new_patient() -> NewPatient {
    NewPatient {
        given_name: NonEmptyText::new("Jane").expect("non-empty"),
        family_name: NonEmptyText::new("Doe").expect("non-empty"),
        gender: Gender::Female,
        age: Some(42),
    }
}

async fn mount_create_person(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path(api_path("person")))
        .and(body_partial_json(json!({
            "gender": "F",
            "age": 42,
            "names": [{"givenName": "Jane", "familyName": "Doe"}]
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"uuid": PERSON_UUID})))
        .expect(1)
        .mount(server)
        .await;
}

async fn mount_idgen(server: &MockServer, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path("/module/idgen/generateIdentifier.form"))
        .and(query_param("source", "1"))
        .and(query_param("username", USER))
        .and(query_param("password", PW))
        .respond_with(response)
        .expect(1)
        .mount(server)
        .await;
}

async fn mount_purge(server: &MockServer, response: ResponseTemplate) {
    Mock::given(method("DELETE"))
        .and(path(api_path(&format!("person/{PERSON_UUID}"))))
        .and(query_param("purge", "true"))
        .respond_with(response)
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_register_patient_runs_full_pipeline() {
    let (server, client) = setup().await;
    mount_create_person(&server).await;
    mount_idgen(
        &server,
        ResponseTemplate::new(200).set_body_json(json!({"identifiers": ["100-8"]})),
    )
    .await;

    Mock::given(method("POST"))
        .and(path(api_path("patient")))
        .and(body_partial_json(json!({
            "person": PERSON_UUID,
            "identifiers": [{
                "identifier": "100-8",
                "identifierType": IDENTIFIER_TYPE_UUID,
                "location": LOCATION_UUID,
                "preferred": true
            }]
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"uuid": PATIENT_UUID})))
        .expect(1)
        .mount(&server)
        .await;

    let registered = client
        .register_patient(&new_patient())
        .await
        .expect("registration should succeed");

    assert_eq!(registered.person_uuid.as_str(), PERSON_UUID);
    assert_eq!(registered.patient_uuid.as_str(), PATIENT_UUID);
    assert_eq!(registered.identifier, "100-8");
}

#[tokio::test]
async fn test_register_patient_person_failure_stops_pipeline() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path(api_path("person")))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": {"message": "Invalid Submission"}
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/module/idgen/generateIdentifier.form"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"identifiers": ["1"]})))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(204))
        .expect(0)
        .mount(&server)
        .await;

    let err = client
        .register_patient(&new_patient())
        .await
        .expect_err("should fail");
    assert!(matches!(err, OmrsError::MissingField { field: "uuid", .. }));
}

#[tokio::test]
async fn test_register_patient_idgen_failure_purges_person() {
    let (server, client) = setup().await;
    mount_create_person(&server).await;
    mount_idgen(
        &server,
        ResponseTemplate::new(200).set_body_string("<html>login</html>"),
    )
    .await;
    mount_purge(&server, ResponseTemplate::new(204)).await;

    let err = client
        .register_patient(&new_patient())
        .await
        .expect_err("should fail");
    assert!(matches!(err, OmrsError::MalformedResponse { body, .. } if body == "<html>login</html>"));
}

#[tokio::test]
async fn test_register_patient_empty_identifiers_purges_person() {
    let (server, client) = setup().await;
    mount_create_person(&server).await;
    mount_idgen(
        &server,
        ResponseTemplate::new(200).set_body_json(json!({"identifiers": []})),
    )
    .await;
    mount_purge(&server, ResponseTemplate::new(204)).await;

    let err = client
        .register_patient(&new_patient())
        .await
        .expect_err("should fail");
    assert!(matches!(err, OmrsError::MissingField { field: "identifiers", .. }));
}

#[tokio::test]
async fn test_register_patient_reports_orphan_when_purge_fails() {
    let (server, client) = setup().await;
    mount_create_person(&server).await;
    mount_idgen(
        &server,
        ResponseTemplate::new(200).set_body_json(json!({"identifiers": ["100-8"]})),
    )
    .await;
    Mock::given(method("POST"))
        .and(path(api_path("patient")))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": {"message": "Identifier already in use"}
        })))
        .expect(1)
        .mount(&server)
        .await;
    mount_purge(&server, ResponseTemplate::new(500)).await;

    let err = client
        .register_patient(&new_patient())
        .await
        .expect_err("should fail");

    match err {
        OmrsError::CleanupAfterRegistrationFailed {
            person_uuid,
            registration_error,
            cleanup_error,
        } => {
            assert_eq!(person_uuid.as_str(), PERSON_UUID);
            assert!(matches!(
                *registration_error,
                OmrsError::MissingField { field: "uuid", ref body } if body.contains("already in use")
            ));
            assert!(matches!(*cleanup_error, OmrsError::Http(_)));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_create_person_without_age_omits_field() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path(api_path("person")))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"uuid": PERSON_UUID})))
        .expect(1)
        .mount(&server)
        .await;

    let patient = new_patient();
    client
        .create_person(&patient.given_name, &patient.family_name, Gender::Male, None)
        .await
        .expect("person should be created");

    let posts = requests_to(&server, &api_path("person")).await;
    let body = json_body(&posts[0]);
    assert_eq!(body["gender"], "M");
    assert!(body.get("age").is_none());
}

#[tokio::test]
async fn test_identifier_transport_error_does_not_expose_password() {
    let cfg = omrs_core::OmrsConfig::new(
        "http://127.0.0.1:1/openmrs",
        USER,
        "S3cretPw",
        IDENTIFIER_TYPE_UUID,
        LOCATION_UUID,
    )
    .expect("OmrsConfig::new should succeed");
    let client = omrs_core::OpenmrsClient::new(std::sync::Arc::new(cfg))
        .expect("OpenmrsClient::new should succeed");

    let err = client
        .generate_patient_identifier()
        .await
        .expect_err("nothing listens on port 1");

    assert!(matches!(err, OmrsError::Http(_)));
    let msg = err.to_string();
    assert!(!msg.contains("S3cretPw"), "password leaked: {msg}");
    assert!(!msg.contains("password="), "query leaked: {msg}");
}
