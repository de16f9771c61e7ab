use bmi_tracker::core::{BmiApi, NewBmiRecord, RecordId};
use bmi_tracker::domain::model::Measurements;
use bmi_tracker::utils::error::{ApiOperation, TrackerError};
use bmi_tracker::HttpBmiApi;
use chrono::{DateTime, Utc};
use httpmock::prelude::*;
use std::time::Duration;

fn sample_record() -> NewBmiRecord {
    let created_at = "2024-05-02T08:30:00Z".parse::<DateTime<Utc>>().unwrap();
    NewBmiRecord::new(
        Measurements {
            height: 1.75,
            weight: 70.0,
            age: Some(30),
        },
        2,
        created_at,
    )
}

#[tokio::test]
async fn test_list_records_parses_history() {
    let server = MockServer::start();
    let list_mock = server.mock(|when, then| {
        when.method(GET)
            .path("/api/user/bmi")
            .header("content-type", "application/json");
        then.status(200).json_body(serde_json::json!([
            {"id": 1, "height": 1.75, "weight": 70, "age": 30, "bmi": 22.86, "createdAt": "2024-05-02T08:30:00.000Z"},
            {"id": "rec-2", "height": 1.6, "weight": 90, "bmi": 35.16}
        ]));
    });

    let api = HttpBmiApi::new(&server.base_url()).unwrap();
    let records = api.list_records().await.unwrap();

    list_mock.assert();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].id, Some(RecordId::Number(1)));
    assert_eq!(records[0].weight, 70.0);
    assert_eq!(records[1].id, Some(RecordId::Text("rec-2".to_string())));
    assert_eq!(records[1].age, None);
}

#[tokio::test]
async fn test_list_records_tolerates_irregular_fields() {
    let server = MockServer::start();
    let list_mock = server.mock(|when, then| {
        when.method(GET).path("/api/user/bmi");
        then.status(200).json_body(serde_json::json!([
            {"id": 1, "height": 1.75, "weight": 70, "age": 30, "createdAt": "2024-05-02T08:30:00Z"},
            {"id": 2, "height": 1.6, "weight": 90, "age": 34.5, "createdAt": "2024-05-02 08:30:00"},
            {"id": 3, "height": 1.8, "weight": 55, "age": 999, "createdAt": "not a date"}
        ]));
    });

    let api = HttpBmiApi::new(&server.base_url()).unwrap();
    let records = api.list_records().await.unwrap();

    list_mock.assert();
    assert_eq!(records.len(), 3);
    assert!(records[1].created_at.is_some());
    assert_eq!(records[0].created_at, records[1].created_at);
    assert_eq!(records[1].age, Some(34));
    assert_eq!(records[2].age, None);
    assert_eq!(records[2].created_at, None);
}

#[tokio::test]
async fn test_list_records_non_success_status() {
    let server = MockServer::start();
    let list_mock = server.mock(|when, then| {
        when.method(GET).path("/api/user/bmi");
        then.status(503).json_body(serde_json::json!({"message": "maintenance"}));
    });

    let api = HttpBmiApi::new(&server.base_url()).unwrap();
    let err = api.list_records().await.unwrap_err();

    list_mock.assert();
    match &err {
        TrackerError::ApiStatus {
            operation, status, ..
        } => {
            assert_eq!(*operation, ApiOperation::ListRecords);
            assert_eq!(*status, 503);
        }
        other => panic!("unexpected error: {:?}", other),
    }
    assert_eq!(err.user_message(), "Failed to fetch BMI history.");
}

#[tokio::test]
async fn test_create_record_posts_computed_bmi() {
    let server = MockServer::start();
    let create_mock = server.mock(|when, then| {
        when.method(POST)
            .path("/api/create/bmi")
            .header("content-type", "application/json")
            .json_body_partial(
                r#"{"height": 1.75, "weight": 70.0, "age": 30, "bmi": 22.86, "createdAt": "2024-05-02T08:30:00Z"}"#,
            );
        then.status(201).json_body(serde_json::json!({
            "id": 99, "height": 1.75, "weight": 70.0, "age": 30, "bmi": 22.86, "createdAt": "2024-05-02T08:30:00Z"
        }));
    });

    let api = HttpBmiApi::new(&server.base_url()).unwrap();
    let created = api.create_record(&sample_record()).await.unwrap();

    create_mock.assert();
    assert_eq!(created.and_then(|r| r.id), Some(RecordId::Number(99)));
}

#[tokio::test]
async fn test_create_record_accepts_empty_body() {
    let server = MockServer::start();
    let create_mock = server.mock(|when, then| {
        when.method(POST).path("/api/create/bmi");
        then.status(204);
    });

    let api = HttpBmiApi::new(&server.base_url()).unwrap();
    let created = api.create_record(&sample_record()).await.unwrap();

    create_mock.assert();
    assert!(created.is_none());
}

#[tokio::test]
async fn test_create_record_error_uses_server_message() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/api/create/bmi");
        then.status(400)
            .json_body(serde_json::json!({"message": "Age must be provided"}));
    });

    let api = HttpBmiApi::new(&server.base_url()).unwrap();
    let err = api.create_record(&sample_record()).await.unwrap_err();

    assert_eq!(err.user_message(), "Age must be provided");
}

#[tokio::test]
async fn test_create_record_error_without_json_body() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/api/create/bmi");
        then.status(500).body("Internal Server Error");
    });

    let api = HttpBmiApi::new(&server.base_url()).unwrap();
    let err = api.create_record(&sample_record()).await.unwrap_err();

    assert_eq!(err.user_message(), "Failed to save BMI data.");
}

#[tokio::test]
async fn test_delete_record_targets_id_path() {
    let server = MockServer::start();
    let delete_mock = server.mock(|when, then| {
        when.method(DELETE).path("/api/user/bmi/abc123");
        then.status(200);
    });

    let api = HttpBmiApi::new(&server.base_url()).unwrap();
    api.delete_record(&RecordId::from("abc123")).await.unwrap();

    delete_mock.assert();
}

#[tokio::test]
async fn test_delete_record_not_found() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(DELETE).path("/api/user/bmi/5");
        then.status(404);
    });

    let api = HttpBmiApi::new(&server.base_url()).unwrap();
    let err = api.delete_record(&RecordId::Number(5)).await.unwrap_err();

    assert_eq!(err.user_message(), "Failed to delete BMI record.");
}

#[tokio::test]
async fn test_custom_headers_and_base_path() {
    let server = MockServer::start();
    let list_mock = server.mock(|when, then| {
        when.method(GET)
            .path("/tracker/api/user/bmi")
            .header("authorization", "Bearer token-1");
        then.status(200).json_body(serde_json::json!([]));
    });

    let api = HttpBmiApi::new(&server.url("/tracker/"))
        .unwrap()
        .with_header("Authorization", "Bearer token-1");
    let records = api.list_records().await.unwrap();

    list_mock.assert();
    assert!(records.is_empty());
}

#[tokio::test]
async fn test_timeout_is_reported_as_transport_failure() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/api/user/bmi");
        then.status(200)
            .delay(Duration::from_millis(500))
            .json_body(serde_json::json!([]));
    });

    let api = HttpBmiApi::new(&server.base_url())
        .unwrap()
        .with_timeout(Duration::from_millis(50));
    let err = api.list_records().await.unwrap_err();

    assert!(matches!(err, TrackerError::Transport { .. }));
    assert_eq!(err.user_message(), "Failed to load BMI history.");
}

#[tokio::test]
async fn test_unreachable_server_is_transport_failure() {
    // 保留埠號後立即關閉，確保連線被拒
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let address = listener.local_addr().unwrap();
    drop(listener);

    let api = HttpBmiApi::new(&format!("http://{}", address)).unwrap();
    let err = api.delete_record(&RecordId::Number(1)).await.unwrap_err();

    assert!(matches!(err, TrackerError::Transport { .. }));
    assert_eq!(err.user_message(), "Failed to delete record.");
}
