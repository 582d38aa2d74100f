use assert_matches::assert_matches;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use shared_backend::SchedulerClient;
use shared_config::AppConfig;
use shared_models::{ApiError, BookingRequest};

fn test_config(mock_server: &MockServer) -> AppConfig {
    AppConfig {
        scheduler_base_url: mock_server.uri(),
        default_patient_id: 1,
    }
}

#[tokio::test]
async fn availability_parses_backend_rows() {
    let mock_server = MockServer::start().await;
    let client = SchedulerClient::new(&test_config(&mock_server));

    // Extra columns from the backend row must not break deserialization
    Mock::given(method("GET"))
        .and(path("/availability/3/2025-08-27"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "availability_id": 11,
                "available_date": "2025-08-27",
                "start_time": "15:00:00",
                "end_time": "15:30:00",
                "is_booked": false
            },
            {
                "availability_id": 12,
                "available_date": "2025-08-27",
                "start_time": "15:30:00",
                "end_time": "16:00:00",
                "is_booked": true
            }
        ])))
        .mount(&mock_server)
        .await;

    let slots = client.availability(3, "2025-08-27").await.unwrap();

    assert_eq!(slots.len(), 2);
    assert_eq!(slots[0].start_time, "15:00:00");
    assert!(!slots[0].is_booked);
    assert!(slots[1].is_booked);
}

#[tokio::test]
async fn book_conflict_surfaces_backend_detail() {
    let mock_server = MockServer::start().await;
    let client = SchedulerClient::new(&test_config(&mock_server));

    Mock::given(method("POST"))
        .and(path("/book/3/2025-08-27"))
        .respond_with(
            ResponseTemplate::new(409).set_body_json(json!({"detail": "slot already booked"})),
        )
        .mount(&mock_server)
        .await;

    let request = BookingRequest {
        patient_id: 1,
        start_time: "15:00:00".to_string(),
        end_time: "15:30:00".to_string(),
        reason: "UI booking".to_string(),
    };
    let err = client.book(3, "2025-08-27", &request).await.unwrap_err();

    assert_matches!(err, ApiError::Backend { status: 409, ref detail } if detail == "slot already booked");
}

#[tokio::test]
async fn non_json_error_body_gets_generic_detail() {
    let mock_server = MockServer::start().await;
    let client = SchedulerClient::new(&test_config(&mock_server));

    Mock::given(method("GET"))
        .and(path("/doctors"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&mock_server)
        .await;

    let err = client.doctors().await.unwrap_err();

    match err {
        ApiError::Backend { status, detail } => {
            assert_eq!(status, 500);
            assert!(detail.starts_with("request failed with status 500"));
        }
        other => panic!("expected backend error, got {:?}", other),
    }
}

#[tokio::test]
async fn directory_lookups_deserialize() {
    let mock_server = MockServer::start().await;
    let client = SchedulerClient::new(&test_config(&mock_server));

    Mock::given(method("GET"))
        .and(path("/doctors"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"doctor_id": 3, "name": "Dr. Ahuja"},
            {"doctor_id": 5, "name": "Dr. Mehta"}
        ])))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/patients"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"patient_id": 1, "name": "Asha Rao", "email": "asha@example.com"}
        ])))
        .mount(&mock_server)
        .await;

    let doctors = client.doctors().await.unwrap();
    let patients = client.patients().await.unwrap();

    assert_eq!(doctors.len(), 2);
    assert_eq!(doctors[0].doctor_id, 3);
    assert_eq!(patients[0].name, "Asha Rao");
}
