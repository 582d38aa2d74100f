use std::sync::Arc;

use assert_matches::assert_matches;
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use booking_cell::{AvailabilityResolver, BookingCommitter};
use shared_backend::SchedulerClient;
use shared_config::AppConfig;
use shared_models::ApiError;

fn test_client(mock_server: &MockServer) -> Arc<SchedulerClient> {
    let config = AppConfig {
        scheduler_base_url: mock_server.uri(),
        default_patient_id: 1,
    };
    Arc::new(SchedulerClient::new(&config))
}

#[tokio::test]
async fn test_resolve_lists_single_day_slots() {
    let mock_server = MockServer::start().await;
    let resolver = AvailabilityResolver::new(test_client(&mock_server));

    // The raw date arrives day-first; the query must use the canonical form
    Mock::given(method("GET"))
        .and(path("/availability/3/2025-08-27"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"start_time": "15:00:00", "end_time": "15:30:00", "is_booked": false},
            {"start_time": "16:00:00", "end_time": "16:30:00", "is_booked": true}
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let resolution = resolver.resolve(3, "27-08-2025").await;

    assert_eq!(resolution.slots.len(), 2);
    assert!(resolution.slots[1].is_booked);
    assert_eq!(
        resolution.narrative,
        "Slots for 2025-08-27: 15:00:00-15:30:00, 16:00:00-16:30:00"
    );
}

#[tokio::test]
async fn test_empty_day_escalates_to_exactly_one_fallback_search() {
    let mock_server = MockServer::start().await;
    let resolver = AvailabilityResolver::new(test_client(&mock_server));

    Mock::given(method("GET"))
        .and(path("/availability/5/2025-09-01"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/availability_next_days/5/2025-09-01/7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"date": "2025-09-02", "slots": [
                {"start_time": "10:00:00", "end_time": "10:30:00"}
            ]}
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let resolution = resolver.resolve(5, "2025-09-01").await;

    assert!(resolution.slots.is_empty());
    assert_eq!(
        resolution.narrative,
        "No slots on 2025-09-01. Next options: 2025-09-02: 10:00:00-10:30:00"
    );
}

#[tokio::test]
async fn test_empty_fallback_window_reports_no_availability() {
    let mock_server = MockServer::start().await;
    let resolver = AvailabilityResolver::new(test_client(&mock_server));

    Mock::given(method("GET"))
        .and(path("/availability/5/2025-09-01"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/availability_next_days/5/2025-09-01/7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    let resolution = resolver.resolve(5, "2025-09-01").await;

    assert!(resolution.slots.is_empty());
    assert_eq!(resolution.narrative, "No availability in the next 7 days.");
}

#[tokio::test]
async fn test_backend_failure_becomes_generic_narrative() {
    let mock_server = MockServer::start().await;
    let resolver = AvailabilityResolver::new(test_client(&mock_server));

    Mock::given(method("GET"))
        .and(path("/availability/5/2025-09-01"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&mock_server)
        .await;

    let resolution = resolver.resolve(5, "2025-09-01").await;

    assert!(resolution.slots.is_empty());
    assert_eq!(resolution.narrative, "Failed to load slots.");
}

#[tokio::test]
async fn test_commit_without_token_never_calls_backend() {
    let mock_server = MockServer::start().await;
    let committer = BookingCommitter::new(test_client(&mock_server));

    // No mock mounted: any request would 404 and fail the assertions below
    let outcome = committer.commit(3, "2025-08-27", "", 1, "UI booking").await;

    assert_matches!(outcome, Ok(None));
    assert!(mock_server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_commit_books_decoded_slot_on_normalized_date() {
    let mock_server = MockServer::start().await;
    let committer = BookingCommitter::new(test_client(&mock_server));

    Mock::given(method("POST"))
        .and(path("/book/3/2025-08-27"))
        .and(body_partial_json(json!({
            "patient_id": 1,
            "start_time": "15:00:00",
            "end_time": "15:30:00",
            "reason": "UI booking"
        })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"message": "Appointment booked", "appointment_id": 42})),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let outcome = committer
        .commit(3, "27-08-2025", "15:00:00-15:30:00", 1, "UI booking")
        .await
        .unwrap();

    assert_eq!(outcome.unwrap().appointment_id, 42);
}

#[tokio::test]
async fn test_commit_conflict_returns_backend_detail() {
    let mock_server = MockServer::start().await;
    let committer = BookingCommitter::new(test_client(&mock_server));

    Mock::given(method("POST"))
        .and(path("/book/3/2025-08-27"))
        .respond_with(
            ResponseTemplate::new(409).set_body_json(json!({"detail": "slot already booked"})),
        )
        .mount(&mock_server)
        .await;

    let err = committer
        .commit(3, "2025-08-27", "15:00:00-15:30:00", 1, "UI booking")
        .await
        .unwrap_err();

    assert_matches!(err, ApiError::Backend { status: 409, ref detail } if detail == "slot already booked");
}
