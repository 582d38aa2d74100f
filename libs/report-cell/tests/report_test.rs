use std::sync::Arc;

use serde_json::json;
use uuid::Uuid;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use conversation_cell::{Role, Session};
use report_cell::DoctorSession;
use shared_backend::SchedulerClient;
use shared_config::AppConfig;

fn doctor_session(mock_server: &MockServer) -> DoctorSession {
    let config = AppConfig {
        scheduler_base_url: mock_server.uri(),
        default_patient_id: 1,
    };
    let client = Arc::new(SchedulerClient::new(&config));
    let session = Session {
        id: Uuid::new_v4(),
        role: Role::Doctor,
        display_name: "Ahuja".to_string(),
        doctor_id: Some(3),
    };
    DoctorSession::new(client, &session)
}

#[tokio::test]
async fn test_report_prompt_resolves_placeholder_with_summary() {
    let mock_server = MockServer::start().await;
    let mut session = doctor_session(&mock_server);

    Mock::given(method("POST"))
        .and(path("/report"))
        .and(body_partial_json(json!({
            "prompt": "How many patients visited yesterday?",
            "doctor_id": 3,
            "channel": "in_app"
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"result": "12 patients visited."})),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    session
        .submit("How many patients visited yesterday?")
        .await
        .unwrap();

    let turns = session.transcript().turns();
    assert_eq!(turns.len(), 3);
    assert_eq!(turns[0].text, "Hello Dr. Ahuja. Ask for summaries using the panel.");
    assert_eq!(turns[2].text, "12 patients visited.");
    assert!(!session.transcript().has_pending());
}

#[tokio::test]
async fn test_report_failure_resolves_placeholder_with_fixed_message() {
    let mock_server = MockServer::start().await;
    let mut session = doctor_session(&mock_server);

    Mock::given(method("POST"))
        .and(path("/report"))
        .respond_with(ResponseTemplate::new(503).set_body_json(json!({"detail": "agent down"})))
        .mount(&mock_server)
        .await;

    session.submit("Summarize last week").await.unwrap();

    assert_eq!(
        session.transcript().last().unwrap().text,
        "Failed to generate summary."
    );
}

#[tokio::test]
async fn test_run_report_returns_summary_and_history() {
    let mock_server = MockServer::start().await;
    let session = doctor_session(&mock_server);

    Mock::given(method("POST"))
        .and(path("/report"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"result": "All quiet."})),
        )
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/history"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 2, "role": "doctor", "prompt": "Summarize today", "response": "All quiet.", "created_at": "2025-08-06T10:00:00"},
            {"id": 1, "role": "doctor", "prompt": "Visits yesterday?", "response": "12", "created_at": "2025-08-05T09:00:00"}
        ])))
        .mount(&mock_server)
        .await;

    let (result, history) = session.run_report("Summarize today").await.unwrap();

    assert_eq!(result, "All quiet.");
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].prompt, "Summarize today");
}

#[tokio::test]
async fn test_panel_doctor_override_flows_into_requests() {
    let mock_server = MockServer::start().await;
    let mut session = doctor_session(&mock_server);

    Mock::given(method("POST"))
        .and(path("/report"))
        .and(body_partial_json(json!({"doctor_id": 9})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"result": "ok"})))
        .expect(1)
        .mount(&mock_server)
        .await;

    session.set_doctor(9);
    session.submit("Anything new?").await.unwrap();

    assert_eq!(session.transcript().last().unwrap().text, "ok");
}
