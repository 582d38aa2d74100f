use reqwest::{Client, Method};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, error};

use shared_config::AppConfig;
use shared_models::{
    AgentTurnRequest, AgentTurnResponse, ApiError, BookingConfirmation, BookingRequest,
    DayAvailability, DoctorEntry, PatientEntry, ReportHistoryEntry, ReportRequest, ReportResponse,
    Slot,
};

/// Thin HTTP client for the scheduling backend. One method per endpoint;
/// every call is a single attempt, errors are mapped to [`ApiError`] and
/// never retried here.
pub struct SchedulerClient {
    client: Client,
    base_url: String,
}

impl SchedulerClient {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.scheduler_base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn request<T>(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);
        debug!("Making request to {}", url);

        let mut req = self.client.request(method, &url);
        if let Some(body_data) = body {
            req = req.json(&body_data);
        }

        let response = req
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let text = response
                .text()
                .await
                .map_err(|e| ApiError::Transport(e.to_string()))?;
            error!("API error ({}): {}", status, text);

            let detail = serde_json::from_str::<Value>(&text)
                .ok()
                .and_then(|v| v.get("detail").and_then(Value::as_str).map(str::to_string))
                .unwrap_or_else(|| format!("request failed with status {}", status));

            return Err(ApiError::Backend {
                status: status.as_u16(),
                detail,
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))
    }

    /// Open slots for one doctor on one canonical `YYYY-MM-DD` date.
    pub async fn availability(&self, doctor_id: i64, date: &str) -> Result<Vec<Slot>, ApiError> {
        let path = format!("/availability/{}/{}", doctor_id, date);
        self.request(Method::GET, &path, None).await
    }

    /// Forward search over `days` calendar days, inclusive of the start date.
    pub async fn availability_next_days(
        &self,
        doctor_id: i64,
        date: &str,
        days: u32,
    ) -> Result<Vec<DayAvailability>, ApiError> {
        let path = format!("/availability_next_days/{}/{}/{}", doctor_id, date, days);
        self.request(Method::GET, &path, None).await
    }

    pub async fn book(
        &self,
        doctor_id: i64,
        date: &str,
        request: &BookingRequest,
    ) -> Result<BookingConfirmation, ApiError> {
        let path = format!("/book/{}/{}", doctor_id, date);
        let body =
            serde_json::to_value(request).map_err(|e| ApiError::Transport(e.to_string()))?;
        self.request(Method::POST, &path, Some(body)).await
    }

    pub async fn patient_chat(
        &self,
        request: &AgentTurnRequest,
    ) -> Result<AgentTurnResponse, ApiError> {
        let body =
            serde_json::to_value(request).map_err(|e| ApiError::Transport(e.to_string()))?;
        self.request(Method::POST, "/agent/patient_chat", Some(body)).await
    }

    pub async fn report(&self, request: &ReportRequest) -> Result<ReportResponse, ApiError> {
        let body =
            serde_json::to_value(request).map_err(|e| ApiError::Transport(e.to_string()))?;
        self.request(Method::POST, "/report", Some(body)).await
    }

    pub async fn report_history(&self) -> Result<Vec<ReportHistoryEntry>, ApiError> {
        self.request(Method::GET, "/history", None).await
    }

    pub async fn doctors(&self) -> Result<Vec<DoctorEntry>, ApiError> {
        self.request(Method::GET, "/doctors", None).await
    }

    pub async fn patients(&self) -> Result<Vec<PatientEntry>, ApiError> {
        self.request(Method::GET, "/patients", None).await
    }
}
