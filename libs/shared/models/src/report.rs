use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize)]
pub struct ReportRequest {
    pub prompt: String,
    pub doctor_id: i64,
    pub channel: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReportResponse {
    pub result: String,
}

/// A previously generated report prompt. The backend returns more columns;
/// only the ones the client lists are kept.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportHistoryEntry {
    pub id: i64,
    pub prompt: String,
    pub created_at: String,
}
