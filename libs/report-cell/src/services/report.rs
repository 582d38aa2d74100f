use std::sync::Arc;

use tracing::warn;

use conversation_cell::{ChatError, Session, Transcript};
use shared_backend::SchedulerClient;
use shared_models::{ApiError, ReportHistoryEntry, ReportRequest};

const PROCESSING_PLACEHOLDER: &str = "Processing...";
const REPORT_FAILED: &str = "Failed to generate summary.";
const REPORT_CHANNEL: &str = "in_app";

/// Doctor-side conversation. Every turn is a report prompt answered by the
/// summary backend, through the same optimistic-placeholder transcript flow
/// as the patient chat.
pub struct DoctorSession {
    client: Arc<SchedulerClient>,
    transcript: Transcript,
    doctor_id: i64,
    in_flight: bool,
}

impl DoctorSession {
    pub fn new(client: Arc<SchedulerClient>, session: &Session) -> Self {
        let mut transcript = Transcript::new();
        transcript.push_agent(format!(
            "Hello Dr. {}. Ask for summaries using the panel.",
            session.display_name.trim()
        ));

        Self {
            client,
            transcript,
            doctor_id: session.doctor_id.unwrap_or(1),
            in_flight: false,
        }
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn doctor_id(&self) -> i64 {
        self.doctor_id
    }

    /// Panel override for which doctor the summaries cover.
    pub fn set_doctor(&mut self, doctor_id: i64) {
        self.doctor_id = doctor_id;
    }

    /// One report prompt through the transcript pipeline. Failures resolve
    /// the placeholder with a fixed message; nothing is retried.
    pub async fn submit(&mut self, text: &str) -> Result<(), ChatError> {
        let prompt = text.trim();
        if prompt.is_empty() {
            return Ok(());
        }
        if self.in_flight {
            return Err(ChatError::Busy);
        }

        self.transcript.push_user(prompt);
        self.transcript.begin_pending(PROCESSING_PLACEHOLDER);
        self.in_flight = true;

        let request = ReportRequest {
            prompt: prompt.to_string(),
            doctor_id: self.doctor_id,
            channel: REPORT_CHANNEL.to_string(),
        };

        match self.client.report(&request).await {
            Ok(response) => self.transcript.resolve_pending(response.result),
            Err(e) => {
                warn!("Report generation failed: {}", e);
                self.transcript.resolve_pending(REPORT_FAILED);
            }
        }

        self.in_flight = false;
        Ok(())
    }

    /// Panel action: generate a summary and return it with refreshed
    /// history. The history refresh is best-effort.
    pub async fn run_report(
        &self,
        prompt: &str,
    ) -> Result<(String, Vec<ReportHistoryEntry>), ApiError> {
        let request = ReportRequest {
            prompt: prompt.to_string(),
            doctor_id: self.doctor_id,
            channel: REPORT_CHANNEL.to_string(),
        };
        let response = self.client.report(&request).await?;

        let history = match self.client.report_history().await {
            Ok(history) => history,
            Err(e) => {
                warn!("History refresh failed: {}", e);
                Vec::new()
            }
        };

        Ok((response.result, history))
    }

    pub async fn history(&self) -> Result<Vec<ReportHistoryEntry>, ApiError> {
        self.client.report_history().await
    }
}
