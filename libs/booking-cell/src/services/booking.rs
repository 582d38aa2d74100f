use std::sync::Arc;

use tracing::{debug, info};

use shared_backend::SchedulerClient;
use shared_models::{ApiError, BookingConfirmation, BookingRequest};

use crate::services::normalize::DateNormalizer;
use crate::services::slots::decode_token;

pub struct BookingCommitter {
    client: Arc<SchedulerClient>,
    normalizer: DateNormalizer,
}

impl BookingCommitter {
    pub fn new(client: Arc<SchedulerClient>) -> Self {
        Self {
            client,
            normalizer: DateNormalizer::new(),
        }
    }

    /// Submit the selected slot for booking. An empty or undecodable token
    /// is a local no-op: `Ok(None)` without any backend call. Failures leave
    /// all local state untouched so the user can correct and retry.
    pub async fn commit(
        &self,
        doctor_id: i64,
        raw_date: &str,
        slot_token: &str,
        patient_id: i64,
        reason: &str,
    ) -> Result<Option<BookingConfirmation>, ApiError> {
        let Some((start_time, end_time)) = decode_token(slot_token) else {
            debug!("No slot selected, skipping booking commit");
            return Ok(None);
        };

        let date = self.normalizer.normalize(raw_date);
        let request = BookingRequest {
            patient_id,
            start_time,
            end_time,
            reason: reason.to_string(),
        };

        info!(
            "Committing booking for doctor {} on {} (patient {})",
            doctor_id, date, patient_id
        );
        let confirmation = self.client.book(doctor_id, &date, &request).await?;
        Ok(Some(confirmation))
    }
}
