use std::sync::Arc;

use tracing::{debug, warn};

use shared_backend::SchedulerClient;

use crate::models::Resolution;
use crate::services::normalize::DateNormalizer;

/// How far forward to search when the requested day has nothing open. The
/// backend window is inclusive of the start date.
const FALLBACK_WINDOW_DAYS: u32 = 7;

pub struct AvailabilityResolver {
    client: Arc<SchedulerClient>,
    normalizer: DateNormalizer,
}

impl AvailabilityResolver {
    pub fn new(client: Arc<SchedulerClient>) -> Self {
        Self {
            client,
            normalizer: DateNormalizer::new(),
        }
    }

    /// Look up a doctor's slots for a possibly un-normalized date.
    ///
    /// An empty single-day result escalates to exactly one bounded forward
    /// search. Transport failures are absorbed into the narrative; a resolve
    /// call never retries and never issues more than two requests.
    pub async fn resolve(&self, doctor_id: i64, raw_date: &str) -> Resolution {
        let date = self.normalizer.normalize(raw_date);
        debug!("Resolving availability for doctor {} on {}", doctor_id, date);

        let slots = match self.client.availability(doctor_id, &date).await {
            Ok(slots) => slots,
            Err(e) => {
                warn!("Availability lookup failed: {}", e);
                return Resolution {
                    slots: Vec::new(),
                    narrative: "Failed to load slots.".to_string(),
                };
            }
        };

        if !slots.is_empty() {
            let items = slots
                .iter()
                .map(|s| format!("{}-{}", s.start_time, s.end_time))
                .collect::<Vec<_>>()
                .join(", ");
            let narrative = format!("Slots for {}: {}", date, items);
            return Resolution { slots, narrative };
        }

        match self
            .client
            .availability_next_days(doctor_id, &date, FALLBACK_WINDOW_DAYS)
            .await
        {
            Ok(days) if !days.is_empty() => {
                let options = days
                    .iter()
                    .map(|day| {
                        let pairs = day
                            .slots
                            .iter()
                            .map(|s| format!("{}-{}", s.start_time, s.end_time))
                            .collect::<Vec<_>>()
                            .join(" | ");
                        format!("{}: {}", day.date, pairs)
                    })
                    .collect::<Vec<_>>()
                    .join(" || ");
                Resolution {
                    slots,
                    narrative: format!("No slots on {}. Next options: {}", date, options),
                }
            }
            Ok(_) => Resolution {
                slots,
                narrative: "No availability in the next 7 days.".to_string(),
            },
            Err(e) => {
                warn!("Fallback availability search failed: {}", e);
                Resolution {
                    slots,
                    narrative: "Failed to load slots.".to_string(),
                }
            }
        }
    }
}
