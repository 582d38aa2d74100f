use serde::{Deserialize, Serialize};

/// A bookable interval for a doctor. Times are `HH:MM:SS` strings at the
/// wire boundary; already-booked slots stay visible with the flag set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    pub start_time: String,
    pub end_time: String,
    #[serde(default)]
    pub is_booked: bool,
}

/// One day of the multi-day availability search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DayAvailability {
    pub date: String,
    #[serde(default)]
    pub slots: Vec<Slot>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingRequest {
    pub patient_id: i64,
    pub start_time: String,
    pub end_time: String,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingConfirmation {
    pub appointment_id: i64,
}
