use shared_models::Slot;

/// Outcome of one availability lookup. `slots` is always the single-day
/// result (possibly empty) so the booking panel mirrors the day the user
/// asked about; the narrative may additionally describe the fallback window.
#[derive(Debug, Clone)]
pub struct Resolution {
    pub slots: Vec<Slot>,
    pub narrative: String,
}
