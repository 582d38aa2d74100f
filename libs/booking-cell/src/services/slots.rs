//! Selected-slot token handling. A slot is carried through the booking panel
//! as a single `"HH:MM:SS-HH:MM:SS"` token; suggestion clicks only know
//! `HH:MM`, so both directions canonicalize to full precision.

/// Append `:00` seconds to an `HH:MM` component; full-precision components
/// pass through untouched.
fn canonical_time(time: &str) -> String {
    if time.matches(':').count() == 1 {
        format!("{}:00", time)
    } else {
        time.to_string()
    }
}

/// Encode a start/end pair into a selectable token.
pub fn encode_slot(start_time: &str, end_time: &str) -> String {
    format!("{}-{}", canonical_time(start_time), canonical_time(end_time))
}

/// Decode a token back into its `(start, end)` pair, splitting on the first
/// `-`. Returns `None` for anything without a separator or with an empty
/// side, so an unset panel field never turns into a booking attempt.
pub fn decode_token(token: &str) -> Option<(String, String)> {
    let (start, end) = token.split_once('-')?;
    if start.is_empty() || end.is_empty() {
        return None;
    }
    Some((canonical_time(start), canonical_time(end)))
}
