use shared_models::SuggestionSet;

/// One pickable action derived from a backend suggestion payload. `start`
/// is the short `HH:MM` form shown on the button and sent back through the
/// conversation pipeline when clicked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuggestedPick {
    pub doctor_id: i64,
    pub doctor_name: String,
    pub date: String,
    pub start: String,
}

fn short_time(time: &str) -> String {
    time.chars().take(5).collect()
}

/// Flatten a suggestion set into uniform pickable actions, in display
/// order: per-doctor slot lists for the suggested date first, then
/// next-available alternatives on other days. Alternatives without a
/// concrete slot are skipped.
pub fn pickable_actions(set: &SuggestionSet) -> Vec<SuggestedPick> {
    let mut actions = Vec::new();

    for result in &set.results {
        for slot in &result.slots {
            actions.push(SuggestedPick {
                doctor_id: result.doctor_id,
                doctor_name: result.doctor_name.clone(),
                date: set.date.clone(),
                start: short_time(&slot.start_time),
            });
        }
    }

    for alternative in &set.alternatives {
        let Some(next) = &alternative.next_available else {
            continue;
        };
        let Some(slot) = &next.slot else {
            continue;
        };
        actions.push(SuggestedPick {
            doctor_id: alternative.doctor_id,
            doctor_name: alternative.doctor_name.clone(),
            date: next.date.clone(),
            start: short_time(&slot.start_time),
        });
    }

    actions
}
