use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::slots::Slot;

/// One free-text turn sent to the conversational agent. `state` echoes back
/// the intent fields accumulated so far, so the backend can resume mid-flow.
#[derive(Debug, Clone, Serialize)]
pub struct AgentTurnRequest {
    pub message: String,
    pub state: Map<String, Value>,
}

/// The agent's reply. `ui` distinguishes three wire shapes: key absent
/// (previous suggestions stay), explicit `null` (clear), or a payload
/// (replace).
#[derive(Debug, Clone, Deserialize)]
pub struct AgentTurnResponse {
    pub message: String,
    #[serde(default)]
    pub state: Map<String, Value>,
    #[serde(default, deserialize_with = "nullable")]
    pub ui: Option<Option<SuggestionSet>>,
}

fn nullable<'de, D>(deserializer: D) -> Result<Option<Option<SuggestionSet>>, D::Error>
where
    D: Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}

/// Backend-proposed alternatives when the literal request cannot be
/// satisfied: per-doctor slot lists for the requested date, or
/// next-available options on other days.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuggestionSet {
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub results: Vec<DoctorSuggestion>,
    #[serde(default)]
    pub alternatives: Vec<AlternativeSuggestion>,
}

impl SuggestionSet {
    pub fn is_empty(&self) -> bool {
        self.results.is_empty() && self.alternatives.is_empty()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DoctorSuggestion {
    pub doctor_id: i64,
    #[serde(default)]
    pub doctor_name: String,
    #[serde(default)]
    pub slots: Vec<Slot>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlternativeSuggestion {
    pub doctor_id: i64,
    #[serde(default)]
    pub doctor_name: String,
    #[serde(default)]
    pub next_available: Option<NextAvailable>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NextAvailable {
    pub date: String,
    #[serde(default)]
    pub slot: Option<Slot>,
}
