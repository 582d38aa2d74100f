use chrono::{Duration, Local};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use shared_models::Slot;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Patient,
    Doctor,
}

/// Identity established at sign-in. Immutable for the session lifetime.
#[derive(Debug, Clone)]
pub struct Session {
    pub id: Uuid,
    pub role: Role,
    pub display_name: String,
    pub doctor_id: Option<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Speaker {
    User,
    Agent,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub speaker: Speaker,
    pub text: String,
}

/// Append-only conversation log with an explicit pending-turn index.
///
/// Turns are never mutated after creation, with one exception: a placeholder
/// agent turn appended optimistically while a reply is outstanding, resolved
/// in place once the reply arrives. At most one placeholder exists at a
/// time, tracked by index rather than assumed to be the last element.
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    turns: Vec<ConversationTurn>,
    pending: Option<usize>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn turns(&self) -> &[ConversationTurn] {
        &self.turns
    }

    pub fn last(&self) -> Option<&ConversationTurn> {
        self.turns.last()
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn push_user(&mut self, text: impl Into<String>) {
        self.turns.push(ConversationTurn {
            speaker: Speaker::User,
            text: text.into(),
        });
    }

    pub fn push_agent(&mut self, text: impl Into<String>) {
        self.turns.push(ConversationTurn {
            speaker: Speaker::Agent,
            text: text.into(),
        });
    }

    /// Append the optimistic placeholder and remember where it sits.
    pub fn begin_pending(&mut self, placeholder: impl Into<String>) {
        debug_assert!(self.pending.is_none(), "placeholder already outstanding");
        self.push_agent(placeholder);
        self.pending = Some(self.turns.len() - 1);
    }

    /// Replace the outstanding placeholder with the real reply. Falls back
    /// to a plain append if no placeholder is outstanding.
    pub fn resolve_pending(&mut self, text: impl Into<String>) {
        match self.pending.take() {
            Some(index) => self.turns[index].text = text.into(),
            None => self.push_agent(text),
        }
    }

    pub fn clear(&mut self) {
        self.turns.clear();
        self.pending = None;
    }
}

/// Cache of the intent the backend agent has extracted from the conversation
/// so far. Open-ended mapping: the client round-trips every key, reads only
/// the few it mirrors into the booking panel.
///
/// Merge rule: keys present in a reply overwrite, absent keys keep their
/// accumulated values. Reset only when a fresh chat session starts.
#[derive(Debug, Clone, Default)]
pub struct AgentIntent {
    state: Map<String, Value>,
}

impl AgentIntent {
    pub fn merge(&mut self, update: &Map<String, Value>) {
        for (key, value) in update {
            self.state.insert(key.clone(), value.clone());
        }
    }

    pub fn wire_state(&self) -> Map<String, Value> {
        self.state.clone()
    }

    pub fn reset(&mut self) {
        self.state.clear();
    }

    fn non_empty_str(&self, key: &str) -> Option<&str> {
        self.state
            .get(key)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
    }

    pub fn doctor_id(&self) -> Option<i64> {
        match self.state.get("doctor_id")? {
            Value::Number(n) => n.as_i64().filter(|id| *id > 0),
            Value::String(s) => s.parse().ok().filter(|id: &i64| *id > 0),
            _ => None,
        }
    }

    pub fn date(&self) -> Option<&str> {
        self.non_empty_str("date")
    }

    pub fn start_time(&self) -> Option<&str> {
        self.non_empty_str("start_time")
    }

    pub fn end_time(&self) -> Option<&str> {
        self.non_empty_str("end_time")
    }

    /// Enough intent to attempt a booking: doctor, date, and start time.
    /// The end time is not required.
    pub fn is_confirmable(&self) -> bool {
        self.doctor_id().is_some() && self.date().is_some() && self.start_time().is_some()
    }
}

/// Form-visible booking state. Written both by the conversation pipeline
/// (derived from [`AgentIntent`]) and by direct form edits; last writer
/// wins on the single event thread.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BookingPanel {
    pub doctor_id: i64,
    pub date: String,
    pub available_slots: Vec<Slot>,
    pub selected_slot: String,
}

impl Default for BookingPanel {
    fn default() -> Self {
        Self {
            doctor_id: 1,
            date: (Local::now().date_naive() + Duration::days(1))
                .format("%Y-%m-%d")
                .to_string(),
            available_slots: Vec::new(),
            selected_slot: String::new(),
        }
    }
}
