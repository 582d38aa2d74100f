use std::sync::Arc;

use thiserror::Error;
use tokio::sync::watch;
use tracing::{debug, warn};

use booking_cell::{encode_slot, AvailabilityResolver, BookingCommitter};
use shared_backend::SchedulerClient;
use shared_models::{AgentTurnRequest, ApiError, SuggestionSet};

use crate::models::{AgentIntent, BookingPanel, Session, Transcript};
use crate::services::suggestions::SuggestedPick;

const PROCESSING_PLACEHOLDER: &str = "Processing...";
const AGENT_UNAVAILABLE: &str = "Agent unavailable. Try again.";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ChatError {
    /// A turn is already in flight. Concurrent submissions are rejected
    /// rather than queued; the caller may retry once the turn settles.
    #[error("a conversation turn is already in progress")]
    Busy,

    /// Confirmation was requested before doctor, date, and start time were
    /// all known.
    #[error("booking intent is incomplete")]
    NotConfirmable,
}

/// The patient-side conversation state machine.
///
/// Owns the transcript, the agent intent cache, the booking panel, and the
/// current suggestion set. Free-text submission, suggestion clicks, and the
/// one-click confirmation all funnel through [`PatientSession::submit`], so
/// the backend keeps a single view of what is being booked. Panel changes
/// are published through a watch channel for the presentation layer.
pub struct PatientSession {
    client: Arc<SchedulerClient>,
    resolver: AvailabilityResolver,
    committer: BookingCommitter,
    patient_id: i64,
    display_name: String,
    transcript: Transcript,
    intent: AgentIntent,
    panel: BookingPanel,
    suggestions: Option<SuggestionSet>,
    in_flight: bool,
    panel_tx: watch::Sender<BookingPanel>,
}

impl PatientSession {
    pub fn new(client: Arc<SchedulerClient>, session: &Session, patient_id: i64) -> Self {
        let display_name = if session.display_name.trim().is_empty() {
            "patient".to_string()
        } else {
            session.display_name.trim().to_string()
        };

        let mut transcript = Transcript::new();
        transcript.push_agent(format!(
            "Hi {}, you can check availability and book.",
            display_name
        ));

        let panel = BookingPanel::default();
        let (panel_tx, _) = watch::channel(panel.clone());

        Self {
            resolver: AvailabilityResolver::new(Arc::clone(&client)),
            committer: BookingCommitter::new(Arc::clone(&client)),
            client,
            patient_id,
            display_name,
            transcript,
            intent: AgentIntent::default(),
            panel,
            suggestions: None,
            in_flight: false,
            panel_tx,
        }
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn panel(&self) -> &BookingPanel {
        &self.panel
    }

    pub fn suggestions(&self) -> Option<&SuggestionSet> {
        self.suggestions.as_ref()
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight
    }

    /// True once the agent knows doctor, date, and start time; the UI may
    /// then offer one-click confirmation.
    pub fn is_confirmable(&self) -> bool {
        self.intent.is_confirmable()
    }

    /// Observe booking-panel changes without reaching into the session.
    pub fn subscribe(&self) -> watch::Receiver<BookingPanel> {
        self.panel_tx.subscribe()
    }

    /// One free-text turn through the agent pipeline.
    ///
    /// Empty input is a no-op. The reply's state is merged field-wise into
    /// the intent cache and the panel is derived from the merged state.
    /// Once doctor and date are both known, the availability lookup runs as
    /// a strictly-sequenced second step before the turn is considered done.
    pub async fn submit(&mut self, text: &str) -> Result<(), ChatError> {
        let message = text.trim();
        if message.is_empty() {
            return Ok(());
        }
        if self.in_flight {
            return Err(ChatError::Busy);
        }

        self.transcript.push_user(message);
        self.transcript.begin_pending(PROCESSING_PLACEHOLDER);
        self.in_flight = true;

        let request = AgentTurnRequest {
            message: message.to_string(),
            state: self.intent.wire_state(),
        };

        let reply = match self.client.patient_chat(&request).await {
            Ok(reply) => reply,
            Err(e) => {
                warn!("Agent turn failed: {}", e);
                self.transcript.resolve_pending(AGENT_UNAVAILABLE);
                self.in_flight = false;
                return Ok(());
            }
        };

        self.intent.merge(&reply.state);
        self.transcript.resolve_pending(reply.message);

        match reply.ui {
            // Key absent: previous suggestions stay valid
            None => {}
            // Explicit null: the backend withdrew its suggestions
            Some(None) => self.suggestions = None,
            Some(Some(set)) => self.suggestions = Some(set),
        }

        self.sync_panel_from_intent();

        if let (Some(doctor_id), Some(date)) =
            (self.intent.doctor_id(), self.intent.date().map(String::from))
        {
            let resolution = self.resolver.resolve(doctor_id, &date).await;
            self.panel.available_slots = resolution.slots;
            self.publish_panel();
            self.transcript.push_agent(resolution.narrative);
        }

        self.in_flight = false;
        Ok(())
    }

    /// One-click confirmation: a sentinel "book" turn through the same
    /// pipeline, not a separate backend call.
    pub async fn confirm(&mut self) -> Result<(), ChatError> {
        if !self.intent.is_confirmable() {
            return Err(ChatError::NotConfirmable);
        }
        self.submit("book").await
    }

    /// Act on a clicked suggestion. The panel syncs optimistically: the
    /// clicked start doubles as the end time until the agent's reading of
    /// the short time string corrects it on the reply.
    pub async fn pick(&mut self, pick: &SuggestedPick) -> Result<(), ChatError> {
        if self.in_flight {
            return Err(ChatError::Busy);
        }

        self.panel.doctor_id = pick.doctor_id;
        self.panel.date = pick.date.clone();
        self.panel.selected_slot = encode_slot(&pick.start, &pick.start);
        self.publish_panel();

        self.submit(&pick.start).await
    }

    /// Commit the panel's selected slot. No selection is a silent no-op;
    /// the outcome otherwise lands in the transcript, and failures leave
    /// panel state untouched for a corrected retry.
    pub async fn book(&mut self, reason: &str) {
        let outcome = self
            .committer
            .commit(
                self.panel.doctor_id,
                &self.panel.date,
                &self.panel.selected_slot,
                self.patient_id,
                reason,
            )
            .await;

        match outcome {
            Ok(Some(confirmation)) => {
                self.transcript.push_agent(format!(
                    "Booked successfully. Appointment ID: {}",
                    confirmation.appointment_id
                ));
            }
            Ok(None) => {
                debug!("Book requested with no slot selected");
            }
            Err(ApiError::Backend { detail, .. }) => {
                self.transcript.push_agent(detail);
            }
            Err(ApiError::Transport(e)) => {
                warn!("Booking commit failed: {}", e);
                self.transcript.push_agent("Booking failed. Try again.");
            }
        }
    }

    /// Form edit: doctor field.
    pub fn set_doctor(&mut self, doctor_id: i64) {
        self.panel.doctor_id = doctor_id;
        self.publish_panel();
    }

    /// Form edit: date field, canonical or user-typed.
    pub fn set_date(&mut self, date: impl Into<String>) {
        self.panel.date = date.into();
        self.publish_panel();
    }

    /// Form edit: selected-slot token.
    pub fn set_selected_slot(&mut self, token: impl Into<String>) {
        self.panel.selected_slot = token.into();
        self.publish_panel();
    }

    /// The panel's list-slots action: resolve availability for the current
    /// doctor/date and narrate the result without a conversational turn.
    pub async fn check_slots(&mut self) {
        let resolution = self
            .resolver
            .resolve(self.panel.doctor_id, &self.panel.date)
            .await;
        self.panel.available_slots = resolution.slots;
        self.publish_panel();
        self.transcript.push_agent(resolution.narrative);
    }

    /// Start a fresh chat session: transcript reseeded, intent and
    /// suggestions dropped. The panel keeps its form-owned values.
    pub fn reset(&mut self) {
        self.transcript.clear();
        self.transcript.push_agent(format!(
            "Hi {}, you can check availability and book.",
            self.display_name
        ));
        self.intent.reset();
        self.suggestions = None;
        self.in_flight = false;
    }

    fn sync_panel_from_intent(&mut self) {
        if let Some(doctor_id) = self.intent.doctor_id() {
            self.panel.doctor_id = doctor_id;
        }
        if let Some(date) = self.intent.date() {
            self.panel.date = date.to_string();
        }
        if let (Some(start), Some(end)) = (self.intent.start_time(), self.intent.end_time()) {
            self.panel.selected_slot = encode_slot(start, end);
        }
        self.publish_panel();
    }

    fn publish_panel(&self) {
        self.panel_tx.send_replace(self.panel.clone());
    }
}
