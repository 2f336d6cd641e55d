//! # Submission Service
//!
//! Owns the draft and drives the submit sequence:
//! `Editing → (validate) → Sending → Submitted`, with every failure path
//! returning to `Editing` without losing the user's data.

use chrono::Utc;
use log::{info, warn};
use std::collections::BTreeSet;

use shared::config::{Configuration, Personalization};
use shared::form::{FieldId, FormDraft};

use crate::domain::payload::{build_template_params, display_zone};
use crate::transport::{EmailTransport, TransportError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionPhase {
    Editing,
    Sending,
    Submitted,
}

/// Result of a submit attempt that did not itself error.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    Sent,
    /// Validation failed; `focus` is the first invalid field in the fixed
    /// order, for the host to bring into view.
    Rejected {
        invalid: Vec<FieldId>,
        focus: FieldId,
    },
    /// A previous submission is still in flight; nothing was done.
    InFlight,
}

#[derive(Debug, thiserror::Error)]
pub enum SubmissionError {
    /// Transport credentials are absent; no network call was made.
    #[error("Email transport is not configured")]
    TransportNotConfigured,
    #[error("Failed to send thought drop: {0}")]
    SendFailed(#[from] TransportError),
}

/// First field to focus after a failed validation pass, per the fixed
/// field ordering.
pub fn first_invalid_field(invalid: &[FieldId]) -> Option<FieldId> {
    invalid.iter().copied().min_by_key(|field| field.order_index())
}

pub struct SubmissionController {
    draft: FormDraft,
    phase: SubmissionPhase,
}

impl SubmissionController {
    pub fn new(config: &Configuration) -> Self {
        Self {
            draft: FormDraft::fresh(&config.personalization),
            phase: SubmissionPhase::Editing,
        }
    }

    pub fn draft(&self) -> &FormDraft {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut FormDraft {
        &mut self.draft
    }

    pub fn phase(&self) -> SubmissionPhase {
        self.phase
    }

    /// Discard the draft and return to editing (the "send another" path).
    pub fn reset(&mut self, config: &Configuration) {
        self.draft = FormDraft::fresh(&config.personalization);
        self.phase = SubmissionPhase::Editing;
    }

    /// Run every field validator, returning the invalid fields in the
    /// fixed field order. `message` is optional; `response_type` only has
    /// to be a known option when set.
    pub fn validate(&self, personalization: &Personalization) -> Vec<FieldId> {
        let mut invalid = Vec::new();

        let feeling_ok = matches!(
            self.draft.feeling,
            Some(index) if index < personalization.emotion_emojis.len()
        );
        if !feeling_ok {
            invalid.push(FieldId::Feeling);
        }

        let name_ok = self
            .draft
            .name
            .as_deref()
            .is_some_and(|name| personalization.name_options.iter().any(|option| option == name));
        if !name_ok {
            invalid.push(FieldId::Name);
        }

        if !self.meters_ok(personalization) {
            invalid.push(FieldId::MissYou);
        }

        let known_events: BTreeSet<String> = personalization
            .event_options()
            .into_iter()
            .map(|option| option.id)
            .collect();
        if !self.draft.events.iter().all(|id| known_events.contains(id)) {
            invalid.push(FieldId::Events);
        }

        if let Some(response) = self.draft.response_type.as_deref() {
            if !personalization
                .response_options
                .iter()
                .any(|option| option == response)
            {
                invalid.push(FieldId::ResponseType);
            }
        }

        invalid
    }

    fn meters_ok(&self, personalization: &Personalization) -> bool {
        let all_in_range = personalization.meters.iter().all(|(name, meter)| {
            self.draft
                .meters
                .get(name)
                .is_some_and(|value| meter.min <= *value && *value <= meter.max)
        });
        let no_unknown_keys = self
            .draft
            .meters
            .keys()
            .all(|name| personalization.meters.contains_key(name));
        all_in_range && no_unknown_keys
    }

    /// Drive one submit attempt. Exactly one transport call is made, and
    /// only when validation passes and the transport is configured.
    pub async fn submit(
        &mut self,
        config: &Configuration,
        transport: &dyn EmailTransport,
    ) -> Result<SubmitOutcome, SubmissionError> {
        if self.phase == SubmissionPhase::Sending {
            return Ok(SubmitOutcome::InFlight);
        }

        let invalid = self.validate(&config.personalization);
        if let Some(focus) = first_invalid_field(&invalid) {
            info!("Submission rejected; focusing field '{focus}'");
            return Ok(SubmitOutcome::Rejected { invalid, focus });
        }

        if !config.is_email_transport_configured() {
            warn!("Submission blocked: email transport is not configured");
            return Err(SubmissionError::TransportNotConfigured);
        }

        self.phase = SubmissionPhase::Sending;
        let params = build_template_params(
            &self.draft,
            config,
            Utc::now().with_timezone(&display_zone()),
        );

        match transport
            .send(
                &config.email_transport.service_id,
                config.resolved_template_id(),
                &params,
            )
            .await
        {
            Ok(()) => {
                info!("💌 Thought drop submitted");
                self.phase = SubmissionPhase::Submitted;
                self.draft = FormDraft::fresh(&config.personalization);
                Ok(SubmitOutcome::Sent)
            }
            Err(err) => {
                warn!("💌 Send failed, draft retained: {err}");
                self.phase = SubmissionPhase::Editing;
                Err(SubmissionError::SendFailed(err))
            }
        }
    }
}
