//! # Thought Drop core
//!
//! The non-presentational heart of the Thought Drop form: configuration
//! resolution (fetch, merge over defaults, validate, memoize) and the
//! submission flow (field validation, payload mapping, email send). A host
//! page drives it through [`ThoughtDrop::on_submit`] / [`ThoughtDrop::on_reset`]
//! and renders whatever feedback comes back.

use anyhow::{Context, Result};
use log::info;
use std::sync::Arc;

use shared::config::Configuration;
use shared::form::{FieldId, FormDraft};

pub mod domain;
pub mod source;
pub mod transport;

#[cfg(test)]
pub(crate) mod test_support;

pub use shared;

use crate::domain::config_service::ConfigService;
use crate::domain::submission_service::{
    SubmissionController, SubmissionError, SubmissionPhase, SubmitOutcome,
};
use crate::source::{ConfigSource, HttpConfigSource};
use crate::transport::{EmailJsTransport, EmailTransport};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Error,
}

/// A user-visible, dismissible notification.
#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

/// What the host should do after a submit attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitFeedback {
    /// Bring this field into view and give it input focus.
    Focus(FieldId),
    /// A send is already in flight; keep the submit control disabled.
    Busy,
    Notice(Notice),
}

/// Orchestrates the configuration, the submission controller and the email
/// transport for one page visit.
pub struct ThoughtDrop {
    config: Configuration,
    controller: SubmissionController,
    transport: Arc<dyn EmailTransport>,
}

impl ThoughtDrop {
    /// Load the hosted config document, build the EmailJS transport from
    /// the resolved public key, and start with a fresh draft.
    ///
    /// Configuration validation errors are fatal here; fetch failures fall
    /// back to the built-in defaults.
    pub async fn bootstrap(config_url: &str) -> Result<Self> {
        let source = Arc::new(
            HttpConfigSource::new(config_url).context("Failed to build config fetcher")?,
        );
        let service = ConfigService::new(source);
        let config = service
            .load()
            .await
            .context("Configuration failed validation")?
            .clone();
        let transport = Arc::new(
            EmailJsTransport::new(&config.email_transport.public_key)
                .context("Failed to build email transport")?,
        );
        Ok(Self::assemble(config, transport))
    }

    /// Bootstrap with injected boundaries.
    pub async fn bootstrap_with(
        source: Arc<dyn ConfigSource>,
        transport: Arc<dyn EmailTransport>,
    ) -> Result<Self> {
        let service = ConfigService::new(source);
        let config = service
            .load()
            .await
            .context("Configuration failed validation")?
            .clone();
        Ok(Self::assemble(config, transport))
    }

    fn assemble(config: Configuration, transport: Arc<dyn EmailTransport>) -> Self {
        info!("Thought Drop ready for '{}'", config.app.display_name);
        let controller = SubmissionController::new(&config);
        Self {
            config,
            controller,
            transport,
        }
    }

    pub fn config(&self) -> &Configuration {
        &self.config
    }

    pub fn draft(&self) -> &FormDraft {
        self.controller.draft()
    }

    pub fn draft_mut(&mut self) -> &mut FormDraft {
        self.controller.draft_mut()
    }

    pub fn phase(&self) -> SubmissionPhase {
        self.controller.phase()
    }

    /// Submit the current draft and translate the outcome into host
    /// feedback. Every error category gets its own message; the draft is
    /// only cleared on success.
    pub async fn on_submit(&mut self) -> SubmitFeedback {
        match self
            .controller
            .submit(&self.config, self.transport.as_ref())
            .await
        {
            Ok(SubmitOutcome::Sent) => SubmitFeedback::Notice(Notice {
                level: NoticeLevel::Success,
                message: "Your thought drop is on its way 💌".to_string(),
            }),
            Ok(SubmitOutcome::Rejected { focus, .. }) => SubmitFeedback::Focus(focus),
            Ok(SubmitOutcome::InFlight) => SubmitFeedback::Busy,
            Err(SubmissionError::TransportNotConfigured) => SubmitFeedback::Notice(Notice {
                level: NoticeLevel::Error,
                message: "Email sending isn't set up yet. Add your EmailJS keys to the config."
                    .to_string(),
            }),
            Err(SubmissionError::SendFailed(_)) => SubmitFeedback::Notice(Notice {
                level: NoticeLevel::Error,
                message: "Couldn't send your thought drop. Your message is still here — try again."
                    .to_string(),
            }),
        }
    }

    /// Back to a fresh draft (the confirmation screen's reset action).
    pub fn on_reset(&mut self) {
        self.controller.reset(&self.config);
    }
}
