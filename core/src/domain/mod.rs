//! Domain services: configuration resolution and the submission flow.

pub mod config_service;
pub mod payload;
pub mod submission_service;

pub use config_service::{ConfigError, ConfigService};
pub use payload::{build_template_params, TemplateParams, EMPTY_EVENTS_SENTINEL};
pub use submission_service::{
    first_invalid_field, SubmissionController, SubmissionError, SubmissionPhase, SubmitOutcome,
};
