//! Shared data model for the Thought Drop core.
//!
//! Plain serde types used by both the service layer and any presentation
//! host: the configuration tree (with its overlay/merge machinery) and the
//! in-progress form draft.

pub mod config;
pub mod form;

pub use config::{
    AppInfo, ConfigOverlay, Configuration, EmailTransportConfig, EventOption, MeterConfig,
    Personalization,
};
pub use form::{FieldId, FormDraft, FIELD_ORDER};
