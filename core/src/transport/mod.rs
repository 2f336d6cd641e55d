//! # Email Transport
//!
//! Boundary trait for the external transactional-email service. Delivery
//! guarantees, retries and backoff belong to the service, not to this crate.

use async_trait::async_trait;

use crate::domain::payload::TemplateParams;

pub mod emailjs;

pub use emailjs::EmailJsTransport;

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The request never completed (network failure, timeout, client error).
    #[error("Transport request failed: {0}")]
    Request(String),
    /// The service answered with a non-success status.
    #[error("Transport rejected the send ({status}): {body}")]
    Rejected { status: u16, body: String },
}

/// An external capability that can deliver one templated email.
#[async_trait]
pub trait EmailTransport: Send + Sync {
    async fn send(
        &self,
        service_id: &str,
        template_id: &str,
        params: &TemplateParams,
    ) -> Result<(), TransportError>;
}
