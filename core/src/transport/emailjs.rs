//! EmailJS send-API client (https://www.emailjs.com/docs/rest-api/send/).

use async_trait::async_trait;
use log::{debug, info, warn};
use serde_json::json;
use std::time::Duration;

use super::{EmailTransport, TransportError};
use crate::domain::payload::TemplateParams;

pub const EMAILJS_SEND_ENDPOINT: &str = "https://api.emailjs.com/api/v1.0/email/send";

const SEND_TIMEOUT: Duration = Duration::from_secs(30);

pub struct EmailJsTransport {
    client: reqwest::Client,
    endpoint: String,
    public_key: String,
}

impl EmailJsTransport {
    pub fn new(public_key: impl Into<String>) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .timeout(SEND_TIMEOUT)
            .build()
            .map_err(|e| TransportError::Request(e.to_string()))?;
        Ok(Self {
            client,
            endpoint: EMAILJS_SEND_ENDPOINT.to_string(),
            public_key: public_key.into(),
        })
    }

    /// Point the client at a different endpoint (self-hosted proxies).
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    fn request_body(
        &self,
        service_id: &str,
        template_id: &str,
        params: &TemplateParams,
    ) -> serde_json::Value {
        json!({
            "service_id": service_id,
            "template_id": template_id,
            "user_id": self.public_key,
            "template_params": params,
        })
    }
}

#[async_trait]
impl EmailTransport for EmailJsTransport {
    async fn send(
        &self,
        service_id: &str,
        template_id: &str,
        params: &TemplateParams,
    ) -> Result<(), TransportError> {
        debug!("📧 Sending via EmailJS service {service_id}, template {template_id}");

        let response = self
            .client
            .post(&self.endpoint)
            .json(&self.request_body(service_id, template_id, params))
            .send()
            .await
            .map_err(|e| TransportError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("📧 EmailJS rejected the send: {} {}", status, body);
            return Err(TransportError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        info!("📧 Thought drop email sent");
        Ok(())
    }
}
