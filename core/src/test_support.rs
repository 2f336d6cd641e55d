//! Shared test doubles for the service tests.

use async_trait::async_trait;
use std::sync::Mutex;

use shared::config::Configuration;

use crate::domain::payload::TemplateParams;
use crate::transport::{EmailTransport, TransportError};

/// A default configuration with transport credentials filled in.
pub fn configured_config() -> Configuration {
    let mut config = Configuration::default();
    config.email_transport.public_key = "pk_1".to_string();
    config.email_transport.service_id = "svc_1".to_string();
    config.email_transport.template_id = "tpl_1".to_string();
    config
}

/// Records every send; optionally fails each one.
pub struct RecordingTransport {
    calls: Mutex<Vec<(String, String, TemplateParams)>>,
    fail: bool,
}

impl RecordingTransport {
    pub fn succeeding() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            fail: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn calls(&self) -> Vec<(String, String, TemplateParams)> {
        self.calls.lock().expect("calls lock").clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().expect("calls lock").len()
    }
}

#[async_trait]
impl EmailTransport for RecordingTransport {
    async fn send(
        &self,
        service_id: &str,
        template_id: &str,
        params: &TemplateParams,
    ) -> Result<(), TransportError> {
        self.calls.lock().expect("calls lock").push((
            service_id.to_string(),
            template_id.to_string(),
            params.clone(),
        ));
        if self.fail {
            Err(TransportError::Request("simulated outage".to_string()))
        } else {
            Ok(())
        }
    }
}
