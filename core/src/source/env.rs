//! Environment-variable configuration overrides.
//!
//! Deployments can override individual fields with `THOUGHT_DROP_*`
//! variables; list-valued variables are comma-separated. Applied after the
//! fetched document, so the environment always wins.

use shared::config::{
    AppOverlay, ConfigOverlay, EmailTransportOverlay, PersonalizationOverlay,
};

fn var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|value| !value.is_empty())
}

fn list_var(name: &str) -> Option<Vec<String>> {
    var(name).map(|value| value.split(',').map(|item| item.trim().to_string()).collect())
}

/// Build the overlay described by the current process environment.
pub fn overlay_from_env() -> ConfigOverlay {
    let app = AppOverlay {
        author: var("THOUGHT_DROP_APP_AUTHOR"),
        name: var("THOUGHT_DROP_APP_NAME"),
        title: var("THOUGHT_DROP_APP_TITLE"),
        display_name: var("THOUGHT_DROP_APP_DISPLAY_NAME"),
        subtitle: var("THOUGHT_DROP_APP_SUBTITLE"),
        description: var("THOUGHT_DROP_APP_DESCRIPTION"),
    };

    let personalization = PersonalizationOverlay {
        name_options: list_var("THOUGHT_DROP_NAME_OPTIONS"),
        emotion_emojis: list_var("THOUGHT_DROP_EMOTION_EMOJIS"),
        emotion_labels: list_var("THOUGHT_DROP_EMOTION_LABELS"),
        // Meters are not environment-configurable.
        meters: None,
        event_options: list_var("THOUGHT_DROP_EVENT_OPTIONS"),
        response_options: list_var("THOUGHT_DROP_RESPONSE_OPTIONS"),
    };

    let email_transport = EmailTransportOverlay {
        public_key: var("THOUGHT_DROP_EMAILJS_PUBLIC_KEY"),
        service_id: var("THOUGHT_DROP_EMAILJS_SERVICE_ID"),
        template_id: var("THOUGHT_DROP_EMAILJS_TEMPLATE_ID"),
        test_template_id: var("THOUGHT_DROP_EMAILJS_TEST_TEMPLATE_ID"),
        environment: var("THOUGHT_DROP_APP_ENV"),
    };

    ConfigOverlay {
        app: (app != AppOverlay::default()).then_some(app),
        personalization: (personalization != PersonalizationOverlay::default())
            .then_some(personalization),
        email_transport: (email_transport != EmailTransportOverlay::default())
            .then_some(email_transport),
    }
}
