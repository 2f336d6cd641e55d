//! # Transport Payload
//!
//! Maps a validated draft through the personalization tables into the flat
//! parameter mapping the email template consumes.

use chrono::{DateTime, Datelike, FixedOffset, Timelike};
use serde::Serialize;
use std::collections::BTreeMap;

use shared::config::Configuration;
use shared::form::FormDraft;

/// Value of the `events` parameter when nothing was selected.
pub const EMPTY_EVENTS_SENTINEL: &str = "No specific events mentioned";

/// Flat parameter mapping handed to the email transport.
///
/// Serializes with one `{meter}_meter` integer per configured meter and an
/// `environment` tag only on test sends.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TemplateParams {
    pub feeling_emoji: String,
    pub feeling_label: String,
    pub name: String,
    pub events: String,
    pub message: String,
    pub response_type: String,
    pub timestamp: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub environment: Option<String>,
    #[serde(flatten)]
    pub meters: BTreeMap<String, i64>,
}

/// Fixed display zone for the timestamp parameter (UTC+05:30).
pub fn display_zone() -> FixedOffset {
    FixedOffset::east_opt(5 * 3600 + 30 * 60).expect("display offset is in range")
}

/// Build the parameter mapping for a draft. The draft is expected to have
/// passed validation; out-of-range lookups degrade to empty strings rather
/// than panicking.
pub fn build_template_params(
    draft: &FormDraft,
    config: &Configuration,
    sent_at: DateTime<FixedOffset>,
) -> TemplateParams {
    let personalization = &config.personalization;

    let (feeling_emoji, feeling_label) = draft
        .feeling
        .and_then(|index| personalization.emotion_pair(index))
        .map(|(emoji, label)| (emoji.to_string(), label.to_string()))
        .unwrap_or_default();

    // Selected event labels in configured order, not selection order.
    let selected: Vec<String> = personalization
        .event_options()
        .into_iter()
        .filter(|option| draft.events.contains(&option.id))
        .map(|option| option.label)
        .collect();
    let events = if selected.is_empty() {
        EMPTY_EVENTS_SENTINEL.to_string()
    } else {
        selected.join(", ")
    };

    let meters = draft
        .meters
        .iter()
        .map(|(name, value)| (format!("{name}_meter"), *value))
        .collect();

    let environment = (config.email_transport.environment == "test")
        .then(|| config.email_transport.environment.clone());

    TemplateParams {
        feeling_emoji,
        feeling_label,
        name: draft.name.clone().unwrap_or_default(),
        events,
        message: draft.message.clone(),
        response_type: draft.response_type.clone().unwrap_or_default(),
        timestamp: format_display_timestamp(sent_at),
        environment,
        meters,
    }
}

/// "Monday, 25 August 2025 at 3:04 pm" in the given zone.
pub fn format_display_timestamp(at: DateTime<FixedOffset>) -> String {
    let (is_pm, hour) = at.hour12();
    format!(
        "{}, {} {} {} at {}:{:02} {}",
        at.format("%A"),
        at.day(),
        at.format("%B"),
        at.year(),
        hour,
        at.minute(),
        if is_pm { "pm" } else { "am" }
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use shared::config::Configuration;

    fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<FixedOffset> {
        display_zone()
            .with_ymd_and_hms(y, mo, d, h, mi, 0)
            .single()
            .expect("valid test timestamp")
    }

    fn scenario_draft(config: &Configuration) -> FormDraft {
        let mut draft = FormDraft::fresh(&config.personalization);
        draft.feeling = Some(5);
        draft.name = Some("Princess".to_string());
        draft.response_type = Some("Listen only".to_string());
        draft
    }

    #[test]
    fn timestamp_uses_the_fixed_display_format() {
        assert_eq!(
            format_display_timestamp(at(2025, 8, 25, 15, 4)),
            "Monday, 25 August 2025 at 3:04 pm"
        );
        assert_eq!(
            format_display_timestamp(at(2025, 8, 25, 0, 5)),
            "Monday, 25 August 2025 at 12:05 am"
        );
    }

    #[test]
    fn every_feeling_index_reproduces_its_emoji_label_pair() {
        let config = Configuration::default();
        let mut draft = FormDraft::fresh(&config.personalization);
        for index in 0..config.personalization.emotion_emojis.len() {
            draft.feeling = Some(index);
            let params = build_template_params(&draft, &config, at(2025, 8, 25, 12, 0));
            assert_eq!(params.feeling_emoji, config.personalization.emotion_emojis[index]);
            assert_eq!(params.feeling_label, config.personalization.emotion_labels[index]);
        }
    }

    #[test]
    fn empty_events_use_the_sentinel() {
        let config = Configuration::default();
        let params = build_template_params(&scenario_draft(&config), &config, at(2025, 8, 25, 12, 0));
        assert_eq!(params.events, EMPTY_EVENTS_SENTINEL);
    }

    #[test]
    fn selected_events_join_labels_in_configured_order() {
        let config = Configuration::default();
        let mut draft = scenario_draft(&config);
        // The set orders these as other < small-win; the payload must not.
        draft.events.insert("small-win".to_string());
        draft.events.insert("other".to_string());

        let params = build_template_params(&draft, &config, at(2025, 8, 25, 12, 0));
        assert_eq!(params.events, "Small win 🌟, Other");
    }

    #[test]
    fn meters_flatten_into_suffixed_parameters() {
        let config = Configuration::default();
        let params = build_template_params(&scenario_draft(&config), &config, at(2025, 8, 25, 12, 0));
        let json = serde_json::to_value(&params).expect("params should serialize");

        assert_eq!(json["miss_you_meter"], 5);
        assert_eq!(json["horny_meter"], 5);
        assert_eq!(json["angry_meter"], 1);
        assert_eq!(json["response_type"], "Listen only");
        // production sends carry no environment tag at all
        assert!(json.get("environment").is_none());
    }

    #[test]
    fn test_sends_carry_the_environment_tag() {
        let mut config = Configuration::default();
        config.email_transport.environment = "test".to_string();
        let params = build_template_params(&scenario_draft(&config), &config, at(2025, 8, 25, 12, 0));
        assert_eq!(params.environment.as_deref(), Some("test"));
    }
}
