//! # Configuration Model
//!
//! The full configuration tree for a Thought Drop deployment, plus the
//! overlay type used to merge a fetched document over the built-in defaults.
//!
//! ## Merge semantics
//!
//! - Scalars and arrays present in an overlay replace the default value
//!   wholesale (arrays are never concatenated).
//! - Nested objects merge field by field; absent fields keep their defaults.
//! - The `meters` map merges per key: known meters merge field-wise, unknown
//!   keys create a new meter from slider defaults plus the provided fields.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Application identity shown in the page chrome and meta tags
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppInfo {
    pub author: String,
    pub name: String,
    pub title: String,
    pub display_name: String,
    pub subtitle: String,
    pub description: String,
}

/// One configurable range meter (e.g. the Miss You Meter)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeterConfig {
    pub label: String,
    pub min: i64,
    pub max: i64,
    #[serde(rename = "default")]
    pub default_value: i64,
}

/// Ordered option lists that parameterize the form controls
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Personalization {
    pub name_options: Vec<String>,
    /// Parallel to `emotion_labels`; the feeling index addresses both.
    pub emotion_emojis: Vec<String>,
    pub emotion_labels: Vec<String>,
    /// Meter name (e.g. "miss_you") to its configuration.
    pub meters: BTreeMap<String, MeterConfig>,
    pub event_options: Vec<String>,
    pub response_options: Vec<String>,
}

/// Credentials and routing for the transactional-email service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailTransportConfig {
    pub public_key: String,
    pub service_id: String,
    pub template_id: String,
    pub test_template_id: Option<String>,
    /// "production" or "test"; test sends resolve to the test template.
    pub environment: String,
}

/// The complete, validated configuration tree.
///
/// Built once at startup and never mutated afterwards; consumers receive it
/// by reference rather than through a global.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Configuration {
    pub app: AppInfo,
    pub personalization: Personalization,
    pub email_transport: EmailTransportConfig,
}

/// An event checkbox option: a stable id derived from the configured label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventOption {
    pub id: String,
    pub label: String,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            app: AppInfo {
                author: "Your Name".to_string(),
                name: "Thought Drop".to_string(),
                title: "Thought Drop".to_string(),
                display_name: "Thought Drop".to_string(),
                subtitle: "A safe space for your heart".to_string(),
                description: "A gentle place to drop what's on your heart".to_string(),
            },
            personalization: Personalization {
                name_options: vec![
                    "Princess".to_string(),
                    "Baby".to_string(),
                    "Good girl".to_string(),
                    "Sweetheart".to_string(),
                    "Love".to_string(),
                ],
                emotion_emojis: ["😢", "😔", "😕", "😐", "😊", "😄", "😍", "🥰", "😈", "🔥"]
                    .iter()
                    .map(|s| s.to_string())
                    .collect(),
                emotion_labels: [
                    "Very Sad", "Sad", "Down", "Neutral", "Happy", "Joyful", "Loving",
                    "Adoring", "Naughty", "Fiery",
                ]
                .iter()
                .map(|s| s.to_string())
                .collect(),
                meters: BTreeMap::from([
                    (
                        "miss_you".to_string(),
                        MeterConfig {
                            label: "Miss You Meter".to_string(),
                            min: 0,
                            max: 10,
                            default_value: 5,
                        },
                    ),
                    (
                        "horny".to_string(),
                        MeterConfig {
                            label: "Horny Meter".to_string(),
                            min: 0,
                            max: 10,
                            default_value: 5,
                        },
                    ),
                    (
                        "angry".to_string(),
                        MeterConfig {
                            label: "Angry Meter".to_string(),
                            min: 0,
                            max: 10,
                            default_value: 1,
                        },
                    ),
                ]),
                event_options: vec![
                    "Small win 🌟".to_string(),
                    "Tough moment 💭".to_string(),
                    "Need a hug 🤗".to_string(),
                    "Proud of myself ✨".to_string(),
                    "Other".to_string(),
                ],
                response_options: vec![
                    "Listen only".to_string(),
                    "Advice welcome".to_string(),
                    "Hype me up".to_string(),
                    "Check on me later".to_string(),
                ],
            },
            email_transport: EmailTransportConfig {
                public_key: String::new(),
                service_id: String::new(),
                template_id: String::new(),
                test_template_id: None,
                environment: "production".to_string(),
            },
        }
    }
}

impl Configuration {
    /// Template id to route sends through: the test template when the
    /// environment is "test" and one is configured, else production.
    pub fn resolved_template_id(&self) -> &str {
        if self.email_transport.environment == "test" {
            if let Some(test_id) = self.email_transport.test_template_id.as_deref() {
                if !test_id.is_empty() {
                    return test_id;
                }
            }
        }
        &self.email_transport.template_id
    }

    /// True iff public key, service id and template id are all present.
    pub fn is_email_transport_configured(&self) -> bool {
        !self.email_transport.public_key.is_empty()
            && !self.email_transport.service_id.is_empty()
            && !self.email_transport.template_id.is_empty()
    }

    /// Merge an overlay over this tree, field by field.
    pub fn merged_with(mut self, overlay: ConfigOverlay) -> Self {
        if let Some(app) = overlay.app {
            self.app.merge(app);
        }
        if let Some(personalization) = overlay.personalization {
            self.personalization.merge(personalization);
        }
        if let Some(email_transport) = overlay.email_transport {
            self.email_transport.merge(email_transport);
        }
        self
    }
}

impl Personalization {
    /// Emoji/label pair at a feeling index, if the index is in range.
    pub fn emotion_pair(&self, index: usize) -> Option<(&str, &str)> {
        match (self.emotion_emojis.get(index), self.emotion_labels.get(index)) {
            (Some(emoji), Some(label)) => Some((emoji.as_str(), label.as_str())),
            _ => None,
        }
    }

    /// Event options as id/label pairs, in configured order.
    pub fn event_options(&self) -> Vec<EventOption> {
        self.event_options
            .iter()
            .map(|label| EventOption {
                id: event_id_for_label(label),
                label: label.clone(),
            })
            .collect()
    }

    /// Human-readable label for a selected event id.
    pub fn event_label_for_id(&self, id: &str) -> Option<&str> {
        self.event_options
            .iter()
            .find(|label| event_id_for_label(label) == id)
            .map(|label| label.as_str())
    }
}

/// Derive a stable identifier from an event label: lowercase ASCII
/// alphanumerics with everything else collapsed into single hyphens.
/// "Small win 🌟" becomes "small-win".
pub fn event_id_for_label(label: &str) -> String {
    let mut id = String::with_capacity(label.len());
    let mut pending_separator = false;
    for c in label.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_separator && !id.is_empty() {
                id.push('-');
            }
            pending_separator = false;
            id.push(c.to_ascii_lowercase());
        } else {
            pending_separator = true;
        }
    }
    id
}

// ---------------------------------------------------------------------------
// Overlay types: an all-Option mirror of the tree, deserialized from the
// fetched JSON document (or assembled from environment variables).
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppOverlay {
    pub author: Option<String>,
    pub name: Option<String>,
    pub title: Option<String>,
    pub display_name: Option<String>,
    pub subtitle: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MeterOverlay {
    pub label: Option<String>,
    pub min: Option<i64>,
    pub max: Option<i64>,
    #[serde(rename = "default")]
    pub default_value: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PersonalizationOverlay {
    pub name_options: Option<Vec<String>>,
    pub emotion_emojis: Option<Vec<String>>,
    pub emotion_labels: Option<Vec<String>>,
    pub meters: Option<BTreeMap<String, MeterOverlay>>,
    pub event_options: Option<Vec<String>>,
    pub response_options: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EmailTransportOverlay {
    pub public_key: Option<String>,
    pub service_id: Option<String>,
    pub template_id: Option<String>,
    pub test_template_id: Option<String>,
    pub environment: Option<String>,
}

/// Partial configuration document merged over the defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConfigOverlay {
    pub app: Option<AppOverlay>,
    pub personalization: Option<PersonalizationOverlay>,
    pub email_transport: Option<EmailTransportOverlay>,
}

impl ConfigOverlay {
    pub fn is_empty(&self) -> bool {
        self.app.is_none() && self.personalization.is_none() && self.email_transport.is_none()
    }
}

impl AppInfo {
    fn merge(&mut self, overlay: AppOverlay) {
        if let Some(author) = overlay.author {
            self.author = author;
        }
        if let Some(name) = overlay.name {
            self.name = name;
        }
        if let Some(title) = overlay.title {
            self.title = title;
        }
        if let Some(display_name) = overlay.display_name {
            self.display_name = display_name;
        }
        if let Some(subtitle) = overlay.subtitle {
            self.subtitle = subtitle;
        }
        if let Some(description) = overlay.description {
            self.description = description;
        }
    }
}

impl MeterConfig {
    /// Base for meter keys the defaults don't know about: the range slider's
    /// own defaults, labelled by the key until an overlay names it.
    fn for_unknown_key(key: &str) -> Self {
        Self {
            label: key.to_string(),
            min: 0,
            max: 10,
            default_value: 0,
        }
    }

    fn merge(&mut self, overlay: MeterOverlay) {
        if let Some(label) = overlay.label {
            self.label = label;
        }
        if let Some(min) = overlay.min {
            self.min = min;
        }
        if let Some(max) = overlay.max {
            self.max = max;
        }
        if let Some(default_value) = overlay.default_value {
            self.default_value = default_value;
        }
    }
}

impl Personalization {
    fn merge(&mut self, overlay: PersonalizationOverlay) {
        if let Some(name_options) = overlay.name_options {
            self.name_options = name_options;
        }
        if let Some(emotion_emojis) = overlay.emotion_emojis {
            self.emotion_emojis = emotion_emojis;
        }
        if let Some(emotion_labels) = overlay.emotion_labels {
            self.emotion_labels = emotion_labels;
        }
        if let Some(meters) = overlay.meters {
            for (key, meter_overlay) in meters {
                self.meters
                    .entry(key.clone())
                    .or_insert_with(|| MeterConfig::for_unknown_key(&key))
                    .merge(meter_overlay);
            }
        }
        if let Some(event_options) = overlay.event_options {
            self.event_options = event_options;
        }
        if let Some(response_options) = overlay.response_options {
            self.response_options = response_options;
        }
    }
}

impl EmailTransportConfig {
    fn merge(&mut self, overlay: EmailTransportOverlay) {
        if let Some(public_key) = overlay.public_key {
            self.public_key = public_key;
        }
        if let Some(service_id) = overlay.service_id {
            self.service_id = service_id;
        }
        if let Some(template_id) = overlay.template_id {
            self.template_id = template_id;
        }
        if let Some(test_template_id) = overlay.test_template_id {
            self.test_template_id = Some(test_template_id);
        }
        if let Some(environment) = overlay.environment {
            self.environment = environment;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_tree_is_internally_consistent() {
        let config = Configuration::default();
        assert_eq!(
            config.personalization.emotion_emojis.len(),
            config.personalization.emotion_labels.len()
        );
        for (name, meter) in &config.personalization.meters {
            assert!(
                meter.min <= meter.default_value && meter.default_value <= meter.max,
                "meter {name} defaults out of range"
            );
        }
        assert!(config.personalization.meters.contains_key("miss_you"));
    }

    #[test]
    fn resolved_template_id_prefers_test_template_in_test_env() {
        let mut config = Configuration::default();
        config.email_transport.template_id = "prod_tpl".to_string();
        config.email_transport.test_template_id = Some("test_tpl".to_string());

        config.email_transport.environment = "production".to_string();
        assert_eq!(config.resolved_template_id(), "prod_tpl");

        config.email_transport.environment = "test".to_string();
        assert_eq!(config.resolved_template_id(), "test_tpl");

        config.email_transport.test_template_id = None;
        assert_eq!(config.resolved_template_id(), "prod_tpl");
    }

    #[test]
    fn transport_configured_requires_all_three_credentials() {
        let mut config = Configuration::default();
        assert!(!config.is_email_transport_configured());

        config.email_transport.public_key = "pk".to_string();
        config.email_transport.service_id = "svc".to_string();
        assert!(!config.is_email_transport_configured());

        config.email_transport.template_id = "tpl".to_string();
        assert!(config.is_email_transport_configured());
    }

    #[test]
    fn event_ids_slug_their_labels() {
        assert_eq!(event_id_for_label("Small win 🌟"), "small-win");
        assert_eq!(event_id_for_label("Need a hug 🤗"), "need-a-hug");
        assert_eq!(event_id_for_label("Proud of myself ✨"), "proud-of-myself");
        assert_eq!(event_id_for_label("Other"), "other");
    }

    #[test]
    fn event_options_expose_id_label_pairs_in_order() {
        let config = Configuration::default();
        let options = config.personalization.event_options();
        assert_eq!(options.len(), 5);
        assert_eq!(options[0].id, "small-win");
        assert_eq!(options[0].label, "Small win 🌟");
        assert_eq!(
            config.personalization.event_label_for_id("tough-moment"),
            Some("Tough moment 💭")
        );
        assert_eq!(config.personalization.event_label_for_id("nope"), None);
    }

    #[test]
    fn merge_overrides_present_fields_and_keeps_the_rest() {
        let overlay: ConfigOverlay = serde_json::from_str(
            r#"{
                "app": { "author": "Vaibhav" },
                "personalization": { "nameOptions": ["Pari", "Baby girl"] },
                "emailTransport": { "publicKey": "pk_123", "environment": "test" }
            }"#,
        )
        .expect("overlay should parse");

        let merged = Configuration::default().merged_with(overlay);
        assert_eq!(merged.app.author, "Vaibhav");
        // untouched sibling field keeps its default
        assert_eq!(merged.app.name, "Thought Drop");
        // arrays are replaced wholesale, never concatenated
        assert_eq!(merged.personalization.name_options, vec!["Pari", "Baby girl"]);
        assert_eq!(merged.email_transport.public_key, "pk_123");
        assert_eq!(merged.email_transport.environment, "test");
        assert_eq!(merged.email_transport.template_id, "");
    }

    #[test]
    fn merge_meters_per_key() {
        let overlay: ConfigOverlay = serde_json::from_str(
            r#"{
                "personalization": {
                    "meters": {
                        "miss_you": { "max": 11 },
                        "sleepy": { "label": "Sleepy Meter", "default": 3 }
                    }
                }
            }"#,
        )
        .expect("overlay should parse");

        let merged = Configuration::default().merged_with(overlay);
        let miss_you = &merged.personalization.meters["miss_you"];
        assert_eq!(miss_you.max, 11);
        assert_eq!(miss_you.label, "Miss You Meter");
        assert_eq!(miss_you.default_value, 5);

        let sleepy = &merged.personalization.meters["sleepy"];
        assert_eq!(sleepy.label, "Sleepy Meter");
        assert_eq!((sleepy.min, sleepy.max, sleepy.default_value), (0, 10, 3));
        // untouched meter survives
        assert!(merged.personalization.meters.contains_key("angry"));
    }

    #[test]
    fn merging_a_tree_with_its_own_overlay_is_identity() {
        let config = Configuration::default();
        // The serialized tree is a complete overlay of itself.
        let json = serde_json::to_string(&config).expect("config should serialize");
        let overlay: ConfigOverlay = serde_json::from_str(&json).expect("overlay should parse");
        let merged = config.clone().merged_with(overlay);
        assert_eq!(merged, config);
    }
}
