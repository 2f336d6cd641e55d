//! # Form Draft
//!
//! The single in-progress draft held by the form before submission, and the
//! fixed field ordering used when validation has to pick a field to focus.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::config::Personalization;

/// Identifier for one form field (or field group, for the meters card).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldId {
    Feeling,
    Name,
    MissYou,
    Events,
    Message,
    ResponseType,
}

/// Fixed ordering used to pick the first invalid field after a failed
/// validation pass.
pub const FIELD_ORDER: [FieldId; 6] = [
    FieldId::Feeling,
    FieldId::Name,
    FieldId::MissYou,
    FieldId::Events,
    FieldId::Message,
    FieldId::ResponseType,
];

impl FieldId {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldId::Feeling => "feeling",
            FieldId::Name => "name",
            FieldId::MissYou => "missYou",
            FieldId::Events => "events",
            FieldId::Message => "message",
            FieldId::ResponseType => "responseType",
        }
    }

    /// Position in the fixed validation order.
    pub fn order_index(&self) -> usize {
        FIELD_ORDER
            .iter()
            .position(|field| field == self)
            .unwrap_or(FIELD_ORDER.len())
    }
}

impl std::fmt::Display for FieldId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One in-flight draft. Created fresh per visit, mutated field by field,
/// cleared after a successful submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormDraft {
    /// Index into the emotion emoji/label tables.
    pub feeling: Option<usize>,
    /// One of the configured name options.
    pub name: Option<String>,
    /// Current value per configured meter, keyed by meter name.
    pub meters: BTreeMap<String, i64>,
    /// Selected event ids. Unique; selection order is irrelevant.
    pub events: BTreeSet<String>,
    pub message: String,
    /// One of the configured response options, if the user picked one.
    pub response_type: Option<String>,
}

impl FormDraft {
    /// A fresh draft: every configured meter at its default, everything
    /// else unset.
    pub fn fresh(personalization: &Personalization) -> Self {
        Self {
            feeling: None,
            name: None,
            meters: personalization
                .meters
                .iter()
                .map(|(name, meter)| (name.clone(), meter.default_value))
                .collect(),
            events: BTreeSet::new(),
            message: String::new(),
            response_type: None,
        }
    }

    /// Value of the canonical miss-you meter, if configured.
    pub fn miss_you(&self) -> Option<i64> {
        self.meters.get("miss_you").copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Configuration;

    #[test]
    fn field_order_is_the_documented_one() {
        let ids: Vec<&str> = FIELD_ORDER.iter().map(|f| f.as_str()).collect();
        assert_eq!(
            ids,
            vec!["feeling", "name", "missYou", "events", "message", "responseType"]
        );
        assert_eq!(FieldId::Feeling.order_index(), 0);
        assert_eq!(FieldId::ResponseType.order_index(), 5);
    }

    #[test]
    fn fresh_draft_seeds_meter_defaults_and_nothing_else() {
        let config = Configuration::default();
        let draft = FormDraft::fresh(&config.personalization);

        assert_eq!(draft.feeling, None);
        assert_eq!(draft.name, None);
        assert!(draft.events.is_empty());
        assert!(draft.message.is_empty());
        assert_eq!(draft.response_type, None);

        assert_eq!(draft.miss_you(), Some(5));
        assert_eq!(draft.meters.get("angry").copied(), Some(1));
        assert_eq!(draft.meters.len(), config.personalization.meters.len());
    }
}
