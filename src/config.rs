//! Validator configuration.
//!
//! Holds the host-specific vocabularies the checks consult: the guest group
//! id, which field and action types need a signed-in user, and which
//! features are gated behind a subscription tier. The required-attribute
//! table is fixed and lives on [`ObjectKind`](crate::enums::ObjectKind).

use serde::{Deserialize, Serialize};

use crate::enums::{ObjectKind, SubscriptionTier};
use crate::error::{ParseError, ParseErrorKind};
use crate::services::Entitlement;

/// Well-known group id meaning "unauthenticated visitors".
pub const GUEST_GROUP_ID: i64 = -1;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidatorConfig {
    pub guest_group_id: i64,
    pub field_types_requiring_user: Vec<String>,
    pub action_types_requiring_user: Vec<String>,
    pub subscription_rules: Vec<SubscriptionRule>,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            guest_group_id: GUEST_GROUP_ID,
            field_types_requiring_user: vec!["upload".to_string()],
            action_types_requiring_user: [
                "update_profile",
                "open_composer",
                "watch_categories",
                "add_to_group",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            subscription_rules: Vec::new(),
        }
    }
}

impl ValidatorConfig {
    /// Decode a configuration from YAML. Missing keys keep their defaults.
    pub fn from_yaml(input: &str) -> Result<Self, ParseError> {
        if input.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_saphyr::from_str(input)
            .map_err(|e| ParseError::new(ParseErrorKind::TypeMismatch, e.to_string()))
    }

    /// Whether objects of this kind and type require a signed-in user.
    pub fn requires_user(&self, kind: ObjectKind, object_type: &str) -> bool {
        let types = match kind {
            ObjectKind::Field => &self.field_types_requiring_user,
            ObjectKind::Action => &self.action_types_requiring_user,
            ObjectKind::Wizard | ObjectKind::Step => return false,
        };
        types.iter().any(|t| t == object_type)
    }

    /// Subscription rules that apply to objects of this kind.
    pub fn rules_for(&self, kind: ObjectKind) -> impl Iterator<Item = &SubscriptionRule> {
        self.subscription_rules.iter().filter(move |r| r.kind == kind)
    }
}

/// Gates an attribute (optionally a specific value of it) on one object kind
/// behind a set of subscription tiers.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionRule {
    pub kind: ObjectKind,
    pub attribute: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    pub tiers: Vec<SubscriptionTier>,
}

impl SubscriptionRule {
    /// Human-readable feature name, e.g. `action.type=send_to_api`.
    pub fn feature(&self) -> String {
        match &self.value {
            Some(value) => format!("{}.{}={}", self.kind, self.attribute, value),
            None => format!("{}.{}", self.kind, self.attribute),
        }
    }

    /// Allowed when the caller is on a listed tier or holds a listed tier's
    /// flag.
    pub fn allows(&self, entitlement: &Entitlement) -> bool {
        self.tiers
            .iter()
            .any(|tier| *tier == entitlement.tier || entitlement.has_flag(tier.as_str()))
    }

    pub fn tier_list(&self) -> String {
        self.tiers
            .iter()
            .map(SubscriptionTier::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}
