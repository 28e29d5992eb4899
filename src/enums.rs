//! Closed enumerations used throughout the wizard definition model.
//!
//! These are "closed" enums: only the defined variants are valid. Open
//! vocabularies (field `type`, action `type`) are represented as strings and
//! checked against configured sets.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The kinds of object that make up a wizard definition tree.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectKind {
    Wizard,
    Step,
    Field,
    Action,
}

impl ObjectKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ObjectKind::Wizard => "wizard",
            ObjectKind::Step => "step",
            ObjectKind::Field => "field",
            ObjectKind::Action => "action",
        }
    }

    /// Attributes that must be present and non-blank on every object of this
    /// kind, in reporting order.
    pub const fn required_attributes(&self) -> &'static [Attribute] {
        match self {
            ObjectKind::Wizard => &[Attribute::Id, Attribute::Name, Attribute::Steps],
            ObjectKind::Step => &[Attribute::Id],
            ObjectKind::Field | ObjectKind::Action => &[Attribute::Id, Attribute::Type],
        }
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Attributes named by the required-attribute table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Attribute {
    Id,
    Name,
    Steps,
    Type,
}

impl Attribute {
    pub fn as_str(&self) -> &'static str {
        match self {
            Attribute::Id => "id",
            Attribute::Name => "name",
            Attribute::Steps => "steps",
            Attribute::Type => "type",
        }
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Subscription level of the caller.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionTier {
    #[default]
    None,
    Standard,
    Business,
    Community,
}

impl SubscriptionTier {
    /// Lenient conversion from the subscription service's tier string.
    /// Unknown values are treated as unsubscribed.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "standard" => SubscriptionTier::Standard,
            "business" => SubscriptionTier::Business,
            "community" => SubscriptionTier::Community,
            _ => SubscriptionTier::None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SubscriptionTier::None => "none",
            SubscriptionTier::Standard => "standard",
            SubscriptionTier::Business => "business",
            SubscriptionTier::Community => "community",
        }
    }

    pub fn is_subscribed(&self) -> bool {
        !matches!(self, SubscriptionTier::None)
    }
}

impl fmt::Display for SubscriptionTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stable message identifiers for validation errors. Rendering to a
/// localized string is left to the caller.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MessageKey {
    RequiredPropertyMissing,
    IdentifierConflict,
    AfterSignupConflict,
    AfterSignupAfterTimeContradiction,
    InvalidActivationTime,
    MissingGroup,
    NotPermittedForGuests,
    LiquidSyntaxError,
    SubscriptionRequired,
}

impl MessageKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageKey::RequiredPropertyMissing => "required-property-missing",
            MessageKey::IdentifierConflict => "identifier-conflict",
            MessageKey::AfterSignupConflict => "after-signup-conflict",
            MessageKey::AfterSignupAfterTimeContradiction => {
                "after-signup-after-time-contradiction"
            }
            MessageKey::InvalidActivationTime => "invalid-activation-time",
            MessageKey::MissingGroup => "missing-group",
            MessageKey::NotPermittedForGuests => "not-permitted-for-guests",
            MessageKey::LiquidSyntaxError => "liquid-syntax-error",
            MessageKey::SubscriptionRequired => "subscription-required",
        }
    }
}

impl fmt::Display for MessageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
