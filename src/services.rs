//! External collaborators consulted during validation.
//!
//! Persistence, group lookups, time, template parsing and entitlements are
//! all owned by the host application. The validator sees them only through
//! these traits; every call is synchronous and any failure is reported as a
//! [`LookupError`] that aborts the pass.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::enums::SubscriptionTier;
use crate::error::LookupError;

// ─── Wizard storage ─────────────────────────────────────────────────────────

/// Summary row returned when listing stored wizards by setting.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WizardSummary {
    pub id: String,
    #[serde(default)]
    pub after_signup: bool,
    #[serde(default)]
    pub after_time: bool,
}

/// The persisted state of a wizard that matters to validation.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredWizard {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub after_time_scheduled: Option<String>,
}

/// Read-only view of persisted wizard definitions.
pub trait WizardStore {
    /// Whether a wizard with this id is already stored.
    fn exists(&self, id: &str) -> Result<bool, LookupError>;

    /// Stored wizards that have the named boolean setting enabled.
    fn list_by_setting(&self, setting: &str) -> Result<Vec<WizardSummary>, LookupError>;

    /// The currently persisted version of a wizard, if any.
    fn current(&self, id: &str) -> Result<Option<StoredWizard>, LookupError>;
}

// ─── Groups ─────────────────────────────────────────────────────────────────

pub trait GroupDirectory {
    fn group_exists(&self, name: &str) -> Result<bool, LookupError>;
}

// ─── Clock ──────────────────────────────────────────────────────────────────

/// Source of the current time.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock frozen at one instant.
#[derive(Clone, Copy, Debug)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

// ─── Templates ──────────────────────────────────────────────────────────────

/// Extension point for template syntax checking.
///
/// Implementations only parse; nothing is rendered. On failure the
/// diagnostic is surfaced verbatim in the validation error.
pub trait TemplateParser {
    fn parse(&self, template: &str) -> Result<(), String>;
}

/// Default template parser backed by the `liquid` crate with its standard
/// library of tags and filters.
#[cfg(feature = "liquid-syntax")]
pub struct LiquidTemplateParser {
    parser: liquid::Parser,
}

#[cfg(feature = "liquid-syntax")]
impl LiquidTemplateParser {
    pub fn new() -> Result<Self, liquid::Error> {
        let parser = liquid::ParserBuilder::with_stdlib().build()?;
        Ok(Self { parser })
    }

    /// Use a custom parser, e.g. one registering host-specific filters.
    pub fn with_parser(parser: liquid::Parser) -> Self {
        Self { parser }
    }
}

/// Convenience constructor for [`LiquidTemplateParser`].
#[cfg(feature = "liquid-syntax")]
pub fn default_template_parser() -> Result<LiquidTemplateParser, liquid::Error> {
    LiquidTemplateParser::new()
}

#[cfg(feature = "liquid-syntax")]
impl TemplateParser for LiquidTemplateParser {
    fn parse(&self, template: &str) -> Result<(), String> {
        self.parser
            .parse(template)
            .map(|_| ())
            .map_err(|e| e.to_string())
    }
}

// ─── Entitlements ───────────────────────────────────────────────────────────

/// The caller's subscription state.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entitlement {
    pub tier: SubscriptionTier,
    #[serde(default)]
    pub flags: BTreeSet<String>,
}

impl Entitlement {
    /// Entitlement with the flag set derived from a tier: `subscribed` for
    /// any paid or community tier, plus the tier's own name.
    pub fn for_tier(tier: SubscriptionTier) -> Self {
        let mut flags = BTreeSet::new();
        if tier.is_subscribed() {
            flags.insert("subscribed".to_string());
            flags.insert(tier.as_str().to_string());
        }
        Self { tier, flags }
    }

    pub fn has_flag(&self, flag: &str) -> bool {
        self.flags.contains(flag)
    }
}

/// Read-only source of the caller's entitlement, usually a cache the host
/// refreshes outside the validation pass.
pub trait EntitlementSource {
    fn entitlement(&self) -> Result<Entitlement, LookupError>;
}

impl EntitlementSource for Entitlement {
    fn entitlement(&self) -> Result<Entitlement, LookupError> {
        Ok(self.clone())
    }
}

// ─── Bundle ─────────────────────────────────────────────────────────────────

/// All collaborators needed for one validation pass.
#[derive(Clone, Copy)]
pub struct Services<'a> {
    pub store: &'a dyn WizardStore,
    pub groups: &'a dyn GroupDirectory,
    pub clock: &'a dyn Clock,
    pub templates: &'a dyn TemplateParser,
    pub entitlement: &'a dyn EntitlementSource,
}
