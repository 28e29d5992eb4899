//! Rust SDK for validating interactive wizard definition documents.
//!
//! A wizard definition is a tree: top-level metadata, an ordered list of
//! steps each holding fields, and an optional list of actions. Before a
//! definition is stored or run, this crate checks it in a single pass:
//!
//! ```text
//! parse(yaml | json) → WizardDefinition → validate(doc, options, services) → ValidationResult
//! ```
//!
//! The checks cover required attributes, identifier conflicts on creation,
//! the mutually exclusive "after signup" and "after time" schedules,
//! subscription gating, guest-access restrictions, and Liquid syntax of
//! every template-bearing attribute. Storage, groups, time, templates and
//! entitlements are reached through the traits in [`services`].
//!
//! # Quick Start
//!
//! ```rust
//! use wizdef::services::*;
//! use wizdef::{LookupError, ValidationOptions};
//!
//! struct Empty;
//!
//! impl WizardStore for Empty {
//!     fn exists(&self, _id: &str) -> Result<bool, LookupError> { Ok(false) }
//!     fn list_by_setting(&self, _s: &str) -> Result<Vec<WizardSummary>, LookupError> { Ok(vec![]) }
//!     fn current(&self, _id: &str) -> Result<Option<StoredWizard>, LookupError> { Ok(None) }
//! }
//!
//! impl GroupDirectory for Empty {
//!     fn group_exists(&self, _name: &str) -> Result<bool, LookupError> { Ok(false) }
//! }
//!
//! let parser = default_template_parser().expect("liquid parser");
//! let entitlement = Entitlement::default();
//! let services = Services {
//!     store: &Empty,
//!     groups: &Empty,
//!     clock: &SystemClock,
//!     templates: &parser,
//!     entitlement: &entitlement,
//! };
//!
//! let doc = wizdef::parse(r#"
//! id: welcome
//! name: Welcome
//! steps:
//!   - id: intro
//!     fields:
//!       - id: bio
//!         type: textarea
//!         description: "Tell us about {{ user.username }}"
//! "#).expect("valid yaml");
//!
//! let result = wizdef::validate(&doc, ValidationOptions::create(), services).expect("lookups");
//! assert!(result.is_valid());
//! ```
//!
//! # Feature Flags
//!
//! | Feature         | Default | Description |
//! |-----------------|---------|-------------|
//! | `liquid-syntax` | yes     | Liquid syntax checking via the [`liquid`] crate. Enables [`services::LiquidTemplateParser`]. |

pub mod config;
pub mod enums;
pub mod error;
pub mod parse;
pub mod primitives;
pub mod services;
pub mod types;
pub mod validate;

pub use config::ValidatorConfig;
pub use enums::*;
pub use error::*;
pub use types::*;

pub use parse::parse;
pub use validate::{Validator, validate};

use services::Services;

/// Convenience entry point composing parse → validate.
///
/// Returns the parsed definition when it is accepted.
///
/// # Errors
///
/// Returns `Err(Vec<WizdefError>)` holding the parse error, the lookup
/// failure that aborted validation, or every validation error found.
pub fn load(
    input: &str,
    options: ValidationOptions,
    services: Services<'_>,
    config: ValidatorConfig,
) -> Result<WizardDefinition, Vec<WizdefError>> {
    let doc = parse::parse(input).map_err(|e| vec![WizdefError::Parse(e)])?;

    let result = Validator::new(services)
        .with_config(config)
        .validate(&doc, options)
        .map_err(|e| vec![WizdefError::Lookup(e)])?;

    if !result.is_valid() {
        return Err(result
            .errors
            .into_iter()
            .map(WizdefError::Validation)
            .collect());
    }

    Ok(doc)
}
