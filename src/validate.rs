//! Wizard definition validation.
//!
//! Returns **all** document errors found, not just the first, with one
//! exception: errors at the wizard level end the pass before steps, fields
//! and actions are walked. Validation never modifies the document.
//!
//! Collaborator failures are not document errors. They abort the pass and
//! surface as [`LookupError`].

use tracing::{debug, trace, warn};

use crate::config::ValidatorConfig;
use crate::enums::*;
use crate::error::*;
use crate::primitives::{parse_timestamp, scalar_string, value_is_blank};
use crate::services::{Entitlement, GroupDirectory, Services, TemplateParser, WizardStore};
use crate::types::*;

/// Setting name used to list wizards shown right after signup.
pub const AFTER_SIGNUP_SETTING: &str = "after_signup";

/// Validate a wizard definition with the default configuration.
pub fn validate(
    doc: &WizardDefinition,
    options: ValidationOptions,
    services: Services<'_>,
) -> Result<ValidationResult, LookupError> {
    Validator::new(services).validate(doc, options)
}

/// A reusable validator bound to a set of collaborators and a configuration.
pub struct Validator<'a> {
    services: Services<'a>,
    config: ValidatorConfig,
}

impl<'a> Validator<'a> {
    pub fn new(services: Services<'a>) -> Self {
        Self {
            services,
            config: ValidatorConfig::default(),
        }
    }

    pub fn with_config(mut self, config: ValidatorConfig) -> Self {
        self.config = config;
        self
    }

    /// Run one validation pass.
    pub fn validate(
        &self,
        doc: &WizardDefinition,
        options: ValidationOptions,
    ) -> Result<ValidationResult, LookupError> {
        let wizard_id = doc.id.as_deref().unwrap_or_default();
        debug!(wizard_id, create = options.create, "validating wizard definition");

        let mut sink = ErrorSink::new();
        let entitlement = self.fetch_entitlement()?;
        let wizard = ObjectRef::Wizard(doc);

        check_identifier_conflict(doc, options, self.services.store, &mut sink)?;
        check_required(wizard, &mut sink);
        check_after_signup(doc, self.services.store, &mut sink)?;
        check_after_time(doc, options, &self.services, &mut sink)?;
        check_subscription(wizard, &self.config, entitlement.as_ref(), &mut sink);

        if !sink.is_empty() {
            debug!(
                wizard_id,
                errors = sink.len(),
                "wizard-level errors, skipping steps and actions"
            );
            return Ok(sink.into_result());
        }

        let templates = self.services.templates;
        let guests_permitted = doc.guests_permitted(self.config.guest_group_id);

        check_templates(wizard, templates, &mut sink);

        for step in &doc.steps {
            trace!(step_id = step.id.as_deref(), "validating step");
            let object = ObjectRef::Step(step);
            check_required(object, &mut sink);
            check_subscription(object, &self.config, entitlement.as_ref(), &mut sink);
            check_templates(object, templates, &mut sink);

            for field in &step.fields {
                trace!(field_id = field.id.as_deref(), "validating field");
                let field = ObjectRef::Field(field);
                check_subscription(field, &self.config, entitlement.as_ref(), &mut sink);
                check_required(field, &mut sink);
                check_templates(field, templates, &mut sink);
                check_guests(field, &self.config, guests_permitted, &mut sink);
            }
        }

        for action in &doc.actions {
            trace!(action_id = action.id.as_deref(), "validating action");
            let action = ObjectRef::Action(action);
            check_subscription(action, &self.config, entitlement.as_ref(), &mut sink);
            check_required(action, &mut sink);
            check_templates(action, templates, &mut sink);
            check_guests(action, &self.config, guests_permitted, &mut sink);
        }

        debug!(wizard_id, errors = sink.len(), "validation finished");
        Ok(sink.into_result())
    }

    /// The entitlement is only consulted when there is a rule to apply.
    fn fetch_entitlement(&self) -> Result<Option<Entitlement>, LookupError> {
        if self.config.subscription_rules.is_empty() {
            return Ok(None);
        }
        self.services
            .entitlement
            .entitlement()
            .inspect_err(|e| warn!(error = %e, "entitlement lookup failed"))
            .map(Some)
    }
}

// ─── Identifier conflict ────────────────────────────────────────────────────

fn check_identifier_conflict(
    doc: &WizardDefinition,
    options: ValidationOptions,
    store: &dyn WizardStore,
    sink: &mut ErrorSink,
) -> Result<(), LookupError> {
    if !options.create {
        return Ok(());
    }
    // A blank id is reported by the required-attribute check.
    let Some(id) = doc.id.as_deref().filter(|id| !id.trim().is_empty()) else {
        return Ok(());
    };

    let exists = store
        .exists(id)
        .inspect_err(|e| warn!(wizard_id = id, error = %e, "wizard existence lookup failed"))?;
    if exists {
        sink.push(ValidationError::new(MessageKey::IdentifierConflict).with("wizard_id", id));
    }
    Ok(())
}

// ─── Required attributes ────────────────────────────────────────────────────

fn check_required(object: ObjectRef<'_>, sink: &mut ErrorSink) {
    let kind = object.kind();
    for attribute in kind.required_attributes() {
        if object.is_blank(*attribute) {
            let mut error = ValidationError::new(MessageKey::RequiredPropertyMissing)
                .with("property", attribute.as_str())
                .with("object", kind.as_str());
            if let Some(id) = object.id().filter(|id| !id.trim().is_empty()) {
                error = error.with("object_id", id);
            }
            sink.push(error);
        }
    }
}

// ─── Scheduling ─────────────────────────────────────────────────────────────

/// Only one wizard may be shown after signup at a time.
fn check_after_signup(
    doc: &WizardDefinition,
    store: &dyn WizardStore,
    sink: &mut ErrorSink,
) -> Result<(), LookupError> {
    if !doc.after_signup {
        return Ok(());
    }

    let others = store
        .list_by_setting(AFTER_SIGNUP_SETTING)
        .inspect_err(|e| warn!(error = %e, "after-signup wizard listing failed"))?;

    if let Some(other) = others
        .iter()
        .find(|w| Some(w.id.as_str()) != doc.id.as_deref())
    {
        sink.push(
            ValidationError::new(MessageKey::AfterSignupConflict).with("wizard_id", &other.id),
        );
    }
    Ok(())
}

fn check_after_time(
    doc: &WizardDefinition,
    options: ValidationOptions,
    services: &Services<'_>,
    sink: &mut ErrorSink,
) -> Result<(), LookupError> {
    if !doc.after_time {
        return Ok(());
    }
    if doc.after_signup {
        sink.push(ValidationError::new(MessageKey::AfterSignupAfterTimeContradiction));
        return Ok(());
    }

    let current_time = if options.create {
        None
    } else {
        persisted_schedule(doc, services.store)?
    };
    let new_time = doc
        .after_time_scheduled
        .as_deref()
        .filter(|s| !s.trim().is_empty());
    let resolved = new_time.or(current_time.as_deref());

    let now = services.clock.now();
    match resolved.and_then(parse_timestamp) {
        Some(active) if active >= now => {}
        _ => {
            trace!(resolved, "activation time missing, unparseable or past");
            sink.push(ValidationError::new(MessageKey::InvalidActivationTime));
        }
    }

    check_groups_exist(&doc.after_time_groups, services.groups, sink)
}

fn persisted_schedule(
    doc: &WizardDefinition,
    store: &dyn WizardStore,
) -> Result<Option<String>, LookupError> {
    let Some(id) = doc.id.as_deref().filter(|id| !id.trim().is_empty()) else {
        return Ok(None);
    };
    let current = store
        .current(id)
        .inspect_err(|e| warn!(wizard_id = id, error = %e, "stored wizard lookup failed"))?;
    Ok(current.and_then(|w| w.after_time_scheduled))
}

fn check_groups_exist(
    group_names: &[String],
    groups: &dyn GroupDirectory,
    sink: &mut ErrorSink,
) -> Result<(), LookupError> {
    for name in group_names {
        let exists = groups
            .group_exists(name)
            .inspect_err(|e| warn!(group_name = %name, error = %e, "group lookup failed"))?;
        if !exists {
            sink.push(ValidationError::new(MessageKey::MissingGroup).with("group_name", name));
        }
    }
    Ok(())
}

// ─── Subscription gating ────────────────────────────────────────────────────

/// Applies configured tier rules. With no rules configured there is no
/// entitlement and nothing is gated.
fn check_subscription(
    object: ObjectRef<'_>,
    config: &ValidatorConfig,
    entitlement: Option<&Entitlement>,
    sink: &mut ErrorSink,
) {
    let Some(entitlement) = entitlement else {
        return;
    };

    for rule in config.rules_for(object.kind()) {
        let Some(value) = object.attribute(&rule.attribute) else {
            continue;
        };
        if value_is_blank(&value) {
            continue;
        }
        if let Some(expected) = &rule.value
            && scalar_string(&value).as_deref() != Some(expected.as_str())
        {
            continue;
        }
        if rule.allows(entitlement) {
            continue;
        }

        sink.push(
            ValidationError::new(MessageKey::SubscriptionRequired)
                .with("feature", rule.feature())
                .with("object_id", object.id().unwrap_or_default())
                .with("tier", rule.tier_list()),
        );
    }
}

// ─── Template syntax ────────────────────────────────────────────────────────

fn check_templates(object: ObjectRef<'_>, parser: &dyn TemplateParser, sink: &mut ErrorSink) {
    let id = object.id().unwrap_or_default();
    for (name, text) in object.templates().present() {
        if let Err(message) = parser.parse(text) {
            sink.push(
                ValidationError::new(MessageKey::LiquidSyntaxError)
                    .with("attribute", format!("{}.{}", id, name))
                    .with("message", message),
            );
        }
    }
}

// ─── Guest access ───────────────────────────────────────────────────────────

fn check_guests(
    object: ObjectRef<'_>,
    config: &ValidatorConfig,
    guests_permitted: bool,
    sink: &mut ErrorSink,
) {
    if !guests_permitted {
        return;
    }
    let Some(object_type) = object.object_type() else {
        return;
    };
    if config.requires_user(object.kind(), object_type) {
        sink.push(
            ValidationError::new(MessageKey::NotPermittedForGuests)
                .with("object_id", object.id().unwrap_or_default())
                .with("type", object_type),
        );
    }
}
