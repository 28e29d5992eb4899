#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use std::cell::Cell;
use std::collections::HashMap;
use wizdef::services::*;
use wizdef::{
    LookupError, MessageKey, ValidationOptions, ValidationResult, Validator, ValidatorConfig,
    WizardDefinition,
};

/// The instant every fixture clock is frozen at.
pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, 0).unwrap()
}

#[derive(Default)]
pub struct FakeStore {
    pub existing: Vec<String>,
    pub after_signup: Vec<String>,
    pub scheduled: HashMap<String, String>,
    pub fail: bool,
    pub current_calls: Cell<usize>,
}

impl WizardStore for FakeStore {
    fn exists(&self, id: &str) -> Result<bool, LookupError> {
        if self.fail {
            return Err(LookupError::new("wizards", "store offline"));
        }
        Ok(self.existing.iter().any(|e| e == id))
    }

    fn list_by_setting(&self, setting: &str) -> Result<Vec<WizardSummary>, LookupError> {
        if self.fail {
            return Err(LookupError::new("wizards", "store offline"));
        }
        assert_eq!(setting, "after_signup");
        Ok(self
            .after_signup
            .iter()
            .map(|id| WizardSummary {
                id: id.clone(),
                after_signup: true,
                after_time: false,
            })
            .collect())
    }

    fn current(&self, id: &str) -> Result<Option<StoredWizard>, LookupError> {
        self.current_calls.set(self.current_calls.get() + 1);
        if self.fail {
            return Err(LookupError::new("wizards", "store offline"));
        }
        Ok(self.scheduled.get(id).map(|time| StoredWizard {
            id: id.to_string(),
            after_time_scheduled: Some(time.clone()),
        }))
    }
}

#[derive(Default)]
pub struct FakeGroups {
    pub names: Vec<String>,
    pub fail: bool,
}

impl GroupDirectory for FakeGroups {
    fn group_exists(&self, name: &str) -> Result<bool, LookupError> {
        if self.fail {
            return Err(LookupError::new("groups", "directory unreachable"));
        }
        Ok(self.names.iter().any(|n| n == name))
    }
}

/// Rejects any template with an unterminated `{{`.
pub struct FakeParser;

impl TemplateParser for FakeParser {
    fn parse(&self, template: &str) -> Result<(), String> {
        if template.matches("{{").count() != template.matches("}}").count() {
            return Err("Variable '{{' was not properly terminated".to_string());
        }
        Ok(())
    }
}

/// Entitlement source that counts calls and can fail.
pub struct FakeEntitlement {
    pub entitlement: Entitlement,
    pub fail: bool,
    pub calls: Cell<usize>,
}

impl Default for FakeEntitlement {
    fn default() -> Self {
        Self {
            entitlement: Entitlement::default(),
            fail: false,
            calls: Cell::new(0),
        }
    }
}

impl EntitlementSource for FakeEntitlement {
    fn entitlement(&self) -> Result<Entitlement, LookupError> {
        self.calls.set(self.calls.get() + 1);
        if self.fail {
            return Err(LookupError::new("subscription", "timed out"));
        }
        Ok(self.entitlement.clone())
    }
}

/// All collaborators for one test, with in-memory state.
pub struct Fixture {
    pub store: FakeStore,
    pub groups: FakeGroups,
    pub clock: FixedClock,
    pub entitlement: FakeEntitlement,
    pub config: ValidatorConfig,
}

impl Default for Fixture {
    fn default() -> Self {
        Self {
            store: FakeStore::default(),
            groups: FakeGroups::default(),
            clock: FixedClock(now()),
            entitlement: FakeEntitlement::default(),
            config: ValidatorConfig::default(),
        }
    }
}

impl Fixture {
    pub fn try_run(
        &self,
        doc: &WizardDefinition,
        options: ValidationOptions,
    ) -> Result<ValidationResult, LookupError> {
        self.try_run_with(doc, options, &FakeParser)
    }

    pub fn try_run_with(
        &self,
        doc: &WizardDefinition,
        options: ValidationOptions,
        templates: &dyn TemplateParser,
    ) -> Result<ValidationResult, LookupError> {
        let services = Services {
            store: &self.store,
            groups: &self.groups,
            clock: &self.clock,
            templates,
            entitlement: &self.entitlement,
        };
        Validator::new(services)
            .with_config(self.config.clone())
            .validate(doc, options)
    }

    pub fn run(&self, doc: &WizardDefinition, options: ValidationOptions) -> ValidationResult {
        self.try_run(doc, options).expect("lookups should succeed")
    }
}

/// Decode a document from YAML, panicking on malformed fixtures.
pub fn doc(yaml: &str) -> WizardDefinition {
    wizdef::parse(yaml).expect("fixture should parse")
}

/// Value of `param` on every error with `key`.
pub fn params(result: &ValidationResult, key: MessageKey, param: &str) -> Vec<String> {
    result
        .with_key(key)
        .map(|e| e.param(param).unwrap_or_default().to_string())
        .collect()
}

pub fn count(result: &ValidationResult, key: MessageKey) -> usize {
    result.with_key(key).count()
}
