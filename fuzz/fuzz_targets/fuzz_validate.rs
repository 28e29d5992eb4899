#![no_main]

use libfuzzer_sys::fuzz_target;
use wizdef::services::*;
use wizdef::{LookupError, ValidationOptions};

/// Answers every lookup from a fixed, empty world.
struct Nothing;

impl WizardStore for Nothing {
    fn exists(&self, _id: &str) -> Result<bool, LookupError> {
        Ok(false)
    }

    fn list_by_setting(&self, _setting: &str) -> Result<Vec<WizardSummary>, LookupError> {
        Ok(Vec::new())
    }

    fn current(&self, _id: &str) -> Result<Option<StoredWizard>, LookupError> {
        Ok(None)
    }
}

impl GroupDirectory for Nothing {
    fn group_exists(&self, _name: &str) -> Result<bool, LookupError> {
        Ok(false)
    }
}

fuzz_target!(|data: &[u8]| {
    let s = String::from_utf8_lossy(data);

    let doc = match wizdef::parse(&s) {
        Ok(d) => d,
        Err(_) => return,
    };

    let parser = match default_template_parser() {
        Ok(p) => p,
        Err(_) => return,
    };
    let entitlement = Entitlement::default();
    let services = Services {
        store: &Nothing,
        groups: &Nothing,
        clock: &SystemClock,
        templates: &parser,
        entitlement: &entitlement,
    };

    // Every lookup succeeds, so validation must always produce a result.
    let first = match wizdef::validate(&doc, ValidationOptions::update(), services) {
        Ok(r) => r,
        Err(e) => panic!("infallible collaborators reported a failure: {}", e),
    };
    if first.is_valid() != first.errors.is_empty() {
        panic!("acceptance disagrees with the error list: {:?}", first.errors);
    }
});
