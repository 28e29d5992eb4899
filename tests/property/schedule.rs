use crate::common::*;
use chrono::Duration;
use proptest::prelude::*;
use wizdef::{MessageKey, Step, ValidationOptions, WizardDefinition};

fn scheduled_doc(
    after_signup: bool,
    after_time: bool,
    offset_minutes: Option<i64>,
) -> WizardDefinition {
    WizardDefinition {
        id: Some("w1".to_string()),
        name: Some("W".to_string()),
        steps: vec![Step {
            id: Some("s1".to_string()),
            ..Default::default()
        }],
        after_signup,
        after_time,
        after_time_scheduled: offset_minutes
            .map(|m| (now() + Duration::minutes(m)).to_rfc3339()),
        ..Default::default()
    }
}

proptest! {
    #[test]
    fn schedule_modes_are_exclusive(
        after_signup in any::<bool>(),
        after_time in any::<bool>(),
        offset in prop::option::of(-100_000i64..100_000),
    ) {
        let doc = scheduled_doc(after_signup, after_time, offset);
        let result = Fixture::default().run(&doc, ValidationOptions::create());

        let contradiction = count(&result, MessageKey::AfterSignupAfterTimeContradiction);
        let invalid_time = count(&result, MessageKey::InvalidActivationTime);

        prop_assert_eq!(contradiction, (after_signup && after_time) as usize);
        if contradiction > 0 {
            prop_assert_eq!(invalid_time, 0);
        }

        let expect_invalid = after_time && !after_signup && offset.is_none_or(|m| m < 0);
        prop_assert_eq!(invalid_time, expect_invalid as usize);
        prop_assert_eq!(result.is_valid(), contradiction == 0 && !expect_invalid);
    }
}
