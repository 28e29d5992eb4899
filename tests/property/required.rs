use crate::common::*;
use proptest::prelude::*;
use wizdef::{Field, MessageKey, Step, ValidationOptions, WizardDefinition};

/// Strategy for attribute values, blank or not.
fn arb_attr() -> impl Strategy<Value = Option<String>> {
    prop_oneof![
        Just(None),
        Just(Some(String::new())),
        "[ \t]{1,3}".prop_map(Some),
        "[a-z][a-z0-9_]{0,8}".prop_map(Some),
    ]
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().is_none_or(|s| s.trim().is_empty())
}

proptest! {
    #[test]
    fn one_error_per_blank_field_attribute(
        fields in prop::collection::vec((arb_attr(), arb_attr()), 0..6)
    ) {
        let doc = WizardDefinition {
            id: Some("w1".to_string()),
            name: Some("W".to_string()),
            steps: vec![Step {
                id: Some("s1".to_string()),
                fields: fields
                    .iter()
                    .map(|(id, field_type)| Field {
                        id: id.clone(),
                        field_type: field_type.clone(),
                        ..Default::default()
                    })
                    .collect(),
                ..Default::default()
            }],
            ..Default::default()
        };

        let expected: usize = fields
            .iter()
            .map(|(id, t)| is_blank(id) as usize + is_blank(t) as usize)
            .sum();

        let result = Fixture::default().run(&doc, ValidationOptions::create());
        prop_assert_eq!(count(&result, MessageKey::RequiredPropertyMissing), expected);
        prop_assert_eq!(result.is_valid(), expected == 0);
    }

    #[test]
    fn blank_wizard_name_always_rejected(name in arb_attr()) {
        prop_assume!(is_blank(&name));
        let doc = WizardDefinition {
            id: Some("w1".to_string()),
            name,
            steps: vec![Step {
                id: Some("s1".to_string()),
                ..Default::default()
            }],
            ..Default::default()
        };
        let result = Fixture::default().run(&doc, ValidationOptions::create());
        prop_assert!(!result.is_valid());
        prop_assert_eq!(
            params(&result, MessageKey::RequiredPropertyMissing, "property"),
            vec!["name".to_string()]
        );
    }
}
