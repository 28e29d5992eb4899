use crate::common::*;
use proptest::prelude::*;
use wizdef::{
    Action, Field, GroupRef, PermissionRule, Step, TemplateAttributes, ValidationOptions,
    WizardDefinition,
};

fn arb_id() -> impl Strategy<Value = Option<String>> {
    prop_oneof![Just(None), Just(Some(String::new())), "[a-z]{1,6}".prop_map(Some)]
}

fn arb_field_type() -> impl Strategy<Value = Option<String>> {
    prop_oneof![
        Just(None),
        Just(Some("text".to_string())),
        Just(Some("upload".to_string())),
        Just(Some("dropdown".to_string())),
    ]
}

fn arb_action_type() -> impl Strategy<Value = Option<String>> {
    prop_oneof![
        Just(None),
        Just(Some("create_topic".to_string())),
        Just(Some("open_composer".to_string())),
        Just(Some("add_to_group".to_string())),
    ]
}

fn arb_template() -> impl Strategy<Value = Option<String>> {
    prop_oneof![
        Just(None),
        Just(Some("Hi {{ user.name }}".to_string())),
        Just(Some("Hi {{ user.name".to_string())),
        "[a-z ]{0,10}".prop_map(Some),
    ]
}

fn arb_templates() -> impl Strategy<Value = TemplateAttributes> {
    (arb_template(), arb_template()).prop_map(|(description, placeholder)| TemplateAttributes {
        description,
        placeholder,
        ..Default::default()
    })
}

fn arb_field() -> impl Strategy<Value = Field> {
    (arb_id(), arb_field_type(), arb_templates()).prop_map(|(id, field_type, templates)| Field {
        id,
        field_type,
        templates,
        ..Default::default()
    })
}

fn arb_action() -> impl Strategy<Value = Action> {
    (arb_id(), arb_action_type(), arb_templates()).prop_map(|(id, action_type, templates)| {
        Action {
            id,
            action_type,
            templates,
            ..Default::default()
        }
    })
}

fn arb_step() -> impl Strategy<Value = Step> {
    (arb_id(), prop::collection::vec(arb_field(), 0..4), arb_templates()).prop_map(
        |(id, fields, templates)| Step {
            id,
            fields,
            templates,
            ..Default::default()
        },
    )
}

fn arb_doc() -> impl Strategy<Value = WizardDefinition> {
    (
        arb_id(),
        prop::collection::vec(arb_step(), 0..4),
        prop::collection::vec(arb_action(), 0..4),
        any::<bool>(),
        any::<bool>(),
        any::<bool>(),
    )
        .prop_map(|(id, steps, actions, guests, after_signup, after_time)| {
            WizardDefinition {
                id,
                name: Some("W".to_string()),
                steps,
                actions,
                after_signup,
                after_time,
                after_time_scheduled: Some("2099-01-01T00:00:00Z".to_string()),
                permitted: if guests {
                    vec![PermissionRule {
                        output: vec![GroupRef::Id(-1)],
                        ..Default::default()
                    }]
                } else {
                    Vec::new()
                },
                ..Default::default()
            }
        })
}

proptest! {
    #[test]
    fn validation_is_idempotent(doc in arb_doc(), create in any::<bool>()) {
        let mut fixture = Fixture::default();
        fixture.store.after_signup = vec!["other".to_string()];
        let options = ValidationOptions { create };

        let first = fixture.run(&doc, options);
        let second = fixture.run(&doc, options);
        prop_assert_eq!(&first, &second);
        prop_assert_eq!(first.is_valid(), first.errors.is_empty());
    }

    #[test]
    fn document_is_not_mutated(doc in arb_doc()) {
        let before = serde_json::to_value(&doc).unwrap();
        let _ = Fixture::default().run(&doc, ValidationOptions::create());
        prop_assert_eq!(before, serde_json::to_value(&doc).unwrap());
    }
}
