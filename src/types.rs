use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::HashMap;

use crate::enums::*;
use crate::primitives::{coerce_flag, is_blank};

// ─── Wizard ─────────────────────────────────────────────────────────────────

/// The top-level wizard definition document.
///
/// Required attributes are modelled as optional (or defaulted) so that a
/// document missing them still decodes and the validator can report every
/// gap instead of failing on the first.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct WizardDefinition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "deserialize_list")]
    pub steps: Vec<Step>,
    #[serde(
        default,
        deserialize_with = "deserialize_list",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub actions: Vec<Action>,
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub after_signup: bool,
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub after_time: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub after_time_scheduled: Option<String>,
    #[serde(
        default,
        deserialize_with = "deserialize_list",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub after_time_groups: Vec<String>,
    #[serde(
        default,
        deserialize_with = "deserialize_list",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub permitted: Vec<PermissionRule>,
    #[serde(flatten)]
    pub templates: TemplateAttributes,
    /// Attributes not modelled above, kept for subscription gating.
    #[serde(flatten)]
    pub extensions: HashMap<String, Value>,
}

impl WizardDefinition {
    /// Whether any permission rule grants access to the guest group.
    pub fn guests_permitted(&self, guest_group_id: i64) -> bool {
        self.permitted
            .iter()
            .any(|rule| rule.output.iter().any(|g| g.is_group(guest_group_id)))
    }
}

// ─── Permissions ────────────────────────────────────────────────────────────

/// One entry of the wizard's `permitted` list.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct PermissionRule {
    #[serde(default, deserialize_with = "deserialize_one_or_many")]
    pub output: Vec<GroupRef>,
    #[serde(flatten)]
    pub extensions: HashMap<String, Value>,
}

/// A group referenced by numeric id or by name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GroupRef {
    Id(i64),
    Name(String),
}

impl GroupRef {
    /// Matches a numeric group id, including its decimal string form.
    pub fn is_group(&self, id: i64) -> bool {
        match self {
            GroupRef::Id(g) => *g == id,
            GroupRef::Name(s) => s.trim().parse::<i64>() == Ok(id),
        }
    }
}

// ─── Step / Field / Action ──────────────────────────────────────────────────

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Step {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(
        default,
        deserialize_with = "deserialize_list",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub fields: Vec<Field>,
    #[serde(flatten)]
    pub templates: TemplateAttributes,
    #[serde(flatten)]
    pub extensions: HashMap<String, Value>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Field {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub field_type: Option<String>,
    #[serde(flatten)]
    pub templates: TemplateAttributes,
    #[serde(flatten)]
    pub extensions: HashMap<String, Value>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Action {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub action_type: Option<String>,
    #[serde(flatten)]
    pub templates: TemplateAttributes,
    #[serde(flatten)]
    pub extensions: HashMap<String, Value>,
}

// ─── Template-bearing attributes ────────────────────────────────────────────

/// Text attributes that may contain Liquid markup.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateAttributes {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preview_template: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post_template: Option<String>,
}

impl TemplateAttributes {
    pub const NAMES: [&'static str; 5] = [
        "description",
        "raw_description",
        "placeholder",
        "preview_template",
        "post_template",
    ];

    pub fn get(&self, name: &str) -> Option<&str> {
        match name {
            "description" => self.description.as_deref(),
            "raw_description" => self.raw_description.as_deref(),
            "placeholder" => self.placeholder.as_deref(),
            "preview_template" => self.preview_template.as_deref(),
            "post_template" => self.post_template.as_deref(),
            _ => None,
        }
    }

    /// Present, non-empty template attributes in declaration order.
    pub fn present(&self) -> impl Iterator<Item = (&'static str, &str)> + '_ {
        Self::NAMES
            .into_iter()
            .filter_map(|name| self.get(name).map(|text| (name, text)))
            .filter(|(_, text)| !text.is_empty())
    }
}

// ─── Options ────────────────────────────────────────────────────────────────

/// Per-call validation options.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationOptions {
    /// The wizard is not yet persisted; enables identifier conflict checks
    /// and suppresses the persisted-wizard lookup.
    #[serde(default)]
    pub create: bool,
}

impl ValidationOptions {
    pub fn create() -> Self {
        Self { create: true }
    }

    pub fn update() -> Self {
        Self { create: false }
    }
}

// ─── ObjectRef ──────────────────────────────────────────────────────────────

/// A borrowed view of any object in the definition tree, tagged by kind.
#[derive(Clone, Copy, Debug)]
pub enum ObjectRef<'a> {
    Wizard(&'a WizardDefinition),
    Step(&'a Step),
    Field(&'a Field),
    Action(&'a Action),
}

impl<'a> ObjectRef<'a> {
    pub fn kind(&self) -> ObjectKind {
        match self {
            ObjectRef::Wizard(_) => ObjectKind::Wizard,
            ObjectRef::Step(_) => ObjectKind::Step,
            ObjectRef::Field(_) => ObjectKind::Field,
            ObjectRef::Action(_) => ObjectKind::Action,
        }
    }

    pub fn id(&self) -> Option<&'a str> {
        match self {
            ObjectRef::Wizard(w) => w.id.as_deref(),
            ObjectRef::Step(s) => s.id.as_deref(),
            ObjectRef::Field(f) => f.id.as_deref(),
            ObjectRef::Action(a) => a.id.as_deref(),
        }
    }

    /// The `type` of a field or action. Wizards and steps have none.
    pub fn object_type(&self) -> Option<&'a str> {
        match self {
            ObjectRef::Field(f) => f.field_type.as_deref(),
            ObjectRef::Action(a) => a.action_type.as_deref(),
            ObjectRef::Wizard(_) | ObjectRef::Step(_) => None,
        }
    }

    pub fn templates(&self) -> &'a TemplateAttributes {
        match self {
            ObjectRef::Wizard(w) => &w.templates,
            ObjectRef::Step(s) => &s.templates,
            ObjectRef::Field(f) => &f.templates,
            ObjectRef::Action(a) => &a.templates,
        }
    }

    /// Whether a required attribute is absent or blank on this object.
    /// Attributes the kind does not carry count as absent.
    pub fn is_blank(&self, attribute: Attribute) -> bool {
        match (self, attribute) {
            (_, Attribute::Id) => is_blank(self.id()),
            (ObjectRef::Wizard(w), Attribute::Name) => is_blank(w.name.as_deref()),
            (ObjectRef::Wizard(w), Attribute::Steps) => w.steps.is_empty(),
            (ObjectRef::Field(_) | ObjectRef::Action(_), Attribute::Type) => {
                is_blank(self.object_type())
            }
            _ => true,
        }
    }

    pub fn extensions(&self) -> &'a HashMap<String, Value> {
        match self {
            ObjectRef::Wizard(w) => &w.extensions,
            ObjectRef::Step(s) => &s.extensions,
            ObjectRef::Field(f) => &f.extensions,
            ObjectRef::Action(a) => &a.extensions,
        }
    }

    /// Look up any attribute by its document name: modelled attributes
    /// first, then templates, then extensions.
    pub fn attribute(&self, name: &str) -> Option<Value> {
        let modelled = match (self, name) {
            (_, "id") => self.id().map(Value::from),
            (ObjectRef::Field(_) | ObjectRef::Action(_), "type") => {
                self.object_type().map(Value::from)
            }
            (ObjectRef::Wizard(w), "name") => w.name.as_deref().map(Value::from),
            (ObjectRef::Wizard(w), "after_signup") => Some(Value::Bool(w.after_signup)),
            (ObjectRef::Wizard(w), "after_time") => Some(Value::Bool(w.after_time)),
            (ObjectRef::Wizard(w), "after_time_scheduled") => {
                w.after_time_scheduled.as_deref().map(Value::from)
            }
            (ObjectRef::Wizard(w), "after_time_groups") => {
                Some(Value::from(w.after_time_groups.clone()))
            }
            (ObjectRef::Wizard(w), "steps") => serde_json::to_value(&w.steps).ok(),
            (ObjectRef::Wizard(w), "actions") => serde_json::to_value(&w.actions).ok(),
            (ObjectRef::Wizard(w), "permitted") => serde_json::to_value(&w.permitted).ok(),
            (ObjectRef::Step(s), "fields") => serde_json::to_value(&s.fields).ok(),
            _ => None,
        };
        modelled
            .or_else(|| self.templates().get(name).map(Value::from))
            .or_else(|| self.extensions().get(name).cloned())
    }
}

// ─── Deserialization helpers ────────────────────────────────────────────────

fn deserialize_flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    let value = Value::deserialize(deserializer)?;
    coerce_flag(&value).ok_or_else(|| {
        serde::de::Error::custom(format!("expected a boolean flag, got {}", value))
    })
}

/// An explicit `null` (or an empty YAML value) reads as an empty list.
fn deserialize_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<Vec<T>>::deserialize(deserializer).map(Option::unwrap_or_default)
}

fn deserialize_one_or_many<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Vec<GroupRef>, D::Error> {
    let value = Value::deserialize(deserializer)?;
    match value {
        Value::Null => Ok(Vec::new()),
        Value::Array(items) => items
            .into_iter()
            .map(|item| serde_json::from_value(item).map_err(serde::de::Error::custom))
            .collect(),
        scalar => serde_json::from_value(scalar)
            .map(|g| vec![g])
            .map_err(serde::de::Error::custom),
    }
}
