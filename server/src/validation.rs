//! Field validation for recipe payloads.
//!
//! Create and update requests are checked against the same constraint table,
//! [`RECIPE_FIELDS`]. The only difference between the two is [`Shape`]: a create
//! payload must carry every field, an update payload may carry any subset.
//!
//! Payloads are inspected as raw JSON rather than deserialized into typed
//! requests, so that a wrong type in one field is reported alongside the
//! missing ones instead of aborting the whole request.

use serde_json::Value;

use crate::models::{NewRecipe, RecipePatch};

/// Constraint attached to a single recipe field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Non-empty string of at most `max_len` characters.
    Text { max_len: usize },
    /// Integer strictly greater than zero that fits an `INTEGER` column.
    PositiveInt,
}

#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
}

/// Writable recipe fields in declaration order. Failure reports follow this order.
pub const RECIPE_FIELDS: [FieldSpec; 5] = [
    FieldSpec {
        name: "title",
        kind: FieldKind::Text { max_len: 100 },
    },
    FieldSpec {
        name: "making_time",
        kind: FieldKind::Text { max_len: 100 },
    },
    FieldSpec {
        name: "serves",
        kind: FieldKind::Text { max_len: 100 },
    },
    FieldSpec {
        name: "ingredients",
        kind: FieldKind::Text { max_len: 300 },
    },
    FieldSpec {
        name: "cost",
        kind: FieldKind::PositiveInt,
    },
];

/// Which fields a payload has to carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    /// All fields required.
    Create,
    /// All fields optional; absent and `null` fields are skipped.
    Update,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Issue {
    /// Absent, `null`, or the empty string.
    Missing,
    /// Present but violating its type or range constraint.
    Invalid,
}

/// A rejected payload: every failing field with the kind of failure, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationFailure {
    issues: Vec<(&'static str, Issue)>,
}

impl ValidationFailure {
    fn every_field() -> Self {
        Self {
            issues: RECIPE_FIELDS
                .iter()
                .map(|spec| (spec.name, Issue::Missing))
                .collect(),
        }
    }

    pub fn issues(&self) -> &[(&'static str, Issue)] {
        &self.issues
    }

    /// Comma-joined field names reported to the client.
    ///
    /// Missing fields take precedence. Only when nothing is missing are the
    /// invalid fields listed instead.
    pub fn required(&self) -> String {
        let missing: Vec<&str> = self
            .issues
            .iter()
            .filter(|(_, issue)| *issue == Issue::Missing)
            .map(|(name, _)| *name)
            .collect();

        let names = if missing.is_empty() {
            self.issues.iter().map(|(name, _)| *name).collect()
        } else {
            missing
        };

        names.join(", ")
    }
}

#[derive(Debug)]
enum FieldValue {
    Text(String),
    Int(i32),
}

impl FieldValue {
    fn into_text(self) -> Option<String> {
        match self {
            FieldValue::Text(s) => Some(s),
            FieldValue::Int(_) => None,
        }
    }

    fn into_int(self) -> Option<i32> {
        match self {
            FieldValue::Int(n) => Some(n),
            FieldValue::Text(_) => None,
        }
    }
}

/// Check one field. `Ok(None)` means the field is absent or `null`.
fn check_field(spec: &FieldSpec, value: Option<&Value>) -> Result<Option<FieldValue>, Issue> {
    let value = match value {
        None | Some(Value::Null) => return Ok(None),
        Some(v) => v,
    };

    match spec.kind {
        FieldKind::Text { max_len } => match value {
            Value::String(s) if s.is_empty() => Err(Issue::Missing),
            Value::String(s) if s.chars().count() > max_len => Err(Issue::Invalid),
            Value::String(s) => Ok(Some(FieldValue::Text(s.clone()))),
            _ => Err(Issue::Invalid),
        },
        FieldKind::PositiveInt => {
            let Value::Number(n) = value else {
                return Err(Issue::Invalid);
            };
            let whole = match n.as_i64() {
                Some(i) => Some(i),
                // 450.0 is accepted, 4.5 is not
                None => n
                    .as_f64()
                    .filter(|f| f.fract() == 0.0 && f.abs() < i64::MAX as f64)
                    .map(|f| f as i64),
            };
            match whole.and_then(|i| i32::try_from(i).ok()) {
                Some(cost) if cost > 0 => Ok(Some(FieldValue::Int(cost))),
                _ => Err(Issue::Invalid),
            }
        }
    }
}

fn check(payload: &Value, shape: Shape) -> Result<RecipePatch, ValidationFailure> {
    let Some(object) = payload.as_object() else {
        return Err(ValidationFailure::every_field());
    };

    let mut issues = Vec::new();
    let mut values: [Option<FieldValue>; 5] = Default::default();

    for (slot, spec) in values.iter_mut().zip(RECIPE_FIELDS.iter()) {
        match check_field(spec, object.get(spec.name)) {
            Ok(Some(value)) => *slot = Some(value),
            Ok(None) if shape == Shape::Create => issues.push((spec.name, Issue::Missing)),
            Ok(None) => {}
            Err(issue) => issues.push((spec.name, issue)),
        }
    }

    if !issues.is_empty() {
        return Err(ValidationFailure { issues });
    }

    let [title, making_time, serves, ingredients, cost] = values;
    Ok(RecipePatch {
        title: title.and_then(FieldValue::into_text),
        making_time: making_time.and_then(FieldValue::into_text),
        serves: serves.and_then(FieldValue::into_text),
        ingredients: ingredients.and_then(FieldValue::into_text),
        cost: cost.and_then(FieldValue::into_int),
    })
}

/// Validate a create payload. Every field must be present and valid.
pub fn validate_create(payload: &Value) -> Result<NewRecipe, ValidationFailure> {
    match check(payload, Shape::Create)? {
        RecipePatch {
            title: Some(title),
            making_time: Some(making_time),
            serves: Some(serves),
            ingredients: Some(ingredients),
            cost: Some(cost),
        } => Ok(NewRecipe {
            title,
            making_time,
            serves,
            ingredients,
            cost,
        }),
        _ => Err(ValidationFailure::every_field()),
    }
}

/// Validate an update payload. Only the fields present are checked.
pub fn validate_update(payload: &Value) -> Result<RecipePatch, ValidationFailure> {
    check(payload, Shape::Update)
}
