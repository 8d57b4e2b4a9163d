//! Decoding of loosely shaped equivalence configuration.
//!
//! Annotation studies often keep their comparison settings as free-form
//! JSON: `null` for exact comparison, `false` to ignore a category, a list
//! of lists for groups, and an object keyed by attribute name for
//! per-attribute groups. These are decoded once, up front, into the typed
//! policies; nothing downstream sees the loose form.

use serde_json::Value;
use std::collections::BTreeMap;

use super::equivalence::{AttributeEquivalence, ClassEquivalence, EquivalenceGroups, KeyEquivalence};
use super::options::{NoOverlapPolicy, ReconcileOptions};
use crate::error::ReconcileError;

impl ReconcileOptions {
    /// Decode options from the loose configuration shapes.
    pub fn from_loose_json(
        classes: &Value,
        attributes: &Value,
        no_overlap: &Value,
    ) -> Result<Self, ReconcileError> {
        Ok(Self {
            classes: decode_classes(classes)?,
            attributes: decode_attributes(attributes)?,
            no_overlap: decode_no_overlap(no_overlap)?,
        })
    }
}

/// `null` → exact, `false` → ignore, list of lists → groups.
pub fn decode_classes(value: &Value) -> Result<ClassEquivalence, ReconcileError> {
    match value {
        Value::Null => Ok(ClassEquivalence::Exact),
        Value::Bool(false) => Ok(ClassEquivalence::IgnoreAll),
        Value::Array(_) => Ok(ClassEquivalence::GroupedBy(decode_groups(value, "classes")?)),
        other => Err(ReconcileError::invalid_spec(format!(
            "classes must be null, false, or a list of lists, got {}",
            type_name(other)
        ))),
    }
}

/// `null` → exact, `false` → ignore, object of key → (list of lists | `false`).
pub fn decode_attributes(value: &Value) -> Result<AttributeEquivalence, ReconcileError> {
    match value {
        Value::Null => Ok(AttributeEquivalence::Exact),
        Value::Bool(false) => Ok(AttributeEquivalence::IgnoreAll),
        Value::Object(map) => {
            let mut rules = BTreeMap::new();
            for (key, rule) in map {
                let rule = match rule {
                    Value::Bool(false) => KeyEquivalence::Ignore,
                    _ => KeyEquivalence::Groups(decode_groups(rule, key)?),
                };
                rules.insert(key.clone(), rule);
            }
            Ok(AttributeEquivalence::GroupedBy(rules))
        }
        other => Err(ReconcileError::invalid_spec(format!(
            "attributes must be null, false, or an object, got {}",
            type_name(other)
        ))),
    }
}

/// `null` → mismatch, `false` → always match, list of class names → allow-list.
pub fn decode_no_overlap(value: &Value) -> Result<NoOverlapPolicy, ReconcileError> {
    match value {
        Value::Null => Ok(NoOverlapPolicy::Mismatch),
        Value::Bool(false) => Ok(NoOverlapPolicy::AlwaysMatch),
        Value::Array(items) => {
            let classes = items
                .iter()
                .map(|item| {
                    item.as_str().map(str::to_string).ok_or_else(|| {
                        ReconcileError::invalid_spec(format!(
                            "no-overlap classes must be strings, got {}",
                            type_name(item)
                        ))
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;
            Ok(NoOverlapPolicy::match_classes(classes))
        }
        other => Err(ReconcileError::invalid_spec(format!(
            "no-overlap policy must be null, false, or a list of class names, got {}",
            type_name(other)
        ))),
    }
}

fn decode_groups(value: &Value, context: &str) -> Result<EquivalenceGroups, ReconcileError> {
    let Value::Array(groups) = value else {
        return Err(ReconcileError::invalid_spec(format!(
            "{}: expected a list of groups, got {}",
            context,
            type_name(value)
        )));
    };

    let mut decoded = Vec::with_capacity(groups.len());
    for group in groups {
        let Value::Array(members) = group else {
            return Err(ReconcileError::invalid_spec(format!(
                "{}: every group must be a list, got {}",
                context,
                type_name(group)
            )));
        };
        let members = members
            .iter()
            .map(|m| {
                m.as_str().map(str::to_string).ok_or_else(|| {
                    ReconcileError::invalid_spec(format!(
                        "{}: group members must be strings, got {}",
                        context,
                        type_name(m)
                    ))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        decoded.push(members);
    }

    EquivalenceGroups::new(decoded).map_err(|e| match e {
        ReconcileError::InvalidEquivalenceSpec(message) => {
            ReconcileError::invalid_spec(format!("{}: {}", context, message))
        }
        other => other,
    })
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "object",
    }
}
