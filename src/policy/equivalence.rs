//! Class and attribute equivalence.
//!
//! Once groups are configured they are the whole definition: two values are
//! equivalent only when one group contains both, so a value outside every
//! group is not even equivalent to itself. Groups must be mutually
//! exclusive, which is checked when they are built.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::error::ReconcileError;
use crate::types::Annotation;

/// Mutually exclusive groups of interchangeable values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<String>>", into = "Vec<Vec<String>>")]
pub struct EquivalenceGroups {
    groups: Vec<BTreeSet<String>>,
    /// Value to index into `groups`.
    index: BTreeMap<String, usize>,
}

impl EquivalenceGroups {
    /// Build groups, rejecting any value that appears in more than one group.
    pub fn new<G, V>(groups: G) -> Result<Self, ReconcileError>
    where
        G: IntoIterator,
        G::Item: IntoIterator<Item = V>,
        V: Into<String>,
    {
        let mut built = Vec::new();
        let mut index = BTreeMap::new();

        for (position, group) in groups.into_iter().enumerate() {
            let members: BTreeSet<String> = group.into_iter().map(Into::into).collect();
            for value in &members {
                if let Some(previous) = index.insert(value.clone(), position) {
                    return Err(ReconcileError::invalid_spec(format!(
                        "value {:?} appears in groups {} and {}",
                        value, previous, position
                    )));
                }
            }
            built.push(members);
        }

        Ok(Self { groups: built, index })
    }

    /// Whether both values belong to the same group.
    pub fn equivalent(&self, first: &str, second: &str) -> bool {
        match (self.index.get(first), self.index.get(second)) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }

    /// The group containing a value, if any.
    pub fn group_of(&self, value: &str) -> Option<&BTreeSet<String>> {
        self.index.get(value).map(|&i| &self.groups[i])
    }

    /// Number of groups.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Whether there are no groups.
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

impl TryFrom<Vec<Vec<String>>> for EquivalenceGroups {
    type Error = ReconcileError;

    fn try_from(groups: Vec<Vec<String>>) -> Result<Self, Self::Error> {
        Self::new(groups)
    }
}

impl From<EquivalenceGroups> for Vec<Vec<String>> {
    fn from(groups: EquivalenceGroups) -> Self {
        groups
            .groups
            .into_iter()
            .map(|g| g.into_iter().collect())
            .collect()
    }
}

/// How annotation classes are compared.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "mode", content = "groups", rename_all = "snake_case")]
pub enum ClassEquivalence {
    /// Classes must be identical.
    #[default]
    Exact,
    /// Classes are never compared.
    IgnoreAll,
    /// Classes are equivalent only when they share a group.
    GroupedBy(EquivalenceGroups),
}

/// How the values of a single attribute key are compared.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", content = "groups", rename_all = "snake_case")]
pub enum KeyEquivalence {
    /// Any two values of this key are equivalent. The key must still be
    /// present on both sides.
    Ignore,
    /// Values are equivalent only when they share a group.
    Groups(EquivalenceGroups),
}

/// How annotation attribute maps are compared.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "mode", content = "keys", rename_all = "snake_case")]
pub enum AttributeEquivalence {
    /// Same key set and identical values.
    #[default]
    Exact,
    /// Attributes are never compared, not even their keys.
    IgnoreAll,
    /// Same key set; values compared per key. Keys without a rule are
    /// compared exactly.
    GroupedBy(BTreeMap<String, KeyEquivalence>),
}

/// Whether two annotations' classes are equivalent under `policy`.
pub fn classes_equivalent(first: &Annotation, second: &Annotation, policy: &ClassEquivalence) -> bool {
    match policy {
        ClassEquivalence::Exact => first.class == second.class,
        ClassEquivalence::IgnoreAll => true,
        ClassEquivalence::GroupedBy(groups) => groups.equivalent(&first.class, &second.class),
    }
}

/// Whether two annotations' attribute maps are equivalent under `policy`.
///
/// Unless attributes are ignored outright, both maps must have exactly the
/// same keys; a key missing on either side is a mismatch.
pub fn attributes_equivalent(
    first: &Annotation,
    second: &Annotation,
    policy: &AttributeEquivalence,
) -> bool {
    let rules = match policy {
        AttributeEquivalence::IgnoreAll => return true,
        AttributeEquivalence::Exact => None,
        AttributeEquivalence::GroupedBy(rules) => Some(rules),
    };

    if first.attributes.len() != second.attributes.len() {
        return false;
    }

    first.attributes.iter().all(|(key, value)| {
        let Some(other) = second.attributes.get(key) else {
            return false;
        };
        match rules.and_then(|r| r.get(key)) {
            Some(KeyEquivalence::Ignore) => true,
            Some(KeyEquivalence::Groups(groups)) => groups.equivalent(value, other),
            None => value == other,
        }
    })
}
