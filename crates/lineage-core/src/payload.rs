//! Wire shapes returned by the Lineage API.
//!
//! These types mirror the JSON payload 1:1 and carry no invariants of their own. Missing or
//! `null` fields fall back to their defaults so one malformed entry never rejects the whole
//! payload; [`crate::build::normalize`] drops whatever is left unusable.

use crate::model::{Confidence, DependencyType, Direction};
use serde::{Deserialize, Deserializer, Serialize};

/// Reads `null` as `T::default()`.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawLineage {
    pub root: RawNode,
    #[serde(default)]
    pub nodes: Vec<RawNode>,
    #[serde(default)]
    pub external_nodes: Vec<RawExternalNode>,
    #[serde(default)]
    pub edges: Vec<RawEdge>,
    pub direction: Direction,
    #[serde(default = "default_depth", deserialize_with = "null_as_default")]
    pub depth: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub truncated: bool,
}

fn default_depth() -> i64 {
    1
}

/// A catalog object (the root or an internal node).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawNode {
    pub id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub source_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub schema_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub object_name: String,
    #[serde(default)]
    pub object_type: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub distance: i64,
}

/// A reference to something the catalog does not track (a file, an unmanaged table, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawExternalNode {
    #[serde(default)]
    pub schema_name: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub object_name: String,
    #[serde(default)]
    pub object_type: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub distance: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawExternalRef {
    #[serde(default)]
    pub schema_name: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub object_name: String,
}

/// A dependency edge: `from_id` (the consumer) depends on `to_id` / `to_external` (the producer).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawEdge {
    #[serde(default)]
    pub from_id: Option<i64>,
    #[serde(default)]
    pub to_id: Option<i64>,
    #[serde(default)]
    pub to_external: Option<RawExternalRef>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub dependency_type: DependencyType,
    #[serde(default, deserialize_with = "null_as_default")]
    pub confidence: Confidence,
}

impl RawNode {
    pub fn new(
        id: i64,
        source_name: impl Into<String>,
        schema_name: impl Into<String>,
        object_name: impl Into<String>,
        object_type: impl Into<String>,
        distance: i64,
    ) -> Self {
        Self {
            id,
            source_name: source_name.into(),
            schema_name: schema_name.into(),
            object_name: object_name.into(),
            object_type: Some(object_type.into()),
            distance,
        }
    }
}

impl RawExternalNode {
    pub fn new(schema_name: Option<&str>, object_name: impl Into<String>, distance: i64) -> Self {
        Self {
            schema_name: schema_name.map(str::to_string),
            object_name: object_name.into(),
            object_type: None,
            distance,
        }
    }
}

impl RawEdge {
    pub fn to_node(from_id: i64, to_id: i64) -> Self {
        Self {
            from_id: Some(from_id),
            to_id: Some(to_id),
            to_external: None,
            dependency_type: DependencyType::Direct,
            confidence: Confidence::High,
        }
    }

    pub fn to_external(from_id: i64, schema_name: Option<&str>, object_name: &str) -> Self {
        Self {
            from_id: Some(from_id),
            to_id: None,
            to_external: Some(RawExternalRef {
                schema_name: schema_name.map(str::to_string),
                object_name: object_name.to_string(),
            }),
            dependency_type: DependencyType::Direct,
            confidence: Confidence::High,
        }
    }

    pub fn with_kind(mut self, dependency_type: DependencyType, confidence: Confidence) -> Self {
        self.dependency_type = dependency_type;
        self.confidence = confidence;
        self
    }
}
