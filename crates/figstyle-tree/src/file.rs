//! Design file envelope.
//!
//! A file response carries metadata, the raw `document` tree, and a
//! `components` side-table keyed by node id. A bare document (no `document`
//! key) is accepted as well, with empty metadata.

use crate::TreeError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A fetched design file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DesignFile {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema_version: Option<u32>,
    pub document: Value,
    #[serde(default)]
    pub components: Vec<ComponentInfo>,
}

/// One entry of the components side-table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentInfo {
    /// Node id the entry is keyed by in the side-table.
    pub node_id: String,
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component_set_id: Option<String>,
    #[serde(default)]
    pub documentation_links: Vec<Value>,
}

impl DesignFile {
    /// Parse a file response (or bare document) from JSON text.
    pub fn from_json(source: &str) -> Result<Self, TreeError> {
        Self::from_value(crate::parse_document(source)?)
    }

    /// Build from an already-parsed value.
    pub fn from_value(value: Value) -> Result<Self, TreeError> {
        let Value::Object(mut object) = value else {
            return Err(TreeError::Shape {
                message: "expected a JSON object".into(),
            });
        };

        let Some(document) = object.remove("document") else {
            // Bare document tree.
            return Ok(Self::bare(Value::Object(object)));
        };
        if !document.is_object() {
            return Err(TreeError::Shape {
                message: "`document` must be an object".into(),
            });
        }

        let mut components: Vec<ComponentInfo> = match object.get("components") {
            Some(Value::Object(table)) => table
                .iter()
                .filter_map(|(node_id, entry)| {
                    let entry = entry.as_object()?;
                    Some(ComponentInfo {
                        node_id: node_id.clone(),
                        key: text(entry, "key").unwrap_or_default(),
                        name: text(entry, "name").unwrap_or_default(),
                        description: text(entry, "description").unwrap_or_default(),
                        component_set_id: text(entry, "componentSetId"),
                        documentation_links: match entry.get("documentationLinks") {
                            Some(Value::Array(links)) => links.clone(),
                            _ => Vec::new(),
                        },
                    })
                })
                .collect(),
            _ => Vec::new(),
        };
        components.sort_by(|a, b| a.node_id.cmp(&b.node_id));

        Ok(Self {
            name: text(&object, "name").unwrap_or_default(),
            last_modified: text(&object, "lastModified"),
            version: text(&object, "version"),
            thumbnail_url: text(&object, "thumbnailUrl"),
            schema_version: object
                .get("schemaVersion")
                .and_then(Value::as_u64)
                .and_then(|v| u32::try_from(v).ok()),
            document,
            components,
        })
    }

    /// Wrap a document tree with no metadata.
    pub fn bare(document: Value) -> Self {
        Self {
            name: String::new(),
            last_modified: None,
            version: None,
            thumbnail_url: None,
            schema_version: None,
            document,
            components: Vec::new(),
        }
    }
}

fn text(object: &Map<String, Value>, key: &str) -> Option<String> {
    object.get(key).and_then(Value::as_str).map(str::to_string)
}
