//! figstyle design tree
//!
//! Reads a design document (a JSON tree of visual nodes) and flattens the
//! frames, components, and instances it contains into `DesignNode` records,
//! in pre-order.
//!
//! ```text
//! JSON text → parse_document() → Value → extract_nodes() → Vec<DesignNode>
//! ```
//!
//! # Example
//!
//! ```
//! use figstyle_tree::{extract_nodes, parse_document};
//!
//! let doc = parse_document(r#"{"children": [{"type": "FRAME", "name": "Header"}]}"#).unwrap();
//! let nodes = extract_nodes(&doc);
//! assert_eq!(nodes.len(), 1);
//! assert_eq!(nodes[0].name, "Header");
//! ```

pub mod extract;
pub mod file;
pub mod node;
pub mod source;

pub use extract::{extract_nodes, extract_nodes_with, ExtractOptions};
pub use file::{ComponentInfo, DesignFile};
pub use node::{
    BoundingBox, ChildRef, DesignNode, LayoutMode, NodeKind, Padding, Paint, Rgba, StylableKind,
};
pub use source::{DesignSource, DirectorySource, FetchError};

use serde_json::Value;

/// Error reading a design document.
#[derive(Debug, thiserror::Error)]
pub enum TreeError {
    #[error("Invalid document JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unexpected document shape: {message}")]
    Shape { message: String },
}

/// Parse JSON text into a raw document tree.
pub fn parse_document(source: &str) -> Result<Value, TreeError> {
    Ok(serde_json::from_str(source)?)
}
