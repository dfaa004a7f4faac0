//! Node extractor.
//!
//! Walks a raw design document pre-order and flattens every frame, component,
//! and instance into a `DesignNode`. Non-stylable nodes are still descended
//! into, so a frame wrapped in a group is found.
//!
//! The walk never fails: malformed children are skipped with a warning and
//! the rest of the sibling list is processed.

use crate::node::{
    BoundingBox, ChildRef, DesignNode, LayoutMode, NodeKind, Padding, Paint, Rgba, StylableKind,
};
use log::{debug, warn};
use serde_json::{Map, Value};

/// Recursion cap used by `extract_nodes`.
pub const DEFAULT_MAX_DEPTH: usize = 512;

/// Properties copied into `DesignNode::passthrough` when present.
pub const PASSTHROUGH_KEYS: &[&str] = &[
    "constraints",
    "primaryAxisSizingMode",
    "counterAxisSizingMode",
    "backgroundColor",
    "strokes",
    "effects",
    "characters",
    "style",
];

/// Extraction settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractOptions {
    /// Deepest node level visited; the root's children are level 1.
    /// Branches below the cap are skipped.
    pub max_depth: usize,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// Extract the stylable nodes of a document with default options.
///
/// The root itself is never returned. A root without `children` yields an
/// empty sequence.
pub fn extract_nodes(document: &Value) -> Vec<DesignNode> {
    extract_nodes_with(document, &ExtractOptions::default())
}

/// Extract the stylable nodes of a document.
pub fn extract_nodes_with(document: &Value, options: &ExtractOptions) -> Vec<DesignNode> {
    let mut extractor = Extractor {
        options,
        nodes: Vec::new(),
    };

    match document.get("children") {
        Some(Value::Array(children)) => extractor.visit_children(children, 1),
        Some(Value::Null) | None => {}
        Some(other) => warn!(
            "document root has non-array children ({}), nothing extracted",
            type_name(other)
        ),
    }

    debug!("extracted {} design nodes", extractor.nodes.len());
    extractor.nodes
}

struct Extractor<'a> {
    options: &'a ExtractOptions,
    nodes: Vec<DesignNode>,
}

impl Extractor<'_> {
    fn visit_children(&mut self, children: &[Value], depth: usize) {
        for (index, child) in children.iter().enumerate() {
            match child {
                Value::Object(object) => self.visit(object, depth),
                other => warn!(
                    "skipping malformed child #{index} at depth {depth}: expected object, found {}",
                    type_name(other)
                ),
            }
        }
    }

    fn visit(&mut self, object: &Map<String, Value>, depth: usize) {
        if depth > self.options.max_depth {
            warn!(
                "skipping branch at node {:?}: depth limit {} exceeded",
                string_field(object, "id"),
                self.options.max_depth
            );
            return;
        }

        let kind = NodeKind::from(string_field(object, "type").unwrap_or_default());
        if let Some(stylable) = kind.stylable() {
            let node = read_node(object, stylable);
            debug!("extracted {} {:?} ({})", stylable.as_str(), node.name, node.id);
            self.nodes.push(node);
        }

        match object.get("children") {
            Some(Value::Array(children)) => self.visit_children(children, depth + 1),
            Some(Value::Null) | None => {}
            Some(other) => warn!(
                "node {:?} has non-array children ({}), not descending",
                string_field(object, "id"),
                type_name(other)
            ),
        }
    }
}

// =========================================================================
// Field readers
// =========================================================================

fn read_node(object: &Map<String, Value>, kind: StylableKind) -> DesignNode {
    let mut node = DesignNode::new(
        string_field(object, "id").unwrap_or_default(),
        string_field(object, "name").unwrap_or_default(),
        kind,
    );

    node.bounding_box = read_bounding_box(object);
    node.layout_mode = string_field(object, "layoutMode").and_then(LayoutMode::parse);
    node.padding = Padding {
        left: number_field(object, "paddingLeft"),
        right: number_field(object, "paddingRight"),
        top: number_field(object, "paddingTop"),
        bottom: number_field(object, "paddingBottom"),
    };
    node.item_spacing = number_field(object, "itemSpacing");
    node.fills = read_fills(object);
    node.corner_radius = number_field(object, "cornerRadius");

    for key in PASSTHROUGH_KEYS {
        match object.get(*key) {
            Some(Value::Null) | None => {}
            Some(value) => {
                node.passthrough.insert((*key).to_string(), value.clone());
            }
        }
    }

    if let Some(Value::Array(children)) = object.get("children") {
        node.children = children
            .iter()
            .filter_map(Value::as_object)
            .map(|child| ChildRef {
                id: string_field(child, "id").map(str::to_string),
                kind: NodeKind::from(string_field(child, "type").unwrap_or_default()),
            })
            .collect();
    }

    node
}

fn read_bounding_box(object: &Map<String, Value>) -> Option<BoundingBox> {
    match object.get("absoluteBoundingBox")? {
        Value::Object(rect) => Some(BoundingBox {
            x: number_field(rect, "x"),
            y: number_field(rect, "y"),
            width: number_field(rect, "width"),
            height: number_field(rect, "height"),
        }),
        Value::Null => None,
        other => {
            warn!("ignoring absoluteBoundingBox of type {}", type_name(other));
            None
        }
    }
}

fn read_fills(object: &Map<String, Value>) -> Vec<Paint> {
    let Some(Value::Array(fills)) = object.get("fills") else {
        return Vec::new();
    };

    fills
        .iter()
        .filter_map(|fill| {
            let Value::Object(fill) = fill else {
                warn!("skipping fill of type {}", type_name(fill));
                return None;
            };
            let kind = string_field(fill, "type").unwrap_or_default();
            match (kind, fill.get("color")) {
                ("SOLID", Some(Value::Object(color))) => Some(Paint::Solid {
                    color: Rgba {
                        r: number_field(color, "r").unwrap_or(f64::NAN),
                        g: number_field(color, "g").unwrap_or(f64::NAN),
                        b: number_field(color, "b").unwrap_or(f64::NAN),
                        a: number_field(color, "a"),
                    },
                    opacity: number_field(fill, "opacity"),
                }),
                _ => Some(Paint::Other {
                    kind: kind.to_string(),
                }),
            }
        })
        .collect()
}

fn string_field<'a>(object: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    object.get(key).and_then(Value::as_str)
}

/// Read a numeric field. `null` and missing are absent; any other non-number
/// value is present but non-finite.
fn number_field(object: &Map<String, Value>, key: &str) -> Option<f64> {
    match object.get(key)? {
        Value::Null => None,
        Value::Number(number) => Some(number.as_f64().unwrap_or(f64::NAN)),
        other => {
            warn!("field {key:?} holds {} instead of a number", type_name(other));
            Some(f64::NAN)
        }
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn names(nodes: &[DesignNode]) -> Vec<&str> {
        nodes.iter().map(|n| n.name.as_str()).collect()
    }

    // =========================================================================
    // Traversal
    // =========================================================================

    #[test]
    fn test_root_without_children() {
        assert!(extract_nodes(&json!({"name": "Document"})).is_empty());
        assert!(extract_nodes(&json!({"children": []})).is_empty());
        assert!(extract_nodes(&json!({"children": null})).is_empty());
    }

    #[test]
    fn test_non_object_root() {
        assert!(extract_nodes(&json!([1, 2, 3])).is_empty());
        assert!(extract_nodes(&json!("document")).is_empty());
    }

    #[test]
    fn test_root_is_not_returned() {
        let doc = json!({"type": "FRAME", "name": "Root", "children": []});
        assert!(extract_nodes(&doc).is_empty());
    }

    #[test]
    fn test_pre_order() {
        let doc = json!({
            "children": [
                {"type": "CANVAS", "name": "Page", "children": [
                    {"type": "FRAME", "name": "A", "children": [
                        {"type": "COMPONENT", "name": "A1"},
                        {"type": "INSTANCE", "name": "A2", "children": [
                            {"type": "FRAME", "name": "A2a"}
                        ]}
                    ]},
                    {"type": "FRAME", "name": "B"}
                ]}
            ]
        });
        let nodes = extract_nodes(&doc);
        assert_eq!(names(&nodes), vec!["A", "A1", "A2", "A2a", "B"]);
    }

    #[test]
    fn test_group_does_not_block_descendants() {
        let doc = json!({
            "children": [
                {"type": "GROUP", "name": "Wrapper", "children": [
                    {"type": "FRAME", "name": "Inner"}
                ]}
            ]
        });
        let nodes = extract_nodes(&doc);
        assert_eq!(names(&nodes), vec!["Inner"]);
        assert_eq!(nodes[0].kind, StylableKind::Frame);
    }

    #[test]
    fn test_non_qualifying_kinds_are_skipped() {
        let doc = json!({
            "children": [
                {"type": "TEXT", "name": "Label"},
                {"type": "RECTANGLE", "name": "Box"},
                {"type": "VECTOR", "name": "Icon"},
                {"type": "FRAME", "name": "Kept"},
                {"name": "Untyped"}
            ]
        });
        assert_eq!(names(&extract_nodes(&doc)), vec!["Kept"]);
    }

    #[test]
    fn test_malformed_children_are_skipped() {
        let doc = json!({
            "children": [
                {"type": "FRAME", "name": "First"},
                42,
                "not a node",
                null,
                {"type": "FRAME", "name": "Second", "children": [true, {"type": "INSTANCE", "name": "Third"}]}
            ]
        });
        assert_eq!(names(&extract_nodes(&doc)), vec!["First", "Second", "Third"]);
    }

    #[test]
    fn test_non_array_children_do_not_abort() {
        let doc = json!({
            "children": [
                {"type": "FRAME", "name": "Odd", "children": {"type": "FRAME", "name": "Hidden"}},
                {"type": "FRAME", "name": "Next"}
            ]
        });
        assert_eq!(names(&extract_nodes(&doc)), vec!["Odd", "Next"]);
    }

    #[test]
    fn test_depth_cap_skips_deep_branch_only() {
        let doc = json!({
            "children": [
                {"type": "FRAME", "name": "L1", "children": [
                    {"type": "FRAME", "name": "L2", "children": [
                        {"type": "FRAME", "name": "L3"}
                    ]}
                ]},
                {"type": "FRAME", "name": "Sibling"}
            ]
        });
        let options = ExtractOptions { max_depth: 2 };
        assert_eq!(
            names(&extract_nodes_with(&doc, &options)),
            vec!["L1", "L2", "Sibling"]
        );
    }

    #[test]
    fn test_deterministic() {
        let doc = json!({
            "children": [
                {"type": "FRAME", "name": "A", "fills": [{"type": "SOLID", "color": {"r": 0.2, "g": 0.4, "b": 0.6}}]},
                {"type": "GROUP", "children": [{"type": "COMPONENT", "name": "B", "cornerRadius": 4}]}
            ]
        });
        assert_eq!(extract_nodes(&doc), extract_nodes(&doc));
    }

    // =========================================================================
    // Field selection
    // =========================================================================

    #[test]
    fn test_full_record() {
        let doc = json!({
            "children": [{
                "id": "12:34",
                "type": "COMPONENT",
                "name": "Card",
                "absoluteBoundingBox": {"x": 10.5, "y": -3, "width": 320, "height": 200.25},
                "layoutMode": "VERTICAL",
                "paddingLeft": 16,
                "paddingTop": 8,
                "itemSpacing": 12,
                "cornerRadius": 6,
                "fills": [
                    {"type": "SOLID", "color": {"r": 1, "g": 1, "b": 1, "a": 0.5}, "opacity": 0.9},
                    {"type": "IMAGE", "imageRef": "abc"}
                ],
                "strokes": [{"type": "SOLID"}],
                "constraints": {"vertical": "TOP"},
                "children": [
                    {"id": "12:35", "type": "TEXT", "name": "Title"},
                    "garbage"
                ]
            }]
        });

        let nodes = extract_nodes(&doc);
        assert_eq!(nodes.len(), 1);
        let node = &nodes[0];

        assert_eq!(node.id, "12:34");
        assert_eq!(node.kind, StylableKind::Component);
        assert_eq!(
            node.bounding_box,
            Some(BoundingBox {
                x: Some(10.5),
                y: Some(-3.0),
                width: Some(320.0),
                height: Some(200.25),
            })
        );
        assert_eq!(node.layout_mode, Some(LayoutMode::Vertical));
        assert_eq!(
            node.padding,
            Padding {
                left: Some(16.0),
                right: None,
                top: Some(8.0),
                bottom: None,
            }
        );
        assert_eq!(node.item_spacing, Some(12.0));
        assert_eq!(node.corner_radius, Some(6.0));
        assert_eq!(
            node.fills,
            vec![
                Paint::Solid {
                    color: Rgba::new(1.0, 1.0, 1.0, Some(0.5)),
                    opacity: Some(0.9),
                },
                Paint::Other {
                    kind: "IMAGE".into()
                },
            ]
        );
        assert_eq!(
            node.passthrough.keys().collect::<Vec<_>>(),
            vec!["constraints", "strokes"]
        );
        assert_eq!(
            node.children,
            vec![ChildRef {
                id: Some("12:35".into()),
                kind: NodeKind::Other("TEXT".into()),
            }]
        );
    }

    #[test]
    fn test_missing_attributes_stay_absent() {
        let doc = json!({"children": [{"type": "FRAME", "name": "Bare"}]});
        let node = &extract_nodes(&doc)[0];
        assert_eq!(node.id, "");
        assert_eq!(node.bounding_box, None);
        assert_eq!(node.layout_mode, None);
        assert!(!node.padding.is_specified());
        assert_eq!(node.item_spacing, None);
        assert!(node.fills.is_empty());
        assert_eq!(node.corner_radius, None);
        assert!(node.passthrough.is_empty());
        assert!(node.children.is_empty());
    }

    #[test]
    fn test_explicit_zero_is_present() {
        let doc = json!({"children": [{"type": "FRAME", "paddingLeft": 0, "cornerRadius": 0}]});
        let node = &extract_nodes(&doc)[0];
        assert_eq!(node.padding.left, Some(0.0));
        assert_eq!(node.corner_radius, Some(0.0));
    }

    #[test]
    fn test_null_fields_are_absent() {
        let doc = json!({"children": [{"type": "FRAME", "itemSpacing": null, "absoluteBoundingBox": null}]});
        let node = &extract_nodes(&doc)[0];
        assert_eq!(node.item_spacing, None);
        assert_eq!(node.bounding_box, None);
    }

    #[test]
    fn test_garbage_number_is_present_but_not_finite() {
        let doc = json!({"children": [{"type": "FRAME", "itemSpacing": "wide", "paddingTop": [1]}]});
        let node = &extract_nodes(&doc)[0];
        assert!(node.item_spacing.is_some_and(f64::is_nan));
        assert!(node.padding.top.is_some_and(f64::is_nan));
    }

    #[test]
    fn test_partial_bounding_box() {
        let doc = json!({"children": [{"type": "FRAME", "absoluteBoundingBox": {"width": 50}}]});
        let node = &extract_nodes(&doc)[0];
        assert_eq!(
            node.bounding_box,
            Some(BoundingBox {
                width: Some(50.0),
                ..BoundingBox::default()
            })
        );
    }

    #[test]
    fn test_unknown_layout_mode_is_absent() {
        let doc = json!({"children": [{"type": "FRAME", "layoutMode": "NONE"}, {"type": "FRAME", "layoutMode": "GRID"}]});
        let nodes = extract_nodes(&doc);
        assert_eq!(nodes[0].layout_mode, None);
        assert_eq!(nodes[1].layout_mode, None);
    }

    #[test]
    fn test_solid_without_color_channels() {
        let doc = json!({"children": [{"type": "FRAME", "fills": [{"type": "SOLID", "color": {"g": 1}}]}]});
        let node = &extract_nodes(&doc)[0];
        let Some(Paint::Solid { color, .. }) = node.primary_fill() else {
            panic!("expected a solid fill");
        };
        assert!(color.r.is_nan());
        assert_eq!(color.g, 1.0);
        assert!(color.b.is_nan());
        assert_eq!(color.a, None);
    }

    #[test]
    fn test_end_to_end_header_document() {
        let doc = json!({
            "children": [{
                "type": "FRAME",
                "name": "Header",
                "absoluteBoundingBox": {"width": 300, "height": 80},
                "fills": [{"type": "SOLID", "color": {"r": 0, "g": 0, "b": 0, "a": 1}}]
            }]
        });
        let nodes = extract_nodes(&doc);
        assert_eq!(names(&nodes), vec!["Header"]);
    }
}
