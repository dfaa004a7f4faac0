//! Design node model.
//!
//! `NodeKind` classifies every node of the raw document tree. Only the three
//! stylable kinds become `DesignNode` records; everything else stays opaque.
//!
//! Every geometry and paint attribute is an `Option` so that "absent" and
//! "zero" stay distinguishable until style derivation.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

// ---------------------------------------------------------------------------
// Kinds
// ---------------------------------------------------------------------------

/// Classification of a raw document node by its `type` string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum NodeKind {
    Component,
    Frame,
    Instance,
    /// Any kind the pipeline does not interpret (`GROUP`, `TEXT`, `VECTOR`, ...).
    Other(String),
}

impl NodeKind {
    /// The stylable kind for this node, if it is one of the three structural kinds.
    pub fn stylable(&self) -> Option<StylableKind> {
        match self {
            NodeKind::Component => Some(StylableKind::Component),
            NodeKind::Frame => Some(StylableKind::Frame),
            NodeKind::Instance => Some(StylableKind::Instance),
            NodeKind::Other(_) => None,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            NodeKind::Component => "COMPONENT",
            NodeKind::Frame => "FRAME",
            NodeKind::Instance => "INSTANCE",
            NodeKind::Other(name) => name,
        }
    }
}

impl From<&str> for NodeKind {
    fn from(value: &str) -> Self {
        match value {
            "COMPONENT" => NodeKind::Component,
            "FRAME" => NodeKind::Frame,
            "INSTANCE" => NodeKind::Instance,
            other => NodeKind::Other(other.to_string()),
        }
    }
}

impl From<String> for NodeKind {
    fn from(value: String) -> Self {
        NodeKind::from(value.as_str())
    }
}

impl From<NodeKind> for String {
    fn from(kind: NodeKind) -> Self {
        kind.as_str().to_string()
    }
}

/// The structural kinds that produce a `DesignNode`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StylableKind {
    Component,
    Frame,
    Instance,
}

impl StylableKind {
    pub fn as_str(self) -> &'static str {
        match self {
            StylableKind::Component => "COMPONENT",
            StylableKind::Frame => "FRAME",
            StylableKind::Instance => "INSTANCE",
        }
    }
}

/// Auto-layout direction. `NONE` in the source maps to no layout mode at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LayoutMode {
    Horizontal,
    Vertical,
}

impl LayoutMode {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "HORIZONTAL" => Some(LayoutMode::Horizontal),
            "VERTICAL" => Some(LayoutMode::Vertical),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Geometry and paint
// ---------------------------------------------------------------------------

/// Absolute bounding box in document units.
///
/// Each side is optional: a partially specified box keeps whatever the
/// document provided.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        serialize_with = "finite_or_zero"
    )]
    pub x: Option<f64>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        serialize_with = "finite_or_zero"
    )]
    pub y: Option<f64>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        serialize_with = "finite_or_zero"
    )]
    pub width: Option<f64>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        serialize_with = "finite_or_zero"
    )]
    pub height: Option<f64>,
}

/// Per-side padding, each side absent unless the document set it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Padding {
    #[serde(
        rename = "paddingLeft",
        default,
        skip_serializing_if = "Option::is_none",
        serialize_with = "finite_or_zero"
    )]
    pub left: Option<f64>,
    #[serde(
        rename = "paddingRight",
        default,
        skip_serializing_if = "Option::is_none",
        serialize_with = "finite_or_zero"
    )]
    pub right: Option<f64>,
    #[serde(
        rename = "paddingTop",
        default,
        skip_serializing_if = "Option::is_none",
        serialize_with = "finite_or_zero"
    )]
    pub top: Option<f64>,
    #[serde(
        rename = "paddingBottom",
        default,
        skip_serializing_if = "Option::is_none",
        serialize_with = "finite_or_zero"
    )]
    pub bottom: Option<f64>,
}

impl Padding {
    pub fn is_specified(&self) -> bool {
        self.left.is_some() || self.right.is_some() || self.top.is_some() || self.bottom.is_some()
    }
}

/// Normalized color, channels in `[0, 1]`.
///
/// A channel missing from the document is stored as NaN and zeroed when the
/// stylesheet is derived.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgba {
    #[serde(default = "nan", deserialize_with = "number_or_nan")]
    pub r: f64,
    #[serde(default = "nan", deserialize_with = "number_or_nan")]
    pub g: f64,
    #[serde(default = "nan", deserialize_with = "number_or_nan")]
    pub b: f64,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        serialize_with = "finite_or_zero"
    )]
    pub a: Option<f64>,
}

impl Rgba {
    pub fn new(r: f64, g: f64, b: f64, a: Option<f64>) -> Self {
        Self { r, g, b, a }
    }
}

fn nan() -> f64 {
    f64::NAN
}

fn number_or_nan<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::NAN))
}

// JSON has no NaN: a present but non-finite value is written as 0 so it stays
// present, and derives the same declaration, after a round trip.
fn finite_or_zero<S>(value: &Option<f64>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match value {
        Some(v) if !v.is_finite() => serializer.serialize_some(&0.0),
        other => other.serialize(serializer),
    }
}

/// One entry of a node's `fills` list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "PaintRecord", into = "PaintRecord")]
pub enum Paint {
    Solid { color: Rgba, opacity: Option<f64> },
    /// Gradients, images, and anything else; carried but never interpreted.
    Other { kind: String },
}

/// Wire shape of a paint: `{ "type": "SOLID", "color": {...}, "opacity": 0.5 }`.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct PaintRecord {
    #[serde(rename = "type", default)]
    kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    color: Option<Rgba>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    opacity: Option<f64>,
}

impl From<PaintRecord> for Paint {
    fn from(record: PaintRecord) -> Self {
        match (record.kind.as_str(), record.color) {
            ("SOLID", Some(color)) => Paint::Solid {
                color,
                opacity: record.opacity,
            },
            _ => Paint::Other { kind: record.kind },
        }
    }
}

impl From<Paint> for PaintRecord {
    fn from(paint: Paint) -> Self {
        match paint {
            Paint::Solid { color, opacity } => PaintRecord {
                kind: "SOLID".into(),
                color: Some(color),
                opacity,
            },
            Paint::Other { kind } => PaintRecord {
                kind,
                color: None,
                opacity: None,
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Design node
// ---------------------------------------------------------------------------

/// Opaque reference to a child of an extracted node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChildRef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "type")]
    pub kind: NodeKind,
}

/// A structurally significant node, flattened out of the document tree.
///
/// Records are immutable once extracted: the style deriver only reads them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DesignNode {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: StylableKind,
    #[serde(
        rename = "absoluteBoundingBox",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub bounding_box: Option<BoundingBox>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout_mode: Option<LayoutMode>,
    #[serde(flatten)]
    pub padding: Padding,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        serialize_with = "finite_or_zero"
    )]
    pub item_spacing: Option<f64>,
    #[serde(default)]
    pub fills: Vec<Paint>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        serialize_with = "finite_or_zero"
    )]
    pub corner_radius: Option<f64>,
    /// Visual properties copied verbatim and never interpreted.
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub passthrough: Map<String, Value>,
    #[serde(default)]
    pub children: Vec<ChildRef>,
}

impl DesignNode {
    /// A node with only identity set; every attribute absent.
    pub fn new(id: impl Into<String>, name: impl Into<String>, kind: StylableKind) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind,
            bounding_box: None,
            layout_mode: None,
            padding: Padding::default(),
            item_spacing: None,
            fills: Vec::new(),
            corner_radius: None,
            passthrough: Map::new(),
            children: Vec::new(),
        }
    }

    /// The first fill, which is the only one that drives the background.
    pub fn primary_fill(&self) -> Option<&Paint> {
        self.fills.first()
    }
}
