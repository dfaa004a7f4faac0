//! CSS code generator.
//!
//! Derives one rule block per design node, declarations in a fixed order:
//! size, flex layout, padding, gap, background, border radius.
//!
//! ```text
//! /* Generated from Figma */
//!
//! .header {
//!   width: 300px;
//!   height: 80px;
//! }
//!
//! ```

use crate::format_number;
use figstyle_tree::{DesignNode, LayoutMode, Paint};

/// Comment emitted at the top of every stylesheet by default.
pub const DEFAULT_HEADER: &str = "/* Generated from Figma */";

/// What to do with a node that yields no declarations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EmptyRules {
    /// Emit `.selector {\n}` so every node has a rule.
    #[default]
    Emit,
    /// Leave the node out of the stylesheet.
    Skip,
}

/// Stylesheet settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleOptions {
    /// Header line; an empty header is omitted along with its blank line.
    pub header: String,
    pub empty_rules: EmptyRules,
}

impl Default for StyleOptions {
    fn default() -> Self {
        Self {
            header: DEFAULT_HEADER.to_string(),
            empty_rules: EmptyRules::Emit,
        }
    }
}

/// A single `property: value;` line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub property: &'static str,
    pub value: String,
}

impl Declaration {
    fn new(property: &'static str, value: impl Into<String>) -> Self {
        Self {
            property,
            value: value.into(),
        }
    }
}

/// Derive a stylesheet with default options.
pub fn derive_stylesheet(nodes: &[DesignNode]) -> String {
    derive_stylesheet_with(nodes, &StyleOptions::default())
}

/// Derive a stylesheet. Identical input always yields identical output.
pub fn derive_stylesheet_with(nodes: &[DesignNode], options: &StyleOptions) -> String {
    let mut css = String::new();

    if !options.header.is_empty() {
        css.push_str(&options.header);
        css.push_str("\n\n");
    }

    for (index, node) in nodes.iter().enumerate() {
        let decls = declarations(node);
        if decls.is_empty() && options.empty_rules == EmptyRules::Skip {
            log::debug!("skipping empty rule for node {:?}", node.name);
            continue;
        }

        css.push_str(&format!(".{} {{\n", selector_for(node, index)));
        for decl in &decls {
            css.push_str(&format!("  {}: {};\n", decl.property, decl.value));
        }
        css.push_str("}\n\n");
    }

    css
}

/// The declarations for one node, in output order.
pub fn declarations(node: &DesignNode) -> Vec<Declaration> {
    let mut decls = Vec::new();

    if let Some(bounds) = &node.bounding_box {
        if let Some(width) = bounds.width {
            decls.push(Declaration::new("width", px(width)));
        }
        if let Some(height) = bounds.height {
            decls.push(Declaration::new("height", px(height)));
        }
    }

    if let Some(mode) = node.layout_mode {
        let direction = match mode {
            LayoutMode::Horizontal => "row",
            LayoutMode::Vertical => "column",
        };
        decls.push(Declaration::new("display", "flex"));
        decls.push(Declaration::new("flex-direction", direction));
    }

    let padding = &node.padding;
    if padding.is_specified() {
        let sides = [padding.top, padding.right, padding.bottom, padding.left];
        let value = sides
            .iter()
            .map(|side| px(side.unwrap_or(0.0)))
            .collect::<Vec<_>>()
            .join(" ");
        decls.push(Declaration::new("padding", value));
    }

    if let Some(spacing) = node.item_spacing {
        decls.push(Declaration::new("gap", px(spacing)));
    }

    // Only the first fill counts.
    if let Some(Paint::Solid { color, .. }) = node.primary_fill() {
        let value = format!(
            "rgba({}, {}, {}, {})",
            to_channel(color.r),
            to_channel(color.g),
            to_channel(color.b),
            format_number(color.a.unwrap_or(1.0)),
        );
        decls.push(Declaration::new("background-color", value));
    }

    if let Some(radius) = node.corner_radius {
        decls.push(Declaration::new("border-radius", px(radius)));
    }

    decls
}

/// Selector for the node at `index`, falling back to `unnamed-<index>` when
/// the name sanitizes to nothing.
pub fn selector_for(node: &DesignNode, index: usize) -> String {
    let class = sanitize_class_name(&node.name);
    if class.is_empty() {
        format!("unnamed-{index}")
    } else {
        class
    }
}

/// Lower-case a name and collapse every run outside `[a-z0-9]` into one `-`,
/// trimming dashes at both ends. May return an empty string.
pub fn sanitize_class_name(name: &str) -> String {
    let mut class = String::with_capacity(name.len());
    let mut pending_dash = false;

    for ch in name.to_lowercase().chars() {
        if ch.is_ascii_lowercase() || ch.is_ascii_digit() {
            if pending_dash && !class.is_empty() {
                class.push('-');
            }
            pending_dash = false;
            class.push(ch);
        } else {
            pending_dash = true;
        }
    }

    class
}

/// Convert a normalized `[0, 1]` channel to `0..=255`, rounding half up.
/// Out-of-range values clamp; non-finite values become 0.
pub fn to_channel(value: f64) -> u8 {
    if !value.is_finite() {
        return 0;
    }
    (value * 255.0).round().clamp(0.0, 255.0) as u8
}

fn px(value: f64) -> String {
    format!("{}px", format_number(value))
}
