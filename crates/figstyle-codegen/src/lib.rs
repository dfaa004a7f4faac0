//! figstyle code generator
//!
//! Turns extracted design nodes into front-end artifacts: a CSS stylesheet
//! derived deterministically from node geometry and paint, and (through a
//! text-generation collaborator) component source code.
//!
//! ```text
//! document → compile() → CompilerOutput { nodes, css }
//! ```

pub mod component;
pub mod css;

pub use component::{
    component_name, generate_with_fallback, Generation, GenerationError, GenerationRequest,
    ProviderError, TextGenerator,
};
pub use css::{derive_stylesheet, derive_stylesheet_with, EmptyRules, StyleOptions};

use figstyle_tree::{extract_nodes_with, DesignNode, ExtractOptions};
use serde_json::Value;

/// The output of one pipeline run.
#[derive(Debug, Clone, PartialEq)]
pub struct CompilerOutput {
    pub nodes: Vec<DesignNode>,
    pub css: String,
}

/// Settings for both pipeline stages.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompileOptions {
    pub extract: ExtractOptions,
    pub style: StyleOptions,
}

/// Extract the stylable nodes of a document and derive their stylesheet.
pub fn compile(document: &Value) -> CompilerOutput {
    compile_with(document, &CompileOptions::default())
}

pub fn compile_with(document: &Value, options: &CompileOptions) -> CompilerOutput {
    let nodes = extract_nodes_with(document, &options.extract);
    let css = derive_stylesheet_with(&nodes, &options.style);
    CompilerOutput { nodes, css }
}

/// Format a number for CSS output, dropping `.0` from integers.
/// Non-finite values print as `0`.
pub fn format_number(n: f64) -> String {
    if !n.is_finite() {
        "0".into()
    } else if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{n}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    // =========================================================================
    // format_number
    // =========================================================================

    #[test]
    fn test_number_integer() {
        assert_eq!(format_number(42.0), "42");
        assert_eq!(format_number(0.0), "0");
        assert_eq!(format_number(-0.0), "0");
        assert_eq!(format_number(-16.0), "-16");
    }

    #[test]
    fn test_number_float() {
        assert_eq!(format_number(3.14), "3.14");
        assert_eq!(format_number(0.5), "0.5");
        assert_eq!(format_number(200.25), "200.25");
    }

    #[test]
    fn test_number_non_finite() {
        assert_eq!(format_number(f64::NAN), "0");
        assert_eq!(format_number(f64::INFINITY), "0");
        assert_eq!(format_number(f64::NEG_INFINITY), "0");
    }

    // =========================================================================
    // Integration: compile()
    // =========================================================================

    #[test]
    fn test_compile_empty() {
        let output = compile(&json!({}));
        assert!(output.nodes.is_empty());
        assert_eq!(output.css, "/* Generated from Figma */\n\n");
    }

    #[test]
    fn test_compile_header() {
        let doc = json!({
            "children": [{
                "type": "FRAME",
                "name": "Header",
                "absoluteBoundingBox": {"width": 300, "height": 80},
                "fills": [{"type": "SOLID", "color": {"r": 0, "g": 0, "b": 0, "a": 1}}]
            }]
        });
        let output = compile(&doc);

        assert_eq!(output.nodes.len(), 1);
        assert_eq!(output.nodes[0].name, "Header");
        assert_eq!(
            output.css,
            "/* Generated from Figma */\n\n\
             .header {\n\
             \x20 width: 300px;\n\
             \x20 height: 80px;\n\
             \x20 background-color: rgba(0, 0, 0, 1);\n\
             }\n\n"
        );
    }

    #[test]
    fn test_compile_nested_page() {
        let doc = json!({
            "type": "DOCUMENT",
            "children": [{
                "type": "CANVAS",
                "name": "Page 1",
                "children": [
                    {"type": "GROUP", "name": "Hero group", "children": [
                        {"type": "FRAME", "name": "Hero", "layoutMode": "HORIZONTAL", "itemSpacing": 24,
                         "paddingTop": 32, "paddingBottom": 32}
                    ]},
                    {"type": "TEXT", "name": "Caption", "characters": "Hi"},
                    {"type": "INSTANCE", "name": "CTA Button", "cornerRadius": 999,
                     "fills": [{"type": "SOLID", "color": {"r": 0.2, "g": 0.4, "b": 1.0}}]},
                    7
                ]
            }]
        });
        let output = compile(&doc);

        let names: Vec<&str> = output.nodes.iter().map(|n| n.name.as_str()).collect();
        assert_eq!(names, vec!["Hero", "CTA Button"]);
        assert_eq!(
            output.css,
            "/* Generated from Figma */\n\n\
             .hero {\n\
             \x20 display: flex;\n\
             \x20 flex-direction: row;\n\
             \x20 padding: 32px 0px 32px 0px;\n\
             \x20 gap: 24px;\n\
             }\n\n\
             .cta-button {\n\
             \x20 background-color: rgba(51, 102, 255, 1);\n\
             \x20 border-radius: 999px;\n\
             }\n\n"
        );
    }

    #[test]
    fn test_compile_is_deterministic() {
        let doc = json!({
            "children": [
                {"type": "COMPONENT", "name": "A", "paddingLeft": 1.5},
                {"type": "FRAME", "name": "B", "fills": [{"type": "SOLID", "color": {"r": 0.123, "g": 0.456, "b": 0.789, "a": 0.3}}]}
            ]
        });
        assert_eq!(compile(&doc), compile(&doc));
    }

    #[test]
    fn test_compile_with_depth_cap() {
        let doc = json!({
            "children": [{"type": "FRAME", "name": "Outer", "children": [{"type": "FRAME", "name": "Inner"}]}]
        });
        let options = CompileOptions {
            extract: ExtractOptions { max_depth: 1 },
            ..CompileOptions::default()
        };
        let output = compile_with(&doc, &options);
        assert_eq!(output.nodes.len(), 1);
        assert_eq!(output.css, "/* Generated from Figma */\n\n.outer {\n}\n\n");
    }
}
