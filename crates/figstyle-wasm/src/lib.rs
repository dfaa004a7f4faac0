//! WASM bindings for figstyle.
//!
//! Exposes the extraction and stylesheet pipeline to JavaScript via
//! wasm-bindgen. Inputs are JSON text (a file response or a bare document);
//! node records cross the boundary as plain JS objects.

use figstyle_codegen::{
    CompilerOutput, EmptyRules, GenerationError, GenerationRequest, StyleOptions,
};
use figstyle_tree::{DesignFile, DesignNode, TreeError};
use serde::Serialize;
use wasm_bindgen::prelude::*;

/// Compile a design document to `{ css: string, nodes: object[] }`.
///
/// Throws a JS error if the input is not a JSON object.
#[wasm_bindgen]
pub fn compile(source: &str) -> Result<JsValue, JsError> {
    let output = compile_source(source).map_err(|e| JsError::new(&e.to_string()))?;

    let js_obj = js_sys::Object::new();
    js_sys::Reflect::set(&js_obj, &"css".into(), &output.css.into())
        .map_err(|_| JsError::new("Failed to set css property"))?;
    js_sys::Reflect::set(&js_obj, &"nodes".into(), &to_js(&output.nodes)?)
        .map_err(|_| JsError::new("Failed to set nodes property"))?;

    Ok(js_obj.into())
}

/// Extract the stylable nodes of a design document as an array of plain objects.
#[wasm_bindgen(js_name = extractNodes)]
pub fn extract_nodes(source: &str) -> Result<JsValue, JsError> {
    let file = DesignFile::from_json(source).map_err(|e| JsError::new(&e.to_string()))?;
    to_js(&figstyle_tree::extract_nodes(&file.document))
}

/// Derive a stylesheet from node records previously returned by `extractNodes`.
#[wasm_bindgen(js_name = deriveStylesheet)]
pub fn derive_stylesheet(nodes: JsValue, skip_empty: bool) -> Result<String, JsError> {
    let nodes: Vec<DesignNode> =
        serde_wasm_bindgen::from_value(nodes).map_err(|e| JsError::new(&e.to_string()))?;
    Ok(figstyle_codegen::derive_stylesheet_with(
        &nodes,
        &style_options(skip_empty),
    ))
}

/// Build the prompts for a component request:
/// `{ componentName: string, system: string, user: string }`.
///
/// The host sends them to its own text-generation provider. Framework and
/// styling default to React and Tailwind.
#[wasm_bindgen(js_name = componentPrompts)]
pub fn component_prompts(
    name: &str,
    requirements: &str,
    framework: Option<String>,
    styling: Option<String>,
) -> Result<JsValue, JsError> {
    let prompts = prompts_for(name, requirements, framework, styling)
        .map_err(|e| JsError::new(&e.to_string()))?;
    to_js(&prompts)
}

/// Get the library version.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn compile_source(source: &str) -> Result<CompilerOutput, TreeError> {
    let file = DesignFile::from_json(source)?;
    Ok(figstyle_codegen::compile(&file.document))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ComponentPrompts {
    component_name: String,
    system: String,
    user: String,
}

fn prompts_for(
    name: &str,
    requirements: &str,
    framework: Option<String>,
    styling: Option<String>,
) -> Result<ComponentPrompts, GenerationError> {
    let mut request = GenerationRequest::new(name, requirements)?;
    if let Some(framework) = framework {
        request = request.with_framework(framework);
    }
    if let Some(styling) = styling {
        request = request.with_styling(styling);
    }
    Ok(ComponentPrompts {
        system: request.system_prompt(),
        user: request.user_prompt(),
        component_name: request.component_name,
    })
}

fn style_options(skip_empty: bool) -> StyleOptions {
    StyleOptions {
        empty_rules: if skip_empty {
            EmptyRules::Skip
        } else {
            EmptyRules::Emit
        },
        ..StyleOptions::default()
    }
}

// Plain objects rather than JS `Map`s, so passthrough properties read naturally.
fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsError> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|e| JsError::new(&e.to_string()))
}
