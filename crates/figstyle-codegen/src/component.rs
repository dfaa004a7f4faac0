//! Component generation through text-generation providers.
//!
//! Builds the prompts for a component request and runs them against an
//! ordered list of providers, returning the first usable answer. The
//! providers themselves (HTTP clients, credentials) live outside this crate.

use log::{info, warn};

/// Framework requested when the caller names none.
pub const DEFAULT_FRAMEWORK: &str = "react";
/// Styling approach requested when the caller names none.
pub const DEFAULT_STYLING: &str = "tailwind";

/// A single provider's failure.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{message}")]
pub struct ProviderError {
    pub message: String,
}

impl ProviderError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Component generation error.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GenerationError {
    #[error("Invalid generation request: {message}")]
    InvalidRequest { message: String },

    /// The only configured provider failed.
    #[error("Provider {provider} failed: {message}")]
    Provider { provider: String, message: String },

    #[error("All providers failed: {}", summarize(.failures))]
    AllProvidersFailed {
        /// `(provider name, error)` in the order the providers were tried.
        failures: Vec<(String, ProviderError)>,
    },
}

fn summarize(failures: &[(String, ProviderError)]) -> String {
    failures
        .iter()
        .map(|(provider, error)| format!("{provider}: {error}"))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Anything that turns a system and a user instruction into text.
pub trait TextGenerator {
    /// Short identifier reported back in `Generation::provider`.
    fn name(&self) -> &str;

    fn generate(&self, system: &str, user: &str) -> Result<String, ProviderError>;
}

/// A validated request for one component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub component_name: String,
    /// The name as the caller wrote it, kept only when normalization changed it.
    pub original_name: Option<String>,
    pub requirements: String,
    pub framework: String,
    pub styling: String,
}

impl GenerationRequest {
    /// Validate and normalize a request. The name is converted to PascalCase.
    pub fn new(name: &str, requirements: &str) -> Result<Self, GenerationError> {
        if name.trim().is_empty() || requirements.trim().is_empty() {
            return Err(GenerationError::InvalidRequest {
                message: "component name and requirements are required".into(),
            });
        }

        let component_name = component_name(name);
        if component_name.is_empty() {
            return Err(GenerationError::InvalidRequest {
                message: format!("{name:?} does not contain a usable component name"),
            });
        }

        Ok(Self {
            original_name: (component_name != name).then(|| name.to_string()),
            component_name,
            requirements: requirements.to_string(),
            framework: DEFAULT_FRAMEWORK.into(),
            styling: DEFAULT_STYLING.into(),
        })
    }

    pub fn with_framework(mut self, framework: impl Into<String>) -> Self {
        self.framework = framework.into();
        self
    }

    pub fn with_styling(mut self, styling: impl Into<String>) -> Self {
        self.styling = styling.into();
        self
    }

    pub fn system_prompt(&self) -> String {
        format!(
            "You are an expert front-end developer. Write one production-ready component.\n\
             \n\
             Framework: {framework}\n\
             Styling: {styling}\n\
             Component name: {name}\n\
             \n\
             The component must:\n\
             - be written in TypeScript with typed props\n\
             - use semantic markup and ARIA attributes\n\
             - be a function component using hooks\n\
             - be responsive, with hover states and transitions\n\
             - follow {styling} conventions\n\
             - document its props\n\
             \n\
             Reply with the component source only: no prose, no markdown fences.",
            framework = self.framework,
            styling = self.styling,
            name = self.component_name,
        )
    }

    pub fn user_prompt(&self) -> String {
        format!(
            "Create a component called \"{name}\".\n\
             \n\
             Requirements:\n\
             {requirements}\n\
             \n\
             Use {framework} with {styling}. Keep it accessible and responsive.",
            name = self.component_name,
            requirements = self.requirements,
            framework = self.framework,
            styling = self.styling,
        )
    }
}

/// A successful generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Generation {
    pub code: String,
    pub component_name: String,
    /// Name of the provider that answered.
    pub provider: String,
    /// True when the first provider did not answer.
    pub fallback_used: bool,
}

/// Try each provider in order and return the first non-empty answer.
///
/// With a single provider its failure is reported as `Provider`; with more,
/// as `AllProvidersFailed`.
pub fn generate_with_fallback(
    providers: &[&dyn TextGenerator],
    request: &GenerationRequest,
) -> Result<Generation, GenerationError> {
    if providers.is_empty() {
        return Err(GenerationError::InvalidRequest {
            message: "no providers configured".into(),
        });
    }

    let system = request.system_prompt();
    let user = request.user_prompt();
    let mut failures = Vec::new();

    for (index, provider) in providers.iter().enumerate() {
        let outcome = provider.generate(&system, &user).and_then(|text| {
            let code = text.trim();
            if code.is_empty() {
                Err(ProviderError::new("no content generated"))
            } else {
                Ok(code.to_string())
            }
        });

        match outcome {
            Ok(code) => {
                info!(
                    "generated {} with {} ({} bytes)",
                    request.component_name,
                    provider.name(),
                    code.len()
                );
                return Ok(Generation {
                    code,
                    component_name: request.component_name.clone(),
                    provider: provider.name().to_string(),
                    fallback_used: index > 0,
                });
            }
            Err(error) => {
                warn!("provider {} failed: {error}", provider.name());
                failures.push((provider.name().to_string(), error));
            }
        }
    }

    if let [(provider, error)] = failures.as_slice() {
        return Err(GenerationError::Provider {
            provider: provider.clone(),
            message: error.message.clone(),
        });
    }
    Err(GenerationError::AllProvidersFailed { failures })
}

/// Normalize a component name to PascalCase.
///
/// Names that already are PascalCase identifiers pass through. Otherwise the
/// name is split on whitespace, `-`, and `_`, and each word is capitalized.
pub fn component_name(raw: &str) -> String {
    if is_pascal_case(raw) {
        return raw.to_string();
    }

    raw.split(|c: char| c.is_whitespace() || c == '-' || c == '_')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect::<String>(),
                None => String::new(),
            }
        })
        .collect()
}

fn is_pascal_case(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_uppercase())
        && chars.all(|c| c.is_ascii_alphanumeric())
}
