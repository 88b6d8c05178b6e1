//! Capabilities advertised by discovered agents.

use super::AgentDomainError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeSet;

/// Worked example attached to a capability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapabilityExample {
    /// Example input payload.
    pub input: Value,
    /// Expected output, when the agent published one.
    pub output: Option<Value>,
}

impl CapabilityExample {
    /// Reads an example from an `{"input": .., "output": ..}` object.
    ///
    /// Values that are not objects are treated as a bare input.
    #[must_use]
    pub fn from_value(value: &Value) -> Self {
        match value.as_object() {
            Some(object) if object.contains_key("input") => Self {
                input: object.get("input").cloned().unwrap_or(Value::Null),
                output: object.get("output").cloned(),
            },
            _ => Self {
                input: value.clone(),
                output: None,
            },
        }
    }
}

/// A named function an agent advertises.
///
/// Names and tags are trimmed and lowercased at construction so that lookups
/// are case-insensitive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Capability {
    name: String,
    description: String,
    input_schema: Option<Value>,
    output_schema: Option<Value>,
    examples: Vec<CapabilityExample>,
    tags: BTreeSet<String>,
}

impl Capability {
    /// Creates a capability with no schemas, examples, or tags.
    ///
    /// # Errors
    ///
    /// Returns [`AgentDomainError::EmptyCapabilityName`] when the name is
    /// empty after trimming.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Result<Self, AgentDomainError> {
        let normalized = name.into().trim().to_lowercase();
        if normalized.is_empty() {
            return Err(AgentDomainError::EmptyCapabilityName);
        }
        Ok(Self {
            name: normalized,
            description: description.into().trim().to_owned(),
            input_schema: None,
            output_schema: None,
            examples: Vec::new(),
            tags: BTreeSet::new(),
        })
    }

    /// Attaches the input schema.
    #[must_use]
    pub fn with_input_schema(mut self, schema: Option<Value>) -> Self {
        self.input_schema = schema;
        self
    }

    /// Attaches the output schema.
    #[must_use]
    pub fn with_output_schema(mut self, schema: Option<Value>) -> Self {
        self.output_schema = schema;
        self
    }

    /// Replaces the worked examples.
    #[must_use]
    pub fn with_examples(mut self, examples: Vec<CapabilityExample>) -> Self {
        self.examples = examples;
        self
    }

    /// Adds tags. Blank tags are ignored.
    #[must_use]
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.tags.extend(
            tags.into_iter()
                .map(|tag| tag.as_ref().trim().to_lowercase())
                .filter(|tag| !tag.is_empty()),
        );
        self
    }

    /// Returns the normalized capability name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the input schema, if any.
    #[must_use]
    pub const fn input_schema(&self) -> Option<&Value> {
        self.input_schema.as_ref()
    }

    /// Returns the output schema, if any.
    #[must_use]
    pub const fn output_schema(&self) -> Option<&Value> {
        self.output_schema.as_ref()
    }

    /// Returns the worked examples in publication order.
    #[must_use]
    pub fn examples(&self) -> &[CapabilityExample] {
        &self.examples
    }

    /// Returns the normalized tags.
    #[must_use]
    pub const fn tags(&self) -> &BTreeSet<String> {
        &self.tags
    }

    /// Returns whether `token` names this capability or one of its tags.
    ///
    /// Comparison ignores case and surrounding whitespace.
    #[must_use]
    pub fn matches(&self, token: &str) -> bool {
        let needle = token.trim().to_lowercase();
        !needle.is_empty() && (self.name == needle || self.tags.contains(&needle))
    }
}
