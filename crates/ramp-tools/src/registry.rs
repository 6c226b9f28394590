use ramp_llm::provider::ToolDefinition;

/// A tool exposed to the LLM, described by a JSON Schema derived from its
/// typed parameter struct.
#[derive(Debug, Clone)]
pub struct ToolDef {
    pub id: &'static str,
    pub description: &'static str,
    pub schema: schemars::Schema,
}

impl ToolDef {
    /// Convert to the provider-level definition, stripping schema metadata
    /// the API does not accept.
    #[must_use]
    pub fn to_definition(&self) -> ToolDefinition {
        let mut params = serde_json::to_value(&self.schema).unwrap_or_default();
        if let serde_json::Value::Object(ref mut map) = params {
            map.remove("$schema");
            map.remove("title");
        }
        ToolDefinition {
            name: self.id.to_string(),
            description: self.description.to_string(),
            parameters: params,
        }
    }
}

#[derive(Debug, Default)]
pub struct ToolRegistry {
    tools: Vec<ToolDef>,
}

impl ToolRegistry {
    #[must_use]
    pub fn from_definitions(tools: Vec<ToolDef>) -> Self {
        Self { tools }
    }

    #[must_use]
    pub fn tools(&self) -> &[ToolDef] {
        &self.tools
    }

    #[must_use]
    pub fn find(&self, id: &str) -> Option<&ToolDef> {
        self.tools.iter().find(|t| t.id == id)
    }

    /// Provider-level definitions for every registered tool.
    #[must_use]
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools.iter().map(ToolDef::to_definition).collect()
    }
}
