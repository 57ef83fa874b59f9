use std::collections::HashMap;
use std::sync::Arc;

use anyhow::{bail, Result};
use serde::Serialize;
use serde_json::{json, Value};
use tracing::debug;

use crate::traits::Tool;

/// Declarative description of a tool, as offered to the model.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ToolSchema {
    pub name: String,
    pub description: String,
    pub parameters: Value,
}

impl ToolSchema {
    /// Chat-completions `tools[]` entry.
    pub fn to_wire(&self) -> Value {
        json!({ "type": "function", "function": self })
    }
}

/// Name → implementation map used for dispatch.
#[derive(Default)]
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn Tool>>,
    order: Vec<String>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        let name = tool.name().to_string();
        if self.tools.insert(name.clone(), tool).is_none() {
            self.order.push(name);
        }
    }

    /// Schemas in registration order.
    pub fn schemas(&self) -> Vec<ToolSchema> {
        self.order
            .iter()
            .filter_map(|name| self.tools.get(name))
            .map(|tool| ToolSchema {
                name: tool.name().to_string(),
                description: tool.description().to_string(),
                parameters: tool.parameters(),
            })
            .collect()
    }

    /// Fail when a declared tool has no registered implementation.
    pub fn ensure_declared(&self, declared: &[&str]) -> Result<()> {
        let missing: Vec<&str> = declared
            .iter()
            .copied()
            .filter(|name| !self.tools.contains_key(*name))
            .collect();
        if !missing.is_empty() {
            bail!("declared tools without implementation: {}", missing.join(", "));
        }
        Ok(())
    }

    /// Invoke a tool by name. Unknown names resolve to an empty object.
    pub async fn dispatch(&self, name: &str, args: Value) -> Result<Value> {
        match self.tools.get(name) {
            Some(tool) => tool.execute(args).await,
            None => {
                debug!(tool = %name, "Unknown tool requested, returning empty result");
                Ok(json!({}))
            }
        }
    }
}
