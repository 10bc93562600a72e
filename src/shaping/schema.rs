//! Minimal repair of tool parameter schemas for strict-object validation.
//!
//! The provider rejects `{"type": "object"}` parameter schemas that carry no
//! `properties` key (common for MCP tools that take no arguments). The fix
//! applied here is exactly one insertion, `properties: {}`; every other
//! schema shape passes through byte-for-byte. This is not a schema
//! completer and never fails: schemas it does not understand are left alone.

use serde_json::{Map, Value};
use tracing::debug;

use crate::types::tool::ToolDefinition;

/// Repair a single parameters schema in place.
///
/// Returns `true` when `properties: {}` was inserted.
pub fn normalize_parameters(parameters: &mut Value) -> bool {
    let Some(schema) = parameters.as_object_mut() else {
        return false;
    };

    let is_object = schema.get("type").and_then(Value::as_str) == Some("object");
    if !is_object || schema.contains_key("properties") {
        return false;
    }

    schema.insert("properties".to_string(), Value::Object(Map::new()));
    true
}

/// Repair every declaration of an optional tool list in place.
///
/// Absent tools stay absent. Returns the number of declarations changed.
pub fn normalize_tools(tools: &mut Option<Vec<ToolDefinition>>) -> usize {
    let Some(tools) = tools.as_mut() else {
        return 0;
    };

    let mut repaired = 0;
    for tool in tools.iter_mut() {
        let Some(parameters) = tool.function.parameters.as_mut() else {
            continue;
        };
        if normalize_parameters(parameters) {
            debug!(tool = tool.function.name.as_str(), "filled missing schema properties");
            repaired += 1;
        }
    }
    repaired
}

/// Normalized copy of `tools`; the input is not modified.
pub fn normalized_tools(tools: &[ToolDefinition]) -> Vec<ToolDefinition> {
    let mut copy = Some(tools.to_vec());
    normalize_tools(&mut copy);
    copy.unwrap_or_default()
}
