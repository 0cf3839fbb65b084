//! Mock tool catalog. Every call returns a canned payload; nothing runs.

use crate::error::ToolError;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use indexmap::IndexMap;
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StateScope {
    Local,
    Session,
    Machine,
}

/// A tool invocation with typed arguments. Serializes as
/// `{"name": "...", "args": {...}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "name", content = "args", rename_all = "snake_case")]
pub enum Tool {
    ListStateKeys {
        scope: StateScope,
    },
    ValidateBindings {
        template: String,
    },
    GenerateOutline {
        topic: String,
        audience: String,
    },
    CreateChecklist {
        context: String,
        items: Vec<String>,
    },
    PrefillForm {
        #[serde(rename = "formId")]
        form_id: String,
        fields: IndexMap<String, String>,
    },
}

pub const TOOL_NAMES: [&str; 5] = [
    "list_state_keys",
    "validate_bindings",
    "generate_outline",
    "create_checklist",
    "prefill_form",
];

impl Tool {
    pub fn name(&self) -> &'static str {
        match self {
            Self::ListStateKeys { .. } => "list_state_keys",
            Self::ValidateBindings { .. } => "validate_bindings",
            Self::GenerateOutline { .. } => "generate_outline",
            Self::CreateChecklist { .. } => "create_checklist",
            Self::PrefillForm { .. } => "prefill_form",
        }
    }

    /// Parse a loosely named invocation into its typed form.
    pub fn from_named(name: &str, args: Value) -> Result<Self, ToolError> {
        if !TOOL_NAMES.contains(&name) {
            return Err(ToolError::NotFound {
                name: name.to_string(),
            });
        }
        serde_json::from_value(json!({ "name": name, "args": args })).map_err(|e| {
            ToolError::InvalidArgs {
                name: name.to_string(),
                message: e.to_string(),
            }
        })
    }

    /// The `args` object as loose JSON.
    pub fn args(&self) -> Value {
        serde_json::to_value(self)
            .ok()
            .and_then(|mut v| v.get_mut("args").map(Value::take))
            .unwrap_or(Value::Null)
    }
}

/// Canned result for `tool`.
pub fn mock_call(tool: &Tool) -> Value {
    match tool {
        Tool::CreateChecklist { .. } => json!({
            "ok": true,
            "checklist": [
                "Set canary rollout to 5%",
                "Monitor error rates and metrics",
                "Prepare rollback procedure",
                "Draft communication template",
                "Set success criteria"
            ]
        }),
        Tool::GenerateOutline { .. } => json!({
            "ok": true,
            "outline": [
                "Problem & Opportunity",
                "Solution Overview",
                "Market Size & Traction",
                "Business Model",
                "Team & Execution",
                "Financials & Ask"
            ]
        }),
        Tool::PrefillForm { form_id, fields } => json!({
            "ok": true,
            "fields_filled": fields.keys().collect::<Vec<_>>(),
            "form_url": format!("/forms/{form_id}")
        }),
        Tool::ValidateBindings { .. } => json!({
            "ok": true,
            "validation": "Template syntax valid",
            "warnings": []
        }),
        Tool::ListStateKeys { .. } => json!({
            "ok": true,
            "keys": ["route", "ui.panel", "ui.selection", "featureFlags.evalMode"]
        }),
    }
}

/// Dispatch by loose name and arguments. Unknown names yield
/// `{"ok": false, "error": "Unknown tool"}` rather than an error.
pub fn dispatch_named(name: &str, args: Value) -> Value {
    match Tool::from_named(name, args) {
        Ok(tool) => mock_call(&tool),
        Err(ToolError::NotFound { .. }) => {
            warn!(tool = %name, "tool.unknown");
            json!({ "ok": false, "error": "Unknown tool" })
        }
        Err(e) => {
            warn!(tool = %name, error = %e, "tool.bad_args");
            json!({ "ok": false, "error": e.to_string() })
        }
    }
}
