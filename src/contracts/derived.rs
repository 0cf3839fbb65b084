use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuggestedTool {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub args: Option<Map<String, Value>>,
    pub reason: String,
}

impl SuggestedTool {
    pub fn new(name: &str, reason: &str) -> Self {
        Self {
            name: name.to_string(),
            args: None,
            reason: reason.to_string(),
        }
    }
}

/// Observer output: a situational read of the current session.
///
/// Recomputed from scratch on every relevant state change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DerivedVars {
    pub task_hypothesis: String,
    pub affordances: Vec<String>,
    /// Appended in rule order; duplicates are kept.
    pub risk_flags: Vec<String>,
    pub suggested_tools: Vec<SuggestedTool>,
    pub recap: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query_plan: Option<Vec<String>>,
}

impl DerivedVars {
    pub fn has_affordance(&self, name: &str) -> bool {
        self.affordances.iter().any(|a| a == name)
    }

    pub fn has_risk(&self, flag: &str) -> bool {
        self.risk_flags.iter().any(|f| f == flag)
    }
}

/// Conductor output handed to the conversation stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContextPack {
    pub policy: String,
    pub persona: String,
    pub objectives: Vec<String>,
    pub venue_note: String,
    pub derived: DerivedVars,
    /// At most five `fact` memories, in stored order.
    pub facts: Vec<String>,
    /// Advisory budget/privacy notes; never enforced.
    pub constraints: Vec<String>,
}
