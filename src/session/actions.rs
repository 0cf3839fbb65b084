//! Recommended next steps offered under the chat, and the canned user
//! message each one sends.

use crate::contracts::Budgets;
use crate::pipeline::observer::{MEDICARE_ROUTE, PITCH_ROUTE, ROLLOUT_ROUTE};
use serde::{Deserialize, Serialize};

/// At most this many actions are offered at once.
pub const MAX_VISIBLE_ACTIONS: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionAction {
    pub id: String,
    pub label: String,
    pub description: String,
    pub intent: String,
    #[serde(default)]
    pub primary: bool,
    #[serde(default)]
    pub disabled: bool,
}

impl ConversionAction {
    fn new(id: &str, label: &str, description: &str, intent: &str) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            description: description.to_string(),
            intent: intent.to_string(),
            primary: false,
            disabled: false,
        }
    }

    fn primary(mut self) -> Self {
        self.primary = true;
        self
    }

    fn disabled_when_exhausted(mut self, budgets: &Budgets, tool: &str) -> Self {
        self.disabled = budgets.remaining(tool) == 0;
        self
    }
}

/// Full action list for `route`, in display order. Callers show the first
/// [`MAX_VISIBLE_ACTIONS`].
pub fn conversion_actions(
    affordances: &[String],
    route: &str,
    budgets: &Budgets,
) -> Vec<ConversionAction> {
    let has = |name: &str| affordances.iter().any(|a| a == name);
    let mut actions = Vec::new();

    if route.starts_with(ROLLOUT_ROUTE) {
        if has("create_checklist") {
            actions.push(
                ConversionAction::new(
                    "create-checklist",
                    "Create Rollout Checklist",
                    "Generate safety checklist for feature deployment",
                    "create_checklist",
                )
                .primary()
                .disabled_when_exhausted(budgets, "create_checklist"),
            );
        }
        if has("validate_bindings") {
            actions.push(ConversionAction::new(
                "validate-templates",
                "Validate Templates",
                "Check Slack message templates for errors",
                "validate_bindings",
            ));
        }
        actions.push(ConversionAction::new(
            "generate-comms",
            "Draft Communications",
            "Generate rollout announcement for team",
            "generate_outline",
        ));
    } else if route.starts_with(PITCH_ROUTE) {
        if has("generate_outline") {
            actions.push(
                ConversionAction::new(
                    "pitch-outline",
                    "Draft 10-Slide Outline",
                    "Create investor pitch structure",
                    "generate_outline",
                )
                .primary()
                .disabled_when_exhausted(budgets, "generate_outline"),
            );
        }
        actions.push(ConversionAction::new(
            "extract-proof-points",
            "Extract Proof Points",
            "Identify key traction metrics",
            "extract_proof_points",
        ));
        actions.push(ConversionAction::new(
            "refine-narrative",
            "Refine Story Arc",
            "Strengthen fundraising narrative",
            "refine_narrative",
        ));
    } else if route.starts_with(MEDICARE_ROUTE) {
        if has("prefill_form") {
            actions.push(
                ConversionAction::new(
                    "prefill-form",
                    "Pre-fill Part B Form",
                    "Auto-complete Medicare application",
                    "prefill_form",
                )
                .primary(),
            );
        }
        if has("create_checklist") {
            actions.push(ConversionAction::new(
                "create-steps",
                "Create Step Guide",
                "Simple checklist for form completion",
                "create_checklist",
            ));
        }
        actions.push(ConversionAction::new(
            "call-script",
            "Generate Call Script",
            "What to say when calling support",
            "call_script",
        ));
    }

    actions
}

/// User message sent when an action with `intent` is chosen.
pub fn intent_message(intent: &str) -> String {
    let canned = match intent {
        "create_checklist" => "Please create a rollout checklist for our feature deployment",
        "generate_outline" => "Generate a pitch outline for investors",
        "prefill_form" => "Help me pre-fill the Medicare Part B form",
        "validate_bindings" => "Validate our message templates",
        "extract_proof_points" => "Extract key proof points from our data",
        "refine_narrative" => "Help refine our fundraising narrative",
        "call_script" => "Generate a script for calling Medicare support",
        other => return format!("Please help with: {other}"),
    };
    canned.to_string()
}
