//! Observer/Analyst stage: machine + persistent state in, derived variables out.

use crate::contracts::{DerivedVars, MachineState, PersistentState, Role, SuggestedTool};
use tracing::debug;

pub const ROLLOUT_ROUTE: &str = "/slack/rollout";
pub const PITCH_ROUTE: &str = "/pitch";
pub const MEDICARE_ROUTE: &str = "/medicare";

/// Below this many tokens the rollout scenario flags `low_budget`.
pub const LOW_BUDGET_TOKENS: u64 = 3000;
/// Below this many tokens every scenario flags `critical_budget`.
pub const CRITICAL_BUDGET_TOKENS: u64 = 2000;

/// Derive the situational read for the current state.
///
/// Pure: the same inputs always yield the same output. Risk flags are
/// appended in rule order and never deduplicated, so the rollout branch and
/// the global budget check can both fire.
pub fn run(ms: &MachineState, ps: &PersistentState) -> DerivedVars {
    let mut derived = DerivedVars {
        task_hypothesis: "User is conversing".to_string(),
        affordances: Vec::new(),
        risk_flags: Vec::new(),
        suggested_tools: Vec::new(),
        recap: format!(
            "At {}, route {}, panel {}",
            ms.time_iso, ms.route, ms.ui.panel
        ),
        query_plan: None,
    };

    if ms.route.starts_with(ROLLOUT_ROUTE) {
        derived.task_hypothesis = "Feature rollout planning in Slack context".to_string();
        derived.affordances = strings(&["create_checklist", "validate_bindings", "list_state_keys"]);
        derived.suggested_tools = vec![
            SuggestedTool::new("create_checklist", "Ship safely with guardrails"),
            SuggestedTool::new("validate_bindings", "Avoid broken templates"),
        ];
        if ps.budgets.tokens_left < LOW_BUDGET_TOKENS {
            derived.risk_flags.push("low_budget".to_string());
        }
    } else if ms.route.starts_with(PITCH_ROUTE) {
        derived.task_hypothesis = "Fundraising narrative drafting".to_string();
        derived.affordances = strings(&["generate_outline", "validate_bindings"]);
        derived.suggested_tools = vec![SuggestedTool::new(
            "generate_outline",
            "Produce slide flow quickly",
        )];
        if ps
            .long_goals
            .iter()
            .any(|goal| goal.to_lowercase().contains("pre-seed"))
        {
            derived.recap.push_str(" | Active fundraising goal detected");
        }
    } else if ms.route.starts_with(MEDICARE_ROUTE) {
        derived.task_hypothesis = "Form completion assistance (older user)".to_string();
        derived.affordances = strings(&["prefill_form", "create_checklist"]);
        derived.risk_flags = strings(&["cognitive_load"]);
        derived.suggested_tools = vec![SuggestedTool::new(
            "prefill_form",
            "Reduce errors and confusion",
        )];
        if ps.profile.role == Role::SeniorUser {
            derived.risk_flags.push("senior_user_complexity".to_string());
        }
    }

    if ps.budgets.tokens_left < CRITICAL_BUDGET_TOKENS {
        derived.risk_flags.push("critical_budget".to_string());
    }
    if ms.ui.is_ambiguous() {
        derived.risk_flags.push("ambiguous_context".to_string());
    }

    debug!(
        route = %ms.route,
        hypothesis = %derived.task_hypothesis,
        risks = ?derived.risk_flags,
        "oa.run"
    );
    derived
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(ToString::to_string).collect()
}
