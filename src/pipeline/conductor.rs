//! Conductor/Orchestrator stage: assembles the context pack and renders it
//! into a single system prompt.

use crate::contracts::{ContextPack, DerivedVars, MachineState, MemoryKind, PersistentState};
use tracing::debug;

pub const POLICY: &str = r#"
- Respect privacy: only whitelist keys ["route","ui.panel","ui.selection","featureFlags.*"].
- Never expose secrets/tokens.
- Keep responses concise; propose 1–3 concrete actions.
"#;

pub const PERSONA: &str = "
Direct, practical, emotionally intelligent. Explain trade-offs; offer next step.
";

const BASE_OBJECTIVE: &str = "Deliver one concrete user action";
const MAX_FACTS: usize = 5;
const LOW_BUDGET_TOKENS: u64 = 2000;
const EXHAUSTED_TOOL_USES: u32 = 1;

const RESPONSE_STYLE: &str =
    "# Response Style\n- Think stepwise but answer crisply\n- End with a recommended action";

/// Base objective plus at most one scenario objective for `route`.
pub fn select_objectives(_ps: &PersistentState, route: &str) -> Vec<String> {
    let mut objectives = vec![BASE_OBJECTIVE.to_string()];
    let scenario = if route.starts_with("/slack") {
        Some("Ship safe rollout")
    } else if route.starts_with("/pitch") {
        Some("Sharpen fundraising narrative")
    } else if route.starts_with("/medicare") {
        Some("Reduce cognitive load and errors")
    } else {
        None
    };
    objectives.extend(scenario.map(ToString::to_string));
    objectives
}

pub fn build_context_pack(
    ms: &MachineState,
    ps: &PersistentState,
    derived: &DerivedVars,
) -> ContextPack {
    let objectives = select_objectives(ps, &ms.route);

    let facts: Vec<String> = ps
        .memory
        .iter()
        .filter(|m| m.kind == MemoryKind::Fact)
        .map(|m| m.value.clone())
        .take(MAX_FACTS)
        .collect();

    let mut constraints = vec![
        "Respect user privacy and data boundaries".to_string(),
        format!("Token budget: {} remaining", ps.budgets.tokens_left),
    ];
    if ps.budgets.tokens_left < LOW_BUDGET_TOKENS {
        constraints.push("BUDGET LOW: Disable heavy operations".to_string());
    }
    for (tool, limit) in &ps.budgets.tool_limits {
        if *limit <= EXHAUSTED_TOOL_USES {
            constraints.push(format!("Tool {tool} nearly exhausted ({limit} uses left)"));
        }
    }

    let venue_note = match ps.venue.tenant.as_deref() {
        Some(tenant) if !tenant.is_empty() => {
            format!("Operating in {} context ({tenant})", ps.venue.source)
        }
        _ => format!("Operating in {} context", ps.venue.source),
    };

    debug!(
        route = %ms.route,
        objectives = objectives.len(),
        facts = facts.len(),
        constraints = constraints.len(),
        "co.build_context_pack"
    );

    ContextPack {
        policy: POLICY.to_string(),
        persona: PERSONA.to_string(),
        objectives,
        venue_note,
        derived: derived.clone(),
        facts,
        constraints,
    }
}

/// Render the pack as a prompt. Sections appear in fixed order separated by
/// a blank line; optional sections with nothing to say are left out.
pub fn compile_system_prompt(ctx: &ContextPack) -> String {
    let derived = &ctx.derived;
    let mut sections = vec![
        section("Policy", &ctx.policy),
        section("Persona", &ctx.persona),
        section("Objectives", &bullets(&ctx.objectives)),
        section("Venue", &ctx.venue_note),
        section("Situation", &derived.recap),
    ];

    if !derived.task_hypothesis.is_empty() {
        sections.push(format!("# Task Hypothesis\n{}", derived.task_hypothesis));
    }
    if !ctx.facts.is_empty() {
        sections.push(format!("# Known Facts\n{}", bullets(&ctx.facts)));
    }
    if !ctx.constraints.is_empty() {
        sections.push(format!("# Constraints\n{}", bullets(&ctx.constraints)));
    }
    if !derived.affordances.is_empty() {
        sections.push(format!("# Affordances\n{}", bullets(&derived.affordances)));
    }
    if !derived.suggested_tools.is_empty() {
        let hints: Vec<String> = derived
            .suggested_tools
            .iter()
            .map(|t| format!("- {}: {}", t.name, t.reason))
            .collect();
        sections.push(format!("# Tool Hints\n{}", hints.join("\n")));
    }
    sections.push(RESPONSE_STYLE.to_string());

    sections.join("\n\n")
}

fn section(heading: &str, body: &str) -> String {
    format!("# {heading}\n{body}").trim().to_string()
}

fn bullets(items: &[String]) -> String {
    items
        .iter()
        .map(|item| format!("- {item}"))
        .collect::<Vec<_>>()
        .join("\n")
}
