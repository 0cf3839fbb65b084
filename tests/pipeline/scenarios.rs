use salience::contracts::{DerivedVars, MachineState, PersistentState};
use salience::pipeline::{build_context_pack, compile_system_prompt, observe};
use salience::seed;

fn run(ms: &MachineState, ps: &PersistentState) -> (DerivedVars, String) {
    let derived = observe(ms, ps);
    let pack = build_context_pack(ms, ps, &derived);
    let prompt = compile_system_prompt(&pack);
    (derived, prompt)
}

#[test]
fn rollout_scenario_end_to_end() {
    let (derived, prompt) = run(&seed::machine_slack(), &seed::persistent());

    assert_eq!(
        derived.task_hypothesis,
        "Feature rollout planning in Slack context"
    );
    assert_eq!(
        derived.affordances,
        ["create_checklist", "validate_bindings", "list_state_keys"]
    );
    assert_eq!(derived.risk_flags, ["ambiguous_context"]);

    assert!(prompt.starts_with("# Policy\n"));
    assert!(prompt.contains("# Objectives\n- Deliver one concrete user action\n- Ship safe rollout"));
    assert!(prompt.contains("# Venue\nOperating in web context (demo)"));
    assert!(prompt.contains("- create_checklist: Ship safely with guardrails"));
    assert!(prompt.ends_with("- End with a recommended action"));
}

#[test]
fn medicare_scenario_flags_cognitive_load() {
    let (derived, prompt) = run(&seed::machine_medicare(), &seed::persistent());

    assert_eq!(derived.affordances, ["prefill_form", "create_checklist"]);
    assert_eq!(derived.risk_flags, ["cognitive_load", "ambiguous_context"]);
    assert!(prompt.contains("- Reduce cognitive load and errors"));
}

#[test]
fn critical_budget_adds_both_budget_flags_on_rollout() {
    let mut ps = seed::persistent();
    ps.budgets.tokens_left = 1500;
    let (derived, prompt) = run(&seed::machine_slack(), &ps);

    assert_eq!(
        derived.risk_flags,
        ["low_budget", "critical_budget", "ambiguous_context"]
    );
    assert!(prompt.contains("- Token budget: 1500 remaining"));
    assert!(prompt.contains("- BUDGET LOW: Disable heavy operations"));
}

#[test]
fn unknown_route_keeps_generic_reading() {
    let mut ms = seed::machine_pitch();
    ms.route = "/settings".into();
    ms.ui.selection = Some("row-1".into());
    let (derived, prompt) = run(&ms, &seed::persistent());

    assert_eq!(derived.task_hypothesis, "User is conversing");
    assert!(derived.affordances.is_empty());
    assert!(derived.risk_flags.is_empty());
    assert!(!prompt.contains("# Affordances"));
    assert!(!prompt.contains("# Tool Hints"));
}

#[test]
fn recompute_is_deterministic() {
    let ms = seed::machine_pitch();
    let ps = seed::persistent();
    assert_eq!(run(&ms, &ps), run(&ms, &ps));
}
