//! Hand-authored scenario data standing in for a real profile store.

use crate::contracts::{
    Budgets, MachineState, MemoryEntry, MemoryKind, PersistentState, Profile, Role, UiState,
    Venue, VenueSource,
};
use crate::utils::ids::now_iso;
use indexmap::IndexMap;
use std::collections::BTreeMap;

/// Timestamp shared by all machine-state seeds.
pub const SEED_TIME: &str = "2025-11-07T22:42:24.000Z";

pub fn persistent() -> PersistentState {
    let recorded_at = now_iso();
    PersistentState {
        user_id: "aqeel".to_string(),
        profile: Profile {
            role: Role::Founder,
            tone_pref: Some("direct".to_string()),
        },
        long_goals: vec!["Ship MVP".to_string(), "Close $250k pre-seed".to_string()],
        short_goals: vec![
            "Draft rollout checklist".to_string(),
            "Refine pitch story".to_string(),
        ],
        venue: Venue {
            source: VenueSource::Web,
            tenant: Some("demo".to_string()),
        },
        budgets: Budgets {
            tokens_left: 12_000,
            tool_limits: IndexMap::from([
                ("generate_outline".to_string(), 3),
                ("create_checklist".to_string(), 5),
            ]),
        },
        memory: vec![
            MemoryEntry {
                recorded_at: recorded_at.clone(),
                kind: MemoryKind::Preference,
                value: "Prefers concrete actions".to_string(),
            },
            MemoryEntry {
                recorded_at,
                kind: MemoryKind::Fact,
                value: "Target audience includes angels".to_string(),
            },
        ],
    }
}

fn machine(route: &str, tab: &str) -> MachineState {
    MachineState {
        route: route.to_string(),
        ui: UiState {
            panel: "editor".to_string(),
            selection: None,
        },
        feature_flags: BTreeMap::from([("evalMode".to_string(), true)]),
        local: BTreeMap::from([("lastPanel".to_string(), "editor".to_string())]),
        session: BTreeMap::from([("tab".to_string(), tab.to_string())]),
        time_iso: SEED_TIME.to_string(),
    }
}

pub fn machine_slack() -> MachineState {
    machine("/slack/rollout", "slack")
}

pub fn machine_pitch() -> MachineState {
    machine("/pitch", "pitch")
}

pub fn machine_medicare() -> MachineState {
    machine("/medicare", "medicare")
}

/// Seed for the scenario family of `route`: `/slack*` and `/pitch*` map to
/// their seeds, anything else falls back to the medicare seed.
pub fn machine_for_route(route: &str) -> MachineState {
    if route.starts_with("/slack") {
        machine_slack()
    } else if route.starts_with("/pitch") {
        machine_pitch()
    } else {
        machine_medicare()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn route_families() {
        assert_eq!(machine_for_route("/slack").route, "/slack/rollout");
        assert_eq!(machine_for_route("/pitch/v2").route, "/pitch");
        assert_eq!(machine_for_route("/unknown").route, "/medicare");
    }

    #[test]
    fn seeds_share_static_time() {
        for ms in [machine_slack(), machine_pitch(), machine_medicare()] {
            assert_eq!(ms.time_iso, SEED_TIME);
            assert!(ms.ui.selection.is_none());
        }
    }
}
