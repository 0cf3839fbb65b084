use serde::{Deserialize, Serialize};
use serde_json::Value;
use indexmap::IndexMap;
use std::collections::BTreeMap;

/// Machine-state keys that may be surfaced outside the session.
/// A trailing `*` matches any key under that prefix.
pub const WHITELISTED_KEYS: [&str; 6] = [
    "route",
    "ui.panel",
    "ui.selection",
    "featureFlags.*",
    "local.lastPanel",
    "session.tab",
];

/// Ephemeral session/UI state entering the observer each turn.
///
/// Never patched in place: every route or flag change produces a new value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MachineState {
    pub route: String,
    pub ui: UiState,
    #[serde(default)]
    pub feature_flags: BTreeMap<String, bool>,
    /// Whitelisted snapshot of local storage.
    #[serde(default)]
    pub local: BTreeMap<String, String>,
    /// Whitelisted snapshot of session storage.
    #[serde(default)]
    pub session: BTreeMap<String, String>,
    #[serde(rename = "timeISO")]
    pub time_iso: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UiState {
    pub panel: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selection: Option<String>,
}

impl UiState {
    /// A panel is open but nothing inside it is selected.
    pub fn is_ambiguous(&self) -> bool {
        !self.panel.is_empty() && self.selection.as_deref().is_none_or(str::is_empty)
    }
}

impl MachineState {
    /// Copy of this state with a new timestamp.
    pub fn stamped(&self, time_iso: impl Into<String>) -> Self {
        Self {
            time_iso: time_iso.into(),
            ..self.clone()
        }
    }

    /// Copy of this state with `flag` set to `value` and a new timestamp.
    pub fn with_flag(&self, flag: &str, value: bool, time_iso: impl Into<String>) -> Self {
        let mut feature_flags = self.feature_flags.clone();
        feature_flags.insert(flag.to_string(), value);
        Self {
            feature_flags,
            time_iso: time_iso.into(),
            ..self.clone()
        }
    }

    /// Flattened `dotted.key -> value` view restricted to [`WHITELISTED_KEYS`].
    pub fn whitelisted(&self) -> BTreeMap<String, Value> {
        let mut flat = BTreeMap::new();
        flat.insert("route".to_string(), Value::from(self.route.as_str()));
        flat.insert("ui.panel".to_string(), Value::from(self.ui.panel.as_str()));
        if let Some(selection) = &self.ui.selection {
            flat.insert("ui.selection".to_string(), Value::from(selection.as_str()));
        }
        for (flag, on) in &self.feature_flags {
            flat.insert(format!("featureFlags.{flag}"), Value::from(*on));
        }
        for (key, value) in &self.local {
            flat.insert(format!("local.{key}"), Value::from(value.as_str()));
        }
        for (key, value) in &self.session {
            flat.insert(format!("session.{key}"), Value::from(value.as_str()));
        }
        flat.insert("timeISO".to_string(), Value::from(self.time_iso.as_str()));

        flat.into_iter()
            .filter(|(key, _)| is_whitelisted(key))
            .collect()
    }
}

fn is_whitelisted(key: &str) -> bool {
    WHITELISTED_KEYS.iter().any(|pattern| match pattern.strip_suffix('*') {
        Some(prefix) => key.starts_with(prefix),
        None => *pattern == key,
    })
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Role {
    Pm,
    Engineer,
    Founder,
    SeniorUser,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tone_pref: Option<String>,
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum VenueSource {
    Web,
    Slack,
    Docs,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Venue {
    pub source: VenueSource,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tenant: Option<String>,
}

/// Token and per-tool usage budget. Read by the pipeline, never decremented.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Budgets {
    pub tokens_left: u64,
    /// Kept in insertion order; constraints list tools in this order.
    #[serde(default)]
    pub tool_limits: IndexMap<String, u32>,
}

impl Budgets {
    /// Remaining uses for `tool`; a tool without an entry has none.
    pub fn remaining(&self, tool: &str) -> u32 {
        self.tool_limits.get(tool).copied().unwrap_or(0)
    }
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum MemoryKind {
    Fact,
    Preference,
    Commit,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryEntry {
    #[serde(rename = "t")]
    pub recorded_at: String,
    pub kind: MemoryKind,
    #[serde(rename = "v")]
    pub value: String,
}

/// Simulated long-lived user profile. Read-only inside the demo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistentState {
    pub user_id: String,
    pub profile: Profile,
    #[serde(default)]
    pub long_goals: Vec<String>,
    #[serde(default)]
    pub short_goals: Vec<String>,
    pub venue: Venue,
    pub budgets: Budgets,
    #[serde(default)]
    pub memory: Vec<MemoryEntry>,
}
