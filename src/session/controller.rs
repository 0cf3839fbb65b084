//! Drives one demo session: holds the state the pipeline reads, recomputes
//! the derived view after every change, and reports changes on the bus.

use super::actions::{ConversionAction, MAX_VISIBLE_ACTIONS, conversion_actions, intent_message};
use super::notices::{Layer, Notice, NoticeKind, NoticeStack};
use crate::bus::EventBus;
use crate::config::ReplyDelay;
use crate::contracts::{
    BusEvent, ContextPack, DerivedVars, EventType, MachineState, Message, MessageEvent,
    PersistentState, Sender, StateChangeEvent, to_payload,
};
use crate::error::Result;
use crate::pipeline::observer::CRITICAL_BUDGET_TOKENS;
use crate::pipeline::{Conversation, build_context_pack, compile_system_prompt, observe};
use crate::seed;
use crate::utils::ids::now_iso;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

const COGNITIVE_LOAD: &str = "cognitive_load";

pub struct DemoSession {
    id: String,
    bus: Arc<EventBus>,
    conversation: Conversation,
    delay: ReplyDelay,

    persistent: PersistentState,
    machine: MachineState,
    derived: DerivedVars,
    pack: ContextPack,
    prompt: String,

    messages: Vec<Message>,
    notices: NoticeStack,
}

impl DemoSession {
    pub fn new(
        bus: Arc<EventBus>,
        persistent: PersistentState,
        machine: MachineState,
        delay: ReplyDelay,
    ) -> Result<Self> {
        let conversation = Conversation::new(Arc::clone(&bus))?;
        let derived = observe(&machine, &persistent);
        let pack = build_context_pack(&machine, &persistent, &derived);
        let prompt = compile_system_prompt(&pack);

        let mut session = Self {
            id: Uuid::new_v4().to_string(),
            bus,
            conversation,
            delay,
            persistent,
            machine,
            derived,
            pack,
            prompt,
            messages: Vec::new(),
            notices: NoticeStack::new(),
        };
        session.raise_notices();
        info!(session = %session.id, route = %session.machine.route, "session.start");
        Ok(session)
    }

    /// Session over the seed profile, starting on the scenario for `route`.
    pub fn seeded(bus: Arc<EventBus>, route: &str, delay: ReplyDelay) -> Result<Self> {
        let machine = seed::machine_for_route(route).stamped(now_iso());
        Self::new(bus, seed::persistent(), machine, delay)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn bus(&self) -> &Arc<EventBus> {
        &self.bus
    }

    pub fn persistent(&self) -> &PersistentState {
        &self.persistent
    }

    pub fn machine(&self) -> &MachineState {
        &self.machine
    }

    pub fn derived(&self) -> &DerivedVars {
        &self.derived
    }

    pub fn context_pack(&self) -> &ContextPack {
        &self.pack
    }

    pub fn system_prompt(&self) -> &str {
        &self.prompt
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn notices(&self) -> &[Notice] {
        self.notices.notices()
    }

    pub fn dismiss_notice(&mut self, id: &str) -> Result<Notice> {
        Ok(self.notices.dismiss(id)?)
    }

    /// Switch to the scenario family of `route`. Chat history is cleared.
    ///
    /// The event reports `route` as requested even when the family seed
    /// carries a different one (e.g. `/slack` loads `/slack/rollout`).
    pub fn change_route(&mut self, route: &str) -> BusEvent {
        let old = std::mem::replace(
            &mut self.machine,
            seed::machine_for_route(route).stamped(now_iso()),
        );
        self.messages.clear();
        info!(from = %old.route, to = %route, "session.route");

        let event =
            self.emit_state_change("route", Some(Value::from(old.route)), Value::from(route));
        self.recompute();
        event
    }

    pub fn toggle_feature_flag(&mut self, flag: &str, value: bool) -> BusEvent {
        let old = self.machine.feature_flags.get(flag).map(|v| Value::from(*v));
        self.machine = self.machine.with_flag(flag, value, now_iso());
        debug!(flag = %flag, value, "session.flag");

        let event = self.emit_state_change(&format!("featureFlags.{flag}"), old, Value::from(value));
        self.recompute();
        event
    }

    /// Submit `text` as the user and wait for the assistant reply.
    pub async fn send_message(&mut self, text: &str) -> Result<Message> {
        self.messages.push(Message::user(text));
        self.emit_message(text, Sender::User);

        let pause = self.delay.sample();
        if !pause.is_zero() {
            tokio::time::sleep(pause).await;
        }

        let reply = self.conversation.turn(text, &self.pack)?;
        self.messages.push(reply.clone());
        self.emit_message(&reply.text, Sender::Assistant);
        Ok(reply)
    }

    /// Send the canned message for a conversion action's `intent`.
    pub async fn run_action(&mut self, intent: &str) -> Result<Message> {
        let text = intent_message(intent);
        self.send_message(&text).await
    }

    /// Actions offered for the current state, at most three.
    pub fn actions(&self) -> Vec<ConversionAction> {
        let mut actions = conversion_actions(
            &self.derived.affordances,
            &self.machine.route,
            &self.persistent.budgets,
        );
        actions.truncate(MAX_VISIBLE_ACTIONS);
        actions
    }

    pub fn heartbeat(&self) -> BusEvent {
        self.bus.emit(EventType::Tick, Map::new())
    }

    pub fn whitelisted_state(&self) -> BTreeMap<String, Value> {
        self.machine.whitelisted()
    }

    fn recompute(&mut self) {
        self.derived = observe(&self.machine, &self.persistent);
        self.pack = build_context_pack(&self.machine, &self.persistent, &self.derived);
        self.prompt = compile_system_prompt(&self.pack);
        self.raise_notices();
    }

    fn raise_notices(&mut self) {
        let tokens_left = self.persistent.budgets.tokens_left;
        if tokens_left < CRITICAL_BUDGET_TOKENS {
            self.notices.show(
                NoticeKind::Budget,
                Layer::Co,
                "Low Budget Warning",
                format!("Only {tokens_left} tokens remaining. Heavy tools will be disabled."),
            );
        }
        if self.derived.has_risk(COGNITIVE_LOAD) {
            self.notices.show(
                NoticeKind::Risk,
                Layer::Oa,
                "Cognitive Load Risk",
                "This interface may be complex for older users. Consider simplifying interactions.",
            );
        }
    }

    fn emit_state_change(&self, key: &str, old_value: Option<Value>, new_value: Value) -> BusEvent {
        self.bus.emit(
            EventType::StateChanged,
            to_payload(&StateChangeEvent {
                key: key.to_string(),
                old_value,
                new_value,
            }),
        )
    }

    fn emit_message(&self, text: &str, sender: Sender) {
        let _ = self.bus.emit(
            EventType::MessageSubmitted,
            to_payload(&MessageEvent {
                text: text.to_string(),
                sender,
            }),
        );
    }
}
