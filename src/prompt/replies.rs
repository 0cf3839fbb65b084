use super::engine::TeraEngine;
use crate::error::PromptError;
use tera::Context;

const CHECKLIST_TEMPLATE: &str = "\
I've created a rollout checklist with key safety measures. The checklist includes canary \
deployment, monitoring, and rollback procedures. Would you like me to expand any specific \
section or add additional safety measures?";

const OUTLINE_TEMPLATE: &str = "\
I've generated a 6-slide pitch outline focused on angels. It covers problem, solution, \
traction, business model, team, and ask. Would you like me to elaborate on any specific slide \
or adjust the narrative flow?";

const FORM_TEMPLATE: &str = "\
I've pre-filled the Medicare Part B form with your basic information. The form is ready for \
your review. Please verify all details before submitting. Would you like help with any \
specific sections?";

const FALLBACK_TEMPLATE: &str = "\
Based on your current context ({{ task_hypothesis }}), here's what I recommend: \
{{ next_action }}. I can help with any of these actions from the conversion strip below.";

/// Which canned reply to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display, strum::EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum Reply {
    Checklist,
    Outline,
    Form,
    Fallback,
}

impl Reply {
    fn template(self) -> &'static str {
        match self {
            Self::Checklist => CHECKLIST_TEMPLATE,
            Self::Outline => OUTLINE_TEMPLATE,
            Self::Form => FORM_TEMPLATE,
            Self::Fallback => FALLBACK_TEMPLATE,
        }
    }
}

/// The assistant's fixed narrative replies, registered once.
pub struct ReplyBook {
    engine: TeraEngine,
}

impl ReplyBook {
    pub fn new() -> Result<Self, PromptError> {
        use strum::IntoEnumIterator;

        let mut engine = TeraEngine::new();
        for reply in Reply::iter() {
            engine.add_template(&reply.to_string(), reply.template())?;
        }
        Ok(Self { engine })
    }

    /// Render a tool reply. These templates take no variables.
    pub fn tool_reply(&self, reply: Reply) -> Result<String, PromptError> {
        self.engine.render(&reply.to_string(), &Context::new())
    }

    /// Generic reply echoing the task hypothesis and the next objective.
    pub fn fallback(&self, task_hypothesis: &str, next_action: &str) -> Result<String, PromptError> {
        let mut ctx = Context::new();
        ctx.insert("task_hypothesis", task_hypothesis);
        ctx.insert("next_action", next_action);
        self.engine.render(&Reply::Fallback.to_string(), &ctx)
    }
}
