use crate::error::SessionError;
use crate::utils::ids::{now_iso, short_id};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::debug;

/// Notices kept on the stack; older ones fall off.
pub const MAX_NOTICES: usize = 5;

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum NoticeKind {
    Budget,
    Privacy,
    Risk,
    ToolError,
}

/// Pipeline layer a notice is attributed to.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Layer {
    Ce,
    Oa,
    Co,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: NoticeKind,
    pub layer: Layer,
    pub title: String,
    pub message: String,
    pub timestamp: String,
}

/// Newest-first stack of user-facing notices.
///
/// A (kind, layer) pair is shown once until a notice with that pair is
/// dismissed. Notices that fall off the end still block their pair.
#[derive(Debug, Default)]
pub struct NoticeStack {
    notices: Vec<Notice>,
    shown: HashSet<(NoticeKind, Layer)>,
}

impl NoticeStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the new notice, or `None` when its (kind, layer) is blocked.
    pub fn show(
        &mut self,
        kind: NoticeKind,
        layer: Layer,
        title: impl Into<String>,
        message: impl Into<String>,
    ) -> Option<&Notice> {
        if !self.shown.insert((kind, layer)) {
            return None;
        }
        let notice = Notice {
            id: short_id(),
            kind,
            layer,
            title: title.into(),
            message: message.into(),
            timestamp: now_iso(),
        };
        debug!(id = %notice.id, kind = %kind, layer = %layer, "notice.show");
        self.notices.insert(0, notice);
        self.notices.truncate(MAX_NOTICES);
        self.notices.first()
    }

    pub fn dismiss(&mut self, id: &str) -> Result<Notice, SessionError> {
        let pos = self
            .notices
            .iter()
            .position(|n| n.id == id)
            .ok_or_else(|| SessionError::NoticeNotFound(id.to_string()))?;
        let notice = self.notices.remove(pos);
        self.shown.remove(&(notice.kind, notice.layer));
        debug!(id = %notice.id, "notice.dismiss");
        Ok(notice)
    }

    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    pub fn is_empty(&self) -> bool {
        self.notices.is_empty()
    }
}
