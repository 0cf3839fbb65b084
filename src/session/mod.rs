pub mod actions;
pub mod controller;
pub mod notices;

pub use actions::{ConversionAction, conversion_actions, intent_message};
pub use controller::DemoSession;
pub use notices::{Layer, Notice, NoticeKind, NoticeStack};
