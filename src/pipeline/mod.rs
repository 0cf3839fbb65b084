//! The three-stage context pipeline: observe (`observer`), assemble and
//! compile (`conductor`), converse (`conversation`).

pub mod conductor;
pub mod conversation;
pub mod observer;
pub mod tools;

pub use conductor::{build_context_pack, compile_system_prompt, select_objectives};
pub use conversation::Conversation;
pub use observer::run as observe;
pub use tools::{Tool, dispatch_named, mock_call};
