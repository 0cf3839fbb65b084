mod engine;
mod replies;

pub use engine::TeraEngine;
pub use replies::{Reply, ReplyBook};
