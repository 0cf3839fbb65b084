//! Record shapes shared by the observer, conductor, and conversation stages.

mod derived;
mod events;
mod message;
mod state;

pub use derived::{ContextPack, DerivedVars, SuggestedTool};
pub use events::{BusEvent, EventType, MessageEvent, StateChangeEvent, ToolEvent, to_payload};
pub use message::{Message, Sender, ToolCallRecord};
pub use state::{
    Budgets, MachineState, MemoryEntry, MemoryKind, PersistentState, Profile, Role, UiState,
    Venue, VenueSource, WHITELISTED_KEYS,
};
