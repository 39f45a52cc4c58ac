pub mod events;

pub use events::{Event, EventBuilder, EventBus, EventHandler, EventPayload, EventType};
