pub mod catalog;
pub mod engine;
pub mod layout;
pub mod pane;
pub mod search;

pub use catalog::EntryCatalog;
pub use engine::{EscapePolicy, Event, NavigationState, Prompt, PromptKind, handle_event};
pub use layout::{Geometry, Pane};
