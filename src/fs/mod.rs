pub mod entry;
pub mod listing;
pub mod ops;
pub mod preview;
pub mod properties;

pub use entry::Entry;
pub use listing::{ListOptions, list_directory};
