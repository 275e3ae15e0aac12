pub mod store;
pub mod types;

pub use store::HistoryStore;
pub use types::HistoryEntry;
