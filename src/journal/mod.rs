pub mod model;
pub mod recorder;
pub mod storage;

pub use model::{EntryLevel, JournalEntry};
pub use recorder::RunJournal;
pub use storage::JournalStorage;
