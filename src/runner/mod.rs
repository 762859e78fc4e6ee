pub mod coordinator;
pub mod reporter;
pub mod types;

pub use coordinator::RunCoordinator;
pub use reporter::TestReporter;
pub use types::{FailedTest, RunReport, RunSummary, TestOutcome};
