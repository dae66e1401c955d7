pub mod ingestion;
pub mod window;

pub use ingestion::{IngestionService, RunSummary, SymbolOutcome, SymbolReport};
pub use window::{compute_window, truncate_to_hour, FetchWindow, WindowDecision};
