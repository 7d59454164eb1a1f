pub mod email_loader;
pub mod history_stats;
pub mod record_store;

pub use email_loader::{load_batch_file, split_batch_lines, DEFAULT_MIN_LINE_LENGTH};
pub use history_stats::HistoryStats;
pub use record_store::{CategoryFilter, RecordFilter, RecordStore, SharedRecordStore};
