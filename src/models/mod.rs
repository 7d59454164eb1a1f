pub mod batch_state;
pub mod classification;
pub mod record;

pub use batch_state::{BatchState, BatchSummary};
pub use classification::{
    EmailCategory, EmailClassification, Priority, Sentiment, ServiceClassification,
};
pub use record::EmailRecord;
