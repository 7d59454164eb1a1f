pub mod single_flow;

pub use single_flow::{SingleFlow, SingleOutcome, SingleState, GENERIC_ERROR_MESSAGE};
