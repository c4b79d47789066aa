#![forbid(unsafe_code)]

pub mod batch;
pub mod error;

pub use batch::{process_frame, run_batch, BatchSummary, RunConfig};
pub use error::FrameError;
