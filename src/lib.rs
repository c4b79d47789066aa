#![forbid(unsafe_code)]

//! Attribute colored point-cloud segments to 3D bounding boxes.
//!
//! Facade over the workspace crates; see [`attribution::AttributionEngine`]
//! for the per-frame entry point and [`cli::run_batch`] for directory batches.

pub use cloudbox_attribution as attribution;
pub use cloudbox_cli as cli;
pub use cloudbox_core as cloud;
pub use cloudbox_io as io;

pub use cloudbox_attribution::{AttributionEngine, EngineConfig, FrameOutcome, FrameReport};
pub use cloudbox_core::{Aabb, BoxCorners, Colors, PointCloud};
