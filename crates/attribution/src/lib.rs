#![forbid(unsafe_code)]

//! Attribution of colored point-cloud segments to 3D bounding boxes.
//!
//! Boxes are moved into the cloud frame, their edges densified into outline
//! points, the cloud's points grouped by quantized color, and every group
//! voted onto the box whose axis-aligned extent holds most of its points.
//! Boxes that win no color are dropped from the merged output.

pub mod config;
pub mod densify;
pub mod engine;
pub mod grouping;
pub mod metrics;
pub mod prune;
pub mod transform;
pub mod vote;

pub use config::{BackgroundColor, ConfigError, EngineConfig, PaletteEntry};
pub use densify::{densify_edges, DenseBox, BOX_EDGES};
pub use engine::{AttributionEngine, ColorVote, FrameOutcome};
pub use grouping::{group_colors, ColorGroup, ColorGroups, ColorKey};
pub use metrics::{color_name, min_distance_to_origin, FrameReport, ReportRow};
pub use prune::{outline_cloud, prune_boxes};
pub use transform::CornerTransform;
pub use vote::{vote, Attribution, VoteOutcome};
