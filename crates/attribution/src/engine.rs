use crate::config::{ConfigError, EngineConfig};
use crate::densify::DenseBox;
use crate::grouping::{group_colors, ColorKey};
use crate::metrics::{FrameReport, ReportRow};
use crate::prune::{outline_cloud, prune_boxes};
use crate::transform::CornerTransform;
use crate::vote::{vote, VoteOutcome};
use cloudbox_core::{Aabb, BoxCorners, PointCloud};
use hashbrown::HashSet;
use rayon::prelude::*;

/// The vote result of one color group.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorVote {
    pub key: ColorKey,
    pub group_size: usize,
    pub outcome: VoteOutcome,
}

/// Everything the engine derives from one frame.
#[derive(Debug, Clone)]
pub struct FrameOutcome {
    /// Input cloud followed by the outlines of the boxes that kept a color.
    pub merged: PointCloud,
    pub report: FrameReport,
    /// One entry per color group, in first-seen order.
    pub votes: Vec<ColorVote>,
    pub kept_boxes: Vec<usize>,
    pub removed_boxes: Vec<usize>,
    /// The input colors were missing or mismatched and got replaced.
    pub colors_substituted: bool,
}

impl FrameOutcome {
    pub fn ties(&self) -> impl Iterator<Item = &ColorVote> {
        self.votes
            .iter()
            .filter(|v| matches!(v.outcome, VoteOutcome::Tie { .. }))
    }

    pub fn unmatched(&self) -> impl Iterator<Item = &ColorVote> {
        self.votes
            .iter()
            .filter(|v| matches!(v.outcome, VoteOutcome::NoMatch))
    }
}

/// Attributes the colors of a cloud to boxes, one frame at a time.
///
/// Holds no per-frame state, so one engine serves a whole batch.
#[derive(Debug, Clone)]
pub struct AttributionEngine {
    config: EngineConfig,
    transform: CornerTransform,
}

impl AttributionEngine {
    pub fn new(config: EngineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let transform = CornerTransform::from_rows(&config.transform);
        Ok(Self { config, transform })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Transform and densify the raw boxes of a frame.
    pub fn prepare_boxes(&self, boxes: &[BoxCorners]) -> Vec<DenseBox> {
        boxes
            .iter()
            .enumerate()
            .map(|(index, raw)| {
                DenseBox::new(
                    index,
                    self.transform.apply(raw),
                    self.config.samples_per_edge,
                )
            })
            .collect()
    }

    pub fn attribute_frame(&self, cloud: &PointCloud, boxes: &[BoxCorners]) -> FrameOutcome {
        let mut original = cloud.clone();
        let colors_substituted = original.with_default_colors(self.config.default_color);
        if colors_substituted {
            tracing::warn!(
                points = original.len(),
                "cloud colors missing or mismatched; using default color"
            );
        }

        let dense = self.prepare_boxes(boxes);
        let extents: Vec<Aabb> = dense.iter().map(|b| b.extent.clone()).collect();

        let groups = group_colors(&original, &self.config.background);
        tracing::debug!(groups = groups.len(), boxes = dense.len(), "voting color groups");

        let votes: Vec<ColorVote> = groups
            .as_slice()
            .par_iter()
            .map(|group| ColorVote {
                key: group.key,
                group_size: group.indices.len(),
                outcome: vote(&original, &group.indices, &extents),
            })
            .collect();

        let mut has_color = HashSet::new();
        let mut report = FrameReport::new();
        for v in &votes {
            match &v.outcome {
                VoteOutcome::NoMatch => {
                    tracing::info!(color = %v.key, "no matching box");
                }
                VoteOutcome::Tie { count, boxes } => {
                    tracing::info!(color = %v.key, count, ?boxes, "tie between boxes");
                }
                VoteOutcome::Attributed(attribution) => {
                    has_color.insert(attribution.box_index);
                    let row = ReportRow::new(v.key, attribution, &original, &self.config.palette);
                    tracing::info!(
                        color = %v.key,
                        name = %row.name,
                        box_index = row.box_index,
                        inside = row.inside,
                        outside = row.outside,
                        min_distance = row.min_distance,
                        "box owns color"
                    );
                    report.push(row);
                }
            }
        }

        let kept = prune_boxes(&dense, &has_color);
        let kept_boxes: Vec<usize> = kept.iter().map(|b| b.index).collect();
        let removed_boxes: Vec<usize> = dense
            .iter()
            .map(|b| b.index)
            .filter(|i| !has_color.contains(i))
            .collect();
        for index in &removed_boxes {
            tracing::info!(box_index = index, "box removed: no assigned color points");
        }

        let mut merged = original;
        merged.append(&outline_cloud(kept, self.config.outline_color));

        FrameOutcome {
            merged,
            report,
            votes,
            kept_boxes,
            removed_boxes,
            colors_substituted,
        }
    }
}
