use crate::error::FrameError;
use cloudbox_attribution::{AttributionEngine, FrameOutcome};
use cloudbox_io::{
    box_file_path, discover_clouds, read_boxes, read_ply, write_ply, write_ply_binary,
    FrameCandidate, ReportBlock,
};
use std::collections::BTreeSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Where a batch reads its inputs and writes its outputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    pub clouds_dir: PathBuf,
    pub boxes_dir: PathBuf,
    pub output_dir: PathBuf,
    /// Write output clouds as binary PLY instead of ASCII.
    pub binary_output: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchSummary {
    /// One block per matched frame that attributed at least one color.
    pub blocks: Vec<ReportBlock>,
    pub processed: usize,
    pub skipped: usize,
    pub failed: usize,
    /// Box files with no cloud file of the same frame.
    pub orphan_boxes: Vec<PathBuf>,
}

impl BatchSummary {
    fn record(&mut self, err: &FrameError) {
        if err.is_skip() {
            tracing::warn!("{}", err);
            self.skipped += 1;
        } else {
            tracing::error!("{}", err);
            self.failed += 1;
        }
    }
}

/// Run the engine on one matched frame and persist its augmented cloud.
pub fn process_frame(
    engine: &AttributionEngine,
    frame: u64,
    cloud_path: &Path,
    boxes_path: &Path,
    output_path: &Path,
    binary_output: bool,
) -> Result<FrameOutcome, FrameError> {
    let cloud = read_ply(cloud_path).map_err(|source| FrameError::CloudRead { frame, source })?;
    let boxes = read_boxes(boxes_path).map_err(|source| FrameError::BoxRead { frame, source })?;

    let outcome = engine.attribute_frame(&cloud, &boxes);

    let written = if binary_output {
        write_ply_binary(output_path, &outcome.merged)
    } else {
        write_ply(output_path, &outcome.merged)
    };
    written.map_err(|source| FrameError::CloudWrite { frame, source })?;
    tracing::info!(frame, path = %output_path.display(), "saved");

    Ok(outcome)
}

fn companion(candidate: &FrameCandidate, boxes_dir: &Path) -> Result<(u64, PathBuf), FrameError> {
    let frame = candidate.frame.ok_or_else(|| FrameError::Unnumbered {
        path: candidate.cloud_path.clone(),
    })?;
    let expected = box_file_path(boxes_dir, frame);
    if !expected.is_file() {
        return Err(FrameError::MissingCompanionData { frame, expected });
    }
    Ok((frame, expected))
}

/// Box files named `BBoxes_<n>.json` whose frame has no cloud.
fn orphan_box_files(boxes_dir: &Path, frames: &BTreeSet<u64>) -> io::Result<Vec<PathBuf>> {
    let mut orphans = Vec::new();
    for entry in fs::read_dir(boxes_dir)? {
        let path = entry?.path();
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        let Some(stem) = name
            .strip_prefix("BBoxes_")
            .and_then(|s| s.strip_suffix(".json"))
        else {
            continue;
        };
        if let Ok(frame) = stem.parse::<u64>() {
            if !frames.contains(&frame) {
                orphans.push(path);
            }
        }
    }
    orphans.sort();
    Ok(orphans)
}

/// Process every cloud of `run.clouds_dir` in file-name order.
///
/// Per-frame problems are logged and counted; only failing to list the cloud
/// directory or create the output directory is returned as an error. The
/// orphan box scan is best effort.
pub fn run_batch(run: &RunConfig, engine: &AttributionEngine) -> io::Result<BatchSummary> {
    fs::create_dir_all(&run.output_dir)?;
    let candidates = discover_clouds(&run.clouds_dir)?;

    let mut summary = BatchSummary::default();
    let mut frames_seen = BTreeSet::new();
    let mut image_count = 0usize;

    for candidate in &candidates {
        let (frame, boxes_path) = match companion(candidate, &run.boxes_dir) {
            Ok(found) => found,
            Err(err) => {
                if let Some(frame) = candidate.frame {
                    frames_seen.insert(frame);
                }
                summary.record(&err);
                continue;
            }
        };
        frames_seen.insert(frame);
        image_count += 1;

        let file_name = candidate.file_name();
        tracing::info!(
            frame,
            image = image_count,
            cloud = %file_name,
            boxes = %boxes_path.display(),
            "matched frame"
        );

        let output_path = run.output_dir.join(&file_name);
        match process_frame(
            engine,
            frame,
            &candidate.cloud_path,
            &boxes_path,
            &output_path,
            run.binary_output,
        ) {
            Ok(outcome) => {
                summary.processed += 1;
                if !outcome.report.is_empty() {
                    summary.blocks.push(ReportBlock {
                        label: format!("Image {}", image_count),
                        report: outcome.report,
                    });
                }
            }
            Err(err) => summary.record(&err),
        }
    }

    match orphan_box_files(&run.boxes_dir, &frames_seen) {
        Ok(orphans) => summary.orphan_boxes = orphans,
        Err(err) => {
            tracing::warn!(dir = %run.boxes_dir.display(), "cannot scan box files: {}", err);
        }
    }
    for path in &summary.orphan_boxes {
        tracing::warn!(path = %path.display(), "box file has no matching cloud");
    }

    Ok(summary)
}
