use std::io;
use std::path::PathBuf;

/// Why one frame produced no output. None of these abort the batch.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    #[error("no frame number in cloud file name {}", path.display())]
    Unnumbered { path: PathBuf },
    #[error("frame {frame}: no companion data, expected {}", expected.display())]
    MissingCompanionData { frame: u64, expected: PathBuf },
    #[error("frame {frame}: failed to read cloud: {source}")]
    CloudRead { frame: u64, source: io::Error },
    #[error("frame {frame}: failed to read boxes: {source}")]
    BoxRead { frame: u64, source: io::Error },
    #[error("frame {frame}: failed to write cloud: {source}")]
    CloudWrite { frame: u64, source: io::Error },
}

impl FrameError {
    /// Skips are expected gaps in the input; everything else is a failure.
    pub fn is_skip(&self) -> bool {
        matches!(
            self,
            FrameError::Unnumbered { .. } | FrameError::MissingCompanionData { .. }
        )
    }
}
