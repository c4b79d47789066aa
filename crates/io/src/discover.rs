use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// A cloud file found in the input directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameCandidate {
    pub cloud_path: PathBuf,
    /// First decimal number in the file name, if any.
    pub frame: Option<u64>,
}

impl FrameCandidate {
    pub fn file_name(&self) -> String {
        self.cloud_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// First run of ASCII digits in `name`, parsed without leading zeros.
pub fn frame_number(name: &str) -> Option<u64> {
    let start = name.find(|c: char| c.is_ascii_digit())?;
    let digits: &str = &name[start..];
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    digits[..end].parse().ok()
}

/// Name of the box file that belongs to `frame`.
pub fn box_file_name(frame: u64) -> String {
    format!("BBoxes_{}.json", frame)
}

pub fn box_file_path(boxes_dir: impl AsRef<Path>, frame: u64) -> PathBuf {
    boxes_dir.as_ref().join(box_file_name(frame))
}

fn is_ply(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("ply"))
}

/// Every `.ply` file directly inside `dir`, sorted by file name.
pub fn discover_clouds(dir: impl AsRef<Path>) -> io::Result<Vec<FrameCandidate>> {
    let mut paths = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && is_ply(&path) {
            paths.push(path);
        }
    }
    paths.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

    Ok(paths
        .into_iter()
        .map(|cloud_path| {
            let frame = cloud_path
                .file_name()
                .and_then(|n| n.to_str())
                .and_then(frame_number);
            FrameCandidate { cloud_path, frame }
        })
        .collect())
}
