use cloudbox_core::BoxCorners;
use serde::Deserialize;
use std::fs;
use std::io;
use std::path::Path;

/// One record of a box file. Fields other than the corners are ignored.
#[derive(Debug, Deserialize)]
struct BoxRecord {
    corners_cam0: Vec<[f64; 3]>,
}

/// Parse a JSON array of box records, each holding 8 `corners_cam0` corners.
pub fn parse_boxes(json: &str) -> io::Result<Vec<BoxCorners>> {
    let records: Vec<BoxRecord> = serde_json::from_str(json).map_err(|e| {
        io::Error::new(
            io::ErrorKind::InvalidData,
            format!("invalid box file: {}", e),
        )
    })?;

    records
        .iter()
        .enumerate()
        .map(|(i, record)| {
            BoxCorners::from_slice(&record.corners_cam0).ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!(
                        "box {} has {} corners, expected 8",
                        i,
                        record.corners_cam0.len()
                    ),
                )
            })
        })
        .collect()
}

pub fn read_boxes(path: impl AsRef<Path>) -> io::Result<Vec<BoxCorners>> {
    let text = fs::read_to_string(path)?;
    parse_boxes(&text)
}
