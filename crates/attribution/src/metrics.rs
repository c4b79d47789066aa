use crate::config::PaletteEntry;
use crate::grouping::ColorKey;
use crate::vote::Attribution;
use cloudbox_core::PointCloud;

pub const UNKNOWN_COLOR: &str = "Unknown";

/// Palette name of a quantized color; exact key match only.
pub fn color_name<'a>(key: &ColorKey, palette: &'a [PaletteEntry]) -> &'a str {
    palette
        .iter()
        .find(|entry| ColorKey::quantize(entry.rgb) == *key)
        .map_or(UNKNOWN_COLOR, |entry| entry.name.as_str())
}

/// Smallest Euclidean norm among the given points, or `None` when empty.
pub fn min_distance_to_origin(cloud: &PointCloud, indices: &[usize]) -> Option<f64> {
    indices
        .iter()
        .map(|&i| {
            let [x, y, z] = cloud.point(i).map(f64::from);
            (x * x + y * y + z * z).sqrt()
        })
        .min_by(|a, b| a.total_cmp(b))
}

/// Round to `decimals` places, ties to even.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (value * scale).round_ties_even() / scale
}

/// One attributed color of a frame.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportRow {
    pub key: ColorKey,
    pub name: String,
    pub box_index: usize,
    pub inside: usize,
    pub outside: usize,
    /// Meters, rounded to two decimals.
    pub min_distance: f64,
}

impl ReportRow {
    pub fn new(
        key: ColorKey,
        attribution: &Attribution,
        cloud: &PointCloud,
        palette: &[PaletteEntry],
    ) -> Self {
        // An attribution always has at least one inside point.
        let min_distance = min_distance_to_origin(cloud, &attribution.inside).unwrap_or(0.0);
        Self {
            key,
            name: color_name(&key, palette).to_string(),
            box_index: attribution.box_index,
            inside: attribution.inside.len(),
            outside: attribution.outside.len(),
            min_distance: round_to(min_distance, 2),
        }
    }

    pub fn rgb255(&self) -> [u8; 3] {
        self.key.rgb255()
    }
}

/// Rows of one frame, in the order colors were first seen in the cloud.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameReport {
    pub rows: Vec<ReportRow>,
}

impl FrameReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, row: ReportRow) {
        self.rows.push(row);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ReportRow> {
        self.rows.iter()
    }
}
