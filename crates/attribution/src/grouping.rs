use crate::config::BackgroundColor;
use cloudbox_core::PointCloud;
use hashbrown::HashMap;
use std::fmt;

/// Decimal digits kept per channel when quantizing a color.
pub const COLOR_PRECISION: u32 = 3;
const SCALE: f64 = 1000.0;

/// A color rounded to [`COLOR_PRECISION`] decimals, stored as integer
/// thousandths per channel.
///
/// All rounding here breaks ties to even.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ColorKey([i32; 3]);

impl ColorKey {
    pub fn quantize(rgb: [f32; 3]) -> Self {
        Self(rgb.map(|c| (f64::from(c) * SCALE).round_ties_even() as i32))
    }

    pub fn thousandths(&self) -> [i32; 3] {
        self.0
    }

    /// The quantized color as `[0, 1]` channels.
    pub fn rgb(&self) -> [f64; 3] {
        self.0.map(|c| f64::from(c) / SCALE)
    }

    /// Channels scaled to `0..=255`, rounded to the nearest integer.
    pub fn rgb255(&self) -> [u8; 3] {
        self.rgb()
            .map(|c| (c * 255.0).round_ties_even().clamp(0.0, 255.0) as u8)
    }
}

impl fmt::Display for ColorKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [r, g, b] = self.rgb255();
        write!(f, "({}, {}, {})", r, g, b)
    }
}

impl BackgroundColor {
    /// Whether a quantized color lies within tolerance on every channel.
    pub fn matches(&self, key: &ColorKey) -> bool {
        key.rgb()
            .iter()
            .zip(self.rgb.iter())
            .all(|(&k, &bg)| (k - f64::from(bg)).abs() <= f64::from(self.tolerance))
    }
}

/// Indices of the points sharing one quantized color, in cloud order.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorGroup {
    pub key: ColorKey,
    pub indices: Vec<usize>,
}

/// Color groups in the order their color was first seen.
#[derive(Debug, Clone, Default)]
pub struct ColorGroups {
    groups: Vec<ColorGroup>,
    lookup: HashMap<ColorKey, usize>,
}

impl ColorGroups {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: ColorKey, index: usize) {
        match self.lookup.get(&key) {
            Some(&slot) => self.groups[slot].indices.push(index),
            None => {
                self.lookup.insert(key, self.groups.len());
                self.groups.push(ColorGroup {
                    key,
                    indices: vec![index],
                });
            }
        }
    }

    pub fn get(&self, key: &ColorKey) -> Option<&ColorGroup> {
        self.lookup.get(key).map(|&slot| &self.groups[slot])
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ColorGroup> {
        self.groups.iter()
    }

    pub fn as_slice(&self) -> &[ColorGroup] {
        &self.groups
    }
}

impl<'a> IntoIterator for &'a ColorGroups {
    type Item = &'a ColorGroup;
    type IntoIter = std::slice::Iter<'a, ColorGroup>;

    fn into_iter(self) -> Self::IntoIter {
        self.groups.iter()
    }
}

/// Partition the cloud's points by quantized color, skipping background
/// colors.
///
/// A cloud without colors yields no groups.
pub fn group_colors(cloud: &PointCloud, background: &[BackgroundColor]) -> ColorGroups {
    let mut groups = ColorGroups::new();
    let Some(colors) = cloud.colors.as_ref() else {
        return groups;
    };

    let n = cloud.len().min(colors.len());
    for i in 0..n {
        let key = ColorKey::quantize(colors.get(i));
        if background.iter().any(|bg| bg.matches(&key)) {
            continue;
        }
        groups.insert(key, i);
    }

    groups
}
