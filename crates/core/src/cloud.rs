use crate::Aabb;

#[derive(Debug, Clone, PartialEq)]
pub struct PointCloud {
    pub x: Vec<f32>,
    pub y: Vec<f32>,
    pub z: Vec<f32>,
    pub colors: Option<Colors>,
}

/// Per-point RGB colors, each channel in `[0, 1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Colors {
    pub r: Vec<f32>,
    pub g: Vec<f32>,
    pub b: Vec<f32>,
}

impl Colors {
    pub fn uniform(n: usize, rgb: [f32; 3]) -> Self {
        Self {
            r: vec![rgb[0]; n],
            g: vec![rgb[1]; n],
            b: vec![rgb[2]; n],
        }
    }

    /// Build colors from 8-bit channels, scaling each to `[0, 1]`.
    pub fn from_u8(r: &[u8], g: &[u8], b: &[u8]) -> Self {
        let scale = |c: &[u8]| c.iter().map(|&v| f32::from(v) / 255.0).collect();
        Self {
            r: scale(r),
            g: scale(g),
            b: scale(b),
        }
    }

    /// Length of the shortest channel.
    pub fn len(&self) -> usize {
        self.r.len().min(self.g.len()).min(self.b.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, i: usize) -> [f32; 3] {
        [self.r[i], self.g[i], self.b[i]]
    }

    pub fn push(&mut self, rgb: [f32; 3]) {
        self.r.push(rgb[0]);
        self.g.push(rgb[1]);
        self.b.push(rgb[2]);
    }

    fn is_consistent(&self, n: usize) -> bool {
        self.r.len() == n && self.g.len() == n && self.b.len() == n
    }
}

impl PointCloud {
    pub fn new() -> Self {
        Self {
            x: Vec::new(),
            y: Vec::new(),
            z: Vec::new(),
            colors: None,
        }
    }

    pub fn from_xyz(x: Vec<f32>, y: Vec<f32>, z: Vec<f32>) -> Self {
        assert_eq!(x.len(), y.len(), "x and y must have same length");
        assert_eq!(x.len(), z.len(), "x and z must have same length");

        Self {
            x,
            y,
            z,
            colors: None,
        }
    }

    pub fn from_points(points: &[[f32; 3]]) -> Self {
        let mut cloud = Self::new();
        cloud.x.reserve(points.len());
        cloud.y.reserve(points.len());
        cloud.z.reserve(points.len());
        for p in points {
            cloud.x.push(p[0]);
            cloud.y.push(p[1]);
            cloud.z.push(p[2]);
        }
        cloud
    }

    /// Points paired with one color for all of them.
    pub fn uniform(points: &[[f32; 3]], rgb: [f32; 3]) -> Self {
        let mut cloud = Self::from_points(points);
        cloud.colors = Some(Colors::uniform(points.len(), rgb));
        cloud
    }

    pub fn len(&self) -> usize {
        debug_assert_eq!(self.x.len(), self.y.len());
        debug_assert_eq!(self.x.len(), self.z.len());
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    pub fn aabb(&self) -> Aabb {
        Aabb::from_points(self.iter_points().map(|p| p.map(f64::from)))
    }

    pub fn point(&self, i: usize) -> [f32; 3] {
        [self.x[i], self.y[i], self.z[i]]
    }

    /// Point `i` widened to `f64`, for comparison against box extents.
    pub fn point_f64(&self, i: usize) -> [f64; 3] {
        self.point(i).map(f64::from)
    }

    /// Color of point `i`, if the cloud carries colors.
    pub fn color(&self, i: usize) -> Option<[f32; 3]> {
        self.colors.as_ref().map(|c| c.get(i))
    }

    pub fn iter_points(&self) -> impl Iterator<Item = [f32; 3]> + '_ {
        self.x
            .iter()
            .zip(&self.y)
            .zip(&self.z)
            .map(|((x, y), z)| [*x, *y, *z])
    }

    /// Replace absent or length-mismatched colors with `rgb` for every point.
    ///
    /// Returns `true` when a substitution happened.
    pub fn with_default_colors(&mut self, rgb: [f32; 3]) -> bool {
        let n = self.len();
        match &self.colors {
            Some(colors) if colors.is_consistent(n) => false,
            _ => {
                self.colors = Some(Colors::uniform(n, rgb));
                true
            }
        }
    }

    /// Append every point of `other`.
    ///
    /// Colors survive only when both clouds carry them.
    pub fn append(&mut self, other: &PointCloud) {
        self.x.extend_from_slice(&other.x);
        self.y.extend_from_slice(&other.y);
        self.z.extend_from_slice(&other.z);

        self.colors = match (self.colors.take(), &other.colors) {
            (Some(mut mine), Some(theirs)) => {
                mine.r.extend_from_slice(&theirs.r);
                mine.g.extend_from_slice(&theirs.g);
                mine.b.extend_from_slice(&theirs.b);
                Some(mine)
            }
            _ => None,
        };
    }
}

impl Default for PointCloud {
    fn default() -> Self {
        Self::new()
    }
}
