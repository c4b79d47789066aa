use cloudbox_core::BoxCorners;
use nalgebra::{Matrix4, Vector4};

/// Homogeneous 4×4 transform taking box corners from the box source's frame
/// into the point cloud's frame.
///
/// The matrix is trusted configuration: it is not checked for orthonormality.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CornerTransform {
    matrix: Matrix4<f64>,
}

impl CornerTransform {
    pub fn identity() -> Self {
        Self {
            matrix: Matrix4::identity(),
        }
    }

    /// Build from a row-major 4×4 array.
    pub fn from_rows(rows: &[[f64; 4]; 4]) -> Self {
        let matrix = Matrix4::from_fn(|r, c| rows[r][c]);
        Self { matrix }
    }

    /// Append 1, left-multiply, drop the homogeneous coordinate.
    pub fn apply_to_point(&self, p: &[f64; 3]) -> [f64; 3] {
        let t = self.matrix * Vector4::new(p[0], p[1], p[2], 1.0);
        [t[0], t[1], t[2]]
    }

    pub fn apply(&self, corners: &BoxCorners) -> BoxCorners {
        BoxCorners::new(corners.corners.map(|c| self.apply_to_point(&c)))
    }
}
