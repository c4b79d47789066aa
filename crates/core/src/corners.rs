use crate::Aabb;

/// The eight corners of a 3D box, in the order the box source lists them.
///
/// Corners stay in `f64` until they are sampled into cloud points.
///
/// Corner `i` and `i + 4` are not necessarily vertically aligned; the edge
/// topology that connects them lives with the densifier.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxCorners {
    pub corners: [[f64; 3]; 8],
}

impl BoxCorners {
    pub fn new(corners: [[f64; 3]; 8]) -> Self {
        Self { corners }
    }

    /// Build from a slice that must hold exactly eight corners.
    pub fn from_slice(corners: &[[f64; 3]]) -> Option<Self> {
        let corners: [[f64; 3]; 8] = corners.try_into().ok()?;
        Some(Self { corners })
    }

    /// Per-axis min/max over all eight corners.
    pub fn extent(&self) -> Aabb {
        Aabb::from_points(self.corners)
    }

    pub fn iter(&self) -> impl Iterator<Item = &[f64; 3]> {
        self.corners.iter()
    }
}
