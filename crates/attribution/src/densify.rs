use cloudbox_core::{Aabb, BoxCorners};

/// Corner index pairs of the 12 box edges: bottom face, top face, verticals.
pub const BOX_EDGES: [(usize, usize); 12] = [
    (0, 1),
    (1, 3),
    (3, 2),
    (2, 0),
    (4, 5),
    (5, 7),
    (7, 6),
    (6, 4),
    (0, 5),
    (1, 4),
    (2, 7),
    (3, 6),
];

/// A box in the cloud frame together with its rendered outline.
#[derive(Debug, Clone, PartialEq)]
pub struct DenseBox {
    /// Position in the frame's input box list.
    pub index: usize,
    pub corners: BoxCorners,
    pub extent: Aabb,
    pub edge_points: Vec<[f32; 3]>,
}

impl DenseBox {
    pub fn new(index: usize, corners: BoxCorners, samples_per_edge: usize) -> Self {
        Self {
            index,
            extent: corners.extent(),
            edge_points: densify_edges(&corners, samples_per_edge),
            corners,
        }
    }
}

/// `n` evenly spaced points from `start` to `end`, both included.
///
/// With `n == 1` only `start` is returned.
pub fn linspace(start: [f64; 3], end: [f64; 3], n: usize) -> Vec<[f64; 3]> {
    let mut out = Vec::with_capacity(n);
    if n == 0 {
        return out;
    }
    if n == 1 {
        out.push(start);
        return out;
    }

    let last = n - 1;
    let denom = last as f64;
    for i in 0..last {
        let t = i as f64 / denom;
        out.push([
            start[0] + (end[0] - start[0]) * t,
            start[1] + (end[1] - start[1]) * t,
            start[2] + (end[2] - start[2]) * t,
        ]);
    }
    out.push(end);
    out
}

/// Sample every edge of the box with `samples_per_edge` points.
///
/// Output is edge-major in [`BOX_EDGES`] order: `12 * samples_per_edge`
/// points in total. Sampling runs in `f64`; only the emitted points are
/// narrowed to the cloud's `f32`.
pub fn densify_edges(corners: &BoxCorners, samples_per_edge: usize) -> Vec<[f32; 3]> {
    let mut points = Vec::with_capacity(BOX_EDGES.len() * samples_per_edge);
    for &(a, b) in &BOX_EDGES {
        points.extend(
            linspace(corners.corners[a], corners.corners[b], samples_per_edge)
                .into_iter()
                .map(narrow),
        );
    }
    points
}

fn narrow(p: [f64; 3]) -> [f32; 3] {
    p.map(|v| v as f32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn skewed_box() -> BoxCorners {
        BoxCorners::new([
            [0.1, 0.2, 0.3],
            [4.7, 0.2, 0.3],
            [0.1, 2.9, 0.3],
            [4.7, 2.9, 0.3],
            [4.7, 0.2, 1.7],
            [0.1, 0.2, 1.7],
            [4.7, 2.9, 1.7],
            [0.1, 2.9, 1.7],
        ])
    }

    #[test]
    fn default_density_point_count() {
        assert_eq!(densify_edges(&skewed_box(), 100).len(), 1200);
    }

    #[test]
    fn single_sample_yields_edge_starts() {
        let corners = skewed_box();
        let points = densify_edges(&corners, 1);
        assert_eq!(points.len(), 12);
        for (p, &(a, _)) in points.iter().zip(BOX_EDGES.iter()) {
            assert_eq!(*p, narrow(corners.corners[a]));
        }
    }

    #[test]
    fn linspace_midpoint() {
        let pts = linspace([0.0, 0.0, 0.0], [2.0, 4.0, -6.0], 3);
        assert_eq!(pts, vec![[0.0, 0.0, 0.0], [1.0, 2.0, -3.0], [2.0, 4.0, -6.0]]);
    }

    #[test]
    fn linspace_zero_is_empty() {
        assert!(linspace([0.0; 3], [1.0; 3], 0).is_empty());
    }

    #[test]
    fn output_is_deterministic() {
        let a = densify_edges(&skewed_box(), 17);
        let b = densify_edges(&skewed_box(), 17);
        assert_eq!(a, b);
    }

    #[test]
    fn dense_box_extent_matches_corners() {
        let dense = DenseBox::new(3, skewed_box(), 5);
        assert_eq!(dense.index, 3);
        assert_eq!(dense.extent.min, [0.1, 0.2, 0.3]);
        assert_eq!(dense.extent.max, [4.7, 2.9, 1.7]);
        // narrowing may step just outside the f64 faces
        assert!(dense.edge_points.iter().all(|p| (0..3).all(|k| {
            let v = f64::from(p[k]);
            v >= dense.extent.min[k] - 1e-6 && v <= dense.extent.max[k] + 1e-6
        })));
    }

    proptest! {
        #[test]
        fn each_edge_starts_and_ends_at_its_corners(
            raw in prop::collection::vec((-50.0f64..50.0, -50.0f64..50.0, -50.0f64..50.0), 8),
            n in 2usize..64,
        ) {
            let pts: Vec<[f64; 3]> = raw.into_iter().map(|(x, y, z)| [x, y, z]).collect();
            let corners = BoxCorners::from_slice(&pts).unwrap();
            let points = densify_edges(&corners, n);
            prop_assert_eq!(points.len(), 12 * n);
            for (e, &(a, b)) in BOX_EDGES.iter().enumerate() {
                let edge = &points[e * n..(e + 1) * n];
                prop_assert_eq!(edge[0], narrow(corners.corners[a]));
                prop_assert_eq!(edge[n - 1], narrow(corners.corners[b]));
            }
        }
    }
}
