use crate::densify::DenseBox;
use cloudbox_core::PointCloud;
use hashbrown::HashSet;

/// Keep only the boxes whose index won at least one color, in input order.
pub fn prune_boxes<'a>(boxes: &'a [DenseBox], has_color: &HashSet<usize>) -> Vec<&'a DenseBox> {
    boxes
        .iter()
        .filter(|b| has_color.contains(&b.index))
        .collect()
}

/// Edge points of `boxes`, concatenated in order and painted `color`.
pub fn outline_cloud<'a>(
    boxes: impl IntoIterator<Item = &'a DenseBox>,
    color: [f32; 3],
) -> PointCloud {
    let points: Vec<[f32; 3]> = boxes
        .into_iter()
        .flat_map(|b| b.edge_points.iter().copied())
        .collect();
    PointCloud::uniform(&points, color)
}
