//! Degenerate and pathological inputs: no panics, predictable outcomes.

use cloudbox::attribution::config::DEFAULT_GRAY;
use cloudbox::attribution::VoteOutcome;
use cloudbox::{AttributionEngine, BoxCorners, Colors, EngineConfig, PointCloud};
use proptest::prelude::*;

fn engine(samples: usize) -> AttributionEngine {
    AttributionEngine::new(EngineConfig {
        samples_per_edge: samples,
        ..EngineConfig::identity()
    })
    .unwrap()
}

fn cube(min: f64, max: f64) -> BoxCorners {
    let mut corners = [[0.0f64; 3]; 8];
    for (i, c) in corners.iter_mut().enumerate() {
        for (axis, v) in c.iter_mut().enumerate() {
            *v = if i & (1 << axis) == 0 { min } else { max };
        }
    }
    BoxCorners::new(corners)
}

fn red(points: &[[f32; 3]]) -> PointCloud {
    PointCloud::uniform(points, [1.0, 0.0, 0.0])
}

#[test]
fn empty_cloud_empty_boxes() {
    let out = engine(10).attribute_frame(&PointCloud::new(), &[]);
    assert!(out.merged.is_empty());
    assert!(out.report.is_empty());
    assert!(out.votes.is_empty());
}

#[test]
fn empty_cloud_prunes_every_box() {
    let out = engine(10).attribute_frame(&PointCloud::new(), &[cube(0.0, 1.0), cube(2.0, 3.0)]);
    assert_eq!(out.removed_boxes, vec![0, 1]);
    assert!(out.merged.is_empty());
}

#[test]
fn nan_points_are_never_inside() {
    let cloud = red(&[[f32::NAN, 0.5, 0.5], [0.5, 0.5, 0.5]]);
    let out = engine(2).attribute_frame(&cloud, &[cube(0.0, 1.0)]);
    let row = &out.report.rows[0];
    assert_eq!((row.inside, row.outside), (1, 1));
}

#[test]
fn box_with_nan_corner_still_has_an_extent() {
    let mut b = cube(0.0, 1.0);
    b.corners[7] = [f64::NAN; 3];
    let cloud = red(&[[0.5, 0.5, 0.5]]);
    let out = engine(2).attribute_frame(&cloud, &[b]);
    // the other seven corners still span the unit cube
    assert_eq!(out.report.len(), 1);
}

#[test]
fn flat_box_contains_points_on_its_plane() {
    let mut b = cube(0.0, 1.0);
    for c in b.corners.iter_mut() {
        c[2] = 0.0;
    }
    let cloud = red(&[[0.5, 0.5, 0.0], [0.5, 0.5, 0.001]]);
    let out = engine(3).attribute_frame(&cloud, &[b]);
    let row = &out.report.rows[0];
    assert_eq!((row.inside, row.outside), (1, 1));
}

#[test]
fn single_sample_per_edge_outlines_with_corners() {
    let cloud = red(&[[0.5; 3]]);
    let out = engine(1).attribute_frame(&cloud, &[cube(0.0, 1.0)]);
    assert_eq!(out.merged.len(), 1 + 12);
}

#[test]
fn mismatched_colors_fall_back_to_default() {
    let mut cloud = PointCloud::from_points(&[[0.5; 3], [0.6; 3], [0.7; 3]]);
    cloud.colors = Some(Colors::uniform(2, [1.0, 0.0, 0.0]));
    let out = engine(2).attribute_frame(&cloud, &[cube(0.0, 1.0)]);
    assert!(out.colors_substituted);
    assert!(out.report.is_empty());
    assert_eq!(out.merged.color(2), Some(DEFAULT_GRAY));
}

#[test]
fn colors_outside_unit_range_are_grouped() {
    let cloud = PointCloud::uniform(&[[0.5; 3]], [1.5, -0.2, 0.0]);
    let out = engine(2).attribute_frame(&cloud, &[cube(0.0, 1.0)]);
    assert_eq!(out.report.len(), 1);
    assert_eq!(out.report.rows[0].name, "Unknown");
    assert_eq!(out.report.rows[0].rgb255(), [255, 0, 0]);
}

#[test]
fn many_boxes_one_winner() {
    let boxes: Vec<BoxCorners> = (0..50).map(|i| cube(i as f64 * 10.0, i as f64 * 10.0 + 1.0)).collect();
    let cloud = red(&[[370.5, 370.5, 370.5], [370.2, 370.7, 370.1]]);
    let out = engine(2).attribute_frame(&cloud, &boxes);
    assert_eq!(out.kept_boxes, vec![37]);
    assert_eq!(out.removed_boxes.len(), 49);
    match &out.votes[0].outcome {
        VoteOutcome::Attributed(a) => assert_eq!(a.counts.iter().sum::<usize>(), 2),
        other => panic!("unexpected {:?}", other),
    }
}

proptest! {
    #[test]
    fn merged_size_tracks_kept_boxes(
        pts in prop::collection::vec((-5.0f32..25.0, -5.0f32..5.0, -5.0f32..5.0, 0u8..3), 0..200),
        samples in 1usize..8,
    ) {
        let palette = [[1.0, 0.0, 0.0], [0.0, 0.0, 1.0], [200.0 / 255.0; 3]];
        let xyz: Vec<[f32; 3]> = pts.iter().map(|&(x, y, z, _)| [x, y, z]).collect();
        let mut cloud = PointCloud::from_points(&xyz);
        let mut colors = Colors::uniform(0, [0.0; 3]);
        for &(_, _, _, c) in &pts {
            colors.push(palette[c as usize]);
        }
        cloud.colors = Some(colors);

        let boxes = [cube(0.0, 4.0), cube(10.0, 14.0), cube(2.0, 3.0)];
        let out = engine(samples).attribute_frame(&cloud, &boxes);

        prop_assert_eq!(out.merged.len(), xyz.len() + out.kept_boxes.len() * 12 * samples);
        prop_assert_eq!(out.kept_boxes.len() + out.removed_boxes.len(), boxes.len());
        prop_assert_eq!(out.report.len(), out.votes.iter().filter(|v| v.outcome.attribution().is_some()).count());
        for row in out.report.iter() {
            prop_assert!(out.kept_boxes.contains(&row.box_index));
        }
    }
}
