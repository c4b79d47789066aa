use cloudbox_core::{Aabb, PointCloud};

/// A color group won by one box.
#[derive(Debug, Clone, PartialEq)]
pub struct Attribution {
    pub box_index: usize,
    /// Containment count of every box, in box order.
    pub counts: Vec<usize>,
    /// Group indices inside the winning box's extent.
    pub inside: Vec<usize>,
    /// Group indices outside it.
    pub outside: Vec<usize>,
}

/// Result of voting one color group onto the boxes.
#[derive(Debug, Clone, PartialEq)]
pub enum VoteOutcome {
    Attributed(Attribution),
    /// Two or more boxes share the highest, nonzero count.
    Tie { count: usize, boxes: Vec<usize> },
    /// No box contains any point of the group.
    NoMatch,
}

impl VoteOutcome {
    pub fn attribution(&self) -> Option<&Attribution> {
        match self {
            VoteOutcome::Attributed(a) => Some(a),
            _ => None,
        }
    }
}

/// Number of the given points inside `extent`.
pub fn containment_count(cloud: &PointCloud, indices: &[usize], extent: &Aabb) -> usize {
    indices
        .iter()
        .filter(|&&i| extent.contains(&cloud.point_f64(i)))
        .count()
}

/// Majority vote of the group `indices` over `extents`.
///
/// The winner is the lowest box index holding the maximum count. A zero
/// maximum is reported as [`VoteOutcome::NoMatch`] before ties are checked,
/// and ties are strict integer equality.
pub fn vote(cloud: &PointCloud, indices: &[usize], extents: &[Aabb]) -> VoteOutcome {
    let counts: Vec<usize> = extents
        .iter()
        .map(|extent| containment_count(cloud, indices, extent))
        .collect();

    let Some(best) = first_argmax(&counts) else {
        return VoteOutcome::NoMatch;
    };
    let best_count = counts[best];
    if best_count == 0 {
        return VoteOutcome::NoMatch;
    }

    let tied: Vec<usize> = counts
        .iter()
        .enumerate()
        .filter(|&(_, &c)| c == best_count)
        .map(|(i, _)| i)
        .collect();
    if tied.len() > 1 {
        return VoteOutcome::Tie {
            count: best_count,
            boxes: tied,
        };
    }

    let winner = &extents[best];
    let (inside, outside): (Vec<usize>, Vec<usize>) = indices
        .iter()
        .copied()
        .partition(|&i| winner.contains(&cloud.point_f64(i)));

    VoteOutcome::Attributed(Attribution {
        box_index: best,
        counts,
        inside,
        outside,
    })
}

fn first_argmax(values: &[usize]) -> Option<usize> {
    let mut best: Option<usize> = None;
    for (i, &v) in values.iter().enumerate() {
        match best {
            Some(b) if values[b] >= v => {}
            _ => best = Some(i),
        }
    }
    best
}
