#![forbid(unsafe_code)]

pub mod bbox;
pub mod cloud;
pub mod corners;

pub use bbox::Aabb;
pub use cloud::{Colors, PointCloud};
pub use corners::BoxCorners;
