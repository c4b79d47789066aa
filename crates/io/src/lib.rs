#![forbid(unsafe_code)]

pub mod boxes;
pub mod discover;
pub mod ply;
pub mod report;

pub use boxes::{parse_boxes, read_boxes};
pub use discover::{box_file_name, box_file_path, discover_clouds, frame_number, FrameCandidate};
pub use ply::{read_ply, write_ply, write_ply_binary};
pub use report::{write_report, write_report_csv, ReportBlock, REPORT_HEADER};
