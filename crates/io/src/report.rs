use cloudbox_attribution::FrameReport;
use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::Path;

pub const REPORT_HEADER: [&str; 5] = [
    "Color (RGB)",
    "Color Name",
    "Points Inside",
    "Points Outside",
    "Min Distance (m)",
];

/// The rows of one frame under a label such as `Image 3`.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportBlock {
    pub label: String,
    pub report: FrameReport,
}

fn csv_field(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

fn write_row<S: AsRef<str>>(w: &mut impl Write, fields: &[S]) -> io::Result<()> {
    let line: Vec<String> = fields.iter().map(|f| csv_field(f.as_ref())).collect();
    writeln!(w, "{}", line.join(","))
}

/// Write every block as: label row, header row, one row per color, blank row.
pub fn write_report(w: &mut impl Write, blocks: &[ReportBlock]) -> io::Result<()> {
    for block in blocks {
        write_row(w, &[block.label.as_str()][..])?;
        write_row(w, &REPORT_HEADER[..])?;
        for row in block.report.iter() {
            let [r, g, b] = row.rgb255();
            write_row(
                w,
                &[
                    format!("({}, {}, {})", r, g, b),
                    row.name.clone(),
                    row.inside.to_string(),
                    row.outside.to_string(),
                    format!("{:.2}", row.min_distance),
                ][..],
            )?;
        }
        writeln!(w)?;
    }
    Ok(())
}

pub fn write_report_csv(path: impl AsRef<Path>, blocks: &[ReportBlock]) -> io::Result<()> {
    if let Some(parent) = path.as_ref().parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let mut w = BufWriter::new(fs::File::create(path)?);
    write_report(&mut w, blocks)?;
    w.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use cloudbox_attribution::{ColorKey, ReportRow};

    fn row(rgb: [f32; 3], name: &str, inside: usize, outside: usize, d: f64) -> ReportRow {
        ReportRow {
            key: ColorKey::quantize(rgb),
            name: name.to_string(),
            box_index: 0,
            inside,
            outside,
            min_distance: d,
        }
    }

    #[test]
    fn quotes_fields_with_commas_and_quotes() {
        assert_eq!(csv_field("plain"), "plain");
        assert_eq!(csv_field("(1, 2, 3)"), "\"(1, 2, 3)\"");
        assert_eq!(csv_field("a\"b"), "\"a\"\"b\"");
    }

    #[test]
    fn block_layout() {
        let blocks = vec![
            ReportBlock {
                label: "Image 1".to_string(),
                report: FrameReport {
                    rows: vec![
                        row([1.0, 0.0, 0.0], "Red", 5, 0, 12.3),
                        row([0.3, 0.3, 0.3], "Unknown", 7, 2, 4.0),
                    ],
                },
            },
            ReportBlock {
                label: "Image 3".to_string(),
                report: FrameReport {
                    rows: vec![row([0.0, 1.0, 0.0], "Green", 1, 1, 0.25)],
                },
            },
        ];
        let mut out = Vec::new();
        write_report(&mut out, &blocks).unwrap();
        let text = String::from_utf8(out).unwrap();
        let expected = "\
Image 1
Color (RGB),Color Name,Points Inside,Points Outside,Min Distance (m)
\"(255, 0, 0)\",Red,5,0,12.30
\"(76, 76, 76)\",Unknown,7,2,4.00

Image 3
Color (RGB),Color Name,Points Inside,Points Outside,Min Distance (m)
\"(0, 255, 0)\",Green,1,1,0.25

";
        assert_eq!(text, expected);
    }

    #[test]
    fn writes_file_and_creates_parent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("summary.csv");
        write_report_csv(&path, &[]).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "");
    }
}
