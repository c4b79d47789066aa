use cloudbox_core::{Colors, PointCloud};
use std::fs;
use std::io::{self, BufWriter, Write as _};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PlyFormat {
    Ascii,
    BinaryLittleEndian,
}

/// Vertex property type as declared in the PLY header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PropType {
    Char,
    Uchar,
    Short,
    Ushort,
    Int,
    Uint,
    Float,
    Double,
}

impl PropType {
    fn parse(name: &str) -> Option<Self> {
        match name {
            "char" | "int8" => Some(PropType::Char),
            "uchar" | "uint8" => Some(PropType::Uchar),
            "short" | "int16" => Some(PropType::Short),
            "ushort" | "uint16" => Some(PropType::Ushort),
            "int" | "int32" => Some(PropType::Int),
            "uint" | "uint32" => Some(PropType::Uint),
            "float" | "float32" => Some(PropType::Float),
            "double" | "float64" => Some(PropType::Double),
            _ => None,
        }
    }

    fn byte_size(self) -> usize {
        match self {
            PropType::Char | PropType::Uchar => 1,
            PropType::Short | PropType::Ushort => 2,
            PropType::Int | PropType::Uint | PropType::Float => 4,
            PropType::Double => 8,
        }
    }

    /// Decode one little-endian value; `bytes` holds at least `byte_size()`.
    fn decode_le(self, bytes: &[u8]) -> f64 {
        let mut buf = [0u8; 8];
        buf[..self.byte_size()].copy_from_slice(&bytes[..self.byte_size()]);
        match self {
            PropType::Char => f64::from(buf[0] as i8),
            PropType::Uchar => f64::from(buf[0]),
            PropType::Short => f64::from(i16::from_le_bytes([buf[0], buf[1]])),
            PropType::Ushort => f64::from(u16::from_le_bytes([buf[0], buf[1]])),
            PropType::Int => f64::from(i32::from_le_bytes([buf[0], buf[1], buf[2], buf[3]])),
            PropType::Uint => f64::from(u32::from_le_bytes([buf[0], buf[1], buf[2], buf[3]])),
            PropType::Float => f64::from(f32::from_le_bytes([buf[0], buf[1], buf[2], buf[3]])),
            PropType::Double => f64::from_le_bytes(buf),
        }
    }
}

struct PlyHeader {
    format: PlyFormat,
    vertex_count: usize,
    property_names: Vec<String>,
    property_types: Vec<PropType>,
    header_end_offset: usize,
}

impl PlyHeader {
    fn position(&self, name: &str) -> Option<usize> {
        self.property_names.iter().position(|n| n == name)
    }
}

fn invalid(msg: impl Into<String>) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, msg.into())
}

fn parse_ply_header(data: &[u8]) -> io::Result<PlyHeader> {
    let end_marker = b"end_header\n";
    let header_end =
        find_bytes(data, end_marker).ok_or_else(|| invalid("missing end_header in PLY file"))?;
    let header_end_offset = header_end + end_marker.len();

    let header_text = std::str::from_utf8(&data[..header_end])
        .map_err(|_| invalid("PLY header not valid UTF-8"))?;

    let mut format = None;
    let mut vertex_count: usize = 0;
    let mut property_names = Vec::new();
    let mut property_types = Vec::new();
    let mut in_vertex_element = false;
    let mut lines = header_text.lines().map(str::trim);

    if lines.next() != Some("ply") {
        return Err(invalid("file does not start with 'ply'"));
    }

    for line in lines {
        let parts: Vec<&str> = line.split_whitespace().collect();
        match parts.as_slice() {
            ["format", "ascii", ..] => format = Some(PlyFormat::Ascii),
            ["format", "binary_little_endian", ..] => {
                format = Some(PlyFormat::BinaryLittleEndian)
            }
            ["format", ..] => {
                return Err(io::Error::new(
                    io::ErrorKind::Unsupported,
                    format!("unsupported PLY format: {}", line),
                ));
            }
            ["element", "vertex", count, ..] => {
                in_vertex_element = true;
                vertex_count = count
                    .parse::<usize>()
                    .map_err(|e| invalid(format!("invalid vertex count: {}", e)))?;
            }
            ["element", ..] => in_vertex_element = false,
            ["property", "list", ..] if in_vertex_element => {
                return Err(io::Error::new(
                    io::ErrorKind::Unsupported,
                    format!("list property on vertices: {}", line),
                ));
            }
            ["property", ty, name] if in_vertex_element => {
                let ptype = PropType::parse(ty).ok_or_else(|| {
                    io::Error::new(
                        io::ErrorKind::Unsupported,
                        format!("unsupported property type: {}", ty),
                    )
                })?;
                property_types.push(ptype);
                property_names.push(name.to_string());
            }
            _ => {}
        }
    }

    let format = format.ok_or_else(|| invalid("PLY format line missing"))?;

    Ok(PlyHeader {
        format,
        vertex_count,
        property_names,
        property_types,
        header_end_offset,
    })
}

fn find_bytes(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

/// Color channel in `[0, 1]`: unsigned bytes and shorts are scaled, other
/// types taken as-is.
fn color_channel(ty: PropType, raw: f64) -> f32 {
    match ty {
        PropType::Uchar => raw as f32 / 255.0,
        PropType::Ushort => (raw / 65535.0) as f32,
        _ => raw as f32,
    }
}

/// Read an ASCII or binary little-endian PLY file.
///
/// Coordinates and colors may use any scalar PLY type. `uchar` and `ushort`
/// colors are scaled to `[0, 1]`. Other vertex properties are skipped.
///
/// The declared vertex count is checked against the body before anything
/// is allocated for it.
pub fn read_ply(path: impl AsRef<Path>) -> io::Result<PointCloud> {
    let data = fs::read(&path)?;
    let header = parse_ply_header(&data)?;

    let (idx_x, idx_y, idx_z) = match (
        header.position("x"),
        header.position("y"),
        header.position("z"),
    ) {
        (Some(ix), Some(iy), Some(iz)) => (ix, iy, iz),
        _ => return Err(invalid("PLY file missing required x, y, z properties")),
    };

    let color_idx = match (
        header.position("red"),
        header.position("green"),
        header.position("blue"),
    ) {
        (Some(r), Some(g), Some(b)) => Some([r, g, b]),
        _ => None,
    };

    let n = header.vertex_count;
    let body = &data[header.header_end_offset..];
    let stride: usize = header.property_types.iter().map(|t| t.byte_size()).sum();
    if header.format == PlyFormat::BinaryLittleEndian {
        let needed = n
            .checked_mul(stride)
            .ok_or_else(|| invalid(format!("vertex count {} overflows the body size", n)))?;
        if body.len() < needed {
            return Err(invalid(format!(
                "PLY binary body too short: need {} bytes, got {}",
                needed,
                body.len()
            )));
        }
    }
    // every vertex takes at least one body byte
    let mut points = Vec::with_capacity(n.min(body.len()));
    let mut colors = color_idx.map(|_| Colors::uniform(0, [0.0; 3]));

    let mut push_vertex = |values: &dyn Fn(usize) -> io::Result<f64>| -> io::Result<()> {
        points.push([
            values(idx_x)? as f32,
            values(idx_y)? as f32,
            values(idx_z)? as f32,
        ]);
        if let (Some(colors), Some(idx)) = (colors.as_mut(), color_idx) {
            let mut rgb = [0.0f32; 3];
            for (c, &i) in rgb.iter_mut().zip(idx.iter()) {
                *c = color_channel(header.property_types[i], values(i)?);
            }
            colors.push(rgb);
        }
        Ok(())
    };

    match header.format {
        PlyFormat::Ascii => {
            let body =
                std::str::from_utf8(body).map_err(|_| invalid("PLY body not valid UTF-8"))?;
            let rows = body.lines().map(str::trim).filter(|l| !l.is_empty());
            let mut count = 0usize;
            for line in rows.take(n) {
                let parts: Vec<&str> = line.split_whitespace().collect();
                if parts.len() < header.property_names.len() {
                    return Err(invalid(format!(
                        "vertex line has {} fields, expected {}",
                        parts.len(),
                        header.property_names.len()
                    )));
                }
                push_vertex(&|i| {
                    let parsed = match header.property_types[i] {
                        PropType::Float => parts[i].parse::<f32>().map(f64::from),
                        _ => parts[i].parse::<f64>(),
                    };
                    parsed.map_err(|e| invalid(format!("failed to parse number: {}", e)))
                })?;
                count += 1;
            }
            if count < n {
                return Err(invalid(format!(
                    "PLY body has {} vertices, header declares {}",
                    count, n
                )));
            }
        }
        PlyFormat::BinaryLittleEndian => {
            let offsets: Vec<usize> = header
                .property_types
                .iter()
                .scan(0usize, |acc, t| {
                    let off = *acc;
                    *acc += t.byte_size();
                    Some(off)
                })
                .collect();
            for row in body.chunks_exact(stride.max(1)).take(n) {
                push_vertex(&|i| Ok(header.property_types[i].decode_le(&row[offsets[i]..])))?;
            }
        }
    }

    let mut cloud = PointCloud::from_points(&points);
    cloud.colors = colors;
    Ok(cloud)
}

fn write_header(w: &mut impl io::Write, format: &str, cloud: &PointCloud) -> io::Result<()> {
    writeln!(w, "ply")?;
    writeln!(w, "format {} 1.0", format)?;
    writeln!(w, "element vertex {}", cloud.len())?;
    writeln!(w, "property float x")?;
    writeln!(w, "property float y")?;
    writeln!(w, "property float z")?;
    if cloud.colors.is_some() {
        writeln!(w, "property uchar red")?;
        writeln!(w, "property uchar green")?;
        writeln!(w, "property uchar blue")?;
    }
    writeln!(w, "end_header")
}

fn to_byte(c: f32) -> u8 {
    (c * 255.0).round().clamp(0.0, 255.0) as u8
}

/// Write a PLY file in ASCII format; colors are stored as bytes.
pub fn write_ply(path: impl AsRef<Path>, cloud: &PointCloud) -> io::Result<()> {
    let mut w = BufWriter::new(fs::File::create(path)?);
    write_header(&mut w, "ascii", cloud)?;

    for i in 0..cloud.len() {
        write!(w, "{} {} {}", cloud.x[i], cloud.y[i], cloud.z[i])?;
        if let Some(rgb) = cloud.color(i) {
            let [r, g, b] = rgb.map(to_byte);
            write!(w, " {} {} {}", r, g, b)?;
        }
        writeln!(w)?;
    }

    w.flush()
}

/// Write a PLY file in binary_little_endian format.
pub fn write_ply_binary(path: impl AsRef<Path>, cloud: &PointCloud) -> io::Result<()> {
    let mut w = BufWriter::new(fs::File::create(path)?);
    write_header(&mut w, "binary_little_endian", cloud)?;

    for i in 0..cloud.len() {
        w.write_all(&cloud.x[i].to_le_bytes())?;
        w.write_all(&cloud.y[i].to_le_bytes())?;
        w.write_all(&cloud.z[i].to_le_bytes())?;
        if let Some(rgb) = cloud.color(i) {
            w.write_all(&rgb.map(to_byte))?;
        }
    }

    w.flush()
}
