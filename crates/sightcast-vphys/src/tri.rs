//! The `.tri` interchange format: a flat triangle list cached as text.
//!
//! The file is whitespace-separated uppercase hex byte pairs; every 36
//! bytes is one triangle record of 9 little-endian `f32` coordinates.
//! Decoding a large `.vphys` asset is slow, so extracted triangle lists
//! are cached in this form and reloaded directly.

use std::fmt::Write as _;
use std::path::Path;

use sightcast_math::Triangle;

use crate::error::Result;
use crate::geometry::decode_points;
use crate::parser::decode_hex_line;

/// Bytes per triangle record: 9 little-endian `f32` coordinates.
const RECORD_SIZE: usize = 36;

/// Read a `.tri` file from a path.
pub fn read_tri(path: impl AsRef<Path>) -> Result<Vec<Triangle>> {
    let text = std::fs::read_to_string(path)?;
    parse_tri(&text)
}

/// Parse `.tri` text into triangles.
///
/// Trailing bytes short of a full record are ignored.
pub fn parse_tri(text: &str) -> Result<Vec<Triangle>> {
    let mut bytes = Vec::new();
    for (index, line) in text.lines().enumerate() {
        decode_hex_line(index + 1, line.trim(), &mut bytes)?;
    }

    Ok(bytes
        .chunks_exact(RECORD_SIZE)
        .map(|record| {
            let p = decode_points(record);
            Triangle::new(p[0], p[1], p[2])
        })
        .collect())
}

/// Format triangles as `.tri` text, demoting coordinates to `f32`.
pub fn format_tri(triangles: &[Triangle]) -> String {
    let mut out = String::with_capacity(triangles.len() * RECORD_SIZE * 3);
    for tri in triangles {
        for p in tri.vertices() {
            for coordinate in [p.x, p.y, p.z] {
                for byte in (coordinate as f32).to_le_bytes() {
                    if !out.is_empty() {
                        out.push(' ');
                    }
                    let _ = write!(out, "{byte:02X}");
                }
            }
        }
    }
    out
}

/// Write triangles to a `.tri` file.
pub fn write_tri(path: impl AsRef<Path>, triangles: &[Triangle]) -> Result<()> {
    std::fs::write(path, format_tri(triangles))?;
    Ok(())
}
