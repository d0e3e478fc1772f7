//! Triangle extraction from parsed `.vphys` collision data.
//!
//! A physics asset stores its shapes under `m_parts[*].m_rnShape`: convex
//! hulls as half-edge meshes (`m_hulls`) and concave world geometry as
//! indexed triangle meshes (`m_meshes`). Only shapes with collision
//! attribute index 0 (the solid world layer) contribute to occlusion.
//!
//! All vertex data is stored as little-endian `f32` and promoted to `f64`
//! on decode.

use std::path::Path;

use sightcast_math::{Point3, Triangle};

use crate::error::{Result, VphysError};
use crate::parser::{parse_vphys, KvValue};

/// Collision attribute index of solid world geometry.
const SOLID_ATTRIBUTE: i64 = 0;

/// Read a `.vphys` asset from a path and extract its occlusion triangles.
pub fn read_vphys(path: impl AsRef<Path>) -> Result<Vec<Triangle>> {
    let text = std::fs::read_to_string(path)?;
    triangles_from_vphys(&parse_vphys(&text)?)
}

/// Extract occlusion triangles from a parsed `.vphys` root dictionary.
pub fn triangles_from_vphys(root: &KvValue) -> Result<Vec<Triangle>> {
    let parts = root
        .get("m_parts")
        .ok_or_else(|| VphysError::MissingField("m_parts".into()))?
        .as_list()
        .ok_or_else(|| VphysError::type_mismatch("m_parts", "a list"))?;

    let mut triangles = Vec::new();
    for part in parts {
        let shape = part
            .get("m_rnShape")
            .ok_or_else(|| VphysError::MissingField("m_rnShape".into()))?;

        for hull in solid_shapes(shape, "m_hulls")? {
            let hull = hull
                .get("m_Hull")
                .ok_or_else(|| VphysError::MissingField("m_Hull".into()))?;
            extract_hull(hull, &mut triangles)?;
        }
        for mesh in solid_shapes(shape, "m_meshes")? {
            let mesh = mesh
                .get("m_Mesh")
                .ok_or_else(|| VphysError::MissingField("m_Mesh".into()))?;
            extract_mesh(mesh, &mut triangles)?;
        }
    }
    Ok(triangles)
}

/// Shapes under `key` whose collision attribute marks them solid.
///
/// A missing shape list is an empty one: assets commonly carry only hulls
/// or only meshes.
fn solid_shapes<'a>(shape: &'a KvValue, key: &'static str) -> Result<Vec<&'a KvValue>> {
    let Some(list) = shape.get(key) else {
        return Ok(Vec::new());
    };
    let list = list
        .as_list()
        .ok_or_else(|| VphysError::type_mismatch(key, "a list"))?;

    let mut solid = Vec::new();
    for entry in list {
        let attribute = entry
            .get("m_nCollisionAttributeIndex")
            .ok_or_else(|| VphysError::MissingField("m_nCollisionAttributeIndex".into()))?
            .as_int()
            .ok_or_else(|| {
                VphysError::type_mismatch("m_nCollisionAttributeIndex", "an integer")
            })?;
        if attribute == SOLID_ATTRIBUTE {
            solid.push(entry);
        }
    }
    Ok(solid)
}

/// A half-edge record from `m_Edges`: 4 bytes (next, twin, origin, face);
/// the walk only needs `next` and `origin`.
struct HalfEdge {
    next: usize,
    origin: usize,
}

/// Fan-triangulate the faces of a convex hull stored as a half-edge mesh.
fn extract_hull(hull: &KvValue, out: &mut Vec<Triangle>) -> Result<()> {
    let vertices = decode_points(hex_field(hull, "m_Vertices")?);
    let faces = hex_field(hull, "m_Faces")?;
    let edges: Vec<HalfEdge> = hex_field(hull, "m_Edges")?
        .chunks_exact(4)
        .map(|rec| HalfEdge {
            next: rec[0] as usize,
            origin: rec[2] as usize,
        })
        .collect();

    for &start in faces {
        let start = start as usize;
        let anchor = *hull_vertex(&vertices, &edges, start)?;

        // Walk the face loop, fanning triangles from the anchor vertex.
        // A walk longer than the edge count means a corrupt next-pointer
        // cycle that would never return to the start edge.
        let mut edge = edge_at(&edges, start)?.next;
        let mut closed = false;
        for _ in 0..edges.len() {
            let next = edge_at(&edges, edge)?.next;
            if next == start {
                closed = true;
                break;
            }
            out.push(Triangle::new(
                anchor,
                *hull_vertex(&vertices, &edges, edge)?,
                *hull_vertex(&vertices, &edges, next)?,
            ));
            edge = next;
        }
        if !closed {
            return Err(VphysError::InvalidGeometry(format!(
                "face loop starting at edge {start} does not close"
            )));
        }
    }
    Ok(())
}

fn edge_at(edges: &[HalfEdge], index: usize) -> Result<&HalfEdge> {
    edges
        .get(index)
        .ok_or_else(|| VphysError::InvalidGeometry(format!("edge index {index} out of range")))
}

fn hull_vertex<'a>(
    vertices: &'a [Point3],
    edges: &[HalfEdge],
    edge: usize,
) -> Result<&'a Point3> {
    let origin = edge_at(edges, edge)?.origin;
    vertices
        .get(origin)
        .ok_or_else(|| VphysError::InvalidGeometry(format!("vertex index {origin} out of range")))
}

/// Decode an indexed triangle mesh: `m_Triangles` holds i32 LE vertex
/// index triples into the `m_Vertices` f32 triples.
fn extract_mesh(mesh: &KvValue, out: &mut Vec<Triangle>) -> Result<()> {
    let vertices = decode_points(hex_field(mesh, "m_Vertices")?);
    let indices: Vec<i64> = hex_field(mesh, "m_Triangles")?
        .chunks_exact(4)
        .map(|c| i32::from_le_bytes([c[0], c[1], c[2], c[3]]) as i64)
        .collect();

    for triple in indices.chunks_exact(3) {
        let mut corners = [Point3::origin(); 3];
        for (corner, &index) in corners.iter_mut().zip(triple) {
            *corner = *usize::try_from(index)
                .ok()
                .and_then(|i| vertices.get(i))
                .ok_or_else(|| {
                    VphysError::InvalidGeometry(format!("vertex index {index} out of range"))
                })?;
        }
        out.push(Triangle::new(corners[0], corners[1], corners[2]));
    }
    Ok(())
}

fn hex_field<'a>(dict: &'a KvValue, key: &'static str) -> Result<&'a [u8]> {
    dict.get(key)
        .ok_or_else(|| VphysError::MissingField(key.into()))?
        .as_hex()
        .ok_or_else(|| VphysError::type_mismatch(key, "a hex blob"))
}

/// Decode little-endian f32 coordinate triples, promoting to f64.
/// Trailing bytes short of a full triple are ignored.
pub(crate) fn decode_points(bytes: &[u8]) -> Vec<Point3> {
    bytes
        .chunks_exact(12)
        .map(|c| {
            Point3::new(
                f32::from_le_bytes([c[0], c[1], c[2], c[3]]) as f64,
                f32::from_le_bytes([c[4], c[5], c[6], c[7]]) as f64,
                f32::from_le_bytes([c[8], c[9], c[10], c[11]]) as f64,
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Format bytes the way `.vphys` hex blobs store them.
    fn hex(bytes: &[u8]) -> String {
        bytes
            .iter()
            .map(|b| format!("{b:02X}"))
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn f32_triples(points: &[[f32; 3]]) -> Vec<u8> {
        points
            .iter()
            .flat_map(|p| p.iter().flat_map(|c| c.to_le_bytes()))
            .collect()
    }

    /// Quad in the z = 0 plane, counter-clockwise.
    fn quad_vertices() -> Vec<u8> {
        f32_triples(&[
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [1.0, 1.0, 0.0],
            [0.0, 1.0, 0.0],
        ])
    }

    /// Assemble a minimal one-part asset with a single shape entry.
    fn asset(list_key: &str, shape_key: &str, attribute: i64, blobs: &[(&str, &[u8])]) -> String {
        let mut s = String::from("{\n\tm_parts =\n\t[\n\t\t{\n\t\t\tm_rnShape =\n\t\t\t{\n");
        s.push_str(&format!("\t\t\t\t{list_key} =\n"));
        s.push_str("\t\t\t\t[\n\t\t\t\t\t{\n");
        s.push_str(&format!(
            "\t\t\t\t\t\tm_nCollisionAttributeIndex = {attribute}\n"
        ));
        s.push_str(&format!("\t\t\t\t\t\t{shape_key} =\n"));
        s.push_str("\t\t\t\t\t\t{\n");
        for (name, bytes) in blobs {
            s.push_str(&format!("\t\t\t\t\t\t\t{name} =\n"));
            s.push_str("\t\t\t\t\t\t\t#[\n");
            s.push_str(&format!("\t\t\t\t\t\t\t\t{}\n", hex(bytes)));
            s.push_str("\t\t\t\t\t\t\t]\n");
        }
        s.push_str("\t\t\t\t\t\t}\n\t\t\t\t\t}\n\t\t\t\t]\n\t\t\t}\n\t\t}\n\t]\n}\n");
        s
    }

    fn extract(text: &str) -> Result<Vec<Triangle>> {
        triangles_from_vphys(&parse_vphys(text).unwrap())
    }

    #[test]
    fn test_mesh_extraction() {
        let vertices = quad_vertices();
        let indices: Vec<u8> = [0i32, 1, 2, 0, 2, 3]
            .iter()
            .flat_map(|i| i.to_le_bytes())
            .collect();
        let text = asset(
            "m_meshes",
            "m_Mesh",
            0,
            &[("m_Vertices", &vertices), ("m_Triangles", &indices)],
        );

        let triangles = extract(&text).unwrap();
        assert_eq!(triangles.len(), 2);
        assert_eq!(triangles[0].p1, Point3::new(0.0, 0.0, 0.0));
        assert_eq!(triangles[0].p3, Point3::new(1.0, 1.0, 0.0));
        assert_eq!(triangles[1].p2, Point3::new(1.0, 1.0, 0.0));
        assert_eq!(triangles[1].p3, Point3::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn test_hull_fan_triangulation() {
        // One quad face as a half-edge loop; records are
        // (next, twin, origin, face).
        let vertices = quad_vertices();
        let edges: Vec<u8> = vec![
            1, 0, 0, 0, //
            2, 0, 1, 0, //
            3, 0, 2, 0, //
            0, 0, 3, 0,
        ];
        let faces: Vec<u8> = vec![0];
        let text = asset(
            "m_hulls",
            "m_Hull",
            0,
            &[
                ("m_Vertices", &vertices),
                ("m_Faces", &faces),
                ("m_Edges", &edges),
            ],
        );

        let triangles = extract(&text).unwrap();
        // A quad fans into two triangles, with no degenerate closer.
        assert_eq!(triangles.len(), 2);
        assert_eq!(triangles[0].p1, Point3::new(0.0, 0.0, 0.0));
        assert_eq!(triangles[0].p2, Point3::new(1.0, 0.0, 0.0));
        assert_eq!(triangles[0].p3, Point3::new(1.0, 1.0, 0.0));
        assert_eq!(triangles[1].p2, Point3::new(1.0, 1.0, 0.0));
        assert_eq!(triangles[1].p3, Point3::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn test_non_solid_shapes_skipped() {
        let vertices = quad_vertices();
        let indices: Vec<u8> = [0i32, 1, 2].iter().flat_map(|i| i.to_le_bytes()).collect();
        let text = asset(
            "m_meshes",
            "m_Mesh",
            2,
            &[("m_Vertices", &vertices), ("m_Triangles", &indices)],
        );

        assert!(extract(&text).unwrap().is_empty());
    }

    #[test]
    fn test_mesh_index_out_of_range() {
        let vertices = quad_vertices();
        let indices: Vec<u8> = [0i32, 1, 9].iter().flat_map(|i| i.to_le_bytes()).collect();
        let text = asset(
            "m_meshes",
            "m_Mesh",
            0,
            &[("m_Vertices", &vertices), ("m_Triangles", &indices)],
        );

        assert!(matches!(
            extract(&text),
            Err(VphysError::InvalidGeometry(_))
        ));
    }

    #[test]
    fn test_unclosed_face_loop_rejected() {
        // Edge 1 points back to itself, so the walk never returns to the
        // start edge.
        let vertices = quad_vertices();
        let edges: Vec<u8> = vec![
            1, 0, 0, 0, //
            1, 0, 1, 0,
        ];
        let faces: Vec<u8> = vec![0];
        let text = asset(
            "m_hulls",
            "m_Hull",
            0,
            &[
                ("m_Vertices", &vertices),
                ("m_Faces", &faces),
                ("m_Edges", &edges),
            ],
        );

        assert!(matches!(
            extract(&text),
            Err(VphysError::InvalidGeometry(_))
        ));
    }

    #[test]
    fn test_missing_parts_is_an_error() {
        assert!(matches!(
            triangles_from_vphys(&parse_vphys("{\n\tm_nFlags = 0\n}\n").unwrap()),
            Err(VphysError::MissingField(_))
        ));
    }

    #[test]
    fn test_part_without_shape_lists_yields_nothing() {
        let text = "{\n\tm_parts =\n\t[\n\t\t{\n\t\t\tm_rnShape =\n\t\t\t{\n\t\t\t}\n\t\t}\n\t]\n}\n";
        assert!(extract(text).unwrap().is_empty());
    }
}
