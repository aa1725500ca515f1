//! Wavefront OBJ import and export.
//!
//! Only geometry is read: `v` positions and `f` faces. Texture and normal
//! references in face corners (`i/t`, `i//n`, `i/t/n`) are accepted and
//! ignored, negative indices count back from the latest vertex, and faces
//! keep their full polygon. Every other record is skipped.

use crate::errors::{Result, ThimbleError};
use crate::float_types::Real;
use crate::mesh::{Mesh, polygon::Polygon};
use hashbrown::HashMap;
use nalgebra::Point3;
use std::io::{BufRead, Write};
use tracing::debug;

/// Parse OBJ text into a polygon mesh.
pub fn read_obj<R: BufRead>(reader: R) -> Result<Mesh> {
    let mut positions: Vec<Point3<Real>> = Vec::new();
    let mut polygons = Vec::new();
    let mut skipped = 0usize;

    for (number, line) in reader.lines().enumerate() {
        let line = line?;
        let line_no = number + 1;
        let mut tokens = line.split_whitespace();
        match tokens.next() {
            Some("v") => {
                let coords = tokens
                    .take(3)
                    .map(|t| {
                        t.parse::<Real>().map_err(|e| {
                            ThimbleError::parse(line_no, format!("bad coordinate {t:?}: {e}"))
                        })
                    })
                    .collect::<Result<Vec<Real>>>()?;
                if coords.len() != 3 {
                    return Err(ThimbleError::parse(line_no, "vertex needs three coordinates"));
                }
                positions.push(Point3::new(coords[0], coords[1], coords[2]));
            },
            Some("f") => {
                let corners = tokens
                    .map(|t| resolve_index(t, positions.len(), line_no))
                    .collect::<Result<Vec<usize>>>()?;
                if corners.len() < 3 {
                    return Err(ThimbleError::parse(line_no, "face needs at least three vertices"));
                }
                let points: Vec<Point3<Real>> = corners.iter().map(|&i| positions[i]).collect();
                polygons.push(Polygon::from_points(&points));
            },
            _ => skipped += 1,
        }
    }

    debug!(
        vertices = positions.len(),
        faces = polygons.len(),
        skipped,
        "read OBJ"
    );
    Ok(Mesh::from_polygons(polygons))
}

/// Turn one face corner (`7`, `7/2`, `7//3`, `-1`) into a 0-based vertex index.
fn resolve_index(token: &str, vertex_count: usize, line: usize) -> Result<usize> {
    let head = token.split('/').next().unwrap_or(token);
    let raw: i64 = head
        .parse()
        .map_err(|e| ThimbleError::parse(line, format!("bad face index {token:?}: {e}")))?;
    let index = match raw {
        0 => None,
        r if r > 0 => Some(r as usize - 1),
        r => vertex_count.checked_sub(r.unsigned_abs() as usize),
    };
    index
        .filter(|&i| i < vertex_count)
        .ok_or_else(|| ThimbleError::parse(line, format!("face index {raw} out of range")))
}

/// Write `mesh` as OBJ, sharing bit-identical positions between faces.
pub fn write_obj<W: Write>(mesh: &Mesh, name: &str, mut out: W) -> Result<()> {
    let mut lookup: HashMap<[u64; 3], usize> = HashMap::new();
    let mut positions: Vec<Point3<Real>> = Vec::new();
    let faces: Vec<Vec<usize>> = mesh
        .polygons
        .iter()
        .map(|poly| {
            poly.vertices
                .iter()
                .map(|v| {
                    let key = [v.pos.x.to_bits(), v.pos.y.to_bits(), v.pos.z.to_bits()];
                    *lookup.entry(key).or_insert_with(|| {
                        positions.push(v.pos);
                        positions.len() - 1
                    })
                })
                .collect()
        })
        .collect();

    writeln!(out, "# thimble OBJ export")?;
    writeln!(out, "# Vertices: {}", positions.len())?;
    writeln!(out, "# Faces: {}", faces.len())?;
    writeln!(out, "o {name}")?;
    for p in &positions {
        writeln!(out, "v {} {} {}", p.x, p.y, p.z)?;
    }
    for face in &faces {
        write!(out, "f")?;
        for i in face {
            write!(out, " {}", i + 1)?;
        }
        writeln!(out)?;
    }
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const QUAD_AND_TRI: &str = "\
# comment
mtllib x.mtl
v 0 0 0
v 1 0 0
v 1 1 0
v 0 1 0
vn 0 0 1
vt 0 0
f 1/1/1 2/1/1 3//1 4
f -4 -3 -1
";

    #[test]
    fn reads_corner_variants_and_negative_indices() {
        let mesh = read_obj(QUAD_AND_TRI.as_bytes()).expect("parse");
        assert_eq!(mesh.face_count(), 2);
        assert_eq!(mesh.polygons[0].vertices.len(), 4);
        assert_eq!(mesh.polygons[1].vertices[2].pos, Point3::new(0.0, 1.0, 0.0));
        assert_relative_eq!(mesh.polygons[0].plane.normal.z, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn out_of_range_index_reports_line() {
        let err = read_obj("v 0 0 0\nv 1 0 0\nf 1 2 3\n".as_bytes()).unwrap_err();
        assert!(matches!(err, ThimbleError::Parse { line: 3, .. }));
    }

    #[test]
    fn bad_coordinate_is_an_error() {
        let err = read_obj("v 0 zero 0\n".as_bytes()).unwrap_err();
        assert!(matches!(err, ThimbleError::Parse { line: 1, .. }));
    }

    #[test]
    fn write_then_read_shares_vertices() {
        let cube = Mesh::cuboid(1.0, 2.0, 3.0);
        let mut buffer = Vec::new();
        write_obj(&cube, "cube", &mut buffer).expect("write");
        let text = String::from_utf8(buffer.clone()).expect("utf8");
        assert_eq!(text.lines().filter(|l| l.starts_with("v ")).count(), 8);
        assert_eq!(text.lines().filter(|l| l.starts_with("f ")).count(), 6);

        let back = read_obj(buffer.as_slice()).expect("read");
        assert_relative_eq!(back.signed_volume(), 6.0, epsilon = 1e-12);
    }
}
