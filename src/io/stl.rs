//! STL import and export through `stl_io`.

use crate::errors::Result;
use crate::float_types::Real;
use crate::mesh::{Mesh, polygon::Polygon};
use nalgebra::Point3;
use std::io::{Read, Seek, Write};
use stl_io::{Normal, Triangle, Vertex};
use tracing::debug;

/// Read ASCII or binary STL. Facet normals in the file are ignored; each
/// triangle's normal follows its winding.
pub fn read_stl<R: Read + Seek>(reader: &mut R) -> Result<Mesh> {
    let indexed = stl_io::read_stl(reader)?;
    let point = |i: usize| {
        let v = indexed.vertices[i];
        Point3::new(v[0] as Real, v[1] as Real, v[2] as Real)
    };
    let polygons: Vec<Polygon> = indexed
        .faces
        .iter()
        .map(|face| {
            Polygon::from_points(&[
                point(face.vertices[0]),
                point(face.vertices[1]),
                point(face.vertices[2]),
            ])
        })
        .collect();
    debug!(triangles = polygons.len(), "read STL");
    Ok(Mesh::from_polygons(polygons))
}

/// Write binary STL, triangulating polygons on the way out.
pub fn write_stl<W: Write>(mesh: &Mesh, out: &mut W) -> Result<()> {
    let triangles: Vec<Triangle> = mesh
        .polygons
        .iter()
        .flat_map(|poly| {
            let n = poly.plane.normal();
            poly.triangulate().into_iter().map(move |tri| Triangle {
                normal: Normal::new([n.x as f32, n.y as f32, n.z as f32]),
                vertices: tri
                    .map(|v| Vertex::new([v.pos.x as f32, v.pos.y as f32, v.pos.z as f32])),
            })
        })
        .collect();
    stl_io::write_stl(out, triangles.iter())?;
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::io::Cursor;

    #[test]
    fn binary_round_trip_keeps_shape() {
        let cube = Mesh::cuboid(2.0, 2.0, 2.0);
        let mut bytes = Cursor::new(Vec::new());
        write_stl(&cube, &mut bytes).expect("write");
        // 80-byte header, count, 50 bytes per facet
        assert_eq!(bytes.get_ref().len(), 84 + 12 * 50);

        bytes.set_position(0);
        let back = read_stl(&mut bytes).expect("read");
        assert_eq!(back.face_count(), 12);
        assert_relative_eq!(back.signed_volume(), 8.0, epsilon = 1e-5);
    }
}
