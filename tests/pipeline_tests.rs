mod support;

use approx::assert_relative_eq;
use nalgebra::Point3;
use thimble::{
    config::{CapConfig, PouchConfig},
    fixtures::{MagnetSpec, PouchDimensions, create_pouch},
    float_types::{Real, TAU},
    io::load_mesh,
    measure::BoundingBox,
    mesh::shapes::Axis,
    pipeline::{CapPipeline, PouchPipeline, SimplifyOutcome},
    scene::Scene,
    traits::CSG,
};

use crate::support::{tube, write_fixture};

/// Area of a regular `segments`-gon with circumradius `radius`.
fn ngon_area(radius: Real, segments: usize) -> Real {
    0.5 * segments as Real * radius * radius * (TAU / segments as Real).sin()
}

#[test]
fn cap_pipeline_grows_the_part_by_two_thicknesses() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = write_fixture(dir.path(), "body.obj", &tube(10.0, 6.0, 10.0, 32));
    let obj_out = dir.path().join("thimble.obj");
    let stl_out = dir.path().join("thimble.stl");

    let config = CapConfig {
        segments: 32,
        ..CapConfig::default()
    };
    let mut scene = Scene::new();
    let report = CapPipeline::new(config)
        .run(&mut scene, &input, &obj_out, Some(&stl_out))
        .expect("cap pipeline");

    assert_eq!(report.imported_faces, 128);
    assert_relative_eq!(report.params.outer_radius, 10.0, epsilon = 1e-9);
    assert_relative_eq!(report.params.inner_radius, 2.15, epsilon = 1e-9);
    assert_relative_eq!(report.params.thickness, 2.0);

    // the seams of the boolean are split, not patched over
    assert!(report.finalize.t_junctions_split > 0);
    assert_eq!(report.finalize.holes_filled, 0);
    assert!(!report.finalize.manifold.is_failed());

    let exported = load_mesh(&obj_out).expect("OBJ re-imports");
    assert_eq!(exported.face_count(), report.faces());
    assert!(exported.polygons.iter().all(|p| p.vertices.len() == 3));
    assert!(exported.is_manifold());
    let bb = BoundingBox::of_mesh(&exported).expect("bounds");
    assert_relative_eq!(bb.height_y(), 10.0 + 2.0 * 2.0, epsilon = 1e-4);
    assert_relative_eq!(bb.min_y, -7.0, epsilon = 1e-4);

    // body plus two bored caps
    let body = (ngon_area(10.0, 32) - ngon_area(6.0, 32)) * 10.0;
    let caps = 2.0 * 2.0 * (ngon_area(10.0, 32) - ngon_area(2.15, 32));
    assert_relative_eq!(body + caps, 3188.59, epsilon = 0.01);
    assert_relative_eq!(exported.signed_volume(), body + caps, max_relative = 1e-6);

    #[cfg(feature = "stl-io")]
    {
        let stl = load_mesh(&stl_out).expect("STL re-imports");
        assert_eq!(stl.face_count(), report.faces());
    }
}

#[test]
fn pouch_pipeline_seats_four_pouches() {
    let dir = tempfile::tempdir().expect("tempdir");
    let body = tube(20.0, 2.0, 12.0, 32);
    let input = write_fixture(dir.path(), "body.obj", &body);
    let output = dir.path().join("boolean-body.obj");
    let simplified = dir.path().join("simplified-body.obj");

    let config = PouchConfig {
        segments: 16,
        ..PouchConfig::default()
    };
    let mut scene = Scene::new();
    let report = PouchPipeline::new(config)
        .run(&mut scene, &input, &output, Some(&simplified))
        .expect("pouch pipeline");

    assert_eq!(report.simplify, SimplifyOutcome::Skipped { faces: 128 });
    assert!(!simplified.exists());
    assert_relative_eq!(report.outer_radius, 20.0, epsilon = 1e-9);
    assert_relative_eq!(report.inner_radius, 6.0, epsilon = 1e-9);
    assert_relative_eq!(report.mid_radius, 13.0, epsilon = 1e-9);
    assert_relative_eq!(report.centers[0].x, 13.0, epsilon = 1e-9);
    assert_relative_eq!(report.centers[3].z, -13.0, epsilon = 1e-9);
    assert_eq!(scene.names().collect::<Vec<_>>(), vec!["micro"]);
    assert!(report.t_junctions_split > 0);

    let exported = load_mesh(&output).expect("OBJ re-imports");
    assert_eq!(exported.face_count(), report.faces);
    assert!(exported.is_manifold());

    // each pouch swaps its envelope for the part of the socket inside it
    let mut scratch = Scene::new();
    let (convex, pouch) = create_pouch(
        &mut scratch,
        &MagnetSpec::default(),
        Point3::origin(),
        "pouch",
        Axis::Y,
        16,
    )
    .expect("pouch");
    let envelope = scratch.object(&convex).expect("envelope");
    let socket = scratch.object(&pouch).expect("socket");
    let seated = socket.intersection(envelope).signed_volume();
    assert!(seated < socket.signed_volume());
    let expected = body.signed_volume() + 4.0 * (seated - envelope.signed_volume());
    assert_relative_eq!(exported.signed_volume(), expected, max_relative = 1e-6);

    let dims = PouchDimensions::from_magnet(&MagnetSpec::default());
    for center in report.centers {
        let cavity = center + Axis::Y.unit() * (dims.outer_z / 2.0);
        assert!(!exported.contains_vertex(&cavity), "cavity at {cavity:?} is sealed and empty");
        let wall = center - Axis::Y.unit() * 3.0;
        assert!(exported.contains_vertex(&wall), "wall below {center:?} is solid");
    }
}

#[test]
fn pouch_pipeline_decimates_over_budget_parts() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = write_fixture(dir.path(), "body.obj", &tube(16.0, 2.0, 10.0, 48));
    let output = dir.path().join("boolean-body.obj");
    let simplified = dir.path().join("simplified-body.obj");

    let config = PouchConfig {
        segments: 16,
        target_faces: 150,
        ..PouchConfig::default()
    };
    let mut scene = Scene::new();
    let report = PouchPipeline::new(config)
        .run(&mut scene, &input, &output, Some(&simplified))
        .expect("pouch pipeline");

    let SimplifyOutcome::Decimated { ratio, faces_before, .. } = report.simplify else {
        panic!("expected decimation, got {:?}", report.simplify);
    };
    assert_eq!(faces_before, 192);
    assert_relative_eq!(ratio, 150.0 / 192.0, epsilon = 1e-12);
    assert!(simplified.exists());
    assert!(output.exists());
}
