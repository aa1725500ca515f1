mod support;

use approx::assert_relative_eq;
use std::fs;
use thimble::{
    ThimbleError,
    io::{MeshFormat, load_mesh, save_mesh},
    scene::Scene,
};

use crate::support::{tube, write_fixture};

#[test]
fn obj_round_trip_keeps_polygons() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mesh = tube(5.0, 3.0, 4.0, 16);
    let path = write_fixture(dir.path(), "tube.obj", &mesh);

    let text = fs::read_to_string(&path).expect("read back");
    assert!(text.starts_with("# thimble OBJ export"));
    assert!(text.contains("o fixture"));

    let loaded = load_mesh(&path).expect("load");
    assert_eq!(loaded, mesh);
}

#[cfg(feature = "stl-io")]
#[test]
fn stl_round_trip_triangulates() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mesh = tube(5.0, 3.0, 4.0, 16);
    let path = write_fixture(dir.path(), "tube.STL", &mesh);

    let loaded = load_mesh(&path).expect("load");
    assert_eq!(loaded.face_count(), 2 * mesh.face_count());
    assert_relative_eq!(loaded.signed_volume(), mesh.signed_volume(), epsilon = 1e-3);
    assert!(loaded.is_manifold());
}

#[test]
fn unknown_extension_is_rejected() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("tube.ply");
    let err = save_mesh(&tube(5.0, 3.0, 4.0, 8), "tube", &path).unwrap_err();
    assert!(matches!(err, ThimbleError::UnsupportedFormat(_)));
    assert!(MeshFormat::from_path(&path).is_err());
    assert!(!path.exists());
}

#[test]
fn malformed_obj_reports_the_line() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("bad.obj");
    fs::write(&path, "v 0 0 0\nv 1 0 0\nf 1 2 9\n").expect("write");
    let err = load_mesh(&path).unwrap_err();
    assert!(matches!(err, ThimbleError::Parse { line: 3, .. }), "got {err:?}");
}

#[test]
fn importing_an_empty_file_is_an_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("empty.obj");
    fs::write(&path, "# nothing here\n").expect("write");

    let mut scene = Scene::new();
    let err = scene.import(&path, "micro").unwrap_err();
    assert!(matches!(err, ThimbleError::EmptyImport(_)));
    assert!(scene.is_empty());
}

#[test]
fn scene_export_and_import() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut scene = Scene::new();
    scene.add("ring", tube(5.0, 3.0, 4.0, 12));
    let path = dir.path().join("ring.obj");
    scene.export("ring", &path).expect("export");

    scene.clear();
    scene.import(&path, "again").expect("import");
    assert_eq!(scene.face_count("again").ok(), Some(48));
    assert!(matches!(
        scene.export("ring", &path),
        Err(ThimbleError::MissingObject(_))
    ));
}
