use std::{fs, path::Path};

use geom::{m64, v64};
use scene::{Color, Geometry, Light, Scene, Shape, Sphere, Triangle, WarningKind, MAX_LIGHTS};

fn spheres(scene: &Scene) -> Vec<(&Sphere, &Geometry)> {
    scene
        .geometries
        .iter()
        .filter_map(|g| match &g.shape {
            Shape::Sphere(s) => Some((s, g)),
            Shape::Triangle(_) => None,
        })
        .collect()
}

#[test]
fn comments_and_blank_lines_only() {
    let parsed = Scene::parse("# a scene\n\n   \n# with nothing in it\n");
    assert!(parsed.warnings.is_empty());
    let scene = parsed.scene;
    assert!(scene.camera.is_none());
    assert!(scene.lights.is_empty());
    assert!(scene.vertices.is_empty());
    assert!(scene.geometries.is_empty());
}

#[test]
fn triangle_freezes_vertices_and_transform() {
    let parsed = Scene::parse(
        "
vertex -1 -1 0
vertex 1 -1 0
vertex 1 1 0
vertex -1 1 0
translate 0 0 -3
tri 0 1 2
scale 4 4 4
tri 0 2 3
",
    );
    assert!(parsed.warnings.is_empty());
    let scene = parsed.scene;
    assert_eq!(scene.vertices.len(), 4);
    assert_eq!(scene.geometries.len(), 2);

    let first = &scene.geometries[0];
    assert_eq!(
        first.shape,
        Shape::Triangle(Triangle {
            v: [v64(-1.0, -1.0, 0.0), v64(1.0, -1.0, 0.0), v64(1.0, 1.0, 0.0)]
        })
    );
    assert_eq!(first.transform, m64::translate(v64(0.0, 0.0, -3.0)));

    let second = &scene.geometries[1];
    assert_eq!(
        second.transform,
        m64::translate(v64(0.0, 0.0, -3.0)) * m64::scale(v64(4.0, 4.0, 4.0))
    );
}

#[test]
fn material_snapshot_is_not_retroactive() {
    let scene = Scene::parse(
        "
diffuse 1 0 0
sphere 0 0 0 1
diffuse 0 1 0
sphere 2 0 0 1
",
    )
    .scene;
    let spheres = spheres(&scene);
    assert_eq!(spheres[0].1.material.diffuse, Color::new(1.0, 0.0, 0.0));
    assert_eq!(spheres[1].1.material.diffuse, Color::new(0.0, 1.0, 0.0));
    assert_eq!(spheres[1].1.material.ambient, Color::gray(0.2));
}

#[test]
fn eleventh_light_is_dropped() {
    let input: String = (0..11).map(|i| format!("point {i} 0 0 1 1 1\n")).collect();
    let parsed = Scene::parse(&input);
    assert_eq!(parsed.scene.lights.len(), MAX_LIGHTS);
    for (i, light) in parsed.scene.lights.iter().enumerate() {
        assert_eq!(
            *light,
            Light::Point { position: v64(i as f64, 0.0, 0.0), color: Color::gray(1.0) }
        );
    }
    assert_eq!(parsed.warnings.len(), 1);
    assert_eq!(parsed.warnings[0].line, 11);
    assert_eq!(parsed.warnings[0].kind, WarningKind::LightCapacity { max: MAX_LIGHTS });
}

#[test]
fn translate_then_scale_composition() {
    let scene = Scene::parse("translate 1 0 0\nscale 2 2 2\nsphere 0 0 0 1").scene;
    let spheres = spheres(&scene);
    let (sphere, geometry) = spheres[0];
    assert_eq!(sphere.center, v64::ZERO);
    assert_eq!(sphere.radius, 1.0);

    let t = m64::translate(v64(1.0, 0.0, 0.0));
    let s = m64::scale(v64(2.0, 2.0, 2.0));
    assert_eq!(geometry.transform, t * s);
    assert_eq!(geometry.transform.apply_point(sphere.center), v64(1.0, 0.0, 0.0));
}

#[test]
fn nested_transforms_scope_geometry() {
    let scene = Scene::parse(
        "
translate 0 0 -5
pushTransform
  rotate 0 1 0 90
  sphere 1 0 0 0.5
popTransform
sphere 1 0 0 0.5
popTransform
",
    );
    assert_eq!(scene.warnings.len(), 1);
    assert_eq!(scene.warnings[0].kind, WarningKind::StackUnderflow);
    let spheres = spheres(&scene.scene);
    let inner = spheres[0].1.transform.apply_point(v64(1.0, 0.0, 0.0));
    let outer = spheres[1].1.transform.apply_point(v64(1.0, 0.0, 0.0));
    assert!((inner - v64(0.0, 0.0, -6.0)).norm() < 1e-12);
    assert_eq!(outer, v64(1.0, 0.0, -5.0));
}

#[test]
fn later_camera_replaces_earlier() {
    let scene = Scene::parse(
        "
size 64 48
camera 0 0 1 0 0 0 0 1 0 30
camera 0 0 9 0 0 0 0 1 0 60
",
    )
    .scene;
    let camera = scene.camera.unwrap();
    assert_eq!(camera.eye, v64(0.0, 0.0, 9.0));
    assert_eq!(camera.fovy, 60.0);
}

#[test]
fn bad_lines_do_not_stop_the_pass() {
    let parsed = Scene::parse(
        "
size 10 10
sphere 0 0
bogus
vertex 0 0 0
tri 0 0 7
sphere 0 0 0 2
",
    );
    let kinds: Vec<_> = parsed.warnings.iter().map(|it| (it.line, it.kind.clone())).collect();
    assert_eq!(
        kinds,
        [
            (3, WarningKind::Arity { index: 2 }),
            (4, WarningKind::UnknownDirective("bogus".to_owned())),
            (6, WarningKind::VertexIndex { index: 7.0, vertices: 1 }),
        ]
    );
    assert_eq!(parsed.scene.geometries.len(), 1);
}

#[test]
fn open_reads_file() {
    let dir = std::env::temp_dir().join(format!("scene-open-{}", std::process::id()));
    fs::create_dir_all(&dir).unwrap();
    let path = dir.join("two.test");
    fs::write(&path, "size 2 2\r\noutput two.png\r\nsphere 0 0 0 1\r\n").unwrap();

    let parsed = Scene::open(&path).unwrap();
    assert!(parsed.warnings.is_empty());
    assert_eq!(parsed.scene.output, "two.png");
    assert_eq!(parsed.scene.geometries.len(), 1);

    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn open_accepts_non_utf8_bytes() {
    let dir = std::env::temp_dir().join(format!("scene-latin1-{}", std::process::id()));
    fs::create_dir_all(&dir).unwrap();
    let path = dir.join("latin1.test");
    fs::write(&path, b"# caf\xe9 scene\nsize 8 8\nsphere 0 0 0 1\n").unwrap();

    let parsed = Scene::open(&path).unwrap();
    assert!(parsed.warnings.is_empty());
    assert_eq!((parsed.scene.width, parsed.scene.height), (8, 8));
    assert_eq!(parsed.scene.geometries.len(), 1);

    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn open_missing_file_is_fatal() {
    let err = Scene::open(Path::new("/definitely/not/here.test")).unwrap_err();
    assert!(err.to_string().starts_with("unable to open scene file /definitely/not/here.test: "));
    let source = std::error::Error::source(&err).unwrap();
    let io = source.downcast_ref::<std::io::Error>().unwrap();
    assert_eq!(io.kind(), std::io::ErrorKind::NotFound);
}
