use scene::Scene;

fn render(input: &str) -> Result<render::rgb::Buf, render::Error> {
    let parsed = Scene::parse(input);
    assert!(parsed.warnings.is_empty(), "{:?}", parsed.warnings);
    render::render(&parsed.scene)
}

#[test]
fn scene_without_camera_is_an_error() {
    let err = render("size 4 4\nsphere 0 0 0 1").unwrap_err();
    assert_eq!(err.to_string(), "scene has no camera");
}

#[test]
fn empty_image_is_an_error() {
    let err = render("size 0 4\ncamera 0 0 5 0 0 0 0 1 0 45").unwrap_err();
    assert_eq!(err.to_string(), "invalid image size 0x4");
}

#[test]
fn huge_image_is_an_error() {
    let err = render("size 4294967295 4294967295\ncamera 0 0 5 0 0 0 0 1 0 45").unwrap_err();
    assert_eq!(err.to_string(), "image size 4294967295x4294967295 exceeds the pixel limit");
    let err = render("size 16384 16384\ncamera 0 0 5 0 0 0 0 1 0 45").unwrap_err();
    assert!(err.to_string().starts_with("image size 16384x16384 exceeds"));
}

#[test]
fn sphere_covers_center_but_not_corners() {
    let buf = render(
        "
size 9 7
camera 0 0 5 0 0 0 0 1 0 45
ambient 1 0 0
sphere 0 0 0 1
",
    )
    .unwrap();
    assert_eq!(buf.dim(), [9, 7]);
    assert_eq!(buf[[4, 3]], render::rgb::Color::new(255, 0, 0));
    for corner in [[0, 0], [8, 0], [0, 6], [8, 6]] {
        assert_eq!(buf[corner], render::rgb::Color::default());
    }
}

#[test]
fn bottom_row_is_y_zero() {
    // Only the lower half of the view is covered by the sphere.
    let buf = render(
        "
size 5 5
camera 0 0 5 0 0 0 0 1 0 90
ambient 0 0 1
sphere 0 -6 -3 5
",
    )
    .unwrap();
    assert_eq!(buf[[2, 0]], render::rgb::Color::new(0, 0, 255));
    assert_eq!(buf[[2, 4]], render::rgb::Color::default());
}

#[test]
fn directional_light_brightens_facing_side() {
    let buf = render(
        "
size 21 21
camera 0 0 5 0 0 0 0 1 0 30
ambient 0 0 0
diffuse 1 1 1
directional 1 0 0 1 1 1
sphere 0 0 0 1
",
    )
    .unwrap();
    let left = buf[[7, 10]];
    let right = buf[[13, 10]];
    assert_eq!(left.r, 0);
    assert!(right.r > 0);
}
