pub mod rgb;
mod render;

use geom::{cross, v64, Ray};
use scene::{Color, Scene};
use tracing::info;

use crate::render::Tracer;

/// Largest image, in pixels, the renderer allocates a buffer for.
pub const MAX_PIXELS: u64 = 1 << 26;

/// {0}
#[derive(Debug, displaydoc::Display)]
pub struct Error(ErrorRepr);

#[derive(Debug, displaydoc::Display)]
enum ErrorRepr {
    /// scene has no camera
    NoCamera,
    /// invalid image size {0}x{1}
    EmptyImage(u32, u32),
    /// image size {0}x{1} exceeds the pixel limit
    ImageTooLarge(u32, u32),
    /// camera view direction is zero or parallel to its up vector
    DegenerateCamera,
}

impl From<ErrorRepr> for Error {
    fn from(repr: ErrorRepr) -> Error {
        Error(repr)
    }
}

impl std::error::Error for Error {}

/// Traces one ray per pixel. Row `y = 0` of the result is the bottom of the
/// image.
pub fn render(scene: &Scene) -> Result<rgb::Buf, Error> {
    let cfg = scene.camera.as_ref().ok_or(ErrorRepr::NoCamera)?;
    let dim @ [width, height] = [scene.width, scene.height];
    if width == 0 || height == 0 {
        Err(ErrorRepr::EmptyImage(width, height))?
    }
    if u64::from(width) * u64::from(height) > MAX_PIXELS {
        Err(ErrorRepr::ImageTooLarge(width, height))?
    }
    let camera = Camera::new(cfg, dim).ok_or(ErrorRepr::DegenerateCamera)?;
    let tracer = Tracer::new(scene);
    info!(width, height, objects = tracer.len(), lights = scene.lights.len(), "rendering");

    let mut buf = rgb::Buf::new(dim);
    for y in 0..height {
        for x in 0..width {
            let [dx, dy] = to_screen_space(dim, [x, y]);
            let ray = camera.cast(dx, dy);
            let color = tracer.trace(&ray, 0);
            buf[[x, y]] = to_rgb(&color);
        }
    }
    Ok(buf)
}

/// Pixel centers mapped to `[-1, 1]`, `y` pointing up.
fn to_screen_space(res: rgb::Idx, idx: rgb::Idx) -> [f64; 2] {
    let f = |d: u32, x: u32| {
        let d = d as f64;
        let x = x as f64 + 0.5;
        (2.0 * x - d) / d
    };
    [f(res[0], idx[0]), f(res[1], idx[1])]
}

fn to_rgb(color: &Color) -> rgb::Color {
    fn f(value: f64) -> u8 {
        (value * 255.0).clamp(0.0, 255.0).round() as u8
    }
    rgb::Color { r: f(color.r), g: f(color.g), b: f(color.b) }
}

pub(crate) struct Camera {
    pos: v64,
    forward: v64,
    dx: v64,
    dy: v64,
}

impl Camera {
    /// The aspect ratio comes from the size captured by the `camera`
    /// directive, falling back to the image size.
    pub(crate) fn new(cfg: &scene::Camera, dim: rgb::Idx) -> Option<Camera> {
        let forward = (cfg.target - cfg.eye).try_unit()?;
        let right = cross(forward, cfg.up).try_unit()?;
        let up = cross(right, forward);

        let [w, h] = if cfg.width > 0 && cfg.height > 0 { [cfg.width, cfg.height] } else { dim };
        let tan_y = (cfg.fovy.to_radians() / 2.0).tan();
        let tan_x = tan_y * w as f64 / h as f64;
        Some(Camera { pos: cfg.eye, forward, dx: right * tan_x, dy: up * tan_y })
    }

    pub(crate) fn cast(&self, dx: f64, dy: f64) -> Ray {
        Ray::new(self.pos, self.forward + self.dx * dx + self.dy * dy)
    }
}
