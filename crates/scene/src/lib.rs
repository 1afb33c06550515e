//! Scene graph for the line-oriented scene description format, and the
//! interpreter that builds it.
//!
//! Every line of the input is one directive: a keyword followed by numeric
//! fields, e.g. `sphere 0 0 -2 0.5`. Blank lines and `#` comments are skipped.
//! Geometry is frozen when it is declared, together with the material and the
//! transform that are current at that point.
mod color;
mod parse;
mod reader;
mod transform;

use std::{fs, io, path::Path};

use geom::{m64, v64};

pub use crate::{
    color::Color,
    parse::Session,
    transform::{TransformStack, Underflow},
};

/// Point and directional lights share this cap.
pub const MAX_LIGHTS: usize = 10;

#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub width: u32,
    pub height: u32,
    pub max_depth: u32,
    pub camera: Option<Camera>,
    pub lights: Vec<Light>,
    pub vertices: Vec<v64>,
    pub geometries: Vec<Geometry>,
    pub output: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    pub eye: v64,
    pub target: v64,
    pub up: v64,
    /// Vertical field of view, in degrees.
    pub fovy: f64,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Light {
    Point { position: v64, color: Color },
    Directional { direction: v64, color: Color },
}

/// What a light contributes at a given point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Incident {
    /// Unit vector from the point towards the light.
    pub dir: v64,
    /// `f64::INFINITY` for directional lights.
    pub distance: f64,
    pub radiance: Color,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    pub ambient: Color,
    pub diffuse: Color,
    pub specular: Color,
    pub emission: Color,
    pub shininess: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Geometry {
    pub shape: Shape,
    pub transform: m64,
    pub material: Material,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Triangle(Triangle),
    Sphere(Sphere),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Triangle {
    pub v: [v64; 3],
}

#[derive(Debug, Clone, PartialEq)]
pub struct Sphere {
    pub center: v64,
    pub radius: f64,
}

/// Result of one pass over a scene description.
#[derive(Debug)]
pub struct Parsed {
    pub scene: Scene,
    pub warnings: Vec<Warning>,
}

/// line {line}: {kind}
#[derive(Debug, Clone, PartialEq, displaydoc::Display)]
pub struct Warning {
    pub line: usize,
    pub kind: WarningKind,
}

#[derive(Debug, Clone, PartialEq, displaydoc::Display)]
pub enum WarningKind {
    /// failed reading value {index}, skipping directive
    Arity { index: usize },
    /// reached maximum number of lights ({max}), ignoring further lights
    LightCapacity { max: usize },
    /// transform stack has no elements to pop
    StackUnderflow,
    /// unknown directive `{0}`, skipping
    UnknownDirective(String),
    /// vertex index {index} out of range for {vertices} vertices
    VertexIndex { index: f64, vertices: usize },
    /// rotation axis has zero length
    DegenerateAxis,
}

/// unable to open scene file {path}: {source}
#[derive(Debug, displaydoc::Display)]
pub struct OpenSceneError {
    path: String,
    source: io::Error,
}

impl std::error::Error for OpenSceneError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}

impl Default for Scene {
    fn default() -> Scene {
        Scene {
            width: 640,
            height: 480,
            max_depth: 5,
            camera: None,
            lights: Vec::new(),
            vertices: Vec::new(),
            geometries: Vec::new(),
            output: "raytrace.png".to_owned(),
        }
    }
}

impl Scene {
    pub fn parse(input: &str) -> Parsed {
        let mut session = Session::new();
        for line in input.lines() {
            session.feed(line);
        }
        session.finish()
    }

    /// Bytes that are not valid UTF-8 are replaced, so only failing to read
    /// the file is an error.
    pub fn open(path: &Path) -> Result<Parsed, OpenSceneError> {
        let bytes = fs::read(path)
            .map_err(|source| OpenSceneError { path: path.display().to_string(), source })?;
        Ok(Scene::parse(&String::from_utf8_lossy(&bytes)))
    }
}

impl Default for Material {
    fn default() -> Material {
        Material {
            ambient: Color::gray(0.2),
            diffuse: Color::BLACK,
            specular: Color::BLACK,
            emission: Color::BLACK,
            shininess: 0.0,
        }
    }
}

impl Light {
    /// `None` when no direction towards the light exists, i.e. the point sits
    /// on a point light or a directional light has a zero direction.
    pub fn incident(&self, point: v64) -> Option<Incident> {
        let res = match self {
            Light::Point { position, color } => {
                let to_light = *position - point;
                Incident { dir: to_light.try_unit()?, distance: to_light.norm(), radiance: *color }
            }
            Light::Directional { direction, color } => Incident {
                dir: direction.try_unit()?,
                distance: f64::INFINITY,
                radiance: *color,
            },
        };
        Some(res)
    }
}
