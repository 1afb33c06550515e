use geom::{m64, v64};
use tracing::{debug, warn};

use crate::{
    reader::Fields, transform::TransformStack, Camera, Color, Geometry, Light, Material,
    Parsed, Scene, Shape, Sphere, Triangle, Warning, WarningKind, MAX_LIGHTS,
};

/// One forward pass over a scene description.
///
/// Owns everything a directive may touch: the scene being built, the
/// transform stack and the current material. Lines are fed one at a time,
/// and nothing a line does can fail the pass as a whole.
pub struct Session {
    scene: Scene,
    transforms: TransformStack,
    material: Material,
    warnings: Vec<Warning>,
    line: usize,
}

struct Directive {
    keyword: &'static str,
    arity: usize,
    apply: fn(&mut Session, Args<'_, '_>) -> Result<(), WarningKind>,
}

struct Args<'v, 'i> {
    values: &'v [f64],
    fields: Fields<'i>,
}

const MAX_ARITY: usize = 10;

#[rustfmt::skip]
const DIRECTIVES: &[Directive] = &[
    Directive { keyword: "size",          arity: 2,  apply: size },
    Directive { keyword: "maxdepth",      arity: 1,  apply: max_depth },
    Directive { keyword: "output",        arity: 0,  apply: output },
    Directive { keyword: "camera",        arity: 10, apply: camera },
    Directive { keyword: "point",         arity: 6,  apply: point },
    Directive { keyword: "directional",   arity: 6,  apply: directional },
    Directive { keyword: "attenuation",   arity: 0,  apply: ignore },
    Directive { keyword: "maxverts",      arity: 1,  apply: ignore },
    Directive { keyword: "vertex",        arity: 3,  apply: vertex },
    Directive { keyword: "tri",           arity: 3,  apply: tri },
    Directive { keyword: "sphere",        arity: 4,  apply: sphere },
    Directive { keyword: "ambient",       arity: 3,  apply: |s, a| { s.material.ambient = color(a.values); Ok(()) } },
    Directive { keyword: "diffuse",       arity: 3,  apply: |s, a| { s.material.diffuse = color(a.values); Ok(()) } },
    Directive { keyword: "specular",      arity: 3,  apply: |s, a| { s.material.specular = color(a.values); Ok(()) } },
    Directive { keyword: "emission",      arity: 3,  apply: |s, a| { s.material.emission = color(a.values); Ok(()) } },
    Directive { keyword: "shininess",     arity: 1,  apply: |s, a| { s.material.shininess = a.values[0]; Ok(()) } },
    Directive { keyword: "translate",     arity: 3,  apply: translate },
    Directive { keyword: "scale",         arity: 3,  apply: scale },
    Directive { keyword: "rotate",        arity: 4,  apply: rotate },
    Directive { keyword: "pushTransform", arity: 0,  apply: push_transform },
    Directive { keyword: "popTransform",  arity: 0,  apply: pop_transform },
];

impl Default for Session {
    fn default() -> Session {
        Session::new()
    }
}

impl Session {
    pub fn new() -> Session {
        Session {
            scene: Scene::default(),
            transforms: TransformStack::new(),
            material: Material::default(),
            warnings: Vec::new(),
            line: 0,
        }
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn transforms(&self) -> &TransformStack {
        &self.transforms
    }

    pub fn material(&self) -> &Material {
        &self.material
    }

    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    /// Interprets the next line of input.
    pub fn feed(&mut self, line: &str) {
        self.line += 1;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return;
        }

        let mut fields = Fields::new(line);
        let Some(keyword) = fields.word() else { return };
        let Some(directive) = DIRECTIVES.iter().find(|it| it.keyword == keyword) else {
            self.warn(WarningKind::UnknownDirective(keyword.to_owned()));
            return;
        };

        let mut buf = [0.0; MAX_ARITY];
        let res = match fields.read(&mut buf[..directive.arity]) {
            Ok(values) => (directive.apply)(self, Args { values, fields }),
            Err(err) => Err(err),
        };
        match res {
            Ok(()) => debug!(line = self.line, keyword, "applied"),
            Err(kind) => self.warn(kind),
        }
    }

    pub fn finish(self) -> Parsed {
        debug!(
            lights = self.scene.lights.len(),
            vertices = self.scene.vertices.len(),
            geometries = self.scene.geometries.len(),
            warnings = self.warnings.len(),
            "scene parsed"
        );
        Parsed { scene: self.scene, warnings: self.warnings }
    }

    fn warn(&mut self, kind: WarningKind) {
        let warning = Warning { line: self.line, kind };
        warn!("{warning}");
        self.warnings.push(warning);
    }

    fn add_light(&mut self, light: Light) -> Result<(), WarningKind> {
        if self.scene.lights.len() >= MAX_LIGHTS {
            Err(WarningKind::LightCapacity { max: MAX_LIGHTS })?
        }
        self.scene.lights.push(light);
        Ok(())
    }

    fn add_geometry(&mut self, shape: Shape) {
        let geometry = Geometry {
            shape,
            transform: *self.transforms.top(),
            material: self.material.clone(),
        };
        self.scene.geometries.push(geometry);
    }
}

fn size(s: &mut Session, a: Args<'_, '_>) -> Result<(), WarningKind> {
    s.scene.width = a.values[0] as u32;
    s.scene.height = a.values[1] as u32;
    Ok(())
}

fn max_depth(s: &mut Session, a: Args<'_, '_>) -> Result<(), WarningKind> {
    s.scene.max_depth = a.values[0] as u32;
    Ok(())
}

fn output(s: &mut Session, mut a: Args<'_, '_>) -> Result<(), WarningKind> {
    let name = a.fields.word().ok_or(WarningKind::Arity { index: 0 })?;
    s.scene.output = name.to_owned();
    Ok(())
}

fn camera(s: &mut Session, a: Args<'_, '_>) -> Result<(), WarningKind> {
    let v = a.values;
    s.scene.camera = Some(Camera {
        eye: vector(&v[0..3]),
        target: vector(&v[3..6]),
        up: vector(&v[6..9]),
        fovy: v[9],
        width: s.scene.width,
        height: s.scene.height,
    });
    Ok(())
}

fn point(s: &mut Session, a: Args<'_, '_>) -> Result<(), WarningKind> {
    let v = a.values;
    s.add_light(Light::Point { position: vector(&v[0..3]), color: color(&v[3..6]) })
}

fn directional(s: &mut Session, a: Args<'_, '_>) -> Result<(), WarningKind> {
    let v = a.values;
    s.add_light(Light::Directional { direction: vector(&v[0..3]), color: color(&v[3..6]) })
}

fn ignore(_: &mut Session, _: Args<'_, '_>) -> Result<(), WarningKind> {
    Ok(())
}

fn vertex(s: &mut Session, a: Args<'_, '_>) -> Result<(), WarningKind> {
    s.scene.vertices.push(vector(a.values));
    Ok(())
}

fn tri(s: &mut Session, a: Args<'_, '_>) -> Result<(), WarningKind> {
    let [i0, i1, i2] = [a.values[0], a.values[1], a.values[2]];
    let v = [pool_vertex(&s.scene, i0)?, pool_vertex(&s.scene, i1)?, pool_vertex(&s.scene, i2)?];
    s.add_geometry(Shape::Triangle(Triangle { v }));
    Ok(())
}

fn sphere(s: &mut Session, a: Args<'_, '_>) -> Result<(), WarningKind> {
    let v = a.values;
    s.add_geometry(Shape::Sphere(Sphere { center: vector(&v[0..3]), radius: v[3] }));
    Ok(())
}

fn translate(s: &mut Session, a: Args<'_, '_>) -> Result<(), WarningKind> {
    s.transforms.right_multiply(m64::translate(vector(a.values)));
    Ok(())
}

fn scale(s: &mut Session, a: Args<'_, '_>) -> Result<(), WarningKind> {
    s.transforms.right_multiply(m64::scale(vector(a.values)));
    Ok(())
}

fn rotate(s: &mut Session, a: Args<'_, '_>) -> Result<(), WarningKind> {
    let axis = vector(&a.values[0..3]).try_unit().ok_or(WarningKind::DegenerateAxis)?;
    let radians = a.values[3].to_radians();
    s.transforms.right_multiply(m64::rotate(axis, radians));
    Ok(())
}

fn push_transform(s: &mut Session, _: Args<'_, '_>) -> Result<(), WarningKind> {
    s.transforms.push();
    Ok(())
}

fn pop_transform(s: &mut Session, _: Args<'_, '_>) -> Result<(), WarningKind> {
    s.transforms.pop().map_err(|_| WarningKind::StackUnderflow)
}

/// Indices are truncated toward zero, like an integer cast.
fn pool_vertex(scene: &Scene, value: f64) -> Result<v64, WarningKind> {
    let index = value.trunc();
    let vertex = if index >= 0.0 { scene.vertices.get(index as usize) } else { None };
    vertex
        .copied()
        .ok_or(WarningKind::VertexIndex { index: value, vertices: scene.vertices.len() })
}

fn vector(v: &[f64]) -> v64 {
    v64(v[0], v[1], v[2])
}

fn color(v: &[f64]) -> Color {
    Color::new(v[0], v[1], v[2])
}
