use geom::{cross, dot, m64, reflect, v64, Ray};
use scene::{Color, Geometry, Material, Scene, Shape, Sphere, Triangle};
use tracing::warn;

/// Offset along the normal for secondary rays, against self-intersection.
const EPSILON: f64 = 1e-6;

pub(crate) struct Tracer<'s> {
    scene: &'s Scene,
    objects: Vec<Object<'s>>,
}

/// A geometry together with the matrices needed to intersect it in its own
/// coordinate frame.
struct Object<'s> {
    geometry: &'s Geometry,
    inverse: m64,
    normal: m64,
}

struct Intersection<'a> {
    t: f64,
    n: v64,
    material: &'a Material,
}

impl<'s> Tracer<'s> {
    pub(crate) fn new(scene: &'s Scene) -> Tracer<'s> {
        let mut objects = Vec::with_capacity(scene.geometries.len());
        for (i, geometry) in scene.geometries.iter().enumerate() {
            match geometry.transform.inverse() {
                Some(inverse) => {
                    objects.push(Object { geometry, inverse, normal: inverse.transpose() })
                }
                None => warn!("skipping geometry {i}: transform is not invertible"),
            }
        }
        Tracer { scene, objects }
    }

    pub(crate) fn len(&self) -> usize {
        self.objects.len()
    }

    pub(crate) fn trace(&self, ray: &Ray, depth: u32) -> Color {
        let Some(i) = self.intersect(ray, f64::INFINITY) else {
            return Color::BLACK;
        };
        let material = i.material;
        let mut n = i.n;
        if dot(n, ray.dir()) > 0.0 {
            n = -n;
        }
        let p = ray.at(i.t) + n * EPSILON;
        let to_eye = -ray.dir();

        let mut res = material.ambient + material.emission;
        for light in &self.scene.lights {
            let Some(incident) = light.incident(p) else { continue };
            let shadow = Ray::new(p, incident.dir);
            if self.intersect(&shadow, incident.distance).is_some() {
                continue;
            }

            let lambert = dot(n, incident.dir).max(0.0);
            let mut shade = material.diffuse * lambert;
            if let Some(half) = (incident.dir + to_eye).try_unit() {
                let phong = dot(n, half).max(0.0).powf(material.shininess);
                shade = shade + material.specular * phong;
            }
            res = res + incident.radiance * shade;
        }

        if depth < self.scene.max_depth && !material.specular.is_black() {
            let reflected = Ray::new(p, reflect(ray.dir(), n));
            res = res + material.specular * self.trace(&reflected, depth + 1);
        }
        res
    }

    /// Closest hit with `t < max_t`; `t` is a distance along the unit `ray`.
    fn intersect(&self, ray: &Ray, max_t: f64) -> Option<Intersection<'s>> {
        let mut res: Option<Intersection<'s>> = None;
        for o in &self.objects {
            let max_t = res.as_ref().map(|it| it.t).unwrap_or(max_t);
            let geometry: &'s Geometry = o.geometry;
            // The parameter `t` survives an affine change of frame as long as
            // the direction is not renormalized.
            let local = ray.transform(&o.inverse);
            let hit = match &geometry.shape {
                Shape::Sphere(s) => intersect_sphere(s, &local, max_t),
                Shape::Triangle(tr) => intersect_triangle(tr, &local, max_t),
            };
            if let Some((t, n)) = hit {
                let n = o.normal.apply_vector(n).to_unit();
                res = Some(Intersection { t, n, material: &geometry.material });
            }
        }
        res
    }
}

fn intersect_sphere(s: &Sphere, ray: &Ray, max_t: f64) -> Option<(f64, v64)> {
    let o = ray.origin() - s.center;
    let a = ray.dir().norm_squared();
    let k = dot(ray.dir(), o);
    let c = dot(o, o) - s.radius.powi(2);

    let disc = k * k - a * c;
    if disc < 0.0 || a == 0.0 {
        return None;
    }

    let t = {
        let t1 = (-k - disc.sqrt()) / a;
        let t2 = (-k + disc.sqrt()) / a;
        if t1 > 0.0 {
            t1
        } else if t2 > 0.0 {
            t2
        } else {
            return None;
        }
    };
    if t >= max_t {
        return None;
    }

    let point = ray.at(t);
    let normal = point - s.center;
    Some((t, normal))
}

fn intersect_triangle(tr: &Triangle, ray: &Ray, max_t: f64) -> Option<(f64, v64)> {
    let ab = tr.v[1] - tr.v[0];
    let ac = tr.v[2] - tr.v[0];
    let n = cross(ab, ac);
    // a + alpha ab + beta ac = ray.origin + t * ray.direction
    let t = dot(tr.v[0] - ray.origin(), n) / dot(ray.dir(), n);
    if !(0.0 < t && t < max_t) {
        return None;
    }
    let point = ray.at(t);
    let local_coords: [f64; 3] = {
        let ort_ac = cross(ac, n);
        let ort_ab = cross(ab, n);
        let point = point - tr.v[0];
        let alpha = dot(point, ort_ac) / dot(ab, ort_ac);
        let beta = dot(point, ort_ab) / dot(ac, ort_ab);
        let gamma = 1.0 - (alpha + beta);
        [gamma, alpha, beta]
    };
    if local_coords.map(|it| 0.0 <= it && it <= 1.0) != [true; 3] {
        return None;
    }
    Some((t, n))
}
