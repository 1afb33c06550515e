mod mat;

use std::{fmt, ops};

pub use crate::mat::m64;

#[derive(Clone, Copy, PartialEq, Debug, Default)]
#[allow(non_camel_case_types)]
pub struct v64 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

#[derive(Clone, Copy, Debug)]
pub struct Ray {
    origin: v64,
    dir: v64,
}

pub const fn v64(x: f64, y: f64, z: f64) -> v64 {
    v64 { x, y, z }
}

impl v64 {
    pub const ZERO: v64 = v64(0.0, 0.0, 0.0);

    pub fn xyz(self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }
    pub fn to_unit(self) -> v64 {
        self / self.norm()
    }
    /// Like [`v64::to_unit`], but `None` for vectors too short to normalize.
    pub fn try_unit(self) -> Option<v64> {
        let norm = self.norm();
        if !(norm > f64::EPSILON) {
            return None;
        }
        Some(self / norm)
    }
    pub fn norm(self) -> f64 {
        self.norm_squared().sqrt()
    }
    pub fn norm_squared(self) -> f64 {
        dot(self, self)
    }
}

impl fmt::Display for v64 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [x, y, z] = self.xyz();
        write!(f, "{x},{y},{z}")
    }
}

pub fn dot(lhs: v64, rhs: v64) -> f64 {
    lhs.x * rhs.x + lhs.y * rhs.y + lhs.z * rhs.z
}
pub fn cross(lhs: v64, rhs: v64) -> v64 {
    let [lx, ly, lz] = lhs.xyz();
    let [rx, ry, rz] = rhs.xyz();
    v64(ly * rz - lz * ry, -(lx * rz - lz * rx), lx * ry - ly * rx)
}
/// Mirrors `dir` around the unit normal `n`.
pub fn reflect(dir: v64, n: v64) -> v64 {
    dir - n * (2.0 * dot(dir, n))
}

impl ops::Neg for v64 {
    type Output = v64;

    fn neg(self) -> v64 {
        v64(-self.x, -self.y, -self.z)
    }
}

impl ops::Add for v64 {
    type Output = v64;

    fn add(self, rhs: v64) -> v64 {
        v64(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl ops::Sub for v64 {
    type Output = v64;

    fn sub(self, rhs: v64) -> v64 {
        v64(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl ops::Div<f64> for v64 {
    type Output = v64;

    fn div(self, c: f64) -> v64 {
        let r = 1.0 / c;
        v64(self.x * r, self.y * r, self.z * r)
    }
}

impl ops::Mul<f64> for v64 {
    type Output = v64;

    fn mul(self, c: f64) -> v64 {
        v64(self.x * c, self.y * c, self.z * c)
    }
}

impl ops::Mul<v64> for f64 {
    type Output = v64;

    fn mul(self, v: v64) -> v64 {
        v * self
    }
}

impl Ray {
    pub fn new(origin: v64, dir: v64) -> Ray {
        let dir = dir.to_unit();
        Ray { origin, dir }
    }

    pub fn from_to(from: v64, to: v64) -> Ray {
        Ray::new(from, to - from)
    }

    /// Keeps `dir` as is, so that `t` is measured in units of `dir`.
    pub fn unnormalized(origin: v64, dir: v64) -> Ray {
        Ray { origin, dir }
    }

    pub fn origin(&self) -> v64 {
        self.origin
    }

    pub fn dir(&self) -> v64 {
        self.dir
    }

    pub fn at(&self, dt: f64) -> v64 {
        self.origin + self.dir * dt
    }

    pub fn transform(&self, m: &m64) -> Ray {
        Ray { origin: m.apply_point(self.origin), dir: m.apply_vector(self.dir) }
    }
}
