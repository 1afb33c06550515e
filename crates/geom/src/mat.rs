use std::ops;

use crate::{cross, dot, v64};

/// Row-major 4x4 matrix acting on column vectors.
#[derive(Clone, Copy, PartialEq, Debug)]
#[allow(non_camel_case_types)]
pub struct m64 {
    pub rows: [[f64; 4]; 4],
}

impl Default for m64 {
    fn default() -> m64 {
        m64::IDENTITY
    }
}

impl m64 {
    #[rustfmt::skip]
    pub const IDENTITY: m64 = m64 {
        rows: [
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ],
    };

    pub fn translate(d: v64) -> m64 {
        let mut res = m64::IDENTITY;
        res.rows[0][3] = d.x;
        res.rows[1][3] = d.y;
        res.rows[2][3] = d.z;
        res
    }

    pub fn scale(s: v64) -> m64 {
        let mut res = m64::IDENTITY;
        res.rows[0][0] = s.x;
        res.rows[1][1] = s.y;
        res.rows[2][2] = s.z;
        res
    }

    /// Counter-clockwise rotation by `radians` around the unit vector `axis`.
    pub fn rotate(axis: v64, radians: f64) -> m64 {
        let [x, y, z] = axis.xyz();
        let (s, c) = radians.sin_cos();
        let t = 1.0 - c;
        #[rustfmt::skip]
        let rows = [
            [c + t * x * x,     t * x * y - s * z, t * x * z + s * y, 0.0],
            [t * x * y + s * z, c + t * y * y,     t * y * z - s * x, 0.0],
            [t * x * z - s * y, t * y * z + s * x, c + t * z * z,     0.0],
            [0.0,               0.0,               0.0,               1.0],
        ];
        m64 { rows }
    }

    pub fn transpose(&self) -> m64 {
        let mut res = *self;
        for i in 0..4 {
            for j in 0..4 {
                res.rows[i][j] = self.rows[j][i];
            }
        }
        res
    }

    /// Inverse of an affine matrix (bottom row `0 0 0 1`), `None` if the
    /// linear part is singular.
    pub fn inverse(&self) -> Option<m64> {
        let r = &self.rows;
        let c0 = v64(r[0][0], r[1][0], r[2][0]);
        let c1 = v64(r[0][1], r[1][1], r[2][1]);
        let c2 = v64(r[0][2], r[1][2], r[2][2]);

        // Rows of the inverse of [c0 c1 c2] are the cross products over det.
        let r0 = cross(c1, c2);
        let r1 = cross(c2, c0);
        let r2 = cross(c0, c1);
        let det = dot(c0, r0);
        if det == 0.0 || !det.is_finite() {
            return None;
        }
        let [r0, r1, r2] = [r0 / det, r1 / det, r2 / det];

        let t = v64(r[0][3], r[1][3], r[2][3]);
        #[rustfmt::skip]
        let rows = [
            [r0.x, r0.y, r0.z, -dot(r0, t)],
            [r1.x, r1.y, r1.z, -dot(r1, t)],
            [r2.x, r2.y, r2.z, -dot(r2, t)],
            [0.0,  0.0,  0.0,  1.0],
        ];
        Some(m64 { rows })
    }

    pub fn apply_point(&self, p: v64) -> v64 {
        let [x, y, z, w] = self.apply([p.x, p.y, p.z, 1.0]);
        v64(x / w, y / w, z / w)
    }

    pub fn apply_vector(&self, v: v64) -> v64 {
        let [x, y, z, _] = self.apply([v.x, v.y, v.z, 0.0]);
        v64(x, y, z)
    }

    fn apply(&self, v: [f64; 4]) -> [f64; 4] {
        self.rows.map(|row| row.iter().zip(v).map(|(a, b)| a * b).sum())
    }
}

impl ops::Mul for m64 {
    type Output = m64;

    fn mul(self, rhs: m64) -> m64 {
        let mut rows = [[0.0; 4]; 4];
        for i in 0..4 {
            for j in 0..4 {
                rows[i][j] = (0..4).map(|k| self.rows[i][k] * rhs.rows[k][j]).sum();
            }
        }
        m64 { rows }
    }
}
