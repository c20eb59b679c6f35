//! 4x4 homogeneous transforms
//!
//! Matrices are stored column-major (translation lives in elements 12 and
//! 13) and composed as `out = a * b`, so `b` is applied first. The 2D engine
//! only ever uses the x/y block plus translation, but keeping the full 4x4
//! layout lets the view matrix go to the renderer unchanged.

use serde::{Deserialize, Serialize};
use std::ops::Mul;

/// Column-major 4x4 matrix
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Mat4(pub [f64; 16]);

impl Default for Mat4 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mat4 {
    pub const IDENTITY: Mat4 = Mat4([
        1.0, 0.0, 0.0, 0.0, //
        0.0, 1.0, 0.0, 0.0, //
        0.0, 0.0, 1.0, 0.0, //
        0.0, 0.0, 0.0, 1.0,
    ]);

    pub fn from_translation(x: f64, y: f64) -> Self {
        let mut m = Self::IDENTITY;
        m.0[12] = x;
        m.0[13] = y;
        m
    }

    pub fn from_scaling(x: f64, y: f64) -> Self {
        let mut m = Self::IDENTITY;
        m.0[0] = x;
        m.0[5] = y;
        m
    }

    /// Counter-clockwise rotation about the z axis
    pub fn from_rotation_z(radians: f64) -> Self {
        let (s, c) = radians.sin_cos();
        let mut m = Self::IDENTITY;
        m.0[0] = c;
        m.0[1] = s;
        m.0[4] = -s;
        m.0[5] = c;
        m
    }

    pub fn as_array(&self) -> &[f64; 16] {
        &self.0
    }

    /// Single-precision copy for upload to the renderer
    pub fn to_f32(&self) -> [f32; 16] {
        self.0.map(|v| v as f32)
    }

    pub fn is_finite(&self) -> bool {
        self.0.iter().all(|v| v.is_finite())
    }

    /// `self * rhs`
    pub fn multiply(&self, rhs: &Mat4) -> Mat4 {
        let mut out = Mat4::IDENTITY;
        multiply_into(self, rhs, &mut out);
        out
    }

    /// Inverse, or `None` when the matrix is singular
    pub fn invert(&self) -> Option<Mat4> {
        let mut out = Mat4::IDENTITY;
        invert_into(self, &mut out).then_some(out)
    }

    /// Transform a homogeneous 4-vector
    pub fn transform_point(&self, v: [f64; 4]) -> [f64; 4] {
        let m = &self.0;
        let mut out = [0.0; 4];
        for (i, o) in out.iter_mut().enumerate() {
            *o = m[i] * v[0] + m[4 + i] * v[1] + m[8 + i] * v[2] + m[12 + i] * v[3];
        }
        out
    }

    /// Transform a 2D point (z = 0, w = 1)
    pub fn transform_xy(&self, p: [f64; 2]) -> [f64; 2] {
        let [x, y, _, w] = self.transform_point([p[0], p[1], 0.0, 1.0]);
        if w != 0.0 && w != 1.0 {
            [x / w, y / w]
        } else {
            [x, y]
        }
    }

    /// Lengths of the x and y basis vectors
    pub fn scaling(&self) -> [f64; 2] {
        let m = &self.0;
        [
            (m[0] * m[0] + m[1] * m[1] + m[2] * m[2]).sqrt(),
            (m[4] * m[4] + m[5] * m[5] + m[6] * m[6]).sqrt(),
        ]
    }

    pub fn translation(&self) -> [f64; 2] {
        [self.0[12], self.0[13]]
    }

    pub fn set_translation(&mut self, t: [f64; 2]) {
        self.0[12] = t[0];
        self.0[13] = t[1];
    }
}

impl Mul for Mat4 {
    type Output = Mat4;

    fn mul(self, rhs: Mat4) -> Mat4 {
        self.multiply(&rhs)
    }
}

/// `out = a * b`, writing into caller-owned storage
pub fn multiply_into(a: &Mat4, b: &Mat4, out: &mut Mat4) {
    let a = &a.0;
    let b = &b.0;
    for col in 0..4 {
        for row in 0..4 {
            out.0[col * 4 + row] = a[row] * b[col * 4]
                + a[4 + row] * b[col * 4 + 1]
                + a[8 + row] * b[col * 4 + 2]
                + a[12 + row] * b[col * 4 + 3];
        }
    }
}

/// Write the inverse of `m` into `out`; returns false (leaving `out`
/// untouched) when `m` is singular.
pub fn invert_into(m: &Mat4, out: &mut Mat4) -> bool {
    let a = &m.0;
    let (a00, a01, a02, a03) = (a[0], a[1], a[2], a[3]);
    let (a10, a11, a12, a13) = (a[4], a[5], a[6], a[7]);
    let (a20, a21, a22, a23) = (a[8], a[9], a[10], a[11]);
    let (a30, a31, a32, a33) = (a[12], a[13], a[14], a[15]);

    let b00 = a00 * a11 - a01 * a10;
    let b01 = a00 * a12 - a02 * a10;
    let b02 = a00 * a13 - a03 * a10;
    let b03 = a01 * a12 - a02 * a11;
    let b04 = a01 * a13 - a03 * a11;
    let b05 = a02 * a13 - a03 * a12;
    let b06 = a20 * a31 - a21 * a30;
    let b07 = a20 * a32 - a22 * a30;
    let b08 = a20 * a33 - a23 * a30;
    let b09 = a21 * a32 - a22 * a31;
    let b10 = a21 * a33 - a23 * a31;
    let b11 = a22 * a33 - a23 * a32;

    let det = b00 * b11 - b01 * b10 + b02 * b09 + b03 * b08 - b04 * b07 + b05 * b06;
    if det == 0.0 || !det.is_finite() {
        return false;
    }
    let inv = 1.0 / det;

    out.0 = [
        (a11 * b11 - a12 * b10 + a13 * b09) * inv,
        (a02 * b10 - a01 * b11 - a03 * b09) * inv,
        (a31 * b05 - a32 * b04 + a33 * b03) * inv,
        (a22 * b04 - a21 * b05 - a23 * b03) * inv,
        (a12 * b08 - a10 * b11 - a13 * b07) * inv,
        (a00 * b11 - a02 * b08 + a03 * b07) * inv,
        (a32 * b02 - a30 * b05 - a33 * b01) * inv,
        (a20 * b05 - a22 * b02 + a23 * b01) * inv,
        (a10 * b10 - a11 * b08 + a13 * b06) * inv,
        (a01 * b08 - a00 * b10 - a03 * b06) * inv,
        (a30 * b04 - a31 * b02 + a33 * b00) * inv,
        (a21 * b02 - a20 * b04 - a23 * b00) * inv,
        (a11 * b07 - a10 * b09 - a12 * b06) * inv,
        (a00 * b09 - a01 * b07 + a02 * b06) * inv,
        (a31 * b01 - a30 * b03 - a32 * b00) * inv,
        (a20 * b03 - a21 * b01 + a22 * b00) * inv,
    ];
    true
}
