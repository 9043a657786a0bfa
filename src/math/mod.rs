//! Homogeneous 2D algebra.
//!
//! Points are `Vector3 { x, y, w }` column vectors and transforms are
//! row-major 3x3 matrices (`m[row][col]`). The product `a * b` means
//! "apply `b` first, then `a`", so a transform that should happen after an
//! existing one is multiplied on the left.

pub mod transform;

use std::ops::Mul;

use crate::types::ScreenPoint;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vector3 {
    pub x: f64,
    pub y: f64,
    pub w: f64,
}

impl Vector3 {
    pub const fn new(x: f64, y: f64, w: f64) -> Self {
        Self { x, y, w }
    }

    /// A 2D point with `w = 1`.
    pub const fn point(x: f64, y: f64) -> Self {
        Self { x, y, w: 1.0 }
    }

    /// Perspective divide into raster coordinates.
    ///
    /// Affine transforms keep `w = 1`, so a zero `w` means a transform was
    /// built wrong. That is not recoverable and panics.
    pub fn to_screen(self) -> ScreenPoint {
        assert!(
            self.w != 0.0,
            "homogeneous coordinate is zero for ({}, {}); transform is not affine",
            self.x,
            self.y,
        );
        ScreenPoint {
            x: self.x / self.w,
            y: self.y / self.w,
        }
    }

    pub fn approx_eq(&self, other: &Vector3, eps: f64) -> bool {
        (self.x - other.x).abs() <= eps
            && (self.y - other.y).abs() <= eps
            && (self.w - other.w).abs() <= eps
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Matrix3 {
    m: [[f64; 3]; 3],
}

impl Matrix3 {
    pub const fn identity() -> Self {
        Self {
            m: [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]],
        }
    }

    pub const fn from_rows(m: [[f64; 3]; 3]) -> Self {
        Self { m }
    }

    pub fn rows(&self) -> [[f64; 3]; 3] {
        self.m
    }

    /// `a · b`: the transform that applies `b`, then `a`.
    pub fn multiply(a: &Matrix3, b: &Matrix3) -> Matrix3 {
        let mut out = [[0.0; 3]; 3];
        for (r, row) in out.iter_mut().enumerate() {
            for (c, cell) in row.iter_mut().enumerate() {
                *cell = a.m[r][0] * b.m[0][c] + a.m[r][1] * b.m[1][c] + a.m[r][2] * b.m[2][c];
            }
        }
        Matrix3 { m: out }
    }

    /// Matrix-vector product.
    #[inline]
    pub fn apply(m: &Matrix3, v: Vector3) -> Vector3 {
        Vector3 {
            x: m.m[0][0] * v.x + m.m[0][1] * v.y + m.m[0][2] * v.w,
            y: m.m[1][0] * v.x + m.m[1][1] * v.y + m.m[1][2] * v.w,
            w: m.m[2][0] * v.x + m.m[2][1] * v.y + m.m[2][2] * v.w,
        }
    }

    /// Where this transform sends the local origin.
    #[inline]
    pub fn origin(&self) -> (f64, f64) {
        let o = Matrix3::apply(self, Vector3::point(0.0, 0.0));
        (o.x / o.w, o.y / o.w)
    }

    pub fn approx_eq(&self, other: &Matrix3, eps: f64) -> bool {
        self.m
            .iter()
            .flatten()
            .zip(other.m.iter().flatten())
            .all(|(a, b)| (a - b).abs() <= eps)
    }
}

impl Default for Matrix3 {
    fn default() -> Self {
        Self::identity()
    }
}

impl Mul for Matrix3 {
    type Output = Matrix3;

    fn mul(self, rhs: Matrix3) -> Matrix3 {
        Matrix3::multiply(&self, &rhs)
    }
}

impl Mul<Vector3> for Matrix3 {
    type Output = Vector3;

    fn mul(self, rhs: Vector3) -> Vector3 {
        Matrix3::apply(&self, rhs)
    }
}

impl Mul<Vector3> for &Matrix3 {
    type Output = Vector3;

    fn mul(self, rhs: Vector3) -> Vector3 {
        Matrix3::apply(self, rhs)
    }
}
