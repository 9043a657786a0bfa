//! Builders for the basic affine transforms in homogeneous form.
//!
//! Every builder returns a fresh matrix; compose with `Matrix3::multiply`
//! (or `*`), left operand applied last.
//!
//! Rotation follows the mathematical convention (positive angle turns
//! counter-clockwise with y pointing up). Rasters are y-down, so a positive
//! angle turns clockwise on screen.

use super::Matrix3;

pub fn translation(dx: f64, dy: f64) -> Matrix3 {
    Matrix3::from_rows([[1.0, 0.0, dx], [0.0, 1.0, dy], [0.0, 0.0, 1.0]])
}

/// `theta` in radians.
pub fn rotation(theta: f64) -> Matrix3 {
    let (s, c) = theta.sin_cos();
    Matrix3::from_rows([[c, -s, 0.0], [s, c, 0.0], [0.0, 0.0, 1.0]])
}

pub fn scaling(sx: f64, sy: f64) -> Matrix3 {
    Matrix3::from_rows([[sx, 0.0, 0.0], [0.0, sy, 0.0], [0.0, 0.0, 1.0]])
}

/// Conjugates `m` so it acts about `(px, py)` instead of the origin:
/// `T(p) · m · T(-p)`.
pub fn about(px: f64, py: f64, m: &Matrix3) -> Matrix3 {
    if px == 0.0 && py == 0.0 {
        return *m;
    }
    translation(px, py) * *m * translation(-px, -py)
}
