//! Linear algebra types and functions.
//!
//! This module exposes [`Matrix44`], a 4×4 single precision matrix stored in column-major order. That order is the
//! one expected by OpenGL when uploading matrices as uniforms, so [`Matrix44::raw`] can be sent as-is.
//!
//! All the constructors follow the formulas of the fixed-function OpenGL pipeline (`glOrtho`, `glFrustum`,
//! `glTranslate` and `glRotate`). Matrices are immutable values: every operation returns a new matrix.

use std::fmt;
use std::ops::Mul;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A 4×4 matrix of `f32`, stored in column-major order.
///
/// The element at row `r` and column `c` lives at index `c * 4 + r`.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
pub struct Matrix44([f32; 16]);

impl Matrix44 {
  /// Build a matrix out of 16 column-major values.
  pub const fn from_raw(m: [f32; 16]) -> Self {
    Matrix44(m)
  }

  /// The identity matrix.
  pub fn identity() -> Self {
    let mut m = [0.; 16];
    m[0] = 1.;
    m[5] = 1.;
    m[10] = 1.;
    m[15] = 1.;
    Matrix44(m)
  }

  /// Orthographic projection matrix, as defined by `glOrtho`.
  ///
  /// A degenerate volume (`right == left`, `top == bottom` or `far == near`) yields infinite or NaN coefficients; it’s
  /// up to the caller to avoid it.
  pub fn ortho(left: f32, right: f32, bottom: f32, top: f32, near: f32, far: f32) -> Self {
    let mut m = [0.; 16];
    m[0] = 2. / (right - left);
    m[5] = 2. / (top - bottom);
    m[10] = -2. / (far - near);
    m[12] = -(right + left) / (right - left);
    m[13] = -(top + bottom) / (top - bottom);
    m[14] = -(far + near) / (far - near);
    m[15] = 1.;
    Matrix44(m)
  }

  /// Perspective projection matrix, as defined by `glFrustum`.
  ///
  /// Same degeneracy conditions as [`Matrix44::ortho`].
  pub fn frustum(left: f32, right: f32, bottom: f32, top: f32, near: f32, far: f32) -> Self {
    let mut m = [0.; 16];
    m[0] = 2. * near / (right - left);
    m[5] = 2. * near / (top - bottom);
    m[8] = (right + left) / (right - left);
    m[9] = (top + bottom) / (top - bottom);
    m[10] = -(far + near) / (far - near);
    m[11] = -1.;
    m[14] = -2. * far * near / (far - near);
    Matrix44(m)
  }

  /// Translation matrix.
  pub fn translate(x: f32, y: f32, z: f32) -> Self {
    let mut m = Self::identity().0;
    m[12] = x;
    m[13] = y;
    m[14] = z;
    Matrix44(m)
  }

  /// Rotation of `angle` degrees around the `(x, y, z)` axis, as defined by `glRotate`.
  ///
  /// The axis is used as-is: it must be normalized, otherwise the resulting matrix is not a rigid transform.
  pub fn rotate(angle: f32, x: f32, y: f32, z: f32) -> Self {
    let rad = f64::from(angle).to_radians();
    let c = rad.cos() as f32;
    let s = rad.sin() as f32;
    let d = 1. - c;

    Matrix44([
      x * x * d + c,
      y * x * d + z * s,
      x * z * d - y * s,
      0.,
      y * x * d - z * s,
      y * y * d + c,
      y * z * d + x * s,
      0.,
      x * z * d + y * s,
      y * z * d - x * s,
      z * z * d + c,
      0.,
      0.,
      0.,
      0.,
      1.,
    ])
  }

  /// Matrix product `self * rhs`.
  ///
  /// Applied to a column vector, `rhs` transforms first, then `self`.
  pub fn mult(&self, rhs: &Matrix44) -> Self {
    let a = &self.0;
    let b = &rhs.0;
    let mut m = [0.; 16];

    for i in 0..4 {
      for j in 0..4 {
        m[i + j * 4] =
          a[i] * b[j * 4] + a[i + 4] * b[j * 4 + 1] + a[i + 8] * b[j * 4 + 2] + a[i + 12] * b[j * 4 + 3];
      }
    }

    Matrix44(m)
  }

  /// Transform a homogeneous vector.
  pub fn transform(&self, v: [f32; 4]) -> [f32; 4] {
    let a = &self.0;
    let mut r = [0.; 4];

    for (i, x) in r.iter_mut().enumerate() {
      *x = a[i] * v[0] + a[i + 4] * v[1] + a[i + 8] * v[2] + a[i + 12] * v[3];
    }

    r
  }

  /// The 16 column-major values, ready to be uploaded.
  pub fn raw(&self) -> &[f32; 16] {
    &self.0
  }

  /// The matrix as an array of columns.
  pub fn to_cols(&self) -> [[f32; 4]; 4] {
    let m = &self.0;
    [
      [m[0], m[1], m[2], m[3]],
      [m[4], m[5], m[6], m[7]],
      [m[8], m[9], m[10], m[11]],
      [m[12], m[13], m[14], m[15]],
    ]
  }
}

impl Default for Matrix44 {
  fn default() -> Self {
    Self::identity()
  }
}

impl From<[[f32; 4]; 4]> for Matrix44 {
  fn from(cols: [[f32; 4]; 4]) -> Self {
    let mut m = [0.; 16];

    for (c, col) in cols.iter().enumerate() {
      m[c * 4..c * 4 + 4].copy_from_slice(col);
    }

    Matrix44(m)
  }
}

impl Mul for Matrix44 {
  type Output = Matrix44;

  fn mul(self, rhs: Matrix44) -> Self::Output {
    self.mult(&rhs)
  }
}

impl<'a> Mul<&'a Matrix44> for &'a Matrix44 {
  type Output = Matrix44;

  fn mul(self, rhs: &'a Matrix44) -> Self::Output {
    self.mult(rhs)
  }
}

impl Mul<[f32; 4]> for Matrix44 {
  type Output = [f32; 4];

  fn mul(self, rhs: [f32; 4]) -> Self::Output {
    self.transform(rhs)
  }
}

// rows first, so that it reads like the math
impl fmt::Display for Matrix44 {
  fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
    let m = &self.0;

    for r in 0..4 {
      writeln!(f, "{}\t{}\t{}\t{}", m[r], m[r + 4], m[r + 8], m[r + 12])?;
    }

    Ok(())
  }
}
