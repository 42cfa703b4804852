//! Projection volumes.
//!
//! A [`ProjectionVolume`] holds the six planes passed to [`Matrix44::ortho`] and [`Matrix44::frustum`]. It’s a plain
//! value a driver typically keeps around (or reads from its configuration) and adjusts to the viewport aspect ratio
//! every time the surface gets resized.

use crate::linear::Matrix44;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Six clipping planes describing a projection volume.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
pub struct ProjectionVolume {
  pub left: f32,
  pub right: f32,
  pub bottom: f32,
  pub top: f32,
  pub near: f32,
  pub far: f32,
}

impl ProjectionVolume {
  pub fn new(left: f32, right: f32, bottom: f32, top: f32, near: f32, far: f32) -> Self {
    ProjectionVolume {
      left,
      right,
      bottom,
      top,
      near,
      far,
    }
  }

  /// Shrink or grow the vertical planes so that the volume keeps its proportions on a viewport of the given aspect
  /// ratio (width / height).
  pub fn aspect_adjusted(&self, aspect: f32) -> Self {
    ProjectionVolume {
      bottom: self.bottom / aspect,
      top: self.top / aspect,
      ..*self
    }
  }

  /// Orthographic projection of this volume.
  pub fn ortho(&self) -> Matrix44 {
    Matrix44::ortho(
      self.left,
      self.right,
      self.bottom,
      self.top,
      self.near,
      self.far,
    )
  }

  /// Perspective projection of this volume.
  pub fn frustum(&self) -> Matrix44 {
    Matrix44::frustum(
      self.left,
      self.right,
      self.bottom,
      self.top,
      self.near,
      self.far,
    )
  }

  /// Whether any pair of opposite planes collapses, which would make the projection matrices meaningless.
  pub fn is_degenerate(&self) -> bool {
    self.right == self.left || self.top == self.bottom || self.far == self.near
  }
}

/// Aspect ratio of a viewport.
pub fn aspect_ratio(width: u32, height: u32) -> f32 {
  width as f32 / height as f32
}
