//! Geometry backend interface.
//!
//! This interface defines the low-level API backends must implement to support [`Geometry`](crate::geometry::Geometry).

use crate::geometry::{AttributeSpec, GeometryError, Mode};

/// Geometry support on the backend.
///
/// Attributes handed to [`Geometry::build_geometry`] are already validated: their type is uploadable, they have 1 to
/// 4 components and hold at least `vert_nb` vertices, which fits a signed 32-bit integer.
///
/// Rendering is driven by [`Geometry::render`](crate::geometry::Geometry::render), which calls [`bind_geometry`],
/// [`enable_attribute`] per attribute, [`draw_geometry`], [`disable_attribute`] per attribute and [`unbind_geometry`],
/// in that order.
///
/// [`bind_geometry`]: Geometry::bind_geometry
/// [`enable_attribute`]: Geometry::enable_attribute
/// [`draw_geometry`]: Geometry::draw_geometry
/// [`disable_attribute`]: Geometry::disable_attribute
/// [`unbind_geometry`]: Geometry::unbind_geometry
pub unsafe trait Geometry {
  /// Backend representation of a geometry.
  type GeometryRepr;

  /// Allocate one buffer per attribute and upload its data as static storage.
  unsafe fn build_geometry(
    &mut self,
    attributes: &[AttributeSpec],
    mode: Mode,
    vert_nb: usize,
  ) -> Result<Self::GeometryRepr, GeometryError>;

  /// Release the buffers of a geometry.
  unsafe fn destroy_geometry(geometry: &mut Self::GeometryRepr);

  /// Bind the vertex storage of a geometry.
  unsafe fn bind_geometry(geometry: &Self::GeometryRepr);

  /// Enable the `attrib`-th attribute (in build order) and describe its buffer layout.
  unsafe fn enable_attribute(geometry: &Self::GeometryRepr, attrib: usize);

  /// Issue a single non-indexed draw call over all the vertices of the geometry.
  unsafe fn draw_geometry(geometry: &Self::GeometryRepr);

  /// Disable the `attrib`-th attribute (in build order).
  unsafe fn disable_attribute(geometry: &Self::GeometryRepr, attrib: usize);

  /// Unbind the array buffer, then the vertex storage of a geometry.
  ///
  /// No binding made by the calls above may survive this one.
  unsafe fn unbind_geometry(geometry: &Self::GeometryRepr);
}
