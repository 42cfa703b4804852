//! GPU geometries.
//!
//! A [`Geometry`] gathers one GPU buffer per vertex attribute, a vertex count and a primitive [`Mode`]. It’s built
//! once from a [`GeometrySpec`], an explicit list of [`AttributeSpec`]s, and is immutable afterwards. Rendering it
//! issues a single, non-indexed draw call.
//!
//! [`GeometryBuilder`] is a chaining helper producing a [`GeometrySpec`]:
//!
//! ```ignore
//! let triangle = GeometryBuilder::new()
//!   .add_attribute(POSITION, 3, &[0., 1., 0., -1., -1., 0., 1., -1., 0f32])
//!   .add_attribute(COLOR, 3, &[255u8, 0, 0, 0, 255, 0, 0, 0, 255])
//!   .set_mode(Mode::Triangle)
//!   .set_vertex_count(3)
//!   .build(&mut ctx)?;
//!
//! triangle.render();
//! ```
//!
//! # Supported data
//!
//! Attributes are made of 1 to 4 components. Only two component types can be uploaded:
//!
//! - [`AttribType::Float`], 32-bit floating point components, passed as-is.
//! - [`AttribType::UnsignedByte`], 8-bit unsigned components, normalized to `[0; 1]` in shaders.
//!
//! Any other [`AttribType`] fails the build with [`GeometryError::UnsupportedType`].

use std::error;
use std::fmt;
use std::mem;
use std::slice;

use crate::backend::geometry::Geometry as GeometryBackend;
use crate::context::GraphicsContext;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Primitive topology.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
pub enum Mode {
  /// Unconnected points.
  Point,
  /// Every pair of vertices makes a line.
  Line,
  /// Every new vertex extends a line started by the first two.
  LineStrip,
  /// Every three vertices make a triangle.
  Triangle,
  /// Every new vertex makes a triangle with the first one and the previous one.
  TriangleFan,
  /// Every new vertex makes a triangle with the two previous ones.
  TriangleStrip,
}

impl Default for Mode {
  fn default() -> Self {
    Mode::Point
  }
}

/// Type of the components of a vertex attribute.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
pub enum AttribType {
  Byte,
  UnsignedByte,
  Short,
  UnsignedShort,
  Int,
  UnsignedInt,
  Float,
  Double,
}

impl AttribType {
  /// Size in bytes of a single component.
  pub fn size(self) -> usize {
    match self {
      AttribType::Byte | AttribType::UnsignedByte => 1,
      AttribType::Short | AttribType::UnsignedShort => 2,
      AttribType::Int | AttribType::UnsignedInt | AttribType::Float => 4,
      AttribType::Double => 8,
    }
  }

  /// Whether geometries can be built out of this type.
  pub fn is_uploadable(self) -> bool {
    matches!(self, AttribType::Float | AttribType::UnsignedByte)
  }

  /// Whether integral components get normalized when read by shaders.
  pub fn is_normalized(self) -> bool {
    !matches!(self, AttribType::Float | AttribType::Double)
  }
}

impl fmt::Display for AttribType {
  fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
    match *self {
      AttribType::Byte => f.write_str("byte"),
      AttribType::UnsignedByte => f.write_str("unsigned byte"),
      AttribType::Short => f.write_str("short"),
      AttribType::UnsignedShort => f.write_str("unsigned short"),
      AttribType::Int => f.write_str("int"),
      AttribType::UnsignedInt => f.write_str("unsigned int"),
      AttribType::Float => f.write_str("float"),
      AttribType::Double => f.write_str("double"),
    }
  }
}

/// Class of types usable as vertex attribute components.
///
/// > Implementing this trait is `unsafe`: the type must be a plain number without padding, which size is
/// > `Self::TYPE.size()`.
pub unsafe trait AttribComponent: Copy {
  const TYPE: AttribType;
}

unsafe impl AttribComponent for i8 {
  const TYPE: AttribType = AttribType::Byte;
}

unsafe impl AttribComponent for u8 {
  const TYPE: AttribType = AttribType::UnsignedByte;
}

unsafe impl AttribComponent for i16 {
  const TYPE: AttribType = AttribType::Short;
}

unsafe impl AttribComponent for u16 {
  const TYPE: AttribType = AttribType::UnsignedShort;
}

unsafe impl AttribComponent for i32 {
  const TYPE: AttribType = AttribType::Int;
}

unsafe impl AttribComponent for u32 {
  const TYPE: AttribType = AttribType::UnsignedInt;
}

unsafe impl AttribComponent for f32 {
  const TYPE: AttribType = AttribType::Float;
}

unsafe impl AttribComponent for f64 {
  const TYPE: AttribType = AttribType::Double;
}

/// A vertex attribute, not yet uploaded.
#[derive(Clone, Debug, PartialEq)]
pub struct AttributeSpec {
  /// Attribute slot the data feeds.
  pub index: u32,
  /// Number of components per vertex.
  pub components: usize,
  /// Type of each component.
  pub ty: AttribType,
  /// Raw data, in native endianness.
  pub data: Vec<u8>,
}

impl AttributeSpec {
  /// Attribute out of typed data.
  pub fn new<T>(index: u32, components: usize, data: &[T]) -> Self
  where
    T: AttribComponent,
  {
    let bytes = unsafe { slice::from_raw_parts(data.as_ptr() as *const u8, mem::size_of_val(data)) };

    AttributeSpec {
      index,
      components,
      ty: T::TYPE,
      data: bytes.to_vec(),
    }
  }

  /// Attribute out of raw bytes.
  pub fn from_bytes(index: u32, components: usize, ty: AttribType, data: Vec<u8>) -> Self {
    AttributeSpec {
      index,
      components,
      ty,
      data,
    }
  }

  /// Size in bytes of a single vertex of this attribute.
  pub fn stride(&self) -> usize {
    self.components * self.ty.size()
  }

  /// Number of vertices this attribute holds data for.
  pub fn vertex_count(&self) -> usize {
    match self.stride() {
      0 => 0,
      stride => self.data.len() / stride,
    }
  }

  fn validate(&self) -> Result<(), GeometryError> {
    if !self.ty.is_uploadable() {
      return Err(GeometryError::UnsupportedType(self.ty));
    }

    if !(1..=4).contains(&self.components) {
      return Err(GeometryError::UnsupportedComponentCount(self.components));
    }

    if self.data.len() % self.stride() != 0 {
      return Err(GeometryError::LengthIncoherency(self.data.len()));
    }

    Ok(())
  }
}

/// Greatest number of vertices a geometry can draw.
pub const MAX_VERTEX_COUNT: usize = i32::MAX as usize;

/// Everything needed to build a [`Geometry`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GeometrySpec {
  /// Attributes, one GPU buffer each.
  pub attributes: Vec<AttributeSpec>,
  /// Primitive topology.
  pub mode: Mode,
  /// Number of vertices to draw; deduced from the attributes if `None`.
  pub vertex_count: Option<usize>,
}

impl GeometrySpec {
  /// Check the attributes and compute the number of vertices to draw.
  pub fn validate(&self) -> Result<usize, GeometryError> {
    for attribute in &self.attributes {
      attribute.validate()?;
    }

    let vert_nb = self.draw_count()?;

    if vert_nb > MAX_VERTEX_COUNT {
      return Err(GeometryError::TooManyVertices(vert_nb));
    }

    Ok(vert_nb)
  }

  fn draw_count(&self) -> Result<usize, GeometryError> {
    match self.vertex_count {
      Some(vert_nb) => {
        // every attribute must have enough data for the vertices to draw
        match self
          .attributes
          .iter()
          .map(AttributeSpec::vertex_count)
          .find(|&len| len < vert_nb)
        {
          Some(len) => Err(GeometryError::Overflow(len, vert_nb)),
          None => Ok(vert_nb),
        }
      }

      None => {
        let mut lengths = self.attributes.iter().map(AttributeSpec::vertex_count);

        match lengths.next() {
          None => Err(GeometryError::Attributeless),

          Some(vert_nb) => {
            if lengths.all(|len| len == vert_nb) {
              Ok(vert_nb)
            } else {
              Err(GeometryError::LengthIncoherency(vert_nb))
            }
          }
        }
      }
    }
  }
}

/// Chaining helper to build a [`GeometrySpec`] and a [`Geometry`] out of it.
#[derive(Clone, Debug, Default)]
pub struct GeometryBuilder {
  spec: GeometrySpec,
}

impl GeometryBuilder {
  pub fn new() -> Self {
    Self::default()
  }

  /// Add an attribute made of `components` components per vertex.
  pub fn add_attribute<T>(self, index: u32, components: usize, data: &[T]) -> Self
  where
    T: AttribComponent,
  {
    self.add_attribute_spec(AttributeSpec::new(index, components, data))
  }

  /// Add an already formed attribute.
  pub fn add_attribute_spec(mut self, attribute: AttributeSpec) -> Self {
    self.spec.attributes.push(attribute);
    self
  }

  pub fn set_mode(mut self, mode: Mode) -> Self {
    self.spec.mode = mode;
    self
  }

  pub fn set_vertex_count(mut self, vertex_count: usize) -> Self {
    self.spec.vertex_count = Some(vertex_count);
    self
  }

  /// Drop all the accumulated attributes; mode and vertex count are kept.
  pub fn reset(mut self) -> Self {
    self.spec.attributes.clear();
    self
  }

  pub fn spec(&self) -> &GeometrySpec {
    &self.spec
  }

  pub fn into_spec(self) -> GeometrySpec {
    self.spec
  }

  /// Build a [`Geometry`] out of the accumulated configuration.
  pub fn build<C, S>(&self, ctx: &mut C) -> Result<Geometry<S>, GeometryError>
  where
    C: GraphicsContext<Backend = S>,
    S: ?Sized + GeometryBackend,
  {
    Geometry::new(ctx, &self.spec)
  }
}

/// Errors that can occur when building a [`Geometry`].
#[derive(Debug, Eq, PartialEq)]
pub enum GeometryError {
  /// The component type cannot be uploaded.
  UnsupportedType(AttribType),
  /// Attributes must have between 1 and 4 components.
  UnsupportedComponentCount(usize),
  /// Data lengths don’t agree: either an attribute’s data is not a whole number of vertices or attributes hold
  /// different numbers of vertices.
  LengthIncoherency(usize),
  /// An attribute holds fewer vertices (first) than the number of vertices to draw (second).
  Overflow(usize, usize),
  /// No attribute and no vertex count.
  Attributeless,
  /// More vertices than a single draw call can address.
  TooManyVertices(usize),
  /// The backend failed to allocate a resource.
  CannotCreate(String),
}

impl GeometryError {
  /// Create a resource allocation error.
  pub fn cannot_create(reason: impl Into<String>) -> Self {
    GeometryError::CannotCreate(reason.into())
  }
}

impl fmt::Display for GeometryError {
  fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
    match *self {
      GeometryError::UnsupportedType(ty) => write!(f, "unsupported attribute type: {}", ty),

      GeometryError::UnsupportedComponentCount(nb) => {
        write!(f, "unsupported attribute component count: {}", nb)
      }

      GeometryError::LengthIncoherency(len) => {
        write!(f, "incoherent attribute data length: {}", len)
      }

      GeometryError::Overflow(len, vert_nb) => write!(
        f,
        "attribute overflow: {} vertices available, {} requested",
        len, vert_nb
      ),

      GeometryError::Attributeless => f.write_str("attributeless geometry with no vertex count"),

      GeometryError::TooManyVertices(vert_nb) => {
        write!(f, "too many vertices: {} (at most {})", vert_nb, MAX_VERTEX_COUNT)
      }

      GeometryError::CannotCreate(ref reason) => write!(f, "cannot create geometry: {}", reason),
    }
  }
}

impl error::Error for GeometryError {}

/// An immutable, GPU-resident geometry.
///
/// The GPU buffers are owned by the geometry and released when it’s dropped.
#[derive(Debug)]
pub struct Geometry<S>
where
  S: ?Sized + GeometryBackend,
{
  repr: S::GeometryRepr,
  vert_nb: usize,
  mode: Mode,
  attrib_nb: usize,
}

impl<S> Geometry<S>
where
  S: ?Sized + GeometryBackend,
{
  /// Upload the attributes of `spec` and create a [`Geometry`].
  pub fn new<C>(ctx: &mut C, spec: &GeometrySpec) -> Result<Self, GeometryError>
  where
    C: GraphicsContext<Backend = S>,
  {
    let vert_nb = spec.validate()?;

    let repr = unsafe {
      ctx
        .backend()
        .build_geometry(&spec.attributes, spec.mode, vert_nb)?
    };

    log::debug!(
      "built geometry: {} attribute(s), {} vertices, {:?}",
      spec.attributes.len(),
      vert_nb,
      spec.mode
    );

    Ok(Geometry {
      repr,
      vert_nb,
      mode: spec.mode,
      attrib_nb: spec.attributes.len(),
    })
  }

  /// Issue the draw call.
  ///
  /// Every attribute is enabled before the draw and disabled after it; the array buffer and the vertex storage are
  /// unbound last.
  pub fn render(&self) {
    unsafe {
      S::bind_geometry(&self.repr);

      for attrib in 0..self.attrib_nb {
        S::enable_attribute(&self.repr, attrib);
      }

      S::draw_geometry(&self.repr);

      for attrib in 0..self.attrib_nb {
        S::disable_attribute(&self.repr, attrib);
      }

      S::unbind_geometry(&self.repr);
    }
  }

  pub fn vertex_count(&self) -> usize {
    self.vert_nb
  }

  pub fn mode(&self) -> Mode {
    self.mode
  }

  pub fn attribute_count(&self) -> usize {
    self.attrib_nb
  }
}

impl<S> Drop for Geometry<S>
where
  S: ?Sized + GeometryBackend,
{
  fn drop(&mut self) {
    unsafe { S::destroy_geometry(&mut self.repr) }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn positions() -> AttributeSpec {
    AttributeSpec::new(0, 3, &[0., 1., 0., -1., -1., 0., 1., -1., 0f32])
  }

  #[test]
  fn typed_data_to_bytes() {
    let attr = AttributeSpec::new(2, 4, &[1u8, 2, 3, 4]);

    assert_eq!(attr.ty, AttribType::UnsignedByte);
    assert_eq!(attr.data, vec![1, 2, 3, 4]);
    assert_eq!(attr.vertex_count(), 1);

    let attr = positions();
    assert_eq!(attr.ty, AttribType::Float);
    assert_eq!(attr.data.len(), 9 * 4);
    assert_eq!(attr.stride(), 12);
    assert_eq!(attr.vertex_count(), 3);
  }

  #[test]
  fn explicit_vertex_count() {
    let spec = GeometryBuilder::new()
      .add_attribute_spec(positions())
      .set_vertex_count(2)
      .into_spec();

    assert_eq!(spec.validate(), Ok(2));
  }

  #[test]
  fn deduced_vertex_count() {
    let spec = GeometryBuilder::new()
      .add_attribute_spec(positions())
      .add_attribute(1, 3, &[0u8; 9])
      .into_spec();

    assert_eq!(spec.validate(), Ok(3));
  }

  #[test]
  fn unsupported_type() {
    let spec = GeometryBuilder::new()
      .add_attribute(0, 2, &[0f64; 6])
      .into_spec();

    assert_eq!(
      spec.validate(),
      Err(GeometryError::UnsupportedType(AttribType::Double))
    );
  }

  #[test]
  fn unsupported_component_count() {
    let spec = GeometryBuilder::new()
      .add_attribute(0, 5, &[0f32; 10])
      .into_spec();

    assert_eq!(
      spec.validate(),
      Err(GeometryError::UnsupportedComponentCount(5))
    );

    let spec = GeometryBuilder::new().add_attribute(0, 0, &[0f32; 1]).into_spec();
    assert_eq!(
      spec.validate(),
      Err(GeometryError::UnsupportedComponentCount(0))
    );
  }

  #[test]
  fn partial_vertex() {
    let spec = GeometryBuilder::new()
      .add_attribute(0, 3, &[0f32; 4])
      .into_spec();

    assert_eq!(spec.validate(), Err(GeometryError::LengthIncoherency(16)));
  }

  #[test]
  fn overflow() {
    let spec = GeometryBuilder::new()
      .add_attribute_spec(positions())
      .set_vertex_count(4)
      .into_spec();

    assert_eq!(spec.validate(), Err(GeometryError::Overflow(3, 4)));
  }

  #[test]
  fn incoherent_attributes() {
    let spec = GeometryBuilder::new()
      .add_attribute_spec(positions())
      .add_attribute(1, 3, &[0u8; 6])
      .into_spec();

    assert_eq!(spec.validate(), Err(GeometryError::LengthIncoherency(3)));
  }

  #[test]
  fn attributeless() {
    assert_eq!(
      GeometrySpec::default().validate(),
      Err(GeometryError::Attributeless)
    );

    let spec = GeometryBuilder::new().set_vertex_count(3).into_spec();
    assert_eq!(spec.validate(), Ok(3));
  }

  #[test]
  fn vertex_count_fits_a_draw_call() {
    let spec = GeometryBuilder::new()
      .set_vertex_count(MAX_VERTEX_COUNT)
      .into_spec();
    assert_eq!(spec.validate(), Ok(MAX_VERTEX_COUNT));

    let spec = GeometryBuilder::new().set_vertex_count(usize::MAX).into_spec();
    assert_eq!(
      spec.validate(),
      Err(GeometryError::TooManyVertices(usize::MAX))
    );

    let spec = GeometryBuilder::new()
      .set_vertex_count(MAX_VERTEX_COUNT + 1)
      .into_spec();
    assert_eq!(
      spec.validate(),
      Err(GeometryError::TooManyVertices(MAX_VERTEX_COUNT + 1))
    );
  }

  #[test]
  fn reset_clears_attributes_only() {
    let builder = GeometryBuilder::new()
      .add_attribute_spec(positions())
      .set_mode(Mode::Triangle)
      .set_vertex_count(3)
      .reset();

    assert!(builder.spec().attributes.is_empty());
    assert_eq!(builder.spec().mode, Mode::Triangle);
    assert_eq!(builder.spec().vertex_count, Some(3));
  }
}
