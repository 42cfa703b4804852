use gl;
use gl::types::*;
use std::cell::RefCell;
use std::os::raw::c_void;
use std::ptr;
use std::rc::Rc;

use crate::gl33::state::{Bind, GLState};
use crate::gl33::GL33;
use glcore::backend::geometry::Geometry as GeometryBackend;
use glcore::geometry::{AttribType, AttributeSpec, GeometryError, Mode};

/// Wrapped OpenGL array buffer.
///
/// Used to drop the buffer.
#[derive(Debug)]
struct BufferWrapper {
  handle: GLuint,
  state: Rc<RefCell<GLState>>,
}

impl Drop for BufferWrapper {
  fn drop(&mut self) {
    unsafe {
      self.state.borrow_mut().unbind_buffer(self.handle);
      gl::DeleteBuffers(1, &self.handle);
    }
  }
}

impl BufferWrapper {
  // Allocate a buffer and upload data as static storage.
  unsafe fn from_bytes(gl33: &mut GL33, bytes: &[u8]) -> Result<Self, GeometryError> {
    let mut handle: GLuint = 0;

    gl::GenBuffers(1, &mut handle);

    if handle == 0 {
      return Err(GeometryError::cannot_create("no buffer name available"));
    }

    gl33
      .state
      .borrow_mut()
      .bind_array_buffer(handle, Bind::Forced);

    gl::BufferData(
      gl::ARRAY_BUFFER,
      bytes.len() as isize,
      bytes.as_ptr() as _,
      gl::STATIC_DRAW,
    );

    let state = gl33.state.clone();
    Ok(BufferWrapper { handle, state })
  }
}

/// A vertex attribute living in its own buffer.
#[derive(Debug)]
struct Attribute {
  index: GLuint,
  components: GLint,
  ty: GLenum,
  normalized: GLboolean,
  buf: BufferWrapper,
}

#[derive(Debug)]
pub struct Geometry {
  vao: GLuint,
  mode: GLenum,
  vert_nb: GLsizei,
  attributes: Vec<Attribute>,
  state: Rc<RefCell<GLState>>,
}

unsafe impl GeometryBackend for GL33 {
  type GeometryRepr = Geometry;

  unsafe fn build_geometry(
    &mut self,
    attributes: &[AttributeSpec],
    mode: Mode,
    vert_nb: usize,
  ) -> Result<Self::GeometryRepr, GeometryError> {
    let vert_nb =
      GLsizei::try_from(vert_nb).map_err(|_| GeometryError::TooManyVertices(vert_nb))?;

    // upload everything first so that a failure doesn’t leave a dangling vertex array behind
    let mut uploaded = Vec::with_capacity(attributes.len());

    for attribute in attributes {
      if !attribute.ty.is_uploadable() {
        return Err(GeometryError::UnsupportedType(attribute.ty));
      }

      let buf = BufferWrapper::from_bytes(self, &attribute.data)?;
      let normalized = if attribute.ty.is_normalized() {
        gl::TRUE
      } else {
        gl::FALSE
      };

      log::trace!(
        "uploaded attribute {}: {} byte(s) in buffer {}",
        attribute.index,
        attribute.data.len(),
        buf.handle
      );

      uploaded.push(Attribute {
        index: attribute.index as GLuint,
        components: attribute.components as GLint,
        ty: opengl_attrib_type(attribute.ty),
        normalized,
        buf,
      });
    }

    self.state.borrow_mut().bind_array_buffer(0, Bind::Cached);

    let mut vao: GLuint = 0;
    gl::GenVertexArrays(1, &mut vao);

    if vao == 0 {
      return Err(GeometryError::cannot_create("no vertex array name available"));
    }

    Ok(Geometry {
      vao,
      mode: opengl_mode(mode),
      vert_nb,
      attributes: uploaded,
      state: self.state.clone(),
    })
  }

  unsafe fn destroy_geometry(geometry: &mut Self::GeometryRepr) {
    log::trace!("releasing vertex array {}", geometry.vao);

    // buffers are released when the attributes get dropped
    geometry
      .state
      .borrow_mut()
      .unbind_vertex_array(geometry.vao);
    gl::DeleteVertexArrays(1, &geometry.vao);
  }

  unsafe fn bind_geometry(geometry: &Self::GeometryRepr) {
    geometry
      .state
      .borrow_mut()
      .bind_vertex_array(geometry.vao, Bind::Cached);
  }

  unsafe fn enable_attribute(geometry: &Self::GeometryRepr, attrib: usize) {
    if let Some(attribute) = geometry.attributes.get(attrib) {
      gl::EnableVertexAttribArray(attribute.index);

      // force binding as it’s meaningful when a vao is bound
      geometry
        .state
        .borrow_mut()
        .bind_array_buffer(attribute.buf.handle, Bind::Forced);
      gl::VertexAttribPointer(
        attribute.index,
        attribute.components,
        attribute.ty,
        attribute.normalized,
        0,
        ptr::null::<c_void>(),
      );
    }
  }

  unsafe fn draw_geometry(geometry: &Self::GeometryRepr) {
    gl::DrawArrays(geometry.mode, 0, geometry.vert_nb);
  }

  unsafe fn disable_attribute(geometry: &Self::GeometryRepr, attrib: usize) {
    if let Some(attribute) = geometry.attributes.get(attrib) {
      gl::DisableVertexAttribArray(attribute.index);
    }
  }

  unsafe fn unbind_geometry(geometry: &Self::GeometryRepr) {
    let mut gfx_st = geometry.state.borrow_mut();
    gfx_st.bind_array_buffer(0, Bind::Forced);
    gfx_st.bind_vertex_array(0, Bind::Cached);
  }
}

fn opengl_attrib_type(ty: AttribType) -> GLenum {
  match ty {
    AttribType::Byte => gl::BYTE,
    AttribType::UnsignedByte => gl::UNSIGNED_BYTE,
    AttribType::Short => gl::SHORT,
    AttribType::UnsignedShort => gl::UNSIGNED_SHORT,
    AttribType::Int => gl::INT,
    AttribType::UnsignedInt => gl::UNSIGNED_INT,
    AttribType::Float => gl::FLOAT,
    AttribType::Double => gl::DOUBLE,
  }
}

fn opengl_mode(mode: Mode) -> GLenum {
  match mode {
    Mode::Point => gl::POINTS,
    Mode::Line => gl::LINES,
    Mode::LineStrip => gl::LINE_STRIP,
    Mode::Triangle => gl::TRIANGLES,
    Mode::TriangleFan => gl::TRIANGLE_FAN,
    Mode::TriangleStrip => gl::TRIANGLE_STRIP,
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn uploadable_types() {
    assert_eq!(opengl_attrib_type(AttribType::Float), gl::FLOAT);
    assert_eq!(opengl_attrib_type(AttribType::UnsignedByte), gl::UNSIGNED_BYTE);
  }

  #[test]
  fn modes() {
    assert_eq!(opengl_mode(Mode::Point), gl::POINTS);
    assert_eq!(opengl_mode(Mode::Line), gl::LINES);
    assert_eq!(opengl_mode(Mode::LineStrip), gl::LINE_STRIP);
    assert_eq!(opengl_mode(Mode::Triangle), gl::TRIANGLES);
    assert_eq!(opengl_mode(Mode::TriangleFan), gl::TRIANGLE_FAN);
    assert_eq!(opengl_mode(Mode::TriangleStrip), gl::TRIANGLE_STRIP);
  }
}
