//! OpenGL 3.3 backend.
//!
//! This module implements an OpenGL 3.3 core profile backend for glcore. The backend type is [`GL33`].
//!
//! The backend expects an OpenGL context to be current on the calling thread, with its function pointers loaded (for
//! instance with [`gl::load_with`]) before [`GL33::new`] is called.

mod geometry;
mod shader;
mod state;

pub use self::geometry::Geometry;
pub use self::shader::{Program, Stage};
use self::state::GLState;
pub use self::state::StateQueryError;
use glcore::context::GraphicsContext;
use std::cell::RefCell;
use std::rc::Rc;

/// An OpenGL 3.3 backend.
///
/// This type is to be used as a glcore backend type and graphics context. Only one can exist per thread.
#[derive(Debug)]
pub struct GL33 {
  pub(crate) state: Rc<RefCell<GLState>>,
}

impl GL33 {
  /// Create a new OpenGL 3.3 backend.
  pub fn new() -> Result<Self, StateQueryError> {
    GLState::new().map(|state| {
      log::debug!("acquired OpenGL 3.3 graphics state");

      GL33 {
        state: Rc::new(RefCell::new(state)),
      }
    })
  }
}

unsafe impl GraphicsContext for GL33 {
  type Backend = Self;

  fn backend(&mut self) -> &mut Self::Backend {
    self
  }
}
