//! Graphics context.
//!
//! A graphics context is an object that abstracts all the low-level operations that happen on a graphics device. This
//! crate doesn’t create such contexts. Backend crates provide a type implementing [`GraphicsContext`], and the driver
//! owning the window / surface is responsible for making the underlying device context current before creating it.
//!
//! # On context and threads
//!
//! Every resource creation, draw call and uniform upload must happen on the thread owning the device context. For
//! that reason, an object which type implements [`GraphicsContext`] is expected to be `!Send` and `!Sync`, and only a
//! single context can be created per thread.

/// Class of graphics context.
///
/// Such a context must not be Send nor Sync, which means that you cannot share it between threads in any way (move /
/// borrow).
pub unsafe trait GraphicsContext {
  /// Backend type implementing the resource traits from [`crate::backend`].
  type Backend: ?Sized;

  /// Access the backend.
  fn backend(&mut self) -> &mut Self::Backend;
}
