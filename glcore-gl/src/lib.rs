//! OpenGL backends.
//!
//! This crate exports [OpenGL](https://www.khronos.org/opengl/) backends for
//! [glcore](https://crates.io/crates/glcore). Pick a backend type and use it as the graphics context of glcore
//! geometries and programs:
//!
//! ```ignore
//! gl::load_with(|s| window.get_proc_address(s) as _);
//!
//! let mut ctx = GL33::new()?;
//! let BuiltProgram { program, warnings } = ProgramBuilder::new()
//!   .set_vertex_shader_source(VS)
//!   .set_fragment_shader_source(FS)
//!   .add_attribute(0, "position")
//!   .build(&mut ctx)?;
//! ```

#[cfg(feature = "gl33")]
pub mod gl33;

#[cfg(feature = "gl33")]
pub use gl33::GL33;
