//! Shader backend interface.
//!
//! This interface defines the low-level API backends must implement to support [`Program`](crate::shader::Program).
//! The operations map one-to-one on the object-creation protocol of the graphics API: stages get created and compiled,
//! then attached to a program, attribute locations get bound and the program gets linked. Compile and link statuses
//! are reported separately from object creation so that the caller decides whether a failure is fatal.

use crate::shader::{ProgramError, StageError, StageType, Uniform, UniformWarning};

/// Shader support on the backend.
pub unsafe trait Shader {
  /// Backend representation of a shader stage.
  type StageRepr;

  /// Backend representation of a shader program.
  type ProgramRepr;

  /// Create a shader stage and compile it.
  ///
  /// This must only fail if the stage object cannot be created; compilation failures are reported by
  /// [`Shader::compile_status`].
  unsafe fn new_stage(&mut self, ty: StageType, src: &str) -> Result<Self::StageRepr, StageError>;

  /// Compilation status of a stage, carrying the compiler log on failure.
  unsafe fn compile_status(stage: &Self::StageRepr) -> Result<(), StageError>;

  unsafe fn destroy_stage(stage: &mut Self::StageRepr);

  /// Create a program and attach the stages to it, without linking.
  unsafe fn new_program(
    &mut self,
    vertex: &Self::StageRepr,
    fragment: &Self::StageRepr,
  ) -> Result<Self::ProgramRepr, ProgramError>;

  /// Bind a vertex attribute slot to an input name. Only effective before linking.
  unsafe fn bind_attrib_location(
    program: &mut Self::ProgramRepr,
    index: u32,
    name: &str,
  ) -> Result<(), ProgramError>;

  /// Link the program, carrying the linker log on failure.
  unsafe fn link_program(program: &mut Self::ProgramRepr) -> Result<(), ProgramError>;

  unsafe fn destroy_program(program: &mut Self::ProgramRepr);

  /// Make the program the current one.
  unsafe fn use_program(program: &Self::ProgramRepr);

  /// Resolve the location of a uniform variable.
  unsafe fn uniform_location(program: &Self::ProgramRepr, name: &str) -> Result<i32, UniformWarning>;
}

/// Types which values can be uploaded to uniforms.
pub unsafe trait Uniformable<T>: Shader {
  /// Upload a value to a uniform of the given program.
  unsafe fn update(program: &Self::ProgramRepr, uniform: &Uniform<T>, value: T);
}
