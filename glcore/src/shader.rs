//! Shader programs.
//!
//! A [`Program`] is made of a vertex stage and a fragment stage, compiled from source text and linked together. Before
//! linking, vertex attribute slots get bound to the names the vertex stage uses for its inputs, so that the slots of a
//! [`Geometry`](crate::geometry::Geometry) feed the right inputs.
//!
//! # Build policy
//!
//! By default, building a program is _permissive_: a stage that fails to compile or a program that fails to link
//! doesn’t abort the build. The failure is logged via [`log::error!`] and returned as a warning in [`BuiltProgram`],
//! alongside a program that might render garbage (or nothing) but is still safe to use. Switching the
//! [`BuildPolicy`] to [`BuildPolicy::Strict`] turns the first of those failures into an error instead.
//!
//! ```ignore
//! let BuiltProgram { program, warnings } = ProgramBuilder::new()
//!   .set_vertex_shader_source(VS)
//!   .set_fragment_shader_source(FS)
//!   .add_attribute(0, "position")
//!   .add_attribute(1, "color")
//!   .build(&mut ctx)?;
//!
//! let mvp = program.uniform_location::<Matrix44>("mvpMatrix")?;
//! program.use_program();
//! program.set(&mvp, *stack.model_view_projection());
//! ```

use std::collections::BTreeMap;
use std::error;
use std::fmt;
use std::marker::PhantomData;

use crate::backend::shader::{Shader, Uniformable};
use crate::context::GraphicsContext;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A shader stage type.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum StageType {
  /// Vertex shader.
  VertexShader,
  /// Fragment shader.
  FragmentShader,
}

impl fmt::Display for StageType {
  fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
    match *self {
      StageType::VertexShader => f.write_str("vertex shader"),
      StageType::FragmentShader => f.write_str("fragment shader"),
    }
  }
}

/// Errors that shader stages can emit.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum StageError {
  /// Occurs when a shader fails to compile.
  CompilationFailed(StageType, String),
  /// Occurs when the backend cannot create the stage object.
  CannotCreate(StageType),
}

impl StageError {
  /// Shader compilation has failed.
  pub fn compilation_failed(ty: StageType, reason: impl Into<String>) -> Self {
    StageError::CompilationFailed(ty, reason.into())
  }
}

impl fmt::Display for StageError {
  fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
    match *self {
      StageError::CompilationFailed(ref ty, ref r) => write!(f, "{} compilation error: {}", ty, r),

      StageError::CannotCreate(ty) => write!(f, "cannot create {}", ty),
    }
  }
}

impl error::Error for StageError {}

/// Errors that a [`Program`] can generate.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ProgramError {
  /// A shader stage failed to compile or couldn’t be created.
  StageError(StageError),
  /// Program link failed. You can inspect the reason by looking at the contained `String`.
  LinkFailed(String),
  /// An attribute name cannot be passed to the backend.
  InvalidAttribName(u32, String),
  /// The backend cannot create the program object.
  CannotCreate,
}

impl ProgramError {
  /// Program link has failed.
  pub fn link_failed(reason: impl Into<String>) -> Self {
    ProgramError::LinkFailed(reason.into())
  }
}

impl fmt::Display for ProgramError {
  fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
    match *self {
      ProgramError::StageError(ref e) => write!(f, "shader program has stage error: {}", e),

      ProgramError::LinkFailed(ref s) => write!(f, "shader program failed to link: {}", s),

      ProgramError::InvalidAttribName(index, ref name) => {
        write!(f, "invalid name for attribute {}: {:?}", index, name)
      }

      ProgramError::CannotCreate => f.write_str("cannot create shader program"),
    }
  }
}

impl error::Error for ProgramError {
  fn source(&self) -> Option<&(dyn error::Error + 'static)> {
    match self {
      ProgramError::StageError(e) => Some(e),
      _ => None,
    }
  }
}

impl From<StageError> for ProgramError {
  fn from(e: StageError) -> Self {
    ProgramError::StageError(e)
  }
}

/// Warnings related to uniform lookups.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum UniformWarning {
  /// Inactive uniform (not in use / no participation to the final output in shaders).
  Inactive(String),
  /// The name cannot be passed to the backend.
  InvalidName(String),
}

impl UniformWarning {
  /// Create an inactive uniform warning.
  pub fn inactive<N>(name: N) -> Self
  where
    N: Into<String>,
  {
    UniformWarning::Inactive(name.into())
  }
}

impl fmt::Display for UniformWarning {
  fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
    match *self {
      UniformWarning::Inactive(ref s) => write!(f, "inactive {} uniform", s),
      UniformWarning::InvalidName(ref s) => write!(f, "invalid uniform name: {:?}", s),
    }
  }
}

impl error::Error for UniformWarning {}

/// What to do when a stage fails to compile or the program fails to link.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
pub enum BuildPolicy {
  /// Log the failure, keep it as a warning and carry on.
  Permissive,
  /// Fail the build.
  Strict,
}

impl Default for BuildPolicy {
  fn default() -> Self {
    BuildPolicy::Permissive
  }
}

/// Everything needed to build a [`Program`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ProgramSpec {
  /// Vertex shader source.
  pub vertex_src: String,
  /// Fragment shader source.
  pub fragment_src: String,
  /// Attribute slot to vertex input name bindings, applied before linking.
  pub attributes: BTreeMap<u32, String>,
  /// Failure policy.
  pub policy: BuildPolicy,
}

/// Chaining helper to build a [`ProgramSpec`] and a [`Program`] out of it.
#[derive(Clone, Debug, Default)]
pub struct ProgramBuilder {
  spec: ProgramSpec,
}

impl ProgramBuilder {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn set_vertex_shader_source(mut self, src: impl Into<String>) -> Self {
    self.spec.vertex_src = src.into();
    self
  }

  pub fn set_fragment_shader_source(mut self, src: impl Into<String>) -> Self {
    self.spec.fragment_src = src.into();
    self
  }

  /// Bind the attribute slot `index` to the vertex input `name`. Binding the same slot twice keeps the last name.
  pub fn add_attribute(mut self, index: u32, name: impl Into<String>) -> Self {
    self.spec.attributes.insert(index, name.into());
    self
  }

  pub fn set_policy(mut self, policy: BuildPolicy) -> Self {
    self.spec.policy = policy;
    self
  }

  /// Drop all the attribute bindings; sources and policy are kept.
  pub fn reset(mut self) -> Self {
    self.spec.attributes.clear();
    self
  }

  pub fn spec(&self) -> &ProgramSpec {
    &self.spec
  }

  pub fn into_spec(self) -> ProgramSpec {
    self.spec
  }

  /// Build a [`Program`] out of the accumulated configuration.
  pub fn build<C, S>(&self, ctx: &mut C) -> Result<BuiltProgram<S>, ProgramError>
  where
    C: GraphicsContext<Backend = S>,
    S: ?Sized + Shader,
  {
    Program::new(ctx, &self.spec)
  }
}

/// A compiled shader stage.
///
/// Stages only live for the duration of a program build.
struct Stage<S>
where
  S: ?Sized + Shader,
{
  repr: S::StageRepr,
}

impl<S> Stage<S>
where
  S: ?Sized + Shader,
{
  fn new<C>(ctx: &mut C, ty: StageType, src: &str) -> Result<Self, StageError>
  where
    C: GraphicsContext<Backend = S>,
  {
    unsafe { ctx.backend().new_stage(ty, src).map(|repr| Stage { repr }) }
  }

  fn compile_status(&self) -> Result<(), StageError> {
    unsafe { S::compile_status(&self.repr) }
  }
}

impl<S> Drop for Stage<S>
where
  S: ?Sized + Shader,
{
  fn drop(&mut self) {
    unsafe { S::destroy_stage(&mut self.repr) }
  }
}

/// A built program with potential warnings.
///
/// The sole purpose of this type is to be destructured when a program is built.
pub struct BuiltProgram<S>
where
  S: ?Sized + Shader,
{
  /// Built program.
  pub program: Program<S>,
  /// Compile and link failures, when the build is permissive.
  pub warnings: Vec<ProgramError>,
}

impl<S> BuiltProgram<S>
where
  S: ?Sized + Shader,
{
  /// Get the program and ignore the warnings.
  pub fn ignore_warnings(self) -> Program<S> {
    self.program
  }
}

/// A typed uniform location.
#[derive(Debug)]
pub struct Uniform<T> {
  index: i32,
  _t: PhantomData<*const T>,
}

impl<T> Uniform<T> {
  /// Create a new uniform out of a backend location.
  ///
  /// # Safety
  ///
  /// The location must come from the program the uniform will be used with.
  pub unsafe fn new(index: i32) -> Self {
    Uniform {
      index,
      _t: PhantomData,
    }
  }

  /// Backend location of the uniform.
  pub fn index(&self) -> i32 {
    self.index
  }
}

/// A linked shader program.
///
/// The program object is owned by this value and released when it’s dropped.
pub struct Program<S>
where
  S: ?Sized + Shader,
{
  repr: S::ProgramRepr,
}

impl<S> Program<S>
where
  S: ?Sized + Shader,
{
  /// Compile, bind and link a program.
  ///
  /// Fails if a backend object cannot be created or, with [`BuildPolicy::Strict`], on the first compile / link
  /// failure. With [`BuildPolicy::Permissive`], those failures are logged and returned as warnings.
  pub fn new<C>(ctx: &mut C, spec: &ProgramSpec) -> Result<BuiltProgram<S>, ProgramError>
  where
    C: GraphicsContext<Backend = S>,
  {
    let mut warnings = Vec::new();
    let policy = spec.policy;

    let vs = Stage::new(ctx, StageType::VertexShader, &spec.vertex_src)?;
    report(policy, &mut warnings, vs.compile_status().map_err(ProgramError::from))?;

    let fs = Stage::new(ctx, StageType::FragmentShader, &spec.fragment_src)?;
    report(policy, &mut warnings, fs.compile_status().map_err(ProgramError::from))?;

    let repr = unsafe { ctx.backend().new_program(&vs.repr, &fs.repr)? };
    let mut program = Program { repr };

    // locations must be bound before linking
    for (&index, name) in &spec.attributes {
      let bound = unsafe { S::bind_attrib_location(&mut program.repr, index, name) };
      report(policy, &mut warnings, bound)?;
    }

    let linked = unsafe { S::link_program(&mut program.repr) };
    report(policy, &mut warnings, linked)?;

    log::debug!(
      "built shader program with {} attribute binding(s), {} warning(s)",
      spec.attributes.len(),
      warnings.len()
    );

    Ok(BuiltProgram { program, warnings })
  }

  /// Make this program the current rendering program.
  pub fn use_program(&self) {
    unsafe { S::use_program(&self.repr) }
  }

  /// Resolve a uniform by name.
  ///
  /// The returned location is stable for the lifetime of the program.
  pub fn uniform_location<T>(&self, name: &str) -> Result<Uniform<T>, UniformWarning>
  where
    S: Uniformable<T>,
  {
    unsafe { S::uniform_location(&self.repr, name).map(|index| Uniform::new(index)) }
  }

  /// Upload a value to a uniform of this program.
  pub fn set<T>(&self, uniform: &Uniform<T>, value: T)
  where
    S: Uniformable<T>,
  {
    unsafe { S::update(&self.repr, uniform, value) }
  }
}

impl<S> Drop for Program<S>
where
  S: ?Sized + Shader,
{
  fn drop(&mut self) {
    unsafe { S::destroy_program(&mut self.repr) }
  }
}

// Apply the build policy to the outcome of a build step.
fn report(
  policy: BuildPolicy,
  warnings: &mut Vec<ProgramError>,
  outcome: Result<(), ProgramError>,
) -> Result<(), ProgramError> {
  match (outcome, policy) {
    (Ok(()), _) => Ok(()),

    (Err(e), BuildPolicy::Strict) => Err(e),

    (Err(e), BuildPolicy::Permissive) => {
      log::error!("{}", e);
      warnings.push(e);
      Ok(())
    }
  }
}
