use crate::gl33::state::GLState;
use crate::gl33::GL33;
use gl::{self, types::*};
use glcore::{
  backend::shader::{Shader, Uniformable},
  linear::Matrix44,
  shader::{ProgramError, StageError, StageType, Uniform, UniformWarning},
};
use std::{cell::RefCell, ffi::CString, ptr::null, rc::Rc};

#[derive(Debug)]
pub struct Stage {
  handle: GLuint,
  ty: StageType,
  // set when the source couldn’t be handed to the compiler
  rejected: Option<String>,
}

#[derive(Debug)]
pub struct Program {
  pub(crate) handle: GLuint,
  state: Rc<RefCell<GLState>>,
}

unsafe impl Shader for GL33 {
  type StageRepr = Stage;

  type ProgramRepr = Program;

  unsafe fn new_stage(&mut self, ty: StageType, src: &str) -> Result<Self::StageRepr, StageError> {
    let handle = gl::CreateShader(opengl_shader_type(ty));

    if handle == 0 {
      return Err(StageError::CannotCreate(ty));
    }

    let rejected = match CString::new(src.as_bytes()) {
      Ok(c_src) => {
        gl::ShaderSource(handle, 1, [c_src.as_ptr()].as_ptr(), null());
        gl::CompileShader(handle);
        None
      }

      Err(e) => Some(format!("NUL byte in source at offset {}", e.nul_position())),
    };

    log::trace!("created {} {}", ty, handle);

    Ok(Stage {
      handle,
      ty,
      rejected,
    })
  }

  unsafe fn compile_status(stage: &Self::StageRepr) -> Result<(), StageError> {
    if let Some(ref reason) = stage.rejected {
      return Err(StageError::compilation_failed(stage.ty, reason.as_str()));
    }

    let mut compiled: GLint = gl::FALSE.into();
    gl::GetShaderiv(stage.handle, gl::COMPILE_STATUS, &mut compiled);

    if compiled == gl::TRUE.into() {
      Ok(())
    } else {
      let log = info_log(stage.handle, gl::GetShaderiv, gl::GetShaderInfoLog);
      Err(StageError::compilation_failed(stage.ty, log))
    }
  }

  unsafe fn destroy_stage(stage: &mut Self::StageRepr) {
    gl::DeleteShader(stage.handle);
  }

  unsafe fn new_program(
    &mut self,
    vertex: &Self::StageRepr,
    fragment: &Self::StageRepr,
  ) -> Result<Self::ProgramRepr, ProgramError> {
    let handle = gl::CreateProgram();

    if handle == 0 {
      return Err(ProgramError::CannotCreate);
    }

    gl::AttachShader(handle, vertex.handle);
    gl::AttachShader(handle, fragment.handle);

    Ok(Program {
      handle,
      state: self.state.clone(),
    })
  }

  unsafe fn bind_attrib_location(
    program: &mut Self::ProgramRepr,
    index: u32,
    name: &str,
  ) -> Result<(), ProgramError> {
    let c_name = CString::new(name.as_bytes())
      .map_err(|_| ProgramError::InvalidAttribName(index, name.to_owned()))?;

    gl::BindAttribLocation(program.handle, index as GLuint, c_name.as_ptr() as *const GLchar);
    Ok(())
  }

  unsafe fn link_program(program: &mut Self::ProgramRepr) -> Result<(), ProgramError> {
    let handle = program.handle;

    gl::LinkProgram(handle);

    let mut linked: GLint = gl::FALSE.into();
    gl::GetProgramiv(handle, gl::LINK_STATUS, &mut linked);

    if linked == gl::TRUE.into() {
      Ok(())
    } else {
      let log = info_log(handle, gl::GetProgramiv, gl::GetProgramInfoLog);
      Err(ProgramError::link_failed(log))
    }
  }

  unsafe fn destroy_program(program: &mut Self::ProgramRepr) {
    log::trace!("releasing program {}", program.handle);
    program.state.borrow_mut().unuse_program(program.handle);
    gl::DeleteProgram(program.handle);
  }

  unsafe fn use_program(program: &Self::ProgramRepr) {
    program.state.borrow_mut().use_program(program.handle);
  }

  unsafe fn uniform_location(program: &Self::ProgramRepr, name: &str) -> Result<i32, UniformWarning> {
    let c_name =
      CString::new(name.as_bytes()).map_err(|_| UniformWarning::InvalidName(name.to_owned()))?;
    let location = gl::GetUniformLocation(program.handle, c_name.as_ptr() as *const GLchar);

    // ensure the location smells good
    if location < 0 {
      return Err(UniformWarning::inactive(name));
    }

    Ok(location)
  }
}

// Read the info log of a shader or a program.
unsafe fn info_log(
  handle: GLuint,
  get_iv: unsafe fn(GLuint, GLenum, *mut GLint),
  get_log: unsafe fn(GLuint, GLsizei, *mut GLsizei, *mut GLchar),
) -> String {
  let mut log_len: GLint = 0;
  get_iv(handle, gl::INFO_LOG_LENGTH, &mut log_len);

  if log_len <= 0 {
    return String::new();
  }

  let mut log: Vec<u8> = vec![0; log_len as usize];
  let mut written: GLsizei = 0;
  get_log(handle, log_len, &mut written, log.as_mut_ptr() as *mut GLchar);

  // the reported length doesn’t count the trailing NUL
  log.truncate(written.max(0) as usize);
  String::from_utf8_lossy(&log).into_owned()
}

fn opengl_shader_type(t: StageType) -> GLenum {
  match t {
    StageType::VertexShader => gl::VERTEX_SHADER,
    StageType::FragmentShader => gl::FRAGMENT_SHADER,
  }
}

macro_rules! impl_Uniformable {
  (vec $t:ty, $f:tt) => {
    unsafe impl Uniformable<$t> for GL33 {
      unsafe fn update(program: &Program, uniform: &Uniform<$t>, value: $t) {
        program.state.borrow_mut().use_program(program.handle);
        gl::$f(uniform.index(), 1, value.as_ptr());
      }
    }
  };

  ($t:ty, $f:tt) => {
    unsafe impl Uniformable<$t> for GL33 {
      unsafe fn update(program: &Program, uniform: &Uniform<$t>, value: $t) {
        program.state.borrow_mut().use_program(program.handle);
        gl::$f(uniform.index(), value);
      }
    }
  };
}

impl_Uniformable!(i32, Uniform1i);
impl_Uniformable!(u32, Uniform1ui);
impl_Uniformable!(f32, Uniform1f);
impl_Uniformable!(vec [f32; 2], Uniform2fv);
impl_Uniformable!(vec [f32; 3], Uniform3fv);
impl_Uniformable!(vec [f32; 4], Uniform4fv);

unsafe impl Uniformable<Matrix44> for GL33 {
  unsafe fn update(program: &Program, uniform: &Uniform<Matrix44>, value: Matrix44) {
    program.state.borrow_mut().use_program(program.handle);

    // column-major storage, no transposition
    gl::UniformMatrix4fv(uniform.index(), 1, gl::FALSE, value.raw().as_ptr());
  }
}
