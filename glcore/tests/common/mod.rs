//! A backend recording every call it receives instead of talking to a GPU.
//!
//! Stages “compile” when their source contains a `main` function; programs “link” when all their stages compiled.
//! Uniforms are the names declared with `uniform <type> <name>;` in the stage sources.
//!
//! Geometry rendering records one entry per backend primitive, so the recorded order is the one glcore drives.

#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use glcore::backend::geometry::Geometry;
use glcore::backend::shader::{Shader, Uniformable};
use glcore::context::GraphicsContext;
use glcore::geometry::{AttribType, AttributeSpec, GeometryError, Mode};
use glcore::linear::Matrix44;
use glcore::shader::{ProgramError, StageError, StageType, Uniform, UniformWarning};

pub fn init_logger() {
  let _ = env_logger::builder().is_test(true).try_init();
}

#[derive(Clone, Debug, PartialEq)]
pub enum Call {
  CreateBuffer(u32),
  CreateVertexArray(u32),
  BindVertexArray(u32),
  UploadStatic { buffer: u32, bytes: usize },
  EnableAttrib(u32),
  BindArrayBuffer(u32),
  AttribPointer {
    index: u32,
    components: usize,
    ty: AttribType,
    normalized: bool,
  },
  DrawArrays { mode: Mode, first: usize, count: usize },
  DisableAttrib(u32),
  DeleteBuffer(u32),
  CreateStage(StageType, u32),
  DeleteStage(u32),
  CreateProgram(u32),
  AttachStage { program: u32, stage: u32 },
  BindAttribLocation { program: u32, index: u32, name: String },
  LinkProgram(u32),
  UseProgram(u32),
  DeleteProgram(u32),
  Uniform { program: u32, location: i32, value: Vec<f32> },
}

type Log = Rc<RefCell<Vec<Call>>>;

#[derive(Debug, Default)]
pub struct Recorder {
  log: Log,
  next_handle: u32,
}

impl Recorder {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn calls(&self) -> Vec<Call> {
    self.log.borrow().clone()
  }

  pub fn clear(&self) {
    self.log.borrow_mut().clear();
  }

  fn handle(&mut self) -> u32 {
    self.next_handle += 1;
    self.next_handle
  }

  fn record(&self, call: Call) {
    self.log.borrow_mut().push(call);
  }
}

unsafe impl GraphicsContext for Recorder {
  type Backend = Self;

  fn backend(&mut self) -> &mut Self::Backend {
    self
  }
}

#[derive(Debug)]
pub struct RecordedAttrib {
  buffer: u32,
  index: u32,
  components: usize,
  ty: AttribType,
}

#[derive(Debug)]
pub struct RecordedGeometry {
  vao: u32,
  attributes: Vec<RecordedAttrib>,
  mode: Mode,
  vert_nb: usize,
  log: Log,
}

unsafe impl Geometry for Recorder {
  type GeometryRepr = RecordedGeometry;

  unsafe fn build_geometry(
    &mut self,
    attributes: &[AttributeSpec],
    mode: Mode,
    vert_nb: usize,
  ) -> Result<Self::GeometryRepr, GeometryError> {
    let mut recorded = Vec::with_capacity(attributes.len());

    for attribute in attributes {
      let buffer = self.handle();
      self.record(Call::CreateBuffer(buffer));
      self.record(Call::UploadStatic {
        buffer,
        bytes: attribute.data.len(),
      });

      recorded.push(RecordedAttrib {
        buffer,
        index: attribute.index,
        components: attribute.components,
        ty: attribute.ty,
      });
    }

    let vao = self.handle();
    self.record(Call::CreateVertexArray(vao));

    Ok(RecordedGeometry {
      vao,
      attributes: recorded,
      mode,
      vert_nb,
      log: self.log.clone(),
    })
  }

  unsafe fn destroy_geometry(geometry: &mut Self::GeometryRepr) {
    let mut log = geometry.log.borrow_mut();

    for attribute in &geometry.attributes {
      log.push(Call::DeleteBuffer(attribute.buffer));
    }
  }

  unsafe fn bind_geometry(geometry: &Self::GeometryRepr) {
    geometry.log.borrow_mut().push(Call::BindVertexArray(geometry.vao));
  }

  unsafe fn enable_attribute(geometry: &Self::GeometryRepr, attrib: usize) {
    let attribute = &geometry.attributes[attrib];
    let mut log = geometry.log.borrow_mut();

    log.push(Call::EnableAttrib(attribute.index));
    log.push(Call::BindArrayBuffer(attribute.buffer));
    log.push(Call::AttribPointer {
      index: attribute.index,
      components: attribute.components,
      ty: attribute.ty,
      normalized: attribute.ty.is_normalized(),
    });
  }

  unsafe fn draw_geometry(geometry: &Self::GeometryRepr) {
    geometry.log.borrow_mut().push(Call::DrawArrays {
      mode: geometry.mode,
      first: 0,
      count: geometry.vert_nb,
    });
  }

  unsafe fn disable_attribute(geometry: &Self::GeometryRepr, attrib: usize) {
    let index = geometry.attributes[attrib].index;
    geometry.log.borrow_mut().push(Call::DisableAttrib(index));
  }

  unsafe fn unbind_geometry(geometry: &Self::GeometryRepr) {
    let mut log = geometry.log.borrow_mut();

    log.push(Call::BindArrayBuffer(0));
    log.push(Call::BindVertexArray(0));
  }
}

#[derive(Debug)]
pub struct RecordedStage {
  handle: u32,
  ty: StageType,
  src: String,
  log: Log,
}

#[derive(Debug)]
pub struct RecordedProgram {
  handle: u32,
  sources: Vec<String>,
  compiled: bool,
  linked: bool,
  log: Log,
}

fn compiles(src: &str) -> bool {
  src.contains("void main")
}

fn declared_uniforms(src: &str) -> Vec<String> {
  let tokens: Vec<_> = src.split_whitespace().collect();

  tokens
    .windows(3)
    .filter(|w| w[0] == "uniform")
    .map(|w| w[2].trim_end_matches(';').to_owned())
    .collect()
}

unsafe impl Shader for Recorder {
  type StageRepr = RecordedStage;

  type ProgramRepr = RecordedProgram;

  unsafe fn new_stage(&mut self, ty: StageType, src: &str) -> Result<Self::StageRepr, StageError> {
    let handle = self.handle();
    self.record(Call::CreateStage(ty, handle));

    Ok(RecordedStage {
      handle,
      ty,
      src: src.to_owned(),
      log: self.log.clone(),
    })
  }

  unsafe fn compile_status(stage: &Self::StageRepr) -> Result<(), StageError> {
    if compiles(&stage.src) {
      Ok(())
    } else {
      Err(StageError::compilation_failed(
        stage.ty,
        "0:1(1): error: no function with name 'main'",
      ))
    }
  }

  unsafe fn destroy_stage(stage: &mut Self::StageRepr) {
    stage.log.borrow_mut().push(Call::DeleteStage(stage.handle));
  }

  unsafe fn new_program(
    &mut self,
    vertex: &Self::StageRepr,
    fragment: &Self::StageRepr,
  ) -> Result<Self::ProgramRepr, ProgramError> {
    let handle = self.handle();
    self.record(Call::CreateProgram(handle));
    self.record(Call::AttachStage {
      program: handle,
      stage: vertex.handle,
    });
    self.record(Call::AttachStage {
      program: handle,
      stage: fragment.handle,
    });

    Ok(RecordedProgram {
      handle,
      sources: vec![vertex.src.clone(), fragment.src.clone()],
      compiled: compiles(&vertex.src) && compiles(&fragment.src),
      linked: false,
      log: self.log.clone(),
    })
  }

  unsafe fn bind_attrib_location(
    program: &mut Self::ProgramRepr,
    index: u32,
    name: &str,
  ) -> Result<(), ProgramError> {
    if name.contains('\0') {
      return Err(ProgramError::InvalidAttribName(index, name.to_owned()));
    }

    program.log.borrow_mut().push(Call::BindAttribLocation {
      program: program.handle,
      index,
      name: name.to_owned(),
    });

    Ok(())
  }

  unsafe fn link_program(program: &mut Self::ProgramRepr) -> Result<(), ProgramError> {
    program
      .log
      .borrow_mut()
      .push(Call::LinkProgram(program.handle));

    if program.compiled {
      program.linked = true;
      Ok(())
    } else {
      Err(ProgramError::link_failed(
        "error: linking with uncompiled/unspecialized shader",
      ))
    }
  }

  unsafe fn destroy_program(program: &mut Self::ProgramRepr) {
    program
      .log
      .borrow_mut()
      .push(Call::DeleteProgram(program.handle));
  }

  unsafe fn use_program(program: &Self::ProgramRepr) {
    program.log.borrow_mut().push(Call::UseProgram(program.handle));
  }

  unsafe fn uniform_location(program: &Self::ProgramRepr, name: &str) -> Result<i32, UniformWarning> {
    if !program.linked {
      return Err(UniformWarning::inactive(name));
    }

    let uniforms: Vec<_> = program.sources.iter().flat_map(|src| declared_uniforms(src)).collect();

    uniforms
      .iter()
      .position(|u| u == name)
      .map(|i| i as i32)
      .ok_or_else(|| UniformWarning::inactive(name))
  }
}

fn record_uniform(program: &RecordedProgram, uniform: &Uniform<impl Sized>, value: Vec<f32>) {
  program.log.borrow_mut().push(Call::Uniform {
    program: program.handle,
    location: uniform.index(),
    value,
  });
}

unsafe impl Uniformable<f32> for Recorder {
  unsafe fn update(program: &Self::ProgramRepr, uniform: &Uniform<f32>, value: f32) {
    record_uniform(program, uniform, vec![value]);
  }
}

unsafe impl Uniformable<[f32; 3]> for Recorder {
  unsafe fn update(program: &Self::ProgramRepr, uniform: &Uniform<[f32; 3]>, value: [f32; 3]) {
    record_uniform(program, uniform, value.to_vec());
  }
}

unsafe impl Uniformable<Matrix44> for Recorder {
  unsafe fn update(program: &Self::ProgramRepr, uniform: &Uniform<Matrix44>, value: Matrix44) {
    record_uniform(program, uniform, value.raw().to_vec());
  }
}
