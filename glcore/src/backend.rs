//! Backend interfacing.
//!
//! Backends implement the traits of this module to provide [`Geometry`](crate::geometry::Geometry) and
//! [`Program`](crate::shader::Program) support. Those traits are `unsafe` as they directly talk to the graphics
//! device; the safe API lives in [`crate::geometry`] and [`crate::shader`].

pub mod geometry;
pub mod shader;
