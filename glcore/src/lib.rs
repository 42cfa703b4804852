//! # A small rendering core over low-level graphics APIs
//!
//! glcore gathers the few pieces of algorithmic code real-time rendering demos keep rewriting on top of a raw graphics
//! API: matrix math, a transform stack and two resource types wrapping the stateful object-creation protocol of the
//! API into values.
//!
//! # What’s included?
//!
//! - **Matrices**: [`linear::Matrix44`] builds identity, orthographic, perspective, translation and rotation matrices
//!   with the exact formulas of the fixed-function OpenGL pipeline, composes them and transforms homogeneous vectors.
//! - **Projection volumes**: [`projection::ProjectionVolume`] keeps the six planes of a projection and adjusts them to
//!   the aspect ratio of a viewport.
//! - **Transform stack**: [`transform::TransformStack`] composes pushed matrices into a model-view and a
//!   model-view-projection matrix, and checks that pops mirror pushes.
//! - **Geometries**: [`geometry::Geometry`] owns one GPU buffer per vertex attribute and issues a single draw call.
//! - **Shader programs**: [`shader::Program`] compiles and links a vertex and a fragment stage, binding attribute
//!   slots to names before linking, and resolves / uploads uniforms.
//!
//! Windowing, event handling, asset loading and the frame loop are left to the caller — the _driver_. The driver
//! creates a graphics context, builds geometries and programs once, then, every frame, composes matrices, uploads them
//! to a program and renders geometries.
//!
//! # Architecture
//!
//! Matrices and the transform stack are plain CPU code. Geometries and programs are generic over a backend type `S`
//! implementing the traits of [`backend`]; backend crates (such as glcore-gl for OpenGL 3.3) provide that type and a
//! [`context::GraphicsContext`] to reach it. Every resource is built from an explicit configuration value
//! ([`geometry::GeometrySpec`], [`shader::ProgramSpec`]); builders are only chaining helpers over them.
//!
//! # Logging
//!
//! glcore logs through the [log](https://crates.io/crates/log) facade. Shader compile and link failures are logged at
//! the `error` level; resource creation is logged at the `debug` level. Install whichever logger implementation you
//! like in the driver.
//!
//! # Feature flags
//!
//! - `serde`: `Serialize` / `Deserialize` implementations for the configuration-friendly types ([`linear::Matrix44`],
//!   [`projection::ProjectionVolume`], [`geometry::Mode`], [`geometry::AttribType`] and [`shader::BuildPolicy`]).

pub mod backend;
pub mod context;
pub mod geometry;
pub mod linear;
pub mod projection;
pub mod shader;
pub mod transform;
