//! A CPU software rasterizer.
//!
//! Meshes are projected through a pinhole [`scene::camera::Camera`], filled with a
//! barycentric rasterizer against a persistent depth buffer, and shaded by one of the
//! [`core::pipeline::Shader`] implementations in [`pipeline::shaders`].

pub mod core;
pub mod error;
pub mod io;
pub mod pipeline;
pub mod scene;

pub use error::{RenderError, Result};
