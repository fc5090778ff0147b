//! GLSL 1.20 generation from decoded shader model 1-3 bytecode.

pub mod body;
pub mod convert;
pub mod decl;
pub mod io;
pub mod names;

pub use body::{generate_body, Body};
pub use decl::{SamplerUniform, UniformArray};
