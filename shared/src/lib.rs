//! Shared types and pure logic for the AgriSmart advisory pipeline
//!
//! This crate contains everything that needs no I/O, so it is used by the
//! backend server and by the browser preview (via WASM) alike.

pub mod adjustment;
pub mod models;
pub mod pipeline;
pub mod types;
pub mod validation;
pub mod vegetation;

pub use adjustment::*;
pub use models::*;
pub use pipeline::*;
pub use types::*;
pub use validation::*;
pub use vegetation::*;
