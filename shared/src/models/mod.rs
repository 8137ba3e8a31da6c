//! Domain models for the AgriSmart advisory pipeline

mod advisory;
mod crop;
mod report;
mod weather;

pub use advisory::*;
pub use crop::*;
pub use report::*;
pub use weather::*;
