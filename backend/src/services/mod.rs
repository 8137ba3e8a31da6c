//! Business logic services for the AgriSmart advisory server

pub mod advisory;
pub mod reporting;
pub mod vegetation;
pub mod weather;

pub use advisory::AdvisoryService;
pub use reporting::ReportingService;
pub use vegetation::VegetationService;
pub use weather::WeatherService;
