pub mod debug_logger;
pub mod error;
pub mod health;
pub mod report;
pub mod runner;

pub use error::{HealthCheckError, TransportError, EXIT_FAILURE, EXIT_SUCCESS};
pub use report::ReportRenderer;
pub use runner::{HealthCheckRunner, RunOutcome};
