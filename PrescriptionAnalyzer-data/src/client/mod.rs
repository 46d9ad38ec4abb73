// Client module structure
pub mod config;
pub mod errors;
mod prescription_client;


// Re-export commonly used types
pub use config::ClientConfig;
pub use errors::ClientError;
pub use prescription_client::{PrescriptionClient, PrescriptionClientTrait};
