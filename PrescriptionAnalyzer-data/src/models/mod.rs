// Payload models
pub mod prescription;
pub mod reminder;
pub mod upload;

mod lenient;
