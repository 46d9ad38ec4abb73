pub mod commands;
pub mod handlers;
pub mod prompt;
pub mod render;

pub use commands::{AnalyzeArgs, Cli, Command, RemindArgs};
pub use handlers::{run, Status};
