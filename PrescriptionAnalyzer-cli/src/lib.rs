// PrescriptionAnalyzer CLI lib.rs
//
// Command line front end: argument parsing, panel rendering and the
// interactive reminder prompt.

pub mod cli;

pub use cli::{run, Cli};
