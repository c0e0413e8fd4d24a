//! CLI application

pub mod args;
pub mod options;
pub mod run;
