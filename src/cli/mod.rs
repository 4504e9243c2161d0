//! Command-line interface handlers

pub mod commands;

pub use commands::{cmd_bind, cmd_compile, cmd_deploy, cmd_unbind, exit_code, CliResult};
