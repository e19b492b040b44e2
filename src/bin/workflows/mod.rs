mod args;
mod commands;

pub(crate) use args::{Cli, Command};
pub(crate) use commands::{build, clean, verify};
