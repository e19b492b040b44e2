//! Preflight checks for build validation.
//!
//! Validates that the bundler toolchain is on `PATH` before any output
//! directory is cleared. A missing `npm` otherwise surfaces only after the
//! previous deployment has already been deleted.
//!
//! # Example
//!
//! ```rust
//! use webui_builder::preflight::{check_required_tools, command_exists};
//!
//! if !command_exists("npm") {
//!     println!("node.js is not installed");
//! }
//!
//! let tools = &[("npm", "nodejs")];
//! if let Err(e) = check_required_tools(tools) {
//!     eprintln!("{}", e);
//! }
//! ```

use anyhow::{bail, Result};

use crate::process::Bundler;

/// Check if a command resolves on `PATH`.
pub fn command_exists(cmd: &str) -> bool {
    which::which(cmd).is_ok()
}

/// Check that specific tools are available.
///
/// Each tuple is (command_name, install_hint). All missing tools are
/// reported together.
pub fn check_required_tools(tools: &[(&str, &str)]) -> Result<()> {
    let missing: Vec<_> = tools
        .iter()
        .filter(|(tool, _)| !command_exists(tool))
        .collect();

    if !missing.is_empty() {
        let msg = missing
            .iter()
            .map(|(t, hint)| format!("  {} (install: {})", t, hint))
            .collect::<Vec<_>>()
            .join("\n");
        bail!("Missing required host tools:\n{}", msg);
    }

    Ok(())
}

/// Check every program the bundler will invoke.
pub fn check_bundler_tools(bundler: &Bundler) -> Result<()> {
    let tools: Vec<(&str, &str)> = bundler
        .programs()
        .into_iter()
        .map(|program| (program, install_hint(program)))
        .collect();
    check_required_tools(&tools)
}

fn install_hint(program: &str) -> &'static str {
    match program {
        "npm" | "npx" | "node" => "nodejs",
        "pnpm" => "pnpm",
        "yarn" => "yarn",
        "bun" => "bun",
        _ => "a package providing it",
    }
}
