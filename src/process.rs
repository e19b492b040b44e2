//! External command execution for the bundler steps.
//!
//! Commands run to completion with stdout and stderr captured. A non-zero
//! exit is terminal for the build: the error carries both streams so the
//! caller can surface them verbatim.

use anyhow::{bail, Context, Result};
use std::fmt;
use std::path::Path;
use std::process::Command;

/// A program plus its arguments, run without a shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
}

impl CommandSpec {
    pub fn new(program: impl Into<String>, args: &[&str]) -> Self {
        Self {
            program: program.into(),
            args: args.iter().map(|arg| arg.to_string()).collect(),
        }
    }

    /// Build from an argv-style list where the first element is the program.
    pub fn from_argv(argv: &[String]) -> Result<Self> {
        let Some((program, args)) = argv.split_first() else {
            bail!("command must not be empty");
        };
        if program.trim().is_empty() {
            bail!("command program must not be blank");
        }
        Ok(Self {
            program: program.clone(),
            args: args.to_vec(),
        })
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// Captured streams of a successful command.
#[derive(Debug, Clone)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
}

/// Run `spec` in `cwd` and wait for it to exit.
///
/// The program is looked up on `PATH` first so wrapper scripts such as
/// `npm.cmd` resolve on every host. A non-zero exit is an error carrying
/// the captured stdout and stderr.
///
/// # Example
///
/// ```rust,ignore
/// use webui_builder::process::{run_command, CommandSpec};
/// use std::path::Path;
///
/// let output = run_command(&CommandSpec::new("npm", &["run", "build"]), Path::new("webui"))?;
/// println!("{}", output.stdout);
/// ```
pub fn run_command(spec: &CommandSpec, cwd: &Path) -> Result<CommandOutput> {
    tracing::info!("running: {spec}");

    let program = which::which(&spec.program).unwrap_or_else(|_| spec.program.clone().into());
    let output = Command::new(&program)
        .args(&spec.args)
        .current_dir(cwd)
        .output()
        .with_context(|| format!("spawning '{}' in '{}'", spec, cwd.display()))?;

    let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
    let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

    if !output.status.success() {
        bail!(
            "command '{}' failed with {}\nstdout:\n{}\nstderr:\n{}",
            spec,
            output.status,
            stdout.trim_end(),
            stderr.trim_end()
        );
    }

    if !stdout.trim().is_empty() {
        tracing::info!("{}", stdout.trim_end());
    }
    if !stderr.trim().is_empty() {
        tracing::debug!("stderr from '{spec}':\n{}", stderr.trim_end());
    }

    Ok(CommandOutput { stdout, stderr })
}

/// The external JavaScript bundler's two entry points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bundler {
    pub install: Option<CommandSpec>,
    pub build: CommandSpec,
}

impl Bundler {
    /// Install front-end dependencies. Returns `false` when no install step
    /// is configured.
    pub fn install(&self, cwd: &Path) -> Result<bool> {
        let Some(install) = &self.install else {
            return Ok(false);
        };
        tracing::info!("installing dependencies");
        run_command(install, cwd).context("bundler dependency install failed")?;
        tracing::info!("dependencies installed");
        Ok(true)
    }

    pub fn build(&self, cwd: &Path) -> Result<()> {
        tracing::info!("running bundler build");
        run_command(&self.build, cwd).context("bundler build failed")?;
        tracing::info!("bundler build finished");
        Ok(())
    }

    /// Programs that must resolve on `PATH` before the build starts.
    pub fn programs(&self) -> Vec<&str> {
        let mut programs: Vec<&str> = self
            .install
            .iter()
            .chain(std::iter::once(&self.build))
            .map(|spec| spec.program.as_str())
            .collect();
        programs.dedup();
        programs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sh(script: &str) -> CommandSpec {
        CommandSpec::new("sh", &["-c", script])
    }

    #[test]
    fn display_joins_program_and_args() {
        let spec = CommandSpec::new("npm", &["run", "build"]);
        assert_eq!(spec.to_string(), "npm run build");
    }

    #[test]
    fn from_argv_rejects_empty() {
        assert!(CommandSpec::from_argv(&[]).is_err());
        assert!(CommandSpec::from_argv(&["  ".to_string()]).is_err());
    }

    #[test]
    fn run_command_captures_stdout() {
        let temp = TempDir::new().unwrap();
        let output = run_command(&sh("echo bundled"), temp.path()).unwrap();
        assert_eq!(output.stdout.trim(), "bundled");
    }

    #[test]
    fn run_command_runs_in_cwd() {
        let temp = TempDir::new().unwrap();
        run_command(&sh("touch marker"), temp.path()).unwrap();
        assert!(temp.path().join("marker").exists());
    }

    #[test]
    fn run_command_failure_carries_streams() {
        let temp = TempDir::new().unwrap();
        let err = run_command(&sh("echo out; echo oops >&2; exit 3"), temp.path()).unwrap_err();
        let msg = format!("{err:#}");
        assert!(msg.contains("out"));
        assert!(msg.contains("oops"));
        assert!(msg.contains("failed"));
    }

    #[test]
    fn run_command_missing_program_errors() {
        let temp = TempDir::new().unwrap();
        let spec = CommandSpec::new("definitely_not_a_real_command_12345", &[]);
        assert!(run_command(&spec, temp.path()).is_err());
    }

    #[test]
    fn bundler_without_install_skips_it() {
        let temp = TempDir::new().unwrap();
        let bundler = Bundler {
            install: None,
            build: sh("true"),
        };
        assert!(!bundler.install(temp.path()).unwrap());
        bundler.build(temp.path()).unwrap();
    }

    #[test]
    fn bundler_programs_are_deduplicated() {
        let bundler = Bundler {
            install: Some(CommandSpec::new("npm", &["install"])),
            build: CommandSpec::new("npm", &["run", "build"]),
        };
        assert_eq!(bundler.programs(), vec!["npm"]);
    }
}
