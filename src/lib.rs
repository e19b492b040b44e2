//! Build orchestration for the proxy module WebUI.
//!
//! The WebUI is bundled by an external JavaScript toolchain (`npm run build`)
//! and deployed as static files into a directory served by the module. This
//! crate drives that process as a linear pipeline:
//!
//! - **Clean** - remove the bundler cache and stale output directories
//! - **Bundle** - run the bundler's install and build commands
//! - **Copy** - move bundler output and static assets into the target
//! - **Verify** - check the target holds the entry page, scripts, styles and icon font
//!
//! # Example
//!
//! ```rust,ignore
//! use webui_builder::config::BuildConfig;
//! use webui_builder::pipeline::Pipeline;
//! use std::path::Path;
//!
//! let webui_dir = Path::new("/src/project/webui");
//! let config = BuildConfig::load(webui_dir, None)?;
//! let paths = config.resolve(webui_dir)?;
//! let report = Pipeline::from_config(&config, paths)?.run()?;
//! assert!(report.passed());
//! ```

pub mod artifact;
pub mod clean;
pub mod config;
pub mod pipeline;
pub mod preflight;
pub mod process;

pub use artifact::{ArtifactKind, BuildReport, Checklist, MissingArtifactPolicy, VerifyReport};
pub use config::{BuildConfig, BuildLayout, BuildPaths};
pub use pipeline::{Pipeline, PipelineOptions};
