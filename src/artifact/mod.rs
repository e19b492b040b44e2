//! Build artifact handling: copying, verification and reporting.

pub mod filesystem;
pub mod report;
pub mod verify;

pub use filesystem::{copy_assets, copy_dir_contents, copy_dir_recursive};
pub use report::BuildReport;
pub use verify::{verify_tree, ArtifactKind, Checklist, MissingArtifactPolicy, VerifyReport};
