use std::fmt;

/// Warnings that occur at the edges of the version-bump workflow.
/// These are non-fatal issues that should be reported to the user.
#[derive(Debug, Clone, PartialEq)]
pub enum BoundaryWarning {
    /// The working tree has uncommitted changes to tracked files
    DirtyWorkingTree { changed_files: usize },
    /// The computed release branch already exists
    BranchAlreadyExists { branch: String },
    /// The manifest's version field cannot be parsed as a numeric triple
    UnparsableManifestVersion { path: String, reason: String },
    /// Fetch operation failed due to authentication issues
    FetchAuthenticationFailed { remote: String },
}

impl fmt::Display for BoundaryWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundaryWarning::DirtyWorkingTree { changed_files } => {
                write!(
                    f,
                    "Working tree is dirty ({} changed file{})",
                    changed_files,
                    if *changed_files == 1 { "" } else { "s" }
                )
            }
            BoundaryWarning::BranchAlreadyExists { branch } => {
                write!(f, "A branch named '{}' already exists", branch)
            }
            BoundaryWarning::UnparsableManifestVersion { path, reason } => {
                write!(f, "Cannot parse version in '{}': {}", path, reason)
            }
            BoundaryWarning::FetchAuthenticationFailed { remote } => {
                write!(
                    f,
                    "Authentication failed when fetching from remote '{}'",
                    remote
                )
            }
        }
    }
}
