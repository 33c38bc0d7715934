use std::path::{Path, PathBuf};

use git2::{build::CheckoutBuilder, BranchType, Repository, ResetType, StatusOptions};

use crate::error::{NextVersionError, Result};

/// Wrapper around git2 Repository for the version-bump workflow.
///
/// Provides high-level abstractions for the git operations next-version
/// needs: working-tree state, branch management, staging, committing, and
/// remote fetch/push.
pub struct GitRepo {
    repo: Repository,
}

impl GitRepo {
    /// Creates a new GitRepo instance for the current working directory.
    ///
    /// Discovers the git repository in the current directory or parent
    /// directories.
    pub fn new() -> Result<Self> {
        Self::open(".")
    }

    /// Open or discover a git repository at the given path.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let repo = Repository::discover(path.as_ref()).map_err(|e| {
            NextVersionError::branch(format!(
                "Not in a git repository ('{}'): {}",
                path.as_ref().display(),
                e
            ))
        })?;
        Ok(GitRepo { repo })
    }

    /// The repository's working directory.
    pub fn workdir(&self) -> Result<PathBuf> {
        self.repo
            .workdir()
            .map(|p| p.to_path_buf())
            .ok_or_else(|| NextVersionError::branch("Repository has no working directory"))
    }

    /// Count uncommitted changes to tracked files.
    ///
    /// Untracked files are ignored, so a repository with only new files still
    /// counts as clean for the bump workflow.
    pub fn changed_file_count(&self) -> Result<usize> {
        let mut options = StatusOptions::new();
        options.include_untracked(false).include_ignored(false);

        let statuses = self.repo.statuses(Some(&mut options))?;
        Ok(statuses.len())
    }

    pub fn is_dirty(&self) -> Result<bool> {
        Ok(self.changed_file_count()? > 0)
    }

    /// Name of the branch HEAD currently points at.
    pub fn current_branch(&self) -> Result<String> {
        let head = self.repo.head()?;
        head.shorthand()
            .map(|name| name.to_string())
            .ok_or_else(|| NextVersionError::branch("HEAD is detached or invalid"))
    }

    /// List local branch names.
    pub fn local_branches(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();
        for entry in self.repo.branches(Some(BranchType::Local))? {
            let (branch, _) = entry?;
            if let Some(name) = branch.name()? {
                names.push(name.to_string());
            }
        }
        Ok(names)
    }

    pub fn branch_exists(&self, branch_name: &str) -> bool {
        self.repo.find_branch(branch_name, BranchType::Local).is_ok()
    }

    /// Check out an existing local branch.
    pub fn checkout(&self, branch_name: &str) -> Result<()> {
        let branch = self
            .repo
            .find_branch(branch_name, BranchType::Local)
            .map_err(|e| {
                NextVersionError::branch(format!("Cannot find branch '{}': {}", branch_name, e))
            })?;

        let reference = branch.into_reference();
        let target = reference.peel(git2::ObjectType::Commit)?;
        self.repo
            .checkout_tree(&target, Some(CheckoutBuilder::new().safe()))?;

        let ref_name = reference
            .name()
            .ok_or_else(|| NextVersionError::branch("Branch reference name is not valid UTF-8"))?;
        self.repo.set_head(ref_name)?;
        Ok(())
    }

    /// Create a new branch at HEAD and check it out.
    ///
    /// Fails if a branch with that name already exists.
    pub fn create_branch_and_checkout(&self, branch_name: &str) -> Result<()> {
        if self.branch_exists(branch_name) {
            return Err(NextVersionError::branch(format!(
                "A branch named '{}' already exists",
                branch_name
            )));
        }

        let head = self.repo.head()?.peel_to_commit()?;
        self.repo.branch(branch_name, &head, false)?;
        self.checkout(branch_name)
    }

    /// Discard all uncommitted changes, matching `git reset --hard`.
    pub fn reset_hard(&self) -> Result<()> {
        let head = self.repo.head()?.peel_to_commit()?;
        self.repo
            .reset(head.as_object(), ResetType::Hard, None)?;
        Ok(())
    }

    /// Gets all configured remote names from the repository.
    ///
    /// Remotes are sorted with "origin" first (if it exists), followed by
    /// others alphabetically.
    pub fn list_remotes(&self) -> Result<Vec<String>> {
        let remote_names = self.repo.remotes()?;
        let mut remotes = Vec::new();

        for name in remote_names.iter().flatten() {
            remotes.push(name.to_string());
        }

        remotes.sort_by(|a, b| {
            if a == "origin" {
                std::cmp::Ordering::Less
            } else if b == "origin" {
                std::cmp::Ordering::Greater
            } else {
                a.cmp(b)
            }
        });

        Ok(remotes)
    }

    /// Fetch `branch_name` from a remote and fast-forward the local branch.
    ///
    /// Equivalent to `git pull --ff-only` for the given branch. Supports SSH
    /// authentication via keys from ~/.ssh/ or the SSH agent. When the
    /// branches have diverged the local branch is left as-is.
    pub fn pull(&self, remote_name: &str, branch_name: &str) -> Result<()> {
        let mut remote = self.repo.find_remote(remote_name).map_err(|_| {
            NextVersionError::remote(format!("Remote '{}' not found", remote_name))
        })?;

        let mut fetch_options = git2::FetchOptions::new();
        let mut callbacks = git2::RemoteCallbacks::new();
        callbacks.credentials(credentials_callback);
        fetch_options.remote_callbacks(callbacks);

        let refspec = format!(
            "+refs/heads/{}:refs/remotes/{}/{}",
            branch_name, remote_name, branch_name
        );
        remote
            .fetch(&[refspec.as_str()], Some(&mut fetch_options), None)
            .map_err(|e| {
                NextVersionError::remote(format!(
                    "Failed to fetch from remote '{}': {}",
                    remote_name, e
                ))
            })?;

        self.fast_forward(branch_name, remote_name)
    }

    /// Fast-forward a local branch to its remote-tracking counterpart and
    /// refresh the working tree when that branch is checked out.
    fn fast_forward(&self, branch_name: &str, remote_name: &str) -> Result<()> {
        let tracking_ref_name = format!("refs/remotes/{}/{}", remote_name, branch_name);
        let remote_ref = match self.repo.find_reference(&tracking_ref_name) {
            Ok(r) => r,
            Err(_) => {
                // Remote branch doesn't exist, nothing to update
                return Ok(());
            }
        };

        let remote_oid = remote_ref.target().ok_or_else(|| {
            NextVersionError::remote(format!("Reference '{}' is invalid", tracking_ref_name))
        })?;

        let local_branch = match self.repo.find_branch(branch_name, BranchType::Local) {
            Ok(b) => b,
            Err(_) => {
                // Local branch doesn't exist, create it from remote
                let remote_commit = self.repo.find_commit(remote_oid)?;
                self.repo.branch(branch_name, &remote_commit, false)?;
                return Ok(());
            }
        };

        let local_ref = local_branch.into_reference();
        let local_oid = match local_ref.target() {
            Some(oid) => oid,
            None => return Ok(()),
        };

        if local_oid == remote_oid {
            return Ok(());
        }

        // Only fast-forward; diverged branches are left alone.
        if !self.repo.graph_descendant_of(remote_oid, local_oid)? {
            return Ok(());
        }

        let branch_ref_name = format!("refs/heads/{}", branch_name);
        let mut reference = self.repo.find_reference(&branch_ref_name)?;
        reference.set_target(
            remote_oid,
            &format!("fast-forward from {}/{}", remote_name, branch_name),
        )?;

        if self.current_branch()? == branch_name {
            self.repo
                .checkout_head(Some(CheckoutBuilder::new().force()))?;
        }

        Ok(())
    }

    /// Stage the given paths, relative to the repository workdir.
    pub fn stage(&self, paths: &[&Path]) -> Result<()> {
        let mut index = self.repo.index()?;
        for path in paths {
            index.add_path(path)?;
        }
        index.write()?;
        Ok(())
    }

    /// Commit the staged index on the current branch.
    ///
    /// Uses the repository's configured signature. Like the original
    /// workflow's `commit --no-verify`, no hooks run here.
    pub fn commit(&self, message: &str) -> Result<()> {
        let signature = self.repo.signature()?;
        let mut index = self.repo.index()?;
        let tree_id = index.write_tree()?;
        let tree = self.repo.find_tree(tree_id)?;
        let parent = self.repo.head()?.peel_to_commit()?;

        self.repo.commit(
            Some("HEAD"),
            &signature,
            &signature,
            message,
            &tree,
            &[&parent],
        )?;
        Ok(())
    }

    /// Push a branch to a remote and set its upstream, like `git push -u`.
    pub fn push_branch(&self, remote_name: &str, branch_name: &str) -> Result<()> {
        let mut remote = self.repo.find_remote(remote_name).map_err(|_| {
            NextVersionError::remote(format!("No remote named '{}' found", remote_name))
        })?;

        let mut push_options = git2::PushOptions::new();
        let mut callbacks = git2::RemoteCallbacks::new();
        callbacks.credentials(credentials_callback);

        // Catch per-reference rejections that the push call itself reports as
        // success.
        callbacks.push_update_reference(|refname, status| {
            if let Some(status) = status {
                eprintln!("Warning: Could not update reference {}: {}", refname, status);
                Err(git2::Error::from_str(&format!(
                    "Push failed for {}",
                    refname
                )))
            } else {
                Ok(())
            }
        });

        push_options.remote_callbacks(callbacks);

        let refspec = format!("refs/heads/{}:refs/heads/{}", branch_name, branch_name);
        match remote.push(&[refspec.as_str()], Some(&mut push_options)) {
            Ok(_) => {}
            Err(e) => {
                return Err(if e.class() == git2::ErrorClass::Net {
                    NextVersionError::remote(format!("Network error during push: {}", e))
                } else if e.class() == git2::ErrorClass::Reference {
                    NextVersionError::remote(format!("Reference error during push: {}", e))
                } else {
                    NextVersionError::remote(format!(
                        "Failed to push branch '{}': {}",
                        branch_name, e
                    ))
                });
            }
        }

        let mut branch = self.repo.find_branch(branch_name, BranchType::Local)?;
        branch.set_upstream(Some(&format!("{}/{}", remote_name, branch_name)))?;
        Ok(())
    }
}

/// Credential lookup shared by fetch and push: SSH keys from ~/.ssh/ in order
/// of preference, then the SSH agent, then default credentials.
fn credentials_callback(
    _url: &str,
    username_from_url: Option<&str>,
    allowed_types: git2::CredentialType,
) -> std::result::Result<git2::Cred, git2::Error> {
    if allowed_types.contains(git2::CredentialType::SSH_KEY) {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
        let key_paths = vec![
            format!("{}/.ssh/id_ed25519", home),
            format!("{}/.ssh/id_rsa", home),
            format!("{}/.ssh/id_ecdsa", home),
        ];

        for key_path in key_paths {
            let path = std::path::Path::new(&key_path);
            if path.exists() {
                if let Ok(cred) =
                    git2::Cred::ssh_key(username_from_url.unwrap_or("git"), None, path, None)
                {
                    return Ok(cred);
                }
            }
        }

        if let Ok(cred) = git2::Cred::ssh_key_from_agent(username_from_url.unwrap_or("git")) {
            return Ok(cred);
        }
    }

    git2::Cred::default()
}
