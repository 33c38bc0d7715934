use anyhow::Result;
use clap::Parser;
use std::path::Path;

use next_version::boundary::BoundaryWarning;
use next_version::branch;
use next_version::config::{self, Config};
use next_version::git_ops::GitRepo;
use next_version::manifest::{self, Manifest};
use next_version::ui;
use next_version::version::{BumpUnit, VersionState};

#[derive(clap::Parser)]
#[command(
    name = "next-version",
    about = "Bump a repository's version and prepare its release branch"
)]
struct Args {
    #[arg(short, long, help = "Custom configuration file path")]
    config: Option<String>,

    #[arg(short = 'C', long, help = "Path to the project directory")]
    cwd: Option<String>,

    #[arg(short, long, help = "Base branch to bump from")]
    branch: Option<String>,

    #[arg(short, long, help = "Unit to increment (major, minor, patch)")]
    increment: Option<String>,

    #[arg(short, long, help = "Push the release branch after committing")]
    push: bool,

    #[arg(short, long, help = "Skip confirmation prompts")]
    force: bool,

    #[arg(long, help = "Preview what would happen without making changes")]
    dry_run: bool,

    #[arg(long, help = "Show detected manifests with their versions and exit")]
    list: bool,

    #[arg(short, long, help = "Print version information")]
    version: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    if args.version {
        println!("next-version {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    // Load configuration
    let config = match config::load_config(args.config.as_deref()) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Error loading config: {}", e);
            std::process::exit(1);
        }
    };

    // Initialize git operations
    let cwd = args.cwd.clone().unwrap_or_else(|| ".".to_string());
    let git_repo = match GitRepo::open(&cwd) {
        Ok(repo) => repo,
        Err(e) => {
            ui::display_error(&format!("Git repository error: {}", e));
            std::process::exit(1);
        }
    };
    let workdir = git_repo.workdir()?;

    let manifests = manifest::find_manifests(&workdir);
    if manifests.is_empty() {
        ui::display_error(&format!(
            "No package.json or Cargo.toml found in '{}'",
            workdir.display()
        ));
        std::process::exit(1);
    }

    if args.list {
        return list_manifests(&manifests);
    }

    ui::display_banner();

    // Resolve the increment unit from flag or configured default
    let raw_unit = args
        .increment
        .clone()
        .unwrap_or_else(|| config.workflow.default_increment.clone());
    let unit: BumpUnit = match raw_unit.parse() {
        Ok(unit) => unit,
        Err(e) => {
            ui::display_error(&e.to_string());
            std::process::exit(1);
        }
    };

    // Resolve the base branch from flag or prompt
    let base_branch = if let Some(branch) = args.branch.clone() {
        branch
    } else {
        let locals = git_repo.local_branches()?;
        let candidates = branch::base_branch_candidates(&locals, &config.branches);
        if candidates.is_empty() {
            ui::display_error("No base branch candidates found in this repository");
            std::process::exit(1);
        }
        ui::select_from_list("Default branch for the project:", &candidates)?
    };

    // Resolve push up front, like the rest of the settings
    let push = if args.push {
        true
    } else if args.force || args.dry_run {
        false
    } else {
        ui::confirm_action("Push the release branch after committing?")?
    };

    ui::display_settings(&[
        ("cwd", workdir.display().to_string()),
        ("base branch", base_branch.clone()),
        ("increment", unit.to_string()),
        ("push", push.to_string()),
    ]);

    // Check for dirty state
    ui::display_status("Check for dirty state");
    let changed_files = git_repo.changed_file_count()?;
    if changed_files > 0 {
        let warning = BoundaryWarning::DirtyWorkingTree { changed_files };
        ui::display_boundary_warning(&warning);

        // A hard reset is destructive, so force mode never performs it
        // silently.
        if args.force || args.dry_run {
            ui::display_error("Cannot continue on a dirty working tree");
            std::process::exit(1);
        }

        if ui::confirm_action("Repository is dirty. Perform a HARD RESET?")? {
            ui::display_command("git reset --hard");
            git_repo.reset_hard()?;
            ui::display_success("Working tree reset");
        } else {
            println!("Cannot continue on a dirty working tree.");
            return Ok(());
        }
    }

    // Switch to the base branch and bring it up to date
    ui::display_status(&format!("Checkout branch {}", base_branch));
    if git_repo.current_branch()? != base_branch {
        ui::display_command(&format!("git checkout {}", base_branch));
        git_repo.checkout(&base_branch)?;
    }

    let remotes = git_repo.list_remotes()?;
    if let Some(remote) = remotes.first() {
        ui::display_status(&format!("Pull {} from {}", base_branch, remote));
        match git_repo.pull(remote, &base_branch) {
            Ok(_) => ui::display_success("Branch is up to date with remote"),
            Err(e) => {
                let error_msg = e.to_string().to_lowercase();
                if error_msg.contains("auth") || error_msg.contains("permission") {
                    let warning = BoundaryWarning::FetchAuthenticationFailed {
                        remote: remote.clone(),
                    };
                    ui::display_boundary_warning(&warning);

                    if !args.force
                        && !args.dry_run
                        && !ui::confirm_action("Continue using local data?")?
                    {
                        println!("Operation cancelled by user.");
                        return Ok(());
                    }
                } else {
                    ui::display_status(&format!(
                        "Warning: Could not pull from remote: {}. Using local branch data.",
                        e
                    ));
                }
            }
        }
    }

    // Read the current version from the root manifest
    let root_manifest = &manifests[0];
    ui::display_status(&format!("Read {}", root_manifest.kind));
    let current_version = match root_manifest.read_version() {
        Ok(version) => version,
        Err(e) => {
            ui::display_error(&e.to_string());
            std::process::exit(1);
        }
    };

    let state = match VersionState::parse(&current_version) {
        Ok(state) => state,
        Err(e) => {
            let warning = BoundaryWarning::UnparsableManifestVersion {
                path: root_manifest.path.display().to_string(),
                reason: e.to_string(),
            };
            ui::display_boundary_warning(&warning);

            if !args.force
                && !args.dry_run
                && !ui::confirm_action("Start from version 0.0.0 and continue?")?
            {
                println!("Operation cancelled by user.");
                return Ok(());
            }

            VersionState::default()
        }
    };

    let next_version = state.increment(unit);
    ui::display_version_change(&current_version, &next_version);

    // Derive the release branch from the unit and the new version
    let branch_name = branch::suggested_branch_name(unit, &next_version, &config.branches);
    if git_repo.branch_exists(&branch_name) {
        let warning = BoundaryWarning::BranchAlreadyExists {
            branch: branch_name,
        };
        ui::display_boundary_warning(&warning);
        return Ok(());
    }

    if args.dry_run {
        println!();
        ui::display_status("Dry run:");
        ui::display_success(&format!("  Step 1: would create branch {}", branch_name));
        ui::display_success(&format!(
            "  Step 2: would set version {} in {} manifest(s)",
            next_version,
            manifests.len()
        ));
        ui::display_success(&format!(
            "  Step 3: would commit '{}'",
            config.commit_message(&next_version)
        ));
        if push {
            ui::display_success(&format!(
                "  Step 4: would push {} with an upstream",
                branch_name
            ));
        }
        return Ok(());
    }

    println!();
    ui::display_status(&format!("Create release branch: {}", branch_name));
    ui::display_command(&format!("git checkout -b {}", branch_name));
    if let Err(e) = git_repo.create_branch_and_checkout(&branch_name) {
        ui::display_error(&format!("Failed to create branch '{}': {}", branch_name, e));
        std::process::exit(1);
    }
    ui::display_success(&format!("Created branch: {}", branch_name));

    update_manifests(&git_repo, &manifests, &current_version, &next_version)?;

    let commit_message = config.commit_message(&next_version);
    ui::display_status("Commit changes");
    ui::display_command(&format!("git commit -m \"{}\"", commit_message));
    if let Err(e) = git_repo.commit(&commit_message) {
        ui::display_error(&format!("Failed to commit: {}", e));
        std::process::exit(1);
    }

    if push {
        push_release_branch(&git_repo, &config, &branch_name, &remotes, args.force)?;
    } else {
        ui::display_manual_push_instruction(&branch_name, "origin");
    }

    println!();
    ui::display_success("Work complete");
    println!();
    Ok(())
}

/// Rewrite and stage the version field in every detected manifest.
fn update_manifests(
    git_repo: &GitRepo,
    manifests: &[Manifest],
    root_version: &str,
    next_version: &str,
) -> Result<()> {
    for (i, manifest) in manifests.iter().enumerate() {
        println!();
        ui::display_status(&format!("Update {}", manifest.kind));

        // Secondary manifests may carry their own current version.
        let current = if i == 0 {
            root_version.to_string()
        } else {
            match manifest.read_version() {
                Ok(version) => version,
                Err(e) => {
                    ui::display_error(&e.to_string());
                    std::process::exit(1);
                }
            }
        };

        if let Err(e) = manifest.apply_version(&current, next_version) {
            ui::display_error(&e.to_string());
            std::process::exit(1);
        }

        let file_name = manifest.kind.file_name();
        ui::display_command(&format!("git add {}", file_name));
        git_repo.stage(&[Path::new(file_name)])?;
        ui::display_success(&format!("{} set to {}", manifest.kind, next_version));
    }
    Ok(())
}

/// Push the release branch, prompting for a remote when several exist.
fn push_release_branch(
    git_repo: &GitRepo,
    config: &Config,
    branch_name: &str,
    remotes: &[String],
    force: bool,
) -> Result<()> {
    if remotes.is_empty() {
        ui::display_error("No remotes configured; cannot push");
        ui::display_manual_push_instruction(branch_name, "origin");
        return Ok(());
    }

    let remote = if remotes.len() > 1 && !config.behavior.skip_remote_selection && !force {
        ui::select_from_list("Push to which remote?", remotes)?
    } else {
        remotes[0].clone()
    };

    println!();
    ui::display_status(&format!("Push {} to {}", branch_name, remote));
    ui::display_command(&format!("git push -u {} {}", remote, branch_name));
    if let Err(e) = git_repo.push_branch(&remote, branch_name) {
        ui::display_error(&format!("Failed to push branch '{}': {}", branch_name, e));
        std::process::exit(1);
    }
    ui::display_success(&format!("Pushed {} to {}", branch_name, remote));
    Ok(())
}

fn list_manifests(manifests: &[Manifest]) -> Result<()> {
    let mut entries = Vec::new();
    for manifest in manifests {
        let version = manifest
            .read_version()
            .unwrap_or_else(|e| format!("unreadable: {}", e));
        entries.push((manifest.clone(), version));
    }
    ui::display_manifests(&entries);
    Ok(())
}
