// tests/integration_test.rs
use std::process::Command;

#[test]
fn test_next_version_help() {
    let output = Command::new("cargo")
        .args(["run", "--bin", "next-version", "--", "--help"])
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("next-version"));
    assert!(stdout.contains("Bump a repository's version"));
}

#[test]
fn test_version_parsing_and_bumping() {
    use next_version::version::{BumpUnit, VersionState};

    let state = VersionState::parse("Release-v1.2.3").expect("Should parse version");
    assert_eq!(state.major, 1);
    assert_eq!(state.minor, 2);
    assert_eq!(state.patch, 3);

    assert_eq!(state.increment(BumpUnit::Minor), "1.3.0");
    assert_eq!(state.increment(BumpUnit::Major), "2.0.0");
    assert_eq!(state.increment(BumpUnit::Patch), "1.2.4");
    assert_eq!(state.decrement(BumpUnit::Major), "0.0.0");
}

#[test]
fn test_branch_name_from_bump() {
    use next_version::branch::suggested_branch_name;
    use next_version::config::BranchesConfig;
    use next_version::version::BumpUnit;

    let naming = BranchesConfig::default();
    assert_eq!(
        suggested_branch_name(BumpUnit::Minor, "1.3.0", &naming),
        "Release-v1.3.0"
    );
    assert_eq!(
        suggested_branch_name(BumpUnit::Patch, "1.2.4", &naming),
        "Patch-v1.2.4"
    );
}

#[cfg(test)]
mod git_operations_tests {
    use std::env;
    use std::fs;
    use std::path::Path;

    use git2::Repository;
    use serial_test::serial;
    use tempfile::TempDir;

    use next_version::branch::suggested_branch_name;
    use next_version::config::{BranchesConfig, Config};
    use next_version::git_ops::GitRepo;
    use next_version::manifest::find_manifests;
    use next_version::version::{BumpUnit, VersionState};

    const PACKAGE_JSON: &str = "{\n  \"name\": \"demo\",\n  \"version\": \"1.2.3\"\n}\n";

    // Helper function to setup a temporary git repo with a committed manifest
    fn setup_test_repo() -> TempDir {
        let temp_dir = TempDir::new().expect("Could not create temp dir");

        let repo = Repository::init(temp_dir.path()).expect("Could not init git repo");

        {
            let mut config = repo.config().expect("Could not get config");
            config
                .set_str("user.name", "Test User")
                .expect("Could not set user.name");
            config
                .set_str("user.email", "test@example.com")
                .expect("Could not set user.email");
        }

        let manifest_path = temp_dir.path().join("package.json");
        fs::write(&manifest_path, PACKAGE_JSON).expect("Could not write manifest");

        let mut index = repo.index().expect("Could not get index");
        index
            .add_path(Path::new("package.json"))
            .expect("Could not add file to index");
        index.write().expect("Could not write index");

        let tree_id = index.write_tree().expect("Could not write tree");
        let tree = repo.find_tree(tree_id).expect("Could not find tree");

        repo.commit(
            Some("HEAD"),
            &repo.signature().expect("Could not get sig"),
            &repo.signature().expect("Could not get sig"),
            "Initial commit",
            &tree,
            &[],
        )
        .expect("Could not create commit");

        temp_dir
    }

    #[test]
    fn test_open_and_workdir() {
        let temp_dir = setup_test_repo();
        let git_repo = GitRepo::open(temp_dir.path()).expect("Should open repo");

        let workdir = git_repo.workdir().expect("Should have workdir");
        assert_eq!(
            workdir.canonicalize().unwrap(),
            temp_dir.path().canonicalize().unwrap()
        );
    }

    #[test]
    fn test_open_outside_a_repository_fails() {
        let temp_dir = TempDir::new().unwrap();
        assert!(GitRepo::open(temp_dir.path()).is_err());
    }

    #[test]
    fn test_clean_tree_is_not_dirty() {
        let temp_dir = setup_test_repo();
        let git_repo = GitRepo::open(temp_dir.path()).unwrap();

        assert!(!git_repo.is_dirty().unwrap());
        assert_eq!(git_repo.changed_file_count().unwrap(), 0);
    }

    #[test]
    fn test_modified_tracked_file_is_dirty() {
        let temp_dir = setup_test_repo();
        let git_repo = GitRepo::open(temp_dir.path()).unwrap();

        fs::write(temp_dir.path().join("package.json"), "{}\n").unwrap();
        assert!(git_repo.is_dirty().unwrap());
        assert_eq!(git_repo.changed_file_count().unwrap(), 1);
    }

    #[test]
    fn test_untracked_file_is_not_dirty() {
        let temp_dir = setup_test_repo();
        let git_repo = GitRepo::open(temp_dir.path()).unwrap();

        fs::write(temp_dir.path().join("notes.txt"), "scratch\n").unwrap();
        assert!(!git_repo.is_dirty().unwrap());
    }

    #[test]
    fn test_reset_hard_restores_tracked_files() {
        let temp_dir = setup_test_repo();
        let git_repo = GitRepo::open(temp_dir.path()).unwrap();

        let manifest_path = temp_dir.path().join("package.json");
        fs::write(&manifest_path, "{}\n").unwrap();
        assert!(git_repo.is_dirty().unwrap());

        git_repo.reset_hard().unwrap();
        assert!(!git_repo.is_dirty().unwrap());
        assert_eq!(fs::read_to_string(&manifest_path).unwrap(), PACKAGE_JSON);
    }

    #[test]
    fn test_branch_creation_and_checkout() {
        let temp_dir = setup_test_repo();
        let git_repo = GitRepo::open(temp_dir.path()).unwrap();

        let base = git_repo.current_branch().unwrap();
        assert!(git_repo.branch_exists(&base));
        assert!(!git_repo.branch_exists("Release-v1.3.0"));

        git_repo.create_branch_and_checkout("Release-v1.3.0").unwrap();
        assert_eq!(git_repo.current_branch().unwrap(), "Release-v1.3.0");
        assert!(git_repo
            .local_branches()
            .unwrap()
            .contains(&"Release-v1.3.0".to_string()));

        // Creating the same branch again must fail
        let err = git_repo
            .create_branch_and_checkout("Release-v1.3.0")
            .unwrap_err();
        assert!(err.to_string().contains("already exists"));

        git_repo.checkout(&base).unwrap();
        assert_eq!(git_repo.current_branch().unwrap(), base);
    }

    #[test]
    fn test_pull_without_remote_fails() {
        let temp_dir = setup_test_repo();
        let git_repo = GitRepo::open(temp_dir.path()).unwrap();

        let err = git_repo.pull("origin", "main").unwrap_err();
        assert!(err.to_string().contains("origin"));
    }

    #[test]
    fn test_list_remotes_empty() {
        let temp_dir = setup_test_repo();
        let git_repo = GitRepo::open(temp_dir.path()).unwrap();
        assert!(git_repo.list_remotes().unwrap().is_empty());
    }

    #[test]
    fn test_bump_workflow_end_to_end() {
        let temp_dir = setup_test_repo();
        let git_repo = GitRepo::open(temp_dir.path()).unwrap();
        let config = Config::default();

        let manifests = find_manifests(&git_repo.workdir().unwrap());
        assert_eq!(manifests.len(), 1);

        let current = manifests[0].read_version().unwrap();
        let state = VersionState::parse(&current).unwrap();
        let next = state.increment(BumpUnit::Minor);
        assert_eq!(next, "1.3.0");

        let branch_name = suggested_branch_name(BumpUnit::Minor, &next, &BranchesConfig::default());
        git_repo.create_branch_and_checkout(&branch_name).unwrap();

        manifests[0].apply_version(&current, &next).unwrap();
        git_repo.stage(&[Path::new("package.json")]).unwrap();
        git_repo.commit(&config.commit_message(&next)).unwrap();

        assert!(!git_repo.is_dirty().unwrap());
        assert_eq!(git_repo.current_branch().unwrap(), "Release-v1.3.0");
        assert_eq!(manifests[0].read_version().unwrap(), "1.3.0");
    }

    #[test]
    #[serial]
    fn test_discover_from_current_directory() {
        let temp_dir = setup_test_repo();
        let original_dir = env::current_dir().unwrap();

        env::set_current_dir(temp_dir.path()).expect("Could not change to temp dir");

        let git_repo = GitRepo::new();
        assert!(
            git_repo.is_ok(),
            "GitRepo::new() should succeed in a git directory"
        );

        env::set_current_dir(original_dir).unwrap();
    }
}
