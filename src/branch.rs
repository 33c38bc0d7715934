//! Release-branch naming and base-branch selection rules.

use regex::RegexBuilder;

use crate::config::BranchesConfig;
use crate::version::BumpUnit;

/// Compose the release-branch name for a bumped version.
///
/// A patch bump uses the patch label, anything else the release label. When
/// the version begins with a digit a `v` is inserted between label and
/// version, so `Patch` + `"0.0.2"` becomes `Patch-v0.0.2` while an already
/// prefixed `"v1.3.0"` stays `Release-v1.3.0`.
pub fn suggested_branch_name(unit: BumpUnit, version: &str, config: &BranchesConfig) -> String {
    let label = match unit {
        BumpUnit::Patch => config.patch_label.as_str(),
        _ => config.release_label.as_str(),
    };

    let mut name = format!("{}-", label);
    if version.starts_with(|c: char| c.is_ascii_digit()) {
        name.push('v');
    }
    name.push_str(version);
    name
}

/// Whether a branch name looks like a workflow branch (release, patch,
/// feature, fix...) rather than a base-branch candidate.
///
/// Matches the configured pattern case-insensitively; an invalid pattern
/// filters nothing.
pub fn is_workflow_branch(name: &str, skip_pattern: &str) -> bool {
    match RegexBuilder::new(skip_pattern).case_insensitive(true).build() {
        Ok(re) => re.is_match(name),
        Err(_) => false,
    }
}

/// Filter and order local branches into base-branch candidates.
///
/// Workflow branches are dropped, then the configured preferred names
/// (main/master/production by default) are moved to the front in their
/// configured order. The remaining branches keep their original order.
pub fn base_branch_candidates(branches: &[String], config: &BranchesConfig) -> Vec<String> {
    let kept: Vec<&String> = branches
        .iter()
        .filter(|name| !is_workflow_branch(name, &config.skip_pattern))
        .collect();

    let mut candidates = Vec::with_capacity(kept.len());
    for preferred in &config.preferred_base {
        if let Some(found) = kept.iter().find(|name| name.as_str() == preferred) {
            candidates.push((*found).clone());
        }
    }
    for name in kept {
        if !candidates.contains(name) {
            candidates.push(name.clone());
        }
    }

    candidates
}
