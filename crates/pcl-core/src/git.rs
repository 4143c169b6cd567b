//! Git integration: base resolution, change set extraction, branch listing.
//!
//! Everything shells out to the `git` binary inside `repo_dir`.

use std::path::Path;
use std::process::Command;

use tracing::{debug, info};

use crate::domain::change_set::{BaseReference, ChangeSet};
use crate::domain::error::{PclError, Result};

/// Flags for the diff query: no color, no external driver, zero context,
/// rename detection, whitespace ignored.
pub const DIFF_FLAGS: &[&str] = &["--no-color", "--no-ext-diff", "-U0", "-M", "-w"];

/// Resolve the commit the working tree should be compared against.
///
/// Uses the fork point between `candidate` and `HEAD` when git can compute
/// one. Otherwise falls back to `HEAD` itself, which is the normal case for
/// local-only branches, detached HEADs and candidates without reflog history.
/// Only a repository without a resolvable `HEAD` is an error.
pub fn resolve_base_reference(repo_dir: &Path, candidate: &str) -> Result<BaseReference> {
    if candidate.starts_with('-') {
        debug!(candidate, "candidate looks like an option, skipping fork-point lookup");
    } else {
        match run_git(repo_dir, &["merge-base", "--fork-point", candidate]) {
            Ok(rev) if !rev.is_empty() => {
                info!(candidate, base = %rev, "resolved fork point");
                return Ok(BaseReference::fork_point(rev));
            }
            Ok(_) => debug!(candidate, "fork-point query returned nothing"),
            Err(e) => debug!(candidate, error = %e, "no fork point"),
        }
    }

    let head = run_git(repo_dir, &["rev-parse", "--verify", "HEAD"])
        .map_err(PclError::Resolution)?;
    if head.is_empty() {
        return Err(PclError::Resolution(
            "git rev-parse HEAD returned empty output".to_string(),
        ));
    }

    info!(candidate, base = %head, "falling back to current position");
    Ok(BaseReference::current_position(head))
}

/// Diff the working tree against `base`.
///
/// An empty result is returned as an empty [`ChangeSet`], not an error.
pub fn extract_change_set(repo_dir: &Path, base: &BaseReference) -> Result<ChangeSet> {
    let mut args = vec!["diff"];
    args.extend_from_slice(DIFF_FLAGS);
    args.push(base.rev());

    let diff = run_git(repo_dir, &args).map_err(PclError::Extraction)?;
    let change_set = ChangeSet::new(diff);
    info!(
        base = %base,
        hunks = change_set.hunk_count(),
        bytes = change_set.as_str().len(),
        "extracted change set"
    );
    Ok(change_set)
}

/// Short names of the local branches, candidates for the base.
pub fn list_branches(repo_dir: &Path) -> Result<Vec<String>> {
    let out = run_git(
        repo_dir,
        &["for-each-ref", "--format=%(refname:short)", "refs/heads"],
    )
    .map_err(PclError::Git)?;

    Ok(out
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect())
}

/// Run git and return trimmed stdout, or a message carrying stderr.
fn run_git(repo_dir: &Path, args: &[&str]) -> std::result::Result<String, String> {
    let output = Command::new("git")
        .args(args)
        .current_dir(repo_dir)
        .output()
        .map_err(|e| format!("failed to run git: {e}"))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        let stderr = stderr.trim();
        return Err(if stderr.is_empty() {
            format!("git {} failed: {}", args.join(" "), output.status)
        } else {
            format!("git {} failed: {stderr}", args.join(" "))
        });
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}
