//! Feature branch for a new tutorial.

use std::path::Path;

use crate::{exec, log};

pub fn branch_name(slug: &str) -> String {
    format!("feat/tutorial-{slug}")
}

/// Run `git checkout -b feat/tutorial-<slug>` in `root`.
///
/// Failure is only a warning: the author may already be on a feature
/// branch, or not inside a git checkout at all.
pub fn create_branch(root: &Path, slug: &str) -> bool {
    let branch = branch_name(slug);
    match exec!(root; "git"; "checkout", "-b", &branch) {
        Ok(_) => {
            log!("create"; "created branch {}", branch);
            true
        }
        Err(e) => {
            crate::debug!("create"; "{:#}", e);
            log!("warn"; "could not create branch {}, continuing on the current branch", branch);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_branch_name() {
        assert_eq!(branch_name("my-tutorial"), "feat/tutorial-my-tutorial");
    }

    #[test]
    fn test_outside_repository_is_not_fatal() {
        let temp = TempDir::new().unwrap();
        // a bare temp dir is never a git checkout
        assert!(!create_branch(temp.path(), "demo"));
    }
}
