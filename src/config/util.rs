//! Configuration utility functions.

use std::path::{Path, PathBuf};

/// Find config file by searching upward from current directory
///
/// Starts from cwd and walks up parent directories until finding `config_name`.
/// Returns the absolute path to the config file if found.
///
/// # Example
/// ```text
/// /home/user/cookbook/tutorials/zero-to-hero/  ← cwd
/// /home/user/cookbook/cookbook.toml            ← found!
/// ```
pub fn find_config_file(config_name: &Path) -> Option<PathBuf> {
    let cwd = std::env::current_dir().ok()?;
    find_config_file_from(&cwd, config_name)
}

fn find_config_file_from(start: &Path, config_name: &Path) -> Option<PathBuf> {
    if config_name.is_absolute() {
        return config_name.is_file().then(|| config_name.to_path_buf());
    }

    let mut current = start;
    loop {
        let candidate = current.join(config_name);
        if candidate.is_file() {
            return Some(candidate);
        }
        current = current.parent()?;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_find_in_ancestor() {
        let temp = TempDir::new().unwrap();
        let nested = temp.path().join("tutorials/demo");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(temp.path().join("cookbook.toml"), "").unwrap();

        let found = find_config_file_from(&nested, Path::new("cookbook.toml")).unwrap();
        assert_eq!(found, temp.path().join("cookbook.toml"));
    }

    #[test]
    fn test_absolute_missing() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("nope.toml");
        assert!(find_config_file_from(temp.path(), &missing).is_none());
    }

    #[test]
    fn test_directory_named_like_config_is_skipped() {
        let temp = TempDir::new().unwrap();
        let nested = temp.path().join("a");
        std::fs::create_dir_all(nested.join("cookbook.toml")).unwrap();
        std::fs::write(temp.path().join("cookbook.toml"), "").unwrap();

        let found = find_config_file_from(&nested, Path::new("cookbook.toml")).unwrap();
        assert_eq!(found, temp.path().join("cookbook.toml"));
    }
}
