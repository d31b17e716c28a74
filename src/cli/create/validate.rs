//! Pre-creation checks.
//!
//! All of these run before anything is written, so a failure leaves the
//! repository untouched.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;
use thiserror::Error;

use crate::config::CreateConfig;

/// Precondition failures for `cookbook create`.
#[derive(Debug, Error)]
pub enum CreateError {
    #[error(
        "invalid tutorial slug `{0}`\n\
         slug must be lowercase letters and digits, words separated by single dashes\n\
         e.g. \"my-tutorial\", \"add-nft-pallet\", \"zero-to-hero\""
    )]
    InvalidSlug(String),

    #[error("tutorial \"{slug}\" already exists at {}", path.display())]
    AlreadyExists { slug: String, path: PathBuf },

    #[error("`{}` not found; run `cookbook create` from the repository root", .0.display())]
    WrongDirectory(PathBuf),
}

/// `true` for lowercase alphanumeric words joined by single dashes.
pub fn is_valid_slug(slug: &str) -> bool {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| Regex::new(r"^[a-z0-9]+(-[a-z0-9]+)*$").unwrap());
    re.is_match(slug)
}

/// `zero-to-hero` → `Zero To Hero`
pub fn slug_to_title(slug: &str) -> String {
    slug.split('-')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

/// The tutorials directory and every marker file must exist under `root`.
pub fn validate_root(root: &Path, config: &CreateConfig) -> Result<(), CreateError> {
    if !root.join(&config.tutorials_dir).is_dir() {
        return Err(CreateError::WrongDirectory(config.tutorials_dir.clone()));
    }
    match config.markers.iter().find(|m| !root.join(m).exists()) {
        Some(missing) => Err(CreateError::WrongDirectory(missing.clone())),
        None => Ok(()),
    }
}

pub fn validate_slug(slug: &str) -> Result<(), CreateError> {
    if is_valid_slug(slug) {
        Ok(())
    } else {
        Err(CreateError::InvalidSlug(slug.to_string()))
    }
}

/// The tutorial directory must not exist yet.
pub fn validate_target(target: &Path, slug: &str) -> Result<(), CreateError> {
    if target.exists() {
        return Err(CreateError::AlreadyExists {
            slug: slug.to_string(),
            path: target.to_path_buf(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_valid_slugs() {
        for slug in ["my-tutorial", "add-nft-pallet", "zero-to-hero", "a", "test123", "v2-migration"] {
            assert!(is_valid_slug(slug), "{slug}");
        }
    }

    #[test]
    fn test_invalid_slugs() {
        for slug in [
            "My_Tutorial",
            "My-Tutorial",
            "my_tutorial",
            "my--tutorial",
            "-my-tutorial",
            "my-tutorial-",
            "my tutorial",
            "",
            "tutorial/../x",
        ] {
            assert!(!is_valid_slug(slug), "{slug:?}");
        }
    }

    #[test]
    fn test_slug_to_title() {
        assert_eq!(slug_to_title("my-tutorial"), "My Tutorial");
        assert_eq!(slug_to_title("zero-to-hero"), "Zero To Hero");
        assert_eq!(slug_to_title("add-nft-pallet"), "Add Nft Pallet");
        assert_eq!(slug_to_title("v2"), "V2");
    }

    #[test]
    fn test_validate_root() {
        let temp = TempDir::new().unwrap();
        let config = CreateConfig::default();

        let err = validate_root(temp.path(), &config).unwrap_err();
        assert!(matches!(err, CreateError::WrongDirectory(ref p) if p == Path::new("tutorials")));

        fs::create_dir(temp.path().join("tutorials")).unwrap();
        let err = validate_root(temp.path(), &config).unwrap_err();
        assert!(err.to_string().contains("versions.yml"));

        fs::write(temp.path().join("versions.yml"), "").unwrap();
        assert!(validate_root(temp.path(), &config).is_ok());
    }

    #[test]
    fn test_validate_target() {
        let temp = TempDir::new().unwrap();
        assert!(validate_target(&temp.path().join("new"), "new").is_ok());
        let err = validate_target(temp.path(), "x").unwrap_err();
        assert!(err.to_string().contains("already exists"));
    }

    #[test]
    fn test_invalid_slug_message_has_examples() {
        let msg = validate_slug("My_Tutorial").unwrap_err().to_string();
        assert!(msg.contains("My_Tutorial"));
        assert!(msg.contains("zero-to-hero"));
    }
}
