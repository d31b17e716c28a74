//! `[create]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [create]
//! tutorials_dir = "tutorials"       # Must exist in the working directory
//! markers = ["versions.yml"]        # Extra files proving we are at the repo root
//! package_manager = "npm"
//! install = true                    # Run the package manager after scaffolding
//! git_branch = true                 # Create `feat/tutorial-<slug>`
//! dev_dependencies = ["vitest", "typescript", "ts-node", "@types/node"]
//! dependencies = ["@polkadot/api", "ws"]
//! ```

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Tutorial scaffolding settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CreateConfig {
    /// Directory holding all tutorials, relative to the working directory.
    pub tutorials_dir: PathBuf,

    /// Files that must exist next to `tutorials_dir`.
    pub markers: Vec<PathBuf>,

    /// Package manager executable.
    pub package_manager: String,

    /// Install dependencies after writing `package.json`.
    pub install: bool,

    /// Create a feature branch for the new tutorial.
    pub git_branch: bool,

    /// Packages installed with `install -D`.
    pub dev_dependencies: Vec<String>,

    /// Packages installed with `install`.
    pub dependencies: Vec<String>,
}

impl Default for CreateConfig {
    fn default() -> Self {
        Self {
            tutorials_dir: "tutorials".into(),
            markers: vec!["versions.yml".into()],
            package_manager: "npm".into(),
            install: true,
            git_branch: true,
            dev_dependencies: ["vitest", "typescript", "ts-node", "@types/node"]
                .map(String::from)
                .to_vec(),
            dependencies: ["@polkadot/api", "ws"].map(String::from).to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use crate::config::test_parse_config;

    #[test]
    fn test_create_config_defaults() {
        let config = test_parse_config("");

        assert_eq!(config.create.tutorials_dir, PathBuf::from("tutorials"));
        assert_eq!(config.create.markers, vec![PathBuf::from("versions.yml")]);
        assert_eq!(config.create.package_manager, "npm");
        assert!(config.create.install);
        assert_eq!(config.create.dev_dependencies.len(), 4);
        assert_eq!(config.create.dependencies, ["@polkadot/api", "ws"]);
    }

    #[test]
    fn test_create_config_custom() {
        let config = test_parse_config(
            "[create]\npackage_manager = \"pnpm\"\ndependencies = []\nmarkers = [\"Cargo.toml\", \"versions.yml\"]",
        );

        assert_eq!(config.create.package_manager, "pnpm");
        assert!(config.create.dependencies.is_empty());
        assert_eq!(config.create.markers.len(), 2);
        // untouched fields keep defaults
        assert!(config.create.git_branch);
    }
}
