//! Tutorial directory layout and template files.

use std::{fs, path::Path};

use anyhow::{Context, Result};

use crate::embed::create::{E2E_TEST_TS, GITIGNORE, JUSTFILE, README_MD, SlugVars, TUTORIAL_YML};

/// Create the directory tree and write every templated file.
///
/// Returns paths relative to `target`, in creation order.
pub fn create_structure(target: &Path, vars: &SlugVars<'_>) -> Result<Vec<String>> {
    let slug = vars.slug;
    let code_dir = format!("{slug}-code");
    for dir in ["tests", "scripts", code_dir.as_str()] {
        let path = target.join(dir);
        fs::create_dir_all(&path)
            .with_context(|| format!("Failed to create directory '{}'", path.display()))?;
    }

    let files = [
        ("justfile".to_string(), JUSTFILE.render(vars)),
        ("README.md".to_string(), README_MD.render(vars)),
        ("tutorial.yml".to_string(), TUTORIAL_YML.render(vars)),
        (format!("tests/{slug}-e2e.test.ts"), E2E_TEST_TS.render(vars)),
        ("scripts/.gitkeep".to_string(), String::new()),
        (".gitignore".to_string(), GITIGNORE.render(vars)),
    ];

    let mut written = Vec::with_capacity(files.len() + 1);
    for (name, content) in files {
        write_file(target, &name, &content)?;
        written.push(name);
    }
    written.push(format!("{code_dir}/"));
    Ok(written)
}

pub(super) fn write_file(target: &Path, name: &str, content: &str) -> Result<()> {
    let path = target.join(name);
    fs::write(&path, content).with_context(|| format!("Failed to write '{}'", path.display()))
}
