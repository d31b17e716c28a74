//! Tutorial scaffolding.
//!
//! # Module Structure
//!
//! - [`validate`]: working directory, slug and target checks
//! - [`git`]: feature branch
//! - [`structure`]: directories and templated files
//! - [`bootstrap`]: `package.json`, test configs, dependency install

mod bootstrap;
mod git;
mod structure;
mod validate;

use validate::slug_to_title;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use owo_colors::OwoColorize;

use crate::cli::CreateArgs;
use crate::config::{Config, CreateConfig};
use crate::embed::create::SlugVars;
use crate::log;

/// Entry point for `cookbook create <SLUG>`.
pub fn run_create(args: &CreateArgs, config: &Config) -> Result<()> {
    let root = std::env::current_dir().context("failed to read current directory")?;
    let target = create_tutorial(&root, &args.slug, &config.create)?;
    let relative = target.strip_prefix(&root).unwrap_or(&target);
    print_next_steps(&args.slug, relative);
    Ok(())
}

/// Scaffold `<tutorials_dir>/<slug>` under `root`.
///
/// # Steps
/// 1. Validate root, slug and target (nothing written on failure)
/// 2. Create the feature branch (warning only)
/// 3. Create directory structure and templated files
/// 4. Write `package.json` and test configs, then install dependencies
/// 5. Verify the key files exist
pub fn create_tutorial(root: &Path, slug: &str, config: &CreateConfig) -> Result<PathBuf> {
    validate::validate_root(root, config)?;
    validate::validate_slug(slug)?;
    let target = root.join(&config.tutorials_dir).join(slug);
    validate::validate_target(&target, slug)?;

    log!("create"; "creating tutorial {}", slug);

    if config.git_branch {
        git::create_branch(root, slug);
    }

    let title = slug_to_title(slug);
    let vars = SlugVars {
        slug,
        title: &title,
    };

    let written = structure::create_structure(&target, &vars)?;
    crate::debug!("create"; "wrote {}", written.join(", "));

    bootstrap::write_configs(&target, &vars)?;
    if config.install {
        bootstrap::install(&target, config)?;
    } else {
        log!("create"; "skipping dependency install");
    }

    verify(&target);
    Ok(target)
}

/// Warn when a key file is missing after scaffolding.
fn verify(target: &Path) -> bool {
    let missing: Vec<&str> = ["package.json", "README.md"]
        .into_iter()
        .filter(|name| !target.join(name).is_file())
        .collect();

    if missing.is_empty() {
        log!("create"; "all files created");
        true
    } else {
        log!("warn"; "missing after scaffolding: {}", missing.join(", "));
        false
    }
}

fn print_next_steps(slug: &str, dir: &Path) {
    let dir = dir.display();
    println!();
    println!("{}", format!("Tutorial \"{slug}\" created").green().bold());
    println!();
    println!("{}", "Next steps:".yellow());
    println!("  1. Write the tutorial        {dir}/README.md");
    println!("  2. Preview it live           cookbook preview {dir}");
    println!("  3. Add the implementation    {dir}/{slug}-code/");
    println!("  4. Write tests               {dir}/tests/");
    println!("  5. Run them                  cd {dir} && npm test");
    println!("  6. Update metadata           {dir}/tutorial.yml");
    println!("  7. Open a pull request");
    println!("       git add -A");
    println!("       git commit -m \"feat(tutorial): add {slug}\"");
    println!("       git push origin {}", git::branch_name(slug));
    println!();
}
