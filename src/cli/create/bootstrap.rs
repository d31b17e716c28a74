//! Test environment for a new tutorial: `package.json`, vitest and
//! TypeScript configs, then the package-manager install.

use std::path::Path;

use anyhow::{Context, Result};
use serde_json::json;

use super::structure::write_file;
use crate::config::CreateConfig;
use crate::embed::create::{SlugVars, TSCONFIG_JSON, VITEST_CONFIG_TS};
use crate::log;
use crate::utils::exec::{Cmd, FilterRule, find_program};

/// npm progress chatter that is not worth echoing.
const INSTALL_FILTER: FilterRule =
    FilterRule::new(&["npm warn", "npm WARN", "npm notice", "npm fund", "Run `npm fund`"]);

/// Build the initial `package.json`.
pub fn package_json(slug: &str) -> serde_json::Value {
    json!({
        "name": slug,
        "version": "0.1.0",
        "private": true,
        "type": "module",
        "scripts": {
            "test": "vitest run",
            "test:watch": "vitest",
            "preview": "cookbook preview ."
        }
    })
}

/// Write `package.json`, `vitest.config.ts` and `tsconfig.json`.
pub fn write_configs(target: &Path, vars: &SlugVars<'_>) -> Result<()> {
    let package = serde_json::to_string_pretty(&package_json(vars.slug))
        .context("Failed to serialize package.json")?;
    write_file(target, "package.json", &format!("{package}\n"))?;
    write_file(target, "vitest.config.ts", &VITEST_CONFIG_TS.render(vars))?;
    write_file(target, "tsconfig.json", &TSCONFIG_JSON.render(vars))?;
    Ok(())
}

/// Install the configured dev dependencies and dependencies.
///
/// A missing package manager or a failed install is an error; nothing
/// already written is removed.
pub fn install(target: &Path, config: &CreateConfig) -> Result<()> {
    let program = find_program(&config.package_manager)?;

    for (flag, packages) in [
        (Some("-D"), &config.dev_dependencies),
        (None, &config.dependencies),
    ] {
        if packages.is_empty() {
            continue;
        }
        log!("create"; "installing {}", packages.join(", "));
        Cmd::new(&program)
            .arg("install")
            .args(flag)
            .args(packages)
            .cwd(target)
            .pty(true)
            .filter(&INSTALL_FILTER)
            .run()
            .with_context(|| {
                format!("`{} install` failed in {}", config.package_manager, target.display())
            })?;
    }
    Ok(())
}
