//! Configuration inspection.

use crate::context::AppContext;
use anyhow::{Context, Result};

/// Prints the effective configuration; `init` writes a default file first.
pub fn show(ctx: &AppContext, init: bool) -> Result<()> {
    if init {
        let path = ctx
            .config_service
            .ensure_config_file()
            .context("Failed to write default configuration")?;
        println!("📝 Config file: {}", path.display());
    } else {
        println!("# {}", ctx.config_service.path().display());
    }
    if let Ok(dir) = ctx.paths.config_dir() {
        println!("# data dir: {}", dir.display());
    }
    println!("{}", toml::to_string_pretty(&ctx.config)?);
    Ok(())
}
