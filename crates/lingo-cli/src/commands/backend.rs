//! Backend probes.

use crate::context::AppContext;
use anyhow::{Context, Result};

pub async fn health(ctx: &AppContext) -> Result<()> {
    let body = ctx
        .backend
        .health()
        .await
        .with_context(|| format!("Backend at {} is not reachable", ctx.backend.base_url()))?;
    println!("✅ {} ({})", body, ctx.backend.base_url());
    Ok(())
}

pub async fn languages(ctx: &AppContext) -> Result<()> {
    let languages = ctx.backend.languages().await?;
    println!("{}", serde_json::to_string_pretty(&languages)?);
    Ok(())
}
