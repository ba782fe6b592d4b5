//! Screen-level commands: `click`, `back`, `source`, `screenshot`.

use std::path::Path;

use anyhow::Context;
use serde_json::{Value, json};
use tracing::info;

use crate::context::CommandContext;
use crate::error::Result;
use crate::output::{ScreenshotData, emit_success};

pub async fn click(ctx: &CommandContext, element: &str) -> Result<()> {
	ctx.session()?.element(element).click().await?;
	emit_success(
		"click",
		json!({ "element": element }),
		json!({ "element": element, "clicked": true }),
		ctx.format,
	);
	Ok(())
}

pub async fn back(ctx: &CommandContext) -> Result<()> {
	ctx.session()?.back().await?;
	emit_success("back", Value::Null, json!({ "navigatedBack": true }), ctx.format);
	Ok(())
}

pub async fn source(ctx: &CommandContext) -> Result<()> {
	let source = ctx.session()?.source().await?;
	emit_success("source", Value::Null, source, ctx.format);
	Ok(())
}

pub async fn screenshot(ctx: &CommandContext, output: &Path) -> Result<()> {
	let png = ctx.session()?.screenshot().await?;
	if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
		tokio::fs::create_dir_all(parent)
			.await
			.with_context(|| format!("creating {}", parent.display()))?;
	}
	tokio::fs::write(output, &png)
		.await
		.with_context(|| format!("writing screenshot to {}", output.display()))?;
	info!(target = "appdrive.cli", path = %output.display(), bytes = png.len(), "screenshot saved");

	emit_success(
		"screenshot",
		json!({ "output": output }),
		ScreenshotData {
			path: output.to_path_buf(),
			size_bytes: png.len() as u64,
		},
		ctx.format,
	);
	Ok(())
}
