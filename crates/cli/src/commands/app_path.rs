//! `app-path`: resolve a logical app name without contacting a server.

use appdrive::{AppPathResolver, Platform};
use serde_json::json;
use tracing::info;

use crate::error::Result;
use crate::output::{AppPathData, OutputFormat, emit_success};

pub fn execute(app: &str, platform: Platform, apps_root: Option<&str>, format: OutputFormat) -> Result<()> {
	let mut resolver = AppPathResolver::new();
	if let Some(root) = apps_root {
		resolver = resolver.with_apps_root(root);
	}

	let path = resolver.resolve(app, platform)?;
	info!(target = "appdrive.cli", app, %platform, %path, "resolved app");

	emit_success(
		"app-path",
		json!({ "app": app, "platform": platform.as_str(), "appsRoot": resolver.apps_root() }),
		AppPathData {
			app: app.to_string(),
			platform: platform.as_str().to_string(),
			path,
		},
		format,
	);
	Ok(())
}
