//! `session new | show | quit`.

use appdrive::{AppPathResolver, Capabilities, Platform};
use serde_json::{Value, json};
use tracing::info;

use super::parse_pairs;
use crate::context::CommandContext;
use crate::error::Result;
use crate::output::{SessionData, emit_success};

pub struct NewSessionArgs {
	pub platform: Platform,
	pub app: Option<String>,
	pub device_name: Option<String>,
	pub platform_version: Option<String>,
	pub no_reset: bool,
	pub capabilities: Vec<String>,
}

/// Builds desired capabilities, resolving `app` like `app-path` does.
pub(crate) fn build_capabilities(args: &NewSessionArgs) -> Result<Capabilities> {
	let mut caps = args.platform.capabilities();
	if let Some(ref app) = args.app {
		caps = caps.app(AppPathResolver::new().resolve(app, args.platform)?);
	}
	if let Some(ref name) = args.device_name {
		caps = caps.device_name(name.clone());
	}
	if let Some(ref version) = args.platform_version {
		caps = caps.platform_version(version.clone());
	}
	if args.no_reset {
		caps = caps.no_reset(true);
	}
	for (key, value) in parse_pairs(&args.capabilities)? {
		caps = caps.set(key, value);
	}
	Ok(caps)
}

pub async fn new(ctx: &mut CommandContext, args: NewSessionArgs) -> Result<()> {
	let caps = build_capabilities(&args)?;
	let inputs = serde_json::to_value(&caps)?;

	let session = ctx.driver()?.new_session(caps).await?;
	info!(target = "appdrive.cli", session = session.id(), server = ctx.server(), "session started");

	let server = ctx.server().to_string();
	ctx.store_mut().record_session(&server, session.id())?;

	emit_success(
		"session new",
		inputs,
		SessionData {
			session_id: session.id().to_string(),
			server,
			server_source: None,
			capabilities: session.capabilities().clone(),
		},
		ctx.format,
	);
	Ok(())
}

pub fn show(ctx: &CommandContext) -> Result<()> {
	let session_id = ctx.session_id()?;
	emit_success(
		"session show",
		Value::Null,
		SessionData {
			session_id: session_id.to_string(),
			server: ctx.server().to_string(),
			server_source: Some(ctx.server_source().as_str().to_string()),
			capabilities: Value::Null,
		},
		ctx.format,
	);
	Ok(())
}

pub async fn quit(ctx: &mut CommandContext) -> Result<()> {
	let session = ctx.session()?;
	let session_id = session.id().to_string();
	session.quit().await?;
	ctx.store_mut().clear_session(&session_id)?;

	emit_success(
		"session quit",
		json!({ "sessionId": session_id }),
		json!({ "sessionId": session_id, "ended": true }),
		ctx.format,
	);
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;

	fn args(platform: Platform, app: Option<&str>) -> NewSessionArgs {
		NewSessionArgs {
			platform,
			app: app.map(str::to_string),
			device_name: None,
			platform_version: None,
			no_reset: false,
			capabilities: Vec::new(),
		}
	}

	#[test]
	fn ios_capabilities_resolve_app() {
		let caps = build_capabilities(&args(Platform::Ios, Some("UICatalog"))).unwrap();
		assert_eq!(caps.platform_name.as_deref(), Some("iOS"));
		assert_eq!(
			caps.app.as_deref(),
			Some("sample-code/apps/UICatalog/build/Release-iphonesimulator/UICatalog.app")
		);
		assert_eq!(caps.no_reset, None);
	}

	#[test]
	fn selendroid_sets_automation_name_and_extras() {
		let mut input = args(Platform::AndroidCompatible, Some("selendroid-test-app"));
		input.no_reset = true;
		input.device_name = Some("Android Emulator".into());
		input.capabilities = vec!["newCommandTimeout=120".into()];

		let caps = build_capabilities(&input).unwrap();
		assert_eq!(caps.automation_name.as_deref(), Some("selendroid"));
		assert_eq!(
			caps.app.as_deref(),
			Some("sample-code/apps/selendroid-test-app/bin/selendroid-test-app-debug.apk")
		);
		assert_eq!(caps.no_reset, Some(true));
		assert_eq!(caps.extra["newCommandTimeout"], 120);
	}

	#[test]
	fn other_platform_passes_app_through() {
		let caps = build_capabilities(&args(Platform::Other, Some("/tmp/My.app"))).unwrap();
		assert_eq!(caps.app.as_deref(), Some("/tmp/My.app"));
		assert_eq!(caps.platform_name, None);
	}
}
