mod app_path;
mod execute;
mod find;
mod screen;
mod session;
mod settings;

use appdrive::Settings;
use serde_json::Value;

use crate::cli::{Cli, Commands, SessionAction, SettingsAction};
use crate::context::CommandContext;
use crate::error::{CliError, Result};

pub async fn dispatch(cli: Cli) -> Result<()> {
	let mut ctx = CommandContext::new(&cli);

	match cli.command {
		Commands::AppPath { app, platform, apps_root } => {
			app_path::execute(&app, platform.resolve(), apps_root.as_deref(), ctx.format)
		}
		Commands::Session { action } => match action {
			SessionAction::New {
				platform,
				app,
				device_name,
				platform_version,
				no_reset,
				capabilities,
			} => {
				let args = session::NewSessionArgs {
					platform: platform.resolve(),
					app,
					device_name,
					platform_version,
					no_reset,
					capabilities,
				};
				session::new(&mut ctx, args).await
			}
			SessionAction::Show => session::show(&ctx),
			SessionAction::Quit => session::quit(&mut ctx).await,
		},
		Commands::Find {
			using,
			value,
			all,
			within,
			attributes,
		} => {
			let args = find::FindArgs {
				using,
				value,
				all,
				within,
				attributes,
			};
			find::execute(&ctx, args).await
		}
		Commands::Click { element } => screen::click(&ctx, &element).await,
		Commands::Settings { action } => match action {
			SettingsAction::Get => settings::get(&ctx).await,
			SettingsAction::Set { pairs } => settings::set(&ctx, &pairs).await,
		},
		Commands::Execute { script, args, element } => execute::execute(&ctx, &script, &args, element).await,
		Commands::Back => screen::back(&ctx).await,
		Commands::Source => screen::source(&ctx).await,
		Commands::Screenshot { output } => screen::screenshot(&ctx, &output).await,
	}
}

/// Parses a CLI value as JSON, falling back to a plain string.
pub(crate) fn parse_value(raw: &str) -> Value {
	serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

/// Parses `KEY=VALUE` pairs into a settings-style map. Later keys win.
pub(crate) fn parse_pairs(pairs: &[String]) -> Result<Settings> {
	let mut map = Settings::new();
	for pair in pairs {
		let (key, value) = pair
			.split_once('=')
			.ok_or_else(|| CliError::InvalidInput(format!("expected KEY=VALUE, got '{pair}'")))?;
		let key = key.trim();
		if key.is_empty() {
			return Err(CliError::InvalidInput(format!("empty key in '{pair}'")));
		}
		map.insert(key.to_string(), parse_value(value));
	}
	Ok(map)
}
