
use std::path::PathBuf;

use appdrive::{LocatorStrategy, Platform};
use clap::{Args, Parser, Subcommand};

use crate::output::OutputFormat;
use crate::styles::cli_styles;

#[derive(Parser, Debug)]
#[command(name = "appdrive")]
#[command(about = "Drive mobile apps through an Appium-compatible automation server")]
#[command(version)]
#[command(styles = cli_styles())]
pub struct Cli {
	/// Increase verbosity (-v info, -vv debug)
	#[arg(short, long, global = true, action = clap::ArgAction::Count)]
	pub verbose: u8,

	/// Output format: toon (default), json, ndjson, or text
	#[arg(short = 'f', long, global = true, value_enum, default_value = "toon")]
	pub format: OutputFormat,

	/// Automation server URL [default: last used, else http://127.0.0.1:4723/wd/hub]
	#[arg(long, global = true, env = "APPDRIVE_SERVER", value_name = "URL")]
	pub server: Option<String>,

	/// Session to address [default: last created]
	#[arg(long, global = true, env = "APPDRIVE_SESSION", value_name = "ID")]
	pub session: Option<String>,

	/// Per-request timeout in milliseconds
	#[arg(long, global = true, value_name = "MS")]
	pub timeout_ms: Option<u64>,

	/// Do not persist server/session to the state file
	#[arg(long, global = true)]
	pub no_save_state: bool,

	/// State file location
	#[arg(long, global = true, env = "APPDRIVE_STATE", value_name = "FILE", hide = true)]
	pub state_file: Option<PathBuf>,

	#[command(subcommand)]
	pub command: Commands,
}

/// Platform selection shared by commands that resolve apps.
#[derive(Args, Debug, Clone, Default)]
pub struct PlatformArgs {
	/// Target platform; defaults to the IOS / ANDROID / SELENDROID environment flags
	#[arg(short, long, value_name = "PLATFORM")]
	pub platform: Option<Platform>,
}

impl PlatformArgs {
	pub fn resolve(&self) -> Platform {
		self.platform.unwrap_or_else(Platform::from_env)
	}
}

#[derive(Subcommand, Debug)]
pub enum Commands {
	/// Resolve a logical app name to the path the server should install
	#[command(alias = "app")]
	AppPath {
		/// App name, e.g. TestApp, UICatalog, ApiDemos
		app: String,

		#[command(flatten)]
		platform: PlatformArgs,

		/// Directory holding the sample app builds
		#[arg(long, value_name = "DIR")]
		apps_root: Option<String>,
	},

	/// Create, inspect or end sessions
	Session {
		#[command(subcommand)]
		action: SessionAction,
	},

	/// Find elements in the current screen
	Find {
		/// Strategy: id, name, "tag name", "class name", "accessibility id", xpath, ...
		using: LocatorStrategy,

		/// Selector value; prefix a tag name with "> " for direct children only
		value: String,

		/// Return every match instead of the first
		#[arg(short, long)]
		all: bool,

		/// Search below this element id
		#[arg(long, value_name = "ELEMENT")]
		within: Option<String>,

		/// Attributes to read for each match
		#[arg(long = "attr", value_name = "NAME")]
		attributes: Vec<String>,
	},

	/// Click an element by id
	Click {
		element: String,
	},

	/// Read or update session settings
	Settings {
		#[command(subcommand)]
		action: SettingsAction,
	},

	/// Run a driver-side script such as "mobile: findElementNameContains"
	Execute {
		script: String,

		/// Script arguments as JSON values
		#[arg(long = "arg", value_name = "JSON")]
		args: Vec<String>,

		/// The script returns an element
		#[arg(long)]
		element: bool,
	},

	/// Navigate back one screen
	Back,

	/// Print the current screen hierarchy
	Source,

	/// Save a screenshot as PNG
	Screenshot {
		/// Output file
		#[arg(short, long, default_value = "screenshot.png")]
		output: PathBuf,
	},
}

#[derive(Subcommand, Debug)]
pub enum SessionAction {
	/// Create a session and remember it
	New {
		#[command(flatten)]
		platform: PlatformArgs,

		/// App name or path; names are resolved like `app-path`
		#[arg(long)]
		app: Option<String>,

		#[arg(long)]
		device_name: Option<String>,

		#[arg(long)]
		platform_version: Option<String>,

		/// Keep app state between sessions
		#[arg(long)]
		no_reset: bool,

		/// Extra capability as KEY=VALUE (VALUE parsed as JSON, else string)
		#[arg(long = "cap", value_name = "KEY=VALUE")]
		capabilities: Vec<String>,
	},
	/// Show the active session
	Show,
	/// End the active session
	Quit,
}

#[derive(Subcommand, Debug)]
pub enum SettingsAction {
	/// Print the session settings
	Get,
	/// Merge KEY=VALUE pairs into the session settings (VALUE parsed as JSON, else string)
	Set {
		#[arg(required = true, value_name = "KEY=VALUE")]
		pairs: Vec<String>,
	},
}

impl Commands {
	/// Command name used in the output envelope.
	pub fn name(&self) -> &'static str {
		match self {
			Commands::AppPath { .. } => "app-path",
			Commands::Session { action } => match action {
				SessionAction::New { .. } => "session new",
				SessionAction::Show => "session show",
				SessionAction::Quit => "session quit",
			},
			Commands::Find { .. } => "find",
			Commands::Click { .. } => "click",
			Commands::Settings { action } => match action {
				SettingsAction::Get => "settings get",
				SettingsAction::Set { .. } => "settings set",
			},
			Commands::Execute { .. } => "execute",
			Commands::Back => "back",
			Commands::Source => "source",
			Commands::Screenshot { .. } => "screenshot",
		}
	}
}
