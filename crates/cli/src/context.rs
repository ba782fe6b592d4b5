//! Per-invocation context: resolved server, session and state file.

use std::time::Duration;

use appdrive::{DEFAULT_SERVER_URL, Driver, Session};
use tracing::debug;

use crate::cli::Cli;
use crate::error::{CliError, Result};
use crate::output::OutputFormat;
use crate::state::StateStore;

/// Where a setting came from, lowest priority last.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
	Flag,
	State,
	Default,
}

impl Source {
	pub fn as_str(&self) -> &'static str {
		match self {
			Self::Flag => "flag",
			Self::State => "state",
			Self::Default => "default",
		}
	}
}

pub struct CommandContext {
	pub format: OutputFormat,
	server: String,
	server_source: Source,
	session_flag: Option<String>,
	timeout: Option<Duration>,
	store: StateStore,
}

impl CommandContext {
	pub fn new(cli: &Cli) -> Self {
		let path = cli.state_file.clone().unwrap_or_else(StateStore::default_path);
		let store = StateStore::load(path, !cli.no_save_state);

		let (server, server_source) = match (&cli.server, store.server()) {
			(Some(flag), _) => (flag.clone(), Source::Flag),
			(None, Some(saved)) => (saved.to_string(), Source::State),
			(None, None) => (DEFAULT_SERVER_URL.to_string(), Source::Default),
		};
		debug!(target = "appdrive.cli", %server, source = ?server_source, "server resolved");

		Self {
			format: cli.format,
			server,
			server_source,
			session_flag: cli.session.clone(),
			timeout: cli.timeout_ms.map(Duration::from_millis),
			store,
		}
	}

	pub fn server(&self) -> &str {
		&self.server
	}

	pub fn server_source(&self) -> Source {
		self.server_source
	}

	pub fn driver(&self) -> Result<Driver> {
		Ok(Driver::connect_with_timeout(&self.server, self.timeout)?)
	}

	/// Session id from `--session`, else the one recorded by `session new`.
	pub fn session_id(&self) -> Result<&str> {
		self.session_flag
			.as_deref()
			.or_else(|| self.store.session_id())
			.ok_or(CliError::NoActiveSession)
	}

	pub fn session(&self) -> Result<Session> {
		let id = self.session_id()?;
		Ok(self.driver()?.attach(id))
	}

	pub fn store_mut(&mut self) -> &mut StateStore {
		&mut self.store
	}
}
