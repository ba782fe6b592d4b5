//! Persisted CLI state: the last server and session used.
//!
//! Stored as JSON at `$XDG_CONFIG_HOME/appdrive/state.json`, falling back to
//! the platform config directory.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::Result;

/// Schema version for the state file.
pub const SCHEMA_VERSION: u32 = 1;

/// State carried between invocations.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CliState {
	#[serde(default)]
	pub schema: u32,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub server: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub session_id: Option<String>,
	/// Unix epoch seconds.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub last_used_at: Option<u64>,
}

impl CliState {
	pub fn new() -> Self {
		Self {
			schema: SCHEMA_VERSION,
			..Default::default()
		}
	}

	pub fn touch(&mut self) {
		self.last_used_at = Some(
			std::time::SystemTime::now()
				.duration_since(std::time::UNIX_EPOCH)
				.unwrap_or_default()
				.as_secs(),
		);
	}
}

/// State file location plus its loaded contents.
#[derive(Debug)]
pub struct StateStore {
	path: PathBuf,
	state: CliState,
	persist: bool,
}

impl StateStore {
	/// Default state file path.
	pub fn default_path() -> PathBuf {
		let config_home = std::env::var_os("XDG_CONFIG_HOME")
			.map(PathBuf::from)
			.filter(|dir| dir.is_absolute())
			.or_else(dirs::config_dir)
			.unwrap_or_else(|| PathBuf::from("."));
		config_home.join("appdrive").join("state.json")
	}

	/// Loads state from `path`; a missing or unreadable file is empty state.
	pub fn load(path: impl Into<PathBuf>, persist: bool) -> Self {
		let path = path.into();
		let state = load_json::<CliState>(&path).unwrap_or_else(CliState::new);
		debug!(target = "appdrive.cli", path = %path.display(), ?state, "loaded state");
		Self { path, state, persist }
	}

	pub fn state(&self) -> &CliState {
		&self.state
	}

	pub fn server(&self) -> Option<&str> {
		self.state.server.as_deref()
	}

	pub fn session_id(&self) -> Option<&str> {
		self.state.session_id.as_deref()
	}

	/// Records the active server and session and writes the file.
	pub fn record_session(&mut self, server: &str, session_id: &str) -> Result<()> {
		self.state.server = Some(server.to_string());
		self.state.session_id = Some(session_id.to_string());
		self.save()
	}

	/// Forgets `session_id` if it is the recorded one.
	pub fn clear_session(&mut self, session_id: &str) -> Result<()> {
		if self.state.session_id.as_deref() == Some(session_id) {
			self.state.session_id = None;
		}
		self.save()
	}

	fn save(&mut self) -> Result<()> {
		if !self.persist {
			return Ok(());
		}
		self.state.schema = SCHEMA_VERSION;
		self.state.touch();
		save_json(&self.path, &self.state)
	}
}

fn load_json<T: serde::de::DeserializeOwned>(path: &Path) -> Option<T> {
	let content = fs::read_to_string(path).ok()?;
	match serde_json::from_str(&content) {
		Ok(value) => Some(value),
		Err(err) => {
			warn!(target = "appdrive.cli", path = %path.display(), error = %err, "ignoring unreadable state file");
			None
		}
	}
}

fn save_json<T: Serialize>(path: &Path, data: &T) -> Result<()> {
	if let Some(parent) = path.parent() {
		fs::create_dir_all(parent)?;
	}
	fs::write(path, serde_json::to_string_pretty(data)?)?;
	Ok(())
}

#[cfg(test)]
mod tests {
	use tempfile::TempDir;

	use super::*;

	#[test]
	fn default_path_ends_with_state_json() {
		assert!(StateStore::default_path().ends_with("appdrive/state.json"));
	}

	#[test]
	fn missing_file_is_empty_state() {
		let tmp = TempDir::new().unwrap();
		let store = StateStore::load(tmp.path().join("state.json"), true);
		assert_eq!(store.server(), None);
		assert_eq!(store.session_id(), None);
	}

	#[test]
	fn record_and_reload() {
		let tmp = TempDir::new().unwrap();
		let path = tmp.path().join("nested/state.json");

		let mut store = StateStore::load(&path, true);
		store.record_session("http://127.0.0.1:4723/wd/hub", "abc").unwrap();

		let reloaded = StateStore::load(&path, true);
		assert_eq!(reloaded.server(), Some("http://127.0.0.1:4723/wd/hub"));
		assert_eq!(reloaded.session_id(), Some("abc"));
		assert_eq!(reloaded.state().schema, SCHEMA_VERSION);
		assert!(reloaded.state().last_used_at.is_some());
	}

	#[test]
	fn clear_only_matching_session() {
		let tmp = TempDir::new().unwrap();
		let path = tmp.path().join("state.json");
		let mut store = StateStore::load(&path, true);
		store.record_session("http://h/wd/hub", "abc").unwrap();

		store.clear_session("other").unwrap();
		assert_eq!(StateStore::load(&path, true).session_id(), Some("abc"));

		store.clear_session("abc").unwrap();
		let reloaded = StateStore::load(&path, true);
		assert_eq!(reloaded.session_id(), None);
		assert_eq!(reloaded.server(), Some("http://h/wd/hub"));
	}

	#[test]
	fn no_persist_never_writes() {
		let tmp = TempDir::new().unwrap();
		let path = tmp.path().join("state.json");
		let mut store = StateStore::load(&path, false);
		store.record_session("http://h/wd/hub", "abc").unwrap();
		assert!(!path.exists());
		assert_eq!(store.session_id(), Some("abc"));
	}

	#[test]
	fn corrupt_file_is_ignored() {
		let tmp = TempDir::new().unwrap();
		let path = tmp.path().join("state.json");
		fs::write(&path, "{not json").unwrap();
		let store = StateStore::load(&path, true);
		assert_eq!(store.state(), &CliState::new());
	}
}
