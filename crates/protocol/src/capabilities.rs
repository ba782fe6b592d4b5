//! Desired capabilities sent when creating a session.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Desired capabilities for a new session.
///
/// Common fields are typed; anything else goes through [`Capabilities::set`]
/// and is flattened into the same JSON object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Capabilities {
	/// Application under test: path, package URL, or bundle id.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub app: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub platform_name: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub platform_version: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub device_name: Option<String>,
	/// Automation backend, e.g. `selendroid` for the Android-compatible backend.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub automation_name: Option<String>,
	/// Keep application state between sessions.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub no_reset: Option<bool>,
	#[serde(flatten)]
	pub extra: Map<String, Value>,
}

impl Capabilities {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn app(mut self, app: impl Into<String>) -> Self {
		self.app = Some(app.into());
		self
	}

	pub fn platform_name(mut self, name: impl Into<String>) -> Self {
		self.platform_name = Some(name.into());
		self
	}

	pub fn platform_version(mut self, version: impl Into<String>) -> Self {
		self.platform_version = Some(version.into());
		self
	}

	pub fn device_name(mut self, name: impl Into<String>) -> Self {
		self.device_name = Some(name.into());
		self
	}

	pub fn automation_name(mut self, name: impl Into<String>) -> Self {
		self.automation_name = Some(name.into());
		self
	}

	pub fn no_reset(mut self, no_reset: bool) -> Self {
		self.no_reset = Some(no_reset);
		self
	}

	/// Sets an arbitrary capability.
	pub fn set(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
		self.extra.insert(key.into(), value.into());
		self
	}
}
