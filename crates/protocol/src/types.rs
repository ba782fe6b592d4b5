//! Core protocol types used across the wire.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

/// W3C WebDriver element identifier key.
pub const W3C_ELEMENT_KEY: &str = "element-6066-11e4-a52e-4f735466cecf";

/// Legacy JSON wire protocol element identifier key.
pub const LEGACY_ELEMENT_KEY: &str = "ELEMENT";

/// Session settings: arbitrary JSON values keyed by name.
pub type Settings = Map<String, Value>;

/// Opaque reference to a remote UI element.
///
/// Deserializes from either `{"ELEMENT": id}` or the W3C key and serializes
/// both so that legacy and W3C servers accept it as a script argument.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ElementRef(pub String);

impl ElementRef {
	pub fn new(id: impl Into<String>) -> Self {
		Self(id.into())
	}

	pub fn id(&self) -> &str {
		&self.0
	}

	/// Extracts an element reference from an arbitrary JSON value, if it is one.
	pub fn from_value(value: &Value) -> Option<Self> {
		let obj = value.as_object()?;
		obj.get(LEGACY_ELEMENT_KEY)
			.or_else(|| obj.get(W3C_ELEMENT_KEY))
			.and_then(Value::as_str)
			.map(Self::new)
	}
}

impl fmt::Display for ElementRef {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

impl Serialize for ElementRef {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		use serde::ser::SerializeMap;

		let mut map = serializer.serialize_map(Some(2))?;
		map.serialize_entry(LEGACY_ELEMENT_KEY, &self.0)?;
		map.serialize_entry(W3C_ELEMENT_KEY, &self.0)?;
		map.end()
	}
}

impl<'de> Deserialize<'de> for ElementRef {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		let value = Value::deserialize(deserializer)?;
		Self::from_value(&value)
			.ok_or_else(|| serde::de::Error::custom(format!("not an element reference: {value}")))
	}
}

/// JSON wire protocol status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "u32", into = "u32")]
pub enum Status {
	#[default]
	Success,
	NoSuchDriver,
	NoSuchElement,
	NoSuchFrame,
	UnknownCommand,
	StaleElementReference,
	ElementNotVisible,
	InvalidElementState,
	UnknownError,
	JavaScriptError,
	Timeout,
	InvalidSelector,
	SessionNotCreated,
	Other(u32),
}

impl Status {
	pub fn code(self) -> u32 {
		match self {
			Self::Success => 0,
			Self::NoSuchDriver => 6,
			Self::NoSuchElement => 7,
			Self::NoSuchFrame => 8,
			Self::UnknownCommand => 9,
			Self::StaleElementReference => 10,
			Self::ElementNotVisible => 11,
			Self::InvalidElementState => 12,
			Self::UnknownError => 13,
			Self::JavaScriptError => 17,
			Self::Timeout => 21,
			Self::InvalidSelector => 32,
			Self::SessionNotCreated => 33,
			Self::Other(code) => code,
		}
	}

	pub fn is_success(self) -> bool {
		self == Self::Success
	}

	/// Maps a W3C error string (`value.error`) onto the legacy status.
	pub fn from_w3c_error(error: &str) -> Self {
		match error {
			"invalid session id" => Self::NoSuchDriver,
			"no such element" => Self::NoSuchElement,
			"no such frame" => Self::NoSuchFrame,
			"unknown command" | "unknown method" | "unsupported operation" => {
				Self::UnknownCommand
			}
			"stale element reference" => Self::StaleElementReference,
			"element not interactable" => Self::ElementNotVisible,
			"invalid element state" => Self::InvalidElementState,
			"javascript error" => Self::JavaScriptError,
			"timeout" | "script timeout" => Self::Timeout,
			"invalid selector" => Self::InvalidSelector,
			"session not created" => Self::SessionNotCreated,
			_ => Self::UnknownError,
		}
	}

	/// Short human-readable summary of the status.
	pub fn summary(self) -> &'static str {
		match self {
			Self::Success => "The command executed successfully.",
			Self::NoSuchDriver => "A session is either terminated or not started",
			Self::NoSuchElement => {
				"An element could not be located on the page using the given search parameters."
			}
			Self::NoSuchFrame => "A request to switch to a frame could not be satisfied.",
			Self::UnknownCommand => "The requested resource could not be found.",
			Self::StaleElementReference => {
				"An element command failed because the referenced element is no longer attached."
			}
			Self::ElementNotVisible => {
				"An element command could not be completed because the element is not visible."
			}
			Self::InvalidElementState => {
				"An element command could not be completed because the element is in an invalid state."
			}
			Self::UnknownError => "An unknown server-side error occurred while processing the command.",
			Self::JavaScriptError => "An error occurred while executing user supplied script.",
			Self::Timeout => "An operation did not complete before its timeout expired.",
			Self::InvalidSelector => "Argument was an invalid selector.",
			Self::SessionNotCreated => "A new session could not be created.",
			Self::Other(_) => "Unrecognized status.",
		}
	}
}

impl From<u32> for Status {
	fn from(code: u32) -> Self {
		match code {
			0 => Self::Success,
			6 => Self::NoSuchDriver,
			7 => Self::NoSuchElement,
			8 => Self::NoSuchFrame,
			9 => Self::UnknownCommand,
			10 => Self::StaleElementReference,
			11 => Self::ElementNotVisible,
			12 => Self::InvalidElementState,
			13 => Self::UnknownError,
			17 => Self::JavaScriptError,
			21 => Self::Timeout,
			32 => Self::InvalidSelector,
			33 => Self::SessionNotCreated,
			other => Self::Other(other),
		}
	}
}

impl From<Status> for u32 {
	fn from(status: Status) -> Self {
		status.code()
	}
}

impl fmt::Display for Status {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.code())
	}
}

/// Response envelope: `{"sessionId", "status", "value"}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireResponse {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub session_id: Option<String>,
	#[serde(default)]
	pub status: Status,
	#[serde(default)]
	pub value: Value,
}

impl WireResponse {
	pub fn success(session_id: Option<&str>, value: Value) -> Self {
		Self {
			session_id: session_id.map(str::to_string),
			status: Status::Success,
			value,
		}
	}

	pub fn failure(session_id: Option<&str>, status: Status, message: impl Into<String>) -> Self {
		Self {
			session_id: session_id.map(str::to_string),
			status,
			value: serde_json::json!({ "message": message.into() }),
		}
	}

	/// Normalizes W3C-shaped errors (`value.error`) onto a legacy status.
	///
	/// Envelopes that already carry a non-zero status are left untouched.
	pub fn effective_status(&self) -> Status {
		if !self.status.is_success() {
			return self.status;
		}
		match self.value.get("error").and_then(Value::as_str) {
			Some(error) => Status::from_w3c_error(error),
			None => Status::Success,
		}
	}

	/// Extracts the error message from `value`, falling back to the status summary.
	pub fn error_message(&self) -> String {
		match &self.value {
			Value::String(message) if !message.is_empty() => message.clone(),
			Value::Object(obj) => obj
				.get("message")
				.and_then(Value::as_str)
				.filter(|m| !m.is_empty())
				.map(str::to_string)
				.unwrap_or_else(|| self.effective_status().summary().to_string()),
			_ => self.effective_status().summary().to_string(),
		}
	}
}
