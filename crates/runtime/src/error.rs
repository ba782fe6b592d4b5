//! Error types for the appdrive runtime.

use std::path::PathBuf;

use appdrive_protocol::Status;
use thiserror::Error;

/// Result type alias for runtime operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while talking to an automation server.
#[derive(Debug, Error)]
pub enum Error {
	/// The server rejected a command with a non-zero status.
	#[error("{message} (status: {status})")]
	Remote {
		/// Wire status code, e.g. 7 for a missing element
		status: Status,
		/// Human-readable message from the server
		message: String,
	},

	/// A sentinel application package is not installed.
	#[error("Cannot find package '{package}' (searched {} locations)", searched.len())]
	PackageNotFound {
		package: String,
		searched: Vec<PathBuf>,
	},

	/// A session-scoped command was issued without a session.
	#[error("No active session for command '{0}'")]
	NoSession(&'static str),

	/// Transport-level failure (connection refused, non-JSON body, ...).
	#[error("Transport error: {0}")]
	Transport(String),

	/// HTTP client error.
	#[error("HTTP error: {0}")]
	Http(#[from] reqwest::Error),

	/// Malformed server URL.
	#[error("Invalid server URL: {0}")]
	InvalidUrl(#[from] url::ParseError),

	/// Response did not have the expected shape.
	#[error("Protocol error: {0}")]
	Protocol(String),

	/// Invalid argument provided to method.
	#[error("Invalid argument: {0}")]
	InvalidArgument(String),

	/// A polled condition did not succeed before its deadline.
	#[error("Timeout: {0}")]
	Timeout(String),

	/// I/O error.
	#[error("I/O error: {0}")]
	Io(#[from] std::io::Error),

	/// JSON serialization/deserialization error.
	#[error("JSON error: {0}")]
	Json(#[from] serde_json::Error),
}

impl Error {
	/// Builds a remote error from a status, using the status summary as message.
	pub fn remote(status: Status) -> Self {
		Error::Remote {
			status,
			message: status.summary().to_string(),
		}
	}

	/// Returns the wire status if the server rejected the command.
	pub fn status(&self) -> Option<Status> {
		match self {
			Error::Remote { status, .. } => Some(*status),
			_ => None,
		}
	}

	/// Returns true if this is the expected "no such element" lookup miss.
	pub fn is_no_such_element(&self) -> bool {
		self.status() == Some(Status::NoSuchElement)
	}

	/// Returns true if this is a timeout, local or remote.
	pub fn is_timeout(&self) -> bool {
		match self {
			Error::Timeout(_) => true,
			Error::Remote { status, .. } => *status == Status::Timeout,
			Error::Http(err) => err.is_timeout(),
			_ => false,
		}
	}
}
