use appdrive::{Error as DriverError, Status};
use serde_json::json;
use thiserror::Error;

use crate::output::{CommandError, ErrorCode};

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
	#[error("invalid input: {0}")]
	InvalidInput(String),

	#[error("no active session: pass --session, set APPDRIVE_SESSION, or run `appdrive session new`")]
	NoActiveSession,

	#[error(transparent)]
	Driver(#[from] DriverError),

	#[error(transparent)]
	Io(#[from] std::io::Error),

	#[error(transparent)]
	Json(#[from] serde_json::Error),

	#[error(transparent)]
	Anyhow(#[from] anyhow::Error),
}

/// Maps a wire status to the CLI error code agents branch on.
fn code_for_status(status: Status) -> ErrorCode {
	match status {
		Status::NoSuchElement => ErrorCode::ElementNotFound,
		Status::StaleElementReference => ErrorCode::StaleElement,
		Status::InvalidSelector => ErrorCode::InvalidSelector,
		Status::NoSuchDriver | Status::SessionNotCreated => ErrorCode::SessionError,
		Status::JavaScriptError => ErrorCode::ScriptFailed,
		Status::Timeout => ErrorCode::Timeout,
		_ => ErrorCode::RemoteError,
	}
}

impl CliError {
	/// Convert this error to a CommandError for structured output
	pub fn to_command_error(&self) -> CommandError {
		let (code, details) = match self {
			CliError::InvalidInput(_) => (ErrorCode::InvalidInput, None),
			CliError::NoActiveSession => (ErrorCode::SessionError, None),
			CliError::Driver(err) => match err {
				DriverError::Remote { status, .. } => (
					code_for_status(*status),
					Some(json!({ "status": status.code(), "summary": status.summary() })),
				),
				DriverError::PackageNotFound { package, searched } => (
					ErrorCode::PackageNotFound,
					Some(json!({ "package": package, "searched": searched })),
				),
				DriverError::NoSession(command) => (ErrorCode::SessionError, Some(json!({ "command": command }))),
				DriverError::Transport(_) | DriverError::Http(_) if err.is_timeout() => (ErrorCode::Timeout, None),
				DriverError::Transport(_) | DriverError::Http(_) => (ErrorCode::ConnectionFailed, None),
				DriverError::Timeout(_) => (ErrorCode::Timeout, None),
				DriverError::InvalidUrl(_) | DriverError::InvalidArgument(_) => (ErrorCode::InvalidInput, None),
				DriverError::Io(_) => (ErrorCode::IoError, None),
				DriverError::Protocol(_) | DriverError::Json(_) => (ErrorCode::InternalError, None),
			},
			CliError::Io(_) => (ErrorCode::IoError, None),
			CliError::Json(_) => (ErrorCode::InvalidInput, None),
			CliError::Anyhow(err) if err.downcast_ref::<std::io::Error>().is_some() => (ErrorCode::IoError, None),
			CliError::Anyhow(_) => (ErrorCode::InternalError, None),
		};

		CommandError {
			code,
			message: self.to_string(),
			details,
		}
	}
}
