//! Command dispatch layer on top of a [`Transport`].
//!
//! This module turns raw response envelopes into results:
//! - Numbering requests for log correlation
//! - Mapping non-zero (or W3C-shaped) statuses to [`Error::Remote`]
//! - Deserializing the `value` payload into the caller's type
//!
//! # Message Flow
//!
//! 1. Client calls [`Connection::send`] with a session id and a [`Command`]
//! 2. Connection assigns a request id and hands the command to the transport
//! 3. Transport returns the `{sessionId, status, value}` envelope
//! 4. Connection checks the status and returns `value`


use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use appdrive_protocol::{Command, WireResponse};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::error::{Error, Result};
use crate::transport::Transport;

/// Shared handle to a transport with request numbering and status mapping.
#[derive(Clone)]
pub struct Connection {
	transport: Arc<dyn Transport>,
	last_id: Arc<AtomicU32>,
}

impl Connection {
	pub fn new(transport: Arc<dyn Transport>) -> Self {
		Self {
			transport,
			last_id: Arc::new(AtomicU32::new(0)),
		}
	}

	/// Sends a command and returns the checked envelope.
	pub async fn send_raw(&self, session_id: Option<&str>, command: Command) -> Result<WireResponse> {
		let id = self.last_id.fetch_add(1, Ordering::SeqCst);
		let name = command.name();
		debug!(target = "appdrive", id, command = name, session = session_id, "-> send");

		let response = self.transport.execute(session_id, command).await?;
		let status = response.effective_status();

		if status.is_success() {
			debug!(target = "appdrive", id, command = name, "<- ok");
			return Ok(response);
		}

		let message = response.error_message();
		debug!(target = "appdrive", id, command = name, status = status.code(), %message, "<- error");
		Err(Error::Remote { status, message })
	}

	/// Sends a command and returns the `value` payload.
	pub async fn send_value(&self, session_id: Option<&str>, command: Command) -> Result<Value> {
		Ok(self.send_raw(session_id, command).await?.value)
	}

	/// Sends a command and deserializes the `value` payload.
	pub async fn send<R: DeserializeOwned>(&self, session_id: Option<&str>, command: Command) -> Result<R> {
		let value = self.send_value(session_id, command).await?;
		serde_json::from_value(value).map_err(Into::into)
	}

	/// Sends a command whose result is ignored.
	pub async fn send_no_result(&self, session_id: Option<&str>, command: Command) -> Result<()> {
		self.send_raw(session_id, command).await.map(|_| ())
	}
}
