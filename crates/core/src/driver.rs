//! [`Driver`]: entry point that creates and attaches sessions.

use std::sync::Arc;
use std::time::Duration;

use appdrive_protocol::{Capabilities, Command};
use appdrive_runtime::{Connection, Error, HttpTransport, Result, Transport};
use serde_json::Value;
use tracing::info;

use crate::session::Session;

/// Client for one automation server.
///
/// Cheap to clone; every clone shares the same transport.
#[derive(Clone)]
pub struct Driver {
	connection: Connection,
}

impl Driver {
	/// Wraps an arbitrary transport, e.g. a [`LoopbackDriver`](crate::LoopbackDriver).
	pub fn new(transport: Arc<dyn Transport>) -> Self {
		Self {
			connection: Connection::new(transport),
		}
	}

	/// Connects to an HTTP server such as `http://127.0.0.1:4723/wd/hub`.
	pub fn connect(url: &str) -> Result<Self> {
		Self::connect_with_timeout(url, None)
	}

	/// Connects with a per-request timeout.
	pub fn connect_with_timeout(url: &str, timeout: Option<Duration>) -> Result<Self> {
		let transport = HttpTransport::with_timeout(url, timeout)?;
		Ok(Self::new(Arc::new(transport)))
	}

	/// Creates a new session with `capabilities`.
	///
	/// Accepts both the legacy envelope (`sessionId` at top level) and the
	/// W3C shape (`value.sessionId` plus `value.capabilities`).
	pub async fn new_session(&self, capabilities: Capabilities) -> Result<Session> {
		let response = self
			.connection
			.send_raw(None, Command::NewSession(capabilities))
			.await?;

		let value = response.value;
		let id = response
			.session_id
			.or_else(|| value.get("sessionId").and_then(Value::as_str).map(str::to_string))
			.ok_or_else(|| Error::Protocol("new session response has no sessionId".into()))?;
		let capabilities = value.get("capabilities").cloned().unwrap_or(value);

		info!(target = "appdrive", session = %id, "session created");
		Ok(Session::new(Arc::from(id), self.connection.clone(), capabilities))
	}

	/// Attaches to an existing session by id without contacting the server.
	pub fn attach(&self, session_id: &str) -> Session {
		Session::new(Arc::from(session_id), self.connection.clone(), Value::Null)
	}
}
