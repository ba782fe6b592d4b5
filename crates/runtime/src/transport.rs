//! Transport seam between the connection and a server.
//!
//! A [`Transport`] executes one typed [`Command`] and returns the raw
//! response envelope. Status checking happens one layer up in
//! [`Connection`](crate::Connection), so every transport reports failures the
//! same way: HTTP servers in the body, in-process drivers directly.

use std::time::Duration;

use appdrive_protocol::{Command, HttpMethod, WireResponse};
use async_trait::async_trait;
use tracing::trace;
use url::Url;

use crate::error::{Error, Result};

/// Default Appium-style server endpoint.
pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:4723/wd/hub";

/// Executes driver commands.
#[async_trait]
pub trait Transport: Send + Sync {
	/// Executes `command` on behalf of `session_id` and returns the envelope.
	async fn execute(&self, session_id: Option<&str>, command: Command) -> Result<WireResponse>;
}

/// JSON wire protocol over HTTP.
#[derive(Debug, Clone)]
pub struct HttpTransport {
	client: reqwest::Client,
	base: Url,
}

impl HttpTransport {
	/// Creates a transport for `base_url` (e.g. `http://127.0.0.1:4723/wd/hub`).
	pub fn new(base_url: &str) -> Result<Self> {
		Self::with_timeout(base_url, None)
	}

	/// Creates a transport with a per-request timeout.
	pub fn with_timeout(base_url: &str, timeout: Option<Duration>) -> Result<Self> {
		let mut builder = reqwest::Client::builder();
		if let Some(timeout) = timeout {
			builder = builder.timeout(timeout);
		}
		Ok(Self {
			client: builder.build()?,
			base: parse_base_url(base_url)?,
		})
	}

	pub fn base_url(&self) -> &Url {
		&self.base
	}

	fn url_for(&self, path: &str) -> Result<Url> {
		// Join relative to the base so a `/wd/hub` prefix is preserved.
		let relative = path.trim_start_matches('/');
		if relative.split('/').any(is_dot_segment) {
			return Err(Error::InvalidArgument(format!("'{path}' contains a '.' or '..' path segment")));
		}
		Ok(self.base.join(relative)?)
	}
}

/// Segments URL parsing would resolve away, including percent-encoded dots.
fn is_dot_segment(segment: &str) -> bool {
	let decoded = segment.to_ascii_lowercase().replace("%2e", ".");
	decoded == "." || decoded == ".."
}

fn parse_base_url(base_url: &str) -> Result<Url> {
	let mut url = Url::parse(base_url)?;
	if !url.path().ends_with('/') {
		let path = format!("{}/", url.path());
		url.set_path(&path);
	}
	Ok(url)
}

#[async_trait]
impl Transport for HttpTransport {
	async fn execute(&self, session_id: Option<&str>, command: Command) -> Result<WireResponse> {
		let endpoint = command
			.endpoint(session_id)
			.ok_or(Error::NoSession(command.name()))?;
		let url = self.url_for(&endpoint.path)?;

		trace!(target = "appdrive", method = endpoint.method.as_str(), %url, "http request");

		let request = match endpoint.method {
			HttpMethod::Get => self.client.get(url),
			HttpMethod::Post => self.client.post(url),
			HttpMethod::Delete => self.client.delete(url),
		};
		let request = match endpoint.body {
			Some(body) => request.json(&body),
			None => request,
		};

		let response = request.send().await?;
		let http_status = response.status();
		let body = response.text().await?;

		if body.trim().is_empty() {
			if http_status.is_success() {
				return Ok(WireResponse::success(session_id, serde_json::Value::Null));
			}
			return Err(Error::Transport(format!("HTTP {http_status} with empty body")));
		}

		serde_json::from_str::<WireResponse>(&body).map_err(|_| {
			Error::Transport(format!("HTTP {http_status}: unexpected body: {}", truncate(&body, 200)))
		})
	}
}

fn truncate(s: &str, max: usize) -> &str {
	match s.char_indices().nth(max) {
		Some((idx, _)) => &s[..idx],
		None => s,
	}
}
