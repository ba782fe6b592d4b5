//! [`Session`]: one logical connection to the automation server.

use std::sync::Arc;

use appdrive_protocol::{Command, ElementRef, Locator, Settings};
use appdrive_runtime::{Connection, Error, Result};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::element::Element;

/// A driver session.
///
/// Scopes element handles and settings. Cloning shares the session.
#[derive(Clone)]
pub struct Session {
	id: Arc<str>,
	connection: Connection,
	capabilities: Arc<Value>,
}

impl std::fmt::Debug for Session {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Session").field("id", &self.id).finish_non_exhaustive()
	}
}

impl Session {
	pub(crate) fn new(id: Arc<str>, connection: Connection, capabilities: Value) -> Self {
		Self {
			id,
			connection,
			capabilities: Arc::new(capabilities),
		}
	}

	pub fn id(&self) -> &str {
		&self.id
	}

	/// Capabilities reported by the server at creation (`null` when attached).
	pub fn capabilities(&self) -> &Value {
		&self.capabilities
	}

	pub(crate) async fn send<R: DeserializeOwned>(&self, command: Command) -> Result<R> {
		self.connection.send(Some(&self.id), command).await
	}

	pub(crate) async fn send_value(&self, command: Command) -> Result<Value> {
		self.connection.send_value(Some(&self.id), command).await
	}

	pub(crate) async fn send_no_result(&self, command: Command) -> Result<()> {
		self.connection.send_no_result(Some(&self.id), command).await
	}

	pub(crate) async fn find_one(&self, root: Option<ElementRef>, locator: Locator) -> Result<Element> {
		debug!(target = "appdrive", %locator, root = root.as_ref().map(ElementRef::id), "find element");
		let reference: ElementRef = self.send(Command::FindElement { root, locator }).await?;
		Ok(Element::new(reference, self.clone()))
	}

	pub(crate) async fn find_all(&self, root: Option<ElementRef>, locator: Locator) -> Result<Vec<Element>> {
		debug!(target = "appdrive", %locator, root = root.as_ref().map(ElementRef::id), "find elements");
		let references: Vec<ElementRef> = self.send(Command::FindElements { root, locator }).await?;
		Ok(references
			.into_iter()
			.map(|reference| Element::new(reference, self.clone()))
			.collect())
	}

	/// Binds an element id obtained earlier (e.g. from another process)
	/// without contacting the server.
	pub fn element(&self, id: impl Into<String>) -> Element {
		Element::new(ElementRef::new(id), self.clone())
	}

	/// Finds the first element matching `locator`.
	///
	/// A miss is `Error::Remote` with status 7; see [`Error::is_no_such_element`].
	pub async fn find_element(&self, locator: Locator) -> Result<Element> {
		self.find_one(None, locator).await
	}

	/// Finds every element matching `locator`; a miss is an empty list.
	pub async fn find_elements(&self, locator: Locator) -> Result<Vec<Element>> {
		self.find_all(None, locator).await
	}

	/// Returns whether `locator` matches anything, mapping status 7 to `false`.
	pub async fn exists(&self, locator: Locator) -> Result<bool> {
		match self.find_element(locator).await {
			Ok(_) => Ok(true),
			Err(err) if err.is_no_such_element() => Ok(false),
			Err(err) => Err(err),
		}
	}

	/// Executes a driver-side script and returns its raw result.
	pub async fn execute(&self, script: &str, args: Vec<Value>) -> Result<Value> {
		self.send_value(Command::Execute {
			script: script.to_string(),
			args,
		})
		.await
	}

	/// Executes a script that returns an element, such as
	/// `mobile: findElementNameContains`.
	pub async fn execute_element(&self, script: &str, args: Vec<Value>) -> Result<Element> {
		let value = self.execute(script, args).await?;
		let reference = ElementRef::from_value(&value).ok_or_else(|| {
			Error::Protocol(format!("script '{script}' did not return an element: {value}"))
		})?;
		Ok(Element::new(reference, self.clone()))
	}

	/// Returns the session settings; never absent, possibly empty.
	pub async fn settings(&self) -> Result<Settings> {
		let value = self.send_value(Command::GetSettings).await?;
		settings_from_value(value)
	}

	/// Merges `partial` into the session settings and returns the updated view.
	///
	/// Servers that answer the update with `null` get a follow-up read.
	pub async fn update_settings(&self, partial: Settings) -> Result<Settings> {
		match self.send_value(Command::UpdateSettings(partial)).await? {
			Value::Object(updated) => Ok(updated),
			Value::Null => self.settings().await,
			other => Err(Error::Protocol(format!(
				"unexpected settings update response: {other}"
			))),
		}
	}

	/// Navigates back one screen.
	pub async fn back(&self) -> Result<()> {
		self.send_no_result(Command::Back).await
	}

	/// Returns the current screen hierarchy as reported by the server.
	pub async fn source(&self) -> Result<String> {
		match self.send_value(Command::Source).await? {
			Value::String(source) => Ok(source),
			other => Ok(other.to_string()),
		}
	}

	/// Captures a screenshot and returns the decoded PNG bytes.
	pub async fn screenshot(&self) -> Result<Vec<u8>> {
		let encoded: String = self.send(Command::Screenshot).await?;
		let compact: String = encoded.chars().filter(|c| !c.is_whitespace()).collect();
		STANDARD
			.decode(compact)
			.map_err(|err| Error::Protocol(format!("screenshot is not valid base64: {err}")))
	}

	/// Ends the session on the server.
	pub async fn quit(self) -> Result<()> {
		self.send_no_result(Command::DeleteSession).await
	}
}

fn settings_from_value(value: Value) -> Result<Settings> {
	match value {
		Value::Object(settings) => Ok(settings),
		Value::Null => Ok(Settings::new()),
		other => Err(Error::Protocol(format!("settings must be an object, got {other}"))),
	}
}
