//! [`Element`]: handle to a remote UI element.

use appdrive_protocol::{Command, ElementRef, Locator};
use appdrive_runtime::Result;
use serde_json::Value;

use crate::session::Session;

/// A remote UI element bound to its session.
#[derive(Clone)]
pub struct Element {
	reference: ElementRef,
	session: Session,
}

impl std::fmt::Debug for Element {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Element")
			.field("id", &self.reference.id())
			.field("session", &self.session.id())
			.finish()
	}
}

impl Element {
	pub(crate) fn new(reference: ElementRef, session: Session) -> Self {
		Self { reference, session }
	}

	/// Server-assigned element id.
	pub fn id(&self) -> &str {
		self.reference.id()
	}

	pub fn reference(&self) -> &ElementRef {
		&self.reference
	}

	pub fn session(&self) -> &Session {
		&self.session
	}

	/// Finds the first descendant matching `locator`.
	pub async fn find_element(&self, locator: Locator) -> Result<Element> {
		self.session.find_one(Some(self.reference.clone()), locator).await
	}

	/// Finds every descendant matching `locator`; a miss is an empty list.
	pub async fn find_elements(&self, locator: Locator) -> Result<Vec<Element>> {
		self.session.find_all(Some(self.reference.clone()), locator).await
	}

	/// Returns an attribute value, `None` when the server reports `null`.
	///
	/// Non-string values (booleans, numbers) are returned in their JSON form.
	pub async fn attribute(&self, name: &str) -> Result<Option<String>> {
		let value = self
			.session
			.send_value(Command::GetAttribute {
				element: self.reference.clone(),
				name: name.to_string(),
			})
			.await?;
		Ok(match value {
			Value::Null => None,
			Value::String(s) => Some(s),
			other => Some(other.to_string()),
		})
	}

	/// Returns the visible text of the element.
	pub async fn text(&self) -> Result<String> {
		let value = self
			.session
			.send_value(Command::GetText {
				element: self.reference.clone(),
			})
			.await?;
		Ok(match value {
			Value::Null => String::new(),
			Value::String(s) => s,
			other => other.to_string(),
		})
	}

	pub async fn click(&self) -> Result<()> {
		self.session
			.send_no_result(Command::Click {
				element: self.reference.clone(),
			})
			.await
	}

	pub async fn is_displayed(&self) -> Result<bool> {
		self.session
			.send(Command::IsDisplayed {
				element: self.reference.clone(),
			})
			.await
	}
}

impl PartialEq for Element {
	fn eq(&self, other: &Self) -> bool {
		self.reference == other.reference && self.session.id() == other.session.id()
	}
}
