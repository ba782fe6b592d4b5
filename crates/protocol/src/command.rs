//! Typed driver commands and their HTTP endpoints.

use serde_json::{Value, json};

use crate::capabilities::Capabilities;
use crate::locator::Locator;
use crate::types::{ElementRef, Settings};

/// HTTP verb of an endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
	Get,
	Post,
	Delete,
}

impl HttpMethod {
	pub fn as_str(&self) -> &'static str {
		match self {
			Self::Get => "GET",
			Self::Post => "POST",
			Self::Delete => "DELETE",
		}
	}
}

/// Resolved HTTP endpoint of a command.
#[derive(Debug, Clone, PartialEq)]
pub struct Endpoint {
	pub method: HttpMethod,
	/// Path relative to the server base URL, starting with `/`.
	pub path: String,
	pub body: Option<Value>,
}

/// A single driver command.
///
/// Every command except [`Command::NewSession`] is addressed to a session.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
	NewSession(Capabilities),
	DeleteSession,
	/// Finds the first match below `root`, or below the screen root when `None`.
	FindElement {
		root: Option<ElementRef>,
		locator: Locator,
	},
	/// Finds every match below `root`, or below the screen root when `None`.
	FindElements {
		root: Option<ElementRef>,
		locator: Locator,
	},
	GetAttribute {
		element: ElementRef,
		name: String,
	},
	GetText {
		element: ElementRef,
	},
	Click {
		element: ElementRef,
	},
	IsDisplayed {
		element: ElementRef,
	},
	/// Runs a driver-side script such as `mobile: findElementNameContains`.
	Execute {
		script: String,
		args: Vec<Value>,
	},
	GetSettings,
	UpdateSettings(Settings),
	Back,
	Source,
	Screenshot,
}

impl Command {
	/// Short name used in logs.
	pub fn name(&self) -> &'static str {
		match self {
			Self::NewSession(_) => "newSession",
			Self::DeleteSession => "deleteSession",
			Self::FindElement { .. } => "findElement",
			Self::FindElements { .. } => "findElements",
			Self::GetAttribute { .. } => "getAttribute",
			Self::GetText { .. } => "getText",
			Self::Click { .. } => "click",
			Self::IsDisplayed { .. } => "isDisplayed",
			Self::Execute { .. } => "execute",
			Self::GetSettings => "getSettings",
			Self::UpdateSettings(_) => "updateSettings",
			Self::Back => "back",
			Self::Source => "getPageSource",
			Self::Screenshot => "getScreenshot",
		}
	}

	pub fn requires_session(&self) -> bool {
		!matches!(self, Self::NewSession(_))
	}

	/// Resolves the HTTP endpoint for this command.
	///
	/// Returns `None` when the command needs a session and `session_id` is absent.
	pub fn endpoint(&self, session_id: Option<&str>) -> Option<Endpoint> {
		let session = match (self.requires_session(), session_id) {
			(true, Some(id)) => format!("/session/{}", segment(id)),
			(true, None) => return None,
			(false, _) => String::new(),
		};

		let (method, path, body) = match self {
			Self::NewSession(caps) => (
				HttpMethod::Post,
				"/session".to_string(),
				Some(json!({ "desiredCapabilities": caps })),
			),
			Self::DeleteSession => (HttpMethod::Delete, session, None),
			Self::FindElement { root, locator } => (
				HttpMethod::Post,
				format!("{session}{}/element", element_prefix(root.as_ref())),
				Some(json!(locator)),
			),
			Self::FindElements { root, locator } => (
				HttpMethod::Post,
				format!("{session}{}/elements", element_prefix(root.as_ref())),
				Some(json!(locator)),
			),
			Self::GetAttribute { element, name } => (
				HttpMethod::Get,
				format!("{session}/element/{}/attribute/{}", segment(element.id()), segment(name)),
				None,
			),
			Self::GetText { element } => {
				(HttpMethod::Get, format!("{session}/element/{}/text", segment(element.id())), None)
			}
			Self::Click { element } => (
				HttpMethod::Post,
				format!("{session}/element/{}/click", segment(element.id())),
				Some(json!({})),
			),
			Self::IsDisplayed { element } => (
				HttpMethod::Get,
				format!("{session}/element/{}/displayed", segment(element.id())),
				None,
			),
			Self::Execute { script, args } => (
				HttpMethod::Post,
				format!("{session}/execute"),
				Some(json!({ "script": script, "args": args })),
			),
			Self::GetSettings => (HttpMethod::Get, format!("{session}/appium/settings"), None),
			Self::UpdateSettings(settings) => (
				HttpMethod::Post,
				format!("{session}/appium/settings"),
				Some(json!({ "settings": settings })),
			),
			Self::Back => (HttpMethod::Post, format!("{session}/back"), Some(json!({}))),
			Self::Source => (HttpMethod::Get, format!("{session}/source"), None),
			Self::Screenshot => (HttpMethod::Get, format!("{session}/screenshot"), None),
		};

		Some(Endpoint { method, path, body })
	}
}

fn element_prefix(root: Option<&ElementRef>) -> String {
	root.map(|el| format!("/element/{}", segment(el.id()))).unwrap_or_default()
}

/// Percent-encodes a value interpolated as a single path segment.
fn segment(raw: &str) -> std::borrow::Cow<'_, str> {
	urlencoding::encode(raw)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn new_session_wraps_desired_capabilities() {
		let cmd = Command::NewSession(Capabilities::new().app("TestApp"));
		let endpoint = cmd.endpoint(None).unwrap();
		assert_eq!(endpoint.method, HttpMethod::Post);
		assert_eq!(endpoint.path, "/session");
		assert_eq!(endpoint.body.unwrap()["desiredCapabilities"]["app"], "TestApp");
	}

	#[test]
	fn session_commands_need_a_session() {
		assert!(Command::GetSettings.endpoint(None).is_none());
		let endpoint = Command::GetSettings.endpoint(Some("s1")).unwrap();
		assert_eq!(endpoint.method, HttpMethod::Get);
		assert_eq!(endpoint.path, "/session/s1/appium/settings");
	}

	#[test]
	fn scoped_find_targets_element() {
		let cmd = Command::FindElements {
			root: Some(ElementRef::new("5")),
			locator: Locator::tag_name("text"),
		};
		let endpoint = cmd.endpoint(Some("s1")).unwrap();
		assert_eq!(endpoint.path, "/session/s1/element/5/elements");
		let body = endpoint.body.unwrap();
		assert_eq!(body["using"], "tag name");
		assert_eq!(body["value"], "text");

		let cmd = Command::FindElement {
			root: None,
			locator: Locator::id("ButtonsExplain"),
		};
		assert_eq!(cmd.endpoint(Some("s1")).unwrap().path, "/session/s1/element");
	}

	#[test]
	fn dynamic_segments_are_percent_encoded() {
		let path = |name: &str| {
			Command::GetAttribute {
				element: ElementRef::new("1"),
				name: name.into(),
			}
			.endpoint(Some("s1"))
			.unwrap()
			.path
		};
		assert_eq!(path("value"), "/session/s1/element/1/attribute/value");
		assert_eq!(path("a?b"), "/session/s1/element/1/attribute/a%3Fb");
		assert_eq!(path("x#y"), "/session/s1/element/1/attribute/x%23y");
		assert_eq!(path("../../source"), "/session/s1/element/1/attribute/..%2F..%2Fsource");

		let click = Command::Click {
			element: ElementRef::new("7/click?x"),
		};
		assert_eq!(
			click.endpoint(Some("a b")).unwrap().path,
			"/session/a%20b/element/7%2Fclick%3Fx/click"
		);

		let scoped = Command::FindElement {
			root: Some(ElementRef::new("#5")),
			locator: Locator::name("Buttons"),
		};
		assert_eq!(scoped.endpoint(Some("s1")).unwrap().path, "/session/s1/element/%235/element");
	}

	#[test]
	fn update_settings_body() {
		let mut settings = Settings::new();
		settings.insert("settlers of".into(), "Catan".into());
		let endpoint = Command::UpdateSettings(settings).endpoint(Some("s1")).unwrap();
		assert_eq!(endpoint.method, HttpMethod::Post);
		assert_eq!(endpoint.body.unwrap()["settings"]["settlers of"], "Catan");
	}
}
