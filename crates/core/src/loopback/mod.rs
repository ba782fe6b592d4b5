//! In-process automation server.
//!
//! [`LoopbackDriver`] implements [`Transport`] over an in-memory set of
//! screens, answering commands with the same status codes an HTTP server
//! would. Useful for exercising client code without a device.
//!
//! Each session keeps a navigation stack of screen names, its own
//! [`SettingsStore`], and a table of element handles for the current
//! screen. Finding the same node again returns the same handle; navigating
//! drops the table, and ids handed out before then answer status 10.

mod tree;

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use appdrive_protocol::{Capabilities, Command, ElementRef, Locator, LocatorStrategy, Settings, Status, WireResponse};
use appdrive_runtime::{Error, Result, Transport};
use async_trait::async_trait;
use dashmap::DashMap;
use serde::Serialize;
use serde_json::{Value, json};
use tracing::debug;

pub use self::tree::UiNode;
use crate::driver::Driver;
use crate::settings::SettingsStore;

/// Name of the screen every new session starts on.
pub const MAIN_SCREEN: &str = "main";

/// Script that finds the first element whose name contains `args[0].name`.
pub const FIND_NAME_CONTAINS_SCRIPT: &str = "mobile: findElementNameContains";

type Outcome = std::result::Result<Value, (Status, String)>;

struct SessionState {
	settings: SettingsStore,
	stack: Vec<String>,
	/// Live handles on the current screen, keyed by element id.
	handles: HashMap<u64, Vec<usize>>,
	/// Next element id; never reset, so ids below it that are not live are stale.
	next_handle: u64,
}

impl SessionState {
	fn new(settings: SettingsStore) -> Self {
		Self {
			settings,
			stack: vec![MAIN_SCREEN.to_string()],
			handles: HashMap::new(),
			next_handle: 0,
		}
	}

	fn current_screen(&self) -> &str {
		self.stack.last().map(String::as_str).unwrap_or(MAIN_SCREEN)
	}

	fn register(&mut self, path: Vec<usize>) -> ElementRef {
		let existing = self
			.handles
			.iter()
			.find_map(|(id, known)| (*known == path).then_some(*id));
		let id = match existing {
			Some(id) => id,
			None => {
				let id = self.next_handle;
				self.next_handle += 1;
				self.handles.insert(id, path);
				id
			}
		};
		ElementRef::new(id.to_string())
	}

	fn resolve(&self, element: &ElementRef) -> std::result::Result<&[usize], (Status, String)> {
		let id = element
			.id()
			.parse::<u64>()
			.map_err(|_| (Status::NoSuchElement, format!("unknown element '{}'", element.id())))?;
		match self.handles.get(&id) {
			Some(path) => Ok(path.as_slice()),
			None if id < self.next_handle => Err((
				Status::StaleElementReference,
				format!("element '{}' is no longer attached to the screen", element.id()),
			)),
			None => Err((Status::NoSuchElement, format!("unknown element '{}'", element.id()))),
		}
	}

	fn navigate(&mut self, screen: String) {
		self.stack.push(screen);
		self.handles.clear();
	}

	fn back(&mut self) {
		if self.stack.len() > 1 {
			self.stack.pop();
			self.handles.clear();
		}
	}
}

fn encode<T: Serialize>(value: &T) -> Outcome {
	serde_json::to_value(value).map_err(|err| (Status::UnknownError, err.to_string()))
}

/// In-memory automation server.
pub struct LoopbackDriver {
	screens: HashMap<String, UiNode>,
	default_settings: Settings,
	sessions: DashMap<String, SessionState>,
	next_session: AtomicU64,
}

impl LoopbackDriver {
	/// Creates a server whose [`MAIN_SCREEN`] is `main`.
	pub fn new(main: UiNode) -> Self {
		let mut screens = HashMap::new();
		screens.insert(MAIN_SCREEN.to_string(), main);
		Self {
			screens,
			default_settings: Settings::new(),
			sessions: DashMap::new(),
			next_session: AtomicU64::new(1),
		}
	}

	/// Adds a screen reachable through [`UiNode::navigates_to`].
	pub fn with_screen(mut self, name: impl Into<String>, root: UiNode) -> Self {
		self.screens.insert(name.into(), root);
		self
	}

	/// Settings every new session starts with.
	pub fn with_default_settings(mut self, settings: Settings) -> Self {
		self.default_settings = settings;
		self
	}

	/// Number of live sessions.
	pub fn session_count(&self) -> usize {
		self.sessions.len()
	}

	/// Wraps the server in a [`Driver`].
	pub fn into_driver(self) -> Driver {
		Driver::new(Arc::new(self))
	}

	fn create_session(&self, capabilities: Capabilities) -> WireResponse {
		let capabilities = match encode(&capabilities) {
			Ok(capabilities) => capabilities,
			Err((status, message)) => return WireResponse::failure(None, status, message),
		};
		let id = format!("loopback-{}", self.next_session.fetch_add(1, Ordering::Relaxed));
		let settings = SettingsStore::with_defaults(self.default_settings.clone());
		self.sessions.insert(id.clone(), SessionState::new(settings));
		debug!(target = "appdrive.loopback", session = %id, "session created");
		WireResponse::success(Some(&id), capabilities)
	}

	fn screen(&self, state: &SessionState) -> std::result::Result<&UiNode, (Status, String)> {
		let name = state.current_screen();
		self.screens
			.get(name)
			.ok_or_else(|| (Status::UnknownError, format!("screen '{name}' is not defined")))
	}

	fn node<'a>(&'a self, state: &SessionState, element: &ElementRef) -> std::result::Result<&'a UiNode, (Status, String)> {
		let path = state.resolve(element)?;
		self.screen(state)?.node_at(path).ok_or_else(|| {
			(
				Status::StaleElementReference,
				format!("element '{}' is no longer attached to the screen", element.id()),
			)
		})
	}

	fn find(&self, state: &SessionState, root: Option<&ElementRef>, locator: &Locator) -> std::result::Result<Vec<Vec<usize>>, (Status, String)> {
		let screen = self.screen(state)?;
		let base = match root {
			Some(element) => state.resolve(element)?.to_vec(),
			None => Vec::new(),
		};
		if screen.node_at(&base).is_none() {
			return Err((Status::StaleElementReference, "search root is no longer attached".into()));
		}

		let value = locator.value.as_str();
		let found = match locator.using {
			LocatorStrategy::Id => screen.search(&base, false, &|n: &UiNode| n.id.as_deref() == Some(value)),
			LocatorStrategy::Name => screen.search(&base, false, &|n: &UiNode| n.name.as_deref() == Some(value)),
			LocatorStrategy::AccessibilityId => screen.search(&base, false, &|n: &UiNode| {
				n.id.as_deref() == Some(value) || n.name.as_deref() == Some(value)
			}),
			LocatorStrategy::ClassName => {
				screen.search(&base, false, &|n: &UiNode| n.class_name.as_deref() == Some(value))
			}
			LocatorStrategy::TagName => {
				let (direct_only, tag) = locator.tag_scope().unwrap_or((false, value));
				screen.search(&base, direct_only, &|n: &UiNode| n.tag.eq_ignore_ascii_case(tag))
			}
			LocatorStrategy::XPath | LocatorStrategy::IosUiAutomation | LocatorStrategy::AndroidUiAutomator => {
				return Err((
					Status::InvalidSelector,
					format!("strategy '{}' is not supported by the loopback driver", locator.using),
				));
			}
		};
		Ok(found)
	}

	fn handle(&self, session_id: &str, command: Command) -> Outcome {
		let mut state = self
			.sessions
			.get_mut(session_id)
			.ok_or_else(|| (Status::NoSuchDriver, format!("session '{session_id}' does not exist")))?;

		match command {
			Command::NewSession(_) => Err((Status::UnknownCommand, "session already exists".into())),
			Command::DeleteSession => {
				drop(state);
				self.sessions.remove(session_id);
				debug!(target = "appdrive.loopback", session = %session_id, "session deleted");
				Ok(Value::Null)
			}
			Command::FindElement { root, locator } => {
				let path = self
					.find(&state, root.as_ref(), &locator)?
					.into_iter()
					.next()
					.ok_or_else(|| (Status::NoSuchElement, format!("no element matches {locator}")))?;
				Ok(json!(state.register(path)))
			}
			Command::FindElements { root, locator } => {
				let paths = self.find(&state, root.as_ref(), &locator)?;
				let references: Vec<ElementRef> = paths.into_iter().map(|path| state.register(path)).collect();
				Ok(json!(references))
			}
			Command::GetAttribute { element, name } => {
				let node = self.node(&state, &element)?;
				Ok(node.attribute(&name).map_or(Value::Null, Value::String))
			}
			Command::GetText { element } => Ok(Value::String(self.node(&state, &element)?.text().to_string())),
			Command::IsDisplayed { element } => Ok(Value::Bool(self.node(&state, &element)?.visible)),
			Command::Click { element } => {
				let node = self.node(&state, &element)?;
				if !node.visible {
					return Err((Status::ElementNotVisible, format!("element '{}' is not visible", element.id())));
				}
				let target = node.navigates_to.clone().filter(|screen| self.screens.contains_key(screen));
				if let Some(screen) = target {
					debug!(target = "appdrive.loopback", session = %session_id, %screen, "navigate");
					state.navigate(screen);
				}
				Ok(Value::Null)
			}
			Command::Execute { script, args } => match script.trim() {
				FIND_NAME_CONTAINS_SCRIPT => {
					let needle = args
						.first()
						.and_then(|arg| arg.get("name"))
						.and_then(Value::as_str)
						.ok_or_else(|| (Status::UnknownError, format!("{FIND_NAME_CONTAINS_SCRIPT} requires a 'name' argument")))?
						.to_string();
					let path = self
						.screen(&state)?
						.search(&[], false, &|n: &UiNode| n.name.as_deref().is_some_and(|name| name.contains(&needle)))
						.into_iter()
						.next()
						.ok_or_else(|| (Status::NoSuchElement, format!("no element name contains '{needle}'")))?;
					Ok(json!(state.register(path)))
				}
				other => Err((Status::JavaScriptError, format!("unsupported script '{other}'"))),
			},
			Command::GetSettings => Ok(Value::Object(state.settings.get())),
			Command::UpdateSettings(partial) => {
				state.settings.update(partial);
				Ok(Value::Null)
			}
			Command::Back => {
				state.back();
				Ok(Value::Null)
			}
			Command::Source => {
				let screen = self.screen(&state)?;
				serde_json::to_string_pretty(screen)
					.map(Value::String)
					.map_err(|err| (Status::UnknownError, err.to_string()))
			}
			Command::Screenshot => Err((
				Status::UnknownCommand,
				"screenshots are not available from the loopback driver".into(),
			)),
		}
	}
}

#[async_trait]
impl Transport for LoopbackDriver {
	async fn execute(&self, session_id: Option<&str>, command: Command) -> Result<WireResponse> {
		match command {
			Command::NewSession(capabilities) => Ok(self.create_session(capabilities)),
			command => {
				let session_id = session_id.ok_or(Error::NoSession(command.name()))?;
				Ok(match self.handle(session_id, command) {
					Ok(value) => WireResponse::success(Some(session_id), value),
					Err((status, message)) => WireResponse::failure(Some(session_id), status, message),
				})
			}
		}
	}
}
