//! appdrive - async client for remote mobile UI automation servers
//!
//! Talks the JSON wire protocol spoken by Appium-style servers: create a
//! session, locate elements, read and update session settings, run
//! driver-side scripts.
//!
//! # Example
//!
//! ```ignore
//! use appdrive::{Driver, Locator, Platform, resolve_app_path};
//!
//! let app = resolve_app_path("UICatalog", Platform::Ios)?;
//! let driver = Driver::connect("http://127.0.0.1:4723/wd/hub")?;
//! let session = driver.new_session(Platform::Ios.capabilities().app(app)).await?;
//!
//! let buttons = session.find_element(Locator::name("Buttons, Various uses of UIButton")).await?;
//! buttons.click().await?;
//! session.quit().await?;
//! ```
//!
//! For tests without a device, [`LoopbackDriver`] serves an in-memory
//! screen tree through the same [`Transport`] seam.

pub mod app;
mod driver;
mod element;
pub mod loopback;
mod session;
pub mod settings;
pub mod wait;

pub use app::{API_DEMOS_APP, API_DEMOS_PACKAGE, AppPathResolver, DEFAULT_APPS_ROOT, Platform, resolve_app_path};
pub use appdrive_protocol::{Capabilities, ElementRef, Locator, LocatorStrategy, Status};
pub use appdrive_runtime::{DEFAULT_SERVER_URL, Error, Result, Transport};
pub use driver::Driver;
pub use element::Element;
pub use loopback::{LoopbackDriver, UiNode};
pub use session::Session;
pub use settings::{Settings, SettingsStore};
pub use wait::spin_wait;
