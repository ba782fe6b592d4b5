//! Application path resolution for the app under test.
//!
//! A logical application name plus a [`Platform`] resolves to the locator the
//! server should install: a sample-app build output, an installed npm
//! package, or the name itself.

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use appdrive_protocol::Capabilities;
use appdrive_runtime::{Result, resolve_package_in};

/// Root directory of the bundled sample applications.
pub const DEFAULT_APPS_ROOT: &str = "sample-code/apps";

/// Sentinel app resolved through the host package system.
pub const API_DEMOS_APP: &str = "ApiDemos";

/// npm package distributing [`API_DEMOS_APP`].
pub const API_DEMOS_PACKAGE: &str = "android-apidemos";

/// Target platform family of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Platform {
	/// iOS simulator builds.
	Ios,
	/// Android with the default automation backend.
	Android,
	/// Android through an Android-compatible backend (Selendroid).
	AndroidCompatible,
	/// No recognized platform: app names pass through unchanged.
	#[default]
	Other,
}

impl Platform {
	/// Picks a platform from independent flags, first match wins.
	///
	/// Priority: iOS, then Android, then Android-compatible, then Other.
	pub fn from_flags(ios: bool, android: bool, android_compatible: bool) -> Self {
		if ios {
			Self::Ios
		} else if android {
			Self::Android
		} else if android_compatible {
			Self::AndroidCompatible
		} else {
			Self::Other
		}
	}

	/// Reads the `IOS`, `ANDROID` and `SELENDROID` process flags.
	///
	/// A flag counts as set when present and not falsey (`""`, `0`, `false`,
	/// `no`, `off`).
	pub fn from_env() -> Self {
		Self::from_flags(env_flag("IOS"), env_flag("ANDROID"), env_flag("SELENDROID"))
	}

	pub fn as_str(&self) -> &'static str {
		match self {
			Self::Ios => "ios",
			Self::Android => "android",
			Self::AndroidCompatible => "selendroid",
			Self::Other => "other",
		}
	}

	/// `platformName` capability for this platform.
	pub fn platform_name(&self) -> Option<&'static str> {
		match self {
			Self::Ios => Some("iOS"),
			Self::Android | Self::AndroidCompatible => Some("Android"),
			Self::Other => None,
		}
	}

	/// `automationName` capability, only set for the Android-compatible backend.
	pub fn automation_name(&self) -> Option<&'static str> {
		match self {
			Self::AndroidCompatible => Some("selendroid"),
			_ => None,
		}
	}

	/// Base capabilities carrying this platform's `platformName` and
	/// `automationName`.
	pub fn capabilities(&self) -> Capabilities {
		let mut caps = Capabilities::new();
		if let Some(name) = self.platform_name() {
			caps = caps.platform_name(name);
		}
		if let Some(name) = self.automation_name() {
			caps = caps.automation_name(name);
		}
		caps
	}
}

impl fmt::Display for Platform {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for Platform {
	type Err = String;

	fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
		match s.trim().to_ascii_lowercase().as_str() {
			"ios" => Ok(Self::Ios),
			"android" => Ok(Self::Android),
			"selendroid" | "android-compatible" => Ok(Self::AndroidCompatible),
			"other" | "none" => Ok(Self::Other),
			_ => Err(format!("unknown platform: {s}")),
		}
	}
}

fn env_flag(name: &str) -> bool {
	std::env::var(name).is_ok_and(|value| !is_falsey(&value))
}

fn is_falsey(value: &str) -> bool {
	matches!(
		value.trim().to_ascii_lowercase().as_str(),
		"" | "0" | "false" | "no" | "off"
	)
}

/// Resolves logical application names to locators.
///
/// Resolution is a pure function of the name, the platform and this
/// resolver's configuration, except for sentinel apps which consult the
/// installed packages.
#[derive(Debug, Clone)]
pub struct AppPathResolver {
	apps_root: String,
	sentinels: BTreeMap<String, String>,
	base_dir: Option<PathBuf>,
}

impl Default for AppPathResolver {
	fn default() -> Self {
		Self::new()
	}
}

impl AppPathResolver {
	/// Creates a resolver rooted at [`DEFAULT_APPS_ROOT`] with the
	/// [`API_DEMOS_APP`] sentinel registered.
	pub fn new() -> Self {
		let mut sentinels = BTreeMap::new();
		sentinels.insert(API_DEMOS_APP.to_string(), API_DEMOS_PACKAGE.to_string());
		Self {
			apps_root: DEFAULT_APPS_ROOT.to_string(),
			sentinels,
			base_dir: None,
		}
	}

	pub fn with_apps_root(mut self, root: impl Into<String>) -> Self {
		let root = root.into();
		self.apps_root = root.trim_end_matches('/').to_string();
		self
	}

	/// Registers `app` as a sentinel resolved through `package`.
	pub fn with_sentinel(mut self, app: impl Into<String>, package: impl Into<String>) -> Self {
		self.sentinels.insert(app.into(), package.into());
		self
	}

	/// Directory package resolution starts from (defaults to the working directory).
	pub fn with_base_dir(mut self, dir: impl Into<PathBuf>) -> Self {
		self.base_dir = Some(dir.into());
		self
	}

	pub fn apps_root(&self) -> &str {
		&self.apps_root
	}

	/// Returns the package backing `app` if it is a sentinel.
	pub fn sentinel_package(&self, app: &str) -> Option<&str> {
		self.sentinels.get(app).map(String::as_str)
	}

	/// Resolves `app` for `platform`.
	///
	/// # Errors
	///
	/// Only sentinel apps can fail, with
	/// [`Error::PackageNotFound`](appdrive_runtime::Error::PackageNotFound) when
	/// the package is not installed.
	pub fn resolve(&self, app: &str, platform: Platform) -> Result<String> {
		if let Some(package) = self.sentinel_package(app) {
			let base_dir = match &self.base_dir {
				Some(dir) => dir.clone(),
				None => std::env::current_dir()?,
			};
			let path = resolve_package_in(package, &base_dir, std::env::var_os("NODE_PATH"))?;
			return Ok(path.to_string_lossy().into_owned());
		}

		Ok(match platform {
			Platform::Ios => format!(
				"{}/{app}/build/Release-iphonesimulator/{app}.app",
				self.apps_root
			),
			Platform::Android | Platform::AndroidCompatible => {
				format!("{}/{app}/bin/{app}-debug.apk", self.apps_root)
			}
			Platform::Other => app.to_string(),
		})
	}
}

/// Resolves `app` for `platform` with the default resolver.
pub fn resolve_app_path(app: &str, platform: Platform) -> Result<String> {
	AppPathResolver::new().resolve(app, platform)
}
