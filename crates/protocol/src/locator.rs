//! Element locators: a lookup strategy plus a selector string.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Prefix marking a tag name selector as direct-children-only.
pub const CHILD_COMBINATOR: &str = ">";

/// Strategy used by the server to resolve a selector.
///
/// Serialized as the `using` field of a find request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LocatorStrategy {
	/// Element identifier (resource id or accessibility identifier).
	#[serde(rename = "id")]
	Id,
	/// Element name / label.
	#[serde(rename = "name")]
	Name,
	/// Element type, e.g. `tableView`, `button`.
	#[serde(rename = "tag name")]
	TagName,
	/// Native class name, e.g. `UIAButton`, `android.widget.Button`.
	#[serde(rename = "class name")]
	ClassName,
	/// Accessibility identifier.
	#[serde(rename = "accessibility id")]
	AccessibilityId,
	/// XPath expression over the page source.
	#[serde(rename = "xpath")]
	XPath,
	/// iOS UIAutomation JavaScript query.
	#[serde(rename = "-ios uiautomation", alias = "-ios_uiautomation")]
	IosUiAutomation,
	/// Android UiAutomator builder query.
	#[serde(rename = "-android uiautomator", alias = "-android_uiautomator")]
	AndroidUiAutomator,
}

impl LocatorStrategy {
	/// Returns the wire name sent as `using`.
	pub fn as_str(&self) -> &'static str {
		match self {
			Self::Id => "id",
			Self::Name => "name",
			Self::TagName => "tag name",
			Self::ClassName => "class name",
			Self::AccessibilityId => "accessibility id",
			Self::XPath => "xpath",
			Self::IosUiAutomation => "-ios uiautomation",
			Self::AndroidUiAutomator => "-android uiautomator",
		}
	}
}

impl fmt::Display for LocatorStrategy {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for LocatorStrategy {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.trim().to_ascii_lowercase().replace('_', " ").as_str() {
			"id" => Ok(Self::Id),
			"name" => Ok(Self::Name),
			"tag name" | "tag" => Ok(Self::TagName),
			"class name" | "class" => Ok(Self::ClassName),
			"accessibility id" => Ok(Self::AccessibilityId),
			"xpath" => Ok(Self::XPath),
			"-ios uiautomation" => Ok(Self::IosUiAutomation),
			"-android uiautomator" => Ok(Self::AndroidUiAutomator),
			_ => Err(format!("unknown locator strategy: {s}")),
		}
	}
}

/// A locator: strategy plus selector, serialized as `{"using", "value"}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Locator {
	/// Lookup strategy.
	pub using: LocatorStrategy,
	/// Selector interpreted according to `using`.
	pub value: String,
}

impl Locator {
	pub fn new(using: LocatorStrategy, value: impl Into<String>) -> Self {
		Self {
			using,
			value: value.into(),
		}
	}

	pub fn id(value: impl Into<String>) -> Self {
		Self::new(LocatorStrategy::Id, value)
	}

	pub fn name(value: impl Into<String>) -> Self {
		Self::new(LocatorStrategy::Name, value)
	}

	pub fn tag_name(value: impl Into<String>) -> Self {
		Self::new(LocatorStrategy::TagName, value)
	}

	/// Tag name lookup restricted to the direct children of the search root.
	///
	/// Encoded as `"> <tag>"`.
	pub fn child_tag_name(value: impl AsRef<str>) -> Self {
		Self::new(
			LocatorStrategy::TagName,
			format!("{CHILD_COMBINATOR} {}", value.as_ref().trim()),
		)
	}

	pub fn class_name(value: impl Into<String>) -> Self {
		Self::new(LocatorStrategy::ClassName, value)
	}

	pub fn accessibility_id(value: impl Into<String>) -> Self {
		Self::new(LocatorStrategy::AccessibilityId, value)
	}

	pub fn xpath(value: impl Into<String>) -> Self {
		Self::new(LocatorStrategy::XPath, value)
	}

	pub fn ios_uiautomation(value: impl Into<String>) -> Self {
		Self::new(LocatorStrategy::IosUiAutomation, value)
	}

	pub fn android_uiautomator(value: impl Into<String>) -> Self {
		Self::new(LocatorStrategy::AndroidUiAutomator, value)
	}

	/// Splits a tag name selector into `(direct_children_only, tag)`.
	///
	/// Returns `None` for other strategies.
	pub fn tag_scope(&self) -> Option<(bool, &str)> {
		if self.using != LocatorStrategy::TagName {
			return None;
		}
		match self.value.trim_start().strip_prefix(CHILD_COMBINATOR) {
			Some(rest) => Some((true, rest.trim())),
			None => Some((false, self.value.trim())),
		}
	}
}

impl fmt::Display for Locator {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}={}", self.using, self.value)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn strategy_wire_names() {
		let json = serde_json::to_value(Locator::tag_name("tableView")).unwrap();
		assert_eq!(json["using"], "tag name");
		assert_eq!(json["value"], "tableView");

		let json = serde_json::to_value(Locator::ios_uiautomation(".elements()")).unwrap();
		assert_eq!(json["using"], "-ios uiautomation");
	}

	#[test]
	fn underscore_alias_is_accepted() {
		let locator: Locator =
			serde_json::from_str(r#"{"using": "-ios_uiautomation", "value": ".tableViews()[0]"}"#)
				.unwrap();
		assert_eq!(locator.using, LocatorStrategy::IosUiAutomation);

		assert_eq!(
			"-ios_uiautomation".parse::<LocatorStrategy>().unwrap(),
			LocatorStrategy::IosUiAutomation
		);
		assert_eq!("tag_name".parse::<LocatorStrategy>().unwrap(), LocatorStrategy::TagName);
		assert!("css selector".parse::<LocatorStrategy>().is_err());
	}

	#[test]
	fn child_tag_name_scope() {
		let locator = Locator::child_tag_name("textfield");
		assert_eq!(locator.value, "> textfield");
		assert_eq!(locator.tag_scope(), Some((true, "textfield")));
		assert_eq!(Locator::tag_name("text").tag_scope(), Some((false, "text")));
		assert_eq!(Locator::xpath("//button").tag_scope(), None);
	}
}
