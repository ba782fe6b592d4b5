//! Session-scoped settings with shallow merge semantics.

use parking_lot::RwLock;

pub use appdrive_protocol::Settings;

/// Per-session settings map.
///
/// Reads always return a mapping (empty before the first write). Updates
/// merge key-wise: keys in the update overwrite, every other key is kept.
#[derive(Debug, Default)]
pub struct SettingsStore {
	inner: RwLock<Settings>,
}

impl SettingsStore {
	pub fn new() -> Self {
		Self::default()
	}

	/// Creates a store pre-populated with server defaults.
	pub fn with_defaults(defaults: Settings) -> Self {
		Self {
			inner: RwLock::new(defaults),
		}
	}

	/// Returns a snapshot of the current settings.
	pub fn get(&self) -> Settings {
		self.inner.read().clone()
	}

	/// Merges `partial` into the store and returns the updated view.
	pub fn update(&self, partial: Settings) -> Settings {
		let mut settings = self.inner.write();
		for (key, value) in partial {
			settings.insert(key, value);
		}
		settings.clone()
	}

	pub fn len(&self) -> usize {
		self.inner.read().len()
	}

	pub fn is_empty(&self) -> bool {
		self.inner.read().is_empty()
	}
}

#[cfg(test)]
mod tests {
	use serde_json::{Value, json};

	use super::*;

	fn settings(value: Value) -> Settings {
		match value {
			Value::Object(map) => map,
			other => panic!("expected object, got {other}"),
		}
	}

	#[test]
	fn fresh_store_reads_are_stable() {
		let store = SettingsStore::new();
		let first = store.get();
		let second = store.get();
		assert!(first.is_empty());
		assert_eq!(first, second);
	}

	#[test]
	fn updates_merge() {
		let store = SettingsStore::new();
		store.update(settings(json!({"a": 1})));
		store.update(settings(json!({"b": 2})));

		let current = store.get();
		assert_eq!(current.get("a"), Some(&json!(1)));
		assert_eq!(current.get("b"), Some(&json!(2)));
		assert_eq!(store.len(), 2);
	}

	#[test]
	fn last_write_wins_and_others_are_kept() {
		let store = SettingsStore::new();
		store.update(settings(json!({"a": 1, "keep": true})));
		let view = store.update(settings(json!({"a": 2})));

		assert_eq!(view.get("a"), Some(&json!(2)));
		assert_eq!(view.get("keep"), Some(&json!(true)));
		assert_eq!(view, store.get());
	}

	#[test]
	fn nested_values_are_replaced_not_merged() {
		let store = SettingsStore::with_defaults(settings(json!({"nested": {"x": 1, "y": 2}})));
		store.update(settings(json!({"nested": {"x": 3}})));
		assert_eq!(store.get()["nested"], json!({"x": 3}));
	}

	#[test]
	fn empty_update_is_a_read() {
		let store = SettingsStore::with_defaults(settings(json!({"settlers of": "Catan"})));
		assert_eq!(store.update(Settings::new()), store.get());
		assert!(!store.is_empty());
	}
}
