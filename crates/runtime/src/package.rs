//! Host package resolution for applications distributed as npm packages.
//!
//! Mirrors Node's `require.resolve(name)` for a bare package name:
//! 1. `node_modules/<name>` in the base directory and each ancestor
//!    (skipping directories that are themselves `node_modules`)
//! 2. Each entry of the `NODE_PATH` environment variable
//!
//! Within a package directory the entry point is `package.json` `main`
//! (tried as-is, with `.js`, with `.json`, and as a directory with
//! `index.js`), falling back to `index.js`.

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::{Error, Result};

#[derive(Debug, Default, Deserialize)]
struct PackageManifest {
	#[serde(default)]
	main: Option<String>,
}

/// Resolves `package` starting from `base_dir`, with explicit `NODE_PATH`.
pub fn resolve_package_in(
	package: &str,
	base_dir: &Path,
	node_path: Option<OsString>,
) -> Result<PathBuf> {
	if package.is_empty() || package.starts_with('.') || Path::new(package).is_absolute() {
		return Err(Error::InvalidArgument(format!(
			"'{package}' is not a bare package name"
		)));
	}

	let roots = search_roots(base_dir, node_path);
	for root in &roots {
		if let Some(entry) = resolve_in_root(root, package) {
			debug!(target = "appdrive", package, entry = %entry.display(), "resolved package");
			return Ok(fs::canonicalize(&entry).unwrap_or(entry));
		}
	}

	Err(Error::PackageNotFound {
		package: package.to_string(),
		searched: roots,
	})
}

fn search_roots(base_dir: &Path, node_path: Option<OsString>) -> Vec<PathBuf> {
	let mut roots: Vec<PathBuf> = base_dir
		.ancestors()
		.filter(|dir| dir.file_name().is_none_or(|name| name != "node_modules"))
		.map(|dir| dir.join("node_modules"))
		.collect();

	if let Some(node_path) = node_path {
		roots.extend(std::env::split_paths(&node_path).filter(|p| !p.as_os_str().is_empty()));
	}

	roots
}

fn resolve_in_root(root: &Path, package: &str) -> Option<PathBuf> {
	let dir = root.join(package);
	if !dir.is_dir() {
		return None;
	}

	let manifest_path = dir.join("package.json");
	let manifest = match fs::read_to_string(&manifest_path) {
		Ok(raw) => serde_json::from_str::<PackageManifest>(&raw).unwrap_or_else(|err| {
			warn!(
				target = "appdrive",
				path = %manifest_path.display(),
				error = %err,
				"ignoring unparseable package.json"
			);
			PackageManifest::default()
		}),
		Err(_) => PackageManifest::default(),
	};

	let mut candidates = Vec::new();
	if let Some(main) = manifest.main.as_deref().filter(|m| !m.is_empty()) {
		let main_path = dir.join(main);
		candidates.push(main_path.clone());
		candidates.push(with_suffix(&main_path, ".js"));
		candidates.push(with_suffix(&main_path, ".json"));
		candidates.push(main_path.join("index.js"));
	}
	candidates.push(dir.join("index.js"));

	candidates.into_iter().find(|c| c.is_file())
}

fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
	let mut os = path.as_os_str().to_os_string();
	os.push(suffix);
	PathBuf::from(os)
}

#[cfg(test)]
mod tests {
	use tempfile::TempDir;

	use super::*;

	fn write(path: &Path, contents: &str) {
		fs::create_dir_all(path.parent().unwrap()).unwrap();
		fs::write(path, contents).unwrap();
	}

	#[test]
	fn resolves_main_from_ancestor_node_modules() {
		let temp = TempDir::new().unwrap();
		let pkg = temp.path().join("node_modules/android-apidemos");
		write(&pkg.join("package.json"), r#"{"main": "apks/ApiDemos-debug.apk"}"#);
		write(&pkg.join("apks/ApiDemos-debug.apk"), "apk");

		let nested = temp.path().join("test/functional/android");
		fs::create_dir_all(&nested).unwrap();

		let resolved = resolve_package_in("android-apidemos", &nested, None).unwrap();
		assert_eq!(
			resolved,
			fs::canonicalize(pkg.join("apks/ApiDemos-debug.apk")).unwrap()
		);
	}

	#[test]
	fn main_without_extension_gets_js() {
		let temp = TempDir::new().unwrap();
		let pkg = temp.path().join("node_modules/sample");
		write(&pkg.join("package.json"), r#"{"main": "lib/entry"}"#);
		write(&pkg.join("lib/entry.js"), "module.exports = 1;");

		let resolved = resolve_package_in("sample", temp.path(), None).unwrap();
		assert!(resolved.ends_with("lib/entry.js"));
	}

	#[test]
	fn falls_back_to_index_js() {
		let temp = TempDir::new().unwrap();
		let pkg = temp.path().join("node_modules/sample");
		write(&pkg.join("package.json"), "not json");
		write(&pkg.join("index.js"), "");

		let resolved = resolve_package_in("sample", temp.path(), None).unwrap();
		assert!(resolved.ends_with("index.js"));
	}

	#[test]
	fn node_path_is_searched_last() {
		let temp = TempDir::new().unwrap();
		let global = temp.path().join("global");
		write(&global.join("sample/index.js"), "");
		let project = temp.path().join("project");
		fs::create_dir_all(&project).unwrap();

		let resolved =
			resolve_package_in("sample", &project, Some(global.clone().into_os_string())).unwrap();
		assert!(resolved.starts_with(fs::canonicalize(&global).unwrap()));
	}

	#[test]
	fn missing_package_reports_search_locations() {
		let temp = TempDir::new().unwrap();
		let err = resolve_package_in("android-apidemos", temp.path(), None).unwrap_err();
		match err {
			Error::PackageNotFound { package, searched } => {
				assert_eq!(package, "android-apidemos");
				assert_eq!(searched.first(), Some(&temp.path().join("node_modules")));
			}
			other => panic!("Expected PackageNotFound, got {other:?}"),
		}
	}

	#[test]
	fn relative_names_are_rejected() {
		let temp = TempDir::new().unwrap();
		let err = resolve_package_in("./local", temp.path(), None).unwrap_err();
		assert!(matches!(err, Error::InvalidArgument(_)));
	}

	#[test]
	fn node_modules_directories_are_not_nested() {
		let roots = search_roots(Path::new("/repo/node_modules/pkg"), None);
		assert!(!roots.contains(&PathBuf::from("/repo/node_modules/node_modules")));
		assert!(roots.contains(&PathBuf::from("/repo/node_modules/pkg/node_modules")));
		assert!(roots.contains(&PathBuf::from("/repo/node_modules")));
	}
}
