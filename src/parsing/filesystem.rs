/* Copyright © 2024-2025 Adam Train <adam@trainrelay.net>
 *
 * This program is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * This program is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with this program. If not, see <https://www.gnu.org/licenses/>.
 */
use crate::config::settings::Settings;
use anyhow::{anyhow, Error};
use dirs::home_dir;
use std::fs;
use std::path::{Path, PathBuf};

pub struct Filesystem;

impl Filesystem {
	pub fn new() -> Self {
		Self
	}

	/// Fetches the settings from the given path, or the default path if
	/// none. A missing or malformed settings document is fatal; nothing
	/// can run without one.
	pub fn get_settings(
		&self,
		custom_settings_path: Option<&String>,
	) -> Result<Settings, Error> {
		let settings_path = match &custom_settings_path {
			None => {
				let home_dir = home_dir().unwrap_or_else(|| {
					panic!("Unable to determine home directory")
				});
				home_dir.join(".config/quickbean/settings.toml")
			},
			Some(p) => PathBuf::from(p),
		};

		let content = fs::read_to_string(&settings_path).map_err(|e| {
			anyhow!(
				"failed to read settings at {}: {}",
				settings_path.display(),
				e
			)
		})?;

		let settings: Settings = toml::from_str(&content)
			.map_err(|e| anyhow!("failed to parse settings: {}", e))?;

		Ok(settings)
	}

	/// Reads the ledger fully into memory. A directory resolves to the
	/// concatenation of its files carrying the given extension, in sorted
	/// filename order.
	pub fn read_ledger(
		&self,
		path: &str,
		extension: &str,
	) -> Result<String, Error> {
		let path = Path::new(path);
		if !path.is_dir() {
			return fs::read_to_string(path).map_err(|e| {
				anyhow!("failed to read ledger at {}: {}", path.display(), e)
			});
		}

		let mut files: Vec<PathBuf> = fs::read_dir(path)?
			.filter_map(|entry| entry.ok())
			.map(|entry| entry.path())
			.filter(|p| p.extension().is_some_and(|e| e == extension))
			.collect();
		files.sort();

		let mut combined = String::new();
		for file in files {
			combined.push_str(&fs::read_to_string(&file)?);
			combined.push('\n');
		}

		Ok(combined)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_read_ledger_single_file() {
		let fs = Filesystem::new();
		let text = fs
			.read_ledger("tests/test_data/ledgerdir/a.beancount", "beancount")
			.unwrap();
		assert!(text.contains("Assets:Cash"));
	}

	#[test]
	fn test_read_ledger_directory_filters_and_sorts() {
		let fs = Filesystem::new();
		let text = fs
			.read_ledger("tests/test_data/ledgerdir", "beancount")
			.unwrap();

		// both ledger files present, in filename order
		let a = text.find("Assets:Cash").unwrap();
		let b = text.find("Expenses:Food").unwrap();
		assert!(a < b);

		// the stray text file is skipped
		assert!(!text.contains("not a ledger"));
	}

	#[test]
	fn test_read_ledger_missing_file_is_fatal() {
		let fs = Filesystem::new();
		assert!(fs.read_ledger("no/such/file.beancount", "beancount").is_err());
	}
}
