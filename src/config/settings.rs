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
use crate::entry::template::Template;
use anyhow::{anyhow, Error};
use regex::Regex;
use serde::Deserialize;
use std::collections::BTreeMap;

/// Typed view of the settings document. Only the ledger and cache
/// locations are required; everything else has a workable default.
#[derive(Debug, Deserialize)]
pub struct Settings {
	/// Ledger file, or a directory of ledger files sharing ledger_ext
	pub ledger_path: String,
	pub cache_path: String,

	#[serde(default = "default_ledger_ext")]
	pub ledger_ext: String,
	#[serde(default = "default_currency")]
	pub default_currency: String,
	#[serde(default = "default_clear_tag")]
	pub clear_tag: String,
	#[serde(default = "default_title_format")]
	pub title_format: String,
	#[serde(default = "default_body_format")]
	pub body_format: String,

	#[serde(default)]
	pub regexes: LedgerRegexes,

	/// Icon paths keyed by top level account category, with an optional
	/// "default" fallback
	#[serde(default)]
	pub icons: BTreeMap<String, String>,
}

impl Settings {
	/// Checks everything the deserializer cannot: template placeholders
	/// must be known, and the scan regexes must compile. Returns the
	/// compiled patterns so scanning never parses a regex twice.
	pub fn validate(&self) -> Result<LedgerPatterns, Error> {
		Template::new(&self.title_format)
			.check_keys(&["date", "payee", "tags", "comment"])?;
		Template::new(&self.body_format)
			.check_keys(&["account", "flow", "currency"])?;

		self.regexes.compile()
	}

	/// Resolves the icon for an account or payee by its top level
	/// segment, falling back to the "default" icon when the category
	/// has none configured.
	pub fn icon_for(&self, name: &str) -> Option<String> {
		let category = name.split(':').next().unwrap_or(name);
		self.icons
			.get(category)
			.or_else(|| self.icons.get("default"))
			.cloned()
	}

	pub fn default_icon(&self) -> Option<String> {
		self.icons.get("default").cloned()
	}
}

/// The named patterns used to scan ledger text for the frequency cache.
/// Each pattern contributes its first capture group when it has one, and
/// the whole match otherwise.
#[derive(Debug, Deserialize)]
pub struct LedgerRegexes {
	#[serde(default = "default_open_regex")]
	pub open: String,
	#[serde(default = "default_close_regex")]
	pub close: String,
	#[serde(default = "default_from_regex")]
	pub from: String,
	#[serde(default = "default_to_regex")]
	pub to: String,
	#[serde(default = "default_payee_regex")]
	pub payee: String,
}

impl Default for LedgerRegexes {
	fn default() -> Self {
		Self {
			open: default_open_regex(),
			close: default_close_regex(),
			from: default_from_regex(),
			to: default_to_regex(),
			payee: default_payee_regex(),
		}
	}
}

impl LedgerRegexes {
	pub fn compile(&self) -> Result<LedgerPatterns, Error> {
		Ok(LedgerPatterns {
			open: compile_one("open", &self.open)?,
			close: compile_one("close", &self.close)?,
			from: compile_one("from", &self.from)?,
			to: compile_one("to", &self.to)?,
			payee: compile_one("payee", &self.payee)?,
		})
	}
}

pub struct LedgerPatterns {
	pub open: Regex,
	pub close: Regex,
	pub from: Regex,
	pub to: Regex,
	pub payee: Regex,
}

fn compile_one(name: &str, raw: &str) -> Result<Regex, Error> {
	Regex::new(raw).map_err(|e| anyhow!("Invalid {} regex: {}", name, e))
}

fn default_ledger_ext() -> String {
	"beancount".to_string()
}

fn default_currency() -> String {
	"USD".to_string()
}

fn default_clear_tag() -> String {
	"clear".to_string()
}

fn default_title_format() -> String {
	r#"{date} * "{payee}" {tags} ; {comment}"#.to_string()
}

fn default_body_format() -> String {
	"  {account}  {flow} {currency}".to_string()
}

fn default_open_regex() -> String {
	r"(?m)^\d{4}-\d{2}-\d{2} open ([A-Za-z0-9:_-]+)".to_string()
}

fn default_close_regex() -> String {
	r"(?m)^\d{4}-\d{2}-\d{2} close ([A-Za-z0-9:_-]+)".to_string()
}

fn default_from_regex() -> String {
	r"(?m)^[ \t]+([A-Za-z][A-Za-z0-9:_-]*)[ \t]+-[0-9]".to_string()
}

fn default_to_regex() -> String {
	r"(?m)^[ \t]+([A-Za-z][A-Za-z0-9:_-]*)[ \t]+[0-9]".to_string()
}

fn default_payee_regex() -> String {
	r#"(?m)^\d{4}-\d{2}-\d{2} [*!] "([^"]*)""#.to_string()
}

#[cfg(test)]
mod tests {
	use super::*;

	fn minimal() -> Settings {
		toml::from_str(
			r#"
			ledger_path = "ledger.beancount"
			cache_path = "cache.json"
			"#,
		)
		.unwrap()
	}

	#[test]
	fn test_minimal_settings_get_defaults() {
		let settings = minimal();
		assert_eq!(settings.ledger_ext, "beancount");
		assert_eq!(settings.default_currency, "USD");
		assert_eq!(settings.clear_tag, "clear");
		assert!(settings.validate().is_ok());
	}

	#[test]
	fn test_bad_regex_fails_validation() {
		let settings: Settings = toml::from_str(
			r#"
			ledger_path = "ledger.beancount"
			cache_path = "cache.json"

			[regexes]
			open = "(["
			"#,
		)
		.unwrap();
		assert!(settings.validate().is_err());
	}

	#[test]
	fn test_unknown_template_key_fails_validation() {
		let settings: Settings = toml::from_str(
			r#"
			ledger_path = "ledger.beancount"
			cache_path = "cache.json"
			title_format = "{date} {narration}"
			"#,
		)
		.unwrap();
		assert!(settings.validate().is_err());
	}

	#[test]
	fn test_icon_resolution_by_category() {
		let mut settings = minimal();
		settings
			.icons
			.insert("Assets".to_string(), "icons/assets.png".to_string());
		settings
			.icons
			.insert("default".to_string(), "icons/bean.png".to_string());

		assert_eq!(
			settings.icon_for("Assets:Cash"),
			Some("icons/assets.png".to_string())
		);
		assert_eq!(
			settings.icon_for("Expenses:Food"),
			Some("icons/bean.png".to_string())
		);
	}

	#[test]
	fn test_icon_resolution_without_default() {
		let settings = minimal();
		assert_eq!(settings.icon_for("Assets:Cash"), None);
	}
}
