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
use crate::config::settings::{LedgerPatterns, Settings};
use crate::parsing::filesystem::Filesystem;
use anyhow::Error;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fs;
use std::path::Path;

/// Occurrence counts for the three completion categories. Always rebuilt
/// wholesale from the ledger text; the serialized form on disk is a
/// disposable artifact that may be regenerated at any time without loss.
#[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FrequencyCache {
	pub from: BTreeMap<String, u64>,
	pub to: BTreeMap<String, u64>,
	pub payee: BTreeMap<String, u64>,
}

impl FrequencyCache {
	/// Counts account and payee mentions in the ledger text. An account
	/// is listed only while opened and not yet closed; accounts without
	/// mentions keep a count of zero so they still complete.
	pub fn build(text: &str, patterns: &LedgerPatterns) -> Self {
		let opened = findall(&patterns.open, text);
		let closed: HashSet<String> =
			findall(&patterns.close, text).into_iter().collect();

		let from_counts = count(findall(&patterns.from, text));
		let to_counts = count(findall(&patterns.to, text));

		let mut cache = FrequencyCache::default();
		for account in opened {
			if closed.contains(&account) {
				continue;
			}

			cache.from.insert(
				account.clone(),
				from_counts.get(&account).copied().unwrap_or(0),
			);
			cache.to.insert(
				account.clone(),
				to_counts.get(&account).copied().unwrap_or(0),
			);
		}

		cache.payee = count(findall(&patterns.payee, text))
			.into_iter()
			.collect();

		cache
	}

	/// Rebuilds from the ledger at the given path and overwrites the
	/// cache file. If the ledger cannot be read, no cache is written.
	pub fn rebuild(
		fs: &Filesystem,
		settings: &Settings,
		patterns: &LedgerPatterns,
		ledger_path: &str,
	) -> Result<Self, Error> {
		let text = fs.read_ledger(ledger_path, &settings.ledger_ext)?;
		let cache = Self::build(&text, patterns);
		cache.write(&settings.cache_path)?;
		Ok(cache)
	}

	/// Loads the cache file, falling back to a full rebuild when it is
	/// missing, unreadable, or not valid JSON. The cache is advisory;
	/// rebuilding is always safe.
	pub fn load_or_rebuild(
		fs: &Filesystem,
		settings: &Settings,
		patterns: &LedgerPatterns,
	) -> Result<Self, Error> {
		if let Ok(content) = fs::read_to_string(&settings.cache_path) {
			if let Ok(cache) = serde_json::from_str(&content) {
				return Ok(cache);
			}
		}

		Self::rebuild(fs, settings, patterns, &settings.ledger_path)
	}

	fn write(&self, path: &str) -> Result<(), Error> {
		if let Some(parent) = Path::new(path).parent() {
			if !parent.as_os_str().is_empty() {
				fs::create_dir_all(parent)?;
			}
		}

		fs::write(path, serde_json::to_string(self)?)?;
		Ok(())
	}
}

/// All matches of the pattern in order: the first capture group when the
/// pattern has one, the whole match otherwise.
fn findall(re: &Regex, text: &str) -> Vec<String> {
	re.captures_iter(text)
		.map(|cap| {
			cap.get(1).map_or_else(
				|| cap[0].to_string(),
				|m| m.as_str().to_string(),
			)
		})
		.collect()
}

fn count(items: Vec<String>) -> HashMap<String, u64> {
	let mut counts = HashMap::new();
	for item in items {
		*counts.entry(item).or_insert(0) += 1;
	}
	counts
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::config::settings::LedgerRegexes;

	const LEDGER: &str = "\
2016-01-01 open Assets:Cash
2016-01-01 open Assets:Bank
2016-01-01 open Expenses:Food
2016-01-01 open Liabilities:Card
2016-06-01 close Liabilities:Card

2016-02-01 * \"Coffee Shop\"
  Assets:Cash -3.50 USD
  Expenses:Food 3.50 USD

2016-02-02 * \"Coffee Shop\"
  Assets:Cash -4.00 USD
  Expenses:Food 4.00 USD
";

	fn patterns() -> LedgerPatterns {
		LedgerRegexes::default().compile().unwrap()
	}

	#[test]
	fn test_counts_source_and_destination_mentions() {
		let cache = FrequencyCache::build(LEDGER, &patterns());

		assert_eq!(cache.from.get("Assets:Cash"), Some(&2));
		assert_eq!(cache.to.get("Expenses:Food"), Some(&2));
	}

	#[test]
	fn test_unmentioned_open_account_has_zero_count() {
		let cache = FrequencyCache::build(LEDGER, &patterns());

		assert_eq!(cache.from.get("Assets:Bank"), Some(&0));
		assert_eq!(cache.to.get("Assets:Bank"), Some(&0));
	}

	#[test]
	fn test_closed_account_is_excluded() {
		let cache = FrequencyCache::build(LEDGER, &patterns());

		assert!(!cache.from.contains_key("Liabilities:Card"));
		assert!(!cache.to.contains_key("Liabilities:Card"));
	}

	#[test]
	fn test_payee_counts_total_mentions() {
		let cache = FrequencyCache::build(LEDGER, &patterns());
		assert_eq!(cache.payee.get("Coffee Shop"), Some(&2));
	}

	#[test]
	fn test_rebuild_is_idempotent() {
		let patterns = patterns();
		assert_eq!(
			FrequencyCache::build(LEDGER, &patterns),
			FrequencyCache::build(LEDGER, &patterns)
		);
	}

	#[test]
	fn test_cache_round_trips_through_json() {
		let cache = FrequencyCache::build(LEDGER, &patterns());
		let json = serde_json::to_string(&cache).unwrap();
		let restored: FrequencyCache = serde_json::from_str(&json).unwrap();
		assert_eq!(cache, restored);
	}

	#[test]
	fn test_findall_without_group_yields_whole_match() {
		let re = Regex::new(r"\d{4}").unwrap();
		assert_eq!(findall(&re, "in 2016 and 2017"), vec!["2016", "2017"]);
	}
}
