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
use nucleo_matcher::pattern::{
	AtomKind, CaseMatching, Normalization, Pattern,
};
use nucleo_matcher::{Config, Matcher, Utf32Str};
use regex::Regex;

/// A transaction pulled out of the ledger text because it has not been
/// marked cleared yet. Read-only and discarded after presentation;
/// `position` is the character offset of the match start, which lets the
/// launcher locate the exact transaction later when rewriting it.
#[derive(Debug, PartialEq)]
pub struct ClearCandidate {
	pub date: String,
	pub from: String,
	pub to: String,
	pub amount: f64,
	pub comment: String,
	pub position: usize,
}

/// Finds committed transactions that still lack the clear marker. The
/// match is anchored on whole lines: a `YYYY-MM-DD * <narration>` header
/// followed by two indented posting lines, each split on whitespace. No
/// column alignment is assumed anywhere.
pub struct Scanner {
	entry_regex: Regex,
	clear_marker: String,
}

impl Scanner {
	pub fn new(clear_tag: &str) -> Self {
		let re = Regex::new(
			r"(?m)^(\d{4}-\d{2}-\d{2}) \* ?(.*)\n[ \t]+(.+)\n[ \t]+(.+)$",
		)
		.unwrap();

		Self {
			entry_regex: re,
			clear_marker: format!("#{}", clear_tag),
		}
	}

	/// Extracts every clear candidate from the text, in order of
	/// appearance. With a filter, only candidates whose source account
	/// fuzzy-matches it are kept.
	pub fn scan(&self, text: &str, filter: Option<&str>) -> Vec<ClearCandidate> {
		let mut matcher = Matcher::new(Config::DEFAULT);
		let pattern = filter.map(|f| {
			Pattern::new(
				f,
				CaseMatching::Ignore,
				Normalization::Smart,
				AtomKind::Fuzzy,
			)
		});

		let mut out = Vec::new();
		for caps in self.entry_regex.captures_iter(text) {
			let narration = &caps[2];
			if narration.contains(&self.clear_marker) {
				continue;
			}

			// first token of each posting line is its account
			let first: Vec<&str> = caps[3].split_whitespace().collect();
			let second: Vec<&str> = caps[4].split_whitespace().collect();
			let (Some(from), Some(to)) = (first.first(), second.first())
			else {
				continue;
			};

			// the source posting carries the signed amount
			let Some(amount) =
				first.iter().find_map(|t| t.parse::<f64>().ok())
			else {
				continue;
			};

			if let Some(pattern) = &pattern {
				let mut buf = Vec::new();
				let haystack = Utf32Str::new(from, &mut buf);
				if pattern.score(haystack, &mut matcher).is_none() {
					continue;
				}
			}

			let start = caps.get(0).map_or(0, |m| m.start());
			out.push(ClearCandidate {
				date: caps[1].to_string(),
				from: from.to_string(),
				to: to.to_string(),
				amount: amount.abs(),
				comment: narration_comment(narration),
				position: text[..start].chars().count(),
			});
		}

		out
	}
}

/// First nonempty segment of the narration once quotes are stripped,
/// uppercased; NULL when the narration is empty.
fn narration_comment(narration: &str) -> String {
	narration
		.split('"')
		.map(str::trim)
		.find(|s| !s.is_empty())
		.unwrap_or("NULL")
		.to_uppercase()
}
