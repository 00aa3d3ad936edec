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
use std::collections::BTreeMap;

/// Scores every table key against the typed input and orders candidates
/// descending by `match_score * ln(frequency + 1)`, biasing toward names
/// used often while still respecting textual match quality. A candidate
/// never seen before scores exactly zero and sinks below any match with
/// prior frequency. Tie order between equal scores is unspecified.
///
/// The result is never empty: an empty input echoes itself with score
/// zero (no filtering upstream), and an input matching nothing echoes
/// itself so the caller can treat it as a freshly typed value.
pub fn rank(input: &str, table: &BTreeMap<String, u64>) -> Vec<(String, f64)> {
	if input.is_empty() {
		return vec![(String::new(), 0.0)];
	}

	let mut matcher = Matcher::new(Config::DEFAULT);
	let pattern = Pattern::new(
		input,
		CaseMatching::Ignore,
		Normalization::Smart,
		AtomKind::Fuzzy,
	);

	let mut scored = Vec::new();
	let mut buf = Vec::new();
	for (candidate, frequency) in table {
		buf.clear();
		let haystack = Utf32Str::new(candidate, &mut buf);
		if let Some(score) = pattern.score(haystack, &mut matcher) {
			let weighted = score as f64 * ((frequency + 1) as f64).ln();
			scored.push((candidate.clone(), weighted));
		}
	}

	if scored.is_empty() {
		return vec![(input.to_string(), 0.0)];
	}

	scored.sort_by(|a, b| b.1.total_cmp(&a.1));
	scored
}
