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
use anyhow::{bail, Error};
use regex::Regex;

/// Minimal named-placeholder template. Placeholders take the `{name}`
/// form and substitute by key; anything else passes through untouched.
pub struct Template {
	raw: String,
	placeholder: Regex,
}

impl Template {
	pub fn new(raw: &str) -> Self {
		Self {
			raw: raw.to_string(),
			placeholder: Regex::new(r"\{([a-z_]+)\}").unwrap(),
		}
	}

	/// Verifies every placeholder in the template is a known key, so a
	/// bad settings document fails up front rather than mid-compose.
	pub fn check_keys(&self, allowed: &[&str]) -> Result<(), Error> {
		for caps in self.placeholder.captures_iter(&self.raw) {
			if !allowed.contains(&&caps[1]) {
				bail!("Unknown template placeholder: {{{}}}", &caps[1]);
			}
		}

		Ok(())
	}

	pub fn render(
		&self,
		bindings: &[(&str, String)],
	) -> Result<String, Error> {
		let mut missing = Vec::new();
		let out = self.placeholder.replace_all(
			&self.raw,
			|caps: &regex::Captures| {
				match bindings.iter().find(|(key, _)| *key == &caps[1]) {
					Some((_, value)) => value.clone(),
					None => {
						missing.push(caps[1].to_string());
						String::new()
					},
				}
			},
		);

		if !missing.is_empty() {
			bail!("Unknown template placeholder: {{{}}}", missing.join("}, {"));
		}

		Ok(out.into_owned())
	}
}
