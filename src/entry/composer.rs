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
use crate::entry::template::Template;
use crate::util::date::Date;
use anyhow::Error;

/// A transaction in the making, resolved from launcher tokens. Lives for
/// one invocation; the rendered text is handed back to the launcher,
/// which owns persistence.
pub struct EntryInput {
	pub from: String,
	pub to: String,
	pub payee: String,
	pub amount: f64,
	pub tags: String,
	pub comment: String,
	pub date: Date,
}

pub struct ComposedEntry {
	/// Full entry text: title line plus two posting lines
	pub text: String,
	pub title: String,
	pub subtitle: String,
}

/// Renders the title line and both posting lines from the configured
/// templates. The source posting carries the negated amount, the
/// destination posting the amount as given, both in the configured
/// currency. Writes nothing.
pub fn compose(
	input: &EntryInput,
	settings: &Settings,
) -> Result<ComposedEntry, Error> {
	let title_template = Template::new(&settings.title_format);
	let body_template = Template::new(&settings.body_format);

	let title_line = title_template.render(&[
		("date", input.date.to_string()),
		("payee", input.payee.clone()),
		("tags", render_tags(&input.tags)),
		("comment", input.comment.clone()),
	])?;

	let mut lines = vec![title_line.trim().to_string()];
	for (account, flow) in
		[(&input.from, -input.amount), (&input.to, input.amount)]
	{
		lines.push(body_template.render(&[
			("account", account.to_string()),
			("flow", format!("{:.2}", flow)),
			("currency", settings.default_currency.clone()),
		])?);
	}

	Ok(ComposedEntry {
		text: lines.join("\n"),
		title: format!("New ${:.2} Entry", input.amount),
		subtitle: route_subtitle(&input.from, &input.to, &input.payee),
	})
}

/// Space- or plus-delimited tokens become `#token` markers.
pub fn render_tags(raw: &str) -> String {
	raw.split([' ', '+'])
		.filter(|t| !t.is_empty())
		.map(|t| format!("#{}", t))
		.collect::<Vec<_>>()
		.join(" ")
}

pub fn route_subtitle(from: &str, to: &str, payee: &str) -> String {
	format!("{} \u{279f} {} by {}", from, to, payee)
}

#[cfg(test)]
mod tests {
	use super::*;

	fn settings() -> Settings {
		toml::from_str(
			r#"
			ledger_path = "ledger.beancount"
			cache_path = "cache.json"
			"#,
		)
		.unwrap()
	}

	fn input() -> EntryInput {
		EntryInput {
			from: "Assets:Cash".to_string(),
			to: "Expenses:Food".to_string(),
			payee: "Coffee Shop".to_string(),
			amount: 12.5,
			tags: "food+lunch".to_string(),
			comment: "team lunch".to_string(),
			date: Date::from_str("2024-11-15").unwrap(),
		}
	}

	#[test]
	fn test_compose_renders_full_entry() {
		let entry = compose(&input(), &settings()).unwrap();
		assert_eq!(
			entry.text,
			"2024-11-15 * \"Coffee Shop\" #food #lunch ; team lunch\n  Assets:Cash  -12.50 USD\n  Expenses:Food  12.50 USD"
		);
	}

	#[test]
	fn test_title_renders_two_decimal_places() {
		let entry = compose(&input(), &settings()).unwrap();
		assert_eq!(entry.title, "New $12.50 Entry");
	}

	#[test]
	fn test_subtitle_names_the_route() {
		let entry = compose(&input(), &settings()).unwrap();
		assert_eq!(
			entry.subtitle,
			"Assets:Cash \u{279f} Expenses:Food by Coffee Shop"
		);
	}

	#[test]
	fn test_source_posting_is_negated() {
		let entry = compose(&input(), &settings()).unwrap();
		assert!(entry.text.contains("Assets:Cash  -12.50"));
		assert!(entry.text.contains("Expenses:Food  12.50"));
	}

	#[test]
	fn test_tags_split_on_space_and_plus() {
		assert_eq!(render_tags("food+lunch"), "#food #lunch");
		assert_eq!(render_tags("food lunch"), "#food #lunch");
		assert_eq!(render_tags(""), "");
	}

	#[test]
	fn test_title_line_is_trimmed() {
		let mut i = input();
		i.tags = String::new();
		i.comment = String::new();
		let entry = compose(&i, &settings()).unwrap();

		let title_line = entry.text.lines().next().unwrap();
		assert_eq!(title_line, "2024-11-15 * \"Coffee Shop\"  ;");
	}
}
