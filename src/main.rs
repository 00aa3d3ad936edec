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
use crate::completion::cache::FrequencyCache;
use crate::completion::ranker;
use crate::config::settings::Settings;
use crate::entry::composer::{self, EntryInput};
use crate::feedback::list::{Feedback, Item};
use crate::parsing::filesystem::Filesystem;
use crate::parsing::scanner::Scanner;
use crate::util::date::Date;
use anyhow::{anyhow, bail, Error};
use chrono::Local;
use clap::{Parser, ValueEnum};

mod completion;
mod config;
mod entry;
mod feedback;
mod parsing;
mod util;

#[derive(Parser)]
#[command(
	name = "quickbean",
	version = "1.0",
	about = "Launcher quick-entry helper for beancount ledgers"
)]
struct Cli {
	// ----------------
	// -- POSITIONAL --
	// ----------------
	/// The command to execute
	command: Directive,

	/// Argument tokens forwarded by the launcher
	#[arg(required = false)]
	tokens: Vec<String>,

	// -----------
	// -- FLAGS --
	// -----------
	/// Custom settings file location
	/// (default: ~/.config/quickbean/settings.toml)
	#[arg(long)]
	config: Option<String>,

	/// Compose entries with this date instead of today (YYYY-MM-DD)
	#[arg(short, long)]
	date: Option<String>,
}

impl Cli {
	/// from, to, payee, amount, tags, comment
	const MAX_ADD_TOKENS: usize = 6;

	/// Extra validations on top of what clap does
	fn validate(&self) -> Result<(), Error> {
		if self.command == Directive::Add
			&& self.tokens.len() > Cli::MAX_ADD_TOKENS
		{
			bail!("Add takes at most {} tokens", Cli::MAX_ADD_TOKENS);
		}

		Ok(())
	}
}

#[derive(ValueEnum, Clone, PartialEq)]
enum Directive {
	Add,   // compose a new entry with completion
	Clear, // list entries not yet marked cleared
	Cache, // rebuild the account/payee frequency cache
}

fn main() -> Result<(), Error> {
	let args = Cli::parse();
	args.validate()?;

	let fs = Filesystem::new();
	let settings = fs.get_settings(args.config.as_ref())?;
	let patterns = settings.validate()?;

	let date = match &args.date {
		None => today(),
		Some(d) => Date::from_str(d)?,
	};

	let mut feedback = Feedback::new();

	match args.command {
		Directive::Add => {
			let cache =
				FrequencyCache::load_or_rebuild(&fs, &settings, &patterns)?;
			add(&settings, &cache, &args.tokens, date, &mut feedback)?;
		},
		Directive::Clear => {
			let text =
				fs.read_ledger(&settings.ledger_path, &settings.ledger_ext)?;
			let scanner = Scanner::new(&settings.clear_tag);
			let filter = args.tokens.first().map(String::as_str);

			for c in scanner.scan(&text, filter) {
				feedback.add_item(Item {
					title: format!("${:.2} with {}", c.amount, c.comment),
					subtitle: format!("{} \u{279f} {}", c.from, c.to),
					icon: settings.icon_for(&c.from),
					valid: true,
					arg: Some(c.position.to_string()),
					copytext: None,
				});
			}
		},
		Directive::Cache => {
			let path = args.tokens.first().unwrap_or(&settings.ledger_path);
			let built =
				FrequencyCache::rebuild(&fs, &settings, &patterns, path)?;

			feedback.add_item(Item {
				title: format!(
					"Cached {} accounts and {} payees",
					built.from.len(),
					built.payee.len()
				),
				subtitle: settings.cache_path.clone(),
				icon: settings.default_icon(),
				valid: false,
				arg: None,
				copytext: None,
			});
		},
	}

	feedback.flush()
}

/// Progressive composition of a new entry. With three or fewer tokens, all
/// but the last resolve to their top-ranked candidate and the last expands
/// into the full ranked list for its category; with four or more, the entry
/// is rendered for the launcher to append.
fn add(
	settings: &Settings,
	cache: &FrequencyCache,
	tokens: &[String],
	date: Date,
	feedback: &mut Feedback,
) -> Result<(), Error> {
	let mut tokens = tokens.to_vec();
	if tokens.is_empty() {
		tokens.push(String::new());
	}

	let supplied = tokens.len();
	tokens.resize(Cli::MAX_ADD_TOKENS, String::new());

	// Categories resolve in this order
	let tables = [&cache.from, &cache.to, &cache.payee];

	if supplied <= tables.len() {
		let mut resolved: [String; 3] = Default::default();
		for i in 0..supplied - 1 {
			let mut ranked = ranker::rank(&tokens[i], tables[i]);
			resolved[i] = ranked.swap_remove(0).0;
		}

		let last = supplied - 1;
		for (candidate, _) in ranker::rank(&tokens[last], tables[last]) {
			resolved[last] = candidate;
			feedback.add_item(Item {
				title: resolved[last].clone(),
				subtitle: composer::route_subtitle(
					&resolved[0],
					&resolved[1],
					&resolved[2],
				),
				icon: settings.icon_for(&resolved[last]),
				valid: false,
				arg: None,
				copytext: None,
			});
		}

		return Ok(());
	}

	let top = |input: &String, i: usize| -> String {
		ranker::rank(input, tables[i]).swap_remove(0).0
	};

	let amount: f64 = tokens[3]
		.parse()
		.map_err(|_| anyhow!("Invalid amount: {}", tokens[3]))?;

	let entry = composer::compose(
		&EntryInput {
			from: top(&tokens[0], 0),
			to: top(&tokens[1], 1),
			payee: top(&tokens[2], 2),
			amount,
			tags: tokens[4].clone(),
			comment: tokens[5].clone(),
			date,
		},
		settings,
	)?;

	feedback.add_item(Item {
		title: entry.title,
		subtitle: entry.subtitle,
		icon: settings.default_icon(),
		valid: true,
		arg: Some(entry.text.clone()),
		copytext: Some(entry.text),
	});

	Ok(())
}

fn today() -> Date {
	Date::from_str(&Local::now().date_naive().to_string()).unwrap()
}
