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
use anyhow::Error;
use serde::Serialize;
use std::io;
use std::io::Write;

/// One row of launcher feedback, in the conventional script filter
/// shape. `valid` marks whether selecting the row does anything, and
/// `arg` is the payload handed back to the launcher on selection.
#[derive(Debug, Serialize)]
pub struct Item {
	pub title: String,
	pub subtitle: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub icon: Option<String>,
	pub valid: bool,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub arg: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub copytext: Option<String>,
}

/// Ordered presentation list, flushed to the launcher exactly once per
/// invocation. Nothing is emitted before the flush, so a fatal error
/// presents no items at all.
#[derive(Debug, Default, Serialize)]
pub struct Feedback {
	items: Vec<Item>,
}

impl Feedback {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn add_item(&mut self, item: Item) {
		self.items.push(item);
	}

	/// Emits the full item list to stdout as one JSON document.
	pub fn flush(&self) -> Result<(), Error> {
		let stdout = io::stdout();
		let mut handle = stdout.lock();
		serde_json::to_writer_pretty(&mut handle, self)?;
		writeln!(handle)?;
		Ok(())
	}
}
