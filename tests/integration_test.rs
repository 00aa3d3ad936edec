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
use std::fs;
use std::process::Command;

#[test]
fn test_integration_add_lists_candidates() {
	let stdout = execute(
		"add_candidates",
		vec!["add", "Cash"],
		true,
	);
	assert_eq!(stdout, expected("add_candidates"));
}

#[test]
fn test_integration_add_composes_entry() {
	let stdout = execute(
		"add_compose",
		vec![
			"--date",
			"2024-11-15",
			"add",
			"cash",
			"food",
			"coffee",
			"12.5",
			"food+lunch",
			"team lunch",
		],
		true,
	);
	assert_eq!(stdout, expected("add_compose"));
}

#[test]
fn test_integration_add_rejects_bad_amount() {
	execute(
		"add_compose",
		vec!["add", "cash", "food", "coffee", "notanumber"],
		false,
	);
}

#[test]
fn test_integration_clear_lists_uncleared() {
	let stdout = execute("clear", vec!["clear"], true);
	assert_eq!(stdout, expected("clear"));
}

#[test]
fn test_integration_clear_filter_can_exclude_all() {
	let stdout = execute("clear_filtered", vec!["clear", "bank"], true);
	assert_eq!(stdout, expected("clear_filtered"));
}

#[test]
fn test_integration_cache_rebuild() {
	let stdout = execute("cache", vec!["cache"], true);
	assert_eq!(stdout, expected("cache"));

	// the written cache must carry exactly the expected tables
	let written: serde_json::Value = serde_json::from_str(
		&fs::read_to_string("target/tmp/cache_cmd.json")
			.expect("Failed to read written cache"),
	)
	.expect("Written cache is not valid JSON");
	let reference: serde_json::Value = serde_json::from_str(
		&fs::read_to_string("tests/test_data/cache/expected_cache.json")
			.expect("Failed to read expected cache"),
	)
	.expect("Expected cache is not valid JSON");

	assert_eq!(written, reference);
}

#[test]
fn test_integration_missing_settings_is_fatal() {
	execute_raw(vec!["--config", "no/such/settings.toml", "cache"], false);
}

/// Runs the binary against a fixture folder's settings and returns
/// trimmed stdout.
fn execute(
	subfolder: &str,
	args: Vec<&str>,
	should_succeed: bool,
) -> String {
	let settings =
		format!("tests/test_data/{}/settings.toml", subfolder);
	let all_args =
		[vec!["--config", settings.as_str()], args].concat();
	execute_raw(all_args, should_succeed)
}

fn execute_raw(args: Vec<&str>, should_succeed: bool) -> String {
	let all_args = [vec!["run", "--"], args].concat();

	let output = Command::new("cargo")
		.args(all_args)
		.output()
		.expect("Failed to execute process");

	if !should_succeed {
		assert!(
			!output.status.success(),
			"invocation unexpectedly succeeded!"
		);
		return String::new();
	}

	assert!(
		output.status.success(),
		"invocation failed: {}",
		String::from_utf8_lossy(&output.stderr)
	);

	String::from_utf8_lossy(&output.stdout).trim().to_string()
}

fn expected(subfolder: &str) -> String {
	fs::read_to_string(format!(
		"tests/test_data/{}/expected_out.txt",
		subfolder
	))
	.expect("Failed to read expected output file")
	.trim()
	.to_string()
}
