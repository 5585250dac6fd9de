#![allow(deprecated)] // assert_cmd::Command::cargo_bin is deprecated but replacement requires nightly

use predicates::prelude::*;
use std::fs;
use std::path::Path;

fn export_cmd() -> assert_cmd::Command {
	let mut cmd = assert_cmd::Command::cargo_bin("pass-to-csv").unwrap();
	cmd.env("PASS_TO_CSV_NO_USER_CONFIG", "1")
		.env_remove("PASSWORD_STORE_DIR")
		.env_remove("RUST_LOG");
	cmd
}

/// Lay out a password store with empty `.gpg` files.
fn make_store(root: &Path, entries: &[&str]) {
	fs::create_dir_all(root).unwrap();
	for entry in entries {
		let file = root.join(format!("{entry}.gpg"));
		fs::create_dir_all(file.parent().unwrap()).unwrap();
		fs::write(file, "").unwrap();
	}
}

/// A stand-in for `pass` that prints `pw:<name>`, or fails for names
/// containing "broken".
#[cfg(unix)]
fn fake_pass(dir: &Path) -> String {
	use std::os::unix::fs::PermissionsExt;

	let script = dir.join("fake-pass");
	fs::write(
		&script,
		"#!/bin/sh\ncase \"$1\" in\n  *broken*) echo 'gpg: decryption failed' >&2; exit 2 ;;\nesac\nprintf 'pw:%s\\n' \"$1\"\n",
	)
	.unwrap();
	fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).unwrap();
	script.to_string_lossy().to_string()
}

// ============================================================================
// CLI flag tests
// ============================================================================

#[test]
fn test_help_flag() {
	export_cmd()
		.arg("--help")
		.assert()
		.success()
		.stdout(predicate::str::contains("Export a pass password store"));
}

#[test]
fn test_version_flag() {
	export_cmd()
		.arg("--version")
		.assert()
		.success()
		.stdout(predicate::str::contains("pass-to-csv"));
}

#[test]
fn test_missing_store() {
	let temp_dir = tempfile::tempdir().unwrap();

	export_cmd()
		.arg("--store")
		.arg(temp_dir.path().join("nope"))
		.assert()
		.failure()
		.stderr(predicate::str::contains("Password storage doesn't exist"));
}

#[test]
fn test_missing_pass_command() {
	let temp_dir = tempfile::tempdir().unwrap();
	make_store(temp_dir.path(), &["simple"]);

	export_cmd()
		.arg("--store")
		.arg(temp_dir.path())
		.args(["--pass-command", "nonexistent_pass_binary_12345"])
		.assert()
		.failure()
		.stderr(predicate::str::contains("not found"));
}

// ============================================================================
// Export tests (Unix only - these use a shell script as `pass`)
// ============================================================================

#[cfg(unix)]
#[test]
fn test_export_default_rules() {
	let temp_dir = tempfile::tempdir().unwrap();
	let store = temp_dir.path().join("store");
	make_store(&store, &["simple", "example.com", "shop.example/bob", "misc/a/b"]);
	fs::create_dir_all(store.join(".git")).unwrap();
	fs::write(store.join(".git/hidden.gpg"), "").unwrap();
	let pass = fake_pass(temp_dir.path());

	export_cmd()
		.arg("--store")
		.arg(&store)
		.args(["--pass-command", &pass])
		.assert()
		.success()
		.stdout(
			"example.com,,pw:example.com,example.com,,General,Pass\r\n\
			 misc/a/b,,pw:misc/a/b,,,General,Pass\r\n\
			 shop.example,bob,pw:shop.example/bob,shop.example,,General,Pass\r\n\
			 simple,,pw:simple,,,General,Pass\r\n",
		);
}

#[cfg(unix)]
#[test]
fn test_export_with_prefix_username_and_labels() {
	let temp_dir = tempfile::tempdir().unwrap();
	let store = temp_dir.path().join("store");
	make_store(&store, &["work/intranet/jdoe", "home/router/admin"]);
	let pass = fake_pass(temp_dir.path());

	export_cmd()
		.arg("--store")
		.arg(&store)
		.args(["--pass-command", &pass])
		.args(["-p", "work", "-u", "admin"])
		.args(["--group", "Imported", "--type", "Login", "--header"])
		.assert()
		.success()
		.stdout(
			"Title,Username,Password,URL,Notes,Group,Type\r\n\
			 home/router,admin,pw:home/router/admin,,,Imported,Login\r\n\
			 intranet/jdoe,,pw:work/intranet/jdoe,,,work,Login\r\n",
		);
}

#[cfg(unix)]
#[test]
fn test_export_to_output_file() {
	let temp_dir = tempfile::tempdir().unwrap();
	let store = temp_dir.path().join("store");
	make_store(&store, &["simple"]);
	let pass = fake_pass(temp_dir.path());
	let output = temp_dir.path().join("out.csv");

	export_cmd()
		.arg("--store")
		.arg(&store)
		.args(["--pass-command", &pass])
		.arg("--output")
		.arg(&output)
		.assert()
		.success()
		.stdout("");

	let content = fs::read_to_string(&output).unwrap();
	assert_eq!(content, "simple,,pw:simple,,,General,Pass\r\n");
}

#[cfg(unix)]
#[test]
fn test_retrieval_failure_aborts_export() {
	let temp_dir = tempfile::tempdir().unwrap();
	let store = temp_dir.path().join("store");
	make_store(&store, &["broken"]);
	let pass = fake_pass(temp_dir.path());

	export_cmd()
		.arg("--store")
		.arg(&store)
		.args(["--pass-command", &pass])
		.assert()
		.failure()
		.stderr(predicate::str::contains("Cannot get the password for /broken"));
}

#[cfg(unix)]
#[test]
fn test_store_from_environment() {
	let temp_dir = tempfile::tempdir().unwrap();
	let store = temp_dir.path().join("store");
	make_store(&store, &["simple"]);
	let pass = fake_pass(temp_dir.path());

	export_cmd()
		.env("PASSWORD_STORE_DIR", &store)
		.args(["--pass-command", &pass])
		.assert()
		.success()
		.stdout(predicate::str::contains("simple,,pw:simple"));
}

#[cfg(unix)]
#[test]
fn test_config_file_supplies_rules() {
	let temp_dir = tempfile::tempdir().unwrap();
	let store = temp_dir.path().join("store");
	make_store(&store, &["work/wiki"]);
	let pass = fake_pass(temp_dir.path());
	let config_path = temp_dir.path().join("conf.toml");

	fs::write(
		&config_path,
		format!(
			"store-dir = \"{}\"\npass-command = \"{}\"\nprefixes = [\"work\"]\ntype = \"Web\"\n",
			store.display(),
			pass
		),
	)
	.unwrap();

	export_cmd()
		.arg("--config")
		.arg(&config_path)
		.assert()
		.success()
		.stdout("wiki,,pw:work/wiki,,,work,Web\r\n");
}

#[cfg(unix)]
#[test]
fn test_verbose_logs_classification() {
	let temp_dir = tempfile::tempdir().unwrap();
	let store = temp_dir.path().join("store");
	make_store(&store, &["example.com"]);
	let pass = fake_pass(temp_dir.path());

	export_cmd()
		.arg("--store")
		.arg(&store)
		.args(["--pass-command", &pass, "-vv"])
		.assert()
		.success()
		.stderr(predicate::str::contains("classified entry"))
		.stderr(predicate::str::contains("url-without-username"));
}

// ============================================================================
// config subcommand tests
// ============================================================================

#[test]
fn test_config_validate_no_config() {
	export_cmd()
		.args(["config", "validate"])
		.assert()
		.success()
		.stdout(predicate::str::contains("No configuration file found"));
}

#[test]
fn test_config_validate_valid_config() {
	let temp_dir = tempfile::tempdir().unwrap();
	let config_path = temp_dir.path().join("conf.toml");
	fs::write(&config_path, "prefixes = [\"work\", \"home\"]\n").unwrap();

	export_cmd()
		.args(["config", "validate", "--config"])
		.arg(&config_path)
		.assert()
		.success()
		.stdout(predicate::str::contains("valid"))
		.stdout(predicate::str::contains("2 prefixes"));
}

#[test]
fn test_config_validate_invalid_config() {
	let temp_dir = tempfile::tempdir().unwrap();
	let config_path = temp_dir.path().join("conf.toml");
	fs::write(&config_path, "invalid toml [[[").unwrap();

	export_cmd()
		.args(["config", "validate", "--config"])
		.arg(&config_path)
		.assert()
		.failure()
		.stderr(predicate::str::contains("Configuration error"));
}

#[test]
fn test_config_show_lists_rule_order() {
	let temp_dir = tempfile::tempdir().unwrap();
	let config_path = temp_dir.path().join("conf.toml");
	fs::write(&config_path, "usernames = [\"bob\"]\n").unwrap();

	export_cmd()
		.args(["--store", "/tmp/some-store", "config", "show", "--config"])
		.arg(&config_path)
		.assert()
		.success()
		.stdout(predicate::str::contains("# store-dir: /tmp/some-store"))
		.stdout(predicate::str::contains(
			"1. url-without-username\n  2. url-split\n  3. username(bob)\n  4. drop-leading-slash\n  5. identity",
		));
}

#[cfg(unix)]
#[test]
fn test_config_show_resolves_pass_command() {
	let temp_dir = tempfile::tempdir().unwrap();
	let pass = fake_pass(temp_dir.path());

	export_cmd()
		.args(["--pass-command", &pass, "config", "show"])
		.assert()
		.success()
		.stdout(predicate::str::contains(format!(
			"# pass-command resolved: {pass}"
		)));
}

#[test]
fn test_config_show_reports_missing_pass_command() {
	export_cmd()
		.args(["--pass-command", "nonexistent_pass_binary_12345", "config", "show"])
		.assert()
		.success()
		.stdout(predicate::str::contains("# pass-command resolved: (not found)"));
}

#[test]
fn test_empty_prefix_flag_rejected() {
	let temp_dir = tempfile::tempdir().unwrap();
	make_store(temp_dir.path(), &["simple"]);

	export_cmd()
		.arg("--store")
		.arg(temp_dir.path())
		.args(["--prefix", ""])
		.assert()
		.failure()
		.stderr(predicate::str::contains("Invalid prefix rule"));
}

#[cfg(unix)]
#[test]
fn test_export_follows_symlinked_entries() {
	use std::os::unix::fs::symlink;

	let temp_dir = tempfile::tempdir().unwrap();
	let store = temp_dir.path().join("store");
	make_store(&store, &["real"]);
	make_store(&temp_dir.path().join("shared"), &["wiki"]);
	symlink(store.join("real.gpg"), store.join("alias.gpg")).unwrap();
	symlink(temp_dir.path().join("shared"), store.join("team")).unwrap();
	let pass = fake_pass(temp_dir.path());

	export_cmd()
		.arg("--store")
		.arg(&store)
		.args(["--pass-command", &pass])
		.assert()
		.success()
		.stdout(
			"alias,,pw:alias,,,General,Pass\r\n\
			 real,,pw:real,,,General,Pass\r\n\
			 team/wiki,,pw:team/wiki,,,General,Pass\r\n",
		);
}
