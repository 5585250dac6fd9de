use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use pass_to_csv::ExportError;
use pass_to_csv::config::{
	Overrides, Settings, discover_config, load_settings, merge_settings, user_config_path,
};
use pass_to_csv::exec::PassCommand;
use pass_to_csv::sink::{CsvRowWriter, FilteredWriter};
use pass_to_csv::store::{export_store, resolve_store_dir};

#[derive(Parser)]
#[command(name = "pass-to-csv")]
#[command(
	author,
	version,
	about = "Export a pass password store to CSV for import into password managers"
)]
struct Cli {
	#[command(subcommand)]
	command: Option<Commands>,

	/// Leading path segment to use as the group label (repeatable)
	#[arg(short = 'p', long = "prefix", value_name = "PREFIX")]
	prefixes: Vec<String>,

	/// Substring marking the last path segment as a username (repeatable)
	#[arg(short = 'u', long = "username", value_name = "SUBSTRING")]
	usernames: Vec<String>,

	/// Group label for entries no prefix matches [default: General]
	#[arg(long, value_name = "LABEL")]
	group: Option<String>,

	/// Type label written to every row [default: Pass]
	#[arg(long = "type", value_name = "LABEL")]
	kind: Option<String>,

	/// Password store directory [default: $PASSWORD_STORE_DIR or ~/.password-store]
	#[arg(long, value_name = "DIR")]
	store: Option<PathBuf>,

	/// Command used to decrypt each entry [default: pass]
	#[arg(long, value_name = "CMD")]
	pass_command: Option<String>,

	/// Write a header row first
	#[arg(long)]
	header: bool,

	/// Write CSV to this file instead of stdout
	#[arg(short, long, value_name = "FILE")]
	output: Option<PathBuf>,

	/// Use this config file instead of ~/.pass-to-csv.toml
	#[arg(long, value_name = "FILE", global = true)]
	config: Option<PathBuf>,

	/// Increase log verbosity (-v info, -vv debug, -vvv trace)
	#[arg(short, long, action = ArgAction::Count, global = true)]
	verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
	/// Configuration management commands
	Config {
		#[command(subcommand)]
		action: ConfigAction,
	},
}

#[derive(Subcommand)]
enum ConfigAction {
	/// Display effective settings and the rule evaluation order
	Show,
	/// Check the config file for errors without exporting anything
	Validate,
}

fn main() -> ExitCode {
	let cli = Cli::parse();
	init_logging(cli.verbose);

	match run(cli) {
		Ok(code) => code,
		Err(e) => {
			if let Some(ExportError::StoreNotFound { path }) = e.downcast_ref::<ExportError>() {
				eprintln!("Password storage doesn't exist: {}", path.display());
			} else {
				eprintln!("error: {e:?}");
			}
			ExitCode::FAILURE
		}
	}
}

fn init_logging(verbose: u8) {
	let default_level = match verbose {
		0 => "warn",
		1 => "info",
		2 => "debug",
		_ => "trace",
	};
	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.init();
}

fn run(cli: Cli) -> Result<ExitCode> {
	if let Some(Commands::Config { ref action }) = cli.command {
		return match action {
			ConfigAction::Show => handle_config_show(cli.config.as_deref(), overrides(&cli)),
			ConfigAction::Validate => handle_config_validate(cli.config.as_deref()),
		};
	}

	handle_export(&cli)
}

fn overrides(cli: &Cli) -> Overrides {
	Overrides {
		store_dir: cli.store.clone(),
		pass_command: cli.pass_command.clone(),
		group: cli.group.clone(),
		kind: cli.kind.clone(),
		prefixes: cli.prefixes.clone(),
		usernames: cli.usernames.clone(),
		header: cli.header,
	}
}

fn handle_export(cli: &Cli) -> Result<ExitCode> {
	let settings =
		load_settings(cli.config.as_deref(), overrides(cli)).context("Failed to load configuration")?;
	let pipeline = settings.pipeline();

	let store_dir = resolve_store_dir(cli.store.as_deref(), settings.store_dir.as_deref())?;
	if !store_dir.is_dir() {
		return Err(ExportError::StoreNotFound { path: store_dir }.into());
	}

	let source = PassCommand::new(&settings.pass_command)
		.context("Failed to locate the secret retrieval command")?
		.with_store_dir(&store_dir);

	let out: Box<dyn Write> = match cli.output {
		Some(ref path) => Box::new(BufWriter::new(
			File::create(path).with_context(|| format!("Failed to create {}", path.display()))?,
		)),
		None => Box::new(std::io::stdout().lock()),
	};

	let writer = CsvRowWriter::new(out, settings.header)?;
	let mut sink = FilteredWriter::new(writer, pipeline);
	export_store(&store_dir, &source, &mut sink)
		.with_context(|| format!("Export of {} failed", store_dir.display()))?;

	sink.into_inner().into_inner()?;
	Ok(ExitCode::SUCCESS)
}

fn handle_config_show(explicit: Option<&Path>, overrides: Overrides) -> Result<ExitCode> {
	let loaded = discover_config(explicit).context("Failed to load configuration")?;

	match loaded {
		Some(ref loaded) => println!("# Source: {}", loaded.path.display()),
		None => println!("# Source: (no config file)"),
	}

	let store_flag = overrides.store_dir.clone();
	let settings = merge_settings(loaded.as_ref().map(|l| &l.config), overrides);
	settings.validate().context("Invalid rule configuration")?;
	let store_dir = resolve_store_dir(store_flag.as_deref(), settings.store_dir.as_deref())?;
	print_settings(&settings, &store_dir);
	match PassCommand::new(&settings.pass_command) {
		Ok(cmd) => println!("# pass-command resolved: {}", cmd.binary().display()),
		Err(_) => println!("# pass-command resolved: (not found)"),
	}

	println!();
	println!("Rule evaluation order:");
	let pipeline = settings.pipeline();
	for (i, rule) in pipeline.chain.rules().iter().enumerate() {
		println!("  {}. {}", i + 1, rule);
	}

	println!();
	if let Ok(user_path) = user_config_path() {
		println!("User config path: {}", user_path.display());
		if user_path.exists() {
			println!("  (exists)");
		} else {
			println!("  (not found)");
		}
	}

	Ok(ExitCode::SUCCESS)
}

fn print_settings(settings: &Settings, store_dir: &Path) {
	println!("# store-dir: {}", store_dir.display());
	println!("# pass-command: {}", settings.pass_command);
	println!("# group: {}", settings.group);
	println!("# type: {}", settings.kind);
	println!("# header: {}", settings.header);
	println!("# prefixes: {}", settings.prefixes.join(", "));
	println!("# usernames: {}", settings.usernames.join(", "));
}

fn handle_config_validate(explicit: Option<&Path>) -> Result<ExitCode> {
	match discover_config(explicit) {
		Ok(Some(loaded)) => {
			println!(
				"Configuration file is valid: {} ({} prefixes, {} usernames)",
				loaded.path.display(),
				loaded.config.prefixes.len(),
				loaded.config.usernames.len()
			);
			Ok(ExitCode::SUCCESS)
		}
		Ok(None) => {
			println!("No configuration file found.");
			Ok(ExitCode::SUCCESS)
		}
		Err(e) => {
			eprintln!("Configuration error: {}", e);
			Ok(ExitCode::FAILURE)
		}
	}
}
