use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::{debug, info};
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use shalias_cli::ShaliasError;
use shalias_cli::config::{
	MAX_ROUNDS_LIMIT, Settings, discover_configs, is_env_truthy, load_settings, merge_configs,
	user_config_path,
};
use shalias_cli::engine::{
	ConsolidationReport, ExpansionMap, Resolver, collapse, consolidate, rename_alias,
};
use shalias_cli::exec::{CommandLookup, NoLookup, ShellLookup};
use shalias_cli::listing::{build_rows, render_table, search_rows};
use shalias_cli::prompt::{AddRequest, AddSession};
use shalias_cli::store::{
	AliasMap, append_definition, load_store, save_store, write_alias_file,
};

/// Environment variable holding the log filter.
const LOG_ENV: &str = "SHALIAS_LOG";

/// Truthy value disables the reserved-name check.
const SKIP_RESERVED_ENV: &str = "SHALIAS_SKIP_RESERVED_CHECK";

#[derive(Parser)]
#[command(name = "shalias")]
#[command(
	author,
	version,
	about = "Manage a shell alias file: add, rename, search, export and refactor alias chains"
)]
#[command(arg_required_else_help = true)]
struct Cli {
	/// Maximum alias substitutions per resolution (overrides config)
	#[arg(
		long,
		global = true,
		value_name = "N",
		value_parser = clap::value_parser!(u64).range(1..=MAX_ROUNDS_LIMIT as u64)
	)]
	max_rounds: Option<u64>,

	/// Stop resolving when an alias repeats (overrides config)
	#[arg(long, global = true)]
	stop_on_repeat: bool,

	#[command(subcommand)]
	command: Commands,
}

#[derive(Subcommand)]
enum Commands {
	/// Add a new alias, collapsing the command against existing aliases first
	Add {
		/// Alias file (defaults to config, then ~/.bash_aliases)
		alias_file: Option<PathBuf>,

		/// Command to alias (prompted for when omitted)
		#[arg(long)]
		command: Option<String>,

		/// Name of the new alias (prompted for when omitted)
		#[arg(long)]
		name: Option<String>,

		/// Comment appended after the definition
		#[arg(long)]
		comment: Option<String>,
	},
	/// Rename an alias and rewrite every reference to it
	Rename {
		alias_file: PathBuf,
		old: String,
		new: String,
	},
	/// Search aliases by name, command, expansion or comment
	Search {
		query: String,
		alias_file: Option<PathBuf>,
	},
	/// List all aliases with their expansions
	List { alias_file: Option<PathBuf> },
	/// Print the fully expanded command behind an alias
	Export {
		alias_name: String,
		alias_file: Option<PathBuf>,
	},
	/// Show the shortest alias form of a command
	Suggest {
		/// Alias file (defaults to config, then ~/.bash_aliases)
		#[arg(long = "file", value_name = "ALIAS_FILE")]
		alias_file: Option<PathBuf>,

		#[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
		command: Vec<String>,
	},
	/// Rewrite duplicate aliases and extract repeated commands into new aliases
	Refactor {
		alias_file: Option<PathBuf>,

		/// Print the result instead of writing the file
		#[arg(long)]
		dry_run: bool,
	},
	/// Configuration management commands
	Config {
		#[command(subcommand)]
		action: ConfigAction,
	},
}

#[derive(Subcommand)]
enum ConfigAction {
	/// Display discovered config files and the effective settings
	Show,
	/// Check all config files for errors without running anything
	Validate,
}

/// Settings shared by every subcommand.
struct App {
	settings: Settings,
	max_rounds: usize,
	stop_on_repeat: bool,
}

impl App {
	fn load(max_rounds: Option<u64>, stop_on_repeat: bool) -> Result<Self> {
		let cwd = std::env::current_dir().context("Failed to get current directory")?;
		let settings = load_settings(&cwd).context("Failed to load configuration")?;
		let max_rounds = max_rounds.map_or(settings.max_rounds, |n| n as usize);
		let stop_on_repeat = stop_on_repeat || settings.stop_on_repeat;
		debug!("Using max rounds {max_rounds}, config sources {:?}", settings.sources);
		Ok(App {
			settings,
			max_rounds,
			stop_on_repeat,
		})
	}

	fn resolver<'a>(&self, aliases: &'a AliasMap) -> Resolver<'a> {
		Resolver::new(aliases)
			.with_max_rounds(self.max_rounds)
			.with_stop_on_repeat(self.stop_on_repeat)
	}

	fn alias_file(&self, explicit: Option<PathBuf>) -> Result<PathBuf> {
		match explicit {
			Some(path) => Ok(path),
			None => Ok(self.settings.alias_file_or_default()?),
		}
	}

	fn lookup(&self) -> Box<dyn CommandLookup> {
		if !self.settings.check_reserved || is_env_truthy(SKIP_RESERVED_ENV) {
			debug!("Reserved-name check disabled");
			Box::new(NoLookup)
		} else {
			Box::new(ShellLookup)
		}
	}
}

fn main() -> ExitCode {
	init_logging();

	match run() {
		Ok(code) => code,
		Err(e) => {
			eprintln!("error: {e:#}");
			let code = e
				.downcast_ref::<ShaliasError>()
				.map_or(1, ShaliasError::exit_code);
			ExitCode::from(code)
		}
	}
}

fn init_logging() {
	env_logger::Builder::from_env(env_logger::Env::default().filter_or(LOG_ENV, "warn"))
		.format_timestamp(None)
		.init();
}

fn run() -> Result<ExitCode> {
	let cli = Cli::parse();

	if let Commands::Config { action } = cli.command {
		return match action {
			ConfigAction::Show => handle_config_show(),
			ConfigAction::Validate => handle_config_validate(),
		};
	}

	let app = App::load(cli.max_rounds, cli.stop_on_repeat)?;

	match cli.command {
		Commands::Add {
			alias_file,
			command,
			name,
			comment,
		} => {
			let request = AddRequest {
				command,
				name,
				comment,
			};
			handle_add(&app, alias_file, request)
		}
		Commands::Rename {
			alias_file,
			old,
			new,
		} => handle_rename(&app, alias_file, &old, &new),
		Commands::Search { query, alias_file } => handle_list(&app, alias_file, Some(&query)),
		Commands::List { alias_file } => handle_list(&app, alias_file, None),
		Commands::Export {
			alias_name,
			alias_file,
		} => handle_export(&app, alias_file, &alias_name),
		Commands::Suggest {
			alias_file,
			command,
		} => handle_suggest(&app, alias_file, &command.join(" ")),
		Commands::Refactor {
			alias_file,
			dry_run,
		} => handle_refactor(&app, alias_file, dry_run),
		// Handled before loading settings.
		Commands::Config { .. } => Ok(ExitCode::SUCCESS),
	}
}

fn handle_add(app: &App, alias_file: Option<PathBuf>, request: AddRequest) -> Result<ExitCode> {
	let path = app.alias_file(alias_file)?;
	if !path.exists() {
		info!("Creating {}", path.display());
		write_alias_file(&path, "")?;
	}

	let store = load_store(&path)?;
	let lookup = app.lookup();

	let stdin = io::stdin();
	let stdout = io::stdout();
	let alias = AddSession::new(
		stdin.lock(),
		stdout.lock(),
		&store,
		lookup.as_ref(),
		app.max_rounds,
	)
	.with_stop_on_repeat(app.stop_on_repeat)
	.run(request)?;

	let line = append_definition(&path, &alias.name, &alias.command, alias.comment.as_deref())?;
	println!("Added to {}: {line}", path.display());
	Ok(ExitCode::SUCCESS)
}

fn handle_rename(app: &App, alias_file: PathBuf, old: &str, new: &str) -> Result<ExitCode> {
	let mut store = load_store(&alias_file)?;
	let lookup = app.lookup();

	let outcome = rename_alias(&mut store, old, new, lookup.as_ref())?;
	save_store(&alias_file, &store)?;

	if outcome.changed {
		println!(
			"Renamed {old} -> {new}: {} definition(s), {} reference(s) updated",
			outcome.definitions, outcome.references
		);
	} else {
		println!("No changes");
	}
	Ok(ExitCode::SUCCESS)
}

fn handle_list(app: &App, alias_file: Option<PathBuf>, query: Option<&str>) -> Result<ExitCode> {
	let path = app.alias_file(alias_file)?;
	let store = load_store(&path)?;
	let aliases = store.alias_map();
	let resolver = app.resolver(&aliases);

	let rows = build_rows(&store.entries(), &resolver);
	let shown = match query {
		Some(query) => search_rows(&rows, query),
		None => rows.iter().collect(),
	};

	print!("{}", render_table(&shown));
	Ok(ExitCode::SUCCESS)
}

fn handle_export(app: &App, alias_file: Option<PathBuf>, name: &str) -> Result<ExitCode> {
	let path = app.alias_file(alias_file)?;
	let store = load_store(&path)?;
	let aliases = store.alias_map();
	let resolver = app.resolver(&aliases);

	let expanded = resolver
		.expand_alias(name)
		.ok_or_else(|| ShaliasError::AliasNotFound {
			name: name.to_string(),
		})?;

	println!("{expanded}");
	Ok(ExitCode::SUCCESS)
}

fn handle_suggest(app: &App, alias_file: Option<PathBuf>, command: &str) -> Result<ExitCode> {
	let path = app.alias_file(alias_file)?;
	let store = load_store(&path)?;
	let aliases = store.alias_map();
	let resolver = app.resolver(&aliases);
	let expansions = ExpansionMap::build(&resolver);

	println!("{}", collapse(command, &expansions, app.max_rounds));
	Ok(ExitCode::SUCCESS)
}

fn handle_refactor(app: &App, alias_file: Option<PathBuf>, dry_run: bool) -> Result<ExitCode> {
	let path = app.alias_file(alias_file)?;
	let store = load_store(&path)?;

	let (rewritten, report) = consolidate(&store, app.max_rounds);
	print_report(&report);

	if !report.changed {
		println!("No changes");
	} else if dry_run {
		println!();
		print!("{}", rewritten.render());
	} else {
		save_store(&path, &rewritten)?;
		println!("Updated {}", path.display());
	}
	Ok(ExitCode::SUCCESS)
}

fn print_report(report: &ConsolidationReport) {
	if !report.duplicates.is_empty() {
		println!("Duplicate aliases:");
		for group in &report.duplicates {
			println!(
				"  {} -> {} ({})",
				group.duplicates.join(", "),
				group.canonical,
				group.expansion
			);
		}
	}

	if !report.auto_aliases.is_empty() {
		println!("Generated aliases:");
		for auto in &report.auto_aliases {
			println!(
				"  {}='{}' ({} occurrences)",
				auto.name, auto.command, auto.occurrences
			);
		}
	}
}

fn handle_config_show() -> Result<ExitCode> {
	let cwd = std::env::current_dir().context("Failed to get current directory")?;
	let configs = discover_configs(&cwd).context("Failed to discover config files")?;

	if configs.is_empty() {
		println!("No configuration files found.");
	} else {
		println!("Configuration files (in cascade order):\n");
	}

	for loaded in &configs {
		let config = &loaded.config;
		println!("# Source: {}", loaded.path.display());
		println!("# root: {}", config.root);
		if let Some(ref path) = config.alias_file {
			println!("# alias-file: {}", path.display());
		}
		if let Some(rounds) = config.max_rounds {
			println!("# max-rounds: {rounds}");
		}
		if let Some(stop) = config.stop_on_repeat {
			println!("# stop-on-repeat: {stop}");
		}
		if let Some(check) = config.check_reserved {
			println!("# check-reserved: {check}");
		}
		if let Some(ref env_var) = config.user_config_disable_env_var {
			println!("# user-config-disable-env-var: {env_var}");
		}
		println!();
	}

	let settings = merge_configs(&configs);
	println!("Effective settings:");
	match settings.alias_file_or_default() {
		Ok(path) => println!("  alias-file: {}", path.display()),
		Err(e) => println!("  alias-file: ({e})"),
	}
	println!("  max-rounds: {}", settings.max_rounds);
	println!("  stop-on-repeat: {}", settings.stop_on_repeat);
	println!("  check-reserved: {}", settings.check_reserved);

	if let Ok(user_path) = user_config_path() {
		println!("\nUser config path: {}", user_path.display());
		if user_path.exists() {
			println!("  (exists)");
		} else {
			println!("  (not found)");
		}
	}

	Ok(ExitCode::SUCCESS)
}

fn handle_config_validate() -> Result<ExitCode> {
	let cwd = std::env::current_dir().context("Failed to get current directory")?;

	match discover_configs(&cwd) {
		Ok(configs) => {
			if configs.is_empty() {
				println!("No configuration files found.");
			} else {
				println!("All configuration files are valid:");
				for loaded in &configs {
					println!("  {}", loaded.path.display());
				}
			}
			Ok(ExitCode::SUCCESS)
		}
		Err(e) => {
			eprintln!("Configuration error: {e}");
			Ok(ExitCode::FAILURE)
		}
	}
}
