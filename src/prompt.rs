//! Interactive flow for adding a new alias.

use crate::engine::{ExpansionMap, Resolver, collapse, validate_new_name};
use crate::error::{Result, ShaliasError};
use crate::exec::CommandLookup;
use crate::store::{AliasStore, check_single_line};
use log::debug;
use std::io::{BufRead, Write};

/// Values supplied up front; anything missing is prompted for.
#[derive(Debug, Clone, Default)]
pub struct AddRequest {
	pub command: Option<String>,
	pub name: Option<String>,
	pub comment: Option<String>,
}

impl AddRequest {
	fn is_complete(&self) -> bool {
		self.command.is_some() && self.name.is_some()
	}
}

/// The alias the user settled on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAlias {
	pub name: String,
	/// Command in its collapsed form.
	pub command: String,
	pub comment: Option<String>,
}

/// Prompts on `output` and reads answers from `input`.
pub struct AddSession<'a, R, W> {
	input: R,
	output: W,
	store: &'a AliasStore,
	lookup: &'a dyn CommandLookup,
	max_rounds: usize,
	stop_on_repeat: bool,
}

impl<'a, R: BufRead, W: Write> AddSession<'a, R, W> {
	pub fn new(
		input: R,
		output: W,
		store: &'a AliasStore,
		lookup: &'a dyn CommandLookup,
		max_rounds: usize,
	) -> Self {
		AddSession {
			input,
			output,
			store,
			lookup,
			max_rounds,
			stop_on_repeat: false,
		}
	}

	/// Resolve chains with [`Resolver::with_stop_on_repeat`].
	pub fn with_stop_on_repeat(mut self, stop_on_repeat: bool) -> Self {
		self.stop_on_repeat = stop_on_repeat;
		self
	}

	/// Collect command, name and comment for a new alias.
	///
	/// The command is collapsed against existing aliases before the name is
	/// asked for. Invalid names given interactively are re-prompted; names
	/// given in `request` fail immediately.
	pub fn run(&mut self, request: AddRequest) -> Result<NewAlias> {
		let raw = match request.command.as_deref().map(str::trim) {
			Some("") => return Err(missing("command")),
			Some(command) => {
				check_single_line("command", command)?;
				command.to_string()
			}
			None => self.ask_non_empty("Command: ", "command")?,
		};

		let aliases = self.store.alias_map();
		let resolver = Resolver::new(&aliases)
			.with_max_rounds(self.max_rounds)
			.with_stop_on_repeat(self.stop_on_repeat);
		let expansions = ExpansionMap::build(&resolver);
		let command = collapse(&raw, &expansions, self.max_rounds);
		debug!("Collapsed {raw:?} to {command:?}");

		self.say(&format!("Suggested: {command}"))?;
		if aliases.contains(&command) {
			self.say(&format!("Note: this command is already available as {command}"))?;
		}

		let name = match request.name.as_deref() {
			Some(name) => {
				validate_new_name(self.store, name, self.lookup)?;
				name.to_string()
			}
			None => self.ask_name()?,
		};

		let complete = request.is_complete();
		let comment = match request.comment {
			Some(comment) => {
				check_single_line("comment", &comment)?;
				Some(comment)
			}
			None if complete => None,
			None => self.ask_comment()?,
		};
		let comment = comment
			.map(|c| c.trim().to_string())
			.filter(|c| !c.is_empty());

		Ok(NewAlias {
			name,
			command,
			comment,
		})
	}

	fn ask_name(&mut self) -> Result<String> {
		loop {
			let name = self.ask_non_empty("Alias name: ", "alias name")?;
			match validate_new_name(self.store, &name, self.lookup) {
				Ok(()) => return Ok(name),
				Err(e) => self.say(&e.to_string())?,
			}
		}
	}

	fn ask_non_empty(&mut self, prompt: &str, what: &str) -> Result<String> {
		loop {
			match self.ask(prompt)? {
				None => return Err(missing(what)),
				Some(answer) if answer.trim().is_empty() => continue,
				Some(answer) => match check_single_line(what, answer.trim()) {
					Ok(()) => return Ok(answer.trim().to_string()),
					Err(e) => self.say(&e.to_string())?,
				},
			}
		}
	}

	fn ask_comment(&mut self) -> Result<Option<String>> {
		loop {
			let Some(answer) = self.ask("Comment (optional): ")? else {
				return Ok(None);
			};
			match check_single_line("comment", &answer) {
				Ok(()) => return Ok(Some(answer)),
				Err(e) => self.say(&e.to_string())?,
			}
		}
	}

	/// Print `prompt` and read one line; `None` on end of input.
	fn ask(&mut self, prompt: &str) -> Result<Option<String>> {
		write!(self.output, "{prompt}").map_err(prompt_error)?;
		self.output.flush().map_err(prompt_error)?;

		let mut line = String::new();
		let read = self.input.read_line(&mut line).map_err(prompt_error)?;
		if read == 0 {
			writeln!(self.output).map_err(prompt_error)?;
			return Ok(None);
		}
		Ok(Some(line.trim_end_matches(['\n', '\r']).to_string()))
	}

	fn say(&mut self, message: &str) -> Result<()> {
		writeln!(self.output, "{message}").map_err(prompt_error)
	}
}

fn prompt_error(source: std::io::Error) -> ShaliasError {
	ShaliasError::Prompt { source }
}

fn missing(what: &str) -> ShaliasError {
	ShaliasError::MissingInput {
		what: what.to_string(),
	}
}
