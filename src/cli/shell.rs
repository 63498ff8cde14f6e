use std::{
    borrow::Cow,
    fmt,
    io::{self, Lines, StdinLock},
};

use rustyline::{
    completion::{Completer, Pair},
    error::ReadlineError,
    highlight::Highlighter,
    hint::Hinter,
    history::DefaultHistory,
    validate::{ValidationContext, ValidationResult, Validator},
    Cmd, Context as ReadlineContext, Editor, Helper, KeyEvent,
};

use crate::cli::core::{CliMode, LoopControl, ShellContext};
use crate::cli::output::info as output_info;
use crate::errors::CliError;

/// Setting this variable switches the shell to line-per-command stdin mode.
pub const SCRIPT_ENV: &str = "SHIFT_CORE_CLI_SCRIPT";

pub fn run_cli() -> Result<(), CliError> {
    let mode = match std::env::var_os(SCRIPT_ENV) {
        Some(_) => CliMode::Script,
        None => CliMode::Interactive,
    };

    let mut context = ShellContext::new(mode)?;
    let mut source = LineSource::open(&context)?;
    tracing::debug!(?mode, base = %context.base_dir.display(), "shell started");

    if mode == CliMode::Interactive {
        output_info("Type `help` to list commands, `exit` to quit.");
    }

    while context.running {
        let Some(line) = source.next_line(&context)? else {
            break;
        };
        match context.process_line(&line) {
            Ok(LoopControl::Continue) => {}
            Ok(LoopControl::Exit) => context.running = false,
            Err(err) => context.report_error(err)?,
        }
    }

    Ok(())
}

/// Where command lines come from: the line editor for a person at a
/// terminal, raw stdin for piped scripts.
enum LineSource {
    Editor(Box<Editor<CommandHelper, DefaultHistory>>),
    Script(Lines<StdinLock<'static>>),
}

impl LineSource {
    fn open(context: &ShellContext) -> Result<Self, CliError> {
        if context.mode == CliMode::Script {
            return Ok(LineSource::Script(io::stdin().lines()));
        }
        let mut editor = Editor::<CommandHelper, DefaultHistory>::new()?;
        editor.set_helper(Some(CommandHelper::new(context.completions())));
        editor.bind_sequence(KeyEvent::from('?'), Cmd::Complete);
        Ok(LineSource::Editor(Box::new(editor)))
    }

    /// Next non-blank command line, or `None` once input is exhausted or
    /// the operator confirmed leaving the shell.
    fn next_line(&mut self, context: &ShellContext) -> Result<Option<String>, CliError> {
        loop {
            let line = match self {
                LineSource::Script(lines) => match lines.next() {
                    Some(line) => line?,
                    None => return Ok(None),
                },
                LineSource::Editor(editor) => match editor.readline(&context.prompt()) {
                    Ok(line) => {
                        if !line.trim().is_empty() {
                            editor.add_history_entry(line.trim()).ok();
                        }
                        line
                    }
                    Err(ReadlineError::Interrupted) => {
                        if context.confirm_exit()? {
                            return Ok(None);
                        }
                        continue;
                    }
                    Err(ReadlineError::Eof) => {
                        output_info("Exiting shell.");
                        return Ok(None);
                    }
                    Err(err) => return Err(err.into()),
                },
            };

            let trimmed = line.trim();
            // `#` starts a comment line in scripts.
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            return Ok(Some(trimmed.to_string()));
        }
    }
}

/// Completes command names in the first word and that command's
/// subcommands in the second.
struct CommandHelper {
    commands: Vec<(&'static str, &'static [&'static str])>,
}

impl CommandHelper {
    fn new(mut commands: Vec<(&'static str, &'static [&'static str])>) -> Self {
        commands.sort_by_key(|(name, _)| *name);
        commands.dedup_by_key(|(name, _)| *name);
        Self { commands }
    }

    fn candidates(&self, words: &[&str], needle: &str) -> Vec<Pair> {
        let options: Vec<&'static str> = match words {
            [] => self.commands.iter().map(|(name, _)| *name).collect(),
            [command] => {
                let command = command.to_ascii_lowercase();
                self.commands
                    .iter()
                    .find(|(name, _)| *name == command)
                    .map(|(_, actions)| actions.to_vec())
                    .unwrap_or_default()
            }
            _ => Vec::new(),
        };
        let needle = needle.to_ascii_lowercase();
        options
            .into_iter()
            .filter(|option| option.starts_with(&needle))
            .map(|option| Pair {
                display: option.to_string(),
                replacement: option.to_string(),
            })
            .collect()
    }
}

impl Helper for CommandHelper {}

impl Completer for CommandHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &ReadlineContext<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let prefix = &line[..pos];
        let start = prefix
            .rfind(char::is_whitespace)
            .map_or(0, |idx| idx + 1);
        let words: Vec<&str> = prefix[..start].split_whitespace().collect();
        Ok((start, self.candidates(&words, &prefix[start..])))
    }
}

impl Hinter for CommandHelper {
    type Hint = String;
}

impl Highlighter for CommandHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        Cow::Borrowed(line)
    }
}

impl Validator for CommandHelper {
    fn validate(&self, _ctx: &mut ValidationContext) -> rustyline::Result<ValidationResult> {
        Ok(ValidationResult::Valid(None))
    }
}

/// Splits a command line into words, honouring shell-style quoting so
/// session names may contain spaces.
pub(crate) fn parse_command_line(input: &str) -> Result<Vec<String>, ParseError> {
    shell_words::split(input).map_err(|err| ParseError(err.to_string()))
}

#[derive(Debug)]
pub(crate) struct ParseError(String);

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Could not parse command: {}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SESSION: &[&str] = &["info", "new", "save", "load"];
    const SALES: &[&str] = &["show", "set", "add-field", "submit"];
    const SUBMIT: &[&str] = &["sales", "totals", "money", "inhand", "all"];
    const VIEW: &[&str] = &["summary", "snapshot"];

    fn helper() -> CommandHelper {
        CommandHelper::new(vec![
            ("session", SESSION),
            ("sales", SALES),
            ("submit", SUBMIT),
            ("view", VIEW),
        ])
    }

    fn replacements(pairs: Vec<Pair>) -> Vec<String> {
        pairs.into_iter().map(|pair| pair.replacement).collect()
    }

    #[test]
    fn quoted_arguments_stay_together() {
        let tokens = parse_command_line(r#"session new "Friday Night""#).unwrap();
        assert_eq!(tokens, vec!["session", "new", "Friday Night"]);
    }

    #[test]
    fn unbalanced_quotes_are_reported() {
        let err = parse_command_line(r#"session new "Friday"#).unwrap_err();
        assert!(err.to_string().starts_with("Could not parse command"));
    }

    #[test]
    fn first_word_completes_command_names() {
        let names = replacements(helper().candidates(&[], "s"));
        assert_eq!(names, vec!["sales", "session", "submit"]);
    }

    #[test]
    fn second_word_completes_subcommands() {
        let actions = replacements(helper().candidates(&["Sales"], "s"));
        assert_eq!(actions, vec!["show", "set", "submit"]);

        let actions = replacements(helper().candidates(&["view"], ""));
        assert_eq!(actions, vec!["summary", "snapshot"]);
    }

    #[test]
    fn later_words_and_unknown_commands_get_nothing() {
        assert!(helper().candidates(&["session", "new"], "").is_empty());
        assert!(helper().candidates(&["refuel"], "s").is_empty());
    }
}
