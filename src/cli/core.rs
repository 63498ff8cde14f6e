//! Shell context, dispatch, and error reporting.

use std::{io, path::PathBuf};

use chrono::Local;
use dialoguer::theme::ColorfulTheme;
use strsim::levenshtein;

use crate::{
    config::{Config, ConfigManager},
    core::{Feature, Profile, ReconciliationSession, SessionManager},
    errors::{CliError, ShiftError},
    storage::JsonStorage,
    utils::PathResolver,
};

use super::commands;
use super::help;
use super::io as cli_io;
use super::registry::{CommandEntry, CommandRegistry};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoopControl {
    Continue,
    Exit,
}

pub type CommandResult = Result<(), CommandError>;

pub struct ShellContext {
    pub mode: CliMode,
    pub registry: CommandRegistry,
    pub manager: SessionManager,
    pub config_manager: ConfigManager,
    pub config: Config,
    pub base_dir: PathBuf,
    pub theme: ColorfulTheme,
    pub running: bool,
}

impl ShellContext {
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        Self::with_base_dir(mode, PathResolver::base_dir())
    }

    pub fn with_base_dir(mode: CliMode, base_dir: PathBuf) -> Result<Self, CliError> {
        let mut registry = CommandRegistry::new();
        commands::register_all(&mut registry);

        let config_manager = ConfigManager::with_base_dir(base_dir.clone())?;
        let config = config_manager.load()?;
        cli_io::apply_config(&config, mode == CliMode::Script);

        let storage = JsonStorage::new(Some(base_dir.clone()), Some(config.backup_retention))?;
        let manager = SessionManager::new(Box::new(storage));

        let mut app = ShellContext {
            mode,
            registry,
            manager,
            config_manager,
            config,
            base_dir,
            theme: ColorfulTheme::default(),
            running: true,
        };
        app.open_initial_session();
        Ok(app)
    }

    /// Reopens the last session in interactive mode, otherwise starts a fresh one.
    fn open_initial_session(&mut self) {
        if self.mode == CliMode::Interactive {
            let last = self
                .config
                .last_opened_session
                .clone()
                .or_else(|| self.manager.last_opened().ok().flatten());
            if let Some(name) = last {
                match self.manager.load(&name) {
                    Ok(_) => {
                        cli_io::print_success(format!(
                            "Automatically loaded last session `{}`.",
                            name
                        ));
                        return;
                    }
                    Err(err) => {
                        tracing::warn!(session = %name, error = %err, "could not reopen last session")
                    }
                }
            }
        }
        let name = format!("Shift {}", Local::now().format("%Y-%m-%d"));
        self.manager.create(&name);
    }

    pub(crate) fn prompt(&self) -> String {
        let name = self
            .manager
            .current
            .as_ref()
            .map(|session| session.name.as_str())
            .unwrap_or("no session");
        format!("shift [{} | {}]> ", name, self.config.profile)
    }

    pub(crate) fn completions(&self) -> Vec<(&'static str, &'static [&'static str])> {
        self.registry.completions()
    }

    pub(crate) fn command(&self, name: &str) -> Option<&CommandEntry> {
        self.registry.get(name)
    }

    pub fn profile(&self) -> Profile {
        self.config.profile
    }

    pub(crate) fn session(&self) -> Result<&ReconciliationSession, CommandError> {
        self.manager.current.as_ref().ok_or(CommandError::SessionNotLoaded)
    }

    pub(crate) fn session_mut(&mut self) -> Result<&mut ReconciliationSession, CommandError> {
        self.manager.current.as_mut().ok_or(CommandError::SessionNotLoaded)
    }

    pub(crate) fn require_feature(&self, command: &str, feature: Feature) -> CommandResult {
        let profile = self.profile();
        if profile.allows(feature) {
            Ok(())
        } else {
            Err(CommandError::FeatureNotPermitted {
                command: command.to_string(),
                feature,
                profile,
            })
        }
    }

    pub(crate) fn persist_config(&self) -> CommandResult {
        self.config_manager
            .save(&self.config)
            .map_err(CommandError::from)
    }

    pub(crate) fn remember_session(&mut self, name: Option<&str>) -> CommandResult {
        self.config.last_opened_session = name.map(str::to_string);
        self.persist_config()
    }

    /// Asks before a destructive action. Scripts always proceed.
    pub(crate) fn confirm(&self, prompt: &str) -> Result<bool, CommandError> {
        if self.mode == CliMode::Script {
            return Ok(true);
        }
        cli_io::confirm_action(&self.theme, prompt, false)
    }

    pub(crate) fn dispatch(
        &mut self,
        command: &str,
        raw: &str,
        args: &[&str],
    ) -> Result<LoopControl, CommandError> {
        let Some(entry) = self.registry.get(command) else {
            self.suggest_command(raw);
            return Ok(LoopControl::Continue);
        };
        let handler = entry.handler;
        if let Some(feature) = entry.feature {
            self.require_feature(entry.name, feature)?;
        }
        match handler(self, args) {
            Ok(()) => Ok(LoopControl::Continue),
            Err(CommandError::ExitRequested) => Ok(LoopControl::Exit),
            Err(err) => Err(err),
        }
    }

    pub(crate) fn process_line(&mut self, line: &str) -> Result<LoopControl, CommandError> {
        let tokens = match super::shell::parse_command_line(line) {
            Ok(tokens) => tokens,
            Err(err) => {
                cli_io::print_warning(err);
                return Ok(LoopControl::Continue);
            }
        };
        let Some(raw) = tokens.first() else {
            return Ok(LoopControl::Continue);
        };
        let command = raw.to_lowercase();
        let args: Vec<&str> = tokens.iter().skip(1).map(String::as_str).collect();
        self.dispatch(&command, raw, &args)
    }

    pub(crate) fn suggest_command(&self, input: &str) {
        cli_io::print_warning(format!(
            "Unknown command `{}`. Type `help` to see available commands.",
            input
        ));

        let needle = input.to_lowercase();
        let best = self
            .registry
            .names()
            .map(|key| (levenshtein(key, &needle), key))
            .min_by_key(|(distance, _)| *distance);

        if let Some((distance, best)) = best {
            if distance <= 3 {
                cli_io::print_info(format!("Suggestion: `{}`?", best));
            }
        }
    }

    pub(crate) fn confirm_exit(&self) -> Result<bool, CliError> {
        if self.mode == CliMode::Script {
            return Ok(true);
        }
        cli_io::confirm_action(&self.theme, "Exit shell?", true).map_err(CliError::from)
    }

    pub(crate) fn report_error(&self, err: CommandError) -> Result<(), CliError> {
        match err {
            CommandError::ExitRequested => Ok(()),
            CommandError::InvalidArguments(message) => {
                cli_io::print_error(&message);
                cli_io::print_hint("Use `help <command>` for usage details.");
                Ok(())
            }
            CommandError::SessionNotLoaded | CommandError::Core(ShiftError::SessionNotLoaded) => {
                cli_io::print_error("No shift session is open.");
                cli_io::print_hint("Try `session new Monday` to get started.");
                Ok(())
            }
            CommandError::FeatureNotPermitted { .. } => {
                cli_io::print_error(err.to_string());
                cli_io::print_hint("Switch with `profile use manager`.");
                Ok(())
            }
            other => {
                cli_io::print_error(other.to_string());
                Ok(())
            }
        }
    }

    pub(crate) fn print_help(&self, topic: Option<&str>) {
        match topic {
            Some(name) => match self.command(&name.to_lowercase()) {
                Some(entry) => help::print_command(entry),
                None => self.suggest_command(name),
            },
            None => help::print_overview(&self.registry, self.profile()),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("No shift session is open. Use `session new <name>` or `session load <name>` first.")]
    SessionNotLoaded,
    #[error("{0}")]
    InvalidArguments(String),
    #[error("`{command}` needs {feature}, which the {profile} profile does not have")]
    FeatureNotPermitted {
        command: String,
        feature: Feature,
        profile: Profile,
    },
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serde(#[from] serde_json::Error),
    #[error(transparent)]
    Core(#[from] ShiftError),
    #[error(transparent)]
    Dialoguer(#[from] dialoguer::Error),
    #[error("exit requested")]
    ExitRequested,
}

impl From<CliError> for CommandError {
    fn from(err: CliError) -> Self {
        match err {
            CliError::Core(inner) => CommandError::Core(inner),
            CliError::Input(message) | CliError::Command(message) => {
                CommandError::InvalidArguments(message)
            }
        }
    }
}

impl From<CommandError> for CliError {
    fn from(err: CommandError) -> Self {
        CliError::Command(err.to_string())
    }
}

/// Runs `lines` through a script-mode shell rooted at `base_dir`.
#[cfg(test)]
pub(crate) fn process_script(base_dir: &std::path::Path, lines: &[&str]) -> Result<ShellContext, CliError> {
    let mut app = ShellContext::with_base_dir(CliMode::Script, base_dir.to_path_buf())?;
    for line in lines {
        match app.process_line(line)? {
            LoopControl::Continue => {}
            LoopControl::Exit => break,
        }
    }
    Ok(app)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::{FuelKind, Section};
    use tempfile::TempDir;

    #[test]
    fn script_starts_with_a_fresh_session() {
        let temp = TempDir::new().unwrap();
        let app = process_script(temp.path(), &[]).unwrap();
        let session = app.session().unwrap();
        assert!(session.name.starts_with("Shift "));
        assert!(session.lottery_ledger().is_empty());
    }

    #[test]
    fn commands_update_the_live_session() {
        let temp = TempDir::new().unwrap();
        let app = process_script(
            temp.path(),
            &[
                "lottery record $2 1510 100 130",
                "fuel record gas 3 14 openingStock=500 todaySale=120",
                "sales set gasSales=100 PAIDIN=4",
                "totals set lotto=3",
                "money set cashToATM=20",
                "inhand cash cashOnHand=100 cashFromStore=50 cashToBank=30 extraCash=20",
                "submit all",
            ],
        )
        .unwrap();

        let session = app.session().unwrap();
        assert_eq!(session.lottery_subtotal(), 240.0);
        let reading = session
            .fuel_ledger()
            .reading(FuelKind::Gas, 3, 14)
            .expect("gas reading");
        assert_eq!(reading.today_total_display(), "380.00");
        assert_eq!(session.sales_management().get("paidIn"), Some("4"));
        assert_eq!(session.in_hand().cash.balance_display(), "100.00");

        let snapshot = session.snapshot();
        assert!(Section::ALL.iter().all(|section| snapshot.is_submitted(*section)));
        assert_eq!(snapshot.sales_totals.totals.get("lottoTotal"), Some(&243.0));
        assert_eq!(snapshot.in_hand.cash.value("cashBalance"), Some("100.00"));
    }

    #[test]
    fn unknown_fields_leave_the_form_untouched() {
        let temp = TempDir::new().unwrap();
        let mut app = process_script(temp.path(), &[]).unwrap();
        let err = app
            .process_line("money set cash=5 tips=3")
            .expect_err("unknown field");
        assert!(matches!(err, CommandError::InvalidArguments(ref msg) if msg.contains("tips")));
        assert_eq!(app.session().unwrap().money_management().cash, "");
    }

    #[test]
    fn custom_field_cannot_shadow_a_base_field_by_case() {
        let temp = TempDir::new().unwrap();
        let app = process_script(
            temp.path(),
            &[
                "sales add-field Cashin",
                "sales set cashin=5",
                "sales add-field Propane",
                "sales set propane=7",
            ],
        )
        .unwrap();
        let sales = app.session().unwrap().sales_management();
        assert_eq!(sales.get("cashIn"), Some("5"));
        assert_eq!(sales.get("cashin"), None);
        assert_eq!(sales.get("propane"), Some("7"));
    }

    #[test]
    fn clerk_profile_cannot_touch_lottery_or_fuel() {
        let temp = TempDir::new().unwrap();
        let mut app = process_script(temp.path(), &["profile use clerk"]).unwrap();
        let err = app
            .process_line("lottery record $5 1514 10 40")
            .expect_err("clerk lacks lottery");
        assert!(matches!(
            err,
            CommandError::FeatureNotPermitted {
                feature: Feature::LotteryManagement,
                profile: Profile::Clerk,
                ..
            }
        ));
        assert!(app.session().unwrap().lottery_ledger().is_empty());

        assert!(app.process_line("money set cash=12").is_ok());
        assert!(matches!(
            app.process_line("fuel show gas"),
            Err(CommandError::FeatureNotPermitted { .. })
        ));

        let reloaded = ShellContext::with_base_dir(CliMode::Script, temp.path().to_path_buf()).unwrap();
        assert_eq!(reloaded.profile(), Profile::Clerk);
    }

    #[test]
    fn exit_stops_processing() {
        let temp = TempDir::new().unwrap();
        let app = process_script(temp.path(), &["exit", "money set cash=9"]).unwrap();
        assert_eq!(app.session().unwrap().money_management().cash, "");
    }

    #[test]
    fn save_and_load_through_the_shell() {
        let temp = TempDir::new().unwrap();
        process_script(
            temp.path(),
            &["session new Friday", "money set ebt=7", "session save friday"],
        )
        .unwrap();

        let app = process_script(temp.path(), &["session load friday"]).unwrap();
        let session = app.session().unwrap();
        assert_eq!(session.name, "Friday");
        assert_eq!(session.money_management().ebt, "7");
        assert_eq!(app.config.last_opened_session.as_deref(), Some("friday"));
    }

    #[test]
    fn export_writes_into_configured_directory() {
        let temp = TempDir::new().unwrap();
        let out = temp.path().join("out");
        let line = format!("config set export_dir {}", out.display());
        process_script(temp.path(), &[line.as_str(), "export"]).unwrap();
        assert!(out.join(crate::export::DEFAULT_FILE_NAME).exists());
    }

    #[test]
    fn unknown_commands_are_not_errors() {
        let temp = TempDir::new().unwrap();
        let mut app = process_script(temp.path(), &[]).unwrap();
        assert_eq!(app.process_line("lotery").unwrap(), LoopControl::Continue);
        assert_eq!(app.process_line("   ").unwrap(), LoopControl::Continue);
    }
}
