use std::collections::HashMap;

use crate::cli::core::{CommandResult, ShellContext};
use crate::core::Feature;

pub type CommandHandler = fn(&mut ShellContext, &[&str]) -> CommandResult;

pub struct CommandEntry {
    pub name: &'static str,
    pub description: &'static str,
    pub usage: &'static str,
    pub handler: CommandHandler,
    /// Feature the active profile must have to run this command.
    pub feature: Option<Feature>,
    /// Subcommands offered by tab completion.
    pub actions: &'static [&'static str],
}

impl CommandEntry {
    pub const fn new(
        name: &'static str,
        description: &'static str,
        usage: &'static str,
        handler: CommandHandler,
    ) -> Self {
        Self {
            name,
            description,
            usage,
            handler,
            feature: None,
            actions: &[],
        }
    }

    pub const fn gated(mut self, feature: Feature) -> Self {
        self.feature = Some(feature);
        self
    }

    pub const fn with_actions(mut self, actions: &'static [&'static str]) -> Self {
        self.actions = actions;
        self
    }
}

pub struct CommandRegistry {
    commands: HashMap<&'static str, CommandEntry>,
    order: Vec<&'static str>,
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self {
            commands: HashMap::new(),
            order: Vec::new(),
        }
    }

    pub fn register(&mut self, entry: CommandEntry) {
        let name = entry.name;
        if self.commands.insert(name, entry).is_none() {
            self.order.push(name);
        }
    }

    pub fn get(&self, name: &str) -> Option<&CommandEntry> {
        self.commands.get(name)
    }

    pub fn list(&self) -> Vec<&CommandEntry> {
        self.order
            .iter()
            .filter_map(|name| self.commands.get(name))
            .collect()
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.order.iter().copied()
    }

    /// Command names paired with their subcommands, in registration order.
    pub fn completions(&self) -> Vec<(&'static str, &'static [&'static str])> {
        self.list()
            .into_iter()
            .map(|entry| (entry.name, entry.actions))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::commands;

    #[test]
    fn every_subcommand_table_is_registered_once() {
        let mut registry = CommandRegistry::new();
        commands::register_all(&mut registry);
        let completions = registry.completions();
        assert_eq!(completions.len(), registry.list().len());

        let (_, lottery) = completions
            .iter()
            .find(|(name, _)| *name == "lottery")
            .unwrap();
        assert!(lottery.contains(&"add-denomination"));
        assert_eq!(
            registry.get("lottery").and_then(|entry| entry.feature),
            Some(Feature::LotteryManagement)
        );
        assert!(registry.get("exit").unwrap().actions.is_empty());
    }
}
