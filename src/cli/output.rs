//! Labelled, optionally coloured terminal output for the shell.

use std::fmt;
use std::sync::RwLock;

use colored::{Color, Colorize};
use once_cell::sync::Lazy;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MessageKind {
    Info,
    Success,
    Warning,
    Error,
    Hint,
    Section,
}

impl MessageKind {
    /// Text prefix printed ahead of the message; sections are framed instead.
    fn tag(self) -> Option<&'static str> {
        match self {
            MessageKind::Info => Some("INFO: [i]"),
            MessageKind::Success => Some("SUCCESS: [+]"),
            MessageKind::Warning => Some("WARNING: [!]"),
            MessageKind::Error => Some("ERROR: [x]"),
            MessageKind::Hint => Some("HINT: [?]"),
            MessageKind::Section => None,
        }
    }

    fn color(self) -> Option<Color> {
        match self {
            MessageKind::Success => Some(Color::BrightGreen),
            MessageKind::Warning => Some(Color::BrightYellow),
            MessageKind::Error => Some(Color::BrightRed),
            MessageKind::Hint => Some(Color::BrightCyan),
            MessageKind::Info | MessageKind::Section => None,
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct OutputPreferences {
    pub color_enabled: bool,
}

impl Default for OutputPreferences {
    fn default() -> Self {
        Self {
            color_enabled: true,
        }
    }
}

static PREFERENCES: Lazy<RwLock<OutputPreferences>> =
    Lazy::new(|| RwLock::new(OutputPreferences::default()));

pub fn set_preferences(prefs: OutputPreferences) {
    if let Ok(mut current) = PREFERENCES.write() {
        *current = prefs;
    }
    colored::control::set_override(prefs.color_enabled);
}

fn color_enabled() -> bool {
    PREFERENCES
        .read()
        .map(|prefs| prefs.color_enabled)
        .unwrap_or(false)
}

fn render(kind: MessageKind, message: impl fmt::Display, color: bool) -> String {
    let text = match kind.tag() {
        Some(tag) => format!("{tag} {message}"),
        None => format!("=== {} ===", message.to_string().trim()),
    };
    if !color {
        return text;
    }
    match (kind, kind.color()) {
        (MessageKind::Section, _) => text.bold().to_string(),
        (_, Some(color)) => text.color(color).to_string(),
        (_, None) => text,
    }
}

pub fn print(kind: MessageKind, message: impl fmt::Display) {
    let text = render(kind, message, color_enabled());
    if kind == MessageKind::Section {
        println!();
    }
    println!("{text}");
}

pub fn info(message: impl fmt::Display) {
    print(MessageKind::Info, message);
}

pub fn success(message: impl fmt::Display) {
    print(MessageKind::Success, message);
}

pub fn warning(message: impl fmt::Display) {
    print(MessageKind::Warning, message);
}

pub fn error(message: impl fmt::Display) {
    print(MessageKind::Error, message);
}

pub fn hint(message: impl fmt::Display) {
    print(MessageKind::Hint, message);
}

pub fn section(title: impl fmt::Display) {
    print(MessageKind::Section, title);
}

/// Unlabelled line for tables and field listings.
pub fn line(text: impl fmt::Display) {
    println!("{text}");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_rendering_keeps_tags() {
        assert_eq!(
            render(MessageKind::Warning, "careful", false),
            "WARNING: [!] careful"
        );
        assert_eq!(render(MessageKind::Hint, "try help", false), "HINT: [?] try help");
    }

    #[test]
    fn sections_are_framed_and_trimmed() {
        assert_eq!(
            render(MessageKind::Section, " Lottery ", false),
            "=== Lottery ==="
        );
    }
}
