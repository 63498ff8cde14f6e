pub mod fuel;
pub mod in_hand;
pub mod lottery;
pub mod money;
pub mod report;
pub mod sales;
pub mod session;
pub mod settings;
pub mod submit;
pub mod system;

use crate::cli::core::{CommandError, ShellContext};
use crate::cli::output::{line, section};
use crate::cli::registry::{CommandEntry, CommandRegistry};
use crate::core::ReconciliationSession;
use crate::ledger::form_label;

pub(crate) fn all_definitions() -> Vec<CommandEntry> {
    let mut commands = Vec::new();
    commands.extend(session::definitions());
    commands.extend(lottery::definitions());
    commands.extend(fuel::definitions());
    commands.extend(sales::definitions());
    commands.extend(money::definitions());
    commands.extend(in_hand::definitions());
    commands.extend(submit::definitions());
    commands.extend(report::definitions());
    commands.extend(settings::definitions());
    commands.extend(system::definitions());
    commands
}

pub(crate) fn register_all(registry: &mut CommandRegistry) {
    for entry in all_definitions() {
        registry.register(entry);
    }
}

/// Splits `key=value` arguments. Values may be empty to blank a field.
pub(crate) fn parse_assignments<'a>(
    args: &[&'a str],
) -> Result<Vec<(&'a str, &'a str)>, CommandError> {
    args.iter()
        .map(|arg| {
            arg.split_once('=')
                .map(|(key, value)| (key.trim(), value.trim()))
                .filter(|(key, _)| !key.is_empty())
                .ok_or_else(|| {
                    CommandError::InvalidArguments(format!(
                        "expected field=value, got `{}`",
                        arg
                    ))
                })
        })
        .collect()
}

/// Matches `input` against known field keys. An exact match wins over one
/// that only agrees ignoring case.
pub(crate) fn resolve_field<'k>(
    known: impl IntoIterator<Item = &'k str>,
    input: &str,
) -> Option<&'k str> {
    let mut folded = None;
    for key in known {
        if key == input {
            return Some(key);
        }
        if folded.is_none() && key.eq_ignore_ascii_case(input) {
            folded = Some(key);
        }
    }
    folded
}

/// Validates every assignment against `known`, then applies them all.
/// Returns how many fields changed.
pub(crate) fn apply_assignments<F>(
    context: &mut ShellContext,
    args: &[&str],
    known: &[String],
    mut apply: F,
) -> Result<usize, CommandError>
where
    F: FnMut(&mut ReconciliationSession, &str, &str) -> bool,
{
    let assignments = parse_assignments(args)?;
    if assignments.is_empty() {
        return Err(CommandError::InvalidArguments(
            "expected at least one field=value".into(),
        ));
    }

    let mut resolved = Vec::with_capacity(assignments.len());
    for (key, value) in assignments {
        let field = resolve_field(known.iter().map(String::as_str), key).ok_or_else(|| {
            CommandError::InvalidArguments(format!(
                "unknown field `{}`. Known fields: {}",
                key,
                known.join(", ")
            ))
        })?;
        resolved.push((field, value));
    }

    let session = context.session_mut()?;
    let mut changed = 0;
    for (field, value) in resolved {
        if apply(session, field, value) {
            changed += 1;
        }
    }
    Ok(changed)
}

pub(crate) fn known_fields(fields: &[&str]) -> Vec<String> {
    fields.iter().map(|field| field.to_string()).collect()
}

/// Prints a titled listing: form label, the key to type, then the value.
pub(crate) fn print_fields<'a, 'b>(
    title: &str,
    entries: impl IntoIterator<Item = (&'a str, &'b str)>,
) {
    section(title);
    for (key, value) in entries {
        let shown = if value.is_empty() { "-" } else { value };
        line(format!("  {:<24} {:<22} {}", form_label(key), key, shown));
    }
}

/// Lowercased first argument and the rest.
pub(crate) fn subcommand<'s, 'a>(args: &'s [&'a str]) -> (String, &'s [&'a str]) {
    match args.split_first() {
        Some((head, rest)) => (head.to_lowercase(), rest),
        None => (String::new(), &[]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assignments_split_on_first_equals() {
        let parsed = parse_assignments(&["cash=12", "note=a=b", "ebt="]).unwrap();
        assert_eq!(parsed, vec![("cash", "12"), ("note", "a=b"), ("ebt", "")]);
    }

    #[test]
    fn bare_words_are_rejected() {
        assert!(matches!(
            parse_assignments(&["cash"]),
            Err(CommandError::InvalidArguments(_))
        ));
        assert!(parse_assignments(&["=5"]).is_err());
    }

    #[test]
    fn field_lookup_ignores_case() {
        let known = ["cashToATM", "ebt"];
        assert_eq!(resolve_field(known, "cashtoatm"), Some("cashToATM"));
        assert_eq!(resolve_field(known, "atm"), None);
    }

    #[test]
    fn exact_field_match_beats_case_folded_one() {
        let known = ["cashIn", "cashin"];
        assert_eq!(resolve_field(known, "cashin"), Some("cashin"));
        assert_eq!(resolve_field(known, "cashIn"), Some("cashIn"));
        assert_eq!(resolve_field(known, "CASHIN"), Some("cashIn"));
    }
}
