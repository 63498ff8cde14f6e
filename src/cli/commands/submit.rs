use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::registry::CommandEntry;
use crate::core::Feature;
use crate::ledger::Section;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "submit",
        "Copy live forms into the snapshot used by view and export",
        "submit <sales|totals|money|inhand|all>",
        cmd_submit,
    )
    .with_actions(&["sales", "totals", "money", "inhand", "all"])]
}

fn section_feature(section: Section) -> Feature {
    match section {
        Section::SalesManagement => Feature::SalesManagement,
        Section::SalesTotals => Feature::SalesTotals,
        Section::MoneyManagement => Feature::MoneyManagement,
        Section::InHand => Feature::InHandCalculations,
    }
}

fn cmd_submit(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let target = args.first().ok_or_else(|| {
        CommandError::InvalidArguments("usage: submit <sales|totals|money|inhand|all>".into())
    })?;
    let sections: Vec<Section> = if target.eq_ignore_ascii_case("all") {
        Section::ALL
            .into_iter()
            .filter(|section| context.profile().allows(section_feature(*section)))
            .collect()
    } else {
        let section = Section::parse(target).ok_or_else(|| {
            CommandError::InvalidArguments(format!(
                "unknown section `{}`; expected sales, totals, money, inhand, or all",
                target
            ))
        })?;
        context.require_feature("submit", section_feature(section))?;
        vec![section]
    };

    let session = context.session_mut()?;
    for section in &sections {
        match section {
            Section::SalesManagement => session.submit_sales_management(),
            Section::SalesTotals => session.submit_sales_totals(),
            Section::MoneyManagement => session.submit_money_management(),
            Section::InHand => session.submit_in_hand(),
        }
        io::print_success(format!("{} submitted.", section.title()));
    }
    Ok(())
}
