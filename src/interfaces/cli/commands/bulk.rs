//! Bulk command

use colored::Colorize;

use crate::interfaces::cli::CliError;
use crate::runtime::lifetime::startup::StartupContext;
use crate::services::BulkAction;

pub async fn run_bulk(context: &StartupContext, action: &str) -> Result<(), CliError> {
    let action = BulkAction::parse(action)?;
    println!(
        "{} {}",
        "Running bulk action:".yellow(),
        action.as_ref().cyan()
    );

    let result = context.bulk.run(action, "cli").await?;
    println!("{} {}", "✓".bold().green(), result.message);
    Ok(())
}
