//! List presets command

use colored::Colorize;

use crate::interfaces::cli::CliError;
use crate::runtime::lifetime::startup::StartupContext;

pub async fn list_presets(context: &StartupContext, json: bool) -> Result<(), CliError> {
    let presets = context.presets.list().await?;

    if json {
        let output = serde_json::to_string_pretty(&presets)
            .map_err(|e| CliError::CommandError(e.to_string()))?;
        println!("{}", output);
        return Ok(());
    }

    if presets.is_empty() {
        println!("{} No presets found", "ℹ".bold().blue());
        return Ok(());
    }

    println!("{}", "Presets:".bold().green());
    for (id, preset) in &presets {
        let fields = &preset.fields;
        let parts: Vec<String> = [
            ("source", &fields.utm_source),
            ("medium", &fields.utm_medium),
            ("campaign", &fields.utm_campaign),
            ("content", &fields.utm_content),
            ("term", &fields.utm_term),
        ]
        .into_iter()
        .filter_map(|(label, value)| value.as_ref().map(|v| format!("{}={}", label, v)))
        .collect();

        println!(
            "  {} {} {}",
            id.cyan(),
            preset.name.as_deref().unwrap_or("").bold(),
            parts.join(" ").dimmed()
        );
    }
    println!();
    println!(
        "{} Total {} presets",
        "ℹ".bold().blue(),
        presets.len().to_string().green()
    );
    Ok(())
}
