use super::export::load_config;
use crate::output::{Output, OutputFormat};
use crate::{ConfigCommands, Context};
use color_eyre::Result;
use comfy_table::{Cell, Table};
use owo_colors::OwoColorize;
use review_export_config::{Config, PathManager};
use review_export_sources::SourceFactoryRegistry;
use serde_json::json;
use std::path::PathBuf;

pub async fn run_config(cmd: ConfigCommands, context: &Context, output: &Output) -> Result<()> {
    match cmd {
        ConfigCommands::Show { full } => show_config(full, context, output),
        ConfigCommands::Check => check_config(context, output),
    }
}

fn config_location(context: &Context) -> PathBuf {
    context
        .config_path
        .clone()
        .unwrap_or_else(|| PathManager::default().config_file())
}

fn mask_string(s: &str) -> String {
    if s.is_empty() {
        return "<not set>".to_string();
    }
    let chars: Vec<char> = s.chars().collect();
    if chars.len() <= 4 {
        return "*".repeat(chars.len());
    }
    let head: String = chars[..2].iter().collect();
    let tail: String = chars[chars.len() - 2..].iter().collect();
    format!("{}***{}", head, tail)
}

/// Copy of the configuration with secrets masked
fn masked(config: &Config) -> Config {
    let mut config = config.clone();
    if let Some(ios) = config.ios.as_mut() {
        ios.private_key = ios.private_key.as_deref().map(|_| "<inline key>".to_string());
    }
    if let Some(android) = config.android.as_mut() {
        android.private_key = if android.private_key.is_empty() {
            mask_string("")
        } else {
            "<inline key>".to_string()
        };
    }
    if let Some(translation) = config.translation.as_mut() {
        translation.secret_key = mask_string(&translation.secret_key);
    }
    config
}

fn enabled_cell(enabled: bool) -> Cell {
    Cell::new(if enabled {
        "✓".green().to_string()
    } else {
        "✗".red().to_string()
    })
}

fn section_table(title: &str) -> Table {
    let mut table = Table::new();
    table.set_header(vec![Cell::new(title)
        .fg(comfy_table::Color::Cyan)
        .add_attribute(comfy_table::Attribute::Bold)]);
    table.load_preset(comfy_table::presets::UTF8_FULL);
    table.apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS);
    table
}

fn optional_path(path: &Option<PathBuf>) -> String {
    path.as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "<not set>".to_string())
}

fn show_config(full: bool, context: &Context, output: &Output) -> Result<()> {
    let location = config_location(context);
    let config = load_config(context)?;
    let shown = if full { config } else { masked(&config) };

    if output.format() != OutputFormat::Human {
        output.json(&json!({
            "config_file": location.display().to_string(),
            "config_file_exists": location.exists(),
            "config": shown,
        }));
        return Ok(());
    }
    if output.is_quiet() {
        return Ok(());
    }

    let mut info_table = Table::new();
    info_table.set_header(vec![
        Cell::new("Config File").add_attribute(comfy_table::Attribute::Bold),
        Cell::new(location.display().to_string()),
    ]);
    info_table.load_preset(comfy_table::presets::UTF8_FULL);
    info_table.apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS);
    output.block(&info_table);
    if !location.exists() {
        output.warn("Configuration file not found; showing defaults and environment overrides");
    }

    match &shown.ios {
        Some(ios) => {
            let mut table = section_table("iOS (App Store Connect)");
            table.add_row(vec![Cell::new("Enabled"), enabled_cell(ios.enabled)]);
            table.add_row(vec![Cell::new("Issuer ID"), Cell::new(mask_or_full(&ios.issuer_id, full))]);
            table.add_row(vec![Cell::new("Key ID"), Cell::new(&ios.key_id)]);
            table.add_row(vec![Cell::new("Private Key File"), Cell::new(optional_path(&ios.private_key_path))]);
            if let Some(inline) = &ios.private_key {
                table.add_row(vec![Cell::new("Private Key"), Cell::new(inline)]);
            }
            table.add_row(vec![Cell::new("App ID"), Cell::new(&ios.app_id)]);
            if let Some(name) = &ios.app_name {
                table.add_row(vec![Cell::new("App Name"), Cell::new(name)]);
            }
            table.add_row(vec![Cell::new("Max Results"), Cell::new(ios.max_results)]);
            output.block(&table);
        }
        None => output.block("iOS: Not configured".bright_black()),
    }

    match &shown.android {
        Some(android) => {
            let mut table = section_table("Android (Google Play)");
            table.add_row(vec![Cell::new("Enabled"), enabled_cell(android.enabled)]);
            table.add_row(vec![Cell::new("Package Name"), Cell::new(&android.package_name)]);
            match &android.service_account_file {
                Some(path) => {
                    table.add_row(vec![Cell::new("Service Account File"), Cell::new(path.display())]);
                }
                None => {
                    table.add_row(vec![Cell::new("Client Email"), Cell::new(&android.client_email)]);
                    table.add_row(vec![Cell::new("Private Key"), Cell::new(&android.private_key)]);
                }
            }
            table.add_row(vec![Cell::new("Max Results"), Cell::new(android.max_results)]);
            output.block(&table);
        }
        None => output.block("Android: Not configured".bright_black()),
    }

    match &shown.translation {
        Some(translation) => {
            let mut table = section_table("Translation (Baidu)");
            table.add_row(vec![Cell::new("Enabled"), enabled_cell(translation.enabled)]);
            table.add_row(vec![Cell::new("App ID"), Cell::new(&translation.app_id)]);
            table.add_row(vec![Cell::new("Secret Key"), Cell::new(&translation.secret_key)]);
            table.add_row(vec![Cell::new("Target Language"), Cell::new(&translation.target_language)]);
            table.add_row(vec![Cell::new("Concurrency"), Cell::new(translation.concurrency)]);
            output.block(&table);
        }
        None => output.block("Translation: Disabled".bright_black()),
    }

    let mut table = section_table("Output");
    table.add_row(vec![Cell::new("Workbook"), Cell::new(shown.output.file_path.display())]);
    table.add_row(vec![
        Cell::new("HTTP Timeout"),
        Cell::new(format!("{}s", shown.http.timeout_seconds)),
    ]);
    output.block(&table);

    Ok(())
}

fn mask_or_full(value: &str, full: bool) -> String {
    if full {
        value.to_string()
    } else {
        mask_string(value)
    }
}

/// Every problem that would stop an export, without contacting any provider
fn collect_problems(config: &Config) -> Vec<String> {
    let mut problems = Vec::new();

    if let Err(e) = config.validate() {
        problems.push(e.to_string());
    }
    if let Err(e) = SourceFactoryRegistry::new().validate_all_configs(config) {
        let message = e.to_string();
        if !problems.contains(&message) {
            problems.push(message);
        }
    }

    if let Some(path) = config.enabled_ios().and_then(|ios| ios.private_key_path.as_ref()) {
        if !path.exists() {
            problems.push(format!("iOS private key file not found: {}", path.display()));
        }
    }
    if let Some(path) = config
        .enabled_android()
        .and_then(|android| android.service_account_file.as_ref())
    {
        if !path.exists() {
            problems.push(format!("Service account file not found: {}", path.display()));
        }
    }

    problems
}

fn check_config(context: &Context, output: &Output) -> Result<()> {
    let location = config_location(context);
    let config = load_config(context)?;
    let problems = collect_problems(&config);

    let platforms: Vec<&str> = [
        config.enabled_ios().map(|_| "iOS"),
        config.enabled_android().map(|_| "Android"),
    ]
    .into_iter()
    .flatten()
    .collect();

    if output.format() != OutputFormat::Human {
        output.json(&json!({
            "config_file": location.display().to_string(),
            "valid": problems.is_empty(),
            "platforms": platforms,
            "translation": config.enabled_translation().is_some(),
            "problems": problems,
        }));
    } else if problems.is_empty() {
        output.success(format!(
            "Configuration is valid ({}; translation {})",
            platforms.join(", "),
            if config.enabled_translation().is_some() { "on" } else { "off" }
        ));
    } else {
        for problem in &problems {
            output.error(problem);
        }
    }

    if problems.is_empty() {
        Ok(())
    } else {
        Err(color_eyre::eyre::eyre!(
            "Configuration check found {} problem(s)",
            problems.len()
        ))
    }
}
