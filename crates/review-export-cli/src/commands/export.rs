use super::export_ui::ExportUI;
use crate::output::Output;
use crate::{Context, ExportArgs};
use color_eyre::Result;
use comfy_table::{Cell, Table};
use review_export_config::{Config, PathManager};
use review_export_core::{
    BaiduTranslator, ExportOptions, ExportOrchestrator, ExportSummary, PassthroughTranslator,
    Translator,
};
use review_export_models::Platform;
use review_export_sources::{build_http_client, SourceFactoryRegistry};
use serde_json::json;

/// Load the effective configuration for the given context
pub fn load_config(context: &Context) -> Result<Config> {
    let path_manager = PathManager::default();
    Config::load(context.config_path.as_deref(), &path_manager.config_file())
        .map_err(|e| color_eyre::eyre::eyre!("{}", e))
}

/// Narrow the configuration to what this run will actually use, so that
/// validation does not complain about platforms or translation left out
fn apply_args(config: &mut Config, args: &ExportArgs) -> Vec<Platform> {
    if let Some(path) = &args.output {
        config.output.file_path = path.clone();
    }
    if args.no_translate {
        config.translation = None;
    }

    let selected: Vec<Platform> = args.platform.iter().copied().map(Platform::from).collect();
    if !selected.is_empty() {
        if let Some(ios) = config.ios.as_mut() {
            ios.enabled &= selected.contains(&Platform::Ios);
        }
        if let Some(android) = config.android.as_mut() {
            android.enabled &= selected.contains(&Platform::Android);
        }
    }
    selected
}

fn summary_table(summary: &ExportSummary) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        Cell::new("Platform").add_attribute(comfy_table::Attribute::Bold),
        Cell::new("Reviews").add_attribute(comfy_table::Attribute::Bold),
        Cell::new("With reply").add_attribute(comfy_table::Attribute::Bold),
    ]);
    for platform in &summary.platforms {
        table.add_row(vec![
            Cell::new(platform.platform.sheet_name()),
            Cell::new(platform.reviews),
            Cell::new(platform.with_reply),
        ]);
    }
    table.load_preset(comfy_table::presets::UTF8_FULL);
    table.apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS);
    table
}

pub async fn run_export(args: ExportArgs, context: &Context, output: &Output) -> Result<()> {
    tracing::debug!("Export command started");

    let mut config = load_config(context)?;
    let selected = apply_args(&mut config, &args);

    config
        .validate()
        .map_err(|e| color_eyre::eyre::eyre!("Configuration validation failed: {}", e))?;

    let factory_registry = SourceFactoryRegistry::new();
    factory_registry
        .validate_all_configs(&config)
        .map_err(|e| color_eyre::eyre::eyre!("Configuration validation failed: {}", e))?;

    let client = build_http_client(&config.http)
        .map_err(|e| color_eyre::eyre::eyre!("Failed to create HTTP client: {}", e))?;

    let sources = factory_registry
        .create_sources(&config, &client, &selected)
        .await
        .map_err(|e| color_eyre::eyre::eyre!("Failed to create sources: {}", e))?;

    let (translator, concurrency): (Box<dyn Translator>, usize) = match config.enabled_translation() {
        Some(translation) => (
            Box::new(BaiduTranslator::new(
                client.clone(),
                &translation.app_id,
                &translation.secret_key,
                &translation.target_language,
            )),
            translation.concurrency,
        ),
        None => (Box::new(PassthroughTranslator), 1),
    };

    let ui = ExportUI::new(output.is_quiet() || !output.is_human());
    let orchestrator = ExportOrchestrator::new(
        sources,
        translator,
        ExportOptions {
            output_path: config.output.file_path.clone(),
            translation_concurrency: concurrency,
        },
    )
    .with_progress(ui.handler());

    let result = orchestrator.run().await;
    ui.finish();
    let summary = result.map_err(|e| color_eyre::eyre::eyre!("Export failed: {}", e))?;

    match output.format() {
        crate::output::OutputFormat::Human => {
            output.block(summary_table(&summary));
            output.success(format!(
                "Exported {} reviews to {} in {:.1}s",
                summary.total_reviews(),
                summary.output_path.display(),
                summary.duration.as_secs_f64()
            ));
        }
        crate::output::OutputFormat::Json | crate::output::OutputFormat::JsonPretty => {
            output.json(&json!({
                "success": true,
                "summary": summary,
            }));
        }
    }

    Ok(())
}
