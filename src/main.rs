use pipeline_generator::cli::commands::{
    ClarifyCommand, ComponentsCommand, GenerateCommand, RestructureCommand,
};
use pipeline_generator::cli::output::*;
use pipeline_generator::cli::{Cli, Command};
use pipeline_generator::core::config::Settings;
use pipeline_generator::core::{Catalog, CatalogLoader, Component, GenerationMode, JsonCatalogLoader};
use pipeline_generator::execution::{GenerationEngine, GenerationRequest};
use pipeline_generator::oracle::{
    DisabledSearch, HttpLanguageOracle, LanguageOracle, SearchOracle, TavilySearchOracle,
};

use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{warn, Level};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

type Engine = GenerationEngine<Arc<dyn LanguageOracle>, Arc<dyn SearchOracle>>;

#[tokio::main]
async fn main() {
    let cli = Cli::from_args();

    if let Err(e) = run(cli).await {
        eprintln!("{}{}", CROSS, style(format!("{:#}", e)).red());
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    // Initialize logging
    let log_level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::default().add_directive(log_level.into()));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set logging subscriber")?;

    let settings = Settings::load(cli.config.as_deref()).context("Failed to load settings")?;
    let catalog = Arc::new(load_catalog(&cli, &settings)?);

    match &cli.command {
        Command::Generate(cmd) => generate(cmd, &cli, &settings, catalog).await,
        Command::Clarify(cmd) => clarify(cmd, &settings, catalog).await,
        Command::Restructure(cmd) => restructure(cmd, &catalog),
        Command::Components(cmd) => list_components(cmd, &catalog),
    }
}

fn load_catalog(cli: &Cli, settings: &Settings) -> Result<Catalog> {
    match cli.catalog.as_ref().or(settings.catalog_path.as_ref()) {
        Some(path) => JsonCatalogLoader::new(path)
            .load()
            .with_context(|| format!("Failed to load catalog {}", path.display())),
        None => Catalog::builtin().context("Failed to load built-in catalog"),
    }
}

fn build_engine(settings: &Settings, catalog: Arc<Catalog>, mode: GenerationMode) -> Result<Engine> {
    if settings.llm.api_key.is_none() {
        warn!("No LLM API key configured; requests will likely be rejected");
    }
    let llm: Arc<dyn LanguageOracle> =
        Arc::new(HttpLanguageOracle::new(&settings.llm).context("Failed to create LLM client")?);

    let search: Arc<dyn SearchOracle> = match TavilySearchOracle::new(&settings.search) {
        Ok(client) => Arc::new(client),
        Err(e) => {
            if mode == GenerationMode::Agentic {
                warn!(error = %e, "Web search unavailable; research steps will carry no findings");
            }
            Arc::new(DisabledSearch)
        }
    };

    Ok(GenerationEngine::from_settings(llm, search, catalog, settings))
}

async fn generate(
    cmd: &GenerateCommand,
    cli: &Cli,
    settings: &Settings,
    catalog: Arc<Catalog>,
) -> Result<()> {
    let mut engine = build_engine(settings, catalog, cmd.mode)?;

    let mut request = GenerationRequest::new(cmd.prompt.clone(), cmd.mode);
    for (id, answer) in &cmd.answer {
        request = request.with_answer(id.clone(), answer.clone());
    }

    if cli.stream {
        engine.add_event_handler(|event| {
            if let Some(line) = format_generation_event(&event) {
                eprintln!("{}", line);
            }
        });
    }

    let spinner = (!cli.stream && !cmd.json).then(|| create_spinner("Generating pipeline..."));
    let result = engine.generate(&request).await;
    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }
    let result = result.context("Pipeline generation failed")?;

    if cmd.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!("{}", format_pipeline(&result));
    }
    Ok(())
}

async fn clarify(cmd: &ClarifyCommand, settings: &Settings, catalog: Arc<Catalog>) -> Result<()> {
    let engine = build_engine(settings, catalog, GenerationMode::Quick)?;

    let spinner = (!cmd.json).then(|| create_spinner("Preparing questions..."));
    let response = engine.clarify(&cmd.prompt, &cmd.domain).await;
    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }
    let response = response.context("Failed to generate clarification questions")?;

    if cmd.json {
        println!("{}", serde_json::to_string_pretty(&response)?);
    } else {
        println!("{}", format_clarification(&response));
    }
    Ok(())
}

fn resolve_ids(catalog: &Catalog, ids: &[String]) -> Result<Vec<Component>> {
    ids.iter()
        .map(|id| {
            catalog
                .get(id)
                .cloned()
                .with_context(|| format!("Unknown component id '{}'", id))
        })
        .collect()
}

fn restructure(cmd: &RestructureCommand, catalog: &Catalog) -> Result<()> {
    let current = resolve_ids(catalog, &cmd.current)?;
    let new = resolve_ids(catalog, &cmd.new)?;
    let outcome = pipeline_generator::execution::validator::restructure(&current, &new);

    if cmd.json {
        let order: Option<Vec<&str>> = outcome
            .suggested_order()
            .map(|order| order.iter().map(|c| c.id.as_str()).collect());
        let value = serde_json::json!({
            "valid": outcome.valid,
            "message": outcome.message,
            "needs_restructuring": outcome.needs_restructuring,
            "suggested_order": order,
            "notes": outcome.notes,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else {
        println!("{}", format_restructure(&outcome));
    }
    Ok(())
}

fn list_components(cmd: &ComponentsCommand, catalog: &Catalog) -> Result<()> {
    if cmd.json {
        println!("{}", serde_json::to_string_pretty(catalog.components())?);
        return Ok(());
    }

    println!("{}{} components", INFO, style(catalog.len()).bold());
    println!("{}", separator());
    for component in catalog.iter() {
        println!("{}", format_component(component));
    }
    Ok(())
}
