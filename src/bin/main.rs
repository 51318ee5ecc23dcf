use anyhow::{bail, Context};
use blend_core::config::EngineConfig;
use blend_core::core::fusion::FusionEngine;
use blend_core::core::syllable::ItalianSyllabifier;
use blend_core::{BlendEngine, Outcome};
use clap::{Args, Parser, Subcommand};
use crossterm::style::Stylize;
use std::io::{stdin, stdout, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

const DEFAULT_CONFIG_PATH: &str = "blend.toml";

#[derive(Parser)]
#[command(name = "blend", version, about = "Portmanteau wordplay over a category dataset")]
struct Cli {
    /// TOML config file (defaults to ./blend.toml when present)
    #[arg(short, long, global = true, env = "BLEND_CONFIG")]
    config: Option<PathBuf>,

    #[command(flatten)]
    data: DataArgs,

    /// Debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct DataArgs {
    /// Category dataset CSV
    #[arg(long, global = true, env = "BLEND_DATASET")]
    dataset: Option<PathBuf>,

    /// Curated blends CSV
    #[arg(long, global = true)]
    overrides: Option<PathBuf>,

    /// Lemma table TSV
    #[arg(long, global = true)]
    lemmas: Option<PathBuf>,

    /// Word vectors, word2vec text format
    #[arg(long, global = true)]
    embeddings: Option<PathBuf>,

    /// Scan candidates in parallel
    #[arg(long, global = true)]
    parallel: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Blend one prompt: "<category> <theme...>"
    Generate {
        #[arg(required = true, num_args = 1..)]
        prompt: Vec<String>,
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Fuse two words directly
    Fuse { base: String, theme: String },
    /// Interactive prompt loop
    Repl,
    /// Serve POST /genera over HTTP
    Serve {
        #[arg(long, env = "BLEND_BIND")]
        bind: Option<String>,
    },
    /// Print the effective configuration
    PrintConfig,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = load_configuration(cli.config.as_deref(), &cli.data)?;

    match cli.command {
        Commands::Generate { prompt, json } => {
            let engine = BlendEngine::from_config(&config)?;
            let text = prompt.join(" ");
            let Some(outcome) = engine.generate_text(&text) else {
                bail!("expected \"<category> <theme...>\", got {:?}", text);
            };
            print_outcome(&outcome, json)?;
        }
        Commands::Fuse { base, theme } => {
            if base.is_empty() || theme.is_empty() {
                bail!("both words must be non-empty");
            }
            let syllabifier = ItalianSyllabifier::new(config.syllables.min_edge);
            let fusion = FusionEngine::new(Arc::new(syllabifier));
            println!("{}", fusion.fuse(&base, &theme));
        }
        Commands::Repl => {
            let engine = BlendEngine::from_config(&config)?;
            run_repl(&engine)?;
        }
        Commands::Serve { bind } => {
            let engine = BlendEngine::from_config(&config)?;
            let bind = bind.unwrap_or_else(|| config.server.bind.clone());
            blend_core::server::serve(engine, &bind)
                .await
                .with_context(|| format!("server on {} stopped", bind))?;
        }
        Commands::PrintConfig => {
            print!("{}", config.to_toml()?);
        }
    }

    Ok(())
}

fn load_configuration(path: Option<&Path>, data: &DataArgs) -> anyhow::Result<EngineConfig> {
    let mut config = match path {
        Some(path) => EngineConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None if Path::new(DEFAULT_CONFIG_PATH).exists() => {
            EngineConfig::load(Path::new(DEFAULT_CONFIG_PATH))?
        }
        None => EngineConfig::default(),
    };

    if let Some(dataset) = &data.dataset {
        config.data.dataset = dataset.clone();
    }
    if let Some(overrides) = &data.overrides {
        config.data.overrides = overrides.clone();
    }
    if data.lemmas.is_some() {
        config.data.lemmas = data.lemmas.clone();
    }
    if data.embeddings.is_some() {
        config.data.embeddings = data.embeddings.clone();
    }
    config.search.parallel |= data.parallel;
    config.validate()?;
    Ok(config)
}

fn print_outcome(outcome: &Outcome, json: bool) -> anyhow::Result<()> {
    if json {
        let value = match outcome {
            Outcome::Match(found) => serde_json::to_value(found)?,
            Outcome::CategoryNotFound { category } => {
                serde_json::json!({ "error": "category_not_found", "category": category })
            }
            Outcome::NoMatch => serde_json::json!({ "error": "no_match" }),
            Outcome::DataUnavailable => serde_json::json!({ "error": "data_unavailable" }),
        };
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    match outcome {
        Outcome::Match(found) => {
            println!("{}", found.output.as_str().bold().green());
            println!("  from  {}", found.original);
            println!("  blend {} (score {})", found.info, found.score);
        }
        other => println!("{}", other.to_string().yellow()),
    }
    Ok(())
}

fn run_repl(engine: &BlendEngine) -> anyhow::Result<()> {
    println!("{}", "Portmanteau generator. Type '<category> <theme>', or 'exit' to quit.".bold());
    println!("---------------------------------------------------------------");

    loop {
        print!("\n> ");
        stdout().flush()?;

        let mut input = String::new();
        if stdin().read_line(&mut input)? == 0 {
            break;
        }
        let cmd = input.trim();

        match cmd {
            "exit" | "quit" => break,
            "" => continue,
            text => match engine.generate_text(text) {
                Some(outcome) => print_outcome(&outcome, false)?,
                None => println!("{}", "Format: <category> <theme...>".red()),
            },
        }
    }
    Ok(())
}
