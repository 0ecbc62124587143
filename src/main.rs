use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use std::time::Instant;

use req_rank::config::Config;
use req_rank::narrative::{
    cache, CachedProvider, InferenceClient, NarrativeProvider, RelevanceClassifier,
    StaticProvider,
};
use req_rank::{RankOutcome, RankingEngine};

const EXIT_SUCCESS: i32 = 0;
const EXIT_INVALID_INPUT: i32 = 1;
const EXIT_BACKEND: i32 = 2;
const EXIT_CONFIG: i32 = 4;

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum Format {
    Table,
    Tsv,
    Json,
}

#[derive(Args, Debug)]
struct BackendArgs {
    /// Skip the narrative backend; every requirement gets the fallback text
    #[arg(long)]
    offline: bool,

    /// Bypass the narrative cache for this run
    #[arg(long)]
    no_cache: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Rank the requirements in a JSON or YAML file ("-" reads JSON from stdin)
    Rank {
        input: PathBuf,

        /// Output format (defaults to table on a terminal, json otherwise)
        #[arg(short, long, value_enum)]
        format: Option<Format>,

        /// Also write the JSON response to this file
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        backend: BackendArgs,
    },
    /// Show the full explanation of one ranked requirement
    Explain {
        input: PathBuf,

        /// Position in the ranking (1-based, as shown by `rank`)
        index: usize,

        #[command(flatten)]
        backend: BackendArgs,
    },
    /// Write a config file with default settings
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },
    /// Remove all cached narratives
    ClearCache,
}

#[derive(Parser, Debug)]
#[command(name = "req-rank")]
#[command(about = "Requirement prioritization CLI", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging and score breakdowns
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/req-rank/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

fn init_tracing(verbose: bool) {
    let default_directive = if verbose { "req_rank=debug" } else { "warn" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_directive));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Narrative backend for a run, plus the classifier behind blended scoring
/// when a live backend is in use.
struct Backend {
    provider: Box<dyn NarrativeProvider>,
    classifier: Option<InferenceClient>,
}

fn build_backend(config: &Config, args: &BackendArgs) -> anyhow::Result<Backend> {
    let narrative = config.narrative();

    if args.offline || !narrative.enabled {
        tracing::debug!("narrative backend disabled, using fallback text");
        return Ok(Backend {
            provider: Box::new(StaticProvider::new(narrative.fallback())),
            classifier: None,
        });
    }

    let token = req_rank::credentials::get_token_from_env();
    if token.is_none() {
        tracing::debug!("no inference token in environment, sending unauthenticated requests");
    }
    let client = InferenceClient::new(&narrative, token)?;

    let provider: Box<dyn NarrativeProvider> = if args.no_cache {
        Box::new(client.clone())
    } else {
        Box::new(CachedProvider::new(
            client.clone(),
            cache::get_cache_path(),
            narrative.cache_ttl(),
        ))
    };

    Ok(Backend {
        provider,
        classifier: Some(client),
    })
}

/// Load the request, rank it, and exit on any failure with the matching code.
async fn rank_or_exit(config: &Config, input: &Path, args: &BackendArgs) -> RankOutcome {
    let request = match req_rank::request::load_request(input) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Input error: {:#}", e);
            std::process::exit(EXIT_INVALID_INPUT);
        }
    };

    let backend = match build_backend(config, args) {
        Ok(b) => b,
        Err(e) => {
            eprintln!("Failed to set up narrative backend: {:#}", e);
            std::process::exit(EXIT_BACKEND);
        }
    };

    let scoring = config.scoring();
    let narrative = config.narrative();
    let mut engine = RankingEngine::new(backend.provider.as_ref(), &scoring, &narrative);
    if let Some(ref classifier) = backend.classifier {
        engine = engine.with_classifier(classifier as &dyn RelevanceClassifier);
    }

    match engine.rank(&request).await {
        Ok(outcome) => outcome,
        Err(e) => {
            eprintln!("Invalid requirement overrides:");
            for error in e.validation_errors() {
                eprintln!("  - {}", error);
            }
            std::process::exit(EXIT_INVALID_INPUT);
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    // Install rustls crypto provider (required for rustls 0.23+)
    if rustls::crypto::ring::default_provider()
        .install_default()
        .is_err()
    {
        tracing::debug!("rustls crypto provider already installed");
    }

    let start_time = Instant::now();

    // Commands that don't need a loaded config
    match cli.command {
        Commands::Init { force } => {
            let path = cli
                .config
                .clone()
                .unwrap_or_else(req_rank::config::get_config_path);
            if let Err(e) = req_rank::config::write_default_config(&path, force) {
                eprintln!("Config error: {:#}", e);
                std::process::exit(EXIT_CONFIG);
            }
            println!("Config written to {}", path.display());
            std::process::exit(EXIT_SUCCESS);
        }
        Commands::ClearCache => {
            let cache_path = cache::get_cache_path();
            if let Err(e) = cache::clear_cache(&cache_path) {
                eprintln!("Failed to clear cache: {:#}", e);
                std::process::exit(EXIT_CONFIG);
            }
            println!("Cleared narrative cache at {}", cache_path.display());
            std::process::exit(EXIT_SUCCESS);
        }
        _ => {}
    }

    // Load config
    let config = match req_rank::config::load_config(cli.config.clone()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    // Validate config at startup
    if let Err(errors) = req_rank::config::validate_config(&config) {
        eprintln!("Config errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        std::process::exit(EXIT_CONFIG);
    }

    tracing::debug!(policy = config.scoring().policy.as_str(), "config loaded");

    let use_colors = req_rank::output::should_use_colors();

    match cli.command {
        Commands::Rank {
            input,
            format,
            output,
            backend,
        } => {
            let outcome = rank_or_exit(&config, &input, &backend).await;
            let response = req_rank::output::to_response(&outcome);

            if let Some(ref path) = output {
                if let Err(e) = req_rank::output::write_response(path, &response) {
                    eprintln!("Output error: {:#}", e);
                    std::process::exit(EXIT_INVALID_INPUT);
                }
            }

            let format = format.unwrap_or(if use_colors { Format::Table } else { Format::Json });
            match format {
                Format::Table => {
                    if cli.verbose {
                        for (idx, item) in outcome.ranked.iter().enumerate() {
                            println!("{}", req_rank::output::format_detail(idx + 1, item, use_colors));
                            println!();
                        }
                    }
                    println!("{}", req_rank::output::format_ranked_table(&outcome, use_colors));
                }
                Format::Tsv => {
                    let tsv = req_rank::output::format_tsv(&outcome.ranked);
                    if !tsv.is_empty() {
                        println!("{}", tsv);
                    }
                }
                Format::Json => match req_rank::output::format_json(&response) {
                    Ok(json) => println!("{}", json),
                    Err(e) => {
                        eprintln!("Output error: {:#}", e);
                        std::process::exit(EXIT_INVALID_INPUT);
                    }
                },
            }

            if cli.verbose {
                eprintln!();
                eprintln!(
                    "Total: {} requirements in {:?}",
                    outcome.ranked.len(),
                    start_time.elapsed()
                );
            }
        }
        Commands::Explain {
            input,
            index,
            backend,
        } => {
            let outcome = rank_or_exit(&config, &input, &backend).await;

            // Validate index bounds (1-based)
            if index < 1 || index > outcome.ranked.len() {
                eprintln!(
                    "Invalid index {}. Must be between 1 and {}.",
                    index,
                    outcome.ranked.len()
                );
                std::process::exit(EXIT_INVALID_INPUT);
            }

            let item = &outcome.ranked[index - 1];
            println!("{}", req_rank::output::format_detail(index, item, use_colors));
        }
        Commands::Init { .. } | Commands::ClearCache => {}
    }

    std::process::exit(EXIT_SUCCESS);
}
