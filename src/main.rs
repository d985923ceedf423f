use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};
use askweb::doctor::{format_health_report, run_health_checks};
use askweb::utils::load_env_files;
use askweb::{AgentConfig, AgentConfigBuilder, PipelineError, PipelineOutcome, Query, QueryPipeline};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

/// askweb - answer questions from live web results with a local LLM
#[derive(Parser)]
#[command(name = "askweb")]
#[command(about = "Answer questions using a local Ollama model grounded in SearXNG results")]
#[command(version)]
struct Cli {
    #[command(flatten)]
    endpoints: EndpointArgs,

    /// Log pipeline progress to stderr (-v for info, -vv for debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Overrides for the configured endpoints
#[derive(Args)]
struct EndpointArgs {
    /// Ollama base URL (default: $OLLAMA_HOST or http://localhost:11434)
    #[arg(long, global = true, value_name = "URL")]
    ollama_url: Option<String>,

    /// SearXNG base URL (default: $SEARXNG_URL or http://127.0.0.1:8888)
    #[arg(long, global = true, value_name = "URL")]
    searxng_url: Option<String>,

    /// Model used for both interpretation and summarization
    #[arg(short, long, global = true, value_name = "MODEL")]
    model: Option<String>,

    /// Comma-separated engines, tried in order
    #[arg(long, global = true, value_name = "ENGINES")]
    engines: Option<String>,
}

/// Available commands
#[derive(Subcommand)]
enum Commands {
    /// Answer a single question
    Ask(AskCommand),
    /// Ask questions interactively until `exit` or `quit`
    Chat,
    /// Check that Ollama and SearXNG are reachable and configured
    Doctor,
}

/// Answer a single question
#[derive(Parser)]
struct AskCommand {
    /// The question to answer
    #[arg(value_name = "QUERY", required = true)]
    query: Vec<String>,

    /// Print the outcome as JSON
    #[arg(long)]
    json: bool,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = load_env_files().and_then(|()| {
        let config = build_config(&cli.endpoints)?;
        match &cli.command {
            Commands::Ask(cmd) => handle_ask(cmd, &config),
            Commands::Chat => handle_chat(&config),
            Commands::Doctor => handle_doctor(&config),
        }
    });

    if let Err(e) = result {
        let exit_code = if is_user_error(&e) { 1 } else { 2 };
        eprintln!("Error: {e:#}");
        std::process::exit(exit_code);
    }
}

/// Installs a stderr subscriber; `RUST_LOG` wins over `-v`.
fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "askweb=warn",
        1 => "askweb=info",
        _ => "askweb=debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

/// Blank queries and bad configuration are user errors; pipeline failures are not.
fn is_user_error(error: &anyhow::Error) -> bool {
    error.chain().any(|cause| {
        cause.is::<askweb::QueryError>() || cause.is::<askweb::ConfigError>()
    })
}

fn build_config(args: &EndpointArgs) -> Result<AgentConfig> {
    let mut builder = AgentConfigBuilder::new();
    if let Some(url) = &args.ollama_url {
        builder = builder.ollama_url(url);
    }
    if let Some(url) = &args.searxng_url {
        builder = builder.searxng_url(url);
    }
    if let Some(model) = &args.model {
        builder = builder.model(model);
    }
    if let Some(engines) = &args.engines {
        builder = builder.engines(askweb::config::parse_engine_list(engines));
    }
    Ok(builder.build()?)
}

/// Handles the ask command by running the pipeline once.
fn handle_ask(cmd: &AskCommand, config: &AgentConfig) -> Result<()> {
    let query = Query::new(cmd.query.join(" "))?;
    let pipeline = QueryPipeline::from_config(config).context("Failed to set up pipeline")?;

    let outcome = pipeline.run(&query)?;

    if cmd.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&outcome).context("Failed to serialize outcome")?
        );
    } else {
        print!("{}", format_outcome(&outcome));
    }
    Ok(())
}

/// Handles the chat command: read a line, answer it, repeat.
///
/// Failures are reported and the loop continues with the next question.
fn handle_chat(config: &AgentConfig) -> Result<()> {
    let pipeline = QueryPipeline::from_config(config).context("Failed to set up pipeline")?;

    println!("askweb chat (Ollama: {}, SearXNG: {})", config.ollama_url(), config.searxng_url());
    println!("Type 'exit' or 'quit' to stop.\n");

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("You: ");
        io::stdout().flush().context("Failed to flush stdout")?;

        let Some(line) = lines.next() else {
            break;
        };
        let line = line.context("Failed to read from stdin")?;

        if is_exit_command(&line) {
            break;
        }
        let Ok(query) = Query::new(&line) else {
            continue;
        };

        println!("Thinking...");
        match pipeline.run(&query) {
            Ok(outcome) => print!("{}", format_outcome(&outcome)),
            Err(e) => eprintln!("{}", chat_error_message(&e)),
        }
        println!();
    }

    Ok(())
}

fn handle_doctor(config: &AgentConfig) -> Result<()> {
    let report = run_health_checks(config);
    print!("{}", format_health_report(&report));

    if !report.is_healthy() {
        anyhow::bail!("One or more health checks failed");
    }
    Ok(())
}

fn is_exit_command(line: &str) -> bool {
    matches!(line.trim().to_lowercase().as_str(), "exit" | "quit")
}

fn chat_error_message(error: &PipelineError) -> String {
    match error {
        PipelineError::InterpretationFailed { .. } => {
            format!("Failed to interpret query. ({error})")
        }
        PipelineError::SummarizationFailed { .. } => {
            format!("Found results but could not summarize them. ({error})")
        }
    }
}

/// Renders an outcome for the terminal: search query, numbered sources, answer.
fn format_outcome(outcome: &PipelineOutcome) -> String {
    let mut out = format!("Searched for: {}\n", outcome.search_query());

    if !outcome.results().is_empty() {
        out.push_str("\nSources:\n");
        for (i, result) in outcome.results().iter().enumerate() {
            out.push_str(&format!(
                "[{}] {} ({})\n",
                i + 1,
                result.title_or_placeholder(),
                result.url_or_placeholder()
            ));
        }
    }

    out.push_str(&format!("\nAgent: {}\n", outcome.summary()));
    out
}
