// Deep Researcher command line entry point
//
// Research mode searches the web for a query and writes a report; comedy mode
// turns today's trending searches into a late-night monologue script.

use anyhow::{Context, Result, bail};
use chrono::Local;
use clap::{Parser, ValueEnum};
use std::fs::File;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use deep_researcher::{DeepResearcher, ResearchConfig};

const LOG_DIR: &str = "logs";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Mode {
    /// Late-night show script from trending topics
    Comedy,
    /// Web research report for `--query`
    Research,
}

#[derive(Debug, Parser)]
#[command(
    name = "deep-researcher",
    version,
    about = "Deep Researcher - Web research and content generation tool"
)]
struct Args {
    /// Operation mode
    #[arg(short, long, value_enum, default_value_t = Mode::Research)]
    mode: Mode,

    /// Research query or topic
    #[arg(short, long)]
    query: Option<String>,

    /// Number of articles to analyze per topic
    #[arg(short, long, default_value_t = 3)]
    articles: usize,

    /// Ollama API URL
    #[arg(long, env = "OLLAMA_URL")]
    ollama_url: Option<String>,

    /// Ollama model for basic tasks
    #[arg(long)]
    ollama_model: Option<String>,

    /// Ollama model for advanced reasoning tasks
    #[arg(long)]
    reasoning_model: Option<String>,

    /// Directory to store output files
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Run the browser headless (`--headless false` shows the window)
    #[arg(long, num_args = 0..=1, default_missing_value = "true")]
    headless: Option<bool>,

    /// JSON config file; command line flags override its values
    #[arg(long)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long)]
    debug: bool,
}

impl Args {
    fn research_config(&self) -> Result<ResearchConfig> {
        let base = match &self.config {
            Some(path) => ResearchConfig::from_json_file(path)
                .with_context(|| format!("Failed to load config from {}", path.display()))?,
            None => ResearchConfig::default(),
        };

        let mut builder = base.into_builder();
        if let Some(url) = &self.ollama_url {
            builder = builder.ollama_url(url);
        }
        if let Some(model) = &self.ollama_model {
            builder = builder.ollama_model(model);
        }
        if let Some(model) = &self.reasoning_model {
            builder = builder.reasoning_model(model);
        }
        if let Some(dir) = &self.output_dir {
            builder = builder.output_dir(dir);
        }
        if let Some(headless) = self.headless {
            builder = builder.headless(headless);
        }
        Ok(builder.build()?)
    }
}

fn init_logging(debug: bool) -> Result<PathBuf> {
    std::fs::create_dir_all(LOG_DIR).with_context(|| format!("Failed to create {LOG_DIR}"))?;
    let log_path = PathBuf::from(LOG_DIR).join(format!(
        "deep_researcher_{}.log",
        Local::now().format("%Y%m%d_%H%M%S")
    ));
    let log_file = File::create(&log_path)
        .with_context(|| format!("Failed to create log file {}", log_path.display()))?;

    let level = if debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "{level},chromiumoxide::handler=off,chromiumoxide::conn=off"
        ))
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(log_file)),
        )
        .init();

    Ok(log_path)
}

async fn run(args: &Args, researcher: &DeepResearcher<deep_researcher::ChromiumSession>) -> Result<()> {
    match args.mode {
        Mode::Comedy => {
            info!("Running in comedy mode - generating late night show script");
            let script = researcher.generate_comedy_script().await?;
            println!("\n\n========== LATE NIGHT SHOW SCRIPT ==========\n");
            println!("{script}");
            println!("\n========== END OF SCRIPT ==========\n");
        }
        Mode::Research => {
            let Some(query) = args.query.as_deref() else {
                bail!("Research mode requires a query (--query)");
            };
            info!("Running in research mode - researching: {query}");
            let report = researcher
                .research_and_summarize(query, args.articles)
                .await?;
            println!("\n\n========== RESEARCH SUMMARY ==========\n");
            println!("{report}");
            println!("\n========== END OF SUMMARY ==========\n");
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    match init_logging(args.debug) {
        Ok(path) => info!("Logging to {}", path.display()),
        Err(e) => eprintln!("File logging unavailable: {e:#}"),
    }
    info!("Starting Deep Researcher");
    if args.debug {
        info!("Debug mode enabled");
    }

    let config = match args.research_config() {
        Ok(config) => config,
        Err(e) => {
            error!("Error: {e:#}");
            std::process::exit(1);
        }
    };

    let researcher = match DeepResearcher::launch(config).await {
        Ok(researcher) => researcher,
        Err(e) => {
            error!("Error: {e}");
            std::process::exit(1);
        }
    };

    let outcome = run(&args, &researcher).await;

    if let Err(e) = researcher.shutdown().await {
        error!("Error closing browser: {e}");
    }

    if let Err(e) = outcome {
        error!("Error: {e:#}");
        std::process::exit(1);
    }
}
