//! Company Lens command line
//!
//! `clens serve` runs the HTTP API; `clens extract` runs one extraction
//! and prints the outcome as JSON.

use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand};
use company_lens::config::AppConfig;
use company_lens::record::InputPayload;
use company_lens::server;
use company_lens::Extractor;
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Company Lens
#[derive(Parser, Debug)]
#[command(name = "clens")]
#[command(version)]
#[command(about = "Extract structured company profiles from websites or text")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to Chrome/Chromium executable
    #[arg(long, global = true, env = "CHROME_PATH")]
    chrome_path: Option<String>,

    /// Chat model name
    #[arg(long, global = true, env = "OPENAI_MODEL")]
    model: Option<String>,

    /// OpenAI-compatible API base URL
    #[arg(long, global = true, env = "OPENAI_BASE_URL")]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the extraction API
    Serve {
        /// Host to bind to
        #[arg(short = 'H', long, default_value = "127.0.0.1")]
        host: String,

        /// Port to listen on
        #[arg(short, long, default_value = "3000")]
        port: u16,
    },
    /// Run a single extraction and print the result
    Extract(ExtractArgs),
}

#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
struct ExtractArgs {
    /// Company website to scrape
    #[arg(long)]
    url: Option<String>,

    /// Company description text
    #[arg(long)]
    text: Option<String>,

    /// File containing company description text
    #[arg(long)]
    text_file: Option<PathBuf>,
}

impl ExtractArgs {
    fn into_payload(self) -> anyhow::Result<InputPayload> {
        if let Some(path) = self.text_file {
            let text = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            return Ok(InputPayload::plain_text(text));
        }
        match (self.url, self.text) {
            (_, Some(text)) => Ok(InputPayload::plain_text(text)),
            (Some(url), None) => Ok(InputPayload::url(url)),
            (None, None) => bail!("one of --url, --text or --text-file is required"),
        }
    }
}

fn app_config(cli: &Cli) -> AppConfig {
    let mut config = AppConfig::from_env();
    if let Some(path) = &cli.chrome_path {
        config.browser.chrome_path = Some(path.clone());
    }
    if let Some(model) = &cli.model {
        config.llm = config.llm.with_model(model.clone());
    }
    if let Some(base_url) = &cli.base_url {
        config.llm = config.llm.with_base_url(base_url.clone());
    }
    config
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose {
        "company_lens=debug,clens=debug,info"
    } else {
        "info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = app_config(&cli);
    tracing::debug!("Configuration: {:?}", config);
    let extractor = Extractor::from_config(&config).context("failed to initialize extractor")?;

    match cli.command {
        Command::Serve { host, port } => {
            let addr: SocketAddr = format!("{}:{}", host, port)
                .parse()
                .with_context(|| format!("invalid bind address {}:{}", host, port))?;
            tracing::info!("Company Lens starting on {}", addr);
            server::serve(extractor, addr).await?;
        }
        Command::Extract(args) => {
            let payload = args.into_payload()?;
            let outcome = extractor
                .extract_payload(payload)
                .await
                .context("Failed to extract company information")?;
            println!("{}", serde_json::to_string_pretty(&outcome)?);
        }
    }

    Ok(())
}
