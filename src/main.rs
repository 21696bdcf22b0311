//! bookvoice command-line interface

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::Level;

use bookvoice::core::progress::ProgressReporter;
use bookvoice::engine::loader::SidecarLoader;
use bookvoice::engine::{EngineCache, ModelCatalog};
use bookvoice::pipeline::GenerationPipeline;
use bookvoice::server::{AppServer, ServerConfig};

#[derive(Parser)]
#[command(name = "bookvoice", version, about = "Document-to-audiobook TTS service")]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP server
    Serve {
        /// Path to a YAML configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Override the bind port
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Synthesize text to a WAV file from the command line
    Synth {
        /// Text to synthesize
        #[arg(short, long, conflicts_with = "input")]
        text: Option<String>,

        /// Read text from a .txt file instead
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Model identifier
        #[arg(short, long, default_value = "microsoft/speecht5_tts")]
        model: String,

        /// Language code passed to the engine
        #[arg(short, long)]
        language: Option<String>,

        /// Directory the WAV file is written into
        #[arg(short, long, default_value = "generated_audio")]
        output_dir: PathBuf,
    },

    /// List the advertised models
    Models,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt().with_max_level(level).init();

    match cli.command {
        Commands::Serve { config, port } => serve(config, port).await,
        Commands::Synth {
            text,
            input,
            model,
            language,
            output_dir,
        } => synth(text, input, model, language, output_dir).await,
        Commands::Models => {
            for entry in ModelCatalog::builtin().entries() {
                println!("{}\t{}", entry.id, entry.name);
            }
            Ok(())
        }
    }
}

async fn serve(config_path: Option<PathBuf>, port: Option<u16>) -> anyhow::Result<()> {
    let mut config = match config_path {
        Some(path) => ServerConfig::from_file(&path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => ServerConfig::default(),
    };
    if let Some(port) = port {
        config.port = port;
    }

    AppServer::new(config).run().await?;
    Ok(())
}

async fn synth(
    text: Option<String>,
    input: Option<PathBuf>,
    model: String,
    language: Option<String>,
    output_dir: PathBuf,
) -> anyhow::Result<()> {
    let text = match (text, input) {
        (Some(text), _) => text,
        (None, Some(path)) => {
            if path.extension().and_then(|e| e.to_str()) != Some("txt") {
                bail!("unsupported input: only .txt files are accepted");
            }
            std::fs::read_to_string(&path)
                .with_context(|| format!("reading {}", path.display()))?
        }
        (None, None) => bail!("provide --text or --input"),
    };

    let config = ServerConfig::default();
    let loader = SidecarLoader::new(config.sidecar);
    let cache = Arc::new(EngineCache::new(Box::new(loader), config.cache_capacity));
    let mut generation = config.generation;
    generation.output_dir = output_dir;
    let pipeline = GenerationPipeline::new(cache, generation);

    let bar = ProgressBar::new(100);
    bar.set_style(
        ProgressStyle::with_template("{bar:40.cyan/blue} {pos:>3}% {msg}")
            .context("progress bar template")?,
    );
    let reporter_bar = bar.clone();
    let reporter = ProgressReporter::new(move |label, percent| {
        reporter_bar.set_position(u64::from(percent));
        reporter_bar.set_message(label.to_string());
    });

    let artifact = tokio::task::spawn_blocking(move || {
        pipeline.generate(&text, &model, language.as_deref(), &reporter)
    })
    .await??;

    bar.finish_with_message("Done!");
    println!("{}", artifact.path.display());
    Ok(())
}
