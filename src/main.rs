//! CLI entry point for eirene

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use eirene::config::DEFAULT_CONFIG_FILE;
use eirene::{Blog, Config, ContentLoader};

#[derive(Parser)]
#[command(name = "eirene")]
#[command(version)]
#[command(about = "A small blog server for Markdown posts", long_about = None)]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, global = true, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the server
    #[command(alias = "s")]
    Serve {
        /// Address to listen on (overrides the config file)
        #[arg(short, long)]
        addr: Option<String>,
    },

    /// List blog content
    List {
        /// Type of content to list (post, tag)
        #[arg(default_value = "post")]
        r#type: String,
    },

    /// Compile templates and parse every post without serving
    Check,

    /// Display version information
    Version,
}

fn init_logging(debug: bool, development: bool) {
    let filter = if debug { "eirene=debug,info" } else { "eirene=info" };
    let env_filter =
        tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into());

    if development {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_file(true)
                    .with_line_number(true),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().compact())
            .init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::load(&cli.config)
        .with_context(|| format!("failed to load configuration from {:?}", cli.config))?;

    init_logging(cli.debug, config.environment.is_development());

    if !cli.config.exists() {
        tracing::info!("No config file at {:?}, using defaults", cli.config);
    }

    match cli.command {
        Commands::Serve { addr } => {
            let blog = Blog::new(config).context("failed to initialise the blog")?;
            eirene::commands::serve::run(blog, addr.as_deref()).await?;
        }

        Commands::List { r#type } => {
            let loader = ContentLoader::from_config(&config);
            eirene::commands::list::run(&loader, &r#type)?;
        }

        Commands::Check => {
            eirene::commands::check::run(config)?;
            println!("All templates and posts are valid.");
        }

        Commands::Version => {
            println!("eirene version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
