//! CLI entry point for waypost

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "waypost")]
#[command(version = "0.1.0")]
#[command(about = "A server-rendered blog front-end for headless CMS content", long_about = None)]
struct Cli {
    /// Set the base directory (defaults to current directory)
    #[arg(short, long, global = true)]
    cwd: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Pre-render the listing page and all known post pages
    #[command(alias = "g")]
    Generate,

    /// Start the blog server
    #[command(alias = "s")]
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "4000")]
        port: u16,

        /// IP address to bind to
        #[arg(short, long, default_value = "localhost")]
        ip: String,

        /// Skip the build-time generation pass before serving
        #[arg(long)]
        no_generate: bool,
    },

    /// Clean the public folder
    Clean,

    /// Display version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "waypost=debug,info"
    } else {
        "waypost=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine base directory
    let base_dir = cli.cwd.unwrap_or_else(|| std::env::current_dir().unwrap());

    match cli.command {
        Commands::Generate => {
            let app = waypost::Waypost::new(&base_dir)?;
            tracing::info!("Generating static pages...");
            app.generate().await?;
            println!("Generated successfully!");
        }

        Commands::Serve {
            port,
            ip,
            no_generate,
        } => {
            let app = waypost::Waypost::new(&base_dir)?;

            // Pre-render known paths first; new posts fall back to
            // on-demand rendering.
            if !no_generate {
                tracing::info!("Generating static pages...");
                if let Err(e) = app.generate().await {
                    tracing::warn!("Build-time generation failed: {}", e);
                }
            }

            tracing::info!("Starting server at http://{}:{}", ip, port);
            waypost::server::start(&app, &ip, port).await?;
        }

        Commands::Clean => {
            let app = waypost::Waypost::new(&base_dir)?;
            tracing::info!("Cleaning public folder...");
            app.clean()?;
            println!("Cleaned successfully!");
        }

        Commands::Version => {
            println!("waypost version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
