//! CLI entry point for folio

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "folio")]
#[command(version)]
#[command(about = "Static generator for a personal blog and resume site", long_about = None)]
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
    /// Initialize a new site
    Init {
        /// Directory to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        folder: PathBuf,
    },

    /// Create a new post
    New {
        /// Title of the new post
        title: String,

        /// Slug of the new post (defaults to the slugified title)
        #[arg(short, long)]
        slug: Option<String>,
    },

    /// Build the static site
    #[command(visible_alias = "generate", alias = "g")]
    Build {
        /// Watch for file changes
        #[arg(short, long)]
        watch: bool,
    },

    /// Build and serve the site locally
    #[command(alias = "s")]
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "8000")]
        port: u16,

        /// IP address to bind to
        #[arg(short, long, default_value = "localhost")]
        ip: String,

        /// Open browser automatically
        #[arg(short, long)]
        open: bool,

        /// Static mode (no file watching or live reload)
        #[arg(long)]
        r#static: bool,
    },

    /// Remove the public folder
    Clean,

    /// List site information
    List {
        /// What to list (posts, plugins)
        #[arg(default_value = "posts")]
        r#type: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "folio=debug,info"
    } else {
        "folio=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine base directory
    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir()
            .map_err(|e| anyhow!("Cannot read current directory: {}", e))?,
    };

    match cli.command {
        Commands::Init { folder } => {
            let target_dir = if folder.is_absolute() {
                folder
            } else {
                base_dir.join(folder)
            };
            folio::commands::init::init_site(&target_dir)?;
            println!("Initialized site in {:?}", target_dir);
        }

        Commands::New { title, slug } => {
            let site = folio::Site::new(&base_dir)?;
            let path = folio::commands::new::create_post(&site, &title, slug.as_deref())?;
            println!("Created: {:?}", path);
        }

        Commands::Build { watch } => {
            let site = folio::Site::new(&base_dir)?;
            tracing::info!("Building site...");
            site.build()?;
            println!("Built successfully!");

            if watch {
                tokio::task::spawn_blocking(move || folio::commands::build::watch(&site))
                    .await??;
            }
        }

        Commands::Serve {
            port,
            ip,
            open,
            r#static,
        } => {
            let site = folio::Site::new(&base_dir)?;

            // Build first
            tracing::info!("Building site...");
            site.build()?;

            folio::server::start(&site, &ip, port, !r#static, open).await?;
        }

        Commands::Clean => {
            let site = folio::Site::new(&base_dir)?;
            site.clean()?;
            println!("Cleaned successfully!");
        }

        Commands::List { r#type } => {
            let site = folio::Site::new(&base_dir)?;
            folio::commands::list::run(&site, &r#type)?;
        }
    }

    Ok(())
}
