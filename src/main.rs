//! CLI entry point for quire

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use quire::content::LoadMode;

#[derive(Parser)]
#[command(name = "quire")]
#[command(version)]
#[command(about = "Load, validate and query a directory of Markdown/MDX posts", long_about = None)]
struct Cli {
    /// Set the base directory (defaults to current directory)
    #[arg(short, long, global = true)]
    cwd: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    /// Descend into subdirectories of the content directory
    #[arg(short, long, global = true)]
    recursive: bool,

    /// Exclude failing posts instead of aborting
    #[arg(short, long, global = true)]
    permissive: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate every post and report failures
    Check,

    /// List published posts
    #[command(alias = "ls")]
    List {
        /// Only posts with this tag (case-insensitive)
        #[arg(short, long)]
        tag: Option<String>,

        /// List drafts instead
        #[arg(long, conflicts_with = "tag")]
        drafts: bool,
    },

    /// Show a single post
    Show {
        /// Post id (file name without extension)
        id: String,
    },

    /// List tags with post counts
    Tags,

    /// Write the published collection as JSON
    Export {
        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Create a new draft post
    New {
        /// Title of the new post
        title: String,

        /// Description (defaults to the title)
        #[arg(long)]
        description: Option<String>,

        /// Tags, may be repeated
        #[arg(short, long = "tag")]
        tags: Vec<String>,
    },

    /// Reload the collection whenever content changes
    #[command(alias = "w")]
    Watch,

    /// Display version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug { "quire=debug,info" } else { "quire=info" };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Determine base directory
    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };

    let mut site = quire::Quire::new(&base_dir)?;
    if cli.recursive {
        site.config.recursive = true;
    }
    if cli.permissive {
        site.config.load_mode = LoadMode::Permissive;
    }

    match cli.command {
        Commands::Check => {
            tracing::info!("Checking {:?}", site.content_dir());
            quire::commands::check::run(&site, site.config.load_mode)?;
        }

        Commands::List { tag, drafts } => {
            quire::commands::list::posts(&site, tag.as_deref(), drafts)?;
        }

        Commands::Show { id } => {
            quire::commands::list::show(&site, &id)?;
        }

        Commands::Tags => {
            quire::commands::list::tags(&site)?;
        }

        Commands::Export { output } => {
            quire::commands::export::run(&site, output.as_deref())?;
        }

        Commands::New {
            title,
            description,
            tags,
        } => {
            tracing::info!("Creating new post with title: {}", title);
            let path =
                quire::commands::new::create_post(&site, &title, description.as_deref(), &tags)?;
            println!("Created: {:?}", path);
        }

        Commands::Watch => {
            // Dev mode never aborts on a bad post
            site.config.load_mode = LoadMode::Permissive;
            quire::commands::watch::watch(&site).await?;
        }

        Commands::Version => {
            println!("quire version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
