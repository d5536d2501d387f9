//! docroute CLI: the main entry point.
//!
//! Commands:
//! - `route`: Route a query over any namespace
//! - `deploy`: Deployment guide for a method and platform
//! - `sdk`: SDK integration guide
//! - `docs`: Documentation URLs for a topic
//! - `catalog`: Show a namespace's described catalog
//! - `sdks`: List supported SDK identifiers
//! - `onboard`: Write the default config file
//! - `doctor`: Diagnose configuration, documents and provider

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "docroute",
    about = "docroute — pick the right document for a question",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize configuration
    Onboard,

    /// Route a query to the best document(s) of a namespace
    Route {
        /// The question to answer
        query: String,

        /// Namespace name or alias
        #[arg(short, long, default_value = "deployments")]
        namespace: String,

        /// Number of documents to select (1 = single best)
        #[arg(short, long, default_value_t = 1)]
        max: usize,
    },

    /// Get the deployment guide for a method and platform
    Deploy {
        /// Deployment method (aspire, helm-charts, terraform, docker-compose, all)
        #[arg(short, long, default_value = "all")]
        method: String,

        /// Target platform (azure, aws, gcp, kubernetes, on-premises, all)
        #[arg(short, long, default_value = "all")]
        platform: String,

        /// What you want to know
        #[arg(default_value = "")]
        topic: String,
    },

    /// Get the integration guide for an SDK
    Sdk {
        /// SDK identifier (see `docroute sdks`)
        sdk: String,

        /// Integration topic or scenario
        #[arg(default_value = "")]
        topic: String,
    },

    /// Find documentation pages for a topic
    Docs {
        topic: String,
    },

    /// Show the described catalog of a namespace
    Catalog {
        namespace: String,
    },

    /// List supported SDK identifiers
    Sdks,

    /// Diagnose configuration, documents and provider
    Doctor,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Onboard => commands::onboard::run().await?,
        Commands::Route { query, namespace, max } => commands::route::run(query, namespace, max).await?,
        Commands::Deploy { method, platform, topic } => commands::deploy::run(method, platform, topic).await?,
        Commands::Sdk { sdk, topic } => commands::sdk::run(sdk, topic).await?,
        Commands::Docs { topic } => commands::docs::run(topic).await?,
        Commands::Catalog { namespace } => commands::catalog::run(namespace).await?,
        Commands::Sdks => commands::sdks::run().await?,
        Commands::Doctor => commands::doctor::run().await?,
    }

    Ok(())
}
