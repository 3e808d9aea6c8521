//! Big Store - minimal REST backend for an e-commerce inventory demo

use std::sync::Arc;

use clap::{Parser, Subcommand};
use serde_json::json;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use bigstore::api::{self, AppState};
use bigstore::config::Config;
use bigstore::store::CatalogStore;
use bigstore::types::NewProduct;

#[derive(Parser)]
#[command(name = "bigstore")]
#[command(about = "Minimal REST backend for an e-commerce inventory demo")]
#[command(version)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Port to listen on (overrides PORT)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Insert a handful of demo products, blogs and reviews
    Seed,

    /// Show per-collection document counts
    Stats,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            format!("bigstore={},tower_http=debug", log_level).into()
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load environment
    let _ = dotenvy::dotenv();

    let config = Config::from_env()?;
    std::fs::create_dir_all(config.data_dir())?;

    match cli.command {
        Commands::Serve { port } => {
            let port = port.unwrap_or(config.http_port);

            // Fail fast: refuse to bind the listener if the store cannot open
            let catalog = Arc::new(CatalogStore::open(&config.db_path)?);
            tracing::info!("Opened document store at {:?}", config.db_path);

            let state = AppState {
                catalog,
                jwt_secret: config.jwt_secret.clone(),
            };
            let router = api::create_router(state);

            let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?;

            println!("Big Store server running at http://localhost:{}", port);
            println!("  API:      http://localhost:{}/products", port);
            println!("  API Docs: http://localhost:{}/docs", port);

            axum::serve(listener, router).await?;
        }

        Commands::Seed => {
            let catalog = CatalogStore::open(&config.db_path)?;

            for (name, email, quantity) in [
                ("Mechanical Keyboard", "demo@bigstore.dev", 12),
                ("Laptop Stand", "demo@bigstore.dev", 7),
                ("USB-C Hub", "vendor@bigstore.dev", 25),
            ] {
                let mut product = NewProduct {
                    email: email.to_string(),
                    quantity,
                    extra: serde_json::Map::new(),
                };
                product.extra.insert("name".into(), json!(name));
                let ack = catalog.insert_product(product)?;
                println!("+ product {} ({})", ack.inserted_id, name);
            }

            catalog.insert_blog(
                json!({"title": "Welcome to Big Store", "author": "demo@bigstore.dev"})
                    .as_object()
                    .cloned()
                    .unwrap_or_default(),
            )?;
            catalog.insert_review(
                json!({"product": "Mechanical Keyboard", "rating": 5, "text": "Clacky."})
                    .as_object()
                    .cloned()
                    .unwrap_or_default(),
            )?;

            println!("Seed data inserted into {:?}", config.db_path);
        }

        Commands::Stats => {
            let catalog = CatalogStore::open(&config.db_path)?;
            let counts = catalog.counts()?;

            println!("Big Store Statistics");
            println!("====================");
            println!("Store: {:?}", config.db_path);
            println!();
            println!("Products: {}", counts.products);
            println!("Blogs:    {}", counts.blogs);
            println!("Reviews:  {}", counts.reviews);
        }
    }

    Ok(())
}
