use clap::Parser;
use recommender::{
    api::{handlers::AppState, routes},
    catalog::{self, CatalogIndex},
    cli::{Cli, Commands},
    config::{chat::ChatTable, Settings},
    resolver::{QueryResolver, ResolveMode},
    Error, Result,
};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file if it exists
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,recommender=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let settings = Settings::from_env()?;
    settings.validate()?;

    match cli.command {
        Commands::Serve { port, host } => {
            serve(settings, port, host).await?;
        }
        Commands::Ask {
            query,
            single,
            top_k,
        } => {
            let mode = if single {
                ResolveMode::SingleBest
            } else {
                ResolveMode::RankedList(top_k.unwrap_or(settings.search.top_k))
            };
            let resolver = load_resolver(&settings).await?;
            recommender::cli::commands::ask(&resolver, &query, mode)?;
        }
        Commands::Stats => {
            let catalog = load_catalog(&settings).await?;
            recommender::cli::commands::stats(&catalog);
        }
    }

    Ok(())
}

fn load_chat_table(settings: &Settings) -> Result<ChatTable> {
    match &settings.catalog.chat_table_path {
        Some(path) => {
            let table = ChatTable::from_file(path)?;
            info!("Loaded {} chat phrases from {}", table.len(), path.display());
            Ok(table)
        }
        None => Ok(ChatTable::default()),
    }
}

/// Read and index the catalog off the async runtime
async fn load_catalog(settings: &Settings) -> Result<CatalogIndex> {
    let path = settings.catalog.path.clone();
    let catalog_path = path.display().to_string();
    tokio::task::spawn_blocking(move || catalog::load_index(path))
        .await
        .map_err(|e| Error::Internal(format!("Catalog build task failed: {e}")))?
        .inspect_err(|e| error!("Failed to load catalog {}: {}", catalog_path, e))
}

async fn load_resolver(settings: &Settings) -> Result<QueryResolver> {
    let resolver = QueryResolver::new(load_chat_table(settings)?, settings.search);
    resolver.install(Arc::new(load_catalog(settings).await?))?;
    Ok(resolver)
}

async fn serve(mut settings: Settings, port: Option<u16>, host: Option<String>) -> Result<()> {
    // Override settings with CLI arguments
    if let Some(port) = port {
        settings.server.port = port;
    }
    if let Some(host) = host {
        settings.server.host = host;
    }

    info!("Starting recipe recommender");
    info!("Catalog: {}", settings.catalog.path.display());
    info!("Server: {}:{}", settings.server.host, settings.server.port);

    // The catalog must be fully built before the listener accepts queries
    let resolver = load_resolver(&settings).await?;

    let state = AppState {
        resolver: Arc::new(resolver),
        settings: settings.clone(),
    };

    let app = routes::create_router(state, &settings)?;

    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| Error::Internal(format!("Failed to bind to {addr}: {e}")))?;

    println!("\n========================================");
    println!("Recipe Recommender");
    println!("========================================");
    println!("Status: Running");
    println!("Address: http://{addr}");
    println!("\nAPI Endpoints:");
    println!("  GET  /recommend/?ingredients=...");
    println!("  GET  /api/recipe?query=...");
    println!("  GET  /api/suggested");
    println!("  GET  /api/stats");
    println!("\nPress Ctrl+C to stop");
    println!("========================================\n");

    info!("Server listening on {}", addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<std::net::SocketAddr>(),
    )
    .await
    .map_err(|e| Error::Internal(format!("Server error: {e}")))?;

    info!("Shutting down...");
    Ok(())
}
