use clap::Parser;
use recipe_search::{
    api::{handlers::AppState, routes},
    cli::{commands, Cli, Commands},
    config::Settings,
    db,
    search::RecipeSearch,
    Error, Result,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file if it exists
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,recipe_search=debug".into()),
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
        Commands::Migrate => {
            migrate(settings).await?;
        }
        Commands::Search {
            terms,
            json,
            server,
        } => {
            let query = terms.join(" ");
            match commands::server_url(server, &settings) {
                Some(url) => commands::search_remote(&url, &query, json).await?,
                None => {
                    let engine = local_engine(&settings).await?;
                    commands::search_local(&engine, &query, json).await?;
                }
            }
        }
        Commands::Similar {
            recipe_id,
            limit,
            server,
        } => {
            let limit = limit
                .unwrap_or(settings.search.similar_default_limit)
                .min(settings.search.similar_max_limit);
            match commands::server_url(server, &settings) {
                Some(url) => commands::similar_remote(&url, recipe_id, limit).await?,
                None => {
                    let engine = local_engine(&settings).await?;
                    commands::similar_local(&engine, recipe_id, limit).await?;
                }
            }
        }
        Commands::Synonyms { term, limit } => {
            let pool = db::init_pool_with_config(&settings.database).await?;
            db::run_migrations(&pool).await?;
            commands::synonyms(&pool, &term, limit).await?;
        }
    }

    Ok(())
}

async fn serve(mut settings: Settings, port: Option<u16>, host: Option<String>) -> Result<()> {
    if let Some(port) = port {
        settings.server.port = port;
    }
    if let Some(host) = host {
        settings.server.host = host;
    }
    settings.validate()?;

    info!("Starting recipe search server");

    let pool = db::init_pool_with_config(&settings.database).await?;
    info!(
        "Database connection established (max_connections: {}, min_connections: {})",
        settings.database.max_connections, settings.database.min_connections
    );

    db::run_migrations(&pool).await?;
    info!("Database migrations completed");

    let state = AppState::new(pool, settings.clone());
    let app = routes::create_router(state, &settings);

    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| Error::Internal(format!("Failed to bind to {addr}: {e}")))?;

    println!("\n========================================");
    println!("Recipe Search Server");
    println!("========================================");
    println!("Address: http://{addr}");
    println!("Database: {}", settings.database.url);
    println!(
        "Synonym index: {}",
        if settings.search.use_synonyms { "enabled" } else { "disabled" }
    );
    println!("\nAPI Endpoints:");
    println!("  GET  /api/recipes");
    println!("  GET  /api/recipes/search?q=...");
    println!("  GET  /api/recipes/:id");
    println!("  GET  /api/recipes/:id/similar");
    println!("\nPress Ctrl+C to stop");
    println!("========================================\n");

    info!("Server listening on {}", addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .map_err(|e| Error::Internal(format!("Server error: {e}")))?;

    info!("Shutting down...");
    Ok(())
}

async fn migrate(settings: Settings) -> Result<()> {
    info!("Running database migrations");

    let pool = db::init_pool(&settings.database.url).await?;
    db::run_migrations(&pool).await?;

    println!("✓ Database migrations completed successfully");
    Ok(())
}

async fn local_engine(settings: &Settings) -> Result<RecipeSearch> {
    let pool = db::init_pool_with_config(&settings.database).await?;
    db::run_migrations(&pool).await?;

    let store = Arc::new(db::SqliteStore::new(
        pool,
        settings.search.embedding_dimensions,
    ));
    Ok(RecipeSearch::new(store).with_options((&settings.search).into()))
}
