use clap::Parser;
use portfolio::{
    api::{handlers::AppState, routes},
    cli::{commands, Cli, Commands},
    config::Settings,
    content::SiteContent,
    github::{GitHubClient, RepositoryGateway},
    Error, Result,
};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file if it exists
    // Silently ignore if file doesn't exist
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,portfolio=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Parse CLI arguments
    let cli = Cli::parse();

    // Load configuration
    let settings = Settings::from_env()?;
    settings.validate()?;

    // Handle commands
    match cli.command {
        Commands::Serve { port, host } => {
            serve(settings, port, host).await?;
        }
        Commands::Repos { owner, limit } => {
            let gateway = gateway(&settings)?;
            let owner = owner.unwrap_or_else(|| settings.site.github_owner.clone());
            let limit = limit.unwrap_or(settings.site.repository_page_size);
            commands::list_repositories(&gateway, &owner, limit).await?;
        }
        Commands::Repo {
            name,
            owner,
            readme,
        } => {
            let gateway = gateway(&settings)?;
            let owner = owner.unwrap_or_else(|| settings.site.github_owner.clone());
            commands::show_repository(&gateway, &owner, &name, readme).await?;
        }
        Commands::Search {
            collection,
            query,
            category,
            sort,
        } => {
            let content = SiteContent::load(settings.content.dir.as_deref())?;
            commands::search(
                &content,
                &collection,
                &query,
                category.as_deref(),
                sort.as_deref(),
            )?;
        }
        Commands::CheckContent { dir } => {
            commands::check_content(dir.as_deref())?;
        }
    }

    Ok(())
}

fn gateway(settings: &Settings) -> Result<RepositoryGateway> {
    let content = SiteContent::load(settings.content.dir.as_deref())?;
    let client = GitHubClient::new(settings.github.clone())?;
    Ok(RepositoryGateway::new(client, content.overrides))
}

async fn serve(mut settings: Settings, port: Option<u16>, host: Option<String>) -> Result<()> {
    // Override settings with CLI arguments
    if let Some(port) = port {
        settings.server.port = port;
    }
    if let Some(host) = host {
        settings.server.host = host;
    }

    info!("Starting portfolio server");
    info!("Server: {}:{}", settings.server.host, settings.server.port);

    let content = SiteContent::load(settings.content.dir.as_deref())?;
    info!(
        "Content loaded: {} articles, {} projects, {} repository overrides",
        content.blog.len(),
        content.projects.len(),
        content.overrides.len()
    );

    if !settings.github.is_authenticated() {
        warn!("GITHUB_TOKEN not set, GitHub requests are unauthenticated and heavily rate limited");
    }

    let state = AppState::new(settings.clone(), content)?;
    if state.mailer.is_none() {
        warn!("RESEND_API_KEY or CONTACT_TO not set, contact messages are logged instead of sent");
    }

    // Create router with rate limiting
    let app = routes::create_router(state, &settings);

    // Start server
    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| Error::Internal(format!("Failed to bind to {addr}: {e}")))?;

    println!("\n========================================");
    println!("{}", settings.site.title);
    println!("========================================");
    println!("Address: http://{addr}");
    println!("GitHub owner: {}", settings.site.github_owner);
    println!("\nAPI Endpoints:");
    println!("  GET  /api/projects");
    println!("  GET  /api/blog");
    println!("  GET  /api/repositories");
    println!("  GET  /api/repositories/:name");
    println!("  POST /api/contact");
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
