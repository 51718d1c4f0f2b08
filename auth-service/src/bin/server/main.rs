use std::sync::Arc;

use auth::Authenticator;
use auth::PasswordHasher;
use auth_service::config::Config;
use auth_service::config::StorageBackend;
use auth_service::domain::token::ports::TokenServicePort;
use auth_service::domain::token::service::TokenService;
use auth_service::domain::user::ports::UserServicePort;
use auth_service::domain::user::ports::UserStore;
use auth_service::domain::user::service::UserService;
use auth_service::inbound::http::router::create_router;
use auth_service::outbound::repositories::InMemoryUserStore;
use auth_service::outbound::repositories::PostgresUserStore;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "auth_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "auth-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;

    tracing::info!(
        backend = ?config.database.backend,
        http_port = config.server.http_port,
        token_ttl_hours = config.jwt.expiration_hours,
        bcrypt_cost = config.password.bcrypt_cost,
        "Configuration loaded"
    );

    let authenticator = Arc::new(
        Authenticator::new(
            config.jwt.secret.as_bytes(),
            chrono::Duration::hours(config.jwt.expiration_hours),
        )
        .with_password_hasher(PasswordHasher::with_cost(config.password.bcrypt_cost)),
    );
    authenticator.prepare_decoy()?;

    let (token_service, user_service) = match config.database.backend {
        StorageBackend::Postgres => {
            let pg_pool = PgPoolOptions::new()
                .max_connections(config.database.max_connections)
                .connect(&config.database.url)
                .await?;
            tracing::info!(
                max_connections = config.database.max_connections,
                database = "postgresql",
                "Database connection pool created"
            );

            sqlx::migrate!("./migrations").run(&pg_pool).await?;
            tracing::info!(database = "postgresql", "Database migrations completed");

            build_services(Arc::new(PostgresUserStore::new(pg_pool)), &authenticator, &config)
                .await?
        }
        StorageBackend::Memory => {
            tracing::warn!("Using the in-memory user store; accounts are lost on restart");
            build_services(Arc::new(InMemoryUserStore::new()), &authenticator, &config).await?
        }
    };

    let http_address = format!("{}:{}", config.server.host, config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    let http_application = create_router(token_service, user_service, authenticator);

    if let Err(e) = axum::serve(http_listener, http_application).await {
        tracing::error!(error = %e, "Server error");
        return Err(e.into());
    }

    tracing::info!("Server exited successfully");
    Ok(())
}

async fn build_services<US>(
    store: Arc<US>,
    authenticator: &Arc<Authenticator>,
    config: &Config,
) -> Result<(Arc<dyn TokenServicePort>, Arc<dyn UserServicePort>), anyhow::Error>
where
    US: UserStore,
{
    let user_service = UserService::new(
        Arc::clone(&store),
        PasswordHasher::with_cost(config.password.bcrypt_cost),
    );

    if let Some(admin) = &config.bootstrap_admin {
        user_service
            .ensure_admin(&admin.username, &admin.password)
            .await?;
    }

    let token_service = TokenService::new(store, Arc::clone(authenticator));

    Ok((Arc::new(token_service), Arc::new(user_service)))
}
