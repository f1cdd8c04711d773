use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tower_governor::{governor::GovernorConfigBuilder, GovernorLayer};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use hospital_lib::password::BcryptPasswordHasher;
use hospital_lib::repository::{
    InMemoryAccountStore, InMemoryPatientRepository, MySqlAccountStore, PatientRepository,
};
use hospital_lib::util::{connect_with_retry, run_migrations};
use hospital_lib::{seed_defaults, AccountService, PatientService, SeedConfig};

use hospital_api::config::AppConfig;
use hospital_api::constants::{DATABASE_CONNECT_RETRIES, LOCAL_ENV, SERVICE};
use hospital_api::shutdown::shutdown_signal;
use hospital_api::state::AppState;
use hospital_api::{apply_middleware, router};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Fatal error: {}", e);
        std::process::exit(1);
    }
}

fn init_tracing(env: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    let json_layer = tracing_subscriber::fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true);

    if env == LOCAL_ENV {
        let pretty_layer = tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .pretty();
        registry.with(json_layer).with(pretty_layer).init();
    } else {
        registry.with(json_layer).init();
    }
}

async fn build_services(
    config: &AppConfig,
) -> Result<(AccountService, PatientService), Box<dyn std::error::Error>> {
    let hasher = BcryptPasswordHasher::new(config.bcrypt_cost);

    match &config.database_url {
        Some(database_url) => {
            let pool = connect_with_retry(database_url, DATABASE_CONNECT_RETRIES).await?;
            run_migrations(&pool).await?;
            Ok((
                AccountService::new(MySqlAccountStore::new(pool.clone()), hasher),
                PatientService::new(PatientRepository::new(pool)),
            ))
        }
        None => {
            tracing::warn!("DATABASE_URL not set, using in-memory stores; data is lost on exit");
            Ok((
                AccountService::new(InMemoryAccountStore::new(), hasher),
                PatientService::new(InMemoryPatientRepository::new()),
            ))
        }
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::from_env()?;

    init_tracing(&config.env);
    tracing::info!(service = SERVICE, env = %config.env, "tracing initialized");

    let middleware_config = &config.middleware;
    tracing::info!(
        rate_limit_per_minute = middleware_config.rate_limit_per_minute,
        rate_limit_burst = middleware_config.rate_limit_burst,
        request_timeout_secs = middleware_config.request_timeout.as_secs(),
        max_body_size = middleware_config.max_body_size,
        cors_origins = ?middleware_config.cors_allowed_origins,
        "middleware configuration loaded"
    );

    let (accounts, patients) = build_services(&config).await?;

    if config.seed_on_startup {
        let seed_config = SeedConfig::from_env()?;
        seed_defaults(&accounts, &patients, &seed_config).await?;
    }

    let app_state = AppState::new(accounts, patients, config.env.clone());
    let app = apply_middleware(router(app_state), middleware_config);

    // Rate limiting layer (outermost)
    let governor_conf = Arc::new(
        GovernorConfigBuilder::default()
            .per_millisecond(middleware_config.replenish_interval_ms())
            .burst_size(middleware_config.rate_limit_burst)
            .finish()
            .ok_or("failed to build governor config")?,
    );
    let app = app.layer(GovernorLayer {
        config: governor_conf,
    });

    let addr = format!("0.0.0.0:{}", config.port);
    let public_url = format!("http://127.0.0.1:{}", config.port);

    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|e| format!("Failed to bind to {}: {}", addr, e))?;

    tracing::info!("hospital-api is ready to accept requests at: {}", public_url);
    tracing::info!("API v1 endpoints available at: {}/v1", public_url);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal(middleware_config.shutdown_timeout))
    .await
    .map_err(|e| format!("Server error: {}", e))?;

    Ok(())
}
