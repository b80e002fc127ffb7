use pathgate::{
    AppState, Category, MemoryUserState, Permissions,
    config::{AppConfig, Env},
    create_router,
    models::{ADMIN_ROLE, User},
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// main
///
/// Loads configuration, sets up logging, builds the permission gate over the
/// configured user state and serves the demo routes behind it.
#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();
    let config = AppConfig::load().expect("FATAL: invalid configuration");

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "pathgate=debug,tower_http=info".into());

    // Pretty output locally, JSON for log aggregation in production.
    match config.env {
        Env::Local => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
        Env::Production => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
    }

    tracing::info!("pathgate starting in {:?} mode", config.env);

    let perm = match &config.db_url {
        Some(url) => Permissions::with_config(url, &config.jwt_secret)
            .await
            .expect("FATAL: failed to connect to the user state database. Check DATABASE_URL."),
        None => {
            let store = Arc::new(MemoryUserState::with_secret(config.jwt_secret.clone()));
            if config.env == Env::Local {
                seed_local_admin(&store);
            }
            Permissions::from_user_state(store)
        }
    };

    config.apply(&perm);
    perm.add_path(Category::Public, "/health");

    let bind_addr = config.bind_addr.clone();
    let app = create_router(AppState { perm, config });

    let listener = TcpListener::bind(&bind_addr)
        .await
        .expect("FATAL: failed to bind listener. Check GATE_BIND_ADDR.");

    tracing::info!("Listening on {}", bind_addr);

    axum::serve(listener, app)
        .await
        .expect("FATAL: server error");
}

/// Adds a local admin account to the in-memory store and logs a session token for it.
fn seed_local_admin(store: &MemoryUserState) {
    let id = store.add_user(User::new("admin@localhost", ADMIN_ROLE));
    match store.issue_session(id) {
        Ok(token) => tracing::info!(user_id = %id, "local admin session: Bearer {}", token),
        Err(e) => tracing::warn!(error = %e, "could not issue local admin session"),
    }
}
