use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpResponse, HttpServer};
use blog_service::db::{
    ensure_schema, PgCommentRepository, PgFollowRepository, PgGroupRepository, PgPostRepository,
    PgUserRepository,
};
use blog_service::handlers::{self, AppState};
use blog_service::middleware::IdentityMiddleware;
use blog_service::Config;
use db_pool::{create_pool, DbConfig};
use std::io;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

struct HealthState {
    db_pool: sqlx::PgPool,
}

impl HealthState {
    async fn check_postgres(&self) -> Result<(), sqlx::Error> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.db_pool)
            .await
            .map(|_| ())
    }
}

async fn health_summary(state: web::Data<HealthState>) -> HttpResponse {
    match state.check_postgres().await {
        Ok(_) => HttpResponse::Ok().json(serde_json::json!({
            "status": "ok",
            "service": "blog-service",
            "version": env!("CARGO_PKG_VERSION")
        })),
        Err(e) => HttpResponse::ServiceUnavailable().json(serde_json::json!({
            "status": "unhealthy",
            "error": format!("PostgreSQL connection failed: {}", e),
            "service": "blog-service"
        })),
    }
}

async fn liveness_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({"alive": true}))
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,actix_web=debug,sqlx=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::error!("Configuration loading failed: {:#}", e);
            eprintln!("ERROR: Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    tracing::info!("Starting blog-service v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Environment: {}", config.app.env);

    // Initialize database connection pool
    let mut db_cfg = DbConfig::from_env().unwrap_or_default();
    if db_cfg.database_url.is_empty() {
        db_cfg.database_url = config.database.url.clone();
    }
    if db_cfg.max_connections < config.database.max_connections {
        db_cfg.max_connections = config.database.max_connections;
    }

    db_cfg.log_config();
    let db_pool = match create_pool(db_cfg).await {
        Ok(pool) => pool,
        Err(e) => {
            tracing::error!("Database pool creation failed: {:#}", e);
            eprintln!("ERROR: Failed to create database pool: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = ensure_schema(&db_pool).await {
        tracing::error!("Schema bootstrap failed: {:#}", e);
        return Err(io::Error::new(
            io::ErrorKind::Other,
            format!("Failed to ensure schema: {e}"),
        ));
    }

    tracing::info!("Connected to database, schema ensured");

    let state = AppState {
        config: config.clone(),
        users: Arc::new(PgUserRepository::new(db_pool.clone())),
        groups: Arc::new(PgGroupRepository::new(db_pool.clone())),
        posts: Arc::new(PgPostRepository::new(db_pool.clone())),
        comments: Arc::new(PgCommentRepository::new(db_pool.clone())),
        follows: Arc::new(PgFollowRepository::new(db_pool.clone())),
    };
    let state_data = web::Data::new(state);
    let health_state = web::Data::new(HealthState {
        db_pool: db_pool.clone(),
    });

    let bind_address = format!("{}:{}", config.app.host, config.app.port);
    tracing::info!("Starting HTTP server at {}", bind_address);

    let jwt_secret = config.auth.jwt_secret.clone();
    let cors_origins = config.cors.allowed_origins.clone();

    HttpServer::new(move || {
        // Build CORS configuration
        let mut cors = Cors::default();
        for origin in cors_origins.split(',') {
            let origin = origin.trim();
            if origin == "*" {
                cors = cors.allow_any_origin();
            } else {
                cors = cors.allowed_origin(origin);
            }
        }
        cors = cors.allow_any_method().allow_any_header().max_age(3600);

        App::new()
            .app_data(state_data.clone())
            .app_data(health_state.clone())
            .wrap(cors)
            .wrap(Logger::default())
            .wrap(tracing_actix_web::TracingLogger::default())
            .wrap(IdentityMiddleware::new(&jwt_secret))
            .route(
                "/metrics",
                web::get().to(blog_service::metrics::serve_metrics),
            )
            .route("/health", web::get().to(health_summary))
            .route("/health/live", web::get().to(liveness_check))
            .configure(handlers::configure)
    })
    .bind(&bind_address)?
    .workers(4)
    .run()
    .await
}
