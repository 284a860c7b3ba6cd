mod config;
mod database;
mod error;
mod extract;
mod handlers;
mod middleware;
mod models;
mod services;
mod utils;

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_cookies::CookieManagerLayer;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use config::Config;
use database::{create_database_pool, run_migrations, AppState};

#[tokio::main]
async fn main() {
    // Initialize logging
    env_logger::init();

    if let Err(err) = run().await {
        log::error!("{}", err);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::from_env()?;

    let db = create_database_pool(&config.database_url).await?;
    run_migrations(&db).await?;

    let addr = config.bind_addr();
    let app = create_router(AppState::new(db, config));

    log::info!("stockbook listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn create_router(state: AppState) -> Router {
    Router::new()
        // Session routes
        .route("/register", post(handlers::auth::register))
        .route("/login", post(handlers::auth::login))
        .route("/logout", post(handlers::auth::logout))

        // Chart data
        .route("/sales-data", get(handlers::sales::sales_data))

        .route("/api/dashboard", get(handlers::dashboard::dashboard))

        // Categories
        .route(
            "/api/categories",
            get(handlers::categories::categories_list).post(handlers::categories::create_category),
        )
        .route("/api/categories/:id", delete(handlers::categories::delete_category))

        // Items
        .route(
            "/api/items",
            get(handlers::inventory::items_list).post(handlers::inventory::create_item),
        )
        .route("/api/items/low-stock", get(handlers::inventory::low_stock_list))
        .route("/api/items/next-sn", get(handlers::inventory::next_sn))
        .route(
            "/api/items/:id",
            get(handlers::inventory::item_detail)
                .put(handlers::inventory::update_item)
                .delete(handlers::inventory::delete_item),
        )

        // Transactions
        .route(
            "/api/transactions",
            get(handlers::transactions::transaction_list)
                .post(handlers::transactions::record_transaction),
        )

        // Middleware
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CookieManagerLayer::new())
                .layer(CorsLayer::permissive())
                .layer(DefaultBodyLimit::max(1024 * 1024)), // 1MB
        )
        .with_state(state)
}
