use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::Config;
use crate::middleware::{metrics_handler, metrics_middleware, trace_id};
use crate::routes::{ai, campaigns, customers, health, orders, receipts, segments, vendor};
use crate::services::{CampaignLauncher, DeliveryDispatcher, TextGenerationClient, VendorSimulator};

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<Config>,
    pub launcher: Arc<CampaignLauncher>,
    pub vendor: Arc<VendorSimulator>,
    pub text_gen: Arc<TextGenerationClient>,
}

pub fn create_app(config: Config, pool: PgPool) -> anyhow::Result<Router> {
    let config = Arc::new(config);

    let dispatcher = Arc::new(DeliveryDispatcher::new(&config.delivery)?);
    let launcher = Arc::new(CampaignLauncher::new(pool.clone(), dispatcher));
    let vendor = Arc::new(VendorSimulator::new(&config.delivery)?);
    let text_gen = Arc::new(TextGenerationClient::new(&config.ai)?);

    let state = AppState {
        pool,
        config: config.clone(),
        launcher,
        vendor,
        text_gen,
    };

    // Build CORS layer based on configuration
    let cors = if config.security.cors_origins.is_empty() {
        // Default: allow any origin (for development)
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        use tower_http::cors::AllowOrigin;
        let origins: Vec<_> = config
            .security
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    };

    // Operator routes: everything a signed-in marketing user touches.
    // Identification happens per-handler through the Operator extractor.
    let operator_routes = Router::new()
        .route(
            "/api/v1/customers",
            post(customers::create_customer).get(customers::list_customers),
        )
        .route(
            "/api/v1/orders",
            post(orders::create_order).get(orders::list_orders),
        )
        .route("/api/v1/segments/preview", post(segments::preview_segment))
        .route(
            "/api/v1/campaigns",
            post(campaigns::launch_campaign).get(campaigns::list_campaigns),
        )
        .route("/api/v1/campaigns/:id", get(campaigns::get_campaign))
        .route("/api/v1/ai/rules", post(ai::nl_to_rules))
        .route(
            "/api/v1/ai/message-suggestions",
            post(ai::message_suggestions),
        )
        .route("/api/v1/ai/campaign-summary", post(ai::summarize_campaign));

    // Callback routes: hit by the vendor, not by operators. No identity
    // header is required here.
    let callback_routes = Router::new()
        .route(
            "/api/v1/delivery-receipts",
            post(receipts::process_receipt),
        )
        .route("/api/v1/vendor/send-message", post(vendor::send_message));

    // Public routes (no authentication required)
    let public_routes = Router::new()
        .route("/api/health", get(health::health_check))
        .route("/api/health/ready", get(health::ready))
        .route("/api/health/live", get(health::live))
        .route("/metrics", get(metrics_handler));

    // Merge all routes
    let app = Router::new()
        .merge(public_routes)
        .merge(operator_routes)
        .merge(callback_routes)
        // Global middleware (order matters: bottom layers run first)
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(middleware::from_fn(metrics_middleware)) // Prometheus metrics
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(trace_id)) // Request ID and logging
        .layer(cors)
        .with_state(state);

    Ok(app)
}
