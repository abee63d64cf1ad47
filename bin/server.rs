// Basket Miner - Web Server
// REST API with Axum: POST baskets, get itemsets and rules back

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use basket_miner::{analyze, Item, InMemorySource, MiningConfig, MiningReport, TransactionSource};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;

/// API Response wrapper
#[derive(Serialize)]
struct ApiResponse<T> {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<T> ApiResponse<T> {
    fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    fn err(message: String) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message),
        }
    }
}

/// Mining request (thresholds as fractions)
#[derive(Deserialize)]
struct MineRequest {
    #[serde(default = "default_source")]
    source: String,
    transactions: Vec<Vec<Item>>,
    min_support: f64,
    min_confidence: f64,
    #[serde(default)]
    max_itemset_size: Option<usize>,
}

fn default_source() -> String {
    "request".to_string()
}

// ============================================================================
// API Handlers
// ============================================================================

/// GET /api/health - Health check
async fn health_check() -> impl IntoResponse {
    Json(ApiResponse::ok("OK"))
}

/// POST /api/mine - Mine the posted baskets
async fn mine(Json(request): Json<MineRequest>) -> impl IntoResponse {
    let mut config = MiningConfig::new(request.min_support, request.min_confidence).with_parallel(true);
    if let Some(max) = request.max_itemset_size {
        config = config.with_max_itemset_size(max);
    }

    let source = InMemorySource::new(&request.source, request.transactions);

    // Counting is CPU bound; keep it off the async workers
    let outcome = tokio::task::spawn_blocking(move || -> anyhow::Result<MiningReport> {
        let dataset = source.load()?;
        let fingerprint = dataset.fingerprint();
        let analysis = analyze(&dataset, &config)?;
        Ok(MiningReport::new(source.name(), fingerprint, &config, analysis))
    })
    .await;

    match outcome {
        Ok(Ok(report)) => (StatusCode::OK, Json(ApiResponse::ok(report))).into_response(),
        Ok(Err(e)) => {
            tracing::warn!(error = %e, "rejected mining request");
            (
                StatusCode::BAD_REQUEST,
                Json(ApiResponse::<MiningReport>::err(e.to_string())),
            )
                .into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "mining task failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<MiningReport>::err("mining task failed".to_string())),
            )
                .into_response()
        }
    }
}

// ============================================================================
// Main Server
// ============================================================================

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    println!("🌐 Basket Miner - Web Server");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    // Build API routes
    let api_routes = Router::new()
        .route("/health", get(health_check))
        .route("/mine", post(mine));

    let app = Router::new()
        .nest("/api", api_routes)
        .layer(CorsLayer::permissive());

    // Start server
    let addr = "0.0.0.0:3000";
    let listener = tokio::net::TcpListener::bind(addr).await?;

    println!("\n🚀 Server running on http://localhost:3000");
    println!("   API: POST http://localhost:3000/api/mine");
    println!("\n   Press Ctrl+C to stop\n");

    axum::serve(listener, app).await?;
    Ok(())
}
