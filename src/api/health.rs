use actix_web::{HttpResponse, Responder, get, web};
use serde::Serialize;
use sqlx::{Pool, Sqlite};
use tracing::{debug, error};

/// Health check response
#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    database: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

async fn probe_database(pool: &Pool<Sqlite>, up: &'static str, down: &'static str) -> HttpResponse {
    match sqlx::query("SELECT 1").fetch_one(pool).await {
        Ok(_) => HttpResponse::Ok().json(HealthResponse {
            status: up,
            database: "connected",
            error: None,
        }),
        Err(e) => {
            error!("{} probe failed: database unavailable: {:?}", up, e);
            HttpResponse::ServiceUnavailable().json(HealthResponse {
                status: down,
                database: "disconnected",
                error: Some(format!("Database error: {}", e)),
            })
        }
    }
}

/// Health check endpoint
///
/// General health check including database connectivity.
/// Use for load balancers and uptime monitors.
#[get("/health")]
async fn health_check(pool: web::Data<Pool<Sqlite>>) -> impl Responder {
    probe_database(&pool, "healthy", "unhealthy").await
}

/// Readiness check endpoint
///
/// Returns 503 while the database is unreachable; the process recovers once it returns.
#[get("/ready")]
async fn readiness_check(pool: web::Data<Pool<Sqlite>>) -> impl Responder {
    probe_database(&pool, "ready", "not_ready").await
}

/// Liveness check endpoint, no dependencies checked
#[get("/live")]
async fn liveness_check() -> impl Responder {
    debug!("Liveness check");
    HttpResponse::Ok().json(serde_json::json!({ "status": "alive" }))
}

#[get("/")]
async fn index() -> impl Responder {
    HttpResponse::Ok().body("Hello, World!")
}

pub fn health_config(config: &mut web::ServiceConfig) {
    config
        .service(index)
        .service(health_check)
        .service(readiness_check)
        .service(liveness_check);
}
