//! Data Fetch Layer against an in-process analytics backend

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::extract::Query;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use branch_assistant_analytics::{fetch_snapshot, AnalyticsSource, DateRange, HttpAnalyticsClient};
use branch_assistant_config::AnalyticsConfig;
use branch_assistant_core::BranchDirectory;
use chrono::NaiveDate;
use serde_json::json;

async fn spawn(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}/api", addr)
}

fn client(base_url: String) -> HttpAnalyticsClient {
    let config = AnalyticsConfig {
        base_url,
        ..Default::default()
    };
    HttpAnalyticsClient::new(&config, BranchDirectory::default()).unwrap()
}

fn range() -> DateRange {
    DateRange::trailing_days(NaiveDate::from_ymd_opt(2025, 1, 8).unwrap(), 7)
}

#[tokio::test]
async fn test_full_snapshot() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let seen_query = seen.clone();

    let router = Router::new()
        .route(
            "/api/analytics/footfall-trends",
            get(move |Query(params): Query<HashMap<String, String>>| {
                let seen = seen_query.clone();
                async move {
                    seen.lock().unwrap().push(params);
                    Json(json!([
                        {"date": "2025-01-07", "siruseri": 40, "tnagar": 35, "navalur": 25, "total": 100},
                        {"date": "2025-01-08", "siruseri": 42, "tnagar": 30, "navalur": 28, "total": 100}
                    ]))
                }
            }),
        )
        .route(
            "/api/analytics/branch-comparison",
            get(|| async {
                Json(json!([
                    {"branchName": "Siruseri", "totalFootfall": 280, "totalRevenue": 2300000, "customerSatisfaction": 4.2, "serviceEfficiency": 88},
                    {"branchName": "T Nagar", "totalFootfall": 245}
                ]))
            }),
        )
        .route(
            "/api/dashboard/real-time-stats",
            get(|| async { Json(json!({"serverHealth": "Healthy", "activeConnections": 4, "lastUpdate": "10:00"})) }),
        );
    let client = client(spawn(router).await);

    let snapshot = fetch_snapshot(&client, &range()).await;

    let footfall = snapshot.footfall_series().unwrap();
    assert_eq!(footfall.len(), 2);
    assert_eq!(footfall[1].count("navalur"), 28);

    let branches = snapshot.branches().unwrap();
    assert_eq!(branches[0].branch_name, "New York");
    assert_eq!(branches[1].branch_name, "Washington DC");
    assert_eq!(branches[1].total_revenue, None);

    assert_eq!(snapshot.stats().unwrap().active_connections, Some(4));

    let params = seen.lock().unwrap();
    assert_eq!(params[0].get("startDate").map(String::as_str), Some("2025-01-01"));
    assert_eq!(params[0].get("endDate").map(String::as_str), Some("2025-01-08"));
}

#[tokio::test]
async fn test_partial_failure_keeps_other_fields() {
    let router = Router::new()
        .route(
            "/api/analytics/footfall-trends",
            get(|| async { Json(json!([{"date": "2025-01-08", "siruseri": 10, "total": 10}])) }),
        )
        .route(
            "/api/analytics/branch-comparison",
            get(|| async { StatusCode::INTERNAL_SERVER_ERROR }),
        )
        .route("/api/dashboard/real-time-stats", get(|| async { "not json" }));
    let client = client(spawn(router).await);

    let snapshot = fetch_snapshot(&client, &range()).await;
    assert!(snapshot.footfall_series().is_some());
    assert!(snapshot.branch_comparison.is_none());
    assert!(snapshot.real_time_stats.is_none());
}

#[tokio::test]
async fn test_unreachable_backend_yields_empty_snapshot() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = client(format!("http://{}/api", addr));
    let snapshot = fetch_snapshot(&client, &range()).await;
    assert!(!snapshot.has_any_data());
}

#[tokio::test]
async fn test_refresh_data_context() {
    let router = Router::new().route("/api/data-context/refresh", post(|| async { StatusCode::OK }));
    let backend = client(spawn(router).await);
    backend.refresh_data_context().await.unwrap();

    let missing = client(spawn(Router::new()).await);
    assert!(missing.refresh_data_context().await.is_err());
}
