//! Flight lookup route handler
//!
//! One blocking pipeline run per request: up to `max_attempts` sequential
//! fetches per spelling, two spellings worst case. There is no request-level
//! timeout budget beyond the per-fetch timeout.

use crate::{
    api_handler::{ApiError, ApiResult, FlightInfoQuery, FlightInfoResponse},
    AppState,
};
use axum::{
    extract::{Query, State},
    response::Json,
};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

/// GET /flight_info?flight_number=DL400
///
/// Runs the full lookup pipeline and returns the normalized summary together
/// with the flight-number spelling that produced it.
#[instrument(skip(state, query), fields(request_id))]
pub async fn flight_info_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<FlightInfoQuery>,
) -> ApiResult<FlightInfoResponse> {
    let request_id = Uuid::new_v4().to_string();
    tracing::Span::current().record("request_id", &request_id);

    let flight_number = match query.flight_number.as_deref().map(str::trim) {
        Some(number) if !number.is_empty() => number.to_string(),
        _ => {
            warn!("Request without a flight number");
            return Err(ApiError::MissingFlightNumber);
        }
    };

    info!("Looking up flight: {}", flight_number);
    let start_time = std::time::Instant::now();

    let (flight_info, spelling) = state.pipeline.lookup(&flight_number).await?;

    debug!("Lookup completed in {:?}", start_time.elapsed());
    info!("Flight information found using flight number: {}", spelling);

    Ok(Json(FlightInfoResponse {
        flight_number: spelling,
        flight_info,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::routes;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use axum::response::Response;
    use axum::Router;
    use flight_core::{LookupPipeline, ProxyPool};
    use http_body_util::BodyExt;
    use pretty_assertions::assert_eq;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    const BLOB_PAGE: &str = concat!(
        "<html><script>var trackpollBootstrap = {\"flights\": {\"DAL400-1\": ",
        "{\"flightStatus\": \"en route\", \"origin\": {\"icao\": \"KATL\"}, ",
        "\"flightPlan\": {\"ete\": 3600}}}};</script></html>"
    );

    async fn spawn_upstream(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}")
    }

    fn app_against(base_url: String) -> Router {
        let mut config = AppConfig::default();
        config.lookup.tracker_base_url = base_url;
        config.lookup.fetch_timeout_secs = 5;
        config.lookup.max_attempts = 1;

        let pipeline =
            LookupPipeline::new(config.lookup.to_lookup_config(), ProxyPool::empty());
        let state = AppState {
            pipeline: Arc::new(pipeline),
            config: Arc::new(config),
        };
        routes::build_routes(Arc::new(state))
    }

    async fn get(app: Router, uri: &str) -> Response {
        app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    async fn body_json(response: Response) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_missing_flight_number_is_400() {
        // Upstream is never contacted for an invalid request
        let app = app_against("http://127.0.0.1:9".to_string());

        let response = get(app, "/flight_info").await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await,
            json!({"error": "Flight number is required"})
        );
    }

    #[tokio::test]
    async fn test_empty_flight_number_is_400() {
        let app = app_against("http://127.0.0.1:9".to_string());

        let response = get(app, "/flight_info?flight_number=").await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await,
            json!({"error": "Flight number is required"})
        );
    }

    #[tokio::test]
    async fn test_upstream_server_errors_surface_as_404() {
        let upstream =
            Router::new().fallback(|| async { StatusCode::INTERNAL_SERVER_ERROR });
        let base = spawn_upstream(upstream).await;
        let app = app_against(base);

        let response = get(app, "/flight_info?flight_number=XX123").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            body_json(response).await,
            json!({"error": "Flight information not found or could not be processed."})
        );
    }

    #[tokio::test]
    async fn test_markerless_page_surfaces_as_404() {
        let upstream = Router::new()
            .fallback(|| async { axum::response::Html("<html>nothing here</html>") });
        let base = spawn_upstream(upstream).await;
        let app = app_against(base);

        let response = get(app, "/flight_info?flight_number=XX123").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            body_json(response).await,
            json!({"error": "Flight information not found or could not be processed."})
        );
    }

    #[tokio::test]
    async fn test_successful_lookup_returns_envelope() {
        let upstream =
            Router::new().fallback(|| async { axum::response::Html(BLOB_PAGE) });
        let base = spawn_upstream(upstream).await;
        let app = app_against(base);

        let response = get(app, "/flight_info?flight_number=DL400").await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["flight_number"], "DL400");
        assert_eq!(body["flight_info"]["flight_status"], "en route");
        assert_eq!(body["flight_info"]["origin"]["code"], "KATL");
        assert_eq!(body["flight_info"]["flight_duration"], "60 minutes");
        assert_eq!(body["flight_info"]["route"], "N/A");
        assert_eq!(body["flight_info"]["departure"]["scheduled"], "N/A");
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let app = app_against("http://127.0.0.1:9".to_string());

        let response = get(app, "/health").await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["status"], "healthy");
    }
}
