//! HTTP surface: `POST /genera` with `{"prompt": "<category> <theme...>"}`.
//!
//! Response keys and messages match the existing web frontend.

use crate::core::engine::BlendEngine;
use crate::core::types::Outcome;
use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{error, info};

pub const BAD_FORMAT: &str = "Formato richiesto: Categoria Tema";
pub const CATEGORY_NOT_FOUND: &str = "Categoria non trovata";
pub const NO_MATCH: &str = "Nessun incastro trovato";
pub const DATA_UNAVAILABLE: &str = "File nomi.csv non trovato";

#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    pub prompt: String,
}

#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub output: String,
    pub originale: String,
    pub info: String,
}

/// Status and body for an outcome; `None` is a malformed prompt.
/// Only a missing dataset is an HTTP error, the rest answer 200.
pub fn render(outcome: Option<Outcome>) -> (StatusCode, Value) {
    match outcome {
        None => (StatusCode::OK, json!({ "errore": BAD_FORMAT })),
        Some(Outcome::Match(found)) => {
            let body = GenerateResponse {
                output: found.output,
                originale: found.original,
                info: found.info,
            };
            (StatusCode::OK, json!(body))
        }
        Some(Outcome::CategoryNotFound { .. }) => {
            (StatusCode::OK, json!({ "errore": CATEGORY_NOT_FOUND }))
        }
        Some(Outcome::NoMatch) => (StatusCode::OK, json!({ "errore": NO_MATCH })),
        Some(Outcome::DataUnavailable) => {
            (StatusCode::NOT_FOUND, json!({ "detail": DATA_UNAVAILABLE }))
        }
    }
}

pub fn create_router(engine: BlendEngine) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/genera", post(genera))
        .route("/health", get(health_check))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(engine)
}

async fn genera(
    State(engine): State<BlendEngine>,
    Json(req): Json<GenerateRequest>,
) -> (StatusCode, Json<Value>) {
    // The scan is CPU-bound; keep it off the async workers.
    let outcome = tokio::task::spawn_blocking(move || engine.generate_text(&req.prompt)).await;
    match outcome {
        Ok(outcome) => {
            let (status, body) = render(outcome);
            (status, Json(body))
        }
        Err(e) => {
            error!(error = %e, "search task failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "detail": "errore interno" })),
            )
        }
    }
}

async fn health_check() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

pub async fn serve(engine: BlendEngine, bind: &str) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(bind).await?;
    info!("Starting server on {}", listener.local_addr()?);
    axum::serve(listener, create_router(engine)).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::dataset::Dataset;
    use crate::core::syllable::ItalianSyllabifier;
    use crate::core::types::{CategoryRecord, MatchResult};
    use crate::semantic::NoExpansion;
    use crate::training::OverrideTable;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use std::sync::Arc;
    use tower::ServiceExt;

    fn engine() -> BlendEngine {
        let dataset = Dataset::new(vec![CategoryRecord {
            category: "Film".to_string(),
            name: "La Volpe Nave".to_string(),
        }]);
        BlendEngine::new(
            Some(dataset),
            OverrideTable::new(),
            Arc::new(NoExpansion),
            Arc::new(ItalianSyllabifier::default()),
        )
    }

    async fn post_prompt(router: Router, prompt: &str) -> (StatusCode, Value) {
        let request = Request::post("/genera")
            .header("content-type", "application/json")
            .body(Body::from(json!({ "prompt": prompt }).to_string()))
            .unwrap();
        let response = router.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[test]
    fn outcomes_render_distinct_messages() {
        assert_eq!(render(None).1["errore"], BAD_FORMAT);
        assert_eq!(render(Some(Outcome::NoMatch)).1["errore"], NO_MATCH);
        assert_eq!(
            render(Some(Outcome::CategoryNotFound {
                category: "animale".to_string()
            }))
            .1["errore"],
            CATEGORY_NOT_FOUND
        );
        let (status, body) = render(Some(Outcome::DataUnavailable));
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["detail"], DATA_UNAVAILABLE);
    }

    #[test]
    fn match_renders_frontend_keys() {
        let (status, body) = render(Some(Outcome::Match(MatchResult {
            output: "La Volpe LUNAVE".to_string(),
            original: "La Volpe Nave".to_string(),
            info: "'luna' + 'Nave'".to_string(),
            score: 80,
        })));
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["output"], "La Volpe LUNAVE");
        assert_eq!(body["originale"], "La Volpe Nave");
        assert_eq!(body["info"], "'luna' + 'Nave'");
        assert!(body.get("score").is_none());
    }

    #[tokio::test]
    async fn genera_returns_the_best_blend() {
        let (status, body) = post_prompt(create_router(engine()), "film luna").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["output"], "La Volpe LUNAVE");
    }

    #[tokio::test]
    async fn genera_rejects_single_token_prompts() {
        let (_, body) = post_prompt(create_router(engine()), "film").await;
        assert_eq!(body["errore"], BAD_FORMAT);
    }

    #[tokio::test]
    async fn health_answers_ok() {
        let request = Request::get("/health").body(Body::empty()).unwrap();
        let response = create_router(engine()).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
