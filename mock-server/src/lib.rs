//! In-process mock of the content API: a descriptor at `/api` and a search
//! endpoint at `/api/documents/search` over a fixed set of documents.
//!
//! Query support is limited to what the fixtures need: `at(document.id, "..")`
//! and `at(document.type, "..")` filters. Any other query returns every
//! document.

pub mod fixtures;

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::net::TcpListener;

pub struct Repository {
    pub base_url: String,
    pub documents: Vec<Value>,
}

pub type Repo = Arc<Repository>;

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(rename = "ref")]
    pub ref_: String,
    #[serde(default)]
    pub q: Option<String>,
}

pub fn app(base_url: &str) -> Router {
    let base_url = base_url.trim_end_matches('/').to_string();
    let repo: Repo = Arc::new(Repository {
        documents: fixtures::documents(&base_url),
        base_url,
    });
    Router::new()
        .route("/api", get(api))
        .route("/api/documents/search", get(search))
        .with_state(repo)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!(%addr, "mock content api listening");
    axum::serve(listener, app(&format!("http://{addr}"))).await
}

async fn api(State(repo): State<Repo>) -> Json<Value> {
    Json(fixtures::api_descriptor(&repo.base_url))
}

async fn search(
    State(repo): State<Repo>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    if params.ref_ != fixtures::MASTER_REF && params.ref_ != fixtures::PREVIEW_REF {
        tracing::debug!(ref_ = %params.ref_, "unknown ref");
        return Err((
            StatusCode::BAD_REQUEST,
            Json(json!({"error": format!("unknown ref: {}", params.ref_)})),
        ));
    }

    let query = params.q.as_deref().unwrap_or_default();
    let results: Vec<Value> = repo
        .documents
        .iter()
        .filter(|doc| matches_query(doc, query))
        .cloned()
        .collect();
    let size = results.len();
    Ok(Json(json!({
        "license": "All Rights Reserved",
        "next_page": null,
        "page": 1,
        "prev_page": null,
        "results": results,
        "results_per_page": 20,
        "results_size": size,
        "total_pages": 1,
        "total_results_size": size,
        "version": "mock-1"
    })))
}

fn matches_query(doc: &Value, query: &str) -> bool {
    if let Some(id) = at_value(query, "document.id") {
        return doc["id"] == id;
    }
    if let Some(doc_type) = at_value(query, "document.type") {
        return doc["type"] == doc_type;
    }
    true
}

/// The quoted value of `at(<fragment>, "<value>")` within `query`.
pub fn at_value<'q>(query: &'q str, fragment: &str) -> Option<&'q str> {
    let prefix = format!("at({fragment}, \"");
    let start = query.find(&prefix)? + prefix.len();
    let len = query[start..].find('"')?;
    Some(&query[start..start + len])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn at_value_extracts_quoted_value() {
        let q = r#"[:d = at(document.id, "abc")]"#;
        assert_eq!(at_value(q, "document.id"), Some("abc"));
        assert_eq!(at_value(q, "document.type"), None);
    }

    #[test]
    fn matches_filters_by_id_and_type() {
        let docs = fixtures::documents("http://localhost");
        let about = &docs[0];
        assert!(matches_query(about, &format!("[:d = at(document.id, \"{}\")]", fixtures::ABOUT_ID)));
        assert!(!matches_query(about, "[:d = at(document.type, \"article\")]"));
        assert!(matches_query(about, ""));
    }

    #[test]
    fn descriptor_points_forms_at_base_url() {
        let api = fixtures::api_descriptor("http://127.0.0.1:9");
        assert_eq!(
            api["forms"]["everything"]["action"],
            "http://127.0.0.1:9/api/documents/search"
        );
        assert_eq!(api["refs"][0]["isMasterRef"], true);
    }
}
