//! Search response envelope.
//!
//! The envelope and per-result metadata are fixed; each result's `data`
//! object goes through the caller's decoder.

use serde::Deserialize;
use serde_json::Value;

use super::field::DocumentReference;
use crate::error::DecodeError;

#[derive(Debug, Clone, PartialEq)]
pub struct Response<T> {
    pub license: String,
    pub next_page: Option<String>,
    pub page: u32,
    pub prev_page: Option<String>,
    pub results: Vec<SearchResult<T>>,
    pub results_per_page: u32,
    pub results_size: u32,
    pub total_pages: u32,
    pub total_results_size: u32,
    pub version: String,
}

/// One document returned by a query.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult<T> {
    pub data: T,
    pub href: String,
    pub id: String,
    pub uid: Option<String>,
    pub linked_documents: Vec<DocumentReference>,
    pub slugs: Vec<String>,
    pub tags: Vec<String>,
    pub doc_type: String,
}

#[derive(Deserialize)]
struct RawResponse {
    license: String,
    #[serde(default)]
    next_page: Option<String>,
    page: u32,
    #[serde(default)]
    prev_page: Option<String>,
    results: Vec<Value>,
    results_per_page: u32,
    results_size: u32,
    total_pages: u32,
    total_results_size: u32,
    version: String,
}

#[derive(Deserialize)]
struct RawResult {
    href: String,
    id: String,
    #[serde(default)]
    uid: Option<String>,
    linked_documents: Vec<DocumentReference>,
    slugs: Vec<String>,
    tags: Vec<String>,
    #[serde(rename = "type")]
    doc_type: String,
}

/// Decode a search response, running `decode_doc` over every result's `data`.
pub fn decode_response<T, D>(raw: &Value, decode_doc: D) -> Result<Response<T>, DecodeError>
where
    D: Fn(&Value) -> Result<T, DecodeError>,
{
    let envelope = RawResponse::deserialize(raw)?;
    let results = envelope
        .results
        .iter()
        .map(|result| decode_result(result, &decode_doc))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Response {
        license: envelope.license,
        next_page: envelope.next_page,
        page: envelope.page,
        prev_page: envelope.prev_page,
        results,
        results_per_page: envelope.results_per_page,
        results_size: envelope.results_size,
        total_pages: envelope.total_pages,
        total_results_size: envelope.total_results_size,
        version: envelope.version,
    })
}

fn decode_result<T, D>(raw: &Value, decode_doc: &D) -> Result<SearchResult<T>, DecodeError>
where
    D: Fn(&Value) -> Result<T, DecodeError>,
{
    let meta = RawResult::deserialize(raw)?;
    let data = raw
        .get("data")
        .ok_or_else(|| DecodeError::MissingField("data".to_string()))?;
    Ok(SearchResult {
        data: decode_doc(data)?,
        href: meta.href,
        id: meta.id,
        uid: meta.uid,
        linked_documents: meta.linked_documents,
        slugs: meta.slugs,
        tags: meta.tags,
        doc_type: meta.doc_type,
    })
}
