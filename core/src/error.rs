//! Error types for the content API client.
//!
//! # Design
//! Lookup failures (`FormNotFound`, `RefNotFound`, `BookmarkNotFound`) get
//! dedicated variants because they happen before any network traffic and the
//! caller usually wants to report the missing name. Transport failures are kept
//! apart from decode failures: a transport error means nothing was received,
//! a decode error means the payload did not match the expected schema.

use std::fmt;

use thiserror::Error;

/// Errors returned by the request builder and the submission pipeline.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PrismicError {
    /// No form with this id in the API descriptor.
    #[error("form not found: {0}")]
    FormNotFound(String),

    /// No ref with this id in the API descriptor.
    #[error("ref not found: {0}")]
    RefNotFound(String),

    /// No bookmark with this name in the API descriptor.
    #[error("bookmark not found: {0}")]
    BookmarkNotFound(String),

    /// The API descriptor could not be fetched or decoded.
    #[error("failed to fetch api: {0}")]
    ApiFetchError(#[source] FetchFailure),

    /// The document query could not be sent or the server rejected it.
    #[error("request failed: {0}")]
    SubmitRequestError(#[source] TransportError),

    /// The query response did not match the expected document schema.
    #[error("failed to decode response: {0}")]
    SubmitDecodeError(#[source] DecodeError),
}

/// Why fetching the API descriptor failed.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FetchFailure {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Decode(#[from] DecodeError),
}

/// Errors produced by a [`Transport`](crate::http::Transport) implementation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// The server answered with a non-2xx status.
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// The request never produced a response (DNS, connect, timeout...).
    #[error("network error: {0}")]
    Network(String),

    /// The response body was not valid JSON.
    #[error("invalid json body: {0}")]
    InvalidJson(String),
}

/// The tagged part of the schema a [`DecodeError::UnknownTag`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagKind {
    DocumentField,
    StructuredTextBlock,
    Span,
    Embed,
    Link,
}

impl fmt::Display for TagKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TagKind::DocumentField => "document field",
            TagKind::StructuredTextBlock => "structured text block",
            TagKind::Span => "span",
            TagKind::Embed => "embed",
            TagKind::Link => "link",
        };
        f.write_str(name)
    }
}

/// Schema mismatch while decoding API or document JSON.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// A `"type"` discriminant this client does not know about.
    #[error("unknown {kind} type: {tag}")]
    UnknownTag { kind: TagKind, tag: String },

    /// A value had the wrong JSON shape.
    #[error("expected {expected} at {path}, found {found}")]
    Mismatch {
        path: String,
        expected: String,
        found: String,
    },

    /// A required key was absent.
    #[error("missing field `{0}`")]
    MissingField(String),

    /// Error reported by a serde-derived payload.
    #[error("{0}")]
    Json(String),
}

impl DecodeError {
    pub fn unknown_tag(kind: TagKind, tag: impl Into<String>) -> Self {
        Self::UnknownTag {
            kind,
            tag: tag.into(),
        }
    }

    pub fn mismatch(path: impl Into<String>, expected: impl Into<String>, found: &serde_json::Value) -> Self {
        Self::Mismatch {
            path: path.into(),
            expected: expected.into(),
            found: json_kind(found).to_string(),
        }
    }
}

impl From<serde_json::Error> for DecodeError {
    fn from(e: serde_json::Error) -> Self {
        DecodeError::Json(e.to_string())
    }
}

/// Short name of a JSON value's shape, for mismatch messages.
pub(crate) fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "bool",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn unknown_tag_message_names_the_tag() {
        let err = DecodeError::unknown_tag(TagKind::DocumentField, "UnknownType");
        assert_eq!(err.to_string(), "unknown document field type: UnknownType");
    }

    #[test]
    fn mismatch_reports_found_shape() {
        let err = DecodeError::mismatch("refs", "array", &json!({"a": 1}));
        assert_eq!(err.to_string(), "expected array at refs, found object");
    }

    #[test]
    fn submit_decode_error_wraps_cause() {
        let err = PrismicError::SubmitDecodeError(DecodeError::MissingField("results".into()));
        assert_eq!(err.to_string(), "failed to decode response: missing field `results`");
    }
}
