//! Client core for a headless content API.
//!
//! # Overview
//! Fetches a repository's API descriptor, builds queries against its forms and
//! refs, submits them through a caller-supplied [`Transport`], decodes the
//! polymorphic document schema and renders it to HTML.
//!
//! # Design
//! - The host owns all I/O: the core describes requests as [`HttpRequest`]
//!   values and a [`Transport`] implementation executes them.
//! - [`Model`] is a plain session value (config, descriptor, cache). Pipeline
//!   calls return an updated copy instead of mutating shared state.
//! - The cache stores raw JSON keyed by the canonical request, so a payload can
//!   be decoded again with a different document decoder.
//! - Tagged JSON is decoded by explicit dispatch on `"type"`; unknown tags are
//!   reported by name.

pub mod api;
pub mod cache;
pub mod client;
pub mod config;
pub mod document;
pub mod error;
pub mod html;
pub mod http;
pub mod predicate;
pub mod request;

pub use api::{decode_api, ApiDescriptor, Experiments, FieldType, Form, FormField, RefProperties};
pub use cache::{merge_caches, Cache};
pub use client::Model;
pub use config::ClientConfig;
pub use document::{
    decode_default_doc_type, serde_decoder, DefaultDocType, DocumentField, DocumentReference, Link, Response,
    SearchResult, StructuredText, StructuredTextBlock,
};
pub use error::{DecodeError, FetchFailure, PrismicError, TagKind, TransportError};
pub use html::{default_link_resolver, Html};
pub use http::{HttpMethod, HttpRequest, Transport};
pub use predicate::Predicate;
pub use request::{Request, RequestBuilder};
