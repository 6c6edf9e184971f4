//! Immutable query requests and the fluent builder that produces them.
//!
//! # Design
//! `RequestBuilder` carries a `Result<Request, PrismicError>` through every
//! step. The first failing step stores its error and every later step is a
//! no-op, so `build()` reports the first error in the chain. Steps other than
//! the initial form selection can be applied in any order.

use std::fmt;

use url::form_urlencoded;

use crate::api::{ApiDescriptor, MASTER_REF_ID};
use crate::error::PrismicError;
use crate::http::HttpRequest;
use crate::predicate::{predicates_to_query, Predicate};

/// Form every bookmark lookup is issued against.
pub const EVERYTHING_FORM: &str = "everything";

/// A fully resolved document query.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Request {
    pub action: String,
    pub ref_: String,
    pub query: String,
}

impl Request {
    /// `action?ref=<ref>[&q=<query>]` with parameters form-encoded.
    pub fn url(&self) -> String {
        let mut params = form_urlencoded::Serializer::new(String::new());
        params.append_pair("ref", &self.ref_);
        if !self.query.is_empty() {
            params.append_pair("q", &self.query);
        }
        let separator = if self.action.contains('?') { '&' } else { '?' };
        format!("{}{separator}{}", self.action, params.finish())
    }

    pub fn to_http(&self) -> HttpRequest {
        HttpRequest::get(self.url())
    }

    /// Canonical string form used as the cache key. Two requests with the same
    /// action, ref and query always produce the same key.
    pub fn cache_key(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Request {{ action: {:?}, ref: {:?}, query: {:?} }}",
            self.action, self.ref_, self.query
        )
    }
}

/// Fail-fast builder over an [`ApiDescriptor`].
#[derive(Debug, Clone)]
pub struct RequestBuilder<'a> {
    api: &'a ApiDescriptor,
    state: Result<Request, PrismicError>,
}

impl<'a> RequestBuilder<'a> {
    /// Start from `form_id` on the master ref, with the form's default query.
    pub fn form(api: &'a ApiDescriptor, form_id: &str) -> Self {
        let state = select_form(api, form_id);
        Self { api, state }
    }

    /// Fetch the document a bookmark points at, through the `everything` form.
    pub fn bookmark(api: &'a ApiDescriptor, name: &str) -> Self {
        match api.bookmark(name) {
            Ok(doc_id) => {
                let doc_id = doc_id.to_string();
                Self::form(api, EVERYTHING_FORM).query(&[Predicate::at("document.id", doc_id)])
            }
            Err(e) => Self { api, state: Err(e) },
        }
    }

    /// Switch to another ref, looked up by id. Labels are not matched.
    pub fn with_ref(self, ref_id: &str) -> Self {
        let api = self.api;
        self.and_then(|request| select_ref(api, request, ref_id))
    }

    /// Replace the query with the serialized `predicates`.
    ///
    /// An empty slice clears the query, including the form's default `q`.
    pub fn query(self, predicates: &[Predicate]) -> Self {
        self.and_then(|request| Ok(attach_predicates(request, predicates)))
    }

    pub fn build(self) -> Result<Request, PrismicError> {
        self.state
    }

    fn and_then<F>(self, step: F) -> Self
    where
        F: FnOnce(Request) -> Result<Request, PrismicError>,
    {
        Self {
            api: self.api,
            state: self.state.and_then(step),
        }
    }
}

impl ApiDescriptor {
    pub fn select_form(&self, form_id: &str) -> RequestBuilder<'_> {
        RequestBuilder::form(self, form_id)
    }

    pub fn select_bookmark(&self, name: &str) -> RequestBuilder<'_> {
        RequestBuilder::bookmark(self, name)
    }
}

/// Resolve `form_id` and the master ref into an initial request.
pub fn select_form(api: &ApiDescriptor, form_id: &str) -> Result<Request, PrismicError> {
    let form = api.form(form_id)?;
    let master = api
        .refs
        .iter()
        .find(|r| r.id == MASTER_REF_ID)
        .ok_or_else(|| PrismicError::RefNotFound(MASTER_REF_ID.to_string()))?;
    Ok(Request {
        action: form.action.clone(),
        ref_: master.ref_.clone(),
        query: form.default_query(),
    })
}

pub fn select_ref(api: &ApiDescriptor, request: Request, ref_id: &str) -> Result<Request, PrismicError> {
    let found = api
        .find_ref(ref_id)
        .ok_or_else(|| PrismicError::RefNotFound(ref_id.to_string()))?;
    Ok(Request {
        ref_: found.ref_.clone(),
        ..request
    })
}

pub fn attach_predicates(request: Request, predicates: &[Predicate]) -> Request {
    Request {
        query: predicates_to_query(predicates),
        ..request
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::decode_api;
    use crate::api::tests::sample_api_json;

    fn api() -> ApiDescriptor {
        decode_api(&sample_api_json()).unwrap()
    }

    #[test]
    fn select_form_uses_master_ref_and_default_query() {
        let api = api();
        let request = api.select_form("articles").build().unwrap();
        assert_eq!(request.action, "http://localhost:3000/api/documents/search");
        assert_eq!(request.ref_, "UlfoxUnM0wkXYXbH");
        assert_eq!(request.query, "[:d = any(document.type, [ \"article\" ])]");
    }

    #[test]
    fn missing_form_fails() {
        let api = api();
        let err = api.select_form("missing").build().unwrap_err();
        assert_eq!(err, PrismicError::FormNotFound("missing".into()));
    }

    #[test]
    fn missing_master_ref_fails() {
        let mut api = api();
        api.refs.retain(|r| r.id != "master");
        let err = api.select_form("everything").build().unwrap_err();
        assert_eq!(err, PrismicError::RefNotFound("master".into()));
    }

    #[test]
    fn with_ref_overrides_token() {
        let api = api();
        let request = api.select_form("everything").with_ref("preview").build().unwrap();
        assert_eq!(request.ref_, "UlfoxUnM0wkXYXbP");
    }

    #[test]
    fn unknown_ref_fails() {
        let api = api();
        let err = api.select_form("everything").with_ref("nope").build().unwrap_err();
        assert_eq!(err, PrismicError::RefNotFound("nope".into()));
    }

    #[test]
    fn ref_label_is_not_an_id() {
        let api = api();
        let err = api.select_form("everything").with_ref("Preview").build().unwrap_err();
        assert_eq!(err, PrismicError::RefNotFound("Preview".into()));
    }

    #[test]
    fn empty_predicates_clear_form_default_query() {
        let api = api();
        let default = api.select_form("articles").build().unwrap();
        assert!(!default.query.is_empty());

        let cleared = api.select_form("articles").query(&[]).build().unwrap();
        assert_eq!(cleared.query, "");
        assert!(!cleared.url().contains("q="), "{}", cleared.url());
    }

    #[test]
    fn query_replaces_previous_query() {
        let api = api();
        let request = api
            .select_form("articles")
            .query(&[Predicate::at("document.type", "blog")])
            .query(&[Predicate::at("document.id", "abc")])
            .build()
            .unwrap();
        assert_eq!(request.query, r#"[:d = at(document.id, "abc")]"#);
    }

    #[test]
    fn first_error_wins() {
        let api = api();
        let err = api
            .select_form("missing")
            .with_ref("also-missing")
            .query(&[Predicate::at("document.id", "abc")])
            .build()
            .unwrap_err();
        assert_eq!(err, PrismicError::FormNotFound("missing".into()));
    }

    #[test]
    fn bookmark_matches_everything_form_with_id_predicate() {
        let api = api();
        let via_bookmark = api.select_bookmark("about").build().unwrap();
        let explicit = api
            .select_form("everything")
            .query(&[Predicate::at("document.id", "UlfoxUnM0wkXYXbA")])
            .build()
            .unwrap();
        assert_eq!(via_bookmark, explicit);
        assert_eq!(via_bookmark.cache_key(), explicit.cache_key());
    }

    #[test]
    fn missing_bookmark_fails() {
        let api = api();
        let err = api.select_bookmark("nope").build().unwrap_err();
        assert_eq!(err, PrismicError::BookmarkNotFound("nope".into()));
    }

    #[test]
    fn url_omits_empty_query() {
        let request = Request {
            action: "http://localhost:3000/api/documents/search".into(),
            ref_: "abc".into(),
            query: String::new(),
        };
        assert_eq!(request.url(), "http://localhost:3000/api/documents/search?ref=abc");
    }

    #[test]
    fn url_encodes_query() {
        let request = Request {
            action: "http://localhost:3000/search".into(),
            ref_: "abc".into(),
            query: r#"[:d = at(document.id, "x")]"#.into(),
        };
        assert_eq!(
            request.url(),
            "http://localhost:3000/search?ref=abc&q=%5B%3Ad+%3D+at%28document.id%2C+%22x%22%29%5D"
        );
    }

    #[test]
    fn identical_requests_share_cache_key() {
        let a = Request {
            action: "a".into(),
            ref_: "r".into(),
            query: "q".into(),
        };
        let b = a.clone();
        assert_eq!(a.cache_key(), b.cache_key());
        let c = Request {
            query: "other".into(),
            ..a.clone()
        };
        assert_ne!(a.cache_key(), c.cache_key());
    }
}
