//! Session model and the query submission pipeline.
//!
//! # Design
//! `Model` is a plain value holding the configuration, the API descriptor
//! (once fetched) and the response cache. Pipeline operations never mutate a
//! model in place: they take `&self` and return an updated copy, so a caller
//! that ran a query against a stale snapshot folds the result back into its
//! long-lived model with [`Model::merge`].
//!
//! A submission runs strictly in sequence: descriptor fetch (skipped when
//! already present), request build, cache lookup, network fetch on a miss,
//! decode, cache write. The cache stores raw JSON and is only written after a
//! successful decode. Nothing is retried.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::api::{decode_api, ApiDescriptor};
use crate::cache::{merge_caches, Cache};
use crate::config::ClientConfig;
use crate::document::{decode_response, Response};
use crate::error::{DecodeError, FetchFailure, PrismicError};
use crate::http::{HttpRequest, Transport};
use crate::request::Request;

#[derive(Debug, Clone, Default)]
pub struct Model {
    config: ClientConfig,
    api: Option<Arc<ApiDescriptor>>,
    cache: Cache,
}

impl Model {
    pub fn new(config: ClientConfig) -> Self {
        Self {
            config,
            api: None,
            cache: Cache::new(),
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn api(&self) -> Option<&ApiDescriptor> {
        self.api.as_deref()
    }

    pub fn cache(&self) -> &Cache {
        &self.cache
    }

    pub fn with_cache(self, cache: Cache) -> Self {
        Self { cache, ..self }
    }

    /// Drop the descriptor and the cache, keeping the configuration.
    pub fn reset(&self) -> Self {
        Self::new(self.config.clone())
    }

    /// Fold a model returned by the pipeline into this one.
    ///
    /// Cache entries from `newer` win on collision; the descriptor of `newer`
    /// is used when present.
    pub fn merge(&self, newer: &Model) -> Self {
        Self {
            config: self.config.clone(),
            api: newer.api.clone().or_else(|| self.api.clone()),
            cache: merge_caches(&self.cache, &newer.cache),
        }
    }

    /// Ensure the API descriptor is loaded. A no-op when it already is.
    pub async fn fetch_api<T>(&self, transport: &T) -> Result<Model, PrismicError>
    where
        T: Transport + ?Sized,
    {
        let api = self.load_api(transport).await?;
        Ok(Self {
            api: Some(api),
            ..self.clone()
        })
    }

    /// Fetch the descriptor if needed, build a request with `build`, and
    /// submit it.
    ///
    /// ```ignore
    /// let (response, model) = model
    ///     .submit(&transport, |api| api.select_bookmark("about").build(), decode_default_doc_type)
    ///     .await?;
    /// ```
    pub async fn submit<T, B, D, Doc>(
        &self,
        transport: &T,
        build: B,
        decode_doc: D,
    ) -> Result<(Response<Doc>, Model), PrismicError>
    where
        T: Transport + ?Sized,
        B: FnOnce(&ApiDescriptor) -> Result<Request, PrismicError>,
        D: Fn(&Value) -> Result<Doc, DecodeError>,
    {
        let api = self.load_api(transport).await?;
        let request = build(api.as_ref())?;
        let model = Self {
            api: Some(api),
            ..self.clone()
        };
        model.submit_request(transport, &request, decode_doc).await
    }

    /// Submit an already built request, answering from the cache when
    /// possible.
    pub async fn submit_request<T, D, Doc>(
        &self,
        transport: &T,
        request: &Request,
        decode_doc: D,
    ) -> Result<(Response<Doc>, Model), PrismicError>
    where
        T: Transport + ?Sized,
        D: Fn(&Value) -> Result<Doc, DecodeError>,
    {
        if let Some(raw) = self.cache.get(request) {
            debug!(key = %request.cache_key(), "cache hit");
            let response = decode_response(raw, &decode_doc).map_err(|e| {
                warn!(error = %e, "cached response no longer decodes");
                PrismicError::SubmitDecodeError(e)
            })?;
            return Ok((response, self.clone()));
        }

        debug!(key = %request.cache_key(), "cache miss");
        let raw = transport.fetch_json(request.to_http()).await.map_err(|e| {
            warn!(url = %request.url(), error = %e, "query request failed");
            PrismicError::SubmitRequestError(e)
        })?;
        let response = decode_response(&raw, &decode_doc).map_err(|e| {
            warn!(url = %request.url(), error = %e, "query response did not decode");
            PrismicError::SubmitDecodeError(e)
        })?;

        let mut model = self.clone();
        model.cache.insert(request, raw);
        Ok((response, model))
    }

    async fn load_api<T>(&self, transport: &T) -> Result<Arc<ApiDescriptor>, PrismicError>
    where
        T: Transport + ?Sized,
    {
        if let Some(api) = &self.api {
            debug!("api descriptor already loaded");
            return Ok(Arc::clone(api));
        }

        let request = HttpRequest::get(self.config.api_url.clone());
        let raw = transport.fetch_json(request).await.map_err(|e| {
            warn!(url = %self.config.api_url, error = %e, "api request failed");
            PrismicError::ApiFetchError(FetchFailure::Transport(e))
        })?;
        let api = decode_api(&raw).map_err(|e| {
            warn!(url = %self.config.api_url, error = %e, "api descriptor did not decode");
            PrismicError::ApiFetchError(FetchFailure::Decode(e))
        })?;
        info!(
            url = %self.config.api_url,
            refs = api.refs.len(),
            forms = api.forms.len(),
            "api descriptor loaded"
        );
        Ok(Arc::new(api))
    }
}
