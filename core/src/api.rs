//! The repository's API descriptor: refs, forms, bookmarks and metadata.
//!
//! # Design
//! The descriptor is decoded with serde derives so that every required key is
//! checked and unknown keys are ignored. Decoding fails as a whole when any
//! required key is missing or has the wrong shape; nothing is silently
//! dropped.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{DecodeError, PrismicError};

/// Id of the ref every form selection starts from.
pub const MASTER_REF_ID: &str = "master";

/// Decoded `/api` response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiDescriptor {
    pub refs: Vec<RefProperties>,
    pub bookmarks: HashMap<String, String>,
    pub types: HashMap<String, String>,
    pub tags: Vec<String>,
    pub version: String,
    pub forms: HashMap<String, Form>,
    pub oauth_initiate: String,
    pub oauth_token: String,
    pub license: String,
    pub experiments: Experiments,
}

/// A named, addressable snapshot of the repository content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefProperties {
    pub id: String,
    #[serde(rename = "ref")]
    pub ref_: String,
    pub label: String,
    #[serde(rename = "isMasterRef", default)]
    pub is_master: bool,
}

/// A query endpoint advertised by the descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Form {
    pub method: String,
    pub action: String,
    pub fields: HashMap<String, FormField>,
    pub enctype: String,
    #[serde(default)]
    pub rel: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormField {
    #[serde(rename = "type")]
    pub field_type: FieldType,
    #[serde(default)]
    pub multiple: bool,
    #[serde(default)]
    pub default: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldType {
    String,
    Integer,
}

/// A/B experiment ids.
///
/// Only the `draft` and `running` lists are typed; the whole object is kept in
/// `raw` since its full schema is not settled.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Experiments {
    pub draft: Vec<String>,
    pub running: Vec<String>,
    #[serde(skip)]
    pub raw: Value,
}

impl<'de> Deserialize<'de> for Experiments {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Lists {
            draft: Vec<String>,
            running: Vec<String>,
        }

        let raw = Value::deserialize(deserializer)?;
        let lists = Lists::deserialize(&raw).map_err(serde::de::Error::custom)?;
        Ok(Experiments {
            draft: lists.draft,
            running: lists.running,
            raw,
        })
    }
}

/// Decode the raw `/api` JSON into an [`ApiDescriptor`].
pub fn decode_api(value: &Value) -> Result<ApiDescriptor, DecodeError> {
    if !value.is_object() {
        return Err(DecodeError::mismatch("api", "object", value));
    }
    Ok(ApiDescriptor::deserialize(value)?)
}

impl ApiDescriptor {
    /// The ref flagged `isMasterRef`, if any.
    pub fn master_ref(&self) -> Option<&RefProperties> {
        self.refs.iter().find(|r| r.is_master)
    }

    pub fn find_ref(&self, id: &str) -> Option<&RefProperties> {
        self.refs.iter().find(|r| r.id == id)
    }

    /// Look a ref up by its human-readable label.
    pub fn find_ref_by_label(&self, label: &str) -> Option<&RefProperties> {
        self.refs.iter().find(|r| r.label == label)
    }

    pub fn form(&self, form_id: &str) -> Result<&Form, PrismicError> {
        self.forms
            .get(form_id)
            .ok_or_else(|| PrismicError::FormNotFound(form_id.to_string()))
    }

    pub fn bookmark(&self, name: &str) -> Result<&str, PrismicError> {
        self.bookmarks
            .get(name)
            .map(String::as_str)
            .ok_or_else(|| PrismicError::BookmarkNotFound(name.to_string()))
    }
}

impl Form {
    /// The form's declared default for `q`, or the empty query.
    pub fn default_query(&self) -> String {
        self.fields
            .get("q")
            .and_then(|field| field.default.clone())
            .unwrap_or_default()
    }
}
