//! Document fields, images and links.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::structured_text::{decode_structured_text, StructuredText};
use super::{string_at, tag_of, value_at};
use crate::error::{DecodeError, TagKind};

/// A single typed field of a document.
#[derive(Debug, Clone, PartialEq)]
pub enum DocumentField {
    Text(String),
    Select(String),
    Color(String),
    Number(f64),
    Date(String),
    Image(ImageViews),
    StructuredText(StructuredText),
    Link(Link),
}

/// An image with its named alternative renditions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageViews {
    pub main: ImageProperties,
    #[serde(default)]
    pub views: HashMap<String, ImageProperties>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawImage", into = "RawImage")]
pub struct ImageProperties {
    pub url: String,
    pub alt: Option<String>,
    pub copyright: Option<String>,
    pub width: u32,
    pub height: u32,
}

#[derive(Clone, Serialize, Deserialize)]
struct RawImage {
    url: String,
    #[serde(default)]
    alt: Option<String>,
    #[serde(default)]
    copyright: Option<String>,
    dimensions: Dimensions,
}

#[derive(Clone, Serialize, Deserialize)]
struct Dimensions {
    width: u32,
    height: u32,
}

impl From<RawImage> for ImageProperties {
    fn from(raw: RawImage) -> Self {
        Self {
            url: raw.url,
            alt: raw.alt,
            copyright: raw.copyright,
            width: raw.dimensions.width,
            height: raw.dimensions.height,
        }
    }
}

impl From<ImageProperties> for RawImage {
    fn from(image: ImageProperties) -> Self {
        Self {
            url: image.url,
            alt: image.alt,
            copyright: image.copyright,
            dimensions: Dimensions {
                width: image.width,
                height: image.height,
            },
        }
    }
}

/// Summary of another document, as embedded in links and search results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentReference {
    pub id: String,
    #[serde(default)]
    pub uid: Option<String>,
    #[serde(rename = "type")]
    pub doc_type: String,
    pub slug: String,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Link {
    DocumentLink {
        document: DocumentReference,
        is_broken: bool,
    },
    WebLink(String),
}

/// Decode a `{"type": ..., "value": ...}` document field.
pub fn decode_field(value: &Value) -> Result<DocumentField, DecodeError> {
    let tag = tag_of(value)?;
    let field = match tag {
        "Text" => DocumentField::Text(string_at(value, "value")?),
        "Select" => DocumentField::Select(string_at(value, "value")?),
        "Color" => DocumentField::Color(string_at(value, "value")?),
        "Date" => DocumentField::Date(string_at(value, "value")?),
        "Number" => {
            let raw = value_at(value, "value")?;
            let n = raw
                .as_f64()
                .ok_or_else(|| DecodeError::mismatch("value", "number", raw))?;
            DocumentField::Number(n)
        }
        "Image" => DocumentField::Image(ImageViews::deserialize(value_at(value, "value")?)?),
        "StructuredText" => DocumentField::StructuredText(decode_structured_text(value_at(value, "value")?)?),
        "Link.document" | "Link.web" => DocumentField::Link(decode_link(value)?),
        other => return Err(DecodeError::unknown_tag(TagKind::DocumentField, other)),
    };
    Ok(field)
}

/// Decode a `Link.document` or `Link.web` object.
pub fn decode_link(value: &Value) -> Result<Link, DecodeError> {
    let tag = tag_of(value)?;
    let payload = value_at(value, "value")?;
    match tag {
        "Link.document" => {
            let document = DocumentReference::deserialize(value_at(payload, "document")?)?;
            let raw = value_at(payload, "isBroken")?;
            let is_broken = raw
                .as_bool()
                .ok_or_else(|| DecodeError::mismatch("isBroken", "bool", raw))?;
            Ok(Link::DocumentLink { document, is_broken })
        }
        "Link.web" => Ok(Link::WebLink(string_at(payload, "url")?)),
        other => Err(DecodeError::unknown_tag(TagKind::Link, other)),
    }
}
