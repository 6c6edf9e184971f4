//! Decoders for the polymorphic document schema.
//!
//! # Design
//! Every tagged value (document fields, structured-text blocks, spans, embeds,
//! links) is decoded by dispatching on its `"type"` string. An unknown tag is
//! an explicit [`DecodeError::UnknownTag`] naming the tag, never a default
//! case. Untagged payloads inside a variant use serde derives.

pub mod field;
pub mod response;
pub mod structured_text;

use std::collections::HashMap;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use crate::error::DecodeError;

pub use field::{decode_field, decode_link, DocumentField, DocumentReference, ImageProperties, ImageViews, Link};
pub use response::{decode_response, Response, SearchResult};
pub use structured_text::{
    decode_structured_text, Block, BlockKind, Embed, EmbedRich, EmbedVideo, Span, SpanKind, StructuredText,
    StructuredTextBlock,
};

/// Untyped document data: `document type -> field name -> values`.
///
/// Repeatable fields hold several values; single fields hold one.
pub type DefaultDocType = HashMap<String, HashMap<String, Vec<DocumentField>>>;

/// Decoder for a result's `data` object when the caller has no schema.
pub fn decode_default_doc_type(data: &Value) -> Result<DefaultDocType, DecodeError> {
    let types = data
        .as_object()
        .ok_or_else(|| DecodeError::mismatch("data", "object", data))?;
    let mut doc = DefaultDocType::new();
    for (doc_type, fields) in types {
        let fields = fields
            .as_object()
            .ok_or_else(|| DecodeError::mismatch(format!("data.{doc_type}"), "object", fields))?;
        let mut decoded = HashMap::with_capacity(fields.len());
        for (name, value) in fields {
            let values = match value {
                Value::Array(items) => items.iter().map(decode_field).collect::<Result<Vec<_>, _>>()?,
                Value::Object(_) => vec![decode_field(value)?],
                other => {
                    return Err(DecodeError::mismatch(
                        format!("data.{doc_type}.{name}"),
                        "object or array",
                        other,
                    ))
                }
            };
            decoded.insert(name.clone(), values);
        }
        doc.insert(doc_type.clone(), decoded);
    }
    Ok(doc)
}

/// Decoder for any serde-deserializable document type.
pub fn serde_decoder<T: DeserializeOwned>() -> impl Fn(&Value) -> Result<T, DecodeError> {
    |data: &Value| Ok(T::deserialize(data)?)
}

/// All values of `doc_type.field`, or an empty slice.
pub fn get_fields<'a>(doc: &'a DefaultDocType, doc_type: &str, field: &str) -> &'a [DocumentField] {
    doc.get(doc_type)
        .and_then(|fields| fields.get(field))
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

pub fn get_texts<'a>(doc: &'a DefaultDocType, doc_type: &str, field: &str) -> Vec<&'a str> {
    get_fields(doc, doc_type, field)
        .iter()
        .filter_map(|f| match f {
            DocumentField::Text(text) => Some(text.as_str()),
            _ => None,
        })
        .collect()
}

pub fn get_text<'a>(doc: &'a DefaultDocType, doc_type: &str, field: &str) -> Option<&'a str> {
    get_texts(doc, doc_type, field).into_iter().next()
}

pub fn get_structured_text<'a>(doc: &'a DefaultDocType, doc_type: &str, field: &str) -> Option<&'a StructuredText> {
    get_fields(doc, doc_type, field).iter().find_map(|f| match f {
        DocumentField::StructuredText(text) => Some(text),
        _ => None,
    })
}

pub fn get_image<'a>(doc: &'a DefaultDocType, doc_type: &str, field: &str) -> Option<&'a ImageViews> {
    get_fields(doc, doc_type, field).iter().find_map(|f| match f {
        DocumentField::Image(image) => Some(image),
        _ => None,
    })
}

pub fn get_link<'a>(doc: &'a DefaultDocType, doc_type: &str, field: &str) -> Option<&'a Link> {
    get_fields(doc, doc_type, field).iter().find_map(|f| match f {
        DocumentField::Link(link) => Some(link),
        _ => None,
    })
}

pub fn get_number(doc: &DefaultDocType, doc_type: &str, field: &str) -> Option<f64> {
    get_fields(doc, doc_type, field).iter().find_map(|f| match f {
        DocumentField::Number(n) => Some(*n),
        _ => None,
    })
}

// ---------------------------------------------------------------------------
// JSON access helpers shared by the decoders
// ---------------------------------------------------------------------------

pub(crate) fn value_at<'a>(value: &'a Value, key: &str) -> Result<&'a Value, DecodeError> {
    value
        .get(key)
        .ok_or_else(|| DecodeError::MissingField(key.to_string()))
}

pub(crate) fn string_at(value: &Value, key: &str) -> Result<String, DecodeError> {
    let raw = value_at(value, key)?;
    raw.as_str()
        .map(str::to_string)
        .ok_or_else(|| DecodeError::mismatch(key, "string", raw))
}

/// The `"type"` discriminant of a tagged object.
pub(crate) fn tag_of(value: &Value) -> Result<&str, DecodeError> {
    let raw = value_at(value, "type")?;
    raw.as_str()
        .ok_or_else(|| DecodeError::mismatch("type", "string", raw))
}
