//! Structured text: blocks of annotated text, images and embeds.
//!
//! Span offsets count Unicode scalar values (not bytes, not UTF-16 code
//! units) into the owning block's text.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::field::{decode_link, ImageProperties, Link};
use super::{string_at, tag_of, value_at};
use crate::error::{DecodeError, TagKind};

pub type StructuredText = Vec<StructuredTextBlock>;

#[derive(Debug, Clone, PartialEq)]
pub enum StructuredTextBlock {
    Simple(Block),
    Image(ImageProperties),
    Embed(Embed),
}

/// A text block with its inline annotations.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub kind: BlockKind,
    pub text: String,
    pub spans: Vec<Span>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    Heading1,
    Heading2,
    Heading3,
    Paragraph,
    ListItem,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    pub kind: SpanKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SpanKind {
    Em,
    Strong,
    Hyperlink(Link),
}

/// An oEmbed payload. `html` is provider-supplied and passed through as-is.
#[derive(Debug, Clone, PartialEq)]
pub enum Embed {
    Video(EmbedVideo),
    Rich(EmbedRich),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbedVideo {
    #[serde(default)]
    pub author_name: Option<String>,
    #[serde(default)]
    pub author_url: Option<String>,
    #[serde(default)]
    pub embed_url: Option<String>,
    #[serde(default)]
    pub height: Option<u32>,
    pub html: String,
    #[serde(default)]
    pub provider_name: Option<String>,
    #[serde(default)]
    pub provider_url: Option<String>,
    #[serde(default)]
    pub thumbnail_height: Option<u32>,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
    #[serde(default)]
    pub thumbnail_width: Option<u32>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub width: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbedRich {
    #[serde(default)]
    pub author_name: Option<String>,
    #[serde(default)]
    pub author_url: Option<String>,
    #[serde(default)]
    pub cache_age: Option<String>,
    #[serde(default)]
    pub embed_url: Option<String>,
    #[serde(default)]
    pub height: Option<u32>,
    pub html: String,
    #[serde(default)]
    pub provider_name: Option<String>,
    #[serde(default)]
    pub provider_url: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub width: Option<u32>,
}

impl Embed {
    pub fn html(&self) -> &str {
        match self {
            Embed::Video(video) => &video.html,
            Embed::Rich(rich) => &rich.html,
        }
    }

    pub fn embed_url(&self) -> Option<&str> {
        match self {
            Embed::Video(video) => video.embed_url.as_deref(),
            Embed::Rich(rich) => rich.embed_url.as_deref(),
        }
    }

    pub fn provider_name(&self) -> Option<&str> {
        match self {
            Embed::Video(video) => video.provider_name.as_deref(),
            Embed::Rich(rich) => rich.provider_name.as_deref(),
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Embed::Video(_) => "video",
            Embed::Rich(_) => "rich",
        }
    }
}

/// Decode a JSON array of structured-text blocks, in order.
pub fn decode_structured_text(value: &Value) -> Result<StructuredText, DecodeError> {
    let blocks = value
        .as_array()
        .ok_or_else(|| DecodeError::mismatch("structured text", "array", value))?;
    blocks.iter().map(decode_block).collect()
}

pub fn decode_block(value: &Value) -> Result<StructuredTextBlock, DecodeError> {
    let kind = match tag_of(value)? {
        "heading1" => BlockKind::Heading1,
        "heading2" => BlockKind::Heading2,
        "heading3" => BlockKind::Heading3,
        "paragraph" => BlockKind::Paragraph,
        "list-item" => BlockKind::ListItem,
        "image" => return Ok(StructuredTextBlock::Image(ImageProperties::deserialize(value)?)),
        "embed" => return Ok(StructuredTextBlock::Embed(decode_embed(value_at(value, "oembed")?)?)),
        other => return Err(DecodeError::unknown_tag(TagKind::StructuredTextBlock, other)),
    };
    let spans = match value_at(value, "spans")? {
        Value::Array(spans) => spans.iter().map(decode_span).collect::<Result<_, _>>()?,
        other => return Err(DecodeError::mismatch("spans", "array", other)),
    };
    Ok(StructuredTextBlock::Simple(Block {
        kind,
        text: string_at(value, "text")?,
        spans,
    }))
}

pub fn decode_span(value: &Value) -> Result<Span, DecodeError> {
    let kind = match tag_of(value)? {
        "em" => SpanKind::Em,
        "strong" => SpanKind::Strong,
        "hyperlink" => SpanKind::Hyperlink(decode_link(value_at(value, "data")?)?),
        other => return Err(DecodeError::unknown_tag(TagKind::Span, other)),
    };
    Ok(Span {
        start: offset_at(value, "start")?,
        end: offset_at(value, "end")?,
        kind,
    })
}

pub fn decode_embed(value: &Value) -> Result<Embed, DecodeError> {
    match tag_of(value)? {
        "video" => Ok(Embed::Video(EmbedVideo::deserialize(value)?)),
        "rich" => Ok(Embed::Rich(EmbedRich::deserialize(value)?)),
        other => Err(DecodeError::unknown_tag(TagKind::Embed, other)),
    }
}

fn offset_at(value: &Value, key: &str) -> Result<usize, DecodeError> {
    let raw = value_at(value, key)?;
    raw.as_u64()
        .map(|n| n as usize)
        .ok_or_else(|| DecodeError::mismatch(key, "non-negative integer", raw))
}

/// First heading of any level.
pub fn get_title(text: &[StructuredTextBlock]) -> Option<&Block> {
    text.iter().find_map(|block| match block {
        StructuredTextBlock::Simple(b)
            if matches!(b.kind, BlockKind::Heading1 | BlockKind::Heading2 | BlockKind::Heading3) =>
        {
            Some(b)
        }
        _ => None,
    })
}

pub fn get_first_paragraph(text: &[StructuredTextBlock]) -> Option<&Block> {
    text.iter().find_map(|block| match block {
        StructuredTextBlock::Simple(b) if b.kind == BlockKind::Paragraph => Some(b),
        _ => None,
    })
}

pub fn get_first_image(text: &[StructuredTextBlock]) -> Option<&ImageProperties> {
    text.iter().find_map(|block| match block {
        StructuredTextBlock::Image(image) => Some(image),
        _ => None,
    })
}

/// Plain text of every text block, joined by newlines.
pub fn get_text(text: &[StructuredTextBlock]) -> String {
    text.iter()
        .filter_map(|block| match block {
            StructuredTextBlock::Simple(b) => Some(b.text.as_str()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Value {
        json!([
            {"type": "heading1", "text": "Title", "spans": []},
            {"type": "paragraph", "text": "Hello world", "spans": [
                {"start": 0, "end": 5, "type": "strong"},
                {"start": 6, "end": 11, "type": "hyperlink",
                 "data": {"type": "Link.web", "value": {"url": "https://example.com"}}}
            ]},
            {"type": "list-item", "text": "one", "spans": []},
            {"type": "image", "url": "http://img/a.png", "alt": "A",
             "dimensions": {"width": 10, "height": 20}},
            {"type": "embed", "oembed": {
                "type": "video", "provider_name": "YouTube",
                "embed_url": "https://youtu.be/x", "html": "<iframe></iframe>",
                "width": 480, "height": 270
            }}
        ])
    }

    #[test]
    fn decodes_all_block_kinds_in_order() {
        let text = decode_structured_text(&sample()).unwrap();
        assert_eq!(text.len(), 5);
        assert!(matches!(&text[0], StructuredTextBlock::Simple(b) if b.kind == BlockKind::Heading1));
        assert!(matches!(&text[2], StructuredTextBlock::Simple(b) if b.kind == BlockKind::ListItem));
        assert!(matches!(&text[3], StructuredTextBlock::Image(img) if img.height == 20));
        let StructuredTextBlock::Embed(embed) = &text[4] else {
            panic!("expected embed");
        };
        assert_eq!(embed.type_name(), "video");
        assert_eq!(embed.html(), "<iframe></iframe>");
        assert_eq!(embed.provider_name(), Some("YouTube"));
    }

    #[test]
    fn decodes_spans() {
        let text = decode_structured_text(&sample()).unwrap();
        let StructuredTextBlock::Simple(block) = &text[1] else {
            panic!("expected paragraph");
        };
        assert_eq!(block.spans.len(), 2);
        assert_eq!(block.spans[0].kind, SpanKind::Strong);
        assert_eq!(
            block.spans[1].kind,
            SpanKind::Hyperlink(Link::WebLink("https://example.com".into()))
        );
    }

    #[test]
    fn unknown_block_type_is_named() {
        let err = decode_structured_text(&json!([{"type": "heading7", "text": ""}])).unwrap_err();
        assert_eq!(err, DecodeError::unknown_tag(TagKind::StructuredTextBlock, "heading7"));
    }

    #[test]
    fn unknown_span_type_is_named() {
        let err = decode_block(&json!({
            "type": "paragraph", "text": "x",
            "spans": [{"start": 0, "end": 1, "type": "label"}]
        }))
        .unwrap_err();
        assert_eq!(err, DecodeError::unknown_tag(TagKind::Span, "label"));
    }

    #[test]
    fn unknown_embed_type_is_named() {
        let err = decode_block(&json!({"type": "embed", "oembed": {"type": "photo", "html": ""}})).unwrap_err();
        assert_eq!(err, DecodeError::unknown_tag(TagKind::Embed, "photo"));
    }

    #[test]
    fn text_block_requires_spans_array() {
        let missing = decode_block(&json!({"type": "paragraph", "text": "x"})).unwrap_err();
        assert_eq!(missing, DecodeError::MissingField("spans".into()));

        let null = decode_block(&json!({"type": "paragraph", "text": "x", "spans": null})).unwrap_err();
        assert!(matches!(null, DecodeError::Mismatch { ref path, .. } if path == "spans"));
    }

    #[test]
    fn negative_offset_is_rejected() {
        let err = decode_span(&json!({"start": -1, "end": 1, "type": "em"})).unwrap_err();
        assert!(matches!(err, DecodeError::Mismatch { .. }));
    }

    #[test]
    fn non_array_is_rejected() {
        assert!(decode_structured_text(&json!({"type": "paragraph"})).is_err());
    }

    #[test]
    fn helpers_find_title_paragraph_and_image() {
        let text = decode_structured_text(&sample()).unwrap();
        assert_eq!(get_title(&text).unwrap().text, "Title");
        assert_eq!(get_first_paragraph(&text).unwrap().text, "Hello world");
        assert_eq!(get_first_image(&text).unwrap().url, "http://img/a.png");
        assert_eq!(get_text(&text), "Title\nHello world\none");
    }
}
