//! HTML rendering for decoded document fields and structured text.
//!
//! # Design
//! Rendering produces an [`Html`] tree rather than a string so callers can
//! post-process it (for instance merging consecutive single-item lists).
//! `Display` serializes the tree, escaping text and attribute values.
//!
//! Spans are applied as a flat sequence sorted by start offset. Overlapping
//! spans are not nested and produce duplicated text.
//!
//! Span offsets count Unicode scalar values. Producers that count UTF-16
//! code units disagree with this past any character outside the Basic
//! Multilingual Plane (most emoji), where each such character shifts later
//! offsets by one. Embed HTML is injected
//! without sanitizing: hosts rendering untrusted content must filter it
//! themselves.

use std::fmt;

use crate::document::{
    Block, BlockKind, DocumentField, DocumentReference, Embed, ImageProperties, ImageViews, Link, Span, SpanKind,
    StructuredTextBlock,
};

/// Maps a linked document to the URL it should point at.
pub type LinkResolver<'a> = &'a dyn Fn(&DocumentReference) -> String;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Html {
    Element {
        tag: &'static str,
        attrs: Vec<(&'static str, String)>,
        children: Vec<Html>,
    },
    /// Escaped on output.
    Text(String),
    /// Written verbatim.
    Raw(String),
}

impl Html {
    pub fn element(tag: &'static str, attrs: Vec<(&'static str, String)>, children: Vec<Html>) -> Self {
        Html::Element { tag, attrs, children }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Html::Text(text.into())
    }

    /// Concatenated text of every `Text` node, in document order.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match self {
            Html::Element { children, .. } => children.iter().for_each(|c| c.collect_text(out)),
            Html::Text(text) => out.push_str(text),
            Html::Raw(_) => {}
        }
    }
}

const VOID_ELEMENTS: &[&str] = &["img", "br", "hr"];

impl fmt::Display for Html {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Html::Element { tag, attrs, children } => {
                write!(f, "<{tag}")?;
                for (name, value) in attrs {
                    write!(f, " {name}=\"{}\"", escape(value, true))?;
                }
                f.write_str(">")?;
                if VOID_ELEMENTS.contains(tag) {
                    return Ok(());
                }
                for child in children {
                    write!(f, "{child}")?;
                }
                write!(f, "</{tag}>")
            }
            Html::Text(text) => f.write_str(&escape(text, false)),
            Html::Raw(raw) => f.write_str(raw),
        }
    }
}

fn escape(input: &str, attribute: bool) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if attribute => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

/// Serialize a list of nodes back to back.
pub fn to_html_string(nodes: &[Html]) -> String {
    nodes.iter().map(ToString::to_string).collect()
}

/// `/documents/<id>/<slug>`
pub fn default_link_resolver(doc: &DocumentReference) -> String {
    format!("/documents/{}/{}", doc.id, doc.slug)
}

pub fn render_fields(fields: &[DocumentField], resolve: LinkResolver<'_>) -> Vec<Html> {
    fields.iter().flat_map(|field| render_field(field, resolve)).collect()
}

pub fn render_field(field: &DocumentField, resolve: LinkResolver<'_>) -> Vec<Html> {
    match field {
        DocumentField::Text(text)
        | DocumentField::Select(text)
        | DocumentField::Color(text)
        | DocumentField::Date(text) => vec![span(text.clone())],
        DocumentField::Number(n) => vec![span(n.to_string())],
        DocumentField::Image(image) => vec![render_image_views(image)],
        DocumentField::StructuredText(blocks) => render_structured_text(blocks, resolve),
        DocumentField::Link(link) => vec![render_link(link, resolve)],
    }
}

fn span(text: String) -> Html {
    Html::element("span", Vec::new(), vec![Html::Text(text)])
}

pub fn render_structured_text(blocks: &[StructuredTextBlock], resolve: LinkResolver<'_>) -> Vec<Html> {
    blocks.iter().map(|block| render_block(block, resolve)).collect()
}

/// One block to one node. A list item is wrapped in its own `<ul>`.
pub fn render_block(block: &StructuredTextBlock, resolve: LinkResolver<'_>) -> Html {
    match block {
        StructuredTextBlock::Simple(block) => render_simple(block, resolve),
        StructuredTextBlock::Image(image) => render_image(image),
        StructuredTextBlock::Embed(embed) => render_embed(embed),
    }
}

fn render_simple(block: &Block, resolve: LinkResolver<'_>) -> Html {
    let inline = render_spans(&block.text, &block.spans, resolve);
    match block.kind {
        BlockKind::Heading1 => Html::element("h1", Vec::new(), inline),
        BlockKind::Heading2 => Html::element("h2", Vec::new(), inline),
        BlockKind::Heading3 => Html::element("h3", Vec::new(), inline),
        BlockKind::Paragraph => Html::element("p", Vec::new(), inline),
        BlockKind::ListItem => Html::element("ul", Vec::new(), vec![Html::element("li", Vec::new(), inline)]),
    }
}

/// Splice `spans` into `text` as a flat run of inline nodes.
///
/// Spans are stably sorted by start. Each span emits the plain text since the
/// previous cursor, then its own range wrapped in the span's element. The tail
/// after the last span is emitted as plain text.
pub fn render_spans(text: &str, spans: &[Span], resolve: LinkResolver<'_>) -> Vec<Html> {
    let bounds = CharBounds::new(text);
    let mut sorted: Vec<&Span> = spans.iter().collect();
    sorted.sort_by_key(|s| s.start);

    let mut nodes = Vec::with_capacity(sorted.len() * 2 + 1);
    let mut cursor = 0;
    for span in sorted {
        let plain = bounds.slice(text, cursor, span.start);
        if !plain.is_empty() {
            nodes.push(Html::text(plain));
        }
        let inner = vec![Html::text(bounds.slice(text, span.start, span.end))];
        nodes.push(match &span.kind {
            SpanKind::Em => Html::element("em", Vec::new(), inner),
            SpanKind::Strong => Html::element("strong", Vec::new(), inner),
            SpanKind::Hyperlink(link) => Html::element("a", vec![("href", link_url(link, resolve))], inner),
        });
        cursor = span.end;
    }
    let tail = bounds.slice(text, cursor, bounds.len());
    if !tail.is_empty() {
        nodes.push(Html::text(tail));
    }
    nodes
}

/// Byte offsets of every character boundary in a string.
struct CharBounds(Vec<usize>);

impl CharBounds {
    fn new(text: &str) -> Self {
        let mut bounds: Vec<usize> = text.char_indices().map(|(i, _)| i).collect();
        bounds.push(text.len());
        Self(bounds)
    }

    /// Number of characters.
    fn len(&self) -> usize {
        self.0.len() - 1
    }

    /// Characters `start..end`, clamped; empty when `start >= end`.
    fn slice<'t>(&self, text: &'t str, start: usize, end: usize) -> &'t str {
        let end = end.min(self.len());
        if start >= end {
            return "";
        }
        &text[self.0[start]..self.0[end]]
    }
}

fn link_url(link: &Link, resolve: LinkResolver<'_>) -> String {
    match link {
        Link::DocumentLink { document, .. } => resolve(document),
        Link::WebLink(url) => url.clone(),
    }
}

/// An anchor to the link target, labelled with the slug or the URL.
pub fn render_link(link: &Link, resolve: LinkResolver<'_>) -> Html {
    let label = match link {
        Link::DocumentLink { document, .. } => document.slug.clone(),
        Link::WebLink(url) => url.clone(),
    };
    Html::element("a", vec![("href", link_url(link, resolve))], vec![Html::Text(label)])
}

pub fn render_image_views(image: &ImageViews) -> Html {
    render_image(&image.main)
}

pub fn render_image(image: &ImageProperties) -> Html {
    let mut attrs = vec![("src", image.url.clone())];
    if let Some(alt) = &image.alt {
        attrs.push(("alt", alt.clone()));
    }
    attrs.push(("width", image.width.to_string()));
    attrs.push(("height", image.height.to_string()));
    Html::element("img", attrs, Vec::new())
}

pub fn render_embed(embed: &Embed) -> Html {
    let mut attrs = vec![
        ("data-oembed", embed.embed_url().unwrap_or_default().to_string()),
        ("data-oembed-type", embed.type_name().to_string()),
    ];
    if let Some(provider) = embed.provider_name() {
        attrs.push(("data-oembed-provider", provider.to_lowercase()));
    }
    Html::element("div", attrs, vec![Html::Raw(embed.html().to_string())])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::decode_structured_text;
    use serde_json::json;

    fn resolver() -> LinkResolver<'static> {
        &default_link_resolver
    }

    fn paragraph(text: &str, spans: Vec<Span>) -> StructuredTextBlock {
        StructuredTextBlock::Simple(Block {
            kind: BlockKind::Paragraph,
            text: text.to_string(),
            spans,
        })
    }

    fn span(start: usize, end: usize, kind: SpanKind) -> Span {
        Span { start, end, kind }
    }

    #[test]
    fn strong_prefix_then_plain_tail() {
        let nodes = render_spans("Hello world", &[span(0, 5, SpanKind::Strong)], resolver());
        assert_eq!(
            nodes,
            vec![
                Html::element("strong", Vec::new(), vec![Html::text("Hello")]),
                Html::text(" world"),
            ]
        );
    }

    #[test]
    fn text_content_is_preserved_for_unsorted_spans() {
        let text = "The quick brown fox";
        let spans = vec![
            span(10, 15, SpanKind::Em),
            span(0, 3, SpanKind::Strong),
            span(16, 19, SpanKind::Hyperlink(Link::WebLink("https://fox.example".into()))),
        ];
        let block = paragraph(text, spans);
        let html = render_block(&block, resolver());
        assert_eq!(html.text_content(), text);
        assert_eq!(
            html.to_string(),
            "<p><strong>The</strong> quick <em>brown</em> <a href=\"https://fox.example\">fox</a></p>"
        );
    }

    #[test]
    fn offsets_count_characters() {
        let nodes = render_spans("héllo wörld", &[span(6, 11, SpanKind::Em)], resolver());
        assert_eq!(to_html_string(&nodes), "héllo <em>wörld</em>");
    }

    #[test]
    fn astral_character_counts_as_one_offset() {
        let nodes = render_spans("😀 hi", &[span(2, 4, SpanKind::Strong)], resolver());
        assert_eq!(to_html_string(&nodes), "😀 <strong>hi</strong>");
    }

    #[test]
    fn out_of_range_span_is_clamped() {
        let nodes = render_spans("abc", &[span(1, 99, SpanKind::Strong)], resolver());
        assert_eq!(to_html_string(&nodes), "a<strong>bc</strong>");
    }

    #[test]
    fn document_hyperlink_uses_resolver() {
        let link = Link::DocumentLink {
            document: DocumentReference {
                id: "abc".into(),
                uid: None,
                doc_type: "page".into(),
                slug: "about".into(),
                tags: Vec::new(),
            },
            is_broken: false,
        };
        let custom = |doc: &DocumentReference| format!("/p/{}", doc.slug);
        let nodes = render_spans("see about", &[span(4, 9, SpanKind::Hyperlink(link.clone()))], &custom);
        assert_eq!(to_html_string(&nodes), "see <a href=\"/p/about\">about</a>");
        assert_eq!(
            render_link(&link, resolver()).to_string(),
            "<a href=\"/documents/abc/about\">about</a>"
        );
    }

    #[test]
    fn list_items_get_their_own_list() {
        let blocks = decode_structured_text(&json!([
            {"type": "list-item", "text": "one", "spans": []},
            {"type": "list-item", "text": "two", "spans": []}
        ]))
        .unwrap();
        let html = to_html_string(&render_structured_text(&blocks, resolver()));
        assert_eq!(html, "<ul><li>one</li></ul><ul><li>two</li></ul>");
    }

    #[test]
    fn text_is_escaped_but_embed_html_is_not() {
        let blocks = decode_structured_text(&json!([
            {"type": "heading2", "text": "a < b & c", "spans": []},
            {"type": "embed", "oembed": {
                "type": "rich", "provider_name": "Twitter",
                "embed_url": "https://twitter.com/x", "html": "<blockquote>hi</blockquote>"
            }}
        ]))
        .unwrap();
        let html = to_html_string(&render_structured_text(&blocks, resolver()));
        assert_eq!(
            html,
            "<h2>a &lt; b &amp; c</h2>\
             <div data-oembed=\"https://twitter.com/x\" data-oembed-type=\"rich\" data-oembed-provider=\"twitter\">\
             <blockquote>hi</blockquote></div>"
        );
    }

    #[test]
    fn image_field_renders_main_view() {
        let image = ImageViews {
            main: ImageProperties {
                url: "http://img/main.png".into(),
                alt: Some("Say \"hi\"".into()),
                copyright: None,
                width: 800,
                height: 600,
            },
            views: Default::default(),
        };
        let nodes = render_field(&DocumentField::Image(image), resolver());
        assert_eq!(
            to_html_string(&nodes),
            "<img src=\"http://img/main.png\" alt=\"Say &quot;hi&quot;\" width=\"800\" height=\"600\">"
        );
    }

    #[test]
    fn scalar_fields_render_as_spans() {
        let fields = vec![
            DocumentField::Text("hi".into()),
            DocumentField::Number(5.0),
            DocumentField::Link(Link::WebLink("https://a.example".into())),
        ];
        assert_eq!(
            to_html_string(&render_fields(&fields, resolver())),
            "<span>hi</span><span>5</span><a href=\"https://a.example\">https://a.example</a>"
        );
    }
}
