//! Fixture repository content served by the mock API.

use serde_json::{json, Value};

pub const MASTER_REF: &str = "UlfoxUnM0wkXYXbH";
pub const PREVIEW_REF: &str = "UlfoxUnM0wkXYXbP";
pub const ABOUT_ID: &str = "UlfoxUnM0wkXYXbA";
pub const ARTICLE_ID: &str = "UlfoxUnM0wkXYXbB";

/// The `/api` descriptor, with form actions rooted at `base_url`.
pub fn api_descriptor(base_url: &str) -> Value {
    let action = format!("{base_url}/api/documents/search");
    json!({
        "refs": [
            {"id": "master", "ref": MASTER_REF, "label": "Master", "isMasterRef": true},
            {"id": "preview", "ref": PREVIEW_REF, "label": "Preview"}
        ],
        "bookmarks": {"about": ABOUT_ID},
        "types": {"page": "Page", "article": "Article"},
        "tags": ["featured", "rust"],
        "version": "mock-1",
        "forms": {
            "everything": {
                "method": "GET",
                "enctype": "application/x-www-form-urlencoded",
                "action": action,
                "fields": {
                    "ref": {"type": "String", "multiple": false},
                    "q": {"type": "String", "multiple": true},
                    "page": {"type": "Integer", "multiple": false, "default": "1"}
                }
            },
            "articles": {
                "method": "GET",
                "enctype": "application/x-www-form-urlencoded",
                "action": action,
                "name": "Articles",
                "rel": "collection",
                "fields": {
                    "ref": {"type": "String"},
                    "q": {"type": "String", "default": "[:d = at(document.type, \"article\")]"}
                }
            }
        },
        "oauth_initiate": format!("{base_url}/auth"),
        "oauth_token": format!("{base_url}/auth/token"),
        "license": "All Rights Reserved",
        "experiments": {"draft": [], "running": []}
    })
}

/// Every document in the repository.
pub fn documents(base_url: &str) -> Vec<Value> {
    vec![about_page(base_url), article(base_url)]
}

fn about_page(base_url: &str) -> Value {
    json!({
        "id": ABOUT_ID,
        "uid": "about",
        "type": "page",
        "href": format!("{base_url}/api/documents/search?ref={MASTER_REF}&q=about"),
        "tags": ["featured"],
        "slugs": ["about-us"],
        "linked_documents": [
            {"id": ARTICLE_ID, "type": "article", "slug": "hello-rust", "tags": ["rust"]}
        ],
        "data": {
            "page": {
                "title": {"type": "StructuredText", "value": [
                    {"type": "heading1", "text": "About us", "spans": []}
                ]},
                "body": {"type": "StructuredText", "value": [
                    {"type": "paragraph", "text": "We write Rust every day.", "spans": [
                        {"start": 9, "end": 13, "type": "strong"},
                        {"start": 14, "end": 23, "type": "hyperlink", "data": {
                            "type": "Link.document",
                            "value": {
                                "document": {"id": ARTICLE_ID, "type": "article", "slug": "hello-rust", "tags": []},
                                "isBroken": false
                            }
                        }}
                    ]},
                    {"type": "image", "url": format!("{base_url}/img/team.png"), "alt": "The team",
                     "copyright": null, "dimensions": {"width": 640, "height": 480}},
                    {"type": "embed", "oembed": {
                        "type": "video", "provider_name": "YouTube",
                        "embed_url": "https://www.youtube.com/watch?v=abc",
                        "html": "<iframe src=\"https://www.youtube.com/embed/abc\"></iframe>",
                        "width": 480, "height": 270, "version": "1.0"
                    }}
                ]},
                "color": {"type": "Color", "value": "#c0ffee"}
            }
        }
    })
}

fn article(base_url: &str) -> Value {
    json!({
        "id": ARTICLE_ID,
        "uid": "hello-rust",
        "type": "article",
        "href": format!("{base_url}/api/documents/search?ref={MASTER_REF}&q=hello"),
        "tags": ["rust"],
        "slugs": ["hello-rust"],
        "linked_documents": [],
        "data": {
            "article": {
                "title": {"type": "StructuredText", "value": [
                    {"type": "heading1", "text": "Hello, Rust", "spans": [{"start": 7, "end": 11, "type": "em"}]}
                ]},
                "tags": [
                    {"type": "Text", "value": "rust"},
                    {"type": "Text", "value": "cms"}
                ],
                "rating": {"type": "Number", "value": 4.5},
                "source": {"type": "Link.web", "value": {"url": "https://www.rust-lang.org"}}
            }
        }
    })
}
