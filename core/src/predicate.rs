//! Query predicates and their textual serialization.
//!
//! A predicate list renders as `[:d = <p1><p2>...]`. String values are wrapped
//! in double quotes verbatim; embedded quotes are not escaped, so callers must
//! keep them out of predicate values.

use std::fmt;

/// A single query condition on a document fragment such as `document.type`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    /// `at(fragment, "value")`
    At(String, String),
    /// `at(fragment, [ "v1", "v2" ])`
    AtL(String, Vec<String>),
    /// `any(fragment, [ "v1", "v2" ])`
    Any(String, Vec<String>),
    /// `fulltext(fragment, "value")`
    FullText(String, String),
}

impl Predicate {
    pub fn at(fragment: impl Into<String>, value: impl Into<String>) -> Self {
        Predicate::At(fragment.into(), value.into())
    }

    pub fn at_list<I, S>(fragment: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Predicate::AtL(fragment.into(), values.into_iter().map(Into::into).collect())
    }

    pub fn any<I, S>(fragment: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Predicate::Any(fragment.into(), values.into_iter().map(Into::into).collect())
    }

    pub fn fulltext(fragment: impl Into<String>, value: impl Into<String>) -> Self {
        Predicate::FullText(fragment.into(), value.into())
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Predicate::At(fragment, value) => write!(f, "at({fragment}, \"{value}\")"),
            Predicate::AtL(fragment, values) => write!(f, "at({fragment}, {})", quoted_list(values)),
            Predicate::Any(fragment, values) => write!(f, "any({fragment}, {})", quoted_list(values)),
            Predicate::FullText(fragment, value) => write!(f, "fulltext({fragment}, \"{value}\")"),
        }
    }
}

fn quoted_list(values: &[String]) -> String {
    let items: Vec<String> = values.iter().map(|v| format!("\"{v}\"")).collect();
    format!("[ {} ]", items.join(", "))
}

/// Serialize predicates into the `q` parameter. No predicates, no query.
pub fn predicates_to_query(predicates: &[Predicate]) -> String {
    if predicates.is_empty() {
        return String::new();
    }
    let body: String = predicates.iter().map(ToString::to_string).collect();
    format!("[:d = {body}]")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn golden_query_string() {
        let query = predicates_to_query(&[
            Predicate::at("my.doc.tag", "x"),
            Predicate::any("my.doc.tag2", ["a", "b"]),
        ]);
        assert_eq!(query, r#"[:d = at(my.doc.tag, "x")any(my.doc.tag2, [ "a", "b" ])]"#);
    }

    #[test]
    fn at_list_and_fulltext() {
        let query = predicates_to_query(&[
            Predicate::at_list("document.tags", ["news", "tech"]),
            Predicate::fulltext("document", "rust"),
        ]);
        assert_eq!(
            query,
            r#"[:d = at(document.tags, [ "news", "tech" ])fulltext(document, "rust")]"#
        );
    }

    #[test]
    fn empty_predicates_give_empty_query() {
        assert_eq!(predicates_to_query(&[]), "");
    }

    #[test]
    fn quotes_are_not_escaped() {
        let p = Predicate::at("document.id", r#"a"b"#);
        assert_eq!(p.to_string(), r#"at(document.id, "a"b")"#);
    }
}
