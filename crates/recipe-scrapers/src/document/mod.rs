// ABOUTME: The parsed document owned by one recipe: DOM, structured data, resolved URL.
// ABOUTME: Provides selector-based find/find_all helpers used by extractors and plugins.

//! Document model.
//!
//! A [`Page`] is built once from the acquired payload and never changes
//! afterwards. It holds two views over the same payload: the DOM
//! (`scraper::Html`) and the schema.org reader ([`SchemaOrg`]).

pub mod schemaorg;
pub mod selectors;

use scraper::{ElementRef, Html};

use crate::extractors::operation::Attributes;
use selectors::get_or_compile;

pub use schemaorg::SchemaOrg;

/// A parsed recipe page.
pub struct Page {
    html: Html,
    schema: SchemaOrg,
    url: Option<String>,
    wild_mode: bool,
}

impl Page {
    /// Parses a payload. Empty or garbage input yields an empty document.
    pub fn parse(payload: &str, url: Option<String>, wild_mode: bool) -> Self {
        let html = Html::parse_document(payload);
        let schema = SchemaOrg::from_html(&html);
        Self {
            html,
            schema,
            url,
            wild_mode,
        }
    }

    pub fn html(&self) -> &Html {
        &self.html
    }

    pub fn schema(&self) -> &SchemaOrg {
        &self.schema
    }

    /// The resolved URL (final URL after redirects, or the caller's URL).
    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    /// Whether per-site structural assumptions should be relaxed.
    pub fn wild_mode(&self) -> bool {
        self.wild_mode
    }

    /// First element matching `css`, in document order.
    pub fn find(&self, css: &str) -> Option<ElementRef<'_>> {
        let selector = get_or_compile(css)?;
        self.html.select(&selector).next()
    }

    /// All elements matching `css`, in document order. Invalid selectors match nothing.
    pub fn find_all(&self, css: &str) -> Vec<ElementRef<'_>> {
        match get_or_compile(css) {
            Some(selector) => self.html.select(&selector).collect(),
            None => Vec::new(),
        }
    }

    /// First element matching `css` that also satisfies `pred`.
    pub fn find_where<F>(&self, css: &str, pred: F) -> Option<ElementRef<'_>>
    where
        F: Fn(&ElementRef<'_>) -> bool,
    {
        let selector = get_or_compile(css)?;
        self.html.select(&selector).find(|el| pred(el))
    }

    /// Attribute value of the first element matching `css`.
    pub fn attr(&self, css: &str, name: &str) -> Option<String> {
        self.find(css)
            .and_then(|el| el.value().attr(name))
            .map(|v| v.to_string())
    }

    /// Concatenated text of the first element matching `css`.
    pub fn text(&self, css: &str) -> Option<String> {
        self.find(css).map(|el| element_text(&el))
    }

    /// True if some text node, trimmed, is exactly `text`.
    pub fn has_text_node(&self, text: &str) -> bool {
        self.html.root_element().text().any(|t| t.trim() == text)
    }
}

/// Concatenated text content of an element.
pub fn element_text(el: &ElementRef<'_>) -> String {
    el.text().collect::<String>()
}

/// The full attribute set of an element, in source order.
pub fn element_attrs(el: &ElementRef<'_>) -> Attributes {
    el.value()
        .attrs()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

/// Case-insensitive attribute comparison; absent attributes never match.
pub fn attr_eq_ignore_case(el: &ElementRef<'_>, name: &str, expected: &str) -> bool {
    el.value()
        .attr(name)
        .is_some_and(|v| v.eq_ignore_ascii_case(expected))
}
