// ABOUTME: Base-contract fallbacks shared by all extractors that do not override them.
// ABOUTME: Language detection, canonical URL resolution, link harvesting, instructions list derivation.

use indexmap::IndexMap;
use url::Url;

use crate::document::{attr_eq_ignore_case, element_attrs, Page};
use crate::error::{Result, ScrapeError};
use crate::extractors::operation::{Attributes, Operation};
use crate::extractors::Context;

/// Hrefs that do not point anywhere.
const INVALID_HREFS: &[&str] = &["", "#"];

/// Resolves `link[rel=canonical]` against the page URL, or returns the page URL.
pub fn canonical_url(page: &Page) -> Option<String> {
    let Some(href) = page.attr("link[rel~=canonical][href]", "href") else {
        return page.url().map(str::to_string);
    };

    match page.url().and_then(|base| Url::parse(base).ok()) {
        Some(base) => Some(
            base.join(&href)
                .map(|u| u.to_string())
                .unwrap_or(href),
        ),
        None => Some(href),
    }
}

/// Detects the page language from `html[lang]` and a `Content-Language` meta tag.
///
/// "en" is dropped when another candidate exists, since authoring tools
/// inject it by default.
pub fn language(page: &Page) -> Result<String> {
    let html = page.find("html[lang]").ok_or_else(|| {
        ScrapeError::lookup(
            page.url().unwrap_or_default(),
            Operation::Language.name(),
            Some(anyhow::anyhow!("no <html lang> element")),
        )
    })?;

    let mut candidates: IndexMap<String, ()> = IndexMap::new();
    candidates.insert(html.value().attr("lang").unwrap_or_default().to_string(), ());

    // deprecated, see https://www.w3.org/International/questions/qa-http-and-lang
    let meta = page.find_where("meta[http-equiv][content]", |el| {
        attr_eq_ignore_case(el, "http-equiv", "content-language")
    });
    if let Some(content) = meta.and_then(|m| m.value().attr("content")) {
        let language = content.split(',').next().unwrap_or_default();
        if !language.is_empty() && !candidates.contains_key(language) {
            candidates.insert(language.to_string(), ());
        }
    }

    if candidates.len() > 1 {
        candidates.shift_remove("en");
    }

    candidates.into_iter().next().map(|(lang, ())| lang).ok_or_else(|| {
        ScrapeError::lookup(
            page.url().unwrap_or_default(),
            Operation::Language.name(),
            None,
        )
    })
}

/// Splits `instructions()` into non-empty lines, in order.
pub fn instructions_list(ctx: &Context<'_>) -> Result<Vec<String>> {
    Ok(split_instructions(&ctx.instructions()?))
}

pub(crate) fn split_instructions(instructions: &str) -> Vec<String> {
    instructions
        .split('\n')
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Attribute sets of every anchor with a usable href, in document order.
pub fn links(page: &Page) -> Vec<Attributes> {
    page.find_all("a[href]")
        .into_iter()
        .filter(|a| {
            a.value()
                .attr("href")
                .is_some_and(|href| !INVALID_HREFS.contains(&href))
        })
        .map(|a| element_attrs(&a))
        .collect()
}

/// The `og:site_name` meta content, if present.
pub fn site_name(page: &Page) -> Option<String> {
    page.find(r#"meta[property="og:site_name"]"#)
        .and_then(|m| m.value().attr("content"))
        .map(str::to_string)
}
