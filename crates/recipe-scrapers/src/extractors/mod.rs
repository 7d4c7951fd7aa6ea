// ABOUTME: The extraction contract every site extractor implements, plus the call context.
// ABOUTME: Unimplemented operations fail with NotImplemented; a few have base-contract defaults.

//! Extraction contract.
//!
//! A site extractor implements [`Scraper`], overriding the operations its
//! site supports. Every call goes through a [`Context`], which exposes the
//! parsed page and routes calls to *other* operations through the composed
//! interceptor chain, so derived operations observe plugin effects.
//!
//! Submodules:
//! - `operation`: the operation set and the uniform `Field` value.
//! - `defaults`: base-contract fallbacks (language, canonical URL, links, ...).
//! - `registry`: host to extractor lookup.
//! - `sites`: concrete extractors.

pub mod defaults;
pub mod operation;
pub mod registry;
pub mod sites;

use std::any::TypeId;
use std::ops::Deref;

use crate::document::Page;
use crate::error::{Result, ScrapeError};
use crate::plugins::compose::OperationTable;
use operation::{Attributes, Field, Operation};

/// Identity of the concrete extractor type behind a `dyn Scraper`.
///
/// Implemented automatically for every `Scraper`.
pub trait ScraperIdentity {
    fn type_key(&self) -> TypeId;
    fn type_name(&self) -> &'static str;
}

impl<T: Scraper + 'static> ScraperIdentity for T {
    fn type_key(&self) -> TypeId {
        TypeId::of::<T>()
    }

    fn type_name(&self) -> &'static str {
        std::any::type_name::<T>()
    }
}

/// The set of extraction operations a site extractor may provide.
pub trait Scraper: ScraperIdentity + Send + Sync {
    /// Host identifier this extractor serves, e.g. `"inspiralized.com"`.
    fn host(&self) -> &str;

    fn title(&self, _ctx: &Context<'_>) -> Result<String> {
        Err(ScrapeError::not_implemented(Operation::Title))
    }

    fn category(&self, _ctx: &Context<'_>) -> Result<String> {
        Err(ScrapeError::not_implemented(Operation::Category))
    }

    /// Total preparation and cooking time in minutes.
    fn total_time(&self, _ctx: &Context<'_>) -> Result<Option<u32>> {
        Err(ScrapeError::not_implemented(Operation::TotalTime))
    }

    /// Cooking time in minutes.
    fn cook_time(&self, _ctx: &Context<'_>) -> Result<Option<u32>> {
        Err(ScrapeError::not_implemented(Operation::CookTime))
    }

    /// Preparation time in minutes.
    fn prep_time(&self, _ctx: &Context<'_>) -> Result<Option<u32>> {
        Err(ScrapeError::not_implemented(Operation::PrepTime))
    }

    /// Number of servings or items, e.g. "4 servings".
    fn yields(&self, _ctx: &Context<'_>) -> Result<String> {
        Err(ScrapeError::not_implemented(Operation::Yields))
    }

    fn image(&self, _ctx: &Context<'_>) -> Result<Option<String>> {
        Err(ScrapeError::not_implemented(Operation::Image))
    }

    fn nutrients(&self, _ctx: &Context<'_>) -> Result<Attributes> {
        Err(ScrapeError::not_implemented(Operation::Nutrients))
    }

    /// Human language the recipe is written in.
    fn language(&self, ctx: &Context<'_>) -> Result<String> {
        defaults::language(ctx.page())
    }

    fn ingredients(&self, _ctx: &Context<'_>) -> Result<Vec<String>> {
        Err(ScrapeError::not_implemented(Operation::Ingredients))
    }

    /// Instructions, one step per line.
    fn instructions(&self, _ctx: &Context<'_>) -> Result<String> {
        Err(ScrapeError::not_implemented(Operation::Instructions))
    }

    fn instructions_list(&self, ctx: &Context<'_>) -> Result<Vec<String>> {
        defaults::instructions_list(ctx)
    }

    fn ratings(&self, _ctx: &Context<'_>) -> Result<Option<f64>> {
        Err(ScrapeError::not_implemented(Operation::Ratings))
    }

    fn author(&self, _ctx: &Context<'_>) -> Result<Option<String>> {
        Err(ScrapeError::not_implemented(Operation::Author))
    }

    fn cuisine(&self, _ctx: &Context<'_>) -> Result<String> {
        Err(ScrapeError::not_implemented(Operation::Cuisine))
    }

    fn description(&self, _ctx: &Context<'_>) -> Result<String> {
        Err(ScrapeError::not_implemented(Operation::Description))
    }

    fn reviews(&self, _ctx: &Context<'_>) -> Result<Vec<Attributes>> {
        Err(ScrapeError::not_implemented(Operation::Reviews))
    }

    fn links(&self, ctx: &Context<'_>) -> Result<Vec<Attributes>> {
        Ok(defaults::links(ctx.page()))
    }

    fn site_name(&self, ctx: &Context<'_>) -> Result<Option<String>> {
        Ok(defaults::site_name(ctx.page()))
    }

    fn canonical_url(&self, ctx: &Context<'_>) -> Result<Option<String>> {
        Ok(defaults::canonical_url(ctx.page()))
    }
}

/// Calls the extractor's own implementation of `op`, bypassing interceptors.
pub(crate) fn dispatch(op: Operation, ctx: &Context<'_>) -> Result<Field> {
    let s = ctx.scraper();
    let field: Field = match op {
        Operation::Title => s.title(ctx)?.into(),
        Operation::Category => s.category(ctx)?.into(),
        Operation::TotalTime => s.total_time(ctx)?.into(),
        Operation::CookTime => s.cook_time(ctx)?.into(),
        Operation::PrepTime => s.prep_time(ctx)?.into(),
        Operation::Yields => s.yields(ctx)?.into(),
        Operation::Image => s.image(ctx)?.into(),
        Operation::Nutrients => s.nutrients(ctx)?.into(),
        Operation::Language => s.language(ctx)?.into(),
        Operation::Ingredients => s.ingredients(ctx)?.into(),
        Operation::Instructions => s.instructions(ctx)?.into(),
        Operation::InstructionsList => s.instructions_list(ctx)?.into(),
        Operation::Ratings => s.ratings(ctx)?.into(),
        Operation::Author => s.author(ctx)?.into(),
        Operation::Cuisine => s.cuisine(ctx)?.into(),
        Operation::Description => s.description(ctx)?.into(),
        Operation::Reviews => s.reviews(ctx)?.into(),
        Operation::Links => s.links(ctx)?.into(),
        Operation::SiteName => s.site_name(ctx)?.into(),
        Operation::CanonicalUrl => s.canonical_url(ctx)?.into(),
        Operation::Host => Field::Text(s.host().to_string()),
    };
    Ok(field)
}

/// Everything an operation needs while it runs.
///
/// Dereferences to the [`Page`], so `ctx.find(..)` queries the document.
#[derive(Clone, Copy)]
pub struct Context<'a> {
    scraper: &'a dyn Scraper,
    page: &'a Page,
    table: &'a OperationTable,
}

impl<'a> Context<'a> {
    pub fn new(scraper: &'a dyn Scraper, page: &'a Page, table: &'a OperationTable) -> Self {
        Self {
            scraper,
            page,
            table,
        }
    }

    pub fn scraper(&self) -> &'a dyn Scraper {
        self.scraper
    }

    pub fn page(&self) -> &'a Page {
        self.page
    }

    /// Host of the extractor, as seen by plugin predicates.
    pub fn host(&self) -> &'a str {
        self.scraper.host()
    }

    /// Invokes `op` through its composed interceptor chain.
    pub fn call(&self, op: Operation) -> Result<Field> {
        (self.table.handler(op))(self)
    }

    /// `instructions()` through the chain.
    pub fn instructions(&self) -> Result<String> {
        self.call(Operation::Instructions)?
            .into_text(Operation::Instructions)
    }

    /// Lookup error for `op` tagged with the page URL.
    pub fn missing(&self, op: Operation, what: &str) -> ScrapeError {
        ScrapeError::lookup(
            self.page.url().unwrap_or_default(),
            op.name(),
            Some(anyhow::anyhow!("{} not found", what)),
        )
    }
}

impl<'a> Deref for Context<'a> {
    type Target = Page;

    fn deref(&self) -> &Page {
        self.page
    }
}
