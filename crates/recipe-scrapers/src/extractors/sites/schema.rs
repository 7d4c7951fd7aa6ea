// ABOUTME: Generic extractor answering every field from the page's schema.org Recipe data.
// ABOUTME: Used in wild mode for hosts without a dedicated extractor.

use crate::error::Result;
use crate::extractors::operation::{Attributes, Operation};
use crate::extractors::{defaults, Context, Scraper};

/// Serves any host; the host is fixed per instance.
#[derive(Debug, Clone)]
pub struct SchemaScraper {
    host: String,
}

impl SchemaScraper {
    pub fn new(host: impl Into<String>) -> Self {
        Self { host: host.into() }
    }
}

fn required<T>(ctx: &Context<'_>, op: Operation, value: Option<T>) -> Result<T> {
    value.ok_or_else(|| ctx.missing(op, "schema.org field"))
}

impl Scraper for SchemaScraper {
    fn host(&self) -> &str {
        &self.host
    }

    fn title(&self, ctx: &Context<'_>) -> Result<String> {
        required(ctx, Operation::Title, ctx.schema().title())
    }

    fn category(&self, ctx: &Context<'_>) -> Result<String> {
        required(ctx, Operation::Category, ctx.schema().category())
    }

    fn total_time(&self, ctx: &Context<'_>) -> Result<Option<u32>> {
        Ok(ctx.schema().total_time())
    }

    fn cook_time(&self, ctx: &Context<'_>) -> Result<Option<u32>> {
        Ok(ctx.schema().cook_time())
    }

    fn prep_time(&self, ctx: &Context<'_>) -> Result<Option<u32>> {
        Ok(ctx.schema().prep_time())
    }

    fn yields(&self, ctx: &Context<'_>) -> Result<String> {
        required(ctx, Operation::Yields, ctx.schema().yields())
    }

    fn image(&self, ctx: &Context<'_>) -> Result<Option<String>> {
        Ok(ctx.schema().image())
    }

    fn nutrients(&self, ctx: &Context<'_>) -> Result<Attributes> {
        Ok(ctx.schema().nutrients().unwrap_or_default())
    }

    fn language(&self, ctx: &Context<'_>) -> Result<String> {
        match ctx.schema().language() {
            Some(lang) => Ok(lang),
            None => defaults::language(ctx.page()),
        }
    }

    fn ingredients(&self, ctx: &Context<'_>) -> Result<Vec<String>> {
        required(ctx, Operation::Ingredients, ctx.schema().ingredients())
    }

    fn instructions(&self, ctx: &Context<'_>) -> Result<String> {
        Ok(ctx.schema().instructions().unwrap_or_default())
    }

    fn ratings(&self, ctx: &Context<'_>) -> Result<Option<f64>> {
        Ok(ctx.schema().ratings())
    }

    fn author(&self, ctx: &Context<'_>) -> Result<Option<String>> {
        Ok(ctx.schema().author())
    }

    fn cuisine(&self, ctx: &Context<'_>) -> Result<String> {
        required(ctx, Operation::Cuisine, ctx.schema().cuisine())
    }

    fn description(&self, ctx: &Context<'_>) -> Result<String> {
        required(ctx, Operation::Description, ctx.schema().description())
    }

    fn site_name(&self, ctx: &Context<'_>) -> Result<Option<String>> {
        Ok(ctx
            .schema()
            .site_name()
            .or_else(|| defaults::site_name(ctx.page())))
    }
}
