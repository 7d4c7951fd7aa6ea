// ABOUTME: Recipe is one extractor bound to one parsed page plus its type's composed operation table.
// ABOUTME: Exposes typed per-operation accessors, the lifecycle state, and a serializable snapshot.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use crate::document::Page;
use crate::error::{Result, ScrapeError};
use crate::extractors::operation::{Attributes, Field, Operation};
use crate::extractors::{Context, Scraper, ScraperIdentity};
use crate::plugins::compose::OperationTable;

/// Stages of the extraction lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleState {
    Created,
    ContentAcquired,
    DocumentParsed,
    Ready,
}

impl LifecycleState {
    /// The stage that follows this one. `Ready` is terminal.
    pub fn next(self) -> LifecycleState {
        match self {
            LifecycleState::Created => LifecycleState::ContentAcquired,
            LifecycleState::ContentAcquired => LifecycleState::DocumentParsed,
            LifecycleState::DocumentParsed | LifecycleState::Ready => LifecycleState::Ready,
        }
    }
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LifecycleState::Created => "created",
            LifecycleState::ContentAcquired => "content_acquired",
            LifecycleState::DocumentParsed => "document_parsed",
            LifecycleState::Ready => "ready",
        };
        write!(f, "{}", s)
    }
}

/// An extractor instance ready for operation calls.
pub struct Recipe {
    scraper: Box<dyn Scraper>,
    page: Page,
    table: Arc<OperationTable>,
    state: LifecycleState,
    fetch_error: Option<ScrapeError>,
}

impl Recipe {
    pub(crate) fn new(
        scraper: Box<dyn Scraper>,
        page: Page,
        table: Arc<OperationTable>,
        state: LifecycleState,
        fetch_error: Option<ScrapeError>,
    ) -> Self {
        Self {
            scraper,
            page,
            table,
            state,
            fetch_error,
        }
    }

    /// The last lifecycle stage this recipe reached.
    ///
    /// A degraded recipe still reaches `Ready`; check [`Recipe::is_degraded`].
    pub fn state(&self) -> LifecycleState {
        self.state
    }

    /// The error from a failed fetch, if content acquisition degraded.
    pub fn fetch_error(&self) -> Option<&ScrapeError> {
        self.fetch_error.as_ref()
    }

    /// True if the page could not be fetched and the document is empty.
    pub fn is_degraded(&self) -> bool {
        self.fetch_error.is_some()
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    /// The resolved URL.
    pub fn url(&self) -> Option<&str> {
        self.page.url()
    }

    pub fn scraper(&self) -> &dyn Scraper {
        self.scraper.as_ref()
    }

    /// Names of the plugins wrapping `op`, outermost first.
    pub fn plugins_for(&self, op: Operation) -> &[String] {
        self.table.plugins_for(op)
    }

    /// Shared operation table; identical for every Recipe of the same extractor type.
    pub fn table(&self) -> &Arc<OperationTable> {
        &self.table
    }

    /// Invokes `op` through its interceptor chain.
    pub fn call(&self, op: Operation) -> Result<Field> {
        Context::new(self.scraper.as_ref(), &self.page, &self.table).call(op)
    }

    pub fn title(&self) -> Result<String> {
        self.call(Operation::Title)?.into_text(Operation::Title)
    }

    pub fn category(&self) -> Result<String> {
        self.call(Operation::Category)?
            .into_text(Operation::Category)
    }

    pub fn total_time(&self) -> Result<Option<u32>> {
        self.call(Operation::TotalTime)?
            .into_minutes(Operation::TotalTime)
    }

    pub fn cook_time(&self) -> Result<Option<u32>> {
        self.call(Operation::CookTime)?
            .into_minutes(Operation::CookTime)
    }

    pub fn prep_time(&self) -> Result<Option<u32>> {
        self.call(Operation::PrepTime)?
            .into_minutes(Operation::PrepTime)
    }

    pub fn yields(&self) -> Result<String> {
        self.call(Operation::Yields)?.into_text(Operation::Yields)
    }

    pub fn image(&self) -> Result<Option<String>> {
        self.call(Operation::Image)?.into_opt_text(Operation::Image)
    }

    pub fn nutrients(&self) -> Result<Attributes> {
        self.call(Operation::Nutrients)?
            .into_map(Operation::Nutrients)
    }

    pub fn language(&self) -> Result<String> {
        self.call(Operation::Language)?
            .into_text(Operation::Language)
    }

    pub fn ingredients(&self) -> Result<Vec<String>> {
        self.call(Operation::Ingredients)?
            .into_list(Operation::Ingredients)
    }

    pub fn instructions(&self) -> Result<String> {
        self.call(Operation::Instructions)?
            .into_text(Operation::Instructions)
    }

    pub fn instructions_list(&self) -> Result<Vec<String>> {
        self.call(Operation::InstructionsList)?
            .into_list(Operation::InstructionsList)
    }

    pub fn ratings(&self) -> Result<Option<f64>> {
        self.call(Operation::Ratings)?
            .into_number(Operation::Ratings)
    }

    pub fn author(&self) -> Result<Option<String>> {
        self.call(Operation::Author)?
            .into_opt_text(Operation::Author)
    }

    pub fn cuisine(&self) -> Result<String> {
        self.call(Operation::Cuisine)?.into_text(Operation::Cuisine)
    }

    pub fn description(&self) -> Result<String> {
        self.call(Operation::Description)?
            .into_text(Operation::Description)
    }

    pub fn reviews(&self) -> Result<Vec<Attributes>> {
        self.call(Operation::Reviews)?
            .into_records(Operation::Reviews)
    }

    pub fn links(&self) -> Result<Vec<Attributes>> {
        self.call(Operation::Links)?.into_records(Operation::Links)
    }

    pub fn site_name(&self) -> Result<Option<String>> {
        self.call(Operation::SiteName)?
            .into_opt_text(Operation::SiteName)
    }

    pub fn canonical_url(&self) -> Result<Option<String>> {
        self.call(Operation::CanonicalUrl)?
            .into_opt_text(Operation::CanonicalUrl)
    }

    pub fn host(&self) -> Result<String> {
        self.call(Operation::Host)?.into_text(Operation::Host)
    }

    /// Snapshot of every operation. Operations that fail are null.
    pub fn to_data(&self) -> RecipeData {
        RecipeData {
            host: self.host().unwrap_or_else(|_| self.scraper.host().to_string()),
            title: self.title().ok(),
            category: self.category().ok(),
            total_time: self.total_time().ok().flatten(),
            cook_time: self.cook_time().ok().flatten(),
            prep_time: self.prep_time().ok().flatten(),
            yields: self.yields().ok(),
            image: self.image().ok().flatten(),
            nutrients: self.nutrients().ok(),
            language: self.language().ok(),
            ingredients: self.ingredients().ok(),
            instructions: self.instructions().ok(),
            instructions_list: self.instructions_list().ok(),
            ratings: self.ratings().ok().flatten(),
            author: self.author().ok().flatten(),
            cuisine: self.cuisine().ok(),
            description: self.description().ok(),
            reviews: self.reviews().ok(),
            site_name: self.site_name().ok().flatten(),
            canonical_url: self.canonical_url().ok().flatten(),
        }
    }
}

impl fmt::Debug for Recipe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Recipe")
            .field("scraper", &self.scraper.type_name())
            .field("host", &self.scraper.host())
            .field("url", &self.page.url())
            .field("state", &self.state)
            .field("fetch_error", &self.fetch_error)
            .finish()
    }
}

/// Serializable snapshot of a Recipe.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RecipeData {
    pub host: String,
    pub title: Option<String>,
    pub category: Option<String>,
    pub total_time: Option<u32>,
    pub cook_time: Option<u32>,
    pub prep_time: Option<u32>,
    pub yields: Option<String>,
    pub image: Option<String>,
    pub nutrients: Option<Attributes>,
    pub language: Option<String>,
    pub ingredients: Option<Vec<String>>,
    pub instructions: Option<String>,
    pub instructions_list: Option<Vec<String>>,
    pub ratings: Option<f64>,
    pub author: Option<String>,
    pub cuisine: Option<String>,
    pub description: Option<String>,
    pub reviews: Option<Vec<Attributes>>,
    pub site_name: Option<String>,
    pub canonical_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugins::{handler, FnPlugin, Plugin};

    struct Fixed;

    impl Scraper for Fixed {
        fn host(&self) -> &str {
            "fixed.test"
        }

        fn title(&self, _ctx: &Context<'_>) -> Result<String> {
            Ok("Soup".to_string())
        }

        fn total_time(&self, _ctx: &Context<'_>) -> Result<Option<u32>> {
            Ok(Some(20))
        }
    }

    fn recipe(plugins: &[Arc<dyn Plugin>]) -> Recipe {
        let page = Page::parse(r#"<html lang="en"></html>"#, None, false);
        let table = Arc::new(OperationTable::compose(&Fixed, plugins));
        Recipe::new(Box::new(Fixed), page, table, LifecycleState::Ready, None)
    }

    #[test]
    fn typed_accessors() {
        let r = recipe(&[]);
        assert_eq!(r.title().unwrap(), "Soup");
        assert_eq!(r.total_time().unwrap(), Some(20));
        assert_eq!(r.host().unwrap(), "fixed.test");
        assert!(r.cuisine().unwrap_err().is_not_implemented());
        assert_eq!(r.state(), LifecycleState::Ready);
        assert!(!r.is_degraded());
    }

    #[test]
    fn lifecycle_states_advance_in_order() {
        let mut state = LifecycleState::Created;
        let mut seen = vec![state];
        while state != LifecycleState::Ready {
            state = state.next();
            seen.push(state);
        }
        assert_eq!(
            seen,
            vec![
                LifecycleState::Created,
                LifecycleState::ContentAcquired,
                LifecycleState::DocumentParsed,
                LifecycleState::Ready
            ]
        );
        assert_eq!(LifecycleState::Ready.next(), LifecycleState::Ready);
    }

    #[test]
    fn state_is_what_the_lifecycle_recorded() {
        let page = Page::parse("", None, false);
        let table = Arc::new(OperationTable::compose(&Fixed, &[]));
        let r = Recipe::new(Box::new(Fixed), page, table, LifecycleState::DocumentParsed, None);
        assert_eq!(r.state(), LifecycleState::DocumentParsed);
        assert_eq!(r.state().to_string(), "document_parsed");
    }

    #[test]
    fn variant_change_is_field_type_error() {
        let to_number: Arc<dyn Plugin> = Arc::new(FnPlugin::new(
            "numeric-title",
            |_, op| op == Operation::Title,
            |_, _next| handler(|_ctx| Ok(Field::Number(1.0))),
        ));
        let err = recipe(&[to_number]).title().unwrap_err();
        assert!(err.is_field_type());
        assert_eq!(err.op, "title");
    }

    #[test]
    fn snapshot_nulls_unsupported_fields() {
        let data = recipe(&[]).to_data();
        assert_eq!(data.title.as_deref(), Some("Soup"));
        assert_eq!(data.total_time, Some(20));
        assert_eq!(data.language.as_deref(), Some("en"));
        assert_eq!(data.cuisine, None);
        assert_eq!(data.canonical_url, None);

        let json = serde_json::to_value(&data).unwrap();
        assert_eq!(json["host"], "fixed.test");
        assert!(json["cuisine"].is_null());
    }
}
