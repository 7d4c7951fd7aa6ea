// ABOUTME: Client drives the extraction lifecycle: acquire content, parse, obtain the operation table.
// ABOUTME: Dispatches URLs to site extractors through the registry, with a wild-mode structured-data fallback.

use std::collections::HashMap;

use crate::document::Page;
use crate::error::{Result, ScrapeError};
use crate::extractors::registry::{builtin_registry, host_from_url, ScraperRegistry};
use crate::extractors::sites::SchemaScraper;
use crate::extractors::Scraper;
use crate::options::{ClientBuilder, Options, Settings};
use crate::plugins::compose::OperationTables;
use crate::recipe::{LifecycleState, Recipe};
use crate::resource::{self, build_http_client, FetchOptions, Payload, Target};

/// The main client for scraping recipe pages.
pub struct Client {
    settings: Settings,
    http_client: reqwest::Client,
    registry: ScraperRegistry,
    tables: OperationTables,
}

impl Client {
    /// Create a new ClientBuilder for configuring the client.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Create a new Client with the given settings.
    pub fn new(settings: Settings) -> Self {
        let http_client = settings.http_client.clone().unwrap_or_else(|| {
            // timeouts are applied per request
            build_http_client(&settings.user_agent, &HashMap::new(), None)
                .expect("failed to build HTTP client")
        });
        let registry = settings.registry.clone().unwrap_or_else(builtin_registry);
        let tables = OperationTables::new(settings.effective_plugins());

        Self {
            settings,
            http_client,
            registry,
            tables,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn registry(&self) -> &ScraperRegistry {
        &self.registry
    }

    /// Composed operation tables, shared by every Recipe this client creates.
    pub fn tables(&self) -> &OperationTables {
        &self.tables
    }

    /// Runs the lifecycle for an explicitly chosen extractor.
    pub async fn create<S>(&self, scraper: S, url: Option<&str>, options: Options) -> Result<Recipe>
    where
        S: Scraper + 'static,
    {
        self.create_boxed(Box::new(scraper), url, options).await
    }

    /// Runs the lifecycle for an already boxed extractor.
    pub async fn create_boxed(
        &self,
        scraper: Box<dyn Scraper>,
        url: Option<&str>,
        options: Options,
    ) -> Result<Recipe> {
        let target = Target::new(url.map(str::to_string), options.html.clone());
        let fetch_opts = FetchOptions {
            user_agent: self.settings.user_agent.clone(),
            proxies: options.proxies.clone(),
            timeout: options.timeout.or(self.settings.timeout),
        };
        let mut state = LifecycleState::Created;
        tracing::debug!(
            host = scraper.host(),
            url = url.unwrap_or_default(),
            state = %state,
            "starting lifecycle"
        );

        let (payload, fetch_error) =
            match resource::acquire(&self.http_client, &target, &fetch_opts).await {
                Ok(payload) => (payload, None),
                Err(err) if err.is_fetch() => {
                    tracing::warn!(
                        url = url.unwrap_or_default(),
                        error = %err,
                        "fetch failed, continuing with an empty document"
                    );
                    let degraded = Payload {
                        body: String::new(),
                        url: target.url.clone(),
                    };
                    (degraded, Some(err))
                }
                Err(err) => return Err(err),
            };
        state = state.next();
        tracing::debug!(
            url = payload.url.as_deref().unwrap_or_default(),
            bytes = payload.body.len(),
            degraded = fetch_error.is_some(),
            state = %state,
            "content acquired"
        );

        let page = Page::parse(&payload.body, payload.url, options.wild_mode);
        state = state.next();
        tracing::debug!(state = %state, "document parsed");

        let table = self.tables.get_or_compose(scraper.as_ref());
        state = state.next();
        tracing::debug!(host = scraper.host(), state = %state, "recipe ready");

        Ok(Recipe::new(scraper, page, table, state, fetch_error))
    }

    /// Picks the extractor for `url`'s host and runs the lifecycle.
    ///
    /// Unknown hosts fail with `UnsupportedHost` unless `options.wild_mode`
    /// is set, in which case the structured-data extractor is used.
    pub async fn scrape(&self, url: &str, options: Options) -> Result<Recipe> {
        let scraper = self.scraper_for(url, options.wild_mode)?;
        self.create_boxed(scraper, Some(url), options).await
    }

    /// Like [`Client::scrape`], for HTML that is already at hand. Never fetches.
    pub async fn scrape_html(&self, html: &str, url: &str, options: Options) -> Result<Recipe> {
        let options = Options {
            html: Some(html.to_string()),
            ..options
        };
        let scraper = self.scraper_for(url, options.wild_mode)?;
        self.create_boxed(scraper, Some(url), options).await
    }

    fn scraper_for(&self, url: &str, wild_mode: bool) -> Result<Box<dyn Scraper>> {
        let host = host_from_url(url).ok_or_else(|| {
            ScrapeError::invalid_target(
                url,
                "Scrape",
                Some(anyhow::anyhow!("URL has no host")),
            )
        })?;

        if let Some(scraper) = self.registry.get(&host) {
            return Ok(scraper);
        }
        if wild_mode {
            tracing::debug!(host = %host, "no site extractor, using structured data");
            return Ok(Box::new(SchemaScraper::new(host)));
        }
        Err(ScrapeError::unsupported_host(url, &host))
    }
}

impl Default for Client {
    fn default() -> Self {
        Self::new(Settings::default())
    }
}
