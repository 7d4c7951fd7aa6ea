// ABOUTME: Registry mapping host names to site extractor constructors.
// ABOUTME: Provides builtin_registry() with every extractor shipped in this crate.

//! Host → extractor lookup.
//!
//! Lookups ignore a leading `www.` so `www.inspiralized.com` and
//! `inspiralized.com` resolve to the same extractor.

use std::collections::HashMap;

use url::Url;

use crate::extractors::sites::Inspiralized;
use crate::extractors::Scraper;

/// Builds a fresh extractor instance.
pub type ScraperFactory = fn() -> Box<dyn Scraper>;

/// Registry for looking up site extractors by host.
#[derive(Debug, Default, Clone)]
pub struct ScraperRegistry {
    map: HashMap<String, ScraperFactory>,
}

impl ScraperRegistry {
    /// Creates a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `factory` under the host its extractor declares.
    pub fn register(&mut self, factory: ScraperFactory) {
        let host = normalize_host(factory().host());
        self.map.insert(host, factory);
    }

    /// Registers an additional host for an already known extractor.
    pub fn alias(&mut self, host: &str, factory: ScraperFactory) {
        self.map.insert(normalize_host(host), factory);
    }

    /// Builds the extractor registered for `host`.
    pub fn get(&self, host: &str) -> Option<Box<dyn Scraper>> {
        self.map.get(&normalize_host(host)).map(|factory| factory())
    }

    pub fn contains(&self, host: &str) -> bool {
        self.map.contains_key(&normalize_host(host))
    }

    /// Registered hosts, sorted.
    pub fn hosts(&self) -> Vec<&str> {
        let mut hosts: Vec<&str> = self.map.keys().map(String::as_str).collect();
        hosts.sort_unstable();
        hosts
    }

    /// Returns the number of registered host mappings.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Returns true if no extractors are registered.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

fn normalize_host(host: &str) -> String {
    let host = host.trim().to_ascii_lowercase();
    match host.strip_prefix("www.") {
        Some(rest) => rest.to_string(),
        None => host,
    }
}

/// Host part of `url` without a leading `www.`, or `None` if it does not parse.
pub fn host_from_url(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    parsed.host_str().map(normalize_host)
}

/// Registry with every extractor shipped in this crate.
pub fn builtin_registry() -> ScraperRegistry {
    let mut registry = ScraperRegistry::new();
    registry.register(|| Box::new(Inspiralized));
    registry
}
