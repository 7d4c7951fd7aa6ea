// ABOUTME: Per-scrape Options, per-client Settings, and the fluent ClientBuilder.
// ABOUTME: ClientBuilder::from_env layers RECIPE_SCRAPERS_* environment variables over the defaults.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use crate::client::Client;
use crate::extractors::operation::{Field, Operation};
use crate::extractors::registry::ScraperRegistry;
use crate::plugins::exceptions::{default_exception_values, ExceptionDefaults};
use crate::plugins::{default_plugins, ExceptionHandlingPlugin, Plugin};
use crate::resource::DEFAULT_USER_AGENT;

pub const ENV_USER_AGENT: &str = "RECIPE_SCRAPERS_USER_AGENT";
pub const ENV_SUPPRESS_EXCEPTIONS: &str = "RECIPE_SCRAPERS_SUPPRESS_EXCEPTIONS";
pub const ENV_TIMEOUT: &str = "RECIPE_SCRAPERS_TIMEOUT";

/// Request timeout passed through to the HTTP transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Timeout {
    /// Whole request, from connect to the last body byte.
    Total(Duration),
    /// Separate connect and read timeouts.
    Split { connect: Duration, read: Duration },
}

/// Options for a single scrape.
#[derive(Debug, Clone, Default)]
pub struct Options {
    /// Scheme ("http", "https" or "all") to proxy URL.
    pub proxies: HashMap<String, String>,
    /// Overrides the client's default timeout.
    pub timeout: Option<Timeout>,
    /// Relax site-specific assumptions; unknown hosts fall back to structured data.
    pub wild_mode: bool,
    /// Raw page content. When non-empty, nothing is fetched.
    pub html: Option<String>,
}

impl Options {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn html(mut self, html: impl Into<String>) -> Self {
        self.html = Some(html.into());
        self
    }

    pub fn proxy(mut self, scheme: impl Into<String>, url: impl Into<String>) -> Self {
        self.proxies.insert(scheme.into(), url.into());
        self
    }

    pub fn timeout(mut self, timeout: Timeout) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn wild_mode(mut self, wild_mode: bool) -> Self {
        self.wild_mode = wild_mode;
        self
    }
}

/// Client-wide configuration.
#[derive(Debug, Clone)]
pub struct Settings {
    pub plugins: Vec<Arc<dyn Plugin>>,
    pub suppress_exceptions: bool,
    pub exception_defaults: ExceptionDefaults,
    pub user_agent: String,
    pub timeout: Option<Timeout>,
    pub http_client: Option<reqwest::Client>,
    pub registry: Option<ScraperRegistry>,
}

impl Settings {
    /// The plugin list actually composed, outermost first. Exception
    /// handling, when enabled, is always outermost.
    pub fn effective_plugins(&self) -> Vec<Arc<dyn Plugin>> {
        let mut plugins = Vec::with_capacity(self.plugins.len() + 1);
        if self.suppress_exceptions {
            plugins.push(Arc::new(ExceptionHandlingPlugin::new(
                self.exception_defaults.clone(),
            )) as Arc<dyn Plugin>);
        }
        plugins.extend(self.plugins.iter().cloned());
        plugins
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            plugins: default_plugins(),
            suppress_exceptions: false,
            exception_defaults: default_exception_values(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: None,
            http_client: None,
            registry: None,
        }
    }
}

/// Builder for constructing Client instances with custom configuration.
#[derive(Debug, Clone, Default)]
pub struct ClientBuilder {
    settings: Settings,
}

impl ClientBuilder {
    /// Create a new ClientBuilder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Default settings overridden by `RECIPE_SCRAPERS_*` environment variables.
    pub fn from_env() -> Self {
        Self::new().env_with(|key| std::env::var(key).ok())
    }

    /// Applies environment-style overrides read through `lookup`.
    ///
    /// Unparseable values are logged and ignored.
    pub fn env_with<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(agent) = lookup(ENV_USER_AGENT).filter(|v| !v.trim().is_empty()) {
            self.settings.user_agent = agent;
        }
        if let Some(raw) = lookup(ENV_SUPPRESS_EXCEPTIONS) {
            match parse_flag(&raw) {
                Some(flag) => self.settings.suppress_exceptions = flag,
                None => tracing::warn!(var = ENV_SUPPRESS_EXCEPTIONS, value = %raw, "ignoring invalid flag"),
            }
        }
        if let Some(raw) = lookup(ENV_TIMEOUT) {
            match raw.trim().parse::<f64>() {
                Ok(secs) if secs.is_finite() && secs > 0.0 => {
                    self.settings.timeout = Some(Timeout::Total(Duration::from_secs_f64(secs)));
                }
                _ => tracing::warn!(var = ENV_TIMEOUT, value = %raw, "ignoring invalid timeout"),
            }
        }
        self
    }

    /// Replace the plugin list.
    pub fn plugins(mut self, plugins: Vec<Arc<dyn Plugin>>) -> Self {
        self.settings.plugins = plugins;
        self
    }

    /// Append one plugin (innermost so far).
    pub fn plugin(mut self, plugin: impl Plugin + 'static) -> Self {
        self.settings.plugins.push(Arc::new(plugin));
        self
    }

    /// Return configured defaults instead of propagating operation errors.
    pub fn suppress_exceptions(mut self, suppress: bool) -> Self {
        self.settings.suppress_exceptions = suppress;
        self
    }

    /// Value returned for `op` when exceptions are suppressed.
    pub fn exception_default(mut self, op: Operation, value: Field) -> Self {
        self.settings.exception_defaults.insert(op, value);
        self
    }

    /// Set the User-Agent header.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.settings.user_agent = user_agent.into();
        self
    }

    /// Default request timeout, used when Options carries none.
    pub fn timeout(mut self, timeout: Timeout) -> Self {
        self.settings.timeout = Some(timeout);
        self
    }

    /// Use a custom HTTP client.
    pub fn http_client(mut self, client: reqwest::Client) -> Self {
        self.settings.http_client = Some(client);
        self
    }

    /// Set a custom extractor registry.
    pub fn registry(mut self, registry: ScraperRegistry) -> Self {
        self.settings.registry = Some(registry);
        self
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Build the Client with the configured settings.
    pub fn build(self) -> Client {
        Client::new(self.settings)
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}
