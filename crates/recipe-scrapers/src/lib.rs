// ABOUTME: Main library entry point for the recipe-scrapers crate.
// ABOUTME: Re-exports the public API: Client, ClientBuilder, Recipe, Scraper, Operation, Field, plugins and errors.

//! recipe-scrapers - structured recipe data from recipe web pages.
//!
//! Each supported site implements the [`Scraper`] trait. The [`Client`]
//! fetches (or accepts) a page, parses it, and hands back a [`Recipe`] whose
//! operations run through a chain of [`Plugin`]s composed once per
//! extractor type.
//!
//! # Example
//!
//! ```no_run
//! use recipe_scrapers::{Client, Options, ScrapeError};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), ScrapeError> {
//!     let client = Client::builder().build();
//!     let recipe = client
//!         .scrape("https://inspiralized.com/zucchini-pesto/", Options::new())
//!         .await?;
//!     println!("{}", recipe.title()?);
//!     for step in recipe.instructions_list()? {
//!         println!("- {}", step);
//!     }
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod document;
pub mod error;
pub mod extractors;
pub mod options;
pub mod plugins;
pub mod recipe;
pub mod resource;
pub mod utils;

pub use crate::client::Client;
pub use crate::document::{Page, SchemaOrg};
pub use crate::error::{ErrorCode, Result, ScrapeError};
pub use crate::extractors::operation::{Attributes, Field, Operation};
pub use crate::extractors::registry::{builtin_registry, host_from_url, ScraperRegistry};
pub use crate::extractors::sites::{Inspiralized, SchemaScraper};
pub use crate::extractors::{Context, Scraper};
pub use crate::options::{ClientBuilder, Options, Settings, Timeout};
pub use crate::plugins::{default_plugins, FnPlugin, Handler, Plugin, Scope};
pub use crate::recipe::{LifecycleState, Recipe, RecipeData};
