// ABOUTME: Concrete site extractors.
// ABOUTME: Each module implements Scraper for one host; schema.rs serves any host from structured data.

pub mod inspiralized;
pub mod schema;

pub use inspiralized::Inspiralized;
pub use schema::SchemaScraper;
