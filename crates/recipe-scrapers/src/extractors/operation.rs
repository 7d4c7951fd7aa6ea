// ABOUTME: The fixed set of extraction operations and the uniform Field value carried through handlers.
// ABOUTME: Operation::ALL is iterated directly when composing interceptor chains.

use std::fmt;

use indexmap::IndexMap;
use serde::Serialize;

use crate::error::{Result, ScrapeError};

/// Attribute or key/value map with insertion order preserved.
pub type Attributes = IndexMap<String, String>;

/// One named extraction operation of the `Scraper` contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    Title,
    Category,
    TotalTime,
    CookTime,
    PrepTime,
    Yields,
    Image,
    Nutrients,
    Language,
    Ingredients,
    Instructions,
    InstructionsList,
    Ratings,
    Author,
    Cuisine,
    Description,
    Reviews,
    Links,
    SiteName,
    CanonicalUrl,
    Host,
}

impl Operation {
    /// Every operation, in declaration order.
    pub const ALL: [Operation; 21] = [
        Operation::Title,
        Operation::Category,
        Operation::TotalTime,
        Operation::CookTime,
        Operation::PrepTime,
        Operation::Yields,
        Operation::Image,
        Operation::Nutrients,
        Operation::Language,
        Operation::Ingredients,
        Operation::Instructions,
        Operation::InstructionsList,
        Operation::Ratings,
        Operation::Author,
        Operation::Cuisine,
        Operation::Description,
        Operation::Reviews,
        Operation::Links,
        Operation::SiteName,
        Operation::CanonicalUrl,
        Operation::Host,
    ];

    /// The snake_case operation name.
    pub fn name(&self) -> &'static str {
        match self {
            Operation::Title => "title",
            Operation::Category => "category",
            Operation::TotalTime => "total_time",
            Operation::CookTime => "cook_time",
            Operation::PrepTime => "prep_time",
            Operation::Yields => "yields",
            Operation::Image => "image",
            Operation::Nutrients => "nutrients",
            Operation::Language => "language",
            Operation::Ingredients => "ingredients",
            Operation::Instructions => "instructions",
            Operation::InstructionsList => "instructions_list",
            Operation::Ratings => "ratings",
            Operation::Author => "author",
            Operation::Cuisine => "cuisine",
            Operation::Description => "description",
            Operation::Reviews => "reviews",
            Operation::Links => "links",
            Operation::SiteName => "site_name",
            Operation::CanonicalUrl => "canonical_url",
            Operation::Host => "host",
        }
    }

    /// Looks an operation up by its snake_case name.
    pub fn from_name(name: &str) -> Option<Operation> {
        Operation::ALL.into_iter().find(|op| op.name() == name)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A value produced by an operation handler.
///
/// Interceptors receive and return `Field`s so one handler type can carry
/// every operation; the typed accessors on `Recipe` convert back.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Field {
    Null,
    Text(String),
    Minutes(u32),
    Number(f64),
    List(Vec<String>),
    Map(Attributes),
    Records(Vec<Attributes>),
}

impl Field {
    /// Short name of the variant, used in type mismatch errors.
    pub fn kind(&self) -> &'static str {
        match self {
            Field::Null => "null",
            Field::Text(_) => "text",
            Field::Minutes(_) => "minutes",
            Field::Number(_) => "number",
            Field::List(_) => "list",
            Field::Map(_) => "map",
            Field::Records(_) => "records",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Field::Null)
    }

    /// True for null, empty text and empty collections.
    pub fn is_empty(&self) -> bool {
        match self {
            Field::Null => true,
            Field::Text(s) => s.trim().is_empty(),
            Field::List(v) => v.is_empty(),
            Field::Map(m) => m.is_empty(),
            Field::Records(r) => r.is_empty(),
            Field::Minutes(_) | Field::Number(_) => false,
        }
    }

    pub fn into_text(self, op: Operation) -> Result<String> {
        match self {
            Field::Text(s) => Ok(s),
            other => Err(ScrapeError::field_type(op, "text", other.kind())),
        }
    }

    pub fn into_opt_text(self, op: Operation) -> Result<Option<String>> {
        match self {
            Field::Text(s) => Ok(Some(s)),
            Field::Null => Ok(None),
            other => Err(ScrapeError::field_type(op, "text", other.kind())),
        }
    }

    pub fn into_minutes(self, op: Operation) -> Result<Option<u32>> {
        match self {
            Field::Minutes(m) => Ok(Some(m)),
            Field::Null => Ok(None),
            other => Err(ScrapeError::field_type(op, "minutes", other.kind())),
        }
    }

    pub fn into_number(self, op: Operation) -> Result<Option<f64>> {
        match self {
            Field::Number(n) => Ok(Some(n)),
            Field::Minutes(m) => Ok(Some(m as f64)),
            Field::Null => Ok(None),
            other => Err(ScrapeError::field_type(op, "number", other.kind())),
        }
    }

    pub fn into_list(self, op: Operation) -> Result<Vec<String>> {
        match self {
            Field::List(v) => Ok(v),
            other => Err(ScrapeError::field_type(op, "list", other.kind())),
        }
    }

    pub fn into_map(self, op: Operation) -> Result<Attributes> {
        match self {
            Field::Map(m) => Ok(m),
            other => Err(ScrapeError::field_type(op, "map", other.kind())),
        }
    }

    pub fn into_records(self, op: Operation) -> Result<Vec<Attributes>> {
        match self {
            Field::Records(r) => Ok(r),
            other => Err(ScrapeError::field_type(op, "records", other.kind())),
        }
    }
}

impl From<String> for Field {
    fn from(s: String) -> Self {
        Field::Text(s)
    }
}

impl From<Option<String>> for Field {
    fn from(s: Option<String>) -> Self {
        s.map_or(Field::Null, Field::Text)
    }
}

impl From<Option<u32>> for Field {
    fn from(m: Option<u32>) -> Self {
        m.map_or(Field::Null, Field::Minutes)
    }
}

impl From<Option<f64>> for Field {
    fn from(n: Option<f64>) -> Self {
        n.map_or(Field::Null, Field::Number)
    }
}

impl From<Vec<String>> for Field {
    fn from(v: Vec<String>) -> Self {
        Field::List(v)
    }
}

impl From<Attributes> for Field {
    fn from(m: Attributes) -> Self {
        Field::Map(m)
    }
}

impl From<Vec<Attributes>> for Field {
    fn from(r: Vec<Attributes>) -> Self {
        Field::Records(r)
    }
}
