// ABOUTME: schema.org Recipe reader over the JSON-LD blocks embedded in a page.
// ABOUTME: Walks arrays and @graph holders and exposes typed recipe fields.

//! Structured data reader.
//!
//! Finds the first JSON-LD object whose `@type` is `Recipe` and reads recipe
//! fields from it. Blocks that fail to parse are skipped.

use scraper::{Html, Selector};
use serde_json::{Map, Value};

use crate::extractors::operation::Attributes;
use crate::utils::{get_minutes, get_yields, normalize_string};

/// Typed view over a page's schema.org Recipe object.
#[derive(Debug, Clone, Default)]
pub struct SchemaOrg {
    data: Map<String, Value>,
}

impl SchemaOrg {
    /// Reads every `application/ld+json` script in the document.
    pub fn from_html(html: &Html) -> Self {
        let selector = match Selector::parse(r#"script[type="application/ld+json"]"#) {
            Ok(s) => s,
            Err(_) => return Self::default(),
        };

        for script in html.select(&selector) {
            let text = script.text().collect::<String>();
            let trimmed = text.trim();
            if trimmed.is_empty() {
                continue;
            }
            if let Ok(value) = serde_json::from_str::<Value>(trimmed) {
                if let Some(recipe) = find_recipe(&value) {
                    return Self {
                        data: recipe.clone(),
                    };
                }
            }
        }
        Self::default()
    }

    /// Builds a reader from an already-located Recipe object.
    pub fn from_value(value: &Value) -> Self {
        Self {
            data: find_recipe(value).cloned().unwrap_or_default(),
        }
    }

    /// True if a Recipe object was found.
    pub fn has_data(&self) -> bool {
        !self.data.is_empty()
    }

    pub fn title(&self) -> Option<String> {
        self.string("name")
    }

    pub fn author(&self) -> Option<String> {
        self.data.get("author").and_then(name_of).map(|s| normalize_string(&s))
    }

    pub fn category(&self) -> Option<String> {
        self.joined("recipeCategory")
    }

    pub fn cuisine(&self) -> Option<String> {
        self.joined("recipeCuisine")
    }

    pub fn description(&self) -> Option<String> {
        self.string("description")
    }

    pub fn language(&self) -> Option<String> {
        self.string("inLanguage")
    }

    pub fn site_name(&self) -> Option<String> {
        self.data.get("publisher").and_then(name_of)
    }

    pub fn image(&self) -> Option<String> {
        self.data.get("image").and_then(url_of)
    }

    pub fn ingredients(&self) -> Option<Vec<String>> {
        let value = self
            .data
            .get("recipeIngredient")
            .or_else(|| self.data.get("ingredients"))?;
        let items = match value {
            Value::Array(arr) => arr
                .iter()
                .filter_map(Value::as_str)
                .map(normalize_string)
                .filter(|s| !s.is_empty())
                .collect(),
            Value::String(s) => vec![normalize_string(s)],
            _ => return None,
        };
        Some(items)
    }

    /// Instructions, one step per line.
    pub fn instructions(&self) -> Option<String> {
        let value = self.data.get("recipeInstructions")?;
        let mut steps = Vec::new();
        collect_steps(value, &mut steps);
        if steps.is_empty() {
            None
        } else {
            Some(steps.join("\n"))
        }
    }

    pub fn total_time(&self) -> Option<u32> {
        self.minutes("totalTime").or_else(|| {
            match (self.prep_time(), self.cook_time()) {
                (None, None) => None,
                (prep, cook) => Some(prep.unwrap_or(0).saturating_add(cook.unwrap_or(0))),
            }
        })
    }

    pub fn cook_time(&self) -> Option<u32> {
        self.minutes("cookTime")
    }

    pub fn prep_time(&self) -> Option<u32> {
        self.minutes("prepTime")
    }

    pub fn yields(&self) -> Option<String> {
        let value = self.data.get("recipeYield")?;
        let text = match value {
            Value::Array(arr) => arr.iter().find_map(scalar_text)?,
            other => scalar_text(other)?,
        };
        get_yields(&text)
    }

    /// Aggregate rating value, rounded to two decimals.
    pub fn ratings(&self) -> Option<f64> {
        let rating = self.data.get("aggregateRating")?;
        let value = match rating {
            Value::Object(obj) => obj.get("ratingValue")?,
            other => other,
        };
        let n = match value {
            Value::Number(n) => n.as_f64()?,
            Value::String(s) => s.trim().parse::<f64>().ok()?,
            _ => return None,
        };
        Some((n * 100.0).round() / 100.0)
    }

    /// Nutrition facts keyed by schema.org property name.
    pub fn nutrients(&self) -> Option<Attributes> {
        let Value::Object(obj) = self.data.get("nutrition")? else {
            return None;
        };
        let map: Attributes = obj
            .iter()
            .filter(|(k, _)| !k.starts_with('@'))
            .filter_map(|(k, v)| scalar_text(v).map(|t| (k.clone(), normalize_string(&t))))
            .filter(|(_, v)| !v.is_empty())
            .collect();
        Some(map)
    }

    fn string(&self, key: &str) -> Option<String> {
        self.data
            .get(key)
            .and_then(scalar_text)
            .map(|s| normalize_string(&s))
            .filter(|s| !s.is_empty())
    }

    fn joined(&self, key: &str) -> Option<String> {
        match self.data.get(key)? {
            Value::Array(arr) => {
                let parts: Vec<String> = arr.iter().filter_map(scalar_text).collect();
                if parts.is_empty() {
                    None
                } else {
                    Some(parts.join(","))
                }
            }
            other => scalar_text(other),
        }
    }

    fn minutes(&self, key: &str) -> Option<u32> {
        self.data
            .get(key)
            .and_then(scalar_text)
            .and_then(|s| get_minutes(&s))
    }
}

fn find_recipe(value: &Value) -> Option<&Map<String, Value>> {
    match value {
        Value::Object(map) => {
            if map.get("@type").is_some_and(|t| matches_type(t, "Recipe")) {
                return Some(map);
            }
            for key in ["@graph", "mainEntity", "mainEntityOfPage"] {
                if let Some(found) = map.get(key).and_then(find_recipe) {
                    return Some(found);
                }
            }
            None
        }
        Value::Array(arr) => arr.iter().find_map(find_recipe),
        _ => None,
    }
}

fn matches_type(value: &Value, expected: &str) -> bool {
    match value {
        Value::String(s) => s.eq_ignore_ascii_case(expected),
        Value::Array(arr) => arr.iter().any(|v| matches_type(v, expected)),
        _ => false,
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn name_of(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Object(obj) => obj.get("name").and_then(scalar_text),
        Value::Array(arr) => arr.iter().find_map(name_of),
        _ => None,
    }
}

fn url_of(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Object(obj) => obj.get("url").and_then(scalar_text),
        Value::Array(arr) => arr.iter().find_map(url_of),
        _ => None,
    }
}

fn collect_steps(value: &Value, out: &mut Vec<String>) {
    match value {
        Value::String(s) => {
            for line in s.split('\n') {
                let line = normalize_string(line);
                if !line.is_empty() {
                    out.push(line);
                }
            }
        }
        Value::Array(arr) => {
            for v in arr {
                collect_steps(v, out);
            }
        }
        Value::Object(obj) => {
            if let Some(items) = obj.get("itemListElement") {
                collect_steps(items, out);
            } else if let Some(text) = obj.get("text").or_else(|| obj.get("name")) {
                collect_steps(text, out);
            }
        }
        _ => {}
    }
}
