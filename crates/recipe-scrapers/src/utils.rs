// ABOUTME: Text helpers shared by extractors and plugins: minutes, yields, string normalization.
// ABOUTME: Parses ISO-8601 and free-text durations and decodes common HTML entities.

use once_cell::sync::Lazy;
use regex::Regex;

static ISO_DURATION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^P(?:(\d+(?:\.\d+)?)D)?(?:T(?:(\d+(?:\.\d+)?)H)?(?:(\d+(?:\.\d+)?)M)?(?:(\d+(?:\.\d+)?)S)?)?$",
    )
    .expect("valid ISO duration regex")
});

static HOURS_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(\d+(?:[.,]\d+)?)\s*(?:hours?|hrs?|h)(?:[^a-z]|$)").expect("valid hours regex")
});

static MINUTES_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(\d+(?:[.,]\d+)?)\s*(?:minutes?|mins?|m)(?:[^a-z]|$)").expect("valid minutes regex")
});

static NUMBER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+").expect("valid number regex"));

static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").expect("valid tag regex"));

/// Words that make a yield count items instead of servings.
const ITEM_WORDS: &[&str] = &[
    "item", "piece", "cookie", "muffin", "cupcake", "bar", "roll", "biscuit", "loaf", "loaves",
    "slice", "sandwich", "pancake", "ball", "batch", "cake",
];

/// Parses a duration into whole minutes.
///
/// Accepts plain integers ("45"), ISO-8601 durations ("PT1H30M") and free
/// text ("1 hour 30 mins", "1.5 hrs"). Ranges such as "10-15 minutes" yield
/// the upper bound. Returns `None` when nothing looks like a duration.
pub fn get_minutes(text: &str) -> Option<u32> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    if let Ok(minutes) = text.parse::<u32>() {
        return Some(minutes);
    }

    if let Some(caps) = ISO_DURATION_RE.captures(text) {
        if caps.iter().skip(1).any(|c| c.is_some()) {
            let part = |i: usize| {
                caps.get(i)
                    .and_then(|m| m.as_str().parse::<f64>().ok())
                    .unwrap_or(0.0)
            };
            let total = part(1) * 1440.0 + part(2) * 60.0 + part(3) + part(4) / 60.0;
            return Some(total.round() as u32);
        }
    }

    let hours = HOURS_RE
        .captures_iter(text)
        .last()
        .and_then(|c| c[1].replace(',', ".").parse::<f64>().ok());
    let minutes = MINUTES_RE
        .captures_iter(text)
        .last()
        .and_then(|c| c[1].replace(',', ".").parse::<f64>().ok());

    if hours.is_none() && minutes.is_none() {
        return None;
    }
    let total = hours.unwrap_or(0.0) * 60.0 + minutes.unwrap_or(0.0);
    Some(total.round() as u32)
}

/// Normalizes a yield description to "N servings" or "N items".
///
/// Text without any number is returned trimmed and unchanged.
pub fn get_yields(text: &str) -> Option<String> {
    let text = normalize_string(text);
    if text.is_empty() {
        return None;
    }
    let lower = text.to_lowercase();

    if lower.contains("dozen") {
        let n = NUMBER_RE
            .find(&lower)
            .and_then(|m| m.as_str().parse::<u32>().ok())
            .unwrap_or(1);
        return Some(format!("{} items", n.saturating_mul(12)));
    }

    let Some(n) = NUMBER_RE
        .find(&lower)
        .and_then(|m| m.as_str().parse::<u32>().ok())
    else {
        return Some(text);
    };

    let is_items = ITEM_WORDS.iter().any(|w| lower.contains(w));
    let unit = match (is_items, n == 1) {
        (true, true) => "item",
        (true, false) => "items",
        (false, true) => "serving",
        (false, false) => "servings",
    };
    Some(format!("{} {}", n, unit))
}

/// Decodes entities, replaces non-breaking spaces and collapses whitespace.
pub fn normalize_string(s: &str) -> String {
    let decoded = decode_entities(s);
    decoded
        .replace('\u{a0}', " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Removes angle-bracketed tags, leaving text and line structure intact.
pub fn strip_tags(s: &str) -> String {
    TAG_RE.replace_all(s, "").into_owned()
}

/// Decodes common named HTML entities and numeric entities.
pub fn decode_entities(s: &str) -> String {
    if !s.contains('&') {
        return s.to_string();
    }

    let entities = [
        ("&lt;", "<"),
        ("&gt;", ">"),
        ("&quot;", "\""),
        ("&apos;", "'"),
        ("&nbsp;", "\u{a0}"),
        ("&ndash;", "\u{2013}"),
        ("&mdash;", "\u{2014}"),
        ("&lsquo;", "\u{2018}"),
        ("&rsquo;", "\u{2019}"),
        ("&ldquo;", "\u{201C}"),
        ("&rdquo;", "\u{201D}"),
        ("&hellip;", "\u{2026}"),
        ("&deg;", "\u{b0}"),
        ("&frac12;", "\u{bd}"),
        ("&frac14;", "\u{bc}"),
        ("&frac34;", "\u{be}"),
        ("&times;", "\u{d7}"),
    ];

    let mut result = s.to_string();
    for (entity, replacement) in &entities {
        result = result.replace(entity, replacement);
    }
    result = decode_numeric_entities(&result);
    // last, so "&amp;lt;" stays "&lt;"
    result.replace("&amp;", "&")
}

/// Decodes numeric entities like `&#189;` and `&#xBD;`.
fn decode_numeric_entities(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut rest = s;

    while let Some(start) = rest.find("&#") {
        result.push_str(&rest[..start]);
        let tail = &rest[start + 2..];
        let decoded = tail.find(';').and_then(|end| {
            let body = &tail[..end];
            let code = match body.strip_prefix(['x', 'X']) {
                Some(hex) => u32::from_str_radix(hex, 16).ok(),
                None => body.parse::<u32>().ok(),
            };
            code.and_then(char::from_u32).map(|c| (c, end))
        });
        match decoded {
            Some((c, end)) => {
                result.push(c);
                rest = &tail[end + 1..];
            }
            None => {
                result.push_str("&#");
                rest = tail;
            }
        }
    }
    result.push_str(rest);
    result
}
