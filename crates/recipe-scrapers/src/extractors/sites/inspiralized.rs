// ABOUTME: Extractor for inspiralized.com recipe pages.
// ABOUTME: Reads the microdata spans and ingredient/instruction list items the site renders.

use crate::document::element_text;
use crate::error::Result;
use crate::extractors::operation::Operation;
use crate::extractors::{Context, Scraper};
use crate::utils::{get_minutes, get_yields, normalize_string};

const AUTHOR: &str = "Ali Maffucci";

#[derive(Debug, Clone, Copy, Default)]
pub struct Inspiralized;

impl Scraper for Inspiralized {
    fn host(&self) -> &str {
        "inspiralized.com"
    }

    fn title(&self, ctx: &Context<'_>) -> Result<String> {
        ctx.text("h2")
            .ok_or_else(|| ctx.missing(Operation::Title, "h2"))
    }

    fn author(&self, ctx: &Context<'_>) -> Result<Option<String>> {
        Ok(ctx.has_text_node(AUTHOR).then(|| AUTHOR.to_string()))
    }

    fn total_time(&self, ctx: &Context<'_>) -> Result<Option<u32>> {
        Ok(ctx
            .text(r#"span[itemprop="totalTime"]"#)
            .and_then(|t| get_minutes(&t)))
    }

    fn yields(&self, ctx: &Context<'_>) -> Result<String> {
        ctx.text(r#"span[itemprop="servingSize"]"#)
            .and_then(|t| get_yields(&t))
            .ok_or_else(|| ctx.missing(Operation::Yields, "servingSize"))
    }

    fn ingredients(&self, ctx: &Context<'_>) -> Result<Vec<String>> {
        Ok(ctx
            .find_all("li.ingredient")
            .iter()
            .map(|li| normalize_string(&element_text(li)))
            .collect())
    }

    fn instructions(&self, ctx: &Context<'_>) -> Result<String> {
        let steps: Vec<String> = ctx
            .find_all("li.instruction")
            .iter()
            .map(|li| normalize_string(&element_text(li)))
            .collect();
        Ok(steps.join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Page;
    use crate::extractors::operation::Field;
    use crate::plugins::compose::OperationTable;
    use pretty_assertions::assert_eq;

    const PAGE: &str = r#"<html lang="en"><head>
        <meta property="og:site_name" content="Inspiralized">
        <link rel="canonical" href="/spiralized-zucchini-pesto/">
        </head><body>
        <h2>Spiralized Zucchini Pesto</h2>
        <p class="byline"><a>Ali Maffucci</a></p>
        <span itemprop="totalTime">25 mins</span>
        <span itemprop="servingSize">2</span>
        <ul>
            <li class="ingredient">2 medium  zucchini</li>
            <li class="ingredient">1/4 cup&nbsp;pesto</li>
        </ul>
        <ol>
            <li class="instruction">Spiralize the zucchini.</li>
            <li class="instruction">Toss with <b>pesto</b>.</li>
        </ol>
        </body></html>"#;

    fn call(html: &str, op: Operation) -> Result<Field> {
        let page = Page::parse(
            html,
            Some("https://inspiralized.com/spiralized-zucchini-pesto".to_string()),
            false,
        );
        let table = OperationTable::compose(&Inspiralized, &[]);
        Context::new(&Inspiralized, &page, &table).call(op)
    }

    #[test]
    fn extracts_site_fields() {
        assert_eq!(
            call(PAGE, Operation::Title).unwrap(),
            Field::Text("Spiralized Zucchini Pesto".to_string())
        );
        assert_eq!(
            call(PAGE, Operation::Author).unwrap(),
            Field::Text("Ali Maffucci".to_string())
        );
        assert_eq!(call(PAGE, Operation::TotalTime).unwrap(), Field::Minutes(25));
        assert_eq!(
            call(PAGE, Operation::Yields).unwrap(),
            Field::Text("2 servings".to_string())
        );
        assert_eq!(
            call(PAGE, Operation::Ingredients).unwrap(),
            Field::List(vec![
                "2 medium zucchini".to_string(),
                "1/4 cup pesto".to_string()
            ])
        );
        assert_eq!(
            call(PAGE, Operation::InstructionsList).unwrap(),
            Field::List(vec![
                "Spiralize the zucchini.".to_string(),
                "Toss with pesto.".to_string()
            ])
        );
    }

    #[test]
    fn inherits_base_defaults() {
        assert_eq!(
            call(PAGE, Operation::Language).unwrap(),
            Field::Text("en".to_string())
        );
        assert_eq!(
            call(PAGE, Operation::SiteName).unwrap(),
            Field::Text("Inspiralized".to_string())
        );
        assert_eq!(
            call(PAGE, Operation::CanonicalUrl).unwrap(),
            Field::Text("https://inspiralized.com/spiralized-zucchini-pesto/".to_string())
        );
        assert_eq!(
            call(PAGE, Operation::Host).unwrap(),
            Field::Text("inspiralized.com".to_string())
        );
        assert!(call(PAGE, Operation::Cuisine)
            .unwrap_err()
            .is_not_implemented());
    }

    #[test]
    fn missing_elements() {
        let empty = "<html><body></body></html>";
        assert!(call(empty, Operation::Title).unwrap_err().is_lookup());
        assert!(call(empty, Operation::Yields).unwrap_err().is_lookup());
        assert_eq!(call(empty, Operation::Author).unwrap(), Field::Null);
        assert_eq!(call(empty, Operation::TotalTime).unwrap(), Field::Null);
        assert_eq!(call(empty, Operation::Ingredients).unwrap(), Field::List(vec![]));
    }

    #[test]
    fn author_needs_the_whole_text_node() {
        let mention = "<html><body><p>Not by Ali Maffucci, sadly.</p></body></html>";
        assert_eq!(call(mention, Operation::Author).unwrap(), Field::Null);

        let byline = "<html><body><p>By <span> Ali Maffucci </span></p></body></html>";
        assert_eq!(
            call(byline, Operation::Author).unwrap(),
            Field::Text("Ali Maffucci".to_string())
        );
    }
}
