// ABOUTME: Integration tests for plugin composition through the public Client API.
// ABOUTME: Covers scoping, chain order, instructions_list consistency, suppression and compose-once.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use pretty_assertions::assert_eq;
use recipe_scrapers::plugins::{handler, TracingPlugin};
use recipe_scrapers::{
    Client, Context, Field, FnPlugin, Handler, Inspiralized, Operation, Options, Plugin, Result,
    Scraper,
};

const FIXTURE: &str = include_str!("fixtures/inspiralized.html");

struct XCom;

impl Scraper for XCom {
    fn host(&self) -> &str {
        "x.com"
    }

    fn title(&self, _ctx: &Context<'_>) -> Result<String> {
        Ok("Soup".to_string())
    }

    fn author(&self, _ctx: &Context<'_>) -> Result<Option<String>> {
        Ok(Some("Chef".to_string()))
    }

    fn instructions(&self, _ctx: &Context<'_>) -> Result<String> {
        Ok("boil water\nadd pasta".to_string())
    }
}

struct YCom;

impl Scraper for YCom {
    fn host(&self) -> &str {
        "y.com"
    }

    fn title(&self, _ctx: &Context<'_>) -> Result<String> {
        Ok("Stew".to_string())
    }
}

fn shout() -> FnPlugin {
    FnPlugin::new(
        "shout",
        |host, op| host == "x.com" && op == Operation::Title,
        |_op, next| {
            handler(move |ctx| match next(ctx)? {
                Field::Text(t) => Ok(Field::Text(t.to_uppercase())),
                other => Ok(other),
            })
        },
    )
}

fn suffix(name: &'static str) -> FnPlugin {
    FnPlugin::new(
        name,
        |_, op| op == Operation::Title,
        move |_op, next| {
            handler(move |ctx| match next(ctx)? {
                Field::Text(t) => Ok(Field::Text(format!("{}[{}]", t, name))),
                other => Ok(other),
            })
        },
    )
}

async fn recipe_for<S: Scraper + 'static>(
    client: &Client,
    scraper: S,
    url: &str,
) -> recipe_scrapers::Recipe {
    client
        .create(scraper, Some(url), Options::new().html("<html><body></body></html>"))
        .await
        .unwrap()
}

#[tokio::test]
async fn plugin_applies_only_where_predicate_matches() {
    let client = Client::builder().plugin(shout()).build();

    let x = recipe_for(&client, XCom, "https://x.com/soup").await;
    assert_eq!(x.title().unwrap(), "SOUP");
    assert_eq!(x.author().unwrap().as_deref(), Some("Chef"));
    assert_eq!(x.plugins_for(Operation::Title).to_vec(), vec!["shout".to_string()]);
    assert!(x.plugins_for(Operation::Author).is_empty());

    let y = recipe_for(&client, YCom, "https://y.com/stew").await;
    assert_eq!(y.title().unwrap(), "Stew");
    assert!(y.plugins_for(Operation::Title).is_empty());
}

#[tokio::test]
async fn first_configured_plugin_is_outermost() {
    let client = Client::builder()
        .plugins(vec![Arc::new(suffix("outer")), Arc::new(suffix("inner"))])
        .build();
    let r = recipe_for(&client, XCom, "https://x.com/soup").await;

    assert_eq!(r.title().unwrap(), "Soup[inner][outer]");
    assert_eq!(
        r.plugins_for(Operation::Title).to_vec(),
        vec!["outer".to_string(), "inner".to_string()]
    );
}

#[tokio::test]
async fn instructions_list_sees_wrapped_instructions() {
    let upper = FnPlugin::new(
        "upper-instructions",
        |_, op| op == Operation::Instructions,
        |_op, next| {
            handler(move |ctx| match next(ctx)? {
                Field::Text(t) => Ok(Field::Text(t.to_uppercase())),
                other => Ok(other),
            })
        },
    );
    let client = Client::builder().plugin(upper).build();
    let r = recipe_for(&client, XCom, "https://x.com/soup").await;

    assert_eq!(r.instructions().unwrap(), "BOIL WATER\nADD PASTA");
    assert_eq!(r.instructions_list().unwrap(), vec!["BOIL WATER", "ADD PASTA"]);
}

#[tokio::test]
async fn default_plugins_clean_site_output() {
    let client = Client::default();
    let r = client
        .scrape_html(FIXTURE, "https://inspiralized.com/zucchini-pesto", Options::new())
        .await
        .unwrap();

    assert_eq!(r.title().unwrap(), "Spiralized Zucchini & Pesto Pasta");
    assert_eq!(
        r.plugins_for(Operation::Title).to_vec(),
        vec![
            "html_tag_stripper".to_string(),
            "normalize_string".to_string(),
            "schemaorg_fill".to_string()
        ]
    );
    assert_eq!(
        r.plugins_for(Operation::Image).to_vec(),
        vec!["opengraph_image_fetch".to_string(), "schemaorg_fill".to_string()]
    );
}

#[tokio::test]
async fn suppressed_errors_return_defaults() {
    let client = Client::builder()
        .suppress_exceptions(true)
        .exception_default(Operation::Yields, Field::Text("1 serving".to_string()))
        .build();
    let r = client
        .create(
            Inspiralized,
            Some("https://inspiralized.com/empty"),
            Options::new().html("<html><body></body></html>"),
        )
        .await
        .unwrap();

    assert_eq!(r.title().unwrap(), "");
    assert_eq!(r.yields().unwrap(), "1 serving");
    assert_eq!(r.description().unwrap(), "");
    assert_eq!(r.language().unwrap(), "en");
    assert_eq!(r.ratings().unwrap(), None);
    assert!(r.nutrients().unwrap().is_empty());
    assert_eq!(r.plugins_for(Operation::Title)[0], "exception_handling");
}

#[tokio::test]
async fn without_suppression_errors_propagate() {
    let client = Client::default();
    let r = client
        .create(
            Inspiralized,
            Some("https://inspiralized.com/empty"),
            Options::new().html("<html><body></body></html>"),
        )
        .await
        .unwrap();

    assert!(r.title().unwrap_err().is_lookup());
    assert!(r.yields().unwrap_err().is_lookup());
    assert!(r.nutrients().unwrap_err().is_not_implemented());
}

#[tokio::test]
async fn tracing_plugin_leaves_results_unchanged() {
    let mut plugins = recipe_scrapers::default_plugins();
    plugins.insert(0, Arc::new(TracingPlugin::default()));
    let client = Client::builder().plugins(plugins).build();
    let r = client
        .scrape_html(FIXTURE, "https://inspiralized.com/zucchini-pesto", Options::new())
        .await
        .unwrap();

    assert_eq!(r.title().unwrap(), "Spiralized Zucchini & Pesto Pasta");
    assert_eq!(r.cook_time().unwrap(), Some(5));
    assert_eq!(r.plugins_for(Operation::Host)[0], "tracing");
}

struct CountingPlugin {
    wraps: Arc<AtomicUsize>,
}

impl Plugin for CountingPlugin {
    fn name(&self) -> &str {
        "counting"
    }

    fn should_run(&self, _host: &str, op: Operation) -> bool {
        op == Operation::Title
    }

    fn wrap(&self, _op: Operation, next: Handler) -> Handler {
        self.wraps.fetch_add(1, Ordering::SeqCst);
        next
    }
}

#[tokio::test]
async fn wrapping_happens_once_per_extractor_type() {
    let wraps = Arc::new(AtomicUsize::new(0));
    let client = Client::builder()
        .plugin(CountingPlugin {
            wraps: Arc::clone(&wraps),
        })
        .build();

    for i in 0..10 {
        let r = recipe_for(&client, XCom, &format!("https://x.com/{}", i)).await;
        assert_eq!(r.title().unwrap(), "Soup");
    }
    assert_eq!(wraps.load(Ordering::SeqCst), 1);

    recipe_for(&client, YCom, "https://y.com/stew").await;
    assert_eq!(wraps.load(Ordering::SeqCst), 2);
    assert_eq!(client.tables().len(), 2);
}
