// ABOUTME: Integration tests for the extraction lifecycle: content acquisition, parsing, table sharing.
// ABOUTME: Uses httpmock to observe network behavior and the Inspiralized fixture page.

use std::sync::Arc;

use futures::future::join_all;
use httpmock::prelude::*;
use pretty_assertions::assert_eq;
use recipe_scrapers::{Client, Inspiralized, LifecycleState, Options, Timeout};

const FIXTURE: &str = include_str!("fixtures/inspiralized.html");
const PAGE_URL: &str = "https://inspiralized.com/zucchini-pesto";

#[tokio::test]
async fn raw_html_never_touches_network() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET).path("/recipe");
        then.status(200).body("<html><h2>Fetched</h2></html>");
    });

    let client = Client::default();
    let recipe = client
        .create(
            Inspiralized,
            Some(&server.url("/recipe")),
            Options::new().html(FIXTURE),
        )
        .await
        .unwrap();

    mock.assert_hits(0);
    assert_eq!(recipe.title().unwrap(), "Spiralized Zucchini & Pesto Pasta");
    assert_eq!(recipe.url(), Some(server.url("/recipe").as_str()));
}

#[tokio::test]
async fn fetches_and_extracts_full_recipe() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET).path("/zucchini-pesto");
        then.status(200)
            .header("content-type", "text/html; charset=utf-8")
            .body(FIXTURE);
    });

    let client = Client::default();
    let url = server.url("/zucchini-pesto");
    let recipe = client
        .create(Inspiralized, Some(&url), Options::new())
        .await
        .unwrap();
    mock.assert();

    assert_eq!(recipe.state(), LifecycleState::Ready);
    assert!(recipe.fetch_error().is_none());
    assert_eq!(recipe.host().unwrap(), "inspiralized.com");
    assert_eq!(recipe.total_time().unwrap(), Some(20));
    assert_eq!(recipe.yields().unwrap(), "2 servings");
    assert_eq!(recipe.author().unwrap().as_deref(), Some("Ali Maffucci"));
    assert_eq!(
        recipe.ingredients().unwrap(),
        vec!["2 medium zucchini", "1/4 cup basil pesto", "1 tbsp pine nuts"]
    );
    assert_eq!(recipe.instructions_list().unwrap().len(), 3);
    assert_eq!(recipe.language().unwrap(), "en-US");
    assert_eq!(recipe.site_name().unwrap().as_deref(), Some("Inspiralized"));
    assert_eq!(
        recipe.canonical_url().unwrap(),
        Some(server.url("/spiralized-zucchini-pesto-pasta/"))
    );

    let hrefs: Vec<String> = recipe
        .links()
        .unwrap()
        .into_iter()
        .map(|a| a["href"].clone())
        .collect();
    assert_eq!(hrefs, vec!["/", "/category/dinner/"]);
}

#[tokio::test]
async fn default_plugins_fill_gaps() {
    let client = Client::default();
    let recipe = client
        .scrape_html(FIXTURE, PAGE_URL, Options::new())
        .await
        .unwrap();

    // not implemented by the site extractor, answered by structured data
    assert_eq!(recipe.cook_time().unwrap(), Some(5));
    assert_eq!(recipe.prep_time().unwrap(), Some(15));
    assert_eq!(recipe.cuisine().unwrap(), "Italian");
    assert_eq!(recipe.category().unwrap(), "Dinner,Vegetarian");
    assert_eq!(recipe.ratings().unwrap(), Some(4.8));
    // og:image
    assert_eq!(
        recipe.image().unwrap().as_deref(),
        Some("https://inspiralized.com/wp-content/uploads/zucchini-pesto.jpg")
    );
    assert!(recipe.description().unwrap_err().is_not_implemented());
}

#[tokio::test]
async fn failed_fetch_degrades_instead_of_failing() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET).path("/gone");
        then.status(404).body("not found");
    });

    let client = Client::default();
    let url = server.url("/gone");
    let recipe = client
        .create(Inspiralized, Some(&url), Options::new())
        .await
        .expect("fetch errors are not fatal");
    mock.assert();

    assert!(recipe.is_degraded());
    assert!(recipe.fetch_error().unwrap().is_fetch());
    assert_eq!(recipe.state(), LifecycleState::Ready);
    assert!(recipe.title().unwrap_err().is_lookup());
    assert_eq!(recipe.canonical_url().unwrap(), Some(url));
    assert_eq!(recipe.ingredients().unwrap(), Vec::<String>::new());
}

#[tokio::test]
async fn redirect_target_becomes_resolved_url() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/old");
        then.status(302).header("location", server.url("/new"));
    });
    server.mock(|when, then| {
        when.method(GET).path("/new");
        then.status(200).body("<html><body><h2>Moved</h2></body></html>");
    });

    let client = Client::default();
    let recipe = client
        .create(Inspiralized, Some(&server.url("/old")), Options::new())
        .await
        .unwrap();
    assert_eq!(recipe.url(), Some(server.url("/new").as_str()));
    assert_eq!(recipe.canonical_url().unwrap(), Some(server.url("/new")));
    assert_eq!(recipe.title().unwrap(), "Moved");
}

#[tokio::test]
async fn missing_url_and_content_is_rejected() {
    let client = Client::default();
    let err = client
        .create(Inspiralized, None, Options::new())
        .await
        .unwrap_err();
    assert!(err.is_invalid_target());
}

#[tokio::test]
async fn request_timeout_degrades() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/slow");
        then.status(200)
            .delay(std::time::Duration::from_millis(500))
            .body(FIXTURE);
    });

    let client = Client::default();
    let options = Options::new().timeout(Timeout::Total(std::time::Duration::from_millis(50)));
    let recipe = client
        .create(Inspiralized, Some(&server.url("/slow")), options)
        .await
        .unwrap();
    assert!(recipe.fetch_error().unwrap().is_fetch());
}

#[tokio::test]
async fn many_instances_share_one_table() {
    let client = Client::default();
    let scrapes = (0..25).map(|i| {
        let url = format!("https://inspiralized.com/recipe-{}", i);
        let client = &client;
        async move { client.scrape_html(FIXTURE, &url, Options::new()).await }
    });
    let recipes: Vec<_> = join_all(scrapes)
        .await
        .into_iter()
        .map(Result::unwrap)
        .collect();

    assert_eq!(client.tables().len(), 1);
    let first = recipes[0].table();
    assert!(recipes.iter().all(|r| Arc::ptr_eq(r.table(), first)));
}

#[tokio::test]
async fn tables_compose_once_across_threads() {
    let client = Arc::new(Client::default());
    let handles: Vec<_> = (0..8)
        .map(|i| {
            let client = Arc::clone(&client);
            tokio::spawn(async move {
                let url = format!("https://inspiralized.com/t-{}", i);
                // Recipe holds a parsed DOM and stays on this task
                let title = client
                    .scrape_html(FIXTURE, &url, Options::new())
                    .await
                    .map(|r| r.title());
                matches!(title, Ok(Ok(_)))
            })
        })
        .collect();

    for handle in handles {
        assert!(handle.await.unwrap());
    }
    assert_eq!(client.tables().len(), 1);
}
