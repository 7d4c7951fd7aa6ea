// ABOUTME: CLI binary for the recipe scraper.
// ABOUTME: Scrapes URLs or a local HTML file and prints the extracted recipes as JSON.

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use futures::future::join_all;
use recipe_scrapers::{ClientBuilder, Options, Recipe, RecipeData, ScrapeError, Timeout};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "recipe-scrape")]
#[command(about = "Extract structured recipe data from recipe pages")]
struct Args {
    /// Output file path (default: stdout)
    #[arg(short = 'o', long = "output")]
    output: Option<PathBuf>,

    /// HTML file to scrape (requires --url)
    #[arg(long = "html")]
    html: Option<PathBuf>,

    /// URL of the page the HTML file was saved from (required with --html)
    #[arg(long = "url")]
    url: Option<String>,

    /// Fall back to schema.org data for sites without a dedicated extractor
    #[arg(long = "wild-mode")]
    wild_mode: bool,

    /// Request timeout in seconds
    #[arg(long = "timeout")]
    timeout: Option<f64>,

    /// Proxy URL used for every scheme
    #[arg(long = "proxy")]
    proxy: Option<String>,

    /// Return default values instead of failing on unextractable fields
    #[arg(long = "suppress-exceptions")]
    suppress_exceptions: bool,

    /// URLs to scrape (fetch mode)
    #[arg()]
    urls: Vec<String>,
}

impl Args {
    fn options(&self) -> Result<Options, String> {
        let mut options = Options::new().wild_mode(self.wild_mode);
        if let Some(secs) = self.timeout {
            if !secs.is_finite() || secs <= 0.0 {
                return Err(format!("invalid --timeout {}", secs));
            }
            options = options.timeout(Timeout::Total(Duration::from_secs_f64(secs)));
        }
        if let Some(proxy) = &self.proxy {
            options = options.proxy("all", proxy.as_str());
        }
        Ok(options)
    }
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Turns a lifecycle result into data, treating a degraded fetch as a failure.
fn into_data(result: Result<Recipe, ScrapeError>) -> Result<RecipeData, ScrapeError> {
    let recipe = result?;
    if let Some(err) = recipe.fetch_error() {
        return Err(ScrapeError::fetch(
            err.url.clone(),
            err.op.clone(),
            Some(anyhow::anyhow!("{}", err)),
        ));
    }
    Ok(recipe.to_data())
}

fn format_output(results: &[RecipeData]) -> serde_json::Result<String> {
    if results.len() == 1 {
        serde_json::to_string_pretty(&results[0])
    } else {
        serde_json::to_string_pretty(results)
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();
    let args = Args::parse();

    if args.html.is_some() && args.url.is_none() {
        eprintln!("error: --url is required when using --html");
        return ExitCode::from(1);
    }

    if args.html.is_none() && args.urls.is_empty() {
        eprintln!("error: at least one URL is required, or use --html with --url");
        return ExitCode::from(1);
    }

    if args.html.is_some() && !args.urls.is_empty() {
        eprintln!("error: cannot use both --html and positional URLs");
        return ExitCode::from(1);
    }

    let options = match args.options() {
        Ok(options) => options,
        Err(msg) => {
            eprintln!("error: {}", msg);
            return ExitCode::from(1);
        }
    };

    let mut builder = ClientBuilder::from_env();
    if args.suppress_exceptions {
        builder = builder.suppress_exceptions(true);
    }
    let client = builder.build();

    let mut results: Vec<RecipeData> = Vec::new();
    let mut had_error = false;

    if let (Some(html_path), Some(url)) = (&args.html, &args.url) {
        match fs::read_to_string(html_path) {
            Ok(html) => match into_data(client.scrape_html(&html, url, options).await) {
                Ok(data) => results.push(data),
                Err(e) => {
                    eprintln!("error scraping {}: {}", url, e);
                    had_error = true;
                }
            },
            Err(e) => {
                eprintln!("error reading file {:?}: {}", html_path, e);
                had_error = true;
            }
        }
    } else {
        let scrapes = args
            .urls
            .iter()
            .map(|url| client.scrape(url, options.clone()));
        for (url, result) in args.urls.iter().zip(join_all(scrapes).await) {
            match into_data(result) {
                Ok(data) => results.push(data),
                Err(e) => {
                    eprintln!("error scraping {}: {}", url, e);
                    had_error = true;
                }
            }
        }
    }

    if !results.is_empty() {
        match format_output(&results) {
            Ok(output) => {
                if let Some(output_path) = &args.output {
                    if let Err(e) = fs::write(output_path, &output) {
                        eprintln!("error writing to {:?}: {}", output_path, e);
                        had_error = true;
                    }
                } else {
                    println!("{}", output);
                }
            }
            Err(e) => {
                eprintln!("error serializing output: {}", e);
                had_error = true;
            }
        }
    }

    if had_error {
        ExitCode::from(1)
    } else {
        ExitCode::SUCCESS
    }
}
