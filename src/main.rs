mod config;
mod display;
mod element;
mod fetcher;

use config::Config;
use display::{DisplayUpdater, UpdateOutcome};
use dotenv::dotenv;
use element::{HtmlElement, StdoutElement};
use fetcher::HttpCountFetcher;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let is_production = std::env::var("PRODUCTION").is_ok();
    match is_production {
        // local env
        false => {
            dotenv().ok();

            tracing::subscriber::set_global_default(
                tracing_subscriber::fmt()
                    .pretty()
                    .with_writer(std::io::stderr)
                    .with_env_filter(EnvFilter::from_default_env())
                    .finish(),
            )?;
        }
        // production env
        true => {
            tracing::subscriber::set_global_default(
                tracing_subscriber::fmt()
                    .json()
                    .with_writer(std::io::stderr)
                    .with_env_filter(EnvFilter::from_default_env())
                    .with_target(false)
                    .finish(),
            )?;
        }
    }

    let config = Config::from_env()?;
    tracing::debug!("loaded config: {:?}", config);

    let fetcher = HttpCountFetcher::new(config.endpoint.as_str(), config.timeout)?;
    let updater = DisplayUpdater::new(fetcher).with_label(config.label.as_str());

    let outcome = match &config.page {
        Some(page) => {
            let mut element = HtmlElement::bind(page, &config.selector)?;
            updater.update(element.as_mut()).await
        }
        None => updater.update(Some(&mut StdoutElement)).await,
    };

    // failures are already rendered as the placeholder, never fatal
    match outcome {
        UpdateOutcome::Displayed(count) => tracing::debug!("update complete, count: {}", count),
        UpdateOutcome::Fallback => tracing::warn!("update complete, placeholder shown"),
        UpdateOutcome::NoElement => tracing::warn!("page left untouched"),
    }

    Ok(())
}
