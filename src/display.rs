use super::element::{ElementError, OutputElement};
use super::fetcher::{CountFetcher, FetchError, VisitorCount};

pub const DEFAULT_LABEL: &str = "Visitor Count";

/// Any failure between sending the request and writing the element.
#[derive(Debug, thiserror::Error)]
pub enum UpdateError {
    #[error("failed to fetch visitor count: {0}")]
    Fetch(#[from] FetchError),

    #[error("failed to render visitor count: {0}")]
    Render(#[from] ElementError),
}

#[derive(Debug, Clone, PartialEq)]
pub enum UpdateOutcome {
    Displayed(VisitorCount),
    Fallback,
    NoElement,
}

pub struct DisplayUpdater<F: CountFetcher> {
    fetcher: F,
    label: String,
}

impl<F: CountFetcher> DisplayUpdater<F> {
    pub fn new(fetcher: F) -> Self {
        DisplayUpdater {
            fetcher,
            label: DEFAULT_LABEL.to_string(),
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn render(&self, count: &VisitorCount) -> String {
        format!("{}: {}", self.label, count)
    }

    pub fn placeholder(&self) -> String {
        format!("{}: --", self.label)
    }

    /// Fetches the count once and writes it into `element`, or the
    /// placeholder if anything fails. Without an element nothing is fetched.
    pub async fn update<E: OutputElement>(&self, element: Option<&mut E>) -> UpdateOutcome {
        let Some(element) = element else {
            tracing::error!("no output element bound, skipping visitor count update");
            return UpdateOutcome::NoElement;
        };

        match self.try_update(element).await {
            Ok(count) => {
                tracing::info!("displayed visitor count: {}", count);
                UpdateOutcome::Displayed(count)
            }
            Err(e) => {
                tracing::error!("visitor count update failed, reason: {}", e);
                if let Err(e) = element.set_text(&self.placeholder()) {
                    tracing::error!("failed to write placeholder, reason: {}", e);
                }
                UpdateOutcome::Fallback
            }
        }
    }

    async fn try_update<E: OutputElement>(
        &self,
        element: &mut E,
    ) -> Result<VisitorCount, UpdateError> {
        let count = self.fetcher.fetch_count().await?;
        element.set_text(&self.render(&count))?;
        Ok(count)
    }
}
