use std::cell::Cell;
use std::io::Write;
use std::path::{Path, PathBuf};

use lol_html::errors::{RewritingError, SelectorError};
use lol_html::html_content::ContentType;
use lol_html::{element, rewrite_str, RewriteStrSettings, Selector};

/// Something the updater can write its text into.
pub trait OutputElement {
    fn set_text(&mut self, text: &str) -> Result<(), ElementError>;
}

#[derive(Debug, thiserror::Error)]
pub enum ElementError {
    #[error("page io failed for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid selector {selector:?}: {source}")]
    Selector {
        selector: String,
        #[source]
        source: SelectorError,
    },

    #[error("no element matching {selector:?} in page")]
    Missing { selector: String },

    #[error("failed to rewrite page: {0}")]
    Rewrite(#[from] RewritingError),

    #[error("stdout write failed: {0}")]
    Stdout(#[source] std::io::Error),
}

/// First element matching a CSS selector in an HTML page on disk.
#[derive(Debug)]
pub struct HtmlElement {
    path: PathBuf,
    selector: String,
}

impl HtmlElement {
    /// Returns `Ok(None)` when the page has no element matching `selector`.
    pub fn bind(path: impl AsRef<Path>, selector: &str) -> Result<Option<Self>, ElementError> {
        selector
            .parse::<Selector>()
            .map_err(|source| ElementError::Selector {
                selector: selector.to_string(),
                source,
            })?;

        let element = HtmlElement {
            path: path.as_ref().to_path_buf(),
            selector: selector.to_string(),
        };

        let html = element.read()?;
        let (_, matched) = rewrite_first(&html, &element.selector, None)?;
        if !matched {
            tracing::warn!(
                "no element matching {} in {}",
                element.selector,
                element.path.display()
            );
            return Ok(None);
        }

        Ok(Some(element))
    }

    fn read(&self) -> Result<String, ElementError> {
        std::fs::read_to_string(&self.path).map_err(|source| ElementError::Io {
            path: self.path.clone(),
            source,
        })
    }
}

impl OutputElement for HtmlElement {
    fn set_text(&mut self, text: &str) -> Result<(), ElementError> {
        let html = self.read()?;
        let (rewritten, matched) = rewrite_first(&html, &self.selector, Some(text))?;
        if !matched {
            // page changed under us since bind
            return Err(ElementError::Missing {
                selector: self.selector.clone(),
            });
        }

        std::fs::write(&self.path, rewritten).map_err(|source| ElementError::Io {
            path: self.path.clone(),
            source,
        })
    }
}

/// Replaces the inner content of the first match with `text` when given.
/// Returns the rewritten html and whether anything matched.
fn rewrite_first(
    html: &str,
    selector: &str,
    text: Option<&str>,
) -> Result<(String, bool), RewritingError> {
    let matched = Cell::new(false);

    let output = rewrite_str(
        html,
        RewriteStrSettings {
            element_content_handlers: vec![element!(selector, |el| {
                if !matched.get() {
                    matched.set(true);
                    if let Some(text) = text {
                        el.set_inner_content(text, ContentType::Text);
                    }
                }
                Ok(())
            })],
            ..RewriteStrSettings::default()
        },
    )?;

    Ok((output, matched.get()))
}

/// Writes each text as a line on standard output.
#[derive(Debug, Default)]
pub struct StdoutElement;

impl OutputElement for StdoutElement {
    fn set_text(&mut self, text: &str) -> Result<(), ElementError> {
        let mut stdout = std::io::stdout().lock();
        writeln!(stdout, "{}", text).map_err(ElementError::Stdout)
    }
}
