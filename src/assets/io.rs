//! Shader source fetching.

#[cfg(feature = "http")]
use url::Url;

use crate::errors::Result;
#[cfg(feature = "http")]
use crate::errors::PrismError;

/// Completion of a text fetch. May run on another thread.
pub type FetchCallback = Box<dyn FnOnce(Result<String>) + Send + 'static>;

/// Fetches text resources by URL.
///
/// Implementations call `on_done` exactly once, with the body or with the
/// reason the fetch failed.
pub trait SourceFetcher: Send + Sync {
    fn fetch_text(&self, url: &str, on_done: FetchCallback);
}

/// HTTP fetcher over `ehttp`. Relative URLs are joined to the base URL.
#[cfg(feature = "http")]
#[derive(Debug, Clone, Default)]
pub struct HttpSourceFetcher {
    base_url: Option<Url>,
}

#[cfg(feature = "http")]
impl HttpSourceFetcher {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A fetcher resolving relative URLs against `base`. A base without a
    /// trailing slash is treated as a file and its last segment dropped.
    pub fn with_base_url(base: &str) -> Result<Self> {
        Ok(Self {
            base_url: Some(Url::parse(base)?),
        })
    }

    #[inline]
    #[must_use]
    pub fn base_url(&self) -> Option<&Url> {
        self.base_url.as_ref()
    }

    pub fn resolve(&self, url: &str) -> Result<Url> {
        match &self.base_url {
            Some(base) => Ok(base.join(url)?),
            None => Ok(Url::parse(url)?),
        }
    }
}

#[cfg(feature = "http")]
impl SourceFetcher for HttpSourceFetcher {
    fn fetch_text(&self, url: &str, on_done: FetchCallback) {
        let resolved = match self.resolve(url) {
            Ok(resolved) => resolved,
            Err(e) => {
                on_done(Err(e));
                return;
            }
        };

        log::debug!("Fetching {resolved}");
        let url = resolved.to_string();
        ehttp::fetch(ehttp::Request::get(&url), move |result| {
            let outcome = match result {
                Ok(response) if response.ok => match response.text() {
                    Some(text) => Ok(text.to_string()),
                    None => Err(PrismError::Fetch {
                        url,
                        message: "response body is not valid UTF-8".into(),
                    }),
                },
                Ok(response) => Err(PrismError::HttpResponse {
                    url,
                    status: response.status,
                }),
                Err(message) => Err(PrismError::Fetch { url, message }),
            };
            on_done(outcome);
        });
    }
}

#[cfg(all(test, feature = "http"))]
mod tests {
    use super::*;

    #[test]
    fn relative_urls_join_the_base() {
        let fetcher = HttpSourceFetcher::with_base_url("https://example.com/scenes/demo.html").expect("base");
        let url = fetcher.resolve("shaders/water.vs").expect("join");
        assert_eq!(url.as_str(), "https://example.com/scenes/shaders/water.vs");
    }

    #[test]
    fn relative_urls_need_a_base() {
        assert!(HttpSourceFetcher::new().resolve("water.vs").is_err());
    }
}
