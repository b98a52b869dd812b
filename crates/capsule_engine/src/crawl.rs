use std::collections::HashSet;

use capsule_core::{resolve_reference, CapsuleConfig, IndexPage, LinkExtractor, PostLink};
use capsule_logging::{capsule_debug, capsule_error, capsule_info, capsule_warn};

use crate::client::Fetcher;
use crate::FetchError;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CrawlError {
    #[error("index page {url} failed: {source}")]
    Fetch { url: String, source: FetchError },
    #[error("index page {url} has no textual body")]
    NoTextBody { url: String },
}

/// Walks the chain of index pages starting at the configured base URL.
pub struct CapsuleCrawler<'a, F: Fetcher + ?Sized> {
    fetcher: &'a F,
    config: &'a CapsuleConfig,
}

impl<'a, F: Fetcher + ?Sized> CapsuleCrawler<'a, F> {
    pub fn new(fetcher: &'a F, config: &'a CapsuleConfig) -> Self {
        Self { fetcher, config }
    }

    /// Every post link across the chain, page order then line order.
    ///
    /// A failure on any index page fails the whole crawl; no partial list is
    /// returned. A page already visited ends the chain.
    pub async fn crawl(&self) -> Result<Vec<PostLink>, CrawlError> {
        let extractor = LinkExtractor::from_config(self.config);
        let mut visited = HashSet::new();
        let mut pages = Vec::new();
        let mut next = Some(self.config.base_url.clone());

        while let Some(url) = next.take() {
            if !visited.insert(url.clone()) {
                capsule_warn!("index page {url} already visited, stopping");
                break;
            }
            capsule_info!("reading index page {url}");
            let text = self.fetch_page(&url).await?;
            let page = extractor.parse(&text);
            capsule_debug!(
                "index page {url}: {} posts, next page {:?}",
                page.posts.len(),
                page.next_page
            );
            next = page
                .next_page
                .as_deref()
                .map(|target| resolve_reference(&self.config.base_url, target));
            pages.push(page);
        }

        let posts = collect_chain(pages);
        capsule_info!("found {} posts", posts.len());
        Ok(posts)
    }

    async fn fetch_page(&self, url: &str) -> Result<String, CrawlError> {
        match self.fetcher.fetch(url).await {
            Ok(output) => match output.text {
                Some(body) => Ok(body.text),
                None => {
                    capsule_error!("index page {url} is {}, not text", output.metadata.mime);
                    Err(CrawlError::NoTextBody {
                        url: url.to_string(),
                    })
                }
            },
            Err(source) => {
                capsule_error!("index page {url} failed: {source}");
                Err(CrawlError::Fetch {
                    url: url.to_string(),
                    source,
                })
            }
        }
    }
}

/// Concatenate parsed pages in visiting order.
pub fn collect_chain(pages: impl IntoIterator<Item = IndexPage>) -> Vec<PostLink> {
    pages.into_iter().flat_map(|page| page.posts).collect()
}
