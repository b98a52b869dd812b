use capsule_core::{
    append_source_footer, render_gemtext, strip_envelope, CapsuleConfig, PostLink, RenderedPost,
};
use capsule_logging::{capsule_info, capsule_warn};

use crate::client::Fetcher;
use crate::{FailureKind, FetchError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedPost {
    pub link: PostLink,
    pub reason: FetchError,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AssemblyReport {
    pub rendered: Vec<RenderedPost>,
    pub skipped: Vec<SkippedPost>,
}

/// Fetches and renders posts one after another in crawl order.
pub struct PostAssembler<'a, F: Fetcher + ?Sized> {
    fetcher: &'a F,
    config: &'a CapsuleConfig,
}

impl<'a, F: Fetcher + ?Sized> PostAssembler<'a, F> {
    pub fn new(fetcher: &'a F, config: &'a CapsuleConfig) -> Self {
        Self { fetcher, config }
    }

    /// A post that cannot be fetched or decoded is skipped and reported.
    pub async fn assemble(&self, posts: &[PostLink]) -> AssemblyReport {
        let mut report = AssemblyReport::default();
        for (index, link) in posts.iter().enumerate() {
            capsule_info!("post {}/{}: {}", index + 1, posts.len(), link.url);
            match self.assemble_one(link).await {
                Ok(post) => report.rendered.push(post),
                Err(reason) => {
                    capsule_warn!("skipping {}: {reason}", link.url);
                    report.skipped.push(SkippedPost {
                        link: link.clone(),
                        reason,
                    });
                }
            }
        }
        report
    }

    pub async fn assemble_one(&self, link: &PostLink) -> Result<RenderedPost, FetchError> {
        let output = self.fetcher.fetch(&link.url).await?;
        let body = output.text.ok_or_else(|| {
            FetchError::new(FailureKind::NoTextBody, output.metadata.mime.clone())
        })?;

        let content = strip_envelope(&body.text, &self.config.envelope);
        // Relative links follow the document's location after redirects.
        let html = render_gemtext(&content, &output.metadata.final_url);
        Ok(RenderedPost::new(link, append_source_footer(&html, &link.url)))
    }
}
