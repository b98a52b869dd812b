use chrono::NaiveDate;

use crate::config::CapsuleConfig;
use crate::gemtext::{self, LinkLine};
use crate::resolve::resolve_reference;
use crate::{IndexPage, PostLink};

/// Pulls dated post links and the pagination link out of one index page.
#[derive(Debug, Clone, Copy)]
pub struct LinkExtractor<'a> {
    base_url: &'a str,
    next_page_marker: &'a str,
    date_format: &'a str,
}

impl<'a> LinkExtractor<'a> {
    pub fn new(base_url: &'a str, next_page_marker: &'a str, date_format: &'a str) -> Self {
        Self {
            base_url,
            next_page_marker,
            date_format,
        }
    }

    pub fn from_config(config: &'a CapsuleConfig) -> Self {
        Self::new(
            &config.base_url,
            &config.next_page_marker,
            &config.date_format,
        )
    }

    /// Post links keep line order. If several lines carry the marker, the last one wins.
    pub fn parse(&self, page_text: &str) -> IndexPage {
        let mut page = IndexPage::default();
        for link in page_text.lines().filter_map(gemtext::parse_link) {
            if let Some(post) = self.post_link(link) {
                page.posts.push(post);
            }
            if link.label == Some(self.next_page_marker.trim()) {
                page.next_page = Some(resolve_reference(self.base_url, link.target));
            }
        }
        page
    }

    fn post_link(&self, link: LinkLine<'_>) -> Option<PostLink> {
        let label = link.label?;
        let (date_token, title) = match label.split_once(char::is_whitespace) {
            Some((date, title)) => (date, title.trim()),
            None => (label, ""),
        };
        let date = NaiveDate::parse_from_str(date_token, self.date_format).ok()?;
        Some(PostLink {
            url: resolve_reference(self.base_url, link.target),
            date,
            title: title.to_string(),
        })
    }
}
