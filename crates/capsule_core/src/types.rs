use chrono::NaiveDate;

/// A dated post discovered on an index page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostLink {
    pub url: String,
    pub date: NaiveDate,
    pub title: String,
}

impl PostLink {
    /// Date in the fixed `YYYY-MM-DD` form used in output.
    pub fn date_label(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }
}

/// Links and pagination found on a single index page.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct IndexPage {
    pub posts: Vec<PostLink>,
    pub next_page: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedPost {
    pub url: String,
    pub date: NaiveDate,
    pub title: String,
    pub html_body: String,
}

impl RenderedPost {
    pub fn new(link: &PostLink, html_body: String) -> Self {
        Self {
            url: link.url.clone(),
            date: link.date,
            title: link.title.clone(),
            html_body,
        }
    }

    pub fn date_label(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }
}
