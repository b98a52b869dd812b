use url::Url;

pub const DEFAULT_NEXT_PAGE_MARKER: &str = "Older posts";
pub const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d";
pub const DEFAULT_ENVELOPE_HEADER_LINES: usize = 2;
pub const DEFAULT_FOOTER_MARKER: &str = "EOT";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("base url {url:?} is not an absolute url with a host")]
    InvalidBaseUrl { url: String },
    #[error("next page marker must not be empty")]
    EmptyMarker,
}

/// Header/footer lines wrapping the real content of every post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvelopeRules {
    pub header_lines: usize,
    pub footer_marker: String,
}

impl Default for EnvelopeRules {
    fn default() -> Self {
        Self {
            header_lines: DEFAULT_ENVELOPE_HEADER_LINES,
            footer_marker: DEFAULT_FOOTER_MARKER.to_string(),
        }
    }
}

/// Read-only settings for one crawl of a capsule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapsuleConfig {
    pub base_url: String,
    pub next_page_marker: String,
    pub date_format: String,
    pub envelope: EnvelopeRules,
}

impl CapsuleConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            next_page_marker: DEFAULT_NEXT_PAGE_MARKER.to_string(),
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            envelope: EnvelopeRules::default(),
        }
    }

    pub fn with_next_page_marker(mut self, marker: impl Into<String>) -> Self {
        self.next_page_marker = marker.into();
        self
    }

    pub fn with_date_format(mut self, format: impl Into<String>) -> Self {
        self.date_format = format.into();
        self
    }

    pub fn with_envelope(mut self, envelope: EnvelopeRules) -> Self {
        self.envelope = envelope;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let has_host = Url::parse(&self.base_url)
            .ok()
            .and_then(|url| url.host_str().map(|host| !host.is_empty()))
            .unwrap_or(false);
        if !has_host {
            return Err(ConfigError::InvalidBaseUrl {
                url: self.base_url.clone(),
            });
        }
        if self.next_page_marker.trim().is_empty() {
            return Err(ConfigError::EmptyMarker);
        }
        Ok(())
    }
}
