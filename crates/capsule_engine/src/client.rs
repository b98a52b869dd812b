use std::sync::Arc;
use std::time::Duration;

use capsule_core::resolve_reference;
use capsule_logging::{capsule_debug, capsule_info, capsule_warn};
use url::Url;

use crate::decode::decode_body;
use crate::input::{with_query, InputProvider, NoInput};
use crate::protocol::exchange;
use crate::transport::{TlsTransport, Transport};
use crate::{FailureKind, FetchError, FetchMetadata, FetchOutput, Response, StatusClass};

pub const DEFAULT_PORT: u16 = 1965;
pub const SCHEME: &str = "gemini";
/// Status code that asks for sensitive input such as a password.
const SENSITIVE_INPUT: u8 = 11;

#[derive(Debug, Clone)]
pub struct FetchSettings {
    pub default_port: u16,
    pub redirect_limit: usize,
    pub input_limit: usize,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub max_bytes: u64,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            default_port: DEFAULT_PORT,
            redirect_limit: 5,
            input_limit: 3,
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            max_bytes: 5 * 1024 * 1024,
        }
    }
}

#[async_trait::async_trait]
pub trait Fetcher: Send + Sync {
    /// One logical fetch: follows redirects and answers input prompts.
    async fn fetch(&self, url: &str) -> Result<FetchOutput, FetchError>;
}

/// Protocol client opening a fresh connection for every request, including
/// every redirect hop.
pub struct GeminiClient<T = TlsTransport> {
    transport: T,
    input: Arc<dyn InputProvider>,
    settings: FetchSettings,
}

impl GeminiClient<TlsTransport> {
    pub fn new(settings: FetchSettings) -> Result<Self, FetchError> {
        Ok(Self::with_transport(TlsTransport::new()?, settings))
    }
}

impl<T: Transport> GeminiClient<T> {
    pub fn with_transport(transport: T, settings: FetchSettings) -> Self {
        Self {
            transport,
            input: Arc::new(NoInput),
            settings,
        }
    }

    pub fn with_input(mut self, input: Arc<dyn InputProvider>) -> Self {
        self.input = input;
        self
    }

    pub fn settings(&self) -> &FetchSettings {
        &self.settings
    }

    async fn request(&self, url: &Url) -> Result<Response, FetchError> {
        if url.scheme() != SCHEME {
            return Err(FetchError::new(
                FailureKind::InvalidUrl,
                format!("unsupported scheme in {url}"),
            ));
        }
        let host = url
            .host_str()
            .filter(|host| !host.is_empty())
            .ok_or_else(|| FetchError::new(FailureKind::InvalidUrl, format!("no host in {url}")))?;
        let port = url.port().unwrap_or(self.settings.default_port);

        capsule_debug!("connecting to {host}:{port} for {url}");
        let stream = tokio::time::timeout(
            self.settings.connect_timeout,
            self.transport.connect(host, port),
        )
        .await
        .map_err(|_| timeout_error("connect", url))??;

        tokio::time::timeout(
            self.settings.request_timeout,
            exchange(stream, url.as_str(), self.settings.max_bytes),
        )
        .await
        .map_err(|_| timeout_error("request", url))?
    }

    fn finish(
        &self,
        original_url: &str,
        final_url: &Url,
        redirect_count: usize,
        response: Response,
    ) -> Result<FetchOutput, FetchError> {
        let mime = response.header.meta;
        let text = match response.body {
            Some(bytes) => Some(
                decode_body(&bytes, &mime)
                    .map_err(|err| FetchError::new(FailureKind::Decode, err.to_string()))?,
            ),
            None => None,
        };
        Ok(FetchOutput {
            text,
            metadata: FetchMetadata {
                original_url: original_url.to_string(),
                final_url: final_url.to_string(),
                redirect_count,
                mime,
            },
        })
    }
}

#[async_trait::async_trait]
impl<T: Transport> Fetcher for GeminiClient<T> {
    async fn fetch(&self, url: &str) -> Result<FetchOutput, FetchError> {
        let mut current = Url::parse(url)
            .map_err(|err| FetchError::new(FailureKind::InvalidUrl, err.to_string()))?;
        let mut redirects = 0;
        let mut prompts = 0;

        loop {
            let response = self.request(&current).await?;
            let header = &response.header;
            match header.class {
                StatusClass::Input => {
                    prompts += 1;
                    if prompts > self.settings.input_limit {
                        return Err(FetchError::new(
                            FailureKind::InputLimitExceeded,
                            format!("more than {} prompts for {url}", self.settings.input_limit),
                        ));
                    }
                    let sensitive = header.code == SENSITIVE_INPUT;
                    let value = self
                        .input
                        .provide(&header.meta, sensitive)
                        .ok_or_else(|| {
                            FetchError::new(FailureKind::InputDeclined, header.meta.clone())
                        })?;
                    current = with_query(&current, &value);
                }
                StatusClass::Redirect => {
                    redirects += 1;
                    if redirects > self.settings.redirect_limit {
                        return Err(FetchError::new(
                            FailureKind::RedirectLimitExceeded,
                            format!(
                                "more than {} redirects for {url}",
                                self.settings.redirect_limit
                            ),
                        ));
                    }
                    let target = resolve_reference(current.as_str(), &header.meta);
                    capsule_info!("redirect {} -> {target}", current);
                    current = Url::parse(&target).map_err(|err| {
                        FetchError::new(FailureKind::InvalidUrl, format!("{target}: {err}"))
                    })?;
                }
                StatusClass::Success => {
                    return self.finish(url, &current, redirects, response);
                }
                StatusClass::TemporaryFailure
                | StatusClass::PermanentFailure
                | StatusClass::ClientCertRequired => {
                    capsule_warn!("{current} answered {} {}", header.code, header.meta);
                    return Err(FetchError::new(
                        FailureKind::Status {
                            code: header.code,
                            class: header.class,
                        },
                        header.meta.clone(),
                    ));
                }
            }
        }
    }
}

fn timeout_error(stage: &str, url: &Url) -> FetchError {
    FetchError::new(FailureKind::Timeout, format!("{stage} timed out for {url}"))
}
