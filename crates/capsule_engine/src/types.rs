use std::fmt;

/// Category of a response, taken from the first digit of its status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusClass {
    Input,
    Success,
    Redirect,
    TemporaryFailure,
    PermanentFailure,
    ClientCertRequired,
}

impl StatusClass {
    pub fn from_code(code: u8) -> Option<Self> {
        match code / 10 {
            1 => Some(Self::Input),
            2 => Some(Self::Success),
            3 => Some(Self::Redirect),
            4 => Some(Self::TemporaryFailure),
            5 => Some(Self::PermanentFailure),
            6 => Some(Self::ClientCertRequired),
            _ => None,
        }
    }
}

impl fmt::Display for StatusClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StatusClass::Input => "input",
            StatusClass::Success => "success",
            StatusClass::Redirect => "redirect",
            StatusClass::TemporaryFailure => "temporary failure",
            StatusClass::PermanentFailure => "permanent failure",
            StatusClass::ClientCertRequired => "client certificate required",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseHeader {
    pub code: u8,
    pub class: StatusClass,
    /// MIME type on success, target on redirect, prompt on input, message otherwise.
    pub meta: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub header: ResponseHeader,
    /// Only read for successful responses with a `text/*` MIME type.
    pub body: Option<Vec<u8>>,
}

impl Response {
    pub fn status(&self) -> StatusClass {
        self.header.class
    }

    pub fn meta(&self) -> &str {
        &self.header.meta
    }

    pub fn declared_charset(&self) -> Option<String> {
        match self.header.class {
            StatusClass::Success => crate::decode::charset_param(&self.header.meta),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedBody {
    pub text: String,
    pub encoding_label: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchMetadata {
    pub original_url: String,
    pub final_url: String,
    pub redirect_count: usize,
    pub mime: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchOutput {
    /// `None` when the success body is not textual.
    pub text: Option<DecodedBody>,
    pub metadata: FetchMetadata,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchError {
    pub kind: FailureKind,
    pub message: String,
}

impl FetchError {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl std::error::Error for FetchError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    Network,
    Timeout,
    Protocol,
    Status { code: u8, class: StatusClass },
    RedirectLimitExceeded,
    InputLimitExceeded,
    InputDeclined,
    TooLarge { max_bytes: u64 },
    Decode,
    NoTextBody,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::Network => write!(f, "network error"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::Protocol => write!(f, "protocol error"),
            FailureKind::Status { code, class } => write!(f, "status {code} ({class})"),
            FailureKind::RedirectLimitExceeded => write!(f, "redirect limit exceeded"),
            FailureKind::InputLimitExceeded => write!(f, "input prompt limit exceeded"),
            FailureKind::InputDeclined => write!(f, "input declined"),
            FailureKind::TooLarge { max_bytes } => {
                write!(f, "response larger than {max_bytes} bytes")
            }
            FailureKind::Decode => write!(f, "decode error"),
            FailureKind::NoTextBody => write!(f, "no textual body"),
        }
    }
}
