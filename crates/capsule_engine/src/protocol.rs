//! Wire format of one request/response exchange.
//!
//! A request is the absolute URL followed by CRLF. The response starts with
//! `<two-digit status><space><meta><CRLF>`; only successful responses carry a
//! body, which runs until the server closes the connection.

use std::io::ErrorKind;

use tokio::io::{
    AsyncBufRead, AsyncBufReadExt, AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufReader,
};

use crate::decode::is_textual;
use crate::{FailureKind, FetchError, Response, ResponseHeader, StatusClass};

pub const LINE_TERMINATOR: &str = "\r\n";
/// Longest meta the protocol allows.
pub const MAX_META_BYTES: usize = 1024;

pub fn build_request(url: &str) -> String {
    format!("{url}{LINE_TERMINATOR}")
}

pub fn parse_header(line: &str) -> Result<ResponseHeader, FetchError> {
    let line = line.trim_end_matches(['\r', '\n']);
    let (status, meta) = line
        .split_once(' ')
        .ok_or_else(|| protocol_error(format!("header without separator: {line:?}")))?;

    if status.len() != 2 || !status.bytes().all(|b| b.is_ascii_digit()) {
        return Err(protocol_error(format!("malformed status {status:?}")));
    }
    let code: u8 = status
        .parse()
        .map_err(|_| protocol_error(format!("malformed status {status:?}")))?;
    let class = StatusClass::from_code(code)
        .ok_or_else(|| protocol_error(format!("unknown status class in {code}")))?;

    let meta = meta.trim();
    if meta.is_empty() {
        return Err(protocol_error(format!("header without meta: {line:?}")));
    }

    Ok(ResponseHeader {
        code,
        class,
        meta: meta.to_string(),
    })
}

/// Send one request over `stream` and read the complete response.
///
/// The body is read only for successful `text/*` responses, capped at
/// `max_body_bytes`.
pub async fn exchange<S>(
    stream: S,
    url: &str,
    max_body_bytes: u64,
) -> Result<Response, FetchError>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let mut reader = BufReader::new(stream);
    reader
        .get_mut()
        .write_all(build_request(url).as_bytes())
        .await
        .map_err(network_error)?;
    reader.get_mut().flush().await.map_err(network_error)?;

    let header = read_header(&mut reader).await?;
    let body = match header.class {
        StatusClass::Success if is_textual(&header.meta) => {
            Some(read_body(&mut reader, max_body_bytes).await?)
        }
        _ => None,
    };

    Ok(Response { header, body })
}

async fn read_header<R>(reader: &mut R) -> Result<ResponseHeader, FetchError>
where
    R: AsyncBufRead + Unpin,
{
    // Two status digits, the space and CRLF around the meta.
    let limit = (MAX_META_BYTES + 5) as u64;
    let mut raw = Vec::new();
    let read = (&mut *reader)
        .take(limit)
        .read_until(b'\n', &mut raw)
        .await
        .map_err(network_error)?;

    if read == 0 {
        return Err(protocol_error("connection closed before header"));
    }
    if raw.last() != Some(&b'\n') {
        return Err(protocol_error("header line too long or unterminated"));
    }
    let line = std::str::from_utf8(&raw)
        .map_err(|err| protocol_error(format!("header is not utf-8: {err}")))?;
    parse_header(line)
}

async fn read_body<R>(reader: &mut R, max_bytes: u64) -> Result<Vec<u8>, FetchError>
where
    R: AsyncRead + Unpin,
{
    let mut body = Vec::new();
    let mut chunk = [0u8; 8 * 1024];
    loop {
        let read = match reader.read(&mut chunk).await {
            Ok(0) => break,
            Ok(read) => read,
            // Many servers drop the connection without a TLS close_notify.
            Err(err) if err.kind() == ErrorKind::UnexpectedEof => break,
            Err(err) => return Err(network_error(err)),
        };
        if body.len() as u64 + read as u64 > max_bytes {
            return Err(FetchError::new(
                FailureKind::TooLarge { max_bytes },
                "response body too large",
            ));
        }
        body.extend_from_slice(&chunk[..read]);
    }
    Ok(body)
}

fn protocol_error(message: impl Into<String>) -> FetchError {
    FetchError::new(FailureKind::Protocol, message)
}

pub(crate) fn network_error(err: std::io::Error) -> FetchError {
    FetchError::new(FailureKind::Network, err.to_string())
}
