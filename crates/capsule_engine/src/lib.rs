//! Capsule engine: protocol client, index crawl, post assembly and export.
mod assemble;
mod client;
mod crawl;
mod decode;
mod export;
mod filename;
mod input;
mod persist;
pub mod protocol;
mod transport;
mod types;

pub use assemble::{AssemblyReport, PostAssembler, SkippedPost};
pub use client::{FetchSettings, Fetcher, GeminiClient, DEFAULT_PORT, SCHEME};
pub use crawl::{collect_chain, CapsuleCrawler, CrawlError};
pub use decode::{charset_param, decode_body, DecodeError};
pub use export::{build_book, chapter_href, write_book, BookOptions, ExportError, ExportSummary};
pub use filename::{book_filename, chapter_anchor};
pub use input::{with_query, InputProvider, NoInput, StdinPrompt};
pub use persist::{ensure_output_dir, AtomicFileWriter, PersistError};
pub use transport::{AsyncStream, BoxedStream, TlsTransport, Transport};
pub use types::{
    DecodedBody, FailureKind, FetchError, FetchMetadata, FetchOutput, Response, ResponseHeader,
    StatusClass,
};
