//! Capsule core: pure index parsing, gemtext rendering and URL helpers.
mod config;
mod envelope;
pub mod gemtext;
mod links;
mod render;
mod resolve;
mod types;

pub use config::{
    CapsuleConfig, ConfigError, EnvelopeRules, DEFAULT_DATE_FORMAT, DEFAULT_FOOTER_MARKER,
    DEFAULT_NEXT_PAGE_MARKER,
};
pub use envelope::{append_source_footer, strip_envelope};
pub use links::LinkExtractor;
pub use render::{render_gemtext, RendererState};
pub use resolve::resolve_reference;
pub use types::{IndexPage, PostLink, RenderedPost};
