use std::path::PathBuf;

use capsule_core::RenderedPost;
use capsule_logging::capsule_info;
use chrono::NaiveDate;
use epub_builder::{EpubBuilder, EpubContent, ReferenceType, ZipLibrary};
use html_escape::{encode_double_quoted_attribute, encode_text};
use serde_json::json;

use crate::assemble::SkippedPost;
use crate::filename::{book_filename, chapter_anchor};
use crate::persist::{AtomicFileWriter, PersistError};

const XHTML_PROLOGUE: &str = "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n<!DOCTYPE html>\n";
const XHTML_NS: &str = "http://www.w3.org/1999/xhtml";

#[derive(Debug, Clone)]
pub struct BookOptions {
    pub title: String,
    pub author: String,
    pub language: String,
    /// Stem of the output file; the title is used when absent.
    pub filename: Option<String>,
    pub output_dir: PathBuf,
    pub run_date: NaiveDate,
    pub manifest_filename: Option<String>,
}

impl BookOptions {
    pub fn new(
        title: impl Into<String>,
        output_dir: impl Into<PathBuf>,
        run_date: NaiveDate,
    ) -> Self {
        Self {
            title: title.into(),
            author: String::new(),
            language: "en".to_string(),
            filename: None,
            output_dir: output_dir.into(),
            run_date,
            manifest_filename: Some("manifest.json".to_string()),
        }
    }

    pub fn output_filename(&self) -> String {
        book_filename(self.filename.as_deref().unwrap_or(&self.title), self.run_date)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSummary {
    pub chapter_count: usize,
    pub skipped_count: usize,
    pub output_path: PathBuf,
    pub manifest_path: Option<PathBuf>,
}

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("persist error: {0}")]
    Persist(#[from] PersistError),
    #[error("epub container error: {0}")]
    Container(String),
    #[error("nothing to export")]
    Empty,
}

fn container_error(err: impl std::fmt::Display) -> ExportError {
    ExportError::Container(err.to_string())
}

/// Write every rendered post as one chapter of a single ePub book.
pub fn write_book(
    posts: &[RenderedPost],
    skipped: &[SkippedPost],
    options: &BookOptions,
) -> Result<ExportSummary, ExportError> {
    if posts.is_empty() {
        return Err(ExportError::Empty);
    }

    let book = build_book(posts, options)?;
    let writer = AtomicFileWriter::new(options.output_dir.clone());
    let output_path = writer.write(&options.output_filename(), book)?;
    capsule_info!("wrote {} chapters to {}", posts.len(), output_path.display());

    let manifest_path = match &options.manifest_filename {
        Some(name) => {
            let manifest = build_manifest(posts, skipped, options);
            Some(writer.write(name, manifest.to_string())?)
        }
        None => None,
    };

    Ok(ExportSummary {
        chapter_count: posts.len(),
        skipped_count: skipped.len(),
        output_path,
        manifest_path,
    })
}

/// Pack the posts into an in-memory ePub, one chapter per post in crawl order.
pub fn build_book(
    posts: &[RenderedPost],
    options: &BookOptions,
) -> Result<Vec<u8>, ExportError> {
    let mut builder =
        EpubBuilder::new(ZipLibrary::new().map_err(container_error)?).map_err(container_error)?;
    builder
        .metadata("title", options.title.as_str())
        .map_err(container_error)?;
    builder
        .metadata("lang", options.language.as_str())
        .map_err(container_error)?;
    if !options.author.is_empty() {
        builder
            .metadata("author", options.author.as_str())
            .map_err(container_error)?;
    }

    for (index, post) in posts.iter().enumerate() {
        let heading = chapter_heading(post);
        let document = chapter_document(post, &heading, &options.language);
        builder
            .add_content(
                EpubContent::new(chapter_href(index, post), document.as_bytes())
                    .title(heading)
                    .reftype(ReferenceType::Text),
            )
            .map_err(container_error)?;
    }
    builder.inline_toc();

    let mut book = Vec::new();
    builder.generate(&mut book).map_err(container_error)?;
    Ok(book)
}

/// Path of a chapter inside the container; the index keeps crawl order visible.
pub fn chapter_href(index: usize, post: &RenderedPost) -> String {
    format!("chapter-{:03}-{}.xhtml", index + 1, chapter_anchor(&post.url))
}

fn chapter_document(post: &RenderedPost, heading: &str, language: &str) -> String {
    let language = encode_double_quoted_attribute(language);
    let heading = encode_text(heading);
    let anchor = chapter_anchor(&post.url);

    let mut document = String::from(XHTML_PROLOGUE);
    document.push_str(&format!(
        "<html xmlns=\"{XHTML_NS}\" lang=\"{language}\" xml:lang=\"{language}\">\n"
    ));
    document.push_str(&format!(
        "<head>\n<meta charset=\"utf-8\"/>\n<title>{heading}</title>\n</head>\n"
    ));
    document.push_str(&format!(
        "<body>\n<section id=\"{anchor}\">\n<h1>{heading}</h1>\n"
    ));
    document.push_str(&post.html_body);
    document.push_str("</section>\n</body>\n</html>\n");
    document
}

fn chapter_heading(post: &RenderedPost) -> String {
    if post.title.is_empty() {
        post.date_label()
    } else {
        format!("{} {}", post.date_label(), post.title)
    }
}

fn build_manifest(
    posts: &[RenderedPost],
    skipped: &[SkippedPost],
    options: &BookOptions,
) -> serde_json::Value {
    json!({
        "title": options.title,
        "author": options.author,
        "language": options.language,
        "run_date": options.run_date.format("%Y-%m-%d").to_string(),
        "chapter_count": posts.len(),
        "chapters": posts.iter().map(|post| {
            json!({
                "id": chapter_anchor(&post.url),
                "title": post.title,
                "date": post.date_label(),
                "url": post.url,
            })
        }).collect::<Vec<_>>(),
        "skipped": skipped.iter().map(|skip| {
            json!({
                "url": skip.link.url,
                "title": skip.link.title,
                "reason": skip.reason.to_string(),
            })
        }).collect::<Vec<_>>(),
    })
}
