use std::io::{Cursor, Read};

use capsule_core::{PostLink, RenderedPost};
use capsule_engine::{
    book_filename, build_book, chapter_anchor, chapter_href, write_book, BookOptions, ExportError,
    FailureKind, FetchError, SkippedPost,
};
use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use zip::ZipArchive;

fn run_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()
}

fn post(url: &str, day: u32, title: &str) -> RenderedPost {
    RenderedPost {
        url: url.to_string(),
        date: NaiveDate::from_ymd_opt(2024, 4, day).unwrap(),
        title: title.to_string(),
        html_body: format!("<p>{title} body</p>\n"),
    }
}

#[test]
fn filename_is_sanitized_and_dated() {
    assert_eq!(
        book_filename("My: Capsule?/Log", run_date()),
        "My_ Capsule_Log-2024-05-01.epub"
    );
    assert_eq!(book_filename("CON", run_date()), "CON_-2024-05-01.epub");
    assert_eq!(book_filename("..", run_date()), "capsule-2024-05-01.epub");
}

#[test]
fn chapter_anchor_is_stable() {
    let first = chapter_anchor("gemini://c.example/a");
    assert_eq!(first, chapter_anchor("gemini://c.example/a"));
    assert_ne!(first, chapter_anchor("gemini://c.example/b"));
    assert!(first.starts_with("post-"));
    assert_eq!(first.len(), "post-".len() + 8);
}

/// Read one entry of the container, matched by the end of its path.
fn entry(book: &[u8], suffix: &str) -> String {
    let mut archive = ZipArchive::new(Cursor::new(book)).unwrap();
    let name = archive
        .file_names()
        .find(|name| name.ends_with(suffix))
        .unwrap_or_else(|| panic!("no entry ending in {suffix}"))
        .to_string();
    let mut text = String::new();
    archive
        .by_name(&name)
        .unwrap()
        .read_to_string(&mut text)
        .unwrap();
    text
}

#[test]
fn book_is_an_epub_with_chapters_in_crawl_order() {
    let posts = vec![
        post("gemini://c.example/2", 2, "Later <one>"),
        post("gemini://c.example/1", 1, ""),
    ];
    let mut options = BookOptions::new("Capsule Digest", "unused", run_date());
    options.author = "Ada".to_string();
    options.language = "es".to_string();

    let book = build_book(&posts, &options).unwrap();

    assert_eq!(entry(&book, "mimetype"), "application/epub+zip");

    let opf = entry(&book, ".opf");
    assert!(opf.contains("Capsule Digest"));
    assert!(opf.contains("Ada"));
    assert!(opf.contains("<dc:language>es</dc:language>"));
    let later_href = chapter_href(0, &posts[0]);
    let earlier_href = chapter_href(1, &posts[1]);
    let later_at = opf.find(&later_href).expect("later chapter listed");
    let earlier_at = opf.find(&earlier_href).expect("earlier chapter listed");
    assert!(later_at < earlier_at);

    let later = entry(&book, &later_href);
    assert!(later.contains("lang=\"es\" xml:lang=\"es\""));
    assert!(later.contains(&format!(
        "<section id=\"{}\">",
        chapter_anchor("gemini://c.example/2")
    )));
    assert!(later.contains(
        "<h1>2024-04-02 Later &lt;one&gt;</h1>\n<p>Later <one> body</p>\n</section>"
    ));

    let earlier = entry(&book, &earlier_href);
    assert!(earlier.contains("<h1>2024-04-01</h1>"));
}

#[test]
fn chapter_paths_keep_crawl_position() {
    let first = post("gemini://c.example/a", 1, "A");
    assert_eq!(
        chapter_href(0, &first),
        format!("chapter-001-{}.xhtml", chapter_anchor("gemini://c.example/a"))
    );
    assert!(chapter_href(11, &first).starts_with("chapter-012-"));
}

#[test]
fn write_book_creates_book_and_manifest() {
    let temp = tempfile::TempDir::new().unwrap();
    let out = temp.path().join("output");
    let mut options = BookOptions::new("Capsule", &out, run_date());
    options.filename = Some("digest".to_string());
    let posts = vec![post("gemini://c.example/1", 1, "One")];
    let skipped = vec![SkippedPost {
        link: PostLink {
            url: "gemini://c.example/2".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 4, 2).unwrap(),
            title: "Two".to_string(),
        },
        reason: FetchError::new(FailureKind::Network, "connection reset"),
    }];

    let summary = write_book(&posts, &skipped, &options).unwrap();

    assert_eq!(summary.chapter_count, 1);
    assert_eq!(summary.skipped_count, 1);
    assert_eq!(summary.output_path, out.join("digest-2024-05-01.epub"));
    let book = std::fs::read(&summary.output_path).unwrap();
    assert!(entry(&book, &chapter_href(0, &posts[0])).contains("<p>One body</p>"));

    let manifest: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(summary.manifest_path.unwrap()).unwrap())
            .unwrap();
    assert_eq!(manifest["chapter_count"], 1);
    assert_eq!(manifest["run_date"], "2024-05-01");
    assert_eq!(manifest["chapters"][0]["title"], "One");
    assert_eq!(manifest["chapters"][0]["date"], "2024-04-01");
    assert_eq!(manifest["skipped"][0]["url"], "gemini://c.example/2");
    assert_eq!(
        manifest["skipped"][0]["reason"],
        "network error: connection reset"
    );
}

#[test]
fn rewriting_replaces_previous_book() {
    let temp = tempfile::TempDir::new().unwrap();
    let options = BookOptions::new("Capsule", temp.path(), run_date());

    write_book(&[post("gemini://c.example/1", 1, "Old")], &[], &options).unwrap();
    let summary = write_book(&[post("gemini://c.example/1", 1, "New")], &[], &options).unwrap();

    let book = std::fs::read(summary.output_path).unwrap();
    let chapter = entry(&book, &chapter_href(0, &post("gemini://c.example/1", 1, "New")));
    assert!(chapter.contains("New body"));
    assert!(!chapter.contains("Old body"));
}

#[test]
fn empty_post_list_writes_nothing() {
    let temp = tempfile::TempDir::new().unwrap();
    let options = BookOptions::new("Capsule", temp.path(), run_date());

    let err = write_book(&[], &[], &options).unwrap_err();

    assert!(matches!(err, ExportError::Empty));
    assert_eq!(std::fs::read_dir(temp.path()).unwrap().count(), 0);
}
