use chrono::NaiveDate;
use sha2::{Digest, Sha256};

/// `{sanitized_stem}-{YYYY-MM-DD}.epub`, safe on every common filesystem.
pub fn book_filename(stem: &str, run_date: NaiveDate) -> String {
    format!(
        "{}-{}.epub",
        sanitize_stem(stem),
        run_date.format("%Y-%m-%d")
    )
}

/// Stable fragment id for a chapter, derived from the post URL.
pub fn chapter_anchor(url: &str) -> String {
    format!("post-{}", short_hash(url))
}

fn sanitize_stem(input: &str) -> String {
    let replaced: String = input
        .chars()
        .map(|c| if is_forbidden(c) { '_' } else { c })
        .collect();
    let trimmed = replaced.trim_matches(&['_', ' ', '.'][..]);

    let mut compacted = String::with_capacity(trimmed.len());
    for c in trimmed.chars() {
        if c == '_' && compacted.ends_with('_') {
            continue;
        }
        compacted.push(c);
    }
    if compacted.is_empty() {
        compacted.push_str("capsule");
    }
    if let Some((cut, _)) = compacted.char_indices().nth(80) {
        compacted.truncate(cut);
    }
    if is_reserved_device_name(&compacted) {
        compacted.push('_');
    }
    compacted
}

fn is_forbidden(c: char) -> bool {
    matches!(c,
        '\\' | '/' | ':' | '*' | '?' | '"' | '<' | '>' | '|' | '\0'..='\u{1F}'
    )
}

fn is_reserved_device_name(name: &str) -> bool {
    const RESERVED: &[&str] = &[
        "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8",
        "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
    ];
    RESERVED.iter().any(|r| r.eq_ignore_ascii_case(name))
}

fn short_hash(input: &str) -> String {
    let digest = Sha256::digest(input.as_bytes());
    digest
        .iter()
        .take(4)
        .map(|byte| format!("{byte:02x}"))
        .collect()
}
