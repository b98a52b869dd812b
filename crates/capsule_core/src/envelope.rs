use html_escape::{encode_double_quoted_attribute, encode_text};

use crate::config::EnvelopeRules;

/// Drop the fixed header lines and everything from the footer marker on.
pub fn strip_envelope(body: &str, rules: &EnvelopeRules) -> String {
    let content = body
        .split('\n')
        .skip(rules.header_lines)
        .collect::<Vec<_>>()
        .join("\n");
    if rules.footer_marker.is_empty() {
        return content;
    }
    let footer = format!("\n\n{}", rules.footer_marker);
    match content.split_once(&footer) {
        Some((before, _)) => before.to_string(),
        None => content,
    }
}

/// Append a rule and a link back to where the post was fetched from.
pub fn append_source_footer(html: &str, source_url: &str) -> String {
    format!(
        "{html}<hr/>\n<p><a href=\"{href}\">{text}</a></p>\n",
        href = encode_double_quoted_attribute(source_url),
        text = encode_text(source_url),
    )
}
