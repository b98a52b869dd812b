//! Line grammar shared by the index parser and the renderer.

pub const LINK_PREFIX: &str = "=>";
pub const FENCE: &str = "```";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkLine<'a> {
    pub target: &'a str,
    pub label: Option<&'a str>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Line<'a> {
    Heading { level: u8, text: &'a str },
    ListItem(&'a str),
    Quote(&'a str),
    Link(LinkLine<'a>),
    Text(&'a str),
}

type LineRule = for<'a> fn(&'a str) -> Option<Line<'a>>;

// First match wins: "###" must be tried before "#".
const LINE_RULES: &[LineRule] = &[heading_3, heading_2, heading_1, list_item, quote, link];

/// Classify a line outside a preformatted block.
pub fn classify(line: &str) -> Line<'_> {
    LINE_RULES
        .iter()
        .find_map(|rule| rule(line))
        .unwrap_or(Line::Text(line))
}

pub fn is_fence(line: &str) -> bool {
    line.starts_with(FENCE) || line.ends_with(FENCE)
}

/// Split a `=>` line into its target and optional label.
pub fn parse_link(line: &str) -> Option<LinkLine<'_>> {
    let rest = line.strip_prefix(LINK_PREFIX)?.trim_start();
    let mut parts = rest.splitn(2, char::is_whitespace);
    let target = parts.next().filter(|target| !target.is_empty())?;
    let label = parts
        .next()
        .map(str::trim)
        .filter(|label| !label.is_empty());
    Some(LinkLine { target, label })
}

fn heading<'a>(line: &'a str, prefix: &str, level: u8) -> Option<Line<'a>> {
    line.strip_prefix(prefix).map(|text| Line::Heading {
        level,
        text: text.trim(),
    })
}

fn heading_3(line: &str) -> Option<Line<'_>> {
    heading(line, "###", 3)
}

fn heading_2(line: &str) -> Option<Line<'_>> {
    heading(line, "##", 2)
}

fn heading_1(line: &str) -> Option<Line<'_>> {
    heading(line, "#", 1)
}

fn list_item(line: &str) -> Option<Line<'_>> {
    line.strip_prefix("* ").map(|text| Line::ListItem(text.trim()))
}

fn quote(line: &str) -> Option<Line<'_>> {
    line.strip_prefix('>').map(|text| Line::Quote(text.trim()))
}

fn link(line: &str) -> Option<Line<'_>> {
    parse_link(line).map(Line::Link)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deeper_headings_win_over_shallower() {
        assert_eq!(
            classify("### Three"),
            Line::Heading {
                level: 3,
                text: "Three"
            }
        );
        assert_eq!(classify("#One"), Line::Heading { level: 1, text: "One" });
    }

    #[test]
    fn heading_text_outlives_its_prefix() {
        let line = String::from("## Two");
        let parsed = {
            let prefix = String::from("##");
            heading(&line, &prefix, 2)
        };
        assert_eq!(parsed, Some(Line::Heading { level: 2, text: "Two" }));
    }

    #[test]
    fn link_without_label() {
        assert_eq!(
            parse_link("=>   gemini://a.b/c  "),
            Some(LinkLine {
                target: "gemini://a.b/c",
                label: None
            })
        );
        assert_eq!(parse_link("=>"), None);
    }

    #[test]
    fn bare_asterisk_is_text() {
        assert_eq!(classify("*emphasis*"), Line::Text("*emphasis*"));
    }
}
