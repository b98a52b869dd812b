use html_escape::{encode_double_quoted_attribute, encode_text};

use crate::gemtext::{self, Line, LinkLine};
use crate::resolve::resolve_reference;

const LINE_BREAK: char = '\n';

/// Block state for a single render call; never shared between posts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RendererState {
    pub in_preformatted_block: bool,
    pub in_list_block: bool,
}

/// Render a gemtext body as an HTML fragment.
///
/// Relative link targets resolve against `source_url`. Blocks still open at
/// the end of input are closed so the fragment is always well formed.
pub fn render_gemtext(body: &str, source_url: &str) -> String {
    let mut renderer = Renderer::new(source_url);
    for line in body.lines() {
        renderer.push_line(line);
    }
    renderer.finish()
}

struct Renderer<'a> {
    source_url: &'a str,
    state: RendererState,
    html: String,
}

impl<'a> Renderer<'a> {
    fn new(source_url: &'a str) -> Self {
        Self {
            source_url,
            state: RendererState::default(),
            html: String::new(),
        }
    }

    fn push_line(&mut self, line: &str) {
        if gemtext::is_fence(line) {
            self.close_list();
            self.state.in_preformatted_block = !self.state.in_preformatted_block;
            self.html.push_str(if self.state.in_preformatted_block {
                "<pre>"
            } else {
                "</pre>"
            });
            self.html.push(LINE_BREAK);
            return;
        }

        if self.state.in_preformatted_block {
            self.html.push_str(&encode_text(line));
            self.html.push(LINE_BREAK);
            return;
        }

        if line.is_empty() {
            self.close_list();
            self.html.push(LINE_BREAK);
            return;
        }

        let line = gemtext::classify(line);
        if !matches!(line, Line::ListItem(_)) {
            self.close_list();
        }
        match line {
            Line::ListItem(text) => {
                self.open_list();
                self.push_element("li", text);
            }
            Line::Heading { level, text } => self.push_element(heading_tag(level), text),
            Line::Quote(text) => self.push_element("blockquote", text),
            Line::Link(link) => self.push_link(link),
            Line::Text(text) => self.push_element("p", text),
        }
        self.html.push(LINE_BREAK);
    }

    fn push_element(&mut self, tag: &str, text: &str) {
        self.html.push('<');
        self.html.push_str(tag);
        self.html.push('>');
        self.html.push_str(&encode_text(text));
        self.html.push_str("</");
        self.html.push_str(tag);
        self.html.push('>');
    }

    fn push_link(&mut self, link: LinkLine<'_>) {
        let href = resolve_reference(self.source_url, link.target);
        let label = link.label.unwrap_or(link.target);
        self.html.push_str("<p><a href=\"");
        self.html.push_str(&encode_double_quoted_attribute(&href));
        self.html.push_str("\">");
        self.html.push_str(&encode_text(label));
        self.html.push_str("</a></p>");
    }

    fn open_list(&mut self) {
        if !self.state.in_list_block {
            self.state.in_list_block = true;
            self.html.push_str("<ul>");
            self.html.push(LINE_BREAK);
        }
    }

    fn close_list(&mut self) {
        if self.state.in_list_block {
            self.state.in_list_block = false;
            self.html.push_str("</ul>");
            self.html.push(LINE_BREAK);
        }
    }

    fn finish(mut self) -> String {
        self.close_list();
        if self.state.in_preformatted_block {
            self.state.in_preformatted_block = false;
            self.html.push_str("</pre>");
            self.html.push(LINE_BREAK);
        }
        self.html
    }
}

fn heading_tag(level: u8) -> &'static str {
    match level {
        1 => "h1",
        2 => "h2",
        _ => "h3",
    }
}
