//! Markdown to HTML fragment conversion.
//!
//! Rendering is delegated to `pulldown-cmark`; this module only rewrites the
//! event stream so that later stages find their input:
//!
//! - ` ```mermaid ` fences become
//!   `<div class="mermaid-container" data-mermaid-source="...">` placeholders
//! - inline math becomes `<span class="arithmatex">\(...\)</span>`
//! - display math becomes `<div class="arithmatex">\[...\]</div>`
//!
//! GitHub-style alerts are deliberately not parsed here: alert blockquotes
//! come out as plain blockquotes and are restructured by
//! [`transform_alerts`](crate::transform_alerts).

use folio_markup::{escape_attr, escape_html};
use pulldown_cmark::{CodeBlockKind, Event, HeadingLevel, Options, Parser, Tag, TagEnd, html};

/// Result of converting a markdown document.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Conversion {
    /// HTML fragment.
    pub html: String,
    /// Text of the first level-one heading, if any.
    pub title: Option<String>,
}

/// Markdown to HTML converter.
#[derive(Clone, Debug)]
pub struct MarkdownConverter {
    options: Options,
}

impl Default for MarkdownConverter {
    fn default() -> Self {
        Self::new()
    }
}

impl MarkdownConverter {
    /// Create a converter with tables, footnotes, strikethrough, task lists,
    /// heading attributes and math enabled.
    #[must_use]
    pub fn new() -> Self {
        Self {
            options: Options::ENABLE_TABLES
                | Options::ENABLE_FOOTNOTES
                | Options::ENABLE_STRIKETHROUGH
                | Options::ENABLE_TASKLISTS
                | Options::ENABLE_HEADING_ATTRIBUTES
                | Options::ENABLE_MATH,
        }
    }

    /// Parser options in use.
    #[must_use]
    pub fn options(&self) -> Options {
        self.options
    }

    /// Convert `markdown` into an HTML fragment.
    #[must_use]
    pub fn convert(&self, markdown: &str) -> Conversion {
        let mut events = Vec::new();
        let mut diagram: Option<String> = None;
        let mut title = TitleState::default();

        for event in Parser::new_ext(markdown, self.options) {
            title.observe(&event);
            match event {
                Event::Start(Tag::CodeBlock(CodeBlockKind::Fenced(ref info)))
                    if is_diagram_fence(info) =>
                {
                    diagram = Some(String::new());
                }
                Event::Text(ref text) if diagram.is_some() => {
                    if let Some(source) = diagram.as_mut() {
                        source.push_str(text);
                    }
                }
                Event::End(TagEnd::CodeBlock) if diagram.is_some() => {
                    let source = diagram.take().unwrap_or_default();
                    events.push(Event::Html(diagram_placeholder(&source).into()));
                }
                Event::InlineMath(tex) => {
                    events.push(Event::InlineHtml(
                        format!(r#"<span class="arithmatex">\({}\)</span>"#, escape_html(&tex))
                            .into(),
                    ));
                }
                Event::DisplayMath(tex) => {
                    events.push(Event::InlineHtml(
                        format!(r#"<div class="arithmatex">\[{}\]</div>"#, escape_html(&tex))
                            .into(),
                    ));
                }
                other => events.push(other),
            }
        }

        let mut out = String::with_capacity(markdown.len() * 3 / 2);
        html::push_html(&mut out, events.into_iter());

        Conversion {
            html: out,
            title: title.finish(),
        }
    }
}

fn is_diagram_fence(info: &str) -> bool {
    info.split_whitespace().next() == Some("mermaid")
}

fn diagram_placeholder(source: &str) -> String {
    format!(
        "<div class=\"mermaid-container\" data-mermaid-source=\"{}\"></div>\n",
        escape_attr(source.trim())
    )
}

/// Collects the text of the first level-one heading.
#[derive(Default)]
struct TitleState {
    inside: bool,
    done: bool,
    text: String,
}

impl TitleState {
    fn observe(&mut self, event: &Event<'_>) {
        if self.done {
            return;
        }
        match event {
            Event::Start(Tag::Heading {
                level: HeadingLevel::H1,
                ..
            }) => self.inside = true,
            Event::End(TagEnd::Heading(HeadingLevel::H1)) if self.inside => {
                self.inside = false;
                self.done = true;
            }
            Event::Text(text) | Event::Code(text) | Event::InlineMath(text) if self.inside => {
                self.text.push_str(text);
            }
            _ => {}
        }
    }

    fn finish(self) -> Option<String> {
        let title = self.text.trim();
        if title.is_empty() {
            None
        } else {
            Some(title.to_owned())
        }
    }
}
