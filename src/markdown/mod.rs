//! Markdown to HTML rendering for the preview page.
//!
//! GitHub-flavoured output on top of pulldown-cmark:
//! - tables, footnotes, strikethrough, task lists, `{#id}` heading attributes
//! - soft line breaks rendered as `<br>`
//! - heading ids derived from heading text, deduplicated with `-1`, `-2`
//! - fenced code highlighted by language via syntect
//!
//! # Module Structure
//!
//! - `anchor` - heading id generation
//! - `highlight` - syntect wrapper

mod anchor;
mod highlight;

use pulldown_cmark::{CodeBlockKind, CowStr, Event, Options, Parser, Tag, TagEnd, html};

use anchor::Anchors;

/// Options for markdown conversion
#[derive(Debug, Clone, Default)]
pub struct MarkdownOptions {
    /// Enable tables extension
    pub tables: bool,
    /// Enable footnotes extension
    pub footnotes: bool,
    /// Enable strikethrough extension
    pub strikethrough: bool,
    /// Enable task lists extension
    pub task_lists: bool,
    /// Enable heading attributes extension (e.g., `# Heading {#custom-id}`)
    pub heading_attributes: bool,
    /// Render single newlines inside paragraphs as `<br>`
    pub hard_breaks: bool,
}

impl MarkdownOptions {
    /// Create options with all extensions enabled
    pub fn all() -> Self {
        Self {
            tables: true,
            footnotes: true,
            strikethrough: true,
            task_lists: true,
            heading_attributes: true,
            hard_breaks: true,
        }
    }

    /// Convert to pulldown-cmark Options
    fn to_pulldown_options(&self) -> Options {
        let mut opts = Options::empty();
        if self.tables {
            opts.insert(Options::ENABLE_TABLES);
        }
        if self.footnotes {
            opts.insert(Options::ENABLE_FOOTNOTES);
        }
        if self.strikethrough {
            opts.insert(Options::ENABLE_STRIKETHROUGH);
        }
        if self.task_lists {
            opts.insert(Options::ENABLE_TASKLISTS);
        }
        if self.heading_attributes {
            opts.insert(Options::ENABLE_HEADING_ATTRIBUTES);
        }
        opts
    }
}

/// Render a markdown document to an HTML fragment.
pub fn render(markdown: &str, options: &MarkdownOptions) -> String {
    let parser = Parser::new_ext(markdown, options.to_pulldown_options());
    let events = Rewriter::new(options.hard_breaks).rewrite(parser);

    let mut out = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut out, events.into_iter());
    out
}

/// Event pass that fills in heading ids and swaps code blocks for
/// highlighted HTML.
struct Rewriter<'a> {
    hard_breaks: bool,
    anchors: Anchors,
    out: Vec<Event<'a>>,
}

/// Buffered state while inside a heading or fenced block.
enum Pending<'a> {
    None,
    Heading {
        start: Tag<'a>,
        inner: Vec<Event<'a>>,
        text: String,
    },
    Code {
        lang: Option<String>,
        source: String,
    },
}

impl<'a> Rewriter<'a> {
    fn new(hard_breaks: bool) -> Self {
        Self {
            hard_breaks,
            anchors: Anchors::default(),
            out: Vec::new(),
        }
    }

    fn rewrite(mut self, parser: Parser<'a>) -> Vec<Event<'a>> {
        let mut pending = Pending::None;

        for event in parser {
            pending = match (pending, event) {
                // ---- headings ----
                (Pending::None, Event::Start(tag @ Tag::Heading { .. })) => Pending::Heading {
                    start: tag,
                    inner: Vec::new(),
                    text: String::new(),
                },
                (Pending::Heading { start, inner, text }, Event::End(end @ TagEnd::Heading(_))) => {
                    self.flush_heading(start, inner, &text, end);
                    Pending::None
                }
                (Pending::Heading { start, mut inner, mut text }, event) => {
                    if let Event::Text(t) | Event::Code(t) = &event {
                        text.push_str(t);
                    }
                    inner.push(self.map_break(event));
                    Pending::Heading { start, inner, text }
                }

                // ---- code blocks ----
                (Pending::None, Event::Start(Tag::CodeBlock(kind))) => Pending::Code {
                    lang: match kind {
                        CodeBlockKind::Fenced(info) => info_lang(&info),
                        CodeBlockKind::Indented => None,
                    },
                    source: String::new(),
                },
                (Pending::Code { lang, source }, Event::End(TagEnd::CodeBlock)) => {
                    let html = highlight::highlight_block(&source, lang.as_deref());
                    self.out.push(Event::Html(CowStr::from(html)));
                    Pending::None
                }
                (Pending::Code { lang, mut source }, Event::Text(t)) => {
                    source.push_str(&t);
                    Pending::Code { lang, source }
                }
                (pending @ Pending::Code { .. }, _) => pending,

                // ---- everything else ----
                (Pending::None, event) => {
                    let event = self.map_break(event);
                    self.out.push(event);
                    Pending::None
                }
            };
        }

        self.out
    }

    fn map_break(&self, event: Event<'a>) -> Event<'a> {
        match event {
            Event::SoftBreak if self.hard_breaks => Event::HardBreak,
            other => other,
        }
    }

    fn flush_heading(&mut self, start: Tag<'a>, inner: Vec<Event<'a>>, text: &str, end: TagEnd) {
        let Tag::Heading {
            level,
            id,
            classes,
            attrs,
        } = start
        else {
            return;
        };

        let id = match id {
            Some(explicit) => self.anchors.reserve(&explicit),
            None => self.anchors.unique(text),
        };

        self.out.push(Event::Start(Tag::Heading {
            level,
            id: Some(CowStr::from(id)),
            classes,
            attrs,
        }));
        self.out.extend(inner);
        self.out.push(Event::End(end));
    }
}

/// Language token of a fence info string (`rust,ignore` / `ts title=x`).
fn info_lang(info: &str) -> Option<String> {
    info.split(|c: char| c.is_whitespace() || c == ',' || c == '{')
        .next()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn md(input: &str) -> String {
        render(input, &MarkdownOptions::all())
    }

    #[test]
    fn test_heading_gets_id() {
        assert_eq!(md("# Hello"), "<h1 id=\"hello\">Hello</h1>\n");
    }

    #[test]
    fn test_duplicate_heading_ids() {
        let html = md("## Setup\n\n## Setup\n\n## Setup");
        assert!(html.contains("id=\"setup\""));
        assert!(html.contains("id=\"setup-1\""));
        assert!(html.contains("id=\"setup-2\""));
    }

    #[test]
    fn test_heading_with_inline_code() {
        let html = md("### Run `npm test` now");
        assert!(html.contains("<h3 id=\"run-npm-test-now\">"));
        assert!(html.contains("<code>npm test</code>"));
    }

    #[test]
    fn test_explicit_heading_id_kept() {
        let html = md("# Intro {#start}\n\n# Start");
        assert!(html.contains("<h1 id=\"start\">Intro</h1>"));
        assert!(html.contains("<h1 id=\"start-1\">Start</h1>"));
    }

    #[test]
    fn test_soft_break_is_br() {
        let html = md("line one\nline two");
        assert!(html.contains("line one<br />"));
    }

    #[test]
    fn test_soft_break_kept_when_disabled() {
        let opts = MarkdownOptions {
            hard_breaks: false,
            ..MarkdownOptions::all()
        };
        let html = render("a\nb", &opts);
        assert!(!html.contains("<br"));
    }

    #[test]
    fn test_gfm_extensions() {
        let html = md("| a | b |\n|---|---|\n| 1 | 2 |\n\n~~old~~\n\n- [x] done\n- [ ] todo\n\nNote[^1]\n\n[^1]: footnote");
        assert!(html.contains("<table>"));
        assert!(html.contains("<del>old</del>"));
        assert!(html.contains("type=\"checkbox\""));
        assert!(html.contains("checked"));
        assert!(html.contains("footnote-reference"));
    }

    #[test]
    fn test_fenced_code_is_highlighted() {
        let html = md("```rust\nfn main() {}\n```");
        assert!(html.contains("<pre"));
        assert!(html.contains("style="));
        assert!(html.contains("main"));
    }

    #[test]
    fn test_unknown_language_falls_back_to_plain() {
        let html = md("```nosuchlang\n<tag> & text\n```");
        assert!(html.contains("&lt;tag&gt; &amp; text"));
        assert!(!html.contains("<tag>"));
    }

    #[test]
    fn test_indented_code_escaped() {
        let html = md("    <b>x</b>");
        assert!(html.contains("&lt;b&gt;x&lt;/b&gt;"));
    }

    #[test]
    fn test_info_lang() {
        assert_eq!(info_lang("rust"), Some("rust".into()));
        assert_eq!(info_lang("rust,ignore"), Some("rust".into()));
        assert_eq!(info_lang("ts title=\"x\""), Some("ts".into()));
        assert_eq!(info_lang(""), None);
    }

    #[test]
    fn test_raw_html_passes_through() {
        let html = md("<div class=\"note\">hi</div>");
        assert!(html.contains("<div class=\"note\">hi</div>"));
    }
}
