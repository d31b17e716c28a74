//! Fenced code highlighting with syntect.

use std::sync::OnceLock;

use syntect::highlighting::{Theme, ThemeSet};
use syntect::html::highlighted_html_for_string;
use syntect::parsing::{SyntaxReference, SyntaxSet};

use crate::utils::html::escape;

const THEME: &str = "InspiredGitHub";

fn syntax_set() -> &'static SyntaxSet {
    static SET: OnceLock<SyntaxSet> = OnceLock::new();
    SET.get_or_init(SyntaxSet::load_defaults_newlines)
}

fn theme() -> Option<&'static Theme> {
    static THEMES: OnceLock<ThemeSet> = OnceLock::new();
    THEMES.get_or_init(ThemeSet::load_defaults).themes.get(THEME)
}

/// Map common fence names syntect does not know by token.
fn alias(lang: &str) -> &str {
    match lang {
        "ts" | "typescript" | "tsx" => "js",
        "sh" | "shell" | "zsh" | "console" => "bash",
        "yml" => "yaml",
        "toml" => "ini",
        "jsonc" | "json5" => "json",
        other => other,
    }
}

fn find_syntax(lang: &str) -> Option<&'static SyntaxReference> {
    let set = syntax_set();
    let lower = lang.to_ascii_lowercase();
    set.find_syntax_by_token(&lower)
        .or_else(|| set.find_syntax_by_token(alias(&lower)))
}

/// Render a code block. Unknown or missing languages fall back to an
/// escaped plain `<pre><code>`.
pub fn highlight_block(source: &str, lang: Option<&str>) -> String {
    let highlighted = lang
        .and_then(|lang| find_syntax(lang).zip(theme()))
        .and_then(|(syntax, theme)| highlighted_html_for_string(source, syntax_set(), syntax, theme).ok());

    match (highlighted, lang) {
        (Some(html), _) => html,
        (None, Some(lang)) => format!(
            "<pre><code class=\"language-{}\">{}</code></pre>\n",
            escape(lang),
            escape(source)
        ),
        (None, None) => format!("<pre><code>{}</code></pre>\n", escape(source)),
    }
}
