//! Markdown rendering.
//!
//! Bodies are parsed with pulldown-cmark (tables, footnotes, strikethrough,
//! task lists). Fenced code blocks are highlighted at build time with syntect:
//! each token becomes a `<span>` carrying `hl-` prefixed scope classes, which
//! `static/highlight.css` colours for both themes. Unknown languages fall
//! back to plain text inside the same `<pre class="highlight">` wrapper.

use maud::{PreEscaped, html};
use pulldown_cmark::{
    CodeBlockKind, Event, HeadingLevel, Options, Parser, Tag, TagEnd, html as md_html,
};
use std::sync::LazyLock;
use syntect::html::{ClassStyle, ClassedHTMLGenerator};
use syntect::parsing::SyntaxSet;
use syntect::util::LinesWithEndings;

static SYNTAXES: LazyLock<SyntaxSet> = LazyLock::new(SyntaxSet::load_defaults_newlines);

const CLASS_STYLE: ClassStyle = ClassStyle::SpacedPrefixed { prefix: "hl-" };

fn options() -> Options {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_FOOTNOTES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);
    options
}

/// Render markdown to HTML with highlighted code blocks.
pub fn render_markdown(markdown: &str) -> String {
    let mut events = Vec::new();
    let mut code_lang: Option<String> = None;
    let mut code = String::new();

    for event in Parser::new_ext(markdown, options()) {
        match event {
            Event::Start(Tag::CodeBlock(kind)) => {
                code_lang = Some(match kind {
                    CodeBlockKind::Fenced(info) => {
                        info.split_whitespace().next().unwrap_or("").to_string()
                    }
                    CodeBlockKind::Indented => String::new(),
                });
                code.clear();
            }
            Event::Text(text) if code_lang.is_some() => code.push_str(&text),
            Event::End(TagEnd::CodeBlock) => {
                if let Some(lang) = code_lang.take() {
                    events.push(Event::Html(highlight_code(&code, &lang).into()));
                }
            }
            other => events.push(other),
        }
    }

    let mut body_html = String::new();
    md_html::push_html(&mut body_html, events.into_iter());
    body_html
}

/// One highlighted `<pre>` block. `lang` is the fence info token, possibly empty.
pub fn highlight_code(code: &str, lang: &str) -> String {
    let syntax = SYNTAXES
        .find_syntax_by_token(lang)
        .unwrap_or_else(|| SYNTAXES.find_syntax_plain_text());
    let mut generator = ClassedHTMLGenerator::new_with_class_style(syntax, &SYNTAXES, CLASS_STYLE);

    let mut highlighted = true;
    for line in LinesWithEndings::from(code) {
        if generator
            .parse_html_for_line_which_includes_newline(line)
            .is_err()
        {
            highlighted = false;
            break;
        }
    }

    html! {
        pre.highlight {
            code class=[(!lang.is_empty()).then(|| format!("language-{lang}"))] {
                @if highlighted {
                    (PreEscaped(generator.finalize()))
                } @else {
                    (code)
                }
            }
        }
    }
    .into_string()
}

/// Plain text of a markdown document, whitespace collapsed to single spaces.
///
/// Only text and inline code contribute, so entities and angle brackets come
/// out as the reader sees them rather than escaped.
pub fn markdown_text(markdown: &str) -> String {
    let mut text = String::new();
    for event in Parser::new_ext(markdown, options()) {
        match event {
            Event::Text(t) | Event::Code(t) => text.push_str(&t),
            Event::SoftBreak | Event::HardBreak => text.push(' '),
            Event::End(TagEnd::Paragraph | TagEnd::Heading(_) | TagEnd::Item | TagEnd::CodeBlock) => {
                text.push(' ')
            }
            _ => {}
        }
    }
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Text of the first level-one heading, ignoring anything inside code blocks.
pub fn first_heading(markdown: &str) -> Option<String> {
    let mut heading: Option<String> = None;
    for event in Parser::new_ext(markdown, options()) {
        match event {
            Event::Start(Tag::Heading {
                level: HeadingLevel::H1,
                ..
            }) => heading = Some(String::new()),
            Event::Text(t) | Event::Code(t) => {
                if let Some(h) = heading.as_mut() {
                    h.push_str(&t);
                }
            }
            Event::End(TagEnd::Heading(HeadingLevel::H1)) => {
                if let Some(h) = heading.take() {
                    let h = h.trim();
                    if !h.is_empty() {
                        return Some(h.to_string());
                    }
                }
            }
            _ => {}
        }
    }
    None
}
