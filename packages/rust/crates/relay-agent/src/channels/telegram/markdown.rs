use pulldown_cmark::{Event, Options, Parser, Tag, TagEnd};

/// Render relay markdown (`**bold**`, `_italic_`, lists, links) as Telegram HTML.
///
/// Raw HTML in the input is escaped, never passed through.
pub fn markdown_to_telegram_html(markdown: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_STRIKETHROUGH);

    let mut rendered = String::with_capacity(markdown.len() + 32);
    let mut lists: Vec<Option<u64>> = Vec::new();

    for event in Parser::new_ext(markdown, options) {
        match event {
            Event::Start(tag) => match tag {
                Tag::Strong | Tag::Heading { .. } => rendered.push_str("<b>"),
                Tag::Emphasis => rendered.push_str("<i>"),
                Tag::Strikethrough => rendered.push_str("<s>"),
                Tag::CodeBlock(_) => rendered.push_str("<pre><code>"),
                Tag::Link { dest_url, .. } => {
                    rendered.push_str("<a href=\"");
                    rendered.push_str(&escape_html_attr(&dest_url));
                    rendered.push_str("\">");
                }
                Tag::List(start) => lists.push(start),
                Tag::Item => {
                    if !rendered.is_empty() && !rendered.ends_with('\n') {
                        rendered.push('\n');
                    }
                    match lists.last_mut() {
                        Some(Some(number)) => {
                            rendered.push_str(&format!("{number}. "));
                            *number += 1;
                        }
                        _ => rendered.push_str("• "),
                    }
                }
                Tag::BlockQuote(_) => rendered.push_str("&gt; "),
                _ => {}
            },
            Event::End(tag_end) => match tag_end {
                TagEnd::Strong => rendered.push_str("</b>"),
                TagEnd::Heading(_) => rendered.push_str("</b>\n\n"),
                TagEnd::Emphasis => rendered.push_str("</i>"),
                TagEnd::Strikethrough => rendered.push_str("</s>"),
                TagEnd::CodeBlock => rendered.push_str("</code></pre>\n\n"),
                TagEnd::Link => rendered.push_str("</a>"),
                TagEnd::Paragraph => rendered.push_str("\n\n"),
                TagEnd::List(_) => {
                    lists.pop();
                    rendered.push('\n');
                }
                _ => {}
            },
            Event::Text(text) | Event::Html(text) | Event::InlineHtml(text) => {
                rendered.push_str(&escape_html_text(&text));
            }
            Event::Code(text) => {
                rendered.push_str("<code>");
                rendered.push_str(&escape_html_text(&text));
                rendered.push_str("</code>");
            }
            Event::SoftBreak | Event::HardBreak => rendered.push('\n'),
            Event::Rule => rendered.push_str("\n----\n"),
            _ => {}
        }
    }

    let trimmed_len = rendered.trim_end_matches('\n').len();
    rendered.truncate(trimmed_len);
    if rendered.is_empty() {
        escape_html_text(markdown)
    } else {
        rendered
    }
}

fn escape_html_text(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

fn escape_html_attr(text: &str) -> String {
    escape_html_text(text).replace('"', "&quot;")
}
