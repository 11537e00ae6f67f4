//! Drawing parsed blocks as HTML or plain text

use crate::markup::{Block, Inline, ListItem};

/// HTML fragment for a block tree. Text is escaped.
pub fn to_html(blocks: &[Block]) -> String {
    let mut out = String::new();
    for block in blocks {
        match block {
            Block::Heading { level, inlines } => {
                let level = (*level).clamp(1, 6);
                out.push_str(&format!("<h{}>", level));
                push_inlines_html(&mut out, inlines);
                out.push_str(&format!("</h{}>", level));
            }
            Block::NumberedList { items } => push_list_html(&mut out, "ol", items),
            Block::BulletList { items } => push_list_html(&mut out, "ul", items),
            Block::Paragraph { inlines } => {
                out.push_str("<p>");
                push_inlines_html(&mut out, inlines);
                out.push_str("</p>");
            }
        }
    }
    out
}

fn push_list_html(out: &mut String, tag: &str, items: &[ListItem]) {
    out.push_str(&format!("<{}>", tag));
    for item in items {
        if item.depth > 0 {
            out.push_str(&format!("<li class=\"depth-{}\">", item.depth));
        } else {
            out.push_str("<li>");
        }
        out.push_str("<span class=\"marker\">");
        out.push_str(&escape_html(&item.marker));
        out.push_str("</span> ");
        if let Some(title) = &item.title {
            out.push_str("<strong>");
            out.push_str(&escape_html(title));
            out.push_str("</strong>");
            if !item.content.is_empty() {
                out.push_str(": ");
            }
        }
        push_inlines_html(out, &item.content);
        out.push_str("</li>");
    }
    out.push_str(&format!("</{}>", tag));
}

fn push_inlines_html(out: &mut String, inlines: &[Inline]) {
    for (i, inline) in inlines.iter().enumerate() {
        match inline {
            Inline::Text(text) => out.push_str(&escape_html(text)),
            Inline::Bold(text) => {
                out.push_str("<strong>");
                out.push_str(&escape_html(text));
                out.push_str("</strong>");
            }
            Inline::Marker(marker) => {
                out.push_str("<span class=\"marker\">");
                out.push_str(&escape_html(marker));
                out.push_str("</span>");
                if i + 1 < inlines.len() {
                    out.push(' ');
                }
            }
            Inline::LineBreak => out.push_str("<br>"),
        }
    }
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// Plain terminal text; blocks are separated by a blank line
pub fn to_plain(blocks: &[Block]) -> String {
    let rendered: Vec<String> = blocks
        .iter()
        .map(|block| match block {
            Block::Heading { inlines, .. } => plain_inlines(inlines),
            Block::NumberedList { items } | Block::BulletList { items } => items
                .iter()
                .map(plain_item)
                .collect::<Vec<_>>()
                .join("\n"),
            Block::Paragraph { inlines } => plain_inlines(inlines),
        })
        .collect();
    rendered.join("\n\n")
}

fn plain_item(item: &ListItem) -> String {
    let indent = "  ".repeat(item.depth as usize);
    let content = plain_inlines(&item.content);
    match &item.title {
        Some(title) if content.is_empty() => format!("{}{} {}", indent, item.marker, title),
        Some(title) => format!("{}{} {}: {}", indent, item.marker, title, content),
        None => format!("{}{} {}", indent, item.marker, content),
    }
}

fn plain_inlines(inlines: &[Inline]) -> String {
    let mut out = String::new();
    for (i, inline) in inlines.iter().enumerate() {
        match inline {
            Inline::Text(text) | Inline::Bold(text) => out.push_str(text),
            Inline::Marker(marker) => {
                out.push_str(marker);
                if i + 1 < inlines.len() {
                    out.push(' ');
                }
            }
            Inline::LineBreak => out.push('\n'),
        }
    }
    out
}
