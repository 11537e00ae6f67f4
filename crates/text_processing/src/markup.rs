//! Markup parser
//!
//! Text is split into paragraphs on blank lines. Each line is classified, in
//! priority order, as:
//! 1. a fully bold line (`**Title**`, optionally after an emoji), a heading
//! 2. a `#`/`##`/`###` heading
//! 3. a short Title-Case line, a heading
//! 4. a numbered item (`1. text`, `1. **Title**: text`)
//! 5. a bullet item (`- text`, `• text`, `🔹 **Title** text`), indentation nests
//! 6. an emoji-led line
//! 7. plain text
//!
//! Consecutive numbered items form one list, as do consecutive bullets. Other
//! consecutive lines form a paragraph joined by line breaks.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use unicode_segmentation::UnicodeSegmentation;

static HEADING_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(#{1,3})\s+(.+)$").unwrap());
static BOLD_LINE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\*\*([^*]+)\*\*:?$").unwrap());
static NUMBERED_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d+)\.\s+(.*)$").unwrap());
static BULLET_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(?:-|•|🔹)\s+(.*)$").unwrap());
static TITLED_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\*\*([^*]+)\*\*:?\s*(.*)$").unwrap());
static BOLD_SPAN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*\*([^*]+)\*\*").unwrap());

/// Longest accepted Title-Case heading, in characters (exclusive)
const TITLE_LINE_MAX: usize = 30;

/// Structural unit of a rendered message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    Heading { level: u8, inlines: Vec<Inline> },
    NumberedList { items: Vec<ListItem> },
    BulletList { items: Vec<ListItem> },
    Paragraph { inlines: Vec<Inline> },
}

/// Inline run of text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Inline {
    Text(String),
    Bold(String),
    /// Leading emoji marker
    Marker(String),
    LineBreak,
}

/// Item of a numbered or bullet list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListItem {
    /// `1.` for numbered items, the bullet glyph otherwise
    pub marker: String,
    /// Bold lead-in (`**Title**:`), without the colon
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub content: Vec<Inline>,
    /// Nesting level; every two columns of indentation is one level
    pub depth: u8,
}

enum Line {
    Heading(Block),
    Numbered(ListItem),
    Bullet(ListItem),
    Text(Vec<Inline>),
}

enum Pending {
    Numbered(Vec<ListItem>),
    Bullets(Vec<ListItem>),
    Paragraph(Vec<Inline>),
}

impl Pending {
    fn into_block(self) -> Block {
        match self {
            Pending::Numbered(items) => Block::NumberedList { items },
            Pending::Bullets(items) => Block::BulletList { items },
            Pending::Paragraph(inlines) => Block::Paragraph { inlines },
        }
    }
}

/// Parse message text into blocks. Deterministic; never fails.
pub fn render(text: &str) -> Vec<Block> {
    let normalized = text.replace("\r\n", "\n");
    let mut blocks = Vec::new();

    for paragraph in split_paragraphs(&normalized) {
        let mut pending: Option<Pending> = None;

        for raw in paragraph {
            let line = classify(raw);
            pending = match (pending.take(), line) {
                (Some(Pending::Numbered(mut items)), Line::Numbered(item)) => {
                    items.push(item);
                    Some(Pending::Numbered(items))
                }
                (Some(Pending::Bullets(mut items)), Line::Bullet(item)) => {
                    items.push(item);
                    Some(Pending::Bullets(items))
                }
                (Some(Pending::Paragraph(mut inlines)), Line::Text(more)) => {
                    inlines.push(Inline::LineBreak);
                    inlines.extend(more);
                    Some(Pending::Paragraph(inlines))
                }
                (previous, line) => {
                    if let Some(previous) = previous {
                        blocks.push(previous.into_block());
                    }
                    match line {
                        Line::Heading(block) => {
                            blocks.push(block);
                            None
                        }
                        Line::Numbered(item) => Some(Pending::Numbered(vec![item])),
                        Line::Bullet(item) => Some(Pending::Bullets(vec![item])),
                        Line::Text(inlines) => Some(Pending::Paragraph(inlines)),
                    }
                }
            };
        }

        if let Some(last) = pending {
            blocks.push(last.into_block());
        }
    }

    blocks
}

fn split_paragraphs(text: &str) -> Vec<Vec<&str>> {
    let mut paragraphs = Vec::new();
    let mut current = Vec::new();
    for line in text.lines() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                paragraphs.push(std::mem::take(&mut current));
            }
        } else {
            current.push(line.trim_end());
        }
    }
    if !current.is_empty() {
        paragraphs.push(current);
    }
    paragraphs
}

fn classify(raw: &str) -> Line {
    let (depth, line) = split_indent(raw);

    let (marker, rest) = split_emoji(line);
    if let Some(caps) = BOLD_LINE_RE.captures(rest) {
        let mut inlines = Vec::new();
        let level = match marker {
            Some(marker) => {
                inlines.push(Inline::Marker(marker.to_string()));
                2
            }
            None => 3,
        };
        inlines.push(Inline::Text(caps[1].trim().to_string()));
        return Line::Heading(Block::Heading { level, inlines });
    }

    if let Some(caps) = HEADING_RE.captures(line) {
        return Line::Heading(Block::Heading {
            level: caps[1].len() as u8,
            inlines: parse_inlines(caps[2].trim()),
        });
    }

    if depth == 0 && is_title_case_line(line) {
        return Line::Heading(Block::Heading {
            level: 3,
            inlines: vec![Inline::Text(line.to_string())],
        });
    }

    if let Some(caps) = NUMBERED_RE.captures(line) {
        let (title, content) = titled(&caps[2]);
        return Line::Numbered(ListItem {
            marker: format!("{}.", &caps[1]),
            title,
            content,
            depth,
        });
    }

    if let Some(caps) = BULLET_RE.captures(line) {
        let glyph = line.graphemes(true).next().unwrap_or("-");
        let (title, content) = titled(&caps[1]);
        return Line::Bullet(ListItem {
            marker: glyph.to_string(),
            title,
            content,
            depth,
        });
    }

    if let Some(marker) = marker {
        let mut inlines = vec![Inline::Marker(marker.to_string())];
        if !rest.is_empty() {
            inlines.extend(parse_inlines(rest));
        }
        return Line::Text(inlines);
    }

    Line::Text(parse_inlines(line))
}

/// Split `**Title**: rest` into a title and content inlines
fn titled(text: &str) -> (Option<String>, Vec<Inline>) {
    match TITLED_RE.captures(text) {
        Some(caps) => {
            let title = caps[1].trim().trim_end_matches(':').trim_end().to_string();
            let rest = caps[2].trim_start_matches(':').trim_start();
            (Some(title), parse_inlines(rest))
        }
        None => (None, parse_inlines(text)),
    }
}

/// Indentation depth and the line without its indentation
fn split_indent(line: &str) -> (u8, &str) {
    let trimmed = line.trim_start();
    let width: usize = line[..line.len() - trimmed.len()]
        .chars()
        .map(|c| if c == '\t' { 4 } else { 1 })
        .sum();
    ((width / 2).min(u8::MAX as usize) as u8, trimmed)
}

/// Leading emoji grapheme, if any, and the remaining text
fn split_emoji(line: &str) -> (Option<&str>, &str) {
    match line.graphemes(true).next() {
        Some(first) if is_emoji(first) => (Some(first), line[first.len()..].trim_start()),
        _ => (None, line),
    }
}

fn is_emoji(grapheme: &str) -> bool {
    grapheme.chars().next().map_or(false, |c| {
        matches!(c as u32,
            0x1F300..=0x1FAFF | 0x2600..=0x27BF | 0x2B00..=0x2BFF | 0x23E9..=0x23FA | 0x2139 | 0x24C2)
    })
}

fn is_title_case_line(line: &str) -> bool {
    if line.chars().count() >= TITLE_LINE_MAX {
        return false;
    }
    if !line.chars().all(|c| c.is_alphabetic() || c == ' ') {
        return false;
    }
    let mut words = line.unicode_words().peekable();
    words.peek().is_some() && words.all(|w| w.chars().next().map_or(false, char::is_uppercase))
}

/// Split text into plain and `**bold**` runs; unmatched markers stay text
pub fn parse_inlines(text: &str) -> Vec<Inline> {
    let mut inlines = Vec::new();
    let mut cursor = 0;
    for caps in BOLD_SPAN_RE.captures_iter(text) {
        let (Some(whole), Some(inner)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        if whole.start() > cursor {
            inlines.push(Inline::Text(text[cursor..whole.start()].to_string()));
        }
        inlines.push(Inline::Bold(inner.as_str().to_string()));
        cursor = whole.end();
    }
    if cursor < text.len() {
        inlines.push(Inline::Text(text[cursor..].to_string()));
    }
    inlines
}
