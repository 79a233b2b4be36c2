//! Minimal markdown model for assistant replies.
//!
//! Only what the assistant actually emits: bullet lines, blank lines and the
//! `**bold**`, `*italic*` and `` `code` `` inline spans.

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Span {
    Text(String),
    Bold(String),
    Italic(String),
    Code(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Paragraph(Vec<Span>),
    Bullet(Vec<Span>),
    Blank,
}

const BULLET_MARKERS: [&str; 3] = ["• ", "* ", "- "];

pub fn parse(text: &str) -> Vec<Block> {
    text.lines()
        .map(|line| {
            if let Some(item) = BULLET_MARKERS.iter().find_map(|m| line.strip_prefix(m)) {
                Block::Bullet(parse_inline(item))
            } else if line.trim().is_empty() {
                Block::Blank
            } else {
                Block::Paragraph(parse_inline(line))
            }
        })
        .collect()
}

pub fn parse_inline(line: &str) -> Vec<Span> {
    let mut spans = Vec::new();
    let mut text = String::new();
    let mut rest = line;

    while let Some(ch) = rest.chars().next() {
        if let Some((span, after)) = take_delimited(rest) {
            if !text.is_empty() {
                spans.push(Span::Text(std::mem::take(&mut text)));
            }
            spans.push(span);
            rest = after;
            continue;
        }
        text.push(ch);
        rest = &rest[ch.len_utf8()..];
    }

    if !text.is_empty() {
        spans.push(Span::Text(text));
    }
    spans
}

fn take_delimited(s: &str) -> Option<(Span, &str)> {
    let rules: [(&str, fn(String) -> Span); 3] = [
        ("**", Span::Bold),
        ("`", Span::Code),
        ("*", Span::Italic),
    ];

    for (marker, make) in rules {
        let Some(body) = s.strip_prefix(marker) else {
            continue;
        };
        let Some(end) = body.find(marker) else {
            continue;
        };
        let inner = &body[..end];
        // Emphasis may not nest asterisks; code may hold anything.
        if inner.is_empty() || (marker != "`" && inner.contains('*')) {
            continue;
        }
        return Some((make(inner.to_string()), &body[end + marker.len()..]));
    }
    None
}
