//! Inline markup sanitization.
//!
//! Card text may carry a small set of formatting tags. The tokenizer walks a
//! line once and splits it into literal text and recognised tags; anything
//! else that starts with `<` stays literal and is escaped on output.

use std::borrow::Cow;

/// Formatting tags that survive sanitization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tag {
    Bold,
    Italic,
    Underline,
    Strikethrough,
    Subscript,
    Superscript,
    Font,
    Color,
}

impl Tag {
    const ALL: [Tag; 8] = [
        Tag::Bold,
        Tag::Italic,
        Tag::Underline,
        Tag::Strikethrough,
        Tag::Subscript,
        Tag::Superscript,
        Tag::Font,
        Tag::Color,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Tag::Bold => "b",
            Tag::Italic => "i",
            Tag::Underline => "u",
            Tag::Strikethrough => "strikethrough",
            Tag::Subscript => "sub",
            Tag::Superscript => "sup",
            Tag::Font => "font",
            Tag::Color => "color",
        }
    }

    /// Whether the opening form may carry attributes (`<font size="9">`).
    fn takes_attributes(self) -> bool {
        matches!(self, Tag::Font | Tag::Color)
    }
}

/// One piece of a tokenized line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Span<'a> {
    Text(&'a str),
    Open { tag: Tag, attrs: &'a str },
    Close(Tag),
    Break,
}

/// Split `input` into text and whitelisted tags.
///
/// Adjacent literal characters are merged into a single [`Span::Text`]. A `<`
/// that does not begin a whitelisted tag is part of the surrounding text.
pub fn tokenize(input: &str) -> Vec<Span<'_>> {
    let mut spans = Vec::new();
    let mut text_start = 0;
    let mut cursor = 0;

    while let Some(offset) = input[cursor..].find('<') {
        let at = cursor + offset;
        match match_tag(&input[at..]) {
            Some((span, len)) => {
                if text_start < at {
                    spans.push(Span::Text(&input[text_start..at]));
                }
                spans.push(span);
                cursor = at + len;
                text_start = cursor;
            }
            None => cursor = at + 1,
        }
    }
    if text_start < input.len() {
        spans.push(Span::Text(&input[text_start..]));
    }
    spans
}

/// Try to read a whitelisted tag at the start of `s` (which begins with `<`).
fn match_tag(s: &str) -> Option<(Span<'_>, usize)> {
    for br in ["<br>", "<br/>", "<br />"] {
        if s.starts_with(br) {
            return Some((Span::Break, br.len()));
        }
    }

    if let Some(rest) = s.strip_prefix("</") {
        for tag in Tag::ALL {
            if rest.strip_prefix(tag.name()).is_some_and(|r| r.starts_with('>')) {
                return Some((Span::Close(tag), 2 + tag.name().len() + 1));
            }
        }
        return None;
    }

    let rest = &s[1..];
    for tag in Tag::ALL {
        let Some(after) = rest.strip_prefix(tag.name()) else {
            continue;
        };
        if after.starts_with('>') {
            return Some((Span::Open { tag, attrs: "" }, 1 + tag.name().len() + 1));
        }
        if tag.takes_attributes() && after.starts_with(char::is_whitespace) {
            let end = after.find(['>', '<'])?;
            if !after[end..].starts_with('>') {
                return None;
            }
            let attrs = after[..end].trim();
            return Some((Span::Open { tag, attrs }, 1 + tag.name().len() + end + 1));
        }
    }
    None
}

/// Normalize escapes and neutralize markup outside the whitelist.
///
/// `\n` (optionally followed by spaces) becomes a line break and `\t` a tab,
/// then the result is trimmed of surrounding tabs and spaces. Running it on its
/// own output changes nothing.
pub fn sanitize(raw: &str) -> String {
    let expanded = expand_escapes(raw);
    let trimmed = trim_blanks(&expanded);

    let mut out = String::with_capacity(trimmed.len() + 8);
    for span in tokenize(trimmed) {
        write_span(&mut out, &span);
    }
    out
}

fn write_span(out: &mut String, span: &Span<'_>) {
    match span {
        Span::Text(text) => out.push_str(&escape_lt(text)),
        Span::Open { tag, attrs } if attrs.is_empty() => {
            out.push('<');
            out.push_str(tag.name());
            out.push('>');
        }
        Span::Open { tag, attrs } => {
            out.push('<');
            out.push_str(tag.name());
            out.push(' ');
            out.push_str(attrs);
            out.push('>');
        }
        Span::Close(tag) => {
            out.push_str("</");
            out.push_str(tag.name());
            out.push('>');
        }
        Span::Break => out.push_str("<br/>"),
    }
}

fn escape_lt(text: &str) -> Cow<'_, str> {
    if text.contains('<') {
        Cow::Owned(text.replace('<', "&lt;"))
    } else {
        Cow::Borrowed(text)
    }
}

fn expand_escapes(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        match chars.peek() {
            Some('n') => {
                chars.next();
                out.push('\n');
                while chars.peek() == Some(&' ') {
                    chars.next();
                }
            }
            Some('t') => {
                chars.next();
                out.push('\t');
            }
            _ => out.push(ch),
        }
    }
    out
}

/// Trim leading and trailing runs of tabs and spaces.
pub fn trim_blanks(text: &str) -> &str {
    text.trim_matches([' ', '\t'])
}

/// Replace the entities produced by sanitization with the characters they stand for.
pub fn decode_entities(text: &str) -> Cow<'_, str> {
    if !text.contains('&') {
        return Cow::Borrowed(text);
    }
    Cow::Owned(
        text.replace("&lt;", "<")
            .replace("&gt;", ">")
            .replace("&amp;", "&"),
    )
}
