//! Image reference rewriting inside markdown text
//!
//! Three kinds of references are recognised outside code (fenced blocks,
//! indented blocks and inline code spans):
//!
//! - inline markdown images, `![alt](path "title")` or `![alt](<path>)`,
//!   which are turned into cell attachments (`attachment:<name>`);
//! - reference-style images, `![alt][label]`, `![alt][]` and `![alt]`,
//!   backed by a `[label]: path` definition in the same cell. They are
//!   rewritten to the inline attachment form and the definition is kept;
//! - HTML `<img src="path">` tags, whose `src` becomes a `data:` URI since
//!   attachments are not resolved inside raw HTML.
//!
//! Only local references are touched. Anything that parses as an absolute
//! URL (`https:`, `data:`, `attachment:` ...) is left as written, which is
//! what makes embedding idempotent.

use crate::domain::Result;
use regex::{Captures, Regex};
use std::collections::HashMap;
use std::sync::OnceLock;
use url::Url;

/// Receives the local references found in a markdown text
pub trait ImageSink {
    /// Stores the image as a cell attachment and returns the attachment name
    fn attach(&mut self, reference: &str) -> Result<String>;

    /// Returns a `data:` URI carrying the image
    fn data_uri(&mut self, reference: &str) -> Result<String>;
}

fn markdown_image_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r#"!\[(?P<alt>[^\]]*)\]\(\s*(?P<src><[^>\n]*>|[^\s()<>]+)(?P<title>\s+(?:"[^"\n]*"|'[^'\n]*'))?\s*\)"#,
        )
        .expect("markdown image pattern is valid")
    })
}

fn reference_image_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"!\[(?P<alt>[^\]]*)\](?:\[(?P<label>[^\]]*)\])?(?P<paren>\()?")
            .expect("reference image pattern is valid")
    })
}

fn link_definition_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r#"(?m)^ {0,3}\[(?P<label>[^\]\n]+)\]:[ \t]*(?P<dest><[^>\n]*>|\S+)(?:[ \t]+(?P<title>"[^"\n]*"|'[^'\n]*'|\([^)\n]*\)))?[ \t]*$"#,
        )
        .expect("link definition pattern is valid")
    })
}

fn html_image_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"(?i)(?P<head><img\b[^>]*?\bsrc\s*=\s*)(?:"(?P<dq>[^"]*)"|'(?P<sq>[^']*)')"#)
            .expect("html image pattern is valid")
    })
}

/// Whether a reference points at a local file rather than a URL
pub fn is_local_reference(reference: &str) -> bool {
    match Url::parse(reference) {
        Ok(_) => false,
        Err(url::ParseError::RelativeUrlWithoutBase) => true,
        // Bare Windows drive paths and similar odd inputs are not URLs either
        Err(_) => !reference.contains("://"),
    }
}

/// Target of a `[label]: dest "title"` definition
#[derive(Debug, Clone, PartialEq)]
struct LinkDefinition {
    dest: String,
    title: Option<String>,
}

type Definitions = HashMap<String, LinkDefinition>;

/// Rewrites every local image reference in `text`.
///
/// Returns `None` when nothing needed rewriting so callers can keep the
/// original source untouched.
///
/// # Errors
///
/// Propagates the first error raised by `sink`.
pub fn rewrite_images(text: &str, sink: &mut dyn ImageSink) -> Result<Option<String>> {
    let blocks = segments(text);
    let definitions = link_definitions(&blocks);

    let mut out = String::with_capacity(text.len());
    let mut changed = false;

    for block in &blocks {
        let prose = match block {
            Segment::Code(code) => {
                out.push_str(code);
                continue;
            }
            Segment::Prose(prose) => prose,
        };
        for piece in code_spans(prose) {
            match piece {
                Segment::Code(code) => out.push_str(code),
                Segment::Prose(piece) => match rewrite_prose(piece, &definitions, sink)? {
                    Some(rewritten) => {
                        changed = true;
                        out.push_str(&rewritten);
                    }
                    None => out.push_str(piece),
                },
            }
        }
    }

    Ok(changed.then_some(out))
}

fn rewrite_prose(
    text: &str,
    definitions: &Definitions,
    sink: &mut dyn ImageSink,
) -> Result<Option<String>> {
    let mut current = rewrite_markdown_images(text, sink)?;

    let next = rewrite_reference_images(current.as_deref().unwrap_or(text), definitions, sink)?;
    current = next.or(current);

    let next = rewrite_html_images(current.as_deref().unwrap_or(text), sink)?;
    Ok(next.or(current))
}

fn rewrite_markdown_images(text: &str, sink: &mut dyn ImageSink) -> Result<Option<String>> {
    replace_all(markdown_image_re(), text, |caps| {
        let src = unbracket(&caps["src"]);
        if !is_local_reference(src) {
            return Ok(None);
        }
        let name = sink.attach(src)?;
        let title = caps.name("title").map_or("", |m| m.as_str());
        Ok(Some(format!("![{}](attachment:{}{})", &caps["alt"], name, title)))
    })
}

fn rewrite_reference_images(
    text: &str,
    definitions: &Definitions,
    sink: &mut dyn ImageSink,
) -> Result<Option<String>> {
    if definitions.is_empty() {
        return Ok(None);
    }
    replace_all(reference_image_re(), text, |caps| {
        // `![alt](` is an inline image that was left alone
        if caps.name("paren").is_some() {
            return Ok(None);
        }
        let alt = &caps["alt"];
        let label = caps
            .name("label")
            .map(|m| m.as_str())
            .filter(|l| !l.trim().is_empty())
            .unwrap_or(alt);
        let Some(definition) = definitions.get(&normalize_label(label)) else {
            return Ok(None);
        };
        if !is_local_reference(&definition.dest) {
            return Ok(None);
        }
        let name = sink.attach(&definition.dest)?;
        let title = definition
            .title
            .as_deref()
            .map(|t| format!(" {t}"))
            .unwrap_or_default();
        Ok(Some(format!("![{alt}](attachment:{name}{title})")))
    })
}

fn rewrite_html_images(text: &str, sink: &mut dyn ImageSink) -> Result<Option<String>> {
    replace_all(html_image_re(), text, |caps| {
        let src = caps
            .name("dq")
            .or_else(|| caps.name("sq"))
            .map_or("", |m| m.as_str())
            .trim();
        if !is_local_reference(src) {
            return Ok(None);
        }
        let uri = sink.data_uri(src)?;
        Ok(Some(format!("{}\"{}\"", &caps["head"], uri)))
    })
}

fn unbracket(raw: &str) -> &str {
    raw.strip_prefix('<')
        .and_then(|s| s.strip_suffix('>'))
        .unwrap_or(raw)
        .trim()
}

/// Case-insensitive label with runs of whitespace collapsed
fn normalize_label(label: &str) -> String {
    label
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Collects `[label]: dest` definitions outside code blocks. The first
/// definition of a label wins.
fn link_definitions(blocks: &[Segment<'_>]) -> Definitions {
    let mut definitions = Definitions::new();
    for block in blocks {
        let Segment::Prose(prose) = block else {
            continue;
        };
        for caps in link_definition_re().captures_iter(prose) {
            definitions
                .entry(normalize_label(&caps["label"]))
                .or_insert_with(|| LinkDefinition {
                    dest: unbracket(&caps["dest"]).to_string(),
                    title: caps.name("title").map(|m| m.as_str().to_string()),
                });
        }
    }
    definitions
}

/// Like `Regex::replace_all`, but the replacement may fail or decline
/// (`Ok(None)` keeps the match as written).
fn replace_all<F>(re: &Regex, text: &str, mut replace: F) -> Result<Option<String>>
where
    F: FnMut(&Captures<'_>) -> Result<Option<String>>,
{
    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    let mut changed = false;

    for caps in re.captures_iter(text) {
        let whole = caps.get(0).expect("capture group 0 always exists");
        if let Some(replacement) = replace(&caps)? {
            out.push_str(&text[last..whole.start()]);
            out.push_str(&replacement);
            last = whole.end();
            changed = true;
        }
    }

    if !changed {
        return Ok(None);
    }
    out.push_str(&text[last..]);
    Ok(Some(out))
}

#[derive(Debug, PartialEq)]
enum Segment<'a> {
    Prose(&'a str),
    Code(&'a str),
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Block {
    Prose,
    Fenced(char, usize),
    Indented,
}

/// Splits markdown into prose and code blocks.
///
/// Code blocks are fenced (``` or ~~~, an unterminated fence runs to the
/// end of the text) or indented by four spaces or a tab. An indented block
/// only starts after a blank line and never inside a list, where the
/// indentation belongs to the list item.
fn segments(text: &str) -> Vec<Segment<'_>> {
    let mut result = Vec::new();
    let mut start = 0;
    let mut offset = 0;
    let mut block = Block::Prose;
    let mut after_blank = true;
    let mut in_list = false;

    for line in text.split_inclusive('\n') {
        let trimmed = line.trim_start_matches(' ');
        let indent = line.len() - trimmed.len();
        let blank = trimmed.trim().is_empty();
        let code_indent = !blank && (indent >= 4 || trimmed.starts_with('\t'));

        if block == Block::Indented && !blank && !code_indent {
            result.push(Segment::Code(&text[start..offset]));
            start = offset;
            block = Block::Prose;
        }

        match block {
            Block::Fenced(ch, len) => {
                let closes = fence_marker(trimmed)
                    .filter(|_| indent <= 3)
                    .is_some_and(|(close_ch, close_len)| {
                        close_ch == ch && close_len >= len && trimmed[close_len..].trim().is_empty()
                    });
                if closes {
                    let end = offset + line.len();
                    result.push(Segment::Code(&text[start..end]));
                    start = end;
                    block = Block::Prose;
                    after_blank = false;
                }
            }
            Block::Indented => {}
            Block::Prose => {
                let fence = fence_marker(trimmed).filter(|_| indent <= 3);
                let opens_indented = code_indent && after_blank && !in_list;
                if fence.is_some() || opens_indented {
                    if offset > start {
                        result.push(Segment::Prose(&text[start..offset]));
                    }
                    start = offset;
                    block = match fence {
                        Some((ch, len)) => Block::Fenced(ch, len),
                        None => Block::Indented,
                    };
                } else if !blank && indent <= 3 {
                    if is_list_item(trimmed) {
                        in_list = true;
                    } else if after_blank && indent == 0 {
                        in_list = false;
                    }
                }
                after_blank = blank;
            }
        }
        offset += line.len();
    }

    if start < text.len() {
        let rest = &text[start..];
        result.push(match block {
            Block::Prose => Segment::Prose(rest),
            Block::Fenced(..) | Block::Indented => Segment::Code(rest),
        });
    }
    result
}

fn fence_marker(line: &str) -> Option<(char, usize)> {
    let ch = line.chars().next().filter(|c| *c == '`' || *c == '~')?;
    let len = line.chars().take_while(|c| *c == ch).count();
    (len >= 3).then_some((ch, len))
}

/// `- item`, `* item`, `+ item`, `1. item` or `1) item`
fn is_list_item(line: &str) -> bool {
    let rest = match line.chars().next() {
        Some('-' | '*' | '+') => &line[1..],
        Some(c) if c.is_ascii_digit() => {
            let digits = line.chars().take_while(char::is_ascii_digit).count();
            match line[digits..].chars().next() {
                Some('.' | ')') if digits <= 9 => &line[digits + 1..],
                _ => return false,
            }
        }
        _ => return false,
    };
    rest.is_empty() || rest.starts_with([' ', '\t', '\n', '\r'])
}

/// Splits a prose block into text and inline code spans. A span opens with
/// a run of backticks and closes at the next run of the same length within
/// the same paragraph; an unmatched run is plain text.
fn code_spans(text: &str) -> Vec<Segment<'_>> {
    let bytes = text.as_bytes();
    let mut result = Vec::new();
    let mut start = 0;
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] != b'`' {
            i += 1;
            continue;
        }
        let run = backtick_run(bytes, i);
        if i > 0 && bytes[i - 1] == b'\\' {
            i += run;
            continue;
        }
        match closing_run(text, i + run, run) {
            Some(end) => {
                if i > start {
                    result.push(Segment::Prose(&text[start..i]));
                }
                result.push(Segment::Code(&text[i..end]));
                start = end;
                i = end;
            }
            None => i += run,
        }
    }

    if start < text.len() {
        result.push(Segment::Prose(&text[start..]));
    }
    result
}

fn backtick_run(bytes: &[u8], from: usize) -> usize {
    bytes[from..].iter().take_while(|b| **b == b'`').count()
}

/// End offset of the closing backtick run, if the paragraph has one
fn closing_run(text: &str, from: usize, run: usize) -> Option<usize> {
    let bytes = text.as_bytes();
    let mut i = from;
    while i < bytes.len() {
        match bytes[i] {
            b'`' => {
                let n = backtick_run(bytes, i);
                if n == run {
                    return Some(i + n);
                }
                i += n;
            }
            b'\n' => {
                let next_line = text[i + 1..].split('\n').next().unwrap_or("");
                if next_line.trim().is_empty() {
                    return None;
                }
                i += 1;
            }
            _ => i += 1,
        }
    }
    None
}
