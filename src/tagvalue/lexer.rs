//! Splits comment-free tag-value text into `(tag, value)` pairs.

use crate::error::{Error, Result};
use std::io::{BufRead, Lines};

/// One `Tag: Value` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagValue {
    /// The tag as written.
    pub tag: String,
    /// The value with `<text>` markers and a `SHA1: ` prefix removed.
    pub value: String,
    /// Line the tag starts on, counted after comment removal.
    pub line: usize,
}

/// An entry still collecting continuation lines.
#[derive(Debug)]
struct Partial {
    tag: String,
    raw: String,
    line: usize,
    in_text: bool,
}

impl Partial {
    fn push_line(&mut self, line: &str) {
        self.raw.push('\n');
        self.raw.push_str(line);
        self.in_text = text_open_after(line, self.in_text);
    }

    fn finish(self) -> TagValue {
        TagValue {
            tag: self.tag,
            value: normalize_value(&self.raw),
            line: self.line,
        }
    }
}

/// Iterator over the entries of a tag-value stream.
///
/// A tag is one or more ASCII alphanumerics at the start of a line,
/// followed by `:` and a space (or the end of the line). Lines that do not
/// start with a tag, and every line inside an open `<text>` block, continue
/// the previous value.
#[derive(Debug)]
pub struct Lexer<R> {
    lines: Lines<R>,
    line_no: usize,
    partial: Option<Partial>,
    done: bool,
}

impl<R: BufRead> Lexer<R> {
    /// Read entries from `reader`, which should already be free of comments.
    pub fn new(reader: R) -> Self {
        Lexer {
            lines: reader.lines(),
            line_no: 0,
            partial: None,
            done: false,
        }
    }

    fn step(&mut self) -> Result<Option<TagValue>> {
        loop {
            let line = match self.lines.next() {
                Some(line) => line?,
                None => {
                    return match self.partial.take() {
                        Some(p) if p.in_text => Err(Error::UnterminatedText { line: p.line }),
                        Some(p) => Ok(Some(p.finish())),
                        None => Ok(None),
                    };
                }
            };
            self.line_no += 1;

            if let Some(partial) = self.partial.as_mut() {
                if partial.in_text {
                    partial.push_line(&line);
                    continue;
                }
            }

            match split_tag(&line) {
                Some((tag, rest)) => {
                    let in_text = text_open_after(rest, false);
                    let started = Partial {
                        tag: tag.to_string(),
                        raw: rest.to_string(),
                        line: self.line_no,
                        in_text,
                    };
                    if let Some(finished) = self.partial.replace(started) {
                        return Ok(Some(finished.finish()));
                    }
                }
                None => match self.partial.as_mut() {
                    Some(partial) => partial.push_line(&line),
                    None if line.trim().is_empty() => {}
                    None => return Err(Error::KeylessLine { line: self.line_no }),
                },
            }
        }
    }
}

impl<R: BufRead> Iterator for Lexer<R> {
    type Item = Result<TagValue>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.step() {
            Ok(Some(tv)) => Some(Ok(tv)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

/// Split `Tag: value` into its tag and the rest of the line.
fn split_tag(line: &str) -> Option<(&str, &str)> {
    let colon = line.find(':')?;
    let tag = &line[..colon];
    if tag.is_empty() || !tag.bytes().all(|b| b.is_ascii_alphanumeric()) {
        return None;
    }
    let rest = &line[colon + 1..];
    if rest.is_empty() {
        Some((tag, rest))
    } else if rest.starts_with(' ') || rest.starts_with('\t') {
        Some((tag, &rest[1..]))
    } else {
        None
    }
}

/// Whether a `<text>` block is open after `s`, given whether one was open
/// before it.
fn text_open_after(s: &str, open_before: bool) -> bool {
    match (s.rfind("<text>"), s.rfind("</text>")) {
        (Some(open), Some(close)) => open > close,
        (Some(_), None) => true,
        (None, Some(_)) => false,
        (None, None) => open_before,
    }
}

fn normalize_value(raw: &str) -> String {
    let trimmed = raw.trim();

    if let Some(inner) = trimmed.strip_prefix("<text>") {
        if let Some(end) = inner.rfind("</text>") {
            return inner[..end].to_string();
        }
    }

    trimmed.strip_prefix("SHA1: ").unwrap_or(trimmed).to_string()
}
