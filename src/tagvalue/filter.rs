//! Removes comment lines from tag-value input.

use std::io::{self, BufRead, Read};

const TEXT_OPEN: &[u8] = b"<text>";
const TEXT_CLOSE: &[u8] = b"</text>";

/// A reader that drops `#` comment lines from the reader it wraps.
///
/// A line whose first non-blank character is `#` disappears along with its
/// line ending, unless it sits inside a `<text>...</text>` block, where it
/// is data. A `#` later in a line is kept. Line endings (`\n`, `\r\n`, `\r`)
/// come out as `\n`; a last line without an ending stays without one.
///
/// The filter reads its input once, front to back. It has no `Seek` or
/// `BufRead` implementation; wrap it in a `BufReader` to read lines.
#[derive(Debug)]
pub struct CommentFilter<R> {
    inner: R,
    pending: Vec<u8>,
    pos: usize,
    in_text: bool,
    eof: bool,
}

impl<R: BufRead> CommentFilter<R> {
    /// Filter the lines of `inner`.
    pub fn new(inner: R) -> Self {
        CommentFilter {
            inner,
            pending: vec![],
            pos: 0,
            in_text: false,
            eof: false,
        }
    }

    /// Discard up to `n` bytes of filtered output, returning how many were skipped.
    pub fn skip(&mut self, n: u64) -> io::Result<u64> {
        let mut skipped = 0;
        while skipped < n {
            if self.pos == self.pending.len() && !self.fill()? {
                break;
            }
            let available = (self.pending.len() - self.pos) as u64;
            let step = available.min(n - skipped);
            self.pos += step as usize;
            skipped += step;
        }
        Ok(skipped)
    }

    /// Read one physical line, without its ending.
    ///
    /// Returns `None` at end of input, and whether the line had an ending.
    fn read_raw_line(&mut self) -> io::Result<Option<(Vec<u8>, bool)>> {
        let mut line = vec![];
        loop {
            let available = self.inner.fill_buf()?;
            if available.is_empty() {
                return Ok(if line.is_empty() { None } else { Some((line, false)) });
            }

            match available.iter().position(|b| *b == b'\n' || *b == b'\r') {
                Some(i) => {
                    line.extend_from_slice(&available[..i]);
                    let ending = available[i];
                    self.inner.consume(i + 1);
                    if ending == b'\r' && self.inner.fill_buf()?.first() == Some(&b'\n') {
                        self.inner.consume(1);
                    }
                    return Ok(Some((line, true)));
                }
                None => {
                    let len = available.len();
                    line.extend_from_slice(available);
                    self.inner.consume(len);
                }
            }
        }
    }

    /// Load the next kept line into `pending`. Returns `false` at end of input.
    fn fill(&mut self) -> io::Result<bool> {
        if self.eof {
            return Ok(false);
        }

        loop {
            let (mut line, ended) = match self.read_raw_line()? {
                Some(read) => read,
                None => {
                    self.eof = true;
                    return Ok(false);
                }
            };

            if !self.in_text && is_comment(&line) {
                continue;
            }

            match (rfind(&line, TEXT_OPEN), rfind(&line, TEXT_CLOSE)) {
                (Some(open), Some(close)) => self.in_text = open > close,
                (Some(_), None) => self.in_text = true,
                (None, Some(_)) => self.in_text = false,
                (None, None) => {}
            }

            if ended {
                line.push(b'\n');
            }
            self.pending = line;
            self.pos = 0;
            return Ok(true);
        }
    }
}

impl<R: BufRead> Read for CommentFilter<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        if self.pos == self.pending.len() && !self.fill()? {
            return Ok(0);
        }

        let n = buf.len().min(self.pending.len() - self.pos);
        buf[..n].copy_from_slice(&self.pending[self.pos..self.pos + n]);
        self.pos += n;
        Ok(n)
    }
}

fn is_comment(line: &[u8]) -> bool {
    line.iter().find(|b| !b.is_ascii_whitespace()) == Some(&b'#')
}

fn rfind(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.len() > haystack.len() {
        return None;
    }
    (0..=haystack.len() - needle.len())
        .rev()
        .find(|&i| &haystack[i..i + needle.len()] == needle)
}

/// Strip comments from a whole string.
pub fn strip_comments(text: &str) -> io::Result<String> {
    let mut out = String::new();
    CommentFilter::new(text.as_bytes()).read_to_string(&mut out)?;
    Ok(out)
}
