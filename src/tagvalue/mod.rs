//! Reading SPDX tag-value documents.
//!
//! Input flows through three stages: [`CommentFilter`] drops `#` comment
//! lines, [`Lexer`] splits the rest into `Tag: Value` entries, and a
//! [`TagHandler`] consumes the entries. [`DocumentBuilder`] is the handler
//! that assembles an [`SpdxDocument`].

use crate::document::SpdxDocument;
use crate::error::{Result, Warning};
use std::io::{BufReader, Read};

mod builder;
mod filter;
mod lexer;
mod tags;

pub use builder::DocumentBuilder;
pub use filter::{strip_comments, CommentFilter};
pub use lexer::{Lexer, TagValue};
pub use tags::{Tag, TagTable};

/// Receives the entries of a tag-value stream in order.
pub trait TagHandler {
    /// Called once before the first entry.
    fn enter(&mut self) -> Result<()> {
        Ok(())
    }

    /// Called for every entry. An error stops the scan.
    fn build_tag(&mut self, tag: &TagValue) -> Result<()>;

    /// Called once after the last entry, if no entry failed.
    fn exit(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Feed every entry of `input` to `handler`.
pub fn scan<R: Read, H: TagHandler>(input: R, handler: &mut H) -> Result<()> {
    let filtered = CommentFilter::new(BufReader::new(input));
    let lexer = Lexer::new(BufReader::new(filtered));

    handler.enter()?;
    for entry in lexer {
        handler.build_tag(&entry?)?;
    }
    handler.exit()
}

/// A successfully built document and the problems found in it.
#[derive(Debug, Clone)]
pub struct Parsed {
    /// The document.
    pub document: SpdxDocument,
    /// Non-fatal problems, in the order they were found.
    pub warnings: Vec<Warning>,
}

/// Parse a tag-value document using the tag names in `table`.
pub fn parse_document<R: Read>(input: R, table: &TagTable) -> Result<Parsed> {
    log::info!(target: "spdx_tools", "parsing tag-value document");

    let mut builder = DocumentBuilder::new(table);
    scan(input, &mut builder)?;
    let parsed = builder.into_parsed();

    log::info!(
        target: "spdx_tools",
        "parsed '{}' with {} file(s) and {} warning(s)",
        parsed.document.label(),
        parsed.document.files.len(),
        parsed.warnings.len()
    );
    Ok(parsed)
}

/// Parse a tag-value document held in a string, with the default tag table.
pub fn parse_str(text: &str) -> Result<Parsed> {
    parse_document(text.as_bytes(), &TagTable::default())
}
