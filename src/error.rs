//! Fatal errors and non-fatal warnings.

use derive_more::Display;
use serde::Serialize;
use std::io;
use thiserror::Error;

/// A failure that aborts parsing or merging.
///
/// Line numbers count lines of the comment-free text, starting at 1.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// Reading the input failed.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// A `<text>` block was opened and never closed.
    #[error("unterminated <text> block starting on line {line}")]
    UnterminatedText {
        /// Line of the tag whose value opened the block.
        line: usize,
    },

    /// Content was found before the first tag.
    #[error("line {line} does not start with a tag")]
    KeylessLine {
        /// The offending line.
        line: usize,
    },

    /// The tag is not in the tag table.
    #[error("unrecognized tag '{tag}' on line {line}")]
    UnrecognizedTag {
        /// The tag as written.
        tag: String,
        /// Line of the tag.
        line: usize,
    },

    /// The tag needs an entity that has not been opened yet.
    #[error("tag '{tag}' on line {line} has no current {context}")]
    MissingContext {
        /// The tag as written.
        tag: String,
        /// Line of the tag.
        line: usize,
        /// The entity the tag belongs to.
        context: Context,
    },

    /// The tag value could not be interpreted.
    #[error("invalid value for '{tag}' on line {line}: {reason}")]
    InvalidValue {
        /// The tag as written.
        tag: String,
        /// Line of the tag.
        line: usize,
        /// What is wrong with the value.
        reason: String,
    },

    /// A `LicenseRef` was used before its extracted license was declared.
    #[error("license '{id}' on line {line} is referenced before it is declared")]
    UndeclaredLicense {
        /// The `LicenseRef-` identifier.
        id: String,
        /// Line of the expression that used it.
        line: usize,
    },

    /// A second package was declared in a single-package document.
    #[error("a second package '{name}' was declared on line {line}")]
    DuplicatePackage {
        /// Name of the second package.
        name: String,
        /// Line of its `PackageName` tag.
        line: usize,
    },

    /// A license expression could not be parsed.
    #[error("invalid license expression '{expression}' on line {line}: {reason}")]
    LicenseExpression {
        /// The expression text.
        expression: String,
        /// Line of the tag holding the expression.
        line: usize,
        /// Why parsing failed.
        reason: String,
    },

    /// One document declares the same license id with two different texts.
    #[error("license id '{id}' has conflicting texts in document '{document}'")]
    AmbiguousLicenseId {
        /// The `LicenseRef-` identifier.
        id: String,
        /// Name or namespace of the document.
        document: String,
    },

    /// Writing JSON output failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Writing YAML output failed.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// The output format has no writer.
    #[error("the {0} format is not supported")]
    UnsupportedFormat(String),
}

/// Entity kinds a tag can be scoped to.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq)]
pub enum Context {
    /// The document itself.
    #[display(fmt = "document")]
    Document,
    /// A review, opened by `Reviewer`.
    #[display(fmt = "reviewer")]
    Review,
    /// An extracted license, opened by `LicenseID`.
    #[display(fmt = "extracted license")]
    ExtractedLicense,
    /// The package, opened by `PackageName`.
    #[display(fmt = "package")]
    Package,
    /// A file, opened by `FileName`.
    #[display(fmt = "file")]
    File,
    /// A project of the current file, opened by `ArtifactOfProjectName`.
    #[display(fmt = "project")]
    Project,
    /// A snippet, opened by `SnippetSPDXID`.
    #[display(fmt = "snippet")]
    Snippet,
    /// A relationship, opened by `Relationship`.
    #[display(fmt = "relationship")]
    Relationship,
    /// An annotation, opened by `Annotator`.
    #[display(fmt = "annotation")]
    Annotation,
}

/// What a warning is about.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum WarningKind {
    /// A semantic rule of the document model is violated.
    #[display(fmt = "verification")]
    Verification,
    /// A `FileDependency` names a file that was never declared.
    #[display(fmt = "unresolved dependency")]
    UnresolvedDependency,
    /// A snippet refers to a file SPDX id that was never declared.
    #[display(fmt = "unresolved snippet file")]
    UnresolvedSnippetFile,
    /// A simple license id is not on the SPDX license list.
    #[display(fmt = "unknown license")]
    UnknownLicense,
}

/// A non-fatal diagnostic reported alongside a successfully built document.
#[derive(Debug, Display, Clone, PartialEq, Eq, Serialize)]
#[display(fmt = "{}: {}", kind, message)]
pub struct Warning {
    /// What the warning is about.
    pub kind: WarningKind,
    /// Human-readable description.
    pub message: String,
}

impl Warning {
    /// A warning of the given kind.
    pub fn new(kind: WarningKind, message: impl Into<String>) -> Self {
        Warning {
            kind,
            message: message.into(),
        }
    }

    /// A [`WarningKind::Verification`] warning.
    pub fn verification(message: impl Into<String>) -> Self {
        Warning::new(WarningKind::Verification, message)
    }
}

/// Result with this crate's [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;
